use std::path::Path;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use git_index_bits::UpdateIndexCommand;
use git_index_bits::execute;
use git_index_bits::list_index_bits;
use git_index_bits::plan;
use git_index_bits::resolve_repo_root;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "git-index-bits",
    version,
    about = "Toggle skip-worktree and executable bits on files across git repositories"
)]
struct Cli {
    #[command(subcommand)]
    subcommand: Subcommand,
}

#[derive(Debug, clap::Subcommand)]
enum Subcommand {
    /// Set the executable bit on the given files.
    MakeExecutable(FileArgs),
    /// Clear the executable bit on the given files.
    MakeNotExecutable(FileArgs),
    /// Mark the given files with skip-worktree.
    SkipWorktree(FileArgs),
    /// Remove the skip-worktree mark from the given files.
    NoSkipWorktree(FileArgs),
    /// Show index bits for tracked files.
    List(ListArgs),
}

#[derive(Debug, clap::Args)]
struct FileArgs {
    /// Files to update. Files from different repositories may be mixed.
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Print the planned git commands instead of running them.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, clap::Args)]
struct ListArgs {
    /// Limit the listing to the given paths.
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.subcommand {
        Subcommand::MakeExecutable(args) => {
            update_bits(UpdateIndexCommand::MakeExecutable, &args.files, args.dry_run)
        }
        Subcommand::MakeNotExecutable(args) => {
            update_bits(UpdateIndexCommand::MakeNotExecutable, &args.files, args.dry_run)
        }
        Subcommand::SkipWorktree(args) => {
            update_bits(UpdateIndexCommand::SetSkipWorktree, &args.files, args.dry_run)
        }
        Subcommand::NoSkipWorktree(args) => {
            update_bits(UpdateIndexCommand::ClearSkipWorktree, &args.files, args.dry_run)
        }
        Subcommand::List(args) => list_bits(&args.paths),
    }
}

/// Plans the batch for `files` and either prints or runs it.
///
/// Updated files are echoed on stdout so callers can refresh their state.
/// Failures are reported on stderr and turn into a non-zero exit code once
/// every repository has been given its chance to run.
fn update_bits(
    command: UpdateIndexCommand,
    files: &[PathBuf],
    dry_run: bool,
) -> anyhow::Result<()> {
    let files = files
        .iter()
        .map(std::path::absolute)
        .collect::<Result<Vec<_>, _>>()?;
    let invocations = plan(command, &files, resolve_root);
    if dry_run {
        for invocation in &invocations {
            println!("{}", invocation.command_line());
        }
        return Ok(());
    }
    let outcome = execute(invocations);
    for file in &outcome.dirty_files {
        println!("{}", file.display());
    }
    if !outcome.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn resolve_root(file: &Path) -> Option<PathBuf> {
    match resolve_repo_root(file) {
        Ok(root) => root,
        Err(err) => {
            warn!("could not resolve a repository for {}: {err}", file.display());
            None
        }
    }
}

fn list_bits(paths: &[PathBuf]) -> anyhow::Result<()> {
    let paths = paths
        .iter()
        .map(std::path::absolute)
        .collect::<Result<Vec<_>, _>>()?;
    let anchor = match paths.first() {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };
    let root = resolve_repo_root(&anchor)?
        .ok_or_else(|| anyhow!("{} is not inside a git repository", anchor.display()))?;
    for entry in list_index_bits(&root, &paths)? {
        let executable = if entry.executable { 'x' } else { '-' };
        let skip_worktree = if entry.skip_worktree { 's' } else { '-' };
        println!("{executable}{skip_worktree} {}", entry.path.display());
    }
    Ok(())
}

fn init_logging() {
    let default_level = "error";
    let _ = tracing_subscriber::fmt()
        // Fallback to the `default_level` log filter if the environment
        // variable is not set _or_ contains an invalid value
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
