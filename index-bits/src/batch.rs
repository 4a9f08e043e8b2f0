use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::error;
use tracing::trace;

use crate::GitIndexError;
use crate::UpdateIndexCommand;
use crate::process::render_command;
use crate::process::run_git;

/// One `git update-index` invocation scoped to a single repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedInvocation {
    root: PathBuf,
    command: UpdateIndexCommand,
    files: Vec<PathBuf>,
}

impl PlannedInvocation {
    /// Repository root the invocation runs in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Index bit operation the invocation applies.
    pub fn command(&self) -> UpdateIndexCommand {
        self.command
    }

    /// Files the invocation updates, as given by the caller.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// The `git -C <root> update-index ...` command line the invocation runs.
    pub fn command_line(&self) -> String {
        render_command(&self.root, &self.args())
    }

    fn args(&self) -> Vec<OsString> {
        let mut args = vec![
            OsString::from("update-index"),
            OsString::from(self.command.flag()),
            OsString::from("--"),
        ];
        args.extend(
            self.files
                .iter()
                .map(|file| relative_to_root(&self.root, file).into_os_string()),
        );
        args
    }

    fn run(&self) -> Result<(), GitIndexError> {
        run_git(&self.root, self.args())?;
        Ok(())
    }
}

/// A failed invocation together with the diagnostics it produced.
#[derive(Debug)]
pub struct InvocationFailure {
    /// Root of the repository whose invocation failed.
    pub root: PathBuf,
    /// Standard error output of the failed command, one entry per line.
    pub error_lines: Vec<String>,
}

/// Result of applying a batch of index updates.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Every file the batch attempted to update, in invocation order.
    ///
    /// Files of failed invocations are included so callers can refresh
    /// their view of them unconditionally.
    pub dirty_files: Vec<PathBuf>,
    /// Invocations that exited with an error.
    pub failures: Vec<InvocationFailure>,
}

impl BatchOutcome {
    /// True when every invocation exited successfully.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Groups `files` by repository root and plans one invocation per root.
///
/// Files for which `resolve_root` returns `None` are dropped. Roots keep the
/// order in which they are first seen and files keep their input order within
/// each root.
pub fn plan<F>(
    command: UpdateIndexCommand,
    files: &[PathBuf],
    mut resolve_root: F,
) -> Vec<PlannedInvocation>
where
    F: FnMut(&Path) -> Option<PathBuf>,
{
    let mut groups: IndexMap<PathBuf, Vec<PathBuf>> = IndexMap::new();
    for file in files {
        let Some(root) = resolve_root(file) else {
            trace!("skipping {}: no repository root", file.display());
            continue;
        };
        groups.entry(root).or_default().push(file.clone());
    }
    groups
        .into_iter()
        .map(|(root, files)| PlannedInvocation {
            root,
            command,
            files,
        })
        .collect()
}

/// Plans and executes a batch of index updates in one call.
pub fn apply<F>(command: UpdateIndexCommand, files: &[PathBuf], resolve_root: F) -> BatchOutcome
where
    F: FnMut(&Path) -> Option<PathBuf>,
{
    execute(plan(command, files, resolve_root))
}

/// Runs planned invocations, collecting failures instead of aborting.
///
/// A failure in one repository does not keep invocations for other
/// repositories from running.
pub fn execute(invocations: Vec<PlannedInvocation>) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for invocation in invocations {
        let result = invocation.run();
        let PlannedInvocation { root, files, .. } = invocation;
        if let Err(err) = result {
            let error_lines = failure_lines(&err);
            for line in &error_lines {
                error!("update-index failed in {}: {line}", root.display());
            }
            outcome.failures.push(InvocationFailure { root, error_lines });
        }
        outcome.dirty_files.extend(files);
    }
    outcome
}

/// Splits a failed invocation into the diagnostic lines it produced.
fn failure_lines(error: &GitIndexError) -> Vec<String> {
    match error {
        GitIndexError::GitCommand { stderr, .. } if !stderr.is_empty() => {
            stderr.lines().map(str::to_string).collect()
        }
        other => vec![other.to_string()],
    }
}

/// Rewrites `file` relative to `root` for use as a git pathspec.
///
/// Paths that do not live under `root` pass through unchanged.
fn relative_to_root(root: &Path, file: &Path) -> PathBuf {
    if let Ok(stripped) = file.strip_prefix(root) {
        return stripped.to_path_buf();
    }
    canonical_relative(root, file).unwrap_or_else(|| file.to_path_buf())
}

/// Retries the strip against canonicalized paths to see through symlinks.
fn canonical_relative(root: &Path, file: &Path) -> Option<PathBuf> {
    let root_canon = root.canonicalize().ok()?;
    let file_canon = file.canonicalize().ok()?;
    file_canon
        .strip_prefix(&root_canon)
        .ok()
        .map(Path::to_path_buf)
}
