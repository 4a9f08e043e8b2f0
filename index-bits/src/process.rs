use std::ffi::OsStr;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use crate::GitIndexError;

pub(crate) struct GitRun {
    pub(crate) command: String,
    pub(crate) output: std::process::Output,
}

/// Executes a git command inside `dir` and returns its captured output.
pub(crate) fn run_git<I, S>(dir: &Path, args: I) -> Result<GitRun, GitIndexError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args_vec: Vec<OsString> = args
        .into_iter()
        .map(|arg| OsString::from(arg.as_ref()))
        .collect();
    let command_string = render_command(dir, &args_vec);
    let mut command = Command::new("git");
    command.current_dir(dir);
    command.args(&args_vec);
    let output = command.output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(GitIndexError::GitCommand {
            command: command_string,
            status: output.status,
            stderr,
        });
    }
    Ok(GitRun {
        command: command_string,
        output,
    })
}

/// Runs a git command and returns trimmed standard output.
pub(crate) fn run_git_for_stdout<I, S>(dir: &Path, args: I) -> Result<String, GitIndexError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let run = run_git(dir, args)?;
    String::from_utf8(run.output.stdout)
        .map(|value| value.trim().to_string())
        .map_err(|source| GitIndexError::GitOutputUtf8 {
            command: run.command,
            source,
        })
}

/// Renders the `git -C <dir> ...` form of an invocation for diagnostics.
pub(crate) fn render_command(dir: &Path, args: &[OsString]) -> String {
    let joined = args
        .iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    format!("git -C {} {joined}", dir.display())
}
