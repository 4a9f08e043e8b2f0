use std::string::FromUtf8Error;

use thiserror::Error;

/// Errors returned while inspecting or updating git index state.
#[derive(Debug, Error)]
pub enum GitIndexError {
    #[error("git command `{command}` failed with status {status}: {stderr}")]
    GitCommand {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("git command `{command}` produced non-UTF-8 output")]
    GitOutputUtf8 {
        command: String,
        #[source]
        source: FromUtf8Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
