use std::path::Path;
use std::path::PathBuf;

use crate::GitIndexError;
use crate::process::run_git_for_stdout;

/// Finds the root of the working tree that contains `path`.
///
/// `path` may name a file; resolution then starts from its parent directory.
/// Returns `Ok(None)` when the path is not inside a git repository.
pub fn resolve_repo_root(path: &Path) -> Result<Option<PathBuf>, GitIndexError> {
    let dir = if path.is_dir() {
        path
    } else {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    };
    match run_git_for_stdout(dir, ["rev-parse", "--show-toplevel"]) {
        Ok(root) => Ok(Some(PathBuf::from(root))),
        // git exits with 128 when the directory is not part of a work tree.
        Err(GitIndexError::GitCommand { status, .. }) if status.code() == Some(128) => Ok(None),
        Err(err) => Err(err),
    }
}
