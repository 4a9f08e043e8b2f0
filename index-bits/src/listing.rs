use std::collections::HashSet;
use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::GitIndexError;
use crate::process::run_git_for_stdout;

/// Index bits recorded for one tracked file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBitState {
    /// Path of the file relative to the repository root.
    pub path: PathBuf,
    /// True when the index entry carries mode 100755.
    pub executable: bool,
    /// True when the skip-worktree bit is set on the entry.
    pub skip_worktree: bool,
}

/// Reads the executable and skip-worktree bits of tracked files in `repo_root`.
///
/// Entries are reported in index order. An empty `pathspecs` slice lists every
/// tracked file; otherwise the listing is limited to matching paths.
pub fn list_index_bits(
    repo_root: &Path,
    pathspecs: &[PathBuf],
) -> Result<Vec<FileBitState>, GitIndexError> {
    let skipped = skip_worktree_paths(repo_root, pathspecs)?;

    let stage_output = run_git_for_stdout(repo_root, ls_files_args("--stage", pathspecs))?;
    // Unmerged entries repeat per stage; keyed insertion keeps one per path.
    let mut entries: IndexMap<String, FileBitState> = IndexMap::new();
    for line in stage_output.lines() {
        let Some((meta, path)) = line.split_once('\t') else {
            continue;
        };
        entries.insert(
            path.to_string(),
            FileBitState {
                path: PathBuf::from(path),
                executable: meta.starts_with("100755"),
                skip_worktree: skipped.contains(path),
            },
        );
    }
    Ok(entries.into_values().collect())
}

/// Collects the paths whose index entries carry the skip-worktree bit.
///
/// `git ls-files -v` tags those entries with `S`, or `s` when the entry is
/// also marked assume-unchanged.
fn skip_worktree_paths(
    repo_root: &Path,
    pathspecs: &[PathBuf],
) -> Result<HashSet<String>, GitIndexError> {
    let output = run_git_for_stdout(repo_root, ls_files_args("-v", pathspecs))?;
    let mut skipped = HashSet::new();
    for line in output.lines() {
        if let Some((tag, path)) = line.split_once(' ')
            && matches!(tag, "S" | "s")
        {
            skipped.insert(path.to_string());
        }
    }
    Ok(skipped)
}

fn ls_files_args(mode_flag: &str, pathspecs: &[PathBuf]) -> Vec<OsString> {
    let mut args = vec![
        OsString::from("ls-files"),
        OsString::from(mode_flag),
        OsString::from("--"),
    ];
    args.extend(pathspecs.iter().map(|path| OsString::from(path.as_os_str())));
    args
}

#[cfg(test)]
mod tests {
    use std::process::Command;

    use pretty_assertions::assert_eq;

    use super::*;

    fn run_git_in(repo: &Path, args: &[&str]) {
        let status = Command::new("git")
            .current_dir(repo)
            .args(args)
            .status()
            .expect("git command");
        assert!(status.success(), "git command failed: {args:?}");
    }

    fn init_test_repo(repo: &Path) {
        run_git_in(repo, &["init", "--initial-branch=main"]);
        run_git_in(repo, &["config", "core.autocrlf", "false"]);
    }

    #[test]
    fn lists_executable_and_skip_worktree_bits() -> Result<(), GitIndexError> {
        let temp = tempfile::tempdir()?;
        let repo = temp.path();
        init_test_repo(repo);
        std::fs::write(repo.join("keep.txt"), "k\n")?;
        std::fs::write(repo.join("plain.txt"), "p\n")?;
        std::fs::write(repo.join("run.sh"), "#!/bin/sh\n")?;
        run_git_in(repo, &["add", "keep.txt", "plain.txt", "run.sh"]);
        run_git_in(repo, &["update-index", "--chmod=+x", "run.sh"]);
        run_git_in(repo, &["update-index", "--skip-worktree", "keep.txt"]);

        let entries = list_index_bits(repo, &[])?;

        assert_eq!(
            entries,
            [
                FileBitState {
                    path: PathBuf::from("keep.txt"),
                    executable: false,
                    skip_worktree: true,
                },
                FileBitState {
                    path: PathBuf::from("plain.txt"),
                    executable: false,
                    skip_worktree: false,
                },
                FileBitState {
                    path: PathBuf::from("run.sh"),
                    executable: true,
                    skip_worktree: false,
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn limits_the_listing_to_pathspecs() -> Result<(), GitIndexError> {
        let temp = tempfile::tempdir()?;
        let repo = temp.path();
        init_test_repo(repo);
        let sub = repo.join("sub");
        std::fs::create_dir_all(&sub)?;
        std::fs::write(repo.join("top.txt"), "t\n")?;
        std::fs::write(sub.join("inner.txt"), "i\n")?;
        run_git_in(repo, &["add", "top.txt", "sub/inner.txt"]);

        let entries = list_index_bits(repo, &[PathBuf::from("sub")])?;

        assert_eq!(
            entries,
            [FileBitState {
                path: PathBuf::from("sub/inner.txt"),
                executable: false,
                skip_worktree: false,
            }]
        );
        Ok(())
    }
}
