use std::fmt;

/// Index bit operations understood by `git update-index`.
///
/// Each variant maps to exactly one command-line flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateIndexCommand {
    /// Set the executable bit on the index entry (`--chmod=+x`).
    MakeExecutable,
    /// Clear the executable bit on the index entry (`--chmod=-x`).
    MakeNotExecutable,
    /// Mark the index entry with skip-worktree (`--skip-worktree`).
    SetSkipWorktree,
    /// Remove the skip-worktree mark from the index entry (`--no-skip-worktree`).
    ClearSkipWorktree,
}

impl UpdateIndexCommand {
    /// The flag passed to `git update-index` for this operation.
    pub fn flag(self) -> &'static str {
        match self {
            UpdateIndexCommand::MakeExecutable => "--chmod=+x",
            UpdateIndexCommand::MakeNotExecutable => "--chmod=-x",
            UpdateIndexCommand::SetSkipWorktree => "--skip-worktree",
            UpdateIndexCommand::ClearSkipWorktree => "--no-skip-worktree",
        }
    }
}

impl fmt::Display for UpdateIndexCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn flags_match_git_update_index_arguments() {
        assert_eq!(UpdateIndexCommand::MakeExecutable.flag(), "--chmod=+x");
        assert_eq!(UpdateIndexCommand::MakeNotExecutable.flag(), "--chmod=-x");
        assert_eq!(UpdateIndexCommand::SetSkipWorktree.flag(), "--skip-worktree");
        assert_eq!(
            UpdateIndexCommand::ClearSkipWorktree.flag(),
            "--no-skip-worktree"
        );
    }

    #[test]
    fn display_renders_the_flag() {
        assert_eq!(
            UpdateIndexCommand::SetSkipWorktree.to_string(),
            "--skip-worktree"
        );
    }
}
