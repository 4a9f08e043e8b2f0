//! Batch updates for per-file git index bits.
//!
//! Files from any number of repositories are grouped by working tree root and
//! updated with one `git update-index` invocation per root. A failing
//! repository never blocks the others; its diagnostics are collected and the
//! attempted files are still reported back for refresh.

mod batch;
mod command;
mod error;
mod listing;
mod process;
mod resolve;

pub use batch::BatchOutcome;
pub use batch::InvocationFailure;
pub use batch::PlannedInvocation;
pub use batch::apply;
pub use batch::execute;
pub use batch::plan;
pub use command::UpdateIndexCommand;
pub use error::GitIndexError;
pub use listing::FileBitState;
pub use listing::list_index_bits;
pub use resolve::resolve_repo_root;
