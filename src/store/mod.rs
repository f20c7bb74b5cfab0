//! Graph storage and structural mutations.

pub mod graph;
pub mod placement;

pub use graph::{GraphStore, DeleteOutcome};
pub use placement::place_child;

/// Error type for store mutations.
///
/// Only refusals are errors; unknown ids and invalid labels are silent no-ops.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The reserved root node cannot be deleted.
    #[error("Cannot delete the root node")]
    RootDeletion,
}
