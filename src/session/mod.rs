//! Interactive session layer.
//!
//! [`MindMap`] owns the model and enforces the mutation order
//! (store, then visibility, then projection). [`MindMapHandle`] shares it
//! with the rendering layer and drives the asynchronous save.

pub mod handle;
pub mod notice;
pub mod state;

use crate::layout::LayoutError;
use crate::persist::SaveError;
use crate::store::GraphError;
use crate::types::SeedError;

pub use handle::{MindMapHandle, NodeActions};
pub use notice::{Notice, NoticeLevel};
pub use state::MindMap;

/// Errors surfaced by session operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    /// The seed could not be flattened.
    #[error("Invalid seed: {0}")]
    Seed(#[from] SeedError),

    /// A graph mutation was refused.
    #[error("Graph operation refused: {0}")]
    Graph(#[from] GraphError),

    /// The layout engine failed.
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    /// The save backend failed.
    #[error("Save failed: {0}")]
    Save(#[from] SaveError),

    /// The operation requires edit mode.
    #[error("Not in edit mode")]
    NotEditing,

    /// Another save has not finished yet.
    #[error("A save is already in progress")]
    SaveInProgress,
}
