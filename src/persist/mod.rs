//! Save collaborators.
//!
//! Saving is the only asynchronous boundary of a session. The engine hands a
//! [`SavePayload`] to a backend and waits for an acknowledgement; the local
//! model is never rolled back on failure.

pub mod simulated;

use async_trait::async_trait;

use crate::types::SavePayload;

pub use simulated::SimulatedSaveBackend;

/// Error type for save backends.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    /// The backend refused the payload.
    #[error("Save rejected: {0}")]
    Rejected(String),
    /// The backend could not be reached.
    #[error("Save backend unavailable: {0}")]
    Unavailable(String),
}

/// Trait for persistence backends.
#[async_trait]
pub trait SaveBackend: Send + Sync {
    /// Persist a payload.
    async fn save(&self, payload: &SavePayload) -> Result<(), SaveError>;
}
