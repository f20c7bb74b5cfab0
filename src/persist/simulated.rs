//! Simulated save backend for demos and testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;

use crate::config::MindMapConfig;
use crate::types::SavePayload;

use super::{SaveBackend, SaveError};

/// Backend that waits a fixed delay, then accepts or rejects.
///
/// Accepted payloads are recorded in order.
#[derive(Debug, Default)]
pub struct SimulatedSaveBackend {
    delay: Duration,
    failure: Option<String>,
    saved: Mutex<Vec<SavePayload>>,
}

impl SimulatedSaveBackend {
    /// Backend that accepts every payload after `delay`.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            failure: None,
            saved: Mutex::new(Vec::new()),
        }
    }

    /// Backend using the configured save delay.
    pub fn from_config(config: &MindMapConfig) -> Self {
        Self::new(config.save_delay())
    }

    /// Backend that rejects every payload after `delay`.
    pub fn failing(delay: Duration, reason: impl Into<String>) -> Self {
        Self {
            delay,
            failure: Some(reason.into()),
            saved: Mutex::new(Vec::new()),
        }
    }

    /// Payloads accepted so far.
    pub fn saved_payloads(&self) -> Vec<SavePayload> {
        self.saved.lock().clone()
    }

    /// Number of payloads accepted so far.
    pub fn save_count(&self) -> usize {
        self.saved.lock().len()
    }
}

#[async_trait]
impl SaveBackend for SimulatedSaveBackend {
    async fn save(&self, payload: &SavePayload) -> Result<(), SaveError> {
        tracing::debug!(
            nodes = payload.nodes.len(),
            edges = payload.edges.len(),
            delay_ms = self.delay.as_millis() as u64,
            "simulated save started"
        );
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if let Some(reason) = &self.failure {
            return Err(SaveError::Rejected(reason.clone()));
        }

        self.saved.lock().push(payload.clone());
        Ok(())
    }
}
