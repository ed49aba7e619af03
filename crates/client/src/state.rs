//! Initialization lifecycle.

use serde::{Deserialize, Serialize};

/// Where the client is in its initialization lifecycle.
///
/// `Idle → Initializing → Ready | Degraded | Failed`; any settled state may
/// start initializing again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitState {
    /// `init` was never called.
    Idle,
    /// An `init` call is in flight.
    Initializing,
    /// Catalog freshly fetched from the native store.
    Ready,
    /// Native initialization failed; catalog restored from the snapshot.
    Degraded,
    /// Native initialization failed and no snapshot could be used.
    Failed,
}

impl InitState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, InitState::Initializing)
    }
}

/// How a finished `init` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitOutcome {
    Ready,
    Degraded,
    Failed,
}

impl InitOutcome {
    /// Whether the catalog is usable (the success callback was invoked).
    pub fn is_available(&self) -> bool {
        !matches!(self, InitOutcome::Failed)
    }
}

impl From<InitOutcome> for InitState {
    fn from(value: InitOutcome) -> Self {
        match value {
            InitOutcome::Ready => InitState::Ready,
            InitOutcome::Degraded => InitState::Degraded,
            InitOutcome::Failed => InitState::Failed,
        }
    }
}
