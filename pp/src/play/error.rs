//! Play error types

use thiserror::Error;

use super::messages::Role;

/// Errors that can end a ping/pong run early
#[derive(Debug, Error)]
pub enum PlayError {
    #[error("Invalid play configuration: {0}")]
    InvalidConfig(String),

    #[error("{role} startup barrier broken: peer went away before arriving")]
    BarrierBroken { role: Role },

    #[error("{role} inbound queue closed after {handled} rounds with budget remaining")]
    ChainBroken { role: Role, handled: u32 },

    #[error("{role} worker panicked")]
    WorkerPanicked { role: Role },

    #[error("{role} worker was cancelled before finishing")]
    WorkerCancelled { role: Role },
}

impl PlayError {
    /// Check if the run failed before any message was exchanged
    pub fn is_startup_failure(&self) -> bool {
        matches!(self, PlayError::InvalidConfig(_) | PlayError::BarrierBroken { .. })
    }

    /// The role whose worker reported this error, if any
    pub fn role(&self) -> Option<Role> {
        match self {
            PlayError::InvalidConfig(_) => None,
            PlayError::BarrierBroken { role }
            | PlayError::ChainBroken { role, .. }
            | PlayError::WorkerPanicked { role }
            | PlayError::WorkerCancelled { role } => Some(*role),
        }
    }
}
