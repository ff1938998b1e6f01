//! Play configuration

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::PlayError;

/// Settings shared by both worker loops
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayConfig {
    /// Rounds each loop handles before stopping
    #[serde(rename = "max-iterations", default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Inbound queue capacity per loop (one in-flight message needs only 1)
    #[serde(rename = "mailbox-capacity", default = "default_mailbox_capacity")]
    pub mailbox_capacity: usize,
}

fn default_max_iterations() -> u32 {
    debug!("default_max_iterations: called");
    10
}

fn default_mailbox_capacity() -> usize {
    debug!("default_mailbox_capacity: called");
    1
}

impl Default for PlayConfig {
    fn default() -> Self {
        debug!("PlayConfig::default: called");
        Self {
            max_iterations: default_max_iterations(),
            mailbox_capacity: default_mailbox_capacity(),
        }
    }
}

impl PlayConfig {
    /// Config with the given round budget and default queue sizing
    pub fn with_max_iterations(max_iterations: u32) -> Self {
        debug!(%max_iterations, "PlayConfig::with_max_iterations: called");
        Self {
            max_iterations,
            ..Default::default()
        }
    }

    /// Reject settings the protocol cannot run with
    pub fn validate(&self) -> Result<(), PlayError> {
        debug!(?self, "PlayConfig::validate: called");
        if self.max_iterations == 0 {
            return Err(PlayError::InvalidConfig("max-iterations must be at least 1".to_string()));
        }
        if self.mailbox_capacity == 0 {
            return Err(PlayError::InvalidConfig("mailbox-capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}
