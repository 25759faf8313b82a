use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::BlockNumber;

/// Shortest challenge period the ledger will accept, in blocks.
pub const MIN_CHALLENGE_PERIOD: BlockNumber = 500;

/// Configuration for a channel ledger instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Number of blocks between an uncooperative close request and the
    /// earliest settlement. Gives the receiver time to present a better
    /// balance proof.
    pub challenge_period: BlockNumber,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            challenge_period: MIN_CHALLENGE_PERIOD,
        }
    }
}

impl LedgerConfig {
    /// Create a validated configuration.
    pub fn new(challenge_period: BlockNumber) -> Result<Self, CoreError> {
        let config = Self { challenge_period };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.challenge_period < MIN_CHALLENGE_PERIOD {
            return Err(CoreError::InvalidConfig(format!(
                "challenge period must be at least {} blocks, got {}",
                MIN_CHALLENGE_PERIOD, self.challenge_period
            )));
        }
        Ok(())
    }

    /// Parse and validate a configuration from TOML.
    pub fn from_toml_str(raw: &str) -> Result<Self, CoreError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }
}
