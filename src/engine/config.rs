//! Machine configuration.

use crate::metrics::LoopBudget;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing a machine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid machine configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Construction-time settings for a [`Machine`](crate::engine::Machine).
///
/// # Example
///
/// ```rust
/// use stepwise::engine::MachineConfig;
/// use stepwise::metrics::LoopBudget;
///
/// let config = MachineConfig::from_json(r#"{ "loop_budget": { "bounded": 50 } }"#).unwrap();
/// assert_eq!(config.loop_budget, LoopBudget::from_limit(50));
///
/// let config = MachineConfig::from_json("{}").unwrap();
/// assert_eq!(config.loop_budget, LoopBudget::Unbounded);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub loop_budget: LoopBudget,
}

impl MachineConfig {
    /// Configuration with a fixed loop budget. Zero means unbounded.
    pub fn with_loop_budget(limit: usize) -> Self {
        Self {
            loop_budget: LoopBudget::from_limit(limit),
        }
    }

    pub fn unbounded() -> Self {
        Self {
            loop_budget: LoopBudget::Unbounded,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
