//! Expiry and generation-limit policy.

use arkiva_core::{ArkivaResult, ConfigError};
use std::time::Duration;

/// How long generated summaries live and how many times a single document
/// version may be (re)generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPolicy {
    /// TTL applied when an entry is created.
    pub ttl: Duration,
    /// Maximum generations per fingerprint. `None` means unbounded.
    pub max_generations: Option<u32>,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            max_generations: None,
        }
    }
}

impl GenerationPolicy {
    /// Create a policy with default values (10 minute TTL, unbounded).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Cap the number of generations per fingerprint.
    pub fn with_max_generations(mut self, max: u32) -> Self {
        self.max_generations = Some(max);
        self
    }

    /// Remove the generation cap.
    pub fn unbounded(mut self) -> Self {
        self.max_generations = None;
        self
    }

    /// Whether a fingerprint that has already used `count` generations may
    /// request another one.
    pub fn allows(&self, count: u32) -> bool {
        match self.max_generations {
            Some(max) => count < max,
            None => true,
        }
    }

    pub fn validate(&self) -> ArkivaResult<()> {
        if self.ttl.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "ttl".to_string(),
                value: format!("{:?}", self.ttl),
                reason: "must be > 0".to_string(),
            }
            .into());
        }
        if self.max_generations == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "max_generations".to_string(),
                value: "0".to_string(),
                reason: "must be > 0 (omit for unbounded)".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
