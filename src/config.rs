// 7.0 config.rs: all settings in one place. fee tiers, tick spacing limits,
// event log bounds.

use serde::{Deserialize, Serialize};

use crate::types::FeePips;

/// Largest tick spacing a pool may be created with.
pub const MAX_TICK_SPACING: i32 = 32767;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fee tiers pools may be created with, in pips.
    pub fee_tiers: Vec<FeePips>,
    /// Tick spacings must be a positive multiple of this granularity.
    pub tick_spacing_granularity: i32,
    /// Upper bound on tick spacing.
    pub max_tick_spacing: i32,
    /// Event log bound; oldest events are dropped past this.
    pub max_events: usize,
    /// Print events as they are emitted.
    pub verbose: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fee_tiers: vec![
                FeePips::new(100),
                FeePips::new(500),
                FeePips::new(3000),
                FeePips::new(10000),
            ],
            tick_spacing_granularity: 1,
            max_tick_spacing: MAX_TICK_SPACING,
            max_events: 10_000,
            verbose: false,
        }
    }
}

impl EngineConfig {
    /// Default tiers plus the intermediate ones, with verbose event output.
    pub fn development() -> Self {
        let mut config = Self::default();
        config.verbose = true;
        config
    }

    /// Wider tier set for environments that list exotic pairs.
    pub fn permissive() -> Self {
        let mut config = Self::default();
        config.fee_tiers = vec![
            FeePips::new(100),
            FeePips::new(200),
            FeePips::new(500),
            FeePips::new(2500),
            FeePips::new(3000),
            FeePips::new(10000),
        ];
        config
    }

    pub fn supports_fee(&self, fee: FeePips) -> bool {
        self.fee_tiers.contains(&fee)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fee_tiers.is_empty() {
            return Err(ConfigError::InvalidFeeTiers {
                reason: "at least one fee tier is required".to_string(),
            });
        }
        if self.tick_spacing_granularity <= 0 {
            return Err(ConfigError::InvalidTickSpacingLimits {
                reason: "granularity must be positive".to_string(),
            });
        }
        if self.max_tick_spacing <= 0 || self.max_tick_spacing > MAX_TICK_SPACING {
            return Err(ConfigError::InvalidTickSpacingLimits {
                reason: format!("max tick spacing must be in (0, {MAX_TICK_SPACING}]"),
            });
        }
        if self.max_events == 0 {
            return Err(ConfigError::InvalidEventBound {
                reason: "event log bound must be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid fee tiers: {reason}")]
    InvalidFeeTiers { reason: String },

    #[error("invalid tick spacing limits: {reason}")]
    InvalidTickSpacingLimits { reason: String },

    #[error("invalid event bound: {reason}")]
    InvalidEventBound { reason: String },
}
