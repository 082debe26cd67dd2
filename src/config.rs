//! # Configuration
//!
//! Read-only settings the host hands to the core: the audiogram grid and the
//! numeric rules used to judge masking answers. Both come with clinical
//! defaults and can be overridden from a YAML document.
//!
//! ```yaml
//! grid:
//!   frequencies: [250, 500, 1000, 2000, 4000]
//!   levels: [-10, 0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120]
//!   level-step: 5
//! masking:
//!   initial-margin-db: 15
//!   initial-tolerance-db: 5
//!   response-floor-db: 0
//!   response-ceiling-db: 120
//!   interaural-attenuation:
//!     supra-aural: 40
//!     insert: 55
//! ```
//!
//! Any key may be omitted; missing keys fall back to the defaults.

use crate::error::AudiologyError;
use crate::grid::AudiogramGrid;
use serde::{Deserialize, Serialize};

/// Minimum interaural attenuation assumed per transducer, in dB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct InterauralDefaults {
    pub supra_aural: u32,
    pub insert: u32,
}

impl Default for InterauralDefaults {
    fn default() -> Self {
        Self {
            supra_aural: 40,
            insert: 55,
        }
    }
}

/// Numeric contract for the masking stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MaskingRules {
    /// Added to the non-test ear's air threshold to get the initial masking level.
    pub initial_margin_db: i32,
    /// Accepted distance from the computed initial level, inclusive.
    pub initial_tolerance_db: i32,
    /// Lowest masked/final threshold accepted as plausible.
    pub response_floor_db: i32,
    /// Highest masked/final threshold accepted as plausible.
    pub response_ceiling_db: i32,
    pub interaural_attenuation: InterauralDefaults,
}

impl Default for MaskingRules {
    fn default() -> Self {
        Self {
            initial_margin_db: 15,
            initial_tolerance_db: 5,
            response_floor_db: 0,
            response_ceiling_db: 120,
            interaural_attenuation: InterauralDefaults::default(),
        }
    }
}

impl MaskingRules {
    pub fn validate(&self) -> Result<(), AudiologyError> {
        if self.initial_tolerance_db < 0 {
            return Err(AudiologyError::InvalidConfig(format!(
                "initial-tolerance-db must not be negative, got {}",
                self.initial_tolerance_db
            )));
        }
        if self.response_floor_db > self.response_ceiling_db {
            return Err(AudiologyError::InvalidConfig(format!(
                "response-floor-db ({}) is above response-ceiling-db ({})",
                self.response_floor_db, self.response_ceiling_db
            )));
        }
        Ok(())
    }

    pub fn accepts_response(&self, level: i32) -> bool {
        (self.response_floor_db..=self.response_ceiling_db).contains(&level)
    }
}

/// Everything the core reads from its host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub grid: AudiogramGrid,
    pub masking: MaskingRules,
}

impl TrainerConfig {
    /// Parse and validate a YAML configuration document.
    pub fn from_yaml(source: &str) -> Result<Self, AudiologyError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: TrainerConfig = serde_yaml::from_str(source)
            .map_err(|e| AudiologyError::InvalidConfig(e.to_string()))?;
        config.masking.validate()?;
        tracing::debug!(
            frequencies = config.grid.frequencies().len(),
            levels = config.grid.levels().len(),
            "loaded trainer configuration"
        );
        Ok(config)
    }
}
