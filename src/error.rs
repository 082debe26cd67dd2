//! # Error Types
//!
//! This module defines all error types for the audiology core.
//!
//! The core separates "the learner answered wrong" (an `Ok` evaluation with
//! `correct == false`) from "this cannot be evaluated at all" (an `Err`).
//! Only the latter is represented here.
//!
//! ## Error Types
//! - `IncompleteScenario` - A threshold the active stage needs is missing
//! - `InvalidAnswer` - The answer's shape doesn't fit the stage
//! - `UnknownStage` - A host passed a stage name that doesn't exist
//! - `InvalidConfig` - Grid or masking rules failed validation or decoding
//!
//! ## Usage
//! ```rust
//! use audiology::{evaluate_masking_step, AnswerValue, AudiologyError, MaskingRules, Stage};
//! use audiology::{Conduction, Ear, EarThresholds, MaskingScenario, Transducer};
//!
//! let scenario = MaskingScenario {
//!     test_ear: Ear::Right,
//!     conduction: Conduction::Air,
//!     test_frequency: 1000,
//!     transducer: Transducer::SupraAural,
//!     interaural_attenuation: 40,
//!     right_ear: EarThresholds::default().with_air(1000, 70),
//!     left_ear: EarThresholds::default(),
//! };
//!
//! match evaluate_masking_step(&MaskingRules::default(), &scenario, Stage::NeedsMasking, &AnswerValue::Bool(true)) {
//!     Ok(result) => println!("correct: {}", result.correct),
//!     Err(AudiologyError::IncompleteScenario { ear, frequency, .. }) => {
//!         eprintln!("scenario has no {} threshold at {} Hz", ear, frequency);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use crate::masking::{Conduction, Ear, Stage};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudiologyError {
    /// A threshold required by the active stage is absent from the scenario.
    ///
    /// # Example
    /// ```
    /// # use audiology::{AudiologyError, Conduction, Ear};
    /// let err = AudiologyError::IncompleteScenario {
    ///     ear: Ear::Left,
    ///     conduction: Conduction::Air,
    ///     frequency: 2000,
    /// };
    /// assert_eq!(err.to_string(), "Incomplete scenario: no left air-conduction threshold at 2000 Hz");
    /// ```
    #[error("Incomplete scenario: no {ear} {conduction}-conduction threshold at {frequency} Hz")]
    IncompleteScenario {
        ear: Ear,
        conduction: Conduction,
        frequency: u32,
    },

    /// The answer can't be decoded for the stage it was submitted to.
    ///
    /// # Example
    /// ```
    /// # use audiology::{AudiologyError, Stage};
    /// let err = AudiologyError::InvalidAnswer {
    ///     stage: Stage::InitialLevel,
    ///     message: "expected a level in dB HL".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Invalid answer for initial-level: expected a level in dB HL");
    /// ```
    #[error("Invalid answer for {stage}: {message}")]
    InvalidAnswer { stage: Stage, message: String },

    /// A stage name that isn't one of the five masking stages.
    ///
    /// # Example
    /// ```
    /// # use audiology::AudiologyError;
    /// let err = AudiologyError::UnknownStage("masking".to_string());
    /// assert_eq!(err.to_string(), "Unknown stage 'masking'");
    /// ```
    #[error("Unknown stage '{0}'")]
    UnknownStage(String),

    /// Invalid grid or rules configuration.
    ///
    /// # Example
    /// ```
    /// # use audiology::AudiologyError;
    /// let err = AudiologyError::InvalidConfig("frequencies must be strictly increasing".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: frequencies must be strictly increasing");
    /// ```
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
