//! # Masking Module
//!
//! Clinical decision logic for contralateral masking during threshold
//! testing, organised as a five-stage plateau exercise.
//!
//! ## Sub-modules
//! - `types` - Scenario, stage, answer and result types
//! - `engine` - Stateless evaluation of one answer at one stage
//! - `session` - [`MaskingExercise`], which walks a scenario through the stages
//!
//! ## Stages
//! ```text
//! NeedsMasking -> InitialLevel -> MaskedThreshold -> PlateauStepSize -> FinalThreshold
//! ```
//! A correct answer moves forward by one stage; a wrong one stays put. There
//! is no failure state.
//!
//! ## Rules
//!
//! ### Needs masking
//! - Air: `test_threshold - interaural_attenuation <= non_test_threshold` (inclusive)
//! - Bone: always, interaural attenuation is treated as 0 dB
//!
//! ### Initial level
//! - `non_test_air_threshold + 15` dB, answers within ±5 dB accepted
//!
//! ### Masked / final threshold
//! - Any whole number in [0, 120] dB HL
//!
//! ### Plateau step size
//! - Air: `10dB-twice`, bone: `5dB-twice`
//!
//! ## Example
//! ```rust
//! use audiology::masking::*;
//! use audiology::MaskingRules;
//!
//! let rules = MaskingRules::default();
//! let scenario = MaskingScenario {
//!     test_ear: Ear::Right,
//!     conduction: Conduction::Air,
//!     test_frequency: 1000,
//!     transducer: Transducer::SupraAural,
//!     interaural_attenuation: 40,
//!     right_ear: EarThresholds::default().with_air(1000, 70),
//!     left_ear: EarThresholds::default().with_air(1000, 30),
//! };
//!
//! let result = evaluate_masking_step(&rules, &scenario, Stage::NeedsMasking, &AnswerValue::Bool(true)).unwrap();
//! assert!(result.correct);
//! assert_eq!(result.next_stage, Some(Stage::InitialLevel));
//! ```

mod engine;
mod session;
mod types;

#[cfg(test)]
mod tests;

pub use engine::{correct_initial_level, correct_plateau_step, evaluate_masking_step, masking_required};
pub use session::MaskingExercise;
pub use types::{
    AnswerValue, Conduction, Ear, EarThresholds, MaskingScenario, PlateauStep, ScenarioDocument,
    Stage, StepEvaluation, Transducer,
};
