//! # Host API
//!
//! Entry points for hosts that deal in text: scenario documents (YAML or
//! JSON) and answers typed or clicked by the learner.
//!
//! ## Typical Usage
//!
//! ```rust
//! use audiology::{evaluate_answer_text, scenario_from_yaml, Stage, TrainerConfig};
//!
//! let config = TrainerConfig::default();
//! let scenario = scenario_from_yaml(
//!     r#"
//! test-ear: right
//! conduction: air
//! test-frequency: 1000
//! right-ear:
//!   air: {1000: 70}
//! left-ear:
//!   air: {1000: 30}
//! "#,
//!     &config.masking,
//! )?;
//!
//! let result = evaluate_answer_text(&config.masking, &scenario, "initial-level", "45")?;
//! assert!(result.correct);
//! assert_eq!(result.next_stage, Some(Stage::MaskedThreshold));
//! # Ok::<(), audiology::AudiologyError>(())
//! ```

use crate::config::MaskingRules;
use crate::error::AudiologyError;
use crate::masking::{evaluate_masking_step, AnswerValue, MaskingScenario, ScenarioDocument, Stage, StepEvaluation};

/// Parse a scenario from YAML, filling in the default interaural attenuation
/// for the transducer when the document leaves it out.
pub fn scenario_from_yaml(
    source: &str,
    rules: &MaskingRules,
) -> Result<MaskingScenario, AudiologyError> {
    let document: ScenarioDocument = serde_yaml::from_str(source)
        .map_err(|e| AudiologyError::InvalidConfig(format!("scenario: {}", e)))?;
    Ok(document.into_scenario(rules))
}

/// Same as [`scenario_from_yaml`] for JSON documents.
pub fn scenario_from_json(
    source: &str,
    rules: &MaskingRules,
) -> Result<MaskingScenario, AudiologyError> {
    let document: ScenarioDocument = serde_json::from_str(source)
        .map_err(|e| AudiologyError::InvalidConfig(format!("scenario: {}", e)))?;
    Ok(document.into_scenario(rules))
}

/// Evaluate an answer given as text at a stage given by name.
///
/// # Parameters
/// - `stage` - kebab-case stage name, e.g. `"plateau-step-size"`
/// - `answer` - `yes`/`no`, a whole number of dB HL, or a step label like `10dB-twice`
///
/// # Errors
/// `UnknownStage` for a bad stage name, `InvalidAnswer` when the text doesn't
/// decode for that stage, and anything [`evaluate_masking_step`] returns.
pub fn evaluate_answer_text(
    rules: &MaskingRules,
    scenario: &MaskingScenario,
    stage: &str,
    answer: &str,
) -> Result<StepEvaluation, AudiologyError> {
    let stage: Stage = stage.parse()?;
    let answer = AnswerValue::parse(stage, answer)?;
    evaluate_masking_step(rules, scenario, stage, &answer)
}
