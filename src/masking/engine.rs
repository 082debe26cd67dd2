//! Masking step evaluation
//!
//! Checks one learner answer against the clinical rules for the stage it was
//! given at. Every call is independent: the result depends only on the
//! rules, the scenario, the stage and the answer.

use super::types::{AnswerValue, Conduction, MaskingScenario, PlateauStep, Stage, StepEvaluation};
use crate::config::MaskingRules;
use crate::error::AudiologyError;

/// Whether the test ear's response could have come from the non-test ear.
///
/// Air conduction: the signal reaching the non-test cochlea is the test-ear
/// threshold minus interaural attenuation; masking is needed when that is at
/// or above the non-test ear's air threshold (`test - IA <= non_test`).
///
/// Bone conduction: interaural attenuation is taken as 0 dB, so masking is
/// always needed and no thresholds are read.
pub fn masking_required(scenario: &MaskingScenario) -> Result<bool, AudiologyError> {
    match scenario.conduction {
        Conduction::Bone => Ok(true),
        Conduction::Air => {
            let test = scenario.threshold(scenario.test_ear, Conduction::Air)?;
            let non_test = scenario.threshold(scenario.non_test_ear(), Conduction::Air)?;
            let attenuation = i32::try_from(scenario.interaural_attenuation).unwrap_or(i32::MAX);
            Ok(test.saturating_sub(attenuation) <= non_test)
        }
    }
}

/// Initial effective masking level: non-test ear air threshold plus the safety margin.
pub fn correct_initial_level(
    rules: &MaskingRules,
    scenario: &MaskingScenario,
) -> Result<i32, AudiologyError> {
    let non_test = scenario.threshold(scenario.non_test_ear(), Conduction::Air)?;
    Ok(non_test.saturating_add(rules.initial_margin_db))
}

/// Plateau step convention for the conduction type.
pub fn correct_plateau_step(conduction: Conduction) -> PlateauStep {
    match conduction {
        Conduction::Air => PlateauStep::TenDbTwice,
        Conduction::Bone => PlateauStep::FiveDbTwice,
    }
}

/// Evaluate one answer for `stage`.
///
/// # Errors
/// - [`AudiologyError::IncompleteScenario`] when the stage needs a threshold
///   the scenario doesn't have (`NeedsMasking` for air, `InitialLevel`).
/// - [`AudiologyError::InvalidAnswer`] when the answer variant doesn't match
///   the stage (e.g. a step choice for `InitialLevel`).
pub fn evaluate_masking_step(
    rules: &MaskingRules,
    scenario: &MaskingScenario,
    stage: Stage,
    answer: &AnswerValue,
) -> Result<StepEvaluation, AudiologyError> {
    let (correct, feedback) = match (stage, answer) {
        (Stage::NeedsMasking, AnswerValue::Bool(given)) => {
            let required = masking_required(scenario)?;
            (*given == required, needs_masking_feedback(scenario, required, *given))
        }
        (Stage::InitialLevel, AnswerValue::Level(given)) => {
            let expected = correct_initial_level(rules, scenario)?;
            let correct = (i64::from(*given) - i64::from(expected)).abs()
                <= i64::from(rules.initial_tolerance_db);
            let feedback = if correct {
                format!("Correct. Start masking at about {} dB HL.", expected)
            } else {
                format!(
                    "Not quite. Start from the non-test ear's air-conduction threshold and add a {} dB safety margin.",
                    rules.initial_margin_db
                )
            };
            (correct, feedback)
        }
        (Stage::MaskedThreshold | Stage::FinalThreshold, AnswerValue::Level(given)) => {
            let correct = rules.accepts_response(*given);
            let feedback = if correct {
                format!("Recorded {} dB HL.", given)
            } else {
                format!(
                    "A threshold must lie between {} and {} dB HL.",
                    rules.response_floor_db, rules.response_ceiling_db
                )
            };
            (correct, feedback)
        }
        (Stage::PlateauStepSize, AnswerValue::Step(given)) => {
            let expected = correct_plateau_step(scenario.conduction);
            let correct = *given == expected;
            let feedback = if correct {
                format!("Correct. Use {} steps to find the plateau.", expected)
            } else {
                match scenario.conduction {
                    Conduction::Air => "For air conduction, raise the masker in 10 dB steps and confirm the response twice.".to_string(),
                    Conduction::Bone => "For bone conduction, raise the masker in 5 dB steps and confirm the response twice.".to_string(),
                }
            };
            (correct, feedback)
        }
        (stage, other) => {
            return Err(AudiologyError::InvalidAnswer {
                stage,
                message: format!("expected {}, got {}", expected_shape(stage), other.describe()),
            });
        }
    };

    tracing::debug!(%stage, correct, "evaluated masking step");

    let next_stage = if correct { stage.next() } else { None };
    Ok(StepEvaluation {
        stage,
        correct,
        feedback,
        next_stage,
        complete: correct && stage.is_last(),
    })
}

fn expected_shape(stage: Stage) -> &'static str {
    match stage {
        Stage::NeedsMasking => "a yes/no answer",
        Stage::InitialLevel | Stage::MaskedThreshold | Stage::FinalThreshold => "a level in dB HL",
        Stage::PlateauStepSize => "a step-size choice",
    }
}

fn needs_masking_feedback(scenario: &MaskingScenario, required: bool, given: bool) -> String {
    match (scenario.conduction, given == required) {
        (Conduction::Bone, true) => {
            "Correct. Bone conduction crosses the skull with almost no attenuation, so always mask.".to_string()
        }
        (Conduction::Bone, false) => {
            "Treat interaural attenuation for bone conduction as 0 dB: the non-test cochlea always hears it.".to_string()
        }
        (Conduction::Air, true) => {
            if required {
                "Correct. The signal crossing over could reach the non-test ear's threshold.".to_string()
            } else {
                "Correct. Interaural attenuation keeps the crossed-over signal below the non-test ear's threshold.".to_string()
            }
        }
        (Conduction::Air, false) => format!(
            "Subtract the interaural attenuation ({} dB) from the test-ear threshold and compare it with the non-test ear's air-conduction threshold.",
            scenario.interaural_attenuation
        ),
    }
}
