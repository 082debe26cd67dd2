//! Per-exercise stage tracking
//!
//! [`MaskingExercise`] owns one scenario and walks it through the five
//! stages, moving forward only on a correct answer. The evaluation itself is
//! delegated to the stateless engine.

use super::engine::evaluate_masking_step;
use super::types::{AnswerValue, MaskingScenario, Stage, StepEvaluation};
use crate::config::MaskingRules;
use crate::error::AudiologyError;

#[derive(Debug, Clone)]
pub struct MaskingExercise {
    scenario: MaskingScenario,
    rules: MaskingRules,
    stage: Stage,
    complete: bool,
    attempts: usize,
}

impl MaskingExercise {
    pub fn new(scenario: MaskingScenario, rules: MaskingRules) -> Self {
        Self {
            scenario,
            rules,
            stage: Stage::NeedsMasking,
            complete: false,
            attempts: 0,
        }
    }

    pub fn scenario(&self) -> &MaskingScenario {
        &self.scenario
    }

    /// Stage the next answer is checked against.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Answers submitted so far, right or wrong.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Check `answer` at the current stage and advance on success.
    ///
    /// Errors leave the exercise untouched. Submitting after completion is an
    /// `InvalidAnswer`.
    pub fn submit(&mut self, answer: &AnswerValue) -> Result<StepEvaluation, AudiologyError> {
        if self.complete {
            return Err(AudiologyError::InvalidAnswer {
                stage: self.stage,
                message: "exercise is already complete".to_string(),
            });
        }

        let evaluation = evaluate_masking_step(&self.rules, &self.scenario, self.stage, answer)?;
        self.attempts += 1;

        if evaluation.correct {
            match evaluation.next_stage {
                Some(next) => self.stage = next,
                None => {
                    self.complete = true;
                    tracing::info!(attempts = self.attempts, "masking exercise complete");
                }
            }
        }

        Ok(evaluation)
    }
}
