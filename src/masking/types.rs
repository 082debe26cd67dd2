//! Masking data type definitions
//!
//! Scenario inputs (ears, thresholds, transducer) and the per-stage answer
//! and result types used by the masking engine.

use crate::config::MaskingRules;
use crate::error::AudiologyError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ear {
    Left,
    Right,
}

impl Ear {
    /// The non-test ear when `self` is the test ear.
    pub fn opposite(self) -> Ear {
        match self {
            Ear::Left => Ear::Right,
            Ear::Right => Ear::Left,
        }
    }
}

impl fmt::Display for Ear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ear::Left => write!(f, "left"),
            Ear::Right => write!(f, "right"),
        }
    }
}

/// Signal pathway under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Conduction {
    Air,
    Bone,
}

impl fmt::Display for Conduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conduction::Air => write!(f, "air"),
            Conduction::Bone => write!(f, "bone"),
        }
    }
}

/// Earphone type used to present the test signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transducer {
    SupraAural,
    Insert,
}

impl Transducer {
    /// Conservative interaural attenuation for this transducer, in dB.
    pub fn default_interaural_attenuation(self, rules: &MaskingRules) -> u32 {
        match self {
            Transducer::SupraAural => rules.interaural_attenuation.supra_aural,
            Transducer::Insert => rules.interaural_attenuation.insert,
        }
    }
}

/// Measured thresholds for one ear, keyed by frequency in Hz.
///
/// Entries are optional: an exercise only fills in the frequencies it uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarThresholds {
    pub air: BTreeMap<u32, i32>,
    pub bone: BTreeMap<u32, i32>,
}

impl EarThresholds {
    pub fn with_air(mut self, frequency: u32, level: i32) -> Self {
        self.air.insert(frequency, level);
        self
    }

    pub fn with_bone(mut self, frequency: u32, level: i32) -> Self {
        self.bone.insert(frequency, level);
        self
    }

    pub fn get(&self, conduction: Conduction, frequency: u32) -> Option<i32> {
        let table = match conduction {
            Conduction::Air => &self.air,
            Conduction::Bone => &self.bone,
        };
        table.get(&frequency).copied()
    }
}

/// One masking exercise. Built once by the host and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskingScenario {
    pub test_ear: Ear,
    pub conduction: Conduction,
    pub test_frequency: u32,
    pub transducer: Transducer,
    pub interaural_attenuation: u32,
    pub right_ear: EarThresholds,
    pub left_ear: EarThresholds,
}

/// Scenario as written in a YAML/JSON document.
///
/// `interaural-attenuation` may be left out, in which case the transducer's
/// default from [`MaskingRules`] is used.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScenarioDocument {
    pub test_ear: Ear,
    pub conduction: Conduction,
    pub test_frequency: u32,
    #[serde(default = "default_transducer")]
    pub transducer: Transducer,
    #[serde(default)]
    pub interaural_attenuation: Option<u32>,
    #[serde(default)]
    pub right_ear: EarThresholds,
    #[serde(default)]
    pub left_ear: EarThresholds,
}

fn default_transducer() -> Transducer {
    Transducer::SupraAural
}

impl ScenarioDocument {
    pub fn into_scenario(self, rules: &MaskingRules) -> MaskingScenario {
        let interaural_attenuation = self
            .interaural_attenuation
            .unwrap_or_else(|| self.transducer.default_interaural_attenuation(rules));
        MaskingScenario {
            test_ear: self.test_ear,
            conduction: self.conduction,
            test_frequency: self.test_frequency,
            transducer: self.transducer,
            interaural_attenuation,
            right_ear: self.right_ear,
            left_ear: self.left_ear,
        }
    }
}

impl MaskingScenario {
    /// Scenario with the transducer's default interaural attenuation.
    pub fn new(
        test_ear: Ear,
        conduction: Conduction,
        test_frequency: u32,
        transducer: Transducer,
        rules: &MaskingRules,
    ) -> Self {
        Self {
            test_ear,
            conduction,
            test_frequency,
            transducer,
            interaural_attenuation: transducer.default_interaural_attenuation(rules),
            right_ear: EarThresholds::default(),
            left_ear: EarThresholds::default(),
        }
    }

    pub fn ear(&self, ear: Ear) -> &EarThresholds {
        match ear {
            Ear::Left => &self.left_ear,
            Ear::Right => &self.right_ear,
        }
    }

    pub fn non_test_ear(&self) -> Ear {
        self.test_ear.opposite()
    }

    /// Threshold at the test frequency, or `IncompleteScenario` if absent.
    pub fn threshold(&self, ear: Ear, conduction: Conduction) -> Result<i32, AudiologyError> {
        self.ear(ear)
            .get(conduction, self.test_frequency)
            .ok_or_else(|| {
                tracing::warn!(%ear, %conduction, frequency = self.test_frequency, "scenario is missing a threshold");
                AudiologyError::IncompleteScenario {
                    ear,
                    conduction,
                    frequency: self.test_frequency,
                }
            })
    }
}

/// The five ordered stages of a plateau masking exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    NeedsMasking,
    InitialLevel,
    MaskedThreshold,
    PlateauStepSize,
    FinalThreshold,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::NeedsMasking,
        Stage::InitialLevel,
        Stage::MaskedThreshold,
        Stage::PlateauStepSize,
        Stage::FinalThreshold,
    ];

    /// Following stage, `None` after `FinalThreshold`.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::NeedsMasking => Some(Stage::InitialLevel),
            Stage::InitialLevel => Some(Stage::MaskedThreshold),
            Stage::MaskedThreshold => Some(Stage::PlateauStepSize),
            Stage::PlateauStepSize => Some(Stage::FinalThreshold),
            Stage::FinalThreshold => None,
        }
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::NeedsMasking => "needs-masking",
            Stage::InitialLevel => "initial-level",
            Stage::MaskedThreshold => "masked-threshold",
            Stage::PlateauStepSize => "plateau-step-size",
            Stage::FinalThreshold => "final-threshold",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = AudiologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Stage::ALL
            .iter()
            .copied()
            .find(|stage| stage.as_str() == wanted)
            .ok_or_else(|| AudiologyError::UnknownStage(wanted.to_string()))
    }
}

/// Plateau-search step choices offered to the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlateauStep {
    #[serde(rename = "5dB-once")]
    FiveDbOnce,
    #[serde(rename = "5dB-twice")]
    FiveDbTwice,
    #[serde(rename = "10dB-once")]
    TenDbOnce,
    #[serde(rename = "10dB-twice")]
    TenDbTwice,
}

impl PlateauStep {
    pub const ALL: [PlateauStep; 4] = [
        PlateauStep::FiveDbOnce,
        PlateauStep::FiveDbTwice,
        PlateauStep::TenDbOnce,
        PlateauStep::TenDbTwice,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PlateauStep::FiveDbOnce => "5dB-once",
            PlateauStep::FiveDbTwice => "5dB-twice",
            PlateauStep::TenDbOnce => "10dB-once",
            PlateauStep::TenDbTwice => "10dB-twice",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim();
        PlateauStep::ALL
            .iter()
            .copied()
            .find(|step| step.label().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for PlateauStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A learner's answer. Which variant is valid depends on the stage.
///
/// Untagged so JSON hosts can send `true`, `45` or `"10dB-twice"` directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Level(i32),
    Step(PlateauStep),
}

impl AnswerValue {
    /// Decode host text into the answer shape `stage` expects.
    pub fn parse(stage: Stage, text: &str) -> Result<Self, AudiologyError> {
        let text = text.trim();
        match stage {
            Stage::NeedsMasking => match text.to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" => Ok(AnswerValue::Bool(true)),
                "false" | "no" | "n" => Ok(AnswerValue::Bool(false)),
                _ => Err(AudiologyError::InvalidAnswer {
                    stage,
                    message: format!("expected yes or no, got '{}'", text),
                }),
            },
            Stage::InitialLevel | Stage::MaskedThreshold | Stage::FinalThreshold => {
                let digits = text
                    .strip_suffix("dB HL")
                    .or_else(|| text.strip_suffix("dB"))
                    .unwrap_or(text)
                    .trim();
                digits
                    .parse::<i32>()
                    .map(AnswerValue::Level)
                    .map_err(|_| AudiologyError::InvalidAnswer {
                        stage,
                        message: format!("expected a whole number of dB HL, got '{}'", text),
                    })
            }
            Stage::PlateauStepSize => PlateauStep::from_label(text)
                .map(AnswerValue::Step)
                .ok_or_else(|| AudiologyError::InvalidAnswer {
                    stage,
                    message: format!(
                        "unknown step size '{}', expected one of: 5dB-once, 5dB-twice, 10dB-once, 10dB-twice",
                        text
                    ),
                }),
        }
    }

    pub(crate) fn describe(&self) -> &'static str {
        match self {
            AnswerValue::Bool(_) => "a yes/no answer",
            AnswerValue::Level(_) => "a level in dB HL",
            AnswerValue::Step(_) => "a step-size choice",
        }
    }
}

/// Result of checking one answer.
///
/// - `correct`: whether the answer is accepted
/// - `feedback`: a hint when wrong, a confirmation when right (never empty)
/// - `next_stage`: where the exercise goes after a correct answer
/// - `complete`: set only for a correct `FinalThreshold` answer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepEvaluation {
    pub stage: Stage,
    pub correct: bool,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_stage: Option<Stage>,
    pub complete: bool,
}
