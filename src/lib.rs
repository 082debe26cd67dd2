pub mod api;
pub mod config;
pub mod error;
pub mod grid;
pub mod masking;
pub mod quantizer;

pub use api::{evaluate_answer_text, scenario_from_json, scenario_from_yaml};
pub use config::{InterauralDefaults, MaskingRules, TrainerConfig};
pub use error::*;
pub use grid::{nearest_index, AudiogramGrid, STANDARD_FREQUENCIES};
pub use masking::{
    evaluate_masking_step, AnswerValue, Conduction, Ear, EarThresholds, MaskingExercise,
    MaskingScenario, PlateauStep, Stage, StepEvaluation, Transducer,
};
pub use quantizer::{project_to_plot, quantize, record_point, PlotPosition, TestPoint, ThresholdPoint};
