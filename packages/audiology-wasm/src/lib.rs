use audiology::{AnswerValue, AudiologyError, Stage, TrainerConfig};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HostError {
    kind: &'static str,
    message: String,
}

fn error_to_host_error(e: AudiologyError) -> HostError {
    let kind = match &e {
        AudiologyError::IncompleteScenario { .. } => "incomplete-scenario",
        AudiologyError::InvalidAnswer { .. } => "invalid-answer",
        AudiologyError::UnknownStage(_) => "unknown-stage",
        AudiologyError::InvalidConfig(_) => "invalid-config",
    };
    HostError {
        kind,
        message: e.to_string(),
    }
}

fn to_js_error(e: AudiologyError) -> JsValue {
    let json = serde_json::to_string(&error_to_host_error(e))
        .unwrap_or_else(|_| r#"{"kind":"internal","message":"error serialization failed"}"#.to_string());
    JsValue::from_str(&json)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn load_config(config_yaml: Option<String>) -> Result<TrainerConfig, JsValue> {
    match config_yaml {
        Some(source) => TrainerConfig::from_yaml(&source).map_err(to_js_error),
        None => Ok(TrainerConfig::default()),
    }
}

/// Snap a normalized plot position to `{"frequency":..,"level":..}`
#[wasm_bindgen]
pub fn quantize(x: f64, y: f64, config_yaml: Option<String>) -> Result<String, JsValue> {
    let config = load_config(config_yaml)?;
    to_json(&audiology::quantize(&config.grid, x, y))
}

/// Normalized `{"x":..,"y":..}` for drawing a marker
#[wasm_bindgen]
pub fn project_to_plot(frequency: f64, level: f64, config_yaml: Option<String>) -> Result<String, JsValue> {
    let config = load_config(config_yaml)?;
    to_json(&audiology::project_to_plot(&config.grid, frequency, level))
}

/// Evaluate one masking answer.
///
/// `scenario_json` uses the same kebab-case keys as scenario YAML files;
/// `answer_json` is `true`/`false`, a number, or a step label string.
#[wasm_bindgen]
pub fn evaluate_masking_step(
    scenario_json: &str,
    stage: &str,
    answer_json: &str,
    config_yaml: Option<String>,
) -> Result<String, JsValue> {
    let config = load_config(config_yaml)?;
    let scenario = audiology::scenario_from_json(scenario_json, &config.masking).map_err(to_js_error)?;
    let stage: Stage = stage.parse().map_err(to_js_error)?;
    let answer: AnswerValue = serde_json::from_str(answer_json).map_err(|e| {
        to_js_error(AudiologyError::InvalidAnswer {
            stage,
            message: e.to_string(),
        })
    })?;
    let result = audiology::evaluate_masking_step(&config.masking, &scenario, stage, &answer)
        .map_err(to_js_error)?;
    to_json(&result)
}

/// Evaluate an answer typed as text (e.g. "45", "yes", "10dB-twice")
#[wasm_bindgen]
pub fn evaluate_answer_text(
    scenario_json: &str,
    stage: &str,
    answer: &str,
    config_yaml: Option<String>,
) -> Result<String, JsValue> {
    let config = load_config(config_yaml)?;
    let scenario = audiology::scenario_from_json(scenario_json, &config.masking).map_err(to_js_error)?;
    let result = audiology::evaluate_answer_text(&config.masking, &scenario, stage, answer)
        .map_err(to_js_error)?;
    to_json(&result)
}
