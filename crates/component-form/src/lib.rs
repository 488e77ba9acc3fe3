use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;

use form_spec::{
    CompileError, CompileOptions, CompiledForm, FormConfig, compile, config_schema,
    resolve_visibility,
};

const DEFAULT_CONFIG: &str = include_str!("../../form-spec/tests/fixtures/loan_application.json");

#[derive(Debug, Error)]
enum ComponentError {
    #[error("failed to parse config: {0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("failed to parse data: {0}")]
    DataParse(#[source] serde_json::Error),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error("step {0} does not exist")]
    UnknownStep(usize),
    #[error("json encode error: {0}")]
    JsonEncode(#[source] serde_json::Error),
}

#[derive(Debug, Deserialize, Serialize, Default)]
struct ComponentConfig {
    #[serde(default)]
    form_config_json: Option<String>,
    #[serde(default)]
    reference_date: Option<NaiveDate>,
}

impl ComponentConfig {
    fn options(&self) -> CompileOptions {
        self.reference_date
            .map(CompileOptions::new)
            .unwrap_or_else(CompileOptions::today)
    }
}

fn load_config(config_json: &str) -> Result<ComponentConfig, ComponentError> {
    if config_json.trim().is_empty() {
        Ok(ComponentConfig::default())
    } else {
        serde_json::from_str(config_json).map_err(ComponentError::ConfigParse)
    }
}

fn load_form(config_json: &str) -> Result<CompiledForm, ComponentError> {
    let config = load_config(config_json)?;
    let form_json = config.form_config_json.as_deref().unwrap_or(DEFAULT_CONFIG);
    let form_config = FormConfig::from_json_str(form_json)?;
    Ok(compile(&form_config, &config.options())?)
}

fn parse_data(data_json: &str) -> Result<Value, ComponentError> {
    if data_json.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_str(data_json).map_err(ComponentError::DataParse)
}

fn respond(result: Result<Value, ComponentError>) -> String {
    match result {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|error| {
            json!({"error": format!("json encode: {}", error)}).to_string()
        }),
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, ComponentError> {
    serde_json::to_value(value).map_err(ComponentError::JsonEncode)
}

/// Compiled output: resolved fields, category groups, steps, defaults, and
/// diagnostics.
pub fn compile_form(config_json: &str) -> String {
    respond(load_form(config_json).and_then(|form| to_json(&form)))
}

/// Defaults for the whole form, or for one step when `step` is given.
pub fn get_defaults(config_json: &str, step: Option<usize>) -> String {
    respond(load_form(config_json).and_then(|form| match step {
        None => Ok(Value::Object(form.defaults)),
        Some(index) => form
            .step_defaults(index)
            .map(Value::Object)
            .ok_or(ComponentError::UnknownStep(index)),
    }))
}

pub fn validate_form(config_json: &str, data_json: &str) -> String {
    respond(load_form(config_json).and_then(|form| {
        let data = parse_data(data_json)?;
        to_json(&form.validate(&data))
    }))
}

pub fn validate_step(config_json: &str, step: usize, data_json: &str) -> String {
    respond(load_form(config_json).and_then(|form| {
        let data = parse_data(data_json)?;
        let result = form
            .validate_step(step, &data)
            .ok_or(ComponentError::UnknownStep(step))?;
        to_json(&result)
    }))
}

/// Visibility of every resolved field for the given data snapshot.
pub fn get_visibility(config_json: &str, data_json: &str) -> String {
    respond(load_form(config_json).and_then(|form| {
        let data = parse_data(data_json)?;
        to_json(&resolve_visibility(&form.resolved_fields, &data))
    }))
}

/// JSON Schema of the configuration document.
pub fn get_config_schema() -> String {
    respond(Ok(config_schema()))
}
