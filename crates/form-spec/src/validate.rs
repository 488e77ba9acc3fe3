use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::{FieldSchema, FormSchema, Rule, TypeClass};

pub const REQUIRED_MESSAGE: &str = "This field is required";

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Single field failure, addressed by field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// First failure reported for `path`, if any.
    pub fn error_for(&self, path: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|error| error.path == path)
    }
}

/// Validates `data` against `schema`.
///
/// Each field's own rules run first; then every required, visible field is
/// checked for emptiness, evaluating `visibleIf` gates against `data`. At most
/// one failure is reported per field.
pub fn validate(schema: &FormSchema, data: &Value) -> ValidationResult {
    let empty = Map::new();
    let values = data.as_object().unwrap_or(&empty);

    let mut errors: Vec<ValidationError> = schema
        .fields()
        .iter()
        .filter_map(|field| field.check(values.get(&field.name)))
        .collect();

    for field in schema.fields() {
        if !field.needs_required_check() || !field.visibility.is_visible(data) {
            continue;
        }
        let already_failed = errors.iter().any(|error| error.path == field.name);
        if !already_failed && is_empty_value(values.get(&field.name)) {
            errors.push(failure(field, REQUIRED_MESSAGE, "required"));
        }
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
    }
}

impl FormSchema {
    pub fn validate(&self, data: &Value) -> ValidationResult {
        validate(self, data)
    }
}

/// Undefined, null, empty string, and empty sequence count as empty.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

impl FieldSchema {
    /// Runs this field's structural rules against `value`, returning the
    /// first failure.
    pub fn check(&self, value: Option<&Value>) -> Option<ValidationError> {
        if self.optional && self.accepts_as_blank(value) {
            return None;
        }

        let value = match value {
            None | Some(Value::Null) if self.class == TypeClass::FreeForm => return None,
            None | Some(Value::Null) => {
                return Some(failure(self, REQUIRED_MESSAGE, "required"));
            }
            Some(value) => value,
        };

        let Some(typed) = TypedValue::from_value(self.class, value) else {
            let message = format!("Expected {}", self.class.label());
            return Some(failure(self, &message, "type_mismatch"));
        };

        self.rules
            .iter()
            .find_map(|rule| self.enforce(rule, &typed))
    }

    fn accepts_as_blank(&self, value: Option<&Value>) -> bool {
        is_empty_value(value)
            || (self.class == TypeClass::Boolean && value == Some(&Value::Bool(false)))
    }

    fn enforce(&self, rule: &Rule, value: &TypedValue) -> Option<ValidationError> {
        match rule {
            Rule::Min(min) => match value {
                TypedValue::Number(Some(number)) if number < min => Some(failure(
                    self,
                    &format!("Value must be at least {}", min),
                    "min",
                )),
                _ => None,
            },
            Rule::Max(max) => match value {
                TypedValue::Number(Some(number)) if number > max => Some(failure(
                    self,
                    &format!("Value must be at most {}", max),
                    "max",
                )),
                _ => None,
            },
            Rule::Required => value
                .is_blank()
                .then(|| failure(self, REQUIRED_MESSAGE, "required")),
            Rule::MaxLength(limit) => match value.as_text() {
                Some(text) if text.chars().count() > *limit => Some(failure(
                    self,
                    &format!("Must be at most {} characters", limit),
                    "max_length",
                )),
                _ => None,
            },
            Rule::Email { message } => match value.as_text() {
                Some(text) if !text.is_empty() && !is_email(&text) => {
                    Some(failure(self, message, "invalid_email"))
                }
                _ => None,
            },
            Rule::Pattern { regex, message } => match value.as_text() {
                Some(text) if !text.is_empty() && !regex.is_match(&text) => {
                    Some(failure(self, message, "pattern_mismatch"))
                }
                _ => None,
            },
            Rule::Numeric { min, max, message } => {
                let Some(text) = value.as_text().filter(|text| !text.is_empty()) else {
                    return None;
                };
                match text.trim().parse::<f64>() {
                    Ok(number) if number.is_finite() => {
                        if let Some(min) = min
                            && number < *min
                        {
                            return Some(failure(self, message, "min"));
                        }
                        if let Some(max) = max
                            && number > *max
                        {
                            return Some(failure(self, message, "max"));
                        }
                        None
                    }
                    _ => Some(failure(self, message, "not_numeric")),
                }
            }
        }
    }
}

/// Value already checked against the field's type class.
enum TypedValue {
    /// `None` is the empty-string sentinel of an unanswered numeric field.
    Number(Option<f64>),
    Text(String),
    Array(usize),
    Bool,
    Any,
}

impl TypedValue {
    fn from_value(class: TypeClass, value: &Value) -> Option<Self> {
        match class {
            TypeClass::Numeric => match value {
                Value::Number(number) => number
                    .as_f64()
                    .map(|number| TypedValue::Number(Some(number))),
                Value::String(text) if text.trim().is_empty() => Some(TypedValue::Number(None)),
                Value::String(text) => text
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|number| number.is_finite())
                    .map(|number| TypedValue::Number(Some(number))),
                _ => None,
            },
            TypeClass::Text => match value {
                Value::String(text) => Some(TypedValue::Text(text.clone())),
                Value::Number(number) => Some(TypedValue::Text(number.to_string())),
                Value::Bool(flag) => Some(TypedValue::Text(flag.to_string())),
                _ => None,
            },
            TypeClass::Array => value.as_array().map(|items| TypedValue::Array(items.len())),
            TypeClass::Boolean => value.is_boolean().then_some(TypedValue::Bool),
            TypeClass::FreeForm => Some(TypedValue::Any),
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            TypedValue::Number(number) => number.is_none(),
            TypedValue::Text(text) => text.is_empty(),
            TypedValue::Array(len) => *len == 0,
            TypedValue::Bool | TypedValue::Any => false,
        }
    }

    /// Textual form used by length and format rules.
    fn as_text(&self) -> Option<String> {
        match self {
            TypedValue::Text(text) => Some(text.clone()),
            TypedValue::Number(Some(number)) => Some(number.to_string()),
            TypedValue::Number(None) => Some(String::new()),
            _ => None,
        }
    }
}

fn is_email(text: &str) -> bool {
    EMAIL.as_ref().is_some_and(|regex| regex.is_match(text))
}

fn failure(field: &FieldSchema, message: &str, code: &str) -> ValidationError {
    ValidationError {
        path: field.name.clone(),
        message: message.into(),
        code: code.into(),
    }
}
