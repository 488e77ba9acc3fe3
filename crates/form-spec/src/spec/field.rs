use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Supported field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Email,
    File,
    Dropdown,
    Checkbox,
    Boolean,
    Comment,
    Radiogroup,
    Range,
    Html,
    Slider,
    /// Unrecognized type name; classified as text.
    #[serde(other)]
    Other,
}

/// Validator kinds accepted in a field's `validators` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorType {
    Regex,
    Email,
    Numeric,
    Text,
    Expression,
    Answercount,
    Custom,
    #[serde(other)]
    Other,
}

/// Numeric bound that may be written as a number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum NumericBound {
    Number(f64),
    Text(String),
}

impl NumericBound {
    /// Returns the bound as a finite number, if it parses as one.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            NumericBound::Number(value) => *value,
            NumericBound::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

/// Declared validator attached to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorSpec {
    #[serde(rename = "type")]
    pub kind: ValidatorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<NumericBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<NumericBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Field definition as written in the configuration document.
///
/// Every property is optional so the same shape serves master definitions,
/// inline definitions, and the override bag of a `{ref: ...}` reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<NumericBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<NumericBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<NumericBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validators: Option<Vec<ValidatorSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_if: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_with_new_line: Option<bool>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl FieldDefinition {
    /// Overlays `overrides` on top of `self`; every property set in the
    /// override wins, including keys of the extra bag.
    pub fn merged_with(mut self, overrides: FieldDefinition) -> FieldDefinition {
        let FieldDefinition {
            name,
            kind,
            input_type,
            title,
            description,
            category,
            min,
            max,
            max_length,
            choices,
            validators,
            required,
            is_required,
            visible,
            visible_if,
            default_value,
            read_only,
            start_with_new_line,
            extra,
        } = overrides;

        self.name = name.or(self.name);
        self.kind = kind.or(self.kind);
        self.input_type = input_type.or(self.input_type);
        self.title = title.or(self.title);
        self.description = description.or(self.description);
        self.category = category.or(self.category);
        self.min = min.or(self.min);
        self.max = max.or(self.max);
        self.max_length = max_length.or(self.max_length);
        self.choices = choices.or(self.choices);
        self.validators = validators.or(self.validators);
        self.required = required.or(self.required);
        self.is_required = is_required.or(self.is_required);
        self.visible = visible.or(self.visible);
        self.visible_if = visible_if.or(self.visible_if);
        self.default_value = default_value.or(self.default_value);
        self.read_only = read_only.or(self.read_only);
        self.start_with_new_line = start_with_new_line.or(self.start_with_new_line);
        self.extra.extend(extra);
        self
    }
}

/// A field definition after reference resolution and normalization.
///
/// `required` and `is_required` always hold the same value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedField {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<NumericBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<NumericBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<NumericBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<ValidatorSpec>,
    pub required: bool,
    pub is_required: bool,
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_if: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_with_new_line: Option<bool>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ResolvedField {
    /// Builds a resolved field from a merged definition, applying the
    /// required-by-default policy.
    pub fn from_definition(name: String, definition: FieldDefinition) -> Self {
        let required = is_required(definition.required, definition.is_required);
        Self {
            name,
            kind: definition.kind,
            input_type: definition.input_type,
            title: definition.title,
            description: definition.description,
            category: definition.category,
            min: definition.min,
            max: definition.max,
            max_length: definition.max_length,
            choices: definition.choices,
            validators: definition.validators.unwrap_or_default(),
            required,
            is_required: required,
            visible: definition.visible.unwrap_or(true),
            visible_if: definition.visible_if,
            default_value: definition.default_value,
            read_only: definition.read_only,
            start_with_new_line: definition.start_with_new_line,
            extra: definition.extra,
        }
    }

    /// Re-applies the required-by-default policy to both flags.
    pub fn normalize(&mut self) {
        let required = is_required(Some(self.required), Some(self.is_required));
        self.required = required;
        self.is_required = required;
    }

    /// Display label: the title, or the name when no title is set.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// True when the field must be filled regardless of the submitted data.
    pub fn is_unconditionally_required(&self) -> bool {
        self.required
            && self.visible
            && self
                .visible_if
                .as_deref()
                .is_none_or(|expression| expression.trim().is_empty())
    }

    pub fn has_validator(&self, kind: ValidatorType) -> bool {
        self.validators.iter().any(|validator| validator.kind == kind)
    }
}

fn is_required(required: Option<bool>, is_required: Option<bool>) -> bool {
    is_required != Some(false) && required != Some(false)
}
