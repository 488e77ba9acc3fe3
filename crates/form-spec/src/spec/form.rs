use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::CompileError;
use crate::spec::field::FieldDefinition;

/// Flat category used to group fields under headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// Page-local reference to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FieldReference {
    /// Name of an entry in the master field mapping.
    Name(String),
    /// Field that exists only on this page.
    Inline { definition: FieldDefinition },
    /// Master field with some of its properties shadowed.
    Override(FieldOverride),
    /// Anything else; dropped during resolution instead of failing the load.
    Invalid(serde_json::Value),
}

/// `{ref: name, ...properties}`: the listed properties shadow the master
/// definition of `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldOverride {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(flatten)]
    pub overrides: FieldDefinition,
}

impl FieldReference {
    /// Name this reference points at, when it can be known up front.
    pub fn target_name(&self) -> Option<&str> {
        match self {
            FieldReference::Name(name) => Some(name),
            FieldReference::Inline { definition } => definition.name.as_deref(),
            FieldReference::Override(field) => Some(&field.reference),
            FieldReference::Invalid(_) => None,
        }
    }
}

/// One page of the form; page order is step order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "showTOC", default, skip_serializing_if = "Option::is_none")]
    pub show_toc: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_progress_bar: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_category_headings: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldReference>,
}

/// Master field mapping keyed by field name.
pub type FieldMap = BTreeMap<String, FieldDefinition>;

/// Top-level form configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub fields: FieldMap,
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl FormConfig {
    pub fn from_json_str(json: &str) -> Result<Self, CompileError> {
        serde_json::from_str(json).map_err(CompileError::Parse)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, CompileError> {
        serde_json::from_value(value).map_err(CompileError::Parse)
    }
}
