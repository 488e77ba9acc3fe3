use serde_json::Value;

use crate::expr::evaluate;
use crate::spec::field::ResolvedField;

pub type VisibilityMap = std::collections::BTreeMap<String, bool>;

/// Static visibility flag plus the optional data-dependent gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityRule {
    pub visible: bool,
    pub visible_if: Option<String>,
}

impl VisibilityRule {
    pub fn from_field(field: &ResolvedField) -> Self {
        Self {
            visible: field.visible,
            visible_if: field.visible_if.clone(),
        }
    }

    /// Evaluated against each data snapshot; nothing is cached.
    pub fn is_visible(&self, data: &Value) -> bool {
        self.visible
            && self
                .visible_if
                .as_deref()
                .is_none_or(|expression| evaluate(expression, data))
    }
}

/// Visibility of every field for one data snapshot. A name repeated across
/// pages takes the visibility of its last occurrence.
pub fn resolve_visibility(fields: &[ResolvedField], data: &Value) -> VisibilityMap {
    fields
        .iter()
        .map(|field| {
            (
                field.name.clone(),
                VisibilityRule::from_field(field).is_visible(data),
            )
        })
        .collect()
}
