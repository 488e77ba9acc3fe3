use serde::Serialize;

use crate::spec::field::ResolvedField;
use crate::spec::form::Category;

const FALLBACK_CATEGORY_NAME: &str = "Other";

/// Contiguous run of fields sharing one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldGroup {
    pub category: String,
    pub category_name: String,
    pub fields: Vec<ResolvedField>,
}

/// Splits `fields` into runs of adjacent fields with the same category.
///
/// Fields of one category separated by another category end up in separate
/// groups; input order is kept.
pub fn group_by_category(fields: &[ResolvedField], categories: &[Category]) -> Vec<FieldGroup> {
    let mut groups: Vec<FieldGroup> = Vec::new();

    for field in fields {
        let category = field.category.as_deref().unwrap_or_default();
        match groups.last_mut() {
            Some(group) if group.category == category => group.fields.push(field.clone()),
            _ => groups.push(FieldGroup {
                category: category.to_string(),
                category_name: category_name(category, categories),
                fields: vec![field.clone()],
            }),
        }
    }

    groups
}

/// Display name for a category id, `"Other"` when unknown.
pub fn category_name(id: &str, categories: &[Category]) -> String {
    if id.is_empty() {
        return FALLBACK_CATEGORY_NAME.to_string();
    }
    categories
        .iter()
        .find(|category| category.id == id)
        .map(|category| category.name.clone())
        .unwrap_or_else(|| FALLBACK_CATEGORY_NAME.to_string())
}
