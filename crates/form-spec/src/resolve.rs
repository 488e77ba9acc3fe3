use chrono::NaiveDate;

use crate::error::{Diagnostic, ResolveError};
use crate::spec::field::{FieldDefinition, ResolvedField};
use crate::spec::form::{FieldMap, FieldOverride, FieldReference, Page};
use crate::title::apply_dynamic_title;

/// Expands one page-level reference into a normalized field.
pub fn resolve_reference(
    reference: &FieldReference,
    fields: &FieldMap,
) -> Result<ResolvedField, ResolveError> {
    match reference {
        FieldReference::Name(name) => {
            let stored = lookup(fields, name)?;
            Ok(ResolvedField::from_definition(name.clone(), stored.clone()))
        }
        FieldReference::Override(FieldOverride {
            reference,
            overrides,
        }) => {
            let merged = lookup(fields, reference)?
                .clone()
                .merged_with(overrides.clone());
            let name = merged.name.clone().unwrap_or_else(|| reference.clone());
            Ok(ResolvedField::from_definition(name, merged))
        }
        FieldReference::Inline { definition } => {
            let name = definition
                .name
                .clone()
                .filter(|name| !name.is_empty())
                .ok_or(ResolveError::MissingInlineName)?;
            Ok(ResolvedField::from_definition(name, definition.clone()))
        }
        FieldReference::Invalid(value) => {
            Err(ResolveError::MalformedReference(value.to_string()))
        }
    }
}

fn lookup<'a>(fields: &'a FieldMap, name: &str) -> Result<&'a FieldDefinition, ResolveError> {
    fields
        .get(name)
        .ok_or_else(|| ResolveError::UnknownField(name.to_string()))
}

/// Resolves every reference on `page`, dropping the ones that cannot be
/// resolved, and applies dynamic titles. Reference order is preserved.
pub fn resolve_page(
    page: &Page,
    fields: &FieldMap,
    reference_date: NaiveDate,
) -> Vec<ResolvedField> {
    resolve_page_with_diagnostics(page, fields, reference_date, &mut Vec::new())
}

pub(crate) fn resolve_page_with_diagnostics(
    page: &Page,
    fields: &FieldMap,
    reference_date: NaiveDate,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<ResolvedField> {
    page.fields
        .iter()
        .filter_map(|reference| match resolve_reference(reference, fields) {
            Ok(field) => Some(apply_dynamic_title(field, reference_date)),
            Err(error) => {
                tracing::warn!(page = %page.id, "dropping field reference: {error}");
                diagnostics.push(Diagnostic::UnresolvedReference {
                    page: page.id.clone(),
                    reference: reference.target_name().map(str::to_string),
                    message: error.to_string(),
                });
                None
            }
        })
        .collect()
}
