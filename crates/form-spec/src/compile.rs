use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::defaults::default_value;
use crate::error::{CompileError, Diagnostic};
use crate::group::{FieldGroup, group_by_category};
use crate::resolve::resolve_page_with_diagnostics;
use crate::schema::{FieldSchema, FormSchema};
use crate::spec::field::ResolvedField;
use crate::spec::form::{FormConfig, Page};
use crate::validate::ValidationResult;

/// Inputs to compilation that do not come from the document itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Date the dynamic titles are computed from.
    pub reference_date: NaiveDate,
}

impl CompileOptions {
    pub fn new(reference_date: NaiveDate) -> Self {
        Self { reference_date }
    }

    /// Options pinned to the local calendar date.
    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }
}

/// One wizard step, compiled from one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub index: usize,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<ResolvedField>,
    pub show_category_headings: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(rename = "showTOC", skip_serializing_if = "Option::is_none")]
    pub show_toc: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_progress_bar: Option<bool>,
}

impl Step {
    fn from_page(index: usize, page: &Page, fields: Vec<ResolvedField>) -> Self {
        Self {
            index,
            title: page.title.clone().unwrap_or_else(|| page.id.clone()),
            description: page.description.clone(),
            fields,
            show_category_headings: page.show_category_headings.unwrap_or(false),
            layout: page.layout.clone(),
            show_toc: page.show_toc,
            show_progress_bar: page.show_progress_bar,
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }
}

/// Everything produced from one configuration document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledForm {
    #[serde(skip)]
    pub schema: FormSchema,
    #[serde(rename = "defaultsByFieldName")]
    pub defaults: Map<String, Value>,
    pub resolved_fields: Vec<ResolvedField>,
    pub grouped_by_category: Vec<FieldGroup>,
    pub steps: Vec<Step>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl CompiledForm {
    /// Validates the whole form.
    pub fn validate(&self, data: &Value) -> ValidationResult {
        self.schema.validate(data)
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn step_schema(&self, index: usize) -> Option<FormSchema> {
        self.step(index).map(|step| step_schema(step, &self.schema))
    }

    pub fn step_defaults(&self, index: usize) -> Option<Map<String, Value>> {
        self.step(index).map(|step| step_defaults(step, &self.defaults))
    }

    /// Validates only the fields of step `index`; `None` for an unknown step.
    pub fn validate_step(&self, index: usize, data: &Value) -> Option<ValidationResult> {
        self.step_schema(index).map(|schema| schema.validate(data))
    }
}

/// Compiles `config` into a validation schema, defaults, and steps.
///
/// Fails only when the document has no pages. A field name repeated across
/// pages contributes the definition from its last page to the whole-form
/// schema and defaults, while each step keeps its own copy.
pub fn compile(
    config: &FormConfig,
    options: &CompileOptions,
) -> Result<CompiledForm, CompileError> {
    if config.pages.is_empty() {
        return Err(CompileError::NoPages);
    }

    let mut diagnostics = Vec::new();
    let pages: Vec<Vec<ResolvedField>> = config
        .pages
        .iter()
        .map(|page| {
            resolve_page_with_diagnostics(
                page,
                &config.fields,
                options.reference_date,
                &mut diagnostics,
            )
        })
        .collect();

    let resolved_fields: Vec<ResolvedField> = pages.iter().flatten().cloned().collect();

    let mut schema = FormSchema::new();
    let mut defaults = Map::new();
    for field in &resolved_fields {
        let field_schema = FieldSchema::compile(field, &mut diagnostics);
        defaults.insert(field.name.clone(), default_value(field, field_schema.class));
        schema.insert(field_schema);
    }

    let grouped_by_category = group_by_category(&resolved_fields, &config.categories);

    let steps = config
        .pages
        .iter()
        .zip(pages)
        .enumerate()
        .map(|(index, (page, fields))| Step::from_page(index, page, fields))
        .collect();

    Ok(CompiledForm {
        schema,
        defaults,
        resolved_fields,
        grouped_by_category,
        steps,
        diagnostics,
    })
}

/// Sub-schema covering only `step`'s fields; the visibility pass runs over
/// just those fields.
pub fn step_schema(step: &Step, schema: &FormSchema) -> FormSchema {
    schema.pick(step.field_names())
}

/// Defaults for `step`'s fields only.
pub fn step_defaults(step: &Step, defaults: &Map<String, Value>) -> Map<String, Value> {
    step.field_names()
        .filter_map(|name| {
            defaults
                .get(name)
                .map(|value| (name.to_string(), value.clone()))
        })
        .collect()
}
