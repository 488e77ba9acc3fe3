use regex::Regex;
use serde::Serialize;

use crate::error::Diagnostic;
use crate::spec::field::{FieldType, ResolvedField, ValidatorType};
use crate::visibility::VisibilityRule;

/// Base classification of a field, decided once per field and carried
/// through every later constraint step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeClass {
    Numeric,
    Array,
    Boolean,
    FreeForm,
    Text,
}

impl TypeClass {
    pub fn of(kind: Option<FieldType>, input_type: Option<&str>) -> Self {
        match kind {
            Some(FieldType::Number | FieldType::Slider | FieldType::Range) => TypeClass::Numeric,
            _ if input_type == Some("number") => TypeClass::Numeric,
            Some(FieldType::Checkbox | FieldType::File) => TypeClass::Array,
            Some(FieldType::Boolean) => TypeClass::Boolean,
            Some(FieldType::Html) => TypeClass::FreeForm,
            _ => TypeClass::Text,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TypeClass::Numeric => "number",
            TypeClass::Array => "array",
            TypeClass::Boolean => "boolean",
            TypeClass::FreeForm => "any",
            TypeClass::Text => "string",
        }
    }
}

/// Structural constraint; a field's rules are stored in enforcement order.
#[derive(Debug, Clone)]
pub(crate) enum Rule {
    Min(f64),
    Max(f64),
    Required,
    MaxLength(usize),
    Email {
        message: String,
    },
    Pattern {
        regex: Regex,
        message: String,
    },
    Numeric {
        min: Option<f64>,
        max: Option<f64>,
        message: String,
    },
}

const DEFAULT_EMAIL_MESSAGE: &str = "Please enter a valid email address";
const DEFAULT_PATTERN_MESSAGE: &str = "Invalid format";
const DEFAULT_NUMERIC_MESSAGE: &str = "Please enter a valid number";

/// Compiled validation rules for a single field.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub name: String,
    pub kind: Option<FieldType>,
    pub class: TypeClass,
    pub required: bool,
    /// Empty values pass; set for every field that is not required and
    /// unconditionally visible.
    pub optional: bool,
    pub visibility: VisibilityRule,
    pub(crate) rules: Vec<Rule>,
}

impl FieldSchema {
    /// Builds the rule list for `field`. Malformed regex validators are
    /// skipped and reported through `diagnostics`.
    pub fn compile(field: &ResolvedField, diagnostics: &mut Vec<Diagnostic>) -> Self {
        let class = TypeClass::of(field.kind, field.input_type.as_deref());
        let unconditional = field.is_unconditionally_required();
        let mut rules = Vec::new();

        if class == TypeClass::Numeric {
            if let Some(min) = field.min.as_ref().and_then(|bound| bound.as_f64()) {
                rules.push(Rule::Min(min));
            }
            if let Some(max) = field.max.as_ref().and_then(|bound| bound.as_f64()) {
                rules.push(Rule::Max(max));
            }
        }

        // Must precede every format rule so an empty value reports "required".
        if unconditional && class != TypeClass::FreeForm {
            rules.push(Rule::Required);
        }

        if class == TypeClass::Text
            && let Some(max_length) = field.max_length.as_ref().and_then(|bound| bound.as_f64())
            && max_length >= 0.0
        {
            rules.push(Rule::MaxLength(max_length as usize));
        }

        if matches!(class, TypeClass::Text | TypeClass::Numeric) {
            push_validator_rules(field, &mut rules, diagnostics);
        }

        Self {
            name: field.name.clone(),
            kind: field.kind,
            class,
            required: field.required,
            optional: !unconditional,
            visibility: VisibilityRule::from_field(field),
            rules,
        }
    }

    /// True when the visibility pass must check this field for emptiness.
    pub fn needs_required_check(&self) -> bool {
        self.required && self.kind != Some(FieldType::Html)
    }
}

fn push_validator_rules(
    field: &ResolvedField,
    rules: &mut Vec<Rule>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let implied_email = !field.has_validator(ValidatorType::Email)
        && (field.input_type.as_deref() == Some("email")
            || field.name == "email"
            || field.kind == Some(FieldType::Email));
    if implied_email {
        rules.push(Rule::Email {
            message: DEFAULT_EMAIL_MESSAGE.to_string(),
        });
    }

    for validator in &field.validators {
        match validator.kind {
            ValidatorType::Email => rules.push(Rule::Email {
                message: validator
                    .text
                    .clone()
                    .unwrap_or_else(|| DEFAULT_EMAIL_MESSAGE.to_string()),
            }),
            ValidatorType::Regex => {
                let Some(pattern) = validator.regex.as_deref() else {
                    continue;
                };
                match Regex::new(pattern) {
                    Ok(regex) => rules.push(Rule::Pattern {
                        regex,
                        message: validator
                            .text
                            .clone()
                            .unwrap_or_else(|| DEFAULT_PATTERN_MESSAGE.to_string()),
                    }),
                    Err(error) => {
                        tracing::warn!(
                            field = %field.name,
                            pattern,
                            "skipping regex validator: {error}"
                        );
                        diagnostics.push(Diagnostic::InvalidPattern {
                            field: field.name.clone(),
                            pattern: pattern.to_string(),
                            message: error.to_string(),
                        });
                    }
                }
            }
            ValidatorType::Numeric => rules.push(Rule::Numeric {
                min: validator.min_value.as_ref().and_then(|bound| bound.as_f64()),
                max: validator.max_value.as_ref().and_then(|bound| bound.as_f64()),
                message: validator
                    .text
                    .clone()
                    .unwrap_or_else(|| DEFAULT_NUMERIC_MESSAGE.to_string()),
            }),
            ValidatorType::Text
            | ValidatorType::Expression
            | ValidatorType::Answercount
            | ValidatorType::Custom
            | ValidatorType::Other => {}
        }
    }
}

/// Whole-form (or per-step) validation schema keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    fields: Vec<FieldSchema>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field; a field with the same name is replaced in place.
    pub fn insert(&mut self, field: FieldSchema) {
        match self
            .fields
            .iter_mut()
            .find(|existing| existing.name == field.name)
        {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sub-schema containing only `names`, in the order given. Unknown names
    /// are ignored.
    pub fn pick<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> FormSchema {
        let mut picked = FormSchema::new();
        for name in names {
            if let Some(field) = self.field(name) {
                picked.insert(field.clone());
            }
        }
        picked
    }
}
