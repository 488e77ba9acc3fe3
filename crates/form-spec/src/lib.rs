#![allow(missing_docs)]

pub mod compile;
pub mod defaults;
pub mod error;
pub mod expr;
pub mod group;
pub mod resolve;
pub mod schema;
pub mod spec;
pub mod title;
pub mod validate;
pub mod visibility;

pub use compile::{CompileOptions, CompiledForm, Step, compile, step_defaults, step_schema};
pub use defaults::default_value;
pub use error::{CompileError, Diagnostic, ResolveError};
pub use expr::{Expr, ExprError, evaluate};
pub use group::{FieldGroup, group_by_category};
pub use resolve::{resolve_page, resolve_reference};
pub use schema::{FieldSchema, FormSchema, TypeClass};
pub use spec::{
    Category, FieldDefinition, FieldMap, FieldOverride, FieldReference, FieldType, FormConfig, Page,
    ResolvedField, ValidatorSpec, ValidatorType,
};
pub use title::apply_dynamic_title;
pub use validate::{REQUIRED_MESSAGE, ValidationError, ValidationResult, validate};
pub use visibility::{VisibilityMap, VisibilityRule, resolve_visibility};

/// JSON Schema describing the configuration document, for structural
/// validation performed outside the compiler.
pub fn config_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(FormConfig)).unwrap_or_default()
}
