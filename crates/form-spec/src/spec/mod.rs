pub mod field;
pub mod form;

pub use field::{
    FieldDefinition, FieldType, NumericBound, ResolvedField, ValidatorSpec, ValidatorType,
};
pub use form::{Category, FieldMap, FieldOverride, FieldReference, FormConfig, Page};
