use serde_json::{Number, Value};

use crate::schema::TypeClass;
use crate::spec::field::ResolvedField;

/// Initial form value for `field`, shaped by its type class.
pub fn default_value(field: &ResolvedField, class: TypeClass) -> Value {
    let declared = field.default_value.as_ref().filter(|value| !value.is_null());
    match class {
        TypeClass::Numeric => declared.and_then(coerce_number).unwrap_or_else(empty_text),
        TypeClass::Array => match declared {
            Some(Value::Array(items)) => Value::Array(items.clone()),
            Some(other) => Value::Array(vec![other.clone()]),
            None => Value::Array(Vec::new()),
        },
        TypeClass::Boolean => Value::Bool(declared.and_then(coerce_bool).unwrap_or(false)),
        TypeClass::FreeForm => empty_text(),
        TypeClass::Text => match declared {
            Some(Value::Array(items)) => items.first().cloned().unwrap_or_else(empty_text),
            Some(other) => other.clone(),
            None => empty_text(),
        },
    }
}

fn coerce_number(value: &Value) -> Option<Value> {
    match value {
        Value::Number(_) => Some(value.clone()),
        Value::String(text) => {
            let trimmed = text.trim();
            if let Ok(integer) = trimmed.parse::<i64>() {
                return Some(Value::Number(integer.into()));
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
        }
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn empty_text() -> Value {
    Value::String(String::new())
}
