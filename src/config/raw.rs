//! Readers for untyped mapping values. Each reader records a field error
//! and returns `None` instead of failing, so a whole mapping can be checked
//! in one pass.

use serde_json::Value;

use super::validation::{ErrorCollector, FieldErrorKind};

/// Name of the JSON/YAML type of `value`, for error messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

/// Read an integer and narrow it to `T`. Values that are integers but do not
/// fit `T` are reported as out of range with `range_message`.
pub fn integer<T>(
    value: &Value,
    field: &str,
    range_message: &str,
    errors: &mut ErrorCollector,
) -> Option<T>
where
    T: TryFrom<i64>,
{
    let number = match value {
        Value::Number(n) if n.is_i64() => n.as_i64(),
        Value::Number(n) if n.is_u64() => {
            // larger than i64::MAX, so larger than any field allows
            errors.push(field, FieldErrorKind::OutOfRange, range_message);
            return None;
        }
        other => {
            errors.push(
                field,
                FieldErrorKind::WrongType,
                format!("must be an integer, got {}", type_name(other)),
            );
            return None;
        }
    }?;

    match T::try_from(number) {
        Ok(v) => Some(v),
        Err(_) => {
            errors.push(field, FieldErrorKind::OutOfRange, range_message);
            None
        }
    }
}

/// Read a string value
pub fn string<'a>(value: &'a Value, field: &str, errors: &mut ErrorCollector) -> Option<&'a str> {
    match value.as_str() {
        Some(s) => Some(s),
        None => {
            errors.push(
                field,
                FieldErrorKind::WrongType,
                format!("must be a string, got {}", type_name(value)),
            );
            None
        }
    }
}

/// Read a list value
pub fn list<'a>(value: &'a Value, field: &str, errors: &mut ErrorCollector) -> Option<&'a [Value]> {
    match value.as_array() {
        Some(items) => Some(items.as_slice()),
        None => {
            errors.push(
                field,
                FieldErrorKind::WrongType,
                format!("must be a list, got {}", type_name(value)),
            );
            None
        }
    }
}
