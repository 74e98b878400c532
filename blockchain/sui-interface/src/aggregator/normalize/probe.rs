//! Field probing over JSON records whose shape is not fixed.
//!
//! A probe is an ordered list of paths; each path walks nested objects by key.
//! Two selection rules exist, mirroring how the records are consumed:
//! [`first_truthy`] skips empty strings, zero, `false` and `null`, while
//! [`first_present`] only skips absent and `null` values.

use serde_json::Value;

/// A path of object keys, e.g. `&["fields", "reserve", "id"]`
pub type FieldPath<'a> = &'a [&'a str];

/// Walk `path` through nested objects; `None` when any step is missing or not an object
pub fn lookup<'v>(value: &'v Value, path: FieldPath<'_>) -> Option<&'v Value> {
    path.iter().try_fold(value, |current, key| current.as_object()?.get(*key))
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First value along `paths` that is truthy
pub fn first_truthy<'v>(value: &'v Value, paths: &[FieldPath<'_>]) -> Option<&'v Value> {
    paths.iter().filter_map(|path| lookup(value, path)).find(|v| is_truthy(v))
}

/// First value along `paths` that is present and not `null`
pub fn first_present<'v>(value: &'v Value, paths: &[FieldPath<'_>]) -> Option<&'v Value> {
    paths.iter().filter_map(|path| lookup(value, path)).find(|v| !v.is_null())
}

/// Numeric reading of a JSON value.
///
/// Numbers are taken as-is, strings are parsed after trimming (an empty string
/// reads as zero), booleans read as 0/1 and `null` as zero. Anything else is NaN.
pub fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

/// Decimal exponent from a JSON value; `None` unless it is a whole number in `0..=255`
pub fn coerce_decimals(value: &Value) -> Option<u8> {
    let number = coerce_number(value);
    if number.is_finite() && number.fract() == 0.0 && (0.0..=255.0).contains(&number) {
        Some(number as u8)
    } else {
        None
    }
}

/// String identifier from a JSON value.
///
/// Strings and numbers are used directly. Objects carrying an `id` member are
/// unwrapped, which turns a Move `UID` (`{"id": "0x…"}`) and nested
/// `{"id": {"id": "0x…"}}` into the inner string.
pub fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("id").and_then(identifier),
        _ => None,
    }
}

/// Display text from a JSON value.
///
/// A Move `TypeName` arrives either as `{"name": "…"}` or wrapped as
/// `{"type": "0x1::type_name::TypeName", "fields": {"name": "…"}}`; both read
/// as the name. Other non-string values fall back to their JSON text.
pub fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => {
            if let Some(name) = map.get("name").and_then(Value::as_str) {
                name.to_string()
            } else if let Some(fields) = map.get("fields") {
                text(fields)
            } else {
                value.to_string()
            }
        }
        other => other.to_string(),
    }
}
