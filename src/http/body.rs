//! Request body decoding.

use super::error::ApiError;
use serde_json::{Map, Value};

/// Decodes a request body into a JSON object.
///
/// An empty body decodes to an empty object.
///
/// # Errors
///
/// Returns [`ApiError::MalformedJson`] when the body is not JSON and
/// [`ApiError::NotAnObject`] when it is JSON of another kind.
pub fn json_object(body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    if body.is_empty() {
        return Ok(Map::new());
    }
    let value: Value =
        serde_json::from_slice(body).map_err(|err| ApiError::MalformedJson(err.to_string()))?;
    match value {
        Value::Object(object) => Ok(object),
        other => Err(ApiError::NotAnObject(kind_name(&other))),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(number) if number.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
