//! JSON Schema document builders
//!
//! Small constructors for the schema fragments that property declarations
//! are built from. Every builder returns a plain `serde_json::Value` so the
//! documents can be composed, digested, and compiled uniformly.

use serde_json::{json, Map, Value};

use crate::error::{JsonError, Result};

/// Schema accepting any JSON value
pub fn any() -> Value {
    json!(true)
}

/// Schema accepting no value at all
pub fn nothing() -> Value {
    json!(false)
}

/// Schema accepting only `null`
pub fn null() -> Value {
    json!({"type": "null"})
}

/// Schema accepting booleans
pub fn boolean() -> Value {
    json!({"type": "boolean"})
}

/// Schema accepting integers
pub fn integer() -> Value {
    json!({"type": "integer"})
}

/// Schema accepting any JSON number
pub fn number() -> Value {
    json!({"type": "number"})
}

/// Schema accepting strings
pub fn string() -> Value {
    json!({"type": "string"})
}

/// Schema accepting strings with optional length bounds and a regex pattern
pub fn string_bounded(
    min_length: Option<u64>,
    max_length: Option<u64>,
    pattern: Option<&str>,
) -> Result<Value> {
    if let (Some(min), Some(max)) = (min_length, max_length) {
        if max < min {
            return Err(JsonError::InvalidSchema(format!(
                "maxLength {} is less than minLength {}",
                max, min
            )));
        }
    }

    let mut schema = Map::new();
    schema.insert("type".to_string(), json!("string"));
    if let Some(min) = min_length {
        schema.insert("minLength".to_string(), json!(min));
    }
    if let Some(max) = max_length {
        schema.insert("maxLength".to_string(), json!(max));
    }
    if let Some(pattern) = pattern {
        schema.insert("pattern".to_string(), json!(pattern));
    }

    Ok(Value::Object(schema))
}

/// Schema accepting numbers within an optional range
pub fn number_bounded(
    minimum: Option<f64>,
    maximum: Option<f64>,
    integer_only: bool,
) -> Result<Value> {
    if let (Some(min), Some(max)) = (minimum, maximum) {
        if max < min {
            return Err(JsonError::InvalidSchema(format!(
                "maximum {} is less than minimum {}",
                max, min
            )));
        }
    }

    let mut schema = Map::new();
    let type_name = if integer_only { "integer" } else { "number" };
    schema.insert("type".to_string(), json!(type_name));
    if let Some(min) = minimum {
        schema.insert("minimum".to_string(), json!(min));
    }
    if let Some(max) = maximum {
        schema.insert("maximum".to_string(), json!(max));
    }

    Ok(Value::Object(schema))
}

/// Schema accepting exactly one fixed value
pub fn constant(value: Value) -> Value {
    json!({ "const": value })
}

/// Drop duplicate values, keeping first-occurrence order
pub(crate) fn unique_values(values: impl IntoIterator<Item = Value>) -> Vec<Value> {
    let mut unique: Vec<Value> = Vec::new();
    for value in values {
        if !unique.contains(&value) {
            unique.push(value);
        }
    }
    unique
}

/// Schema accepting one of a fixed set of values.
///
/// Duplicates are dropped, keeping first-occurrence order.
pub fn enumeration(values: impl IntoIterator<Item = Value>) -> Value {
    json!({ "enum": unique_values(values) })
}

/// Schema accepting arrays whose elements all match `element`
pub fn array(element: Value) -> Value {
    json!({"type": "array", "items": element})
}

/// Schema accepting arrays with element-count bounds and an optional
/// uniqueness requirement.
///
/// `min_elements` below one and absent bounds are simply omitted from the
/// document; a maximum below the minimum is a schema error.
pub fn array_bounded(
    element: Value,
    min_elements: u64,
    max_elements: Option<u64>,
    unique_elements: bool,
) -> Result<Value> {
    if let Some(max) = max_elements {
        if max < min_elements {
            return Err(JsonError::InvalidSchema(format!(
                "maxItems {} is less than minItems {}",
                max, min_elements
            )));
        }
    }

    let mut schema = Map::new();
    schema.insert("type".to_string(), json!("array"));
    schema.insert("items".to_string(), element);
    if min_elements > 0 {
        schema.insert("minItems".to_string(), json!(min_elements));
    }
    if let Some(max) = max_elements {
        schema.insert("maxItems".to_string(), json!(max));
    }
    if unique_elements {
        schema.insert("uniqueItems".to_string(), json!(true));
    }

    Ok(Value::Object(schema))
}

/// Schema matched when exactly one of the sub-schemas matches
pub fn one_of(schemas: impl IntoIterator<Item = Value>) -> Result<Value> {
    combined("oneOf", schemas)
}

/// Schema matched when at least one of the sub-schemas matches
pub fn any_of(schemas: impl IntoIterator<Item = Value>) -> Result<Value> {
    combined("anyOf", schemas)
}

/// Schema matched when every sub-schema matches
pub fn all_of(schemas: impl IntoIterator<Item = Value>) -> Result<Value> {
    combined("allOf", schemas)
}

/// Common implementation for the oneOf/anyOf/allOf combinators.
///
/// Fewer than two sub-schemas is a schema error.
fn combined(keyword: &str, schemas: impl IntoIterator<Item = Value>) -> Result<Value> {
    let schemas: Vec<Value> = schemas.into_iter().collect();
    if schemas.len() < 2 {
        return Err(JsonError::InvalidSchema(format!(
            "can't use {} with fewer than 2 sub-schemas",
            keyword
        )));
    }
    Ok(json!({ keyword: schemas }))
}

/// Schema accepting an object with the given required and optional
/// properties.
///
/// `additional` controls undeclared keys: `None` leaves them unconstrained,
/// `Some(schema)` validates them against the schema (use [`nothing`] to
/// forbid them outright).
pub fn standard_object(
    required: Map<String, Value>,
    optional: Map<String, Value>,
    additional: Option<Value>,
) -> Result<Value> {
    for name in required.keys() {
        if optional.contains_key(name) {
            return Err(JsonError::InvalidSchema(format!(
                "property '{}' can't be both required and optional",
                name
            )));
        }
    }

    let required_names: Vec<&String> = required.keys().collect();
    let required_names = json!(required_names);

    let mut properties = required;
    properties.extend(optional);

    let mut schema = Map::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), Value::Object(properties));
    if let Some(names) = required_names.as_array() {
        if !names.is_empty() {
            schema.insert("required".to_string(), required_names);
        }
    }
    if let Some(additional) = additional {
        schema.insert("additionalProperties".to_string(), additional);
    }

    Ok(Value::Object(schema))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumeration_deduplicates() {
        let schema = enumeration([json!("ok"), json!("error"), json!("ok")]);
        assert_eq!(schema, json!({"enum": ["ok", "error"]}));
    }

    #[test]
    fn test_string_bounds_rejects_inverted_range() {
        assert!(string_bounded(Some(5), Some(2), None).is_err());
        let schema = string_bounded(Some(1), None, Some("^a")).unwrap();
        assert_eq!(schema, json!({"type": "string", "minLength": 1, "pattern": "^a"}));
    }

    #[test]
    fn test_array_bounds() {
        let schema = array_bounded(string(), 1, Some(3), true).unwrap();
        assert_eq!(
            schema,
            json!({
                "type": "array",
                "items": {"type": "string"},
                "minItems": 1,
                "maxItems": 3,
                "uniqueItems": true
            })
        );

        // Zero minimum and absent maximum leave the bounds out entirely.
        let loose = array_bounded(string(), 0, None, false).unwrap();
        assert_eq!(loose, json!({"type": "array", "items": {"type": "string"}}));

        assert!(array_bounded(string(), 5, Some(2), false).is_err());
    }

    #[test]
    fn test_combinators() {
        let either = one_of([string(), number()]).unwrap();
        assert_eq!(either, json!({"oneOf": [{"type": "string"}, {"type": "number"}]}));

        let any = any_of([string(), null()]).unwrap();
        assert_eq!(any, json!({"anyOf": [{"type": "string"}, {"type": "null"}]}));

        let both = all_of([integer(), number()]).unwrap();
        assert_eq!(both, json!({"allOf": [{"type": "integer"}, {"type": "number"}]}));
    }

    #[test]
    fn test_combinators_need_two_sub_schemas() {
        assert!(one_of([string()]).is_err());
        assert!(any_of([]).is_err());
        assert!(all_of([number()]).is_err());
    }

    #[test]
    fn test_standard_object_rejects_duplicate_names() {
        let mut required = Map::new();
        required.insert("x".to_string(), number());
        let mut optional = Map::new();
        optional.insert("x".to_string(), number());
        assert!(standard_object(required, optional, None).is_err());
    }

    #[test]
    fn test_standard_object_shape() {
        let mut required = Map::new();
        required.insert("x".to_string(), number());
        let schema = standard_object(required, Map::new(), Some(nothing())).unwrap();
        assert_eq!(schema["type"], json!("object"));
        assert_eq!(schema["required"], json!(["x"]));
        assert_eq!(schema["additionalProperties"], json!(false));
    }
}
