//! Typed property descriptors
//!
//! A [`Property`] describes one key of a JSON object: its name, the kind of
//! values it admits, whether it may be omitted at construction time, and an
//! optional default. Properties are cheap to clone and may be shared across
//! registries, always under their own name.

use std::sync::{Arc, OnceLock};

use serde_json::Value;

use crate::digest::SchemaDigest;
use crate::error::{JsonError, Result};
use crate::schema;
use crate::validator;

/// The kind of values a property admits
#[derive(Debug, Clone)]
pub enum PropertyKind {
    /// Any value matching the property's schema
    Plain,
    /// One of a fixed set of admissible values
    Enum(Arc<Vec<Value>>),
    /// A single fixed value, immutable once the object exists
    Constant(Value),
}

impl PropertyKind {
    /// Short name of the kind, for error messages
    pub fn name(&self) -> &'static str {
        match self {
            PropertyKind::Plain => "plain",
            PropertyKind::Enum(_) => "enum",
            PropertyKind::Constant(_) => "constant",
        }
    }
}

/// A named, typed descriptor for one JSON object key
#[derive(Debug, Clone)]
pub struct Property {
    name: String,
    kind: PropertyKind,
    schema: Value,
    optional: bool,
    default: Option<Value>,
    digest: OnceLock<SchemaDigest>,
}

impl Property {
    /// Create a plain property validated by a raw schema document
    pub fn new(name: impl Into<String>, schema: Value) -> Result<Self> {
        Ok(Self {
            name: checked_name(name)?,
            kind: PropertyKind::Plain,
            schema,
            optional: false,
            default: None,
            digest: OnceLock::new(),
        })
    }

    /// Property accepting any JSON value
    pub fn any(name: impl Into<String>) -> Result<Self> {
        Self::new(name, schema::any())
    }

    /// Property accepting strings
    pub fn string(name: impl Into<String>) -> Result<Self> {
        Self::new(name, schema::string())
    }

    /// Property accepting any JSON number
    pub fn number(name: impl Into<String>) -> Result<Self> {
        Self::new(name, schema::number())
    }

    /// Property accepting integers
    pub fn integer(name: impl Into<String>) -> Result<Self> {
        Self::new(name, schema::integer())
    }

    /// Property accepting booleans
    pub fn boolean(name: impl Into<String>) -> Result<Self> {
        Self::new(name, schema::boolean())
    }

    /// Property accepting arrays whose elements match `element`
    pub fn array(name: impl Into<String>, element: Value) -> Result<Self> {
        Self::new(name, schema::array(element))
    }

    /// Property accepting one of a fixed set of values.
    ///
    /// Duplicates are dropped, keeping first-occurrence order. At least one
    /// admissible value is required.
    pub fn enumeration(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<Self> {
        let name = checked_name(name)?;

        let unique = schema::unique_values(values);
        if unique.is_empty() {
            return Err(JsonError::InvalidProperty {
                name,
                reason: "enum property needs at least one admissible value".to_string(),
            });
        }

        let schema = schema::enumeration(unique.iter().cloned());
        Ok(Self {
            name,
            kind: PropertyKind::Enum(Arc::new(unique)),
            schema,
            optional: false,
            default: None,
            digest: OnceLock::new(),
        })
    }

    /// Property whose value is fixed to `value`
    pub fn constant(name: impl Into<String>, value: Value) -> Result<Self> {
        let name = checked_name(name)?;
        let schema = schema::constant(value.clone());
        Ok(Self {
            name,
            kind: PropertyKind::Constant(value),
            schema,
            optional: false,
            default: None,
            digest: OnceLock::new(),
        })
    }

    /// Mark the property optional: it may be omitted at construction time
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Give the property a default value, marking it optional.
    ///
    /// The default must itself satisfy the property's constraints.
    pub fn with_default(mut self, default: Value) -> Result<Self> {
        self.validate_value(&default)?;
        self.optional = true;
        self.default = Some(default);
        Ok(self)
    }

    /// The property's name (the JSON object key it governs)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind of values this property admits
    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    /// Whether omission at construction time is permitted
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether the property carries a default value
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// The default value, if one was declared
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The schema document describing admissible values
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// The admissible values of an enum property, as a shared read-only
    /// view. Mutating a clone of the returned set has no effect on
    /// subsequent validation.
    pub fn allowed_values(&self) -> Result<Arc<Vec<Value>>> {
        match &self.kind {
            PropertyKind::Enum(values) => Ok(Arc::clone(values)),
            other => Err(JsonError::KindMismatch {
                name: self.name.clone(),
                expected: "enum",
                actual: other.name(),
            }),
        }
    }

    /// The fixed value of a constant property
    pub fn constant_value(&self) -> Result<&Value> {
        match &self.kind {
            PropertyKind::Constant(value) => Ok(value),
            other => Err(JsonError::KindMismatch {
                name: self.name.clone(),
                expected: "constant",
                actual: other.name(),
            }),
        }
    }

    /// Digest of the property's schema, memoized for the property's
    /// lifetime
    pub fn digest(&self) -> &SchemaDigest {
        self.digest.get_or_init(|| SchemaDigest::from_json(&self.schema))
    }

    /// Check one candidate value against this property's constraints.
    ///
    /// Fails fast with a [`JsonError::Validation`] naming this property.
    pub fn validate_value(&self, value: &Value) -> Result<()> {
        match &self.kind {
            PropertyKind::Constant(constant) => {
                if value != constant {
                    return Err(JsonError::validation(
                        &self.name,
                        format!("value {} does not match constant {}", value, constant),
                    ));
                }
                Ok(())
            }
            PropertyKind::Enum(values) => {
                if !values.contains(value) {
                    return Err(JsonError::validation(
                        &self.name,
                        format!("value {} is not an admissible enum value", value),
                    ));
                }
                Ok(())
            }
            PropertyKind::Plain => {
                validator::validate_keyed(self.digest(), &self.schema, value).map_err(|e| {
                    match e {
                        JsonError::Validation { field, reason } => JsonError::Validation {
                            field: if field.is_empty() {
                                self.name.clone()
                            } else {
                                format!("{}/{}", self.name, field)
                            },
                            reason,
                        },
                        other => other,
                    }
                })
            }
        }
    }
}

/// Property names must be non-empty and must not start with an underscore
fn checked_name(name: impl Into<String>) -> Result<String> {
    let name = name.into();
    if name.is_empty() {
        return Err(JsonError::InvalidProperty {
            name,
            reason: "property names can't be empty".to_string(),
        });
    }
    if name.starts_with('_') {
        return Err(JsonError::InvalidProperty {
            name,
            reason: "property names can't start with an underscore".to_string(),
        });
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_name_rules() {
        assert!(Property::string("").is_err());
        assert!(Property::string("_hidden").is_err());
        assert!(Property::string("visible").is_ok());
    }

    #[test]
    fn test_plain_validation() {
        let prop = Property::number("x").unwrap();
        assert!(prop.validate_value(&json!(5)).is_ok());
        let err = prop.validate_value(&json!("five")).unwrap_err();
        match err {
            JsonError::Validation { field, .. } => assert_eq!(field, "x"),
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_enum_membership() {
        let prop = Property::enumeration("state", [json!("ok"), json!("error")]).unwrap();
        assert!(prop.validate_value(&json!("ok")).is_ok());
        assert!(prop.validate_value(&json!("pending")).is_err());
    }

    #[test]
    fn test_enum_values_are_read_only() {
        let prop = Property::enumeration("state", [json!("ok")]).unwrap();
        let values = prop.allowed_values().unwrap();

        // Mutating a private copy of the set doesn't widen validation.
        let mut copy = values.as_ref().clone();
        copy.push(json!("pending"));
        assert!(prop.validate_value(&json!("pending")).is_err());
    }

    #[test]
    fn test_allowed_values_kind_mismatch() {
        let prop = Property::string("name").unwrap();
        assert!(matches!(
            prop.allowed_values(),
            Err(JsonError::KindMismatch { expected: "enum", .. })
        ));
    }

    #[test]
    fn test_empty_enum_rejected() {
        assert!(Property::enumeration("state", []).is_err());
    }

    #[test]
    fn test_enum_schema_agrees_with_allowed_values() {
        let prop =
            Property::enumeration("state", [json!("ok"), json!("error"), json!("ok")]).unwrap();
        let values = prop.allowed_values().unwrap();

        // One dedup implementation: the schema's enum list is exactly the
        // admissible set the validator consults.
        assert_eq!(values.as_ref(), &vec![json!("ok"), json!("error")]);
        assert_eq!(prop.schema()["enum"], json!(["ok", "error"]));
    }

    #[test]
    fn test_constant_value_accessor() {
        let prop = Property::constant("version", json!(2)).unwrap();
        assert_eq!(prop.constant_value().unwrap(), &json!(2));
        assert!(prop.validate_value(&json!(2)).is_ok());
        assert!(prop.validate_value(&json!(3)).is_err());
    }

    #[test]
    fn test_default_implies_optional_and_is_validated() {
        let prop = Property::number("y").unwrap().with_default(json!(0)).unwrap();
        assert!(prop.is_optional());
        assert_eq!(prop.default(), Some(&json!(0)));

        assert!(Property::number("y").unwrap().with_default(json!("zero")).is_err());
    }
}
