//! JSON object instances
//!
//! A [`JsonObject`] holds the current values of one instance of a class
//! described by a [`PropertyRegistry`]. Declared properties are validated
//! on every write; names not declared on the class become additional
//! values, visible when introspecting the instance but not the class.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{JsonError, Result};
use crate::registry::PropertyRegistry;
use crate::validator;

/// One instance of a registry-described class
#[derive(Debug, Clone)]
pub struct JsonObject {
    registry: Arc<PropertyRegistry>,
    values: Map<String, Value>,
}

impl JsonObject {
    /// Construct an instance from initial values bound by name.
    ///
    /// `initial` must be a JSON object. Every required property must be
    /// supplied; supplied values are validated against their property, and
    /// undeclared names are checked against the registry's additional-
    /// properties policy. A constant property may only be supplied with its
    /// exact constant value.
    pub fn new(registry: Arc<PropertyRegistry>, initial: Value) -> Result<Self> {
        let initial = match initial {
            Value::Object(map) => map,
            other => {
                return Err(JsonError::validation(
                    registry.class_name(),
                    format!("initial values must be a JSON object, got {}", other),
                ))
            }
        };

        for prop in registry.iter() {
            match initial.get(prop.name()) {
                Some(value) => prop.validate_value(value)?,
                // Constants carry their value by definition and never need
                // to be supplied.
                None if !prop.is_optional() && prop.constant_value().is_err() => {
                    return Err(JsonError::validation(
                        prop.name(),
                        "value for required property not set",
                    ))
                }
                None => {}
            }
        }

        for (name, value) in &initial {
            if !registry.has_property(name) {
                registry.validate_additional(name, value)?;
            }
        }

        Ok(Self {
            registry,
            values: initial,
        })
    }

    /// Construct an instance with no initial values.
    ///
    /// Fails if the registry declares any required property.
    pub fn empty(registry: Arc<PropertyRegistry>) -> Result<Self> {
        Self::new(registry, Value::Object(Map::new()))
    }

    /// The registry describing this instance's class
    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    /// The current value of a property.
    ///
    /// Constant properties always report their constant value regardless of
    /// instance state; unset optional properties report their default when
    /// one exists.
    pub fn get(&self, name: &str) -> Option<&Value> {
        if let Some(prop) = self.registry.get(name) {
            if let Ok(constant) = prop.constant_value() {
                return Some(constant);
            }
            return self.values.get(name).or_else(|| prop.default());
        }
        self.values.get(name)
    }

    /// Assign a value to a property.
    ///
    /// Constant properties cannot be assigned; declared properties validate
    /// the value, undeclared names go through the additional-properties
    /// policy.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        match self.registry.get(name) {
            Some(prop) if prop.constant_value().is_ok() => {
                return Err(JsonError::ImmutableProperty {
                    name: name.to_string(),
                })
            }
            Some(prop) => prop.validate_value(&value)?,
            None => self.registry.validate_additional(name, &value)?,
        }

        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Remove a property's stored value.
    ///
    /// Required properties can't be unset; an unset optional falls back to
    /// its default. Removing an unknown name is an error when the registry
    /// doesn't allow additional properties.
    pub fn unset(&mut self, name: &str) -> Result<()> {
        match self.registry.get(name) {
            Some(prop) if prop.constant_value().is_ok() => {
                return Err(JsonError::ImmutableProperty {
                    name: name.to_string(),
                })
            }
            Some(prop) if !prop.is_optional() => {
                return Err(JsonError::validation(
                    name,
                    "required property can't be unset",
                ))
            }
            Some(_) => {}
            None if !self.registry.allows_additional() => {
                return Err(JsonError::validation(
                    name,
                    format!(
                        "'{}' declares no property '{}' and doesn't allow additional properties",
                        self.registry.class_name(),
                        name
                    ),
                ))
            }
            None => {}
        }

        self.values.remove(name);
        Ok(())
    }

    /// Whether this instance has the named property: true for every
    /// declared property, and for additional values currently held.
    pub fn has_property(&self, name: &str) -> bool {
        self.registry.has_property(name) || self.values.contains_key(name)
    }

    /// Whether the named value is held without a matching declaration
    pub fn is_additional(&self, name: &str) -> bool {
        !self.registry.has_property(name) && self.values.contains_key(name)
    }

    /// Property names of this instance: declared names in declaration
    /// order, then additional names in insertion order. Restartable.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        let registry = &self.registry;
        self.registry.names().chain(
            self.values
                .keys()
                .map(|name| name.as_str())
                .filter(move |name| !registry.has_property(name)),
        )
    }

    /// Iterate over (name, value) pairs in serialization order: declared
    /// properties carrying a value (stored, default, or constant) first,
    /// then additional values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        let registry = &self.registry;
        let declared = self
            .registry
            .iter()
            .filter_map(move |prop| self.get(prop.name()).map(|value| (prop.name(), value)));
        let additional = self
            .values
            .iter()
            .filter(move |(name, _)| !registry.has_property(name))
            .map(|(name, value)| (name.as_str(), value));
        declared.chain(additional)
    }

    /// Re-validate this instance's serialized form against the registry's
    /// composed object schema
    pub fn validate(&self) -> Result<()> {
        let value = self.to_value();
        validator::validate_keyed(
            self.registry.schema_digest(),
            self.registry.object_schema(),
            &value,
        )
    }
}
