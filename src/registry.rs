//! Property registries
//!
//! A [`PropertyRegistry`] is the merged, ordered table of properties
//! declared for one logical class. Registries are assembled once through
//! [`RegistryBuilder`] (base registries first, subclass declarations after)
//! and are read-only from then on.

use std::sync::OnceLock;

use serde_json::{Map, Value};

use crate::digest::SchemaDigest;
use crate::error::{JsonError, Result};
use crate::property::Property;
use crate::schema;

/// Policy for instance values whose name is not declared as a property
#[derive(Debug, Clone)]
pub enum AdditionalProperties {
    /// Any JSON value is accepted under any undeclared name (the default)
    Allow,
    /// Undeclared names are rejected
    Deny,
    /// Undeclared values must match the given schema
    Schema(Value),
}

/// Immutable, ordered mapping from property name to [`Property`] for one
/// class
#[derive(Debug)]
pub struct PropertyRegistry {
    class_name: String,
    properties: Vec<Property>,
    additional: AdditionalProperties,
    object_schema: OnceLock<Value>,
    schema_digest: OnceLock<SchemaDigest>,
}

impl PropertyRegistry {
    /// Start building a registry for the named class
    pub fn builder(class_name: impl Into<String>) -> RegistryBuilder {
        RegistryBuilder {
            class_name: class_name.into(),
            properties: Vec::new(),
            additional: AdditionalProperties::Allow,
        }
    }

    /// The name of the class this registry describes
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Number of declared properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the registry declares no properties
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Declared property names, in declaration order (ancestors before
    /// subclass additions). The iterator is restartable: each call starts
    /// a fresh, independent pass.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name())
    }

    /// Whether a property with the given name is declared
    pub fn has_property(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Look up a declared property by name
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Iterate over declared properties in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    /// Declared properties that must be supplied at construction time
    pub fn required(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| !p.is_optional())
    }

    /// Declared properties that may be omitted at construction time
    pub fn optional(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| p.is_optional())
    }

    /// The additional-properties policy
    pub fn additional(&self) -> &AdditionalProperties {
        &self.additional
    }

    /// Whether undeclared names are accepted at all
    pub fn allows_additional(&self) -> bool {
        !matches!(self.additional, AdditionalProperties::Deny)
    }

    /// Check a value supplied under an undeclared name against the
    /// additional-properties policy
    pub fn validate_additional(&self, name: &str, value: &Value) -> Result<()> {
        match &self.additional {
            AdditionalProperties::Allow => Ok(()),
            AdditionalProperties::Deny => Err(JsonError::validation(
                name,
                format!(
                    "'{}' declares no property '{}' and doesn't allow additional properties",
                    self.class_name, name
                ),
            )),
            AdditionalProperties::Schema(schema) => {
                crate::validator::validate(schema, value).map_err(|e| match e {
                    JsonError::Validation { reason, .. } => JsonError::validation(name, reason),
                    other => other,
                })
            }
        }
    }

    /// The composed object schema over all declared properties.
    ///
    /// Built lazily and cached for the registry's lifetime, so repeated
    /// whole-instance validation shares one compiled validator.
    pub fn object_schema(&self) -> &Value {
        self.object_schema.get_or_init(|| {
            let mut required = Map::new();
            let mut optional = Map::new();
            for prop in &self.properties {
                let target = if prop.is_optional() { &mut optional } else { &mut required };
                target.insert(prop.name().to_string(), prop.schema().clone());
            }

            let additional = match &self.additional {
                AdditionalProperties::Allow => None,
                AdditionalProperties::Deny => Some(schema::nothing()),
                AdditionalProperties::Schema(schema) => Some(schema.clone()),
            };

            // Names are unique within the registry, so composition can't
            // hit the duplicate-name check.
            schema::standard_object(required, optional, additional)
                .unwrap_or_else(|_| schema::nothing())
        })
    }

    /// Digest of the composed object schema, memoized for the registry's
    /// lifetime
    pub fn schema_digest(&self) -> &SchemaDigest {
        self.schema_digest
            .get_or_init(|| SchemaDigest::from_json(self.object_schema()))
    }
}

/// Builder merging ancestor registries and direct declarations into one
/// immutable [`PropertyRegistry`]
#[derive(Debug)]
pub struct RegistryBuilder {
    class_name: String,
    properties: Vec<Property>,
    additional: AdditionalProperties,
}

impl RegistryBuilder {
    /// Inherit every property of an ancestor registry.
    ///
    /// Call once per ancestor, most distant first; inherited names can be
    /// overridden by later declarations of the same kind.
    pub fn extend(mut self, parent: &PropertyRegistry) -> Result<Self> {
        for prop in parent.iter() {
            self = self.property(prop.clone())?;
        }
        Ok(self)
    }

    /// Declare a property.
    ///
    /// Redeclaring an inherited name with the same kind overrides it in
    /// place; redeclaring with a different kind is a schema conflict,
    /// surfaced here at class-definition time.
    pub fn property(mut self, prop: Property) -> Result<Self> {
        if let Some(existing) = self.properties.iter_mut().find(|p| p.name() == prop.name()) {
            if existing.kind().name() != prop.kind().name() {
                return Err(JsonError::SchemaConflict {
                    name: prop.name().to_string(),
                    reason: format!(
                        "redeclared as {} but inherited as {}",
                        prop.kind().name(),
                        existing.kind().name()
                    ),
                });
            }
            *existing = prop;
            return Ok(self);
        }

        self.properties.push(prop);
        Ok(self)
    }

    /// Declare a shared property under an explicit attribute name.
    ///
    /// A property always travels under its own name; registering it under
    /// a different one is rejected.
    pub fn property_named(self, name: &str, prop: Property) -> Result<Self> {
        if prop.name() != name {
            return Err(JsonError::SchemaConflict {
                name: name.to_string(),
                reason: format!(
                    "property is named '{}' and can't be registered as '{}'",
                    prop.name(),
                    name
                ),
            });
        }
        self.property(prop)
    }

    /// Reject values supplied under undeclared names
    pub fn deny_additional(mut self) -> Self {
        self.additional = AdditionalProperties::Deny;
        self
    }

    /// Validate values supplied under undeclared names against a schema
    pub fn additional_schema(mut self, schema: Value) -> Self {
        self.additional = AdditionalProperties::Schema(schema);
        self
    }

    /// Finish the registry
    pub fn build(self) -> PropertyRegistry {
        tracing::debug!(
            class = %self.class_name,
            properties = self.properties.len(),
            "built property registry"
        );
        PropertyRegistry {
            class_name: self.class_name,
            properties: self.properties,
            additional: self.additional,
            object_schema: OnceLock::new(),
            schema_digest: OnceLock::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> PropertyRegistry {
        PropertyRegistry::builder("Base")
            .property(Property::number("a").unwrap())
            .unwrap()
            .property(Property::string("b").unwrap().optional())
            .unwrap()
            .build()
    }

    #[test]
    fn test_names_in_declaration_order() {
        let registry = base();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["a", "b"]);

        // Restartable: a second pass sees the same sequence.
        let again: Vec<&str> = registry.names().collect();
        assert_eq!(again, names);
    }

    #[test]
    fn test_extend_keeps_ancestors_first() {
        let child = PropertyRegistry::builder("Child")
            .extend(&base())
            .unwrap()
            .property(Property::boolean("c").unwrap())
            .unwrap()
            .build();

        let names: Vec<&str> = child.names().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_override_same_kind_wins_in_place() {
        let child = PropertyRegistry::builder("Child")
            .extend(&base())
            .unwrap()
            .property(Property::integer("a").unwrap())
            .unwrap()
            .build();

        assert_eq!(child.len(), 2);
        let names: Vec<&str> = child.names().collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(child.get("a").unwrap().schema(), &json!({"type": "integer"}));
    }

    #[test]
    fn test_kind_conflict_raised_at_build_time() {
        let result = PropertyRegistry::builder("Child")
            .extend(&base())
            .unwrap()
            .property(Property::constant("a", json!(1)).unwrap());

        assert!(matches!(result, Err(JsonError::SchemaConflict { .. })));
    }

    #[test]
    fn test_shared_property_rejected_under_other_name() {
        let shared = Property::string("tag").unwrap();
        let result = PropertyRegistry::builder("Other").property_named("label", shared);
        assert!(matches!(result, Err(JsonError::SchemaConflict { .. })));
    }

    #[test]
    fn test_shared_property_accepted_under_own_name() {
        let shared = Property::string("tag").unwrap();
        let one = PropertyRegistry::builder("One")
            .property_named("tag", shared.clone())
            .unwrap()
            .build();
        let two = PropertyRegistry::builder("Two")
            .property_named("tag", shared)
            .unwrap()
            .build();
        assert!(one.has_property("tag") && two.has_property("tag"));
    }

    #[test]
    fn test_object_schema_composition() {
        let registry = PropertyRegistry::builder("Point")
            .property(Property::number("x").unwrap())
            .unwrap()
            .property(Property::number("y").unwrap().with_default(json!(0)).unwrap())
            .unwrap()
            .deny_additional()
            .build();

        let schema = registry.object_schema();
        assert_eq!(schema["required"], json!(["x"]));
        assert_eq!(schema["additionalProperties"], json!(false));
        assert!(schema["properties"]["y"].is_object());
    }
}
