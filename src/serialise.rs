//! JSON text round-trips for [`JsonObject`]
//!
//! Compact output uses minimal separators; pretty output is indented with
//! a stable field order (declaration order, then additional values), so
//! serializing an unmodified instance twice yields identical text.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::Result;
use crate::object::JsonObject;
use crate::registry::PropertyRegistry;

impl JsonObject {
    /// Render the instance as an ordered JSON value.
    ///
    /// Declared properties come first in declaration order, using stored
    /// values, defaults for unset optionals, and the fixed value for
    /// constants (always included). Additional values follow in insertion
    /// order. Optionals with neither a value nor a default are omitted.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in self.iter() {
            map.insert(name.to_string(), value.clone());
        }
        Value::Object(map)
    }

    /// Serialize to compact JSON text
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_value())?)
    }

    /// Serialize to pretty JSON text: fixed indentation, stable field order
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_value())?)
    }

    /// Parse JSON text into an instance of the registry's class.
    ///
    /// Malformed text is a [`JsonError::Decode`]; syntactically valid JSON
    /// that isn't an object, or that violates a declared property, is a
    /// [`JsonError::Validation`]. Fields with no matching declaration
    /// become additional values, subject to the registry's policy.
    ///
    /// [`JsonError::Decode`]: crate::JsonError::Decode
    /// [`JsonError::Validation`]: crate::JsonError::Validation
    pub fn from_json(registry: Arc<PropertyRegistry>, text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        tracing::trace!(class = %registry.class_name(), "decoded JSON text");
        Self::new(registry, value)
    }

    /// Write the instance as JSON to a writer
    pub fn write_json_to(&self, mut writer: impl Write, pretty: bool) -> Result<()> {
        let text = if pretty { self.to_json_pretty()? } else { self.to_json()? };
        writer.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Read an instance from a reader carrying JSON text
    pub fn read_json_from(registry: Arc<PropertyRegistry>, mut reader: impl Read) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::from_json(registry, &text)
    }

    /// Save the instance to a file as JSON text
    pub fn save_json_to_file(&self, path: impl AsRef<Path>, pretty: bool) -> Result<()> {
        let text = if pretty { self.to_json_pretty()? } else { self.to_json()? };
        fs::write(path, text)?;
        Ok(())
    }

    /// Load an instance from a file of JSON text
    pub fn load_json_from_file(
        registry: Arc<PropertyRegistry>,
        path: impl AsRef<Path>,
    ) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(registry, &text)
    }
}
