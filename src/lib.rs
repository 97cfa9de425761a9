//! Schemabound
//!
//! A JSON object model in which classes declare named, typed properties
//! that are validated against and serialized to a JSON object
//! representation.
//!
//! ## Features
//!
//! - **Typed Properties**: plain (schema-validated), enum, and constant
//!   property kinds, with optionality and defaults
//! - **Inheritance**: subclass registries merge ancestor declarations,
//!   most specific winning; conflicts surface at class-definition time
//! - **Validation**: declared constraints checked on construction and on
//!   every assignment, fail-fast with the offending field named
//! - **Validator Cache**: compiled JSON Schema validators shared
//!   process-wide, keyed by schema digest
//! - **Serialization**: compact and pretty JSON text with stable field
//!   ordering, plus stream and file helpers
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use schemabound::{JsonObject, Property, PropertyRegistry};
//!
//! # fn main() -> schemabound::Result<()> {
//! let point = Arc::new(
//!     PropertyRegistry::builder("Point")
//!         .property(Property::number("x")?)?
//!         .property(Property::number("y")?.with_default(json!(0))?)?
//!         .build(),
//! );
//!
//! let p = JsonObject::new(point.clone(), json!({"x": 5}))?;
//! assert_eq!(p.get("y"), Some(&json!(0)));
//! assert_eq!(p.to_json()?, r#"{"x":5,"y":0}"#);
//!
//! let q = JsonObject::from_json(point, r#"{"x": 1, "y": 2}"#)?;
//! assert_eq!(q.get("y"), Some(&json!(2)));
//! # Ok(())
//! # }
//! ```

pub mod digest;
pub mod error;
pub mod object;
pub mod property;
pub mod registry;
pub mod schema;
pub mod serialise;
pub mod validator;

pub use digest::SchemaDigest;
pub use error::{JsonError, Result};
pub use object::JsonObject;
pub use property::{Property, PropertyKind};
pub use registry::{AdditionalProperties, PropertyRegistry, RegistryBuilder};
