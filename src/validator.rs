//! Compiled schema validators and the process-wide validator cache
//!
//! Compiling a JSON Schema document is much more expensive than running it,
//! so compiled validators are cached for the lifetime of the process, keyed
//! by the digest of the schema's canonical form. Equal schema documents
//! share one compiled validator regardless of where they were declared.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

use crate::digest::SchemaDigest;
use crate::error::{JsonError, Result};

static COMPILED_CACHE: OnceLock<Mutex<HashMap<SchemaDigest, Arc<JSONSchema>>>> = OnceLock::new();

fn cache() -> &'static Mutex<HashMap<SchemaDigest, Arc<JSONSchema>>> {
    COMPILED_CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Validate `instance` against `schema`, failing fast on the first
/// violation.
///
/// The schema is compiled on first use and the compiled form is cached; the
/// digest is recomputed on every call. Callers that already hold a digest
/// should use [`validate_keyed`].
pub fn validate(schema: &Value, instance: &Value) -> Result<()> {
    let digest = SchemaDigest::from_json(schema);
    validate_keyed(&digest, schema, instance)
}

/// Validate `instance` against `schema`, using a precomputed digest as the
/// cache key.
///
/// The reported field is the JSON pointer path of the offending value
/// within `instance` (empty for the root), so callers validating a single
/// property value are expected to prefix their property name.
pub fn validate_keyed(digest: &SchemaDigest, schema: &Value, instance: &Value) -> Result<()> {
    let compiled = compiled_for(digest, schema)?;

    if let Err(mut errors) = compiled.validate(instance) {
        // Fail-fast: only the first violation is reported.
        if let Some(error) = errors.next() {
            let field = error
                .instance_path
                .to_string()
                .trim_start_matches('/')
                .to_string();
            return Err(JsonError::Validation {
                field,
                reason: error.to_string(),
            });
        }
    }

    Ok(())
}

/// Fetch or compile the validator for a schema document
fn compiled_for(digest: &SchemaDigest, schema: &Value) -> Result<Arc<JSONSchema>> {
    let mut guard = cache().lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(compiled) = guard.get(digest) {
        tracing::trace!(digest = %digest, "validator cache hit");
        return Ok(Arc::clone(compiled));
    }

    tracing::debug!(digest = %digest, "compiling schema validator");
    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema)
        .map_err(|e| JsonError::InvalidSchema(e.to_string()))?;

    let compiled = Arc::new(compiled);
    guard.insert(digest.clone(), Arc::clone(&compiled));

    Ok(compiled)
}
