//! Pipeline documents
//!
//! A pipeline is an open-ended JSON object. Gate rewrites what it receives
//! (it adds `index`, `updateTs`, `lastModifiedBy`, assigns `id`), so every
//! document is normalized before it is stored or compared.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::json::canonicalize_numbers;

/// Raw pipeline definition as exchanged with Gate
pub type PipelineDocument = Map<String, Value>;

/// Keys that never appear in a normalized document.
///
/// `application`, `name` and `id` are carried by the resource identity;
/// the rest are written by Gate on every save.
pub const MANAGED_FIELDS: [&str; 6] = [
    "application",
    "lastModifiedBy",
    "id",
    "index",
    "name",
    "updateTs",
];

/// Errors raised while handling pipeline documents
#[derive(Debug, Error)]
pub enum PipelineError {
    /// User input is not a JSON object
    #[error("invalid pipeline json: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// Re-encoding a normalized document failed
    #[error("failed to marshal pipeline: {0}")]
    Encode(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Parse a raw pipeline definition
pub fn parse_pipeline(raw: &str) -> Result<PipelineDocument> {
    serde_json::from_str(raw).map_err(PipelineError::InvalidJson)
}

/// Stamp the resource identity onto a document before it is submitted
///
/// Passing `None` for `id` removes any user-supplied ID so Gate assigns one.
pub fn assign_identity(
    document: &mut PipelineDocument,
    application: &str,
    name: &str,
    id: Option<&str>,
) {
    document.insert(
        "application".to_string(),
        Value::String(application.to_string()),
    );
    document.insert("name".to_string(), Value::String(name.to_string()));

    match id {
        Some(id) => {
            document.insert("id".to_string(), Value::String(id.to_string()));
        }
        None => {
            document.remove("id");
        }
    }
}

/// Strip managed fields and encode the document canonically
///
/// Object keys are emitted in sorted order and whole numbers are written as
/// integers, so two documents with the same content always encode to the
/// same bytes.
pub fn normalize(mut document: PipelineDocument) -> Result<String> {
    for field in MANAGED_FIELDS {
        document.remove(field);
    }
    document.values_mut().for_each(canonicalize_numbers);

    serde_json::to_string(&document).map_err(PipelineError::Encode)
}

/// Parse, then [`normalize`], a raw pipeline definition
pub fn normalize_raw(raw: &str) -> Result<String> {
    normalize(parse_pipeline(raw)?)
}

/// Decide whether the difference between two raw definitions is only noise
///
/// Returns `false` when either side does not parse, so malformed input
/// always surfaces as a change.
pub fn diff_suppressed(old: &str, new: &str) -> bool {
    match (normalize_raw(old), normalize_raw(new)) {
        (Ok(old), Ok(new)) => old == new,
        _ => false,
    }
}
