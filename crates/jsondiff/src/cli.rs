//! Logic behind the `jsondiff` and `jsondiff-apply` binaries.
//!
//! - `jsondiff '<from>' '<to>'`: print the change between two documents
//! - `jsondiff-apply '<change>'`: apply a change to the document on stdin
//!
//! Documents are JSON objects. `null` (or empty input) stands for a document
//! that does not exist.

use serde::de::Error as _;
use serde_json::Value;

use crate::change::DocumentChange;
use crate::error::ApplyError;
use crate::value::Document;

/// The wire form of the change from `from` to `to`, or an empty string when
/// the documents are equal.
pub fn diff_documents(from: &str, to: &str) -> Result<String, ApplyError> {
    let from = parse_document(from)?;
    let to = parse_document(to)?;
    match crate::diff(from.as_ref(), to.as_ref()) {
        Some(change) => change.to_json_string(),
        None => Ok(String::new()),
    }
}

/// Apply `change` to `document`, returning the new document as JSON (`null`
/// when the change removed it).
pub fn apply_change(document: &str, change: &str) -> Result<String, ApplyError> {
    let document = parse_document(document)?;
    let change = DocumentChange::from_json_str(change)?;
    match crate::apply(document.as_ref(), &change)? {
        Some(next) => Ok(serde_json::to_string(&next)?),
        None => Ok("null".to_owned()),
    }
}

fn parse_document(json: &str) -> Result<Option<Document>, ApplyError> {
    let json = json.trim();
    if json.is_empty() {
        return Ok(None);
    }
    match serde_json::from_str::<Value>(json)? {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        other => Err(serde_json::Error::custom(format!("a document must be an object or null, got {other}")).into()),
    }
}
