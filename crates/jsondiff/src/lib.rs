//! jsondiff: structural diff and patch for JSON documents, speaking the
//! Simperium change format.
//!
//! [`diff`] turns two document states into a [`DocumentChange`], and [`apply`]
//! replays a change against a document:
//!
//! ```
//! use serde_json::json;
//!
//! let from = json!({}).as_object().cloned().unwrap();
//! let to = json!({"foo": "bar"}).as_object().cloned().unwrap();
//!
//! let change = jsondiff::diff(Some(&from), Some(&to)).unwrap();
//! assert_eq!(change.to_json_string().unwrap(), r#"{"o":"M","v":{"foo":{"o":"+","v":"bar"}}}"#);
//! assert_eq!(jsondiff::apply(Some(&from), &change).unwrap(), Some(to));
//! ```
//!
//! Absent documents and values are `None`; a stored `null` is `Some(Value::Null)`.

pub mod change;
pub mod cli;
pub mod diff;
pub mod error;
pub mod operation;
pub mod patch;
pub mod text_delta;
pub mod value;

use serde_json::Value;

pub use change::{ChangeOp, DocumentChange};
pub use diff::{DiffOptions, ListMode};
pub use error::{ApplyError, TextPatchError};
pub use operation::{OpCode, Operation};
pub use patch::PatchOptions;
pub use text_delta::{DeltaText, MyersDelta, TextDelta};
pub use value::{canonical_eq, canonical_string, Document};

/// Diff and patch engine bound to one text delta adapter and one set of
/// options.
#[derive(Debug, Clone, Default)]
pub struct JsonDiff<T: TextDelta = MyersDelta> {
    text: T,
    diff_options: DiffOptions,
    patch_options: PatchOptions,
}

impl JsonDiff<MyersDelta> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: TextDelta> JsonDiff<T> {
    /// Use a different text delta adapter.
    pub fn with_text_delta<U: TextDelta>(self, text: U) -> JsonDiff<U> {
        JsonDiff {
            text,
            diff_options: self.diff_options,
            patch_options: self.patch_options,
        }
    }

    pub fn with_diff_options(mut self, options: DiffOptions) -> Self {
        self.diff_options = options;
        self
    }

    pub fn with_patch_options(mut self, options: PatchOptions) -> Self {
        self.patch_options = options;
        self
    }

    pub fn text_delta(&self) -> &T {
        &self.text
    }

    /// The change turning `from` into `to`, or `None` when there is nothing
    /// to change.
    pub fn diff(&self, from: Option<&Document>, to: Option<&Document>) -> Option<DocumentChange> {
        diff::diff_document(&self.text, &self.diff_options, from, to)
    }

    /// The operation turning one value into another.
    pub fn diff_value(&self, from: Option<&Value>, to: Option<&Value>) -> Option<Operation> {
        diff::diff_value(&self.text, &self.diff_options, from, to)
    }

    /// Apply `change` to `document`. The input is left untouched.
    pub fn apply(
        &self,
        document: Option<&Document>,
        change: &DocumentChange,
    ) -> Result<Option<Document>, ApplyError> {
        change.apply_with(&self.text, &self.patch_options, document)
    }

    pub fn apply_value(&self, value: Option<Value>, op: &Operation) -> Result<Option<Value>, ApplyError> {
        patch::apply_op(&self.text, &self.patch_options, value, op)
    }

    /// Canonical equality of two documents.
    pub fn equal(&self, a: &Document, b: &Document) -> bool {
        a.len() == b.len() && a.iter().all(|(k, v)| b.get(k).is_some_and(|w| canonical_eq(v, w)))
    }
}

/// Diff two documents with the default engine.
pub fn diff(from: Option<&Document>, to: Option<&Document>) -> Option<DocumentChange> {
    JsonDiff::new().diff(from, to)
}

/// Apply a change with the default engine.
pub fn apply(document: Option<&Document>, change: &DocumentChange) -> Result<Option<Document>, ApplyError> {
    JsonDiff::new().apply(document, change)
}
