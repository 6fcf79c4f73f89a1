//! Text delta adapter.
//!
//! The diff and patch engines never look inside a delta: they hand strings to
//! a [`TextDelta`] implementation and carry the resulting [`DeltaText`] around
//! as an opaque token. [`MyersDelta`] is the stock implementation, speaking the
//! tab-separated delta grammar of [`codec`].

pub mod codec;
pub mod myers;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApplyError, TextPatchError};
use crate::value::write_canonical;

/// An encoded text delta, understood only by the adapter that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeltaText(String);

impl DeltaText {
    pub fn new(delta: impl Into<String>) -> Self {
        DeltaText(delta.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeltaText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DeltaText {
    fn from(s: String) -> Self {
        DeltaText(s)
    }
}

impl From<&str> for DeltaText {
    fn from(s: &str) -> Self {
        DeltaText(s.to_owned())
    }
}

/// A matched pair of text diff and text patch functions.
///
/// `patch(from, &diff(from, to))` must return `to`. Implementations are shared
/// between callers without locking, hence `Send + Sync`.
pub trait TextDelta: Send + Sync {
    fn diff(&self, from: &str, to: &str) -> DeltaText;

    fn patch(&self, from: &str, delta: &DeltaText) -> Result<String, TextPatchError>;
}

impl<T: TextDelta + ?Sized> TextDelta for &T {
    fn diff(&self, from: &str, to: &str) -> DeltaText {
        (**self).diff(from, to)
    }

    fn patch(&self, from: &str, delta: &DeltaText) -> Result<String, TextPatchError> {
        (**self).patch(from, delta)
    }
}

/// Character-level Myers diff encoded in the Simperium delta grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct MyersDelta;

impl TextDelta for MyersDelta {
    fn diff(&self, from: &str, to: &str) -> DeltaText {
        let script = myers::diff(from, to);
        DeltaText(codec::encode(&codec::from_edits(&script)))
    }

    fn patch(&self, from: &str, delta: &DeltaText) -> Result<String, TextPatchError> {
        let components = codec::decode(delta.as_str())?;
        codec::apply(from, &components)
    }
}

// ── List text ─────────────────────────────────────────────────────────────

/// The base text of a `dL` operation: one canonical encoding per line, each
/// line terminated by `\n`.
pub fn list_text(items: &[Value]) -> String {
    let mut out = String::new();
    for item in items {
        write_canonical(&mut out, item);
        out.push('\n');
    }
    if out.is_empty() {
        out.push('\n');
    }
    out
}

/// Inverse of [`list_text`]. Blank lines are skipped.
pub fn parse_list_text(text: &str) -> Result<Vec<Value>, ApplyError> {
    text.split('\n')
        .filter(|line| !line.is_empty())
        .map(|line| {
            serde_json::from_str(line)
                .map_err(|e| ApplyError::malformed("dL", format!("line {line:?} is not JSON: {e}")))
        })
        .collect()
}
