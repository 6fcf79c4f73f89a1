//! Error types shared by the patch engine, the wire codecs and the text delta
//! adapter.

use thiserror::Error;

// ── Text patch ────────────────────────────────────────────────────────────

/// A text delta could not be applied to its base string.
///
/// This is what happens when the base drifted away from the string the delta
/// was computed against.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextPatchError {
    #[error("invalid delta token: {0:?}")]
    InvalidToken(String),
    #[error("invalid delta count: {0:?}")]
    InvalidCount(String),
    #[error("invalid escape sequence in inserted text: {0:?}")]
    InvalidEncoding(String),
    #[error("delta runs past the end of the source text (needs {needed} chars, source has {available})")]
    SourceOverrun { needed: usize, available: usize },
    #[error("delta length ({delta}) does not equal source text length ({source_len})")]
    LengthMismatch { delta: usize, source_len: usize },
}

// ── Apply ─────────────────────────────────────────────────────────────────

/// Failure to decode or apply an operation or a document change.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// The operation code is not one of `+ - r I d dL L O`.
    #[error("invalid operation code: {0:?}")]
    InvalidOperation(String),
    /// The payload has the wrong shape for its code.
    #[error("malformed '{code}' operation: {reason}")]
    MalformedOperation { code: String, reason: String },
    /// The operation expects a different kind of target value.
    #[error("'{code}' operation expects {expected}, found {found}")]
    TypeMismatch {
        code: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("text patch failed: {0}")]
    TextPatch(#[from] TextPatchError),
    /// A channel message does not follow the `<channel>:<command>:<payload>` framing.
    #[error("invalid channel message: {0}")]
    InvalidMessage(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApplyError {
    pub(crate) fn malformed(code: &str, reason: impl Into<String>) -> Self {
        ApplyError::MalformedOperation {
            code: code.to_owned(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the operation itself (unknown code, bad
    /// payload, wrong target kind) as opposed to text drift or decoding.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ApplyError::InvalidOperation(_)
                | ApplyError::MalformedOperation { .. }
                | ApplyError::TypeMismatch { .. }
        )
    }
}
