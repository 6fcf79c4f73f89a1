//! The closed set of per-value operations.
//!
//! One [`Operation`] describes how to turn one value (possibly absent) into
//! another. Container operations (`L`, `O`) nest further operations.

pub mod codec;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde_json::{Number, Value};

use crate::error::ApplyError;
use crate::text_delta::DeltaText;

// ── Codes ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    Insert,
    Delete,
    Replace,
    Increment,
    TextDelta,
    ListText,
    List,
    Object,
}

impl OpCode {
    pub const ALL: [OpCode; 8] = [
        OpCode::Insert,
        OpCode::Delete,
        OpCode::Replace,
        OpCode::Increment,
        OpCode::TextDelta,
        OpCode::ListText,
        OpCode::List,
        OpCode::Object,
    ];

    /// The wire code.
    pub fn as_str(self) -> &'static str {
        match self {
            OpCode::Insert => "+",
            OpCode::Delete => "-",
            OpCode::Replace => "r",
            OpCode::Increment => "I",
            OpCode::TextDelta => "d",
            OpCode::ListText => "dL",
            OpCode::List => "L",
            OpCode::Object => "O",
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpCode {
    type Err = ApplyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OpCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| ApplyError::InvalidOperation(s.to_owned()))
    }
}

// ── Operation ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// `+`: the value was absent and now holds the payload.
    Insert(Value),
    /// `-`: remove the value.
    Delete,
    /// `r`: replace the value wholesale.
    Replace(Value),
    /// `I`: add the payload to a number.
    Increment(Number),
    /// `d`: patch a string with a text delta.
    TextDelta(DeltaText),
    /// `dL`: patch a list through the text delta of its line encoding.
    ListText(DeltaText),
    /// `L`: per-index operations, replayed in ascending index order.
    List(BTreeMap<usize, Operation>),
    /// `O`: per-key operations.
    Object(BTreeMap<String, Operation>),
}

impl Operation {
    pub fn code(&self) -> OpCode {
        match self {
            Operation::Insert(_) => OpCode::Insert,
            Operation::Delete => OpCode::Delete,
            Operation::Replace(_) => OpCode::Replace,
            Operation::Increment(_) => OpCode::Increment,
            Operation::TextDelta(_) => OpCode::TextDelta,
            Operation::ListText(_) => OpCode::ListText,
            Operation::List(_) => OpCode::List,
            Operation::Object(_) => OpCode::Object,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn codes_round_trip() {
        for code in OpCode::ALL {
            assert_eq!(code.as_str().parse::<OpCode>().unwrap(), code);
        }
    }

    #[test]
    fn unknown_code() {
        let err = "x".parse::<OpCode>().unwrap_err();
        assert!(matches!(err, ApplyError::InvalidOperation(ref c) if c == "x"));
        assert!("dl".parse::<OpCode>().is_err());
        assert!("".parse::<OpCode>().is_err());
    }

    #[test]
    fn operation_codes() {
        assert_eq!(Operation::Insert(json!(1)).code(), OpCode::Insert);
        assert_eq!(Operation::Delete.code().as_str(), "-");
        assert_eq!(Operation::ListText(DeltaText::default()).code().as_str(), "dL");
        assert_eq!(Operation::List(BTreeMap::new()).code().as_str(), "L");
    }
}
