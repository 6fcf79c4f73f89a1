//! JSON codec for operations.
//!
//! An operation travels as `{"o": "<code>", "v": <payload>}`, with `v` left out
//! for `-`.

use std::collections::BTreeMap;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use super::{OpCode, Operation};
use crate::error::ApplyError;
use crate::text_delta::DeltaText;

// ── Encoding ──────────────────────────────────────────────────────────────

/// Encode an operation as a JSON value.
pub fn to_json(op: &Operation) -> Value {
    let mut m = Map::new();
    m.insert("o".into(), Value::String(op.code().as_str().into()));
    let payload = match op {
        Operation::Delete => None,
        Operation::Insert(v) | Operation::Replace(v) => Some(v.clone()),
        Operation::Increment(n) => Some(Value::Number(n.clone())),
        Operation::TextDelta(d) | Operation::ListText(d) => Some(Value::String(d.as_str().into())),
        Operation::List(ops) => Some(Value::Object(
            ops.iter().map(|(i, op)| (i.to_string(), to_json(op))).collect(),
        )),
        Operation::Object(ops) => Some(Value::Object(
            ops.iter().map(|(k, op)| (k.clone(), to_json(op))).collect(),
        )),
    };
    if let Some(v) = payload {
        m.insert("v".into(), v);
    }
    Value::Object(m)
}

// ── Decoding ──────────────────────────────────────────────────────────────

/// Decode an operation from a JSON value.
pub fn from_json(value: &Value) -> Result<Operation, ApplyError> {
    let obj = value
        .as_object()
        .ok_or_else(|| ApplyError::InvalidOperation(format!("expected an object, got {value}")))?;
    let code = match obj.get("o") {
        Some(Value::String(s)) => s.parse::<OpCode>()?,
        Some(other) => return Err(ApplyError::InvalidOperation(other.to_string())),
        None => return Err(ApplyError::InvalidOperation("missing \"o\"".into())),
    };
    let code_str = code.as_str();
    let payload = obj.get("v");

    let op = match code {
        OpCode::Delete => {
            if payload.is_some() {
                return Err(ApplyError::malformed(code_str, "delete carries no payload"));
            }
            Operation::Delete
        }
        OpCode::Insert => Operation::Insert(required(code_str, payload)?.clone()),
        OpCode::Replace => Operation::Replace(required(code_str, payload)?.clone()),
        OpCode::Increment => match required(code_str, payload)? {
            Value::Number(n) => Operation::Increment(n.clone()),
            other => {
                return Err(ApplyError::malformed(code_str, format!("payload must be a number, got {other}")))
            }
        },
        OpCode::TextDelta => Operation::TextDelta(decode_delta(code_str, payload)?),
        OpCode::ListText => Operation::ListText(decode_delta(code_str, payload)?),
        OpCode::List => {
            let mut ops = BTreeMap::new();
            for (key, sub) in decode_map(code_str, payload)? {
                ops.insert(decode_index(key)?, from_json(sub)?);
            }
            Operation::List(ops)
        }
        OpCode::Object => {
            let ops = decode_map(code_str, payload)?
                .iter()
                .map(|(key, sub)| Ok((key.clone(), from_json(sub)?)))
                .collect::<Result<_, ApplyError>>()?;
            Operation::Object(ops)
        }
    };
    Ok(op)
}

fn required<'a>(code: &str, payload: Option<&'a Value>) -> Result<&'a Value, ApplyError> {
    payload.ok_or_else(|| ApplyError::malformed(code, "missing payload \"v\""))
}

fn decode_delta(code: &str, payload: Option<&Value>) -> Result<DeltaText, ApplyError> {
    match required(code, payload)? {
        Value::String(s) => Ok(DeltaText::new(s.as_str())),
        other => Err(ApplyError::malformed(code, format!("payload must be a string, got {other}"))),
    }
}

fn decode_map<'a>(code: &str, payload: Option<&'a Value>) -> Result<&'a Map<String, Value>, ApplyError> {
    match required(code, payload)? {
        Value::Object(m) => Ok(m),
        other => Err(ApplyError::malformed(code, format!("payload must be an object, got {other}"))),
    }
}

/// List indices are decimal integers without sign or leading zeros.
fn decode_index(key: &str) -> Result<usize, ApplyError> {
    key.parse::<usize>()
        .ok()
        .filter(|i| i.to_string() == key)
        .ok_or_else(|| ApplyError::malformed("L", format!("invalid list index {key:?}")))
}

// ── serde ─────────────────────────────────────────────────────────────────

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let has_payload = !matches!(self, Operation::Delete);
        let mut map = serializer.serialize_map(Some(1 + usize::from(has_payload)))?;
        map.serialize_entry("o", self.code().as_str())?;
        match self {
            Operation::Delete => {}
            Operation::Insert(v) | Operation::Replace(v) => map.serialize_entry("v", v)?,
            Operation::Increment(n) => map.serialize_entry("v", n)?,
            Operation::TextDelta(d) | Operation::ListText(d) => map.serialize_entry("v", d)?,
            // Integer keys are written as JSON strings, in ascending order.
            Operation::List(ops) => map.serialize_entry("v", ops)?,
            Operation::Object(ops) => map.serialize_entry("v", ops)?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        from_json(&value).map_err(de::Error::custom)
    }
}
