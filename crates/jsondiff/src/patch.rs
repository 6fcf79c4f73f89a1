//! Patch engine: apply an operation to a value.
//!
//! Every function here consumes the value it patches and hands back a new one.
//! `Ok(None)` means the value is to be removed from its parent container,
//! which is not the same as `Ok(Some(Value::Null))`.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ApplyError;
use crate::operation::{OpCode, Operation};
use crate::text_delta::{list_text, parse_list_text, TextDelta};
use crate::value::{add_numbers, describe_slot};

/// Largest list an `L` operation may grow by padding.
pub const DEFAULT_MAX_LIST_LEN: usize = 1 << 20;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PatchOptions {
    /// Pad a list with nulls when an `L` operation addresses a position past
    /// its end. When false such an operation is rejected.
    pub extend_lists: bool,
    /// Upper bound on the length a list may be padded to.
    pub max_list_len: usize,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self {
            extend_lists: true,
            max_list_len: DEFAULT_MAX_LIST_LEN,
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────

/// Apply `op` to `value` (`None` = absent).
pub fn apply_op<T: TextDelta + ?Sized>(
    text: &T,
    options: &PatchOptions,
    value: Option<Value>,
    op: &Operation,
) -> Result<Option<Value>, ApplyError> {
    match op {
        Operation::Delete => Ok(None),
        Operation::Insert(v) | Operation::Replace(v) => Ok(Some(v.clone())),
        Operation::Increment(delta) => match value {
            None | Some(Value::Null) => Ok(Some(Value::Number(delta.clone()))),
            Some(Value::Number(n)) => add_numbers(&n, delta)
                .map(|sum| Some(Value::Number(sum)))
                .ok_or_else(|| ApplyError::malformed("I", format!("{n} + {delta} is out of range"))),
            other => Err(mismatch(op, "a number", other.as_ref())),
        },
        Operation::TextDelta(delta) => match value {
            Some(Value::String(s)) => Ok(Some(Value::String(text.patch(&s, delta)?))),
            other => Err(mismatch(op, "a string", other.as_ref())),
        },
        Operation::ListText(delta) => match value {
            Some(Value::Array(items)) => {
                let patched = text.patch(&list_text(&items), delta)?;
                Ok(Some(Value::Array(parse_list_text(&patched)?)))
            }
            other => Err(mismatch(op, "a list", other.as_ref())),
        },
        Operation::List(ops) => match value {
            Some(Value::Array(items)) => {
                let mut replay = ListReplay::new(items, options);
                for (index, sub) in ops {
                    replay.apply(text, *index, sub)?;
                }
                Ok(Some(Value::Array(replay.finish())))
            }
            other => Err(mismatch(op, "a list", other.as_ref())),
        },
        Operation::Object(ops) => match value {
            Some(Value::Object(mut map)) => {
                apply_object(text, options, &mut map, ops)?;
                Ok(Some(Value::Object(map)))
            }
            other => Err(mismatch(op, "an object", other.as_ref())),
        },
    }
}

/// Apply per-key operations to `map` in place.
///
/// A key that is absent is patched as an absent value, so `+` creates it and
/// `-` leaves it absent.
pub(crate) fn apply_object<T: TextDelta + ?Sized>(
    text: &T,
    options: &PatchOptions,
    map: &mut Map<String, Value>,
    ops: &BTreeMap<String, Operation>,
) -> Result<(), ApplyError> {
    for (key, op) in ops {
        let current = map.get_mut(key).map(std::mem::take);
        match apply_op(text, options, current, op)? {
            Some(value) => {
                map.insert(key.clone(), value);
            }
            None => {
                map.remove(key);
            }
        }
    }
    Ok(())
}

fn mismatch(op: &Operation, expected: &'static str, found: Option<&Value>) -> ApplyError {
    ApplyError::TypeMismatch {
        code: op.code().as_str(),
        expected,
        found: describe_slot(found),
    }
}

// ── List replay ───────────────────────────────────────────────────────────

/// Replays the per-index operations of an `L` operation over a working copy of
/// a list.
///
/// Indices refer to positions in the source list and must be replayed in
/// ascending order. Every removal shifts the elements behind it one slot to
/// the left, so source index `i` lives at `i - deleted` in the working list.
#[derive(Debug)]
pub struct ListReplay<'a> {
    items: Vec<Value>,
    deleted: usize,
    last: Option<usize>,
    options: &'a PatchOptions,
}

impl<'a> ListReplay<'a> {
    pub fn new(items: Vec<Value>, options: &'a PatchOptions) -> Self {
        Self {
            items,
            deleted: 0,
            last: None,
            options,
        }
    }

    /// Number of elements removed so far.
    pub fn deleted(&self) -> usize {
        self.deleted
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Apply `op` to the element at source position `index`.
    pub fn apply<T: TextDelta + ?Sized>(
        &mut self,
        text: &T,
        index: usize,
        op: &Operation,
    ) -> Result<(), ApplyError> {
        if let Some(last) = self.last {
            if index <= last {
                return Err(ApplyError::malformed(
                    OpCode::List.as_str(),
                    format!("index {index} replayed after index {last}"),
                ));
            }
        }
        self.last = Some(index);

        // At most one removal per replayed index, and indices strictly
        // increase, so `deleted <= index`.
        let position = index - self.deleted;
        let len = self.items.len();
        if position >= len {
            self.grow(index, len)?;
        }

        let current = std::mem::take(&mut self.items[position]);
        match apply_op(text, self.options, Some(current), op)? {
            Some(value) => self.items[position] = value,
            None => {
                self.items.remove(position);
                self.deleted += 1;
            }
        }
        Ok(())
    }

    /// Extend the working list with nulls so it covers source `index`.
    fn grow(&mut self, index: usize, len: usize) -> Result<(), ApplyError> {
        let target = index
            .checked_add(1)
            .filter(|target| *target <= self.options.max_list_len)
            .ok_or_else(|| {
                ApplyError::malformed(
                    OpCode::List.as_str(),
                    format!("index {index} exceeds the list limit of {}", self.options.max_list_len),
                )
            })?;
        if index > len {
            if !self.options.extend_lists {
                return Err(ApplyError::malformed(
                    OpCode::List.as_str(),
                    format!("index {index} is past the end of a list of {len}"),
                ));
            }
            tracing::warn!(index, len, "list operation past the end, padding with nulls");
        }
        self.items.resize(target, Value::Null);
        Ok(())
    }

    pub fn finish(self) -> Vec<Value> {
        self.items
    }
}
