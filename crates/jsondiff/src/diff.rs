//! Diff engine: compute the operation that turns one value into another.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::change::DocumentChange;
use crate::operation::Operation;
use crate::text_delta::{list_text, TextDelta};
use crate::value::{canonical_eq, increment_between, Document};

// ── Options ───────────────────────────────────────────────────────────────

/// How list changes are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListMode {
    /// `L` with per-index operations, `dL` when elements are inserted in the
    /// middle of the list.
    #[default]
    Auto,
    /// Always `L`. Middle insertions become per-index rewrites plus appends.
    Index,
    /// Always `dL`.
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    pub list_mode: ListMode,
    /// Encode string changes as `d` text deltas. When false strings use `r`.
    pub string_deltas: bool,
    /// Encode number changes as `I` increments. When false numbers use `r`.
    pub numeric_increments: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            list_mode: ListMode::Auto,
            string_deltas: true,
            numeric_increments: true,
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────

/// The operation turning `from` into `to`, or `None` when they are equal.
///
/// `None` on either side means the value is absent.
pub fn diff_value<T: TextDelta + ?Sized>(
    text: &T,
    options: &DiffOptions,
    from: Option<&Value>,
    to: Option<&Value>,
) -> Option<Operation> {
    match (from, to) {
        (None, None) => None,
        (None, Some(to)) => Some(Operation::Insert(to.clone())),
        (Some(_), None) => Some(Operation::Delete),
        (Some(from), Some(to)) => diff_present(text, options, from, to),
    }
}

/// Diff two documents into a change envelope.
///
/// Returns `None` when there is nothing to do. Creating an empty document is
/// still a change.
pub fn diff_document<T: TextDelta + ?Sized>(
    text: &T,
    options: &DiffOptions,
    from: Option<&Document>,
    to: Option<&Document>,
) -> Option<DocumentChange> {
    match (from, to) {
        (None, None) => None,
        (Some(_), None) => Some(DocumentChange::remove()),
        (None, Some(to)) => {
            let ops = to
                .iter()
                .map(|(key, value)| (key.clone(), Operation::Insert(value.clone())))
                .collect();
            Some(DocumentChange::modify(ops))
        }
        (Some(from), Some(to)) => {
            let ops = diff_object(text, options, from, to);
            if ops.is_empty() {
                None
            } else {
                Some(DocumentChange::modify(ops))
            }
        }
    }
}

// ── Core recursive differ ─────────────────────────────────────────────────

fn diff_present<T: TextDelta + ?Sized>(
    text: &T,
    options: &DiffOptions,
    from: &Value,
    to: &Value,
) -> Option<Operation> {
    if canonical_eq(from, to) {
        return None;
    }
    let op = match (from, to) {
        (Value::Null, _) => Operation::Insert(to.clone()),
        (Value::Object(f), Value::Object(t)) => Operation::Object(diff_object(text, options, f, t)),
        (Value::Array(f), Value::Array(t)) => diff_list(text, options, f, t),
        (Value::String(f), Value::String(t)) if options.string_deltas => {
            Operation::TextDelta(text.diff(f, t))
        }
        (Value::Number(f), Value::Number(t)) if options.numeric_increments => {
            match increment_between(f, t) {
                Some(delta) => Operation::Increment(delta),
                None => Operation::Replace(to.clone()),
            }
        }
        _ => Operation::Replace(to.clone()),
    };
    Some(op)
}

/// Per-key operations turning `from` into `to`. Empty when they are equal.
pub(crate) fn diff_object<T: TextDelta + ?Sized>(
    text: &T,
    options: &DiffOptions,
    from: &Map<String, Value>,
    to: &Map<String, Value>,
) -> BTreeMap<String, Operation> {
    let mut ops = BTreeMap::new();
    for (key, to_val) in to {
        if let Some(op) = diff_value(text, options, from.get(key), Some(to_val)) {
            ops.insert(key.clone(), op);
        }
    }
    for key in from.keys() {
        if !to.contains_key(key) {
            ops.insert(key.clone(), Operation::Delete);
        }
    }
    ops
}

fn diff_list<T: TextDelta + ?Sized>(
    text: &T,
    options: &DiffOptions,
    from: &[Value],
    to: &[Value],
) -> Operation {
    if options.list_mode == ListMode::Text {
        return list_delta(text, from, to);
    }

    let prefix = from
        .iter()
        .zip(to)
        .take_while(|(f, t)| canonical_eq(f, t))
        .count();
    let mut suffix = from[prefix..]
        .iter()
        .rev()
        .zip(to[prefix..].iter().rev())
        .take_while(|(f, t)| canonical_eq(f, t))
        .count();

    // Replay shifts on deletion but never on insertion, so elements can only
    // be added at the tail. Growth in front of a kept suffix needs `dL` or a
    // rewrite of that suffix.
    if to.len() > from.len() && suffix > 0 {
        match options.list_mode {
            ListMode::Index => suffix = 0,
            _ => {
                tracing::debug!(prefix, suffix, "middle insertion, diffing list as text");
                return list_delta(text, from, to);
            }
        }
    }

    let from_mid = from.len() - prefix - suffix;
    let to_mid = to.len() - prefix - suffix;
    let mut ops = BTreeMap::new();
    for i in prefix..prefix + from_mid.min(to_mid) {
        if let Some(op) = diff_present(text, options, &from[i], &to[i]) {
            ops.insert(i, op);
        }
    }
    for i in prefix + to_mid..prefix + from_mid {
        ops.insert(i, Operation::Delete);
    }
    for i in prefix + from_mid..prefix + to_mid {
        ops.insert(i, Operation::Insert(to[i].clone()));
    }
    Operation::List(ops)
}

fn list_delta<T: TextDelta + ?Sized>(text: &T, from: &[Value], to: &[Value]) -> Operation {
    Operation::ListText(text.diff(&list_text(from), &list_text(to)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_delta::MyersDelta;
    use serde_json::json;

    fn diff(from: Value, to: Value) -> Option<Operation> {
        diff_value(&MyersDelta, &DiffOptions::default(), Some(&from), Some(&to))
    }

    fn diff_with(options: &DiffOptions, from: Value, to: Value) -> Option<Operation> {
        diff_value(&MyersDelta, options, Some(&from), Some(&to))
    }

    #[test]
    fn equal_values() {
        assert_eq!(diff(json!({"a": [1, {"b": null}]}), json!({"a": [1, {"b": null}]})), None);
        assert_eq!(diff(json!({"x": 1, "y": 2}), json!({"y": 2, "x": 1})), None);
        assert_eq!(diff_value(&MyersDelta, &DiffOptions::default(), None, None), None);
    }

    #[test]
    fn absence() {
        let opts = DiffOptions::default();
        assert_eq!(diff_value(&MyersDelta, &opts, None, Some(&json!(null))), Some(Operation::Insert(json!(null))));
        assert_eq!(diff_value(&MyersDelta, &opts, Some(&json!(1)), None), Some(Operation::Delete));
    }

    #[test]
    fn stored_null_is_filled_by_insert() {
        assert_eq!(diff(json!(null), json!(1)), Some(Operation::Insert(json!(1))));
        assert_eq!(diff(json!(null), json!({"a": []})), Some(Operation::Insert(json!({"a": []}))));
        // The other direction still has to write the null back.
        assert_eq!(diff(json!(1), json!(null)), Some(Operation::Replace(json!(null))));
        assert_eq!(diff(json!({"n": null}), json!({"n": "x"})).map(|op| op.code().as_str()), Some("O"));
    }

    #[test]
    fn kind_changes_replace() {
        assert_eq!(diff(json!("1"), json!(1)), Some(Operation::Replace(json!(1))));
        assert_eq!(diff(json!([1]), json!({"0": 1})), Some(Operation::Replace(json!({"0": 1}))));
        assert_eq!(diff(json!(true), json!(false)), Some(Operation::Replace(json!(false))));
    }

    #[test]
    fn numbers() {
        assert_eq!(diff(json!(5), json!(8)), Some(Operation::Increment(3.into())));
        assert_eq!(diff(json!(1.5), json!(4.0)), Some(Operation::Increment(serde_json::Number::from_f64(2.5).unwrap())));
        assert_eq!(diff(json!(0.7), json!(0.1)), Some(Operation::Replace(json!(0.1))));
        assert_eq!(diff(json!(1.5), json!(2)), Some(Operation::Replace(json!(2))));
        let opts = DiffOptions { numeric_increments: false, ..DiffOptions::default() };
        assert_eq!(diff_with(&opts, json!(5), json!(8)), Some(Operation::Replace(json!(8))));
    }

    #[test]
    fn strings() {
        assert_eq!(diff(json!("abc"), json!("abd")), Some(Operation::TextDelta("=2\t-1\t+d".into())));
        let opts = DiffOptions { string_deltas: false, ..DiffOptions::default() };
        assert_eq!(diff_with(&opts, json!("abc"), json!("abd")), Some(Operation::Replace(json!("abd"))));
    }

    #[test]
    fn objects() {
        let op = diff(json!({"keep": 1, "gone": 2, "num": 3}), json!({"keep": 1, "num": 4, "new": null})).unwrap();
        assert_eq!(
            op,
            Operation::Object(BTreeMap::from([
                ("gone".to_string(), Operation::Delete),
                ("new".to_string(), Operation::Insert(json!(null))),
                ("num".to_string(), Operation::Increment(1.into())),
            ]))
        );
    }

    #[test]
    fn list_rewrites_and_deletions() {
        let op = diff(json!(["a", "b", "c", "d"]), json!(["a", "c", "x"])).unwrap();
        // prefix "a", no suffix: rewrite 1 and 2, drop 3
        assert_eq!(
            op,
            Operation::List(BTreeMap::from([
                (1, Operation::TextDelta("-1\t+c".into())),
                (2, Operation::TextDelta("-1\t+x".into())),
                (3, Operation::Delete),
            ]))
        );
        let op = diff(json!([1, 2, 3, 4]), json!([1, 4])).unwrap();
        assert_eq!(op, Operation::List(BTreeMap::from([(1, Operation::Delete), (2, Operation::Delete)])));
    }

    #[test]
    fn list_appends() {
        let op = diff(json!([1]), json!([1, 2, [3]])).unwrap();
        assert_eq!(
            op,
            Operation::List(BTreeMap::from([
                (1, Operation::Insert(json!(2))),
                (2, Operation::Insert(json!([3]))),
            ]))
        );
    }

    #[test]
    fn middle_insertion_modes() {
        let from = json!(["a", "c"]);
        let to = json!(["a", "b", "c"]);
        assert!(matches!(diff(from.clone(), to.clone()), Some(Operation::ListText(_))));

        let opts = DiffOptions { list_mode: ListMode::Index, ..DiffOptions::default() };
        let op = diff_with(&opts, from.clone(), to.clone()).unwrap();
        assert_eq!(
            op,
            Operation::List(BTreeMap::from([
                (1, Operation::TextDelta("-1\t+b".into())),
                (2, Operation::Insert(json!("c"))),
            ]))
        );

        let opts = DiffOptions { list_mode: ListMode::Text, ..DiffOptions::default() };
        let op = diff_with(&opts, json!([1]), json!([2])).unwrap();
        assert_eq!(op, Operation::ListText("-1\t+2\t=1".into()));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let opts: DiffOptions = serde_json::from_str(r#"{"list_mode": "index"}"#).unwrap();
        assert_eq!(opts.list_mode, ListMode::Index);
        assert!(opts.string_deltas && opts.numeric_increments);
        let opts: DiffOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, DiffOptions::default());
    }

    #[test]
    fn documents() {
        let opts = DiffOptions::default();
        let doc = |v: Value| match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        assert!(diff_document(&MyersDelta, &opts, None, None).is_none());
        let a = doc(json!({"foo": "bar"}));
        assert!(diff_document(&MyersDelta, &opts, Some(&a), Some(&a)).is_none());
        let removed = diff_document(&MyersDelta, &opts, Some(&a), None).unwrap();
        assert_eq!(removed.to_json_string().unwrap(), r#"{"o":"-"}"#);
        let created = diff_document(&MyersDelta, &opts, None, Some(&Map::new())).unwrap();
        assert_eq!(created.to_json_string().unwrap(), r#"{"o":"M"}"#);
    }
}
