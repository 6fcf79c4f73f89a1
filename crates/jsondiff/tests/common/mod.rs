#![allow(dead_code)]

use jsondiff::{canonical_string, Document, JsonDiff, TextDelta};
use proptest::prelude::*;
use serde_json::{json, Value};

pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn,jsondiff=debug")
        .with_test_writer()
        .try_init();
}

/// Unwrap a JSON object literal into a document.
pub fn doc(v: Value) -> Document {
    match v {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

/// Diff `from` into `to`, apply the change back onto `from`, and check that
/// the result is canonically equal to `to`.
pub fn assert_round_trip<T: TextDelta>(engine: &JsonDiff<T>, from: Option<&Document>, to: Option<&Document>) {
    let change = engine.diff(from, to);
    let result = match &change {
        Some(change) => engine
            .apply(from, change)
            .unwrap_or_else(|e| panic!("apply failed: {e}\nchange: {change:?}")),
        None => from.cloned(),
    };
    assert_eq!(
        result.map(|d| canonical_string(&Value::Object(d))),
        to.map(|d| canonical_string(&Value::Object(d.clone()))),
        "change: {change:?}"
    );
}

// ── Strategies ────────────────────────────────────────────────────────────

pub fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-10i64..10).prop_map(Value::from),
        (-1.0e6..1.0e6f64).prop_map(|f| json!(f)),
        r"[a-c \n\té✓]{0,12}".prop_map(Value::String),
    ]
}

pub fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(3, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-d]{1,2}", inner, 0..5)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

pub fn arb_document() -> impl Strategy<Value = Document> {
    prop::collection::btree_map("[a-f]{1,3}", arb_value(), 0..6).prop_map(|m| m.into_iter().collect())
}

/// A document and a mutated copy of it, so that diffs exercise the nested
/// operations rather than wholesale replacement.
pub fn arb_document_pair() -> impl Strategy<Value = (Document, Document)> {
    (arb_document(), arb_document(), prop::collection::vec(any::<bool>(), 6)).prop_map(|(a, b, keep)| {
        let mut next = a.clone();
        for ((key, value), keep) in b.into_iter().zip(keep) {
            if keep {
                next.insert(key, value);
            } else {
                next.remove(&key);
            }
        }
        (a, next)
    })
}

/// A list and an edited copy: insertions, removals and rewrites at random
/// positions.
pub fn arb_list_pair() -> impl Strategy<Value = (Vec<Value>, Vec<Value>)> {
    (
        prop::collection::vec(arb_value(), 0..8),
        prop::collection::vec((0usize..10, 0u8..3, arb_value()), 0..5),
    )
        .prop_map(|(base, edits)| {
            let mut next = base.clone();
            for (pos, kind, value) in edits {
                match kind {
                    0 => next.insert(pos.min(next.len()), value),
                    1 if !next.is_empty() => {
                        let at = pos % next.len();
                        next.remove(at);
                    }
                    _ if !next.is_empty() => {
                        let at = pos % next.len();
                        next[at] = value;
                    }
                    _ => next.push(value),
                }
            }
            (base, next)
        })
}
