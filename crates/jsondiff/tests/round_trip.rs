//! Property tests: applying a diff reproduces its target.

mod common;

use common::{arb_document, arb_document_pair, arb_list_pair, arb_value, assert_round_trip, init_test_tracing};
use jsondiff::{canonical_eq, DiffOptions, JsonDiff, ListMode, Operation};
use proptest::prelude::*;
use serde_json::Value;

fn engine(list_mode: ListMode) -> JsonDiff {
    JsonDiff::new().with_diff_options(DiffOptions {
        list_mode,
        ..DiffOptions::default()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn documents_round_trip(a in arb_document(), b in arb_document()) {
        init_test_tracing();
        assert_round_trip(&JsonDiff::new(), Some(&a), Some(&b));
    }

    #[test]
    fn related_documents_round_trip((a, b) in arb_document_pair()) {
        for mode in [ListMode::Auto, ListMode::Index, ListMode::Text] {
            assert_round_trip(&engine(mode), Some(&a), Some(&b));
        }
    }

    #[test]
    fn absent_documents_round_trip(a in arb_document()) {
        let engine = JsonDiff::new();
        assert_round_trip(&engine, None, Some(&a));
        assert_round_trip(&engine, Some(&a), None);
    }

    #[test]
    fn lists_round_trip((from, to) in arb_list_pair()) {
        for mode in [ListMode::Auto, ListMode::Index, ListMode::Text] {
            let engine = engine(mode);
            let (from, to) = (Value::Array(from.clone()), Value::Array(to.clone()));
            let op = engine.diff_value(Some(&from), Some(&to));
            let result = match &op {
                Some(op) => engine.apply_value(Some(from.clone()), op).unwrap(),
                None => Some(from.clone()),
            };
            prop_assert!(result.as_ref().is_some_and(|r| canonical_eq(r, &to)), "{mode:?}: {op:?} gave {result:?}");
        }
    }

    #[test]
    fn auto_lists_never_insert_mid_replay((from, to) in arb_list_pair()) {
        let engine = JsonDiff::new();
        if let Some(Operation::List(ops)) = engine.diff_value(Some(&Value::Array(from.clone())), Some(&Value::Array(to))) {
            for (index, op) in ops {
                // Inside the list an insert can only fill a stored null.
                if matches!(op, Operation::Insert(_)) && index < from.len() {
                    prop_assert!(from[index].is_null(), "insert at {index} over {:?}", from[index]);
                }
            }
        }
    }

    #[test]
    fn values_round_trip(a in arb_value(), b in arb_value()) {
        let engine = JsonDiff::new();
        let op = engine.diff_value(Some(&a), Some(&b));
        let result = match &op {
            Some(op) => engine.apply_value(Some(a.clone()), op).unwrap(),
            None => Some(a.clone()),
        };
        prop_assert!(result.as_ref().is_some_and(|r| canonical_eq(r, &b)), "{op:?} gave {result:?}");
    }

    #[test]
    fn equal_inputs_have_no_diff(a in arb_document()) {
        prop_assert!(JsonDiff::new().diff(Some(&a), Some(&a)).is_none());
        let reordered: jsondiff::Document = a.iter().rev().map(|(k, v)| (k.clone(), v.clone())).collect();
        prop_assert!(JsonDiff::new().diff(Some(&a), Some(&reordered)).is_none());
    }

    #[test]
    fn changes_survive_the_wire(a in arb_document(), b in arb_document()) {
        if let Some(change) = JsonDiff::new().diff(Some(&a), Some(&b)) {
            let text = change.to_json_string().unwrap();
            let back = jsondiff::DocumentChange::from_json_str(&text).unwrap();
            prop_assert_eq!(back, change);
        }
    }
}
