use std::collections::BTreeMap;

use proptest::prelude::*;
use serde_json::{Map, Value};

use crate::action::{
    is_intent_action, is_link_action, is_notify_action, is_prompt_action, is_tool_action,
    is_valid_action, sanitize_params, Primitive,
};

/// A JSON value at most one level deep: covers primitives plus shallow
/// arrays/objects, which is enough to stress `sanitize_params` without an
/// unbounded recursive strategy.
fn arb_json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        ".{0,8}".prop_map(Value::String),
    ];
    prop_oneof![
        leaf.clone(),
        prop::collection::vec(leaf.clone(), 0..4).prop_map(Value::Array),
        prop::collection::hash_map("[a-z]{1,6}", leaf, 0..4)
            .prop_map(|m| Value::Object(m.into_iter().collect())),
    ]
}

fn arb_params_object() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::hash_map("[a-zA-Z0-9_]{1,10}", arb_json_value(), 0..8)
        .prop_map(|m| m.into_iter().collect())
}

/// A (possibly malformed) action-shaped JSON value: wrong types, missing
/// fields, and unknown discriminators are all in-bounds.
fn arb_action_like() -> impl Strategy<Value = Value> {
    let kind = prop_oneof![
        Just("tool"),
        Just("notify"),
        Just("link"),
        Just("prompt"),
        Just("intent"),
        Just("eval"),
        Just(""),
    ];
    (kind, arb_json_value()).prop_map(|(kind, payload)| {
        serde_json::json!({ "type": kind, "payload": payload })
    })
}

proptest! {
    /// `is_valid_action` must agree with the logical OR of the five
    /// per-variant predicates, for any input shape including malformed
    /// ones.
    #[test]
    fn is_valid_action_agrees_with_variant_predicates(msg in arb_action_like()) {
        let any_variant = is_tool_action(&msg)
            || is_notify_action(&msg)
            || is_link_action(&msg)
            || is_prompt_action(&msg)
            || is_intent_action(&msg);
        prop_assert_eq!(is_valid_action(&msg), any_variant);
    }

    /// Non-object top-level values are never valid actions.
    #[test]
    fn non_objects_are_never_valid(v in arb_json_value()) {
        if !v.is_object() {
            prop_assert!(!is_valid_action(&v));
        }
    }

    /// `sanitize_params` output is always a primitives-only record: no
    /// surviving property ever round-trips through `Primitive::from_value`
    /// as `None`, and nested structures never survive.
    #[test]
    fn sanitize_params_is_always_primitives_only(obj in arb_params_object()) {
        let sanitized: BTreeMap<String, Primitive> = sanitize_params(&obj);

        for (key, value) in &sanitized {
            let original = &obj[key];
            prop_assert!(Primitive::from_value(original).is_some());
            prop_assert_eq!(value, &Primitive::from_value(original).unwrap());
        }

        for (key, value) in &obj {
            if matches!(value, Value::Object(_) | Value::Array(_)) {
                prop_assert!(!sanitized.contains_key(key));
            }
        }
    }

    /// Sanitizing never panics and never grows the input.
    #[test]
    fn sanitize_params_never_exceeds_input_len(obj in arb_params_object()) {
        let sanitized = sanitize_params(&obj);
        prop_assert!(sanitized.len() <= obj.len());
    }
}
