//! Resume merge — folds an incoming resume tree into a base tree under a
//! configurable policy. Inputs are borrowed; the result is a fresh value.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::models::identity::EntryId;

/// How lists present on both sides are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayStrategy {
    /// Base items, then incoming items not already present.
    #[default]
    Combine,
    /// Incoming list wins outright.
    Replace,
    /// Items sharing an id are merged field by field.
    Merge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// On a scalar conflict keep the incoming value. An empty incoming value
    /// never replaces a filled-in base value either way.
    pub prefer_new: bool,
    pub merge_arrays: ArrayStrategy,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            prefer_new: true,
            merge_arrays: ArrayStrategy::Combine,
        }
    }
}

pub fn merge(base: &Value, incoming: &Value, options: &MergeOptions) -> Value {
    let merged = merge_value(base, incoming, options);
    debug!(
        prefer_new = options.prefer_new,
        strategy = ?options.merge_arrays,
        "Merged resume versions"
    );
    merged
}

fn merge_value(base: &Value, incoming: &Value, options: &MergeOptions) -> Value {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(incoming_map)) => {
            Value::Object(merge_objects(base_map, incoming_map, options))
        }
        (Value::Array(base_items), Value::Array(incoming_items)) => {
            Value::Array(merge_lists(base_items, incoming_items, options))
        }
        _ => resolve_conflict(base, incoming, options.prefer_new).clone(),
    }
}

/// Walks the incoming keys only; base-only keys pass through untouched.
fn merge_objects(
    base: &Map<String, Value>,
    incoming: &Map<String, Value>,
    options: &MergeOptions,
) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, incoming_value) in incoming {
        let value = match merged.get(key) {
            Some(base_value) => merge_value(base_value, incoming_value, options),
            None => incoming_value.clone(),
        };
        merged.insert(key.clone(), value);
    }
    merged
}

fn merge_lists(base: &[Value], incoming: &[Value], options: &MergeOptions) -> Vec<Value> {
    match options.merge_arrays {
        ArrayStrategy::Replace => incoming.to_vec(),
        ArrayStrategy::Combine => {
            let mut merged = base.to_vec();
            for item in incoming {
                if position_of_match(&merged, item).is_none() {
                    merged.push(item.clone());
                }
            }
            merged
        }
        ArrayStrategy::Merge => {
            let mut merged = base.to_vec();
            for item in incoming {
                match position_of_match(&merged, item) {
                    Some(pos) if EntryId::of_item(item).is_some() => {
                        let combined = merge_value(&merged[pos], item, options);
                        merged[pos] = combined;
                    }
                    Some(_) => {}
                    None => merged.push(item.clone()),
                }
            }
            merged
        }
    }
}

/// Index of the entry `item` corresponds to: same id for identified items,
/// deep equality for the rest.
fn position_of_match(items: &[Value], item: &Value) -> Option<usize> {
    match EntryId::of_item(item) {
        Some(id) => items
            .iter()
            .position(|existing| EntryId::of_item(existing).as_ref() == Some(&id)),
        None => items.iter().position(|existing| existing == item),
    }
}

fn resolve_conflict<'a>(base: &'a Value, incoming: &'a Value, prefer_new: bool) -> &'a Value {
    if is_blank(incoming) && !is_blank(base) {
        base
    } else if prefer_new || is_blank(base) {
        incoming
    } else {
        base
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn options(prefer_new: bool, merge_arrays: ArrayStrategy) -> MergeOptions {
        MergeOptions {
            prefer_new,
            merge_arrays,
        }
    }

    #[test]
    fn test_combine_appends_unique_items() {
        let merged = merge(
            &json!({"skills": ["a", "b"]}),
            &json!({"skills": ["b", "c"]}),
            &options(true, ArrayStrategy::Combine),
        );
        assert_eq!(merged, json!({"skills": ["a", "b", "c"]}));
    }

    #[test]
    fn test_combine_skips_known_ids_even_if_changed() {
        let merged = merge(
            &json!({"workExperience": [{"id": 1, "company": "Acme"}]}),
            &json!({"workExperience": [{"id": 1, "company": "Acme Corp"}, {"id": 2, "company": "Globex"}]}),
            &MergeOptions::default(),
        );
        assert_eq!(
            merged,
            json!({"workExperience": [{"id": 1, "company": "Acme"}, {"id": 2, "company": "Globex"}]})
        );
    }

    #[test]
    fn test_replace_takes_incoming_list() {
        let merged = merge(
            &json!({"skills": ["a", "b"]}),
            &json!({"skills": ["c"]}),
            &options(true, ArrayStrategy::Replace),
        );
        assert_eq!(merged, json!({"skills": ["c"]}));
    }

    #[test]
    fn test_merge_strategy_merges_matching_ids() {
        let base = json!({"workExperience": [
            {"id": "a", "company": "Acme", "position": "Dev", "responsibilities": "Build"},
            {"id": "b", "company": "Globex"}
        ]});
        let incoming = json!({"workExperience": [
            {"id": "a", "position": "Senior Dev", "responsibilities": ""},
            {"id": "c", "company": "Initech"}
        ]});
        let merged = merge(&base, &incoming, &options(true, ArrayStrategy::Merge));
        assert_eq!(
            merged,
            json!({"workExperience": [
                {"id": "a", "company": "Acme", "position": "Senior Dev", "responsibilities": "Build"},
                {"id": "b", "company": "Globex"},
                {"id": "c", "company": "Initech"}
            ]})
        );
    }

    #[test]
    fn test_merge_strategy_skips_equal_items_without_id() {
        let merged = merge(
            &json!({"skills": ["rust", {"name": "sql"}]}),
            &json!({"skills": [{"name": "sql"}, "rust", "go"]}),
            &options(true, ArrayStrategy::Merge),
        );
        assert_eq!(merged, json!({"skills": ["rust", {"name": "sql"}, "go"]}));
    }

    #[test]
    fn test_combine_checks_against_accumulated_result() {
        let merged = merge(
            &json!({"skills": ["a"]}),
            &json!({"skills": ["c", "c"]}),
            &MergeOptions::default(),
        );
        assert_eq!(merged, json!({"skills": ["a", "c"]}));
    }

    #[test]
    fn test_merge_strategy_recurses_into_nested_lists() {
        let base = json!({"workExperience": [{
            "id": 1,
            "tags": ["api"],
            "projects": [{"id": "p1", "name": "Billing"}]
        }]});
        let incoming = json!({"workExperience": [{
            "id": 1,
            "tags": ["api", "infra"],
            "projects": [{"id": "p1", "name": "Billing v2"}, {"id": "p2", "name": "Search"}]
        }]});
        let merged = merge(&base, &incoming, &options(true, ArrayStrategy::Merge));
        assert_eq!(
            merged,
            json!({"workExperience": [{
                "id": 1,
                "tags": ["api", "infra"],
                "projects": [{"id": "p1", "name": "Billing v2"}, {"id": "p2", "name": "Search"}]
            }]})
        );
    }

    #[test]
    fn test_combine_keeps_ids_beyond_i64_apart() {
        let merged = merge(
            &json!({"items": [{"id": 10000000000000000000_u64, "c": "A"}]}),
            &json!({"items": [{"id": 12000000000000000000_u64, "c": "B"}]}),
            &MergeOptions::default(),
        );
        assert_eq!(merged["items"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_empty_incoming_never_overwrites_base() {
        for prefer_new in [true, false] {
            let merged = merge(
                &json!({"personalInfo": {"email": "a@x.io", "phone": "555"}}),
                &json!({"personalInfo": {"email": "", "phone": null}}),
                &options(prefer_new, ArrayStrategy::Combine),
            );
            assert_eq!(merged, json!({"personalInfo": {"email": "a@x.io", "phone": "555"}}));
        }
    }

    #[test]
    fn test_prefer_new_false_keeps_filled_base() {
        let merged = merge(
            &json!({"name": "Old", "email": ""}),
            &json!({"name": "New", "email": "new@x.io"}),
            &options(false, ArrayStrategy::Combine),
        );
        assert_eq!(merged, json!({"name": "Old", "email": "new@x.io"}));
    }

    #[test]
    fn test_base_only_keys_survive_and_new_keys_are_added() {
        let merged = merge(
            &json!({"a": 1, "nested": {"x": 1}}),
            &json!({"b": 2, "nested": {"y": 2}}),
            &MergeOptions::default(),
        );
        assert_eq!(merged, json!({"a": 1, "nested": {"x": 1, "y": 2}, "b": 2}));
    }

    #[test]
    fn test_inputs_are_not_modified() {
        let base = json!({"skills": ["a"]});
        let incoming = json!({"skills": ["b"]});
        let base_before = base.clone();
        let incoming_before = incoming.clone();
        let _ = merge(&base, &incoming, &MergeOptions::default());
        assert_eq!(base, base_before);
        assert_eq!(incoming, incoming_before);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let opts: MergeOptions = serde_json::from_value(json!({"merge_arrays": "merge"})).unwrap();
        assert!(opts.prefer_new);
        assert_eq!(opts.merge_arrays, ArrayStrategy::Merge);
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            (-3i64..3).prop_map(|n| json!(n)),
            "[a-c ]{0,2}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::vec(("[a-d]|id", inner), 0..4)
                    .prop_map(|entries| Value::Object(entries.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_merge_with_self_is_identity(a in arb_value()) {
            let merged = merge(&a, &a, &options(true, ArrayStrategy::Combine));
            prop_assert_eq!(merged, a);
        }
    }
}
