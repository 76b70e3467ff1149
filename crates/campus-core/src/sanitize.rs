//! # Metadata Sanitization
//!
//! Masks sensitive fields in arbitrary JSON metadata before it is logged or
//! persisted. A key is sensitive when it contains `password`, `secret`, or
//! `apikey` in any case combination; matching entries have their value
//! replaced with [`MASK`] at every nesting depth.
//!
//! The sanitizer is a pure function: it returns a new value and never
//! mutates its input. Recursion depth is bounded; subtrees past
//! [`MAX_DEPTH`] are masked wholesale rather than traversed. Cyclic graphs
//! are unrepresentable in `serde_json::Value`, so termination holds for any
//! input.

use serde_json::Value;

/// Replacement token for sensitive values.
pub const MASK: &str = "***";

/// Nesting depth past which a subtree is masked instead of traversed.
const MAX_DEPTH: usize = 64;

const SENSITIVE_FRAGMENTS: [&str; 3] = ["password", "secret", "apikey"];

/// Whether a key names a sensitive field (case-insensitive substring match).
pub fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    SENSITIVE_FRAGMENTS
        .iter()
        .any(|fragment| lower.contains(fragment))
}

/// Return a deep copy of `value` with every sensitive entry masked.
pub fn sanitize(value: &Value) -> Value {
    sanitize_at(value, 0)
}

fn sanitize_at(value: &Value, depth: usize) -> Value {
    if depth >= MAX_DEPTH {
        return Value::String(MASK.to_string());
    }
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, entry)| {
                    if is_sensitive_key(key) {
                        (key.clone(), Value::String(MASK.to_string()))
                    } else {
                        (key.clone(), sanitize_at(entry, depth + 1))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| sanitize_at(item, depth + 1))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn masks_top_level_sensitive_keys() {
        let input = json!({"password": "hunter2", "name": "Amina"});
        let out = sanitize(&input);
        assert_eq!(out["password"], MASK);
        assert_eq!(out["name"], "Amina");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let input = json!({
            "PASSWORD": "a",
            "ApiKey": "b",
            "client_SECRET": "c",
            "harmless": "d"
        });
        let out = sanitize(&input);
        assert_eq!(out["PASSWORD"], MASK);
        assert_eq!(out["ApiKey"], MASK);
        assert_eq!(out["client_SECRET"], MASK);
        assert_eq!(out["harmless"], "d");
    }

    #[test]
    fn substring_matches_count() {
        // "x-api-key" does not contain "apikey" verbatim, but "apikeys" and
        // "db_password_old" contain the fragments.
        let input = json!({"apikeys": ["k1"], "db_password_old": "x"});
        let out = sanitize(&input);
        assert_eq!(out["apikeys"], MASK);
        assert_eq!(out["db_password_old"], MASK);
    }

    #[test]
    fn masks_at_every_nesting_depth() {
        let input = json!({
            "request": {
                "body": {
                    "user": {"email": "a@b.edu", "password": "pw"},
                    "apiKey": "k"
                }
            }
        });
        let out = sanitize(&input);
        assert_eq!(out["request"]["body"]["user"]["password"], MASK);
        assert_eq!(out["request"]["body"]["apiKey"], MASK);
        assert_eq!(out["request"]["body"]["user"]["email"], "a@b.edu");
    }

    #[test]
    fn recurses_into_arrays() {
        let input = json!({"attempts": [{"secret": "s1"}, {"secret": "s2"}, 7]});
        let out = sanitize(&input);
        assert_eq!(out["attempts"][0]["secret"], MASK);
        assert_eq!(out["attempts"][1]["secret"], MASK);
        assert_eq!(out["attempts"][2], 7);
    }

    #[test]
    fn clean_object_is_identity() {
        let input = json!({
            "name": "Tariq",
            "credits": 12,
            "active": true,
            "tags": ["first-year", "honors"],
            "address": {"city": "Lahore", "postcode": null}
        });
        assert_eq!(sanitize(&input), input);
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(sanitize(&json!("plain")), json!("plain"));
        assert_eq!(sanitize(&json!(42)), json!(42));
        assert_eq!(sanitize(&json!(null)), json!(null));
    }

    #[test]
    fn input_is_not_mutated() {
        let input = json!({"password": "pw"});
        let before = input.clone();
        let _ = sanitize(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn sensitive_value_masked_even_when_structured() {
        // The whole value is replaced, not recursed into.
        let input = json!({"secrets": {"inner": "keep-out"}});
        let out = sanitize(&input);
        assert_eq!(out["secrets"], MASK);
    }

    #[test]
    fn depth_bound_masks_pathological_nesting() {
        let mut value = json!("leaf");
        for _ in 0..200 {
            value = json!({ "level": value });
        }
        let out = sanitize(&value);
        // The sanitizer terminated and the over-deep tail is masked.
        let mut cursor = &out;
        let mut masked = false;
        for _ in 0..200 {
            match cursor {
                Value::Object(map) => cursor = &map["level"],
                Value::String(s) if s == MASK => {
                    masked = true;
                    break;
                }
                other => panic!("unexpected node: {other:?}"),
            }
        }
        assert!(masked, "expected the over-deep subtree to be masked");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn clean_key() -> impl Strategy<Value = String> {
            "[a-oq-z][a-z]{0,7}".prop_filter("key must not be sensitive", |k| {
                !is_sensitive_key(k)
            })
        }

        fn clean_value() -> impl Strategy<Value = Value> {
            let leaf = prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::from),
                any::<i64>().prop_map(Value::from),
                "[a-z0-9 ]{0,12}".prop_map(Value::from),
            ];
            leaf.prop_recursive(4, 32, 4, |inner| {
                prop_oneof![
                    prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                    prop::collection::btree_map(clean_key(), inner, 0..4).prop_map(|m| {
                        Value::Object(m.into_iter().collect())
                    }),
                ]
            })
        }

        proptest! {
            /// With no sensitive keys anywhere, sanitization is the
            /// identity transform (value-equal, fresh allocation).
            #[test]
            fn sanitize_is_identity_without_sensitive_keys(value in clean_value()) {
                prop_assert_eq!(sanitize(&value), value);
            }

            /// Planting a sensitive entry at the top level always masks it.
            #[test]
            fn planted_sensitive_key_is_masked(value in clean_value()) {
                let input = serde_json::json!({"apikey": value, "kept": 1});
                let out = sanitize(&input);
                prop_assert_eq!(&out["apikey"], &serde_json::json!(MASK));
                prop_assert_eq!(&out["kept"], &serde_json::json!(1));
            }
        }
    }
}
