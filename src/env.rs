//! Raw value resolution and type coercion.
//!
//! Responsibilities:
//! - Resolve one field's raw string from the environment or its default.
//! - Coerce raw strings into the supported field types.
//!
//! Does NOT handle:
//! - Field enumeration or record mutation (see loader.rs).
//! - Report rendering (see report.rs).
//!
//! Invariants:
//! - A variable that is present but empty is used as-is; only absence falls
//!   back to the declared default.
//! - Parse failures name the offending variable; raw values of secret
//!   fields are masked in the error.

use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::field::FieldSlot;
use crate::report::MASK;

/// Resolve the raw string for one field: the environment wins when the
/// variable is present (even when set to the empty string); otherwise the
/// declared default, or the empty string when there is none.
///
/// A variable holding non-Unicode bytes is treated as absent.
pub(crate) fn resolve_raw(env: &str, default: Option<&'static str>) -> String {
    match std::env::var(env) {
        Ok(value) => value,
        Err(_) => default.unwrap_or("").to_owned(),
    }
}

fn parse_i32(raw: &str) -> Option<i32> {
    raw.parse().ok()
}

/// Permissive boolean grammar: `1`, `t`, `T`, `TRUE`, `true`, `True` and
/// their false counterparts.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Split a raw string on `,`, preserving empty segments. An empty raw
/// string is an empty list, not a list of one empty segment.
fn split_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        Vec::new()
    } else {
        raw.split(',').map(str::to_owned).collect()
    }
}

/// Parse `key=value` entries separated by `,`. Entries must contain the
/// separator and an i32 value half; duplicate keys keep the last occurrence.
fn parse_map(raw: &str) -> Option<BTreeMap<String, i32>> {
    let mut map = BTreeMap::new();
    if raw.is_empty() {
        return Some(map);
    }
    for entry in raw.split(',') {
        let (key, value) = entry.split_once('=')?;
        map.insert(key.to_owned(), value.parse().ok()?);
    }
    Some(map)
}

fn parse_error(var: &str, raw: &str, secret: bool, expected: &'static str) -> ConfigError {
    ConfigError::Parse {
        var: var.to_owned(),
        raw: if secret { MASK.to_owned() } else { raw.to_owned() },
        expected,
    }
}

impl FieldSlot<'_> {
    /// Coerce `raw` to the slot's type and write it through.
    ///
    /// The empty string is a valid string, list, and map, but NOT a valid
    /// integer or boolean: an unset variable with no default fails to parse
    /// for those types rather than implying zero or false.
    pub(crate) fn fill(self, raw: &str, var: &str, secret: bool) -> Result<(), ConfigError> {
        match self {
            FieldSlot::I32(field) => {
                *field =
                    parse_i32(raw).ok_or_else(|| parse_error(var, raw, secret, "a base-10 i32"))?;
            }
            FieldSlot::Bool(field) => {
                *field =
                    parse_bool(raw).ok_or_else(|| parse_error(var, raw, secret, "a boolean"))?;
            }
            FieldSlot::Str(field) => {
                *field = raw.to_owned();
            }
            FieldSlot::List(field) => {
                *field = split_list(raw);
            }
            FieldSlot::Map(field) => {
                *field = parse_map(raw)
                    .ok_or_else(|| parse_error(var, raw, secret, "a key=i32 map"))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_resolve_raw_prefers_present_variable_over_default() {
        let _lock = crate::test_util::global_test_lock().lock().unwrap();

        temp_env::with_vars([("_ENVSTORE_TEST_RESOLVE", Some("from_env"))], || {
            assert_eq!(
                resolve_raw("_ENVSTORE_TEST_RESOLVE", Some("from_default")),
                "from_env"
            );
        });
    }

    #[test]
    #[serial]
    fn test_resolve_raw_distinguishes_empty_from_absent() {
        let _lock = crate::test_util::global_test_lock().lock().unwrap();

        // Present-with-empty-string wins over the default.
        temp_env::with_vars([("_ENVSTORE_TEST_EMPTY", Some(""))], || {
            assert_eq!(resolve_raw("_ENVSTORE_TEST_EMPTY", Some("fallback")), "");
        });

        // Absence falls back to the default, then to the empty string.
        temp_env::with_vars([("_ENVSTORE_TEST_EMPTY", None::<&str>)], || {
            assert_eq!(
                resolve_raw("_ENVSTORE_TEST_EMPTY", Some("fallback")),
                "fallback"
            );
            assert_eq!(resolve_raw("_ENVSTORE_TEST_EMPTY", None), "");
        });
    }

    #[test]
    fn test_parse_bool_accepts_the_permissive_grammar() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(raw), Some(true), "{raw} should parse as true");
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(raw), Some(false), "{raw} should parse as false");
        }
        for raw in ["maybe", "yes", "no", "", "tRuE", "2"] {
            assert_eq!(parse_bool(raw), None, "{raw} should not parse");
        }
    }

    #[test]
    fn test_parse_i32_rejects_the_empty_string() {
        assert_eq!(parse_i32(""), None);
        assert_eq!(parse_i32("41"), Some(41));
        assert_eq!(parse_i32("-7"), Some(-7));
        assert_eq!(parse_i32("4.2"), None);
    }

    #[test]
    fn test_split_list_preserves_empty_segments() {
        assert_eq!(split_list(""), Vec::<String>::new());
        assert_eq!(split_list("foo"), ["foo"]);
        assert_eq!(split_list("foo,bar"), ["foo", "bar"]);
        assert_eq!(split_list("foo,,bar,"), ["foo", "", "bar", ""]);
    }

    #[test]
    fn test_parse_map_splits_entries_and_keeps_the_last_duplicate() {
        let map = parse_map("c=3,d=4").unwrap();
        assert_eq!(map.get("c"), Some(&3));
        assert_eq!(map.get("d"), Some(&4));

        let map = parse_map("c=3,c=9").unwrap();
        assert_eq!(map.get("c"), Some(&9));
        assert_eq!(map.len(), 1);

        assert!(parse_map("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_map_rejects_malformed_entries() {
        // Missing separator, missing value half, non-integer value half.
        assert!(parse_map("c=3,d").is_none());
        assert!(parse_map("c=").is_none());
        assert!(parse_map("c=x").is_none());
        assert!(parse_map("c=3=4").is_none());
    }

    #[test]
    fn test_fill_masks_secret_values_in_parse_errors() {
        let mut field = 0i32;
        let err = FieldSlot::I32(&mut field)
            .fill("hunter2", "_ENVSTORE_TEST_SECRET", true)
            .unwrap_err();
        let rendered = err.to_string();
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains(MASK));
        assert!(rendered.contains("_ENVSTORE_TEST_SECRET"));
    }

    proptest! {
        #[test]
        fn test_i32_round_trips_through_its_decimal_rendering(value in any::<i32>()) {
            prop_assert_eq!(parse_i32(&value.to_string()), Some(value));
        }

        #[test]
        fn test_comma_free_segments_round_trip_through_split_list(
            segments in proptest::collection::vec("[^,]{0,12}", 1..6)
        ) {
            let raw = segments.join(",");
            // Joining a single empty segment produces the empty raw string,
            // which resolves to the empty list by contract.
            if raw.is_empty() {
                prop_assert_eq!(split_list(&raw), Vec::<String>::new());
            } else {
                prop_assert_eq!(split_list(&raw), segments);
            }
        }

        #[test]
        fn test_well_formed_entries_round_trip_through_parse_map(
            entries in proptest::collection::btree_map("[a-z]{1,8}", any::<i32>(), 0..6)
        ) {
            let raw = entries
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join(",");
            prop_assert_eq!(parse_map(&raw), Some(entries));
        }
    }
}
