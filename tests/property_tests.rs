//! Property-based tests for rust_log_pipeline using proptest

use proptest::prelude::*;
use rust_log_pipeline::core::attribute::AttributeChain;
use rust_log_pipeline::core::level::resolve;
use rust_log_pipeline::prelude::*;

fn ladder() -> impl Strategy<Value = (&'static str, i64)> {
    prop_oneof![
        Just(("trace", -8)),
        Just(("debug", -4)),
        Just(("info", 0)),
        Just(("notice", 2)),
        Just(("warn", 4)),
        Just(("warning", 4)),
        Just(("error", 8)),
        Just(("fatal", 12)),
        Just(("emergency", 12)),
    ]
}

/// Randomly re-case every character
fn recase(name: &str, mask: u32) -> String {
    name.chars()
        .enumerate()
        .map(|(i, c)| {
            if mask & (1 << (i % 32)) != 0 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

// ============================================================================
// Level resolution
// ============================================================================

proptest! {
    /// NAME[+|-]N resolves to ladder value plus offset
    #[test]
    fn test_name_with_offset((name, base) in ladder(), offset in -1000i64..1000, mask in any::<u32>()) {
        let raw = if offset < 0 {
            format!("{}{}", recase(name, mask), offset)
        } else {
            format!("{}+{}", recase(name, mask), offset)
        };
        let resolved = resolve(&raw).unwrap();
        prop_assert_eq!(resolved.level.value(), base + offset);
        prop_assert_eq!(resolved.name, Some(name.to_uppercase()));
    }

    /// Decoding the same spec twice never changes the result
    #[test]
    fn test_decode_is_idempotent((name, _) in ladder(), offset in -50i64..50) {
        let spec = LevelSpec::new(format!("{}{:+}", name, offset));
        let first = spec.level().unwrap();
        prop_assert!(spec.is_decoded());
        let second = spec.level().unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(first, resolve(spec.raw()).unwrap().level);
    }

    /// Any integer is taken verbatim
    #[test]
    fn test_integer_bypass(value in any::<i64>()) {
        let resolved = resolve(&value.to_string()).unwrap();
        prop_assert_eq!(resolved.level.value(), value);
        prop_assert!(resolved.name.is_none());
    }

    /// Names outside the ladder are rejected
    #[test]
    fn test_unknown_names_rejected(name in "[a-z]{3,10}") {
        let known = ["trace", "debug", "info", "notice", "warn", "warning", "error", "fatal", "emerg", "emergency"];
        prop_assume!(!known.contains(&name.as_str()));
        let err = resolve(&name).unwrap_err();
        prop_assert!(err.is_invalid_level());
    }

    /// A malformed offset is an error, not a silent zero
    #[test]
    fn test_bad_offset_rejected((name, _) in ladder(), junk in "[a-z]{1,5}") {
        let err = resolve(&format!("{}+{}", name, junk)).unwrap_err();
        prop_assert!(err.is_invalid_level());
    }

    /// A runtime update with an invalid string keeps the old threshold
    #[test]
    fn test_level_var_keeps_value_on_error(start in -20i64..20, junk in "[xyz]{2,6}") {
        let var = rust_log_pipeline::LevelVar::new(Level::new(start));
        prop_assert!(var.set_from_str(&junk).is_err());
        prop_assert_eq!(var.level(), Level::new(start));
    }
}

// ============================================================================
// Output format
// ============================================================================

proptest! {
    /// Parsing is case-insensitive and renders back in upper case
    #[test]
    fn test_format_case_insensitive(json in any::<bool>(), mask in any::<u32>()) {
        let name = if json { "json" } else { "text" };
        let format: OutputFormat = recase(name, mask).parse().unwrap();
        prop_assert_eq!(format.to_string(), name.to_uppercase());
    }

    /// Anything else is rejected
    #[test]
    fn test_format_rejects_others(name in "[a-z]{1,8}") {
        prop_assume!(name != "json" && name != "text");
        let err = name.parse::<OutputFormat>().unwrap_err();
        prop_assert!(err.is_invalid_format());
    }
}

// ============================================================================
// Attribute rewriting
// ============================================================================

proptest! {
    /// Source paths lose their directories unless full paths are wanted
    #[test]
    fn test_source_stripping(dirs in prop::collection::vec("[a-z]{1,6}", 0..5), file in "[a-z]{1,8}\\.rs") {
        let full = if dirs.is_empty() {
            file.clone()
        } else {
            format!("/{}/{}", dirs.join("/"), file)
        };

        let stripped = AttributeChain::for_sink(false, &[]).apply(&[], Attr::new("source", full.as_str()));
        prop_assert_eq!(stripped.value, Value::from(file.as_str()));

        let kept = AttributeChain::for_sink(true, &[]).apply(&[], Attr::new("source", full.as_str()));
        prop_assert_eq!(kept.value, Value::from(full.as_str()));
    }

    /// Only the level and source keys are touched by the built-ins
    #[test]
    fn test_other_keys_untouched(key in "[a-z]{1,8}", value in "[ -~]{0,20}") {
        prop_assume!(key != "level" && key != "source");
        let attr = AttributeChain::for_sink(false, &[]).apply(&["g".to_string()], Attr::new(key.as_str(), value.as_str()));
        prop_assert_eq!(attr.key, key);
        prop_assert_eq!(attr.value, Value::from(value.as_str()));
    }
}

// ============================================================================
// Rotation policy
// ============================================================================

proptest! {
    /// Validation passes exactly when every bound is at least one
    #[test]
    fn test_rotation_bounds(max_size in -3i64..10, keep in -3i64..10, max_age in -3i64..10) {
        let policy = RotationPolicy { max_size, keep, max_age, ..RotationPolicy::default() };
        let valid = max_size >= 1 && keep >= 1 && max_age >= 1;
        prop_assert_eq!(policy.validate().is_ok(), valid);

        let disabled = RotationPolicy { disable: true, ..policy };
        prop_assert!(disabled.validate().is_ok());
    }
}
