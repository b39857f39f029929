// crates/studio-core/tests/proptest_parameter.rs
// ============================================================================
// Module: Parameter Property-Based Tests
// Description: Property tests for parameter equality, hashing and JSON form.
// Purpose: Check structural invariants across generated parameter trees.
// ============================================================================

//! Property-based tests for parameter and identifier invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::hash_map::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;

use proptest::prelude::*;
use studio_core::DatasetId;
use studio_core::Parameter;
use studio_core::ProjectId;

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn contains_nan(value: &Parameter) -> bool {
    match value {
        Parameter::Real(real) => real.is_nan(),
        Parameter::Array(items) => items.iter().any(contains_nan),
        Parameter::Object(entries) => entries.values().any(contains_nan),
        _ => false,
    }
}

fn parameter_strategy(max_depth: u32) -> impl Strategy<Value = Parameter> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(Parameter::Integer),
        any::<f64>().prop_map(Parameter::Real),
        any::<bool>().prop_map(Parameter::Boolean),
        ".*".prop_map(Parameter::String),
    ];

    leaf.prop_recursive(max_depth, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0 .. 4).prop_map(Parameter::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0 .. 4).prop_map(Parameter::Object),
        ]
    })
}

fn finite_parameter_strategy(max_depth: u32) -> impl Strategy<Value = Parameter> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(Parameter::Integer),
        (-1.0e12_f64 .. 1.0e12_f64).prop_map(Parameter::Real),
        any::<bool>().prop_map(Parameter::Boolean),
        ".*".prop_map(Parameter::String),
    ];

    leaf.prop_recursive(max_depth, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0 .. 4).prop_map(Parameter::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0 .. 4).prop_map(Parameter::Object),
        ]
    })
}

proptest! {
    #[test]
    fn equality_is_reflexive_unless_nan(value in parameter_strategy(3)) {
        let copy = value.clone();
        prop_assert_eq!(copy == value, !contains_nan(&value));
    }

    #[test]
    fn equal_values_hash_identically(value in parameter_strategy(3)) {
        let copy = value.clone();
        if copy == value {
            prop_assert_eq!(hash_of(&copy), hash_of(&value));
        }
    }

    #[test]
    fn finite_values_survive_json(value in finite_parameter_strategy(3)) {
        let encoded = serde_json::to_string(&value).expect("encode");
        let decoded: Parameter = serde_json::from_str(&encoded).expect("decode");
        if let (Some(left), Some(right)) = (value.as_f64(), decoded.as_f64()) {
            prop_assert!((left - right).abs() <= left.abs() * 1e-12);
        } else {
            prop_assert_eq!(decoded.variant_type(), value.variant_type());
        }
    }

    #[test]
    fn identifiers_equal_iff_values_equal(a in any::<u64>(), b in any::<u64>()) {
        prop_assert_eq!(ProjectId::new(a) == ProjectId::new(b), a == b);
        prop_assert_eq!(DatasetId::new(a) == DatasetId::new(b), a == b);
        if a == b {
            prop_assert_eq!(hash_of(&ProjectId::new(a)), hash_of(&ProjectId::new(b)));
        }
    }

    #[test]
    fn identifier_display_parses_back(value in any::<u64>()) {
        let id = ProjectId::new(value);
        let parsed: ProjectId = id.to_string().parse().expect("parse");
        prop_assert_eq!(parsed, id);
    }
}
