// crates/studio-core/tests/identifiers.rs
// ============================================================================
// Module: Identifier Tests
// Description: Equality, hashing, display and parsing of typed identifiers.
// Purpose: Ensure identifiers keep stable wire and display forms.
// Dependencies: studio-core, serde_json
// ============================================================================

//! Identifier behavior tests.

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

use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;

use studio_core::AnnotationSetId;
use studio_core::AppId;
use studio_core::ClientErrorKind;
use studio_core::DatasetId;
use studio_core::ExperimentId;
use studio_core::ImageId;
use studio_core::LabelId;
use studio_core::OrganizationId;
use studio_core::ProjectId;
use studio_core::SampleId;
use studio_core::SequenceId;
use studio_core::SnapshotId;
use studio_core::TaskId;
use studio_core::TrainingSessionId;
use studio_core::ValidationSessionId;

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

macro_rules! assert_id_contract {
    ($ty:ty, $prefix:literal) => {{
        let id = <$ty>::new(0x2a);
        assert_eq!(id.get(), 0x2a);
        assert_eq!(id.to_string(), concat!($prefix, "-2a"));
        let parsed: $ty = id.to_string().parse().expect("parse display form");
        assert_eq!(parsed, id);
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "42");
        let decoded: $ty = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded, id);
        assert_eq!(<$ty>::new(7), <$ty>::new(7));
        assert_ne!(<$ty>::new(7), <$ty>::new(8));
        assert_eq!(hash_of(&<$ty>::new(7)), hash_of(&<$ty>::new(7)));
    }};
}

#[test]
fn every_kind_keeps_prefix_and_wire_form() {
    assert_id_contract!(OrganizationId, "org");
    assert_id_contract!(ProjectId, "p");
    assert_id_contract!(DatasetId, "ds");
    assert_id_contract!(AnnotationSetId, "as");
    assert_id_contract!(SampleId, "s");
    assert_id_contract!(ExperimentId, "exp");
    assert_id_contract!(TrainingSessionId, "t");
    assert_id_contract!(ValidationSessionId, "v");
    assert_id_contract!(SnapshotId, "ss");
    assert_id_contract!(TaskId, "task");
    assert_id_contract!(SequenceId, "se");
    assert_id_contract!(ImageId, "im");
    assert_id_contract!(AppId, "app");
    assert_id_contract!(LabelId, "l");
}

#[test]
fn display_uses_lowercase_hex() {
    assert_eq!(ProjectId::new(0xABCDEF).to_string(), "p-abcdef");
    assert_eq!(DatasetId::new(u64::MAX).to_string(), "ds-ffffffffffffffff");
    assert_eq!(TaskId::new(0).to_string(), "task-0");
}

#[test]
fn parse_accepts_uppercase_hex() {
    let id: ProjectId = "p-ABC".parse().expect("parse");
    assert_eq!(id.get(), 0xabc);
}

#[test]
fn parse_rejects_wrong_prefix() {
    let err = "ds-10".parse::<ProjectId>().expect_err("wrong prefix");
    assert_eq!(err.kind(), ClientErrorKind::InvalidParameters);
    let err = ProjectId::try_from("exp-10").expect_err("wrong prefix");
    assert_eq!(err.kind(), ClientErrorKind::InvalidParameters);
}

#[test]
fn parse_rejects_malformed_bodies() {
    for text in ["p-", "p10", "p-xyz", "p-+10", "p--1", "p-10000000000000000", "", "p"] {
        assert!(text.parse::<ProjectId>().is_err(), "accepted {text:?}");
    }
}

#[test]
fn prefixes_do_not_shadow_each_other() {
    assert!("s-1".parse::<SnapshotId>().is_err());
    assert!("ss-1".parse::<SampleId>().is_err());
    assert!("t-1".parse::<TaskId>().is_err());
    assert!("task-1".parse::<TrainingSessionId>().is_err());
}

#[test]
fn equal_ids_collapse_in_hash_sets() {
    let ids: HashSet<ExperimentId> =
        [1_u64, 2, 1, 3, 2].into_iter().map(ExperimentId::new).collect();
    assert_eq!(ids.len(), 3);
}

#[test]
fn ordering_follows_numeric_value() {
    let mut ids = vec![DatasetId::new(9), DatasetId::new(1), DatasetId::new(5)];
    ids.sort();
    assert_eq!(ids, vec![DatasetId::new(1), DatasetId::new(5), DatasetId::new(9)]);
}

#[test]
fn conversions_round_trip_raw_values() {
    let id = AppId::from(77_u64);
    assert_eq!(u64::from(id), 77);
    assert_eq!(AppId::prefix(), "app");
}

#[test]
fn debug_names_the_kind() {
    assert_eq!(format!("{:?}", ProjectId::new(3)), "ProjectId(3)");
    assert_eq!(format!("{:?}", ValidationSessionId::new(3)), "ValidationSessionId(3)");
}
