// crates/studio-core/src/identifiers.rs
// ============================================================================
// Module: Studio Identifiers
// Description: Typed numeric identifiers, one distinct type per entity kind.
// Purpose: Keep identifiers of different entities non-interchangeable at compile time.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every Studio entity is addressed by a 64-bit unsigned integer. [`Id`] wraps
//! that integer together with a zero-sized kind tag so a [`ProjectId`] can
//! never be passed where a [`DatasetId`] is expected, even when the numbers
//! match. Identifiers serialize as bare numbers and display in the
//! `{prefix}-{hex}` form the Studio UI uses (`p-1f`, `ds-a0`).
//!
//! Invariants:
//! - `Id<K>(a) == Id<K>(b)` iff `a == b`; hashing and ordering follow the value.
//! - Ids of different kinds have no equality relation at all.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::errors::ClientError;

// ============================================================================
// SECTION: Kind Tags
// ============================================================================

/// Zero-sized tag naming an entity kind.
pub trait IdKind: 'static {
    /// Display prefix placed before the hex value.
    const PREFIX: &'static str;
    /// Human-readable type name used in `Debug` output and errors.
    const NAME: &'static str;
}

/// Declares uninhabited kind tags plus their identifier aliases.
macro_rules! id_kinds {
    ($($(#[$doc:meta])* $kind:ident => $alias:ident, $prefix:literal;)+) => {
        $(
            $(#[$doc])*
            #[derive(Debug)]
            pub enum $kind {}

            impl IdKind for $kind {
                const PREFIX: &'static str = $prefix;
                const NAME: &'static str = stringify!($alias);
            }

            $(#[$doc])*
            pub type $alias = Id<$kind>;
        )+
    };
}

id_kinds! {
    /// Organization identifier.
    OrganizationKind => OrganizationId, "org";
    /// Project identifier.
    ProjectKind => ProjectId, "p";
    /// Dataset identifier.
    DatasetKind => DatasetId, "ds";
    /// Annotation set identifier.
    AnnotationSetKind => AnnotationSetId, "as";
    /// Sample identifier.
    SampleKind => SampleId, "s";
    /// Experiment identifier.
    ExperimentKind => ExperimentId, "exp";
    /// Training session identifier.
    TrainingSessionKind => TrainingSessionId, "t";
    /// Validation session identifier.
    ValidationSessionKind => ValidationSessionId, "v";
    /// Snapshot identifier.
    SnapshotKind => SnapshotId, "ss";
    /// Task identifier.
    TaskKind => TaskId, "task";
    /// Sequence identifier.
    SequenceKind => SequenceId, "se";
    /// Image identifier.
    ImageKind => ImageId, "im";
    /// Application identifier.
    AppKind => AppId, "app";
    /// Label identifier.
    LabelKind => LabelId, "l";
}

// ============================================================================
// SECTION: Identifier
// ============================================================================

/// Numeric identifier scoped to one entity kind.
///
/// # Invariants
/// - Immutable once constructed.
/// - Zero is a valid value; the service decides which values exist.
pub struct Id<K: IdKind> {
    /// Raw identifier value.
    value: u64,
    /// Kind tag; `fn() -> K` keeps the wrapper `Send + Sync` for any tag.
    kind: PhantomData<fn() -> K>,
}

impl<K: IdKind> Id<K> {
    /// Creates an identifier from its raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self {
            value,
            kind: PhantomData,
        }
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.value
    }

    /// Returns the display prefix of this kind.
    #[must_use]
    pub const fn prefix() -> &'static str {
        K::PREFIX
    }
}

impl<K: IdKind> Clone for Id<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: IdKind> Copy for Id<K> {}

impl<K: IdKind> PartialEq for Id<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<K: IdKind> Eq for Id<K> {}

impl<K: IdKind> PartialOrd for Id<K> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: IdKind> Ord for Id<K> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<K: IdKind> Hash for Id<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<K: IdKind> fmt::Debug for Id<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(K::NAME).field(&self.value).finish()
    }
}

impl<K: IdKind> fmt::Display for Id<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:x}", K::PREFIX, self.value)
    }
}

impl<K: IdKind> From<u64> for Id<K> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<K: IdKind> From<Id<K>> for u64 {
    fn from(id: Id<K>) -> Self {
        id.value
    }
}

impl<K: IdKind> FromStr for Id<K> {
    type Err = ClientError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || ClientError::InvalidParameters(format!("invalid {}: {text}", K::NAME));
        let hex = text
            .strip_prefix(K::PREFIX)
            .and_then(|rest| rest.strip_prefix('-'))
            .ok_or_else(invalid)?;
        if hex.is_empty() || !hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        u64::from_str_radix(hex, 16).map(Self::new).map_err(|_| invalid())
    }
}

impl<K: IdKind> TryFrom<&str> for Id<K> {
    type Error = ClientError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl<K: IdKind> Serialize for Id<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.value)
    }
}

impl<'de, K: IdKind> Deserialize<'de> for Id<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(Self::new)
    }
}
