// crates/studio-core/src/parameter.rs
// ============================================================================
// Module: Studio Parameter Values
// Description: Recursive schema-free value for hyperparameters, metrics and metadata.
// Purpose: Exchange arbitrary structured configuration with the Studio service.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`Parameter`] is a closed recursive sum type: integer, real, boolean,
//! string, array and string-keyed object. It is a tree; the owned `Vec` and
//! `BTreeMap` payloads make cycles unrepresentable.
//!
//! Equality is structural and follows IEEE semantics for reals, so a
//! `Real(NaN)` is not equal to itself. That mirrors how the service compares
//! metric values and is intentional. `Parameter` therefore implements
//! `PartialEq` but not `Eq`. Hashing agrees with equality: `-0.0` and `0.0`
//! compare equal and hash identically.
//!
//! On the wire a parameter is plain JSON. JSON has no non-finite numbers, so
//! `NaN` and infinities encode as `null` and only exist in-process.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Parameter
// ============================================================================

/// Schema-free structured value.
///
/// # Invariants
/// - Object keys are unique; key order is not semantically significant.
/// - Array order is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Parameter {
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit float; NaN and infinities are valid payloads.
    Real(f64),
    /// Boolean flag.
    Boolean(bool),
    /// UTF-8 string with unrestricted content.
    String(String),
    /// Ordered sequence of parameters.
    Array(Vec<Self>),
    /// String-keyed mapping of parameters.
    Object(BTreeMap<String, Self>),
}

impl Parameter {
    /// Builds an object parameter from key/value pairs. Later keys win.
    #[must_use]
    pub fn object<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Self)>,
        K: Into<String>,
    {
        Self::Object(entries.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }

    /// Builds an array parameter from values.
    #[must_use]
    pub fn array<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        Self::Array(values.into_iter().collect())
    }

    /// Returns the variant name (`"Integer"`, `"Real"`, ...).
    #[must_use]
    pub const fn variant_type(&self) -> &'static str {
        match self {
            Self::Integer(_) => "Integer",
            Self::Real(_) => "Real",
            Self::Boolean(_) => "Boolean",
            Self::String(_) => "String",
            Self::Array(_) => "Array",
            Self::Object(_) => "Object",
        }
    }

    /// Returns the integer payload.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the numeric payload, widening integers to reals.
    #[must_use]
    #[allow(clippy::cast_precision_loss, reason = "Integer widening to f64 is the documented behavior.")]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Real(value) => Some(*value),
            Self::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Returns the boolean payload.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string payload.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the array payload.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the object payload.
    #[must_use]
    pub const fn as_object(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns whether the value is truthy.
    ///
    /// Zero, `0.0`, NaN, `false` and empty strings, arrays and objects are falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Integer(value) => *value != 0,
            Self::Real(value) => *value != 0.0 && !value.is_nan(),
            Self::Boolean(value) => *value,
            Self::String(value) => !value.is_empty(),
            Self::Array(values) => !values.is_empty(),
            Self::Object(entries) => !entries.is_empty(),
        }
    }
}

impl Hash for Parameter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Integer(value) => value.hash(state),
            Self::Real(value) => hash_f64(*value, state),
            Self::Boolean(value) => value.hash(state),
            Self::String(value) => value.hash(state),
            Self::Array(values) => values.hash(state),
            Self::Object(entries) => entries.hash(state),
        }
    }
}

/// Hashes a float so that values comparing equal hash identically.
pub(crate) fn hash_f64<H: Hasher>(value: f64, state: &mut H) {
    let normalized = if value == 0.0 { 0.0_f64 } else { value };
    normalized.to_bits().hash(state);
}

/// Hashes an `f32` so that values comparing equal hash identically.
pub(crate) fn hash_f32<H: Hasher>(value: f32, state: &mut H) {
    let normalized = if value == 0.0 { 0.0_f32 } else { value };
    normalized.to_bits().hash(state);
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "Integer({value})"),
            Self::Real(value) => write!(f, "Real({value})"),
            Self::Boolean(value) => write!(f, "Boolean({value})"),
            Self::String(value) => write!(f, "String({value})"),
            Self::Array(values) => {
                f.write_str("Array([")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("])")
            }
            Self::Object(entries) => {
                f.write_str("Object({")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("})")
            }
        }
    }
}

// ============================================================================
// SECTION: Conversions
// ============================================================================

impl From<i64> for Parameter {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Parameter {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for Parameter {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for Parameter {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Parameter {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Self>> for Parameter {
    fn from(values: Vec<Self>) -> Self {
        Self::Array(values)
    }
}

impl From<BTreeMap<String, Self>> for Parameter {
    fn from(entries: BTreeMap<String, Self>) -> Self {
        Self::Object(entries)
    }
}
