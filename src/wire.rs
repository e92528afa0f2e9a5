//! Wire type tags and wire-typed values.
//!
//! A schema-flexible key-value store encodes every persisted value under one
//! of a fixed set of type tags. Persistence collaborators build their typed
//! put/update/query requests from [`WireType`] tags and [`WireValue`]s and
//! must never receive anything outside this vocabulary.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::errors::{WirerecordError, WirerecordResult};
use crate::value::Value;

/// Output format for dates on the wire.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// The wire store's native value encodings.
///
/// `AsRef<str>` and `Display` render the exact wire tokens (`"S"`, `"N"`,
/// `"B"`, `"BOOL"`, `"SS"`, `"NS"`, `"BS"`, `"M"`, `"L"`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
pub enum WireType {
    /// String
    S,
    /// Number (decimal string on the wire)
    N,
    /// Binary
    B,
    /// Boolean
    #[strum(serialize = "BOOL")]
    Bool,
    /// String set
    #[strum(serialize = "SS")]
    Ss,
    /// Number set
    #[strum(serialize = "NS")]
    Ns,
    /// Binary set
    #[strum(serialize = "BS")]
    Bs,
    /// Map
    M,
    /// List
    L,
}

/// A value in its typed wire representation.
///
/// Numbers travel as canonical decimal strings, as the wire store requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireValue {
    S(String),
    N(String),
    B(Vec<u8>),
    Bool(bool),
    Ss(BTreeSet<String>),
    Ns(BTreeSet<String>),
    Bs(BTreeSet<Vec<u8>>),
    M(BTreeMap<String, WireValue>),
    L(Vec<WireValue>),
}

impl WireValue {
    pub fn wire_type(&self) -> WireType {
        match self {
            WireValue::S(_) => WireType::S,
            WireValue::N(_) => WireType::N,
            WireValue::B(_) => WireType::B,
            WireValue::Bool(_) => WireType::Bool,
            WireValue::Ss(_) => WireType::Ss,
            WireValue::Ns(_) => WireType::Ns,
            WireValue::Bs(_) => WireType::Bs,
            WireValue::M(_) => WireType::M,
            WireValue::L(_) => WireType::L,
        }
    }

    /// Convert an already-cast domain value into its wire form.
    ///
    /// This is the recursive conversion used for the heterogeneous elements
    /// of list and map values. The vocabulary has no NULL tag and the store
    /// cannot persist empty sets, so both are refused here.
    pub fn from_value(value: &Value) -> WirerecordResult<WireValue> {
        match value {
            Value::Nil => Err(WirerecordError::TypeMismatch(
                "nil cannot be represented as a wire value".to_string(),
            )),
            Value::Bool(b) => Ok(WireValue::Bool(*b)),
            Value::Int(i) => Ok(WireValue::N(i.to_string())),
            Value::Float(f) if !f.is_finite() => Err(nonfinite_number_error(&f.to_string())),
            Value::Float(f) => Ok(WireValue::N(f.to_string())),
            Value::Str(s) => Ok(WireValue::S(s.clone())),
            Value::Bytes(b) => Ok(WireValue::B(b.clone())),
            Value::Date(d) => Ok(WireValue::S(d.format(DATE_FORMAT).to_string())),
            Value::DateTime(dt) => Ok(WireValue::S(dt.to_rfc3339())),
            Value::List(items) => Ok(WireValue::L(
                items.iter().map(WireValue::from_value).collect::<WirerecordResult<_>>()?,
            )),
            Value::Map(entries) => {
                let mut wire = BTreeMap::new();
                for (key, entry) in entries {
                    wire.insert(key.clone(), WireValue::from_value(entry)?);
                }
                Ok(WireValue::M(wire))
            }
            Value::StringSet(set) => {
                if set.is_empty() {
                    return Err(empty_set_error("string"));
                }
                Ok(WireValue::Ss(set.clone()))
            }
            Value::NumberSet(set) => {
                if set.is_empty() {
                    return Err(empty_set_error("number"));
                }
                if let Some(bad) = set.iter().find(|n| !n.is_finite()) {
                    return Err(nonfinite_number_error(&bad.to_wire_string()));
                }
                Ok(WireValue::Ns(set.iter().map(|n| n.to_wire_string()).collect()))
            }
        }
    }
}

/// The `N` wire type holds canonical decimal strings; NaN and the infinities
/// have no such rendering.
pub(crate) fn nonfinite_number_error(rendered: &str) -> WirerecordError {
    WirerecordError::TypeMismatch(format!(
        "{rendered} is not representable as a wire number"
    ))
}

fn empty_set_error(kind: &str) -> WirerecordError {
    WirerecordError::TypeMismatch(format!(
        "an empty {kind} set cannot be represented as a wire value"
    ))
}
