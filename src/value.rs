//! Raw and domain values.
//!
//! Models accept loosely typed input (strings for numbers, timestamps for
//! dates, vectors for sets) and marshalers cast it into a canonical domain
//! form. `Value` is the dynamic container both sides share: an instance store
//! holds raw `Value`s verbatim, and a marshaler's `type_cast` maps one
//! `Value` onto the canonical variant for its type.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate};
use derive_more::From;
use serde::{Deserialize, Serialize};

use crate::errors::WirerecordError;

/// A dynamically typed model value.
#[derive(Debug, Clone, PartialEq, From, Serialize, Deserialize)]
pub enum Value {
    #[from(ignore)]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    StringSet(BTreeSet<String>),
    NumberSet(BTreeSet<Number>),
}

impl Value {
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Human-readable type label used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Bytes(_) => "binary",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::StringSet(_) => "string set",
            Value::NumberSet(_) => "number set",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

/// A number as the wire store understands it: either an exact integer or a
/// binary float.
///
/// Unlike `f64`, `Number` has a total order, so numeric sets are
/// well-defined. Integer/integer comparisons are exact; any comparison
/// involving a float goes through `f64::total_cmp`, and numerically equal
/// integers and floats compare equal.
#[derive(Debug, Clone, Copy, From, Serialize, Deserialize)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }

    /// False for NaN and the infinities, which no wire number can carry.
    pub fn is_finite(&self) -> bool {
        match self {
            Number::Int(_) => true,
            Number::Float(f) => f.is_finite(),
        }
    }

    /// Canonical decimal rendering used for the `N` and `NS` wire types.
    pub fn to_wire_string(&self) -> String {
        match self {
            Number::Int(i) => i.to_string(),
            Number::Float(f) => f.to_string(),
        }
    }
}

impl FromStr for Number {
    type Err = WirerecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Ok(Number::Int(i));
        }
        trimmed
            .parse::<f64>()
            .map(Number::Float)
            .map_err(|_| WirerecordError::TypeMismatch(format!("`{s}` is not a number")))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a.cmp(b),
            (a, b) => a.as_f64().total_cmp(&b.as_f64()),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}
