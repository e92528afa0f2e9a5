//! Collection marshalers: list, map, string set, numeric set.

use std::collections::{BTreeMap, BTreeSet};

use typed_builder::TypedBuilder;

use crate::errors::WirerecordResult;
use crate::value::{Number, Value};
use crate::wire::{WireValue, nonfinite_number_error};

use super::{Marshaler, stringify_scalar, type_mismatch};

/// Options for [`ListMarshaler`].
///
/// # Examples
///
/// ```
/// use wirerecord::marshal::ListOptions;
///
/// let options = ListOptions::builder().nil_as_empty_list(true).build();
/// assert!(options.nil_as_empty_list);
/// ```
#[derive(Debug, Clone, Copy, Default, TypedBuilder)]
#[builder(doc)]
pub struct ListOptions {
    /// Cast nil to an empty list instead of preserving it
    #[builder(default = false)]
    pub nil_as_empty_list: bool,
}

/// Marshals heterogeneous ordered sequences (wire type `L`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ListMarshaler {
    options: ListOptions,
}

impl ListMarshaler {
    pub fn new(options: ListOptions) -> Self {
        Self { options }
    }
}

impl Marshaler for ListMarshaler {
    fn type_cast(&self, raw: &Value) -> WirerecordResult<Value> {
        match raw {
            Value::Nil if self.options.nil_as_empty_list => Ok(Value::List(Vec::new())),
            Value::Nil => Ok(Value::Nil),
            Value::List(items) => Ok(Value::List(items.clone())),
            other => Err(type_mismatch("list", other)),
        }
    }

    fn serialize(&self, raw: &Value) -> WirerecordResult<Option<WireValue>> {
        match self.type_cast(raw)? {
            Value::Nil => Ok(None),
            Value::List(items) => Ok(Some(WireValue::L(
                items.iter().map(WireValue::from_value).collect::<WirerecordResult<_>>()?,
            ))),
            cast => Err(type_mismatch("list", &cast)),
        }
    }
}

/// Options for [`MapMarshaler`].
#[derive(Debug, Clone, Copy, Default, TypedBuilder)]
#[builder(doc)]
pub struct MapOptions {
    /// Cast nil to an empty map instead of preserving it
    #[builder(default = false)]
    pub nil_as_empty_map: bool,
}

/// Marshals heterogeneous key/value mappings (wire type `M`).
#[derive(Debug, Clone, Copy, Default)]
pub struct MapMarshaler {
    options: MapOptions,
}

impl MapMarshaler {
    pub fn new(options: MapOptions) -> Self {
        Self { options }
    }
}

impl Marshaler for MapMarshaler {
    fn type_cast(&self, raw: &Value) -> WirerecordResult<Value> {
        match raw {
            Value::Nil if self.options.nil_as_empty_map => Ok(Value::Map(BTreeMap::new())),
            Value::Nil => Ok(Value::Nil),
            Value::Map(entries) => Ok(Value::Map(entries.clone())),
            other => Err(type_mismatch("map", other)),
        }
    }

    fn serialize(&self, raw: &Value) -> WirerecordResult<Option<WireValue>> {
        match self.type_cast(raw)? {
            Value::Nil => Ok(None),
            Value::Map(entries) => {
                let mut wire = BTreeMap::new();
                for (key, entry) in &entries {
                    wire.insert(key.clone(), WireValue::from_value(entry)?);
                }
                Ok(Some(WireValue::M(wire)))
            }
            cast => Err(type_mismatch("map", &cast)),
        }
    }
}

/// Marshals string sets (wire type `SS`).
///
/// Nil casts to the empty set, and list input coerces each element to a
/// string. The wire store cannot persist empty sets, so an empty set
/// serializes to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringSetMarshaler;

impl Marshaler for StringSetMarshaler {
    fn type_cast(&self, raw: &Value) -> WirerecordResult<Value> {
        match raw {
            Value::Nil => Ok(Value::StringSet(BTreeSet::new())),
            Value::StringSet(set) => Ok(Value::StringSet(set.clone())),
            Value::NumberSet(set) => Ok(Value::StringSet(
                set.iter().map(|n| n.to_wire_string()).collect(),
            )),
            Value::List(items) => {
                let mut set = BTreeSet::new();
                for item in items {
                    let element = stringify_scalar(item)
                        .ok_or_else(|| type_mismatch("string set element", item))?;
                    set.insert(element);
                }
                Ok(Value::StringSet(set))
            }
            other => Err(type_mismatch("string set", other)),
        }
    }

    fn serialize(&self, raw: &Value) -> WirerecordResult<Option<WireValue>> {
        match self.type_cast(raw)? {
            Value::StringSet(set) if set.is_empty() => Ok(None),
            Value::StringSet(set) => Ok(Some(WireValue::Ss(set))),
            cast => Err(type_mismatch("string set", &cast)),
        }
    }
}

/// Marshals numeric sets (wire type `NS`).
///
/// Nil casts to the empty set; elements coerce to [`Number`], parsing
/// numeric strings. An empty set serializes to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericSetMarshaler;

impl Marshaler for NumericSetMarshaler {
    fn type_cast(&self, raw: &Value) -> WirerecordResult<Value> {
        match raw {
            Value::Nil => Ok(Value::NumberSet(BTreeSet::new())),
            Value::NumberSet(set) => Ok(Value::NumberSet(set.clone())),
            Value::StringSet(set) => {
                let mut numbers = BTreeSet::new();
                for element in set {
                    numbers.insert(element.parse::<Number>()?);
                }
                Ok(Value::NumberSet(numbers))
            }
            Value::List(items) => {
                let mut numbers = BTreeSet::new();
                for item in items {
                    numbers.insert(coerce_number(item)?);
                }
                Ok(Value::NumberSet(numbers))
            }
            other => Err(type_mismatch("number set", other)),
        }
    }

    fn serialize(&self, raw: &Value) -> WirerecordResult<Option<WireValue>> {
        match self.type_cast(raw)? {
            Value::NumberSet(set) if set.is_empty() => Ok(None),
            Value::NumberSet(set) => {
                if let Some(bad) = set.iter().find(|n| !n.is_finite()) {
                    return Err(nonfinite_number_error(&bad.to_wire_string()));
                }
                Ok(Some(WireValue::Ns(
                    set.iter().map(|n| n.to_wire_string()).collect(),
                )))
            }
            cast => Err(type_mismatch("number set", &cast)),
        }
    }
}

fn coerce_number(value: &Value) -> WirerecordResult<Number> {
    match value {
        Value::Int(i) => Ok(Number::Int(*i)),
        Value::Float(f) => Ok(Number::Float(*f)),
        Value::Str(s) => s.parse(),
        other => Err(type_mismatch("number set element", other)),
    }
}
