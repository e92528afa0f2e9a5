//! The per-instance raw-value store.
//!
//! An [`Item`] holds raw values exactly as the caller supplied them. Writes
//! never cast; reads cast through the bound attribute's marshaler on every
//! call, so storing an out-of-type value does not fail until it is read or
//! serialized. Each item is owned exclusively by its instance; writing takes
//! `&mut self`, so shared cross-thread mutation is unrepresentable without
//! external synchronization.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::errors::{WirerecordError, WirerecordResult};
use crate::registry::Registry;
use crate::value::Value;
use crate::wire::WireValue;

/// One model instance's attribute values.
#[derive(Debug, Clone)]
pub struct Item {
    registry: Arc<Registry>,
    values: BTreeMap<String, Value>,
}

impl Item {
    /// Create an empty item bound to a sealed registry.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            values: BTreeMap::new(),
        }
    }

    /// Create an item from initial values, routed through the write path.
    pub fn with_values<I, K, V>(registry: Arc<Registry>, values: I) -> WirerecordResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut item = Self::new(registry);
        for (name, value) in values {
            item.write_attribute(name.as_ref(), value)?;
        }
        Ok(item)
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Read an attribute as its domain value.
    ///
    /// An absent raw value reads as nil (before the cast, so a collection
    /// marshaler configured with nil coercion yields its empty collection).
    /// The cast is not memoized; every read re-casts the stored raw value.
    pub fn read_attribute(&self, name: &str) -> WirerecordResult<Value> {
        let attribute = self
            .registry
            .attribute(name)
            .ok_or_else(|| unknown_attribute(name))?;
        let nil = Value::Nil;
        attribute.type_cast(self.values.get(name).unwrap_or(&nil))
    }

    /// Store a raw value verbatim, without casting.
    pub fn write_attribute(&mut self, name: &str, value: impl Into<Value>) -> WirerecordResult<()> {
        if self.registry.attribute(name).is_none() {
            return Err(unknown_attribute(name));
        }
        self.values.insert(name.to_string(), value.into());
        Ok(())
    }

    /// A shallow snapshot of the raw store. Mutating the returned map does
    /// not affect this item.
    pub fn to_h(&self) -> BTreeMap<String, Value> {
        self.values.clone()
    }

    /// Serialize every attribute to its wire form, keyed by storage name.
    ///
    /// Attributes whose serialize yields nothing (nil values, empty sets)
    /// are omitted, as the wire store cannot persist them.
    pub fn to_wire(&self) -> WirerecordResult<BTreeMap<String, WireValue>> {
        let nil = Value::Nil;
        let mut wire = BTreeMap::new();
        for (name, attribute) in self.registry.attributes() {
            let raw = self.values.get(name).unwrap_or(&nil);
            if let Some(value) = attribute.serialize(raw)? {
                wire.insert(attribute.database_name().to_string(), value);
            }
        }
        Ok(wire)
    }

    /// Serialize the key attributes, keyed by storage name.
    ///
    /// Every declared key must serialize to a value; a key attribute whose
    /// value is nil cannot address an item in the store.
    pub fn key_values(&self) -> WirerecordResult<BTreeMap<String, WireValue>> {
        let nil = Value::Nil;
        let mut keys = BTreeMap::new();
        for attribute in [self.registry.hash_key(), self.registry.range_key()]
            .into_iter()
            .flatten()
        {
            let raw = self.values.get(attribute.name()).unwrap_or(&nil);
            match attribute.serialize(raw)? {
                Some(value) => {
                    keys.insert(attribute.database_name().to_string(), value);
                }
                None => {
                    return Err(WirerecordError::TypeMismatch(format!(
                        "key attribute `{}` has no serializable value",
                        attribute.name()
                    )));
                }
            }
        }
        Ok(keys)
    }
}

fn unknown_attribute(name: &str) -> WirerecordError {
    WirerecordError::UnknownAttribute(format!("`{name}` is not declared on this model"))
}
