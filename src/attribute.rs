//! Attribute metadata.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

use crate::errors::WirerecordResult;
use crate::marshal::MarshalerRef;
use crate::value::Value;
use crate::wire::{WireType, WireValue};

/// The role an attribute plays in the store's primary key.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
)]
pub enum KeyRole {
    #[strum(serialize = "hash")]
    Hash,
    #[strum(serialize = "range")]
    Range,
}

/// Immutable metadata for one declared attribute.
///
/// An attribute binds a name to a marshaler, a wire type tag, an optional
/// key role and a mutation-tracking flag. Attributes are constructed by the
/// registry builder and never change afterwards.
#[derive(Debug, Clone)]
pub struct Attribute {
    name: String,
    database_name: String,
    marshaler: MarshalerRef,
    wire_type: WireType,
    key_role: Option<KeyRole>,
    mutation_tracking: bool,
}

impl Attribute {
    pub(crate) fn new(
        name: String,
        database_name: String,
        marshaler: MarshalerRef,
        wire_type: WireType,
        key_role: Option<KeyRole>,
        mutation_tracking: bool,
    ) -> Self {
        Self {
            name,
            database_name,
            marshaler,
            wire_type,
            key_role,
            mutation_tracking,
        }
    }

    /// The in-model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The externally persisted field name.
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    pub fn marshaler(&self) -> &MarshalerRef {
        &self.marshaler
    }

    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    pub fn key_role(&self) -> Option<KeyRole> {
        self.key_role
    }

    pub fn is_hash_key(&self) -> bool {
        self.key_role == Some(KeyRole::Hash)
    }

    pub fn is_range_key(&self) -> bool {
        self.key_role == Some(KeyRole::Range)
    }

    /// Whether in-place mutation of this attribute's value should be
    /// observable for dirty-state detection. The diffing itself is the
    /// collaborator's business; only the flag lives here.
    pub fn mutation_tracking(&self) -> bool {
        self.mutation_tracking
    }

    /// Cast a raw value through this attribute's marshaler.
    pub fn type_cast(&self, raw: &Value) -> WirerecordResult<Value> {
        self.marshaler.type_cast(raw)
    }

    /// Serialize a raw value through this attribute's marshaler.
    pub fn serialize(&self, raw: &Value) -> WirerecordResult<Option<WireValue>> {
        self.marshaler.serialize(raw)
    }
}
