//! Attribute declaration and the per-model registry.
//!
//! A model type declares its attributes on a [`RegistryBuilder`] and seals
//! the result with [`RegistryBuilder::build`]. The builder is the only
//! mutable state in the crate: once built, a [`Registry`] is immutable and
//! safe for unsynchronized concurrent reads, so a model type can hold it in
//! a `static`/`Arc` and share it freely.
//!
//! Declaration is a load-time activity. Complete all declarations before
//! exposing the model type to other threads; the consuming `build()` makes
//! late declarations unrepresentable.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use typed_builder::TypedBuilder;

use crate::attribute::{Attribute, KeyRole};
use crate::errors::{WirerecordError, WirerecordResult};
use crate::marshal::{
    BooleanMarshaler, DateMarshaler, DateTimeMarshaler, FloatMarshaler, IntegerMarshaler,
    ListMarshaler, ListOptions, MapMarshaler, MapOptions, MarshalerRef, NumericSetMarshaler,
    StringMarshaler, StringSetMarshaler,
};
use crate::wire::WireType;

/// Instance-level operation names every registry reserves.
///
/// A declared attribute name must not shadow the generic accessor surface of
/// an item, or the storage-name of the registry handle itself.
pub const RESERVED_NAMES: &[&str] = &[
    "read_attribute",
    "write_attribute",
    "to_h",
    "to_wire",
    "key_values",
    "registry",
];

/// Per-declaration configuration.
///
/// # Examples
///
/// ```
/// use wirerecord::registry::AttrConfig;
///
/// let config = AttrConfig::builder()
///     .database_attribute_name("PostId")
///     .range_key(true)
///     .build();
/// assert_eq!(config.database_attribute_name.as_deref(), Some("PostId"));
/// ```
#[derive(Debug, Clone, Default, TypedBuilder)]
#[builder(doc)]
pub struct AttrConfig {
    /// Override the externally persisted field name
    #[builder(default, setter(strip_option, into))]
    pub database_attribute_name: Option<String>,

    /// Wire type tag for a generic declaration (presets fix their own)
    #[builder(default, setter(strip_option))]
    pub wire_type: Option<WireType>,

    /// Designate this attribute as the hash key
    #[builder(default = false)]
    pub hash_key: bool,

    /// Designate this attribute as the range key
    #[builder(default = false)]
    pub range_key: bool,

    /// Override the mutation-tracking flag
    #[builder(default, setter(strip_option))]
    pub mutation_tracking: Option<bool>,
}

/// Builds a model's [`Registry`], validating every declaration.
///
/// # Examples
///
/// ```
/// use wirerecord::prelude::*;
///
/// # fn main() -> WirerecordResult<()> {
/// let registry = Registry::builder()
///     .string_attr("uuid", AttrConfig::builder().hash_key(true).build())?
///     .integer_attr("post_id", AttrConfig::builder().range_key(true).build())?
///     .string_set_attr("tags", AttrConfig::default())?
///     .build();
///
/// assert!(registry.hash_key().is_some());
/// assert!(registry.track_mutations("tags"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RegistryBuilder {
    attributes: BTreeMap<String, Attribute>,
    storage_names: BTreeMap<String, String>,
    hash_key: Option<String>,
    range_key: Option<String>,
    track_mutations: bool,
    reserved: BTreeSet<String>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            attributes: BTreeMap::new(),
            storage_names: BTreeMap::new(),
            hash_key: None,
            range_key: None,
            track_mutations: true,
            reserved: RESERVED_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Disable mutation tracking for the whole model. Per-attribute flags
    /// are kept but `Registry::track_mutations` reports false for everything.
    pub fn disable_mutation_tracking(mut self) -> Self {
        self.track_mutations = false;
        self
    }

    pub fn enable_mutation_tracking(mut self) -> Self {
        self.track_mutations = true;
        self
    }

    /// Reserve additional instance-level operation names.
    ///
    /// Models that expose their own methods next to the generic accessors
    /// register them here so a later declaration cannot shadow them.
    pub fn reserve_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved.extend(names.into_iter().map(Into::into));
        self
    }

    /// Declare an attribute with an explicit marshaler.
    ///
    /// The wire type tag is taken from `config.wire_type`, defaulting to
    /// `S`. This is the escape hatch for application-defined marshalers;
    /// the typed presets below cover the built-in types.
    pub fn attr(
        self,
        name: &str,
        marshaler: MarshalerRef,
        config: AttrConfig,
    ) -> WirerecordResult<Self> {
        let wire_type = config.wire_type.unwrap_or(WireType::S);
        self.declare(name, marshaler, wire_type, false, config)
    }

    /// Declare a string attribute (wire type `S`).
    pub fn string_attr(self, name: &str, config: AttrConfig) -> WirerecordResult<Self> {
        self.declare(name, Arc::new(StringMarshaler), WireType::S, false, config)
    }

    /// Declare a boolean attribute (wire type `BOOL`).
    pub fn boolean_attr(self, name: &str, config: AttrConfig) -> WirerecordResult<Self> {
        self.declare(name, Arc::new(BooleanMarshaler), WireType::Bool, false, config)
    }

    /// Declare an integer attribute (wire type `N`).
    pub fn integer_attr(self, name: &str, config: AttrConfig) -> WirerecordResult<Self> {
        self.declare(name, Arc::new(IntegerMarshaler), WireType::N, false, config)
    }

    /// Declare a float attribute (wire type `N`).
    pub fn float_attr(self, name: &str, config: AttrConfig) -> WirerecordResult<Self> {
        self.declare(name, Arc::new(FloatMarshaler), WireType::N, false, config)
    }

    /// Declare a calendar-date attribute (wire type `S`, `YYYY-MM-DD`).
    pub fn date_attr(self, name: &str, config: AttrConfig) -> WirerecordResult<Self> {
        self.declare(name, Arc::new(DateMarshaler), WireType::S, false, config)
    }

    /// Declare a datetime attribute (wire type `S`, RFC 3339).
    pub fn datetime_attr(self, name: &str, config: AttrConfig) -> WirerecordResult<Self> {
        self.declare(name, Arc::new(DateTimeMarshaler), WireType::S, false, config)
    }

    /// Declare a list attribute (wire type `L`). Mutation tracking defaults
    /// to true unless the config overrides it.
    pub fn list_attr(
        self,
        name: &str,
        options: ListOptions,
        config: AttrConfig,
    ) -> WirerecordResult<Self> {
        self.declare(name, Arc::new(ListMarshaler::new(options)), WireType::L, true, config)
    }

    /// Declare a map attribute (wire type `M`). Mutation tracking defaults
    /// to true unless the config overrides it.
    pub fn map_attr(
        self,
        name: &str,
        options: MapOptions,
        config: AttrConfig,
    ) -> WirerecordResult<Self> {
        self.declare(name, Arc::new(MapMarshaler::new(options)), WireType::M, true, config)
    }

    /// Declare a string-set attribute (wire type `SS`). Mutation tracking
    /// defaults to true unless the config overrides it.
    pub fn string_set_attr(self, name: &str, config: AttrConfig) -> WirerecordResult<Self> {
        self.declare(name, Arc::new(StringSetMarshaler), WireType::Ss, true, config)
    }

    /// Declare a numeric-set attribute (wire type `NS`). Mutation tracking
    /// defaults to true unless the config overrides it.
    pub fn numeric_set_attr(self, name: &str, config: AttrConfig) -> WirerecordResult<Self> {
        self.declare(name, Arc::new(NumericSetMarshaler), WireType::Ns, true, config)
    }

    /// Seal the registry. No further declarations are possible.
    pub fn build(self) -> Registry {
        log::debug!("sealed registry with {} attributes", self.attributes.len());
        Registry {
            attributes: self.attributes,
            storage_names: self.storage_names,
            hash_key: self.hash_key,
            range_key: self.range_key,
            track_mutations: self.track_mutations,
        }
    }

    fn declare(
        mut self,
        name: &str,
        marshaler: MarshalerRef,
        wire_type: WireType,
        default_mutation_tracking: bool,
        config: AttrConfig,
    ) -> WirerecordResult<Self> {
        if !is_identifier(name) {
            return Err(WirerecordError::Configuration(format!(
                "`{name}` is not a valid attribute identifier"
            )));
        }
        if self.attributes.contains_key(name) {
            return Err(WirerecordError::NameCollision(format!(
                "attribute `{name}` is already declared"
            )));
        }

        let database_name = config
            .database_attribute_name
            .clone()
            .unwrap_or_else(|| name.to_string());
        if self.storage_names.contains_key(&database_name) {
            return Err(WirerecordError::NameCollision(format!(
                "storage name `{database_name}` is already in use"
            )));
        }
        if database_name != name && self.attributes.contains_key(&database_name) {
            return Err(WirerecordError::NameCollision(format!(
                "storage name `{database_name}` collides with the attribute of the same name"
            )));
        }
        if self.storage_names.contains_key(name) {
            return Err(WirerecordError::NameCollision(format!(
                "attribute `{name}` collides with an existing storage name"
            )));
        }

        if self.reserved.contains(name) {
            return Err(WirerecordError::ReservedName(format!(
                "`{name}` would shadow an instance-level operation"
            )));
        }

        if config.hash_key && config.range_key {
            return Err(WirerecordError::Configuration(format!(
                "attribute `{name}` cannot be both the hash key and the range key"
            )));
        }
        let key_role = if config.hash_key {
            if let Some(existing) = &self.hash_key {
                return Err(WirerecordError::Configuration(format!(
                    "hash key is already declared as `{existing}`"
                )));
            }
            Some(KeyRole::Hash)
        } else if config.range_key {
            if let Some(existing) = &self.range_key {
                return Err(WirerecordError::Configuration(format!(
                    "range key is already declared as `{existing}`"
                )));
            }
            Some(KeyRole::Range)
        } else {
            None
        };

        let mutation_tracking = config.mutation_tracking.unwrap_or(default_mutation_tracking);

        log::debug!(
            "declared attribute `{name}` (storage name `{database_name}`, wire type {wire_type})"
        );
        match key_role {
            Some(KeyRole::Hash) => self.hash_key = Some(name.to_string()),
            Some(KeyRole::Range) => self.range_key = Some(name.to_string()),
            None => {}
        }
        self.storage_names.insert(database_name.clone(), name.to_string());
        self.attributes.insert(
            name.to_string(),
            Attribute::new(
                name.to_string(),
                database_name,
                marshaler,
                wire_type,
                key_role,
                mutation_tracking,
            ),
        );
        Ok(self)
    }
}

/// A model type's sealed attribute registry.
///
/// Read-only: hand out `Arc<Registry>` clones to instances and persistence
/// collaborators.
#[derive(Debug, Clone)]
pub struct Registry {
    attributes: BTreeMap<String, Attribute>,
    storage_names: BTreeMap<String, String>,
    hash_key: Option<String>,
    range_key: Option<String>,
    track_mutations: bool,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// All declared attributes, keyed by name.
    pub fn attributes(&self) -> &BTreeMap<String, Attribute> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Reverse index from storage name to attribute name.
    pub fn storage_attributes(&self) -> &BTreeMap<String, String> {
        &self.storage_names
    }

    /// Resolve an attribute by its externally persisted field name.
    pub fn attribute_for_storage_name(&self, database_name: &str) -> Option<&Attribute> {
        self.storage_names
            .get(database_name)
            .and_then(|name| self.attributes.get(name))
    }

    pub fn hash_key(&self) -> Option<&Attribute> {
        self.hash_key.as_deref().and_then(|name| self.attributes.get(name))
    }

    pub fn range_key(&self) -> Option<&Attribute> {
        self.range_key.as_deref().and_then(|name| self.attributes.get(name))
    }

    /// Key roles to attribute names.
    pub fn keys(&self) -> BTreeMap<KeyRole, &str> {
        let mut keys = BTreeMap::new();
        if let Some(name) = &self.hash_key {
            keys.insert(KeyRole::Hash, name.as_str());
        }
        if let Some(name) = &self.range_key {
            keys.insert(KeyRole::Range, name.as_str());
        }
        keys
    }

    /// True only if the model tracks mutations globally AND the named
    /// attribute enables it.
    pub fn track_mutations(&self, name: &str) -> bool {
        self.track_mutations
            && self
                .attributes
                .get(name)
                .is_some_and(Attribute::mutation_tracking)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_validation() {
        assert!(is_identifier("created_at"));
        assert!(is_identifier("_hidden"));
        assert!(is_identifier("v2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("9lives"));
        assert!(!is_identifier("has space"));
        assert!(!is_identifier("with-dash"));
    }

    #[test]
    fn test_storage_name_defaults_to_name() {
        let registry = Registry::builder()
            .string_attr("title", AttrConfig::default())
            .unwrap()
            .build();
        assert_eq!(registry.attribute("title").unwrap().database_name(), "title");
        assert_eq!(registry.storage_attributes().get("title").unwrap(), "title");
    }
}
