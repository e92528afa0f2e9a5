//! Convenience re-exports for the common declaration-and-marshal workflow.
//!
//! ```
//! use wirerecord::prelude::*;
//! ```

pub use crate::attribute::{Attribute, KeyRole};
pub use crate::errors::{WirerecordError, WirerecordResult};
pub use crate::item::Item;
pub use crate::marshal::{
    BooleanMarshaler, DateMarshaler, DateTimeMarshaler, FloatMarshaler, IntegerMarshaler,
    ListMarshaler, ListOptions, MapMarshaler, MapOptions, Marshaler, MarshalerRef,
    NumericSetMarshaler, StringMarshaler, StringSetMarshaler,
};
pub use crate::registry::{AttrConfig, Registry, RegistryBuilder, RESERVED_NAMES};
pub use crate::value::{Number, Value};
pub use crate::wire::{WireType, WireValue};
