//! Marshalers: codecs between raw model values and typed wire values.
//!
//! Each marshaler is a stateless codec with exactly two pure operations:
//!
//! - `type_cast` maps a raw value onto the canonical domain value for its
//!   type. Casting is idempotent (casting an already-cast value returns it
//!   unchanged) and nil-preserving, except for collection marshalers
//!   configured to coerce nil into an empty collection.
//! - `serialize` first applies `type_cast`, then converts the domain value
//!   into its typed wire representation. `Ok(None)` means there is nothing
//!   to persist (nil, or an empty set).
//!
//! The built-in variants cover the wire store's whole tag vocabulary.
//! Applications may implement [`Marshaler`] themselves and pass an
//! `Arc<dyn Marshaler>` to a generic attribute declaration.

use std::fmt::Debug;
use std::sync::Arc;

use crate::errors::{WirerecordError, WirerecordResult};
use crate::value::Value;
use crate::wire::WireValue;

mod collection;
mod scalar;
mod temporal;

pub use collection::{
    ListMarshaler, ListOptions, MapMarshaler, MapOptions, NumericSetMarshaler, StringSetMarshaler,
};
pub use scalar::{BooleanMarshaler, FloatMarshaler, IntegerMarshaler, StringMarshaler};
pub use temporal::{DateMarshaler, DateTimeMarshaler};

/// A codec between raw model values and typed wire values.
///
/// Both operations are pure and side-effect-free; implementations must not
/// block or perform I/O.
pub trait Marshaler: Debug + Send + Sync {
    /// Cast a raw value into the canonical domain value for this type.
    fn type_cast(&self, raw: &Value) -> WirerecordResult<Value>;

    /// Cast, then convert into the wire-typed representation.
    fn serialize(&self, raw: &Value) -> WirerecordResult<Option<WireValue>>;
}

/// Shared handle to a marshaler, as stored on an attribute.
pub type MarshalerRef = Arc<dyn Marshaler>;

pub(crate) fn type_mismatch(expected: &str, got: &Value) -> WirerecordError {
    WirerecordError::TypeMismatch(format!("cannot cast {} into {expected}", got.type_name()))
}

/// Render a scalar as a string, or `None` if the value is not a scalar.
///
/// Used by the string marshaler and by string-set element coercion.
pub(crate) fn stringify_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::Int(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Str(s) => Some(s.clone()),
        Value::Date(d) => Some(d.format(crate::wire::DATE_FORMAT).to_string()),
        Value::DateTime(dt) => Some(dt.to_rfc3339()),
        _ => None,
    }
}
