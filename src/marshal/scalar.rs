//! Scalar marshalers: string, boolean, integer, float.

use crate::errors::WirerecordResult;
use crate::value::Value;
use crate::wire::{WireValue, nonfinite_number_error};

use super::{Marshaler, stringify_scalar, type_mismatch};

/// Marshals string attributes (wire type `S`).
///
/// Strings pass through, the empty string casts to nil, and scalar input is
/// stringified. Collections are refused.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringMarshaler;

impl Marshaler for StringMarshaler {
    fn type_cast(&self, raw: &Value) -> WirerecordResult<Value> {
        match raw {
            Value::Nil => Ok(Value::Nil),
            Value::Str(s) if s.is_empty() => Ok(Value::Nil),
            other => stringify_scalar(other)
                .map(Value::Str)
                .ok_or_else(|| type_mismatch("string", other)),
        }
    }

    fn serialize(&self, raw: &Value) -> WirerecordResult<Option<WireValue>> {
        match self.type_cast(raw)? {
            Value::Nil => Ok(None),
            Value::Str(s) => Ok(Some(WireValue::S(s))),
            cast => Err(type_mismatch("string", &cast)),
        }
    }
}

/// Marshals boolean attributes (wire type `BOOL`).
///
/// Only `true`, `false` and nil are accepted; there is no truthiness
/// coercion.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanMarshaler;

impl Marshaler for BooleanMarshaler {
    fn type_cast(&self, raw: &Value) -> WirerecordResult<Value> {
        match raw {
            Value::Nil => Ok(Value::Nil),
            Value::Bool(b) => Ok(Value::Bool(*b)),
            other => Err(type_mismatch("boolean", other)),
        }
    }

    fn serialize(&self, raw: &Value) -> WirerecordResult<Option<WireValue>> {
        match self.type_cast(raw)? {
            Value::Nil => Ok(None),
            Value::Bool(b) => Ok(Some(WireValue::Bool(b))),
            cast => Err(type_mismatch("boolean", &cast)),
        }
    }
}

/// Marshals integer attributes (wire type `N`).
///
/// Floats truncate; numeric strings parse (integer first, then
/// float-and-truncate).
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerMarshaler;

impl Marshaler for IntegerMarshaler {
    fn type_cast(&self, raw: &Value) -> WirerecordResult<Value> {
        match raw {
            Value::Nil => Ok(Value::Nil),
            Value::Int(i) => Ok(Value::Int(*i)),
            Value::Float(f) if f.is_finite() => Ok(Value::Int(*f as i64)),
            Value::Str(s) if s.trim().is_empty() => Ok(Value::Nil),
            Value::Str(s) => {
                let trimmed = s.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    Ok(Value::Int(i))
                } else {
                    match trimmed.parse::<f64>() {
                        Ok(f) if f.is_finite() => Ok(Value::Int(f as i64)),
                        _ => Err(type_mismatch("integer", raw)),
                    }
                }
            }
            other => Err(type_mismatch("integer", other)),
        }
    }

    fn serialize(&self, raw: &Value) -> WirerecordResult<Option<WireValue>> {
        match self.type_cast(raw)? {
            Value::Nil => Ok(None),
            Value::Int(i) => Ok(Some(WireValue::N(i.to_string()))),
            cast => Err(type_mismatch("integer", &cast)),
        }
    }
}

/// Marshals float attributes (wire type `N`).
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatMarshaler;

impl Marshaler for FloatMarshaler {
    fn type_cast(&self, raw: &Value) -> WirerecordResult<Value> {
        match raw {
            Value::Nil => Ok(Value::Nil),
            Value::Float(f) => Ok(Value::Float(*f)),
            Value::Int(i) => Ok(Value::Float(*i as f64)),
            Value::Str(s) if s.trim().is_empty() => Ok(Value::Nil),
            Value::Str(s) => s
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| type_mismatch("float", raw)),
            other => Err(type_mismatch("float", other)),
        }
    }

    fn serialize(&self, raw: &Value) -> WirerecordResult<Option<WireValue>> {
        match self.type_cast(raw)? {
            Value::Nil => Ok(None),
            Value::Float(f) if !f.is_finite() => Err(nonfinite_number_error(&f.to_string())),
            Value::Float(f) => Ok(Some(WireValue::N(f.to_string()))),
            cast => Err(type_mismatch("float", &cast)),
        }
    }
}
