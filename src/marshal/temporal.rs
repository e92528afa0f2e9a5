//! Date and datetime marshalers.
//!
//! Both accept the same raw shapes: an already-cast value passes through, an
//! integer (or float) is interpreted as a Unix timestamp, and a string is
//! parsed as a textual date/time. They differ only in what they keep: the
//! date marshaler drops time-of-day, the datetime marshaler preserves
//! time-of-day and the UTC offset.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::errors::{WirerecordError, WirerecordResult};
use crate::value::Value;
use crate::wire::{DATE_FORMAT, WireValue};

use super::{Marshaler, type_mismatch};

const DATETIME_TEXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Marshals calendar-date attributes (wire type `S`, `YYYY-MM-DD`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DateMarshaler;

impl Marshaler for DateMarshaler {
    fn type_cast(&self, raw: &Value) -> WirerecordResult<Value> {
        match raw {
            Value::Nil => Ok(Value::Nil),
            Value::Str(s) if s.trim().is_empty() => Ok(Value::Nil),
            Value::Date(d) => Ok(Value::Date(*d)),
            Value::DateTime(dt) => Ok(Value::Date(dt.date_naive())),
            Value::Int(ts) => Ok(Value::Date(utc_from_timestamp(*ts, 0)?.date_naive())),
            Value::Float(ts) => Ok(Value::Date(utc_from_float_timestamp(*ts)?.date_naive())),
            Value::Str(s) => parse_date(s.trim()).map(Value::Date),
            other => Err(type_mismatch("date", other)),
        }
    }

    fn serialize(&self, raw: &Value) -> WirerecordResult<Option<WireValue>> {
        match self.type_cast(raw)? {
            Value::Nil => Ok(None),
            Value::Date(d) => Ok(Some(WireValue::S(d.format(DATE_FORMAT).to_string()))),
            cast => Err(type_mismatch("date", &cast)),
        }
    }
}

/// Marshals datetime attributes (wire type `S`, RFC 3339).
///
/// The cast result is a `DateTime<FixedOffset>`; an explicit offset in the
/// input survives the round trip.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeMarshaler;

impl Marshaler for DateTimeMarshaler {
    fn type_cast(&self, raw: &Value) -> WirerecordResult<Value> {
        match raw {
            Value::Nil => Ok(Value::Nil),
            Value::Str(s) if s.trim().is_empty() => Ok(Value::Nil),
            Value::DateTime(dt) => Ok(Value::DateTime(*dt)),
            Value::Date(d) => Ok(Value::DateTime(
                d.and_time(NaiveTime::MIN).and_utc().fixed_offset(),
            )),
            Value::Int(ts) => Ok(Value::DateTime(utc_from_timestamp(*ts, 0)?.fixed_offset())),
            Value::Float(ts) => Ok(Value::DateTime(utc_from_float_timestamp(*ts)?.fixed_offset())),
            Value::Str(s) => parse_datetime(s.trim()).map(Value::DateTime),
            other => Err(type_mismatch("datetime", other)),
        }
    }

    fn serialize(&self, raw: &Value) -> WirerecordResult<Option<WireValue>> {
        match self.type_cast(raw)? {
            Value::Nil => Ok(None),
            Value::DateTime(dt) => Ok(Some(WireValue::S(dt.to_rfc3339()))),
            cast => Err(type_mismatch("datetime", &cast)),
        }
    }
}

fn utc_from_timestamp(secs: i64, nanos: u32) -> WirerecordResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, nanos).ok_or_else(|| {
        WirerecordError::TypeMismatch(format!("{secs} is out of range for a Unix timestamp"))
    })
}

fn utc_from_float_timestamp(ts: f64) -> WirerecordResult<DateTime<Utc>> {
    if !ts.is_finite() {
        return Err(WirerecordError::TypeMismatch(format!(
            "{ts} is not a valid Unix timestamp"
        )));
    }
    let secs = ts.div_euclid(1.0) as i64;
    let nanos = (ts.rem_euclid(1.0) * 1e9).round() as u32;
    utc_from_timestamp(secs, nanos)
}

fn parse_date(s: &str) -> WirerecordResult<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(d);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, DATETIME_TEXT_FORMAT) {
        return Ok(dt.date());
    }
    Err(WirerecordError::TypeMismatch(format!("`{s}` is not a recognizable date")))
}

fn parse_datetime(s: &str) -> WirerecordResult<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, DATETIME_TEXT_FORMAT) {
        return Ok(dt.and_utc().fixed_offset());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(d.and_time(NaiveTime::MIN).and_utc().fixed_offset());
    }
    Err(WirerecordError::TypeMismatch(format!(
        "`{s}` is not a recognizable datetime"
    )))
}
