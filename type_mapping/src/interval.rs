//! Interval columns
//!
//! Durations are written in ISO 8601 form with hour, minute and second
//! designators only, so nothing lands in the backend's month or day fields.
//! Reading goes the other way through the calendar: the backend's months, days
//! and microseconds are applied to the Unix epoch in UTC and the elapsed time is
//! taken from there. A month therefore counts as however long the calendar
//! month following the epoch is, and sub-millisecond precision is dropped.

use crate::codec::ColumnCodec;
use crate::errors::CodecError;
use crate::types::PostgresValue;
use crate::wire::{IntervalValue, TypedObject, WireValue};
use chrono::{DateTime, Duration, Months, Utc};

pub const INTERVAL_SQL_TYPE: &str = "INTERVAL";

const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_MINUTE: i64 = 60 * MICROS_PER_SECOND;
const MICROS_PER_HOUR: i64 = 60 * MICROS_PER_MINUTE;

#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalCodec;

impl IntervalCodec {
    pub fn new() -> Self {
        Self
    }
}

impl ColumnCodec for IntervalCodec {
    type Native = Duration;

    fn sql_type(&self) -> String {
        INTERVAL_SQL_TYPE.to_string()
    }

    fn encode(&self, value: &Duration) -> Result<WireValue, CodecError> {
        Ok(WireValue::Object(TypedObject::new(
            INTERVAL_SQL_TYPE,
            Some(format_duration(value)),
        )))
    }

    fn decode(&self, value: &WireValue) -> Result<Duration, CodecError> {
        match value {
            WireValue::Scalar(PostgresValue::Interval(duration)) => Ok(*duration),
            WireValue::Interval(interval) => interval_to_duration(interval),
            WireValue::Object(TypedObject {
                type_name,
                value: Some(text),
            }) if type_name.eq_ignore_ascii_case(INTERVAL_SQL_TYPE) => {
                interval_to_duration(&parse_interval(text)?)
            }
            other => Err(CodecError::type_mismatch(
                INTERVAL_SQL_TYPE,
                other.describe(),
            )),
        }
    }
}

/// Split microseconds into signed hour, minute, second and sub-second parts
fn time_fields(micros: i64) -> String {
    let sign = if micros < 0 { "-" } else { "" };
    let magnitude = micros.unsigned_abs();
    let hours = magnitude / MICROS_PER_HOUR as u64;
    let minutes = (magnitude % MICROS_PER_HOUR as u64) / MICROS_PER_MINUTE as u64;
    let seconds = (magnitude % MICROS_PER_MINUTE as u64) / MICROS_PER_SECOND as u64;
    let fraction = magnitude % MICROS_PER_SECOND as u64;

    let mut out = format!("{sign}{hours}H{sign}{minutes}M{sign}{seconds}");
    if fraction > 0 {
        out.push_str(&format!(".{:06}", fraction));
    }
    out.push('S');
    out
}

/// ISO 8601 text for a duration, e.g. `PT83H20M0S`
pub fn format_duration(duration: &Duration) -> String {
    let micros = duration.num_microseconds().unwrap_or(if *duration < Duration::zero() {
        i64::MIN
    } else {
        i64::MAX
    });
    format!("PT{}", time_fields(micros))
}

/// ISO 8601 text for a backend interval, e.g. `P1M2DT3H0M0S`
pub fn format_interval_value(interval: &IntervalValue) -> String {
    let mut out = String::from("P");
    if interval.months != 0 {
        out.push_str(&format!("{}M", interval.months));
    }
    if interval.days != 0 {
        out.push_str(&format!("{}D", interval.days));
    }
    out.push('T');
    out.push_str(&time_fields(interval.microseconds));
    out
}

/// Parse ISO 8601 interval text (`P[nY][nM][nW][nD][T[nH][nM][nS]]`, signed
/// fields allowed, fractions on seconds only)
pub fn parse_interval(text: &str) -> Result<IntervalValue, CodecError> {
    let invalid = || CodecError::type_mismatch("ISO 8601 interval", format!("'{}'", text));

    let trimmed = text.trim();
    let (negated, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let body = body.strip_prefix('P').ok_or_else(invalid)?;

    let mut interval = IntervalValue::default();
    let mut in_time = false;
    let mut number = String::new();

    for c in body.chars() {
        match c {
            'T' if number.is_empty() && !in_time => in_time = true,
            '0'..='9' | '-' | '+' | '.' => number.push(c),
            designator => {
                if number.is_empty() {
                    return Err(invalid());
                }
                if designator == 'S' && in_time {
                    let seconds: f64 = number.parse().map_err(|_| invalid())?;
                    let micros = (seconds * MICROS_PER_SECOND as f64).round();
                    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
                        return Err(invalid());
                    }
                    interval.microseconds = interval
                        .microseconds
                        .checked_add(micros as i64)
                        .ok_or_else(invalid)?;
                } else {
                    let n: i64 = number.parse().map_err(|_| invalid())?;
                    let total = match (in_time, designator) {
                        (false, 'Y') => add_scaled_i32(&mut interval.months, n, 12),
                        (false, 'M') => add_scaled_i32(&mut interval.months, n, 1),
                        (false, 'W') => add_scaled_i32(&mut interval.days, n, 7),
                        (false, 'D') => add_scaled_i32(&mut interval.days, n, 1),
                        (true, 'H') => add_scaled_i64(&mut interval.microseconds, n, MICROS_PER_HOUR),
                        (true, 'M') => {
                            add_scaled_i64(&mut interval.microseconds, n, MICROS_PER_MINUTE)
                        }
                        _ => None,
                    };
                    total.ok_or_else(invalid)?;
                }
                number.clear();
            }
        }
    }

    if !number.is_empty() {
        return Err(invalid());
    }

    if negated {
        interval.months = interval.months.checked_neg().ok_or_else(invalid)?;
        interval.days = interval.days.checked_neg().ok_or_else(invalid)?;
        interval.microseconds = interval.microseconds.checked_neg().ok_or_else(invalid)?;
    }
    Ok(interval)
}

/// `total += n * factor` for a 32-bit field, `None` when out of range
fn add_scaled_i32(total: &mut i32, n: i64, factor: i64) -> Option<()> {
    let delta = i32::try_from(n.checked_mul(factor)?).ok()?;
    *total = total.checked_add(delta)?;
    Some(())
}

fn add_scaled_i64(total: &mut i64, n: i64, factor: i64) -> Option<()> {
    *total = total.checked_add(n.checked_mul(factor)?)?;
    Some(())
}

/// Apply a backend interval to the epoch and return the elapsed time,
/// truncated to milliseconds
pub fn interval_to_duration(interval: &IntervalValue) -> Result<Duration, CodecError> {
    let overflow = || CodecError::type_mismatch("interval within calendar range", format!("{:?}", interval));

    let epoch = DateTime::<Utc>::from_timestamp(0, 0).ok_or_else(overflow)?;

    let months = Months::new(interval.months.unsigned_abs());
    let shifted = if interval.months >= 0 {
        epoch.checked_add_months(months)
    } else {
        epoch.checked_sub_months(months)
    }
    .ok_or_else(overflow)?;

    let shifted = shifted
        .checked_add_signed(Duration::days(i64::from(interval.days)))
        .and_then(|ts| ts.checked_add_signed(Duration::microseconds(interval.microseconds)))
        .ok_or_else(overflow)?;

    Ok(Duration::milliseconds((shifted - epoch).num_milliseconds()))
}
