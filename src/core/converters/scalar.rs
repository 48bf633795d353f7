//! Scalar converters: strings, booleans and numbers.

use std::num::IntErrorKind;
use std::str::FromStr;

use bigdecimal::BigDecimal;

use super::error::ConversionError;
use crate::core::models::value::Value;

const TRUTHY: [&str; 3] = ["true", "1", "yes"];
const FALSY: [&str; 4] = ["false", "0", "no", ""];

pub fn to_string(raw: &str) -> Result<Value, ConversionError> {
    Ok(Value::String(raw.to_string()))
}

pub fn to_bool(raw: &str) -> Result<Value, ConversionError> {
    let lowered = raw.to_lowercase();
    if TRUTHY.contains(&lowered.as_str()) {
        Ok(Value::Bool(true))
    } else if FALSY.contains(&lowered.as_str()) {
        Ok(Value::Bool(false))
    } else {
        Err(ConversionError::InvalidBoolean {
            value: raw.to_string(),
        })
    }
}

pub fn to_int(raw: &str) -> Result<Value, ConversionError> {
    parse_int(raw).map(Value::Int)
}

pub fn to_positive_int(raw: &str) -> Result<Value, ConversionError> {
    let value = parse_int(raw)?;
    if value < 0 {
        return Err(ConversionError::NegativeInteger {
            value: raw.to_string(),
        });
    }
    Ok(Value::Int(value))
}

pub fn to_float(raw: &str) -> Result<Value, ConversionError> {
    let invalid = || ConversionError::InvalidFloat {
        value: raw.to_string(),
    };
    let cleaned = strip_separators(raw.trim()).ok_or_else(invalid)?;
    // `f64::from_str` also accepts "inf"/"nan"; those are still floats.
    cleaned.parse::<f64>().map(Value::Float).map_err(|_| invalid())
}

pub fn to_decimal(raw: &str) -> Result<Value, ConversionError> {
    let trimmed = raw.trim();
    let cleaned = strip_separators(trimmed).unwrap_or_else(|| trimmed.to_string());
    BigDecimal::from_str(&cleaned)
        .map(Value::Decimal)
        .map_err(|source| ConversionError::InvalidDecimal {
            value: raw.to_string(),
            source,
        })
}

/// Parse a base-10 integer with optional sign and `_` digit separators.
///
/// Values are 64-bit; anything wider is `IntegerOutOfRange`.
fn parse_int(raw: &str) -> Result<i64, ConversionError> {
    let invalid = || ConversionError::InvalidInteger {
        value: raw.to_string(),
    };
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix(['+', '-'])
        .unwrap_or(trimmed);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '_') {
        return Err(invalid());
    }
    let cleaned = strip_separators(trimmed).ok_or_else(invalid)?;
    cleaned.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ConversionError::IntegerOutOfRange {
                value: raw.to_string(),
            }
        }
        _ => invalid(),
    })
}

/// Remove `_` digit separators, rejecting misplaced ones.
///
/// A separator is only valid between two ASCII digits, so `1_000` passes
/// while `_1`, `1_`, `1__0` and `1_.5` do not.
fn strip_separators(raw: &str) -> Option<String> {
    if !raw.contains('_') {
        return Some(raw.to_string());
    }
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    for (i, c) in chars.iter().enumerate() {
        if *c == '_' {
            let before = i.checked_sub(1).and_then(|j| chars.get(j));
            let after = chars.get(i + 1);
            match (before, after) {
                (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit() => continue,
                _ => return None,
            }
        }
        out.push(*c);
    }
    Some(out)
}
