//! Forgiving numeric input.
//!
//! Amounts arrive from forms and hand-edited files as raw numbers or as
//! locale-grouped strings ("1,00,00,000"). Anything that does not parse is
//! treated as zero rather than rejected; range problems are the validator's
//! business.

use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::types::Months;

/// Parse an amount string, ignoring grouping separators and surrounding
/// whitespace. Returns zero for anything unparseable.
pub fn parse_amount(raw: &str) -> Decimal {
    try_parse_amount(raw).unwrap_or(Decimal::ZERO)
}

/// Strict variant of [`parse_amount`], used where "empty" and "zero" differ.
pub fn try_parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// Coerce an arbitrary JSON value into a decimal.
pub fn coerce_value(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Decimal::from(i)
            } else if let Some(u) = n.as_u64() {
                Decimal::from(u)
            } else {
                n.as_f64()
                    .and_then(Decimal::from_f64)
                    .unwrap_or(Decimal::ZERO)
            }
        }
        Value::String(s) => parse_amount(s),
        Value::Bool(true) => Decimal::ONE,
        _ => Decimal::ZERO,
    }
}

/// Clamp a decimal into a month count: fractional months truncate, negative
/// or oversized values become zero.
pub fn to_months(value: Decimal) -> Months {
    if value.is_sign_negative() {
        return 0;
    }
    value.trunc().to_u32().unwrap_or(0)
}

/// `deserialize_with` target for decimal fields.
pub fn decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(coerce_value(&raw))
}

/// `deserialize_with` target for optional decimal fields. `null` and blank
/// strings mean absent; a malformed non-blank value is zero.
pub fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match &raw {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        other => Some(coerce_value(other)),
    })
}

/// `deserialize_with` target for month offsets.
pub fn months<'de, D>(deserializer: D) -> Result<Months, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(to_months(coerce_value(&raw)))
}
