//! Lenient decoding of monetary fields.
//!
//! Records come from a document store where `amount` / `totalBudget` may be
//! stored as numbers, numeric strings, `null`, or garbage. Anything that is
//! not a finite number is treated as `0.0` rather than failing the read.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Replace NaN / infinite values with zero.
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Interpret an arbitrary JSON value as an amount, defaulting to zero.
pub fn parse_amount(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().map(sanitize_amount).unwrap_or(0.0),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(sanitize_amount)
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Serde adapter: `#[serde(default, deserialize_with = "deserialize_amount")]`.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_amount(&value))
}
