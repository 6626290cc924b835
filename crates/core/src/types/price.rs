//! Decimal price (de)serialization for the backend boundary.
//!
//! The backend serializes prices inconsistently: product listings carry JSON
//! numbers, while Django's `DecimalField` surfaces as a quoted string in some
//! responses. Fields annotated with `#[serde(with = "crate::types::price")]`
//! accept either form, reject negative values, and always serialize back out
//! as a plain JSON number.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;

/// Serialize a price as a plain JSON number.
///
/// # Errors
///
/// Returns an error if the underlying serializer fails.
pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(value.to_f64().unwrap_or_default())
}

/// Deserialize a price from a JSON number or a numeric string.
///
/// # Errors
///
/// Returns an error if the value is not numeric or is negative.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = deserializer.deserialize_any(PriceVisitor)?;
    if value.is_sign_negative() {
        return Err(de::Error::custom(format!("price must be non-negative, got {value}")));
    }
    Ok(value)
}

struct PriceVisitor;

impl Visitor<'_> for PriceVisitor {
    type Value = Decimal;

    fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("a decimal number or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Decimal::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Decimal::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Decimal::from_f64(v).ok_or_else(|| E::custom(format!("{v} is not a valid decimal")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.trim()
            .parse::<Decimal>()
            .map_err(|e| E::custom(format!("invalid decimal string {v:?}: {e}")))
    }
}
