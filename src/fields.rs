//! Serde helpers for understat's loosely typed payloads.
//!
//! Numbers usually arrive as strings (`"xG": "0.8145"`, `"goals": "1"`) but
//! hand-built pages and older seasons use plain JSON numbers, so both are
//! accepted.

use serde::de::{Deserializer, Error};
use serde::Deserialize;
use serde_json::Value;

pub fn flex_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom(format!("number {n} out of range"))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("expected decimal, got {s:?}"))),
        other => Err(D::Error::custom(format!("expected decimal, got {other}"))),
    }
}

pub fn flex_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        other => flex_f64(other).map(Some).map_err(D::Error::custom),
    }
}

pub fn flex_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| D::Error::custom(format!("expected count, got {n}"))),
        Value::String(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|_| D::Error::custom(format!("expected count, got {s:?}"))),
        other => Err(D::Error::custom(format!("expected count, got {other}"))),
    }
}

/// Ids and season keys: strings on the site, sometimes bare numbers.
pub fn flex_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected id, got {other}"))),
    }
}
