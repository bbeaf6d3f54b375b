//! Tolerant deserializers for data produced by the extraction model.
//!
//! The model is asked for a strict schema but occasionally answers with
//! numbers where strings are expected (or the reverse), or with `null`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::event::Gender;

pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}

pub(crate) fn distance<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => {
            if let Some(whole) = n.as_u64() {
                u32::try_from(whole).unwrap_or(0)
            } else {
                n.as_f64().map(truncate_distance).unwrap_or(0)
            }
        }
        Value::String(s) => parse_distance(&s),
        _ => 0,
    })
}

pub(crate) fn gender<'de, D>(deserializer: D) -> Result<Gender, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s.parse().unwrap_or_default(),
        _ => Gender::Mixed,
    })
}

/// Parses a distance the way a lenient integer parser would: leading digits
/// win, anything unparseable or negative is `0`.
pub fn parse_distance(value: &str) -> u32 {
    let trimmed = value.trim();
    if let Ok(whole) = trimmed.parse::<u32>() {
        return whole;
    }
    match trimmed.parse::<f64>() {
        Ok(float) => truncate_distance(float),
        Err(_) => crate::derive::parse_leading_int(trimmed)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0),
    }
}

fn truncate_distance(value: f64) -> u32 {
    if value.is_finite() && value >= 0.0 && value <= f64::from(u32::MAX) {
        value.trunc() as u32
    } else {
        0
    }
}
