//! Total coercion helpers over `serde_json::Value`.
//!
//! The backend is not strict about primitive types (amounts arrive as numbers
//! or numeric strings, flags as `true` or `"1"`), so every DTO field is read
//! through these helpers. None of them fail: a value of the wrong shape yields
//! the supplied default.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

use crate::utils::timezone::parse_backend_timestamp;

pub fn safe_double(value: &Value, default: f64) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => v,
        _ => default,
    }
}

pub fn safe_int(value: &Value, default: i64) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(default),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f.trunc() as i64)
                })
                .unwrap_or(default)
        }
        _ => default,
    }
}

pub fn safe_bool(value: &Value, default: bool) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(default),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            _ => default,
        },
        _ => default,
    }
}

pub fn safe_string(value: &Value, default: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => default.to_string(),
    }
}

pub fn safe_map(value: &Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    }
}

pub fn safe_list(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        _ => Vec::new(),
    }
}

/// Walks `path` through nested objects. Returns `default` as soon as a key is
/// missing or the current node is not an object.
pub fn safe_get_nested(value: &Value, path: &[&str], default: Value) -> Value {
    let mut current = value;
    for key in path {
        match current {
            Value::Object(map) => match map.get(*key) {
                Some(next) => current = next,
                None => return default,
            },
            _ => return default,
        }
    }
    current.clone()
}

/// Unparsable or absent timestamps become "now".
pub fn safe_date(value: &Value) -> DateTime<Utc> {
    value
        .as_str()
        .and_then(parse_backend_timestamp)
        .unwrap_or_else(Utc::now)
}

/// Lenient parsing entry point implemented by every DTO.
pub trait FromJson: Sized {
    fn from_json(value: &Value) -> Self;

    fn from_json_str(raw: &str) -> Self {
        let value = serde_json::from_str::<Value>(raw).unwrap_or(Value::Null);
        Self::from_json(&value)
    }
}

/// Implements [`FromJson`] for serde models whose fields all go through
/// [`lenient`] adapters. Non-object input is read as `{}`.
#[macro_export]
macro_rules! impl_from_json {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::utils::json::FromJson for $ty {
                fn from_json(value: &serde_json::Value) -> Self {
                    let source = if value.is_object() {
                        value.clone()
                    } else {
                        serde_json::Value::Object(serde_json::Map::new())
                    };
                    serde_json::from_value(source).unwrap_or_default()
                }
            }
        )+
    };
}

impl<T: FromJson> FromJson for Vec<T> {
    fn from_json(value: &Value) -> Self {
        match value {
            Value::Array(items) => items.iter().map(T::from_json).collect(),
            _ => Vec::new(),
        }
    }
}

impl FromJson for () {
    fn from_json(_value: &Value) -> Self {}
}

impl FromJson for Value {
    fn from_json(value: &Value) -> Self {
        value.clone()
    }
}

/// `deserialize_with` adapters backed by the `safe_*` helpers.
pub mod lenient {
    use super::*;
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use std::collections::BTreeMap;

    fn raw<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    pub fn f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(safe_double(&raw(d)?, 0.0))
    }

    pub fn i64<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        Ok(safe_int(&raw(d)?, 0))
    }

    pub fn u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        Ok(u32::try_from(safe_int(&raw(d)?, 0).max(0)).unwrap_or(u32::MAX))
    }

    pub fn bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(safe_bool(&raw(d)?, false))
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(safe_string(&raw(d)?, ""))
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match raw(d)? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            other @ (Value::String(_) | Value::Number(_) | Value::Bool(_)) => {
                Some(safe_string(&other, ""))
            }
            _ => None,
        })
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let value = raw(d)?;
        if value.is_null() {
            return Ok(None);
        }
        let parsed = safe_double(&value, f64::NAN);
        Ok((!parsed.is_nan()).then_some(parsed))
    }

    pub fn datetime<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        Ok(safe_date(&raw(d)?))
    }

    pub fn opt_datetime<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Ok(raw(d)?.as_str().and_then(parse_backend_timestamp))
    }

    /// Calendar date; falls back to today's date in UTC.
    pub fn date<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let value = raw(d)?;
        let parsed = value.as_str().and_then(|s| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .ok()
                .or_else(|| parse_backend_timestamp(s).map(|dt| dt.date_naive()))
        });
        Ok(parsed.unwrap_or_else(|| Utc::now().date_naive()))
    }

    /// Any serde type, falling back to its `Default` on shape mismatch.
    /// Used for enums so unknown tokens never fail a whole response.
    pub fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        Ok(serde_json::from_value(raw(d)?).unwrap_or_default())
    }

    pub fn model<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: FromJson,
    {
        Ok(T::from_json(&raw(d)?))
    }

    pub fn opt_model<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromJson,
    {
        let value = raw(d)?;
        Ok(value.is_object().then(|| T::from_json(&value)))
    }

    pub fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromJson,
    {
        Ok(Vec::<T>::from_json(&raw(d)?))
    }

    pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(safe_list(&raw(d)?)
            .iter()
            .filter(|v| !v.is_null())
            .map(|v| safe_string(v, ""))
            .collect())
    }

    pub fn f64_map<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<String, f64>, D::Error> {
        Ok(safe_map(&raw(d)?)
            .iter()
            .map(|(k, v)| (k.clone(), safe_double(v, 0.0)))
            .collect())
    }
}
