use crate::Value;

/// Convert a decoded JSON document into a plain [`Value`].
///
/// Object key order is preserved. Integers that fit in `i64` become
/// [`Value::Int`]; larger unsigned integers cannot be represented exactly and
/// become [`Value::Float`].
#[must_use]
pub fn normalize(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => normalize_number(&n),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::List(items.into_iter().map(normalize).collect()),
        serde_json::Value::Object(map) => {
            Value::Map(map.into_iter().map(|(k, v)| (k, normalize(v))).collect())
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn normalize_number(n: &serde_json::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Int(i)
    } else if let Some(u) = n.as_u64() {
        tracing::warn!("integer {u} does not fit in i64; treating it as a float");
        Value::Float(u as f64)
    } else {
        Value::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

impl From<serde_json::Value> for Value {
    #[inline]
    fn from(json: serde_json::Value) -> Self {
        normalize(json)
    }
}

impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(normalize)
    }
}
