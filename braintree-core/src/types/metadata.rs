use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A flat key/value bag carried through a browser switch.
///
/// Values are restricted to strings, booleans and integers so the bag
/// survives string serialization unchanged. Key order is preserved.
///
/// ```
/// use braintree_core::types::Metadata;
///
/// let mut metadata = Metadata::new();
/// metadata.insert("payment-type", "ideal");
/// metadata.insert("has-user-location-consent", true);
///
/// let json = serde_json::to_string(&metadata).unwrap();
/// assert_eq!(json, r#"{"payment-type":"ideal","has-user-location-consent":true}"#);
///
/// let parsed: Metadata = serde_json::from_str(&json).unwrap();
/// assert_eq!(parsed, metadata);
/// assert_eq!(parsed.get_bool("has-user-location-consent"), Some(true));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Metadata(Map<String, Value>);

/// A scalar value accepted by [`Metadata`].
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataValue(Value);

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue(Value::String(value.to_string()))
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue(Value::String(value))
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue(Value::Bool(value))
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue(Value::from(value))
    }
}

impl From<u64> for MetadataValue {
    fn from(value: u64) -> Self {
        MetadataValue(Value::from(value))
    }
}

impl Metadata {
    pub fn new() -> Self {
        Metadata(Map::new())
    }

    /// Insert a value, replacing any previous value under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        self.0.insert(key.into(), value.into().0);
    }

    /// Builder-style [`insert`](Metadata::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<MetadataValue>> FromIterator<(K, V)> for Metadata {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut metadata = Metadata::new();
        for (k, v) in iter {
            metadata.insert(k, v);
        }
        metadata
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        for (key, value) in &map {
            let scalar = match value {
                Value::String(_) | Value::Bool(_) => true,
                Value::Number(n) => n.is_i64() || n.is_u64(),
                _ => false,
            };
            if !scalar {
                return Err(serde::de::Error::custom(format!(
                    "Metadata value for '{key}' must be a string, boolean or integer"
                )));
            }
        }
        Ok(Metadata(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_nested_values() {
        let err = serde_json::from_str::<Metadata>(r#"{"a": {"b": 1}}"#).unwrap_err();
        assert!(err.to_string().contains("'a'"));
        assert!(serde_json::from_str::<Metadata>(r#"{"a": null}"#).is_err());
        assert!(serde_json::from_str::<Metadata>(r#"{"a": [1]}"#).is_err());
    }

    #[test]
    fn test_rejects_floats() {
        let err = serde_json::from_str::<Metadata>(r#"{"amount": 1.1}"#).unwrap_err();
        assert!(err.to_string().contains("'amount'"));
        assert!(serde_json::from_str::<Metadata>(r#"{"count": -3}"#).is_ok());
    }

    #[test]
    fn test_preserves_insertion_order() {
        let metadata: Metadata = [("z", "1"), ("a", "2"), ("m", "3")].into_iter().collect();
        let keys: Vec<_> = metadata.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_numbers_round_trip() {
        let metadata = Metadata::new().with("count", 42i64).with("big", u64::MAX);
        let json = serde_json::to_string(&metadata).unwrap();
        let parsed: Metadata = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, metadata);
        assert_eq!(parsed.get("big").and_then(Value::as_u64), Some(u64::MAX));
    }
}
