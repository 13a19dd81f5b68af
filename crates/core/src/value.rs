// Untyped preference values
// Every value carries its kind tag so narrowing is an exact match, never a coercion.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// String-keyed mapping stored under a single preference key.
pub type Dict = BTreeMap<String, DictValue>;

/// The kind tag of a stored [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Bool,
    Int,
    Double,
    Bytes,
    Dict,
}

impl Kind {
    pub const ALL: [Kind; 5] = [Kind::Bool, Kind::Int, Kind::Double, Kind::Bytes, Kind::Dict];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Double => "double",
            Kind::Bytes => "bytes",
            Kind::Dict => "dict",
        }
    }

    /// Parse a kind name as written in config files and on the command line.
    pub fn parse(name: &str) -> Option<Kind> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Some(Kind::Bool),
            "int" | "integer" => Some(Kind::Int),
            "double" | "float" => Some(Kind::Double),
            "bytes" | "data" => Some(Kind::Bytes),
            "dict" | "dictionary" => Some(Kind::Dict),
            _ => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value as seen by providers: one of the supported kinds, untyped from
/// the caller's point of view until narrowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    Bool(bool),
    Int(i64),
    Double(#[serde(with = "float_repr")] f64),
    Bytes(#[serde(with = "base64_bytes")] Vec<u8>),
    Dict(Dict),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Double(_) => Kind::Double,
            Value::Bytes(_) => Kind::Bytes,
            Value::Dict(_) => Kind::Dict,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    /// Take the byte payload without copying. `None` for any other kind.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Take the dictionary payload without copying. `None` for any other kind.
    pub fn into_dict(self) -> Option<Dict> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<Dict> for Value {
    fn from(value: Dict) -> Self {
        Value::Dict(value)
    }
}

/// Entry of a [`Dict`]. Only storage-compatible kinds can be expressed, so a
/// dictionary written through the typed layer is always persistable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DictValue {
    Bool(bool),
    Int(i64),
    Double(#[serde(with = "float_repr")] f64),
    String(String),
    Bytes(#[serde(with = "base64_bytes")] Vec<u8>),
    Array(Vec<DictValue>),
    Dict(Dict),
}

impl DictValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DictValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DictValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            DictValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            DictValue::Double(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            DictValue::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    /// Convert plain JSON into a dictionary entry.
    ///
    /// JSON integers become `Int`, other numbers `Double`. `null` has no
    /// storage-compatible counterpart and yields `None`, as does any
    /// container holding a `null`.
    pub fn from_json(json: &serde_json::Value) -> Option<DictValue> {
        Some(match json {
            serde_json::Value::Null => return None,
            serde_json::Value::Bool(b) => DictValue::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => DictValue::Int(i),
                None => DictValue::Double(n.as_f64()?),
            },
            serde_json::Value::String(s) => DictValue::String(s.clone()),
            serde_json::Value::Array(items) => DictValue::Array(
                items.iter().map(DictValue::from_json).collect::<Option<Vec<_>>>()?,
            ),
            serde_json::Value::Object(map) => DictValue::Dict(dict_from_json(map)?),
        })
    }

    /// Render as plain JSON. Bytes become base64 strings, so this is lossy
    /// in the other direction.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            DictValue::Bool(b) => serde_json::Value::Bool(*b),
            DictValue::Int(n) => serde_json::Value::from(*n),
            DictValue::Double(n) if !n.is_finite() => {
                serde_json::Value::String(float_repr::non_finite_name(*n).to_string())
            }
            DictValue::Double(n) => serde_json::Value::from(*n),
            DictValue::String(s) => serde_json::Value::String(s.clone()),
            DictValue::Bytes(bytes) => serde_json::Value::String(base64_bytes::encode(bytes)),
            DictValue::Array(items) => {
                serde_json::Value::Array(items.iter().map(DictValue::to_json).collect())
            }
            DictValue::Dict(dict) => dict_to_json(dict),
        }
    }
}

/// Convert a JSON object into a [`Dict`]. See [`DictValue::from_json`].
pub fn dict_from_json(map: &serde_json::Map<String, serde_json::Value>) -> Option<Dict> {
    map.iter()
        .map(|(k, v)| DictValue::from_json(v).map(|v| (k.clone(), v)))
        .collect()
}

/// Render a [`Dict`] as a plain JSON object.
pub fn dict_to_json(dict: &Dict) -> serde_json::Value {
    serde_json::Value::Object(
        dict.iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect(),
    )
}

impl From<bool> for DictValue {
    fn from(value: bool) -> Self {
        DictValue::Bool(value)
    }
}

impl From<i64> for DictValue {
    fn from(value: i64) -> Self {
        DictValue::Int(value)
    }
}

impl From<f64> for DictValue {
    fn from(value: f64) -> Self {
        DictValue::Double(value)
    }
}

impl From<String> for DictValue {
    fn from(value: String) -> Self {
        DictValue::String(value)
    }
}

impl From<&str> for DictValue {
    fn from(value: &str) -> Self {
        DictValue::String(value.to_string())
    }
}

impl From<Vec<u8>> for DictValue {
    fn from(value: Vec<u8>) -> Self {
        DictValue::Bytes(value)
    }
}

impl From<Vec<DictValue>> for DictValue {
    fn from(value: Vec<DictValue>) -> Self {
        DictValue::Array(value)
    }
}

impl From<Dict> for DictValue {
    fn from(value: Dict) -> Self {
        DictValue::Dict(value)
    }
}

/// Byte payloads serialize as standard base64 strings.
pub(crate) mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn encode(bytes: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

/// JSON has no literal for infinities or NaN, so those doubles serialize as
/// the strings `"inf"`, `"-inf"` and `"nan"`. Finite doubles stay numbers.
pub(crate) mod float_repr {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn non_finite_name(n: f64) -> &'static str {
        if n.is_nan() {
            "nan"
        } else if n.is_sign_negative() {
            "-inf"
        } else {
            "inf"
        }
    }

    pub fn serialize<S: Serializer>(n: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if n.is_finite() {
            serializer.serialize_f64(*n)
        } else {
            serializer.serialize_str(non_finite_name(*n))
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(DoubleVisitor)
    }

    struct DoubleVisitor;

    impl<'de> Visitor<'de> for DoubleVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or one of \"inf\", \"-inf\", \"nan\"")
        }

        fn visit_f64<E: de::Error>(self, n: f64) -> Result<f64, E> {
            Ok(n)
        }

        fn visit_i64<E: de::Error>(self, n: i64) -> Result<f64, E> {
            Ok(n as f64)
        }

        fn visit_u64<E: de::Error>(self, n: u64) -> Result<f64, E> {
            Ok(n as f64)
        }

        fn visit_str<E: de::Error>(self, s: &str) -> Result<f64, E> {
            match s {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "nan" => Ok(f64::NAN),
                _ => Err(E::invalid_value(de::Unexpected::Str(s), &self)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrowing_is_exact() {
        let int = Value::Int(5);
        assert_eq!(int.as_int(), Some(5));
        assert_eq!(int.as_double(), None);
        assert_eq!(int.as_bool(), None);

        let double = Value::Double(5.0);
        assert_eq!(double.as_double(), Some(5.0));
        assert_eq!(double.as_int(), None);

        let flag = Value::Bool(true);
        assert_eq!(flag.as_int(), None);
        assert_eq!(flag.as_bool(), Some(true));

        let blob = Value::Bytes(vec![7]);
        assert_eq!(blob.as_bytes(), Some(&[7u8][..]));
        assert_eq!(blob.as_dict(), None);

        let mut dict = Dict::new();
        dict.insert("k".into(), true.into());
        let map = Value::Dict(dict.clone());
        assert_eq!(map.as_dict(), Some(&dict));
        assert_eq!(map.as_bytes(), None);
    }

    #[test]
    fn test_into_payloads() {
        assert_eq!(Value::Bytes(vec![1, 2]).into_bytes(), Some(vec![1, 2]));
        assert_eq!(Value::Int(1).into_bytes(), None);

        let mut dict = Dict::new();
        dict.insert("k".into(), "v".into());
        assert_eq!(Value::Dict(dict.clone()).into_dict(), Some(dict));
        assert_eq!(Value::Bool(false).into_dict(), None);
    }

    #[test]
    fn test_kind_names() {
        for kind in Kind::ALL {
            assert_eq!(Kind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(Kind::parse("Boolean"), Some(Kind::Bool));
        assert_eq!(Kind::parse("data"), Some(Kind::Bytes));
        assert_eq!(Kind::parse("string"), None);
        assert_eq!(Value::Double(0.5).kind().to_string(), "double");
    }

    #[test]
    fn test_serialized_form_keeps_kind() {
        let json = serde_json::to_string(&Value::Double(5.0)).unwrap();
        assert_eq!(json, r#"{"double":5.0}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Double(5.0));

        let back: Value = serde_json::from_str(r#"{"int":5}"#).unwrap();
        assert_eq!(back.kind(), Kind::Int);
    }

    #[test]
    fn test_bytes_serialize_as_base64() {
        let json = serde_json::to_string(&Value::Bytes(vec![0xde, 0xad, 0xbe, 0xef])).unwrap();
        assert_eq!(json, r#"{"bytes":"3q2+7w=="}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back.into_bytes(), Some(vec![0xde, 0xad, 0xbe, 0xef]));

        assert!(serde_json::from_str::<Value>(r#"{"bytes":"not base64!"}"#).is_err());
    }

    #[test]
    fn test_dict_from_json() {
        let json = serde_json::json!({
            "theme": "dark",
            "size": 14,
            "scale": 1.5,
            "tags": ["a", "b"],
            "nested": { "on": true }
        });
        let dict = dict_from_json(json.as_object().unwrap()).unwrap();

        assert_eq!(dict["theme"].as_str(), Some("dark"));
        assert_eq!(dict["size"].as_int(), Some(14));
        assert_eq!(dict["scale"].as_double(), Some(1.5));
        assert_eq!(
            dict["tags"],
            DictValue::Array(vec!["a".into(), "b".into()])
        );
        assert_eq!(dict["nested"].as_dict().unwrap()["on"].as_bool(), Some(true));

        assert_eq!(dict_to_json(&dict), json);
    }

    #[test]
    fn test_dict_from_json_rejects_null() {
        let json = serde_json::json!({ "a": 1, "b": null });
        assert!(dict_from_json(json.as_object().unwrap()).is_none());

        let json = serde_json::json!({ "a": [1, null] });
        assert!(dict_from_json(json.as_object().unwrap()).is_none());
    }

    #[test]
    fn test_non_finite_doubles_serialize_as_names() {
        let json = serde_json::to_string(&Value::Double(f64::INFINITY)).unwrap();
        assert_eq!(json, r#"{"double":"inf"}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Double(f64::INFINITY));

        let json = serde_json::to_string(&Value::Double(f64::NEG_INFINITY)).unwrap();
        assert_eq!(json, r#"{"double":"-inf"}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Double(f64::NEG_INFINITY));

        let json = serde_json::to_string(&Value::Double(f64::NAN)).unwrap();
        assert_eq!(json, r#"{"double":"nan"}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert!(back.as_double().unwrap().is_nan());

        assert!(serde_json::from_str::<Value>(r#"{"double":"infinity"}"#).is_err());
        assert!(serde_json::from_str::<Value>(r#"{"double":null}"#).is_err());
    }

    #[test]
    fn test_non_finite_doubles_inside_dicts() {
        let mut dict = Dict::new();
        dict.insert("max".into(), f64::INFINITY.into());
        dict.insert("ratio".into(), 0.5f64.into());

        let json = serde_json::to_string(&Value::Dict(dict.clone())).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Dict(dict.clone()));

        assert_eq!(dict_to_json(&dict)["max"], "inf");
    }
}
