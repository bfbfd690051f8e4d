use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::{Key, Node, Scalar, Value};

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Str(key) => serializer.serialize_str(key),
            Self::Int(key) => serializer.serialize_i64(*key),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::UInt(value) => serializer.serialize_u64(*value),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::Str(value) => serializer.serialize_str(value),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Mapping(node) => node.serialize(serializer),
            Self::Sequence(values) => values.serialize(serializer),
            Self::Scalar(scalar) => scalar.serialize(serializer),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct KeyVisitor;

impl Visitor<'_> for KeyVisitor {
    type Value = Key;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string or integer mapping key")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Key, E> {
        Ok(Key::from(value))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Key, E> {
        Ok(Key::from(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Key, E> {
        Ok(Key::Int(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Key, E> {
        // Out of range integers keep their textual form
        Ok(i64::try_from(value).map_or_else(|_| Key::Str(value.to_string()), Key::Int))
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Key, E> {
        Ok(Key::Str(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Key, E> {
        Ok(Key::Str(value.to_string()))
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(KeyVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a mapping, a sequence or a scalar")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Scalar(Scalar::Null))
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Scalar(Scalar::Null))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Value, E> {
        Ok(Value::Scalar(Scalar::Bool(value)))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Value, E> {
        Ok(Value::Scalar(Scalar::Int(value)))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Value, E> {
        let scalar = i64::try_from(value).map_or(Scalar::UInt(value), Scalar::Int);
        Ok(Value::Scalar(scalar))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Value, E> {
        Ok(Value::Scalar(Scalar::Float(value)))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Value, E> {
        Ok(Value::from(value))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Value, E> {
        Ok(Value::from(value))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut values = Vec::with_capacity(seq.size_hint().unwrap_or_default());
        while let Some(value) = seq.next_element()? {
            values.push(value);
        }
        Ok(Value::Sequence(values))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Value, A::Error> {
        NodeVisitor.visit_map(map).map(Value::Mapping)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a mapping")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
        let mut node = Node::new();
        while let Some((key, value)) = map.next_entry::<Key, Value>()? {
            node.insert(key, value);
        }
        Ok(node)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(NodeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_deserialize_nested_json() {
        let node: Node = serde_json::from_value(json!({
            "openapi": "3.0.0",
            "paths": {"/ping": {"get": {"deprecated": false}}},
            "tags": ["a", 1, 2.5, null],
        }))
        .expect("a mapping");

        assert_eq!(node.get("openapi").and_then(Value::as_str), Some("3.0.0"));
        let tags = node.get("tags").expect("tags");
        assert_eq!(
            tags,
            &Value::Sequence(vec![
                Value::from("a"),
                Value::Scalar(Scalar::Int(1)),
                Value::Scalar(Scalar::Float(2.5)),
                Value::Scalar(Scalar::Null),
            ])
        );
        assert!(
            node.get("paths")
                .and_then(Value::as_mapping)
                .and_then(|paths| paths.get("/ping"))
                .and_then(Value::as_mapping)
                .is_some()
        );
    }

    #[test]
    fn should_reject_non_mapping_root() {
        let result = serde_json::from_value::<Node>(json!(["not", "a", "mapping"]));

        assert!(result.is_err());
    }

    #[test]
    fn should_serialize_in_document_order() {
        let node: Node = serde_json::from_str(r#"{"b": 1, "a": {"z": true, "y": "x"}}"#)
            .expect("a mapping");

        let json = serde_json::to_string(&node).expect("serializable");

        assert_eq!(json, r#"{"b":1,"a":{"z":true,"y":"x"}}"#);
    }

    #[test]
    fn should_read_numeric_keys_from_yaml() {
        let node: Node = serde_saphyr::from_str("responses:\n  200:\n    description: ok\n")
            .expect("valid YAML");

        let responses = node
            .get("responses")
            .and_then(Value::as_mapping)
            .expect("responses");
        assert!(responses.get("200").is_some());
    }
}
