//! `serde_json::Value` as a gatherable record.
//!
//! Objects are records whose members are their keys, so dotted paths walk
//! nested objects. Arrays become [`Array::Values`] and can be queried with the
//! collection operators.

use serde_json::Value as Json;

use crate::convert::AsValue;
use crate::resolve::{Gatherable, Member};
use crate::value::{Array, Number, Value};

impl Gatherable for Json {
    fn member(&self, name: &str) -> Member<'_> {
        match self {
            Json::Object(map) => match map.get(name) {
                Some(object @ Json::Object(_)) => Member::Record(object),
                Some(value) => Member::Value(value.as_value()),
                None => Member::Absent,
            },
            _ => Member::Absent,
        }
    }

    fn is_null(&self) -> bool {
        matches!(self, Json::Null)
    }
}

impl AsValue for Json {
    fn as_value(&self) -> Value<'_> {
        match self {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
                (Some(i), _, _) => Value::Number(Number::I64(i)),
                (None, Some(u), _) => Value::Number(Number::U64(u)),
                (None, None, Some(f)) => Value::Number(Number::F64(f)),
                (None, None, None) => Value::Null,
            },
            Json::String(s) => Value::String(s),
            Json::Array(items) => {
                Value::Array(Array::Values(items.iter().map(|v| v.as_value()).collect()))
            }
            Json::Object(_) => Value::Record(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::resolve::resolve;

    #[test]
    fn walks_nested_objects() {
        let doc = json!({ "user": { "name": "ada", "age": 36 } });
        let slot = resolve(&doc, "user.name").unwrap().unwrap();
        assert_eq!(slot.read().unwrap(), Value::String("ada"));

        let slot = resolve(&doc, "user.age").unwrap().unwrap();
        assert_eq!(slot.read().unwrap(), Value::Number(Number::I64(36)));
    }

    #[test]
    fn json_null_resolves_to_null() {
        let doc = json!({ "nickname": null, "parent": null });
        let slot = resolve(&doc, "nickname").unwrap().unwrap();
        assert_eq!(slot.read().unwrap(), Value::Null);
        assert!(resolve(&doc, "parent.name").unwrap().is_none());
    }

    #[test]
    fn arrays_become_values() {
        let doc = json!({ "tags": ["a", 1] });
        let slot = resolve(&doc, "tags").unwrap().unwrap();
        assert_eq!(
            slot.read().unwrap(),
            Value::Array(Array::Values(vec![
                Value::String("a"),
                Value::Number(Number::I64(1))
            ]))
        );
    }

    #[test]
    fn scalars_have_no_members() {
        let doc = json!(5);
        assert!(resolve(&doc, "anything").unwrap().is_none());
    }
}
