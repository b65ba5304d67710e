//! Conversion from `serde_json` documents into source values.

use alloc::string::ToString;

use super::{Key, Value};

impl From<::serde_json::Value> for Value {
    fn from(json: ::serde_json::Value) -> Self {
        match json {
            ::serde_json::Value::Null => Value::Null,
            ::serde_json::Value::Bool(v) => Value::Bool(v),
            ::serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Double(f)
                } else {
                    // u64 beyond i64::MAX without an f64 form
                    Value::Text(n.to_string())
                }
            }
            ::serde_json::Value::String(s) => Value::Text(s),
            ::serde_json::Value::Array(items) => Value::list(items),
            ::serde_json::Value::Object(fields) => {
                Value::map(fields.into_iter().map(|(k, v)| (Key::from(k), v)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_becomes_named_array() {
        let json = ::serde_json::json!({"name": "Ann", "age": 31, "tags": ["a"]});
        let Value::Array(array) = Value::from(json) else {
            panic!("expected array");
        };
        assert!(matches!(array.get(&Key::from("age")), Some(Value::Integer(31))));
        assert!(matches!(array.get(&Key::from("tags")), Some(Value::Array(_))));
    }

    #[test]
    fn test_numbers_keep_their_kind() {
        assert!(matches!(Value::from(::serde_json::json!(1.5)), Value::Double(v) if v == 1.5));
        assert!(matches!(Value::from(::serde_json::json!(-3)), Value::Integer(-3)));
    }
}
