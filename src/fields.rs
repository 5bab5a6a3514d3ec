//! Named-parameter input for the entity handlers.
//!
//! Every handler receives one JSON object. Accessors here enforce the type
//! rules and produce [`WriteError::Validation`] with a message naming the
//! offending field.

use serde_json::{Map, Value};

use crate::error::{Result, WriteError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Map<String, Value>);

/// Loose truthiness: `null`, `false`, `0`, and `""` count as unset.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl Fields {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(WriteError::validation(format!(
                "request body must be a JSON object, got {}",
                kind_of(&other)
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The key exists at all, whatever its value.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// The key exists and holds a truthy value.
    pub fn is_set(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(is_truthy)
    }

    /// Optional identifier: unset means "create", otherwise it must be a string.
    pub fn identifier(&self, key: &str) -> Result<Option<String>> {
        match self.0.get(key) {
            Some(value) if is_truthy(value) => match value {
                Value::String(s) => Ok(Some(s.clone())),
                _ => Err(WriteError::validation(format!(
                    "'{key}' must be a string when present"
                ))),
            },
            _ => Ok(None),
        }
    }

    pub fn required_str(&self, key: &str) -> Result<String> {
        match self.0.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
            _ => Err(WriteError::validation(format!(
                "'{key}' is required and must be a string"
            ))),
        }
    }

    /// A whole number; `1.5` and `2.0` are both rejected.
    pub fn required_integer(&self, key: &str) -> Result<i64> {
        self.0.get(key).and_then(Value::as_i64).ok_or_else(|| {
            WriteError::validation(format!("'{key}' is required and must be an integer"))
        })
    }

    /// Like [`required_integer`](Self::required_integer) but zero is rejected too.
    pub fn required_nonzero_integer(&self, key: &str) -> Result<i64> {
        match self.0.get(key).and_then(Value::as_i64) {
            Some(n) if n != 0 => Ok(n),
            _ => Err(WriteError::validation(format!(
                "'{key}' is required and must be a non-zero integer"
            ))),
        }
    }

    /// A boolean that must be present and `true`.
    pub fn required_true(&self, key: &str) -> Result<bool> {
        match self.0.get(key) {
            Some(Value::Bool(true)) => Ok(true),
            _ => Err(WriteError::validation(format!(
                "'{key}' is required and must be the boolean true"
            ))),
        }
    }

    /// A boolean defaulting to `false` when missing or null.
    pub fn optional_bool(&self, key: &str) -> Result<bool> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(WriteError::validation(format!(
                "'{key}' must be a boolean"
            ))),
        }
    }

    pub fn required_object(&self, key: &str) -> Result<&Map<String, Value>> {
        match self.0.get(key) {
            Some(Value::Object(map)) => Ok(map),
            _ => Err(WriteError::validation(format!(
                "'{key}' is required and must be a JSON object"
            ))),
        }
    }
}

impl From<Map<String, Value>> for Fields {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        Fields::from_value(value).unwrap()
    }

    #[test]
    fn body_must_be_an_object() {
        let err = Fields::from_value(json!([1, 2])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid input: request body must be a JSON object, got an array"
        );
    }

    #[test]
    fn truthiness_matches_loose_rules() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!(" ")));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
    }

    #[test]
    fn identifier_unset_forms() {
        for id in [json!(null), json!(false), json!("")] {
            assert_eq!(fields(json!({ "id": id })).identifier("id").unwrap(), None);
        }
        assert_eq!(fields(json!({})).identifier("id").unwrap(), None);
    }

    #[test]
    fn identifier_must_be_string() {
        assert_eq!(
            fields(json!({"id": "b-1"})).identifier("id").unwrap(),
            Some("b-1".to_string())
        );
        assert!(fields(json!({"id": 42})).identifier("id").is_err());
    }

    #[test]
    fn required_str_rejects_blank_and_wrong_type() {
        let f = fields(json!({"a": "  ", "b": 3, "c": "ok"}));
        assert!(f.required_str("a").is_err());
        assert!(f.required_str("b").is_err());
        assert!(f.required_str("missing").is_err());
        assert_eq!(f.required_str("c").unwrap(), "ok");
    }

    #[test]
    fn integer_accessors_differ_on_zero() {
        let f = fields(json!({"n": 0, "s": "1", "p": 3}));
        assert_eq!(f.required_integer("n").unwrap(), 0);
        assert!(f.required_nonzero_integer("n").is_err());
        assert!(f.required_integer("s").is_err());
        assert_eq!(f.required_nonzero_integer("p").unwrap(), 3);
    }

    #[test]
    fn integer_accessors_reject_fractions() {
        let f = fields(json!({"half": 1.5, "whole_float": 2.0}));
        assert!(f.required_integer("half").is_err());
        assert!(f.required_nonzero_integer("half").is_err());
        assert!(f.required_integer("whole_float").is_err());
    }

    #[test]
    fn required_true_rejects_false() {
        let f = fields(json!({"yes": true, "no": false, "str": "true"}));
        assert!(f.required_true("yes").unwrap());
        assert!(f.required_true("no").is_err());
        assert!(f.required_true("str").is_err());
    }

    #[test]
    fn optional_bool_defaults_to_false() {
        let f = fields(json!({"t": true, "n": null, "bad": 1}));
        assert!(f.optional_bool("t").unwrap());
        assert!(!f.optional_bool("n").unwrap());
        assert!(!f.optional_bool("missing").unwrap());
        assert!(f.optional_bool("bad").is_err());
    }

    #[test]
    fn required_object_rejects_null_and_arrays() {
        let f = fields(json!({"o": {}, "n": null, "a": []}));
        assert!(f.required_object("o").is_ok());
        assert!(f.required_object("n").is_err());
        assert!(f.required_object("a").is_err());
    }
}
