//! Shape validation for batch inputs: a non-empty array of objects whose
//! required keys all hold non-blank strings.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeViolation {
    #[error("The parameter must be an array")]
    NotArray,

    #[error("The array must not be empty")]
    Empty,

    #[error("Each array's element must be an object")]
    NotObject,

    #[error("Each object must contain the key '{0}'")]
    MissingKey(String),

    #[error("The value of '{0}' must be a not empty string")]
    BlankValue(String),
}

/// Serializable `{valid, error}` verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeCheck {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<(), ShapeViolation>> for ShapeCheck {
    fn from(result: Result<(), ShapeViolation>) -> Self {
        match result {
            Ok(()) => Self {
                valid: true,
                error: None,
            },
            Err(violation) => Self {
                valid: false,
                error: Some(violation.to_string()),
            },
        }
    }
}

/// Check `items` and stop at the first violation, scanning elements in order
/// and keys in the order given.
pub fn check(items: &Value, required_keys: &[&str]) -> Result<(), ShapeViolation> {
    let array = items.as_array().ok_or(ShapeViolation::NotArray)?;
    if array.is_empty() {
        return Err(ShapeViolation::Empty);
    }

    for item in array {
        let object = item.as_object().ok_or(ShapeViolation::NotObject)?;
        for key in required_keys {
            match object.get(*key) {
                None => return Err(ShapeViolation::MissingKey((*key).to_string())),
                Some(Value::String(s)) if !s.trim().is_empty() => {}
                Some(_) => return Err(ShapeViolation::BlankValue((*key).to_string())),
            }
        }
    }

    Ok(())
}

pub fn validate(items: &Value, required_keys: &[&str]) -> ShapeCheck {
    check(items, required_keys).into()
}
