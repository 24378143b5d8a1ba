//! Mapping of raw JSON records into typed entities.
//!
//! Every entity declares the wire fields it cannot do without. A record is
//! checked against that list before serde builds the struct, so a missing
//! or null required field is reported by name instead of surfacing as a
//! generic deserialization failure. Optional fields are `Option<_>` with
//! `#[serde(default)]` and map absent keys to `None`. A value of the wrong
//! type is reported with its path, e.g. `legs[0].qty`.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{Error, Result};

/// A typed record produced from an API response.
pub trait Entity: DeserializeOwned {
    /// Entity name used in mapping errors.
    const NAME: &'static str;

    /// Wire fields that must be present and non-null.
    const REQUIRED: &'static [&'static str];

    /// Check a raw record against this entity's shape.
    ///
    /// Entities with nested entities override this to recurse.
    fn validate(record: &Map<String, Value>) -> Result<()> {
        require_fields(Self::NAME, Self::REQUIRED, record)
    }

    /// Map a raw record into this entity.
    fn from_value(value: Value) -> Result<Self> {
        let record = value.as_object().ok_or_else(|| {
            Error::mapping(
                Self::NAME,
                None,
                format!("expected an object, got {}", json_kind(&value)),
            )
        })?;
        Self::validate(record)?;

        serde_path_to_error::deserialize(value).map_err(|e| {
            let path = e.path().to_string();
            let field = (path != ".").then_some(path.as_str());
            Error::mapping(Self::NAME, field, e.inner().to_string())
        })
    }
}

/// Map a raw record into `T`.
pub fn map_entity<T: Entity>(value: Value) -> Result<T> {
    T::from_value(value)
}

/// Map a raw array of records into a list of `T`.
///
/// A JSON `null` is treated as an empty list, matching how the API reports
/// empty collections on some endpoints.
pub fn map_list<T: Entity>(value: Value) -> Result<Vec<T>> {
    match value {
        Value::Array(items) => items.into_iter().map(T::from_value).collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(Error::mapping(
            T::NAME,
            None,
            format!("expected an array, got {}", json_kind(&other)),
        )),
    }
}

/// Fail on the first required field that is absent or null.
pub(crate) fn require_fields(
    entity: &'static str,
    required: &[&str],
    record: &Map<String, Value>,
) -> Result<()> {
    for field in required {
        match record.get(*field) {
            None => {
                return Err(Error::mapping(
                    entity,
                    Some(field),
                    "required field is missing",
                ))
            }
            Some(Value::Null) => {
                return Err(Error::mapping(entity, Some(field), "required field is null"))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
