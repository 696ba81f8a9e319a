//! # Wire representation
//!
//! Outcomes serialize as a map discriminated by `success`:
//!
//! ```json
//! { "success": true, "data": 42 }
//! { "success": false, "error": "NotFound", "reason": "user 42" }
//! ```
//!
//! `reason` is omitted when absent. The origin is not serialized. A failure
//! read back gets a fresh origin pointing into this module's deserializer,
//! not at the caller of `serde_json::from_str` or similar: the call reaches
//! the deserializer through serde, which does not forward caller locations.
//! Its stack, when captured, still shows the caller's frames.

use crate::error::Origin;
use crate::failure::Failure;
use crate::outcome::Outcome;
use serde::de::{self, value::UnitDeserializer, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a serialized outcome was rejected
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    #[error("missing `data` on a successful outcome")]
    MissingData,

    #[error("missing `error` on a failed outcome")]
    MissingError,

    #[error("failure fields present on a successful outcome")]
    FailureOnSuccess,

    #[error("`data` present on a failed outcome")]
    DataOnFailure,
}

impl<T, E, R> Serialize for Outcome<T, E, R>
where
    T: Serialize,
    E: Serialize,
    R: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Outcome::Ok(data) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("data", data)?;
                map.end()
            }
            Outcome::Err(failure) => {
                let len = if failure.reason().is_some() { 3 } else { 2 };
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", failure.error())?;
                if let Some(reason) = failure.reason() {
                    map.serialize_entry("reason", reason)?;
                }
                map.end()
            }
        }
    }
}

#[derive(Deserialize)]
struct Wire<T, E, R> {
    success: bool,
    data: Option<T>,
    error: Option<E>,
    reason: Option<R>,
}

impl<'de, T, E, R> Deserialize<'de> for Outcome<T, E, R>
where
    T: Deserialize<'de>,
    E: Deserialize<'de>,
    R: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = Wire::<T, E, R>::deserialize(deserializer)?;

        if wire.success {
            if wire.error.is_some() || wire.reason.is_some() {
                return Err(de::Error::custom(WireError::FailureOnSuccess));
            }
            let data = match wire.data {
                Some(data) => data,
                // `()` and `Option<_>` payloads may be absent or null
                None => T::deserialize(UnitDeserializer::<D::Error>::new())
                    .map_err(|_| de::Error::custom(WireError::MissingData))?,
            };
            return Ok(Outcome::Ok(data));
        }

        if wire.data.is_some() {
            return Err(de::Error::custom(WireError::DataOnFailure));
        }
        match wire.error {
            Some(error) => Ok(Outcome::Err(Failure::from_parts(error, wire.reason, Origin::here()))),
            None => Err(de::Error::custom(WireError::MissingError)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Tag;
    use crate::outcome::{err, err_with, ok};
    use serde_json::json;

    #[test]
    fn test_serialize_success() {
        let out: Outcome<i32> = ok(42);
        assert_eq!(serde_json::to_value(&out).unwrap(), json!({"success": true, "data": 42}));

        let unit: Outcome<()> = ok(());
        assert_eq!(serde_json::to_value(&unit).unwrap(), json!({"success": true, "data": null}));
    }

    #[test]
    fn test_serialize_failure() {
        let out: Outcome<i32, Tag, String> = err_with(Tag::from("NotFound"), "user 42".to_string());
        assert_eq!(
            serde_json::to_value(&out).unwrap(),
            json!({"success": false, "error": "NotFound", "reason": "user 42"})
        );

        let out: Outcome<i32> = err(Tag::from("Timeout"));
        assert_eq!(
            serde_json::to_value(&out).unwrap(),
            json!({"success": false, "error": "Timeout"})
        );
    }

    #[test]
    fn test_deserialize() {
        let out: Outcome<Vec<u8>> = serde_json::from_value(json!({"success": true, "data": [1, 2]})).unwrap();
        assert_eq!(out, ok(vec![1, 2]));

        let out: Outcome<u8, Tag, String> =
            serde_json::from_value(json!({"success": false, "error": "Io", "reason": "eof"})).unwrap();
        assert_eq!(out.error(), Some(&Tag::from("Io")));
        assert_eq!(out.reason().map(String::as_str), Some("eof"));

        // the fresh origin points into the deserializer
        let origin = out.failure().unwrap().origin().location();
        assert!(origin.file().ends_with("wire.rs"));
    }

    #[test]
    fn test_deserialize_unit_data() {
        let out: Outcome<()> = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(out.is_ok());

        let out: Outcome<Option<u8>> = serde_json::from_value(json!({"success": true, "data": null})).unwrap();
        assert_eq!(out, ok(None));
    }

    #[test]
    fn test_reject_inconsistent() {
        let missing = serde_json::from_value::<Outcome<u8>>(json!({"success": true}));
        assert!(missing.unwrap_err().to_string().contains("missing `data`"));

        let missing = serde_json::from_value::<Outcome<u8>>(json!({"success": false}));
        assert!(missing.unwrap_err().to_string().contains("missing `error`"));

        let mixed = serde_json::from_value::<Outcome<u8>>(json!({"success": true, "data": 1, "error": "A"}));
        assert!(mixed.unwrap_err().to_string().contains("failure fields"));

        let mixed = serde_json::from_value::<Outcome<u8>>(json!({"success": false, "data": 1, "error": "A"}));
        assert!(mixed.unwrap_err().to_string().contains("`data` present"));
    }
}
