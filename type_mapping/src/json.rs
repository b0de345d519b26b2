//! JSONB columns holding serde types

use crate::codec::ColumnCodec;
use crate::errors::CodecError;
use crate::types::PostgresValue;
use crate::wire::{TypedObject, WireValue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

pub const JSONB_SQL_TYPE: &str = "JSONB";

#[derive(Debug)]
pub struct JsonbCodec<T> {
    _phantom: PhantomData<fn() -> T>,
}

impl<T> JsonbCodec<T> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> Default for JsonbCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonbCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> ColumnCodec for JsonbCodec<T>
where
    T: Serialize + DeserializeOwned,
{
    type Native = T;

    fn sql_type(&self) -> String {
        JSONB_SQL_TYPE.to_string()
    }

    fn encode(&self, value: &T) -> Result<WireValue, CodecError> {
        serde_json::to_value(value)
            .map(|json| WireValue::Scalar(PostgresValue::Json(json)))
            .map_err(|e| CodecError::type_mismatch("serializable value", e.to_string()))
    }

    fn decode(&self, value: &WireValue) -> Result<T, CodecError> {
        let parsed = match value {
            WireValue::Scalar(PostgresValue::Json(json)) => serde_json::from_value(json.clone()),
            WireValue::Scalar(PostgresValue::Text(text))
            | WireValue::Object(TypedObject {
                value: Some(text), ..
            }) => serde_json::from_str(text),
            other => return Err(CodecError::type_mismatch(JSONB_SQL_TYPE, other.describe())),
        };
        parsed.map_err(|e| CodecError::type_mismatch(std::any::type_name::<T>(), e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct SomeModel {
        test: String,
    }

    #[test]
    fn round_trips_struct() {
        let codec = JsonbCodec::<SomeModel>::new();
        let model = SomeModel {
            test: "h1".to_string(),
        };
        let wire = codec.encode(&model).unwrap();
        assert_eq!(codec.decode(&wire).unwrap(), model);
    }

    #[test]
    fn decodes_textual_payloads() {
        let codec = JsonbCodec::<SomeModel>::new();
        let decoded = codec
            .decode(&WireValue::Object(TypedObject::new(
                "jsonb",
                Some(r#"{"test":"h2"}"#.into()),
            )))
            .unwrap();
        assert_eq!(decoded.test, "h2");
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let codec = JsonbCodec::<SomeModel>::new();
        let err = codec
            .decode(&WireValue::Scalar(PostgresValue::Json(serde_json::json!([1, 2]))))
            .unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }));
    }
}
