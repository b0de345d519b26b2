//! Network address columns

use crate::codec::ColumnCodec;
use crate::errors::CodecError;
use crate::types::PostgresValue;
use crate::wire::{TypedObject, WireValue};
use std::net::IpAddr;

pub const INET_SQL_TYPE: &str = "INET";

#[derive(Debug, Clone, Copy, Default)]
pub struct InetCodec;

impl InetCodec {
    pub fn new() -> Self {
        Self
    }
}

/// Parse the backend's text form. Host addresses may carry a `/32` or `/128`
/// suffix, which is dropped.
fn parse_host_address(text: &str) -> Result<IpAddr, CodecError> {
    let host = text.split('/').next().unwrap_or(text).trim();
    host.parse::<IpAddr>()
        .map_err(|_| CodecError::type_mismatch("inet address", format!("'{}'", text)))
}

impl ColumnCodec for InetCodec {
    type Native = IpAddr;

    fn sql_type(&self) -> String {
        INET_SQL_TYPE.to_string()
    }

    fn encode(&self, value: &IpAddr) -> Result<WireValue, CodecError> {
        Ok(WireValue::Object(TypedObject::new(
            INET_SQL_TYPE,
            Some(value.to_string()),
        )))
    }

    fn decode(&self, value: &WireValue) -> Result<IpAddr, CodecError> {
        match value {
            WireValue::Scalar(PostgresValue::Inet(ip)) => Ok(*ip),
            WireValue::Scalar(PostgresValue::Text(text)) => parse_host_address(text),
            WireValue::Object(TypedObject {
                value: Some(text), ..
            }) => parse_host_address(text),
            other => Err(CodecError::type_mismatch(INET_SQL_TYPE, other.describe())),
        }
    }
}
