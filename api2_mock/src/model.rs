use anyhow::{bail, Result};
use chrono::{DateTime, Local};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Format of the `timestamp` written in each request log line.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ORDER_NUMBER_KEY: &str = "orderNumber";

/// Wire flavour of the push endpoint.
///
/// `A` is the envelope the real API2 answers with, `B` is the older
/// `receivedData` echo. They also disagree on the casing of the file URL key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    A,
    B,
}

impl Variant {
    /// Key carrying the file URL in requests and log lines.
    pub fn file_url_key(&self) -> &'static str {
        match self {
            Variant::A => "fileUrl",
            Variant::B => "fileURL",
        }
    }

    /// Human readable example of what a client is expected to send.
    pub fn expected_payload(&self) -> String {
        format!(
            "{{ \"{}\": \"<order number>\", \"{}\": \"<file URL>\" }}",
            ORDER_NUMBER_KEY,
            self.file_url_key()
        )
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::A => write!(f, "a"),
            Variant::B => write!(f, "b"),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("Unknown API2 variant {0:?}, expected `a` or `b`")]
pub struct UnknownVariant(String);

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(Variant::A),
            "b" => Ok(Variant::B),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// A client telling API2 that the file of an order is available.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PushRequest {
    pub order_number: String,
    pub file_url:     String,
}

impl PushRequest {
    /// Pull the two fields out of a decoded body. Absent or `null` fields are
    /// empty strings, other non-string values keep their JSON text.
    pub fn from_json(document: &Value, variant: Variant) -> Result<Self> {
        let Value::Object(fields) = document else {
            bail!(
                "Expected the push payload to be a JSON object, got {}",
                kind_of(document)
            );
        };

        Ok(Self {
            order_number: field_as_string(fields, ORDER_NUMBER_KEY),
            file_url:     field_as_string(fields, variant.file_url_key()),
        })
    }

    /// View of the request serializing with the keys of `variant`.
    pub fn wire(&self, variant: Variant) -> PushRequestWire<'_> {
        PushRequestWire { request: self, variant }
    }
}

fn field_as_string(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(value)) => value.clone(),
        Some(other) => other.to_string(),
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

#[derive(Debug, Clone, Copy)]
pub struct PushRequestWire<'a> {
    request: &'a PushRequest,
    variant: Variant,
}

impl Serialize for PushRequestWire<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(ORDER_NUMBER_KEY, &self.request.order_number)?;
        map.serialize_entry(self.variant.file_url_key(), &self.request.file_url)?;
        map.end()
    }
}

/// One line of the request log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub request:   PushRequest,
    pub variant:   Variant,
}

impl LogEntry {
    pub fn new(
        received_at: DateTime<Local>,
        request: PushRequest,
        variant: Variant,
    ) -> Self {
        Self {
            timestamp: received_at.format(LOG_TIMESTAMP_FORMAT).to_string(),
            request,
            variant,
        }
    }
}

impl Serialize for LogEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("timestamp", &self.timestamp)?;
        map.serialize_entry(ORDER_NUMBER_KEY, &self.request.order_number)?;
        map.serialize_entry(self.variant.file_url_key(), &self.request.file_url)?;
        map.end()
    }
}

/// Reply envelope of the real API2 service (variant A).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub code:      u16,
    pub msg:       String,
    pub data:      Option<Value>,
    pub timestamp: String,
    pub trace_id:  Option<String>,
}

/// Reply of variant B.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Acknowledgement {
    pub code:          u16,
    pub message:       String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_data: Option<ReceivedData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceivedData {
    #[serde(rename = "orderNumber")]
    pub order_number: String,
    #[serde(rename = "fileURL")]
    pub file_url:     String,
}

impl From<&PushRequest> for ReceivedData {
    fn from(request: &PushRequest) -> Self {
        Self {
            order_number: request.order_number.clone(),
            file_url:     request.file_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReplyBody {
    Envelope(Envelope),
    Acknowledgement(Acknowledgement),
}

/// The part of any API2 reply a client cares about: both variants carry a
/// `code`, the message key is `msg` or `message`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplyStatus {
    pub code: u16,
    #[serde(alias = "message", default)]
    pub msg:  String,
}
