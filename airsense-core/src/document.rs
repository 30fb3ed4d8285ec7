//! JSON document codec
//!
//! The persisted form of a [`Configuration`] is a flat JSON object with one
//! string value per field:
//!
//! ```json
//! {"coap_server":"","mqtt_server":"broker.local","mqtt_topic":"sensors/%s","username":"u","password":"p"}
//! ```
//!
//! The document limit covers the worst case: every value at its field's
//! maximum length and made only of control characters, each written as a
//! six byte `\u00XX` escape.
//!
//! Decoding goes through an intermediate document whose values have their
//! field's capacity but remember the length of a value that did not fit, so
//! an oversized value is reported against the field it belongs to.

use core::fmt;

use heapless::String;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::config::{
    Configuration, Field, FieldError, MAX_COAP_SERVER_LEN, MAX_MQTT_SERVER_LEN,
    MAX_MQTT_TOPIC_LEN, MAX_PASSWORD_LEN, MAX_USERNAME_LEN,
};
use crate::store::ConfigError;

/// Longest escape `serde-json-core` writes for one byte of a value
const MAX_ESCAPE_LEN: usize = 6;

/// Braces, keys, quotes, colons and commas of the document
const DOCUMENT_OVERHEAD: usize =
    br#"{"coap_server":"","mqtt_server":"","mqtt_topic":"","username":"","password":""}"#.len();

/// Maximum size of the persisted document in bytes
pub const MAX_DOCUMENT_SIZE: usize = MAX_ESCAPE_LEN
    * (MAX_MQTT_SERVER_LEN
        + MAX_MQTT_TOPIC_LEN
        + MAX_USERNAME_LEN
        + MAX_PASSWORD_LEN
        + MAX_COAP_SERVER_LEN)
    + DOCUMENT_OVERHEAD;

/// Errors from decoding the persisted document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Document is not valid UTF-8
    InvalidUtf8,
    /// Document is not a JSON object with every field as a string
    Json,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::InvalidUtf8 => f.write_str("document is not valid UTF-8"),
            DecodeError::Json => f.write_str("document is not a valid configuration object"),
        }
    }
}

/// Borrowed view written on save; field order is the on-disk key order
#[derive(Serialize)]
struct DocumentRef<'a> {
    coap_server: &'a str,
    mqtt_server: &'a str,
    mqtt_topic: &'a str,
    username: &'a str,
    password: &'a str,
}

/// A decoded string value bounded to `N` bytes
///
/// A value longer than `N` is not kept; only its length is, so the caller
/// can report it.
struct DocumentValue<const N: usize> {
    text: String<N>,
    len: usize,
}

impl<const N: usize> DocumentValue<N> {
    fn into_field(self, field: Field) -> Result<String<N>, FieldError> {
        if self.len > N {
            return Err(FieldError::TooLong {
                field,
                max: N,
                len: self.len,
            });
        }
        Ok(self.text)
    }
}

struct DocumentValueVisitor<const N: usize>;

impl<'de, const N: usize> Visitor<'de> for DocumentValueVisitor<N> {
    type Value = DocumentValue<N>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let mut text = String::new();
        if v.len() <= N {
            // Cannot fail: the length was checked
            let _ = text.push_str(v);
        }
        Ok(DocumentValue { text, len: v.len() })
    }
}

impl<'de, const N: usize> Deserialize<'de> for DocumentValue<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(DocumentValueVisitor::<N>)
    }
}

/// Owned document read on load
#[derive(Deserialize)]
struct Document {
    mqtt_server: DocumentValue<MAX_MQTT_SERVER_LEN>,
    mqtt_topic: DocumentValue<MAX_MQTT_TOPIC_LEN>,
    username: DocumentValue<MAX_USERNAME_LEN>,
    password: DocumentValue<MAX_PASSWORD_LEN>,
    coap_server: DocumentValue<MAX_COAP_SERVER_LEN>,
}

impl Document {
    fn into_configuration(self) -> Result<Configuration, FieldError> {
        Ok(Configuration {
            mqtt_server: self.mqtt_server.into_field(Field::MqttServer)?,
            mqtt_topic: self.mqtt_topic.into_field(Field::MqttTopic)?,
            username: self.username.into_field(Field::Username)?,
            password: self.password.into_field(Field::Password)?,
            coap_server: self.coap_server.into_field(Field::CoapServer)?,
        })
    }
}

/// Encode a configuration into `buffer`
///
/// Returns the number of bytes written. The output is compact and
/// deterministic: equal configurations always encode to equal bytes.
pub fn encode(config: &Configuration, buffer: &mut [u8]) -> Result<usize, ConfigError> {
    let document = DocumentRef {
        coap_server: &config.coap_server,
        mqtt_server: &config.mqtt_server,
        mqtt_topic: &config.mqtt_topic,
        username: &config.username,
        password: &config.password,
    };

    serde_json_core::to_slice(&document, buffer).map_err(|_| ConfigError::Encode)
}

/// Decode a configuration from document bytes
pub fn decode(bytes: &[u8]) -> Result<Configuration, ConfigError> {
    core::str::from_utf8(bytes).map_err(|_| ConfigError::Decode(DecodeError::InvalidUtf8))?;

    let mut unescape_buffer = [0u8; MAX_DOCUMENT_SIZE];
    let (document, _) =
        serde_json_core::from_slice_escaped::<Document>(bytes, &mut unescape_buffer)
            .map_err(|_| ConfigError::Decode(DecodeError::Json))?;

    Ok(document.into_configuration()?)
}
