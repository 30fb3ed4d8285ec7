//! Field identifiers and bounded copies
//!
//! Every configuration field is a fixed-capacity string. Copies into a
//! field either fail with [`FieldError::TooLong`] or truncate on a `char`
//! boundary; they never write past the capacity.

use core::fmt;

use heapless::String;

/// Maximum MQTT broker address length
pub const MAX_MQTT_SERVER_LEN: usize = 80;

/// Maximum MQTT topic template length
pub const MAX_MQTT_TOPIC_LEN: usize = 80;

/// Maximum MQTT username length
pub const MAX_USERNAME_LEN: usize = 24;

/// Maximum MQTT password length
pub const MAX_PASSWORD_LEN: usize = 72;

/// Maximum CoAP server address length
pub const MAX_COAP_SERVER_LEN: usize = 16;

/// A configuration field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    /// Hostname or IP of the MQTT broker
    MqttServer,
    /// Topic template, `%s` is replaced by the device id
    MqttTopic,
    /// MQTT username
    Username,
    /// MQTT password
    Password,
    /// Address of the CoAP server
    CoapServer,
}

impl Field {
    /// All fields, in display order
    pub const ALL: [Field; 5] = [
        Field::MqttServer,
        Field::MqttTopic,
        Field::Username,
        Field::Password,
        Field::CoapServer,
    ];

    /// Key of this field in the persisted document
    pub const fn key(self) -> &'static str {
        match self {
            Field::MqttServer => "mqtt_server",
            Field::MqttTopic => "mqtt_topic",
            Field::Username => "username",
            Field::Password => "password",
            Field::CoapServer => "coap_server",
        }
    }

    /// Maximum value length in bytes
    pub const fn max_len(self) -> usize {
        match self {
            Field::MqttServer => MAX_MQTT_SERVER_LEN,
            Field::MqttTopic => MAX_MQTT_TOPIC_LEN,
            Field::Username => MAX_USERNAME_LEN,
            Field::Password => MAX_PASSWORD_LEN,
            Field::CoapServer => MAX_COAP_SERVER_LEN,
        }
    }

    /// Whether the value must be kept out of diagnostics
    pub const fn is_secret(self) -> bool {
        matches!(self, Field::Password)
    }

    /// Look up a field by its document key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Errors from writing a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldError {
    /// Value does not fit the field
    TooLong {
        /// Field being written
        field: Field,
        /// Field capacity in bytes
        max: usize,
        /// Length of the rejected value in bytes
        len: usize,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::TooLong { field, max, len } => write!(
                f,
                "value for {} too long: {} bytes, max {}",
                field, len, max
            ),
        }
    }
}

/// Replace `dst` with `src`, or fail without touching `dst`
pub fn assign<const N: usize>(
    field: Field,
    dst: &mut String<N>,
    src: &str,
) -> Result<(), FieldError> {
    if src.len() > N {
        return Err(FieldError::TooLong {
            field,
            max: N,
            len: src.len(),
        });
    }
    dst.clear();
    dst.push_str(src).map_err(|_| FieldError::TooLong {
        field,
        max: N,
        len: src.len(),
    })
}

/// Replace `dst` with the longest prefix of `src` that fits
///
/// The cut always lands on a `char` boundary. Returns `true` if `src` was
/// truncated.
pub fn assign_truncated<const N: usize>(dst: &mut String<N>, src: &str) -> bool {
    let end = floor_char_boundary(src, N);
    dst.clear();
    // Cannot fail: end <= N
    let _ = dst.push_str(&src[..end]);
    end < src.len()
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if max >= s.len() {
        return s.len();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    end
}
