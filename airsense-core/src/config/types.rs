//! Configuration type definitions
//!
//! [`Configuration`] is a plain owned value. The application keeps one
//! instance and lends it out by reference; loading replaces it wholesale.

use core::fmt;

use heapless::String;

use super::fields::{
    assign, assign_truncated, Field, FieldError, MAX_COAP_SERVER_LEN, MAX_MQTT_SERVER_LEN,
    MAX_MQTT_TOPIC_LEN, MAX_PASSWORD_LEN, MAX_USERNAME_LEN,
};

/// Default MQTT topic template
pub const DEFAULT_MQTT_TOPIC: &str = "esp8266-vindriktning-particle-sensor/%s";

/// Placeholder in the topic template replaced by the device id
pub const TOPIC_PLACEHOLDER: &str = "%s";

/// Maximum length of an expanded topic
pub const MAX_TOPIC_LEN: usize = 128;

/// Shown instead of a secret value in diagnostics
pub const REDACTED: &str = "********";

/// Device configuration
#[derive(Clone, PartialEq, Eq)]
pub struct Configuration {
    /// MQTT broker hostname or IP
    pub mqtt_server: String<MAX_MQTT_SERVER_LEN>,
    /// MQTT topic template
    pub mqtt_topic: String<MAX_MQTT_TOPIC_LEN>,
    /// MQTT username
    pub username: String<MAX_USERNAME_LEN>,
    /// MQTT password
    pub password: String<MAX_PASSWORD_LEN>,
    /// CoAP server address
    pub coap_server: String<MAX_COAP_SERVER_LEN>,
}

impl Default for Configuration {
    fn default() -> Self {
        let mut mqtt_topic = String::new();
        // DEFAULT_MQTT_TOPIC fits MAX_MQTT_TOPIC_LEN
        let _ = mqtt_topic.push_str(DEFAULT_MQTT_TOPIC);

        Self {
            mqtt_server: String::new(),
            mqtt_topic,
            username: String::new(),
            password: String::new(),
            coap_server: String::new(),
        }
    }
}

// Manual impl keeps the password out of `{:?}` output
impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("mqtt_server", &self.mqtt_server.as_str())
            .field("mqtt_topic", &self.mqtt_topic.as_str())
            .field("username", &self.username.as_str())
            .field("password", &self.redacted(Field::Password))
            .field("coap_server", &self.coap_server.as_str())
            .finish()
    }
}

impl Configuration {
    /// Get a field value
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::MqttServer => self.mqtt_server.as_str(),
            Field::MqttTopic => self.mqtt_topic.as_str(),
            Field::Username => self.username.as_str(),
            Field::Password => self.password.as_str(),
            Field::CoapServer => self.coap_server.as_str(),
        }
    }

    /// Get a field value safe for diagnostics
    ///
    /// Secret fields show [`REDACTED`] when set and stay empty otherwise.
    pub fn redacted(&self, field: Field) -> &str {
        let value = self.get(field);
        if field.is_secret() && !value.is_empty() {
            REDACTED
        } else {
            value
        }
    }

    /// Set a field, rejecting values longer than the field's maximum
    pub fn set(&mut self, field: Field, value: &str) -> Result<(), FieldError> {
        match field {
            Field::MqttServer => assign(field, &mut self.mqtt_server, value),
            Field::MqttTopic => assign(field, &mut self.mqtt_topic, value),
            Field::Username => assign(field, &mut self.username, value),
            Field::Password => assign(field, &mut self.password, value),
            Field::CoapServer => assign(field, &mut self.coap_server, value),
        }
    }

    /// Set a field, truncating values longer than the field's maximum
    ///
    /// Returns `true` if the value was truncated.
    pub fn set_truncated(&mut self, field: Field, value: &str) -> bool {
        match field {
            Field::MqttServer => assign_truncated(&mut self.mqtt_server, value),
            Field::MqttTopic => assign_truncated(&mut self.mqtt_topic, value),
            Field::Username => assign_truncated(&mut self.username, value),
            Field::Password => assign_truncated(&mut self.password, value),
            Field::CoapServer => assign_truncated(&mut self.coap_server, value),
        }
    }

    /// Clear a field
    pub fn clear(&mut self, field: Field) {
        self.set_truncated(field, "");
    }

    /// Expand the topic template for a device
    ///
    /// The first `%s` is replaced by `device_id`; a template without a
    /// placeholder is used as-is.
    pub fn topic(&self, device_id: &str) -> Result<String<MAX_TOPIC_LEN>, FieldError> {
        let template = self.mqtt_topic.as_str();
        let (head, tail) = match template.find(TOPIC_PLACEHOLDER) {
            Some(at) => (&template[..at], &template[at + TOPIC_PLACEHOLDER.len()..]),
            None => (template, ""),
        };
        let id = if head.len() == template.len() {
            ""
        } else {
            device_id
        };

        let len = head.len() + id.len() + tail.len();
        let too_long = FieldError::TooLong {
            field: Field::MqttTopic,
            max: MAX_TOPIC_LEN,
            len,
        };
        if len > MAX_TOPIC_LEN {
            return Err(too_long);
        }

        let mut topic = String::new();
        for part in [head, id, tail] {
            topic.push_str(part).map_err(|_| too_long)?;
        }
        Ok(topic)
    }
}
