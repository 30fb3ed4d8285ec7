//! Diagnostic summary of a configuration
//!
//! Renders every field on its own line with secrets redacted. Used for the
//! boot log and the console `show` command.

use core::fmt;

use super::fields::Field;
use super::types::Configuration;

/// Redacted, human-readable view of a [`Configuration`]
#[derive(Clone, Copy)]
pub struct ConfigSummary<'a>(pub &'a Configuration);

impl fmt::Display for ConfigSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in Field::ALL {
            writeln!(f, "{}: {}", field.key(), self.0.redacted(field))?;
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigSummary<'_> {
    fn format(&self, f: defmt::Formatter) {
        let c = self.0;
        defmt::write!(
            f,
            "mqtt_server={=str} mqtt_topic={=str} username={=str} password={=str} coap_server={=str}",
            c.redacted(Field::MqttServer),
            c.redacted(Field::MqttTopic),
            c.redacted(Field::Username),
            c.redacted(Field::Password),
            c.redacted(Field::CoapServer),
        )
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::config::REDACTED;
    use std::string::ToString;

    #[test]
    fn test_summary_lists_every_field() {
        let mut config = Configuration::default();
        config.set(Field::MqttServer, "broker.local").unwrap();
        config.set(Field::Username, "u").unwrap();
        config.set(Field::Password, "secret").unwrap();

        let text = ConfigSummary(&config).to_string();
        assert_eq!(
            text,
            "mqtt_server: broker.local\n\
             mqtt_topic: esp8266-vindriktning-particle-sensor/%s\n\
             username: u\n\
             password: ********\n\
             coap_server: \n"
        );
        assert!(!text.contains("secret"));
        assert!(text.contains(REDACTED));
    }
}
