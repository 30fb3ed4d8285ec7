//! Property tests for configuration persistence

use airsense_core::config::{Configuration, Field};
use airsense_core::document::MAX_DOCUMENT_SIZE;
use airsense_core::store::{ConfigStore, LoadOutcome, CONFIG_PATH};
use airsense_hal::RamFs;
use proptest::prelude::*;

type TestFs = RamFs<2, 2048>;

/// Any text of at most `max` bytes, control and multi-byte chars included
fn field_text(max: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<char>(), 0..=max).prop_map(move |chars| {
        let mut text = String::new();
        for c in chars {
            if text.len() + c.len_utf8() > max {
                break;
            }
            text.push(c);
        }
        text
    })
}

fn configuration() -> impl Strategy<Value = Configuration> {
    (
        field_text(Field::MqttServer.max_len()),
        field_text(Field::MqttTopic.max_len()),
        field_text(Field::Username.max_len()),
        field_text(Field::Password.max_len()),
        field_text(Field::CoapServer.max_len()),
    )
        .prop_map(|(server, topic, user, pass, coap)| {
            let mut config = Configuration::default();
            config.set(Field::MqttServer, &server).unwrap();
            config.set(Field::MqttTopic, &topic).unwrap();
            config.set(Field::Username, &user).unwrap();
            config.set(Field::Password, &pass).unwrap();
            config.set(Field::CoapServer, &coap).unwrap();
            config
        })
}

proptest! {
    #[test]
    fn saved_configuration_loads_back(config in configuration()) {
        let mut store = ConfigStore::new(TestFs::new());
        store.save(&config).unwrap();

        let mut loaded = Configuration::default();
        prop_assert_eq!(store.load(&mut loaded), Ok(LoadOutcome::Loaded));
        prop_assert_eq!(loaded, config);
    }

    #[test]
    fn saving_twice_is_byte_identical(config in configuration()) {
        let mut store = ConfigStore::new(TestFs::new());
        store.save(&config).unwrap();
        let first = store.filesystem().contents(CONFIG_PATH).unwrap().to_vec();
        store.save(&config).unwrap();
        prop_assert_eq!(store.filesystem().contents(CONFIG_PATH).unwrap(), &first[..]);
    }

    #[test]
    fn load_never_panics_on_arbitrary_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..MAX_DOCUMENT_SIZE)) {
        let mut fs = TestFs::new();
        {
            use airsense_hal::Filesystem;
            fs.mount().unwrap();
            fs.write(CONFIG_PATH, &bytes).unwrap();
        }
        let mut store = ConfigStore::new(fs);
        let mut config = Configuration::default();
        if store.load(&mut config).is_err() {
            prop_assert_eq!(config, Configuration::default());
        }
    }

    #[test]
    fn truncated_set_never_exceeds_capacity(value in ".{0,120}") {
        let mut config = Configuration::default();
        for field in Field::ALL {
            let truncated = config.set_truncated(field, &value);
            prop_assert!(config.get(field).len() <= field.max_len());
            prop_assert!(value.starts_with(config.get(field)));
            prop_assert_eq!(truncated, value.len() > field.max_len());
        }
    }
}
