//! Property tests for console line framing and parsing

use airsense_console::{Command, LineError, LineReader, MAX_LINE_LEN};
use airsense_core::config::Field;
use proptest::prelude::*;

proptest! {
    #[test]
    fn reader_never_yields_oversized_or_empty_lines(bytes in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let mut reader = LineReader::new();
        for byte in bytes {
            match reader.feed(byte) {
                Ok(Some(line)) => {
                    prop_assert!(!line.is_empty());
                    prop_assert!(line.len() <= MAX_LINE_LEN);
                    prop_assert!(!line.contains('\n') && !line.contains('\r'));
                    // Parsing arbitrary lines must not panic
                    let _ = Command::parse(&line);
                }
                Ok(None) | Err(LineError::TooLong) | Err(LineError::InvalidUtf8) => {}
            }
        }
    }

    #[test]
    fn printable_lines_pass_through(text in "[a-z_ ]{1,40}") {
        prop_assume!(!text.trim().is_empty());
        let mut reader = LineReader::new();
        let mut input = text.clone().into_bytes();
        input.push(b'\n');
        let line = reader.feed_bytes(&input).unwrap().unwrap();
        prop_assert_eq!(line.as_str(), text.as_str());
    }

    #[test]
    fn set_value_is_taken_verbatim(value in "[ -~]{1,40}") {
        let line = format!("set password {}", value);
        prop_assert_eq!(
            Command::parse(&line),
            Ok(Command::Set { field: Field::Password, value: value.as_str() })
        );
    }
}
