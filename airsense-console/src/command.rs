//! Console commands
//!
//! Commands are whitespace-separated words. `set` takes everything after
//! the single separator following the field name as its value, verbatim,
//! so values may contain and end in spaces.

use core::fmt;

use airsense_core::config::Field;

/// A parsed console command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    /// List commands
    Help,
    /// Print every field
    Show,
    /// Print one field
    Get(Field),
    /// Set a field
    Set { field: Field, value: &'a str },
    /// Set a field to the empty string
    Clear(Field),
    /// Print the topic expanded for a device id
    Topic(&'a str),
    /// Persist the configuration
    Save,
    /// Reload the persisted configuration
    Load,
    /// Reset the in-memory configuration to defaults
    Defaults,
    /// Remove the persisted configuration
    Erase,
}

/// Errors from parsing a command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Line holds only whitespace
    Empty,
    /// First word is not a command
    UnknownCommand,
    /// Command needs an argument that is missing
    MissingArgument,
    /// Argument is not a field name
    UnknownField,
    /// Command got more arguments than it takes
    UnexpectedArgument,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ParseError::Empty => "empty command",
            ParseError::UnknownCommand => "unknown command, try 'help'",
            ParseError::MissingArgument => "missing argument",
            ParseError::UnknownField => {
                "unknown field, expected mqtt_server, mqtt_topic, username, password or coap_server"
            }
            ParseError::UnexpectedArgument => "unexpected argument",
        };
        f.write_str(msg)
    }
}

/// One-line usage for each command
pub const HELP: &[&str] = &[
    "help                   list commands",
    "show                   print all fields",
    "get <field>            print one field",
    "set <field> <value>    set a field (value taken verbatim to end of line)",
    "clear <field>          empty a field",
    "topic <device-id>      print the expanded topic",
    "save                   write configuration to flash",
    "load                   reload configuration from flash",
    "defaults               reset fields to defaults (not saved)",
    "erase                  remove stored configuration",
];

/// Split off the first word, returning it and the remainder
fn next_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(at) => (&s[..at], s[at..].trim_start()),
        None => (s, ""),
    }
}

/// Split the field name of `set` from its verbatim value
fn field_and_value(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.char_indices().find(|&(_, c)| c.is_whitespace()) {
        Some((at, c)) => (&s[..at], &s[at + c.len_utf8()..]),
        None => (s, ""),
    }
}

fn parse_field(word: &str) -> Result<Field, ParseError> {
    if word.is_empty() {
        return Err(ParseError::MissingArgument);
    }
    Field::from_key(word).ok_or(ParseError::UnknownField)
}

fn no_more(rest: &str) -> Result<(), ParseError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(ParseError::UnexpectedArgument)
    }
}

impl<'a> Command<'a> {
    /// Parse a command line
    pub fn parse(line: &'a str) -> Result<Self, ParseError> {
        let (word, rest) = next_word(line);

        let command = match word {
            "" => return Err(ParseError::Empty),
            "help" => Command::Help,
            "show" => Command::Show,
            "save" => Command::Save,
            "load" => Command::Load,
            "defaults" => Command::Defaults,
            "erase" => Command::Erase,
            "get" | "clear" => {
                let (name, rest) = next_word(rest);
                let field = parse_field(name)?;
                no_more(rest)?;
                if word == "get" {
                    Command::Get(field)
                } else {
                    Command::Clear(field)
                }
            }
            "set" => {
                let (name, value) = field_and_value(rest);
                let field = parse_field(name)?;
                if value.is_empty() {
                    return Err(ParseError::MissingArgument);
                }
                Command::Set { field, value }
            }
            "topic" => {
                let (id, rest) = next_word(rest);
                if id.is_empty() {
                    return Err(ParseError::MissingArgument);
                }
                no_more(rest)?;
                Command::Topic(id)
            }
            _ => return Err(ParseError::UnknownCommand),
        };

        if matches!(
            command,
            Command::Help
                | Command::Show
                | Command::Save
                | Command::Load
                | Command::Defaults
                | Command::Erase
        ) {
            no_more(rest)?;
        }
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(Command::parse("help"), Ok(Command::Help));
        assert_eq!(Command::parse("  show  "), Ok(Command::Show));
        assert_eq!(Command::parse("save"), Ok(Command::Save));
        assert_eq!(Command::parse("load"), Ok(Command::Load));
        assert_eq!(Command::parse("defaults"), Ok(Command::Defaults));
        assert_eq!(Command::parse("erase"), Ok(Command::Erase));
    }

    #[test]
    fn test_simple_commands_reject_arguments() {
        assert_eq!(
            Command::parse("save now"),
            Err(ParseError::UnexpectedArgument)
        );
    }

    #[test]
    fn test_get_and_clear() {
        assert_eq!(
            Command::parse("get mqtt_server"),
            Ok(Command::Get(Field::MqttServer))
        );
        assert_eq!(
            Command::parse("clear\tpassword"),
            Ok(Command::Clear(Field::Password))
        );
        assert_eq!(Command::parse("get"), Err(ParseError::MissingArgument));
        assert_eq!(Command::parse("get wifi"), Err(ParseError::UnknownField));
        assert_eq!(
            Command::parse("get username extra"),
            Err(ParseError::UnexpectedArgument)
        );
    }

    #[test]
    fn test_set_keeps_inner_spaces() {
        assert_eq!(
            Command::parse("set password correct horse battery  "),
            Ok(Command::Set {
                field: Field::Password,
                value: "correct horse battery  ",
            })
        );
        assert_eq!(
            Command::parse("set  password  abc "),
            Ok(Command::Set {
                field: Field::Password,
                value: " abc ",
            })
        );
        assert_eq!(
            Command::parse("set mqtt_topic sensors/%s"),
            Ok(Command::Set {
                field: Field::MqttTopic,
                value: "sensors/%s",
            })
        );
    }

    #[test]
    fn test_set_errors() {
        assert_eq!(Command::parse("set"), Err(ParseError::MissingArgument));
        assert_eq!(
            Command::parse("set username"),
            Err(ParseError::MissingArgument)
        );
        assert_eq!(
            Command::parse("set user bob"),
            Err(ParseError::UnknownField)
        );
    }

    #[test]
    fn test_topic() {
        assert_eq!(Command::parse("topic abc123"), Ok(Command::Topic("abc123")));
        assert_eq!(Command::parse("topic"), Err(ParseError::MissingArgument));
        assert_eq!(
            Command::parse("topic a b"),
            Err(ParseError::UnexpectedArgument)
        );
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(Command::parse(""), Err(ParseError::Empty));
        assert_eq!(Command::parse("   "), Err(ParseError::Empty));
        assert_eq!(Command::parse("SHOW"), Err(ParseError::UnknownCommand));
        assert_eq!(Command::parse("reboot"), Err(ParseError::UnknownCommand));
    }
}
