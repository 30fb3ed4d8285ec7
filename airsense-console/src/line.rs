//! Line framing for the console
//!
//! Bytes are collected until `\r` or `\n`. Backspace and DEL erase the last
//! character, so the console is usable from a plain terminal. An over-long line
//! is reported once and then skipped up to its terminator.

use core::fmt;

use heapless::{String, Vec};

/// Maximum line length in bytes, excluding the terminator
pub const MAX_LINE_LEN: usize = 160;

/// A complete input line
pub type Line = String<MAX_LINE_LEN>;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7f;

/// Errors that can occur while framing lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded [`MAX_LINE_LEN`]; the rest of it is discarded
    TooLong,
    /// Line is not valid UTF-8
    InvalidUtf8,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineError::TooLong => write!(f, "line longer than {} bytes", MAX_LINE_LEN),
            LineError::InvalidUtf8 => f.write_str("line is not valid UTF-8"),
        }
    }
}

/// State machine collecting bytes into lines
#[derive(Debug, Clone, Default)]
pub struct LineReader {
    buffer: Vec<u8, MAX_LINE_LEN>,
    discarding: bool,
}

impl LineReader {
    /// Create a new line reader
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
        }
    }

    /// Drop any partial line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    /// Feed a single byte to the reader
    ///
    /// Returns `Ok(Some(line))` when a non-empty line is complete,
    /// `Ok(None)` when more bytes are needed, or `Err` on a framing error.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        match byte {
            b'\r' | b'\n' => {
                if self.discarding {
                    self.reset();
                    return Ok(None);
                }
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let line = self.take_line();
                self.reset();
                line.map(Some)
            }
            _ if self.discarding => Ok(None),
            BACKSPACE | DELETE => {
                // Drop UTF-8 continuation bytes up to and including the lead byte
                while let Some(b) = self.buffer.pop() {
                    if b & 0xc0 != 0x80 {
                        break;
                    }
                }
                Ok(None)
            }
            // Ignore other control characters; keep tabs as separators
            b if b < 0x20 && b != b'\t' => Ok(None),
            b => {
                if self.buffer.push(b).is_err() {
                    self.buffer.clear();
                    self.discarding = true;
                    return Err(LineError::TooLong);
                }
                Ok(None)
            }
        }
    }

    /// Feed multiple bytes to the reader
    ///
    /// Returns the first complete line found, if any.
    /// Remaining bytes after a complete line are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Line>, LineError> {
        for &byte in bytes {
            if let Some(line) = self.feed(byte)? {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }

    fn take_line(&self) -> Result<Line, LineError> {
        let text = core::str::from_utf8(&self.buffer).map_err(|_| LineError::InvalidUtf8)?;
        let mut line = Line::new();
        // Cannot fail: the buffer has the same capacity
        let _ = line.push_str(text);
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_terminators() {
        let mut reader = LineReader::new();
        assert_eq!(reader.feed_bytes(b"show"), Ok(None));
        let line = reader.feed(b'\r').unwrap().unwrap();
        assert_eq!(line.as_str(), "show");

        // The LF of a CRLF pair is an empty line and is skipped
        assert_eq!(reader.feed(b'\n'), Ok(None));

        let line = reader.feed_bytes(b"save\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "save");
    }

    #[test]
    fn test_backspace_erases_multibyte_char() {
        let mut reader = LineReader::new();
        let line = reader
            .feed_bytes("set username jos\u{e9}\u{20ac}\x7f\x08e\n".as_bytes())
            .unwrap()
            .unwrap();
        assert_eq!(line.as_str(), "set username jose");
    }

    #[test]
    fn test_backspace_edits_line() {
        let mut reader = LineReader::new();
        let line = reader.feed_bytes(b"shox\x08w\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "show");

        let line = reader.feed_bytes(b"x\x7f\x7fload\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "load");
    }

    #[test]
    fn test_control_bytes_ignored() {
        let mut reader = LineReader::new();
        let line = reader.feed_bytes(b"\x1b\x00he\tlp\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "he\tlp");
    }

    #[test]
    fn test_overflow_discards_rest_of_line() {
        let mut reader = LineReader::new();
        for _ in 0..MAX_LINE_LEN {
            assert_eq!(reader.feed(b'a'), Ok(None));
        }
        assert_eq!(reader.feed(b'a'), Err(LineError::TooLong));
        // Reported once, the tail is skipped silently
        assert_eq!(reader.feed_bytes(b"aaaa"), Ok(None));
        assert_eq!(reader.feed(b'\n'), Ok(None));

        let line = reader.feed_bytes(b"show\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "show");
    }

    #[test]
    fn test_line_at_capacity() {
        let mut reader = LineReader::new();
        for _ in 0..MAX_LINE_LEN {
            reader.feed(b'b').unwrap();
        }
        let line = reader.feed(b'\n').unwrap().unwrap();
        assert_eq!(line.len(), MAX_LINE_LEN);
    }

    #[test]
    fn test_invalid_utf8() {
        let mut reader = LineReader::new();
        assert_eq!(reader.feed_bytes(b"\xff\xfe\n"), Err(LineError::InvalidUtf8));
        // Reader recovers on the next line
        let line = reader.feed_bytes(b"help\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "help");
    }
}
