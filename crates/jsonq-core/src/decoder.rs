//! JSON decoder: converts JSON text into a [`Value`] tree.
//!
//! A strict recursive-descent parser over one cursor. Each production commits
//! as soon as it sees its first byte; there is no backtracking and no error
//! recovery. Whitespace is skipped before every value and around every
//! structural delimiter.
//!
//! # Key design decisions
//!
//! - **Bounds-checked cursor**: every read goes through `peek`, so running out
//!   of input inside a string, array, or object is reported as
//!   `UnterminatedString` or `UnexpectedEndOfInput`, never a panic.
//! - **Lazy positions**: the cursor is a byte offset; line and column are only
//!   computed when an error is built.
//! - **Depth guard**: nesting is bounded by [`DecodeOptions::max_depth`] so
//!   hostile input cannot exhaust the stack.

use tracing::debug;

use crate::error::{JsonParseError, Position};
use crate::options::{DecodeOptions, DuplicateKeys};
use crate::value::{Map, Value};

type Result<T> = std::result::Result<T, JsonParseError>;

/// Decode a complete JSON document with default options.
///
/// Duplicate object keys resolve to the last occurrence. Anything other than
/// whitespace after the top-level value is an error.
///
/// ```
/// use jsonq_core::{decode, Value};
///
/// let doc = decode(r#"{"a": [1, true, null]}"#).unwrap();
/// assert_eq!(doc.field("a").unwrap().len().unwrap(), 3);
/// assert_eq!(decode("\"x\"").unwrap(), Value::from("x"));
/// ```
pub fn decode(text: &str) -> Result<Value> {
    decode_with(text, &DecodeOptions::default())
}

/// Decode a complete JSON document with explicit [`DecodeOptions`].
pub fn decode_with(text: &str, options: &DecodeOptions) -> Result<Value> {
    let result = Decoder::new(text, options).parse_document();
    match &result {
        Ok(value) => debug!(bytes = text.len(), kind = %value.kind(), "decoded JSON document"),
        Err(err) => debug!(bytes = text.len(), error = %err, "JSON decode failed"),
    }
    result
}

struct Decoder<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
    options: &'a DecodeOptions,
}

impl<'a> Decoder<'a> {
    fn new(text: &'a str, options: &'a DecodeOptions) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            depth: 0,
            options,
        }
    }

    fn parse_document(&mut self) -> Result<Value> {
        if self.text.starts_with('\u{feff}') {
            self.pos = '\u{feff}'.len_utf8();
        }
        let value = self.parse_value()?;
        self.skip_whitespace();
        if self.pos < self.bytes.len() {
            return Err(JsonParseError::TrailingContent { at: self.here() });
        }
        Ok(value)
    }

    // ------------------------------------------------------------------
    // Productions
    // ------------------------------------------------------------------

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(self.end_of_input()),
            Some(b'{') => self.parse_object(),
            Some(b'[') => self.parse_array(),
            Some(b'"') => self.parse_string().map(Value::String),
            Some(b'-' | b'0'..=b'9') => self.parse_number().map(Value::Number),
            Some(_) => self.parse_literal(),
        }
    }

    fn parse_object(&mut self) -> Result<Value> {
        self.enter()?;
        self.pos += 1; // '{'
        let mut map = Map::new();

        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(Value::Object(map));
        }

        loop {
            self.skip_whitespace();
            let key_start = self.pos;
            match self.peek() {
                Some(b'"') => {}
                Some(_) => return Err(self.expected('"')),
                None => return Err(self.end_of_input()),
            }
            let key = self.parse_string()?;

            self.skip_whitespace();
            self.expect(b':')?;
            let value = self.parse_value()?;

            if self.options.duplicate_keys == DuplicateKeys::Reject && map.contains_key(&key) {
                return Err(JsonParseError::DuplicateKey {
                    key,
                    at: self.position_of(key_start),
                });
            }
            map.insert(key, value);

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => return Err(self.expected(',')),
                None => return Err(self.end_of_input()),
            }
        }

        self.depth -= 1;
        Ok(Value::Object(map))
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.enter()?;
        self.pos += 1; // '['
        let mut items = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(Value::Array(items));
        }

        loop {
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => return Err(self.expected(',')),
                None => return Err(self.end_of_input()),
            }
        }

        self.depth -= 1;
        Ok(Value::Array(items))
    }

    /// Parse a string literal starting at the opening quote, decoding escapes.
    fn parse_string(&mut self) -> Result<String> {
        let start = self.pos;
        self.pos += 1; // '"'
        let mut out = String::new();

        loop {
            let rest = &self.text[self.pos..];
            // Copy the run of plain characters up to the next quote, escape,
            // or control byte in one go. All three are ASCII, so `run` always
            // lands on a char boundary.
            let Some(run) = rest
                .bytes()
                .position(|b| b == b'"' || b == b'\\' || b < 0x20)
            else {
                return Err(JsonParseError::UnterminatedString {
                    at: self.position_of(start),
                });
            };
            out.push_str(&rest[..run]);
            self.pos += run;

            match self.peek() {
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some(b'\\') => self.parse_escape(start, &mut out)?,
                Some(byte) => {
                    return Err(JsonParseError::ControlCharacter {
                        code: u32::from(byte),
                        at: self.here(),
                    })
                }
                None => {
                    return Err(JsonParseError::UnterminatedString {
                        at: self.position_of(start),
                    })
                }
            }
        }
    }

    /// Decode one backslash escape (cursor on the backslash) into `out`.
    fn parse_escape(&mut self, string_start: usize, out: &mut String) -> Result<()> {
        let escape_start = self.pos;
        self.pos += 1; // '\\'
        let Some(code) = self.peek() else {
            return Err(JsonParseError::UnterminatedString {
                at: self.position_of(string_start),
            });
        };
        self.pos += 1;

        let ch = match code {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{0008}',
            b'f' => '\u{000C}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => self.parse_unicode_escape(escape_start)?,
            _ => return Err(self.invalid_escape(escape_start)),
        };
        out.push(ch);
        Ok(())
    }

    /// Decode the `XXXX` of `\uXXXX` (cursor just past the `u`), combining a
    /// UTF-16 surrogate pair when a high surrogate is followed by `\uYYYY`.
    fn parse_unicode_escape(&mut self, escape_start: usize) -> Result<char> {
        let first = self.parse_hex4(escape_start)?;
        let code = match first {
            0xD800..=0xDBFF => {
                if !self.text[self.pos..].starts_with("\\u") {
                    return Err(self.invalid_escape(escape_start));
                }
                self.pos += 2;
                let second = self.parse_hex4(escape_start)?;
                if !(0xDC00..=0xDFFF).contains(&second) {
                    return Err(self.invalid_escape(escape_start));
                }
                0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(self.invalid_escape(escape_start)),
            _ => first,
        };
        char::from_u32(code).ok_or_else(|| self.invalid_escape(escape_start))
    }

    fn parse_hex4(&mut self, escape_start: usize) -> Result<u32> {
        let digits = self
            .text
            .get(self.pos..self.pos + 4)
            .filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| self.invalid_escape(escape_start))?;
        let code =
            u32::from_str_radix(digits, 16).map_err(|_| self.invalid_escape(escape_start))?;
        self.pos += 4;
        Ok(code)
    }

    /// `-? digit+ ('.' digit+)? ([eE] [+-]? digit+)?`
    fn parse_number(&mut self) -> Result<f64> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        self.require_digits(start)?;

        if self.peek() == Some(b'.') {
            self.pos += 1;
            self.require_digits(start)?;
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            self.require_digits(start)?;
        }

        let invalid = || JsonParseError::InvalidNumber {
            at: Position::locate(self.text, start),
        };
        let n: f64 = self.text[start..self.pos].parse().map_err(|_| invalid())?;
        if !n.is_finite() {
            return Err(invalid());
        }
        Ok(n)
    }

    fn require_digits(&mut self, number_start: usize) -> Result<()> {
        let count = self.bytes[self.pos..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if count == 0 {
            return Err(JsonParseError::InvalidNumber {
                at: self.position_of(number_start),
            });
        }
        self.pos += count;
        Ok(())
    }

    fn parse_literal(&mut self) -> Result<Value> {
        let rest = &self.text[self.pos..];
        for (word, value) in [
            ("true", Value::Boolean(true)),
            ("false", Value::Boolean(false)),
            ("null", Value::Null),
        ] {
            if rest.starts_with(word) {
                self.pos += word.len();
                return Ok(value);
            }
            // A truncated keyword such as `tru` at the very end.
            if word.starts_with(rest) {
                self.pos += rest.len();
                return Err(self.end_of_input());
            }
        }
        Err(JsonParseError::InvalidLiteral { at: self.here() })
    }

    // ------------------------------------------------------------------
    // Cursor helpers
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, delimiter: u8) -> Result<()> {
        match self.peek() {
            Some(b) if b == delimiter => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(self.expected(char::from(delimiter))),
            None => Err(self.end_of_input()),
        }
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.options.max_depth {
            return Err(JsonParseError::NestingTooDeep {
                limit: self.options.max_depth,
                at: self.here(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn here(&self) -> Position {
        self.position_of(self.pos)
    }

    fn position_of(&self, offset: usize) -> Position {
        Position::locate(self.text, offset)
    }

    fn end_of_input(&self) -> JsonParseError {
        JsonParseError::UnexpectedEndOfInput { at: self.here() }
    }

    /// Build `ExpectedDelimiter` for the character under the cursor.
    fn expected(&self, expected: char) -> JsonParseError {
        match self.text[self.pos..].chars().next() {
            Some(found) => JsonParseError::ExpectedDelimiter {
                expected,
                found,
                at: self.here(),
            },
            None => self.end_of_input(),
        }
    }

    fn invalid_escape(&self, escape_start: usize) -> JsonParseError {
        JsonParseError::InvalidEscape {
            at: self.position_of(escape_start),
        }
    }
}
