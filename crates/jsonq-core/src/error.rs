//! Error types for decoding documents, parsing expressions, and evaluating them.
//!
//! Each pipeline stage has its own error family. All of them are terminal: the
//! operation that raised one is abandoned and no partial result is produced.
//! [`QueryError`] wraps the three families for callers that run the whole
//! pipeline through [`crate::query`].

use std::fmt;

use thiserror::Error;

use crate::evaluator::Arity;
use crate::tokenizer::TokenKind;
use crate::value::ValueKind;

/// A location in JSON source text.
///
/// `line` and `column` are 1-based and count characters; `offset` is the
/// 0-based byte offset from the start of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    /// Compute the line/column of a byte offset within `text`.
    pub fn locate(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let mut line = 1;
        let mut column = 1;
        for ch in text[..offset].chars() {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Position {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Errors raised while decoding JSON text into a [`crate::Value`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JsonParseError {
    /// A string literal reached end of input before its closing quote.
    #[error("unterminated string starting at {at}")]
    UnterminatedString { at: Position },

    /// Input ended where a value or delimiter was required.
    #[error("unexpected end of input at {at}")]
    UnexpectedEndOfInput { at: Position },

    /// A structural delimiter (`:`, `,`, `]`, `}`) was missing.
    #[error("expected '{expected}' but found '{found}' at {at}")]
    ExpectedDelimiter {
        expected: char,
        found: char,
        at: Position,
    },

    /// A number token did not match the JSON number grammar or overflowed f64.
    #[error("invalid number at {at}")]
    InvalidNumber { at: Position },

    /// The input at a value position is not `true`, `false`, `null`, or the
    /// start of an object, array, string, or number.
    #[error("invalid literal at {at}")]
    InvalidLiteral { at: Position },

    /// Non-whitespace content follows the top-level value.
    #[error("trailing content after document at {at}")]
    TrailingContent { at: Position },

    /// A backslash escape is malformed or encodes a lone surrogate.
    #[error("invalid escape sequence at {at}")]
    InvalidEscape { at: Position },

    /// A raw control character appeared inside a string literal.
    #[error("unescaped control character U+{code:04X} in string at {at}")]
    ControlCharacter { code: u32, at: Position },

    /// An object repeated a key while duplicate keys are rejected.
    #[error("duplicate object key \"{key}\" at {at}")]
    DuplicateKey { key: String, at: Position },

    /// Arrays and objects nest deeper than the configured limit.
    #[error("nesting deeper than {limit} levels at {at}")]
    NestingTooDeep { limit: usize, at: Position },
}

impl JsonParseError {
    /// Where in the source text the error was detected.
    pub fn position(&self) -> Position {
        match self {
            JsonParseError::UnterminatedString { at }
            | JsonParseError::UnexpectedEndOfInput { at }
            | JsonParseError::ExpectedDelimiter { at, .. }
            | JsonParseError::InvalidNumber { at }
            | JsonParseError::InvalidLiteral { at }
            | JsonParseError::TrailingContent { at }
            | JsonParseError::InvalidEscape { at }
            | JsonParseError::ControlCharacter { at, .. }
            | JsonParseError::DuplicateKey { at, .. }
            | JsonParseError::NestingTooDeep { at, .. } => *at,
        }
    }
}

/// Errors raised while tokenizing or parsing an expression.
///
/// Offsets are 0-based byte offsets into the expression text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionParseError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedCharacter { ch: char, offset: usize },

    #[error("unexpected {found} at offset {offset}")]
    UnexpectedToken { found: TokenKind, offset: usize },

    #[error("expected {expected} but found {found} at offset {offset}")]
    ExpectedToken {
        expected: TokenKind,
        found: TokenKind,
        offset: usize,
    },

    #[error("expression nests deeper than {limit} levels at offset {offset}")]
    NestingTooDeep { limit: usize, offset: usize },
}

impl ExpressionParseError {
    pub fn offset(&self) -> usize {
        match self {
            ExpressionParseError::UnexpectedCharacter { offset, .. }
            | ExpressionParseError::UnexpectedToken { offset, .. }
            | ExpressionParseError::ExpectedToken { offset, .. }
            | ExpressionParseError::NestingTooDeep { offset, .. } => *offset,
        }
    }
}

/// Errors raised while evaluating an expression against a document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A root-level name is missing, or the root is not an object.
    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// `expected` names the acceptable kind(s), e.g. `"array"` or
    /// `"object, array, or string"`.
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: ValueKind,
    },

    #[error("index {index} out of bounds for length {length}")]
    IndexOutOfBounds { index: i64, length: usize },

    #[error("field '{0}' not found")]
    FieldNotFound(String),

    #[error("{function}() expects {expected} argument(s), got {actual}")]
    WrongArgumentCount {
        function: String,
        expected: Arity,
        actual: usize,
    },
}

/// Any failure of the decode → parse → evaluate pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("JSON parse error: {0}")]
    Json(#[from] JsonParseError),

    #[error("expression parse error: {0}")]
    Expression(#[from] ExpressionParseError),

    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
}

/// Convenience alias used by the one-shot query API.
pub type Result<T> = std::result::Result<T, QueryError>;
