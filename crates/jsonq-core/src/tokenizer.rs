//! Expression tokenizer: splits query text into tokens on demand.
//!
//! The tokenizer is pull-based: the parser asks for one token at a time and
//! nothing is materialized up front. Its only state is a byte cursor.
//!
//! Classification, checked in order:
//!
//! 1. whitespace is skipped
//! 2. a letter or `_` starts an identifier (letters, digits, `_`)
//! 3. a digit or `-` starts a number (digits and `.`; no exponent)
//! 4. `,` `(` `)` `[` `]` `.` are single-character tokens
//! 5. end of text yields [`Token::End`]
//! 6. anything else is `UnexpectedCharacter`
//!
//! Letters, digits, and whitespace are Unicode classes ([`char::is_alphabetic`],
//! [`char::is_alphanumeric`], [`char::is_whitespace`]), so `größe` is one
//! identifier and a no-break space separates tokens. Number digits are ASCII.

use std::fmt;

use crate::error::ExpressionParseError;

/// A token borrowed from the expression text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Identifier(&'a str),
    Number(&'a str),
    Comma,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Dot,
    End,
}

/// Payload-free token classification, used in parse diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Number,
    Comma,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Dot,
    End,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::Comma => "','",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::LeftBracket => "'['",
            TokenKind::RightBracket => "']'",
            TokenKind::Dot => "'.'",
            TokenKind::End => "end of expression",
        })
    }
}

impl Token<'_> {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Identifier(_) => TokenKind::Identifier,
            Token::Number(_) => TokenKind::Number,
            Token::Comma => TokenKind::Comma,
            Token::LeftParen => TokenKind::LeftParen,
            Token::RightParen => TokenKind::RightParen,
            Token::LeftBracket => TokenKind::LeftBracket,
            Token::RightBracket => TokenKind::RightBracket,
            Token::Dot => TokenKind::Dot,
            Token::End => TokenKind::End,
        }
    }
}

/// A token together with the byte offset where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme<'a> {
    pub token: Token<'a>,
    pub offset: usize,
}

/// Pull-based tokenizer over an expression string.
///
/// ```
/// use jsonq_core::tokenizer::{Token, Tokenizer};
///
/// let mut tokens = Tokenizer::new("a.b[1]");
/// assert_eq!(tokens.next_token().unwrap().token, Token::Identifier("a"));
/// assert_eq!(tokens.next_token().unwrap().token, Token::Dot);
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    source: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            done: false,
        }
    }

    /// Produce the next token. Once the text is exhausted every further call
    /// returns [`Token::End`].
    pub fn next_token(&mut self) -> Result<Lexeme<'a>, ExpressionParseError> {
        self.skip_whitespace();
        let offset = self.pos;
        let Some(ch) = self.source[offset..].chars().next() else {
            return Ok(Lexeme {
                token: Token::End,
                offset,
            });
        };

        let token = if ch.is_alphabetic() || ch == '_' {
            Token::Identifier(self.take_while(|c| c.is_alphanumeric() || c == '_'))
        } else if ch.is_ascii_digit() || ch == '-' {
            self.pos += ch.len_utf8();
            Token::Number(self.take_from(offset, |c| c.is_ascii_digit() || c == '.'))
        } else {
            let token = match ch {
                ',' => Token::Comma,
                '(' => Token::LeftParen,
                ')' => Token::RightParen,
                '[' => Token::LeftBracket,
                ']' => Token::RightBracket,
                '.' => Token::Dot,
                _ => return Err(ExpressionParseError::UnexpectedCharacter { ch, offset }),
            };
            self.pos += 1;
            token
        };

        Ok(Lexeme { token, offset })
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.source[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        self.take_from(start, accept)
    }

    /// Advance past characters matching `accept` and return the text from
    /// `start` to the new cursor.
    fn take_from(&mut self, start: usize, accept: impl Fn(char) -> bool) -> &'a str {
        let source = self.source;
        let rest = &source[self.pos..];
        let len = rest
            .char_indices()
            .find(|&(_, c)| !accept(c))
            .map_or(rest.len(), |(i, _)| i);
        self.pos += len;
        &source[start..self.pos]
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Lexeme<'a>, ExpressionParseError>;

    /// Yields every token up to and including [`Token::End`], then `None`.
    /// Iteration also stops after the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.next_token();
        self.done = matches!(item, Ok(Lexeme { token: Token::End, .. }) | Err(_));
        Some(item)
    }
}
