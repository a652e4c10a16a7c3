//! Expression parser: recursive descent over the token stream.
//!
//! Grammar:
//!
//! ```text
//! expression  := postfixable
//! postfixable := callable ( '[' expression ']' | '.' identifier )*
//! callable    := identifier '(' (expression (',' expression)*)? ')'
//!              | identifier
//!              | number
//!              | '(' expression ')'
//! ```
//!
//! One token of lookahead (`current`) is held and advanced explicitly after
//! each consumption. An identifier is first treated as a possible function
//! name; when no `(` follows it becomes a plain [`AstNode::Identifier`]
//! without re-reading any input. Postfix operators chain left to right, so
//! `a.b[1].c` is `MemberAccess(Subscript(MemberAccess(a, b), 1), c)`.
//!
//! Every node built counts toward [`MAX_NESTING`]: a tree taller than the
//! limit fails with `NestingTooDeep` at the operator that would exceed it.

use tracing::debug;

use crate::ast::AstNode;
use crate::error::ExpressionParseError;
use crate::tokenizer::{Lexeme, Token, TokenKind, Tokenizer};

type Result<T> = std::result::Result<T, ExpressionParseError>;

/// Maximum nesting of parenthesized groups, subscripts, and call arguments.
/// Also bounds the height of the resulting tree, so `a[0][0]...` and
/// `a.b.b...` chains longer than this are rejected.
pub const MAX_NESTING: usize = 128;

/// Parse a complete expression. Tokens left over after the expression are an
/// error.
///
/// ```
/// use jsonq_core::{parse_expression, AstNode};
///
/// let ast = parse_expression("a.b[1]").unwrap();
/// assert_eq!(
///     ast,
///     AstNode::subscript(
///         AstNode::member(AstNode::identifier("a"), "b"),
///         AstNode::literal("1"),
///     )
/// );
/// ```
pub fn parse_expression(text: &str) -> Result<AstNode> {
    let result = ExpressionParser::new(text).and_then(ExpressionParser::parse);
    match &result {
        Ok(ast) => debug!(expression = text, nodes = ast.node_count(), "parsed expression"),
        Err(err) => debug!(expression = text, error = %err, "expression parse failed"),
    }
    result
}

/// Single-use parser holding the tokenizer and the lookahead token.
pub struct ExpressionParser<'a> {
    tokens: Tokenizer<'a>,
    current: Lexeme<'a>,
    depth: usize,
}

impl<'a> ExpressionParser<'a> {
    /// Prime the parser with the first token.
    pub fn new(text: &'a str) -> Result<Self> {
        let mut tokens = Tokenizer::new(text);
        let current = tokens.next_token()?;
        Ok(Self {
            tokens,
            current,
            depth: 0,
        })
    }

    pub fn parse(mut self) -> Result<AstNode> {
        let (node, _) = self.parse_expression()?;
        if self.current.token != Token::End {
            return Err(self.unexpected());
        }
        Ok(node)
    }

    // Each step returns the node with its height. No tree taller than
    // MAX_NESTING is ever built.
    fn parse_expression(&mut self) -> Result<(AstNode, usize)> {
        if self.depth >= MAX_NESTING {
            return Err(self.too_deep(self.current.offset));
        }
        self.depth += 1;
        let (callable, height) = self.parse_callable()?;
        let parsed = self.parse_postfix(callable, height)?;
        self.depth -= 1;
        Ok(parsed)
    }

    fn parse_callable(&mut self) -> Result<(AstNode, usize)> {
        let Token::Identifier(name) = self.current.token else {
            return self.parse_primary();
        };
        let offset = self.current.offset;
        self.advance()?;
        if self.current.token != Token::LeftParen {
            return Ok((AstNode::identifier(name), 1));
        }
        self.advance()?;
        let (args, tallest) = self.parse_arguments()?;
        let height = self.limit_height(tallest + 1, offset)?;
        Ok((AstNode::call(name, args), height))
    }

    /// Parse call arguments; the opening `(` has been consumed. Also returns
    /// the height of the tallest argument.
    fn parse_arguments(&mut self) -> Result<(Vec<AstNode>, usize)> {
        let mut args = Vec::new();
        let mut tallest = 0;
        if self.current.token == Token::RightParen {
            self.advance()?;
            return Ok((args, tallest));
        }
        loop {
            let (arg, height) = self.parse_expression()?;
            args.push(arg);
            tallest = tallest.max(height);
            match self.current.token {
                Token::Comma => self.advance()?,
                Token::RightParen => {
                    self.advance()?;
                    return Ok((args, tallest));
                }
                _ => return Err(self.expected(TokenKind::RightParen)),
            }
        }
    }

    fn parse_primary(&mut self) -> Result<(AstNode, usize)> {
        match self.current.token {
            Token::Number(text) => {
                self.advance()?;
                Ok((AstNode::literal(text), 1))
            }
            Token::LeftParen => {
                self.advance()?;
                let parsed = self.parse_expression()?;
                self.expect(TokenKind::RightParen)?;
                Ok(parsed)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_postfix(&mut self, mut node: AstNode, mut height: usize) -> Result<(AstNode, usize)> {
        loop {
            let offset = self.current.offset;
            match self.current.token {
                Token::LeftBracket => {
                    self.advance()?;
                    let (index, index_height) = self.parse_expression()?;
                    self.expect(TokenKind::RightBracket)?;
                    height = self.limit_height(height.max(index_height) + 1, offset)?;
                    node = AstNode::subscript(node, index);
                }
                Token::Dot => {
                    height = self.limit_height(height + 1, offset)?;
                    self.advance()?;
                    let Token::Identifier(member) = self.current.token else {
                        return Err(self.expected(TokenKind::Identifier));
                    };
                    self.advance()?;
                    node = AstNode::member(node, member);
                }
                _ => return Ok((node, height)),
            }
        }
    }

    fn limit_height(&self, height: usize, offset: usize) -> Result<usize> {
        if height > MAX_NESTING {
            return Err(self.too_deep(offset));
        }
        Ok(height)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.tokens.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<()> {
        if self.current.token.kind() != kind {
            return Err(self.expected(kind));
        }
        self.advance()
    }

    fn expected(&self, expected: TokenKind) -> ExpressionParseError {
        ExpressionParseError::ExpectedToken {
            expected,
            found: self.current.token.kind(),
            offset: self.current.offset,
        }
    }

    fn too_deep(&self, offset: usize) -> ExpressionParseError {
        ExpressionParseError::NestingTooDeep {
            limit: MAX_NESTING,
            offset,
        }
    }

    fn unexpected(&self) -> ExpressionParseError {
        ExpressionParseError::UnexpectedToken {
            found: self.current.token.kind(),
            offset: self.current.offset,
        }
    }
}
