//! # jsonq-core
//!
//! A JSON document parser and a small path/query expression language that is
//! evaluated against the parsed tree.
//!
//! Expressions support dotted member access (`a.b`), bracket subscripts
//! (`a.b[1]`, `a.b[a.i]`), parentheses, and the functions `min`, `max`, and
//! `size`.
//!
//! ## Quick start
//!
//! ```rust
//! use jsonq_core::{query, Value};
//!
//! let json = r#"{"a":{"b":[10,20,30,{"c":99}]}}"#;
//! assert_eq!(query(json, "a.b[1]").unwrap(), Value::Number(20.0));
//! assert_eq!(query(json, "a.b[3].c").unwrap(), Value::Number(99.0));
//! assert_eq!(query(json, "size(a.b)").unwrap(), Value::Number(4.0));
//! ```
//!
//! The two pipelines are independent and meet only at evaluation time:
//!
//! ```text
//! JSON text  --decode-->            Value ─┐
//! expression --tokenize/parse--> AstNode ──┴─ evaluate --> Value
//! ```
//!
//! ## Modules
//!
//! - [`value`]: the `Value` tree and its typed accessors
//! - [`decoder`]: JSON text → `Value`
//! - [`encoder`]: `Value` → JSON text (compact or pretty)
//! - [`tokenizer`]: expression text → tokens, on demand
//! - [`ast`]: expression syntax tree
//! - [`parser`]: tokens → `AstNode`
//! - [`evaluator`]: `AstNode` + root `Value` → `Value`
//! - [`options`]: decoder configuration
//! - [`error`]: error families for each stage

pub mod ast;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod evaluator;
pub mod options;
pub mod parser;
pub mod tokenizer;
pub mod value;

pub use ast::AstNode;
pub use decoder::{decode, decode_with};
pub use encoder::{encode, encode_pretty};
pub use error::{EvalError, ExpressionParseError, JsonParseError, Position, QueryError};
pub use evaluator::{evaluate, Arity, Builtin};
pub use options::{DecodeOptions, DuplicateKeys};
pub use parser::parse_expression;
pub use value::{Map, Value, ValueKind};

/// Decode `json`, parse `expression`, and evaluate it in one call.
///
/// The result is detached from the (dropped) document.
pub fn query(json: &str, expression: &str) -> error::Result<Value> {
    let document = decode(json)?;
    let ast = parse_expression(expression)?;
    Ok(evaluate(&ast, &document)?.into_owned())
}
