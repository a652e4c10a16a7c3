//! Expression evaluator: resolves an [`AstNode`] against a root document.
//!
//! The root is passed unchanged to every recursive call. A node evaluates its
//! children against that same root and then applies its own operation, so
//! path semantics come entirely from the tree shape: the base of a
//! `MemberAccess` is whatever expression produced it, not an accumulated
//! scope.
//!
//! Path results borrow from the root ([`Cow::Borrowed`]); function results
//! are freshly built ([`Cow::Owned`]). There is no implicit coercion anywhere:
//! numeric operations accept only numbers, subscripts only arrays, member
//! access only objects.

use std::borrow::Cow;
use std::fmt;

use tracing::{debug, trace};

use crate::ast::AstNode;
use crate::error::EvalError;
use crate::value::{Value, ValueKind};

type Result<T> = std::result::Result<T, EvalError>;

/// How many arguments a builtin accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// The fixed function set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// Smallest of one or more numbers.
    Min,
    /// Largest of one or more numbers.
    Max,
    /// Length of an object, array, or string.
    Size,
}

impl Builtin {
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "min" => Some(Builtin::Min),
            "max" => Some(Builtin::Max),
            "size" => Some(Builtin::Size),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Min => "min",
            Builtin::Max => "max",
            Builtin::Size => "size",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Builtin::Min | Builtin::Max => Arity::AtLeast(1),
            Builtin::Size => Arity::Exactly(1),
        }
    }
}

/// Evaluate `node` against `root`.
///
/// ```
/// use jsonq_core::{decode, evaluate, parse_expression, Value};
///
/// let doc = decode(r#"{"a": {"b": [10, 20, 30]}}"#).unwrap();
/// let ast = parse_expression("max(a.b[0], a.b[2])").unwrap();
/// assert_eq!(*evaluate(&ast, &doc).unwrap(), Value::Number(30.0));
/// ```
pub fn evaluate<'a>(node: &AstNode, root: &'a Value) -> Result<Cow<'a, Value>> {
    let result = eval_node(node, root);
    if let Err(err) = &result {
        debug!(expression = %node, error = %err, "evaluation failed");
    }
    result
}

fn eval_node<'a>(node: &AstNode, root: &'a Value) -> Result<Cow<'a, Value>> {
    match node {
        AstNode::Literal(text) => match numeric_literal(text) {
            Some(n) => Ok(Cow::Owned(Value::Number(n))),
            None => lookup_root(text, root),
        },
        AstNode::Identifier(name) => lookup_root(name, root),
        AstNode::FunctionCall { name, args } => call(name, args, root).map(Cow::Owned),
        AstNode::Subscript { base, index } => {
            let base = eval_node(base, root)?;
            if base.kind() != ValueKind::Array {
                return Err(EvalError::TypeMismatch {
                    expected: ValueKind::Array.name(),
                    actual: base.kind(),
                });
            }
            let index = eval_node(index, root)?.as_number()?;
            let position = array_position(index, base.len()?)?;
            project(base, |array| array.index(position))
        }
        AstNode::MemberAccess { base, member } => {
            let base = eval_node(base, root)?;
            project(base, |object| object.field(member))
        }
    }
}

/// All-ASCII-digit text is a number; anything else is not a literal at all.
fn numeric_literal(text: &str) -> Option<f64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn lookup_root<'a>(name: &str, root: &'a Value) -> Result<Cow<'a, Value>> {
    root.get(name)
        .map(Cow::Borrowed)
        .ok_or_else(|| EvalError::UnknownIdentifier(name.to_string()))
}

/// Truncate a numeric subscript toward zero. Negative and non-finite indices
/// are out of bounds; too-large ones are caught by [`Value::index`].
fn array_position(index: f64, length: usize) -> Result<usize> {
    let truncated = index.trunc();
    if !truncated.is_finite() || truncated < 0.0 {
        return Err(EvalError::IndexOutOfBounds {
            index: truncated as i64,
            length,
        });
    }
    Ok(truncated as usize)
}

/// Select a child of `value`, borrowing from the root when `value` does.
fn project<'a>(
    value: Cow<'a, Value>,
    select: impl for<'v> FnOnce(&'v Value) -> Result<&'v Value>,
) -> Result<Cow<'a, Value>> {
    match value {
        Cow::Borrowed(parent) => select(parent).map(Cow::Borrowed),
        Cow::Owned(parent) => select(&parent).map(|child| Cow::Owned(child.clone())),
    }
}

fn call(name: &str, args: &[AstNode], root: &Value) -> Result<Value> {
    let builtin = Builtin::lookup(name).ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
    let arity = builtin.arity();
    if !arity.accepts(args.len()) {
        return Err(EvalError::WrongArgumentCount {
            function: builtin.name().to_string(),
            expected: arity,
            actual: args.len(),
        });
    }
    trace!(function = builtin.name(), args = args.len(), "calling builtin");

    match builtin {
        Builtin::Min => fold_numbers(args, root, f64::INFINITY, f64::min),
        Builtin::Max => fold_numbers(args, root, f64::NEG_INFINITY, f64::max),
        Builtin::Size => {
            let value = eval_node(&args[0], root)?;
            Ok(Value::Number(value.len()? as f64))
        }
    }
}

fn fold_numbers(
    args: &[AstNode],
    root: &Value,
    seed: f64,
    combine: fn(f64, f64) -> f64,
) -> Result<Value> {
    let mut acc = seed;
    for arg in args {
        acc = combine(acc, eval_node(arg, root)?.as_number()?);
    }
    Ok(Value::Number(acc))
}
