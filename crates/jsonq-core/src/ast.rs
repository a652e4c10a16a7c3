//! Expression syntax tree.
//!
//! Every node owns its children outright; a parsed tree is never shared or
//! mutated. `Display` renders the canonical expression text, so
//! `parse_expression(&ast.to_string())` yields an equal tree.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// A numeric literal as written. The evaluator treats all-digit text as a
    /// number and anything else as a root field name.
    Literal(String),
    /// A bare name, looked up as a field of the root document.
    Identifier(String),
    /// `name(arg, ...)`
    FunctionCall { name: String, args: Vec<AstNode> },
    /// `base[index]`
    Subscript {
        base: Box<AstNode>,
        index: Box<AstNode>,
    },
    /// `base.member`
    MemberAccess { base: Box<AstNode>, member: String },
}

impl AstNode {
    pub fn literal(text: impl Into<String>) -> Self {
        AstNode::Literal(text.into())
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        AstNode::Identifier(name.into())
    }

    pub fn call(name: impl Into<String>, args: Vec<AstNode>) -> Self {
        AstNode::FunctionCall {
            name: name.into(),
            args,
        }
    }

    pub fn subscript(base: AstNode, index: AstNode) -> Self {
        AstNode::Subscript {
            base: Box::new(base),
            index: Box::new(index),
        }
    }

    pub fn member(base: AstNode, member: impl Into<String>) -> Self {
        AstNode::MemberAccess {
            base: Box::new(base),
            member: member.into(),
        }
    }

    /// Total number of nodes in this tree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + match self {
            AstNode::Literal(_) | AstNode::Identifier(_) => 0,
            AstNode::FunctionCall { args, .. } => args.iter().map(AstNode::node_count).sum(),
            AstNode::Subscript { base, index } => base.node_count() + index.node_count(),
            AstNode::MemberAccess { base, .. } => base.node_count(),
        }
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstNode::Literal(text) | AstNode::Identifier(text) => f.write_str(text),
            AstNode::FunctionCall { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            AstNode::Subscript { base, index } => write!(f, "{base}[{index}]"),
            // `1.a` would re-tokenize as the number `1.`
            AstNode::MemberAccess { base, member } if matches!(**base, AstNode::Literal(_)) => {
                write!(f, "({base}).{member}")
            }
            AstNode::MemberAccess { base, member } => write!(f, "{base}.{member}"),
        }
    }
}
