//! JSON encoder: renders a [`Value`] tree back to JSON text.
//!
//! Two layouts are supported:
//!
//! - **Compact** ([`encode`]): no insignificant whitespace, e.g. `{"a":[1,2]}`
//! - **Pretty** ([`encode_pretty`]): 2-space indentation, one entry per line
//!
//! Object keys come out in ascending byte order (the order of the backing
//! `BTreeMap`). Numbers that are exact integers print without a fraction;
//! other finite numbers use Rust's shortest round-trip formatting, which never
//! produces an exponent. Non-finite numbers have no JSON form and print as
//! `null`.
//!
//! `decode(&encode(v))` reproduces `v` for every tree the decoder can build.

use crate::value::{is_exact_integer, Value};

/// Encode a value as compact JSON.
///
/// ```
/// use jsonq_core::{decode, encode};
///
/// let doc = decode(r#"{ "b": [1, 2.5], "a": "x\n" }"#).unwrap();
/// assert_eq!(encode(&doc), r#"{"a":"x\n","b":[1,2.5]}"#);
/// ```
pub fn encode(value: &Value) -> String {
    let mut out = String::new();
    encode_value(value, None, &mut out);
    out
}

/// Encode a value as indented, human-readable JSON.
pub fn encode_pretty(value: &Value) -> String {
    let mut out = String::new();
    encode_value(value, Some(0), &mut out);
    out
}

/// `depth` is `Some(level)` for pretty output and `None` for compact.
fn encode_value(value: &Value, depth: Option<usize>, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => encode_number(*n, out),
        Value::String(s) => encode_string(s, out),
        Value::Array(items) => {
            if items.is_empty() {
                out.push_str("[]");
                return;
            }
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                push_newline(depth.map(|d| d + 1), out);
                encode_value(item, depth.map(|d| d + 1), out);
            }
            push_newline(depth, out);
            out.push(']');
        }
        Value::Object(map) => {
            if map.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                push_newline(depth.map(|d| d + 1), out);
                encode_string(key, out);
                out.push(':');
                if depth.is_some() {
                    out.push(' ');
                }
                encode_value(item, depth.map(|d| d + 1), out);
            }
            push_newline(depth, out);
            out.push('}');
        }
    }
}

fn encode_number(n: f64, out: &mut String) {
    if is_exact_integer(n) {
        out.push_str(&(n as i64).to_string());
    } else if n.is_finite() {
        out.push_str(&n.to_string());
    } else {
        out.push_str("null");
    }
}

/// Quote and escape a string. Control characters without a short escape are
/// written as `\u00XX`; everything else, including non-ASCII, is emitted as is.
fn encode_string(s: &str, out: &mut String) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if c < '\u{0020}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Start a new line at `depth` in pretty mode; no-op in compact mode.
fn push_newline(depth: Option<usize>, out: &mut String) {
    if let Some(depth) = depth {
        out.push('\n');
        out.push_str(&make_indent(depth));
    }
}

/// Generate a 2-space-per-level indentation string.
fn make_indent(depth: usize) -> String {
    "  ".repeat(depth)
}
