//! End-to-end scenarios through the one-shot `query` API.

use jsonq_core::{decode, query, EvalError, ExpressionParseError, JsonParseError, QueryError, Value};

const DOC: &str = r#"{"a":{"b":[10,20,30,{"c":99}]}}"#;

fn num(n: f64) -> Value {
    Value::Number(n)
}

#[test]
fn subscript_into_nested_array() {
    assert_eq!(query(DOC, "a.b[1]").unwrap(), num(20.0));
}

#[test]
fn member_of_array_element() {
    assert_eq!(query(DOC, "a.b[3].c").unwrap(), num(99.0));
}

#[test]
fn whole_subtree() {
    let expected = decode(r#"[10,20,30,{"c":99}]"#).unwrap();
    assert_eq!(query(DOC, "a.b").unwrap(), expected);
}

#[test]
fn size_of_array() {
    assert_eq!(query(DOC, "size(a.b)").unwrap(), num(4.0));
}

#[test]
fn max_of_two_elements() {
    assert_eq!(query(DOC, "max(a.b[0], a.b[1])").unwrap(), num(20.0));
}

#[test]
fn min_of_one_element() {
    assert_eq!(query(DOC, "min(a.b[0])").unwrap(), num(10.0));
}

#[test]
fn out_of_range_subscript() {
    assert_eq!(
        query(DOC, "a.b[5]").unwrap_err(),
        QueryError::Eval(EvalError::IndexOutOfBounds { index: 5, length: 4 })
    );
}

#[test]
fn size_of_number_fails() {
    assert!(matches!(
        query(DOC, "size(a.b[0])").unwrap_err(),
        QueryError::Eval(EvalError::TypeMismatch { .. })
    ));
}

// ============================================================================
// Mixed queries over a wider document
// ============================================================================

const WIDE: &str = r#"{
    "a": {"b": [1, 2, {"c": [5, 6, 7]}, 4]},
    "idx": 2,
    "title": "report"
}"#;

#[test]
fn index_taken_from_the_document() {
    assert_eq!(query(WIDE, "a.b[a.b[1]].c[0]").unwrap(), num(5.0));
    assert_eq!(query(WIDE, "size(a.b[idx].c)").unwrap(), num(3.0));
}

#[test]
fn literals_mixed_with_paths() {
    assert_eq!(query(WIDE, "max(a.b[0], 10, a.b[1], 15)").unwrap(), num(15.0));
    assert_eq!(query(WIDE, "min(a.b[3], idx)").unwrap(), num(2.0));
}

#[test]
fn size_of_root_object_and_string() {
    assert_eq!(query(WIDE, "size(a)").unwrap(), num(1.0));
    assert_eq!(query(WIDE, "size(title)").unwrap(), num(6.0));
}

#[test]
fn member_access_on_number_fails() {
    assert!(matches!(
        query(WIDE, "a.b[1].c").unwrap_err(),
        QueryError::Eval(EvalError::TypeMismatch { expected: "object", .. })
    ));
}

// ============================================================================
// Error families surface through QueryError
// ============================================================================

#[test]
fn json_errors_are_reported() {
    assert!(matches!(
        query("{\"a\": [1, 2}", "a").unwrap_err(),
        QueryError::Json(JsonParseError::ExpectedDelimiter { .. })
    ));
}

#[test]
fn expression_errors_are_reported() {
    assert!(matches!(
        query(DOC, "a.b[1").unwrap_err(),
        QueryError::Expression(ExpressionParseError::ExpectedToken { .. })
    ));
}

#[test]
fn query_error_messages_name_the_stage() {
    let msg = query(DOC, "nope").unwrap_err().to_string();
    assert_eq!(msg, "evaluation error: unknown identifier 'nope'");
    let msg = query("[", "a").unwrap_err().to_string();
    assert!(msg.starts_with("JSON parse error: "), "{msg}");
}

// ============================================================================
// Long postfix chains
// ============================================================================

#[test]
fn long_subscript_chain_is_rejected() {
    let expression = format!("a{}", "[0]".repeat(20_000));
    assert!(matches!(
        query(r#"{"a":[1]}"#, &expression).unwrap_err(),
        QueryError::Expression(ExpressionParseError::NestingTooDeep { limit: 128, .. })
    ));
}

#[test]
fn long_member_chain_is_rejected() {
    let expression = format!("a{}", ".a".repeat(10_000));
    assert!(matches!(
        query(r#"{"a":{"a":1}}"#, &expression).unwrap_err(),
        QueryError::Expression(ExpressionParseError::NestingTooDeep { limit: 128, .. })
    ));
}

#[test]
fn chain_at_the_limit_evaluates() {
    // 128 levels of document, 128 levels of expression.
    let document = format!("{{\"a\":{}1{}}}", "[".repeat(127), "]".repeat(127));
    let expression = format!("a{}", "[0]".repeat(127));
    assert_eq!(query(&document, &expression).unwrap(), num(1.0));
}
