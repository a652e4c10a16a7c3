use std::borrow::Cow;

use jsonq_core::{decode, evaluate, parse_expression, Arity, EvalError, Value, ValueKind};

const DOC: &str = r#"{
    "a": {"b": [10, 20, 30, {"c": 99}], "name": "héllo", "flag": true, "nothing": null},
    "i": 2,
    "frac": 1.9,
    "neg": -1,
    "list": [[1, 2], [3]],
    "7": "seven"
}"#;

fn doc() -> Value {
    decode(DOC).expect("fixture must decode")
}

fn eval(expression: &str) -> Result<Value, EvalError> {
    let root = doc();
    let ast = parse_expression(expression).expect("expression must parse");
    evaluate(&ast, &root).map(Cow::into_owned)
}

fn num(n: f64) -> Value {
    Value::Number(n)
}

// ============================================================================
// Paths
// ============================================================================

#[test]
fn root_identifier() {
    assert_eq!(eval("i").unwrap(), num(2.0));
}

#[test]
fn member_and_subscript_chain() {
    assert_eq!(eval("a.b[1]").unwrap(), num(20.0));
    assert_eq!(eval("a.b[3].c").unwrap(), num(99.0));
    assert_eq!(eval("list[1][0]").unwrap(), num(3.0));
}

#[test]
fn subscript_with_computed_index() {
    assert_eq!(eval("a.b[i]").unwrap(), num(30.0));
    assert_eq!(eval("a.b[list[0][1]]").unwrap(), num(30.0));
}

#[test]
fn fractional_index_truncates() {
    assert_eq!(eval("a.b[frac]").unwrap(), num(20.0));
}

#[test]
fn path_results_borrow_from_root() {
    let root = doc();
    let ast = parse_expression("a.b").unwrap();
    let result = evaluate(&ast, &root).unwrap();
    assert!(matches!(result, Cow::Borrowed(_)));
    assert!(std::ptr::eq(
        &*result,
        root.field("a").unwrap().field("b").unwrap()
    ));
}

#[test]
fn function_results_are_owned() {
    let root = doc();
    let ast = parse_expression("size(a.b)").unwrap();
    assert!(matches!(evaluate(&ast, &root).unwrap(), Cow::Owned(_)));
}

#[test]
fn evaluation_does_not_mutate_root() {
    let root = doc();
    let before = root.clone();
    for text in ["a.b[1]", "size(a)", "max(a.b[0], i)", "a.b[9]"] {
        let _ = evaluate(&parse_expression(text).unwrap(), &root);
    }
    assert_eq!(root, before);
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn digit_literal_is_a_number() {
    assert_eq!(eval("5").unwrap(), num(5.0));
    assert_eq!(eval("007").unwrap(), num(7.0));
}

#[test]
fn non_digit_literal_is_looked_up_on_root() {
    assert_eq!(
        eval("-1").unwrap_err(),
        EvalError::UnknownIdentifier("-1".to_string())
    );
    assert_eq!(
        eval("1.5").unwrap_err(),
        EvalError::UnknownIdentifier("1.5".to_string())
    );
}

#[test]
fn unknown_identifier() {
    assert_eq!(
        eval("missing").unwrap_err(),
        EvalError::UnknownIdentifier("missing".to_string())
    );
}

#[test]
fn identifier_against_non_object_root() {
    let root = Value::Array(vec![num(1.0)]);
    let ast = parse_expression("a").unwrap();
    assert_eq!(
        evaluate(&ast, &root).unwrap_err(),
        EvalError::UnknownIdentifier("a".to_string())
    );
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn min_and_max() {
    assert_eq!(eval("max(a.b[0], a.b[1])").unwrap(), num(20.0));
    assert_eq!(eval("min(a.b[0])").unwrap(), num(10.0));
    assert_eq!(eval("max(a.b[0], 10, a.b[1], 15)").unwrap(), num(20.0));
    assert_eq!(eval("min(a.b[2], i, 40)").unwrap(), num(2.0));
    assert_eq!(eval("max(neg, frac)").unwrap(), num(1.9));
}

#[test]
fn min_max_require_numbers() {
    assert_eq!(
        eval("min(a.b[0], a.name)").unwrap_err(),
        EvalError::TypeMismatch {
            expected: "number",
            actual: ValueKind::String
        }
    );
    assert!(matches!(
        eval("max(a.b)").unwrap_err(),
        EvalError::TypeMismatch { actual: ValueKind::Array, .. }
    ));
}

#[test]
fn min_max_require_an_argument() {
    assert_eq!(
        eval("min()").unwrap_err(),
        EvalError::WrongArgumentCount {
            function: "min".to_string(),
            expected: Arity::AtLeast(1),
            actual: 0
        }
    );
    assert!(matches!(
        eval("max()").unwrap_err(),
        EvalError::WrongArgumentCount { .. }
    ));
}

#[test]
fn size_of_containers_and_strings() {
    assert_eq!(eval("size(a.b)").unwrap(), num(4.0));
    assert_eq!(eval("size(a)").unwrap(), num(4.0));
    assert_eq!(eval("size(a.b[3])").unwrap(), num(1.0));
    // Characters, not bytes.
    assert_eq!(eval("size(a.name)").unwrap(), num(5.0));
}

#[test]
fn size_rejects_scalars() {
    for text in ["size(a.b[0])", "size(a.flag)", "size(a.nothing)"] {
        assert!(
            matches!(eval(text).unwrap_err(), EvalError::TypeMismatch { .. }),
            "{text}"
        );
    }
    assert_eq!(
        eval("size(i)").unwrap_err(),
        EvalError::TypeMismatch {
            expected: "object, array, or string",
            actual: ValueKind::Number
        }
    );
}

#[test]
fn size_requires_exactly_one_argument() {
    assert_eq!(
        eval("size(a, a)").unwrap_err(),
        EvalError::WrongArgumentCount {
            function: "size".to_string(),
            expected: Arity::Exactly(1),
            actual: 2
        }
    );
    assert!(matches!(
        eval("size()").unwrap_err(),
        EvalError::WrongArgumentCount { actual: 0, .. }
    ));
}

#[test]
fn unknown_function() {
    assert_eq!(
        eval("sum(a.b[0])").unwrap_err(),
        EvalError::UnknownFunction("sum".to_string())
    );
}

#[test]
fn function_results_accept_postfix_only_when_types_allow() {
    assert!(matches!(
        eval("size(a.b)[0]").unwrap_err(),
        EvalError::TypeMismatch { expected: "array", actual: ValueKind::Number }
    ));
    assert!(matches!(
        eval("max(1).x").unwrap_err(),
        EvalError::TypeMismatch { expected: "object", actual: ValueKind::Number }
    ));
}

// ============================================================================
// Subscript and member errors
// ============================================================================

#[test]
fn index_out_of_bounds() {
    assert_eq!(
        eval("a.b[5]").unwrap_err(),
        EvalError::IndexOutOfBounds { index: 5, length: 4 }
    );
    assert_eq!(
        eval("a.b[99]").unwrap_err(),
        EvalError::IndexOutOfBounds { index: 99, length: 4 }
    );
}

#[test]
fn negative_index_out_of_bounds() {
    assert_eq!(
        eval("a.b[neg]").unwrap_err(),
        EvalError::IndexOutOfBounds { index: -1, length: 4 }
    );
}

#[test]
fn subscript_requires_array() {
    assert_eq!(
        eval("a[0]").unwrap_err(),
        EvalError::TypeMismatch {
            expected: "array",
            actual: ValueKind::Object
        }
    );
}

#[test]
fn subscript_index_must_be_a_number() {
    assert_eq!(
        eval("a.b[a.name]").unwrap_err(),
        EvalError::TypeMismatch {
            expected: "number",
            actual: ValueKind::String
        }
    );
}

#[test]
fn member_access_requires_object() {
    assert_eq!(
        eval("a.b.c").unwrap_err(),
        EvalError::TypeMismatch {
            expected: "object",
            actual: ValueKind::Array
        }
    );
}

#[test]
fn member_not_found() {
    assert_eq!(
        eval("a.zzz").unwrap_err(),
        EvalError::FieldNotFound("zzz".to_string())
    );
}

#[test]
fn error_messages_are_readable() {
    assert_eq!(
        eval("a.b[5]").unwrap_err().to_string(),
        "index 5 out of bounds for length 4"
    );
    assert_eq!(
        eval("size(a, i)").unwrap_err().to_string(),
        "size() expects exactly 1 argument(s), got 2"
    );
}
