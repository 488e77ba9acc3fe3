use serde_json::json;

use form_spec::evaluate;

#[test]
fn ordering_comparisons() {
    assert!(evaluate("{age} > 18", &json!({ "age": 25 })));
    assert!(!evaluate("{age} > 18", &json!({ "age": 10 })));
    assert!(evaluate("{age} >= 18", &json!({ "age": 18 })));
    assert!(evaluate("{age} <= 18", &json!({ "age": "18" })));
    assert!(evaluate("{score} < 0.5", &json!({ "score": -1 })));
}

#[test]
fn missing_variables_never_order() {
    assert!(!evaluate("{missing} > 0", &json!({})));
    assert!(!evaluate("{missing} < 0", &json!({})));
    assert!(!evaluate("{missing} >= 0", &json!({ "missing": null })));
}

#[test]
fn empty_expression_is_true() {
    assert!(evaluate("", &json!({})));
    assert!(evaluate("   ", &json!(null)));
    assert!(evaluate("", &json!([1, 2, 3])));
}

#[test]
fn single_equals_is_equality() {
    assert!(evaluate("{value} = 5", &json!({ "value": 5 })));
    assert!(evaluate("{value} == 5", &json!({ "value": 5 })));
    assert!(!evaluate("{value} = 5", &json!({ "value": 6 })));
    assert!(evaluate("{value} != 5", &json!({ "value": 6 })));
}

#[test]
fn equality_coerces_like_loose_comparison() {
    assert!(evaluate("{count} = 3", &json!({ "count": "3" })));
    assert!(evaluate("{status} = 'employed'", &json!({ "status": "employed" })));
    assert!(evaluate("{status} == \"employed\"", &json!({ "status": "employed" })));
    assert!(!evaluate("{status} = 'Employed'", &json!({ "status": "employed" })));
    assert!(evaluate("{agree} = true", &json!({ "agree": true })));
    assert!(evaluate("{agree} = false", &json!({ "agree": false })));
    assert!(evaluate("{flag} = 1", &json!({ "flag": true })));
    assert!(evaluate("{colors} = 'red'", &json!({ "colors": ["red"] })));
}

#[test]
fn missing_variable_equality() {
    assert!(!evaluate("{missing} = 'x'", &json!({})));
    assert!(evaluate("{missing} != 'x'", &json!({})));
}

#[test]
fn variable_names_keep_spaces() {
    let data = json!({ "annual income": 50000, "annual": 1 });
    assert!(evaluate("{annual income} > 10000", &data));
    assert!(!evaluate("{annual  income} > 10000", &data));
}

#[test]
fn string_ordering_is_lexicographic() {
    assert!(evaluate("{name} > 'apple'", &json!({ "name": "banana" })));
    assert!(!evaluate("{name} > 5", &json!({ "name": "banana" })));
}

#[test]
fn non_object_data_is_empty_context() {
    assert!(!evaluate("{age} > 1", &json!(null)));
    assert!(!evaluate("{age} = 1", &json!("age")));
    assert!(evaluate("{age} != 1", &json!(42)));
}

#[test]
fn malformed_expressions_are_false() {
    let data = json!({ "age": 30, "a": 1, "b": 2 });
    for expression in [
        "age > 18",
        "{age > 18",
        "{age} 18",
        "{age} >",
        "{age} === 30",
        "{age} > eighteen",
        "{a} = 1 and {b} = 2",
        "{a} = 1 || {b} = 2",
        "{age} = 'unterminated",
        "{} = 1",
    ] {
        assert!(!evaluate(expression, &data), "{expression}");
    }
}
