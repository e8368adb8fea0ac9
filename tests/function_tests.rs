use jsonpath_lang::{
    EvalError, Evaluator, ExpressionType, FilterFunction, FilterValue, FunctionRegistry,
    JSONPathError, NodeList, Value, find,
};
use serde_json::json;

fn paths(query: &str, doc: serde_json::Value) -> Vec<String> {
    let doc = Value::from(doc);
    find(query, &doc)
        .unwrap_or_else(|e| panic!("{} failed: {}", query, e))
        .paths()
}

fn paths_with(evaluator: &Evaluator, query: &str, doc: serde_json::Value) -> Vec<String> {
    let doc = Value::from(doc);
    evaluator
        .evaluate(query, &doc)
        .unwrap_or_else(|e| panic!("{} failed: {}", query, e))
        .paths()
}

// ============================================================================
// length()
// ============================================================================

#[test]
fn test_length_of_string_counts_characters() {
    let doc = json!(["abc", "日本語", "ab"]);
    assert_eq!(paths("$[?length(@) == 3]", doc), vec!["$[0]", "$[1]"]);
}

#[test]
fn test_length_of_array_and_object() {
    let doc = json!([{"tags": [1, 2, 3]}, {"tags": {"a": 1}}, {"tags": []}]);
    assert_eq!(paths("$[?length(@.tags) >= 1]", doc), vec!["$[0]", "$[1]"]);
}

#[test]
fn test_length_of_other_values_is_nothing() {
    let doc = json!([{"v": 12}, {"v": true}, {"v": null}, {}]);
    assert!(paths("$[?length(@.v) >= 0]", doc.clone()).is_empty());
    assert_eq!(
        paths("$[?length(@.v) == $.missing]", doc),
        vec!["$[0]", "$[1]", "$[2]", "$[3]"]
    );
}

// ============================================================================
// count()
// ============================================================================

#[test]
fn test_count() {
    let doc = json!([{"a": [1, 2]}, {"a": [1]}, {"b": 1}]);
    assert_eq!(paths("$[?count(@.a[*]) == 2]", doc.clone()), vec!["$[0]"]);
    assert_eq!(paths("$[?count(@.a[*]) == 0]", doc), vec!["$[2]"]);
}

#[test]
fn test_count_descendants() {
    let doc = json!({"x": {"a": {"b": 1}}, "y": {"c": 2}});
    assert_eq!(paths("$[?count(@..*) > 1]", doc), vec!["$['x']"]);
}

// ============================================================================
// match() and search()
// ============================================================================

#[test]
fn test_match_is_anchored() {
    let doc = json!([{"d": "1974-05-01"}, {"d": "x1974-05-01"}, {"d": 1974}]);
    assert_eq!(
        paths("$[?match(@.d, '1974-05-..')]", doc),
        vec!["$[0]"]
    );
}

#[test]
fn test_search_finds_substring() {
    let doc = json!(["moby dick", "the lord", "dickens"]);
    assert_eq!(paths("$[?search(@, 'dick')]", doc), vec!["$[0]", "$[2]"]);
}

#[test]
fn test_dot_does_not_match_line_breaks() {
    let doc = json!(["a\nb", "a-b", "a\rb"]);
    assert_eq!(paths("$[?match(@, 'a.b')]", doc), vec!["$[1]"]);
}

#[test]
fn test_pattern_from_document() {
    let doc = json!({"pattern": "^B", "names": ["Bob", "Alice", "Bea"]});
    assert_eq!(
        paths("$.names[?search(@, $.pattern)]", doc),
        vec!["$['names'][0]", "$['names'][2]"]
    );
}

#[test]
fn test_invalid_pattern_never_matches() {
    let doc = json!(["(", "a"]);
    assert!(paths("$[?search(@, '(')]", doc.clone()).is_empty());
    assert_eq!(paths("$[?!match(@, '(')]", doc), vec!["$[0]", "$[1]"]);
}

#[test]
fn test_non_string_arguments_never_match() {
    let doc = json!([1, ["a"], {"a": "a"}]);
    assert!(paths("$[?match(@, 'a')]", doc.clone()).is_empty());
    assert!(paths("$[?search(@, 1)]", json!(["1"])).is_empty());
    assert!(paths("$[?search(@.missing, 'a')]", doc).is_empty());
}

// ============================================================================
// value()
// ============================================================================

#[test]
fn test_value_of_single_node() {
    let doc = json!([{"a": {"b": 5}}, {"a": {"b": 6}}]);
    assert_eq!(paths("$[?value(@..b) == 5]", doc), vec!["$[0]"]);
}

#[test]
fn test_value_of_many_nodes_is_nothing() {
    let doc = json!([{"a": 1, "b": 1}, {"a": 1}]);
    assert_eq!(paths("$[?value(@.*) == 1]", doc), vec!["$[1]"]);
}

// ============================================================================
// Custom functions
// ============================================================================

struct IsEven;

impl FilterFunction for IsEven {
    fn arg_types(&self) -> &[ExpressionType] {
        &[ExpressionType::Value]
    }

    fn return_type(&self) -> ExpressionType {
        ExpressionType::Logical
    }

    fn call<'v>(&self, args: Vec<FilterValue<'v>>) -> FilterValue<'v> {
        let even = matches!(
            args.first().and_then(FilterValue::as_value),
            Some(Value::Integer(n)) if n % 2 == 0
        );
        FilterValue::logical(even)
    }
}

/// Keeps only the first node of its argument.
struct First;

impl FilterFunction for First {
    fn arg_types(&self) -> &[ExpressionType] {
        &[ExpressionType::Nodes]
    }

    fn return_type(&self) -> ExpressionType {
        ExpressionType::Nodes
    }

    fn call<'v>(&self, args: Vec<FilterValue<'v>>) -> FilterValue<'v> {
        match args.into_iter().next() {
            Some(FilterValue::Nodes(nodes)) => {
                FilterValue::Nodes(nodes.into_iter().take(1).collect::<NodeList>())
            }
            _ => FilterValue::Nodes(NodeList::new()),
        }
    }
}

/// Declares a node list result but returns a value.
struct Broken;

impl FilterFunction for Broken {
    fn arg_types(&self) -> &[ExpressionType] {
        &[]
    }

    fn return_type(&self) -> ExpressionType {
        ExpressionType::Nodes
    }

    fn call<'v>(&self, _args: Vec<FilterValue<'v>>) -> FilterValue<'v> {
        FilterValue::logical(true)
    }
}

/// True when its logical argument is false.
struct Negate;

impl FilterFunction for Negate {
    fn arg_types(&self) -> &[ExpressionType] {
        &[ExpressionType::Logical]
    }

    fn return_type(&self) -> ExpressionType {
        ExpressionType::Logical
    }

    fn call<'v>(&self, args: Vec<FilterValue<'v>>) -> FilterValue<'v> {
        let truthy = args.first().is_some_and(FilterValue::is_truthy);
        FilterValue::logical(!truthy)
    }
}

fn custom_evaluator() -> Evaluator {
    let mut functions = FunctionRegistry::standard();
    functions.register("is_even", IsEven);
    functions.register("first", First);
    functions.register("broken", Broken);
    functions.register("negate", Negate);
    Evaluator::with_functions(functions)
}

#[test]
fn test_custom_value_function() {
    let evaluator = custom_evaluator();
    assert_eq!(
        paths_with(&evaluator, "$[?is_even(@)]", json!([1, 2, 3, 4])),
        vec!["$[1]", "$[3]"]
    );
}

#[test]
fn test_custom_nodes_function() {
    let evaluator = custom_evaluator();
    let doc = json!([{"a": [1, 2]}, {"a": []}]);
    assert_eq!(
        paths_with(&evaluator, "$[?count(first(@.a[*])) == 1]", doc),
        vec!["$[0]"]
    );
}

#[test]
fn test_logical_parameter_receives_existence() {
    let evaluator = custom_evaluator();
    let doc = json!([{"a": 1}, {"b": 1}]);
    assert_eq!(paths_with(&evaluator, "$[?negate(@.a)]", doc.clone()), vec!["$[1]"]);
    assert_eq!(paths_with(&evaluator, "$[?negate(@.a == 1)]", doc), vec!["$[1]"]);
}

#[test]
fn test_declared_nodes_result_is_enforced() {
    let evaluator = custom_evaluator();
    let doc = Value::from(json!([1]));
    let error = evaluator.evaluate("$[?broken()]", &doc).unwrap_err();
    assert!(matches!(error, JSONPathError::Eval(EvalError::Type { .. })));
}

#[test]
fn test_parse_uses_registry() {
    let evaluator = custom_evaluator();
    assert!(evaluator.parse("$[?is_even(@)]").is_ok());
    assert!(jsonpath_lang::parse("$[?is_even(@)]").is_err());
}

#[test]
fn test_undefined_function_at_evaluation() {
    let query = custom_evaluator().parse("$[?is_even(@)]").unwrap();
    let doc = Value::from(json!([2]));
    let error = Evaluator::new().eval_query(&query, &doc).unwrap_err();
    match error {
        EvalError::UndefinedFunction { name, token } => {
            assert_eq!(name, "is_even");
            assert_eq!(token.index, 3);
        }
        other => panic!("expected an undefined function error, got {:?}", other),
    }
}

#[test]
fn test_undefined_function_on_empty_input() {
    let query = custom_evaluator().parse("$[?is_even(@)]").unwrap();
    let doc = Value::from(json!([]));
    assert!(Evaluator::new().eval_query(&query, &doc).unwrap().is_empty());
}

#[test]
fn test_registry() {
    let mut functions = FunctionRegistry::new();
    assert!(!functions.contains("is_even"));
    functions.register("is_even", IsEven);
    assert!(functions.contains("is_even"));
    assert!(functions.get("is_even").is_some());

    let signatures = functions.signatures();
    assert_eq!(signatures.len(), 1);
    assert_eq!(signatures["is_even"].args, vec![ExpressionType::Value]);
    assert_eq!(signatures["is_even"].result, ExpressionType::Logical);

    let standard = FunctionRegistry::standard();
    for name in ["count", "length", "match", "search", "value"] {
        assert!(standard.contains(name), "missing {}", name);
    }
}
