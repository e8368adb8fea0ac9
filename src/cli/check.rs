//! Check and run JSONPath queries against JSON input

use super::{CliError, nodes_to_json};
use crate::{Evaluator, Value};

/// Options for the query command
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// The JSONPath query to run
    pub query: String,
    /// JSON input string
    pub input: Option<String>,
    /// Output `{"path", "value"}` pairs instead of bare values
    pub paths: bool,
}

/// Result of checking a query without running it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// The query in canonical form
    pub canonical: String,
    /// Whether the query selects at most one node
    pub singular: bool,
}

/// Parse a query and report its canonical form.
pub fn execute_check(query: &str) -> Result<CheckResult, CliError> {
    let query = Evaluator::new().parse(query)?;
    Ok(CheckResult {
        canonical: query.to_canonical_string(),
        singular: query.is_singular(),
    })
}

/// Run a query against the JSON in `options.input`.
pub fn execute_query(options: &QueryOptions) -> Result<serde_json::Value, CliError> {
    let evaluator = Evaluator::new();
    let query = evaluator.parse(&options.query)?;

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let document = Value::from(serde_json::from_str::<serde_json::Value>(json_str)?);

    let nodes = evaluator.eval_query(&query, &document)?;
    Ok(nodes_to_json(&nodes, options.paths))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_reports_canonical_form() {
        let result = execute_check("$.a.b[0]").unwrap();
        assert_eq!(result.canonical, "$['a']['b'][0]");
        assert!(result.singular);
    }

    #[test]
    fn test_query_without_input() {
        let options = QueryOptions {
            query: "$.a".to_string(),
            ..Default::default()
        };
        assert!(matches!(execute_query(&options), Err(CliError::NoInput)));
    }

    #[test]
    fn test_query_with_paths() {
        let options = QueryOptions {
            query: "$.a[*]".to_string(),
            input: Some(r#"{"a": [1, "x"]}"#.to_string()),
            paths: true,
        };
        let output = execute_query(&options).unwrap();
        assert_eq!(
            output,
            serde_json::json!([
                {"path": "$['a'][0]", "value": 1},
                {"path": "$['a'][1]", "value": "x"}
            ])
        );
    }
}
