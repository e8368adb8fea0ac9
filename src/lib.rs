//! RFC 9535 JSONPath: parse a query, then evaluate it against a JSON
//! document to get the selected nodes and their locations.
//!
//! ```
//! use jsonpath_lang::{Value, find};
//!
//! let doc = Value::from(serde_json::json!({
//!     "store": {"book": [
//!         {"title": "Sayings", "price": 8.95},
//!         {"title": "Sword", "price": 12.99}
//!     ]}
//! }));
//!
//! let nodes = find("$.store.book[?@.price < 10].title", &doc).unwrap();
//! assert_eq!(nodes.values(), vec![&Value::from("Sayings")]);
//! assert_eq!(nodes.paths(), vec!["$['store']['book'][0]['title']"]);
//! ```
pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod lexer;
pub mod node;
pub mod parser;
pub mod value;

pub use ast::{
    BinaryOperator, Expression, ExpressionType, FunctionSignature, Query, Segment, Selector, Token,
    TokenType,
};
pub use error::JSONPathError;
pub use evaluator::{EvalContext, EvalError, Evaluator};
pub use functions::{FilterFunction, FilterValue, FunctionRegistry};
pub use lexer::{LexError, Lexer, tokenize};
pub use node::{JSONPathNode, NodeList, PathElement};
pub use parser::{ParseError, Parser, parse, parse_with_functions};
pub use value::Value;

/// Parse `query` and evaluate it against `document` with the standard
/// function extensions.
pub fn find<'v>(query: &str, document: &'v Value) -> Result<NodeList<'v>, JSONPathError> {
    Evaluator::new().evaluate(query, document)
}

/// Like [`find`], returning only the selected values.
pub fn find_values<'v>(query: &str, document: &'v Value) -> Result<Vec<&'v Value>, JSONPathError> {
    Ok(find(query, document)?.values())
}
