//! Function extensions callable from filter expressions.
//!
//! A function extension declares the [`ExpressionType`] of each argument and
//! of its result. The parser checks every call against those declarations;
//! the evaluator uses them to decide how to pass arguments.
//!
//! The standard functions are [`Count`], [`Length`], [`Match`], [`Search`]
//! and [`ValueOf`], registered as `count`, `length`, `match`, `search` and
//! `value`.
//!
//! # Custom functions
//!
//! ```
//! use jsonpath_lang::{Evaluator, ExpressionType, FilterFunction, FilterValue, FunctionRegistry};
//! use jsonpath_lang::parser::parse_with_functions;
//!
//! struct IsEven;
//!
//! impl FilterFunction for IsEven {
//!     fn arg_types(&self) -> &[ExpressionType] {
//!         &[ExpressionType::Value]
//!     }
//!
//!     fn return_type(&self) -> ExpressionType {
//!         ExpressionType::Logical
//!     }
//!
//!     fn call<'v>(&self, args: Vec<FilterValue<'v>>) -> FilterValue<'v> {
//!         let even = matches!(
//!             args.first().and_then(FilterValue::as_value),
//!             Some(jsonpath_lang::Value::Integer(n)) if n % 2 == 0
//!         );
//!         FilterValue::logical(even)
//!     }
//! }
//!
//! let mut functions = FunctionRegistry::standard();
//! functions.register("is_even", IsEven);
//!
//! let query = parse_with_functions("$[?is_even(@)]", &functions.signatures()).unwrap();
//! let doc = jsonpath_lang::Value::from(serde_json::json!([1, 2, 3, 4]));
//! let nodes = Evaluator::with_functions(functions).eval_query(&query, &doc).unwrap();
//! assert_eq!(nodes.len(), 2);
//! ```
mod count;
mod length;
mod pattern;
mod value;

use std::{borrow::Cow, collections::HashMap, fmt};

pub use count::Count;
pub use length::Length;
pub use pattern::{Match, Search};
pub use value::ValueOf;

use crate::{
    ast::{ExpressionType, FunctionSignature, FunctionSignatures},
    node::NodeList,
    value::Value,
};

/// The result of evaluating a filter expression, and what function
/// extensions receive and return.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue<'v> {
    /// Nodes selected by an embedded query
    Nodes(NodeList<'v>),

    /// A single JSON value, borrowed from the document or produced by a
    /// literal or a function
    Value(Cow<'v, Value>),

    /// No value at all, e.g. `value()` of an empty node list
    Nothing,
}

impl<'v> FilterValue<'v> {
    pub fn owned(value: Value) -> Self {
        FilterValue::Value(Cow::Owned(value))
    }

    pub fn logical(b: bool) -> Self {
        FilterValue::owned(Value::Boolean(b))
    }

    /// Node lists are truthy when non-empty, values unless they are `false`.
    pub fn is_truthy(&self) -> bool {
        match self {
            FilterValue::Nodes(nodes) => !nodes.is_empty(),
            FilterValue::Value(value) => !matches!(value.as_ref(), Value::Boolean(false)),
            FilterValue::Nothing => false,
        }
    }

    /// The single value this stands for, if any.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            FilterValue::Value(value) => Some(value.as_ref()),
            FilterValue::Nodes(nodes) => nodes.singular_value(),
            FilterValue::Nothing => None,
        }
    }
}

/// A function extension.
pub trait FilterFunction: Send + Sync {
    /// Declared type of each argument, in order.
    fn arg_types(&self) -> &[ExpressionType];

    /// Declared result type.
    fn return_type(&self) -> ExpressionType;

    /// Call the function.
    ///
    /// Arguments declared `NodesType` arrive as [`FilterValue::Nodes`];
    /// others arrive as a value or [`FilterValue::Nothing`]. A function
    /// declared to return `NodesType` must return [`FilterValue::Nodes`].
    fn call<'v>(&self, args: Vec<FilterValue<'v>>) -> FilterValue<'v>;

    fn signature(&self) -> FunctionSignature {
        FunctionSignature::new(self.arg_types().to_vec(), self.return_type())
    }
}

/// Function extensions available to a query, by name.
#[derive(Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Box<dyn FilterFunction>>,
}

impl FunctionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the standard function extensions.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register("count", Count);
        registry.register("length", Length);
        registry.register("match", Match::default());
        registry.register("search", Search::default());
        registry.register("value", ValueOf);
        registry
    }

    /// Registers a function, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, function: impl FilterFunction + 'static) {
        self.functions.insert(name.into(), Box::new(function));
    }

    pub fn get(&self, name: &str) -> Option<&dyn FilterFunction> {
        self.functions.get(name).map(|f| f.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Signatures of every registered function, for the parser.
    pub fn signatures(&self) -> FunctionSignatures {
        self.functions
            .iter()
            .map(|(name, function)| (name.clone(), function.signature()))
            .collect()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.functions.keys().collect();
        names.sort();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}

/// Signatures of the standard function extensions.
pub fn standard_signatures() -> FunctionSignatures {
    FunctionRegistry::standard().signatures()
}
