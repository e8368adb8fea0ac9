//! # JSONPath - Abstract Syntax Tree
//!
//! This module defines the tokens and syntax tree for JSONPath queries as
//! described by RFC 9535.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Filter expression nodes (literals, logic, comparisons, queries, calls)
//! - **[operators]** - Logical and comparison operators
//! - **[selectors]** - Name, index, wildcard, slice and filter selectors
//! - **[query]** - Segments and the complete query
//! - **[functions]** - Function extension type signatures
//!
//! ## Quick Start
//!
//! ```text
//! $.store.book[?@.price < 10].title
//! ```
//!
//! This query selects the titles of every book cheaper than 10.
//!
//! ## Core Concepts
//!
//! ### Segments
//!
//! A query is `$` followed by zero or more segments. A child segment
//! applies its selectors to the children of each input node; a descendant
//! segment (`..`) applies them to each node and all of its descendants.
//!
//! ```text
//! $.a           // child segment, shorthand
//! $['a', 'b']   // child segment, two selectors
//! $..a          // descendant segment
//! ```
//!
//! ### Selectors
//!
//! - **Name** `'a'` - object member
//! - **Index** `0`, `-1` - array element, negative counts from the end
//! - **Wildcard** `*` - every member or element
//! - **Slice** `1:5:2` - range of array elements
//! - **Filter** `?expr` - children for which `expr` holds
//!
//! ### Singular Queries
//!
//! A query made only of name and index selectors, one per child segment,
//! selects at most one node. Only singular queries may be compared.
//!
//! ```text
//! $[?@.a == $.b]      // ok
//! $[?@.* == 1]        // type error: non-singular
//! ```
pub mod expressions;
pub mod functions;
pub mod operators;
pub mod query;
pub mod selectors;
pub mod tokens;

pub use expressions::Expression;
pub use functions::{ExpressionType, FunctionSignature, FunctionSignatures};
pub use operators::BinaryOperator;
pub use query::{Query, Segment};
pub use selectors::Selector;
pub use tokens::{Token, TokenType};
