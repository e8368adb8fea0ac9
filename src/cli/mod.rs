//! CLI support for jsonpath-lang
//!
//! Provides programmatic access to the `jsonpath` binary's commands for
//! embedding in other tools.

mod check;
mod convert;

pub use check::{CheckResult, QueryOptions, execute_check, execute_query};
pub use convert::nodes_to_json;

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("Evaluation error: {0}")]
    Eval(#[from] crate::EvalError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,
}
