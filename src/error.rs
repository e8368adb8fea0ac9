use thiserror::Error;

use crate::{evaluator::EvalError, parser::ParseError};

/// Any failure of a one-shot `find`: the query did not parse, or a
/// function extension failed during evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JSONPathError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}
