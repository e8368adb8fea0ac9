use std::{collections::HashMap, fmt};

/// The type system function extensions are checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionType {
    /// A single JSON value, or Nothing
    Value,
    /// True or false, never a JSON value
    Logical,
    /// A node list, possibly empty
    Nodes,
}

impl fmt::Display for ExpressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionType::Value => f.write_str("ValueType"),
            ExpressionType::Logical => f.write_str("LogicalType"),
            ExpressionType::Nodes => f.write_str("NodesType"),
        }
    }
}

/// Declared argument and result types of a function extension.
///
/// Signatures are all the parser knows about a function; they are used to
/// reject badly typed calls before any document is seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub args: Vec<ExpressionType>,
    pub result: ExpressionType,
}

impl FunctionSignature {
    pub fn new(args: Vec<ExpressionType>, result: ExpressionType) -> Self {
        FunctionSignature { args, result }
    }
}

/// Function name to signature, as handed to the parser.
pub type FunctionSignatures = HashMap<String, FunctionSignature>;
