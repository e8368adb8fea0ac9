mod filter;

use log::{debug, trace};
use thiserror::Error;

use crate::{
    ast::{Query, Segment, Selector, Token},
    error::JSONPathError,
    functions::FunctionRegistry,
    node::{JSONPathNode, NodeList, PathElement},
    parser::{ParseError, parse_with_functions},
    value::Value,
};

/// Errors that can occur during query evaluation.
///
/// Selectors never fail: a name on an array, an index out of range or a
/// zero slice step just select nothing. Only function extensions can.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A filter calls a function that is not in the registry
    #[error("undefined function '{name}' at index {}:\n{}", .token.index, .token.pointer())]
    UndefinedFunction { name: String, token: Token },

    /// A function returned something other than what it declared
    #[error("type error: {message} at index {}:\n{}", .token.index, .token.pointer())]
    Type { message: String, token: Token },
}

impl EvalError {
    /// The token of the offending function call.
    pub fn token(&self) -> &Token {
        match self {
            EvalError::UndefinedFunction { token, .. } | EvalError::Type { token, .. } => token,
        }
    }
}

/// Everything a selector or filter expression can see.
///
/// Passed by reference through every recursive call.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'v, 'f> {
    /// The document root (referred to by `$`)
    pub root: &'v Value,
    /// The node a filter is currently looking at (referred to by `@`)
    pub current: &'v Value,
    pub functions: &'f FunctionRegistry,
}

impl<'v, 'f> EvalContext<'v, 'f> {
    pub fn new(root: &'v Value, functions: &'f FunctionRegistry) -> Self {
        EvalContext {
            root,
            current: root,
            functions,
        }
    }

    /// Create a new context looking at `current`
    pub fn with_current(&self, current: &'v Value) -> Self {
        EvalContext { current, ..*self }
    }
}

/// The query evaluator.
///
/// Holds the function extensions filters may call. Evaluation never
/// mutates the evaluator or the document, so one evaluator can serve any
/// number of queries and threads.
#[derive(Debug)]
pub struct Evaluator {
    functions: FunctionRegistry,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Creates an evaluator with the standard function extensions.
    pub fn new() -> Self {
        Self::with_functions(FunctionRegistry::standard())
    }

    pub fn with_functions(functions: FunctionRegistry) -> Self {
        Evaluator { functions }
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Parse a query, checking function calls against this evaluator's
    /// registry.
    pub fn parse(&self, query: &str) -> Result<Query, ParseError> {
        parse_with_functions(query, &self.functions.signatures())
    }

    /// Evaluates a parsed query against a JSON document.
    ///
    /// # Arguments
    ///
    /// * `query` - The parsed query to execute
    /// * `document` - The JSON document to query (becomes the root `$`)
    ///
    /// # Returns
    ///
    /// Every selected node, in order, each with its location in `document`.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonpath_lang::{Evaluator, Value, parse};
    ///
    /// let doc = Value::from(serde_json::json!({"a": [10, 20, 30]}));
    /// let query = parse("$.a[-1]").unwrap();
    ///
    /// let nodes = Evaluator::new().eval_query(&query, &doc).unwrap();
    /// assert_eq!(nodes.values(), vec![&Value::Integer(30)]);
    /// assert_eq!(nodes.paths(), vec!["$['a'][2]"]);
    /// ```
    pub fn eval_query<'v>(
        &self,
        query: &Query,
        document: &'v Value,
    ) -> Result<NodeList<'v>, EvalError> {
        let context = EvalContext::new(document, &self.functions);
        let nodes = resolve_query(query, document, &context)?;
        debug!("{} selected {} nodes", query, nodes.len());
        Ok(nodes)
    }

    /// Parse `query` and evaluate it against `document`.
    pub fn evaluate<'v>(
        &self,
        query: &str,
        document: &'v Value,
    ) -> Result<NodeList<'v>, JSONPathError> {
        let query = self.parse(query)?;
        Ok(self.eval_query(&query, document)?)
    }
}

/// Apply `query`'s segments starting from `value`.
pub(crate) fn resolve_query<'v>(
    query: &Query,
    value: &'v Value,
    context: &EvalContext<'v, '_>,
) -> Result<NodeList<'v>, EvalError> {
    let mut nodes = NodeList::from(vec![JSONPathNode::new(value, Vec::new())]);

    for segment in &query.segments {
        let selected = resolve_segment(segment, &nodes, context)?;
        trace!(
            "segment {}: {} nodes in, {} nodes out",
            segment,
            nodes.len(),
            selected.len()
        );
        nodes = selected;
    }

    Ok(nodes)
}

fn resolve_segment<'v>(
    segment: &Segment,
    nodes: &NodeList<'v>,
    context: &EvalContext<'v, '_>,
) -> Result<NodeList<'v>, EvalError> {
    let mut out = NodeList::new();

    match segment {
        Segment::Child { selectors, .. } => {
            for node in nodes {
                for selector in selectors {
                    select(selector, node, context, &mut out)?;
                }
            }
        }
        Segment::Recursive { selectors, .. } => {
            for node in nodes {
                let mut descendants = Vec::new();
                descend(node.clone(), &mut descendants);
                for descendant in &descendants {
                    for selector in selectors {
                        select(selector, descendant, context, &mut out)?;
                    }
                }
            }
        }
    }

    Ok(out)
}

/// Collect `node` and all of its descendants, in pre-order.
fn descend<'v>(node: JSONPathNode<'v>, out: &mut Vec<JSONPathNode<'v>>) {
    let value = node.value;
    let position = out.len();
    out.push(node);

    match value {
        Value::Object(obj) => {
            for (key, child) in obj {
                let child = out[position].child(child, PathElement::Name(key.clone()));
                descend(child, out);
            }
        }
        Value::Array(arr) => {
            for (index, child) in arr.iter().enumerate() {
                let child = out[position].child(child, PathElement::Index(index));
                descend(child, out);
            }
        }
        _ => {}
    }
}

fn select<'v>(
    selector: &Selector,
    node: &JSONPathNode<'v>,
    context: &EvalContext<'v, '_>,
    out: &mut NodeList<'v>,
) -> Result<(), EvalError> {
    match selector {
        Selector::Name { name, .. } => {
            if let Value::Object(obj) = node.value
                && let Some(value) = obj.get(name)
            {
                out.push(node.child(value, PathElement::Name(name.clone())));
            }
        }
        Selector::Index { index, .. } => {
            if let Value::Array(arr) = node.value
                && let Some(index) = normalize_index(*index, arr.len())
            {
                out.push(node.child(&arr[index], PathElement::Index(index)));
            }
        }
        Selector::Wildcard { .. } => match node.value {
            Value::Object(obj) => {
                for (key, value) in obj {
                    out.push(node.child(value, PathElement::Name(key.clone())));
                }
            }
            Value::Array(arr) => {
                for (index, value) in arr.iter().enumerate() {
                    out.push(node.child(value, PathElement::Index(index)));
                }
            }
            _ => {}
        },
        Selector::Slice {
            start, stop, step, ..
        } => {
            if let Value::Array(arr) = node.value {
                for index in slice_indices(*start, *stop, *step, arr.len()) {
                    out.push(node.child(&arr[index], PathElement::Index(index)));
                }
            }
        }
        Selector::Filter { expression, .. } => match node.value {
            Value::Object(obj) => {
                for (key, value) in obj {
                    let filter_context = context.with_current(value);
                    if filter::evaluate(expression, &filter_context)?.is_truthy() {
                        out.push(node.child(value, PathElement::Name(key.clone())));
                    }
                }
            }
            Value::Array(arr) => {
                for (index, value) in arr.iter().enumerate() {
                    let filter_context = context.with_current(value);
                    if filter::evaluate(expression, &filter_context)?.is_truthy() {
                        out.push(node.child(value, PathElement::Index(index)));
                    }
                }
            }
            _ => {}
        },
    }

    Ok(())
}

/// Resolve a possibly negative index against an array length.
fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let index = if index < 0 { len + index } else { index };
    if (0..len).contains(&index) {
        usize::try_from(index).ok()
    } else {
        None
    }
}

/// Indices selected by `start:stop:step` on an array of length `len`, in
/// selection order.
fn slice_indices(start: Option<i64>, stop: Option<i64>, step: Option<i64>, len: usize) -> Vec<usize> {
    let step = step.unwrap_or(1);
    let Ok(len) = i64::try_from(len) else {
        return Vec::new();
    };
    if step == 0 || len == 0 {
        return Vec::new();
    }

    let normalize = |i: i64| if i >= 0 { i } else { len + i };
    let mut indices = Vec::new();

    if step > 0 {
        let lower = start.map(normalize).unwrap_or(0).clamp(0, len);
        let upper = stop.map(normalize).unwrap_or(len).clamp(0, len);
        let mut i = lower;
        while i < upper {
            indices.push(i as usize);
            i += step;
        }
    } else {
        let upper = start.map(normalize).unwrap_or(len - 1).clamp(-1, len - 1);
        let lower = stop.map(normalize).unwrap_or(-1).clamp(-1, len - 1);
        let mut i = upper;
        while lower < i {
            indices.push(i as usize);
            i += step;
        }
    }

    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_index() {
        assert_eq!(normalize_index(0, 3), Some(0));
        assert_eq!(normalize_index(-1, 3), Some(2));
        assert_eq!(normalize_index(-3, 3), Some(0));
        assert_eq!(normalize_index(-4, 3), None);
        assert_eq!(normalize_index(3, 3), None);
        assert_eq!(normalize_index(0, 0), None);
    }

    #[test]
    fn test_slice_indices_forward() {
        assert_eq!(slice_indices(Some(1), Some(4), None, 5), vec![1, 2, 3]);
        assert_eq!(slice_indices(None, None, Some(2), 5), vec![0, 2, 4]);
        assert_eq!(slice_indices(Some(-2), None, None, 5), vec![3, 4]);
        assert_eq!(slice_indices(Some(-10), Some(10), None, 3), vec![0, 1, 2]);
        assert_eq!(slice_indices(Some(3), Some(1), None, 5), Vec::<usize>::new());
    }

    #[test]
    fn test_slice_indices_backward() {
        assert_eq!(slice_indices(None, None, Some(-1), 5), vec![4, 3, 2, 1, 0]);
        assert_eq!(slice_indices(Some(3), Some(0), Some(-2), 5), vec![3, 1]);
        assert_eq!(slice_indices(Some(-1), Some(-3), Some(-1), 5), vec![4, 3]);
        assert_eq!(slice_indices(Some(10), None, Some(-3), 5), vec![4, 1]);
    }

    #[test]
    fn test_slice_zero_step_selects_nothing() {
        assert!(slice_indices(None, None, Some(0), 5).is_empty());
    }
}
