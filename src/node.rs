use std::{fmt, ops::Index, slice};

use crate::{ast::expressions::escape_string, value::Value};

/// One step of a node's location within a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// Object member name
    ///
    /// # Examples
    /// - `$['store']` → `Name("store")`
    Name(String),

    /// Array index, always non-negative
    ///
    /// # Examples
    /// - `$[-1]` on a three element array → `Index(2)`
    Index(usize),
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathElement::Name(name) => write!(f, "['{}']", escape_string(name, '\'')),
            PathElement::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// The location of a node, from the root down.
pub type Location = Vec<PathElement>;

/// A value selected by a query, along with where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct JSONPathNode<'v> {
    pub value: &'v Value,
    pub location: Location,
}

impl<'v> JSONPathNode<'v> {
    pub fn new(value: &'v Value, location: Location) -> Self {
        JSONPathNode { value, location }
    }

    /// A node for `value` one step below `self`.
    pub(crate) fn child(&self, value: &'v Value, element: PathElement) -> Self {
        let mut location = Vec::with_capacity(self.location.len() + 1);
        location.extend_from_slice(&self.location);
        location.push(element);
        JSONPathNode { value, location }
    }

    /// The normalized path to this node.
    ///
    /// ```
    /// use jsonpath_lang::{JSONPathNode, PathElement, Value};
    ///
    /// let value = Value::Null;
    /// let node = JSONPathNode::new(
    ///     &value,
    ///     vec![PathElement::Name("a".to_string()), PathElement::Index(0)],
    /// );
    /// assert_eq!(node.path(), "$['a'][0]");
    /// ```
    pub fn path(&self) -> String {
        let mut path = String::from("$");
        for element in &self.location {
            path.push_str(&element.to_string());
        }
        path
    }
}

/// The ordered result of evaluating a query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeList<'v> {
    nodes: Vec<JSONPathNode<'v>>,
}

impl<'v> NodeList<'v> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn push(&mut self, node: JSONPathNode<'v>) {
        self.nodes.push(node);
    }

    pub fn iter(&self) -> slice::Iter<'_, JSONPathNode<'v>> {
        self.nodes.iter()
    }

    pub fn first(&self) -> Option<&JSONPathNode<'v>> {
        self.nodes.first()
    }

    /// The selected values, in order.
    pub fn values(&self) -> Vec<&'v Value> {
        self.nodes.iter().map(|node| node.value).collect()
    }

    /// The normalized path of every node, in order.
    pub fn paths(&self) -> Vec<String> {
        self.nodes.iter().map(JSONPathNode::path).collect()
    }

    /// The single node's value, if there is exactly one node.
    pub fn singular_value(&self) -> Option<&'v Value> {
        match self.nodes.as_slice() {
            [node] => Some(node.value),
            _ => None,
        }
    }
}

impl<'v> From<Vec<JSONPathNode<'v>>> for NodeList<'v> {
    fn from(nodes: Vec<JSONPathNode<'v>>) -> Self {
        NodeList { nodes }
    }
}

impl<'v> FromIterator<JSONPathNode<'v>> for NodeList<'v> {
    fn from_iter<I: IntoIterator<Item = JSONPathNode<'v>>>(iter: I) -> Self {
        NodeList {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<'v> IntoIterator for NodeList<'v> {
    type Item = JSONPathNode<'v>;
    type IntoIter = std::vec::IntoIter<JSONPathNode<'v>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a, 'v> IntoIterator for &'a NodeList<'v> {
    type Item = &'a JSONPathNode<'v>;
    type IntoIter = slice::Iter<'a, JSONPathNode<'v>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl<'v> Index<usize> for NodeList<'v> {
    type Output = JSONPathNode<'v>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.nodes[index]
    }
}

impl<'v> Extend<JSONPathNode<'v>> for NodeList<'v> {
    fn extend<I: IntoIterator<Item = JSONPathNode<'v>>>(&mut self, iter: I) {
        self.nodes.extend(iter);
    }
}
