use std::fmt;

use crate::ast::{Expression, Token, expressions::escape_string};

/// A single matching rule inside a segment.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Object member by name
    ///
    /// # Examples
    /// ```text
    /// $.store          // shorthand
    /// $['store']       // bracketed
    /// ```
    Name {
        token: Token,
        name: String,
        /// Written as `.name` rather than `['name']`
        shorthand: bool,
    },

    /// Array element by index, negative counts from the end
    ///
    /// # Examples
    /// ```text
    /// $[0]
    /// $[-1]
    /// ```
    Index { token: Token, index: i64 },

    /// Every member or element (`*`)
    Wildcard { token: Token },

    /// Array slice, `start:stop:step`
    ///
    /// # Examples
    /// ```text
    /// $[1:3]
    /// $[::-1]
    /// ```
    Slice {
        token: Token,
        start: Option<i64>,
        stop: Option<i64>,
        step: Option<i64>,
    },

    /// Filter (`?expr`)
    ///
    /// # Example
    /// ```text
    /// $.books[?@.price < 10]
    /// ```
    Filter {
        token: Token,
        expression: Box<Expression>,
    },
}

impl Selector {
    pub fn token(&self) -> &Token {
        match self {
            Selector::Name { token, .. }
            | Selector::Index { token, .. }
            | Selector::Wildcard { token }
            | Selector::Slice { token, .. }
            | Selector::Filter { token, .. } => token,
        }
    }

    /// Name and index selectors select at most one node.
    pub fn is_singular(&self) -> bool {
        matches!(self, Selector::Name { .. } | Selector::Index { .. })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Name { name, .. } => write!(f, "'{}'", escape_string(name, '\'')),
            Selector::Index { index, .. } => write!(f, "{}", index),
            Selector::Wildcard { .. } => f.write_str("*"),
            Selector::Slice {
                start, stop, step, ..
            } => {
                if let Some(start) = start {
                    write!(f, "{}", start)?;
                }
                f.write_str(":")?;
                if let Some(stop) = stop {
                    write!(f, "{}", stop)?;
                }
                if let Some(step) = step {
                    write!(f, ":{}", step)?;
                }
                Ok(())
            }
            Selector::Filter { expression, .. } => write!(f, "?{}", expression),
        }
    }
}
