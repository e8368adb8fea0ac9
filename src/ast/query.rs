use std::fmt;

use crate::ast::{Selector, Token};

/// One step of a path: a bracketed list of selectors, applied either to
/// the children of each input node or to each node and all its descendants.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// `.name`, `.*` or `[selectors]`
    Child {
        token: Token,
        selectors: Vec<Selector>,
    },

    /// `..name`, `..*` or `..[selectors]`
    Recursive {
        token: Token,
        selectors: Vec<Selector>,
    },
}

impl Segment {
    pub fn selectors(&self) -> &[Selector] {
        match self {
            Segment::Child { selectors, .. } | Segment::Recursive { selectors, .. } => selectors,
        }
    }

    pub fn token(&self) -> &Token {
        match self {
            Segment::Child { token, .. } | Segment::Recursive { token, .. } => token,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selectors: Vec<String> = self.selectors().iter().map(|s| s.to_string()).collect();
        match self {
            Segment::Child { .. } => write!(f, "[{}]", selectors.join(", ")),
            Segment::Recursive { .. } => write!(f, "..[{}]", selectors.join(", ")),
        }
    }
}

/// A parsed JSONPath query.
///
/// Immutable once parsed. The same query can be evaluated any number of
/// times, from any number of threads.
///
/// `Display` renders the canonical form: every segment bracketed, names
/// single-quoted.
///
/// ```
/// let query = jsonpath_lang::parse("$.store.book[0]").unwrap();
/// assert_eq!(query.to_string(), "$['store']['book'][0]");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub segments: Vec<Segment>,
}

impl Query {
    pub fn new(segments: Vec<Segment>) -> Self {
        Query { segments }
    }

    /// True when the query can select at most one node: every segment is a
    /// child segment holding exactly one name or index selector.
    pub fn is_singular(&self) -> bool {
        self.segments.iter().all(|segment| match segment {
            Segment::Child { selectors, .. } => {
                selectors.len() == 1 && selectors[0].is_singular()
            }
            Segment::Recursive { .. } => false,
        })
    }

    /// Canonical form, same as `to_string()`.
    pub fn to_canonical_string(&self) -> String {
        self.to_string()
    }

    pub(crate) fn fmt_segments(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        self.fmt_segments(f)
    }
}
