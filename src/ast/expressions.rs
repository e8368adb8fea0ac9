use std::fmt;

use crate::ast::{BinaryOperator, Query, Token};

/// Filter expression node.
///
/// Every variant keeps the token it was parsed from so that type errors and
/// evaluation errors can point back into the query.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    // Literals
    /// `null`
    Null { token: Token },

    /// `true` or `false`
    Boolean { token: Token, value: bool },

    /// Integer literal
    ///
    /// # Example
    /// ```text
    /// $[?@.count > 42]
    /// ```
    Integer { token: Token, value: i64 },

    /// Number literal with a fraction or exponent
    Float { token: Token, value: f64 },

    /// String literal, escapes decoded
    ///
    /// # Example
    /// ```text
    /// $[?@.status == 'active']
    /// ```
    String { token: Token, value: String },

    // Compound
    /// Logical negation (`!`)
    LogicalNot {
        token: Token,
        expression: Box<Expression>,
    },

    /// Logical or comparison operation
    Infix {
        token: Token,
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },

    /// Query rooted at the current node (`@`)
    ///
    /// # Example
    /// ```text
    /// $[?@.isbn]
    /// ```
    RelativeQuery { token: Token, query: Box<Query> },

    /// Query rooted at the document root (`$`)
    ///
    /// # Example
    /// ```text
    /// $.items[?@.price < $.limit]
    /// ```
    RootQuery { token: Token, query: Box<Query> },

    /// Function extension call
    ///
    /// # Example
    /// ```text
    /// $[?length(@.tags) > 2]
    /// ```
    FunctionCall {
        token: Token,
        name: String,
        args: Vec<Expression>,
    },
}

impl Expression {
    pub fn token(&self) -> &Token {
        match self {
            Expression::Null { token }
            | Expression::Boolean { token, .. }
            | Expression::Integer { token, .. }
            | Expression::Float { token, .. }
            | Expression::String { token, .. }
            | Expression::LogicalNot { token, .. }
            | Expression::Infix { token, .. }
            | Expression::RelativeQuery { token, .. }
            | Expression::RootQuery { token, .. }
            | Expression::FunctionCall { token, .. } => token,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Expression::Null { .. }
                | Expression::Boolean { .. }
                | Expression::Integer { .. }
                | Expression::Float { .. }
                | Expression::String { .. }
        )
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Null { .. } => f.write_str("null"),
            Expression::Boolean { value, .. } => write!(f, "{}", value),
            Expression::Integer { value, .. } => write!(f, "{}", value),
            // Debug keeps a fraction or exponent, so the literal re-lexes as a float
            Expression::Float { value, .. } => write!(f, "{:?}", value),
            Expression::String { value, .. } => write!(f, "\"{}\"", escape_string(value, '"')),
            Expression::LogicalNot { expression, .. } => match expression.as_ref() {
                Expression::Infix { op, .. } if op.is_comparison() => {
                    write!(f, "!({})", expression)
                }
                _ => write!(f, "!{}", expression),
            },
            Expression::Infix { left, op, right, .. } => {
                if op.is_logical() {
                    write!(f, "({} {} {})", left, op, right)
                } else {
                    write!(f, "{} {} {}", left, op, right)
                }
            }
            Expression::RelativeQuery { query, .. } => {
                f.write_str("@")?;
                query.fmt_segments(f)
            }
            Expression::RootQuery { query, .. } => write!(f, "{}", query),
            Expression::FunctionCall { name, args, .. } => {
                let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", name, args.join(", "))
            }
        }
    }
}

/// Escape a string for output between `quote` characters.
pub(crate) fn escape_string(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
