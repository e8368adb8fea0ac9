use std::{fmt, sync::Arc};

/// The kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Identifiers
    /// Root identifier
    ///
    /// # Examples
    /// ```text
    /// $
    /// $.store
    /// ```
    Root,

    /// Current node identifier, only meaningful inside filters
    ///
    /// # Examples
    /// ```text
    /// $[?@.price < 10]
    /// ```
    Current,

    // Segments
    /// Child segment shorthand prefix
    ///
    /// Always immediately followed by a `Name` or `Wild` token.
    Dot,

    /// Descendant segment prefix
    ///
    /// # Examples
    /// ```text
    /// $..author
    /// $..*
    /// $..[0]
    /// ```
    DoubleDot,

    /// Member name written in shorthand notation (`.name`)
    ///
    /// The token value is the name itself, without the dot.
    Name,

    /// Wildcard selector (`*`)
    Wild,

    /// Filter selector prefix (`?`)
    Filter,

    // Literals
    /// Integer literal, possibly signed
    ///
    /// # Examples
    /// ```text
    /// 0
    /// 42
    /// -1
    /// ```
    Int,

    /// Number literal with a fraction or an exponent
    ///
    /// # Examples
    /// ```text
    /// 1.5
    /// -0.25
    /// 1e10
    /// ```
    Float,

    /// Quoted string literal, single or double quotes
    ///
    /// The token value holds the decoded string, escapes already resolved.
    String,

    /// `true`
    True,

    /// `false`
    False,

    /// `null`
    Null,

    /// Function extension name
    ///
    /// Only produced when the name is directly followed by `(`.
    ///
    /// # Examples
    /// ```text
    /// length(@.name)
    /// match(@.date, "1974-05-..")
    /// ```
    Function,

    // Logical operators
    /// `!`
    Not,
    /// `&&`
    And,
    /// `||`
    Or,

    // Comparison operators
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,

    // Delimiters
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `:`
    Colon,

    /// End of input
    Eof,

    /// Lexing failed at this position; the token value holds the reason.
    ///
    /// Always the last token a lexer produces.
    Error,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenType::Root => "'$'",
            TokenType::Current => "'@'",
            TokenType::Dot => "'.'",
            TokenType::DoubleDot => "'..'",
            TokenType::Name => "name",
            TokenType::Wild => "'*'",
            TokenType::Filter => "'?'",
            TokenType::Int => "integer",
            TokenType::Float => "float",
            TokenType::String => "string literal",
            TokenType::True => "'true'",
            TokenType::False => "'false'",
            TokenType::Null => "'null'",
            TokenType::Function => "function name",
            TokenType::Not => "'!'",
            TokenType::And => "'&&'",
            TokenType::Or => "'||'",
            TokenType::Eq => "'=='",
            TokenType::Ne => "'!='",
            TokenType::Lt => "'<'",
            TokenType::Le => "'<='",
            TokenType::Gt => "'>'",
            TokenType::Ge => "'>='",
            TokenType::LBracket => "'['",
            TokenType::RBracket => "']'",
            TokenType::LParen => "'('",
            TokenType::RParen => "')'",
            TokenType::Comma => "','",
            TokenType::Colon => "':'",
            TokenType::Eof => "end of query",
            TokenType::Error => "error",
        };
        f.write_str(s)
    }
}

/// A lexical token along with where it came from.
///
/// Tokens are kept in the AST so errors found after lexing can still point
/// at the offending part of the query.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenType,
    /// Source text, or the decoded value for string literals and the
    /// message for `Error` tokens.
    pub value: String,
    /// Byte offset into `query`.
    pub index: usize,
    pub query: Arc<str>,
}

impl Token {
    pub fn new(kind: TokenType, value: impl Into<String>, index: usize, query: Arc<str>) -> Self {
        Token {
            kind,
            value: value.into(),
            index,
            query,
        }
    }

    /// Render the query with a caret under this token's position.
    ///
    /// ```text
    /// $.foo[?@.bar =]
    ///              ^
    /// ```
    pub fn pointer(&self) -> String {
        let column = self.query[..self.index.min(self.query.len())].chars().count();
        format!("{}\n{}^", self.query, " ".repeat(column))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenType::Eof | TokenType::Error => write!(f, "{}", self.kind),
            TokenType::String => write!(f, "string literal {:?}", self.value),
            _ => write!(f, "'{}'", self.value),
        }
    }
}
