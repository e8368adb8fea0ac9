use std::mem;

use log::debug;
use thiserror::Error;

use crate::{
    ast::{
        BinaryOperator, Expression, ExpressionType, FunctionSignatures, Query, Segment, Selector,
        Token, TokenType,
    },
    functions::standard_signatures,
    lexer::{LexError, Lexer},
};

/// Largest magnitude allowed for index and slice values (2^53 - 1).
const MAX_INDEX: i64 = 9_007_199_254_740_991;

/// An integer literal the lexer could only represent as a float.
fn is_wide_integer(token: &Token) -> bool {
    token.kind == TokenType::Float && !token.value.contains(['.', 'e', 'E'])
}

/// Errors that can occur while turning a query string into a [`Query`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The query could not be tokenized
    #[error("lexer error: {0}")]
    Lexer(#[from] LexError),

    /// The tokens do not form a valid query
    #[error("syntax error: {message} at index {}:\n{}", .token.index, .token.pointer())]
    Syntax { message: String, token: Token },

    /// A function extension call is not well-typed
    #[error("type error: {message} at index {}:\n{}", .token.index, .token.pointer())]
    Type { message: String, token: Token },
}

impl ParseError {
    /// The token the error points at.
    pub fn token(&self) -> &Token {
        match self {
            ParseError::Lexer(e) => &e.token,
            ParseError::Syntax { token, .. } | ParseError::Type { token, .. } => token,
        }
    }

    fn syntax(message: impl Into<String>, token: &Token) -> Self {
        ParseError::Syntax {
            message: message.into(),
            token: token.clone(),
        }
    }

    fn type_error(message: impl Into<String>, token: &Token) -> Self {
        ParseError::Type {
            message: message.into(),
            token: token.clone(),
        }
    }
}

fn comparison_operator(kind: TokenType) -> Option<BinaryOperator> {
    match kind {
        TokenType::Eq => Some(BinaryOperator::Equal),
        TokenType::Ne => Some(BinaryOperator::NotEqual),
        TokenType::Lt => Some(BinaryOperator::LessThan),
        TokenType::Le => Some(BinaryOperator::LessEqual),
        TokenType::Gt => Some(BinaryOperator::GreaterThan),
        TokenType::Ge => Some(BinaryOperator::GreaterEqual),
        _ => None,
    }
}

/// Recursive descent parser for JSONPath queries.
///
/// Function extension calls are checked against `functions` as they are
/// parsed, so a query that parses is well-typed.
pub struct Parser<'f> {
    lexer: Lexer,
    current_token: Token,
    functions: &'f FunctionSignatures,
}

impl<'f> Parser<'f> {
    pub fn new(mut lexer: Lexer, functions: &'f FunctionSignatures) -> Result<Self, ParseError> {
        let current_token = lexer.next_token();
        if current_token.kind == TokenType::Error {
            return Err(LexError::new(current_token).into());
        }
        Ok(Parser {
            lexer,
            current_token,
            functions,
        })
    }

    /// Move to the next token, returning the one we were on.
    fn next(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.next_token();
        if next.kind == TokenType::Error {
            return Err(LexError::new(next).into());
        }
        Ok(mem::replace(&mut self.current_token, next))
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.next().map(|_| ())
    }

    fn expect(&mut self, expected: TokenType) -> Result<Token, ParseError> {
        if self.current_token.kind != expected {
            return Err(ParseError::syntax(
                format!("expected {}, found {}", expected, self.current_token),
                &self.current_token,
            ));
        }
        self.next()
    }

    fn check(&self, kind: TokenType) -> bool {
        self.current_token.kind == kind
    }

    fn unexpected(&self, context: &str) -> ParseError {
        ParseError::syntax(
            format!("unexpected {} {}", self.current_token, context),
            &self.current_token,
        )
    }

    /// Parse a complete query: `$` followed by segments, then end of input.
    pub fn parse_query(&mut self) -> Result<Query, ParseError> {
        if !self.check(TokenType::Root) {
            return Err(ParseError::syntax(
                format!("expected '$', found {}", self.current_token),
                &self.current_token,
            ));
        }
        self.advance()?;

        let segments = self.parse_segments()?;

        if !self.check(TokenType::Eof) {
            return Err(self.unexpected("after query"));
        }

        let query = Query::new(segments);
        debug!("parsed query {}", query);
        Ok(query)
    }

    fn parse_segments(&mut self) -> Result<Vec<Segment>, ParseError> {
        let mut segments = vec![];

        loop {
            match self.current_token.kind {
                TokenType::Dot => {
                    let token = self.next()?;
                    let selector = self.parse_shorthand_selector()?;
                    segments.push(Segment::Child {
                        token,
                        selectors: vec![selector],
                    });
                }
                TokenType::DoubleDot => {
                    let token = self.next()?;
                    let selectors = if self.check(TokenType::LBracket) {
                        self.parse_bracketed_selection()?
                    } else {
                        vec![self.parse_shorthand_selector()?]
                    };
                    segments.push(Segment::Recursive { token, selectors });
                }
                TokenType::LBracket => {
                    let token = self.current_token.clone();
                    let selectors = self.parse_bracketed_selection()?;
                    segments.push(Segment::Child { token, selectors });
                }
                _ => break,
            }
        }

        Ok(segments)
    }

    fn parse_shorthand_selector(&mut self) -> Result<Selector, ParseError> {
        match self.current_token.kind {
            TokenType::Name => {
                let token = self.next()?;
                Ok(Selector::Name {
                    name: token.value.clone(),
                    token,
                    shorthand: true,
                })
            }
            TokenType::Wild => {
                let token = self.next()?;
                Ok(Selector::Wildcard { token })
            }
            _ => Err(self.unexpected("after '.'")),
        }
    }

    fn parse_bracketed_selection(&mut self) -> Result<Vec<Selector>, ParseError> {
        self.expect(TokenType::LBracket)?;
        let mut selectors = vec![];

        loop {
            selectors.push(self.parse_selector()?);

            match self.current_token.kind {
                TokenType::Comma => self.advance()?,
                TokenType::RBracket => {
                    self.advance()?;
                    break;
                }
                _ => {
                    return Err(ParseError::syntax(
                        format!("expected ',' or ']', found {}", self.current_token),
                        &self.current_token,
                    ));
                }
            }
        }

        Ok(selectors)
    }

    fn parse_selector(&mut self) -> Result<Selector, ParseError> {
        match self.current_token.kind {
            TokenType::String => {
                let token = self.next()?;
                Ok(Selector::Name {
                    name: token.value.clone(),
                    token,
                    shorthand: false,
                })
            }
            TokenType::Wild => {
                let token = self.next()?;
                Ok(Selector::Wildcard { token })
            }
            TokenType::Int => {
                let token = self.next()?;
                let index = self.index_value(&token)?;
                if self.check(TokenType::Colon) {
                    self.parse_slice(token, Some(index))
                } else {
                    Ok(Selector::Index { token, index })
                }
            }
            TokenType::Colon => {
                let token = self.current_token.clone();
                self.parse_slice(token, None)
            }
            TokenType::Filter => self.parse_filter_selector(),
            TokenType::Float if is_wide_integer(&self.current_token) => Err(ParseError::syntax(
                format!("index {} is out of range", self.current_token.value),
                &self.current_token,
            )),
            TokenType::RBracket => Err(ParseError::syntax(
                "empty bracketed selection",
                &self.current_token,
            )),
            _ => Err(self.unexpected("in bracketed selection")),
        }
    }

    fn index_value(&self, token: &Token) -> Result<i64, ParseError> {
        if token.value == "-0" {
            return Err(ParseError::syntax("negative zero is not a valid index", token));
        }
        let value: i64 = token
            .value
            .parse()
            .map_err(|_| ParseError::syntax("invalid integer", token))?;
        if !(-MAX_INDEX..=MAX_INDEX).contains(&value) {
            return Err(ParseError::syntax(
                format!("index {} is out of range", value),
                token,
            ));
        }
        Ok(value)
    }

    fn parse_optional_slice_value(&mut self) -> Result<Option<i64>, ParseError> {
        if self.check(TokenType::Int) {
            let token = self.next()?;
            Ok(Some(self.index_value(&token)?))
        } else if self.check(TokenType::Float) && is_wide_integer(&self.current_token) {
            Err(ParseError::syntax(
                format!("slice value {} is out of range", self.current_token.value),
                &self.current_token,
            ))
        } else {
            Ok(None)
        }
    }

    /// Parse the rest of a slice; the current token is the first `:`.
    fn parse_slice(&mut self, token: Token, start: Option<i64>) -> Result<Selector, ParseError> {
        self.expect(TokenType::Colon)?;
        let stop = self.parse_optional_slice_value()?;
        let step = if self.check(TokenType::Colon) {
            self.advance()?;
            self.parse_optional_slice_value()?
        } else {
            None
        };

        Ok(Selector::Slice {
            token,
            start,
            stop,
            step,
        })
    }

    fn parse_filter_selector(&mut self) -> Result<Selector, ParseError> {
        let token = self.next()?; // consume '?'
        let expression = self.parse_logical_or()?;
        self.check_test_expression(&expression)?;

        Ok(Selector::Filter {
            token,
            expression: Box::new(expression),
        })
    }

    fn parse_logical_or(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_logical_and()?;

        while self.check(TokenType::Or) {
            let token = self.next()?;
            let right = self.parse_logical_and()?;
            self.check_test_expression(&left)?;
            self.check_test_expression(&right)?;

            left = Expression::Infix {
                token,
                left: Box::new(left),
                op: BinaryOperator::Or,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_logical_and(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_comparison()?;

        while self.check(TokenType::And) {
            let token = self.next()?;
            let right = self.parse_comparison()?;
            self.check_test_expression(&left)?;
            self.check_test_expression(&right)?;

            left = Expression::Infix {
                token,
                left: Box::new(left),
                op: BinaryOperator::And,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expression, ParseError> {
        let left = self.parse_unary()?;

        let Some(op) = comparison_operator(self.current_token.kind) else {
            return Ok(left);
        };
        let token = self.next()?;
        self.check_comparable(&left)?;

        let right = self.parse_unary()?;
        self.check_comparable(&right)?;

        if comparison_operator(self.current_token.kind).is_some() {
            return Err(ParseError::syntax(
                "comparison operators are non-associative, use '&&' or '||' to chain them",
                &self.current_token,
            ));
        }

        Ok(Expression::Infix {
            token,
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        if self.check(TokenType::Not) {
            let token = self.next()?;
            let expression = self.parse_unary()?;
            self.check_test_expression(&expression)?;
            return Ok(Expression::LogicalNot {
                token,
                expression: Box::new(expression),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        match self.current_token.kind {
            // Literals
            TokenType::Null => {
                let token = self.next()?;
                Ok(Expression::Null { token })
            }
            TokenType::True | TokenType::False => {
                let token = self.next()?;
                let value = token.kind == TokenType::True;
                Ok(Expression::Boolean { token, value })
            }
            TokenType::Int => {
                let token = self.next()?;
                let value = token
                    .value
                    .parse::<i64>()
                    .map_err(|_| ParseError::syntax("invalid integer", &token))?;
                Ok(Expression::Integer { token, value })
            }
            TokenType::Float => {
                let token = self.next()?;
                let value = token
                    .value
                    .parse::<f64>()
                    .map_err(|_| ParseError::syntax("invalid number", &token))?;
                Ok(Expression::Float { token, value })
            }
            TokenType::String => {
                let token = self.next()?;
                let value = token.value.clone();
                Ok(Expression::String { token, value })
            }

            // Embedded queries
            TokenType::Root => {
                let token = self.next()?;
                let segments = self.parse_segments()?;
                Ok(Expression::RootQuery {
                    token,
                    query: Box::new(Query::new(segments)),
                })
            }
            TokenType::Current => {
                let token = self.next()?;
                let segments = self.parse_segments()?;
                Ok(Expression::RelativeQuery {
                    token,
                    query: Box::new(Query::new(segments)),
                })
            }

            TokenType::Function => self.parse_function_call(),

            TokenType::LParen => {
                self.advance()?;
                let expr = self.parse_logical_or()?;
                self.expect(TokenType::RParen)?;
                Ok(expr)
            }

            _ => Err(self.unexpected("in filter expression")),
        }
    }

    fn parse_function_call(&mut self) -> Result<Expression, ParseError> {
        let token = self.next()?;
        let name = token.value.clone();
        self.expect(TokenType::LParen)?;

        let mut args = vec![];
        if !self.check(TokenType::RParen) {
            loop {
                args.push(self.parse_logical_or()?);
                if self.check(TokenType::Comma) {
                    self.advance()?;
                } else {
                    break;
                }
            }
        }
        self.expect(TokenType::RParen)?;

        self.check_function_call(&token, &name, &args)?;
        Ok(Expression::FunctionCall { token, name, args })
    }

    // ========================================
    // Well-typedness
    // ========================================

    fn result_type(&self, name: &str) -> Option<ExpressionType> {
        self.functions.get(name).map(|signature| signature.result)
    }

    /// Operands of `&&`, `||`, `!` and the filter selector itself.
    fn check_test_expression(&self, expr: &Expression) -> Result<(), ParseError> {
        match expr {
            e if e.is_literal() => Err(ParseError::syntax(
                "filter expression literals must be compared",
                e.token(),
            )),
            Expression::FunctionCall { token, name, .. } => match self.result_type(name) {
                Some(ExpressionType::Value) => Err(ParseError::type_error(
                    format!("result of {}() must be compared", name),
                    token,
                )),
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }

    /// Operands of comparison operators.
    fn check_comparable(&self, expr: &Expression) -> Result<(), ParseError> {
        match expr {
            e if e.is_literal() => Ok(()),
            Expression::RelativeQuery { token, query } | Expression::RootQuery { token, query } => {
                if query.is_singular() {
                    Ok(())
                } else {
                    Err(ParseError::type_error(
                        "non-singular query is not comparable",
                        token,
                    ))
                }
            }
            Expression::FunctionCall { token, name, .. } => match self.result_type(name) {
                Some(ExpressionType::Value) => Ok(()),
                _ => Err(ParseError::type_error(
                    format!("result of {}() is not comparable", name),
                    token,
                )),
            },
            e => Err(ParseError::syntax(
                "logical expressions are not comparable",
                e.token(),
            )),
        }
    }

    fn check_function_call(
        &self,
        token: &Token,
        name: &str,
        args: &[Expression],
    ) -> Result<(), ParseError> {
        let signature = self
            .functions
            .get(name)
            .ok_or_else(|| ParseError::type_error(format!("unknown function '{}'", name), token))?;

        if args.len() != signature.args.len() {
            return Err(ParseError::type_error(
                format!(
                    "{}() takes {} argument{} but {} were given",
                    name,
                    signature.args.len(),
                    if signature.args.len() == 1 { "" } else { "s" },
                    args.len()
                ),
                token,
            ));
        }

        for (position, (arg, param)) in args.iter().zip(&signature.args).enumerate() {
            let well_typed = match param {
                ExpressionType::Value => match arg {
                    e if e.is_literal() => true,
                    Expression::RelativeQuery { query, .. } | Expression::RootQuery { query, .. } => {
                        query.is_singular()
                    }
                    Expression::FunctionCall { name, .. } => {
                        self.result_type(name) == Some(ExpressionType::Value)
                    }
                    _ => false,
                },
                ExpressionType::Logical => match arg {
                    e if e.is_literal() => false,
                    Expression::FunctionCall { name, .. } => matches!(
                        self.result_type(name),
                        Some(ExpressionType::Logical | ExpressionType::Nodes)
                    ),
                    _ => true,
                },
                ExpressionType::Nodes => match arg {
                    Expression::RelativeQuery { .. } | Expression::RootQuery { .. } => true,
                    Expression::FunctionCall { name, .. } => {
                        self.result_type(name) == Some(ExpressionType::Nodes)
                    }
                    _ => false,
                },
            };

            if !well_typed {
                return Err(ParseError::type_error(
                    format!("argument {} of {}() must be of {}", position + 1, name, param),
                    arg.token(),
                ));
            }
        }

        Ok(())
    }
}

/// Parse a query, allowing calls to the standard function extensions.
///
/// ```
/// let query = jsonpath_lang::parse("$..book[?@.price < 10]").unwrap();
/// assert!(!query.is_singular());
/// ```
pub fn parse(query: &str) -> Result<Query, ParseError> {
    parse_with_functions(query, &standard_signatures())
}

/// Parse a query against a caller-supplied set of function signatures.
pub fn parse_with_functions(
    query: &str,
    functions: &FunctionSignatures,
) -> Result<Query, ParseError> {
    Parser::new(Lexer::new(query), functions)?.parse_query()
}
