use std::sync::Arc;

use thiserror::Error;

use crate::ast::{Token, TokenType};

/// A query could not be tokenized.
///
/// Built from the terminal `Error` token a [`Lexer`] produces.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} at index {}:\n{}", .token.index, .token.pointer())]
pub struct LexError {
    pub message: String,
    pub token: Token,
}

impl LexError {
    pub fn new(token: Token) -> Self {
        LexError {
            message: token.value.clone(),
            token,
        }
    }

    /// Byte offset of the offending character.
    pub fn index(&self) -> usize {
        self.token.index
    }
}

/// Space, tab, line feed and carriage return; nothing else counts as blank.
fn is_blank(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

fn is_name_first(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || !ch.is_ascii()
}

fn is_name_char(ch: char) -> bool {
    is_name_first(ch) || ch.is_ascii_digit()
}

fn is_function_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Converts a query string into tokens, one at a time.
///
/// Lexing stops at the first problem: the lexer yields a single `Error`
/// token and only `Eof` after that.
pub struct Lexer {
    query: Arc<str>,
    input: Vec<(usize, char)>,
    position: usize,
    after_dot: bool,
    done: bool,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            query: Arc::from(input),
            input: input.char_indices().collect(),
            position: 0,
            after_dot: false,
            done: false,
        }
    }

    /// The full query being tokenized.
    pub fn query(&self) -> &Arc<str> {
        &self.query
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).map(|(_, c)| *c)
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).map(|(_, c)| *c)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// Byte offset of the current position.
    fn offset(&self) -> usize {
        self.input
            .get(self.position)
            .map(|(i, _)| *i)
            .unwrap_or(self.query.len())
    }

    fn token(&self, kind: TokenType, value: impl Into<String>, index: usize) -> Token {
        Token::new(kind, value, index, Arc::clone(&self.query))
    }

    fn error(&mut self, message: impl Into<String>, index: usize) -> Token {
        self.done = true;
        self.token(TokenType::Error, message, index)
    }

    /// Consume a fixed-width token.
    fn simple(&mut self, kind: TokenType, width: usize) -> Token {
        let start = self.offset();
        let value: String = self.input[self.position..self.position + width]
            .iter()
            .map(|(_, c)| *c)
            .collect();
        self.position += width;
        self.token(kind, value, start)
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.position;
        while self.current_char().is_some_and(is_blank) {
            self.advance();
        }
        self.position > start
    }

    fn read_name(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if is_name_char(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_hex4(&mut self) -> Result<u32, (String, usize)> {
        let start = self.offset();
        let mut code = 0u32;
        for _ in 0..4 {
            match self.current_char().and_then(|c| c.to_digit(16)) {
                Some(d) => {
                    code = code * 16 + d;
                    self.advance();
                }
                None => {
                    return Err(("invalid \\u escape, expected four hex digits".into(), start));
                }
            }
        }
        Ok(code)
    }

    /// Decode a `\uXXXX` escape, the backslash and `u` already consumed.
    fn read_unicode_escape(&mut self, escape_start: usize) -> Result<char, (String, usize)> {
        let code = self.read_hex4()?;
        let code = match code {
            0xD800..=0xDBFF => {
                if self.current_char() != Some('\\') || self.peek_char(1) != Some('u') {
                    return Err(("unpaired high surrogate in \\u escape".into(), escape_start));
                }
                self.advance();
                self.advance();
                let low = self.read_hex4()?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(("invalid low surrogate in \\u escape".into(), escape_start));
                }
                0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => {
                return Err(("unpaired low surrogate in \\u escape".into(), escape_start));
            }
            code => code,
        };
        char::from_u32(code).ok_or_else(|| ("invalid \\u escape".to_string(), escape_start))
    }

    fn read_string(&mut self, quote: char) -> Result<String, (String, usize)> {
        let start = self.offset();
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    let escape_start = self.offset();
                    self.advance(); // Consume backslash
                    match self.current_char() {
                        Some('b') => result.push('\u{8}'),
                        Some('f') => result.push('\u{c}'),
                        Some('n') => result.push('\n'),
                        Some('r') => result.push('\r'),
                        Some('t') => result.push('\t'),
                        Some('/') => result.push('/'),
                        Some('\\') => result.push('\\'),
                        Some(c) if c == quote => result.push(c),
                        Some('u') => {
                            self.advance();
                            result.push(self.read_unicode_escape(escape_start)?);
                            continue;
                        }
                        Some(c) => {
                            return Err((format!("invalid escape sequence '\\{}'", c), escape_start));
                        }
                        None => break,
                    }
                    self.advance();
                }
                c if (c as u32) < 0x20 => {
                    return Err((
                        format!("invalid control character U+{:04X} in string literal", c as u32),
                        self.offset(),
                    ));
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(("unterminated string literal".into(), start))
    }

    fn read_digits(&mut self, number: &mut String) -> usize {
        let mut count = 0;
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    fn read_number(&mut self) -> Token {
        let start = self.offset();
        let mut number = String::new();
        let mut is_float = false;

        if self.current_char() == Some('-') {
            number.push('-');
            self.advance();
            if !self.current_char().is_some_and(|c| c.is_ascii_digit()) {
                let index = self.offset();
                return self.error("expected a digit after '-'", index);
            }
        }

        if self.current_char() == Some('0') {
            number.push('0');
            self.advance();
            if self.current_char().is_some_and(|c| c.is_ascii_digit()) {
                return self.error("leading zeros are not allowed in numbers", start);
            }
        } else {
            self.read_digits(&mut number);
        }

        if self.current_char() == Some('.') {
            number.push('.');
            self.advance();
            if self.read_digits(&mut number) == 0 {
                let index = self.offset();
                return self.error("expected a digit after the decimal point", index);
            }
            is_float = true;
        }

        if let Some(e @ ('e' | 'E')) = self.current_char() {
            number.push(e);
            self.advance();
            if let Some(sign @ ('+' | '-')) = self.current_char() {
                number.push(sign);
                self.advance();
            }
            if self.read_digits(&mut number) == 0 {
                let index = self.offset();
                return self.error("expected a digit in exponent", index);
            }
            is_float = true;
        }

        if is_float {
            match number.parse::<f64>() {
                Ok(n) if n.is_finite() => self.token(TokenType::Float, number, start),
                _ => self.error(format!("number out of range '{}'", number), start),
            }
        } else if number.parse::<i64>().is_ok() {
            self.token(TokenType::Int, number, start)
        } else if number.parse::<f64>().is_ok_and(f64::is_finite) {
            // Too wide for an index, but still a number literal.
            self.token(TokenType::Float, number, start)
        } else {
            self.error(format!("number out of range '{}'", number), start)
        }
    }

    fn read_dots(&mut self) -> Token {
        let start = self.offset();
        if self.peek_char(1) == Some('.') {
            self.position += 2;
            match self.current_char() {
                Some(c) if c == '*' || is_name_first(c) => self.after_dot = true,
                Some('[') => {}
                _ => {
                    let index = self.offset();
                    return self.error("expected a name, '*' or '[' after '..'", index);
                }
            }
            self.token(TokenType::DoubleDot, "..", start)
        } else {
            self.advance();
            match self.current_char() {
                Some(c) if c == '*' || is_name_first(c) => self.after_dot = true,
                _ => {
                    let index = self.offset();
                    return self.error("expected a name or '*' after '.'", index);
                }
            }
            self.token(TokenType::Dot, ".", start)
        }
    }

    pub fn next_token(&mut self) -> Token {
        if self.done {
            return self.token(TokenType::Eof, "", self.query.len());
        }

        if self.after_dot {
            // `.` and `..` have already checked what follows
            self.after_dot = false;
            let start = self.offset();
            if self.current_char() == Some('*') {
                return self.simple(TokenType::Wild, 1);
            }
            let name = self.read_name();
            return self.token(TokenType::Name, name, start);
        }

        let whitespace_start = self.offset();
        if self.skip_whitespace() {
            if whitespace_start == 0 {
                return self.error("unexpected leading whitespace", 0);
            }
            if self.current_char().is_none() {
                return self.error("unexpected trailing whitespace", whitespace_start);
            }
        }

        let start = self.offset();
        match self.current_char() {
            None => {
                self.done = true;
                self.token(TokenType::Eof, "", start)
            }
            Some('$') => self.simple(TokenType::Root, 1),
            Some('@') => self.simple(TokenType::Current, 1),
            Some('.') => self.read_dots(),
            Some('*') => self.simple(TokenType::Wild, 1),
            Some('?') => self.simple(TokenType::Filter, 1),
            Some('[') => self.simple(TokenType::LBracket, 1),
            Some(']') => self.simple(TokenType::RBracket, 1),
            Some('(') => self.simple(TokenType::LParen, 1),
            Some(')') => self.simple(TokenType::RParen, 1),
            Some(',') => self.simple(TokenType::Comma, 1),
            Some(':') => self.simple(TokenType::Colon, 1),
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.simple(TokenType::Ne, 2)
                } else {
                    self.simple(TokenType::Not, 1)
                }
            }
            Some('=') => {
                if self.peek_char(1) == Some('=') {
                    self.simple(TokenType::Eq, 2)
                } else {
                    self.error("unexpected '=' (did you mean '=='?)", start)
                }
            }
            Some('<') => {
                if self.peek_char(1) == Some('=') {
                    self.simple(TokenType::Le, 2)
                } else {
                    self.simple(TokenType::Lt, 1)
                }
            }
            Some('>') => {
                if self.peek_char(1) == Some('=') {
                    self.simple(TokenType::Ge, 2)
                } else {
                    self.simple(TokenType::Gt, 1)
                }
            }
            Some('&') => {
                if self.peek_char(1) == Some('&') {
                    self.simple(TokenType::And, 2)
                } else {
                    self.error("unexpected '&' (did you mean '&&'?)", start)
                }
            }
            Some('|') => {
                if self.peek_char(1) == Some('|') {
                    self.simple(TokenType::Or, 2)
                } else {
                    self.error("unexpected '|' (did you mean '||'?)", start)
                }
            }
            Some(quote @ ('"' | '\'')) => match self.read_string(quote) {
                Ok(s) => self.token(TokenType::String, s, start),
                Err((message, index)) => self.error(message, index),
            },
            Some(ch) if ch == '-' || ch.is_ascii_digit() => self.read_number(),
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();
                let is_call = self.current_char() == Some('(');

                match ident.as_str() {
                    "true" if !is_call => self.token(TokenType::True, "true", start),
                    "false" if !is_call => self.token(TokenType::False, "false", start),
                    "null" if !is_call => self.token(TokenType::Null, "null", start),
                    _ if is_call && is_function_name(&ident) => {
                        self.token(TokenType::Function, ident.clone(), start)
                    }
                    _ if is_call => {
                        self.error(format!("invalid function name '{}'", ident), start)
                    }
                    _ => self.error(format!("unexpected name '{}'", ident), start),
                }
            }
            Some(ch) => self.error(format!("unexpected character '{}'", ch), start),
        }
    }
}

/// Tokenize a whole query.
///
/// The returned tokens always end with exactly one `Eof` or `Error` token.
pub fn tokenize(query: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(query);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let last = matches!(token.kind, TokenType::Eof | TokenType::Error);
        tokens.push(token);
        if last {
            return tokens;
        }
    }
}

#[test]
fn test_keywords() {
    let kinds: Vec<TokenType> = tokenize("[?true && false || null]")
        .into_iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenType::LBracket,
            TokenType::Filter,
            TokenType::True,
            TokenType::And,
            TokenType::False,
            TokenType::Or,
            TokenType::Null,
            TokenType::RBracket,
            TokenType::Eof,
        ]
    );
}

#[test]
fn test_shorthand_keywords_are_names() {
    let tokens = tokenize("$.true");
    assert_eq!(tokens[1].kind, TokenType::Dot);
    assert_eq!(tokens[2].kind, TokenType::Name);
    assert_eq!(tokens[2].value, "true");
}

#[test]
fn test_error_halts_lexing() {
    let mut lexer = Lexer::new("$[#]");
    assert_eq!(lexer.next_token().kind, TokenType::Root);
    assert_eq!(lexer.next_token().kind, TokenType::LBracket);
    let error = lexer.next_token();
    assert_eq!(error.kind, TokenType::Error);
    assert_eq!(error.index, 2);
    assert_eq!(lexer.next_token().kind, TokenType::Eof);
}
