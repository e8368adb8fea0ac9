use jsonpath_lang::{LexError, Lexer, Token, TokenType, tokenize};

fn kinds(query: &str) -> Vec<TokenType> {
    tokenize(query).into_iter().map(|t| t.kind).collect()
}

fn last(query: &str) -> Token {
    tokenize(query).pop().unwrap()
}

// ============================================================================
// Segments
// ============================================================================

#[test]
fn test_root_only() {
    assert_eq!(kinds("$"), vec![TokenType::Root, TokenType::Eof]);
}

#[test]
fn test_shorthand_names() {
    let tokens = tokenize("$.store.book");
    assert_eq!(
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
        vec![
            TokenType::Root,
            TokenType::Dot,
            TokenType::Name,
            TokenType::Dot,
            TokenType::Name,
            TokenType::Eof,
        ]
    );
    assert_eq!(tokens[2].value, "store");
    assert_eq!(tokens[4].value, "book");
}

#[test]
fn test_token_indices_are_byte_offsets() {
    let tokens = tokenize("$.ä.b");
    assert_eq!(tokens[2].value, "ä");
    assert_eq!(tokens[2].index, 2);
    assert_eq!(tokens[3].index, 4);
    assert_eq!(tokens[4].index, 5);
}

#[test]
fn test_descendant_segments() {
    assert_eq!(
        kinds("$..a..*..[0]"),
        vec![
            TokenType::Root,
            TokenType::DoubleDot,
            TokenType::Name,
            TokenType::DoubleDot,
            TokenType::Wild,
            TokenType::DoubleDot,
            TokenType::LBracket,
            TokenType::Int,
            TokenType::RBracket,
            TokenType::Eof,
        ]
    );
}

#[test]
fn test_bracketed_selectors() {
    assert_eq!(
        kinds("$['a', 1, *, 1:-1:2]"),
        vec![
            TokenType::Root,
            TokenType::LBracket,
            TokenType::String,
            TokenType::Comma,
            TokenType::Int,
            TokenType::Comma,
            TokenType::Wild,
            TokenType::Comma,
            TokenType::Int,
            TokenType::Colon,
            TokenType::Int,
            TokenType::Colon,
            TokenType::Int,
            TokenType::RBracket,
            TokenType::Eof,
        ]
    );
}

#[test]
fn test_blank_space_between_segments() {
    assert_eq!(
        kinds("$ .a\t['b']"),
        vec![
            TokenType::Root,
            TokenType::Dot,
            TokenType::Name,
            TokenType::LBracket,
            TokenType::String,
            TokenType::RBracket,
            TokenType::Eof,
        ]
    );
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn test_filter_operators() {
    assert_eq!(
        kinds("$[?@.a == 1 && @.b != 2 || !(@.c < 3) && @.d <= 4 && @.e > 5 && @.f >= 6]")
            .into_iter()
            .filter(|k| !matches!(k, TokenType::Current | TokenType::Dot | TokenType::Name | TokenType::Int))
            .collect::<Vec<_>>(),
        vec![
            TokenType::Root,
            TokenType::LBracket,
            TokenType::Filter,
            TokenType::Eq,
            TokenType::And,
            TokenType::Ne,
            TokenType::Or,
            TokenType::Not,
            TokenType::LParen,
            TokenType::Lt,
            TokenType::RParen,
            TokenType::And,
            TokenType::Le,
            TokenType::And,
            TokenType::Gt,
            TokenType::And,
            TokenType::Ge,
            TokenType::RBracket,
            TokenType::Eof,
        ]
    );
}

#[test]
fn test_function_names() {
    let tokens = tokenize("$[?length(@.a) > 1]");
    assert_eq!(tokens[3].kind, TokenType::Function);
    assert_eq!(tokens[3].value, "length");
    assert_eq!(tokens[4].kind, TokenType::LParen);
}

#[test]
fn test_keyword_before_paren_is_function() {
    let tokens = tokenize("$[?true(@)]");
    assert_eq!(tokens[3].kind, TokenType::Function);
    assert_eq!(tokens[3].value, "true");
}

#[test]
fn test_uppercase_function_name_is_error() {
    let token = last("$[?Length(@.a)]");
    assert_eq!(token.kind, TokenType::Error);
    assert_eq!(token.index, 3);
}

#[test]
fn test_bare_name_in_filter_is_error() {
    let token = last("$[?foo == 1]");
    assert_eq!(token.kind, TokenType::Error);
    assert!(token.value.contains("foo"));
}

#[test]
fn test_single_equals_is_error() {
    let token = last("$[?@.a = 1]");
    assert_eq!(token.kind, TokenType::Error);
    assert_eq!(token.index, 7);
}

#[test]
fn test_single_ampersand_and_pipe_are_errors() {
    assert_eq!(last("$[?@.a & @.b]").kind, TokenType::Error);
    assert_eq!(last("$[?@.a | @.b]").kind, TokenType::Error);
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_integers() {
    let tokens = tokenize("$[0, -1, 42]");
    assert_eq!(tokens[2].kind, TokenType::Int);
    assert_eq!(tokens[2].value, "0");
    assert_eq!(tokens[4].kind, TokenType::Int);
    assert_eq!(tokens[4].value, "-1");
    assert_eq!(tokens[6].value, "42");
}

#[test]
fn test_floats() {
    let tokens = tokenize("$[?@.a == 1.5 || @.a == 1e3 || @.a == -2.5E-2]");
    let floats: Vec<&str> = tokens
        .iter()
        .filter(|t| t.kind == TokenType::Float)
        .map(|t| t.value.as_str())
        .collect();
    assert_eq!(floats, vec!["1.5", "1e3", "-2.5E-2"]);
}

#[test]
fn test_leading_zero_is_error() {
    let token = last("$[01]");
    assert_eq!(token.kind, TokenType::Error);
    assert_eq!(token.index, 2);
}

#[test]
fn test_minus_without_digit_is_error() {
    assert_eq!(last("$[-]").kind, TokenType::Error);
}

#[test]
fn test_missing_fraction_digits_is_error() {
    assert_eq!(last("$[?@.a == 1.]").kind, TokenType::Error);
}

#[test]
fn test_wide_integer_is_float() {
    let tokens = tokenize("$[?@.a == 100000000000000000000]");
    assert_eq!(tokens[6].kind, TokenType::Float);
    assert_eq!(tokens[6].value, "100000000000000000000");
}

#[test]
fn test_infinite_number_is_error() {
    let digits = "9".repeat(400);
    let token = last(&format!("$[?@.a == {}]", digits));
    assert_eq!(token.kind, TokenType::Error);
    assert_eq!(token.index, 10);
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_single_and_double_quotes() {
    let tokens = tokenize(r#"$['a', "b"]"#);
    assert_eq!(tokens[2].kind, TokenType::String);
    assert_eq!(tokens[2].value, "a");
    assert_eq!(tokens[4].kind, TokenType::String);
    assert_eq!(tokens[4].value, "b");
}

#[test]
fn test_string_escapes() {
    let tokens = tokenize(r#"$['a\'b\n\t\\\/é']"#);
    assert_eq!(tokens[2].value, "a'b\n\t\\/é");
}

#[test]
fn test_double_quote_in_single_quoted_string() {
    let tokens = tokenize(r#"$['say "hi"']"#);
    assert_eq!(tokens[2].value, "say \"hi\"");
}

#[test]
fn test_surrogate_pair() {
    let tokens = tokenize(r"$['\uD834\uDD1E']");
    assert_eq!(tokens[2].value, "𝄞");
}

#[test]
fn test_lone_surrogate_is_error() {
    assert_eq!(last(r"$['\uD834']").kind, TokenType::Error);
    assert_eq!(last(r"$['\uDD1E']").kind, TokenType::Error);
}

#[test]
fn test_invalid_escape_is_error() {
    let token = last(r"$['\q']");
    assert_eq!(token.kind, TokenType::Error);
    assert_eq!(token.index, 3);
}

#[test]
fn test_escaped_other_quote_is_error() {
    assert_eq!(last(r#"$["\'"]"#).kind, TokenType::Error);
}

#[test]
fn test_control_character_is_error() {
    assert_eq!(last("$['a\nb']").kind, TokenType::Error);
}

#[test]
fn test_unterminated_string() {
    let token = last("$['abc");
    assert_eq!(token.kind, TokenType::Error);
    assert_eq!(token.index, 2);
    assert!(token.value.contains("unterminated"));
}

// ============================================================================
// Whitespace and dots
// ============================================================================

#[test]
fn test_leading_whitespace_is_error() {
    let token = last(" $");
    assert_eq!(token.kind, TokenType::Error);
    assert_eq!(token.index, 0);
}

#[test]
fn test_trailing_whitespace_is_error() {
    let token = last("$.a ");
    assert_eq!(token.kind, TokenType::Error);
    assert_eq!(token.index, 3);
}

#[test]
fn test_whitespace_after_dot_is_error() {
    let token = last("$. a");
    assert_eq!(token.kind, TokenType::Error);
    assert_eq!(token.index, 2);
}

#[test]
fn test_digit_after_dot_is_error() {
    assert_eq!(last("$.1").kind, TokenType::Error);
}

#[test]
fn test_triple_dot_is_error() {
    assert_eq!(last("$...a").kind, TokenType::Error);
}

#[test]
fn test_unknown_character() {
    let token = last("$[#]");
    assert_eq!(token.kind, TokenType::Error);
    assert!(token.value.contains('#'));
}

#[test]
fn test_lexer_yields_eof_after_end() {
    let mut lexer = Lexer::new("$");
    assert_eq!(lexer.next_token().kind, TokenType::Root);
    assert_eq!(lexer.next_token().kind, TokenType::Eof);
    assert_eq!(lexer.next_token().kind, TokenType::Eof);
}

#[test]
fn test_lexer_keeps_query() {
    let lexer = Lexer::new("$.a");
    assert_eq!(&**lexer.query(), "$.a");
}

#[test]
fn test_lex_error_index() {
    let error = LexError::new(last("$[?@.a = 1]"));
    assert_eq!(error.index(), 7);
    assert!(error.to_string().contains("at index 7"));
}

#[test]
fn test_token_pointer() {
    let token = last("$.a ");
    assert_eq!(token.pointer(), "$.a \n   ^");
}
