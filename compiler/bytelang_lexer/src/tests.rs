#![allow(clippy::unwrap_used)]

use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).unwrap().kinds()
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Ident(name.to_string())
}

#[test]
fn test_const_directive() {
    assert_eq!(
        kinds(".const N = 4\n"),
        vec![
            TokenKind::Directive("const".into()),
            ident("N"),
            TokenKind::Eq,
            TokenKind::Int(4),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_struct_and_types() {
    assert_eq!(
        kinds(".struct P { x: f32, y: *[4]u8 }"),
        vec![
            TokenKind::Directive("struct".into()),
            ident("P"),
            TokenKind::LBrace,
            ident("x"),
            TokenKind::Colon,
            ident("f32"),
            TokenKind::Comma,
            ident("y"),
            TokenKind::Colon,
            TokenKind::Star,
            TokenKind::LBracket,
            TokenKind::Int(4),
            TokenKind::RBracket,
            ident("u8"),
            TokenKind::RBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_macro_definition_and_call() {
    assert_eq!(
        kinds(".macro add(a, b) -> a + b\n@add(2, 3)"),
        vec![
            TokenKind::Directive("macro".into()),
            ident("add"),
            TokenKind::LParen,
            ident("a"),
            TokenKind::Comma,
            ident("b"),
            TokenKind::RParen,
            TokenKind::Arrow,
            ident("a"),
            TokenKind::Plus,
            ident("b"),
            TokenKind::Newline,
            TokenKind::MacroCall("add".into()),
            TokenKind::LParen,
            TokenKind::Int(2),
            TokenKind::Comma,
            TokenKind::Int(3),
            TokenKind::RParen,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_literals() {
    assert_eq!(
        kinds(r#"12 3.25 'A' "hi there" -"#),
        vec![
            TokenKind::Int(12),
            TokenKind::float(3.25),
            TokenKind::Char('A'),
            TokenKind::String("hi there".into()),
            TokenKind::Minus,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_integer_then_dot_is_not_float() {
    // `1.` has no fractional digits; the dot alone is not a token.
    let errors = tokenize("1.").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ErrorCode::E0001);
    assert_eq!(errors[0].primary_span(), Some(Span::new(1, 2)));
}

#[test]
fn test_comments_and_whitespace_dropped() {
    assert_eq!(
        kinds("foo 1, 2 # emit twice\r\n\t\n"),
        vec![
            ident("foo"),
            TokenKind::Int(1),
            TokenKind::Comma,
            TokenKind::Int(2),
            TokenKind::Newline,
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_spans() {
    let tokens = tokenize(".env arduino").unwrap();
    let spans: Vec<_> = tokens.iter().map(|t| t.span).collect();
    assert_eq!(spans, vec![Span::new(0, 4), Span::new(5, 12), Span::point(12)]);
}

#[test]
fn test_empty_source() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
}

#[test]
fn test_errors_accumulate() {
    let errors = tokenize("a $ b ; c").unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.code == ErrorCode::E0001));
    assert_eq!(errors[0].primary_span(), Some(Span::new(2, 3)));
    assert_eq!(errors[1].primary_span(), Some(Span::new(6, 7)));
    assert!(errors[0].message.contains('$'));
}

#[test]
fn test_multibyte_character_error() {
    // Cyrillic `а` is two bytes; the error covers the whole character.
    let errors = tokenize("а 123").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].primary_span(), Some(Span::new(0, 2)));
}

#[test]
fn test_unterminated_string_resumes_after_quote() {
    let errors = tokenize("\"abc\n.const x = 1").unwrap_err();
    // Only the quote itself is rejected; everything after lexes normally.
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].primary_span(), Some(Span::new(0, 1)));
}

#[test]
fn test_integer_overflow() {
    let errors = tokenize("99999999999999999999").unwrap_err();
    assert_eq!(errors[0].code, ErrorCode::E0002);
}

#[test]
fn test_arrow_vs_minus() {
    assert_eq!(
        kinds("-> - >"),
        vec![TokenKind::Arrow, TokenKind::Minus, TokenKind::Gt, TokenKind::Eof]
    );
}

proptest! {
    #[test]
    fn pieces_tile_input(source in any::<String>()) {
        let pieces = scan(&source);
        let mut expected_start = 0u32;
        for piece in &pieces {
            prop_assert_eq!(piece.span.start, expected_start);
            prop_assert!(piece.span.end > piece.span.start);
            expected_start = piece.span.end;
        }
        prop_assert_eq!(expected_start as usize, source.len());

        let rebuilt: String = pieces
            .iter()
            .map(|p| &source[p.span.to_range()])
            .collect();
        prop_assert_eq!(rebuilt, source);
    }

    #[test]
    fn tokenize_is_total(source in "[ -~\n\t]{0,64}") {
        match tokenize(&source) {
            Ok(tokens) => prop_assert_eq!(tokens.iter().last().map(|t| &t.kind), Some(&TokenKind::Eof)),
            Err(errors) => prop_assert!(!errors.is_empty()),
        }
    }
}
