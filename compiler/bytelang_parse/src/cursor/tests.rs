#![allow(clippy::unwrap_used)]

use super::*;

/// Owns the token list so `Cursor` can borrow it.
struct TestCtx {
    tokens: TokenList,
}

impl TestCtx {
    fn new(source: &str) -> Self {
        Self {
            tokens: bytelang_lexer::tokenize(source).unwrap(),
        }
    }

    fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.tokens)
    }
}

#[test]
fn test_cursor_navigation() {
    let ctx = TestCtx::new(".const x = 42");
    let mut cursor = ctx.cursor();

    assert!(cursor.check(&TokenKind::Directive("const".into())));
    assert!(!cursor.is_at_end());

    cursor.advance();
    assert!(cursor.check_ident());

    cursor.advance();
    assert!(cursor.check(&TokenKind::Eq));

    cursor.advance();
    assert!(matches!(cursor.current_kind(), TokenKind::Int(42)));

    cursor.advance();
    assert!(cursor.is_at_end());
    assert!(cursor.check_statement_end());
}

#[test]
fn test_advance_stops_at_eof() {
    let ctx = TestCtx::new("x");
    let mut cursor = ctx.cursor();
    cursor.advance();
    let pos = cursor.position();
    cursor.advance();
    cursor.advance();
    assert_eq!(cursor.position(), pos);
    assert!(cursor.is_at_end());
}

#[test]
fn test_expect_success() {
    let ctx = TestCtx::new("= 1");
    let mut cursor = ctx.cursor();
    let token = cursor.expect(&TokenKind::Eq).unwrap();
    assert_eq!(token.span, Span::new(0, 1));
}

#[test]
fn test_expect_failure_does_not_advance() {
    let ctx = TestCtx::new("x = 1");
    let mut cursor = ctx.cursor();
    let err = cursor.expect(&TokenKind::Colon).unwrap_err();
    assert_eq!(err.code, ErrorCode::E1001);
    assert!(err.message.contains("`:`"));
    assert!(err.message.contains("identifier"));
    assert_eq!(cursor.position(), 0);
}

#[test]
fn test_expect_ident() {
    let ctx = TestCtx::new("name 5");
    let mut cursor = ctx.cursor();
    let ident = cursor.expect_ident().unwrap();
    assert_eq!(ident.name, "name");
    assert_eq!(ident.span, Span::new(0, 4));
    assert_eq!(cursor.previous_span(), Span::new(0, 4));

    let err = cursor.expect_ident().unwrap_err();
    assert_eq!(err.code, ErrorCode::E1004);
}

#[test]
fn test_empty_token_list_reads_as_eof() {
    let tokens = TokenList::new();
    let cursor = Cursor::new(&tokens);
    assert!(cursor.is_at_end());
    assert_eq!(cursor.current_span(), Span::DUMMY);
}
