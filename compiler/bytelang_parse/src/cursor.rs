//! Token cursor for navigating the token stream.
//!
//! Provides low-level token access, lookahead, and consumption methods.

use bytelang_diagnostic::{unexpected_token, Diagnostic, ErrorCode};
use bytelang_ir::{Ident, Span, Token, TokenKind, TokenList};

/// Returned when reading past the stream, or from an empty stream.
static EOF_TOKEN: Token = Token {
    kind: TokenKind::Eof,
    span: Span::DUMMY,
};

/// Cursor for navigating tokens.
///
/// Never moves past the final `Eof`, so `current()` is always valid.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the start of the token stream.
    pub fn new(tokens: &'a TokenList) -> Self {
        Cursor {
            tokens: tokens.as_slice(),
            pos: 0,
        }
    }

    /// Current position, for progress checks.
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn current(&self) -> &'a Token {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .unwrap_or(&EOF_TOKEN)
    }

    #[inline]
    pub fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Span of the most recently consumed token.
    pub fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(Span::DUMMY, |t| t.span)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Exact kind comparison.
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    #[inline]
    pub fn check_ident(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(_))
    }

    /// Newline or end of file.
    #[inline]
    pub fn check_statement_end(&self) -> bool {
        self.current_kind().is_statement_end()
    }

    /// Consume the current token and return it. Stays on `Eof`.
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    /// Consume a token of `kind` or report what was found instead.
    pub fn expect(&mut self, kind: &TokenKind) -> Result<&'a Token, Diagnostic> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.make_expect_error(kind.display_name()))
        }
    }

    /// Consume an identifier.
    pub fn expect_ident(&mut self) -> Result<Ident, Diagnostic> {
        if let TokenKind::Ident(name) = self.current_kind() {
            let span = self.advance().span;
            Ok(Ident::new(name.clone(), span))
        } else {
            Err(Diagnostic::error(ErrorCode::E1004)
                .with_message(format!(
                    "expected identifier, found {}",
                    self.current_kind().display_name()
                ))
                .with_label(self.current_span(), "expected identifier"))
        }
    }

    #[cold]
    #[inline(never)]
    pub(crate) fn make_expect_error(&self, expected: &str) -> Diagnostic {
        unexpected_token(
            self.current_span(),
            expected,
            self.current_kind().display_name(),
        )
    }
}

#[cfg(test)]
mod tests;
