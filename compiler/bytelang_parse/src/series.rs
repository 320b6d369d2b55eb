//! Comma-separated series combinator.
//!
//! Shared by every list in the grammar: macro arguments and parameters,
//! struct and instruction fields, initializer lists, `.use` selections and
//! the bare argument list of an instruction call.

use bytelang_diagnostic::{unclosed_delimiter, unexpected_token, Accumulator, Outcome};
use bytelang_ir::{Span, TokenKind};

use crate::recovery::{synchronize, RecoverySet};
use crate::Parser;

/// Where a series stops.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Terminator {
    /// A closing bracket, consumed when reached.
    Close(TokenKind),
    /// Newline or end of file, left for the statement loop.
    StatementEnd,
}

#[derive(Clone, Debug)]
pub(crate) struct SeriesConfig {
    pub terminator: Terminator,
    /// Opening bracket, for unclosed-delimiter reports.
    pub open: Option<(Span, char)>,
}

impl SeriesConfig {
    pub fn comma(close: TokenKind) -> Self {
        SeriesConfig {
            terminator: Terminator::Close(close),
            open: None,
        }
    }

    pub fn statement() -> Self {
        SeriesConfig {
            terminator: Terminator::StatementEnd,
            open: None,
        }
    }

    #[must_use]
    pub fn opened_at(mut self, span: Span, bracket: char) -> Self {
        self.open = Some((span, bracket));
        self
    }

    fn expected(&self) -> String {
        match &self.terminator {
            Terminator::Close(kind) => format!("`,` or {}", kind.display_name()),
            Terminator::StatementEnd => "`,` or end of statement".to_string(),
        }
    }
}

impl Parser<'_> {
    /// Parse `open element, ... close`.
    pub(crate) fn bracketed<T>(
        &mut self,
        open: TokenKind,
        close: TokenKind,
        element: impl FnMut(&mut Self) -> Outcome<T>,
    ) -> Outcome<Vec<T>> {
        let open_span = self.expect(&open)?;
        let bracket = match open {
            TokenKind::LParen => '(',
            TokenKind::LBrace => '{',
            TokenKind::LBracket => '[',
            _ => '<',
        };
        let config = SeriesConfig::comma(close).opened_at(open_span, bracket);
        self.series(&config, element)
    }

    /// Parse zero or more comma-separated elements up to the terminator.
    ///
    /// A failed element is recorded and skipped; the series continues at the
    /// next separator. A missing separator or terminator ends the series
    /// with all errors collected so far.
    pub(crate) fn series<T>(
        &mut self,
        config: &SeriesConfig,
        mut element: impl FnMut(&mut Self) -> Outcome<T>,
    ) -> Outcome<Vec<T>> {
        let mut items = Vec::new();
        let mut acc = Accumulator::new();

        if self.finish_series(config) {
            return Ok(items);
        }

        loop {
            match element(self) {
                Ok(item) => items.push(item),
                Err(errors) => {
                    acc.extend(errors);
                    synchronize(&mut self.cursor, RecoverySet::LIST_FOLLOW);
                }
            }

            if self.cursor.check(&TokenKind::Comma) {
                self.cursor.advance();
                // Trailing separator
                if self.finish_series(config) {
                    break;
                }
                continue;
            }
            if self.finish_series(config) {
                break;
            }

            let found = self.cursor.current_span();
            let error = match (&config.terminator, config.open) {
                (Terminator::Close(_), Some((open_span, bracket)))
                    if self.cursor.check_statement_end() =>
                {
                    unclosed_delimiter(open_span, found, bracket)
                }
                _ => unexpected_token(
                    found,
                    &config.expected(),
                    self.cursor.current_kind().display_name(),
                ),
            };
            acc.push(error);
            return Err(acc.into_diagnostics());
        }

        acc.finish(items)
    }

    /// True when the series is over; consumes a closing bracket.
    fn finish_series(&mut self, config: &SeriesConfig) -> bool {
        match &config.terminator {
            Terminator::Close(kind) if self.cursor.check(kind) => {
                self.cursor.advance();
                true
            }
            Terminator::Close(_) => false,
            Terminator::StatementEnd => self.cursor.check_statement_end(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bytelang_diagnostic::ErrorCode;
    use bytelang_ir::{Ident, TokenList};
    use pretty_assertions::assert_eq;

    fn tokens(source: &str) -> TokenList {
        bytelang_lexer::tokenize(source).unwrap()
    }

    fn names(p: &mut Parser<'_>) -> Outcome<Ident> {
        p.expect_ident()
    }

    fn idents(list: Vec<Ident>) -> Vec<String> {
        list.into_iter().map(|i| i.name).collect()
    }

    #[test]
    fn test_empty_brackets() {
        let list = tokens("()");
        let mut p = Parser::new(&list);
        let items = p
            .bracketed(TokenKind::LParen, TokenKind::RParen, names)
            .unwrap();
        assert!(items.is_empty());
        assert!(p.cursor.is_at_end());
    }

    #[test]
    fn test_bracketed_elements() {
        let list = tokens("{ a, b, c } x");
        let mut p = Parser::new(&list);
        let items = p
            .bracketed(TokenKind::LBrace, TokenKind::RBrace, names)
            .unwrap();
        assert_eq!(idents(items), vec!["a", "b", "c"]);
        assert!(p.cursor.check_ident());
    }

    #[test]
    fn test_trailing_comma() {
        let list = tokens("(a, b,)");
        let mut p = Parser::new(&list);
        let items = p
            .bracketed(TokenKind::LParen, TokenKind::RParen, names)
            .unwrap();
        assert_eq!(idents(items), vec!["a", "b"]);
    }

    #[test]
    fn test_statement_series_stops_before_newline() {
        let list = tokens("a, b\nc");
        let mut p = Parser::new(&list);
        let items = p.series(&SeriesConfig::statement(), names).unwrap();
        assert_eq!(idents(items), vec!["a", "b"]);
        assert!(p.cursor.check(&TokenKind::Newline));
    }

    #[test]
    fn test_element_errors_accumulate() {
        let list = tokens("(a, 1, b, 2)");
        let mut p = Parser::new(&list);
        let errors = p
            .bracketed(TokenKind::LParen, TokenKind::RParen, names)
            .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.code == ErrorCode::E1004));
    }

    #[test]
    fn test_unclosed_bracket() {
        let list = tokens("(a, b\n");
        let mut p = Parser::new(&list);
        let errors = p
            .bracketed(TokenKind::LParen, TokenKind::RParen, names)
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::E1003);
        assert_eq!(errors[0].primary_span(), Some(Span::new(5, 6)));
    }

    #[test]
    fn test_missing_separator() {
        let list = tokens("(a b)");
        let mut p = Parser::new(&list);
        let errors = p
            .bracketed(TokenKind::LParen, TokenKind::RParen, names)
            .unwrap_err();
        assert_eq!(errors[0].code, ErrorCode::E1001);
        assert!(errors[0].message.contains("`,` or `)`"));
    }

    #[test]
    fn test_missing_open_bracket() {
        let list = tokens("a)");
        let mut p = Parser::new(&list);
        let errors = p
            .bracketed(TokenKind::LParen, TokenKind::RParen, names)
            .unwrap_err();
        assert_eq!(errors[0].code, ErrorCode::E1001);
    }
}
