//! Recursive descent parser for ByteLang.
//!
//! One top-level loop serves every unit kind. A [`Grammar`] supplies the
//! unit's directive table (the common directives plus its own) and its
//! handling of statements that do not start with a directive marker.
//!
//! Errors are collected per statement: a broken line is skipped up to its
//! terminator and parsing continues, so one call reports every broken line.

mod cursor;
mod grammar;
pub mod recovery;
mod series;

pub use cursor::Cursor;
pub use grammar::{
    CommonGrammar, DirectiveFn, EnvironmentGrammar, Grammar, PackageGrammar, SketchGrammar,
};

use bytelang_diagnostic::{Accumulator, Diagnostic, ErrorCode, Outcome};
use bytelang_ir::{
    CommonDirective, EnvironmentStatement, Ident, PackageStatement, Program, Registry,
    SketchStatement, Span, TokenKind, TokenList,
};
use tracing::{debug, trace};

/// Parser state: a cursor over one unit's tokens.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
        }
    }

    pub fn cursor(&self) -> &Cursor<'a> {
        &self.cursor
    }

    /// Parse a whole unit with grammar `G`.
    pub fn parse_program<G: Grammar>(mut self) -> Outcome<Program<G::Statement>> {
        let directives = G::directives();
        let mut statements = Vec::new();
        let mut acc = Accumulator::new();

        while !self.cursor.is_at_end() {
            // Blank lines
            if self.cursor.check(&TokenKind::Newline) {
                self.cursor.advance();
                continue;
            }

            let start = self.cursor.position();
            let parsed = self
                .statement::<G>(&directives)
                .and_then(|stmt| self.expect_statement_end().map(|()| stmt));

            match parsed {
                Ok(stmt) => {
                    trace!(index = statements.len(), "statement parsed");
                    statements.push(stmt);
                }
                Err(errors) => {
                    acc.extend(errors);
                    recovery::skip_statement(&mut self.cursor);
                    // A failed statement always consumes something.
                    if self.cursor.position() == start {
                        self.cursor.advance();
                    }
                }
            }
        }

        debug!(
            unit = G::UNIT,
            statements = statements.len(),
            errors = acc.len(),
            "parsed unit"
        );
        acc.finish(Program::new(statements))
    }

    /// One statement, without its terminator.
    fn statement<G: Grammar>(
        &mut self,
        directives: &impl Registry<DirectiveFn<G::Statement>>,
    ) -> Outcome<G::Statement> {
        let TokenKind::Directive(name) = self.cursor.current_kind() else {
            return G::plain_statement(self);
        };
        let marker = self.cursor.advance().span;
        match directives.get(name) {
            Ok(parse) => parse(self),
            Err(_) => {
                let known: Vec<_> = directives.items().map(|(k, _)| format!(".{k}")).collect();
                Err(vec![Diagnostic::error(ErrorCode::E1006)
                    .with_message(format!("unknown directive `.{name}` in {}", G::UNIT))
                    .with_label(marker, "unknown directive")
                    .with_note(format!("available directives: {}", known.join(", ")))])
            }
        }
    }

    /// A statement ends at a newline or at end of file.
    fn expect_statement_end(&mut self) -> Outcome<()> {
        match self.cursor.current_kind() {
            TokenKind::Newline => {
                self.cursor.advance();
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            other => Err(vec![Diagnostic::error(ErrorCode::E1007)
                .with_message(format!(
                    "expected end of statement, found {}",
                    other.display_name()
                ))
                .with_label(self.cursor.current_span(), "expected newline here")]),
        }
    }

    /// Consume `kind`, returning its span.
    pub(crate) fn expect(&mut self, kind: &TokenKind) -> Outcome<Span> {
        self.cursor
            .expect(kind)
            .map(|token| token.span)
            .map_err(|e| vec![e])
    }

    pub(crate) fn expect_ident(&mut self) -> Outcome<Ident> {
        self.cursor.expect_ident().map_err(|e| vec![e])
    }

    /// Rejects a token that cannot start a statement in this unit.
    pub(crate) fn misplaced<T>(&self, unit: &str) -> Outcome<T> {
        Err(vec![Diagnostic::error(ErrorCode::E1008)
            .with_message(format!(
                "misplaced {} at start of {unit} statement",
                self.cursor.current_kind().display_name()
            ))
            .with_label(self.cursor.current_span(), "expected a directive")])
    }
}

/// Parse the common directive subset only.
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse_common(tokens: &TokenList) -> Outcome<Program<CommonDirective>> {
    Parser::new(tokens).parse_program::<CommonGrammar>()
}

/// Parse a package unit.
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse_package(tokens: &TokenList) -> Outcome<Program<PackageStatement>> {
    Parser::new(tokens).parse_program::<PackageGrammar>()
}

/// Parse an environment unit.
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse_environment(tokens: &TokenList) -> Outcome<Program<EnvironmentStatement>> {
    Parser::new(tokens).parse_program::<EnvironmentGrammar>()
}

/// Parse a sketch unit.
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse_sketch(tokens: &TokenList) -> Outcome<Program<SketchStatement>> {
    Parser::new(tokens).parse_program::<SketchGrammar>()
}

#[cfg(test)]
mod tests;
