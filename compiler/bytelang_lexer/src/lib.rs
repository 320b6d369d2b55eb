//! Lexer for ByteLang using logos.
//!
//! `tokenize` never stops at the first bad character: each unrecognized
//! character becomes an E0001 diagnostic, lexing resumes right after it, and
//! the caller receives every problem in the unit at once.

mod raw_token;

use bytelang_diagnostic::{Diagnostic, ErrorCode, Outcome};
use bytelang_ir::{Span, Token, TokenKind, TokenList};
use logos::Logos;
use raw_token::RawToken;
use tracing::{debug, trace};

/// One contiguous slice of input: a matched token (trivia included) or a
/// single unrecognized character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Piece {
    pub(crate) token: Option<RawToken>,
    pub(crate) span: Span,
}

/// Split `source` into pieces that tile it exactly.
///
/// Logos may reject a long partial match (an unterminated string, say). We
/// only ever skip the first character of a rejected region and restart the
/// automaton after it, so the rest of the region is lexed normally.
pub(crate) fn scan(source: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut offset = 0;

    'restart: while offset < source.len() {
        let Some(rest) = source.get(offset..) else {
            break;
        };
        let mut lexer = RawToken::lexer(rest);

        while let Some(result) = lexer.next() {
            let range = lexer.span();
            let start = offset + range.start;
            match result {
                Ok(raw) => pieces.push(Piece {
                    token: Some(raw),
                    span: Span::from_range(start..offset + range.end),
                }),
                Err(()) => {
                    let end = next_char_boundary(source, start);
                    pieces.push(Piece {
                        token: None,
                        span: Span::from_range(start..end),
                    });
                    offset = end;
                    continue 'restart;
                }
            }
        }
        break;
    }

    pieces
}

/// Offset just past the character starting at `start`.
fn next_char_boundary(source: &str, start: usize) -> usize {
    (start + 1..=source.len())
        .find(|&i| source.is_char_boundary(i))
        .unwrap_or(source.len())
}

/// Tokenize a compilation unit.
///
/// The returned stream ends with `Eof`. Whitespace and comments are dropped;
/// newlines are kept since they terminate statements.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn tokenize(source: &str) -> Outcome<TokenList> {
    let mut tokens = TokenList::new();
    let mut errors = Vec::new();

    for piece in scan(source) {
        let slice = source.get(piece.span.to_range()).unwrap_or_default();
        match piece.token {
            Some(raw) if raw.is_trivia() => {}
            Some(raw) => match convert_token(raw, slice, piece.span) {
                Ok(kind) => {
                    trace!(?kind, span = %piece.span, "token");
                    tokens.push(Token::new(kind, piece.span));
                }
                Err(diag) => errors.push(diag),
            },
            None => errors.push(unrecognized_character(slice, piece.span)),
        }
    }

    let eof = Span::point(u32::try_from(source.len()).unwrap_or(u32::MAX));
    tokens.push(Token::new(TokenKind::Eof, eof));

    debug!(tokens = tokens.len(), errors = errors.len(), "tokenized");
    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}

/// Convert a raw token to a `TokenKind`, parsing literal values.
fn convert_token(raw: RawToken, slice: &str, span: Span) -> Result<TokenKind, Diagnostic> {
    let kind = match raw {
        // Literals
        RawToken::Int => TokenKind::Int(
            slice
                .parse::<i64>()
                .map_err(|_| invalid_number(slice, span, "does not fit in 64 bits"))?,
        ),
        RawToken::Float => TokenKind::float(
            slice
                .parse::<f64>()
                .map_err(|_| invalid_number(slice, span, "is not a valid float"))?,
        ),
        RawToken::String => TokenKind::String(strip_delimiters(slice).to_string()),
        RawToken::Char => match strip_delimiters(slice).chars().next() {
            Some(c) => TokenKind::Char(c),
            None => return Err(unrecognized_character(slice, span)),
        },

        // Names
        RawToken::Ident => TokenKind::Ident(slice.to_string()),
        RawToken::Directive => TokenKind::Directive(slice[1..].to_string()),
        RawToken::MacroCall => TokenKind::MacroCall(slice[1..].to_string()),

        // Punctuation
        RawToken::Comma => TokenKind::Comma,
        RawToken::Eq => TokenKind::Eq,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Newline => TokenKind::Newline,

        // Filtered by the caller
        RawToken::Whitespace | RawToken::Comment => {
            return Err(Diagnostic::error(ErrorCode::E9001)
                .with_message("internal error: trivia reached token conversion")
                .with_label(span, "here"));
        }
    };
    Ok(kind)
}

/// Drop the first and last character (quotes).
fn strip_delimiters(slice: &str) -> &str {
    let mut chars = slice.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

fn unrecognized_character(slice: &str, span: Span) -> Diagnostic {
    let shown: String = slice.chars().next().map_or_else(String::new, |c| c.escape_debug().collect());
    Diagnostic::error(ErrorCode::E0001)
        .with_message(format!("unrecognized character `{shown}` at offset {}", span.start))
        .with_label(span, "not valid here")
}

fn invalid_number(slice: &str, span: Span, reason: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E0002)
        .with_message(format!("invalid number literal `{slice}`: {reason}"))
        .with_label(span, "invalid literal")
}

#[cfg(test)]
mod tests;
