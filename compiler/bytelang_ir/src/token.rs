//! Token types produced by the lexer.
//!
//! Literal tokens carry their already-parsed value, so the parser never looks
//! at source text again.

use std::fmt;

use crate::Span;

/// Token kinds.
///
/// Whitespace and comments never appear here; the lexer drops them.
/// A stream always ends with a single [`TokenKind::Eof`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    /// Integer literal, `\d+`.
    Int(i64),
    /// Float literal, `\d+\.\d+`, stored as `f64` bits so the kind stays `Eq`.
    Float(u64),
    /// Character literal `'c'`.
    Char(char),
    /// String literal contents without the quotes.
    String(String),

    // Names and markers
    /// Plain identifier.
    Ident(String),
    /// Directive marker `.name`, holding `name`.
    Directive(String),
    /// Macro-call marker `@name`, holding `name`.
    MacroCall(String),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,

    // Delimiters
    Comma,
    Eq,
    Colon,
    Arrow,

    // Brackets
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Lt,
    Gt,

    /// Statement terminator.
    Newline,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Build a float token from its value.
    #[inline]
    pub fn float(value: f64) -> Self {
        TokenKind::Float(value.to_bits())
    }

    /// Human-readable name used in "expected X, found Y" messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Int(_) => "integer",
            TokenKind::Float(_) => "float",
            TokenKind::Char(_) => "character",
            TokenKind::String(_) => "string",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Directive(_) => "directive",
            TokenKind::MacroCall(_) => "macro call",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Comma => "`,`",
            TokenKind::Eq => "`=`",
            TokenKind::Colon => "`:`",
            TokenKind::Arrow => "`->`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Lt => "`<`",
            TokenKind::Gt => "`>`",
            TokenKind::Newline => "end of statement",
            TokenKind::Eof => "end of file",
        }
    }

    /// True for tokens that end a statement.
    #[inline]
    pub fn is_statement_end(&self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Eof)
    }

    /// True for `+ - * /`.
    #[inline]
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash
        )
    }

    /// True for literal kinds.
    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Int(_) | TokenKind::Float(_) | TokenKind::Char(_) | TokenKind::String(_)
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(n) => write!(f, "{n}"),
            TokenKind::Float(bits) => write!(f, "{}", f64::from_bits(*bits)),
            TokenKind::Char(c) => write!(f, "'{c}'"),
            TokenKind::String(s) => write!(f, "\"{s}\""),
            TokenKind::Ident(name) => write!(f, "{name}"),
            TokenKind::Directive(name) => write!(f, ".{name}"),
            TokenKind::MacroCall(name) => write!(f, "@{name}"),
            TokenKind::Newline => write!(f, "\\n"),
            TokenKind::Eof => write!(f, "<eof>"),
            other => write!(f, "{}", other.display_name().trim_matches('`')),
        }
    }
}

/// A token with its source location.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Lexer output: an ordered token stream ending in `Eof`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Token kinds without spans, mostly useful in tests.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_roundtrip_through_bits() {
        let kind = TokenKind::float(1.5);
        assert_eq!(kind, TokenKind::Float(1.5f64.to_bits()));
        assert_eq!(kind.to_string(), "1.5");
    }

    #[test]
    fn test_statement_end() {
        assert!(TokenKind::Newline.is_statement_end());
        assert!(TokenKind::Eof.is_statement_end());
        assert!(!TokenKind::Comma.is_statement_end());
    }

    #[test]
    fn test_display_markers() {
        assert_eq!(TokenKind::Directive("const".into()).to_string(), ".const");
        assert_eq!(TokenKind::MacroCall("add".into()).to_string(), "@add");
        assert_eq!(TokenKind::Arrow.to_string(), "->");
    }
}
