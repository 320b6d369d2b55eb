//! Raw Token Definition
//!
//! The logos-derived automaton. Trivia (whitespace, comments) are real
//! variants here so every byte of input lands in some piece; `tokenize`
//! drops them afterwards.

use logos::Logos;

/// Raw token from logos (before literal parsing).
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawToken {
    #[regex(r"[ \t\r]+")]
    Whitespace,

    #[regex(r"#[^\n]*")]
    Comment,

    #[token("\n")]
    Newline,

    #[regex(r"\.[a-zA-Z_][a-zA-Z0-9_]*")]
    Directive,

    #[regex(r"@[a-zA-Z_][a-zA-Z0-9_]*")]
    MacroCall,

    #[regex(r#""[^"]*""#)]
    String,

    #[regex(r"'.'")]
    Char,

    #[regex(r"[0-9]+\.[0-9]+")]
    Float,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[token(",")]
    Comma,
    #[token("=")]
    Eq,
    #[token(":")]
    Colon,
    #[token("->")]
    Arrow,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
}

impl RawToken {
    /// Matched but never emitted.
    pub(crate) fn is_trivia(self) -> bool {
        matches!(self, RawToken::Whitespace | RawToken::Comment)
    }
}
