//! Error recovery for the parser.
//!
//! After a failed statement the parser skips to the next statement
//! terminator; after a failed list element it skips to the next separator
//! or closing bracket.

use bytelang_ir::TokenKind;

use crate::cursor::Cursor;

/// A set of tokens to synchronize to during error recovery.
#[derive(Clone, Copy, Debug)]
pub struct RecoverySet {
    tokens: &'static [TokenKind],
}

impl RecoverySet {
    /// Statement terminator.
    pub const STATEMENT_END: Self = Self {
        tokens: &[TokenKind::Newline],
    };

    /// Inside a bracketed or bare argument list.
    pub const LIST_FOLLOW: Self = Self {
        tokens: &[
            TokenKind::Comma,
            TokenKind::RParen,
            TokenKind::RBrace,
            TokenKind::RBracket,
            TokenKind::Newline,
        ],
    };

    /// Check if a token kind is in this recovery set.
    #[inline]
    pub fn contains(&self, kind: &TokenKind) -> bool {
        self.tokens.contains(kind)
    }
}

/// Advance the cursor until reaching a token in the recovery set or EOF.
///
/// Returns `true` if a recovery token was found, `false` if EOF was reached.
pub fn synchronize(cursor: &mut Cursor<'_>, recovery: RecoverySet) -> bool {
    while !cursor.is_at_end() {
        if recovery.contains(cursor.current_kind()) {
            return true;
        }
        cursor.advance();
    }
    false
}

/// Skip the rest of a broken statement, including its terminator.
pub fn skip_statement(cursor: &mut Cursor<'_>) {
    if synchronize(cursor, RecoverySet::STATEMENT_END) {
        cursor.advance();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bytelang_ir::TokenList;

    fn tokens(source: &str) -> TokenList {
        bytelang_lexer::tokenize(source).unwrap()
    }

    #[test]
    fn test_recovery_set_contains() {
        assert!(RecoverySet::STATEMENT_END.contains(&TokenKind::Newline));
        assert!(!RecoverySet::STATEMENT_END.contains(&TokenKind::Comma));
        assert!(RecoverySet::LIST_FOLLOW.contains(&TokenKind::Comma));
        assert!(RecoverySet::LIST_FOLLOW.contains(&TokenKind::RBrace));
        assert!(!RecoverySet::LIST_FOLLOW.contains(&TokenKind::Plus));
    }

    #[test]
    fn test_synchronize_to_list_follow() {
        let list = tokens("{ 1 + + , 2 }");
        let mut cursor = Cursor::new(&list);
        cursor.advance(); // {
        cursor.advance(); // 1

        assert!(synchronize(&mut cursor, RecoverySet::LIST_FOLLOW));
        assert!(cursor.check(&TokenKind::Comma));
    }

    #[test]
    fn test_skip_statement_consumes_newline() {
        let list = tokens(".const = = 3\n.const y = 1");
        let mut cursor = Cursor::new(&list);
        skip_statement(&mut cursor);
        assert!(cursor.check(&TokenKind::Directive("const".into())));
    }

    #[test]
    fn test_synchronize_eof() {
        let list = tokens("a b c");
        let mut cursor = Cursor::new(&list);
        assert!(!synchronize(&mut cursor, RecoverySet::STATEMENT_END));
        assert!(cursor.is_at_end());
    }
}
