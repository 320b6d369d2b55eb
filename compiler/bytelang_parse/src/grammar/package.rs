use bytelang_diagnostic::Outcome;
use bytelang_ir::{PackageStatement, TokenKind};

use crate::Parser;

/// `.inst name(field: type, ...)`
pub(super) fn inst_directive(p: &mut Parser<'_>) -> Outcome<PackageStatement> {
    let name = p.expect_ident()?;
    let fields = p.bracketed(TokenKind::LParen, TokenKind::RParen, Parser::parse_field)?;
    Ok(PackageStatement::Instruction { name, fields })
}
