//! Environment directives: `.use` and the pointer width settings.

use bytelang_diagnostic::Outcome;
use bytelang_ir::{EnvironmentStatement, PointerKind, TokenKind};

use crate::Parser;

/// `.use package` or `.use package { inst, ... }`
pub(super) fn use_directive(p: &mut Parser<'_>) -> Outcome<EnvironmentStatement> {
    let package = p.expect_ident()?;
    let selected = if p.cursor.check(&TokenKind::LBrace) {
        Some(p.bracketed(TokenKind::LBrace, TokenKind::RBrace, Parser::expect_ident)?)
    } else {
        None
    };
    Ok(EnvironmentStatement::UsePackage { package, selected })
}

fn pointer(p: &mut Parser<'_>, kind: PointerKind) -> Outcome<EnvironmentStatement> {
    let primitive = p.expect_ident()?;
    Ok(EnvironmentStatement::SetPointer { kind, primitive })
}

pub(super) fn ptr_prog_directive(p: &mut Parser<'_>) -> Outcome<EnvironmentStatement> {
    pointer(p, PointerKind::Program)
}

pub(super) fn ptr_inst_directive(p: &mut Parser<'_>) -> Outcome<EnvironmentStatement> {
    pointer(p, PointerKind::Instruction)
}

pub(super) fn ptr_data_directive(p: &mut Parser<'_>) -> Outcome<EnvironmentStatement> {
    pointer(p, PointerKind::Data)
}
