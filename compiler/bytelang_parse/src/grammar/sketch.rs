//! Sketch statements: environment selection, marks, variables and
//! instruction calls.

use bytelang_diagnostic::Outcome;
use bytelang_ir::{SketchStatement, TokenKind};

use crate::series::SeriesConfig;
use crate::Parser;

/// `.env name`
pub(super) fn env_directive(p: &mut Parser<'_>) -> Outcome<SketchStatement> {
    p.expect_ident().map(SketchStatement::SelectEnvironment)
}

/// `.mark name`
pub(super) fn mark_directive(p: &mut Parser<'_>) -> Outcome<SketchStatement> {
    p.expect_ident().map(SketchStatement::Mark)
}

/// `.var name: type = expr`
pub(super) fn var_directive(p: &mut Parser<'_>) -> Outcome<SketchStatement> {
    let name = p.expect_ident()?;
    p.expect(&TokenKind::Colon)?;
    let ty = p.parse_type()?;
    p.expect(&TokenKind::Eq)?;
    let value = p.parse_expr()?;
    Ok(SketchStatement::Variable { name, ty, value })
}

/// `name arg, arg, ...` up to the end of the line.
pub(super) fn instruction_call(p: &mut Parser<'_>) -> Outcome<SketchStatement> {
    let name = p.expect_ident()?;
    let args = p.series(&SeriesConfig::statement(), Parser::parse_expr)?;
    Ok(SketchStatement::InstructionCall { name, args })
}
