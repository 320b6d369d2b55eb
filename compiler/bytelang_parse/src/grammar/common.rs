//! Directives shared by every unit: `.const`, `.struct`, `.macro`, `.type`.

use bytelang_diagnostic::Outcome;
use bytelang_ir::{CommonDirective, TokenKind};

use crate::Parser;

impl Parser<'_> {
    /// `.const name = expr`
    fn parse_const(&mut self) -> Outcome<CommonDirective> {
        let name = self.expect_ident()?;
        self.expect(&TokenKind::Eq)?;
        let value = self.parse_expr()?;
        Ok(CommonDirective::Const { name, value })
    }

    /// `.struct name { field: type, ... }`
    fn parse_struct(&mut self) -> Outcome<CommonDirective> {
        let name = self.expect_ident()?;
        let fields = self.bracketed(TokenKind::LBrace, TokenKind::RBrace, Parser::parse_field)?;
        Ok(CommonDirective::Struct { name, fields })
    }

    /// `.macro name(a, b) -> expr`
    fn parse_macro(&mut self) -> Outcome<CommonDirective> {
        let name = self.expect_ident()?;
        let params = self.bracketed(TokenKind::LParen, TokenKind::RParen, Parser::expect_ident)?;
        self.expect(&TokenKind::Arrow)?;
        let body = self.parse_expr()?;
        Ok(CommonDirective::Macro { name, params, body })
    }

    /// `.type name = type`
    fn parse_type_alias(&mut self) -> Outcome<CommonDirective> {
        let name = self.expect_ident()?;
        self.expect(&TokenKind::Eq)?;
        let ty = self.parse_type()?;
        Ok(CommonDirective::TypeAlias { name, ty })
    }
}

pub(super) fn const_directive<S: From<CommonDirective>>(p: &mut Parser<'_>) -> Outcome<S> {
    p.parse_const().map(S::from)
}

pub(super) fn struct_directive<S: From<CommonDirective>>(p: &mut Parser<'_>) -> Outcome<S> {
    p.parse_struct().map(S::from)
}

pub(super) fn macro_directive<S: From<CommonDirective>>(p: &mut Parser<'_>) -> Outcome<S> {
    p.parse_macro().map(S::from)
}

pub(super) fn type_directive<S: From<CommonDirective>>(p: &mut Parser<'_>) -> Outcome<S> {
    p.parse_type_alias().map(S::from)
}
