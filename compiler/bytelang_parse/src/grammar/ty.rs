//! Type annotations: `name`, `*T` and `[len]T`.

use bytelang_diagnostic::{Diagnostic, ErrorCode, Outcome};
use bytelang_ir::{Field, TokenKind, TypeNode, TypeNodeKind};
use bytelang_stack::ensure_sufficient_stack;

use crate::Parser;

impl Parser<'_> {
    pub(crate) fn parse_type(&mut self) -> Outcome<TypeNode> {
        let start = self.cursor.current_span();
        match self.cursor.current_kind() {
            TokenKind::Ident(name) => {
                self.cursor.advance();
                Ok(TypeNode::new(TypeNodeKind::Pure(name.clone()), start))
            }
            TokenKind::Star => {
                self.cursor.advance();
                let inner = ensure_sufficient_stack(|| self.parse_type())?;
                let span = start.merge(inner.span);
                Ok(TypeNode::new(TypeNodeKind::Pointer(Box::new(inner)), span))
            }
            TokenKind::LBracket => {
                self.cursor.advance();
                let length = self.parse_expr()?;
                self.expect(&TokenKind::RBracket)?;
                let element = ensure_sufficient_stack(|| self.parse_type())?;
                let span = start.merge(element.span);
                Ok(TypeNode::new(
                    TypeNodeKind::Array {
                        length: Box::new(length),
                        element: Box::new(element),
                    },
                    span,
                ))
            }
            other => Err(vec![Diagnostic::error(ErrorCode::E1005)
                .with_message(format!("expected type, found {}", other.display_name()))
                .with_label(start, "expected type")]),
        }
    }

    /// `name: type`
    pub(crate) fn parse_field(&mut self) -> Outcome<Field> {
        let name = self.expect_ident()?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;
        Ok(Field { name, ty })
    }
}
