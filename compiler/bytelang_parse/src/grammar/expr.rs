//! Expression parsing.
//!
//! Binary operators use precedence climbing over [`Operator::precedence`];
//! all operators are left-associative. Prefix operators bind tighter than
//! any infix operator.

use bytelang_diagnostic::{expected_expression, unclosed_delimiter, Outcome};
use bytelang_ir::{Expr, ExprKind, Ident, Literal, Operator, TokenKind};
use bytelang_stack::ensure_sufficient_stack;

use crate::Parser;

/// Map an operator token to its operator.
fn operator(kind: &TokenKind) -> Option<Operator> {
    match kind {
        TokenKind::Plus => Some(Operator::Plus),
        TokenKind::Minus => Some(Operator::Minus),
        TokenKind::Star => Some(Operator::Star),
        TokenKind::Slash => Some(Operator::Slash),
        _ => None,
    }
}

impl Parser<'_> {
    /// Parse a full expression.
    pub(crate) fn parse_expr(&mut self) -> Outcome<Expr> {
        self.parse_binary(1)
    }

    /// Parse operators binding at least as tightly as `min_precedence`.
    fn parse_binary(&mut self, min_precedence: u8) -> Outcome<Expr> {
        ensure_sufficient_stack(|| {
            let mut left = self.parse_unary()?;

            while let Some(op) = operator(self.cursor.current_kind()) {
                if op.precedence() < min_precedence {
                    break;
                }
                self.cursor.advance();
                let right = self.parse_binary(op.precedence() + 1)?;
                left = Expr::binary(op, left, right);
            }

            Ok(left)
        })
    }

    fn parse_unary(&mut self) -> Outcome<Expr> {
        let Some(op) = operator(self.cursor.current_kind()) else {
            return self.parse_primary();
        };
        let start = self.cursor.advance().span;
        let operand = ensure_sufficient_stack(|| self.parse_unary())?;
        let span = start.merge(operand.span);
        Ok(Expr::unary(op, operand, span))
    }

    fn parse_primary(&mut self) -> Outcome<Expr> {
        let start = self.cursor.current_span();
        let literal = match self.cursor.current_kind() {
            TokenKind::Int(n) => Some(Literal::Integer(*n)),
            TokenKind::Float(bits) => Some(Literal::Float(f64::from_bits(*bits))),
            TokenKind::Char(c) => Some(Literal::Char(*c)),
            TokenKind::String(s) => Some(Literal::Str(s.clone())),
            _ => None,
        };
        if let Some(literal) = literal {
            self.cursor.advance();
            return Ok(Expr::literal(literal, start));
        }

        match self.cursor.current_kind() {
            TokenKind::Ident(name) => {
                self.cursor.advance();
                Ok(Expr::ident(name.clone(), start))
            }
            TokenKind::MacroCall(name) => {
                self.cursor.advance();
                let name = Ident::new(name.clone(), start);
                let args = self.bracketed(TokenKind::LParen, TokenKind::RParen, |p| {
                    p.parse_expr()
                })?;
                let span = start.merge(self.cursor.previous_span());
                Ok(Expr::new(ExprKind::MacroCall { name, args }, span))
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.parse_expr()?;
                if !self.cursor.check(&TokenKind::RParen) {
                    let found = self.cursor.current_span();
                    return Err(vec![if self.cursor.check_statement_end() {
                        unclosed_delimiter(start, found, '(')
                    } else {
                        self.cursor.make_expect_error(TokenKind::RParen.display_name())
                    }]);
                }
                let end = self.cursor.advance().span;
                Ok(Expr::new(inner.kind, start.merge(end)))
            }
            TokenKind::LBrace => {
                let items = self.bracketed(TokenKind::LBrace, TokenKind::RBrace, |p| {
                    p.parse_expr()
                })?;
                let span = start.merge(self.cursor.previous_span());
                Ok(Expr::new(ExprKind::InitializerList(items), span))
            }
            other => Err(vec![expected_expression(start, other.display_name())]),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bytelang_diagnostic::ErrorCode;
    use bytelang_ir::TokenList;
    use pretty_assertions::assert_eq;

    use super::*;

    fn tokens(source: &str) -> TokenList {
        bytelang_lexer::tokenize(source).unwrap()
    }

    fn expr(source: &str) -> Expr {
        let list = tokens(source);
        let mut p = Parser::new(&list);
        let e = p.parse_expr().unwrap();
        assert!(p.cursor.is_at_end(), "trailing input after `{source}`");
        e
    }

    fn expr_err(source: &str) -> Vec<bytelang_diagnostic::Diagnostic> {
        let list = tokens(source);
        Parser::new(&list).parse_expr().unwrap_err()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(expr("1 + 2 * 3").to_string(), "(1 + (2 * 3))");
        assert_eq!(expr("1 * 2 + 3").to_string(), "((1 * 2) + 3)");
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(expr("8 - 4 - 2").to_string(), "((8 - 4) - 2)");
        assert_eq!(expr("8 / 4 / 2").to_string(), "((8 / 4) / 2)");
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(expr("(1 + 2) * 3").to_string(), "((1 + 2) * 3)");
    }

    #[test]
    fn test_unary_binds_tighter() {
        let e = expr("-a * 2");
        assert_eq!(e.to_string(), "(-a * 2)");
        let ExprKind::Binary { left, .. } = e.kind else {
            panic!("expected binary");
        };
        assert!(matches!(
            left.kind,
            ExprKind::Unary {
                op: Operator::Minus,
                ..
            }
        ));
    }

    #[test]
    fn test_literals() {
        assert_eq!(expr("4").kind, ExprKind::Literal(Literal::Integer(4)));
        assert_eq!(expr("2.5").kind, ExprKind::Literal(Literal::Float(2.5)));
        assert_eq!(expr("'A'").kind, ExprKind::Literal(Literal::Char('A')));
        assert_eq!(
            expr("\"hi\"").kind,
            ExprKind::Literal(Literal::Str("hi".into()))
        );
    }

    #[test]
    fn test_macro_call() {
        let e = expr("@add(2, x)");
        assert_eq!(e.to_string(), "@add(2, x)");
        assert_eq!(e.span, bytelang_ir::Span::new(0, 10));
    }

    #[test]
    fn test_macro_call_without_args() {
        assert_eq!(expr("@zero()").to_string(), "@zero()");
    }

    #[test]
    fn test_initializer_list() {
        let e = expr("{1, {2, 3}, N}");
        assert_eq!(e.to_string(), "{1, {2, 3}, N}");
        assert!(matches!(e.kind, ExprKind::InitializerList(ref items) if items.len() == 3));
    }

    #[test]
    fn test_expected_expression() {
        let errors = expr_err(", 1");
        assert_eq!(errors[0].code, ErrorCode::E1002);
    }

    #[test]
    fn test_unclosed_paren() {
        let errors = expr_err("(1 + 2\n");
        assert_eq!(errors[0].code, ErrorCode::E1003);
    }

    #[test]
    fn test_macro_args_accumulate_errors() {
        let errors = expr_err("@f(, 1, ,)");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_deep_nesting() {
        let source = format!("{}1{}", "(".repeat(2000), ")".repeat(2000));
        assert_eq!(expr(&source).kind, ExprKind::Literal(Literal::Integer(1)));
    }
}
