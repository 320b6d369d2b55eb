//! Constant evaluation and type resolution.
//!
//! Both walk the tree recursively under `ensure_sufficient_stack`. Errors
//! in independent operands and list items are collected together.

use bytelang_diagnostic::{undefined_identifier, Accumulator, Diagnostic, ErrorCode, Outcome};
use bytelang_ir::{Expr, ExprKind, Literal, Registry, Span, TypeNode, TypeNodeKind};
use bytelang_stack::ensure_sufficient_stack;
use bytelang_types::{RValue, TypeProfile};
use tracing::trace;

use crate::checks::check_exists;
use crate::{SemanticContext, MACRO_DEPTH_LIMIT};

/// Evaluate `expr` to a value.
pub fn evaluate<C: SemanticContext + ?Sized>(expr: &Expr, ctx: &C) -> Outcome<RValue> {
    eval_at(expr, ctx, 0)
}

fn eval_at<C: SemanticContext + ?Sized>(expr: &Expr, ctx: &C, depth: usize) -> Outcome<RValue> {
    ensure_sufficient_stack(|| match &expr.kind {
        ExprKind::Literal(lit) => Ok(literal_value(lit)),
        ExprKind::Ident(name) => resolve_value(name, expr.span, ctx).map_err(|e| vec![e]),
        ExprKind::Unary { op, operand } => {
            let value = eval_at(operand, ctx, depth)?;
            value
                .apply_unary(*op)
                .map_err(|e| vec![e.to_diagnostic().anchored(expr.span)])
        }
        ExprKind::Binary { op, left, right } => {
            let mut acc = Accumulator::new();
            let left = acc.take(eval_at(left, ctx, depth));
            let right = acc.take(eval_at(right, ctx, depth));
            match (left, right) {
                (Some(left), Some(right)) => left
                    .apply_binary(&right, *op)
                    .map_err(|e| vec![e.to_diagnostic().anchored(expr.span)]),
                _ => acc.fail(),
            }
        }
        ExprKind::MacroCall { name, args } => {
            if depth >= MACRO_DEPTH_LIMIT {
                return Err(vec![Diagnostic::error(ErrorCode::E2009)
                    .with_message(format!(
                        "macro expansion of `{name}` exceeds the depth limit of {MACRO_DEPTH_LIMIT}"
                    ))
                    .with_label(expr.span, "expanded here")
                    .with_note("a macro that calls itself never terminates")]);
            }
            let profile = check_exists(name, &ctx.common().macros).map_err(|e| vec![e])?;
            let expanded = profile
                .expand(&name.name, args, expr.span)
                .map_err(|e| vec![e])?;
            trace!(name = %name, depth, expansion = %expanded, "expanded macro");
            eval_at(&expanded, ctx, depth + 1)
        }
        ExprKind::InitializerList(items) => {
            let mut acc = Accumulator::new();
            let values: Vec<_> = items
                .iter()
                .filter_map(|item| acc.take(eval_at(item, ctx, depth)))
                .collect();
            acc.finish(RValue::InitializerList(values))
        }
    })
}

/// Constants first, then whatever the unit itself defines.
fn resolve_value<C: SemanticContext + ?Sized>(
    name: &str,
    span: Span,
    ctx: &C,
) -> Result<RValue, Diagnostic> {
    if let Ok(value) = ctx.common().constants.get(name) {
        return Ok(value.clone());
    }
    ctx.lookup_value(name)
        .ok_or_else(|| undefined_identifier(span, "constant", name))
}

fn literal_value(lit: &Literal) -> RValue {
    match lit {
        Literal::Integer(n) => RValue::Integer(*n),
        Literal::Float(x) => RValue::Float(*x),
        Literal::Char(c) => RValue::Integer(i64::from(u32::from(*c))),
        Literal::Str(s) => {
            RValue::InitializerList(s.bytes().map(|b| RValue::Integer(i64::from(b))).collect())
        }
    }
}

/// Resolve a written type against the context's type registry.
///
/// Pointers bind to the context's data pointer when it has one.
pub fn resolve_type<C: SemanticContext + ?Sized>(node: &TypeNode, ctx: &C) -> Outcome<TypeProfile> {
    let profile = resolve_unbound(node, ctx)?;
    Ok(match ctx.data_pointer() {
        Some(width) => profile.bind_pointers(width),
        None => profile,
    })
}

fn resolve_unbound<C: SemanticContext + ?Sized>(node: &TypeNode, ctx: &C) -> Outcome<TypeProfile> {
    ensure_sufficient_stack(|| match &node.kind {
        TypeNodeKind::Pure(name) => ctx
            .common()
            .types
            .get(name)
            .cloned()
            .map_err(|_| vec![undefined_identifier(node.span, "type", name)]),
        TypeNodeKind::Pointer(target) => Ok(TypeProfile::pointer(resolve_unbound(target, ctx)?)),
        TypeNodeKind::Array { length, element } => {
            let mut acc = Accumulator::new();
            let length = acc.take(evaluate(length, ctx)).and_then(|value| {
                acc.take_one(array_length(&value, length.span))
            });
            let element = acc.take(resolve_unbound(element, ctx));
            match (length, element) {
                (Some(length), Some(element)) => Ok(TypeProfile::array(element, length)),
                _ => acc.fail(),
            }
        }
    })
}

fn array_length(value: &RValue, span: Span) -> Result<usize, Diagnostic> {
    let RValue::Integer(n) = value else {
        return Err(Diagnostic::error(ErrorCode::E2004)
            .with_message(format!("array length must be an integer, found {}", value.kind_name()))
            .with_label(span, "not an integer"));
    };
    match usize::try_from(*n) {
        Ok(length) if length >= 1 => Ok(length),
        _ => Err(Diagnostic::error(ErrorCode::E2011)
            .with_message(format!("array length must be at least 1, got {n}"))
            .with_label(span, "invalid length")),
    }
}
