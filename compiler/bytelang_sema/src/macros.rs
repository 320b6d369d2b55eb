//! Expression macros.

use bytelang_diagnostic::{arity_mismatch, Diagnostic, ErrorCode};
use bytelang_ir::{Expr, ExprKind, Ident, Registry, Span};
use bytelang_stack::ensure_sufficient_stack;
use rustc_hash::{FxHashMap, FxHashSet};

/// A `.macro` definition: parameters and the template they are spliced into.
#[derive(Clone, Debug, PartialEq)]
pub struct MacroProfile {
    pub params: Vec<Ident>,
    pub template: Expr,
}

impl MacroProfile {
    pub fn new(params: Vec<Ident>, template: Expr) -> Self {
        MacroProfile { params, template }
    }

    /// Substitute `args` for the parameters in a copy of the template.
    ///
    /// Arguments are spliced as unevaluated trees and keep their call-site
    /// spans. Names that are not parameters are left for evaluation.
    pub fn expand(&self, name: &str, args: &[Expr], call_span: Span) -> Result<Expr, Diagnostic> {
        if args.len() != self.params.len() {
            return Err(arity_mismatch(
                call_span,
                &format!("macro `{name}`"),
                self.params.len(),
                args.len(),
            ));
        }
        let bindings: FxHashMap<&str, &Expr> = self
            .params
            .iter()
            .map(|param| param.name.as_str())
            .zip(args)
            .collect();
        Ok(substitute(&self.template, &bindings))
    }

    /// Macro calls in the template, argument lists included, in source order.
    pub fn calls(&self) -> Vec<&Ident> {
        let mut calls = Vec::new();
        collect_calls(&self.template, &mut calls);
        calls
    }
}

fn collect_calls<'e>(expr: &'e Expr, calls: &mut Vec<&'e Ident>) {
    ensure_sufficient_stack(|| match &expr.kind {
        ExprKind::Ident(_) | ExprKind::Literal(_) => {}
        ExprKind::Unary { operand, .. } => collect_calls(operand, calls),
        ExprKind::Binary { left, right, .. } => {
            collect_calls(left, calls);
            collect_calls(right, calls);
        }
        ExprKind::MacroCall { name, args } => {
            calls.push(name);
            for arg in args {
                collect_calls(arg, calls);
            }
        }
        ExprKind::InitializerList(items) => {
            for item in items {
                collect_calls(item, calls);
            }
        }
    })
}

/// Reject a definition of `name` whose expansion would reach `name` again.
///
/// Templates have no conditionals, so any such path recurses forever.
/// Macros not defined yet are skipped; they are checked when they are.
pub fn check_acyclic(
    name: &Ident,
    profile: &MacroProfile,
    macros: &dyn Registry<MacroProfile>,
) -> Result<(), Diagnostic> {
    let mut visited = FxHashSet::default();
    for call in profile.calls() {
        let mut path = Vec::new();
        if reaches(&call.name, &name.name, macros, &mut visited, &mut path) {
            let mut diagnostic = Diagnostic::error(ErrorCode::E2009)
                .with_message(format!("macro `{name}` expands to itself"))
                .with_label(call.span, "recursive call");
            if !path.is_empty() {
                path.insert(0, name.name.clone());
                path.push(name.name.clone());
                let cycle = path.join(" -> ");
                diagnostic = diagnostic.with_note(format!("expansion cycle: {cycle}"));
            }
            return Err(diagnostic);
        }
    }
    Ok(())
}

/// Whether expanding `from` can call `target`. On success `path` holds the
/// macros passed through, `from` first.
fn reaches(
    from: &str,
    target: &str,
    macros: &dyn Registry<MacroProfile>,
    visited: &mut FxHashSet<String>,
    path: &mut Vec<String>,
) -> bool {
    if from == target {
        return true;
    }
    if !visited.insert(from.to_string()) {
        return false;
    }
    let Ok(profile) = macros.get(from) else {
        return false;
    };
    path.push(from.to_string());
    let found = ensure_sufficient_stack(|| {
        profile
            .calls()
            .into_iter()
            .any(|call| reaches(&call.name, target, macros, visited, path))
    });
    if !found {
        path.pop();
    }
    found
}

fn substitute(expr: &Expr, bindings: &FxHashMap<&str, &Expr>) -> Expr {
    ensure_sufficient_stack(|| match &expr.kind {
        ExprKind::Ident(name) => bindings
            .get(name.as_str())
            .map_or_else(|| expr.clone(), |arg| (*arg).clone()),
        ExprKind::Literal(_) => expr.clone(),
        ExprKind::Unary { op, operand } => {
            Expr::unary(*op, substitute(operand, bindings), expr.span)
        }
        ExprKind::Binary { op, left, right } => Expr::new(
            ExprKind::Binary {
                op: *op,
                left: Box::new(substitute(left, bindings)),
                right: Box::new(substitute(right, bindings)),
            },
            expr.span,
        ),
        ExprKind::MacroCall { name, args } => Expr::new(
            ExprKind::MacroCall {
                name: name.clone(),
                args: args.iter().map(|arg| substitute(arg, bindings)).collect(),
            },
            expr.span,
        ),
        ExprKind::InitializerList(items) => Expr::new(
            ExprKind::InitializerList(items.iter().map(|item| substitute(item, bindings)).collect()),
            expr.span,
        ),
    })
}
