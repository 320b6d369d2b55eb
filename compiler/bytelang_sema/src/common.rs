//! Handlers for the directives every unit kind accepts.

use bytelang_diagnostic::{from_registry_error, Accumulator, Outcome};
use bytelang_ir::{CommonDirective, Field, Ident, MutableRegistry, Program};
use bytelang_types::TypeProfile;
use tracing::{debug, instrument};

use crate::checks::{check_unique, check_unique_args};
use crate::eval::{evaluate, resolve_type};
use crate::macros::check_acyclic;
use crate::{CommonContext, MacroProfile, SemanticContext};

/// Apply a common-only unit to `common`, all or nothing.
#[instrument(level = "debug", skip_all)]
pub fn compile_common(program: &Program<CommonDirective>, common: &mut CommonContext) -> Outcome<()> {
    common.staged(|common| {
        let mut acc = Accumulator::new();
        for directive in &program.statements {
            acc.take(accept_common(directive, common));
        }
        acc.finish(())
    })
}

/// Apply one common directive to the shared registries.
///
/// Nothing is registered unless the whole directive checks out.
pub fn accept_common<C: SemanticContext + ?Sized>(
    directive: &CommonDirective,
    ctx: &mut C,
) -> Outcome<()> {
    match directive {
        CommonDirective::Const { name, value } => {
            check_unique(name, &ctx.common().constants).map_err(|e| vec![e])?;
            let value = evaluate(value, &*ctx)?;
            debug!(name = %name, %value, "defined constant");
            define(&mut ctx.common_mut().constants, name, value)
        }
        CommonDirective::Struct { name, fields } => {
            check_unique(name, &ctx.common().types).map_err(|e| vec![e])?;
            let fields = resolve_fields(fields, &*ctx)?;
            let profile = TypeProfile::Struct {
                name: name.name.clone(),
                fields,
            };
            debug!(name = %name, size = ?profile.size(), "defined struct");
            define(&mut ctx.common_mut().types, name, profile)
        }
        CommonDirective::Macro { name, params, body } => {
            let profile = MacroProfile::new(params.clone(), body.clone());
            let mut acc = Accumulator::new();
            acc.take_one(check_unique(name, &ctx.common().macros));
            acc.take(check_unique_args("parameter", params));
            acc.take_one(check_acyclic(name, &profile, &ctx.common().macros));
            acc.finish(())?;
            debug!(name = %name, arity = params.len(), "defined macro");
            define(&mut ctx.common_mut().macros, name, profile)
        }
        CommonDirective::TypeAlias { name, ty } => {
            check_unique(name, &ctx.common().types).map_err(|e| vec![e])?;
            let profile = resolve_type(ty, &*ctx)?;
            debug!(name = %name, target = %profile, "defined type alias");
            define(&mut ctx.common_mut().types, name, profile)
        }
    }
}

/// Resolve `name: type` pairs in order, rejecting repeated names.
pub(crate) fn resolve_fields<C: SemanticContext + ?Sized>(
    fields: &[Field],
    ctx: &C,
) -> Outcome<Vec<(String, TypeProfile)>> {
    let mut acc = Accumulator::new();
    acc.take(check_unique_args("field", fields.iter().map(|f| &f.name)));
    let resolved: Vec<_> = fields
        .iter()
        .filter_map(|field| {
            acc.take(resolve_type(&field.ty, ctx))
                .map(|ty| (field.name.name.clone(), ty))
        })
        .collect();
    acc.finish(resolved)
}

fn define<V>(registry: &mut MutableRegistry<V>, name: &Ident, value: V) -> Outcome<()> {
    registry
        .register(name.name.clone(), value)
        .map_err(|e| vec![from_registry_error(name.span, &e)])
}
