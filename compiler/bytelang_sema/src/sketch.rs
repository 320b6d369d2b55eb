//! Sketch compilation: instruction calls become code bytes and variables
//! become data bytes.

use bytelang_diagnostic::{
    arity_mismatch, from_registry_error, missing_precondition, Accumulator, Diagnostic, ErrorCode,
    Outcome,
};
use bytelang_ir::{
    Expr, Ident, MutableRegistry, Program, Registry, SketchStatement, Span, TypeNode,
};
use bytelang_types::{PrimitiveType, RValue};
use tracing::{debug, instrument, trace};

use crate::checks::{check_exists, check_unique};
use crate::common::accept_common;
use crate::environment::anchor_all;
use crate::eval::{evaluate, resolve_type};
use crate::{
    CommonContext, EnvironmentBundle, LoadingRegistry, ResolvedCall, SemanticContext,
    SketchBundle, Variable,
};

/// State while a sketch's statements are applied.
pub struct SketchContext<'c, 'e> {
    common: &'c mut CommonContext,
    environments: &'e mut dyn LoadingRegistry<EnvironmentBundle>,
    environment: Option<EnvironmentBundle>,
    marks: MutableRegistry<RValue>,
    variables: MutableRegistry<Variable>,
    calls: Vec<ResolvedCall>,
    code: Vec<u8>,
    data: Vec<u8>,
}

impl<'c, 'e> SketchContext<'c, 'e> {
    pub fn new(
        common: &'c mut CommonContext,
        environments: &'e mut dyn LoadingRegistry<EnvironmentBundle>,
    ) -> Self {
        SketchContext {
            common,
            environments,
            environment: None,
            marks: MutableRegistry::new("mark"),
            variables: MutableRegistry::new("variable"),
            calls: Vec::new(),
            code: Vec::new(),
            data: Vec::new(),
        }
    }

    pub fn accept(&mut self, statement: &SketchStatement) -> Outcome<()> {
        match statement {
            SketchStatement::Common(directive) => accept_common(directive, self),
            SketchStatement::SelectEnvironment(name) => self.select_environment(name),
            SketchStatement::Mark(name) => self.mark(name).map_err(|e| vec![e]),
            SketchStatement::Variable { name, ty, value } => self.variable(name, ty, value),
            SketchStatement::InstructionCall { name, args } => self.call(name, args),
        }
    }

    fn select_environment(&mut self, name: &Ident) -> Outcome<()> {
        if let Some(current) = &self.environment {
            return Err(vec![Diagnostic::error(ErrorCode::E2001)
                .with_message(format!(
                    "environment `{}` is already selected",
                    current.name
                ))
                .with_label(name.span, "second selection")]);
        }
        let bundle = self
            .environments
            .get_or_load(&name.name, self.common)
            .map_err(|errors| anchor_all(errors, name.span))?;
        debug!(
            environment = %name,
            instructions = bundle.instructions.len(),
            "selected environment"
        );
        self.environment = Some(bundle.clone());
        Ok(())
    }

    fn require_environment(&self, span: Span, what: &str) -> Result<&EnvironmentBundle, Diagnostic> {
        self.environment.as_ref().ok_or_else(|| {
            missing_precondition(span, format!("{what} requires an environment"))
                .with_suggestion("select one with `.env <name>` first")
        })
    }

    fn mark(&mut self, name: &Ident) -> Result<(), Diagnostic> {
        check_unique(name, &self.marks)?;
        let offset = offset_value(self.code.len(), name.span)?;
        debug!(mark = %name, %offset, "placed mark");
        self.marks
            .register(name.name.clone(), offset)
            .map_err(|e| from_registry_error(name.span, &e))
    }

    fn variable(&mut self, name: &Ident, ty: &TypeNode, value: &Expr) -> Outcome<()> {
        self.require_environment(name.span, "`.var`")
            .map_err(|e| vec![e])?;
        check_unique(name, &self.variables).map_err(|e| vec![e])?;

        let mut acc = Accumulator::new();
        let ty = acc.take(resolve_type(ty, &*self));
        let value = acc.take(evaluate(value, &*self)).map(|v| (v, value.span));
        let (Some(ty), Some((value, value_span))) = (ty, value) else {
            return acc.fail();
        };
        let bytes = ty
            .pack(&value)
            .map_err(|errors| anchor_all(errors, value_span))?;

        let address = self.data.len();
        self.data.extend_from_slice(&bytes);
        debug!(variable = %name, %ty, address, size = bytes.len(), "placed variable");
        self.variables
            .register(name.name.clone(), Variable { ty, address, bytes })
            .map_err(|e| vec![from_registry_error(name.span, &e)])
    }

    fn call(&mut self, name: &Ident, args: &[Expr]) -> Outcome<()> {
        let environment = self
            .require_environment(name.span, "an instruction call")
            .map_err(|e| vec![e])?;
        let encoded = check_exists(name, &environment.instructions)
            .map_err(|e| vec![e])?
            .clone();
        if args.len() != encoded.profile.arity() {
            return Err(vec![arity_mismatch(
                name.span,
                &format!("instruction `{name}`"),
                encoded.profile.arity(),
                args.len(),
            )]);
        }

        let mut acc = Accumulator::new();
        let mut bytes = encoded.code.clone();
        for (arg, (field, ty)) in args.iter().zip(&encoded.profile.fields) {
            let Some(value) = acc.take(evaluate(arg, &*self)) else {
                continue;
            };
            let packed = ty.pack(&value).map_err(|errors| {
                errors
                    .into_iter()
                    .map(|e| e.anchored(arg.span).with_note(format!("for argument `{field}: {ty}`")))
                    .collect::<Vec<_>>()
            });
            if let Some(packed) = acc.take(packed) {
                bytes.extend(packed);
            }
        }
        acc.finish(())?;

        let offset = self.code.len();
        self.code.extend_from_slice(&bytes);
        trace!(instruction = %name, opcode = encoded.opcode, offset, ?bytes, "encoded call");
        self.calls.push(ResolvedCall {
            instruction: name.name.clone(),
            opcode: encoded.opcode,
            offset,
            bytes,
            span: name.span,
        });
        Ok(())
    }

    pub fn into_bundle(self) -> SketchBundle {
        SketchBundle {
            environment: self.environment.map(|env| env.name),
            calls: self.calls,
            code: self.code,
            marks: self.marks.into(),
            variables: self.variables.into(),
            data: self.data,
        }
    }
}

impl SemanticContext for SketchContext<'_, '_> {
    fn common(&self) -> &CommonContext {
        self.common
    }

    fn common_mut(&mut self) -> &mut CommonContext {
        self.common
    }

    fn data_pointer(&self) -> Option<PrimitiveType> {
        self.environment.as_ref().map(|env| env.pointers.data)
    }

    /// Marks evaluate to their code offset and variables to their address.
    fn lookup_value(&self, name: &str) -> Option<RValue> {
        if let Ok(mark) = self.marks.get(name) {
            return Some(mark.clone());
        }
        let variable = self.variables.get(name).ok()?;
        i64::try_from(variable.address).ok().map(RValue::Integer)
    }
}

fn offset_value(offset: usize, span: Span) -> Result<RValue, Diagnostic> {
    i64::try_from(offset).map(RValue::Integer).map_err(|_| {
        Diagnostic::error(ErrorCode::E2010)
            .with_message(format!("code offset {offset} does not fit an integer"))
            .with_label(span, "mark placed here")
    })
}

/// Compile a parsed sketch, loading the environment it selects.
///
/// On failure `common` and `environments` are left as they were on entry.
#[instrument(level = "debug", skip_all)]
pub fn compile_sketch(
    program: &Program<SketchStatement>,
    common: &mut CommonContext,
    environments: &mut dyn LoadingRegistry<EnvironmentBundle>,
) -> Outcome<SketchBundle> {
    let checkpoint = environments.checkpoint();
    let result = common.staged(|common| {
        let mut ctx = SketchContext::new(common, &mut *environments);
        let mut acc = Accumulator::new();
        for statement in &program.statements {
            acc.take(ctx.accept(statement));
        }
        acc.finish_with(|| ctx.into_bundle())
    });
    if result.is_err() {
        environments.rollback(&checkpoint);
    }
    result
}
