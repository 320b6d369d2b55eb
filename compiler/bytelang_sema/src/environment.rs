//! Environment compilation: pointer widths and opcode assignment.

use bytelang_diagnostic::{
    duplicate_identifier, from_registry_error, missing_precondition, Accumulator, Diagnostic,
    ErrorCode, Outcome,
};
use bytelang_ir::{
    EnvironmentStatement, Ident, MutableRegistry, PointerKind, Program, Registry, Span,
};
use bytelang_types::{PrimitiveType, RValue};
use tracing::{debug, instrument};

use crate::checks::{check_exists, check_unique_args};
use crate::common::accept_common;
use crate::{
    CommonContext, EncodedInstructionProfile, EnvironmentBundle, InstructionProfile,
    LoadingRegistry, PackageBundle, PointerWidths, SemanticContext,
};

/// State while an environment's statements are applied.
pub struct EnvironmentContext<'c, 'p> {
    common: &'c mut CommonContext,
    packages: &'p mut dyn LoadingRegistry<PackageBundle>,
    instructions: MutableRegistry<EncodedInstructionProfile>,
    program: Option<PrimitiveType>,
    instruction: Option<PrimitiveType>,
    data: Option<PrimitiveType>,
}

impl<'c, 'p> EnvironmentContext<'c, 'p> {
    pub fn new(
        common: &'c mut CommonContext,
        packages: &'p mut dyn LoadingRegistry<PackageBundle>,
    ) -> Self {
        EnvironmentContext {
            common,
            packages,
            instructions: MutableRegistry::new("instruction"),
            program: None,
            instruction: None,
            data: None,
        }
    }

    pub fn accept(&mut self, statement: &EnvironmentStatement) -> Outcome<()> {
        match statement {
            EnvironmentStatement::Common(directive) => accept_common(directive, self),
            EnvironmentStatement::SetPointer { kind, primitive } => {
                self.set_pointer(*kind, primitive).map_err(|e| vec![e])
            }
            EnvironmentStatement::UsePackage { package, selected } => {
                self.use_package(package, selected.as_deref())
            }
        }
    }

    fn slot(&mut self, kind: PointerKind) -> &mut Option<PrimitiveType> {
        match kind {
            PointerKind::Program => &mut self.program,
            PointerKind::Instruction => &mut self.instruction,
            PointerKind::Data => &mut self.data,
        }
    }

    fn width(&self, kind: PointerKind) -> Option<PrimitiveType> {
        match kind {
            PointerKind::Program => self.program,
            PointerKind::Instruction => self.instruction,
            PointerKind::Data => self.data,
        }
    }

    fn set_pointer(&mut self, kind: PointerKind, primitive: &Ident) -> Result<(), Diagnostic> {
        let width = *check_exists(primitive, self.common.primitives())?;
        let slot = self.slot(kind);
        if let Some(previous) = slot {
            return Err(Diagnostic::error(ErrorCode::E2001)
                .with_message(format!(
                    "`.{}` is already set to `{previous}`",
                    kind.directive()
                ))
                .with_label(primitive.span, "second setting"));
        }
        *slot = Some(width);
        debug!(pointer = %kind, %width, "set pointer width");
        Ok(())
    }

    /// All three widths, or the slots still missing.
    fn pointer_widths(&self) -> Result<PointerWidths, Vec<PointerKind>> {
        match (self.program, self.instruction, self.data) {
            (Some(program), Some(instruction), Some(data)) => Ok(PointerWidths {
                program,
                instruction,
                data,
            }),
            _ => Err(PointerKind::ALL
                .into_iter()
                .filter(|kind| self.width(*kind).is_none())
                .collect()),
        }
    }

    /// Import instructions from `package`, assigning opcodes after the ones
    /// already in the table. Nothing is imported if any of them fails.
    fn use_package(&mut self, package: &Ident, selected: Option<&[Ident]>) -> Outcome<()> {
        let pointers = self
            .pointer_widths()
            .map_err(|missing| vec![missing_pointers(package.span, "`.use`", &missing)])?;
        if let Some(selected) = selected {
            check_unique_args("instruction", selected)?;
        }

        let bundle = self
            .packages
            .get_or_load(&package.name, self.common)
            .map_err(|errors| anchor_all(errors, package.span))?;

        let chosen: Vec<(&str, &InstructionProfile)> = match selected {
            None => bundle.instructions.items().collect(),
            Some(names) => {
                let mut acc = Accumulator::new();
                for name in names {
                    acc.take_one(check_exists(name, &bundle.instructions));
                }
                acc.finish(())?;
                // Package declaration order, not selection order.
                bundle
                    .instructions
                    .items()
                    .filter(|(key, _)| names.iter().any(|name| name.name == *key))
                    .collect()
            }
        };

        let base = self.instructions.len();
        let mut acc = Accumulator::new();
        let mut staged = Vec::with_capacity(chosen.len());
        for (offset, (name, profile)) in chosen.into_iter().enumerate() {
            if self.instructions.has(name) {
                acc.push(
                    duplicate_identifier(package.span, "instruction", name)
                        .with_note(format!("`{name}` is already in this environment's table")),
                );
                continue;
            }
            let opcode = base + offset;
            if let Some(code) = acc.take_one(encode_opcode(opcode, pointers.instruction, package.span)) {
                staged.push((
                    name.to_string(),
                    EncodedInstructionProfile {
                        profile: profile.bind_pointers(pointers.data),
                        opcode,
                        code,
                    },
                ));
            }
        }
        acc.finish(())?;

        for (name, encoded) in staged {
            debug!(package = %package, instruction = %name, opcode = encoded.opcode, "imported instruction");
            self.instructions
                .register(name, encoded)
                .map_err(|e| vec![from_registry_error(package.span, &e)])?;
        }
        Ok(())
    }

    pub fn into_bundle(self, name: &str) -> Result<EnvironmentBundle, Diagnostic> {
        let pointers = self.pointer_widths().map_err(|missing| {
            missing_pointers(Span::DUMMY, &format!("environment `{name}`"), &missing)
        })?;
        Ok(EnvironmentBundle {
            name: name.to_string(),
            instructions: self.instructions.into(),
            pointers,
        })
    }
}

impl SemanticContext for EnvironmentContext<'_, '_> {
    fn common(&self) -> &CommonContext {
        self.common
    }

    fn common_mut(&mut self) -> &mut CommonContext {
        self.common
    }

    fn data_pointer(&self) -> Option<PrimitiveType> {
        self.data
    }
}

fn encode_opcode(opcode: usize, width: PrimitiveType, span: Span) -> Result<Vec<u8>, Diagnostic> {
    let value = i64::try_from(opcode).unwrap_or(i64::MAX);
    width.pack(&RValue::Integer(value)).map_err(|e| {
        e.to_diagnostic()
            .anchored(span)
            .with_note(format!("opcode {opcode} does not fit the instruction pointer `{width}`"))
    })
}

fn missing_pointers(span: Span, what: &str, missing: &[PointerKind]) -> Diagnostic {
    let names: Vec<_> = missing
        .iter()
        .map(|kind| format!("`.{}`", kind.directive()))
        .collect();
    missing_precondition(span, format!("{what} requires all three pointer widths"))
        .with_note(format!("missing {}", names.join(", ")))
}

pub(crate) fn anchor_all(errors: Vec<Diagnostic>, span: Span) -> Vec<Diagnostic> {
    errors.into_iter().map(|e| e.anchored(span)).collect()
}

/// Compile a parsed environment, loading the packages it uses.
///
/// On failure `common` and `packages` are left as they were on entry.
#[instrument(level = "debug", skip_all, fields(environment = name))]
pub fn compile_environment(
    name: &str,
    program: &Program<EnvironmentStatement>,
    common: &mut CommonContext,
    packages: &mut dyn LoadingRegistry<PackageBundle>,
) -> Outcome<EnvironmentBundle> {
    let checkpoint = packages.checkpoint();
    let result = common.staged(|common| {
        let mut ctx = EnvironmentContext::new(common, &mut *packages);
        let mut acc = Accumulator::new();
        for statement in &program.statements {
            acc.take(ctx.accept(statement));
        }
        acc.finish(())?;
        ctx.into_bundle(name).map_err(|e| vec![e])
    });
    if result.is_err() {
        packages.rollback(&checkpoint);
    }
    result
}
