//! Package compilation.

use bytelang_diagnostic::{from_registry_error, Accumulator, Outcome};
use bytelang_ir::{Field, Ident, MutableRegistry, PackageStatement, Program};
use tracing::{debug, instrument};

use crate::checks::check_unique;
use crate::common::{accept_common, resolve_fields};
use crate::{CommonContext, InstructionProfile, PackageBundle, SemanticContext};

/// State while a package's statements are applied.
pub struct PackageContext<'c> {
    common: &'c mut CommonContext,
    instructions: MutableRegistry<InstructionProfile>,
}

impl<'c> PackageContext<'c> {
    pub fn new(common: &'c mut CommonContext) -> Self {
        PackageContext {
            common,
            instructions: MutableRegistry::new("instruction"),
        }
    }

    pub fn accept(&mut self, statement: &PackageStatement) -> Outcome<()> {
        match statement {
            PackageStatement::Common(directive) => accept_common(directive, self),
            PackageStatement::Instruction { name, fields } => self.declare(name, fields),
        }
    }

    fn declare(&mut self, name: &Ident, fields: &[Field]) -> Outcome<()> {
        check_unique(name, &self.instructions).map_err(|e| vec![e])?;
        let profile = InstructionProfile {
            fields: resolve_fields(fields, &*self)?,
        };
        debug!(name = %name, signature = %profile, "declared instruction");
        self.instructions
            .register(name.name.clone(), profile)
            .map_err(|e| vec![from_registry_error(name.span, &e)])
    }

    pub fn into_bundle(self, name: &str) -> PackageBundle {
        PackageBundle {
            name: name.to_string(),
            instructions: self.instructions.into(),
        }
    }
}

impl SemanticContext for PackageContext<'_> {
    fn common(&self) -> &CommonContext {
        self.common
    }

    fn common_mut(&mut self) -> &mut CommonContext {
        self.common
    }
}

/// Compile a parsed package. Every statement is checked even after a failure,
/// and `common` only keeps the package's definitions if it compiles.
#[instrument(level = "debug", skip_all, fields(package = name))]
pub fn compile_package(
    name: &str,
    program: &Program<PackageStatement>,
    common: &mut CommonContext,
) -> Outcome<PackageBundle> {
    common.staged(|common| {
        let mut ctx = PackageContext::new(common);
        let mut acc = Accumulator::new();
        for statement in &program.statements {
            acc.take(ctx.accept(statement));
        }
        acc.finish_with(|| ctx.into_bundle(name))
    })
}
