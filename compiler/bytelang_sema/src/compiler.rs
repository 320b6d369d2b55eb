//! Whole-pipeline entry point for sketches.

use bytelang_diagnostic::Outcome;
use bytelang_ir::{Program, SketchStatement};
use bytelang_lexer::tokenize;
use bytelang_parse::parse_sketch;
use tracing::instrument;

use crate::{
    compile_sketch, CommonContext, EnvironmentBundle, EnvironmentRegistry, LoadingRegistry,
    PackageBundle, SketchBundle, SourceCatalog,
};

/// Compiles sketches against catalogs of environments and packages.
///
/// One common context and one set of loaded units is shared by every
/// sketch compiled through the same instance.
pub struct SketchCompiler {
    common: CommonContext,
    environments: EnvironmentRegistry,
}

impl SketchCompiler {
    pub fn new(
        environments: impl SourceCatalog + 'static,
        packages: impl SourceCatalog + 'static,
    ) -> Self {
        SketchCompiler {
            common: CommonContext::new(),
            environments: EnvironmentRegistry::from_catalogs(environments, packages),
        }
    }

    pub fn common(&self) -> &CommonContext {
        &self.common
    }

    pub fn environments(&self) -> &EnvironmentRegistry {
        &self.environments
    }

    /// Source text to bytes.
    #[instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn compile(&mut self, source: &str) -> Outcome<SketchBundle> {
        let tokens = tokenize(source)?;
        let program = parse_sketch(&tokens)?;
        self.compile_program(&program)
    }

    pub fn compile_program(&mut self, program: &Program<SketchStatement>) -> Outcome<SketchBundle> {
        compile_sketch(program, &mut self.common, &mut self.environments)
    }

    /// Load an environment, and the packages it uses, through the shared
    /// registries.
    pub fn environment(&mut self, key: &str) -> Outcome<&EnvironmentBundle> {
        self.environments.get_or_load(key, &mut self.common)
    }

    /// Load a package through the shared registries.
    pub fn package(&mut self, key: &str) -> Outcome<&PackageBundle> {
        self.environments
            .loader_mut()
            .packages_mut()
            .get_or_load(key, &mut self.common)
    }
}
