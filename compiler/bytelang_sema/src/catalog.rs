//! Lazy loading of packages and environments by key.
//!
//! A [`CatalogRegistry`] answers lookups from its cache and, on a miss,
//! asks its [`UnitLoader`] to read the unit's source from a
//! [`SourceCatalog`] and compile it. Only successful loads are cached.

use bytelang_diagnostic::{from_registry_error, Diagnostic, ErrorCode, Outcome};
use bytelang_ir::{Items, MutableRegistry, Registry, RegistryError, Span};
use bytelang_lexer::tokenize;
use bytelang_parse::{parse_environment, parse_package};
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use crate::{compile_environment, compile_package, CommonContext, EnvironmentBundle, PackageBundle};

/// Where unit sources come from.
pub trait SourceCatalog {
    /// Read the source text stored under `key`.
    ///
    /// Failures are [`ErrorCode::E3001`] diagnostics without a location.
    fn open(&self, key: &str) -> Result<String, Diagnostic>;
}

/// E3001 for a key the catalog does not hold.
pub fn catalog_not_found(kind: &str, key: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E3001).with_message(format!("{kind} `{key}` not found"))
}

/// E3002 wrapping the diagnostics of a unit that failed to compile.
pub fn dependency_failed(kind: &str, key: &str, errors: &[Diagnostic]) -> Diagnostic {
    let mut diagnostic = Diagnostic::error(ErrorCode::E3002)
        .with_message(format!("{kind} `{key}` failed to compile"));
    for error in errors {
        diagnostic = diagnostic.with_note(format!("{}: {}", error.code.as_str(), error.message));
    }
    diagnostic
}

/// In-memory catalog, keyed by unit name.
#[derive(Clone, Debug)]
pub struct MemoryCatalog {
    kind: &'static str,
    sources: FxHashMap<String, String>,
}

impl MemoryCatalog {
    pub fn new(kind: &'static str) -> Self {
        MemoryCatalog {
            kind,
            sources: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, key: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(key, source);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, source: impl Into<String>) {
        self.sources.insert(key.into(), source.into());
    }
}

impl SourceCatalog for MemoryCatalog {
    fn open(&self, key: &str) -> Result<String, Diagnostic> {
        self.sources
            .get(key)
            .cloned()
            .ok_or_else(|| catalog_not_found(self.kind, key))
    }
}

/// Cache sizes of a registry followed by those of the registries its
/// loader owns, outermost first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadCheckpoint(Vec<usize>);

/// Turns a key into a compiled unit.
pub trait UnitLoader<B> {
    fn load(&mut self, key: &str, common: &mut CommonContext) -> Outcome<B>;

    /// Cache state of any registries the loader owns.
    fn checkpoint(&self) -> LoadCheckpoint {
        LoadCheckpoint::default()
    }

    /// Drop whatever the owned registries cached since `checkpoint`.
    fn rollback(&mut self, _checkpoint: &LoadCheckpoint) {}
}

/// A registry that can fill its own misses.
pub trait LoadingRegistry<B>: Registry<B> {
    /// The cached bundle for `key`, loading it first if needed.
    ///
    /// Errors carry no location; callers anchor them at the reference.
    fn get_or_load(&mut self, key: &str, common: &mut CommonContext) -> Outcome<&B>;

    /// Record what is cached now, nested registries included.
    fn checkpoint(&self) -> LoadCheckpoint;

    /// Forget every unit loaded after `checkpoint` was taken.
    fn rollback(&mut self, checkpoint: &LoadCheckpoint);
}

/// Cache of compiled units in front of a loader.
pub struct CatalogRegistry<B, L> {
    cache: MutableRegistry<B>,
    loader: L,
}

impl<B, L> CatalogRegistry<B, L> {
    pub fn new(kind: &'static str, loader: L) -> Self {
        CatalogRegistry {
            cache: MutableRegistry::new(kind),
            loader,
        }
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }
}

impl<B, L> Registry<B> for CatalogRegistry<B, L> {
    fn kind(&self) -> &'static str {
        self.cache.kind()
    }

    fn get(&self, key: &str) -> Result<&B, RegistryError> {
        self.cache.get(key)
    }

    fn has(&self, key: &str) -> bool {
        self.cache.has(key)
    }

    fn items(&self) -> Items<'_, B> {
        self.cache.items()
    }

    fn len(&self) -> usize {
        self.cache.len()
    }
}

impl<B, L: UnitLoader<B>> LoadingRegistry<B> for CatalogRegistry<B, L> {
    fn get_or_load(&mut self, key: &str, common: &mut CommonContext) -> Outcome<&B> {
        if !self.cache.has(key) {
            let bundle = self.loader.load(key, common)?;
            debug!(kind = self.cache.kind(), key, "cached compiled unit");
            self.cache
                .register(key, bundle)
                .map_err(|e| vec![from_registry_error(Span::DUMMY, &e)])?;
        }
        self.cache
            .get(key)
            .map_err(|e| vec![from_registry_error(Span::DUMMY, &e)])
    }

    fn checkpoint(&self) -> LoadCheckpoint {
        let mut sizes = vec![self.cache.len()];
        sizes.extend(self.loader.checkpoint().0);
        LoadCheckpoint(sizes)
    }

    fn rollback(&mut self, checkpoint: &LoadCheckpoint) {
        let Some((&len, nested)) = checkpoint.0.split_first() else {
            return;
        };
        if self.cache.len() > len {
            let dropped = self.cache.len() - len;
            debug!(kind = self.cache.kind(), dropped, "rolled back units");
            self.cache.truncate(len);
        }
        self.loader.rollback(&LoadCheckpoint(nested.to_vec()));
    }
}

/// Tokenize, parse and compile package source.
pub fn compile_package_source(
    name: &str,
    source: &str,
    common: &mut CommonContext,
) -> Outcome<PackageBundle> {
    let tokens = tokenize(source)?;
    let program = parse_package(&tokens)?;
    compile_package(name, &program, common)
}

/// Tokenize, parse and compile environment source.
pub fn compile_environment_source(
    name: &str,
    source: &str,
    common: &mut CommonContext,
    packages: &mut dyn LoadingRegistry<PackageBundle>,
) -> Outcome<EnvironmentBundle> {
    let tokens = tokenize(source)?;
    let program = parse_environment(&tokens)?;
    compile_environment(name, &program, common, packages)
}

/// Loads packages from a catalog.
pub struct PackageLoader {
    catalog: Box<dyn SourceCatalog>,
}

impl PackageLoader {
    pub fn new(catalog: impl SourceCatalog + 'static) -> Self {
        PackageLoader {
            catalog: Box::new(catalog),
        }
    }
}

impl UnitLoader<PackageBundle> for PackageLoader {
    #[instrument(level = "debug", skip(self, common))]
    fn load(&mut self, key: &str, common: &mut CommonContext) -> Outcome<PackageBundle> {
        let source = self.catalog.open(key).map_err(|e| vec![e])?;
        compile_package_source(key, &source, common)
            .map_err(|errors| vec![dependency_failed("package", key, &errors)])
    }
}

pub type PackageRegistry = CatalogRegistry<PackageBundle, PackageLoader>;

impl PackageRegistry {
    pub fn from_catalog(catalog: impl SourceCatalog + 'static) -> Self {
        CatalogRegistry::new("package", PackageLoader::new(catalog))
    }
}

/// Loads environments from a catalog, and the packages they use through
/// its own package registry.
pub struct EnvironmentLoader {
    catalog: Box<dyn SourceCatalog>,
    packages: PackageRegistry,
}

impl EnvironmentLoader {
    pub fn new(catalog: impl SourceCatalog + 'static, packages: PackageRegistry) -> Self {
        EnvironmentLoader {
            catalog: Box::new(catalog),
            packages,
        }
    }

    pub fn packages_mut(&mut self) -> &mut PackageRegistry {
        &mut self.packages
    }
}

impl UnitLoader<EnvironmentBundle> for EnvironmentLoader {
    #[instrument(level = "debug", skip(self, common))]
    fn load(&mut self, key: &str, common: &mut CommonContext) -> Outcome<EnvironmentBundle> {
        let source = self.catalog.open(key).map_err(|e| vec![e])?;
        compile_environment_source(key, &source, common, &mut self.packages)
            .map_err(|errors| vec![dependency_failed("environment", key, &errors)])
    }

    fn checkpoint(&self) -> LoadCheckpoint {
        self.packages.checkpoint()
    }

    fn rollback(&mut self, checkpoint: &LoadCheckpoint) {
        self.packages.rollback(checkpoint);
    }
}

pub type EnvironmentRegistry = CatalogRegistry<EnvironmentBundle, EnvironmentLoader>;

impl EnvironmentRegistry {
    pub fn from_catalogs(
        environments: impl SourceCatalog + 'static,
        packages: impl SourceCatalog + 'static,
    ) -> Self {
        CatalogRegistry::new(
            "environment",
            EnvironmentLoader::new(environments, PackageRegistry::from_catalog(packages)),
        )
    }
}
