//! Semantic analysis for ByteLang compilation units.
//!
//! Packages declare instruction signatures. Environments import them,
//! assign opcodes and fix pointer widths. Sketches select one environment
//! and turn instruction calls into bytes. All three share a
//! [`CommonContext`] of constants, macros and types.
//!
//! Units refer to each other by key; [`CatalogRegistry`] loads referenced
//! units on first use and caches the results.

mod bundle;
mod catalog;
mod checks;
mod common;
mod compiler;
mod context;
mod environment;
mod eval;
mod macros;
mod package;
mod sketch;

pub use bundle::{
    EncodedInstructionProfile, EnvironmentBundle, InstructionProfile, PackageBundle,
    PointerWidths, ResolvedCall, SketchBundle, Variable,
};
pub use catalog::{
    catalog_not_found, compile_environment_source, compile_package_source, dependency_failed,
    CatalogRegistry, EnvironmentLoader, EnvironmentRegistry, LoadCheckpoint, LoadingRegistry,
    MemoryCatalog, PackageLoader, PackageRegistry, SourceCatalog, UnitLoader,
};
pub use checks::{check_exists, check_unique, check_unique_args};
pub use common::{accept_common, compile_common};
pub use compiler::SketchCompiler;
pub use context::{CommonContext, SemanticContext};
pub use environment::{compile_environment, EnvironmentContext};
pub use eval::{evaluate, resolve_type};
pub use macros::MacroProfile;
pub use package::{compile_package, PackageContext};
pub use sketch::{compile_sketch, SketchContext};

/// Nested macro expansions allowed before evaluation gives up.
pub const MACRO_DEPTH_LIMIT: usize = 64;
