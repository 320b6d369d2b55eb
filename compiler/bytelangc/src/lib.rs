//! ByteLang compiler driver.
//!
//! ```text
//! sketch.bls ──► SketchCompiler ──► SketchBundle ──► image (code ++ data)
//!                    │
//!                    ├── <root>/envs/<name>.bls      environments
//!                    └── <root>/packages/<name>.bls  instruction packages
//! ```
//!
//! The binary is a thin argv dispatcher over [`commands`].

pub mod commands;
mod catalog;
mod tracing_setup;

pub use catalog::{
    read_source, CatalogError, DirectoryCatalog, ENVIRONMENTS_DIR, PACKAGES_DIR, SOURCE_EXTENSION,
};
pub use tracing_setup::init_tracing;
