//! Unit catalogs backed by a directory tree.

use std::io;
use std::path::{Path, PathBuf};

use bytelang_diagnostic::{Diagnostic, ErrorCode};
use bytelang_sema::SourceCatalog;
use thiserror::Error;

/// File extension of ByteLang sources.
pub const SOURCE_EXTENSION: &str = "bls";

/// Subdirectory of the root holding packages.
pub const PACKAGES_DIR: &str = "packages";

/// Subdirectory of the root holding environments.
pub const ENVIRONMENTS_DIR: &str = "envs";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{kind} `{key}` not found (looked for {})", path.display())]
    NotFound {
        kind: &'static str,
        key: String,
        path: PathBuf,
    },
    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {}: {source}", path.display())]
    Unwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<CatalogError> for Diagnostic {
    fn from(error: CatalogError) -> Self {
        Diagnostic::error(ErrorCode::E3001).with_message(error.to_string())
    }
}

/// Read a source file, mapping I/O failures to [`CatalogError`].
pub fn read_source(path: &Path, kind: &'static str, key: &str) -> Result<String, CatalogError> {
    std::fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => CatalogError::NotFound {
            kind,
            key: key.to_string(),
            path: path.to_path_buf(),
        },
        _ => CatalogError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Resolves `<dir>/<key>.bls`.
#[derive(Clone, Debug)]
pub struct DirectoryCatalog {
    kind: &'static str,
    dir: PathBuf,
}

impl DirectoryCatalog {
    pub fn new(kind: &'static str, dir: impl Into<PathBuf>) -> Self {
        DirectoryCatalog {
            kind,
            dir: dir.into(),
        }
    }

    /// `<root>/packages`
    pub fn packages(root: &Path) -> Self {
        Self::new("package", root.join(PACKAGES_DIR))
    }

    /// `<root>/envs`
    pub fn environments(root: &Path) -> Self {
        Self::new("environment", root.join(ENVIRONMENTS_DIR))
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{SOURCE_EXTENSION}"))
    }

    pub fn read(&self, key: &str) -> Result<String, CatalogError> {
        read_source(&self.path_for(key), self.kind, key)
    }
}

impl SourceCatalog for DirectoryCatalog {
    #[tracing::instrument(level = "debug", skip(self), fields(kind = self.kind))]
    fn open(&self, key: &str) -> Result<String, Diagnostic> {
        self.read(key).map_err(Diagnostic::from)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolves_by_key() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(PACKAGES_DIR)).unwrap();
        std::fs::write(dir.path().join("packages/base.bls"), ".inst nop()\n").unwrap();

        let catalog = DirectoryCatalog::packages(dir.path());
        assert_eq!(catalog.open("base").unwrap(), ".inst nop()\n");
        assert_eq!(catalog.path_for("base"), dir.path().join("packages/base.bls"));
    }

    #[test]
    fn test_missing_unit() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = DirectoryCatalog::environments(dir.path());
        let err = catalog.read("avr").unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { ref key, .. } if key == "avr"));

        let diagnostic = catalog.open("avr").unwrap_err();
        assert_eq!(diagnostic.code, ErrorCode::E3001);
        assert!(diagnostic.message.starts_with("environment `avr` not found"));
    }

    #[test]
    fn test_invalid_utf8_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.bls"), [0xff, 0xfe]).unwrap();
        let catalog = DirectoryCatalog::new("package", dir.path());
        assert!(matches!(
            catalog.read("bad").unwrap_err(),
            CatalogError::Unreadable { .. }
        ));
    }
}
