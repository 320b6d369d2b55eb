//! Definition-site checks shared by the directive handlers.

use bytelang_diagnostic::{duplicate_identifier, from_registry_error, Diagnostic, Outcome};
use bytelang_ir::{Ident, Registry};
use rustc_hash::FxHashMap;

/// `name` must not be defined in `registry` yet.
pub fn check_unique<V>(name: &Ident, registry: &impl Registry<V>) -> Result<(), Diagnostic> {
    if registry.has(&name.name) {
        Err(duplicate_identifier(name.span, registry.kind(), &name.name))
    } else {
        Ok(())
    }
}

/// `name` must be defined in `registry`.
pub fn check_exists<'r, V>(
    name: &Ident,
    registry: &'r (impl Registry<V> + ?Sized),
) -> Result<&'r V, Diagnostic> {
    registry
        .get(&name.name)
        .map_err(|e| from_registry_error(name.span, &e))
}

/// Parameter, field or selection names must not repeat.
pub fn check_unique_args<'a>(
    kind: &str,
    names: impl IntoIterator<Item = &'a Ident>,
) -> Outcome<()> {
    let mut seen = FxHashMap::default();
    let mut errors = Vec::new();
    for name in names {
        if let Some(first) = seen.insert(name.name.as_str(), name.span) {
            errors.push(
                duplicate_identifier(name.span, kind, &name.name)
                    .with_secondary_label(first, "first defined here"),
            );
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bytelang_diagnostic::ErrorCode;
    use bytelang_ir::{MutableRegistry, Span};

    fn id(name: &str, at: u32) -> Ident {
        Ident::new(name, Span::new(at, at + 1))
    }

    #[test]
    fn test_check_unique() {
        let mut reg = MutableRegistry::new("constant");
        reg.register("x", 1).unwrap();
        assert!(check_unique(&id("y", 0), &reg).is_ok());
        let err = check_unique(&id("x", 3), &reg).unwrap_err();
        assert_eq!(err.code, ErrorCode::E2001);
        assert_eq!(err.primary_span(), Some(Span::new(3, 4)));
    }

    #[test]
    fn test_check_exists() {
        let mut reg = MutableRegistry::new("macro");
        reg.register("m", 7).unwrap();
        assert_eq!(check_exists(&id("m", 0), &reg).unwrap(), &7);
        let err = check_exists(&id("n", 0), &reg).unwrap_err();
        assert_eq!(err.code, ErrorCode::E2002);
        assert_eq!(err.message, "macro `n` not found");
    }

    #[test]
    fn test_check_unique_args() {
        let args = [id("a", 0), id("b", 2), id("a", 4), id("a", 6)];
        let errors = check_unique_args("parameter", &args).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.contains("parameter `a`"));
        assert!(check_unique_args("parameter", &args[..2]).is_ok());
    }
}
