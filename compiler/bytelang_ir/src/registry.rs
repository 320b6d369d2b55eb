//! Keyed, insertion-ordered stores.
//!
//! Every registry answers the same read questions through [`Registry`]:
//! `get`, `has` and ordered `items`. They differ in how entries get in.
//!
//! - [`ImmediateRegistry`]: populated once at construction.
//! - [`MutableRegistry`]: grows through `register`, which refuses to
//!   replace an existing key.
//!
//! The load-on-miss catalog registry lives with the semantic contexts,
//! since loading a unit needs them.

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Registry access failure.
///
/// `kind` names what the registry stores ("constant", "macro", ...), so
/// messages read naturally without the caller repeating it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum RegistryError {
    #[error("{kind} `{key}` not found")]
    NotFound { kind: &'static str, key: String },
    #[error("{kind} `{key}` already exists")]
    Duplicate { kind: &'static str, key: String },
}

impl RegistryError {
    pub fn key(&self) -> &str {
        match self {
            RegistryError::NotFound { key, .. } | RegistryError::Duplicate { key, .. } => key,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::NotFound { kind, .. } | RegistryError::Duplicate { kind, .. } => kind,
        }
    }
}

/// Shared read contract.
pub trait Registry<V> {
    /// What this registry stores, for messages.
    fn kind(&self) -> &'static str;

    fn get(&self, key: &str) -> Result<&V, RegistryError>;

    fn has(&self, key: &str) -> bool;

    /// Entries in insertion order.
    fn items(&self) -> Items<'_, V>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered iterator over `(key, value)` pairs.
pub struct Items<'a, V> {
    inner: std::slice::Iter<'a, (String, V)>,
}

impl<'a, V> Iterator for Items<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Items<'_, V> {}

impl<V> DoubleEndedIterator for Items<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k.as_str(), v))
    }
}

/// Storage shared by the registry disciplines.
#[derive(Clone, Debug)]
struct Table<V> {
    kind: &'static str,
    index: FxHashMap<String, usize>,
    entries: Vec<(String, V)>,
}

impl<V> Table<V> {
    fn new(kind: &'static str) -> Self {
        Table {
            kind,
            index: FxHashMap::default(),
            entries: Vec::new(),
        }
    }

    fn get(&self, key: &str) -> Result<&V, RegistryError> {
        self.index
            .get(key)
            .and_then(|&i| self.entries.get(i))
            .map(|(_, v)| v)
            .ok_or_else(|| RegistryError::NotFound {
                kind: self.kind,
                key: key.to_string(),
            })
    }

    fn truncate(&mut self, len: usize) {
        if len >= self.entries.len() {
            return;
        }
        for (key, _) in self.entries.drain(len..) {
            self.index.remove(&key);
        }
    }

    fn insert_new(&mut self, key: String, value: V) -> Result<(), RegistryError> {
        if self.index.contains_key(&key) {
            return Err(RegistryError::Duplicate {
                kind: self.kind,
                key,
            });
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        Ok(())
    }

    fn replace(&mut self, key: String, value: V) {
        if let Some(&i) = self.index.get(&key) {
            if let Some(slot) = self.entries.get_mut(i) {
                slot.1 = value;
            }
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, value));
        }
    }

    fn items(&self) -> Items<'_, V> {
        Items {
            inner: self.entries.iter(),
        }
    }
}

impl<V: PartialEq> PartialEq for Table<V> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.entries == other.entries
    }
}

macro_rules! impl_registry {
    ($ty:ident) => {
        impl<V> Registry<V> for $ty<V> {
            fn kind(&self) -> &'static str {
                self.table.kind
            }

            fn get(&self, key: &str) -> Result<&V, RegistryError> {
                self.table.get(key)
            }

            fn has(&self, key: &str) -> bool {
                self.table.index.contains_key(key)
            }

            fn items(&self) -> Items<'_, V> {
                self.table.items()
            }

            fn len(&self) -> usize {
                self.table.entries.len()
            }
        }
    };
}

/// Registry fully populated at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct ImmediateRegistry<V> {
    table: Table<V>,
}

impl<V> ImmediateRegistry<V> {
    /// Build from entries in order. A repeated key keeps its first position
    /// and takes the later value.
    pub fn new<K: Into<String>>(kind: &'static str, entries: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut table = Table::new(kind);
        for (key, value) in entries {
            table.replace(key.into(), value);
        }
        ImmediateRegistry { table }
    }
}

impl_registry!(ImmediateRegistry);

/// Registry that accepts new entries at runtime.
#[derive(Clone, Debug, PartialEq)]
pub struct MutableRegistry<V> {
    table: Table<V>,
}

impl<V> MutableRegistry<V> {
    pub fn new(kind: &'static str) -> Self {
        MutableRegistry {
            table: Table::new(kind),
        }
    }

    /// Start from `entries`; later registrations still refuse their keys.
    pub fn seeded<K: Into<String>>(kind: &'static str, entries: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut table = Table::new(kind);
        for (key, value) in entries {
            table.replace(key.into(), value);
        }
        MutableRegistry { table }
    }

    /// Add a new entry.
    ///
    /// An existing key is left untouched and reported as
    /// [`RegistryError::Duplicate`].
    pub fn register(&mut self, key: impl Into<String>, value: V) -> Result<(), RegistryError> {
        self.table.insert_new(key.into(), value)
    }

    /// Drop every entry registered after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.table.truncate(len);
    }
}

impl_registry!(MutableRegistry);

/// Freeze a registry once its owner is done defining entries.
impl<V> From<MutableRegistry<V>> for ImmediateRegistry<V> {
    fn from(registry: MutableRegistry<V>) -> Self {
        ImmediateRegistry {
            table: registry.table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_immediate_lookup() {
        let reg = ImmediateRegistry::new("primitive", [("u8", 1), ("u16", 2)]);
        assert_eq!(reg.get("u16"), Ok(&2));
        assert!(reg.has("u8"));
        assert!(!reg.has("u32"));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_not_found_names_kind() {
        let reg: ImmediateRegistry<i32> = ImmediateRegistry::new("primitive", Vec::<(String, i32)>::new());
        let err = reg.get("u128").unwrap_err();
        assert_eq!(err.to_string(), "primitive `u128` not found");
        assert_eq!(err.key(), "u128");
    }

    #[test]
    fn test_immediate_repeated_key_keeps_position() {
        let reg = ImmediateRegistry::new("x", [("a", 1), ("b", 2), ("a", 3)]);
        let items: Vec<_> = reg.items().collect();
        assert_eq!(items, vec![("a", &3), ("b", &2)]);
    }

    #[test]
    fn test_mutable_preserves_insertion_order() {
        let mut reg = MutableRegistry::new("constant");
        reg.register("zeta", 1).unwrap();
        reg.register("alpha", 2).unwrap();
        reg.register("mid", 3).unwrap();
        let keys: Vec<_> = reg.items().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_mutable_rejects_duplicate() {
        let mut reg = MutableRegistry::new("constant");
        reg.register("x", 1).unwrap();
        let err = reg.register("x", 2).unwrap_err();
        assert_eq!(
            err,
            RegistryError::Duplicate {
                kind: "constant",
                key: "x".into()
            }
        );
        // Original value survives.
        assert_eq!(reg.get("x"), Ok(&1));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_truncate_forgets_later_entries() {
        let mut reg = MutableRegistry::new("package");
        reg.register("base", 0).unwrap();
        reg.register("other", 4).unwrap();
        reg.register("extra", 8).unwrap();

        reg.truncate(1);
        let keys: Vec<_> = reg.items().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["base"]);
        assert!(!reg.has("other"));

        // A dropped key can be registered again.
        reg.register("other", 5).unwrap();
        assert_eq!(reg.get("other"), Ok(&5));

        reg.truncate(10);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_seeded_then_frozen() {
        let mut reg = MutableRegistry::seeded("type", [("u8", 1)]);
        assert!(reg.register("u8", 9).is_err());
        reg.register("P", 8).unwrap();

        let frozen = ImmediateRegistry::from(reg);
        let keys: Vec<_> = frozen.items().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["u8", "P"]);
        assert_eq!(frozen.kind(), "type");
    }
}
