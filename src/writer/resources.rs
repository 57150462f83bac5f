//! Deduplicating resource registries.
//!
//! A registry maps user-facing keys to short resource names and names to resource
//! bodies. Registering under a known key is a no-op. A value equal to a stored one aliases
//! the key to the stored name; anything else mints `<prefix><count + 1>`. Keyless
//! registrations never touch the key map.

use indexmap::IndexMap;

/// A named resource body.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource<T> {
    /// Short name used in content streams (`GS1`, `Sh2`, ...)
    pub name: String,
    /// The resource body
    pub value: T,
    /// Object number, set while writing the document
    pub object_number: Option<u32>,
}

/// Outcome of [`ResourceRegistry::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// A new resource was stored under this name
    New(String),
    /// The key now points at an equal, already stored resource
    Aliased(String),
    /// The key was already registered
    Existing(String),
}

impl Registration {
    /// The resource name the key resolves to.
    pub fn name(&self) -> &str {
        match self {
            Registration::New(name) | Registration::Aliased(name) | Registration::Existing(name) => {
                name
            },
        }
    }

    /// True if something was added to the registry.
    pub fn is_new(&self) -> bool {
        matches!(self, Registration::New(_))
    }
}

/// Key → name → resource maps for one resource kind.
#[derive(Debug, Clone)]
pub struct ResourceRegistry<T> {
    entries: IndexMap<String, Resource<T>>,
    keys: IndexMap<String, String>,
}

impl<T> Default for ResourceRegistry<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
            keys: IndexMap::new(),
        }
    }
}

impl<T: PartialEq> ResourceRegistry<T> {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` under `key`, deduplicating by key and then by equality.
    ///
    /// Without a key the value is only deduplicated by equality and reachable by its
    /// resource name alone.
    pub fn register(&mut self, key: Option<&str>, value: T, prefix: &str) -> Registration {
        if let Some(name) = key.and_then(|k| self.keys.get(k)) {
            return Registration::Existing(name.clone());
        }

        if let Some(existing) = self.entries.values().find(|r| r.value == value) {
            let name = existing.name.clone();
            if let Some(key) = key {
                self.keys.insert(key.to_string(), name.clone());
            }
            return Registration::Aliased(name);
        }

        let name = format!("{}{}", prefix, self.entries.len() + 1);
        if let Some(key) = key {
            self.keys.insert(key.to_string(), name.clone());
        }
        self.insert_entry(name.clone(), value);
        Registration::New(name)
    }

    /// Store `value` as `name` under `key`, with no equality check.
    pub fn insert_keyed(&mut self, key: String, name: String, value: T) {
        self.keys.insert(key, name.clone());
        self.insert_entry(name, value);
    }

    fn insert_entry(&mut self, name: String, value: T) {
        self.entries.insert(
            name.clone(),
            Resource {
                name,
                value,
                object_number: None,
            },
        );
    }

}

impl<T> ResourceRegistry<T> {
    /// Resource name for `key`.
    pub fn name_for(&self, key: &str) -> Option<&str> {
        self.keys.get(key).map(String::as_str)
    }

    /// True if `key` is registered.
    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// Resource registered under `key`.
    pub fn get(&self, key: &str) -> Option<&Resource<T>> {
        self.keys.get(key).and_then(|name| self.entries.get(name))
    }

    /// Mutable resource registered under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Resource<T>> {
        let name = self.keys.get(key)?;
        self.entries.get_mut(name)
    }

    /// Resource by short name.
    pub fn by_name(&self, name: &str) -> Option<&Resource<T>> {
        self.entries.get(name)
    }

    pub(crate) fn by_name_mut(&mut self, name: &str) -> Option<&mut Resource<T>> {
        self.entries.get_mut(name)
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Resources in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Resource<T>> {
        self.entries.values()
    }

    /// Mutable resources in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Resource<T>> {
        self.entries.values_mut()
    }

    /// Number of distinct resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_key_wins() {
        let mut reg = ResourceRegistry::new();
        assert_eq!(reg.register(Some("a"), 1, "R"), Registration::New("R1".into()));
        assert_eq!(reg.register(Some("a"), 2, "R"), Registration::Existing("R1".into()));
        assert_eq!(reg.get("a").unwrap().value, 1);
    }

    #[test]
    fn test_equal_values_share_a_name() {
        let mut reg = ResourceRegistry::new();
        reg.register(Some("a"), 7, "R");
        let second = reg.register(Some("b"), 7, "R");
        assert_eq!(second, Registration::Aliased("R1".into()));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.name_for("b"), Some("R1"));
    }

    #[test]
    fn test_prefix_counter_is_shared() {
        let mut reg = ResourceRegistry::new();
        reg.register(Some("a"), 1, "Sh");
        let tiling = reg.register(Some("b"), 2, "P");
        assert_eq!(tiling.name(), "P2");
    }

    #[test]
    fn test_keyless_registration() {
        let mut reg = ResourceRegistry::new();
        let name = reg.register(None, 3, "GS").name().to_string();
        assert_eq!(name, "GS1");
        assert!(!reg.contains_key("GS1"));
        assert!(reg.by_name("GS1").is_some());
        assert!(!reg.register(None, 3, "GS").is_new());
    }

    #[test]
    fn test_keyless_registration_keeps_user_keys() {
        let mut reg = ResourceRegistry::new();
        reg.register(Some("GS2"), 1, "GS");
        assert_eq!(reg.register(None, 2, "GS"), Registration::New("GS2".into()));
        assert_eq!(reg.register(None, 1, "GS"), Registration::Aliased("GS1".into()));
        assert_eq!(reg.name_for("GS2"), Some("GS1"));
        assert_eq!(reg.get("GS2").unwrap().value, 1);
    }
}
