//! Human-readable strings attached to components.

use std::collections::HashMap;

/// Looks up a component's strings by key.
///
/// Definitions reference their description by key; the text lives in the
/// catalog of the component that owns the definition.
pub trait StringCatalog {
    /// Text for `key` in `component`, if it exists.
    fn lookup(&self, component: &str, key: &str) -> Option<&str>;

    /// Extended help for `key`, stored under `{key}_help`.
    fn help(&self, component: &str, key: &str) -> Option<&str> {
        self.lookup(component, &format!("{key}_help"))
    }
}

/// In-memory [`StringCatalog`].
#[derive(Clone, Debug, Default)]
pub struct StringTable {
    entries: HashMap<String, HashMap<String, String>>,
}

impl StringTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a string.
    pub fn insert(
        &mut self,
        component: impl Into<String>,
        key: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.entries
            .entry(component.into())
            .or_default()
            .insert(key.into(), text.into());
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(
        mut self,
        component: impl Into<String>,
        key: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.insert(component, key, text);
        self
    }
}

impl StringCatalog for StringTable {
    fn lookup(&self, component: &str, key: &str) -> Option<&str> {
        self.entries.get(component)?.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_scoped_by_component() {
        let table = StringTable::new()
            .with("core", "shortcode:a", "A")
            .with("core", "shortcode:a_help", "More about A");

        assert_eq!(table.lookup("core", "shortcode:a"), Some("A"));
        assert_eq!(table.help("core", "shortcode:a"), Some("More about A"));
        assert_eq!(table.lookup("other", "shortcode:a"), None);
        assert_eq!(table.help("core", "shortcode:b"), None);
    }
}
