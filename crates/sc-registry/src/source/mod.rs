//! Where definitions come from.
//!
//! - [`ManifestSource`]: one `shortcodes.toml` per component directory
//! - [`BuiltinSource`]: shortcodes shipped with this crate
//! - [`SourceSet`]: several sources chained together

mod builtin;
mod manifest;

pub use builtin::{BUILTIN_COMPONENT, BuiltinSource};
pub use manifest::{MANIFEST_FILENAME, ManifestSource};

use crate::{RawDefinition, SourceError, StringCatalog};

/// Supplies raw definitions to a discovery-backed registry.
pub trait DefinitionSource {
    /// Read every definition this source knows about, in a stable order.
    fn fetch(&self) -> Result<Vec<RawDefinition>, SourceError>;

    /// Strings for the components this source provides, if any.
    fn catalog(&self) -> Option<&dyn StringCatalog> {
        None
    }
}

impl<S: DefinitionSource + ?Sized> DefinitionSource for Box<S> {
    fn fetch(&self) -> Result<Vec<RawDefinition>, SourceError> {
        (**self).fetch()
    }

    fn catalog(&self) -> Option<&dyn StringCatalog> {
        (**self).catalog()
    }
}

/// Concatenation of several sources.
///
/// Definitions come out in source order; string lookups ask each source's
/// catalog in the same order and return the first hit.
#[derive(Default)]
pub struct SourceSet {
    sources: Vec<Box<dyn DefinitionSource>>,
}

impl SourceSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source.
    #[must_use]
    pub fn with(mut self, source: impl DefinitionSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl DefinitionSource for SourceSet {
    fn fetch(&self) -> Result<Vec<RawDefinition>, SourceError> {
        let mut all = Vec::new();
        for source in &self.sources {
            all.extend(source.fetch()?);
        }
        Ok(all)
    }

    fn catalog(&self) -> Option<&dyn StringCatalog> {
        Some(self)
    }
}

impl StringCatalog for SourceSet {
    fn lookup(&self, component: &str, key: &str) -> Option<&str> {
        self.sources
            .iter()
            .filter_map(|source| source.catalog())
            .find_map(|catalog| catalog.lookup(component, key))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{DefinitionData, StringTable};

    struct Fixed {
        tags: Vec<&'static str>,
        strings: Option<StringTable>,
    }

    impl DefinitionSource for Fixed {
        fn fetch(&self) -> Result<Vec<RawDefinition>, SourceError> {
            Ok(self
                .tags
                .iter()
                .map(|tag| RawDefinition::new(*tag, DefinitionData::default()))
                .collect())
        }

        fn catalog(&self) -> Option<&dyn StringCatalog> {
            self.strings.as_ref().map(|s| s as &dyn StringCatalog)
        }
    }

    #[test]
    fn test_set_concatenates_in_order() {
        let set = SourceSet::new()
            .with(Fixed {
                tags: vec!["b", "a"],
                strings: None,
            })
            .with(Fixed {
                tags: vec!["c", "a"],
                strings: None,
            });

        let tags: Vec<_> = set.fetch().unwrap().into_iter().map(|raw| raw.tag).collect();

        assert_eq!(set.len(), 2);
        assert_eq!(tags, vec!["b", "a", "c", "a"]);
    }

    #[test]
    fn test_set_catalog_asks_sources_in_order() {
        let set = SourceSet::new()
            .with(Fixed {
                tags: vec![],
                strings: None,
            })
            .with(Fixed {
                tags: vec![],
                strings: Some(StringTable::new().with("core", "k", "first")),
            })
            .with(Fixed {
                tags: vec![],
                strings: Some(
                    StringTable::new()
                        .with("core", "k", "second")
                        .with("other", "k", "other"),
                ),
            });

        let catalog = set.catalog().unwrap();
        assert_eq!(catalog.lookup("core", "k"), Some("first"));
        assert_eq!(catalog.lookup("other", "k"), Some("other"));
        assert_eq!(catalog.lookup("none", "k"), None);
    }

    #[test]
    fn test_empty_set() {
        let set = SourceSet::new();

        assert!(set.is_empty());
        assert!(set.fetch().unwrap().is_empty());
    }
}
