//! Registry backed by a definition source and a cache.

use std::cell::OnceCell;
use std::rc::Rc;

use sc_cache::{Cache, CacheBucket, CacheBucketExt};
use sc_engine::{Handler, Registry};

use crate::{
    Callbacks, Definition, DefinitionRegistry, DefinitionRules, DefinitionSource, RegistryError,
    StaticRegistry,
};

/// Cache bucket holding discovery results.
pub const CACHE_BUCKET: &str = "handlers";
/// Key of the full definition list within [`CACHE_BUCKET`].
pub const CACHE_KEY: &str = "definitions";

/// Entries written by another version of this crate are ignored.
const CACHE_ETAG: &str = env!("CARGO_PKG_VERSION");

/// Registry that discovers its definitions on first use.
///
/// The first lookup reads the full definition list from the cache, or, on a
/// miss, fetches it from the source and writes it back. The outcome is kept
/// for the rest of this instance's life: a successful discovery backs a
/// [`StaticRegistry`], a failed one is logged once and leaves the registry
/// without handlers. Failures are never written to the cache.
pub struct DiscoveredRegistry<S> {
    source: S,
    bucket: Box<dyn CacheBucket>,
    callbacks: Callbacks,
    strict: bool,
    inner: OnceCell<Result<StaticRegistry, RegistryError>>,
}

impl<S: DefinitionSource> DiscoveredRegistry<S> {
    pub fn new(source: S, cache: &dyn Cache, callbacks: Callbacks) -> Self {
        Self {
            source,
            bucket: cache.bucket(CACHE_BUCKET),
            callbacks,
            strict: false,
            inner: OnceCell::new(),
        }
    }

    /// Validate fetched definitions strictly.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Discover definitions if not done yet and return the backing registry.
    ///
    /// The source is queried at most once; later calls return the same
    /// registry or the same error.
    pub fn load(&self) -> Result<&StaticRegistry, &RegistryError> {
        self.inner
            .get_or_init(|| {
                self.discover()
                    .inspect_err(|e| tracing::error!(error = %e, "shortcode discovery failed"))
            })
            .as_ref()
    }

    fn discover(&self) -> Result<StaticRegistry, RegistryError> {
        let definitions = match self.bucket.get_json::<Vec<Definition>>(CACHE_KEY, CACHE_ETAG) {
            Some(cached) => {
                tracing::debug!(count = cached.len(), "using cached shortcode definitions");
                cached
            }
            None => {
                let fetched = self.fetch()?;
                self.bucket.set_json(CACHE_KEY, CACHE_ETAG, &fetched);
                fetched
            }
        };

        Ok(StaticRegistry::new(definitions, self.callbacks.clone()))
    }

    fn fetch(&self) -> Result<Vec<Definition>, RegistryError> {
        let raw = self.source.fetch()?;
        let mut rules = DefinitionRules::new(&self.callbacks).with_strict(self.strict);
        if let Some(catalog) = self.source.catalog() {
            rules = rules.with_catalog(catalog);
        }

        let definitions = raw
            .into_iter()
            .map(|raw| Definition::from_data(raw.tag, raw.data, &rules))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(count = definitions.len(), "discovered shortcode definitions");
        Ok(definitions)
    }
}

impl<S: DefinitionSource> Registry for DiscoveredRegistry<S> {
    fn handler(&self, tag: &str) -> Option<Rc<Handler>> {
        self.load().ok()?.handler(tag)
    }
}

impl<S: DefinitionSource> DefinitionRegistry for DiscoveredRegistry<S> {
    fn definitions(&self) -> Box<dyn Iterator<Item = &Definition> + '_> {
        match self.load() {
            Ok(registry) => registry.definitions(),
            Err(_) => Box::new(std::iter::empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;
    use sc_cache::{MemoryCache, NullCache};
    use sc_engine::{Environment, Processor};

    use super::*;
    use crate::{DefinitionData, RawDefinition, SourceError};

    /// Source returning a fixed list and counting how often it is asked.
    struct Counting<'a> {
        fetches: &'a Cell<usize>,
        raw: Vec<RawDefinition>,
    }

    impl DefinitionSource for Counting<'_> {
        fn fetch(&self) -> Result<Vec<RawDefinition>, SourceError> {
            self.fetches.set(self.fetches.get() + 1);
            Ok(self.raw.clone())
        }
    }

    struct Failing;

    impl DefinitionSource for Failing {
        fn fetch(&self) -> Result<Vec<RawDefinition>, SourceError> {
            Err(SourceError::io(
                "components",
                std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            ))
        }
    }

    fn raw(tag: &str, callback: &str) -> RawDefinition {
        RawDefinition::new(
            tag,
            DefinitionData {
                callback: Some(callback.to_owned()),
                component: Some("core".to_owned()),
                ..DefinitionData::default()
            },
        )
    }

    fn callbacks() -> Callbacks {
        Callbacks::new().with("echo", |tag, _, _, _, _| tag.to_owned())
    }

    #[test]
    fn test_fetches_lazily_and_once() {
        let fetches = Cell::new(0);
        let source = Counting {
            fetches: &fetches,
            raw: vec![raw("abc", "echo")],
        };
        let registry = DiscoveredRegistry::new(source, &NullCache, callbacks());

        assert_eq!(fetches.get(), 0);
        assert!(registry.handler("abc").is_some());
        assert!(registry.handler("zzz").is_none());
        assert_eq!(registry.definitions().count(), 1);
        assert_eq!(fetches.get(), 1);
    }

    #[test]
    fn test_second_instance_reuses_cache() {
        let cache = MemoryCache::new();
        let fetches = Cell::new(0);

        let first = DiscoveredRegistry::new(
            Counting {
                fetches: &fetches,
                raw: vec![raw("abc", "echo")],
            },
            &cache,
            callbacks(),
        );
        assert_eq!(first.load().unwrap().len(), 1);

        let second = DiscoveredRegistry::new(
            Counting {
                fetches: &fetches,
                raw: vec![raw("abc", "echo"), raw("def", "echo")],
            },
            &cache,
            callbacks(),
        );

        assert_eq!(second.load().unwrap().len(), 1);
        assert!(second.handler("def").is_none());
        assert_eq!(fetches.get(), 1);
    }

    #[test]
    fn test_cached_empty_list_is_a_hit() {
        let cache = MemoryCache::new();
        let fetches = Cell::new(0);

        for _ in 0..2 {
            let registry = DiscoveredRegistry::new(
                Counting {
                    fetches: &fetches,
                    raw: Vec::new(),
                },
                &cache,
                callbacks(),
            );
            assert!(registry.load().unwrap().is_empty());
        }

        assert_eq!(fetches.get(), 1);
    }

    #[test]
    fn test_strict_failure_is_remembered_and_not_cached() {
        let cache = MemoryCache::new();
        let fetches = Cell::new(0);
        let registry = DiscoveredRegistry::new(
            Counting {
                fetches: &fetches,
                raw: vec![raw("bad-tag", "echo")],
            },
            &cache,
            callbacks(),
        )
        .with_strict(true);

        assert!(matches!(
            registry.load(),
            Err(RegistryError::Definition(_))
        ));
        assert!(registry.handler("abc").is_none());
        assert_eq!(registry.definitions().count(), 0);
        assert!(matches!(
            registry.load(),
            Err(RegistryError::Definition(_))
        ));
        assert_eq!(fetches.get(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_failed_discovery_is_not_retried_per_tag() {
        let fetches = Cell::new(0);
        let registry = DiscoveredRegistry::new(
            Counting {
                fetches: &fetches,
                raw: vec![raw("abc", "missing")],
            },
            &NullCache,
            callbacks(),
        )
        .with_strict(true);
        let processor = Processor::new(registry);

        let output = processor.process_with("[a] [b] [c] [abc] [d]", &Environment::default());

        assert_eq!(output, "[a] [b] [c] [abc] [d]");
        assert_eq!(fetches.get(), 1);
    }

    #[test]
    fn test_source_error_surfaces_from_load() {
        let registry = DiscoveredRegistry::new(Failing, &NullCache, callbacks());

        let err = registry.load().unwrap_err();

        assert!(matches!(err, RegistryError::Source(SourceError::Io { .. })));
        assert!(err.to_string().starts_with("failed to read components"));
    }
}
