//! Shortcode definitions and handler registries.
//!
//! A [`Definition`] ties a tag name to a named callback and an owning
//! component. Registries turn definitions into [`sc_engine::Handler`]s:
//!
//! - [`StaticRegistry`]: over a fixed list of definitions
//! - [`DiscoveredRegistry`]: queries a [`DefinitionSource`] on first use and
//!   caches the result through `sc-cache`
//!
//! # Example
//!
//! ```
//! use sc_cache::MemoryCache;
//! use sc_engine::{Environment, Processor};
//! use sc_registry::{BuiltinSource, DiscoveredRegistry, ManifestSource, SourceSet};
//!
//! let sources = SourceSet::new()
//!     .with(BuiltinSource::new())
//!     .with(ManifestSource::new("components"));
//! let cache = MemoryCache::new();
//! let registry = DiscoveredRegistry::new(sources, &cache, BuiltinSource::callbacks());
//!
//! let mut processor = Processor::new(registry);
//! processor.set_environment(Environment::default().with_value("firstname", "Ada"));
//! assert_eq!(processor.process("Hi [firstname]!").unwrap(), "Hi Ada!");
//! ```

mod callbacks;
mod catalog;
mod definition;
mod discovered;
mod error;
mod registry;
mod source;

pub use callbacks::Callbacks;
pub use catalog::{StringCatalog, StringTable};
pub use definition::{Definition, DefinitionData, DefinitionRules, RawDefinition};
pub use discovered::{CACHE_BUCKET, CACHE_KEY, DiscoveredRegistry};
pub use error::{DefinitionError, RegistryError, SourceError};
pub use registry::{DefinitionRegistry, StaticRegistry};
pub use source::{
    BUILTIN_COMPONENT, BuiltinSource, DefinitionSource, MANIFEST_FILENAME, ManifestSource,
    SourceSet,
};
