//! CLI commands.

pub(crate) mod expand;
pub(crate) mod list;

pub(crate) use expand::ExpandArgs;
pub(crate) use list::ListArgs;

use std::path::PathBuf;

use clap::Args;
use sc_cache::{Cache, FileCache, NullCache};
use sc_config::{CacheConfig, CliSettings, Config};
use sc_registry::{BuiltinSource, DiscoveredRegistry, ManifestSource, SourceSet};

use crate::error::CliError;

/// Options shared by every command that needs a registry.
#[derive(Args)]
pub(crate) struct RegistryArgs {
    /// Path to configuration file (default: auto-discover sc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory whose subdirectories hold component manifests.
    #[arg(long, env = "SC_COMPONENTS_DIR")]
    components_dir: Option<PathBuf>,

    /// Reject invalid definitions instead of skipping them.
    #[arg(long)]
    strict: bool,

    /// Disable the discovery cache.
    #[arg(long)]
    no_cache: bool,

    /// Maximum nesting depth for recursive expansion.
    #[arg(long)]
    max_depth: Option<usize>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RegistryArgs {
    /// Load configuration with these arguments applied on top.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            components_dir: self.components_dir.clone(),
            strict: self.strict.then_some(true),
            cache_enabled: self.no_cache.then_some(false),
            max_depth: self.max_depth,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Build the discovery-backed registry described by `config`.
///
/// Discovery is lazy; call [`DiscoveredRegistry::load`] to surface errors.
pub(crate) fn build_registry(config: &Config) -> DiscoveredRegistry<SourceSet> {
    let registry_config = &config.registry_resolved;
    let sources = SourceSet::new().with(BuiltinSource::new()).with(
        ManifestSource::new(&registry_config.components_dir)
            .with_disabled(registry_config.disabled.iter().cloned()),
    );

    let cache = build_cache(&config.cache_resolved);
    DiscoveredRegistry::new(sources, cache.as_ref(), BuiltinSource::callbacks())
        .with_strict(registry_config.strict)
}

fn build_cache(config: &CacheConfig) -> Box<dyn Cache> {
    if !config.enabled {
        return Box::new(NullCache);
    }

    tracing::debug!(dir = %config.dir.display(), ttl = ?config.ttl, "using discovery cache");
    let cache = FileCache::new(config.dir.clone(), env!("CARGO_PKG_VERSION"));
    match config.ttl {
        Some(ttl) => Box::new(cache.with_ttl(ttl)),
        None => Box::new(cache),
    }
}
