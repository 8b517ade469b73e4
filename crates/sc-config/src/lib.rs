//! Configuration for the shortcode tools.
//!
//! Parses `sc.toml` with serde and discovers it in the current directory or
//! its parents. Relative paths are resolved against the directory holding
//! the file. CLI settings are applied during load via [`CliSettings`].
//!
//! ```toml
//! [registry]
//! components_dir = "components"
//! disabled = ["legacy"]
//! strict = false
//!
//! [cache]
//! enabled = true
//! dir = ".shortcodes/cache"
//! ttl = 86400           # seconds; omit to keep entries until the version changes
//!
//! [processor]
//! max_depth = 32
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `registry.components_dir`, `registry.disabled` entries and `cache.dir`
//! support `${VAR}` and `${VAR:-default}`.

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "sc.toml";

const DEFAULT_COMPONENTS_DIR: &str = "components";
const DEFAULT_CACHE_DIR: &str = ".shortcodes/cache";
const MAX_DEPTH_LIMIT: usize = 1024;

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the components directory.
    pub components_dir: Option<PathBuf>,
    /// Override strict definition validation.
    pub strict: Option<bool>,
    /// Override the cache enabled flag.
    pub cache_enabled: Option<bool>,
    /// Override the recursion limit.
    pub max_depth: Option<usize>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    registry: RegistryConfigRaw,
    cache: CacheConfigRaw,
    /// Expansion settings.
    pub processor: ProcessorConfig,

    /// Resolved registry configuration (set after loading).
    #[serde(skip)]
    pub registry_resolved: RegistryConfig,
    /// Resolved cache configuration (set after loading).
    #[serde(skip)]
    pub cache_resolved: CacheConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RegistryConfigRaw {
    components_dir: Option<String>,
    disabled: Vec<String>,
    strict: bool,
}

/// Resolved registry configuration with absolute paths.
#[derive(Debug, Default)]
pub struct RegistryConfig {
    /// Directory whose subdirectories are components.
    pub components_dir: PathBuf,
    /// Components skipped during discovery.
    pub disabled: Vec<String>,
    /// Whether definitions are validated strictly.
    pub strict: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CacheConfigRaw {
    enabled: Option<bool>,
    dir: Option<String>,
    ttl: Option<u64>,
}

/// Resolved cache configuration.
#[derive(Debug, Default)]
pub struct CacheConfig {
    /// Whether discovery results are cached on disk.
    pub enabled: bool,
    /// Cache root directory.
    pub dir: PathBuf,
    /// Age after which cached discovery results are ignored.
    pub ttl: Option<Duration>,
}

/// Expansion configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Maximum nesting depth for recursive expansion.
    pub max_depth: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g. `cache.dir`).
        field: String,
        /// Error message (e.g. `${CACHE_ROOT} not set`).
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `sc.toml` in the current directory and its parents, falling back to
    /// defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, parsing or
    /// expansion fails, or the result does not validate.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            tracing::debug!(path = %discovered.display(), "using discovered config");
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(components_dir) = &settings.components_dir {
            self.registry_resolved
                .components_dir
                .clone_from(components_dir);
        }
        if let Some(strict) = settings.strict {
            self.registry_resolved.strict = strict;
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.cache_resolved.enabled = cache_enabled;
        }
        if let Some(max_depth) = settings.max_depth {
            self.processor.max_depth = max_depth;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            registry: RegistryConfigRaw::default(),
            cache: CacheConfigRaw::default(),
            processor: ProcessorConfig::default(),
            registry_resolved: RegistryConfig {
                components_dir: base.join(DEFAULT_COMPONENTS_DIR),
                disabled: Vec::new(),
                strict: false,
            },
            cache_resolved: CacheConfig {
                enabled: true,
                dir: base.join(DEFAULT_CACHE_DIR),
                ttl: None,
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any check fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max_depth = self.processor.max_depth;
        if max_depth == 0 {
            return Err(ConfigError::Validation(
                "processor.max_depth must be greater than 0".to_owned(),
            ));
        }
        if max_depth > MAX_DEPTH_LIMIT {
            return Err(ConfigError::Validation(format!(
                "processor.max_depth cannot exceed {MAX_DEPTH_LIMIT}"
            )));
        }
        if self.cache_resolved.ttl == Some(Duration::ZERO) {
            return Err(ConfigError::Validation("cache.ttl must be greater than 0".to_owned()));
        }
        if self.registry_resolved.components_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "registry.components_dir cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.registry.components_dir {
            self.registry.components_dir =
                Some(expand::expand_env(dir, "registry.components_dir")?);
        }
        for component in &mut self.registry.disabled {
            *component = expand::expand_env(component, "registry.disabled")?;
        }
        if let Some(ref dir) = self.cache.dir {
            self.cache.dir = Some(expand::expand_env(dir, "cache.dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        if self.registry.components_dir.as_deref() == Some("") {
            return Err(ConfigError::Validation(
                "registry.components_dir cannot be empty".to_owned(),
            ));
        }
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.registry_resolved = RegistryConfig {
            components_dir: resolve(
                self.registry.components_dir.as_deref(),
                DEFAULT_COMPONENTS_DIR,
            ),
            disabled: self.registry.disabled.clone(),
            strict: self.registry.strict,
        };
        self.cache_resolved = CacheConfig {
            enabled: self.cache.enabled.unwrap_or(true),
            dir: resolve(self.cache.dir.as_deref(), DEFAULT_CACHE_DIR),
            ttl: self.cache.ttl.map(Duration::from_secs),
        };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/site"));

        assert_eq!(
            config.registry_resolved.components_dir,
            PathBuf::from("/site/components")
        );
        assert!(config.registry_resolved.disabled.is_empty());
        assert!(!config.registry_resolved.strict);
        assert!(config.cache_resolved.enabled);
        assert_eq!(
            config.cache_resolved.dir,
            PathBuf::from("/site/.shortcodes/cache")
        );
        assert_eq!(config.cache_resolved.ttl, None);
        assert_eq!(config.processor.max_depth, 32);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/p")).unwrap();

        assert_eq!(
            config.registry_resolved.components_dir,
            PathBuf::from("/p/components")
        );
        assert_eq!(config.processor.max_depth, 32);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[registry]
components_dir = "plugins"
disabled = ["legacy", "beta"]
strict = true

[cache]
enabled = false
dir = "/var/cache/sc"
ttl = 600

[processor]
max_depth = 8
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project")).unwrap();

        assert_eq!(
            config.registry_resolved.components_dir,
            PathBuf::from("/project/plugins")
        );
        assert_eq!(config.registry_resolved.disabled, vec!["legacy", "beta"]);
        assert!(config.registry_resolved.strict);
        assert!(!config.cache_resolved.enabled);
        assert_eq!(config.cache_resolved.dir, PathBuf::from("/var/cache/sc"));
        assert_eq!(config.cache_resolved.ttl, Some(Duration::from_secs(600)));
        assert_eq!(config.processor.max_depth, 8);
    }

    #[test]
    fn test_empty_components_dir_rejected() {
        let mut config: Config = toml::from_str("[registry]\ncomponents_dir = \"\"\n").unwrap();

        let err = config.resolve_paths(Path::new("/project")).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("components_dir"));
    }

    #[test]
    fn test_max_depth_bounds() {
        let mut config = Config::default_with_base(Path::new("/p"));
        config.validate().unwrap();

        config.processor.max_depth = 0;
        assert!(
            config
                .validate()
                .unwrap_err()
                .to_string()
                .contains("greater than 0")
        );

        config.processor.max_depth = 1025;
        assert!(config.validate().unwrap_err().to_string().contains("1024"));

        config.processor.max_depth = 1024;
        config.validate().unwrap();
    }

    #[test]
    fn test_zero_cache_ttl_rejected() {
        let mut config: Config = toml::from_str("[cache]\nttl = 0\n").unwrap();
        config.resolve_paths(Path::new("/p")).unwrap();

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("cache.ttl"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/p"));
        let overrides = CliSettings {
            components_dir: Some(PathBuf::from("/elsewhere")),
            strict: Some(true),
            cache_enabled: Some(false),
            max_depth: Some(4),
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.registry_resolved.components_dir,
            PathBuf::from("/elsewhere")
        );
        assert!(config.registry_resolved.strict);
        assert!(!config.cache_resolved.enabled);
        assert_eq!(config.processor.max_depth, 4);
        assert_eq!(
            config.cache_resolved.dir,
            PathBuf::from("/p/.shortcodes/cache")
        );
    }

    #[test]
    fn test_load_from_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sc.toml");
        std::fs::write(&path, "[registry]\ncomponents_dir = \"parts\"\n").unwrap();

        let config = Config::load(
            Some(&path),
            Some(&CliSettings {
                max_depth: Some(2),
                ..Default::default()
            }),
        )
        .unwrap();

        assert_eq!(
            config.registry_resolved.components_dir,
            tmp.path().join("parts")
        );
        assert_eq!(config.cache_resolved.dir, tmp.path().join(".shortcodes/cache"));
        assert_eq!(config.processor.max_depth, 2);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");

        let err = Config::load(Some(&missing), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_cli_max_depth_is_validated() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sc.toml");
        std::fs::write(&path, "").unwrap();

        let err = Config::load(
            Some(&path),
            Some(&CliSettings {
                max_depth: Some(0),
                ..Default::default()
            }),
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_env_expansion_on_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sc.toml");
        std::fs::write(
            &path,
            "[registry]\ndisabled = [\"${SC_TEST_DISABLED:-legacy}\"]\n\n[cache]\ndir = \"${SC_TEST_CACHE_DIR:-cache}\"\n",
        )
        .unwrap();
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("SC_TEST_DISABLED");
            std::env::remove_var("SC_TEST_CACHE_DIR");
        }

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.registry_resolved.disabled, vec!["legacy"]);
        assert_eq!(config.cache_resolved.dir, tmp.path().join("cache"));
    }

    #[test]
    fn test_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sc.toml");
        std::fs::write(&path, "[processor]\nmax_depth = \"deep\"\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
