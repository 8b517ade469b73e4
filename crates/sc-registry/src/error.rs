//! Error types for definition loading and validation.

use std::path::PathBuf;

/// A definition rejected by strict validation.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    /// Tag name is empty or contains characters other than ASCII letters and digits.
    #[error("invalid shortcode name '{tag}': only ASCII letters and digits are allowed")]
    InvalidTag { tag: String },

    /// Callback is missing or not registered.
    #[error("the callback for shortcode '{tag}' is invalid: {}", .callback.as_deref().unwrap_or("<missing>"))]
    InvalidCallback {
        tag: String,
        callback: Option<String>,
    },

    /// Definition has no owning component.
    #[error("shortcode '{tag}' must belong to a component")]
    MissingComponent { tag: String },

    /// Description string does not exist in the component's catalog.
    #[error("the description '{description}' for shortcode '{tag}' is not a string of '{component}'")]
    UnknownDescription {
        tag: String,
        component: String,
        description: String,
    },
}

/// Failure while reading definitions from a source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Reading a directory or manifest failed.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A manifest is not valid TOML or has the wrong shape.
    #[error("invalid manifest {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl SourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Error returned when a registry cannot be built.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),
}
