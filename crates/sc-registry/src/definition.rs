//! Shortcode definitions and their validation.

use serde::{Deserialize, Serialize};

use crate::{Callbacks, DefinitionError, StringCatalog};

/// Raw, unvalidated data describing one shortcode, as supplied by a source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DefinitionData {
    /// Name of the callback in the [`Callbacks`] table.
    pub callback: Option<String>,
    /// Owning component.
    pub component: Option<String>,
    /// Key of the description string in the component's catalog.
    pub description: Option<String>,
    /// Whether the tag wraps content. Defaults to `false`.
    pub wraps: Option<bool>,
}

/// A tag name paired with its raw data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawDefinition {
    pub tag: String,
    pub data: DefinitionData,
}

impl RawDefinition {
    pub fn new(tag: impl Into<String>, data: DefinitionData) -> Self {
        Self {
            tag: tag.into(),
            data,
        }
    }
}

/// Checks applied by [`Definition::from_data`].
#[derive(Clone, Copy)]
pub struct DefinitionRules<'a> {
    /// Fail on malformed definitions instead of trusting them.
    pub strict: bool,
    /// Callbacks a definition may name.
    pub callbacks: &'a Callbacks,
    /// Catalog used to check descriptions, when one is available.
    pub catalog: Option<&'a dyn StringCatalog>,
}

impl<'a> DefinitionRules<'a> {
    /// Non-strict rules without a catalog.
    #[must_use]
    pub fn new(callbacks: &'a Callbacks) -> Self {
        Self {
            strict: false,
            callbacks,
            catalog: None,
        }
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: &'a dyn StringCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }
}

/// A registered shortcode.
///
/// Plain data: the callback is kept by name, so definitions can be cached
/// and resolved against a [`Callbacks`] table later.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    tag: String,
    callback: String,
    component: String,
    description: Option<String>,
    wraps: bool,
}

impl Definition {
    /// Create a self-closing definition without description.
    pub fn new(
        tag: impl Into<String>,
        callback: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            callback: callback.into(),
            component: component.into(),
            description: None,
            wraps: false,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_wraps(mut self, wraps: bool) -> Self {
        self.wraps = wraps;
        self
    }

    /// Build a definition from source data.
    ///
    /// In strict mode the tag must be non-empty ASCII alphanumeric, the
    /// callback must be registered, the component must be set and the
    /// description, if any, must exist in the catalog. Without strict mode
    /// nothing is checked except the description, which is dropped with a
    /// warning when the catalog does not know it.
    pub fn from_data(
        tag: impl Into<String>,
        data: DefinitionData,
        rules: &DefinitionRules<'_>,
    ) -> Result<Self, DefinitionError> {
        let tag = tag.into();

        if rules.strict {
            if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(DefinitionError::InvalidTag { tag });
            }
            if !data
                .callback
                .as_deref()
                .is_some_and(|name| rules.callbacks.contains(name))
            {
                return Err(DefinitionError::InvalidCallback {
                    tag,
                    callback: data.callback,
                });
            }
            if data.component.is_none() {
                return Err(DefinitionError::MissingComponent { tag });
            }
        }

        let component = data.component.unwrap_or_default();
        let mut description = data.description;

        if let (Some(key), Some(catalog)) = (description.as_deref(), rules.catalog)
            && catalog.lookup(&component, key).is_none()
        {
            if rules.strict {
                return Err(DefinitionError::UnknownDescription {
                    tag,
                    component,
                    description: key.to_owned(),
                });
            }
            tracing::warn!(%tag, %component, description = key, "unknown description string, ignoring it");
            description = None;
        }

        Ok(Self {
            tag,
            callback: data.callback.unwrap_or_default(),
            component,
            description,
            wraps: data.wraps.unwrap_or(false),
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Name of the callback in the [`Callbacks`] table.
    pub fn callback(&self) -> &str {
        &self.callback
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    /// Key of the description string in the component's catalog.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn wraps(&self) -> bool {
        self.wraps
    }
}
