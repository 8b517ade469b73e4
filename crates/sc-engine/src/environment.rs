//! Per-call context handed to every handler.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Context used when no other one is given.
pub const SYSTEM_CONTEXT: &str = "system";

/// Format the expanded text was originally written in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextFormat {
    #[default]
    Plain,
    Html,
    Markdown,
}

impl TextFormat {
    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Html => "html",
            Self::Markdown => "markdown",
        }
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`TextFormat`] name.
#[derive(Debug, thiserror::Error)]
#[error("unknown text format: {0}")]
pub struct UnknownFormat(String);

impl FromStr for TextFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "html" => Ok(Self::Html),
            "markdown" => Ok(Self::Markdown),
            other => Err(UnknownFormat(other.to_owned())),
        }
    }
}

/// Context bag carried through one top-level expansion.
///
/// The processor never mutates an environment; recursive sub-expansions get
/// their own clone.
///
/// ```
/// use sc_engine::{Environment, TextFormat};
///
/// let env = Environment::new("course:42")
///     .with_format(TextFormat::Markdown)
///     .with_value("firstname", "Ada");
/// assert_eq!(env.context(), "course:42");
/// assert_eq!(env.value("firstname"), Some("Ada"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Environment {
    context: String,
    no_clean: bool,
    original_format: TextFormat,
    values: BTreeMap<String, String>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(SYSTEM_CONTEXT)
    }
}

impl Environment {
    /// Create an environment for `context` with plain format and no values.
    #[must_use]
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            no_clean: false,
            original_format: TextFormat::Plain,
            values: BTreeMap::new(),
        }
    }

    /// Mark the output as not needing sanitizing by the host.
    #[must_use]
    pub fn with_no_clean(mut self, no_clean: bool) -> Self {
        self.no_clean = no_clean;
        self
    }

    /// Set the format the text was written in.
    #[must_use]
    pub fn with_format(mut self, format: TextFormat) -> Self {
        self.original_format = format;
        self
    }

    /// Attach a named value, replacing any previous one.
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    #[must_use]
    pub fn no_clean(&self) -> bool {
        self.no_clean
    }

    #[must_use]
    pub fn original_format(&self) -> TextFormat {
        self.original_format
    }

    /// Look up an attached value.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Attached values in key order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_environment() {
        let env = Environment::default();

        assert_eq!(env.context(), "system");
        assert!(!env.no_clean());
        assert_eq!(env.original_format(), TextFormat::Plain);
        assert_eq!(env.values().count(), 0);
    }

    #[test]
    fn test_builder() {
        let env = Environment::new("user:3")
            .with_no_clean(true)
            .with_format(TextFormat::Html)
            .with_value("lastname", "O'Brian")
            .with_value("firstname", "Fran")
            .with_value("firstname", "François");

        assert!(env.no_clean());
        assert_eq!(env.original_format(), TextFormat::Html);
        assert_eq!(
            env.values().collect::<Vec<_>>(),
            vec![("firstname", "François"), ("lastname", "O'Brian")]
        );
        assert_eq!(env.value("missing"), None);
    }

    #[test]
    fn test_format_names() {
        for format in [TextFormat::Plain, TextFormat::Html, TextFormat::Markdown] {
            assert_eq!(format.as_str().parse::<TextFormat>().unwrap(), format);
        }
        let err = "rtf".parse::<TextFormat>().unwrap_err();
        assert_eq!(err.to_string(), "unknown text format: rtf");
    }
}
