//! Shortcodes available without any manifest.

use sc_engine::Environment;

use crate::{Callbacks, DefinitionData, RawDefinition, SourceError, StringCatalog, StringTable};

use super::DefinitionSource;

/// Component owning the built-in shortcodes.
pub const BUILTIN_COMPONENT: &str = "shortcodes";

const OFF_HELP: &str = "```
[off]
    Those tags will remain as is:
    [onetag]
    [thirdtag]Hello world![/thirdtag]
[/off]
```";

/// Built-in shortcodes:
///
/// - `off`: wraps content and returns it untouched, so tags inside are not expanded
/// - `fullname`: the `firstname` and `lastname` environment values
/// - `firstname`: the `firstname` environment value
///
/// Their callbacks come from [`BuiltinSource::callbacks`].
pub struct BuiltinSource {
    strings: StringTable,
}

impl Default for BuiltinSource {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinSource {
    #[must_use]
    pub fn new() -> Self {
        let strings = StringTable::new()
            .with(
                BUILTIN_COMPONENT,
                "shortcode:off",
                "Disables the processing of the shortcodes present between its opening and closing tag.",
            )
            .with(BUILTIN_COMPONENT, "shortcode:off_help", OFF_HELP)
            .with(
                BUILTIN_COMPONENT,
                "shortcode:fullname",
                "The current user's full name.",
            )
            .with(
                BUILTIN_COMPONENT,
                "shortcode:firstname",
                "The current user's first name.",
            );
        Self { strings }
    }

    /// Callbacks referenced by the built-in definitions.
    #[must_use]
    pub fn callbacks() -> Callbacks {
        Callbacks::new()
            .with("shortcodes::off", |_, _, content, _, _| {
                content.unwrap_or_default().to_owned()
            })
            .with("shortcodes::fullname", |_, _, _, env, _| fullname(env))
            .with("shortcodes::firstname", |_, _, _, env, _| {
                env.value("firstname").unwrap_or_default().to_owned()
            })
    }
}

fn fullname(env: &Environment) -> String {
    ["firstname", "lastname"]
        .into_iter()
        .filter_map(|key| env.value(key))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn builtin(tag: &str, wraps: bool) -> RawDefinition {
    RawDefinition::new(
        tag,
        DefinitionData {
            callback: Some(format!("{BUILTIN_COMPONENT}::{tag}")),
            component: Some(BUILTIN_COMPONENT.to_owned()),
            description: Some(format!("shortcode:{tag}")),
            wraps: Some(wraps),
        },
    )
}

impl DefinitionSource for BuiltinSource {
    fn fetch(&self) -> Result<Vec<RawDefinition>, SourceError> {
        Ok(vec![
            builtin("off", true),
            builtin("fullname", false),
            builtin("firstname", false),
        ])
    }

    fn catalog(&self) -> Option<&dyn StringCatalog> {
        Some(&self.strings)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sc_cache::NullCache;
    use sc_engine::{Processor, Registry};

    use super::*;
    use crate::DiscoveredRegistry;

    fn registry() -> DiscoveredRegistry<BuiltinSource> {
        DiscoveredRegistry::new(BuiltinSource::new(), &NullCache, BuiltinSource::callbacks())
            .with_strict(true)
    }

    #[test]
    fn test_builtins_pass_strict_validation() {
        let registry = registry();
        let loaded = registry.load().unwrap();

        assert_eq!(loaded.len(), 3);
        assert!(registry.handler("off").unwrap().wraps_content());
        assert!(!registry.handler("fullname").unwrap().wraps_content());
    }

    #[test]
    fn test_off_keeps_content_verbatim() {
        let processor = Processor::new(registry());
        let env = Environment::default().with_value("firstname", "Ada");

        assert_eq!(
            processor.process_with("[firstname] [off]is [not] [firstname][/off]", &env),
            "Ada is [not] [firstname]"
        );
    }

    #[test]
    fn test_names_from_environment() {
        let processor = Processor::new(registry());
        let env = Environment::default()
            .with_value("firstname", "François")
            .with_value("lastname", "O'Brian");

        assert_eq!(
            processor.process_with("[fullname] / [firstname]", &env),
            "François O'Brian / François"
        );
        assert_eq!(
            processor.process_with("[fullname]", &Environment::default().with_value("lastname", "Solo")),
            "Solo"
        );
        assert_eq!(processor.process_with("[fullname]", &Environment::default()), "");
    }

    #[test]
    fn test_help_string() {
        let source = BuiltinSource::new();
        let catalog = source.catalog().unwrap();

        assert!(catalog.help(BUILTIN_COMPONENT, "shortcode:off").unwrap().contains("[onetag]"));
        assert_eq!(catalog.help(BUILTIN_COMPONENT, "shortcode:fullname"), None);
    }
}
