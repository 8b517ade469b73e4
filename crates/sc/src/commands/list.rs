//! `list` command implementation.

use std::collections::HashSet;

use clap::Args;
use sc_registry::{Definition, DefinitionRegistry, DefinitionSource, StringCatalog};

use super::{RegistryArgs, build_registry};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the list command.
#[derive(Args)]
pub(crate) struct ListArgs {
    /// Omit extended help text.
    #[arg(long)]
    brief: bool,

    #[command(flatten)]
    pub registry: RegistryArgs,
}

impl ListArgs {
    /// Execute the list command.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.registry.load_config()?;
        let registry = build_registry(&config);
        let loaded = registry.load().map_err(|e| CliError::Discovery(e.to_string()))?;
        let catalog = registry.source().catalog();

        if loaded.is_empty() {
            output.warning("No shortcodes found");
            return Ok(());
        }

        let mut seen = HashSet::new();
        for definition in loaded.definitions() {
            let shadowed = !seen.insert(definition.tag());
            let entry = Entry::describe(definition, catalog, shadowed);

            output.highlight(&entry.heading);
            for line in entry.details {
                if self.brief && line.help {
                    continue;
                }
                output.line(&format!("    {}", line.text));
            }
        }

        Ok(())
    }
}

struct Line {
    text: String,
    help: bool,
}

/// One definition, ready to print.
struct Entry {
    heading: String,
    details: Vec<Line>,
}

impl Entry {
    fn describe(
        definition: &Definition,
        catalog: Option<&dyn StringCatalog>,
        shadowed: bool,
    ) -> Self {
        let mut heading = format!("[{}]  {}", definition.tag(), definition.component());
        if definition.wraps() {
            heading.push_str("  (wraps content)");
        }
        if shadowed {
            heading.push_str("  (shadowed)");
        }

        let mut details = Vec::new();
        if let (Some(key), Some(catalog)) = (definition.description(), catalog) {
            if let Some(text) = catalog.lookup(definition.component(), key) {
                details.push(Line {
                    text: text.to_owned(),
                    help: false,
                });
            }
            if let Some(help) = catalog.help(definition.component(), key) {
                details.extend(help.lines().map(|line| Line {
                    text: line.to_owned(),
                    help: true,
                }));
            }
        }

        Self { heading, details }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sc_registry::StringTable;

    use super::*;

    fn texts(entry: &Entry) -> Vec<&str> {
        entry.details.iter().map(|line| line.text.as_str()).collect()
    }

    #[test]
    fn test_describe_with_description_and_help() {
        let catalog = StringTable::new()
            .with("course", "shortcode:grade", "The learner's grade.")
            .with("course", "shortcode:grade_help", "[grade]\n[grade scale=10]");
        let definition = Definition::new("grade", "course::grade", "course")
            .with_description("shortcode:grade");

        let entry = Entry::describe(&definition, Some(&catalog), false);

        assert_eq!(entry.heading, "[grade]  course");
        assert_eq!(
            texts(&entry),
            vec!["The learner's grade.", "[grade]", "[grade scale=10]"]
        );
        assert_eq!(entry.details.iter().filter(|line| line.help).count(), 2);
    }

    #[test]
    fn test_describe_marks_wrapping_and_shadowed() {
        let definition = Definition::new("off", "shortcodes::off", "course").with_wraps(true);

        let entry = Entry::describe(&definition, None, true);

        assert_eq!(entry.heading, "[off]  course  (wraps content)  (shadowed)");
        assert!(entry.details.is_empty());
    }

    #[test]
    fn test_describe_without_catalog_entry() {
        let catalog = StringTable::new();
        let definition =
            Definition::new("name", "course::name", "course").with_description("shortcode:name");

        let entry = Entry::describe(&definition, Some(&catalog), false);

        assert!(entry.details.is_empty());
    }
}
