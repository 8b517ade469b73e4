//! Component directories with `shortcodes.toml` manifests.

use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{DefinitionData, RawDefinition, SourceError, StringCatalog};

use super::DefinitionSource;

/// Manifest file looked up in every component directory.
pub const MANIFEST_FILENAME: &str = "shortcodes.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Manifest {
    shortcodes: IndexMap<String, DefinitionData>,
    strings: HashMap<String, String>,
}

#[derive(Debug)]
struct Component {
    id: String,
    manifest: Manifest,
}

/// Discovers definitions in a directory of components.
///
/// ```text
/// {root}/
/// +-- course/
/// |   +-- shortcodes.toml
/// +-- legacy/            (skipped when disabled)
/// |   +-- shortcodes.toml
/// +-- notes/             (no manifest, contributes nothing)
/// ```
///
/// Every immediate subdirectory is a component named after the directory.
/// Components are visited in name order and a manifest's shortcodes keep
/// their file order. The `component` a manifest entry might set is ignored.
///
/// Manifests are read once, on the first [`fetch`](DefinitionSource::fetch)
/// or string lookup. A missing root directory yields no definitions.
pub struct ManifestSource {
    root: PathBuf,
    disabled: HashSet<String>,
    components: OnceCell<Vec<Component>>,
}

impl ManifestSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            disabled: HashSet::new(),
            components: OnceCell::new(),
        }
    }

    /// Skip the named components.
    #[must_use]
    pub fn with_disabled<I, S>(mut self, disabled: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled.extend(disabled.into_iter().map(Into::into));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn components(&self) -> Result<&[Component], SourceError> {
        if let Some(components) = self.components.get() {
            return Ok(components);
        }
        let scanned = self.scan()?;
        Ok(self.components.get_or_init(|| scanned))
    }

    fn scan(&self) -> Result<Vec<Component>, SourceError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(root = %self.root.display(), "components directory not found");
                return Ok(Vec::new());
            }
            Err(e) => return Err(SourceError::io(&self.root, e)),
        };

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SourceError::io(&self.root, e))?;
            let path = entry.path();
            if path.is_dir() {
                dirs.push((entry.file_name().to_string_lossy().into_owned(), path));
            }
        }
        dirs.sort_by(|a, b| a.0.cmp(&b.0));

        let mut components = Vec::new();
        for (id, dir) in dirs {
            if self.disabled.contains(&id) {
                tracing::debug!(component = %id, "skipping disabled component");
                continue;
            }
            let path = dir.join(MANIFEST_FILENAME);
            if !path.is_file() {
                continue;
            }
            let manifest = read_manifest(&path)?;
            tracing::debug!(
                component = %id,
                count = manifest.shortcodes.len(),
                "read shortcode manifest"
            );
            components.push(Component { id, manifest });
        }

        Ok(components)
    }
}

fn read_manifest(path: &Path) -> Result<Manifest, SourceError> {
    let content = fs::read_to_string(path).map_err(|e| SourceError::io(path, e))?;
    toml::from_str(&content).map_err(|source| SourceError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl DefinitionSource for ManifestSource {
    fn fetch(&self) -> Result<Vec<RawDefinition>, SourceError> {
        let components = self.components()?;

        Ok(components
            .iter()
            .flat_map(|component| {
                component.manifest.shortcodes.iter().map(|(tag, data)| {
                    RawDefinition::new(
                        tag.clone(),
                        DefinitionData {
                            component: Some(component.id.clone()),
                            ..data.clone()
                        },
                    )
                })
            })
            .collect())
    }

    fn catalog(&self) -> Option<&dyn StringCatalog> {
        Some(self)
    }
}

impl StringCatalog for ManifestSource {
    fn lookup(&self, component: &str, key: &str) -> Option<&str> {
        let components = match self.components() {
            Ok(components) => components,
            Err(e) => {
                tracing::warn!(error = %e, "cannot read component strings");
                return None;
            }
        };
        components
            .iter()
            .find(|c| c.id == component)?
            .manifest
            .strings
            .get(key)
            .map(String::as_str)
    }
}
