//! In-memory registry built from a list of definitions.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;
use sc_engine::{Handler, Registry};

use crate::{Callbacks, Definition};

/// A [`Registry`] that can also enumerate its definitions.
pub trait DefinitionRegistry: Registry {
    /// Every definition, grouped by tag in first-registration order.
    ///
    /// Shadowed duplicates are included right after the definition that
    /// shadows them.
    fn definitions(&self) -> Box<dyn Iterator<Item = &Definition> + '_>;
}

/// Registry over a fixed list of definitions.
///
/// When several definitions share a tag, the first one wins; the others stay
/// enumerable through [`DefinitionRegistry::definitions`]. Handlers are built
/// on first request and memoized, including negative results.
#[derive(Debug)]
pub struct StaticRegistry {
    definitions: IndexMap<String, Vec<Definition>>,
    callbacks: Callbacks,
    handlers: RefCell<HashMap<String, Option<Rc<Handler>>>>,
}

impl StaticRegistry {
    pub fn new(definitions: impl IntoIterator<Item = Definition>, callbacks: Callbacks) -> Self {
        let mut grouped: IndexMap<String, Vec<Definition>> = IndexMap::new();
        for definition in definitions {
            let same_tag = grouped.entry(definition.tag().to_owned()).or_default();
            if let Some(first) = same_tag.first() {
                tracing::debug!(
                    tag = definition.tag(),
                    component = definition.component(),
                    winner = first.component(),
                    "shortcode already defined, keeping the first definition"
                );
            }
            same_tag.push(definition);
        }

        Self {
            definitions: grouped,
            callbacks,
            handlers: RefCell::new(HashMap::new()),
        }
    }

    /// Total number of definitions, shadowed ones included.
    pub fn len(&self) -> usize {
        self.definitions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// The definition that handles `tag`.
    pub fn active(&self, tag: &str) -> Option<&Definition> {
        self.definitions.get(tag)?.first()
    }

    fn build_handler(&self, tag: &str) -> Option<Rc<Handler>> {
        let definition = self.active(tag)?;
        let Some(callback) = self.callbacks.get(definition.callback()) else {
            tracing::warn!(
                tag,
                callback = definition.callback(),
                component = definition.component(),
                "shortcode callback is not registered, leaving tag unhandled"
            );
            return None;
        };
        Some(Rc::new(Handler::new(definition.wraps(), callback)))
    }
}

impl Registry for StaticRegistry {
    fn handler(&self, tag: &str) -> Option<Rc<Handler>> {
        if let Some(cached) = self.handlers.borrow().get(tag) {
            return cached.clone();
        }

        let handler = self.build_handler(tag);
        self.handlers
            .borrow_mut()
            .insert(tag.to_owned(), handler.clone());
        handler
    }
}

impl DefinitionRegistry for StaticRegistry {
    fn definitions(&self) -> Box<dyn Iterator<Item = &Definition> + '_> {
        Box::new(self.definitions.values().flatten())
    }
}
