//! Named callback table.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use sc_engine::{Attributes, CallbackFn, Environment};

/// Maps callback names used in definitions to functions.
///
/// Definitions are plain data and can be cached; they refer to their
/// callback by name and the registry resolves it here when a handler is
/// first requested.
#[derive(Clone, Default)]
pub struct Callbacks {
    entries: HashMap<String, Rc<CallbackFn>>,
}

impl Callbacks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` under `name`, replacing any previous one.
    pub fn insert<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: Fn(&str, &Attributes, Option<&str>, &Environment, &dyn Fn(&str) -> String) -> String
            + 'static,
    {
        self.entries.insert(name.into(), Rc::new(callback));
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&str, &Attributes, Option<&str>, &Environment, &dyn Fn(&str) -> String) -> String
            + 'static,
    {
        self.insert(name, callback);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Rc<CallbackFn>> {
        self.entries.get(name).map(Rc::clone)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.entries.keys().collect();
        names.sort();
        f.debug_struct("Callbacks").field("names", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        let mut callbacks = Callbacks::new().with("one", |_, _, _, _, _| String::from("1"));
        callbacks.insert("two", |_, _, _, _, _| String::from("2"));

        assert_eq!(callbacks.len(), 2);
        assert!(callbacks.contains("one"));
        assert!(callbacks.get("three").is_none());

        let two = callbacks.get("two").unwrap();
        let out = two("x", &Attributes::new(), None, &Environment::default(), &|s: &str| {
            s.to_owned()
        });
        assert_eq!(out, "2");
        assert_eq!(format!("{callbacks:?}"), r#"Callbacks { names: ["one", "two"] }"#);
    }
}
