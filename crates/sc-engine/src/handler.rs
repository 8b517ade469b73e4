//! Runtime handler for a registered tag.

use std::fmt;
use std::rc::Rc;

use crate::{Attributes, Environment};

/// Handler callback.
///
/// Arguments are the tag name, parsed attributes, wrapped content (`None` for
/// self-closing tags), the environment and a function that expands nested
/// shortcodes in a piece of text.
pub type CallbackFn =
    dyn Fn(&str, &Attributes, Option<&str>, &Environment, &dyn Fn(&str) -> String) -> String;

/// A callback plus whether it consumes wrapped content.
#[derive(Clone)]
pub struct Handler {
    wraps_content: bool,
    callback: Rc<CallbackFn>,
}

impl Handler {
    /// Create a handler from a shared callback.
    #[must_use]
    pub fn new(wraps_content: bool, callback: Rc<CallbackFn>) -> Self {
        Self {
            wraps_content,
            callback,
        }
    }

    /// Create a handler from a closure.
    ///
    /// ```
    /// use sc_engine::Handler;
    ///
    /// let shout = Handler::from_fn(true, |_, _, content, _, recurse| {
    ///     recurse(content.unwrap_or_default()).to_uppercase()
    /// });
    /// assert!(shout.wraps_content());
    /// ```
    pub fn from_fn<F>(wraps_content: bool, callback: F) -> Self
    where
        F: Fn(&str, &Attributes, Option<&str>, &Environment, &dyn Fn(&str) -> String) -> String
            + 'static,
    {
        Self::new(wraps_content, Rc::new(callback))
    }

    #[must_use]
    pub fn wraps_content(&self) -> bool {
        self.wraps_content
    }

    /// Run the callback.
    pub fn invoke(
        &self,
        tag: &str,
        attrs: &Attributes,
        content: Option<&str>,
        env: &Environment,
        recurse: &dyn Fn(&str) -> String,
    ) -> String {
        (self.callback)(tag, attrs, content, env, recurse)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("wraps_content", &self.wraps_content)
            .finish_non_exhaustive()
    }
}
