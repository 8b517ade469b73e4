//! Tag name to handler resolution.

use std::collections::HashMap;
use std::rc::Rc;

use crate::Handler;

/// Resolves tag names to handlers.
///
/// Implementations must be deterministic: asking twice for the same tag
/// returns the same handler instance.
pub trait Registry {
    /// Handler for `tag`, or `None` if the tag is not handled.
    fn handler(&self, tag: &str) -> Option<Rc<Handler>>;
}

impl<R: Registry + ?Sized> Registry for &R {
    fn handler(&self, tag: &str) -> Option<Rc<Handler>> {
        (**self).handler(tag)
    }
}

impl<R: Registry + ?Sized> Registry for Rc<R> {
    fn handler(&self, tag: &str) -> Option<Rc<Handler>> {
        (**self).handler(tag)
    }
}

impl<R: Registry + ?Sized> Registry for Box<R> {
    fn handler(&self, tag: &str) -> Option<Rc<Handler>> {
        (**self).handler(tag)
    }
}

/// Plain map of prebuilt handlers, mostly useful in tests.
impl Registry for HashMap<String, Rc<Handler>> {
    fn handler(&self, tag: &str) -> Option<Rc<Handler>> {
        self.get(tag).map(Rc::clone)
    }
}
