//! Top-level expansion with recursion support.
//!
//! The processor connects a [`Registry`] to the [`expand`] scanner. Every
//! handled tag becomes a content processor that forwards to the tag's
//! [`Handler`](crate::Handler), passing the environment and a `recurse`
//! function that expands nested shortcodes with a copy of that environment.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use std::rc::Rc;
//!
//! use sc_engine::{Environment, Handler, Processor};
//!
//! let mut handlers = HashMap::new();
//! handlers.insert(
//!     "shout".to_owned(),
//!     Rc::new(Handler::from_fn(true, |_, _, content, _, recurse| {
//!         recurse(content.unwrap_or_default()).to_uppercase()
//!     })),
//! );
//!
//! let mut processor = Processor::new(handlers);
//! processor.set_environment(Environment::default());
//! assert_eq!(processor.process("a [shout]b[/shout]").unwrap(), "a B");
//! ```

use crate::{Environment, ProcessError, Registry, TagInfo, expand};

/// Configuration for the [`Processor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Maximum number of nested `recurse` calls.
    ///
    /// Text handed to `recurse` beyond this depth is returned unexpanded.
    ///
    /// Default: 32
    pub max_depth: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}

/// Expands shortcodes using handlers from a registry.
///
/// [`process`](Self::process) consumes the environment stored with
/// [`set_environment`](Self::set_environment); it is cleared on every exit
/// path, so each call needs a fresh one. [`process_with`](Self::process_with)
/// takes the environment explicitly and has no such state.
pub struct Processor<R> {
    registry: R,
    config: ProcessorConfig,
    env: Option<Environment>,
}

impl<R: Registry> Processor<R> {
    /// Create a processor with default configuration.
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            config: ProcessorConfig::default(),
            env: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ProcessorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Store the environment for the next [`process`](Self::process) call.
    pub fn set_environment(&mut self, env: Environment) {
        self.env = Some(env);
    }

    /// Returns `true` if an environment is waiting to be used.
    #[must_use]
    pub fn has_environment(&self) -> bool {
        self.env.is_some()
    }

    /// Expand `text` with the stored environment and clear it.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::MissingEnvironment`] if no environment was set
    /// since the last call.
    pub fn process(&mut self, text: &str) -> Result<String, ProcessError> {
        let env = self.env.take().ok_or(ProcessError::MissingEnvironment)?;
        Ok(self.process_with(text, &env))
    }

    /// Expand `text` with an explicit environment.
    pub fn process_with(&self, text: &str, env: &Environment) -> String {
        self.expand_at(text, env, 0)
    }

    fn expand_at(&self, text: &str, env: &Environment, depth: usize) -> String {
        if depth > self.config.max_depth {
            tracing::warn!(
                depth,
                max_depth = self.config.max_depth,
                "shortcode nesting too deep, leaving text unexpanded"
            );
            return text.to_owned();
        }

        expand(text, move |tag| {
            let handler = self.registry.handler(tag)?;
            let tag = tag.to_owned();

            Some(TagInfo::new(
                handler.wraps_content(),
                move |attrs, content| {
                    let recurse = |inner: &str| {
                        let scoped = env.clone();
                        self.expand_at(inner, &scoped, depth + 1)
                    };
                    handler.invoke(&tag, &attrs, content, env, &recurse)
                },
            ))
        })
    }
}
