//! Bracket shortcode expansion.
//!
//! Rewrites `[tag attr=value]` and `[tag]content[/tag]` occurrences in text
//! with the output of registered handlers.
//!
//! # Architecture
//!
//! - [`Attributes`]: parses the text between a tag name and its `]`
//! - [`expand`]: single-pass scanner that splices replacements into the text
//! - [`Registry`]: resolves tag names to [`Handler`]s
//! - [`Processor`]: drives [`expand`] with a registry, an [`Environment`] and
//!   recursion for nested content
//!
//! Definition discovery and caching live in the `sc-registry` crate.
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
//!     "greet".to_owned(),
//!     Rc::new(Handler::from_fn(false, |_, attrs, _, env, _| {
//!         let name = attrs.text("name").or(env.value("firstname")).unwrap_or("you");
//!         format!("Hello, {name}!")
//!     })),
//! );
//!
//! let processor = Processor::new(handlers);
//! let env = Environment::default().with_value("firstname", "Ada");
//! assert_eq!(processor.process_with("[greet]", &env), "Hello, Ada!");
//! assert_eq!(processor.process_with(r#"[greet name="Bob"]"#, &env), "Hello, Bob!");
//! ```

mod attributes;
mod environment;
mod error;
mod handler;
mod processor;
mod registry;
mod scanner;

pub use attributes::{AttrValue, Attributes};
pub use environment::{Environment, SYSTEM_CONTEXT, TextFormat, UnknownFormat};
pub use error::ProcessError;
pub use handler::{CallbackFn, Handler};
pub use processor::{Processor, ProcessorConfig};
pub use registry::Registry;
pub use scanner::{ContentProcessor, TagInfo, expand};
