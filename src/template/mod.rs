//! Compiled templates, partials and the template cache
//!
//! A [`Template`] is produced by a [`TemplateCache`] and rendered against a
//! [`Value`](crate::Value) with a table of [`Partials`]. Names in tags are
//! looked up through a [`Context`] stack.
//!
//! # Example
//!
//! ```rust
//! use stache::{CompileOptions, Partials, TemplateCache, Value};
//!
//! let cache = TemplateCache::new();
//! let template = cache
//!     .compile("{{#items}}{{>item}}{{/items}}", &CompileOptions::default())
//!     .unwrap();
//! let partials = Partials::new().with("item", "[{{.}}]");
//! let view = Value::from_iter([("items", Value::from(vec![1, 2]))]);
//!
//! assert_eq!(template.render(&view, &partials).unwrap(), "[1][2]");
//! ```

mod compiled;
mod partials;
pub(crate) mod registry;
mod resolver;

pub use compiled::Template;
pub use partials::{Partial, Partials};
pub use registry::TemplateCache;
pub use resolver::{resolve, Context};
