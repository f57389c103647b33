//! Stache - logic-less {{mustache}} templates
//!
//! Templates are compiled once into a flat program of ops and rendered against
//! a [`Value`] tree. Supported tags are variables (`{{name}}`, `{{{name}}}`,
//! `{{&name}}`), sections (`{{#name}}...{{/name}}`), inverted sections
//! (`{{^name}}...{{/name}}`), partials (`{{>name}}`), comments (`{{! ... }}`)
//! and delimiter switches (`{{=<% %>=}}`).
//!
//! # Example
//!
//! ```rust
//! use stache::{render, Partials, Value};
//!
//! let view = Value::from_iter([
//!     ("title", Value::from("Fruit & veg")),
//!     ("items", Value::from(vec!["apple", "leek"])),
//! ]);
//! let out = render(
//!     "<h1>{{title}}</h1>\n{{#items}}\n- {{.}}\n{{/items}}\n",
//!     &view,
//!     &Partials::new(),
//! )
//! .unwrap();
//!
//! assert_eq!(out, "<h1>Fruit &amp; veg</h1>\n- apple\n- leek\n");
//! ```

pub mod config;
pub mod error;
pub mod parser;
pub mod renderer;
pub mod template;
pub mod value;

pub use config::{CompileOptions, Delimiters, OptionsError};
pub use error::{CompileError, CompileErrorKind, Location, RenderError};
pub use parser::{parse, Program};
pub use renderer::{Completion, Sink, SECTION_NESTING_LIMIT};
pub use template::{Context, Partial, Partials, Template, TemplateCache};
pub use value::{Map, SectionCall, Value};

use std::sync::Arc;

use thiserror::Error;

/// Errors from the one-shot compile-and-render functions
#[derive(Debug, Error)]
pub enum Error {
    /// The template failed to compile
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The template failed to render
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Compile a template with default options through the global cache
pub fn compile(text: &str) -> Result<Arc<Template>, CompileError> {
    compile_with_options(text, &CompileOptions::default())
}

/// Compile a template through the global cache
///
/// # Example
///
/// ```rust
/// use stache::{compile_with_options, CompileOptions, Delimiters, Partials, Value};
///
/// let options = CompileOptions::new().with_tags(Delimiters::new("<%", "%>").unwrap());
/// let template = compile_with_options("Hi <%name%>", &options).unwrap();
/// let view = Value::from_iter([("name", "Eve")]);
///
/// assert_eq!(template.render(&view, &Partials::new()).unwrap(), "Hi Eve");
/// ```
pub fn compile_with_options(
    text: &str,
    options: &CompileOptions,
) -> Result<Arc<Template>, CompileError> {
    TemplateCache::global().compile(text, options)
}

/// Compile (or reuse) `text` and render it against `view`
pub fn render(text: &str, view: &Value, partials: &Partials) -> Result<String, Error> {
    Ok(compile(text)?.render(view, partials)?)
}

/// Compile (or reuse) `text` and stream the output to `sink`
pub fn render_to<S: Sink>(
    text: &str,
    view: &Value,
    partials: &Partials,
    sink: &mut S,
) -> Result<Completion, Error> {
    Ok(compile(text)?.render_to(view, partials, sink)?)
}

/// Empty the global template cache
pub fn clear_cache() {
    TemplateCache::global().clear();
}
