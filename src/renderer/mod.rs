//! Rendering compiled programs
//!
//! The executor walks a [`Program`](crate::parser::Program)'s ops against a
//! context stack and writes output chunks to a [`Sink`].

mod escape;
mod executor;
mod section;
mod sink;

pub use escape::escape_html;
pub use sink::{Completion, Sink};

pub use executor::SECTION_NESTING_LIMIT;

pub(crate) use executor::Executor;
pub(crate) use sink::Buffer;
