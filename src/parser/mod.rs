//! Parser for mustache template source
//!
//! Source is scanned into tags and text, checked for balanced sections,
//! stripped of standalone tag lines and assembled into a flat [`Program`].

pub mod ast;
mod grammar;
pub mod lexer;
mod whitespace;

pub use ast::*;
pub use grammar::parse;
