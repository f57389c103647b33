//! Compiled program representation

use std::fmt;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A single instruction of a compiled template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Write text as-is
    Literal(String),
    /// Resolve a name and write its HTML-escaped text
    Escaped(String),
    /// Resolve a name and write its text unescaped
    Raw(String),
    /// Open a section; the next `body_len` ops are its body, followed by
    /// the matching [`Op::EndSection`]
    Section {
        name: String,
        inverted: bool,
        body_len: usize,
        /// Unrendered source between the open and close tags
        raw: String,
    },
    EndSection(String),
    /// Render a named partial with the innermost scope as its view
    Partial(String),
}

/// An immutable sequence of ops produced by [`crate::parser::parse`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    ops: Vec<Op>,
}

impl Program {
    pub(crate) fn new(ops: Vec<Op>) -> Self {
        Self { ops }
    }

    /// All ops in execution order
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut depth = 0usize;
        for (index, op) in self.ops.iter().enumerate() {
            if matches!(op, Op::EndSection(_)) {
                depth = depth.saturating_sub(1);
            }
            write!(f, "{:04} {}", index, "  ".repeat(depth))?;
            match op {
                Op::Literal(text) => writeln!(f, "literal {:?}", text)?,
                Op::Escaped(name) => writeln!(f, "escaped {}", name)?,
                Op::Raw(name) => writeln!(f, "raw {}", name)?,
                Op::Section {
                    name,
                    inverted,
                    body_len,
                    ..
                } => {
                    let kind = if *inverted { "inverted" } else { "section" };
                    writeln!(f, "{} {} ({} ops)", kind, name, body_len)?;
                    depth += 1;
                }
                Op::EndSection(name) => writeln!(f, "end {}", name)?,
                Op::Partial(name) => writeln!(f, "partial {}", name)?,
            }
        }
        Ok(())
    }
}
