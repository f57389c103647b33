//! Partial template table

use std::collections::HashMap;
use std::sync::Arc;

use super::compiled::Template;

/// A partial, either as source text or already compiled
#[derive(Debug, Clone)]
pub enum Partial {
    /// Compiled on first use with default options
    Source(String),
    Compiled(Arc<Template>),
}

/// Named partials available while rendering
///
/// Looking up a name that is not in the table renders nothing.
#[derive(Debug, Clone, Default)]
pub struct Partials {
    entries: HashMap<String, Partial>,
}

impl Partials {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a partial from source text
    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.entries
            .insert(name.into(), Partial::Source(source.into()));
    }

    /// Add an already compiled partial
    pub fn insert_compiled(&mut self, name: impl Into<String>, template: Arc<Template>) {
        self.entries
            .insert(name.into(), Partial::Compiled(template));
    }

    /// Builder form of [`Partials::insert`]
    pub fn with(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Partial> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Get all partial names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Partials {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut partials = Self::new();
        for (name, source) in iter {
            partials.insert(name, source);
        }
        partials
    }
}

impl From<HashMap<String, String>> for Partials {
    fn from(sources: HashMap<String, String>) -> Self {
        sources.into_iter().collect()
    }
}
