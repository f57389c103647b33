//! Memoized template compilation

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;

use crate::config::{CompileOptions, Delimiters};
use crate::error::CompileError;

use super::compiled::Template;

/// Everything that changes the compiled program
///
/// The file label only affects diagnostics, which a cached template never
/// produces, so it is not part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    tags: Delimiters,
    preserve_whitespace: bool,
    partial_depth_limit: usize,
}

impl CacheKey {
    fn new(text: &str, options: &CompileOptions) -> Self {
        Self {
            text: text.to_string(),
            tags: options.tags.clone(),
            preserve_whitespace: options.preserve_whitespace,
            partial_depth_limit: options.partial_depth_limit,
        }
    }
}

/// Shared storage behind a [`TemplateCache`]
#[derive(Debug, Default)]
pub(crate) struct CacheStore {
    entries: RwLock<HashMap<CacheKey, Arc<Template>>>,
}

impl CacheStore {
    fn read(&self) -> RwLockReadGuard<'_, HashMap<CacheKey, Arc<Template>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CacheKey, Arc<Template>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Compile `text`, consulting and filling `store` when caching is enabled
///
/// Compilation runs outside the lock; when two threads race on the same key
/// both compile and the last insert wins.
pub(crate) fn compile_in(
    store: &Arc<CacheStore>,
    text: &str,
    options: &CompileOptions,
) -> Result<Arc<Template>, CompileError> {
    let file = options.file_label();

    if !options.cache {
        return Template::build(text, options.clone(), Arc::downgrade(store)).map(Arc::new);
    }

    let key = CacheKey::new(text, options);
    if let Some(template) = store.read().get(&key) {
        tracing::debug!(file, "template cache hit");
        return Ok(Arc::clone(template));
    }

    tracing::debug!(file, "template cache miss");
    let template = Arc::new(Template::build(
        text,
        options.clone(),
        Arc::downgrade(store),
    )?);
    store.write().insert(key, Arc::clone(&template));
    Ok(template)
}

static GLOBAL: Lazy<TemplateCache> = Lazy::new(TemplateCache::new);

/// Memo of compiled templates
///
/// Cloning a cache yields a handle to the same storage.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use stache::{CompileOptions, TemplateCache};
///
/// let cache = TemplateCache::new();
/// let options = CompileOptions::default();
/// let first = cache.compile("{{greeting}}", &options).unwrap();
/// let second = cache.compile("{{greeting}}", &options).unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TemplateCache {
    store: Arc<CacheStore>,
}

impl TemplateCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by the crate-level functions
    pub fn global() -> &'static TemplateCache {
        &GLOBAL
    }

    /// Compile `text`, returning the memoized template when there is one
    pub fn compile(
        &self,
        text: &str,
        options: &CompileOptions,
    ) -> Result<Arc<Template>, CompileError> {
        compile_in(&self.store, text, options)
    }

    /// Drop every memoized template
    ///
    /// Templates already handed out stay usable.
    pub fn clear(&self) {
        let mut entries = self.store.write();
        let evicted = entries.len();
        entries.clear();
        tracing::debug!(evicted, "template cache cleared");
    }

    /// Whether a template for `text` compiled with `options` is memoized
    pub fn contains(&self, text: &str, options: &CompileOptions) -> bool {
        self.store
            .read()
            .contains_key(&CacheKey::new(text, options))
    }

    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }
}
