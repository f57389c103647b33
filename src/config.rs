//! Compile options
//!
//! Options can be built in code or loaded from TOML:
//!
//! ```toml
//! tags = ["<%", "%>"]
//! file = "views/page.mustache"
//! preserve_whitespace = false
//! cache = true
//! partial_depth_limit = 64
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Label used in diagnostics when no file name is configured
pub const DEFAULT_FILE_LABEL: &str = "<template>";

/// Errors that can occur when building or loading options
#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Failed to read options file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse options TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid tags: {reason}")]
    InvalidTags { reason: String },
}

/// Open and close tag markers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct Delimiters {
    open: String,
    close: String,
}

impl Delimiters {
    /// Create a delimiter pair; neither side may be empty or contain whitespace
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Result<Self, OptionsError> {
        let open = open.into();
        let close = close.into();

        for tag in [&open, &close] {
            if tag.is_empty() {
                return Err(OptionsError::InvalidTags {
                    reason: "delimiters may not be empty".to_string(),
                });
            }
            if tag.chars().any(char::is_whitespace) {
                return Err(OptionsError::InvalidTags {
                    reason: format!("delimiter {:?} contains whitespace", tag),
                });
            }
        }

        Ok(Self { open, close })
    }

    pub fn open(&self) -> &str {
        &self.open
    }

    pub fn close(&self) -> &str {
        &self.close
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            open: "{{".to_string(),
            close: "}}".to_string(),
        }
    }
}

impl TryFrom<Vec<String>> for Delimiters {
    type Error = OptionsError;

    fn try_from(tags: Vec<String>) -> Result<Self, Self::Error> {
        match <[String; 2]>::try_from(tags) {
            Ok([open, close]) => Self::new(open, close),
            Err(tags) => Err(OptionsError::InvalidTags {
                reason: format!("expected [open, close], got {} entries", tags.len()),
            }),
        }
    }
}

/// Options controlling how a template is compiled and rendered
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileOptions {
    /// Delimiters in effect at the start of the template
    pub tags: Delimiters,

    /// Label shown in diagnostics
    pub file: Option<String>,

    /// Keep the whitespace of lines holding only a standalone tag
    pub preserve_whitespace: bool,

    /// Memoize the compiled template
    pub cache: bool,

    /// How deep partials (and lambda renders) may nest
    pub partial_depth_limit: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            tags: Delimiters::default(),
            file: None,
            preserve_whitespace: false,
            cache: true,
            partial_depth_limit: 64,
        }
    }
}

impl CompileOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, OptionsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load options from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the initial delimiters
    pub fn with_tags(mut self, tags: Delimiters) -> Self {
        self.tags = tags;
        self
    }

    /// Set the diagnostics label
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Keep standalone tag lines verbatim
    pub fn with_preserve_whitespace(mut self, preserve: bool) -> Self {
        self.preserve_whitespace = preserve;
        self
    }

    /// Enable or disable caching
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    /// Set the partial nesting limit
    pub fn with_partial_depth_limit(mut self, limit: usize) -> Self {
        self.partial_depth_limit = limit;
        self
    }

    /// The diagnostics label, falling back to [`DEFAULT_FILE_LABEL`]
    pub fn file_label(&self) -> &str {
        self.file.as_deref().unwrap_or(DEFAULT_FILE_LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_options() {
        let options = CompileOptions::default();
        assert_eq!(options.tags.open(), "{{");
        assert_eq!(options.tags.close(), "}}");
        assert_eq!(options.file_label(), "<template>");
        assert!(!options.preserve_whitespace);
        assert!(options.cache);
        assert_eq!(options.partial_depth_limit, 64);
    }

    #[test]
    fn test_builder_pattern() {
        let options = CompileOptions::new()
            .with_tags(Delimiters::new("<%", "%>").unwrap())
            .with_file("page.mustache")
            .with_preserve_whitespace(true)
            .with_cache(false)
            .with_partial_depth_limit(8);

        assert_eq!(options.tags, Delimiters::new("<%", "%>").unwrap());
        assert_eq!(options.file_label(), "page.mustache");
        assert!(options.preserve_whitespace);
        assert!(!options.cache);
        assert_eq!(options.partial_depth_limit, 8);
    }

    #[test]
    fn test_from_toml() {
        let options = CompileOptions::from_toml_str(
            r#"
            tags = ["<%", "%>"]
            file = "mail.mustache"
            preserve_whitespace = true
            "#,
        )
        .unwrap();

        assert_eq!(options.tags.open(), "<%");
        assert_eq!(options.tags.close(), "%>");
        assert_eq!(options.file.as_deref(), Some("mail.mustache"));
        assert!(options.preserve_whitespace);
        assert!(options.cache);
    }

    #[test]
    fn test_from_empty_toml_is_default() {
        assert_eq!(
            CompileOptions::from_toml_str("").unwrap(),
            CompileOptions::default()
        );
    }

    #[test]
    fn test_toml_rejects_bad_tags() {
        assert!(CompileOptions::from_toml_str(r#"tags = ["<%"]"#).is_err());
        assert!(CompileOptions::from_toml_str(r#"tags = ["", "%>"]"#).is_err());
    }

    #[test]
    fn test_toml_rejects_unknown_keys() {
        let result = CompileOptions::from_toml_str("debug = true");
        assert!(matches!(result, Err(OptionsError::ParseError(_))));
    }

    #[test]
    fn test_delimiters_validation() {
        assert!(Delimiters::new("", "}}").is_err());
        assert!(Delimiters::new("< %", "%>").is_err());
        assert!(Delimiters::new("|", "|").is_ok());
    }
}
