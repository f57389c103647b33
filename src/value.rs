//! Data context values
//!
//! A [`Value`] is what templates are rendered against. It can be built by hand,
//! converted from `serde_json` or `toml` values, or parsed from JSON/TOML text.
//!
//! # Example
//!
//! ```rust
//! use stache::Value;
//!
//! let view = Value::from_iter([
//!     ("name", Value::from("Ada")),
//!     ("langs", Value::from(vec!["en", "fr"])),
//! ]);
//! assert_eq!(view.get("name"), Some(&Value::from("Ada")));
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::Error;

/// Key/value scope
pub type Map = BTreeMap<String, Value>;

/// A value in the data context
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Map),
    /// Computed field, invoked with the innermost scope on lookup
    Lambda(Lambda),
    /// Section lambda, invoked with the raw section text
    Section(SectionLambda),
}

impl Value {
    /// Wrap a closure as a computed field
    pub fn lambda<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Value::Lambda(Lambda(Arc::new(f)))
    }

    /// Wrap a closure as a section lambda
    ///
    /// ```rust
    /// use stache::{render, Partials, Value};
    ///
    /// let view = Value::from_iter([
    ///     ("name", Value::from("Tom")),
    ///     ("bold", Value::section(|call| Ok(format!("<b>{}</b>", call.render(call.text())?)))),
    /// ]);
    /// let out = render("{{#bold}}Hi {{name}}.{{/bold}}", &view, &Partials::new()).unwrap();
    /// assert_eq!(out, "<b>Hi Tom.</b>");
    /// ```
    pub fn section<F>(f: F) -> Self
    where
        F: Fn(&SectionCall<'_>) -> Result<String, Error> + Send + Sync + 'static,
    {
        Value::Section(SectionLambda(Arc::new(f)))
    }

    /// Parse JSON text into a value
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<serde_json::Value>(content).map(Value::from)
    }

    /// Parse a TOML document into a map value
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<toml::Table>(content).map(|table| Value::from(toml::Value::Table(table)))
    }

    /// Look up a key when this value is a map
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Falsy values are `Null`, `false`, zero, NaN and the empty string
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0 && !f.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::List(_) | Value::Map(_) | Value::Lambda(_) | Value::Section(_) => true,
        }
    }

    /// Text written for this value by a variable tag
    ///
    /// Lists join their items with commas; maps and lambdas produce nothing.
    /// Floats use Rust's formatting, never exponent notation: `1e21` prints
    /// all of its digits.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed(""),
            Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Value::Int(n) => Cow::Owned(n.to_string()),
            Value::Float(f) => Cow::Owned(format_float(*f)),
            Value::String(s) => Cow::Borrowed(s),
            Value::List(items) => Cow::Owned(
                items
                    .iter()
                    .map(|item| item.to_text())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            Value::Map(_) | Value::Lambda(_) | Value::Section(_) => Cow::Borrowed(""),
        }
    }
}

fn format_float(f: f64) -> String {
    if f.is_infinite() {
        return if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if f.fract() == 0.0 && f.abs() < 1e15 {
        return format!("{}", f as i64);
    }
    f.to_string()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// A computed field
#[derive(Clone)]
pub struct Lambda(Arc<dyn Fn(&Value) -> Value + Send + Sync>);

impl Lambda {
    /// Invoke with the innermost scope
    pub fn call(&self, scope: &Value) -> Value {
        (self.0)(scope)
    }
}

impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Lambda(..)")
    }
}

impl PartialEq for Lambda {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

type SectionFn = dyn Fn(&SectionCall<'_>) -> Result<String, Error> + Send + Sync;

/// A lambda driving a section
#[derive(Clone)]
pub struct SectionLambda(Arc<SectionFn>);

impl SectionLambda {
    pub fn call(&self, call: &SectionCall<'_>) -> Result<String, Error> {
        (self.0)(call)
    }
}

impl fmt::Debug for SectionLambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SectionLambda(..)")
    }
}

impl PartialEq for SectionLambda {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Arguments handed to a [`SectionLambda`]
pub struct SectionCall<'a> {
    scope: &'a Value,
    text: &'a str,
    renderer: &'a dyn Fn(&str) -> Result<String, Error>,
}

impl<'a> SectionCall<'a> {
    pub(crate) fn new(
        scope: &'a Value,
        text: &'a str,
        renderer: &'a dyn Fn(&str) -> Result<String, Error>,
    ) -> Self {
        Self {
            scope,
            text,
            renderer,
        }
    }

    /// The innermost scope at the section
    pub fn scope(&self) -> &'a Value {
        self.scope
    }

    /// The section body as written, unrendered
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Render a template against the innermost scope
    pub fn render(&self, template: &str) -> Result<String, Error> {
        (self.renderer)(template)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n.into())
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        i64::try_from(n)
            .map(Value::Int)
            .unwrap_or(Value::Float(n as f64))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match value {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        use toml::Value as Toml;

        match value {
            Toml::String(s) => Value::String(s),
            Toml::Integer(i) => Value::Int(i),
            Toml::Float(f) => Value::Float(f),
            Toml::Boolean(b) => Value::Bool(b),
            Toml::Datetime(dt) => Value::String(dt.to_string()),
            Toml::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Toml::Table(table) => Value::Map(
                table
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}
