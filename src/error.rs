//! Error types for compiling and rendering templates

use std::fmt;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::parser::ast::Span;

/// Where in a template a compile error was detected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Label of the template (file name or `<template>`)
    pub file: String,
    /// 1-based line the offending tag starts on
    pub line: usize,
    /// Byte range of the offending tag
    pub span: Span,
    /// Surrounding source lines, the offending one marked with `>>`
    pub excerpt: String,
}

impl Location {
    pub(crate) fn new(template: &str, file: &str, line: usize, span: Span) -> Self {
        Self {
            file: file.to_string(),
            line,
            span,
            excerpt: excerpt(template, line),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}\n{}", self.file, self.line, self.excerpt)
    }
}

/// Two lines before through three lines after `line`
fn excerpt(template: &str, line: usize) -> String {
    let lines: Vec<&str> = template.split('\n').collect();
    let end = (line + 3).min(lines.len());
    let start = line.saturating_sub(3).min(end);

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let marker = if start + i + 1 == line { " >> " } else { "    " };
            format!("{}{}", marker, text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The structural fault behind a [`CompileError`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileErrorKind {
    /// An open delimiter without a matching close delimiter
    #[error("tag \"{open}\" was not closed properly")]
    UnclosedTag { open: String },

    /// A section or inverted section tag with a blank name
    #[error("section name may not be empty")]
    EmptySectionName,

    /// A close tag that does not match the innermost open section
    #[error("section named \"{name}\" was never opened")]
    UnmatchedSectionClose {
        name: String,
        /// Name of the section that was actually open, if any
        expected: Option<String>,
    },

    /// End of input with a section still open
    #[error("section \"{name}\" was not closed properly")]
    UnclosedSection { name: String },

    /// A delimiter switch tag without any delimiters in it
    #[error("invalid delimiter switch \"{tag}\"")]
    InvalidDelimiters { tag: String },
}

/// A template failed to compile
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}\n\n{kind}")]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub location: Location,
}

impl CompileError {
    pub(crate) fn new(kind: CompileErrorKind, location: Location) -> Self {
        Self { kind, location }
    }

    /// Line the error was detected on
    pub fn line(&self) -> usize {
        self.location.line
    }

    /// Format the error with source context using ariadne
    pub fn report(&self, source: &str) -> String {
        let filename = self.location.file.as_str();
        let span = char_span(source, &self.location.span);
        let message = self.kind.to_string();

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_config(Config::default().with_color(false))
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(&message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// ariadne counts characters, spans here are bytes
fn char_span(source: &str, span: &Span) -> Span {
    let clamp = |offset: usize| {
        let offset = offset.min(source.len());
        source
            .char_indices()
            .take_while(|(i, _)| *i < offset)
            .count()
    };
    clamp(span.start)..clamp(span.end)
}

/// Errors raised while rendering a compiled template
#[derive(Debug, Error)]
pub enum RenderError {
    /// Partial inclusion nested deeper than the configured limit
    #[error("partial \"{name}\" exceeded the inclusion depth limit of {limit}")]
    RecursionLimitExceeded { name: String, limit: usize },

    /// Section bodies nested deeper than the renderer allows
    #[error("section \"{name}\" exceeded the nesting limit of {limit}")]
    SectionNestingExceeded { name: String, limit: usize },

    /// A partial supplied as source text failed to compile
    #[error("partial \"{name}\" failed to compile:\n{source}")]
    Partial {
        name: String,
        #[source]
        source: CompileError,
    },

    /// A section lambda returned an error
    #[error("lambda for section \"{section}\" failed: {source}")]
    Lambda {
        section: String,
        #[source]
        source: Box<crate::Error>,
    },
}
