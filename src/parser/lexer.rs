//! Scanner for template source
//!
//! Tag recognition depends on delimiters that can change mid-template, so tags
//! are found by a hand-driven [`Scanner`]. The literal text between tags is
//! split with a logos lexer into newline, blank and text runs for the
//! whitespace pass.

use logos::Logos;

use crate::config::Delimiters;
use crate::error::{CompileError, CompileErrorKind, Location};
use crate::parser::ast::Span;

/// Runs of literal text
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextToken {
    #[token("\n")]
    Newline,

    #[regex(r"[ \t\r\x0B\x0C]+")]
    Blank,

    #[regex(r"[^ \t\r\x0B\x0C\n]+")]
    Text,
}

/// Lex literal text into runs with spans
pub fn lex_text(input: &str) -> impl Iterator<Item = (TextToken, Span)> + '_ {
    TextToken::lexer(input)
        .spanned()
        .map(|(tok, span)| (tok.unwrap_or(TextToken::Text), span))
}

/// The character following the open delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sigil {
    /// `!`
    Comment,
    /// `#`
    Section,
    /// `^`
    InvertedSection,
    /// `/`
    Close,
    /// `=`
    Delimiters,
    /// `>`
    Partial,
    /// `{`
    Triple,
    /// `&`
    Ampersand,
    /// No sigil: an escaped variable
    None,
}

impl Sigil {
    fn from_byte(byte: Option<&u8>) -> Self {
        match byte {
            Some(b'!') => Sigil::Comment,
            Some(b'#') => Sigil::Section,
            Some(b'^') => Sigil::InvertedSection,
            Some(b'/') => Sigil::Close,
            Some(b'=') => Sigil::Delimiters,
            Some(b'>') => Sigil::Partial,
            Some(b'{') => Sigil::Triple,
            Some(b'&') => Sigil::Ampersand,
            _ => Sigil::None,
        }
    }
}

/// A tag as found in the source, before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTag<'s> {
    pub sigil: Sigil,
    /// Everything between the sigil and the close delimiter
    pub source: &'s str,
    /// Line the tag opens on
    pub line: usize,
    /// Byte range of the whole tag, delimiters included
    pub span: Span,
}

/// One step of the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scanned<'s> {
    Text(&'s str),
    Tag(RawTag<'s>),
}

/// Splits a template into literal text and tags
pub struct Scanner<'s> {
    template: &'s str,
    file: &'s str,
    pos: usize,
    line: usize,
    open: String,
    close: String,
    failed: bool,
}

impl<'s> Scanner<'s> {
    pub fn new(template: &'s str, tags: &Delimiters, file: &'s str) -> Self {
        Self {
            template,
            file,
            pos: 0,
            line: 1,
            open: tags.open().to_string(),
            close: tags.close().to_string(),
            failed: false,
        }
    }

    fn scan_text(&mut self, len: usize) -> Scanned<'s> {
        let text = &self.template[self.pos..self.pos + len];
        self.line += text.matches('\n').count();
        self.pos += len;
        Scanned::Text(text)
    }

    fn scan_tag(&mut self) -> Result<Scanned<'s>, CompileError> {
        let start = self.pos;
        let line = self.line;
        let mut inner = start + self.open.len();

        let sigil = Sigil::from_byte(self.template.as_bytes().get(inner));
        if sigil != Sigil::None {
            inner += 1;
        }

        let close = match sigil {
            Sigil::Delimiters => format!("={}", self.close),
            Sigil::Triple => format!("}}{}", self.close),
            _ => self.close.clone(),
        };

        let Some(offset) = self.template[inner..].find(close.as_str()) else {
            return Err(CompileError::new(
                CompileErrorKind::UnclosedTag {
                    open: self.open.clone(),
                },
                Location::new(self.template, self.file, line, start..self.template.len()),
            ));
        };

        let end = inner + offset;
        let source = &self.template[inner..end];
        self.line += source.matches('\n').count();
        self.pos = end + close.len();
        let span = start..self.pos;

        if sigil == Sigil::Delimiters {
            self.switch_delimiters(source, line, span.clone())?;
        }

        Ok(Scanned::Tag(RawTag {
            sigil,
            source,
            line,
            span,
        }))
    }

    /// Apply `{{=open close=}}`, effective right after the tag
    fn switch_delimiters(&mut self, source: &str, line: usize, span: Span) -> Result<(), CompileError> {
        let mut words = source.split_whitespace();
        let Some(open) = words.next() else {
            return Err(CompileError::new(
                CompileErrorKind::InvalidDelimiters {
                    tag: source.to_string(),
                },
                Location::new(self.template, self.file, line, span),
            ));
        };
        let close = words.last().unwrap_or(open);

        self.open = open.to_string();
        self.close = close.to_string();
        Ok(())
    }
}

impl<'s> Iterator for Scanner<'s> {
    type Item = Result<Scanned<'s>, CompileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.template.len() {
            return None;
        }

        let rest = &self.template[self.pos..];
        let item = match rest.find(self.open.as_str()) {
            Some(0) => self.scan_tag(),
            Some(offset) => Ok(self.scan_text(offset)),
            None => Ok(self.scan_text(rest.len())),
        };

        self.failed = item.is_err();
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scan(input: &str) -> Vec<Scanned<'_>> {
        Scanner::new(input, &Delimiters::default(), "<template>")
            .collect::<Result<Vec<_>, _>>()
            .expect("Should scan")
    }

    fn tags(input: &str) -> Vec<(Sigil, &str)> {
        scan(input)
            .into_iter()
            .filter_map(|s| match s {
                Scanned::Tag(tag) => Some((tag.sigil, tag.source)),
                Scanned::Text(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_text_runs() {
        let tokens: Vec<_> = lex_text("  ab\tc\n").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                TextToken::Blank,
                TextToken::Text,
                TextToken::Blank,
                TextToken::Text,
                TextToken::Newline
            ]
        );
    }

    #[test]
    fn test_text_runs_keep_unicode() {
        let spans: Vec<_> = lex_text("héllo wörld").collect();
        assert_eq!(
            spans,
            vec![
                (TextToken::Text, 0..6),
                (TextToken::Blank, 6..7),
                (TextToken::Text, 7..13)
            ]
        );
    }

    #[test]
    fn test_text_and_tags() {
        let scanned = scan("Hello {{name}}!");
        assert_eq!(scanned.len(), 3);
        assert_eq!(scanned[0], Scanned::Text("Hello "));
        assert_eq!(
            scanned[1],
            Scanned::Tag(RawTag {
                sigil: Sigil::None,
                source: "name",
                line: 1,
                span: 6..14,
            })
        );
        assert_eq!(scanned[2], Scanned::Text("!"));
    }

    #[test]
    fn test_sigils() {
        assert_eq!(
            tags("{{!c}}{{#s}}{{^i}}{{/s}}{{>p}}{{&r}}{{{t}}}{{e}}"),
            vec![
                (Sigil::Comment, "c"),
                (Sigil::Section, "s"),
                (Sigil::InvertedSection, "i"),
                (Sigil::Close, "s"),
                (Sigil::Partial, "p"),
                (Sigil::Ampersand, "r"),
                (Sigil::Triple, "t"),
                (Sigil::None, "e"),
            ]
        );
    }

    #[test]
    fn test_delimiter_switch() {
        assert_eq!(
            tags("{{=<% %>=}}<%a%>{{b}}<%={{ }}=%>{{c}}"),
            vec![
                (Sigil::Delimiters, "<% %>"),
                (Sigil::None, "a"),
                (Sigil::Delimiters, "{{ }}"),
                (Sigil::None, "c"),
            ]
        );
    }

    #[test]
    fn test_switch_keeps_old_delimiters_literal() {
        let scanned = scan("{{=| |=}}|x|{{y}}");
        assert_eq!(scanned.last(), Some(&Scanned::Text("{{y}}")));
    }

    #[test]
    fn test_single_word_switch() {
        assert_eq!(
            tags("{{=|=}}|x|"),
            vec![(Sigil::Delimiters, "|"), (Sigil::None, "x")]
        );
    }

    #[test]
    fn test_line_tracking() {
        let scanned = scan("a\nb {{!multi\nline}}\n{{x}}");
        let lines: Vec<usize> = scanned
            .iter()
            .filter_map(|s| match s {
                Scanned::Tag(tag) => Some(tag.line),
                Scanned::Text(_) => None,
            })
            .collect();
        assert_eq!(lines, vec![2, 4]);
    }

    #[test]
    fn test_unclosed_tag() {
        let result: Result<Vec<_>, _> =
            Scanner::new("ok\nHello {{name", &Delimiters::default(), "<template>").collect();
        let err = result.expect_err("Should fail");
        assert_eq!(
            err.kind,
            CompileErrorKind::UnclosedTag {
                open: "{{".to_string()
            }
        );
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn test_triple_needs_extra_brace() {
        let result: Result<Vec<_>, _> =
            Scanner::new("{{{name}}", &Delimiters::default(), "<template>").collect();
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_switch_is_rejected() {
        let result: Result<Vec<_>, _> =
            Scanner::new("{{= =}}", &Delimiters::default(), "<template>").collect();
        let err = result.expect_err("Should fail");
        assert!(matches!(err.kind, CompileErrorKind::InvalidDelimiters { .. }));
    }

    #[test]
    fn test_scanner_stops_after_error() {
        let mut scanner = Scanner::new("{{a", &Delimiters::default(), "<template>");
        assert!(matches!(scanner.next(), Some(Err(_))));
        assert!(scanner.next().is_none());
    }
}
