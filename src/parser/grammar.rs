//! Tag classification and program building

use crate::config::CompileOptions;
use crate::error::{CompileError, CompileErrorKind, Location};
use crate::parser::ast::{Op, Program, Span};
use crate::parser::lexer::{lex_text, RawTag, Scanned, Scanner, Sigil, TextToken};
use crate::parser::whitespace;

/// A classified piece of template source
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Piece<'s> {
    Text(&'s str),
    Blank(&'s str),
    Newline,
    Variable { name: &'s str, escaped: bool },
    Open { name: &'s str, inverted: bool },
    Close { name: &'s str, raw: &'s str },
    Partial(&'s str),
    /// Comments and delimiter switches
    Silent,
}

impl Piece<'_> {
    /// Tags that may stand alone on a line
    pub(crate) fn is_standalone_tag(&self) -> bool {
        matches!(
            self,
            Piece::Open { .. } | Piece::Close { .. } | Piece::Partial(_) | Piece::Silent
        )
    }

    pub(crate) fn is_whitespace(&self) -> bool {
        matches!(self, Piece::Blank(_) | Piece::Newline)
    }
}

/// An open section awaiting its close tag
#[derive(Debug)]
struct Frame<'s> {
    name: &'s str,
    line: usize,
    span: Span,
    body_start: usize,
}

struct Classifier<'s> {
    template: &'s str,
    file: &'s str,
    frames: Vec<Frame<'s>>,
    pieces: Vec<Piece<'s>>,
}

impl<'s> Classifier<'s> {
    fn new(template: &'s str, file: &'s str) -> Self {
        Self {
            template,
            file,
            frames: Vec::new(),
            pieces: Vec::new(),
        }
    }

    fn locate(&self, line: usize, span: Span) -> Location {
        Location::new(self.template, self.file, line, span)
    }

    fn push(&mut self, scanned: Scanned<'s>) -> Result<(), CompileError> {
        match scanned {
            Scanned::Text(text) => {
                for (token, span) in lex_text(text) {
                    self.pieces.push(match token {
                        TextToken::Newline => Piece::Newline,
                        TextToken::Blank => Piece::Blank(&text[span]),
                        TextToken::Text => Piece::Text(&text[span]),
                    });
                }
                Ok(())
            }
            Scanned::Tag(tag) => {
                let piece = self.classify(tag)?;
                self.pieces.push(piece);
                Ok(())
            }
        }
    }

    fn classify(&mut self, tag: RawTag<'s>) -> Result<Piece<'s>, CompileError> {
        let name = tag.source.trim();

        let piece = match tag.sigil {
            Sigil::Comment | Sigil::Delimiters => Piece::Silent,
            Sigil::Section | Sigil::InvertedSection => {
                if name.is_empty() {
                    return Err(CompileError::new(
                        CompileErrorKind::EmptySectionName,
                        self.locate(tag.line, tag.span),
                    ));
                }
                self.frames.push(Frame {
                    name,
                    line: tag.line,
                    body_start: tag.span.end,
                    span: tag.span,
                });
                Piece::Open {
                    name,
                    inverted: tag.sigil == Sigil::InvertedSection,
                }
            }
            Sigil::Close => {
                let frame = match self.frames.pop() {
                    Some(frame) if frame.name == name => frame,
                    open => {
                        return Err(CompileError::new(
                            CompileErrorKind::UnmatchedSectionClose {
                                name: name.to_string(),
                                expected: open.map(|frame| frame.name.to_string()),
                            },
                            self.locate(tag.line, tag.span),
                        ));
                    }
                };
                Piece::Close {
                    name,
                    raw: &self.template[frame.body_start..tag.span.start],
                }
            }
            Sigil::Partial => Piece::Partial(name),
            Sigil::Triple | Sigil::Ampersand => Piece::Variable {
                name,
                escaped: false,
            },
            Sigil::None => Piece::Variable {
                name,
                escaped: true,
            },
        };

        Ok(piece)
    }

    fn finish(self) -> Result<Vec<Piece<'s>>, CompileError> {
        if let Some(frame) = self.frames.last() {
            return Err(CompileError::new(
                CompileErrorKind::UnclosedSection {
                    name: frame.name.to_string(),
                },
                self.locate(frame.line, frame.span.clone()),
            ));
        }
        Ok(self.pieces)
    }
}

/// Compile template source into a [`Program`]
///
/// This never consults a cache; see [`crate::TemplateCache`] for memoized
/// compilation.
///
/// # Example
///
/// ```rust
/// use stache::{parse, CompileOptions};
/// use stache::parser::Op;
///
/// let program = parse("Hi {{name}}", &CompileOptions::default()).unwrap();
/// assert_eq!(program.ops()[1], Op::Escaped("name".to_string()));
/// ```
pub fn parse(template: &str, options: &CompileOptions) -> Result<Program, CompileError> {
    let file = options.file_label();
    let mut classifier = Classifier::new(template, file);

    for scanned in Scanner::new(template, &options.tags, file) {
        classifier.push(scanned?)?;
    }

    let mut pieces = classifier.finish()?;
    if !options.preserve_whitespace {
        pieces = whitespace::strip_standalone_lines(pieces);
    }

    let program = assemble(pieces);
    tracing::debug!(file, ops = program.len(), "compiled template");
    tracing::trace!("program listing:\n{}", program);
    Ok(program)
}

/// Merge literal runs and link every section to its body
fn assemble(pieces: Vec<Piece<'_>>) -> Program {
    let mut ops = Vec::new();
    let mut literal = String::new();
    let mut open_sections: Vec<usize> = Vec::new();

    for piece in pieces {
        match piece {
            Piece::Text(text) | Piece::Blank(text) => literal.push_str(text),
            Piece::Newline => literal.push('\n'),
            Piece::Silent => {}
            tag => {
                if !literal.is_empty() {
                    ops.push(Op::Literal(std::mem::take(&mut literal)));
                }
                match tag {
                    Piece::Variable { name, escaped: true } => {
                        ops.push(Op::Escaped(name.to_string()))
                    }
                    Piece::Variable {
                        name,
                        escaped: false,
                    } => ops.push(Op::Raw(name.to_string())),
                    Piece::Open { name, inverted } => {
                        open_sections.push(ops.len());
                        ops.push(Op::Section {
                            name: name.to_string(),
                            inverted,
                            body_len: 0,
                            raw: String::new(),
                        });
                    }
                    Piece::Close { name, raw: source } => {
                        let end = ops.len();
                        if let Some(start) = open_sections.pop() {
                            if let Op::Section { body_len, raw, .. } = &mut ops[start] {
                                *body_len = end - start - 1;
                                *raw = source.to_string();
                            }
                        }
                        ops.push(Op::EndSection(name.to_string()));
                    }
                    Piece::Partial(name) => ops.push(Op::Partial(name.to_string())),
                    Piece::Silent | Piece::Text(_) | Piece::Blank(_) | Piece::Newline => {}
                }
            }
        }
    }

    if !literal.is_empty() {
        ops.push(Op::Literal(literal));
    }

    Program::new(ops)
}
