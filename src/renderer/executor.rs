//! Program interpreter

use std::ops::ControlFlow;
use std::sync::{Arc, Weak};

use crate::config::CompileOptions;
use crate::error::{CompileError, RenderError};
use crate::parser::Op;
use crate::template::registry::{self, CacheStore};
use crate::template::{resolve, Context, Partial, Partials, Template};
use crate::value::{SectionCall, SectionLambda, Value};
use crate::Error;

use super::escape::escape_html;
use super::section::{plan, SectionPlan};
use super::sink::{Buffer, Completion, Sink};

/// Why execution stopped before the end of the program
#[derive(Debug)]
enum Interrupt {
    Stopped,
    Failed(RenderError),
}

impl From<RenderError> for Interrupt {
    fn from(err: RenderError) -> Self {
        Interrupt::Failed(err)
    }
}

/// How deep section bodies may nest, partials included
pub const SECTION_NESTING_LIMIT: usize = 128;

/// Runs ops against a context, writing to a sink
///
/// `depth` counts the partials (and lambda renders) entered so far and
/// `sections` the section bodies currently being rendered.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Executor<'r> {
    partials: &'r Partials,
    cache: &'r Weak<CacheStore>,
    limit: usize,
    depth: usize,
    sections: usize,
}

impl<'r> Executor<'r> {
    pub(crate) fn new(partials: &'r Partials, cache: &'r Weak<CacheStore>, limit: usize) -> Self {
        Self {
            partials,
            cache,
            limit,
            depth: 0,
            sections: 0,
        }
    }

    /// Execute `ops` with `view` as the only scope
    pub(crate) fn run(
        &self,
        ops: &[Op],
        view: &Value,
        sink: &mut dyn Sink,
    ) -> Result<Completion, RenderError> {
        match self.execute(ops, &Context::new(view), sink) {
            Ok(()) => {
                sink.finish();
                Ok(Completion::Finished)
            }
            Err(Interrupt::Stopped) => Ok(Completion::Stopped),
            Err(Interrupt::Failed(err)) => Err(err),
        }
    }

    fn execute(&self, ops: &[Op], ctx: &Context<'_>, sink: &mut dyn Sink) -> Result<(), Interrupt> {
        let mut index = 0;
        while let Some(op) = ops.get(index) {
            index += 1;
            match op {
                Op::Literal(text) => emit(sink, text)?,
                Op::Escaped(name) => {
                    if let Some(value) = resolve(name, ctx) {
                        emit(sink, &escape_html(&value.to_text()))?;
                    }
                }
                Op::Raw(name) => {
                    if let Some(value) = resolve(name, ctx) {
                        emit(sink, &value.to_text())?;
                    }
                }
                Op::Section {
                    name,
                    inverted,
                    body_len,
                    raw,
                } => {
                    let body = ops.get(index..index + body_len).unwrap_or(&[]);
                    index += body_len;
                    self.section(name, *inverted, raw, body, ctx, sink)?;
                }
                Op::EndSection(_) => {}
                Op::Partial(name) => self.partial(name, ctx, sink)?,
            }
        }
        Ok(())
    }

    fn section(
        &self,
        name: &str,
        inverted: bool,
        raw: &str,
        body: &[Op],
        ctx: &Context<'_>,
        sink: &mut dyn Sink,
    ) -> Result<(), Interrupt> {
        let value = resolve(name, ctx);

        match plan(value.as_deref(), inverted) {
            SectionPlan::Skip => Ok(()),
            SectionPlan::Once => self.enter_section(name)?.execute(body, ctx, sink),
            SectionPlan::Scoped(scope) => {
                self.enter_section(name)?
                    .execute(body, &ctx.push(scope), sink)
            }
            SectionPlan::Each(items) => {
                let inner = self.enter_section(name)?;
                for item in items {
                    inner.execute(body, &ctx.push(item), sink)?;
                }
                Ok(())
            }
            SectionPlan::Lambda(lambda) => {
                let text = self.lambda(name, lambda, raw, ctx.top())?;
                emit(sink, &text)
            }
        }
    }

    /// Invoke a section lambda with a helper that renders against `scope`
    fn lambda(
        &self,
        section: &str,
        lambda: &SectionLambda,
        raw: &str,
        scope: &Value,
    ) -> Result<String, RenderError> {
        let renderer = |template: &str| -> Result<String, Error> {
            let inner = self.nested(section)?;
            let compiled = self.compile_source(template)?;
            let mut buffer = Buffer::default();
            inner.run(compiled.program().ops(), scope, &mut buffer)?;
            Ok(buffer.into_string())
        };

        lambda
            .call(&SectionCall::new(scope, raw, &renderer))
            .map_err(|source| RenderError::Lambda {
                section: section.to_string(),
                source: Box::new(source),
            })
    }

    fn partial(&self, name: &str, ctx: &Context<'_>, sink: &mut dyn Sink) -> Result<(), Interrupt> {
        let Some(entry) = self.partials.get(name) else {
            return Ok(());
        };
        let inner = self.nested(name)?;

        let template = match entry {
            Partial::Compiled(template) => Arc::clone(template),
            Partial::Source(source) => {
                self.compile_source(source)
                    .map_err(|source| RenderError::Partial {
                        name: name.to_string(),
                        source,
                    })?
            }
        };

        tracing::trace!(partial = name, depth = inner.depth, "rendering partial");
        inner.execute(template.program().ops(), &Context::new(ctx.top()), sink)
    }

    /// One level deeper, failing once the limit is reached
    fn nested(&self, name: &str) -> Result<Executor<'r>, RenderError> {
        if self.depth >= self.limit {
            return Err(RenderError::RecursionLimitExceeded {
                name: name.to_string(),
                limit: self.limit,
            });
        }
        Ok(Executor {
            depth: self.depth + 1,
            ..*self
        })
    }

    fn enter_section(&self, name: &str) -> Result<Executor<'r>, RenderError> {
        if self.sections >= SECTION_NESTING_LIMIT {
            return Err(RenderError::SectionNestingExceeded {
                name: name.to_string(),
                limit: SECTION_NESTING_LIMIT,
            });
        }
        Ok(Executor {
            sections: self.sections + 1,
            ..*self
        })
    }

    /// Compile partial or lambda source with default options
    fn compile_source(&self, source: &str) -> Result<Arc<Template>, CompileError> {
        let options = CompileOptions::default();
        match self.cache.upgrade() {
            Some(store) => registry::compile_in(&store, source, &options),
            None => Template::build(source, options, Weak::new()).map(Arc::new),
        }
    }
}

fn emit(sink: &mut dyn Sink, chunk: &str) -> Result<(), Interrupt> {
    if chunk.is_empty() {
        return Ok(());
    }
    match sink.write(chunk) {
        ControlFlow::Continue(()) => Ok(()),
        ControlFlow::Break(()) => Err(Interrupt::Stopped),
    }
}
