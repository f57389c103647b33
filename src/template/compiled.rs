//! Compiled templates

use std::sync::Weak;

use crate::config::CompileOptions;
use crate::error::{CompileError, RenderError};
use crate::parser::{parse, Program};
use crate::renderer::{Buffer, Completion, Executor, Sink};
use crate::value::Value;

use super::partials::Partials;
use super::registry::CacheStore;

/// A template compiled to a [`Program`], ready to render any number of times
///
/// Templates are immutable and can be shared between threads. Source partials
/// met while rendering are compiled through the cache this template came
/// from, as long as that cache is still alive.
#[derive(Debug)]
pub struct Template {
    program: Program,
    options: CompileOptions,
    cache: Weak<CacheStore>,
}

impl Template {
    pub(crate) fn build(
        text: &str,
        options: CompileOptions,
        cache: Weak<CacheStore>,
    ) -> Result<Self, CompileError> {
        let program = parse(text, &options)?;
        Ok(Self {
            program,
            options,
            cache,
        })
    }

    /// The compiled op program
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// The options this template was compiled with
    ///
    /// Cached templates are shared by every caller whose options differ only
    /// in `file`, so the label here is the one from the first compile.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Render against `view`, collecting the output into a string
    pub fn render(&self, view: &Value, partials: &Partials) -> Result<String, RenderError> {
        let mut buffer = Buffer::default();
        self.render_to(view, partials, &mut buffer)?;
        Ok(buffer.into_string())
    }

    /// Render against `view`, handing each chunk to `sink` as it is produced
    ///
    /// Returns [`Completion::Stopped`] when the sink asked to stop early; in
    /// that case [`Sink::finish`] is not called.
    pub fn render_to<S: Sink>(
        &self,
        view: &Value,
        partials: &Partials,
        sink: &mut S,
    ) -> Result<Completion, RenderError> {
        Executor::new(partials, &self.cache, self.options.partial_depth_limit).run(
            self.program.ops(),
            view,
            sink,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::ops::ControlFlow;

    fn build(text: &str) -> Template {
        Template::build(text, CompileOptions::default(), Weak::new()).expect("Should compile")
    }

    #[test]
    fn test_render_collects_output() {
        let template = build("Hello {{name}}!");
        let view = Value::from_iter([("name", "World")]);
        assert_eq!(
            template.render(&view, &Partials::new()).unwrap(),
            "Hello World!"
        );
    }

    #[test]
    fn test_render_to_streams_chunks() {
        let template = build("a{{x}}b");
        let view = Value::from_iter([("x", 1)]);
        let mut chunks = Vec::new();
        let mut finished = false;
        let mut sink = |chunk: Option<&str>| {
            match chunk {
                Some(text) => chunks.push(text.to_string()),
                None => finished = true,
            }
            ControlFlow::Continue(())
        };

        let completion = template
            .render_to(&view, &Partials::new(), &mut sink)
            .expect("Should render");

        assert_eq!(completion, Completion::Finished);
        assert_eq!(chunks, vec!["a", "1", "b"]);
        assert!(finished);
    }

    #[test]
    fn test_source_partial_without_cache() {
        let template = build("[{{>inner}}]");
        let partials = Partials::new().with("inner", "{{v}}");
        let view = Value::from_iter([("v", "ok")]);
        assert_eq!(template.render(&view, &partials).unwrap(), "[ok]");
    }

    #[test]
    fn test_options_are_kept() {
        let options = CompileOptions::default().with_file("page.mustache");
        let template =
            Template::build("x", options.clone(), Weak::new()).expect("Should compile");
        assert_eq!(template.options(), &options);
        assert_eq!(template.program().len(), 1);
    }
}
