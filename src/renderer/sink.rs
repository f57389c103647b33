//! Output destinations for rendering

use std::ops::ControlFlow;

/// Receives rendered output chunk by chunk
///
/// Returning [`ControlFlow::Break`] from [`Sink::write`] stops rendering.
///
/// Closures taking `Option<&str>` are sinks too: they get `Some(chunk)` for
/// every chunk and `None` once rendering is complete.
///
/// # Example
///
/// ```rust
/// use std::ops::ControlFlow;
/// use stache::{render_to, Completion, Partials, Value};
///
/// let mut out = String::new();
/// let mut sink = |chunk: Option<&str>| {
///     if let Some(text) = chunk {
///         out.push_str(text);
///     }
///     ControlFlow::Continue(())
/// };
/// let done = render_to("{{a}}-{{b}}", &Value::from_iter([("a", 1), ("b", 2)]), &Partials::new(), &mut sink).unwrap();
/// assert_eq!(done, Completion::Finished);
/// assert_eq!(out, "1-2");
/// ```
pub trait Sink {
    /// Accept a non-empty chunk of output
    fn write(&mut self, chunk: &str) -> ControlFlow<()>;

    /// Called once after the last chunk when rendering ran to the end
    fn finish(&mut self) {}
}

impl<F> Sink for F
where
    F: FnMut(Option<&str>) -> ControlFlow<()>,
{
    fn write(&mut self, chunk: &str) -> ControlFlow<()> {
        self(Some(chunk))
    }

    fn finish(&mut self) {
        let _ = self(None);
    }
}

/// How a render ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Every op ran and the sink was finished
    Finished,
    /// The sink asked to stop
    Stopped,
}

/// Sink collecting everything into a string
#[derive(Debug, Default)]
pub(crate) struct Buffer(String);

impl Buffer {
    pub(crate) fn into_string(self) -> String {
        self.0
    }
}

impl Sink for Buffer {
    fn write(&mut self, chunk: &str) -> ControlFlow<()> {
        self.0.push_str(chunk);
        ControlFlow::Continue(())
    }
}
