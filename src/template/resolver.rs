//! Name resolution against the context stack

use std::borrow::Cow;
use std::iter;

use crate::value::Value;

/// The stack of scopes a template is rendered against
///
/// Scopes are chained on the call stack: entering a section or partial pushes a
/// new innermost scope that lives as long as the body is being rendered.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    value: &'a Value,
    parent: Option<&'a Context<'a>>,
}

impl<'a> Context<'a> {
    /// Start a stack with the initial view as its only scope
    pub fn new(view: &'a Value) -> Self {
        Self {
            value: view,
            parent: None,
        }
    }

    /// A new stack with `value` as the innermost scope
    pub fn push(&'a self, value: &'a Value) -> Context<'a> {
        Context {
            value,
            parent: Some(self),
        }
    }

    /// The innermost scope
    pub fn top(&self) -> &'a Value {
        self.value
    }

    /// Scopes from innermost to outermost
    pub fn scopes(&self) -> impl Iterator<Item = &'a Value> + '_ {
        iter::successors(Some(self), |ctx| ctx.parent).map(|ctx| ctx.value)
    }

    /// Number of scopes on the stack
    pub fn depth(&self) -> usize {
        self.scopes().count()
    }
}

/// Resolve a tag name against the stack
///
/// The first map scope that contains the key wins, even if the value stored
/// there is `Null`. Computed fields are invoked with the innermost scope.
/// Returns `None` when no scope has the key.
pub fn resolve<'a>(name: &str, ctx: &Context<'a>) -> Option<Cow<'a, Value>> {
    if name == "." {
        return Some(Cow::Borrowed(ctx.top()));
    }

    let found = ctx.scopes().find_map(|scope| scope.get(name))?;

    Some(match found {
        Value::Lambda(lambda) => Cow::Owned(lambda.call(ctx.top())),
        value => Cow::Borrowed(value),
    })
}
