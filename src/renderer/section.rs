//! How a section renders, given the value its name resolved to

use crate::value::{SectionLambda, Value};

/// What to do with a section body
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum SectionPlan<'v> {
    /// Render nothing
    Skip,
    /// Render the body once in the current scope
    Once,
    /// Render the body once with the value pushed as the innermost scope
    Scoped(&'v Value),
    /// Render the body once per item, each pushed in turn
    Each(&'v [Value]),
    /// Hand the raw body to a section lambda
    Lambda(&'v SectionLambda),
}

/// Decide how a section renders
///
/// `None` means the name was not found in any scope. Inverted sections render
/// once for missing names, `Null`, `false` and empty lists.
pub(crate) fn plan(value: Option<&Value>, inverted: bool) -> SectionPlan<'_> {
    if inverted {
        let empty = match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => true,
            Some(Value::List(items)) => items.is_empty(),
            Some(_) => false,
        };
        return if empty {
            SectionPlan::Once
        } else {
            SectionPlan::Skip
        };
    }

    match value {
        Some(Value::List(items)) => SectionPlan::Each(items),
        Some(scope @ Value::Map(_)) => SectionPlan::Scoped(scope),
        Some(Value::Section(lambda)) => SectionPlan::Lambda(lambda),
        Some(value) if value.is_truthy() => SectionPlan::Once,
        _ => SectionPlan::Skip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inverted_renders_for_empty_values() {
        assert_eq!(plan(None, true), SectionPlan::Once);
        assert_eq!(plan(Some(&Value::Null), true), SectionPlan::Once);
        assert_eq!(plan(Some(&Value::from(false)), true), SectionPlan::Once);
        assert_eq!(plan(Some(&Value::List(vec![])), true), SectionPlan::Once);
    }

    #[test]
    fn test_inverted_skips_everything_else() {
        assert_eq!(plan(Some(&Value::from(true)), true), SectionPlan::Skip);
        assert_eq!(plan(Some(&Value::from(vec![1])), true), SectionPlan::Skip);
        assert_eq!(plan(Some(&Value::from("x")), true), SectionPlan::Skip);
        // only the listed values count as empty for inverted sections
        assert_eq!(plan(Some(&Value::from(0)), true), SectionPlan::Skip);
        assert_eq!(plan(Some(&Value::from("")), true), SectionPlan::Skip);
    }

    #[test]
    fn test_list_iterates() {
        let list = Value::from(vec![1, 2]);
        match plan(Some(&list), false) {
            SectionPlan::Each(items) => assert_eq!(items.len(), 2),
            other => panic!("Expected Each, got {:?}", other),
        }
        assert_eq!(
            plan(Some(&Value::List(vec![])), false),
            SectionPlan::Each(&[])
        );
    }

    #[test]
    fn test_map_is_pushed() {
        let map = Value::from_iter([("a", 1)]);
        assert_eq!(plan(Some(&map), false), SectionPlan::Scoped(&map));
    }

    #[test]
    fn test_scalars_follow_truthiness() {
        assert_eq!(plan(Some(&Value::from(true)), false), SectionPlan::Once);
        assert_eq!(plan(Some(&Value::from("x")), false), SectionPlan::Once);
        assert_eq!(plan(Some(&Value::from(3)), false), SectionPlan::Once);
        assert_eq!(plan(Some(&Value::from(0)), false), SectionPlan::Skip);
        assert_eq!(plan(Some(&Value::from("")), false), SectionPlan::Skip);
        assert_eq!(plan(Some(&Value::Null), false), SectionPlan::Skip);
        assert_eq!(plan(None, false), SectionPlan::Skip);
    }

    #[test]
    fn test_section_lambda() {
        let value = Value::section(|call| Ok(call.text().to_uppercase()));
        assert!(matches!(
            plan(Some(&value), false),
            SectionPlan::Lambda(_)
        ));
    }
}
