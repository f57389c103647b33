//! Standalone line elision
//!
//! A line holding nothing but whitespace and a single section, partial,
//! comment or delimiter tag renders as if the line were not there.

use super::grammar::Piece;

/// Drop the whitespace of every standalone tag line
pub(crate) fn strip_standalone_lines(pieces: Vec<Piece<'_>>) -> Vec<Piece<'_>> {
    let mut out = Vec::with_capacity(pieces.len());
    let mut line = Vec::new();

    for piece in pieces {
        let ends_line = piece == Piece::Newline;
        line.push(piece);
        if ends_line {
            flush_line(&mut line, &mut out);
        }
    }
    flush_line(&mut line, &mut out);

    out
}

fn flush_line<'s>(line: &mut Vec<Piece<'s>>, out: &mut Vec<Piece<'s>>) {
    if is_standalone(line) {
        out.extend(line.drain(..).filter(|piece| !piece.is_whitespace()));
    } else {
        out.append(line);
    }
}

fn is_standalone(line: &[Piece<'_>]) -> bool {
    let mut tags = 0;
    for piece in line {
        if piece.is_standalone_tag() {
            tags += 1;
        } else if !piece.is_whitespace() {
            return false;
        }
    }
    tags == 1
}

#[cfg(test)]
mod tests {
    use crate::config::CompileOptions;
    use crate::parser::ast::Op;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn literals(input: &str, preserve: bool) -> Vec<String> {
        let options = CompileOptions::default().with_preserve_whitespace(preserve);
        parse(input, &options)
            .expect("Should parse")
            .ops()
            .iter()
            .filter_map(|op| match op {
                Op::Literal(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_standalone_section_lines() {
        assert_eq!(
            literals("  {{#a}}\nX\n  {{/a}}\n", false),
            vec!["X\n".to_string()]
        );
    }

    #[test]
    fn test_preserve_whitespace() {
        assert_eq!(
            literals("  {{#a}}\nX\n  {{/a}}\n", true),
            vec!["  ".to_string(), "\nX\n  ".to_string(), "\n".to_string()]
        );
    }

    #[test]
    fn test_variable_lines_are_kept() {
        assert_eq!(
            literals("  {{v}}\n", false),
            vec!["  ".to_string(), "\n".to_string()]
        );
    }

    #[test]
    fn test_two_tags_on_a_line_are_kept() {
        assert_eq!(literals("{{#a}}{{/a}}\n", false), vec!["\n".to_string()]);
    }

    #[test]
    fn test_text_on_the_line_is_kept() {
        assert_eq!(
            literals("x {{! note }}\n", false),
            vec!["x \n".to_string()]
        );
    }

    #[test]
    fn test_last_line_without_newline() {
        assert_eq!(literals("a\n\t{{! end }}  ", false), vec!["a\n".to_string()]);
    }

    #[test]
    fn test_blank_lines_without_tags_are_kept() {
        assert_eq!(literals("a\n\n  \nb", false), vec!["a\n\n  \nb".to_string()]);
    }

    #[test]
    fn test_delimiter_switch_line() {
        assert_eq!(
            literals("{{=<% %>=}}\n<%v%>\n", false),
            vec!["\n".to_string()]
        );
    }

    #[test]
    fn test_crlf_line() {
        assert_eq!(literals("{{#a}}\r\nx{{/a}}", false), vec!["x".to_string()]);
    }
}
