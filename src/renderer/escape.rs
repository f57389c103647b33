//! HTML escaping for `{{name}}` tags

use std::borrow::Cow;

/// Escape text for inclusion in HTML
///
/// `<`, `>`, `"` and `'` are always replaced. A `&` is left alone when it
/// already starts an entity such as `&amp;` or `&nbsp;`.
///
/// ```rust
/// use stache::renderer::escape_html;
///
/// assert_eq!(escape_html("<a>&'\""), "&lt;a&gt;&amp;&#39;&quot;");
/// assert_eq!(escape_html("fish &amp; chips"), "fish &amp; chips");
/// ```
pub fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 16);
    for (i, ch) in input.char_indices() {
        match ch {
            '&' if starts_entity(&input[i + 1..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Word characters followed by `;`
fn starts_entity(rest: &str) -> bool {
    let name_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();
    name_len > 0 && rest.as_bytes().get(name_len) == Some(&b';')
}
