//! Small HTML/XML text helpers. Not a parser.

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Leading whitespace of a line.
pub fn indentation(line: &str) -> &str {
    let trimmed = line.trim_start();
    &line[..line.len() - trimmed.len()]
}

/// Inserts `insert` right after the first occurrence of `needle`.
/// Returns the line unchanged when `needle` is absent.
pub fn insert_after_first(line: &str, needle: &str, insert: &str) -> String {
    match line.find(needle) {
        Some(idx) => {
            let at = idx + needle.len();
            let mut out = String::with_capacity(line.len() + insert.len());
            out.push_str(&line[..at]);
            out.push_str(insert);
            out.push_str(&line[at..]);
            out
        }
        None => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
        assert_eq!(escape_xml("it's"), "it&apos;s");
    }

    #[test]
    fn strips_and_collapses() {
        let text = collapse_whitespace(&strip_tags("<p>Hello\n  <em>there</em></p>"));
        assert_eq!(text, "Hello there");
    }

    #[test]
    fn inserts_after_first_match_only() {
        let line = r#"<li><input type="checkbox"><input type="radio">"#;
        assert_eq!(
            insert_after_first(line, "<input", " checked"),
            r#"<li><input checked type="checkbox"><input type="radio">"#
        );
        assert_eq!(insert_after_first("<li>", "<a ", "x"), "<li>");
    }

    #[test]
    fn indentation_is_leading_whitespace() {
        assert_eq!(indentation("    <div>"), "    ");
        assert_eq!(indentation("<div>"), "");
    }
}
