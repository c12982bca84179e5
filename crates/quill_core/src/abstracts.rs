use crate::html::{collapse_whitespace, strip_tags};

const ELLIPSIS: char = '\u{2026}';

/// Plain-text summary taken from the first non-empty paragraph of rendered
/// body HTML. Returns `None` for `max_chars == 0` or a body without text.
pub fn derive_summary(lines: &[String], max_chars: usize) -> Option<String> {
    if max_chars == 0 {
        return None;
    }
    let html = lines.join("\n");
    let text = first_paragraph(&html)
        .map(|chunk| collapse_whitespace(&strip_tags(chunk)))
        .filter(|text| !text.is_empty())
        .or_else(|| first_non_empty_chunk(&html))?;
    Some(truncate_with_ellipsis(&text, max_chars))
}

fn first_paragraph(html: &str) -> Option<&str> {
    let mut search = 0;
    while let Some(rel) = html[search..].find("<p") {
        let start = search + rel;
        search = start + 2;
        if !matches!(html.as_bytes().get(start + 2), Some(b'>') | Some(b' ')) {
            continue;
        }
        let open_end = start + html[start..].find('>')? + 1;
        let end = html[open_end..]
            .find("</p>")
            .map_or(html.len(), |idx| open_end + idx);
        let inner = &html[open_end..end];
        let text = strip_tags(inner);
        if text.trim().is_empty() || text.trim() == "[TOC]" {
            continue;
        }
        return Some(inner);
    }
    None
}

fn first_non_empty_chunk(html: &str) -> Option<String> {
    html.split("\n\n")
        .map(|chunk| collapse_whitespace(&strip_tags(chunk)))
        .find(|text| !text.is_empty())
}

fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    let mut count = 0usize;
    let mut last_space = None;
    let mut cutoff = text.len();
    for (idx, ch) in text.char_indices() {
        if count >= max_chars {
            cutoff = idx;
            break;
        }
        if ch.is_whitespace() {
            last_space = Some(idx);
        }
        count += 1;
    }
    if count < max_chars || cutoff == text.len() {
        return text.to_string();
    }
    let cut = last_space.unwrap_or(cutoff);
    let mut truncated = text[..cut].trim_end().to_string();
    if truncated.is_empty() {
        truncated = text[..cutoff].to_string();
    }
    truncated.push(ELLIPSIS);
    truncated
}

#[cfg(test)]
mod tests {
    use super::derive_summary;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn uses_first_paragraph_only() {
        let body = lines("<h2>Intro</h2>\n<p>First <em>paragraph</em>.</p>\n<p>Second.</p>");
        assert_eq!(derive_summary(&body, 200).as_deref(), Some("First paragraph."));
    }

    #[test]
    fn skips_toc_marker_paragraph() {
        let body = lines("<p>[TOC]</p>\n<p>Real text</p>");
        assert_eq!(derive_summary(&body, 200).as_deref(), Some("Real text"));
    }

    #[test]
    fn truncates_with_ellipsis_at_word_boundary() {
        let body = lines("<p>This is a long paragraph for truncation.</p>");
        assert_eq!(derive_summary(&body, 10).as_deref(), Some("This is a\u{2026}"));
    }

    #[test]
    fn exact_length_is_not_truncated() {
        let body = lines("<p>abcde</p>");
        assert_eq!(derive_summary(&body, 5).as_deref(), Some("abcde"));
    }

    #[test]
    fn falls_back_to_plain_html_chunk() {
        let body = lines("<div>Loose text\nhere</div>\n\n<div>More</div>");
        assert_eq!(derive_summary(&body, 200).as_deref(), Some("Loose text here"));
        assert_eq!(derive_summary(&body, 0), None);
        assert_eq!(derive_summary(&[], 10), None);
    }
}
