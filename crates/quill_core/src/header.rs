//! Article header block parsing

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;
use uuid::Uuid;

use crate::model::DocDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub uuid: Uuid,
    pub title: Option<String>,
    pub date: Option<DocDate>,
    pub tags: Vec<String>,
    pub authors: Vec<String>,
    pub author: Option<String>,
    pub abstract_text: Option<String>,
    pub featured: bool,
    pub toc: Option<bool>,
    pub is_published: bool,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            title: None,
            date: None,
            tags: Vec::new(),
            authors: Vec::new(),
            author: None,
            abstract_text: None,
            featured: false,
            toc: None,
            is_published: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("invalid header line: {text}")]
    InvalidLine { line: usize, text: String },
    #[error("invalid header key: {key}")]
    InvalidKey { line: usize, key: String },
    #[error("invalid uuid: {source}")]
    InvalidUuid {
        line: usize,
        #[source]
        source: uuid::Error,
    },
    #[error("invalid date for {key}: {value}")]
    InvalidDate {
        line: usize,
        key: String,
        value: String,
    },
    #[error("invalid yes/no value for {key}: {value}")]
    InvalidFlag {
        line: usize,
        key: String,
        value: String,
    },
}

impl HeaderError {
    /// One-based line within the source file.
    pub fn line(&self) -> usize {
        match self {
            HeaderError::InvalidLine { line, .. }
            | HeaderError::InvalidKey { line, .. }
            | HeaderError::InvalidUuid { line, .. }
            | HeaderError::InvalidDate { line, .. }
            | HeaderError::InvalidFlag { line, .. } => *line,
        }
    }
}

pub fn parse_header(input: &str) -> Result<Header, HeaderError> {
    let mut header = Header::default();
    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        if raw_line.trim().is_empty() {
            continue;
        }
        if raw_line.trim_start().starts_with('#') {
            continue;
        }
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let (key, value) = line.split_once(':').ok_or_else(|| HeaderError::InvalidLine {
            line: line_no,
            text: line.to_string(),
        })?;
        let key = key.trim();
        if key.is_empty() || !key.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-') {
            return Err(HeaderError::InvalidKey {
                line: line_no,
                key: key.to_string(),
            });
        }
        let value = value.trim();
        match key {
            "uuid" => {
                if !value.is_empty() {
                    header.uuid = Uuid::parse_str(value).map_err(|source| {
                        HeaderError::InvalidUuid {
                            line: line_no,
                            source,
                        }
                    })?;
                }
            }
            "title" => header.title = non_empty(value),
            "date" | "published" => {
                if key == "published" && is_no(value) {
                    header.is_published = false;
                } else {
                    header.date = parse_date(value, key, line_no)?;
                }
            }
            "tags" => header.tags = split_list(value),
            "authors" => header.authors = split_list(value),
            "author" => header.author = non_empty(value),
            "abstract" => header.abstract_text = non_empty(value),
            "featured" => header.featured = parse_flag(value, key, line_no)?,
            "toc" => header.toc = Some(parse_flag(value, key, line_no)?),
            _ => {
                return Err(HeaderError::InvalidKey {
                    line: line_no,
                    key: key.to_string(),
                });
            }
        }
    }

    if let Some(author) = header.author.clone() {
        header.authors.insert(0, author);
    }

    Ok(header)
}

/// Splits a source file into its header block and body. The header is the
/// leading run of `key: value` (or `#` comment) lines up to the first blank
/// line; a file that does not start that way has no header.
pub fn split_header_body(raw: &str) -> (Option<&str>, &str) {
    let mut offset = 0;
    let mut saw_header_line = false;
    let mut header_end = 0;
    for line in raw.split_inclusive('\n') {
        if line.trim().is_empty() {
            header_end = offset + line.len();
            break;
        }
        if line.trim_start().starts_with('#') {
            offset += line.len();
            header_end = offset;
            continue;
        }
        if !looks_like_header_line(line) {
            return (None, raw);
        }
        saw_header_line = true;
        offset += line.len();
        header_end = offset;
    }
    if !saw_header_line {
        return (None, raw);
    }
    (Some(&raw[..header_end]), &raw[header_end..])
}

/// Number of lines occupied by the header block, blank separator included.
pub fn header_line_count(header: &str) -> usize {
    header.split_inclusive('\n').count()
}

fn looks_like_header_line(line: &str) -> bool {
    let Some((key, _)) = line.trim_start().split_once(':') else {
        return false;
    };
    let key = key.trim_end();
    !key.is_empty() && key.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
}

fn strip_inline_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (idx, byte) in bytes.iter().enumerate() {
        if *byte == b'#' && idx > 0 && bytes[idx - 1].is_ascii_whitespace() {
            return line[..idx].trim_end();
        }
    }
    line
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn is_no(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "no" | "false")
}

fn parse_flag(value: &str, key: &str, line: usize) -> Result<bool, HeaderError> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "true" | "on" | "1" => Ok(true),
        "no" | "false" | "off" | "0" => Ok(false),
        _ => Err(HeaderError::InvalidFlag {
            line,
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_date(value: &str, key: &str, line: usize) -> Result<Option<DocDate>, HeaderError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let parsed = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M")
        .map(|value| value.date())
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .map_err(|_| HeaderError::InvalidDate {
            line,
            key: key.to_string(),
            value: trimmed.to_string(),
        })?;
    Ok(Some(DocDate::from(parsed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_fields() {
        let input = "\
uuid: 4f234d4a-5c88-4fb8-9f55-3f75a8efc2c0
title: My Title
date: 2024-01-02 03:04
tags: rust, yaml
abstract: Summary
featured: yes
toc: no
authors: Alice, Bob
author: Carol
";
        let header = parse_header(input).expect("parse should succeed");
        assert_eq!(
            header.uuid,
            Uuid::parse_str("4f234d4a-5c88-4fb8-9f55-3f75a8efc2c0").unwrap()
        );
        assert_eq!(header.title.as_deref(), Some("My Title"));
        assert_eq!(header.date, Some(DocDate::new(2024, 1, 2)));
        assert_eq!(header.tags, vec!["rust".to_string(), "yaml".to_string()]);
        assert_eq!(header.abstract_text.as_deref(), Some("Summary"));
        assert!(header.featured);
        assert_eq!(header.toc, Some(false));
        assert_eq!(header.authors, vec!["Carol", "Alice", "Bob"]);
        assert!(header.is_published);
    }

    #[test]
    fn date_without_time_is_accepted() {
        let header = parse_header("date: 2023-12-31\n").expect("parse should succeed");
        assert_eq!(header.date, Some(DocDate::new(2023, 12, 31)));
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = parse_header("title: A\ndate: yesterday\n").expect_err("bad date");
        assert_eq!(err.line(), 2);
        let err = parse_header("title: A\n\ncolour: red\n").expect_err("bad key");
        assert_eq!(err.line(), 3);
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn published_no_marks_draft() {
        let header = parse_header("published: no\n").expect("parse should succeed");
        assert!(!header.is_published);
        assert!(header.date.is_none());
    }

    #[test]
    fn comment_behavior() {
        let input = "\
# full line comment
title: Hello # inline comment
";
        let header = parse_header(input).expect("parse should succeed");
        assert_eq!(header.title.as_deref(), Some("Hello"));
    }

    #[test]
    fn splits_header_from_body() {
        let raw = "title: Hi\ndate: 2024-01-01\n\n# Heading\nBody\n";
        let (header, body) = split_header_body(raw);
        assert_eq!(header, Some("title: Hi\ndate: 2024-01-01\n\n"));
        assert_eq!(body, "# Heading\nBody\n");
        assert_eq!(header_line_count(header.unwrap()), 3);
    }

    #[test]
    fn body_without_header() {
        let raw = "Just text\n\nMore";
        assert_eq!(split_header_body(raw), (None, raw));
    }
}
