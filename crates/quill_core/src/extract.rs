//! Insertion-point extraction.
//!
//! Two independent passes over template lines: named block markers
//! (`data-block="name"`) and relative `href`/`src` references. Both are
//! pure and return maps ordered by position.

use std::collections::BTreeMap;

use crate::paths::is_relative_reference;
use crate::position::InsertPosition;

pub const BLOCK_ATTRIBUTE: &str = "data-block";

const PATH_ATTRIBUTES: &[&str] = &["href", "src"];

/// Positions right after the `>` that closes each opening tag carrying a
/// recognized block marker. The tag may close on a later line.
pub fn extract_blocks(lines: &[String], recognized: &[&str]) -> BTreeMap<InsertPosition, String> {
    let mut blocks = BTreeMap::new();
    for (line_no, value_end, name) in markers(lines) {
        if !recognized.contains(&name) {
            continue;
        }
        if let Some(position) = tag_close_after(lines, line_no, value_end + 1) {
            blocks.insert(position, name.to_string());
        }
    }
    blocks
}

/// Markers whose name is not in `recognized`, as `(line, name)`.
pub fn unrecognized_blocks(lines: &[String], recognized: &[&str]) -> Vec<(usize, String)> {
    markers(lines)
        .filter(|(_, _, name)| !recognized.contains(name))
        .map(|(line_no, _, name)| (line_no, name.to_string()))
        .collect()
}

/// Every `data-block` value as `(line, closing quote column, trimmed name)`.
fn markers(lines: &[String]) -> impl Iterator<Item = (usize, usize, &str)> {
    lines.iter().enumerate().flat_map(|(line_no, line)| {
        let mut from = 0;
        std::iter::from_fn(move || {
            let attr = find_attribute(line, BLOCK_ATTRIBUTE, from)?;
            from = attr.value_end;
            Some((line_no, attr.value_end, attr.value.trim()))
        })
    })
}

/// Every relative `href`/`src` value, keyed by the position of its first byte.
pub fn extract_paths(lines: &[String]) -> BTreeMap<InsertPosition, String> {
    let mut paths = BTreeMap::new();
    for (line_no, line) in lines.iter().enumerate() {
        for name in PATH_ATTRIBUTES {
            let mut from = 0;
            while let Some(attr) = find_attribute(line, name, from) {
                from = attr.value_end;
                if is_relative_reference(attr.value) {
                    paths.insert(
                        InsertPosition::new(line_no, attr.value_start),
                        attr.value.to_string(),
                    );
                }
            }
        }
    }
    paths
}

struct AttributeMatch<'a> {
    value: &'a str,
    value_start: usize,
    /// Column of the closing quote.
    value_end: usize,
}

fn find_attribute<'a>(line: &'a str, name: &str, from: usize) -> Option<AttributeMatch<'a>> {
    let bytes = line.as_bytes();
    let mut search = from;
    while let Some(rel) = line.get(search..)?.find(name) {
        let idx = search + rel;
        search = idx + name.len();
        let boundary = idx > 0 && bytes[idx - 1].is_ascii_whitespace();
        if !boundary {
            continue;
        }
        let mut cursor = idx + name.len();
        if bytes.get(cursor) != Some(&b'=') {
            continue;
        }
        cursor += 1;
        let quote = match bytes.get(cursor) {
            Some(b'"') => '"',
            Some(b'\'') => '\'',
            _ => continue,
        };
        let value_start = cursor + 1;
        let Some(len) = line[value_start..].find(quote) else {
            continue;
        };
        return Some(AttributeMatch {
            value: &line[value_start..value_start + len],
            value_start,
            value_end: value_start + len,
        });
    }
    None
}

fn tag_close_after(lines: &[String], line_no: usize, column: usize) -> Option<InsertPosition> {
    let first = &lines[line_no];
    if let Some(idx) = first.get(column..).and_then(|rest| rest.find('>')) {
        return Some(InsertPosition::new(line_no, column + idx + 1));
    }
    lines
        .iter()
        .enumerate()
        .skip(line_no + 1)
        .find_map(|(idx, line)| line.find('>').map(|col| InsertPosition::new(idx, col + 1)))
}
