//! Table-of-contents construction: heading discovery and hierarchical
//! numbering.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::html::{collapse_whitespace, escape_html, strip_tags};
use crate::position::InsertPosition;

pub const MAX_LEVEL: u8 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TocError {
    #[error("heading offset {offset} pushes the minimum heading level past h{max}", max = MAX_LEVEL)]
    OffsetOutOfRange { offset: u8 },
    #[error("heading depth must be at least 1")]
    ZeroDepth,
}

/// Inclusive range of heading levels that take part in the ToC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelWindow {
    min_level: u8,
    max_level: u8,
}

impl LevelWindow {
    pub fn from_offset(offset: u8, depth: u8) -> Result<Self, TocError> {
        if depth == 0 {
            return Err(TocError::ZeroDepth);
        }
        let min_level = offset
            .checked_add(1)
            .filter(|level| *level <= MAX_LEVEL)
            .ok_or(TocError::OffsetOutOfRange { offset })?;
        let max_level = min_level.saturating_add(depth - 1).min(MAX_LEVEL);
        Ok(Self {
            min_level,
            max_level,
        })
    }

    pub fn min_level(&self) -> u8 {
        self.min_level
    }

    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    pub fn contains(&self, level: u8) -> bool {
        (self.min_level..=self.max_level).contains(&level)
    }

    pub fn clamp(&self, level: u8) -> u8 {
        level.clamp(self.min_level, self.max_level)
    }
}

impl Default for LevelWindow {
    fn default() -> Self {
        Self {
            min_level: 1,
            max_level: MAX_LEVEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    /// Fragment identifier, either taken from the markup or generated.
    pub anchor: String,
    /// True when the markup already carries an `id` attribute.
    pub has_id: bool,
    pub numbering: Vec<u32>,
}

impl Heading {
    pub fn number_label(&self) -> String {
        self.numbering
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toc {
    headings: BTreeMap<InsertPosition, Heading>,
    root_level: Option<u8>,
    leaf_level: Option<u8>,
}

impl Toc {
    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.headings.len()
    }

    pub fn headings(&self) -> impl Iterator<Item = (&InsertPosition, &Heading)> {
        self.headings.iter()
    }

    pub fn root_level(&self) -> Option<u8> {
        self.root_level
    }

    pub fn leaf_level(&self) -> Option<u8> {
        self.leaf_level
    }

    pub fn first_position(&self) -> Option<InsertPosition> {
        self.headings.keys().next().copied()
    }

    /// Gives every heading without an `id` an anchor produced by `make`,
    /// called in document order.
    pub fn fill_missing_anchors(&mut self, mut make: impl FnMut(&str) -> String) {
        for heading in self.headings.values_mut() {
            if !heading.has_id {
                heading.anchor = make(&heading.text);
            }
        }
    }

    /// Renders the ToC as a list whose items carry their depth as a class.
    pub fn to_html(&self, indent: &str) -> Vec<String> {
        let mut out = Vec::with_capacity(self.headings.len() + 4);
        out.push("<nav class=\"toc\">".to_string());
        out.push(format!("{indent}<ol class=\"toc-list\">"));
        for heading in self.headings.values() {
            let depth = heading.numbering.len().saturating_sub(1);
            out.push(format!(
                "{indent}{indent}<li class=\"toc-depth-{depth}\"><a href=\"#{}\"><span class=\"toc-number\">{}</span> {}</a></li>",
                escape_html(&heading.anchor),
                heading.number_label(),
                escape_html(&heading.text)
            ));
        }
        out.push(format!("{indent}</ol>"));
        out.push("</nav>".to_string());
        out
    }
}

/// A heading tag found in a line of HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingTag {
    pub level: u8,
    /// Column of the `<`.
    pub start: usize,
    /// Column right after `<hN`, where attributes can be inserted.
    pub name_end: usize,
    pub id: Option<String>,
    pub text: String,
}

/// Finds the first `<h1>`..`<h6>` opening tag at or after `from`.
pub fn find_heading_tag(line: &str, from: usize) -> Option<HeadingTag> {
    let bytes = line.as_bytes();
    let mut search = from;
    while let Some(rel) = line.get(search..)?.find("<h") {
        let start = search + rel;
        let digit = bytes.get(start + 2).copied();
        let after = bytes.get(start + 3).copied();
        let level = match digit {
            Some(d @ b'1'..=b'6') => d - b'0',
            _ => {
                search = start + 2;
                continue;
            }
        };
        if !matches!(after, Some(b'>') | Some(b' ') | Some(b'\t')) {
            search = start + 2;
            continue;
        }
        let name_end = start + 3;
        let open_end = line[name_end..].find('>').map(|idx| name_end + idx)?;
        let id = attribute_value(&line[name_end..open_end], "id");
        let close_tag = format!("</h{level}");
        let inner_end = line[open_end + 1..]
            .find(&close_tag)
            .map(|idx| open_end + 1 + idx)
            .unwrap_or(line.len());
        let text = collapse_whitespace(&strip_tags(&line[open_end + 1..inner_end]));
        return Some(HeadingTag {
            level,
            start,
            name_end,
            id,
            text,
        });
    }
    None
}

fn attribute_value(attrs: &str, name: &str) -> Option<String> {
    let mut search = 0;
    while let Some(rel) = attrs[search..].find(name) {
        let idx = search + rel;
        let preceded = idx == 0 || attrs.as_bytes()[idx - 1].is_ascii_whitespace();
        let rest = &attrs[idx + name.len()..];
        if preceded {
            if let Some(rest) = rest.strip_prefix('=') {
                let quote = rest.chars().next()?;
                if quote == '"' || quote == '\'' {
                    let value = &rest[1..];
                    let end = value.find(quote)?;
                    return Some(value[..end].to_string());
                }
            }
        }
        search = idx + name.len();
    }
    None
}

pub struct TocBuilder {
    window: LevelWindow,
    headings: BTreeMap<InsertPosition, Heading>,
    root_level: Option<u8>,
    leaf_level: Option<u8>,
}

impl TocBuilder {
    pub fn new(window: LevelWindow) -> Self {
        Self {
            window,
            headings: BTreeMap::new(),
            root_level: None,
            leaf_level: None,
        }
    }

    pub fn root_level(&self) -> Option<u8> {
        self.root_level
    }

    pub fn leaf_level(&self) -> Option<u8> {
        self.leaf_level
    }

    /// Records a heading. Levels are clamped into the window.
    pub fn add(&mut self, position: InsertPosition, level: u8, text: &str, id: Option<&str>) {
        let level = self.window.clamp(level);
        self.root_level = Some(self.root_level.map_or(level, |root| root.min(level)));
        self.leaf_level = Some(self.leaf_level.map_or(level, |leaf| leaf.max(level)));
        self.headings.insert(
            position,
            Heading {
                level,
                text: text.to_string(),
                anchor: id.unwrap_or_default().to_string(),
                has_id: id.is_some(),
                numbering: Vec::new(),
            },
        );
    }

    /// Records every heading tag inside the window. Returns how many were found.
    pub fn scan_lines(&mut self, lines: &[String]) -> usize {
        let mut found = 0;
        for (line_no, line) in lines.iter().enumerate() {
            let mut from = 0;
            while let Some(tag) = find_heading_tag(line, from) {
                from = tag.name_end;
                if !self.window.contains(tag.level) {
                    continue;
                }
                self.add(
                    InsertPosition::new(line_no, tag.start),
                    tag.level,
                    &tag.text,
                    tag.id.as_deref(),
                );
                found += 1;
            }
        }
        found
    }

    pub fn finish(mut self) -> Toc {
        if let Some(root) = self.root_level {
            assign_numbering(&mut self.headings, root);
        }
        Toc {
            headings: self.headings,
            root_level: self.root_level,
            leaf_level: self.leaf_level,
        }
    }
}

fn assign_numbering(headings: &mut BTreeMap<InsertPosition, Heading>, root_level: u8) {
    let mut counters = [0u32; MAX_LEVEL as usize];
    for heading in headings.values_mut() {
        let depth = usize::from(heading.level.saturating_sub(root_level));
        for counter in counters.iter_mut().skip(depth + 1) {
            *counter = 0;
        }
        counters[depth] += 1;
        heading.numbering = counters[..=depth].to_vec();
    }
}
