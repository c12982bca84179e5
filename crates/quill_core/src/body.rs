//! Article body preparation and per-page rendering.
//!
//! A body is converted to HTML lines once during indexing. Rendering then
//! applies three kinds of insertion in position order: relative references
//! rewritten for the output location, the table of contents, and generated
//! heading ids.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap};

use pulldown_cmark::{Options, Parser, html};
use pulldown_cmark_toc::{GitHubSlugifier, Slugify};

use crate::extract::extract_paths;
use crate::html::{escape_html, indentation};
use crate::paths::rebase;
use crate::position::InsertPosition;
use crate::toc::{LevelWindow, Toc, TocBuilder};

pub const TOC_MARKER: &str = "[TOC]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodySettings {
    pub window: LevelWindow,
    pub toc_auto: bool,
    pub toc_min_headings: usize,
}

impl Default for BodySettings {
    fn default() -> Self {
        Self {
            window: LevelWindow::default(),
            toc_auto: true,
            toc_min_headings: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TocSlot {
    position: InsertPosition,
    /// Bytes of marker text replaced by the ToC; zero for the automatic slot.
    replaced_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostBody {
    source_path: String,
    lines: Vec<String>,
    paths: BTreeMap<InsertPosition, String>,
    pub toc: Toc,
    toc_slot: Option<TocSlot>,
    toc_enabled: bool,
}

pub fn is_markdown(source_path: &str) -> bool {
    let lower = source_path.to_ascii_lowercase();
    lower.ends_with(".md") || lower.ends_with(".markdown")
}

pub fn render_markdown_to_html(md: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    let parser = Parser::new_ext(md, options);
    let mut html_out = String::new();
    html::push_html(&mut html_out, parser);
    html_out
}

impl PostBody {
    /// `toc_override` is the article header's `toc:` flag, if any.
    pub fn prepare(
        source_path: &str,
        text: &str,
        toc_override: Option<bool>,
        settings: &BodySettings,
    ) -> Self {
        let html = if is_markdown(source_path) {
            render_markdown_to_html(text)
        } else {
            text.to_string()
        };
        let lines: Vec<String> = html.lines().map(str::to_string).collect();
        let paths = extract_paths(&lines);

        let mut builder = TocBuilder::new(settings.window);
        let found = builder.scan_lines(&lines);
        let mut toc = builder.finish();
        let mut slugger = GitHubSlugifier::default();
        toc.fill_missing_anchors(|text| slugger.slugify(text).into_owned());

        let explicit = find_marker(&lines);
        let toc_enabled = match toc_override {
            Some(flag) => flag,
            None => explicit.is_some() || (settings.toc_auto && found >= settings.toc_min_headings),
        };
        let toc_slot = explicit.or_else(|| {
            toc.first_position().map(|position| TocSlot {
                position,
                replaced_len: 0,
            })
        });

        Self {
            source_path: source_path.to_string(),
            lines,
            paths,
            toc,
            toc_slot,
            toc_enabled,
        }
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn shows_toc(&self) -> bool {
        self.toc_enabled && !self.toc.is_empty() && self.toc_slot.is_some()
    }

    fn insertions(&self) -> BinaryHeap<Reverse<PostInsertion>> {
        let mut heap = BinaryHeap::new();
        for (position, original) in &self.paths {
            heap.push(Reverse(PostInsertion::Path {
                position: *position,
                original: original.clone(),
            }));
        }
        for (position, heading) in self.toc.headings() {
            if !heading.has_id {
                heap.push(Reverse(PostInsertion::HeadingId {
                    // right after `<hN`
                    position: InsertPosition::new(position.line, position.column + 3),
                    id: heading.anchor.clone(),
                }));
            }
        }
        if let Some(slot) = self.toc_slot {
            let is_marker = slot.replaced_len > 0;
            if self.shows_toc() || is_marker {
                heap.push(Reverse(PostInsertion::Toc {
                    position: slot.position,
                    replaced_len: slot.replaced_len,
                }));
            }
        }
        heap
    }

    /// Body lines as they appear in the page at `output_path`.
    pub fn render(&self, output_path: &str, indent: &str) -> Vec<String> {
        let mut heap = self.insertions();
        let mut out = Vec::with_capacity(self.lines.len() + self.toc.len() + 4);
        let toc_lines = if self.shows_toc() {
            self.toc.to_html(indent)
        } else {
            Vec::new()
        };

        for (line_no, line) in self.lines.iter().enumerate() {
            let lead = indentation(line);
            let mut current = String::with_capacity(line.len());
            let mut cursor = 0;
            let mut dropped_marker = false;

            while let Some(Reverse(next)) = heap.peek() {
                if next.position().line != line_no {
                    break;
                }
                let Some(Reverse(insertion)) = heap.pop() else {
                    break;
                };
                let column = insertion.position().column;
                if column < cursor {
                    continue;
                }
                current.push_str(&line[cursor..column]);
                match insertion {
                    PostInsertion::Path { original, .. } => {
                        current.push_str(&rebase(&original, &self.source_path, output_path));
                        cursor = column + original.len();
                    }
                    PostInsertion::HeadingId { id, .. } => {
                        current.push_str(" id=\"");
                        current.push_str(&escape_html(&id));
                        current.push('"');
                        cursor = column;
                    }
                    PostInsertion::Toc { replaced_len, .. } => {
                        if !current.trim().is_empty() {
                            out.push(std::mem::take(&mut current));
                        }
                        current.clear();
                        for toc_line in &toc_lines {
                            out.push(format!("{lead}{toc_line}"));
                        }
                        current.push_str(lead);
                        cursor = column + replaced_len;
                        dropped_marker = replaced_len > 0;
                    }
                }
            }

            current.push_str(&line[cursor..]);
            if !(dropped_marker && current.trim().is_empty()) {
                out.push(current);
            }
        }
        out
    }
}

fn find_marker(lines: &[String]) -> Option<TocSlot> {
    lines.iter().enumerate().find_map(|(line_no, line)| {
        let trimmed = line.trim();
        let is_marker = trimmed == TOC_MARKER || trimmed == format!("<p>{TOC_MARKER}</p>");
        is_marker.then(|| TocSlot {
            position: InsertPosition::new(line_no, indentation(line).len()),
            replaced_len: trimmed.len(),
        })
    })
}

/// One edit applied while rendering a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostInsertion {
    Path {
        position: InsertPosition,
        original: String,
    },
    Toc {
        position: InsertPosition,
        replaced_len: usize,
    },
    HeadingId {
        position: InsertPosition,
        id: String,
    },
}

impl PostInsertion {
    pub fn position(&self) -> InsertPosition {
        match self {
            PostInsertion::Path { position, .. }
            | PostInsertion::Toc { position, .. }
            | PostInsertion::HeadingId { position, .. } => *position,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            PostInsertion::Toc { .. } => 0,
            PostInsertion::Path { .. } => 1,
            PostInsertion::HeadingId { .. } => 2,
        }
    }
}

impl Ord for PostInsertion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position()
            .cmp(&other.position())
            .then_with(|| self.rank().cmp(&other.rank()))
    }
}

impl PartialOrd for PostInsertion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
