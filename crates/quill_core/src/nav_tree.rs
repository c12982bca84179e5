//! Collapsible navigation trees.
//!
//! Each tree is rendered once into lines with site-relative links. A page
//! gets its copy by toggling a handful of known lines (expanded nodes, the
//! current leaf) and prefixing links with the page's root prefix.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Month;

use crate::html::{escape_html, insert_after_first};
use crate::index::SiteIndex;
use crate::model::normalize_key;
use crate::paths::root_prefix;

const EXPANDED: &str = " checked";
const CURRENT: &str = "class=\"current\" ";

/// What a page wants highlighted in a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFocus<'a> {
    None,
    Document(usize),
    Year(i32),
    Tag(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTree {
    lines: Vec<String>,
    years: BTreeMap<i32, usize>,
    /// `YYYY * 100 + MM` to line.
    months: BTreeMap<i64, usize>,
    /// Document index to leaf line.
    leaves: BTreeMap<usize, usize>,
    /// Document index to its month key.
    doc_months: BTreeMap<usize, i64>,
}

impl DateTree {
    pub fn build(index: &SiteIndex, indent: &str) -> Self {
        let mut tree = Self {
            lines: Vec::new(),
            years: BTreeMap::new(),
            months: BTreeMap::new(),
            leaves: BTreeMap::new(),
            doc_months: BTreeMap::new(),
        };
        let mut lines = LineWriter::new(indent);
        lines.push(0, "<ul class=\"nav-tree nav-dates\">");
        let mut current_year = None;
        let mut current_month = None;

        for (idx, doc) in index.documents.iter().enumerate() {
            let year = doc.date.year;
            let month_key = doc.date.month_key();
            if current_year != Some(year) {
                if current_month.is_some() {
                    lines.close_month();
                }
                if current_year.is_some() {
                    lines.close_year();
                }
                let id = format!("nav-y{year}");
                let year_page = index
                    .by_year
                    .get(&year.to_string())
                    .and_then(|entry| entry.first_page());
                let label = match year_page {
                    Some(page) => format!("<a href=\"{page}\">{year}</a>"),
                    None => year.to_string(),
                };
                tree.years.insert(year, lines.len());
                lines.push(
                    1,
                    &format!(
                        "<li class=\"nav-year\"><input type=\"checkbox\" id=\"{id}\"><label for=\"{id}\">{label}</label>"
                    ),
                );
                lines.push(2, "<ul>");
                current_year = Some(year);
                current_month = None;
            }
            if current_month != Some(month_key) {
                if current_month.is_some() {
                    lines.close_month();
                }
                let id = format!("nav-m{month_key}");
                tree.months.insert(month_key, lines.len());
                lines.push(
                    3,
                    &format!(
                        "<li class=\"nav-month\"><input type=\"checkbox\" id=\"{id}\"><label for=\"{id}\">{}</label>",
                        month_name(doc.date.month)
                    ),
                );
                lines.push(4, "<ul>");
                current_month = Some(month_key);
            }
            tree.leaves.insert(idx, lines.len());
            tree.doc_months.insert(idx, month_key);
            lines.push(
                5,
                &format!(
                    "<li class=\"nav-leaf\"><a href=\"{}\">{}</a></li>",
                    doc.output_path,
                    escape_html(&doc.title)
                ),
            );
        }
        if current_month.is_some() {
            lines.close_month();
        }
        if current_year.is_some() {
            lines.close_year();
        }
        lines.push(0, "</ul>");
        tree.lines = lines.into_lines();
        tree
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn year_line(&self, year: i32) -> Option<usize> {
        self.years.get(&year).copied()
    }

    pub fn month_line(&self, month_key: i64) -> Option<usize> {
        self.months.get(&month_key).copied()
    }

    pub fn leaf_line(&self, doc: usize) -> Option<usize> {
        self.leaves.get(&doc).copied()
    }

    /// The tree as it appears on the page at `output_path`.
    pub fn render(&self, focus: TreeFocus<'_>, output_path: &str) -> Vec<String> {
        let mut expanded = BTreeSet::new();
        let mut current = BTreeSet::new();
        match focus {
            TreeFocus::Document(doc) => {
                if let Some(month_key) = self.doc_months.get(&doc).copied() {
                    let year = i32::try_from(month_key / 100).ok();
                    expanded.extend(year.and_then(|year| self.year_line(year)));
                    expanded.extend(self.month_line(month_key));
                }
                current.extend(self.leaf_line(doc));
            }
            TreeFocus::Year(year) => expanded.extend(self.year_line(year)),
            TreeFocus::Tag(_) | TreeFocus::None => {}
        }
        emit(&self.lines, &expanded, &current, &root_prefix(output_path))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTree {
    lines: Vec<String>,
    /// Normalized tag to node line.
    tags: BTreeMap<String, usize>,
    /// Document index to every leaf line it appears on.
    leaves: BTreeMap<usize, Vec<usize>>,
    /// Document index to the node lines of its tags.
    doc_tags: BTreeMap<usize, Vec<usize>>,
}

impl TagTree {
    pub fn build(index: &SiteIndex, indent: &str) -> Self {
        let mut tags = BTreeMap::new();
        let mut leaves: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        let mut doc_tags: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        let mut lines = LineWriter::new(indent);
        lines.push(0, "<ul class=\"nav-tree nav-tags\">");
        for entry in index.by_tag.entries() {
            let id = format!("nav-{}", entry.prefix);
            let label = match entry.first_page() {
                Some(page) => format!("<a href=\"{page}\">{}</a>", escape_html(&entry.name)),
                None => escape_html(&entry.name),
            };
            let node_line = lines.len();
            tags.insert(entry.key.clone(), node_line);
            lines.push(
                1,
                &format!(
                    "<li class=\"nav-tag\"><input type=\"checkbox\" id=\"{id}\"><label for=\"{id}\">{label} ({})</label>",
                    entry.docs.len()
                ),
            );
            lines.push(2, "<ul>");
            for doc_idx in &entry.docs {
                let Some(doc) = index.document(*doc_idx) else {
                    continue;
                };
                leaves.entry(*doc_idx).or_default().push(lines.len());
                doc_tags.entry(*doc_idx).or_default().push(node_line);
                lines.push(
                    3,
                    &format!(
                        "<li class=\"nav-leaf\"><a href=\"{}\">{}</a></li>",
                        doc.output_path,
                        escape_html(&doc.title)
                    ),
                );
            }
            lines.push(2, "</ul>");
            lines.push(1, "</li>");
        }
        lines.push(0, "</ul>");
        Self {
            lines: lines.into_lines(),
            tags,
            leaves,
            doc_tags,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn tag_line(&self, tag: &str) -> Option<usize> {
        self.tags.get(&normalize_key(tag)).copied()
    }

    pub fn leaf_lines(&self, doc: usize) -> &[usize] {
        self.leaves.get(&doc).map_or(&[], Vec::as_slice)
    }

    pub fn render(&self, focus: TreeFocus<'_>, output_path: &str) -> Vec<String> {
        let mut expanded = BTreeSet::new();
        let mut current = BTreeSet::new();
        match focus {
            TreeFocus::Document(doc) => {
                if let Some(nodes) = self.doc_tags.get(&doc) {
                    expanded.extend(nodes.iter().copied());
                }
                current.extend(self.leaf_lines(doc).iter().copied());
            }
            TreeFocus::Tag(tag) => expanded.extend(self.tag_line(tag)),
            TreeFocus::Year(_) | TreeFocus::None => {}
        }
        emit(&self.lines, &expanded, &current, &root_prefix(output_path))
    }
}

fn emit(
    lines: &[String],
    expanded: &BTreeSet<usize>,
    current: &BTreeSet<usize>,
    prefix: &str,
) -> Vec<String> {
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            let mut line = if expanded.contains(&idx) {
                insert_after_first(line, "<input", EXPANDED)
            } else {
                line.clone()
            };
            if current.contains(&idx) {
                line = insert_after_first(&line, "<a ", CURRENT);
            }
            if !prefix.is_empty() {
                line = insert_after_first(&line, "href=\"", prefix);
            }
            line
        })
        .collect()
}

pub fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|value| Month::try_from(value).ok())
        .map_or_else(|| format!("{month:02}"), |month| month.name().to_string())
}

struct LineWriter<'a> {
    indent: &'a str,
    lines: Vec<String>,
}

impl<'a> LineWriter<'a> {
    fn new(indent: &'a str) -> Self {
        Self {
            indent,
            lines: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.lines.len()
    }

    fn push(&mut self, depth: usize, text: &str) {
        self.lines.push(format!("{}{text}", self.indent.repeat(depth)));
    }

    fn close_month(&mut self) {
        self.push(4, "</ul>");
        self.push(3, "</li>");
    }

    fn close_year(&mut self) {
        self.push(2, "</ul>");
        self.push(1, "</li>");
    }

    fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodySettings;
    use crate::index::IndexSettings;
    use crate::model::{SiteSources, SourceDoc};
    use crate::report::DiagnosticCollector;
    use chrono::NaiveDate;

    fn site() -> SiteIndex {
        let doc = |path: &str, title: &str, date: &str, tags: &str| {
            SourceDoc::new(path, format!("title: {title}\ndate: {date}\ntags: {tags}\n\nText\n"))
        };
        let sources = SiteSources {
            documents: vec![
                doc("a.md", "Alpha", "2023-12-30", "rust"),
                doc("b.md", "Beta", "2024-02-01", "rust, web"),
                doc("c.md", "Gamma", "2024-02-15", "web"),
                doc("d.md", "Delta", "2024-03-01", "rust"),
            ],
            ..SiteSources::default()
        };
        let settings = IndexSettings {
            items_per_page: 10,
            top_tags: 5,
            top_authors: 5,
            summary_chars: 100,
            allow_future: false,
            today: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            body: BodySettings::default(),
        };
        SiteIndex::build(&sources, &settings, &DiagnosticCollector::new())
    }

    #[test]
    fn date_tree_has_one_node_per_year_and_month() {
        let index = site();
        let tree = DateTree::build(&index, "  ");
        assert_eq!(tree.years.len(), 2);
        assert_eq!(tree.months.len(), 3);
        assert_eq!(tree.leaves.len(), 4);
        let month = tree.month_line(202_402).unwrap();
        assert!(tree.lines()[month].contains(">February</label>"));
        assert!(tree.year_line(2024).unwrap() < month);
    }

    #[test]
    fn document_focus_expands_its_branch_only() {
        let index = site();
        let tree = DateTree::build(&index, "  ");
        let beta = index.documents.iter().position(|d| d.title == "Beta").unwrap();
        let out = tree.render(TreeFocus::Document(beta), "posts/2.html");
        assert_eq!(out.len(), tree.lines().len());

        let checked: Vec<usize> = out
            .iter()
            .enumerate()
            .filter(|(_, line)| line.contains("<input checked"))
            .map(|(idx, _)| idx)
            .collect();
        assert_eq!(
            checked,
            vec![tree.year_line(2024).unwrap(), tree.month_line(202_402).unwrap()]
        );
        let leaf = &out[tree.leaf_line(beta).unwrap()];
        assert!(leaf.contains("<a class=\"current\" href=\"../posts/2.html\">Beta</a>"));
        assert_eq!(out.iter().filter(|line| line.contains("current")).count(), 1);
        // the shared tree is untouched
        assert!(!tree.lines().iter().any(|line| line.contains("checked")));
    }

    #[test]
    fn root_pages_keep_links_unprefixed() {
        let index = site();
        let tree = DateTree::build(&index, "  ");
        let out = tree.render(TreeFocus::Year(2023), "index.html");
        assert!(out.iter().any(|line| line.contains("href=\"posts/1.html\"")));
        assert_eq!(out.iter().filter(|line| line.contains("checked")).count(), 1);
    }

    #[test]
    fn tag_tree_marks_every_occurrence_of_a_document() {
        let index = site();
        let tree = TagTree::build(&index, "  ");
        let beta = index.documents.iter().position(|d| d.title == "Beta").unwrap();
        assert_eq!(tree.leaf_lines(beta).len(), 2);
        let out = tree.render(TreeFocus::Document(beta), "index/by_tag/t0_0.html");
        assert_eq!(out.iter().filter(|line| line.contains("class=\"current\"")).count(), 2);
        assert_eq!(out.iter().filter(|line| line.contains("<input checked")).count(), 2);
        assert!(out.iter().any(|line| line.contains("href=\"../../posts/")));

        let out = tree.render(TreeFocus::Tag("WEB"), "index.html");
        let web = tree.tag_line("web").unwrap();
        assert!(out[web].contains("<input checked"));
        assert!(out[web].contains("web</a> (2)"));
    }
}
