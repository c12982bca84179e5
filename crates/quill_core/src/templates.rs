//! HTML templates and their insertion points.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BuildError;
use crate::extract::{extract_blocks, extract_paths, unrecognized_blocks};
use crate::position::InsertPosition;
use crate::report::Reporter;

pub mod block {
    pub const BREADCRUMB: &str = "breadcrumb";
    pub const PAGE_NAME: &str = "page-name";
    pub const PAGE_NAV: &str = "page-nav";
    pub const POST_META: &str = "post-meta";
    pub const POST_CONTENT: &str = "post-content";
    pub const CUSTOM_STYLE: &str = "custom-style";
    pub const INDEX_ENTRIES: &str = "index-entries";
    pub const INDEX_PANE_DATES: &str = "index-pane-dates";
    pub const INDEX_PANE_TAGS: &str = "index-pane-tags";
    pub const INDEX_LIST_FLAT: &str = "index-list-flat";
    pub const INDEX_LIST_HIERARCHY: &str = "index-list-hierarchy";
    pub const NEWEST_POSTS: &str = "newest-posts";
    pub const FEATURED_POSTS: &str = "featured-posts";
    pub const TOP_TAGS: &str = "top-tags";
    pub const TOP_AUTHORS: &str = "top-authors";
    pub const ENTRY_TITLE: &str = "entry-title";
    pub const ENTRY_DATE: &str = "entry-date";
    pub const ENTRY_AUTHORS: &str = "entry-authors";
    pub const ENTRY_TAGS: &str = "entry-tags";
    pub const ENTRY_SUMMARY: &str = "entry-summary";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateRole {
    Landing,
    Post,
    Index,
    IndexEntry,
}

impl TemplateRole {
    pub const ALL: [TemplateRole; 4] = [
        TemplateRole::Landing,
        TemplateRole::Post,
        TemplateRole::Index,
        TemplateRole::IndexEntry,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            TemplateRole::Landing => "landing.html",
            TemplateRole::Post => "post.html",
            TemplateRole::Index => "index.html",
            TemplateRole::IndexEntry => "index-entry.html",
        }
    }

    pub fn recognized_blocks(self) -> &'static [&'static str] {
        use block::*;
        match self {
            TemplateRole::Landing => &[
                BREADCRUMB,
                PAGE_NAME,
                NEWEST_POSTS,
                FEATURED_POSTS,
                TOP_TAGS,
                TOP_AUTHORS,
                INDEX_PANE_DATES,
                INDEX_PANE_TAGS,
            ],
            TemplateRole::Post => &[
                BREADCRUMB,
                PAGE_NAME,
                PAGE_NAV,
                POST_META,
                POST_CONTENT,
                CUSTOM_STYLE,
                INDEX_PANE_DATES,
                INDEX_PANE_TAGS,
            ],
            TemplateRole::Index => &[
                BREADCRUMB,
                PAGE_NAME,
                PAGE_NAV,
                INDEX_ENTRIES,
                INDEX_LIST_FLAT,
                INDEX_LIST_HIERARCHY,
                INDEX_PANE_DATES,
                INDEX_PANE_TAGS,
            ],
            TemplateRole::IndexEntry => &[
                ENTRY_TITLE,
                ENTRY_DATE,
                ENTRY_AUTHORS,
                ENTRY_TAGS,
                ENTRY_SUMMARY,
            ],
        }
    }

    pub fn required_blocks(self) -> &'static [&'static str] {
        match self {
            TemplateRole::Landing => &[block::NEWEST_POSTS],
            TemplateRole::Post => &[block::POST_CONTENT],
            TemplateRole::Index => &[block::INDEX_ENTRIES],
            TemplateRole::IndexEntry => &[block::ENTRY_TITLE],
        }
    }
}

/// Parsed template. Lines and both position maps are fixed at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source_path: String,
    lines: Vec<String>,
    blocks: BTreeMap<InsertPosition, String>,
    paths: BTreeMap<InsertPosition, String>,
    /// Markers the role does not know, as `(line, name)`.
    unrecognized: Vec<(usize, String)>,
}

impl Template {
    /// `source_path` is the site-relative location that relative references
    /// in the text are resolved against.
    pub fn parse(source_path: impl Into<String>, text: &str, recognized: &[&str]) -> Self {
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        let blocks = extract_blocks(&lines, recognized);
        let paths = extract_paths(&lines);
        let unrecognized = unrecognized_blocks(&lines, recognized);
        Self {
            source_path: source_path.into(),
            lines,
            blocks,
            paths,
            unrecognized,
        }
    }

    pub fn for_role(role: TemplateRole, text: &str) -> Self {
        Self::parse(role.file_name(), text, role.recognized_blocks())
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn blocks(&self) -> &BTreeMap<InsertPosition, String> {
        &self.blocks
    }

    pub fn paths(&self) -> &BTreeMap<InsertPosition, String> {
        &self.paths
    }

    pub fn unrecognized(&self) -> &[(usize, String)] {
        &self.unrecognized
    }

    /// One warning per marker the role does not know. Such markers stay in
    /// the output as plain text.
    pub fn report_unrecognized(&self, reporter: &dyn Reporter) {
        for (line_no, name) in &self.unrecognized {
            reporter.warning(
                Some(&self.source_path),
                &format!("line {}: unrecognized block '{name}', skipped", line_no + 1),
            );
        }
    }

    pub fn has_block(&self, name: &str) -> bool {
        self.blocks.values().any(|value| value == name)
    }

    pub fn require_blocks(&self, required: &[&str]) -> Result<(), BuildError> {
        for name in required {
            if !self.has_block(name) {
                return Err(BuildError::MissingInsertionPoint {
                    template: self.source_path.clone(),
                    block: (*name).to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Where template text comes from.
pub trait TemplateSource {
    fn load(&self, role: TemplateRole) -> Result<String, BuildError>;
}

pub struct DirTemplateSource {
    dir: PathBuf,
}

impl DirTemplateSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TemplateSource for DirTemplateSource {
    fn load(&self, role: TemplateRole) -> Result<String, BuildError> {
        let path = self.dir.join(role.file_name());
        fs::read_to_string(&path).map_err(|err| BuildError::access(&path, err))
    }
}

impl TemplateSource for BTreeMap<TemplateRole, String> {
    fn load(&self, role: TemplateRole) -> Result<String, BuildError> {
        self.get(&role).cloned().ok_or_else(|| {
            BuildError::access(
                role.file_name(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "template not provided"),
            )
        })
    }
}

#[derive(Debug, Clone)]
pub struct TemplateSet {
    landing: Template,
    post: Template,
    index: Template,
    index_entry: Template,
}

impl TemplateSet {
    /// Loads and extracts every role, failing on the first template that
    /// lacks a required insertion point.
    pub fn load(source: &dyn TemplateSource) -> Result<Self, BuildError> {
        Ok(Self {
            landing: load_role(source, TemplateRole::Landing)?,
            post: load_role(source, TemplateRole::Post)?,
            index: load_role(source, TemplateRole::Index)?,
            index_entry: load_role(source, TemplateRole::IndexEntry)?,
        })
    }

    pub fn report_unrecognized(&self, reporter: &dyn Reporter) {
        for role in TemplateRole::ALL {
            self.get(role).report_unrecognized(reporter);
        }
    }

    pub fn get(&self, role: TemplateRole) -> &Template {
        match role {
            TemplateRole::Landing => &self.landing,
            TemplateRole::Post => &self.post,
            TemplateRole::Index => &self.index,
            TemplateRole::IndexEntry => &self.index_entry,
        }
    }
}

fn load_role(source: &dyn TemplateSource, role: TemplateRole) -> Result<Template, BuildError> {
    let text = source.load(role)?;
    let template = Template::for_role(role, &text);
    template.require_blocks(role.required_blocks())?;
    Ok(template)
}
