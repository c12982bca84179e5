//! Core document and site models

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::body::PostBody;
use crate::templates::Template;
use crate::toc::Toc;

/// Tag assigned to documents that declare none.
pub const NO_TAG: &str = "N/A";

/// A raw input file, addressed by its site-relative path with `/` separators.
#[derive(Debug, Clone)]
pub struct SourceDoc {
    pub source_path: String,
    pub raw: String,
}

impl SourceDoc {
    pub fn new(source_path: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            raw: raw.into(),
        }
    }
}

/// Everything the indexer consumes: articles plus the optional per-article
/// stylesheets (`<stem>.css`) and custom index entries (`<stem>.entry.html`).
#[derive(Debug, Clone, Default)]
pub struct SiteSources {
    pub documents: Vec<SourceDoc>,
    pub stylesheets: Vec<SourceDoc>,
    pub entries: Vec<SourceDoc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DocDate {
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// `YYYY * 100 + MM`, the key of a month node.
    pub fn month_key(&self) -> i64 {
        i64::from(self.year) * 100 + i64::from(self.month)
    }

    pub fn to_naive(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl From<NaiveDate> for DocDate {
    fn from(value: NaiveDate) -> Self {
        Self::new(value.year(), value.month(), value.day())
    }
}

impl fmt::Display for DocDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Set of names compared case-insensitively. The first spelling seen is
/// kept for display; iteration follows the normalized key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseInsensitiveSet {
    items: BTreeMap<String, String>,
}

impl CaseInsensitiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the value is blank or already present.
    pub fn insert(&mut self, value: &str) -> bool {
        let display = value.trim();
        if display.is_empty() {
            return false;
        }
        let key = normalize_key(display);
        if self.items.contains_key(&key) {
            return false;
        }
        self.items.insert(key, display.to_string());
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.items.contains_key(&normalize_key(value))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Yields `(normalized, display)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items
            .iter()
            .map(|(key, display)| (key.as_str(), display.as_str()))
    }

    pub fn display_names(&self) -> impl Iterator<Item = &str> {
        self.items.values().map(String::as_str)
    }
}

impl<'a> FromIterator<&'a str> for CaseInsensitiveSet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

#[derive(Debug, Clone)]
pub struct Stylesheet {
    pub source_path: String,
    pub output_path: String,
    pub contents: String,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub uuid: Uuid,
    pub source_path: String,
    pub seq: u32,
    pub title: String,
    pub date: DocDate,
    pub authors: CaseInsensitiveSet,
    pub tags: CaseInsensitiveSet,
    pub featured: bool,
    pub summary: Option<String>,
    pub body: PostBody,
    /// Site-relative path of the rendered page, `posts/<seq>.<ext>`.
    pub output_path: String,
    pub custom_entry: Option<Template>,
    pub stylesheet: Option<Stylesheet>,
}

impl Document {
    pub fn toc(&self) -> Option<&Toc> {
        if self.body.toc.is_empty() {
            None
        } else {
            Some(&self.body.toc)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub source_path: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        level: DiagnosticLevel,
        source_path: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            source_path: source_path.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn warning(source_path: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warning, source_path, message)
    }

    pub fn error(source_path: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, source_path, message)
    }

    pub fn info(source_path: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Info, source_path, message)
    }
}
