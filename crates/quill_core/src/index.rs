//! Content indexing: chronological order, category groupings, pagination
//! and top-N rankings.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use chrono::NaiveDate;

use crate::abstracts::derive_summary;
use crate::body::{BodySettings, PostBody};
use crate::config::SiteConfig;
use crate::error::BuildError;
use crate::header::{Header, header_line_count, parse_header, split_header_body};
use crate::model::{
    CaseInsensitiveSet, DocDate, Document, NO_TAG, SiteSources, SourceDoc, Stylesheet,
    normalize_key,
};
use crate::report::{Phase, Reporter};
use crate::templates::{Template, TemplateRole};
use crate::toc::LevelWindow;

pub const POSTS_DIR: &str = "posts";
pub const LANDING_PAGE: &str = "index.html";

/// Number of pages needed for `item_count` items.
pub fn page_count(items_per_page: usize, item_count: usize) -> usize {
    if items_per_page == 0 {
        return 0;
    }
    item_count.div_ceil(items_per_page)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    Date,
    Year,
    Tag,
    Author,
}

impl Axis {
    pub fn dir(self) -> &'static str {
        match self {
            Axis::Date => "index/by_date",
            Axis::Year => "index/by_year",
            Axis::Tag => "index/by_tag",
            Axis::Author => "index/by_author",
        }
    }

    /// Letter that starts every category prefix on this axis.
    pub fn prefix_letter(self) -> Option<char> {
        match self {
            Axis::Date => None,
            Axis::Year => Some('y'),
            Axis::Tag => Some('t'),
            Axis::Author => Some('a'),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Axis::Date => "Date",
            Axis::Year => "Year",
            Axis::Tag => "Tag",
            Axis::Author => "Author",
        }
    }
}

/// One category on an axis, or the whole chronological list for
/// [`Axis::Date`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub axis: Axis,
    /// Normalized key; empty for the chronological list.
    pub key: String,
    pub name: String,
    /// File-name prefix; empty for the chronological list.
    pub prefix: String,
    /// Document indices, newest first.
    pub docs: Vec<usize>,
    /// Site-relative page paths in page order.
    pub pages: Vec<String>,
}

impl CategoryEntry {
    fn new(axis: Axis, key: String, name: String, prefix: String) -> Self {
        Self {
            axis,
            key,
            name,
            prefix,
            docs: Vec::new(),
            pages: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn first_page(&self) -> Option<&str> {
        self.pages.first().map(String::as_str)
    }

    pub fn page_path(&self, page: usize) -> Result<&str, BuildError> {
        self.pages
            .get(page)
            .map(String::as_str)
            .ok_or_else(|| BuildError::OutOfPageNames {
                category: self.describe(),
                page,
            })
    }

    /// Documents shown on page `page`.
    pub fn page_docs(&self, page: usize, items_per_page: usize) -> &[usize] {
        let start = page.saturating_mul(items_per_page).min(self.docs.len());
        let end = start.saturating_add(items_per_page).min(self.docs.len());
        &self.docs[start..end]
    }

    pub fn describe(&self) -> String {
        if self.key.is_empty() {
            self.axis.dir().to_string()
        } else {
            format!("{} '{}'", self.axis.label().to_lowercase(), self.name)
        }
    }

    fn paginate(&mut self, items_per_page: usize) {
        let count = page_count(items_per_page, self.docs.len());
        // Names are immutable once assigned; only missing ones are generated.
        for page in self.pages.len()..count {
            let path = if self.prefix.is_empty() {
                format!("{}/{page}.html", self.axis.dir())
            } else {
                format!("{}/{}_{page}.html", self.axis.dir(), self.prefix)
            };
            self.pages.push(path);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryIndex {
    axis: Axis,
    entries: BTreeMap<String, CategoryEntry>,
    next_prefix: usize,
}

impl CategoryIndex {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            entries: BTreeMap::new(),
            next_prefix: 0,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Adds `doc` to the category named `name`, creating it with the next
    /// free prefix if this is the first time the category is seen.
    pub fn add(&mut self, name: &str, doc: usize) {
        let key = normalize_key(name);
        if key.is_empty() {
            return;
        }
        if !self.entries.contains_key(&key) {
            let letter = self.axis.prefix_letter().unwrap_or('c');
            let prefix = format!("{letter}{}", self.next_prefix);
            self.next_prefix += 1;
            let entry =
                CategoryEntry::new(self.axis, key.clone(), name.trim().to_string(), prefix);
            self.entries.insert(key.clone(), entry);
        }
        if let Some(entry) = self.entries.get_mut(&key) {
            if entry.docs.last() != Some(&doc) {
                entry.docs.push(doc);
            }
        }
    }

    pub fn paginate(&mut self, items_per_page: usize) {
        for entry in self.entries.values_mut() {
            entry.paginate(items_per_page);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CategoryEntry> {
        self.entries.get(&normalize_key(name))
    }

    /// Entries ordered by normalized key.
    pub fn entries(&self) -> impl Iterator<Item = &CategoryEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `n` entries with the most documents, largest first. Equal counts
    /// are ordered by normalized key.
    pub fn top_n(&self, n: usize) -> Vec<&CategoryEntry> {
        if n == 0 {
            return Vec::new();
        }
        let mut heap = BinaryHeap::with_capacity(n + 1);
        for entry in self.entries.values() {
            heap.push(Reverse((entry.docs.len(), Reverse(entry.key.as_str()))));
            if heap.len() > n {
                heap.pop();
            }
        }
        let mut ranked: Vec<_> = heap.into_iter().map(|Reverse(rank)| rank).collect();
        ranked.sort_by(|a, b| b.cmp(a));
        ranked
            .into_iter()
            .filter_map(|(_, Reverse(key))| self.entries.get(key))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSettings {
    pub items_per_page: usize,
    pub top_tags: usize,
    pub top_authors: usize,
    pub summary_chars: usize,
    pub allow_future: bool,
    pub today: NaiveDate,
    pub body: BodySettings,
}

impl IndexSettings {
    pub fn from_config(config: &SiteConfig, today: NaiveDate) -> Result<Self, BuildError> {
        let window = LevelWindow::from_offset(config.toc.offset, config.toc.depth)?;
        Ok(Self {
            items_per_page: config.index.items_per_page,
            top_tags: config.index.top_tags,
            top_authors: config.index.top_authors,
            summary_chars: config.index.summary_chars,
            allow_future: config.publish.allow_future,
            today,
            body: BodySettings {
                window,
                toc_auto: config.toc.auto,
                toc_min_headings: config.toc.min_headings,
            },
        })
    }
}

#[derive(Debug, Clone)]
pub struct SiteIndex {
    /// Newest first; position in this list is the document index used by
    /// every category.
    pub documents: Vec<Document>,
    pub by_date: CategoryEntry,
    pub by_year: CategoryIndex,
    pub by_tag: CategoryIndex,
    pub by_author: CategoryIndex,
    pub top_tags: Vec<String>,
    pub top_authors: Vec<String>,
    /// Source paths left out of the site.
    pub excluded: Vec<String>,
    pub items_per_page: usize,
}

/// A document that passed metadata checks, before sequence assignment.
struct Accepted {
    source_path: String,
    header: Header,
    title: String,
    date: DocDate,
    body: PostBody,
    summary: Option<String>,
}

impl SiteIndex {
    pub fn build(sources: &SiteSources, settings: &IndexSettings, reporter: &dyn Reporter) -> Self {
        reporter.progress(
            Phase::Index,
            &format!("indexing {} documents", sources.documents.len()),
        );
        let mut excluded = Vec::new();
        let mut accepted = Vec::with_capacity(sources.documents.len());
        for source in &sources.documents {
            match accept(source, settings) {
                Ok(Some(doc)) => accepted.push(doc),
                Ok(None) => {
                    reporter.info(Some(&source.source_path), "draft, not published");
                    excluded.push(source.source_path.clone());
                }
                Err(Exclusion::Future(date)) => {
                    reporter.warning(
                        Some(&source.source_path),
                        &format!("dated {date}, in the future; skipped"),
                    );
                    excluded.push(source.source_path.clone());
                }
                Err(Exclusion::Invalid(err)) => {
                    reporter.error(Some(&source.source_path), &err.to_string());
                    excluded.push(source.source_path.clone());
                }
            }
        }

        // (1) chronological order, sequence numbers and file names
        accepted.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| a.source_path.cmp(&b.source_path))
        });
        let total = accepted.len();
        let mut documents: Vec<Document> = accepted
            .into_iter()
            .enumerate()
            .map(|(idx, doc)| into_document(doc, total - idx))
            .collect();

        attach_stylesheets(&mut documents, &sources.stylesheets, &excluded, reporter);
        attach_entries(&mut documents, &sources.entries, &excluded, reporter);

        // (2) membership maps
        let mut by_year = CategoryIndex::new(Axis::Year);
        let mut by_tag = CategoryIndex::new(Axis::Tag);
        let mut by_author = CategoryIndex::new(Axis::Author);
        for (idx, doc) in documents.iter().enumerate() {
            by_year.add(&doc.date.year.to_string(), idx);
            for (_, tag) in doc.tags.iter() {
                by_tag.add(tag, idx);
            }
            for (_, author) in doc.authors.iter() {
                by_author.add(author, idx);
            }
        }

        // (3) per-category pagination
        by_year.paginate(settings.items_per_page);
        by_tag.paginate(settings.items_per_page);
        by_author.paginate(settings.items_per_page);

        // (4) chronological pagination
        let mut by_date = CategoryEntry::new(
            Axis::Date,
            String::new(),
            "All posts".to_string(),
            String::new(),
        );
        by_date.docs = (0..documents.len()).collect();
        by_date.paginate(settings.items_per_page);

        // (5) rankings
        let top_tags = by_tag
            .top_n(settings.top_tags)
            .into_iter()
            .map(|entry| entry.key.clone())
            .collect();
        let top_authors = by_author
            .top_n(settings.top_authors)
            .into_iter()
            .map(|entry| entry.key.clone())
            .collect();

        reporter.progress(
            Phase::Index,
            &format!(
                "{} documents, {} tags, {} authors, {} years",
                documents.len(),
                by_tag.len(),
                by_author.len(),
                by_year.len()
            ),
        );

        Self {
            documents,
            by_date,
            by_year,
            by_tag,
            by_author,
            top_tags,
            top_authors,
            excluded,
            items_per_page: settings.items_per_page,
        }
    }

    pub fn category(&self, axis: Axis) -> Option<&CategoryIndex> {
        match axis {
            Axis::Date => None,
            Axis::Year => Some(&self.by_year),
            Axis::Tag => Some(&self.by_tag),
            Axis::Author => Some(&self.by_author),
        }
    }

    pub fn document(&self, idx: usize) -> Option<&Document> {
        self.documents.get(idx)
    }
}

enum Exclusion {
    Future(DocDate),
    Invalid(BuildError),
}

fn accept(source: &SourceDoc, settings: &IndexSettings) -> Result<Option<Accepted>, Exclusion> {
    let path = source.source_path.as_str();
    let (header_text, body_text) = split_header_body(&source.raw);
    let header = match header_text {
        Some(text) => parse_header(text).map_err(|err| {
            Exclusion::Invalid(BuildError::metadata(path, Some(err.line()), err.to_string()))
        })?,
        None => Header::default(),
    };
    if !header.is_published {
        return Ok(None);
    }
    let header_lines = header_text.map(header_line_count);
    let title = header.title.clone().ok_or_else(|| {
        Exclusion::Invalid(BuildError::metadata(path, header_lines, "missing title"))
    })?;
    let date = header.date.ok_or_else(|| {
        Exclusion::Invalid(BuildError::metadata(path, header_lines, "missing date"))
    })?;
    if !settings.allow_future && date.to_naive().is_some_and(|day| day > settings.today) {
        return Err(Exclusion::Future(date));
    }

    let body = PostBody::prepare(path, body_text, header.toc, &settings.body);
    let summary = header
        .abstract_text
        .clone()
        .or_else(|| derive_summary(body.lines(), settings.summary_chars));
    Ok(Some(Accepted {
        source_path: path.to_string(),
        header,
        title,
        date,
        body,
        summary,
    }))
}

fn into_document(doc: Accepted, seq: usize) -> Document {
    let seq = u32::try_from(seq).unwrap_or(u32::MAX);
    let mut tags: CaseInsensitiveSet = doc.header.tags.iter().map(String::as_str).collect();
    if tags.is_empty() {
        tags.insert(NO_TAG);
    }
    let authors: CaseInsensitiveSet = doc
        .header
        .authors
        .iter()
        .chain(doc.header.author.iter())
        .map(String::as_str)
        .collect();
    let output_path = format!(
        "{POSTS_DIR}/{seq}.{}",
        output_extension(&doc.source_path)
    );
    Document {
        uuid: doc.header.uuid,
        source_path: doc.source_path,
        seq,
        title: doc.title,
        date: doc.date,
        authors,
        tags,
        featured: doc.header.featured,
        summary: doc.summary,
        body: doc.body,
        output_path,
        custom_entry: None,
        stylesheet: None,
    }
}

/// Output extension for a source file; Markdown becomes `html`.
pub fn output_extension(source_path: &str) -> String {
    let file = source_path.rsplit('/').next().unwrap_or(source_path);
    match file.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            if ext == "md" || ext == "markdown" {
                "html".to_string()
            } else {
                ext
            }
        }
        None => "html".to_string(),
    }
}

/// Source path without its final extension.
pub fn source_stem(source_path: &str) -> &str {
    let file_start = source_path.rfind('/').map_or(0, |idx| idx + 1);
    match source_path[file_start..].rfind('.') {
        Some(dot) if dot > 0 => &source_path[..file_start + dot],
        _ => source_path,
    }
}

fn stem_lookup(documents: &[Document]) -> BTreeMap<&str, usize> {
    let mut stems = BTreeMap::new();
    for (idx, doc) in documents.iter().enumerate() {
        stems.entry(source_stem(&doc.source_path)).or_insert(idx);
    }
    stems
}

fn attach_stylesheets(
    documents: &mut [Document],
    stylesheets: &[SourceDoc],
    excluded: &[String],
    reporter: &dyn Reporter,
) {
    let excluded_stems: BTreeSet<&str> = excluded.iter().map(|path| source_stem(path)).collect();
    let matches: Vec<(usize, &SourceDoc)> = {
        let stems = stem_lookup(documents);
        stylesheets
            .iter()
            .filter_map(|sheet| {
                let stem = sheet
                    .source_path
                    .strip_suffix(".css")
                    .unwrap_or(&sheet.source_path);
                match stems.get(stem) {
                    Some(idx) => Some((*idx, sheet)),
                    None if excluded_stems.contains(stem) => {
                        reporter.info(
                            Some(&sheet.source_path),
                            "stylesheet of an excluded document, suppressed",
                        );
                        None
                    }
                    None => {
                        reporter.warning(
                            Some(&sheet.source_path),
                            "orphaned stylesheet, no matching document",
                        );
                        None
                    }
                }
            })
            .collect()
    };
    for (idx, sheet) in matches {
        let doc = &mut documents[idx];
        doc.stylesheet = Some(Stylesheet {
            source_path: sheet.source_path.clone(),
            output_path: format!("{POSTS_DIR}/{}.css", doc.seq),
            contents: sheet.raw.clone(),
        });
    }
}

fn attach_entries(
    documents: &mut [Document],
    entries: &[SourceDoc],
    excluded: &[String],
    reporter: &dyn Reporter,
) {
    let excluded_stems: BTreeSet<&str> = excluded.iter().map(|path| source_stem(path)).collect();
    let matches: Vec<(usize, &SourceDoc)> = {
        let stems = stem_lookup(documents);
        entries
            .iter()
            .filter_map(|entry| {
                let stem = entry
                    .source_path
                    .strip_suffix(".entry.html")
                    .unwrap_or(&entry.source_path);
                match stems.get(stem) {
                    Some(idx) => Some((*idx, entry)),
                    None if excluded_stems.contains(stem) => None,
                    None => {
                        reporter.warning(
                            Some(&entry.source_path),
                            "orphaned index entry, no matching document",
                        );
                        None
                    }
                }
            })
            .collect()
    };
    for (idx, entry) in matches {
        let template = Template::parse(
            entry.source_path.clone(),
            &entry.raw,
            TemplateRole::IndexEntry.recognized_blocks(),
        );
        template.report_unrecognized(reporter);
        documents[idx].custom_entry = Some(template);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DiagnosticLevel;
    use crate::report::DiagnosticCollector;

    fn settings(items_per_page: usize) -> IndexSettings {
        IndexSettings {
            items_per_page,
            top_tags: 3,
            top_authors: 3,
            summary_chars: 200,
            allow_future: false,
            today: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            body: BodySettings::default(),
        }
    }

    fn article(path: &str, title: &str, date: &str, tags: &str) -> SourceDoc {
        SourceDoc::new(
            path,
            format!(
                "title: {title}\ndate: {date}\ntags: {tags}\nauthor: Ann\n\nHello from {title}.\n"
            ),
        )
    }

    fn many(count: u32) -> SiteSources {
        let documents = (1..=count)
            .map(|day| {
                let month = 1 + (day - 1) / 28;
                let dom = 1 + (day - 1) % 28;
                article(
                    &format!("articles/post{day:02}.md"),
                    &format!("Post {day}"),
                    &format!("2024-{month:02}-{dom:02}"),
                    "rust",
                )
            })
            .collect();
        SiteSources {
            documents,
            ..SiteSources::default()
        }
    }

    #[test]
    fn page_count_is_ceiling() {
        assert_eq!(page_count(10, 0), 0);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(10, 11), 2);
        for per_page in 1..12 {
            for n in 0..40 {
                let expected = (n + per_page - 1) / per_page;
                assert_eq!(page_count(per_page, n), expected);
            }
        }
    }

    #[test]
    fn twenty_five_documents_make_three_chronological_pages() {
        let reporter = DiagnosticCollector::new();
        let index = SiteIndex::build(&many(25), &settings(10), &reporter);
        assert_eq!(
            index.by_date.pages,
            vec!["index/by_date/0.html", "index/by_date/1.html", "index/by_date/2.html"]
        );
        let seqs = |page: usize| -> Vec<u32> {
            index
                .by_date
                .page_docs(page, 10)
                .iter()
                .map(|idx| index.documents[*idx].seq)
                .collect()
        };
        let first = seqs(0);
        assert_eq!(first, (16..=25).rev().collect::<Vec<_>>());
        let last = seqs(2);
        assert_eq!(last, (1..=5).rev().collect::<Vec<_>>());
        assert_eq!(index.documents[0].title, "Post 25");
        assert_eq!(index.documents[0].output_path, "posts/25.html");
        assert!(matches!(
            index.by_date.page_path(3),
            Err(BuildError::OutOfPageNames { page: 3, .. })
        ));
    }

    #[test]
    fn sequence_numbers_strictly_decrease_with_age() {
        let reporter = DiagnosticCollector::new();
        let index = SiteIndex::build(&many(12), &settings(5), &reporter);
        for pair in index.documents.windows(2) {
            assert!(pair[0].seq > pair[1].seq);
            assert!(pair[0].date >= pair[1].date);
        }
    }

    #[test]
    fn tags_group_case_insensitively() {
        let sources = SiteSources {
            documents: vec![
                article("a.md", "A", "2024-01-01", "Go"),
                article("b.md", "B", "2024-01-02", "go"),
                article("c.md", "C", "2024-01-03", ""),
            ],
            ..SiteSources::default()
        };
        let reporter = DiagnosticCollector::new();
        let index = SiteIndex::build(&sources, &settings(10), &reporter);
        assert_eq!(index.by_tag.len(), 2);
        let go = index.by_tag.get("GO").expect("go tag");
        assert_eq!(go.docs.len(), 2);
        assert_eq!(go.name, "go");
        assert_eq!(go.pages, vec!["index/by_tag/t1_0.html"]);
        let untagged = index.by_tag.get(NO_TAG).expect("sentinel tag");
        assert_eq!(untagged.prefix, "t0");
    }

    #[test]
    fn repeated_tag_in_one_document_counts_once() {
        let sources = SiteSources {
            documents: vec![article("a.md", "A", "2024-01-01", "Go, go")],
            ..SiteSources::default()
        };
        let reporter = DiagnosticCollector::new();
        let index = SiteIndex::build(&sources, &settings(10), &reporter);
        assert_eq!(index.by_tag.len(), 1);
        let go = index.by_tag.get("go").expect("go tag");
        assert_eq!(go.docs.len(), 1);
        assert_eq!(index.documents[0].tags.len(), 1);
    }

    #[test]
    fn top_n_never_drops_a_larger_category() {
        let mut index = CategoryIndex::new(Axis::Tag);
        let counts = [("a", 1), ("b", 5), ("c", 3), ("d", 3), ("e", 2), ("f", 7)];
        let mut doc = 0;
        for (name, count) in counts {
            for _ in 0..count {
                index.add(name, doc);
                doc += 1;
            }
        }
        for n in 0..8 {
            let top = index.top_n(n);
            assert_eq!(top.len(), n.min(counts.len()));
            let min_selected = top.iter().map(|entry| entry.docs.len()).min().unwrap_or(usize::MAX);
            let max_excluded = index
                .entries()
                .filter(|entry| !top.iter().any(|sel| sel.key == entry.key))
                .map(|entry| entry.docs.len())
                .max()
                .unwrap_or(0);
            if !top.is_empty() {
                assert!(min_selected >= max_excluded);
            }
        }
        assert_eq!(index.top_n(1)[0].key, "f");
    }

    #[test]
    fn invalid_and_future_documents_are_excluded() {
        let sources = SiteSources {
            documents: vec![
                article("articles/ok.md", "Ok", "2024-01-01", "x"),
                SourceDoc::new("articles/untitled.md", "date: 2024-01-01\n\nbody\n"),
                article("articles/later.md", "Later", "2030-01-01", "x"),
                SourceDoc::new("articles/draft.md", "title: D\npublished: no\n\nbody\n"),
            ],
            stylesheets: vec![
                SourceDoc::new("articles/later.css", "p {}"),
                SourceDoc::new("articles/ok.css", "h1 {}"),
                SourceDoc::new("articles/ghost.css", "a {}"),
            ],
            entries: vec![SourceDoc::new(
                "articles/ok.entry.html",
                "<div data-block=\"entry-title\"></div>",
            )],
        };
        let reporter = DiagnosticCollector::new();
        let index = SiteIndex::build(&sources, &settings(10), &reporter);
        assert_eq!(index.documents.len(), 1);
        assert_eq!(index.excluded.len(), 3);
        assert!(reporter.has_message(DiagnosticLevel::Error, "missing title"));
        assert!(reporter.has_message(DiagnosticLevel::Warning, "in the future"));
        assert!(reporter.has_message(DiagnosticLevel::Warning, "orphaned stylesheet"));
        assert_eq!(reporter.count(DiagnosticLevel::Warning), 2);
        let doc = &index.documents[0];
        assert_eq!(doc.stylesheet.as_ref().map(|s| s.output_path.as_str()), Some("posts/1.css"));
        assert!(doc.custom_entry.is_some());
        assert_eq!(doc.summary.as_deref(), Some("Hello from Ok."));
    }

    #[test]
    fn future_documents_allowed_when_configured() {
        let sources = SiteSources {
            documents: vec![article("later.md", "Later", "2030-01-01", "x")],
            ..SiteSources::default()
        };
        let mut cfg = settings(10);
        cfg.allow_future = true;
        let reporter = DiagnosticCollector::new();
        let index = SiteIndex::build(&sources, &cfg, &reporter);
        assert_eq!(index.documents.len(), 1);
    }

    #[test]
    fn stems_and_extensions() {
        assert_eq!(source_stem("articles/a.b/intro.md"), "articles/a.b/intro");
        assert_eq!(source_stem("articles/.hidden"), "articles/.hidden");
        assert_eq!(output_extension("x/intro.markdown"), "html");
        assert_eq!(output_extension("x/page.HTML"), "html");
        assert_eq!(output_extension("x/page.xhtml"), "xhtml");
    }
}
