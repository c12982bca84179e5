//! Content tree walker for quill articles

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quill_core::model::{SiteSources, SourceDoc};
use walkdir::WalkDir;

const ENTRY_SUFFIX: &str = ".entry.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Document,
    Stylesheet,
    Entry,
}

/// Classifies a file by name. Names starting with `_` are never content.
pub fn classify(file_name: &str) -> Option<FileKind> {
    if file_name.starts_with('_') {
        return None;
    }
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(ENTRY_SUFFIX) {
        return Some(FileKind::Entry);
    }
    let ext = lower.rsplit_once('.').map(|(_, ext)| ext)?;
    match ext {
        "md" | "markdown" | "html" => Some(FileKind::Document),
        "css" => Some(FileKind::Stylesheet),
        _ => None,
    }
}

/// Reads every document, stylesheet and custom entry under `articles_dir`.
/// Source paths are relative to the articles directory and use `/`.
pub fn walk_content(root: &Path, articles_dir: &Path) -> Result<SiteSources> {
    let articles_dir = resolve(root, articles_dir);
    if !articles_dir.is_dir() {
        anyhow::bail!("articles directory {} does not exist", articles_dir.display());
    }

    let mut sources = SiteSources::default();
    for entry in WalkDir::new(&articles_dir)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(kind) = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(classify)
        else {
            continue;
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let doc = SourceDoc::new(to_relative_path(&articles_dir, path), raw);
        match kind {
            FileKind::Document => sources.documents.push(doc),
            FileKind::Stylesheet => sources.stylesheets.push(doc),
            FileKind::Entry => sources.entries.push(doc),
        }
    }
    Ok(sources)
}

pub fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn to_relative_path(base: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn classifies_by_name() {
        assert_eq!(classify("post.md"), Some(FileKind::Document));
        assert_eq!(classify("post.Markdown"), Some(FileKind::Document));
        assert_eq!(classify("page.html"), Some(FileKind::Document));
        assert_eq!(classify("post.entry.html"), Some(FileKind::Entry));
        assert_eq!(classify("post.css"), Some(FileKind::Stylesheet));
        assert_eq!(classify("_draft.md"), None);
        assert_eq!(classify("photo.png"), None);
        assert_eq!(classify("README"), None);
    }

    #[test]
    fn walk_sorts_files_into_sources() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let articles = root.join("articles");

        write_file(&articles.join("first.md"), "title: First\n\nBody");
        write_file(&articles.join("first.css"), "h1 { color: red; }");
        write_file(&articles.join("2024/second.html"), "title: Second\n\n<p>Body</p>");
        write_file(&articles.join("2024/second.entry.html"), "<div></div>");
        write_file(&articles.join("_ignored.md"), "title: Ignore\n\nBody");
        write_file(&articles.join("logo.png"), "png");

        let sources = walk_content(root, Path::new("articles")).expect("walk should succeed");
        let paths = |docs: &[SourceDoc]| -> Vec<String> {
            docs.iter().map(|doc| doc.source_path.clone()).collect()
        };
        assert_eq!(paths(&sources.documents), vec!["2024/second.html", "first.md"]);
        assert_eq!(paths(&sources.stylesheets), vec!["first.css"]);
        assert_eq!(paths(&sources.entries), vec!["2024/second.entry.html"]);
    }

    #[cfg(unix)]
    #[test]
    fn broken_link_is_skipped_without_failing_the_walk() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let articles = root.join("articles");
        write_file(&articles.join("kept.md"), "title: Kept\n\nBody");
        std::os::unix::fs::symlink(root.join("gone.md"), articles.join("dangling.md")).unwrap();

        let sources = walk_content(root, Path::new("articles")).expect("walk should succeed");
        assert_eq!(sources.documents.len(), 1);
        assert_eq!(sources.documents[0].source_path, "kept.md");
    }

    #[test]
    fn missing_articles_dir_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = walk_content(temp.path(), Path::new("nope")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
