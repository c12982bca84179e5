use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quill_core::build::{BuildSummary, build_site, scan_site};
use quill_core::model::{Diagnostic, DiagnosticLevel};
use quill_core::output::FsSiteWriter;
use quill_core::report::{DiagnosticCollector, Reporter};
use quill_core::templates::DirTemplateSource;

use crate::config_loader::{load_appendices, load_config_for_build, site_today};
use crate::walk::{resolve, walk_content};

#[derive(Debug, Clone)]
pub struct ScanReport {
    pub documents: usize,
    pub excluded: usize,
    pub years: usize,
    pub tags: usize,
    pub authors: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl ScanReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.level == DiagnosticLevel::Error)
    }
}

pub fn run_scan(root: &Path, articles_dir: Option<&Path>) -> Result<ScanReport> {
    let config = load_config_for_build(root)?;
    let articles_dir = articles_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.paths.articles));
    let sources = walk_content(root, &articles_dir)?;
    let collector = DiagnosticCollector::new();
    let index = scan_site(&config, &sources, site_today(&config), &collector)?;
    Ok(ScanReport {
        documents: index.documents.len(),
        excluded: index.excluded.len(),
        years: index.by_year.len(),
        tags: index.by_tag.len(),
        authors: index.by_author.len(),
        diagnostics: collector.into_diagnostics(),
    })
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub root: PathBuf,
    pub out: PathBuf,
    pub allow_future: bool,
    pub clean: bool,
}

pub fn run_build(options: &BuildOptions, reporter: &dyn Reporter) -> Result<BuildSummary> {
    let root = &options.root;
    let mut config = load_config_for_build(root)?;
    if options.allow_future {
        config.publish.allow_future = true;
    }
    let sources = walk_content(root, Path::new(&config.paths.articles))?;
    let templates = DirTemplateSource::new(resolve(root, Path::new(&config.paths.templates)));
    let appendices = load_appendices(root, &config)?;

    let out_dir = resolve(root, &options.out);
    if options.clean && out_dir.exists() {
        fs::remove_dir_all(&out_dir)
            .with_context(|| format!("failed to remove {}", out_dir.display()))?;
    }
    tracing::info!(out = %out_dir.display(), documents = sources.documents.len(), "building site");
    let mut writer = FsSiteWriter::new(&out_dir);
    let summary = build_site(
        &config,
        &sources,
        &templates,
        &appendices,
        site_today(&config),
        &mut writer,
        reporter,
    )
    .with_context(|| format!("build into {} failed", out_dir.display()))?;
    Ok(summary)
}

/// One `label: path: message` line per diagnostic.
pub fn format_diagnostic(diag: &Diagnostic) -> String {
    let label = match diag.level {
        DiagnosticLevel::Info => "info",
        DiagnosticLevel::Warning => "warning",
        DiagnosticLevel::Error => "error",
    };
    match &diag.source_path {
        Some(path) => format!("{label}: {path}: {}", diag.message),
        None => format!("{label}: {}", diag.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_format_with_and_without_path() {
        let with_path = Diagnostic::warning(Some("a.css"), "orphaned stylesheet");
        assert_eq!(format_diagnostic(&with_path), "warning: a.css: orphaned stylesheet");
        let bare = Diagnostic::error(None, "no documents");
        assert_eq!(format_diagnostic(&bare), "error: no documents");
    }
}
