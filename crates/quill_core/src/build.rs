//! Phase driver.

use chrono::NaiveDate;

use crate::config::SiteConfig;
use crate::error::BuildError;
use crate::feeds::{JsonAppendix, write_json_index, write_rss};
use crate::index::{IndexSettings, SiteIndex};
use crate::model::SiteSources;
use crate::nav_tree::{DateTree, TagTree};
use crate::output::SiteWriter;
use crate::pages::{write_index_pages, write_landing, write_posts};
use crate::render::OrderedRenderer;
use crate::report::{Phase, Reporter};
use crate::templates::{TemplateSet, TemplateSource};

/// Shared, read-only state for every generator.
pub struct BuildContext {
    pub config: SiteConfig,
    pub index: SiteIndex,
    pub templates: TemplateSet,
    pub date_tree: DateTree,
    pub tag_tree: TagTree,
    /// Day used as "now" for feed timestamps.
    pub today: NaiveDate,
}

impl BuildContext {
    pub fn new(
        config: SiteConfig,
        index: SiteIndex,
        templates: TemplateSet,
        today: NaiveDate,
    ) -> Self {
        let date_tree = DateTree::build(&index, &config.render.indent);
        let tag_tree = TagTree::build(&index, &config.render.indent);
        Self {
            config,
            index,
            templates,
            date_tree,
            tag_tree,
            today,
        }
    }

    pub fn indent(&self) -> &str {
        &self.config.render.indent
    }

    pub fn items_per_page(&self) -> usize {
        self.config.index.items_per_page
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub documents: usize,
    pub excluded: usize,
    pub posts: usize,
    pub index_pages: usize,
    pub feeds: usize,
}

impl BuildSummary {
    pub fn files(&self) -> usize {
        self.posts + self.index_pages + 1 + self.feeds
    }
}

/// Indexes `sources` without writing anything.
pub fn scan_site(
    config: &SiteConfig,
    sources: &SiteSources,
    today: NaiveDate,
    reporter: &dyn Reporter,
) -> Result<SiteIndex, BuildError> {
    let settings = IndexSettings::from_config(config, today)?;
    Ok(SiteIndex::build(sources, &settings, reporter))
}

/// Runs every phase in order. The first fatal error stops the build; files
/// written by earlier phases stay where they are.
pub fn build_site(
    config: &SiteConfig,
    sources: &SiteSources,
    templates: &dyn TemplateSource,
    appendices: &[JsonAppendix],
    today: NaiveDate,
    writer: &mut dyn SiteWriter,
    reporter: &dyn Reporter,
) -> Result<BuildSummary, BuildError> {
    let index = scan_site(config, sources, today, reporter)?;

    reporter.progress(Phase::Templates, "loading templates");
    let templates = TemplateSet::load(templates)?;
    templates.report_unrecognized(reporter);

    let ctx = BuildContext::new(config.clone(), index, templates, today);
    let renderer = OrderedRenderer::new(ctx.indent(), reporter);
    let mut summary = BuildSummary {
        documents: ctx.index.documents.len(),
        excluded: ctx.index.excluded.len(),
        ..BuildSummary::default()
    };

    reporter.progress(Phase::Posts, &format!("{} posts", summary.documents));
    summary.posts = write_posts(&ctx, &renderer, writer)?;

    reporter.progress(Phase::Indices, "category indices");
    summary.index_pages = write_index_pages(&ctx, &renderer, writer)?;

    reporter.progress(Phase::Landing, "landing page");
    write_landing(&ctx, &renderer, writer)?;

    if ctx.config.rss_enabled().is_some() || ctx.config.json_index_enabled().is_some() {
        reporter.progress(Phase::Feeds, "feeds");
    }
    if let Some(rss) = ctx.config.rss_enabled() {
        write_rss(&ctx, rss, writer)?;
        summary.feeds += 1;
    }
    if let Some(json) = ctx.config.json_index_enabled() {
        write_json_index(&ctx, json, appendices, writer)?;
        summary.feeds += 1;
    }

    reporter.progress(
        Phase::Feeds,
        &format!("done, {} files written", summary.files()),
    );
    Ok(summary)
}
