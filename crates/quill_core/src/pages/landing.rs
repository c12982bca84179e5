use std::collections::BTreeSet;

use crate::build::BuildContext;
use crate::config::FeaturedMatch;
use crate::error::BuildError;
use crate::html::escape_html;
use crate::index::{CategoryIndex, LANDING_PAGE, SiteIndex};
use crate::model::Document;
use crate::nav_tree::TreeFocus;
use crate::output::{SiteWriter, join_lines};
use crate::paths::link;
use crate::render::{BlockTable, OrderedRenderer};
use crate::templates::{TemplateRole, block};

use super::common::{Crumb, add_frame_blocks, entry_lines};

/// Featured documents, newest first, at most `limit`.
pub fn featured(index: &SiteIndex, limit: usize) -> Vec<usize> {
    index
        .documents
        .iter()
        .enumerate()
        .filter(|(_, doc)| doc.featured)
        .map(|(idx, _)| idx)
        .take(limit)
        .collect()
}

/// The newest `limit` documents that are not in `featured`.
pub fn newest_excluding_featured(
    index: &SiteIndex,
    featured: &[usize],
    matching: FeaturedMatch,
    limit: usize,
) -> Vec<usize> {
    let key = |doc: &Document| match matching {
        FeaturedMatch::SourcePath => doc.source_path.clone(),
        FeaturedMatch::OutputPath => doc.output_path.clone(),
    };
    let shown: BTreeSet<String> = featured
        .iter()
        .filter_map(|idx| index.document(*idx))
        .map(key)
        .collect();
    index
        .documents
        .iter()
        .enumerate()
        .filter(|(_, doc)| !shown.contains(&key(*doc)))
        .map(|(idx, _)| idx)
        .take(limit)
        .collect()
}

pub fn write_landing(
    ctx: &BuildContext,
    renderer: &OrderedRenderer<'_>,
    writer: &mut dyn SiteWriter,
) -> Result<(), BuildError> {
    let template = ctx.templates.get(TemplateRole::Landing);
    let landing = &ctx.config.landing;
    let featured_docs = featured(&ctx.index, landing.featured);
    let newest = newest_excluding_featured(
        &ctx.index,
        &featured_docs,
        landing.featured_match,
        landing.newest,
    );

    let mut blocks = BlockTable::new();
    add_frame_blocks(
        &mut blocks,
        ctx,
        LANDING_PAGE,
        vec![Crumb::here("Home")],
        ctx.config.site.title.clone(),
        TreeFocus::None,
    );
    blocks.insert(block::NEWEST_POSTS, |out| {
        for idx in &newest {
            out.extend(entry_lines(ctx, renderer, *idx, LANDING_PAGE)?);
        }
        Ok(())
    });
    blocks.insert(block::FEATURED_POSTS, |out| {
        for idx in &featured_docs {
            out.extend(entry_lines(ctx, renderer, *idx, LANDING_PAGE)?);
        }
        Ok(())
    });
    blocks.insert(block::TOP_TAGS, |out| {
        out.extend(ranking_lines(&ctx.index.by_tag, &ctx.index.top_tags, ctx.indent()));
        Ok(())
    });
    blocks.insert(block::TOP_AUTHORS, |out| {
        out.extend(ranking_lines(
            &ctx.index.by_author,
            &ctx.index.top_authors,
            ctx.indent(),
        ));
        Ok(())
    });

    let lines = renderer.render(template, LANDING_PAGE, &blocks)?;
    writer.write(LANDING_PAGE, &join_lines(&lines))
}

fn ranking_lines(index: &CategoryIndex, keys: &[String], indent: &str) -> Vec<String> {
    if keys.is_empty() {
        return Vec::new();
    }
    let mut out = vec![format!(
        "<ol class=\"top-{}\">",
        index.axis().label().to_lowercase()
    )];
    for entry in keys.iter().filter_map(|key| index.get(key)) {
        let name = escape_html(&entry.name);
        let count = entry.docs.len();
        match entry.first_page() {
            Some(page) => out.push(format!(
                "{indent}<li><a href=\"{}\">{name}</a> <span class=\"count\">{count}</span></li>",
                link(LANDING_PAGE, page)
            )),
            None => out.push(format!(
                "{indent}<li>{name} <span class=\"count\">{count}</span></li>"
            )),
        }
    }
    out.push("</ol>".to_string());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodySettings;
    use crate::index::IndexSettings;
    use crate::model::{SiteSources, SourceDoc};
    use crate::report::DiagnosticCollector;
    use chrono::NaiveDate;

    fn index() -> SiteIndex {
        let documents = (1..=6)
            .map(|day| {
                let featured = if day % 2 == 0 { "yes" } else { "no" };
                SourceDoc::new(
                    format!("articles/p{day}.md"),
                    format!("title: P{day}\ndate: 2024-01-0{day}\nfeatured: {featured}\n\nx\n"),
                )
            })
            .collect();
        let settings = IndexSettings {
            items_per_page: 10,
            top_tags: 5,
            top_authors: 5,
            summary_chars: 50,
            allow_future: false,
            today: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            body: BodySettings::default(),
        };
        SiteIndex::build(
            &SiteSources {
                documents,
                ..SiteSources::default()
            },
            &settings,
            &DiagnosticCollector::new(),
        )
    }

    #[test]
    fn newest_list_skips_featured_documents() {
        let index = index();
        let featured_docs = featured(&index, 2);
        let titles = |ids: &[usize]| -> Vec<String> {
            ids.iter().map(|idx| index.documents[*idx].title.clone()).collect()
        };
        assert_eq!(titles(&featured_docs), vec!["P6", "P4"]);
        for matching in [FeaturedMatch::SourcePath, FeaturedMatch::OutputPath] {
            let newest = newest_excluding_featured(&index, &featured_docs, matching, 3);
            assert_eq!(titles(&newest), vec!["P5", "P3", "P2"]);
        }
    }

    #[test]
    fn ranking_links_from_site_root() {
        let mut tags = CategoryIndex::new(crate::index::Axis::Tag);
        tags.add("Rust", 0);
        tags.add("rust", 1);
        tags.paginate(10);
        let lines = ranking_lines(&tags, &["rust".to_string()], "  ");
        assert_eq!(
            lines[1],
            "  <li><a href=\"index/by_tag/t0_0.html\">Rust</a> <span class=\"count\">2</span></li>"
        );
    }
}
