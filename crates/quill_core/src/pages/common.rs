use crate::build::BuildContext;
use crate::error::BuildError;
use crate::html::escape_html;
use crate::index::{Axis, LANDING_PAGE};
use crate::model::Document;
use crate::nav_tree::TreeFocus;
use crate::paths::link;
use crate::render::{BlockTable, OrderedRenderer};
use crate::templates::{TemplateRole, block};

/// One breadcrumb step; the last one is the current page and has no target.
pub(crate) struct Crumb {
    pub label: String,
    pub target: Option<String>,
}

impl Crumb {
    pub fn link(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: Some(target.into()),
        }
    }

    pub fn here(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: None,
        }
    }
}

pub(crate) fn home_crumb() -> Crumb {
    Crumb::link("Home", LANDING_PAGE)
}

pub(crate) fn breadcrumb_lines(output_path: &str, crumbs: &[Crumb], indent: &str) -> Vec<String> {
    let mut out = Vec::with_capacity(crumbs.len() + 2);
    out.push("<ol class=\"breadcrumb\">".to_string());
    for crumb in crumbs {
        let label = escape_html(&crumb.label);
        match &crumb.target {
            Some(target) => out.push(format!(
                "{indent}<li><a href=\"{}\">{label}</a></li>",
                link(output_path, target)
            )),
            None => out.push(format!("{indent}<li class=\"current\">{label}</li>")),
        }
    }
    out.push("</ol>".to_string());
    out
}

/// Breadcrumb, page name and both navigation panes.
pub(crate) fn add_frame_blocks<'a>(
    table: &mut BlockTable<'a>,
    ctx: &'a BuildContext,
    output_path: &str,
    crumbs: Vec<Crumb>,
    page_name: String,
    focus: TreeFocus<'a>,
) {
    let path = output_path.to_string();
    table.insert(block::BREADCRUMB, move |out| {
        out.extend(breadcrumb_lines(&path, &crumbs, ctx.indent()));
        Ok(())
    });
    table.insert(block::PAGE_NAME, move |out| {
        out.push(escape_html(&page_name));
        Ok(())
    });
    let path = output_path.to_string();
    table.insert(block::INDEX_PANE_DATES, move |out| {
        out.extend(ctx.date_tree.render(focus, &path));
        Ok(())
    });
    let path = output_path.to_string();
    table.insert(block::INDEX_PANE_TAGS, move |out| {
        out.extend(ctx.tag_tree.render(focus, &path));
        Ok(())
    });
}

/// Links to the first index page of each named category.
pub(crate) fn category_links<'n>(
    ctx: &BuildContext,
    axis: Axis,
    names: impl Iterator<Item = &'n str>,
    output_path: &str,
) -> String {
    let Some(index) = ctx.index.category(axis) else {
        return String::new();
    };
    names
        .map(|name| {
            let label = escape_html(name);
            match index.get(name).and_then(|entry| entry.first_page()) {
                Some(page) => format!("<a href=\"{}\">{label}</a>", link(output_path, page)),
                None => label,
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn time_tag(doc: &Document) -> String {
    format!("<time datetime=\"{0}\">{0}</time>", doc.date)
}

/// Renders the index entry of document `doc_idx` for the page at
/// `output_path`, using the document's own entry template when it has one.
pub fn entry_lines(
    ctx: &BuildContext,
    renderer: &OrderedRenderer<'_>,
    doc_idx: usize,
    output_path: &str,
) -> Result<Vec<String>, BuildError> {
    let Some(doc) = ctx.index.document(doc_idx) else {
        return Ok(Vec::new());
    };
    let template = doc
        .custom_entry
        .as_ref()
        .unwrap_or_else(|| ctx.templates.get(TemplateRole::IndexEntry));
    let blocks = BlockTable::new()
        .with(block::ENTRY_TITLE, |out| {
            out.push(format!(
                "<a href=\"{}\">{}</a>",
                link(output_path, &doc.output_path),
                escape_html(&doc.title)
            ));
            Ok(())
        })
        .with(block::ENTRY_DATE, |out| {
            out.push(time_tag(doc));
            Ok(())
        })
        .with(block::ENTRY_AUTHORS, |out| {
            if !doc.authors.is_empty() {
                out.push(category_links(
                    ctx,
                    Axis::Author,
                    doc.authors.display_names(),
                    output_path,
                ));
            }
            Ok(())
        })
        .with(block::ENTRY_TAGS, |out| {
            out.push(category_links(ctx, Axis::Tag, doc.tags.display_names(), output_path));
            Ok(())
        })
        .with(block::ENTRY_SUMMARY, |out| {
            if let Some(summary) = &doc.summary {
                out.push(escape_html(summary));
            }
            Ok(())
        });
    renderer.render(template, output_path, &blocks)
}

/// Previous/next links plus one link per page.
pub(crate) fn pager_lines(
    output_path: &str,
    pages: &[String],
    current: usize,
    indent: &str,
) -> Vec<String> {
    if pages.len() < 2 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(pages.len() + 4);
    out.push("<nav class=\"pager\">".to_string());
    if current > 0 {
        out.push(format!(
            "{indent}<a class=\"prev\" href=\"{}\">&laquo; Newer</a>",
            link(output_path, &pages[current - 1])
        ));
    }
    for (idx, page) in pages.iter().enumerate() {
        if idx == current {
            out.push(format!("{indent}<span class=\"current\">{}</span>", idx + 1));
        } else {
            out.push(format!(
                "{indent}<a href=\"{}\">{}</a>",
                link(output_path, page),
                idx + 1
            ));
        }
    }
    if current + 1 < pages.len() {
        out.push(format!(
            "{indent}<a class=\"next\" href=\"{}\">Older &raquo;</a>",
            link(output_path, &pages[current + 1])
        ));
    }
    out.push("</nav>".to_string());
    out
}
