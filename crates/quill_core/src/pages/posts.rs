use crate::build::BuildContext;
use crate::error::BuildError;
use crate::html::escape_html;
use crate::index::Axis;
use crate::model::Document;
use crate::nav_tree::TreeFocus;
use crate::output::{SiteWriter, join_lines};
use crate::paths::link;
use crate::render::{BlockTable, OrderedRenderer};
use crate::templates::{TemplateRole, block};

use super::common::{Crumb, add_frame_blocks, category_links, home_crumb, time_tag};

/// Writes one page per document, plus its custom stylesheet if it has one.
/// Returns the number of pages written.
pub fn write_posts(
    ctx: &BuildContext,
    renderer: &OrderedRenderer<'_>,
    writer: &mut dyn SiteWriter,
) -> Result<usize, BuildError> {
    let template = ctx.templates.get(TemplateRole::Post);
    for (idx, doc) in ctx.index.documents.iter().enumerate() {
        let output_path = doc.output_path.as_str();
        let mut blocks = BlockTable::new();
        add_frame_blocks(
            &mut blocks,
            ctx,
            output_path,
            post_crumbs(ctx, doc),
            doc.title.clone(),
            TreeFocus::Document(idx),
        );
        blocks.insert(block::PAGE_NAV, move |out| {
            out.extend(post_nav_lines(ctx, idx, output_path));
            Ok(())
        });
        blocks.insert(block::POST_META, move |out| {
            out.extend(meta_lines(ctx, doc, output_path));
            Ok(())
        });
        blocks.insert(block::POST_CONTENT, move |out| {
            out.extend(doc.body.render(output_path, ctx.indent()));
            Ok(())
        });
        blocks.insert(block::CUSTOM_STYLE, move |out| {
            if let Some(sheet) = &doc.stylesheet {
                out.push(format!(
                    "<link rel=\"stylesheet\" href=\"{}\">",
                    link(output_path, &sheet.output_path)
                ));
            }
            Ok(())
        });

        let lines = renderer.render(template, output_path, &blocks)?;
        writer.write(output_path, &join_lines(&lines))?;
        if let Some(sheet) = &doc.stylesheet {
            writer.write(&sheet.output_path, &sheet.contents)?;
        }
    }
    Ok(ctx.index.documents.len())
}

fn post_crumbs(ctx: &BuildContext, doc: &Document) -> Vec<Crumb> {
    let year = doc.date.year.to_string();
    let mut crumbs = vec![home_crumb()];
    match ctx.index.by_year.get(&year).and_then(|entry| entry.first_page()) {
        Some(page) => crumbs.push(Crumb::link(year, page)),
        None => crumbs.push(Crumb::here(year)),
    }
    crumbs.push(Crumb::here(doc.title.clone()));
    crumbs
}

/// Links to the neighbouring documents in chronological order.
fn post_nav_lines(ctx: &BuildContext, idx: usize, output_path: &str) -> Vec<String> {
    let indent = ctx.indent();
    let newer = idx.checked_sub(1).and_then(|prev| ctx.index.document(prev));
    let older = ctx.index.document(idx + 1);
    if newer.is_none() && older.is_none() {
        return Vec::new();
    }
    let mut out = vec!["<nav class=\"post-nav\">".to_string()];
    if let Some(doc) = newer {
        out.push(format!(
            "{indent}<a class=\"prev\" href=\"{}\">&laquo; {}</a>",
            link(output_path, &doc.output_path),
            escape_html(&doc.title)
        ));
    }
    if let Some(doc) = older {
        out.push(format!(
            "{indent}<a class=\"next\" href=\"{}\">{} &raquo;</a>",
            link(output_path, &doc.output_path),
            escape_html(&doc.title)
        ));
    }
    out.push("</nav>".to_string());
    out
}

fn meta_lines(ctx: &BuildContext, doc: &Document, output_path: &str) -> Vec<String> {
    let indent = ctx.indent();
    let mut out = vec![
        "<div class=\"meta\">".to_string(),
        format!("{indent}{}", time_tag(doc)),
    ];
    if !doc.authors.is_empty() {
        out.push(format!(
            "{indent}<span class=\"authors\">by {}</span>",
            category_links(ctx, Axis::Author, doc.authors.display_names(), output_path)
        ));
    }
    out.push(format!(
        "{indent}<span class=\"tags\">{}</span>",
        category_links(ctx, Axis::Tag, doc.tags.display_names(), output_path)
    ));
    out.push("</div>".to_string());
    out
}
