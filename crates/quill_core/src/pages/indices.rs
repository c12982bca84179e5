//! Paginated category indices.
//!
//! One generic generator walks every axis; what differs per axis (which
//! entries exist, what the side lists show, which tree node a page focuses)
//! lives behind [`ListStrategy`].

use std::collections::BTreeMap;

use crate::build::BuildContext;
use crate::error::BuildError;
use crate::html::escape_html;
use crate::index::{Axis, CategoryEntry, CategoryIndex, SiteIndex, page_count};
use crate::nav_tree::{TreeFocus, month_name};
use crate::output::{SiteWriter, join_lines};
use crate::paths::link;
use crate::render::{BlockTable, OrderedRenderer};
use crate::templates::{TemplateRole, block};

use super::common::{Crumb, add_frame_blocks, entry_lines, home_crumb, pager_lines};

pub trait ListStrategy {
    fn axis(&self) -> Axis;

    /// Every category that gets its own run of pages.
    fn entries<'i>(&self, index: &'i SiteIndex) -> Vec<&'i CategoryEntry>;

    fn focus<'e>(&self, entry: &'e CategoryEntry) -> TreeFocus<'e>;

    fn write_flat_list(&self, ctx: &BuildContext, output_path: &str, out: &mut Vec<String>);

    fn write_hierarchy_list(&self, ctx: &BuildContext, output_path: &str, out: &mut Vec<String>);
}

pub struct DateList;
pub struct YearList;
pub struct TagList;
pub struct AuthorList;

impl ListStrategy for DateList {
    fn axis(&self) -> Axis {
        Axis::Date
    }

    fn entries<'i>(&self, index: &'i SiteIndex) -> Vec<&'i CategoryEntry> {
        vec![&index.by_date]
    }

    fn focus<'e>(&self, _entry: &'e CategoryEntry) -> TreeFocus<'e> {
        TreeFocus::None
    }

    fn write_flat_list(&self, ctx: &BuildContext, output_path: &str, out: &mut Vec<String>) {
        write_years_newest_first(ctx, output_path, out);
    }

    fn write_hierarchy_list(&self, ctx: &BuildContext, output_path: &str, out: &mut Vec<String>) {
        write_year_months(ctx, output_path, out);
    }
}

impl ListStrategy for YearList {
    fn axis(&self) -> Axis {
        Axis::Year
    }

    fn entries<'i>(&self, index: &'i SiteIndex) -> Vec<&'i CategoryEntry> {
        let mut entries: Vec<_> = index.by_year.entries().collect();
        entries.reverse();
        entries
    }

    fn focus<'e>(&self, entry: &'e CategoryEntry) -> TreeFocus<'e> {
        entry
            .key
            .parse::<i32>()
            .map_or(TreeFocus::None, TreeFocus::Year)
    }

    fn write_flat_list(&self, ctx: &BuildContext, output_path: &str, out: &mut Vec<String>) {
        write_years_newest_first(ctx, output_path, out);
    }

    fn write_hierarchy_list(&self, ctx: &BuildContext, output_path: &str, out: &mut Vec<String>) {
        write_year_months(ctx, output_path, out);
    }
}

impl ListStrategy for TagList {
    fn axis(&self) -> Axis {
        Axis::Tag
    }

    fn entries<'i>(&self, index: &'i SiteIndex) -> Vec<&'i CategoryEntry> {
        index.by_tag.entries().collect()
    }

    fn focus<'e>(&self, entry: &'e CategoryEntry) -> TreeFocus<'e> {
        TreeFocus::Tag(&entry.key)
    }

    fn write_flat_list(&self, ctx: &BuildContext, output_path: &str, out: &mut Vec<String>) {
        write_flat(&ctx.index.by_tag, ctx.indent(), output_path, out);
    }

    fn write_hierarchy_list(&self, ctx: &BuildContext, output_path: &str, out: &mut Vec<String>) {
        write_by_initial(&ctx.index.by_tag, ctx.indent(), output_path, out);
    }
}

impl ListStrategy for AuthorList {
    fn axis(&self) -> Axis {
        Axis::Author
    }

    fn entries<'i>(&self, index: &'i SiteIndex) -> Vec<&'i CategoryEntry> {
        index.by_author.entries().collect()
    }

    fn focus<'e>(&self, _entry: &'e CategoryEntry) -> TreeFocus<'e> {
        TreeFocus::None
    }

    fn write_flat_list(&self, ctx: &BuildContext, output_path: &str, out: &mut Vec<String>) {
        write_flat(&ctx.index.by_author, ctx.indent(), output_path, out);
    }

    fn write_hierarchy_list(&self, ctx: &BuildContext, output_path: &str, out: &mut Vec<String>) {
        write_by_initial(&ctx.index.by_author, ctx.indent(), output_path, out);
    }
}

/// Writes every index page of every axis. Returns the number of pages.
pub fn write_index_pages(
    ctx: &BuildContext,
    renderer: &OrderedRenderer<'_>,
    writer: &mut dyn SiteWriter,
) -> Result<usize, BuildError> {
    let strategies: [&dyn ListStrategy; 4] = [&DateList, &YearList, &TagList, &AuthorList];
    let mut written = 0;
    for strategy in strategies {
        written += write_axis(ctx, renderer, writer, strategy)?;
    }
    Ok(written)
}

fn write_axis(
    ctx: &BuildContext,
    renderer: &OrderedRenderer<'_>,
    writer: &mut dyn SiteWriter,
    strategy: &dyn ListStrategy,
) -> Result<usize, BuildError> {
    let template = ctx.templates.get(TemplateRole::Index);
    let per_page = ctx.items_per_page();
    let mut written = 0;
    for entry in strategy.entries(&ctx.index) {
        let pages = page_count(per_page, entry.docs.len());
        for page in 0..pages {
            let output_path = entry.page_path(page)?;
            let mut blocks = BlockTable::new();
            add_frame_blocks(
                &mut blocks,
                ctx,
                output_path,
                index_crumbs(strategy.axis(), entry),
                page_name(entry, page, pages),
                strategy.focus(entry),
            );
            blocks.insert(block::PAGE_NAV, move |out| {
                out.extend(pager_lines(output_path, &entry.pages, page, ctx.indent()));
                Ok(())
            });
            blocks.insert(block::INDEX_ENTRIES, move |out| {
                for doc_idx in entry.page_docs(page, per_page) {
                    out.extend(entry_lines(ctx, renderer, *doc_idx, output_path)?);
                }
                Ok(())
            });
            blocks.insert(block::INDEX_LIST_FLAT, move |out| {
                strategy.write_flat_list(ctx, output_path, out);
                Ok(())
            });
            blocks.insert(block::INDEX_LIST_HIERARCHY, move |out| {
                strategy.write_hierarchy_list(ctx, output_path, out);
                Ok(())
            });

            let lines = renderer.render(template, output_path, &blocks)?;
            writer.write(output_path, &join_lines(&lines))?;
            written += 1;
        }
    }
    Ok(written)
}

fn index_crumbs(axis: Axis, entry: &CategoryEntry) -> Vec<Crumb> {
    let mut crumbs = vec![home_crumb()];
    if axis == Axis::Date {
        crumbs.push(Crumb::here(entry.name.clone()));
    } else {
        crumbs.push(Crumb::here(format!("{}: {}", axis.label(), entry.name)));
    }
    crumbs
}

fn page_name(entry: &CategoryEntry, page: usize, pages: usize) -> String {
    let name = match entry.axis {
        Axis::Date => entry.name.clone(),
        axis => format!("{}: {}", axis.label(), entry.name),
    };
    if pages > 1 {
        format!("{name} (page {} of {pages})", page + 1)
    } else {
        name
    }
}

fn write_flat(index: &CategoryIndex, indent: &str, output_path: &str, out: &mut Vec<String>) {
    out.push(format!(
        "<ul class=\"index-list {}\">",
        index.axis().label().to_lowercase()
    ));
    for entry in index.entries() {
        out.push(format!("{indent}{}", entry_item(entry, output_path)));
    }
    out.push("</ul>".to_string());
}

fn write_by_initial(index: &CategoryIndex, indent: &str, output_path: &str, out: &mut Vec<String>) {
    let mut groups: BTreeMap<String, Vec<&CategoryEntry>> = BTreeMap::new();
    for entry in index.entries() {
        let initial = entry
            .key
            .chars()
            .next()
            .map_or_else(String::new, |ch| ch.to_uppercase().collect());
        groups.entry(initial).or_default().push(entry);
    }
    out.push("<ul class=\"index-hierarchy\">".to_string());
    for (initial, entries) in groups {
        out.push(format!("{indent}<li>{}", escape_html(&initial)));
        out.push(format!("{indent}{indent}<ul>"));
        for entry in entries {
            out.push(format!(
                "{indent}{indent}{indent}{}",
                entry_item(entry, output_path)
            ));
        }
        out.push(format!("{indent}{indent}</ul>"));
        out.push(format!("{indent}</li>"));
    }
    out.push("</ul>".to_string());
}

fn entry_item(entry: &CategoryEntry, output_path: &str) -> String {
    let name = escape_html(&entry.name);
    match entry.first_page() {
        Some(page) => format!(
            "<li><a href=\"{}\">{name}</a> ({})</li>",
            link(output_path, page),
            entry.docs.len()
        ),
        None => format!("<li>{name} ({})</li>", entry.docs.len()),
    }
}

fn write_years_newest_first(ctx: &BuildContext, output_path: &str, out: &mut Vec<String>) {
    let indent = ctx.indent();
    out.push("<ul class=\"index-list year\">".to_string());
    for entry in ctx.index.by_year.entries().collect::<Vec<_>>().into_iter().rev() {
        out.push(format!("{indent}{}", entry_item(entry, output_path)));
    }
    out.push("</ul>".to_string());
}

fn write_year_months(ctx: &BuildContext, output_path: &str, out: &mut Vec<String>) {
    let indent = ctx.indent();
    out.push("<ul class=\"index-hierarchy\">".to_string());
    for entry in ctx.index.by_year.entries().collect::<Vec<_>>().into_iter().rev() {
        let mut months: BTreeMap<u32, usize> = BTreeMap::new();
        for doc in entry.docs.iter().filter_map(|idx| ctx.index.document(*idx)) {
            *months.entry(doc.date.month).or_default() += 1;
        }
        let head = entry_item(entry, output_path);
        // reopen the item so the month list nests inside it
        out.push(format!("{indent}{}", head.trim_end_matches("</li>")));
        out.push(format!("{indent}{indent}<ul>"));
        for (month, count) in months.into_iter().rev() {
            out.push(format!(
                "{indent}{indent}{indent}<li>{} ({count})</li>",
                month_name(month)
            ));
        }
        out.push(format!("{indent}{indent}</ul>"));
        out.push(format!("{indent}</li>"));
    }
    out.push("</ul>".to_string());
}
