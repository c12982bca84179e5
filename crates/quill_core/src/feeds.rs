use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::build::BuildContext;
use crate::config::{JsonIndexConfig, RssConfig};
use crate::error::BuildError;
use crate::html::escape_xml;
use crate::index::CategoryIndex;
use crate::model::Document;
use crate::output::SiteWriter;
use crate::paths::link;

/// An extra JSON file whose top-level members are appended to the index.
#[derive(Debug, Clone)]
pub struct JsonAppendix {
    pub source_path: String,
    pub contents: String,
}

pub fn render_rss(ctx: &BuildContext, rss: &RssConfig) -> String {
    let site = &ctx.config.site;
    let site_title = escape_xml(&site.title);
    let site_desc = escape_xml(site.abstract_text.as_deref().unwrap_or(""));
    let site_link = escape_xml(&site.base_url);
    let site_language = escape_xml(&site.language);

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<rss version=\"2.0\">\n");
    out.push_str("<channel>\n");
    out.push_str(&format!("<title>{site_title}</title>\n"));
    out.push_str(&format!("<link>{site_link}</link>\n"));
    out.push_str(&format!("<description>{site_desc}</description>\n"));
    out.push_str(&format!("<language>{site_language}</language>\n"));
    out.push_str(&format!(
        "<lastBuildDate>{}</lastBuildDate>\n",
        rfc2822(ctx.today, site.timezone)
    ));

    for doc in ctx.index.documents.iter().take(rss.max_items) {
        let link = base_url_join(&site.base_url, &doc.output_path);
        out.push_str("<item>\n");
        out.push_str(&format!("<title>{}</title>\n", escape_xml(&doc.title)));
        out.push_str(&format!("<link>{}</link>\n", escape_xml(&link)));
        out.push_str(&format!(
            "<guid isPermaLink=\"false\">urn:uuid:{}</guid>\n",
            doc.uuid
        ));
        out.push_str(&format!(
            "<pubDate>{}</pubDate>\n",
            doc.date
                .to_naive()
                .map(|day| rfc2822(day, site.timezone))
                .unwrap_or_default()
        ));
        out.push_str(&format!(
            "<description>{}</description>\n",
            escape_xml(doc.summary.as_deref().unwrap_or(""))
        ));
        for tag in doc.tags.display_names() {
            out.push_str(&format!("<category>{}</category>\n", escape_xml(tag)));
        }
        out.push_str("</item>\n");
    }

    out.push_str("</channel>\n</rss>\n");
    out
}

pub fn write_rss(
    ctx: &BuildContext,
    rss: &RssConfig,
    writer: &mut dyn SiteWriter,
) -> Result<(), BuildError> {
    writer.write(&rss.path, &render_rss(ctx, rss))
}

fn rfc2822(day: NaiveDate, timezone: Option<Tz>) -> String {
    let midnight = day.and_hms_opt(0, 0, 0).unwrap_or_default();
    match timezone {
        Some(tz) => tz
            .from_local_datetime(&midnight)
            .earliest()
            .map(|value| value.to_rfc2822())
            .unwrap_or_else(|| Utc.from_utc_datetime(&midnight).to_rfc2822()),
        None => Utc.from_utc_datetime(&midnight).to_rfc2822(),
    }
}

fn base_url_join(base_url: &str, href: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = href.trim_start_matches('/');
    format!("{base}/{path}")
}

#[derive(Debug, Serialize)]
struct JsonArticle<'a> {
    title: &'a str,
    date: String,
    authors: Vec<&'a str>,
    tags: Vec<&'a str>,
    headings: Vec<JsonHeading<'a>>,
    href: String,
}

#[derive(Debug, Serialize)]
struct JsonHeading<'a> {
    level: u8,
    number: String,
    text: &'a str,
    anchor: &'a str,
}

#[derive(Debug, Serialize)]
struct JsonCategory<'a> {
    name: &'a str,
    href: String,
    count: usize,
}

#[derive(Debug, Serialize)]
struct JsonIndex<'a> {
    articles: Vec<JsonArticle<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<JsonCategory<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    authors: Option<Vec<JsonCategory<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    years: Option<Vec<JsonCategory<'a>>>,
}

fn json_article<'a>(doc: &'a Document, from: &str) -> JsonArticle<'a> {
    let headings = doc
        .toc()
        .map(|toc| {
            toc.headings()
                .map(|(_, heading)| JsonHeading {
                    level: heading.level,
                    number: heading.number_label(),
                    text: &heading.text,
                    anchor: &heading.anchor,
                })
                .collect()
        })
        .unwrap_or_default();
    JsonArticle {
        title: &doc.title,
        date: doc.date.to_string(),
        authors: doc.authors.display_names().collect(),
        tags: doc.tags.display_names().collect(),
        headings,
        href: link(from, &doc.output_path),
    }
}

fn json_categories<'a>(index: &'a CategoryIndex, from: &str) -> Vec<JsonCategory<'a>> {
    index
        .entries()
        .map(|entry| JsonCategory {
            name: &entry.name,
            href: entry
                .first_page()
                .map(|page| link(from, page))
                .unwrap_or_default(),
            count: entry.docs.len(),
        })
        .collect()
}

/// Serializes the index and merges the top-level members of every appendix
/// into the same object, in appendix order. A later member replaces an
/// earlier one with the same key.
pub fn render_json_index(
    ctx: &BuildContext,
    json: &JsonIndexConfig,
    appendices: &[JsonAppendix],
) -> Result<String, BuildError> {
    let from = json.path.as_str();
    let index = JsonIndex {
        articles: ctx
            .index
            .documents
            .iter()
            .map(|doc| json_article(doc, from))
            .collect(),
        tags: json.tags.then(|| json_categories(&ctx.index.by_tag, from)),
        authors: json.authors.then(|| json_categories(&ctx.index.by_author, from)),
        years: json.years.then(|| json_categories(&ctx.index.by_year, from)),
    };
    let index_error = |source| BuildError::Json {
        path: json.path.clone(),
        source,
    };
    let mut value = serde_json::to_value(&index).map_err(index_error)?;

    for appendix in appendices {
        let members: Map<String, Value> =
            serde_json::from_str(&appendix.contents).map_err(|source| BuildError::Json {
                path: appendix.source_path.clone(),
                source,
            })?;
        if let Value::Object(object) = &mut value {
            object.extend(members);
        }
    }

    let mut text = serde_json::to_string_pretty(&value).map_err(index_error)?;
    text.push('\n');
    Ok(text)
}

pub fn write_json_index(
    ctx: &BuildContext,
    json: &JsonIndexConfig,
    appendices: &[JsonAppendix],
    writer: &mut dyn SiteWriter,
) -> Result<(), BuildError> {
    let text = render_json_index(ctx, json, appendices)?;
    writer.write(&json.path, &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::index::{IndexSettings, SiteIndex};
    use crate::model::{SiteSources, SourceDoc};
    use crate::report::DiagnosticCollector;
    use crate::templates::{TemplateRole, TemplateSet};
    use std::collections::BTreeMap;

    fn context() -> BuildContext {
        let mut config = SiteConfig::with_site("Demo & Co", "https://example.com/");
        config.toc.min_headings = 1;
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let sources = SiteSources {
            documents: vec![
                SourceDoc::new(
                    "articles/a.md",
                    "title: First\ndate: 2024-01-05\ntags: Rust, <tips>\n\nIntro text.\n\n## Setup\n",
                ),
                SourceDoc::new("articles/b.md", "title: Second\ndate: 2024-02-10\n\nMore.\n"),
            ],
            ..SiteSources::default()
        };
        let settings = IndexSettings::from_config(&config, today).unwrap();
        let index = SiteIndex::build(&sources, &settings, &DiagnosticCollector::new());
        let mut templates = BTreeMap::new();
        for (role, text) in [
            (TemplateRole::Landing, "<div data-block=\"newest-posts\"></div>"),
            (TemplateRole::Post, "<div data-block=\"post-content\"></div>"),
            (TemplateRole::Index, "<div data-block=\"index-entries\"></div>"),
            (TemplateRole::IndexEntry, "<h2 data-block=\"entry-title\"></h2>"),
        ] {
            templates.insert(role, text.to_string());
        }
        let templates = TemplateSet::load(&templates).unwrap();
        BuildContext::new(config, index, templates, today)
    }

    fn json_config() -> JsonIndexConfig {
        JsonIndexConfig {
            enabled: true,
            path: "index.json".to_string(),
            tags: true,
            authors: false,
            years: true,
            append: Vec::new(),
        }
    }

    #[test]
    fn rss_lists_newest_first_with_categories() {
        let ctx = context();
        let rss = RssConfig {
            enabled: true,
            path: "rss.xml".to_string(),
            max_items: 1,
        };
        let xml = render_rss(&ctx, &rss);
        assert!(xml.contains("<title>Demo &amp; Co</title>"));
        assert_eq!(xml.matches("<item>").count(), 1);
        assert!(xml.contains("<title>Second</title>"));
        assert!(xml.contains("<link>https://example.com/posts/2.html</link>"));
        assert!(xml.contains("<category>N/A</category>"));
        assert!(xml.contains("<pubDate>Sat, 10 Feb 2024 00:00:00 +0000</pubDate>"));
    }

    #[test]
    fn json_index_lists_articles_and_categories() {
        let ctx = context();
        let text = render_json_index(&ctx, &json_config(), &[]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let articles = value["articles"].as_array().unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[1]["title"], "First");
        assert_eq!(articles[1]["href"], "posts/1.html");
        assert_eq!(articles[1]["headings"][0]["anchor"], "setup");
        assert_eq!(articles[1]["tags"][0], "<tips>");
        assert!(value.get("authors").is_none());
        assert_eq!(value["years"][0]["name"], "2024");
        assert_eq!(value["years"][0]["count"], 2);
    }

    #[test]
    fn appendix_members_join_the_top_level_object() {
        let ctx = context();
        let appendix = JsonAppendix {
            source_path: "extra.json".to_string(),
            contents: "{\n  \"version\": 2,\n  \"site\": {\"name\": \"Demo\"}\n}\n".to_string(),
        };
        let text = render_json_index(&ctx, &json_config(), &[appendix]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], 2);
        assert_eq!(value["site"]["name"], "Demo");
        assert!(value["articles"].is_array());
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["articles", "tags", "years", "version", "site"]);
    }

    #[test]
    fn nested_objects_survive_in_every_appendix() {
        let ctx = context();
        let first = JsonAppendix {
            source_path: "one.json".to_string(),
            contents: "{\"site\": {\"name\": \"Demo\", \"links\": {\"home\": \"/\"}}}".to_string(),
        };
        let second = JsonAppendix {
            source_path: "two.json".to_string(),
            contents: "{\"menu\": [{\"label\": \"About\"}]}".to_string(),
        };
        let text = render_json_index(&ctx, &json_config(), &[first, second]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["site"]["name"], "Demo");
        assert_eq!(value["site"]["links"]["home"], "/");
        assert_eq!(value["menu"][0]["label"], "About");
    }

    #[test]
    fn appendix_must_be_an_object() {
        let ctx = context();
        let appendix = JsonAppendix {
            source_path: "list.json".to_string(),
            contents: "[1, 2]".to_string(),
        };
        let err = render_json_index(&ctx, &json_config(), &[appendix]).unwrap_err();
        assert!(matches!(err, BuildError::Json { ref path, .. } if path == "list.json"));
    }

    #[test]
    fn broken_appendix_is_fatal() {
        let ctx = context();
        let appendix = JsonAppendix {
            source_path: "broken.json".to_string(),
            contents: "{ \"oops\": }".to_string(),
        };
        let err = render_json_index(&ctx, &json_config(), &[appendix]).unwrap_err();
        match err {
            BuildError::Json { path, .. } => assert_eq!(path, "broken.json"),
            other => panic!("unexpected error {other}"),
        }
    }
}
