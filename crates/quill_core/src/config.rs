use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono_tz::Tz;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    pub site: SiteMeta,
    pub paths: PathsConfig,
    pub index: IndexConfig,
    pub landing: LandingConfig,
    pub toc: TocConfig,
    pub render: RenderConfig,
    pub publish: PublishConfig,
    pub rss: Option<RssConfig>,
    pub json_index: Option<JsonIndexConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiteMeta {
    pub title: String,
    pub base_url: String,
    pub language: String,
    pub abstract_text: Option<String>,
    pub timezone: Option<Tz>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathsConfig {
    pub articles: String,
    pub templates: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    pub items_per_page: usize,
    pub top_tags: usize,
    pub top_authors: usize,
    pub summary_chars: usize,
}

/// How a featured document is recognized when it is kept out of the
/// landing page's newest list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeaturedMatch {
    #[default]
    SourcePath,
    OutputPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandingConfig {
    pub newest: usize,
    pub featured: usize,
    pub featured_match: FeaturedMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocConfig {
    pub offset: u8,
    pub depth: u8,
    pub auto: bool,
    pub min_headings: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    pub indent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublishConfig {
    pub allow_future: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RssConfig {
    pub enabled: bool,
    pub path: String,
    pub max_items: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonIndexConfig {
    pub enabled: bool,
    pub path: String,
    pub tags: bool,
    pub authors: bool,
    pub years: bool,
    /// Files whose top-level JSON object members are merged into the index.
    pub append: Vec<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            articles: "articles".to_string(),
            templates: "templates".to_string(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            items_per_page: 10,
            top_tags: 10,
            top_authors: 10,
            summary_chars: 200,
        }
    }
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            newest: 10,
            featured: 5,
            featured_match: FeaturedMatch::default(),
        }
    }
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            offset: 1,
            depth: 3,
            auto: true,
            min_headings: 3,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
        }
    }
}

impl SiteConfig {
    /// Configuration with every section at its default.
    pub fn with_site(title: &str, base_url: &str) -> Self {
        Self {
            site: SiteMeta {
                title: title.to_string(),
                base_url: base_url.to_string(),
                language: "en".to_string(),
                abstract_text: None,
                timezone: None,
            },
            paths: PathsConfig::default(),
            index: IndexConfig::default(),
            landing: LandingConfig::default(),
            toc: TocConfig::default(),
            render: RenderConfig::default(),
            publish: PublishConfig::default(),
            rss: None,
            json_index: None,
        }
    }

    pub fn rss_enabled(&self) -> Option<&RssConfig> {
        self.rss.as_ref().filter(|rss| rss.enabled)
    }

    pub fn json_index_enabled(&self) -> Option<&JsonIndexConfig> {
        self.json_index.as_ref().filter(|json| json.enabled)
    }
}

#[derive(Debug, Deserialize)]
struct SiteConfigRaw {
    site: SiteMetaRaw,
    paths: Option<PathsConfigRaw>,
    index: Option<IndexConfigRaw>,
    landing: Option<LandingConfigRaw>,
    toc: Option<TocConfigRaw>,
    render: Option<RenderConfigRaw>,
    publish: Option<PublishConfigRaw>,
    rss: Option<RssConfigRaw>,
    json_index: Option<JsonIndexConfigRaw>,
}

#[derive(Debug, Deserialize)]
struct SiteMetaRaw {
    title: Option<String>,
    base_url: Option<String>,
    language: Option<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PathsConfigRaw {
    articles: Option<String>,
    templates: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IndexConfigRaw {
    items_per_page: Option<usize>,
    top_tags: Option<usize>,
    top_authors: Option<usize>,
    summary_chars: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct LandingConfigRaw {
    newest: Option<usize>,
    featured: Option<usize>,
    featured_match: Option<FeaturedMatch>,
}

#[derive(Debug, Deserialize)]
struct TocConfigRaw {
    offset: Option<u8>,
    depth: Option<u8>,
    auto: Option<bool>,
    min_headings: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RenderConfigRaw {
    indent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PublishConfigRaw {
    allow_future: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RssConfigRaw {
    enabled: Option<bool>,
    path: Option<String>,
    max_items: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct JsonIndexConfigRaw {
    enabled: Option<bool>,
    path: Option<String>,
    tags: Option<bool>,
    authors: Option<bool>,
    years: Option<bool>,
    #[serde(default)]
    append: Vec<String>,
}

pub fn load_site_config(path: &Path) -> Result<SiteConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_site_config(&raw).with_context(|| format!("invalid config {}", path.display()))
}

pub fn parse_site_config(raw: &str) -> Result<SiteConfig> {
    let parsed: SiteConfigRaw =
        serde_yaml::from_str(raw).context("failed to parse YAML config")?;

    let timezone = match parsed.site.timezone {
        None => None,
        Some(name) => Some(
            name.trim()
                .parse::<Tz>()
                .map_err(|err| anyhow::anyhow!("site.timezone '{name}' is not valid: {err}"))?,
        ),
    };
    let site = SiteMeta {
        title: required_string(parsed.site.title, "site.title")?,
        base_url: required_string(parsed.site.base_url, "site.base_url")?,
        language: non_empty_or_default(parsed.site.language, "en", "site.language")?,
        abstract_text: parsed.site.abstract_text,
        timezone,
    };

    let paths = match parsed.paths {
        None => PathsConfig::default(),
        Some(raw) => {
            let defaults = PathsConfig::default();
            PathsConfig {
                articles: non_empty_or_default(raw.articles, &defaults.articles, "paths.articles")?,
                templates: non_empty_or_default(
                    raw.templates,
                    &defaults.templates,
                    "paths.templates",
                )?,
            }
        }
    };

    let index = match parsed.index {
        None => IndexConfig::default(),
        Some(raw) => {
            let defaults = IndexConfig::default();
            let items_per_page = raw.items_per_page.unwrap_or(defaults.items_per_page);
            if items_per_page == 0 {
                bail!("index.items_per_page must be > 0");
            }
            IndexConfig {
                items_per_page,
                top_tags: raw.top_tags.unwrap_or(defaults.top_tags),
                top_authors: raw.top_authors.unwrap_or(defaults.top_authors),
                summary_chars: raw.summary_chars.unwrap_or(defaults.summary_chars),
            }
        }
    };

    let landing = match parsed.landing {
        None => LandingConfig::default(),
        Some(raw) => {
            let defaults = LandingConfig::default();
            LandingConfig {
                newest: raw.newest.unwrap_or(defaults.newest),
                featured: raw.featured.unwrap_or(defaults.featured),
                featured_match: raw.featured_match.unwrap_or_default(),
            }
        }
    };

    let toc = match parsed.toc {
        None => TocConfig::default(),
        Some(raw) => {
            let defaults = TocConfig::default();
            let depth = raw.depth.unwrap_or(defaults.depth);
            if depth == 0 {
                bail!("toc.depth must be > 0");
            }
            TocConfig {
                offset: raw.offset.unwrap_or(defaults.offset),
                depth,
                auto: raw.auto.unwrap_or(defaults.auto),
                min_headings: raw.min_headings.unwrap_or(defaults.min_headings),
            }
        }
    };

    let render = match parsed.render.and_then(|raw| raw.indent) {
        None => RenderConfig::default(),
        Some(indent) => {
            if !indent.chars().all(|ch| ch == ' ' || ch == '\t') {
                bail!("render.indent must contain only spaces or tabs");
            }
            RenderConfig { indent }
        }
    };

    let publish = PublishConfig {
        allow_future: parsed
            .publish
            .and_then(|raw| raw.allow_future)
            .unwrap_or(false),
    };

    let rss = match parsed.rss {
        None => None,
        Some(raw) => {
            let enabled = raw.enabled.unwrap_or(false);
            let max_items = match raw.max_items {
                Some(0) => bail!("rss.max_items must be > 0"),
                Some(value) => value,
                None if enabled => bail!("rss.max_items required when rss.enabled is true"),
                None => 20,
            };
            Some(RssConfig {
                enabled,
                path: non_empty_or_default(raw.path, "rss.xml", "rss.path")?,
                max_items,
            })
        }
    };

    let json_index = match parsed.json_index {
        None => None,
        Some(raw) => Some(JsonIndexConfig {
            enabled: raw.enabled.unwrap_or(false),
            path: non_empty_or_default(raw.path, "index.json", "json_index.path")?,
            tags: raw.tags.unwrap_or(true),
            authors: raw.authors.unwrap_or(true),
            years: raw.years.unwrap_or(true),
            append: raw.append,
        }),
    };

    Ok(SiteConfig {
        site,
        paths,
        index,
        landing,
        toc,
        render,
        publish,
        rss,
        json_index,
    })
}

fn required_string(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => bail!("missing required field: {}", field),
    }
}

fn non_empty_or_default(value: Option<String>, default: &str, field: &str) -> Result<String> {
    match value {
        Some(text) => {
            if text.trim().is_empty() {
                bail!("{field} must not be empty");
            }
            Ok(text)
        }
        None => Ok(default.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "site:\n  title: \"Demo\"\n  base_url: \"https://example.com/\"\n";

    #[test]
    fn valid_minimal_config_parses() {
        let config = parse_site_config(MINIMAL).expect("config should load");
        assert_eq!(config.site.title, "Demo");
        assert_eq!(config.site.language, "en");
        assert_eq!(config.index, IndexConfig::default());
        assert_eq!(config.toc, TocConfig::default());
        assert_eq!(config.render.indent, "  ");
        assert!(config.rss.is_none());
    }

    #[test]
    fn missing_required_field_fails() {
        let err = parse_site_config("site:\n  title: \"Demo\"\n").unwrap_err();
        assert!(err.to_string().contains("site.base_url"));
    }

    #[test]
    fn zero_items_per_page_is_rejected() {
        let raw = format!("{MINIMAL}index:\n  items_per_page: 0\n");
        let err = parse_site_config(&raw).unwrap_err();
        assert!(err.to_string().contains("items_per_page"));
    }

    #[test]
    fn rss_enabled_without_max_items_fails() {
        let raw = format!("{MINIMAL}rss:\n  enabled: true\n");
        assert!(parse_site_config(&raw).is_err());
        let raw = format!("{MINIMAL}rss:\n  enabled: true\n  max_items: 5\n");
        let config = parse_site_config(&raw).unwrap();
        let rss = config.rss_enabled().expect("rss enabled");
        assert_eq!((rss.path.as_str(), rss.max_items), ("rss.xml", 5));
    }

    #[test]
    fn sections_override_defaults() {
        let raw = format!(
            "{MINIMAL}  timezone: Europe/Oslo\nlanding:\n  featured_match: output_path\ntoc:\n  offset: 0\n  depth: 2\nrender:\n  indent: \"\\t\"\njson_index:\n  enabled: true\n  authors: false\n  append: [extra.json]\n"
        );
        let config = parse_site_config(&raw).unwrap();
        assert_eq!(config.site.timezone, Some(chrono_tz::Europe::Oslo));
        assert_eq!(config.landing.featured_match, FeaturedMatch::OutputPath);
        assert_eq!((config.toc.offset, config.toc.depth), (0, 2));
        assert_eq!(config.render.indent, "\t");
        let json = config.json_index_enabled().unwrap();
        assert!(json.tags && !json.authors);
        assert_eq!(json.append, vec!["extra.json"]);
    }

    #[test]
    fn bad_timezone_is_rejected() {
        let raw = format!("{MINIMAL}  timezone: Mars/Olympus\n");
        assert!(parse_site_config(&raw).is_err());
    }

    #[test]
    fn loads_from_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("quill.yaml");
        fs::write(&path, MINIMAL).unwrap();
        assert_eq!(load_site_config(&path).unwrap().site.base_url, "https://example.com/");
        let err = load_site_config(&temp.path().join("missing.yaml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
