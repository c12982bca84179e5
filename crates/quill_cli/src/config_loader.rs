use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate, Utc};
use quill_core::config::{SiteConfig, load_site_config};
use quill_core::feeds::JsonAppendix;

use crate::walk::resolve;

pub const CONFIG_FILE: &str = "quill.yaml";

pub fn load_config_for_build(root: &Path) -> Result<SiteConfig> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        bail!("Missing {CONFIG_FILE} in {}.", root.display());
    }
    load_site_config(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))
}

/// The current day in the site's timezone, or the local one when unset.
pub fn site_today(config: &SiteConfig) -> NaiveDate {
    match config.site.timezone {
        Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
        None => Local::now().date_naive(),
    }
}

/// Reads the JSON files listed under `json_index.append`, relative to `root`.
pub fn load_appendices(root: &Path, config: &SiteConfig) -> Result<Vec<JsonAppendix>> {
    let Some(json) = config.json_index_enabled() else {
        return Ok(Vec::new());
    };
    json.append
        .iter()
        .map(|name| {
            let path = resolve(root, Path::new(name));
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(JsonAppendix {
                source_path: name.clone(),
                contents,
            })
        })
        .collect()
}
