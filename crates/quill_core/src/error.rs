use std::path::Path;

use thiserror::Error;

use crate::toc::TocError;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("cannot access {path}: {source}")]
    Access {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{}{}: {}", .path, line_suffix(.line), .message)]
    Metadata {
        path: String,
        line: Option<usize>,
        message: String,
    },
    #[error("template {template} has no insertion point for required block '{block}'")]
    MissingInsertionPoint { template: String, block: String },
    #[error("ran out of page names for {category} (page {page})")]
    OutOfPageNames { category: String, page: usize },
    #[error("refusing to overwrite existing file {path} (duplicate source name?)")]
    Collision { path: String },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Toc(#[from] TocError),
}

impl BuildError {
    pub fn access(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Access {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub fn metadata(path: &str, line: Option<usize>, message: impl Into<String>) -> Self {
        Self::Metadata {
            path: path.to_string(),
            line,
            message: message.into(),
        }
    }
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(":{line}"),
        None => String::new(),
    }
}
