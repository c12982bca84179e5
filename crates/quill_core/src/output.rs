//! Output sinks.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::BuildError;

/// Receives every generated file exactly once, addressed by site path.
pub trait SiteWriter {
    fn write(&mut self, rel_path: &str, contents: &str) -> Result<(), BuildError>;
}

/// Joins rendered lines with a trailing newline.
pub fn join_lines(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Writes under a root directory. Existing files are never overwritten.
pub struct FsSiteWriter {
    root: PathBuf,
    written: usize,
}

impl FsSiteWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

impl SiteWriter for FsSiteWriter {
    fn write(&mut self, rel_path: &str, contents: &str) -> Result<(), BuildError> {
        let path = self.root.join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| BuildError::access(parent, err))?;
        }
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|err| match err.kind() {
                ErrorKind::AlreadyExists => BuildError::Collision {
                    path: path.display().to_string(),
                },
                _ => BuildError::access(&path, err),
            })?;
        file.write_all(contents.as_bytes())
            .map_err(|err| BuildError::access(&path, err))?;
        self.written += 1;
        Ok(())
    }
}

/// Keeps files in memory; a second write to the same path is a collision.
#[derive(Debug, Default)]
pub struct MemorySiteWriter {
    files: BTreeMap<String, String>,
}

impl MemorySiteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, rel_path: &str) -> Option<&str> {
        self.files.get(rel_path).map(String::as_str)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_files(self) -> BTreeMap<String, String> {
        self.files
    }
}

impl SiteWriter for MemorySiteWriter {
    fn write(&mut self, rel_path: &str, contents: &str) -> Result<(), BuildError> {
        if self.files.contains_key(rel_path) {
            return Err(BuildError::Collision {
                path: rel_path.to_string(),
            });
        }
        self.files.insert(rel_path.to_string(), contents.to_string());
        Ok(())
    }
}
