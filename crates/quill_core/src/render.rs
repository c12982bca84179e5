//! Ordered merge-splice renderer.
//!
//! A template is walked once, line by line. Block and path positions that
//! fall on the current line are consumed in column order; text between them
//! is copied verbatim.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::BuildError;
use crate::html::indentation;
use crate::paths::rebase;
use crate::report::Reporter;
use crate::templates::Template;

pub type BlockWriter<'a> = Box<dyn Fn(&mut Vec<String>) -> Result<(), BuildError> + 'a>;

/// Block name to content writer.
#[derive(Default)]
pub struct BlockTable<'a> {
    writers: BTreeMap<&'static str, BlockWriter<'a>>,
}

impl<'a> BlockTable<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<F>(mut self, name: &'static str, writer: F) -> Self
    where
        F: Fn(&mut Vec<String>) -> Result<(), BuildError> + 'a,
    {
        self.insert(name, writer);
        self
    }

    pub fn insert<F>(&mut self, name: &'static str, writer: F)
    where
        F: Fn(&mut Vec<String>) -> Result<(), BuildError> + 'a,
    {
        self.writers.insert(name, Box::new(writer));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.writers.contains_key(name)
    }

    fn get(&self, name: &str) -> Option<&BlockWriter<'a>> {
        self.writers.get(name)
    }
}

pub struct OrderedRenderer<'r> {
    indent: String,
    reporter: &'r dyn Reporter,
    reported: RefCell<BTreeSet<(String, String)>>,
}

enum Splice<'t> {
    Block(usize, &'t str),
    Path(usize, &'t str),
}

impl<'r> OrderedRenderer<'r> {
    pub fn new(indent: &str, reporter: &'r dyn Reporter) -> Self {
        Self {
            indent: indent.to_string(),
            reporter,
            reported: RefCell::new(BTreeSet::new()),
        }
    }

    pub fn indent(&self) -> &str {
        &self.indent
    }

    /// Renders `template` for the page at site path `output_path`.
    pub fn render(
        &self,
        template: &Template,
        output_path: &str,
        blocks: &BlockTable<'_>,
    ) -> Result<Vec<String>, BuildError> {
        let mut out = Vec::with_capacity(template.lines().len());
        let mut block_iter = template.blocks().iter().peekable();
        let mut path_iter = template.paths().iter().peekable();

        for (line_no, line) in template.lines().iter().enumerate() {
            let indent = indentation(line);
            let mut current = String::with_capacity(line.len());
            let mut cursor = 0;
            let mut resumed = false;

            loop {
                let next_block = block_iter
                    .peek()
                    .filter(|(pos, _)| pos.line == line_no)
                    .map(|(pos, name)| (pos.column, name.as_str()));
                let next_path = path_iter
                    .peek()
                    .filter(|(pos, _)| pos.line == line_no)
                    .map(|(pos, value)| (pos.column, value.as_str()));
                let splice = match (next_block, next_path) {
                    (None, None) => break,
                    (Some((block_col, _)), Some((path_col, value))) if path_col < block_col => {
                        Splice::Path(path_col, value)
                    }
                    (Some((col, name)), _) => Splice::Block(col, name),
                    (None, Some((col, value))) => Splice::Path(col, value),
                };

                match splice {
                    Splice::Path(col, value) => {
                        path_iter.next();
                        if col < cursor {
                            continue;
                        }
                        current.push_str(&line[cursor..col]);
                        current.push_str(&rebase(value, template.source_path(), output_path));
                        cursor = col + value.len();
                    }
                    Splice::Block(col, name) => {
                        block_iter.next();
                        if col < cursor {
                            continue;
                        }
                        let Some(writer) = blocks.get(name) else {
                            self.report_unknown(template, name);
                            continue;
                        };
                        current.push_str(&line[cursor..col]);
                        out.push(std::mem::take(&mut current));
                        let mut content = Vec::new();
                        writer(&mut content)?;
                        for chunk in &content {
                            for piece in chunk.split('\n') {
                                if piece.is_empty() {
                                    out.push(String::new());
                                } else {
                                    out.push(format!("{indent}{}{piece}", self.indent));
                                }
                            }
                        }
                        current.push_str(indent);
                        let rest = &line[col..];
                        cursor = col + (rest.len() - rest.trim_start().len());
                        resumed = true;
                    }
                }
            }

            current.push_str(&line[cursor..]);
            if !(resumed && current.trim().is_empty()) {
                out.push(current);
            }
        }

        debug_assert!(
            block_iter.peek().is_none() && path_iter.peek().is_none(),
            "insertion positions outside the template lines of {}",
            template.source_path()
        );
        Ok(out)
    }

    fn report_unknown(&self, template: &Template, name: &str) {
        let key = (template.source_path().to_string(), name.to_string());
        if self.reported.borrow_mut().insert(key) {
            self.reporter.warning(
                Some(template.source_path()),
                &format!("no content writer for block '{name}', skipped"),
            );
        }
    }
}
