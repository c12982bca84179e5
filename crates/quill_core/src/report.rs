//! Progress and diagnostic reporting.
//!
//! Components receive a `&dyn Reporter` instead of writing to a global log.

use std::cell::RefCell;
use std::fmt;

use crate::model::{Diagnostic, DiagnosticLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Index,
    Templates,
    Posts,
    Indices,
    Landing,
    Feeds,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Index => "index",
            Phase::Templates => "templates",
            Phase::Posts => "posts",
            Phase::Indices => "indices",
            Phase::Landing => "landing",
            Phase::Feeds => "feeds",
        };
        f.write_str(name)
    }
}

pub trait Reporter {
    fn diagnostic(&self, diagnostic: Diagnostic);

    fn progress(&self, _phase: Phase, _message: &str) {}

    fn warning(&self, source_path: Option<&str>, message: &str) {
        self.diagnostic(Diagnostic::warning(source_path, message));
    }

    fn error(&self, source_path: Option<&str>, message: &str) {
        self.diagnostic(Diagnostic::error(source_path, message));
    }

    fn info(&self, source_path: Option<&str>, message: &str) {
        self.diagnostic(Diagnostic::info(source_path, message));
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn count(&self, level: DiagnosticLevel) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|diag| diag.level == level)
            .count()
    }

    pub fn has_message(&self, level: DiagnosticLevel, needle: &str) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|diag| diag.level == level && diag.message.contains(needle))
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_inner()
    }
}

impl Reporter for DiagnosticCollector {
    fn diagnostic(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }
}

/// Forwards diagnostics and progress to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn diagnostic(&self, diagnostic: Diagnostic) {
        let path = diagnostic.source_path.as_deref().unwrap_or("-");
        match diagnostic.level {
            DiagnosticLevel::Info => tracing::info!(path, "{}", diagnostic.message),
            DiagnosticLevel::Warning => tracing::warn!(path, "{}", diagnostic.message),
            DiagnosticLevel::Error => tracing::error!(path, "{}", diagnostic.message),
        }
    }

    fn progress(&self, phase: Phase, message: &str) {
        tracing::info!(%phase, "{message}");
    }
}
