//! Host-free diagnostics reporting.
//!
//! Validation callbacks report findings through the narrow [`DiagnosticsSink`]
//! capability rather than a concrete editor client, keeping the scheduler
//! decoupled from any particular host protocol.

use crate::document::DocumentKey;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Severity of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

/// Zero-based line/character position in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Half-open text span a finding applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// A single validation finding associated with a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: Severity,
    pub message: String,
    /// Optional machine-readable rule or check identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Diagnostic {
    /// Creates a diagnostic without a code.
    pub fn new(range: Range, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            range,
            severity,
            message: message.into(),
            code: None,
        }
    }

    /// Attaches a rule/check identifier.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Capability for publishing validation findings to a host.
///
/// Publishing a new set for a key replaces the previous set; publishing an
/// empty set clears all findings for that document.
#[async_trait]
pub trait DiagnosticsSink: Send + Sync {
    async fn publish(&self, key: DocumentKey, diagnostics: Vec<Diagnostic>);
}

/// In-process sink storing the most recently published findings per document.
///
/// Standard sink for tests and for embedding the scheduler without a host.
///
/// # Examples
///
/// ```
/// use doc_debounce::{Diagnostic, DiagnosticsSink, DocumentKey, MemorySink, Position, Range, Severity};
///
/// # tokio_test::block_on(async {
/// let sink = MemorySink::new();
/// let key = DocumentKey::new("file:///a.yaml");
/// let finding = Diagnostic::new(
///     Range::new(Position::new(0, 0), Position::new(0, 4)),
///     Severity::Warning,
///     "unknown property",
/// );
///
/// sink.publish(key.clone(), vec![finding]).await;
/// assert_eq!(sink.get(&key).unwrap().len(), 1);
///
/// sink.publish(key.clone(), vec![]).await;
/// assert!(sink.get(&key).unwrap().is_empty());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemorySink {
    published: DashMap<DocumentKey, Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the latest findings published for a document, if any set has
    /// been published at all.
    pub fn get(&self, key: &DocumentKey) -> Option<Vec<Diagnostic>> {
        self.published.get(key).map(|entry| entry.clone())
    }

    /// Returns the number of documents with a published set.
    pub fn document_count(&self) -> usize {
        self.published.len()
    }
}

#[async_trait]
impl DiagnosticsSink for MemorySink {
    async fn publish(&self, key: DocumentKey, diagnostics: Vec<Diagnostic>) {
        tracing::debug!("publishing {} diagnostics for {}", diagnostics.len(), key);
        self.published.insert(key, diagnostics);
    }
}
