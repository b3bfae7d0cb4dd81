//! Document lifecycle tracking.
//!
//! Wires open/change/close events from a host into the debounced validator:
//! the session keeps the latest snapshot of every open document, schedules
//! debounced revalidation on change, and on close cancels outstanding work
//! and clears published findings.

use crate::config::DebounceConfig;
use crate::diagnostics::DiagnosticsSink;
use crate::document::{DocumentKey, TextDocument};
use crate::error::Result;
use crate::validator::{DebouncedValidator, Validate};
use dashmap::DashMap;
use std::sync::Arc;

/// Tracks open documents and drives debounced validation for them.
///
/// # Examples
///
/// ```
/// use doc_debounce::{
///     DebounceConfig, DiagnosticsSink, DocumentKey, DocumentSession, MemorySink, TextDocument,
///     validate_fn,
/// };
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let sink = Arc::new(MemorySink::new());
/// let session = DocumentSession::new(
///     Arc::new(validate_fn(|_doc: TextDocument| async { Ok(()) })),
///     Arc::clone(&sink) as Arc<dyn DiagnosticsSink>,
///     DebounceConfig::default(),
/// );
///
/// let key = DocumentKey::new("file:///schema.yaml");
/// session.open(key.clone(), "kind: Deployment").unwrap();
/// assert_eq!(session.document_count(), 1);
///
/// session.close(&key).await;
/// assert_eq!(session.document_count(), 0);
/// # }
/// ```
pub struct DocumentSession {
    documents: DashMap<DocumentKey, TextDocument>,
    validator: DebouncedValidator<TextDocument>,
    sink: Arc<dyn DiagnosticsSink>,
    config: DebounceConfig,
}

impl DocumentSession {
    /// Creates a session that validates with `callback` and reports through
    /// `sink`.
    pub fn new(
        callback: Arc<dyn Validate<TextDocument>>,
        sink: Arc<dyn DiagnosticsSink>,
        config: DebounceConfig,
    ) -> Self {
        let validator = DebouncedValidator::new(callback, config.delay());
        Self {
            documents: DashMap::new(),
            validator,
            sink,
            config,
        }
    }

    /// Handles a document-open event.
    ///
    /// Stores the initial snapshot at version 1 and, unless
    /// `validate_on_open` is disabled, schedules an initial validation.
    pub fn open(&self, key: DocumentKey, text: impl Into<String>) -> Result<()> {
        let document = TextDocument::new(key.clone(), text, 1);
        self.documents.insert(key.clone(), document.clone());
        tracing::debug!("opened {}", key);

        if self.config.validate_on_open {
            self.validator.trigger(document)?;
        }
        Ok(())
    }

    /// Handles a full-sync change event.
    ///
    /// Replaces the stored snapshot with a bumped version and schedules a
    /// debounced revalidation. A change for an untracked key stores a fresh
    /// snapshot at version 1, matching full document sync where every event
    /// carries the complete text.
    pub fn change(&self, key: DocumentKey, text: impl Into<String>) -> Result<()> {
        let version = self.documents.get(&key).map_or(0, |doc| doc.version) + 1;
        let document = TextDocument::new(key.clone(), text, version);
        self.documents.insert(key, document.clone());

        self.validator.trigger(document)
    }

    /// Handles a document-close event.
    ///
    /// Cancels any pending validation so no findings are computed for a
    /// document that no longer exists in the session, removes the snapshot,
    /// and publishes an empty diagnostics set so the host drops stale
    /// findings. No-op for an untracked key.
    pub async fn close(&self, key: &DocumentKey) {
        self.validator.clean_pending(key);

        if self.documents.remove(key).is_some() {
            self.sink.publish(key.clone(), Vec::new()).await;
            tracing::debug!("closed {}", key);
        }
    }

    /// Returns the latest stored snapshot for a document.
    pub fn document(&self, key: &DocumentKey) -> Option<TextDocument> {
        self.documents.get(key).map(|doc| doc.clone())
    }

    /// Returns the number of open documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Returns the underlying validator, e.g. to trigger a one-off
    /// revalidation with a custom delay.
    pub fn validator(&self) -> &DebouncedValidator<TextDocument> {
        &self.validator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use crate::validator::validate_fn;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counting_session(
        delay_millis: u64,
        validate_on_open: bool,
    ) -> (DocumentSession, Arc<MemorySink>, Arc<AtomicUsize>) {
        let sink = Arc::new(MemorySink::new());
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);

        let session = DocumentSession::new(
            Arc::new(validate_fn(move |_doc: TextDocument| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })),
            Arc::clone(&sink) as Arc<dyn DiagnosticsSink>,
            DebounceConfig {
                delay_millis,
                validate_on_open,
            },
        );

        (session, sink, runs)
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_schedules_initial_validation() {
        let (session, _sink, runs) = counting_session(100, true);
        let key = DocumentKey::new("file:///a.yaml");

        session.open(key.clone(), "content").unwrap();
        assert_eq!(session.document_count(), 1);
        assert_eq!(session.document(&key).unwrap().version, 1);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_without_initial_validation() {
        let (session, _sink, runs) = counting_session(100, false);

        session
            .open(DocumentKey::new("file:///a.yaml"), "content")
            .unwrap();

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_change_bumps_version_and_coalesces() {
        let (session, _sink, runs) = counting_session(100, false);
        let key = DocumentKey::new("file:///a.yaml");

        session.open(key.clone(), "v1").unwrap();
        session.change(key.clone(), "v2").unwrap();
        session.change(key.clone(), "v3").unwrap();

        let doc = session.document(&key).unwrap();
        assert_eq!(doc.version, 3);
        assert_eq!(doc.text, "v3");

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1, "burst of changes coalesces");
    }

    #[tokio::test(start_paused = true)]
    async fn test_change_for_untracked_key_stores_fresh_snapshot() {
        let (session, _sink, runs) = counting_session(100, false);
        let key = DocumentKey::new("file:///a.yaml");

        session.change(key.clone(), "content").unwrap();
        assert_eq!(session.document(&key).unwrap().version, 1);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_cancels_pending_and_clears_sink() {
        let (session, sink, runs) = counting_session(200, true);
        let key = DocumentKey::new("file:///a.yaml");

        session.open(key.clone(), "content").unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        session.close(&key).await;

        assert_eq!(session.document_count(), 0);
        assert!(session.document(&key).is_none());
        assert_eq!(sink.get(&key).unwrap().len(), 0, "close clears findings");

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0, "pending validation cancelled");
    }

    #[tokio::test]
    async fn test_close_untracked_key_is_noop() {
        let (session, sink, _runs) = counting_session(100, false);
        let key = DocumentKey::new("file:///never-opened.yaml");

        session.close(&key).await;
        session.close(&key).await;

        assert!(sink.get(&key).is_none(), "no clear published for unknown key");
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_documents() {
        let (session, _sink, runs) = counting_session(100, false);
        let a = DocumentKey::new("file:///a.yaml");
        let b = DocumentKey::new("file:///b.yaml");

        session.change(a.clone(), "a1").unwrap();
        session.change(b.clone(), "b1").unwrap();
        assert_eq!(session.validator().pending_count(), 2);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }
}
