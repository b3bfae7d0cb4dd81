//! Debounced validation scheduling.
//!
//! Coalesces bursts of change notifications for the same document into a
//! single validation invocation, run after a quiet period. Each document
//! identity is debounced independently, so edits to one file never delay
//! validation of another.

use crate::document::{Document, DocumentKey};
use crate::error::{DebounceError, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;

/// User-supplied validation callback.
///
/// Implementations perform the actual validation work (parsing, schema
/// checks) and report findings, typically through a
/// [`DiagnosticsSink`](crate::DiagnosticsSink). Failures are not retried; the
/// timer task that invoked the callback logs them, and the pending-entry
/// bookkeeping has already been cleared by the time the callback runs, so a
/// failure never blocks a later trigger for the same document.
#[async_trait]
pub trait Validate<D: Send>: Send + Sync {
    async fn validate(&self, document: D) -> Result<()>;
}

/// Adapts an async closure into a [`Validate`] implementation.
///
/// # Examples
///
/// ```
/// use doc_debounce::{TextDocument, validate_fn};
///
/// let validator = validate_fn(|doc: TextDocument| async move {
///     println!("validating {} ({} bytes)", doc.key, doc.text.len());
///     Ok(())
/// });
/// # let _ = validator;
/// ```
pub fn validate_fn<D, F, Fut>(f: F) -> FnValidate<F>
where
    D: Send + 'static,
    F: Fn(D) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send,
{
    FnValidate { inner: f }
}

/// [`Validate`] implementation backed by a closure. Built by [`validate_fn`].
pub struct FnValidate<F> {
    inner: F,
}

#[async_trait]
impl<D, F, Fut> Validate<D> for FnValidate<F>
where
    D: Send + 'static,
    F: Fn(D) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send,
{
    async fn validate(&self, document: D) -> Result<()> {
        (self.inner)(document).await
    }
}

/// Handle for one outstanding scheduled validation.
///
/// The generation tag distinguishes a superseded timer from its replacement:
/// an aborted task's cleanup must never evict the entry a newer trigger
/// installed under the same key.
struct PendingValidation {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Coalesces rapid change events per document into a single deferred
/// validation.
///
/// For any [`DocumentKey`] at most one pending (unfired) validation exists at
/// any instant. Triggering while one is pending aborts the old timer before
/// the new one is recorded, so only the final snapshot after a pause is ever
/// validated. Closing a document cancels its pending work via
/// [`clean_pending`](Self::clean_pending).
///
/// # Examples
///
/// ```
/// use doc_debounce::{DebouncedValidator, DocumentKey, TextDocument, validate_fn};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let runs = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&runs);
///
/// let validator = DebouncedValidator::new(
///     Arc::new(validate_fn(move |_doc: TextDocument| {
///         let counter = Arc::clone(&counter);
///         async move {
///             counter.fetch_add(1, Ordering::SeqCst);
///             Ok(())
///         }
///     })),
///     Duration::from_millis(20),
/// );
///
/// let key = DocumentKey::new("file:///schema.yaml");
/// for version in 1..=5 {
///     let snapshot = TextDocument::new(key.clone(), "contents", version);
///     validator.trigger(snapshot).unwrap();
/// }
///
/// tokio::time::sleep(Duration::from_millis(60)).await;
/// assert_eq!(runs.load(Ordering::SeqCst), 1);
/// # }
/// ```
pub struct DebouncedValidator<D: Send> {
    pending: Arc<DashMap<DocumentKey, PendingValidation>>,
    validator: Arc<dyn Validate<D>>,
    delay: Duration,
    generation: AtomicU64,
    closed: AtomicBool,
}

impl<D: Document> DebouncedValidator<D> {
    /// Creates a validator that fires `callback` after `delay` of quiet time
    /// per document.
    pub fn new(callback: Arc<dyn Validate<D>>, delay: Duration) -> Self {
        Self {
            pending: Arc::new(DashMap::new()),
            validator: callback,
            delay,
            generation: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Returns the default quiet-period length.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules a deferred validation of `document` using the default delay.
    ///
    /// See [`trigger_with_delay`](Self::trigger_with_delay).
    pub fn trigger(&self, document: D) -> Result<()> {
        self.trigger_with_delay(document, self.delay)
    }

    /// Schedules a deferred validation of `document` after `delay`.
    ///
    /// If a validation is already pending for the document's key, its timer
    /// is aborted before the new one is recorded; the superseded snapshot is
    /// never validated. A zero delay still runs the callback asynchronously,
    /// never inline in this call.
    ///
    /// # Errors
    ///
    /// [`DebounceError::Schedule`] if no tokio runtime is available on the
    /// calling thread, [`DebounceError::Shutdown`] after
    /// [`shutdown`](Self::shutdown).
    pub fn trigger_with_delay(&self, document: D, delay: Duration) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(DebounceError::Shutdown);
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| DebounceError::Schedule(e.to_string()))?;

        let key = document.key();
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);

        let pending = Arc::clone(&self.pending);
        let validator = Arc::clone(&self.validator);
        let task_key = key.clone();
        let deferred = async move {
            tokio::time::sleep(delay).await;

            // Clear our own entry before validating. A failing callback must
            // not leave a dangling handle, and a re-entrant trigger during
            // callback execution starts a fresh independent cycle. The
            // generation check keeps an aborted predecessor from evicting
            // the entry its successor installed.
            pending.remove_if(&task_key, |_, p| p.generation == generation);

            if let Err(e) = validator.validate(document).await {
                tracing::error!("validation failed for {}: {}", task_key, e);
            }
        };

        // Abort-then-record under the entry guard so the old timer can never
        // fire between the two steps.
        match self.pending.entry(key) {
            Entry::Occupied(mut slot) => {
                slot.get().handle.abort();
                tracing::debug!("superseded pending validation for {}", slot.key());
                slot.insert(PendingValidation {
                    generation,
                    handle: runtime.spawn(deferred),
                });
            }
            Entry::Vacant(slot) => {
                tracing::debug!("scheduled validation for {} in {:?}", slot.key(), delay);
                slot.insert(PendingValidation {
                    generation,
                    handle: runtime.spawn(deferred),
                });
            }
        }

        Ok(())
    }

    /// Cancels the pending validation for `key`, if any.
    ///
    /// After this call no validation fires for the key until the next
    /// trigger. Called when a document closes, so findings are never computed
    /// for a document that no longer exists in the session. No-op if nothing
    /// is pending, safe to call repeatedly.
    pub fn clean_pending(&self, key: &DocumentKey) {
        if let Some((_, validation)) = self.pending.remove(key) {
            validation.handle.abort();
            tracing::debug!("cancelled pending validation for {}", key);
        }
    }

    /// Aborts every pending validation and rejects all later triggers.
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::Release);
        self.pending.retain(|_, validation| {
            validation.handle.abort();
            false
        });
        tracing::debug!("validator shut down");
    }

    /// Returns the number of documents with an outstanding scheduled
    /// validation.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl<D: Send> Drop for DebouncedValidator<D> {
    fn drop(&mut self) {
        for entry in self.pending.iter() {
            entry.value().handle.abort();
        }
    }
}

impl<D: Send> fmt::Debug for DebouncedValidator<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebouncedValidator")
            .field("pending_count", &self.pending.len())
            .field("delay", &self.delay)
            .field("closed", &self.closed.load(Ordering::Acquire))
            .finish()
    }
}
