//! Debounced document validation scheduling.
//!
//! Language servers receive a change notification for nearly every keystroke,
//! while validation (parsing, schema checks) is expensive enough that running
//! it on each event is wasteful. This crate coalesces bursts of change events
//! into a single validation pass per document, run once a quiet period has
//! elapsed, with cancellation when a document closes mid-flight.
//!
//! # Architecture
//!
//! - [`DebouncedValidator`] - the core scheduler: one pending timer per
//!   [`DocumentKey`], last snapshot wins, explicit cancellation
//! - [`Validate`] - the user-supplied validation callback, adaptable from a
//!   closure via [`validate_fn`]
//! - [`DocumentSession`] - open/change/close lifecycle tracking on top of the
//!   scheduler
//! - [`DiagnosticsSink`] - narrow capability for publishing findings to a
//!   host, with [`MemorySink`] as a host-free implementation
//!
//! # Examples
//!
//! ```
//! use doc_debounce::{
//!     DebounceConfig, Diagnostic, DiagnosticsSink, DocumentKey, DocumentSession, MemorySink,
//!     Position, Range, Severity, TextDocument, validate_fn,
//! };
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let sink = Arc::new(MemorySink::new());
//! let report_to = Arc::clone(&sink);
//!
//! // Flag documents that still contain tab indentation.
//! let session = DocumentSession::new(
//!     Arc::new(validate_fn(move |doc: TextDocument| {
//!         let sink = Arc::clone(&report_to);
//!         async move {
//!             let findings: Vec<Diagnostic> = doc
//!                 .text
//!                 .lines()
//!                 .enumerate()
//!                 .filter(|(_, line)| line.starts_with('\t'))
//!                 .map(|(n, _)| {
//!                     Diagnostic::new(
//!                         Range::new(Position::new(n as u32, 0), Position::new(n as u32, 1)),
//!                         Severity::Warning,
//!                         "tab indentation",
//!                     )
//!                 })
//!                 .collect();
//!             sink.publish(doc.key.clone(), findings).await;
//!             Ok(())
//!         }
//!     })),
//!     Arc::clone(&sink) as Arc<dyn DiagnosticsSink>,
//!     DebounceConfig { delay_millis: 20, validate_on_open: true },
//! );
//!
//! let key = DocumentKey::new("file:///config.yaml");
//! session.open(key.clone(), "\tindented: true").unwrap();
//!
//! tokio::time::sleep(Duration::from_millis(60)).await;
//! assert_eq!(sink.get(&key).unwrap().len(), 1);
//! # }
//! ```

pub mod config;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod session;
pub mod validator;

// Re-export commonly used types
pub use config::DebounceConfig;
pub use diagnostics::{Diagnostic, DiagnosticsSink, MemorySink, Position, Range, Severity};
pub use document::{Document, DocumentKey, TextDocument};
pub use error::{DebounceError, Result};
pub use session::DocumentSession;
pub use validator::{DebouncedValidator, FnValidate, Validate, validate_fn};
