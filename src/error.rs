use thiserror::Error;

/// Error types for doc-debounce.
///
/// All fallible operations in the crate report through this enum, which
/// provides structured error handling with source error tracking via
/// `thiserror`.
///
/// # Examples
///
/// ```
/// use doc_debounce::{DebounceError, Result};
///
/// fn check_content(content: &str) -> Result<()> {
///     if content.is_empty() {
///         return Err(DebounceError::Validation {
///             key: "file:///empty.yaml".into(),
///             source: "document has no content".into(),
///         });
///     }
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum DebounceError {
    /// Arming the deferred validation timer failed. The most common cause is
    /// calling a trigger method from a thread without a tokio runtime.
    #[error("failed to arm validation timer: {0}")]
    Schedule(String),

    /// The validator has been shut down and no longer accepts triggers.
    #[error("validator is shut down")]
    Shutdown,

    /// A validation callback failed. Not retried; the pending entry is
    /// cleared before the callback runs, so the failure never blocks a
    /// subsequent trigger for the same document.
    #[error("validation failed for {key}: {source}")]
    Validation {
        key: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DebounceError {
    /// Wraps a callback failure for the given document key.
    pub fn validation(
        key: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Validation {
            key: key.into(),
            source: source.into(),
        }
    }
}

/// Convenience type alias for `Result<T, DebounceError>`.
pub type Result<T> = std::result::Result<T, DebounceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_display() {
        let error = DebounceError::Schedule("no reactor running".into());
        assert_eq!(
            error.to_string(),
            "failed to arm validation timer: no reactor running"
        );
    }

    #[test]
    fn test_shutdown_display() {
        let error = DebounceError::Shutdown;
        assert_eq!(error.to_string(), "validator is shut down");
    }

    #[test]
    fn test_validation_display_and_source() {
        use std::error::Error as _;

        let error = DebounceError::validation("file:///a.yaml", "bad indentation");
        assert_eq!(
            error.to_string(),
            "validation failed for file:///a.yaml: bad indentation"
        );
        assert!(error.source().is_some());
    }

    #[test]
    fn test_validation_wraps_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = DebounceError::validation("file:///a.yaml", io_err);
        assert!(error.to_string().contains("file not found"));
    }
}
