use std::fmt;
use std::sync::Arc;

/// Stable identity of a document across edits.
///
/// Keys carry URI-string semantics: two keys compare equal exactly when they
/// name the same resource. Cloning is cheap (shared `Arc<str>`), so keys can
/// be used freely as concurrent-map keys and in log messages.
///
/// # Examples
///
/// ```
/// use doc_debounce::DocumentKey;
///
/// let a = DocumentKey::new("file:///project/schema.yaml");
/// let b = DocumentKey::new("file:///project/schema.yaml");
/// assert_eq!(a, b);
///
/// let other = DocumentKey::new("file:///project/other.yaml");
/// assert_ne!(a, other);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentKey(Arc<str>);

impl DocumentKey {
    /// Creates a key from a URI string.
    pub fn new(uri: impl Into<Arc<str>>) -> Self {
        Self(uri.into())
    }

    /// Returns the underlying URI string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentKey {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

impl From<String> for DocumentKey {
    fn from(uri: String) -> Self {
        Self::new(uri)
    }
}

/// A document snapshot that can be scheduled for validation.
///
/// The scheduler is generic over the snapshot type; all it needs is a stable
/// identity to key pending work by.
pub trait Document: Send + 'static {
    /// Returns the identity of the document this snapshot belongs to.
    fn key(&self) -> DocumentKey;
}

/// Full-text snapshot of an open document.
///
/// Captures the complete content at a point in time together with a
/// monotonically increasing version number, matching full document sync:
/// every change event carries the whole text, and a newer snapshot entirely
/// supersedes an older one.
#[derive(Debug, Clone)]
pub struct TextDocument {
    /// Identity of the document.
    pub key: DocumentKey,
    /// Complete text content at snapshot time.
    pub text: String,
    /// Version counter, incremented on every change.
    pub version: i32,
}

impl TextDocument {
    /// Creates a snapshot with the given key, content, and version.
    pub fn new(key: DocumentKey, text: impl Into<String>, version: i32) -> Self {
        Self {
            key,
            text: text.into(),
            version,
        }
    }
}

impl Document for TextDocument {
    fn key(&self) -> DocumentKey {
        self.key.clone()
    }
}
