use serde::Deserialize;
use std::time::Duration;

/// Configuration for debounced validation.
///
/// Can be deserialized from host-provided settings (e.g., LSP initialization
/// options). All fields use sensible defaults if not specified.
///
/// # Defaults
///
/// - `delay_millis`: `200` - quiet-period length before a scheduled
///   validation fires
/// - `validate_on_open`: `true` - schedule an initial validation when a
///   document is opened
///
/// # Examples
///
/// ```
/// use doc_debounce::DebounceConfig;
///
/// let json = r#"{ "delay_millis": 500 }"#;
/// let config: DebounceConfig = serde_json::from_str(json).unwrap();
///
/// assert_eq!(config.delay_millis, 500);
/// assert!(config.validate_on_open);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct DebounceConfig {
    /// Quiet-period length in milliseconds before a scheduled validation
    /// fires. Repeated triggers inside the window restart it.
    #[serde(default = "default_delay_millis")]
    pub delay_millis: u64,

    /// Whether opening a document schedules an initial validation.
    #[serde(default = "default_true")]
    pub validate_on_open: bool,
}

impl DebounceConfig {
    /// Returns the configured delay as a [`Duration`].
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_millis)
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            delay_millis: default_delay_millis(),
            validate_on_open: true,
        }
    }
}

fn default_delay_millis() -> u64 {
    200
}

fn default_true() -> bool {
    true
}
