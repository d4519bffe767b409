//! Render configuration.
//!
//! Settings a root is mounted with. Defaults match browser conventions:
//! handler keys look like `onclick`, and there is no cap on how many passes
//! one burst of state updates may trigger.

/// Default prefix marking an attribute key as an event handler.
pub const DEFAULT_EVENT_PREFIX: &str = "on";

/// Per-root render settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Attribute keys starting with this prefix and holding a handler are
    /// registered as event listeners. The rest of the key, lower-cased, is
    /// the event name.
    pub event_prefix: String,
    /// Maximum passes one drain of render requests may run. `None` means
    /// unbounded; a component that sets state on every render then loops
    /// forever.
    pub max_passes: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            event_prefix: DEFAULT_EVENT_PREFIX.to_string(),
            max_passes: None,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.event_prefix = prefix.into();
        self
    }

    pub fn with_max_passes(mut self, max: usize) -> Self {
        self.max_passes = Some(max);
        self
    }

    /// Event name for a handler key, or `None` if the key is not one.
    pub fn event_name(&self, key: &str) -> Option<String> {
        key.strip_prefix(self.event_prefix.as_str())
            .filter(|name| !name.is_empty())
            .map(str::to_lowercase)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_name() {
        let config = RenderConfig::default();
        assert_eq!(config.event_name("onClick").as_deref(), Some("click"));
        assert_eq!(config.event_name("onkeydown").as_deref(), Some("keydown"));
        assert_eq!(config.event_name("on"), None);
        assert_eq!(config.event_name("class"), None);
    }

    #[test]
    fn test_custom_prefix() {
        let config = RenderConfig::new().with_event_prefix("@").with_max_passes(8);
        assert_eq!(config.event_name("@input").as_deref(), Some("input"));
        assert_eq!(config.event_name("oninput"), None);
        assert_eq!(config.max_passes, Some(8));
    }
}
