//! Configuration types for JSON Schema emission.

/// Configuration for JSON Schema emission.
#[derive(Clone, Debug)]
pub struct Config {
    /// Tag key with schema-specific options
    pub(crate) tag_key: String,
    /// Tag key consulted when a field has no schema tag
    pub(crate) fallback_tag_key: String,
    /// Whether to indent the document
    pub(crate) pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tag_key: "jsonschema".to_string(),
            fallback_tag_key: "json".to_string(),
            pretty: true,
        }
    }
}

impl Config {
    /// Create a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tag key with schema-specific options.
    pub fn tag_key(mut self, key: impl Into<String>) -> Self {
        self.tag_key = key.into();
        self
    }

    /// Set the tag key read when the schema tag is absent.
    pub fn fallback_tag_key(mut self, key: impl Into<String>) -> Self {
        self.fallback_tag_key = key.into();
        self
    }

    /// Set whether to indent the document.
    pub fn pretty(mut self, value: bool) -> Self {
        self.pretty = value;
        self
    }
}
