//! Configuration for declaration building.

/// Flags in the naming tag that make a property optional.
pub const OPTIONAL_FLAGS: &[&str] = &["optional", "omitempty", "omitzero"];

/// Configuration for the declaration builder.
#[derive(Clone, Debug)]
pub struct Config {
    /// Tag key read for renaming, skipping and optionality
    pub(crate) tag_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tag_key: "json".to_string(),
        }
    }
}

impl Config {
    /// Create a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tag key that names properties.
    pub fn tag_key(mut self, key: impl Into<String>) -> Self {
        self.tag_key = key.into();
        self
    }
}
