//! Configuration types for PostgreSQL emission.

/// Configuration for PostgreSQL emission.
#[derive(Clone, Debug)]
pub struct Config {
    /// Tag key with column options
    pub(crate) tag_key: String,
    /// Add `id uuid PRIMARY KEY DEFAULT gen_random_uuid()` to tables without a tagged key
    pub(crate) surrogate_key: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tag_key: "postgres".to_string(),
            surrogate_key: true,
        }
    }
}

impl Config {
    /// Create a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tag key with column options.
    pub fn tag_key(mut self, key: impl Into<String>) -> Self {
        self.tag_key = key.into();
        self
    }

    /// Set whether tables without a `primarykey` column get a surrogate `id`.
    pub fn surrogate_key(mut self, value: bool) -> Self {
        self.surrogate_key = value;
        self
    }
}
