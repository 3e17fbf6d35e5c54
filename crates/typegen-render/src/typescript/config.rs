//! Configuration types for TypeScript emission.

/// Configuration for TypeScript emission.
#[derive(Clone, Debug)]
pub struct Config {
    /// Whether to export declarations
    pub(crate) export: bool,
    /// Whether aliases are branded so structurally equal aliases do not mix
    pub(crate) nominal_aliases: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export: true,
            nominal_aliases: false,
        }
    }
}

impl Config {
    /// Create a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to export declarations.
    pub fn export(mut self, value: bool) -> Self {
        self.export = value;
        self
    }

    /// Set whether to emit branded aliases with a constructor function.
    pub fn nominal_aliases(mut self, value: bool) -> Self {
        self.nominal_aliases = value;
        self
    }
}
