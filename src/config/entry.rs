//! A single resolved setting.

use super::key::ConfigKey;
use super::level::Level;

/// One stored value for a key, tagged with the level it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: ConfigKey,
    /// `None` for a key written without `=`.
    pub value: Option<String>,
    pub level: Level,
}

impl Entry {
    /// The raw text of the value; empty for a value-less key.
    pub fn raw(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}
