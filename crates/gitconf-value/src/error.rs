//! Coercion errors.

/// A raw value that cannot be read as the requested type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("invalid boolean value '{0}'")]
    InvalidBool(String),

    #[error("invalid integer value '{0}'")]
    InvalidInt(String),

    #[error("invalid path '{value}': {reason}")]
    InvalidPath { value: String, reason: String },
}

impl ValueError {
    pub(crate) fn path(value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
