//! Error type shared by the engine and the command dispatcher.

use std::io;
use std::path::PathBuf;

use gitconf_file::FileError;
use gitconf_value::ValueError;

/// Result alias for operations that fail with [`ConfigError`].
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

/// Everything that can stop a command.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0}")]
    Usage(String),

    /// A key, file or section that does not exist.
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} has multiple values")]
    AmbiguousKey(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid section name: {0}")]
    InvalidSection(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex_lite::Error,
    },

    #[error("{key}: {source}")]
    Value {
        key: String,
        #[source]
        source: ValueError,
    },

    #[error("bad config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: FileError,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("not in a repository (or any of the parent directories)")]
    NoRepository,

    #[error("cannot determine the home directory")]
    NoHome,
}

impl ConfigError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => 129,
            Self::InvalidKey(_) | Self::InvalidSection(_) | Self::InvalidUrl(_) => 1,
            Self::Parse { .. } => 3,
            Self::Io { .. } | Self::Output(_) => 4,
            Self::NotFound(_) | Self::AmbiguousKey(_) => 5,
            Self::InvalidRegex { .. } => 6,
            Self::Value { .. } | Self::NoRepository | Self::NoHome => 128,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn value(key: impl ToString, source: ValueError) -> Self {
        Self::Value {
            key: key.to_string(),
            source,
        }
    }
}
