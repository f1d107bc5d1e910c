//! File format errors.

/// A configuration file that cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("file is not valid UTF-8")]
    Encoding,
}

impl FileError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
