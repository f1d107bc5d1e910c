//! The `--bool` / `--int` / `--bool-or-int` / `--path` selector.

use std::fmt;
use std::path::Path;

use crate::error::ValueError;
use crate::parse::{canonical_bool, parse_bool, parse_bool_or_int, parse_int64, parse_path};

/// How a value is interpreted on the way in and out of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueType {
    #[default]
    Raw,
    Bool,
    Int,
    BoolOrInt,
    Path,
}

impl ValueType {
    /// Canonical text to store for a value supplied on the command line.
    ///
    /// Paths are stored unexpanded.
    pub fn normalize(self, raw: &str) -> Result<String, ValueError> {
        match self {
            Self::Raw | Self::Path => Ok(raw.to_string()),
            Self::Bool => parse_bool(Some(raw)).map(|b| canonical_bool(b).to_string()),
            Self::Int => parse_int64(raw).map(|n| n.to_string()),
            Self::BoolOrInt => parse_bool_or_int(Some(raw)).map(|v| v.to_string()),
        }
    }

    /// Text to print for a stored value.
    pub fn format(self, raw: Option<&str>, home: Option<&Path>) -> Result<String, ValueError> {
        match self {
            Self::Raw => Ok(raw.unwrap_or_default().to_string()),
            Self::Bool => parse_bool(raw).map(|b| canonical_bool(b).to_string()),
            Self::Int => parse_int64(raw.unwrap_or_default()).map(|n| n.to_string()),
            Self::BoolOrInt => parse_bool_or_int(raw).map(|v| v.to_string()),
            Self::Path => parse_path(raw.unwrap_or_default(), home)
                .map(|p| p.to_string_lossy().into_owned()),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Raw => "raw",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::BoolOrInt => "bool-or-int",
            Self::Path => "path",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(ValueType::Bool.normalize("YES").unwrap(), "true");
        assert_eq!(ValueType::Int.normalize("1k").unwrap(), "1024");
        assert_eq!(ValueType::BoolOrInt.normalize("off").unwrap(), "false");
        assert_eq!(ValueType::BoolOrInt.normalize("5").unwrap(), "5");
        assert_eq!(ValueType::Path.normalize("~/x").unwrap(), "~/x");
        assert_eq!(ValueType::Raw.normalize(" spaced ").unwrap(), " spaced ");
    }

    #[test]
    fn test_normalize_rejects() {
        assert!(ValueType::Bool.normalize("perhaps").is_err());
        assert!(ValueType::Int.normalize("lots").is_err());
    }

    #[test]
    fn test_format() {
        let home = Path::new("/home/ada");
        assert_eq!(ValueType::Bool.format(Some("on"), None).unwrap(), "true");
        assert_eq!(ValueType::Bool.format(None, None).unwrap(), "true");
        assert_eq!(ValueType::Int.format(Some("2m"), None).unwrap(), "2097152");
        assert_eq!(ValueType::Raw.format(None, None).unwrap(), "");
        assert_eq!(
            ValueType::Path.format(Some("~/bin"), Some(home)).unwrap(),
            "/home/ada/bin"
        );
    }

    #[test]
    fn test_format_int_of_bare_key_fails() {
        assert!(ValueType::Int.format(None, None).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ValueType::BoolOrInt.to_string(), "bool-or-int");
    }
}
