//! Raw string parsers.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ValueError;

/// Spellings accepted as `true` (compared case-insensitively).
const TRUE_WORDS: &[&str] = &["true", "yes", "on"];

/// Spellings accepted as `false`. The empty string is false, an absent
/// value is true.
const FALSE_WORDS: &[&str] = &["false", "no", "off", ""];

/// Result of a boolean-or-integer read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOrInt {
    Int(i64),
    Bool(bool),
}

impl fmt::Display for BoolOrInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Bool(b) => f.write_str(canonical_bool(*b)),
        }
    }
}

/// Canonical spelling of a boolean.
pub fn canonical_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Parse a boolean.
///
/// `None` is a key written without `=` and counts as `true`. Besides the
/// word aliases, any integer is accepted and is true when non-zero.
pub fn parse_bool(raw: Option<&str>) -> Result<bool, ValueError> {
    let Some(raw) = raw else {
        return Ok(true);
    };

    if TRUE_WORDS.iter().any(|w| raw.eq_ignore_ascii_case(w)) {
        return Ok(true);
    }
    if FALSE_WORDS.iter().any(|w| raw.eq_ignore_ascii_case(w)) {
        return Ok(false);
    }

    parse_int64(raw)
        .map(|n| n != 0)
        .map_err(|_| ValueError::InvalidBool(raw.to_string()))
}

/// Parse a signed 64-bit integer with an optional `k`, `m` or `g` suffix.
pub fn parse_int64(raw: &str) -> Result<i64, ValueError> {
    let invalid = || ValueError::InvalidInt(raw.to_string());

    // Suffix bytes are ASCII, so slicing off the last byte stays on a char boundary.
    let (body, multiplier) = match raw.as_bytes().last() {
        Some(b'k' | b'K') => (&raw[..raw.len() - 1], 1i64 << 10),
        Some(b'm' | b'M') => (&raw[..raw.len() - 1], 1i64 << 20),
        Some(b'g' | b'G') => (&raw[..raw.len() - 1], 1i64 << 30),
        _ => (raw, 1),
    };

    let (negative, digits) = match body.as_bytes().first() {
        Some(b'-') => (true, &body[1..]),
        Some(b'+') => (false, &body[1..]),
        _ => (false, body),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    // Accumulate toward the sign so i64::MIN is reachable.
    let mut value: i64 = 0;
    for b in digits.bytes() {
        let digit = i64::from(b - b'0');
        value = value
            .checked_mul(10)
            .and_then(|v| {
                if negative {
                    v.checked_sub(digit)
                } else {
                    v.checked_add(digit)
                }
            })
            .ok_or_else(invalid)?;
    }

    value.checked_mul(multiplier).ok_or_else(invalid)
}

/// Parse as an integer first, then as a boolean.
///
/// When both fail the integer error is returned.
pub fn parse_bool_or_int(raw: Option<&str>) -> Result<BoolOrInt, ValueError> {
    let int_err = match parse_int64(raw.unwrap_or_default()) {
        Ok(n) => return Ok(BoolOrInt::Int(n)),
        Err(e) => e,
    };

    parse_bool(raw).map(BoolOrInt::Bool).map_err(|_| int_err)
}

/// Expand a leading `~/` (or a lone `~`) to `home`.
///
/// Other values are returned unchanged. `~user` forms are rejected.
pub fn parse_path(raw: &str, home: Option<&Path>) -> Result<PathBuf, ValueError> {
    if !raw.starts_with('~') {
        return Ok(PathBuf::from(raw));
    }

    let rest = if raw == "~" {
        ""
    } else if let Some(rest) = raw.strip_prefix("~/") {
        rest
    } else {
        return Err(ValueError::path(raw, "home directory lookup by user name is not supported"));
    };

    let home = home.ok_or_else(|| ValueError::path(raw, "home directory is not available"))?;
    if rest.is_empty() {
        Ok(home.to_path_buf())
    } else {
        Ok(home.join(rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_aliases() {
        for word in ["true", "TRUE", "Yes", "on", "1", "42"] {
            assert_eq!(parse_bool(Some(word)), Ok(true), "{}", word);
        }
        for word in ["false", "No", "OFF", "0", ""] {
            assert_eq!(parse_bool(Some(word)), Ok(false), "{}", word);
        }
    }

    #[test]
    fn test_bool_canonical_round_trip() {
        for value in [true, false] {
            assert_eq!(parse_bool(Some(canonical_bool(value))), Ok(value));
        }
    }

    #[test]
    fn test_bool_absent_value_is_true() {
        assert_eq!(parse_bool(None), Ok(true));
    }

    #[test]
    fn test_bool_rejects_garbage() {
        assert_eq!(
            parse_bool(Some("maybe")),
            Err(ValueError::InvalidBool("maybe".to_string()))
        );
    }

    #[test]
    fn test_int_units() {
        assert_eq!(parse_int64("4k"), Ok(4096));
        assert_eq!(parse_int64("4K"), Ok(4096));
        assert_eq!(parse_int64("3m"), Ok(3 * 1024 * 1024));
        assert_eq!(parse_int64("1g"), Ok(1_073_741_824));
        assert_eq!(parse_int64("-2k"), Ok(-2048));
        assert_eq!(parse_int64("+7"), Ok(7));
    }

    #[test]
    fn test_int_extremes() {
        assert_eq!(parse_int64("9223372036854775807"), Ok(i64::MAX));
        assert_eq!(parse_int64("-9223372036854775808"), Ok(i64::MIN));
        assert!(parse_int64("9223372036854775808").is_err());
        assert!(parse_int64("9000000000g").is_err());
    }

    #[test]
    fn test_int_rejects_malformed() {
        for raw in ["", "k", "-", "1kk", "1t", " 1", "0x10", "1.5"] {
            assert_eq!(
                parse_int64(raw),
                Err(ValueError::InvalidInt(raw.to_string())),
                "{:?}",
                raw
            );
        }
    }

    #[test]
    fn test_bool_or_int_prefers_int() {
        assert_eq!(parse_bool_or_int(Some("1")), Ok(BoolOrInt::Int(1)));
        assert_eq!(parse_bool_or_int(Some("2k")), Ok(BoolOrInt::Int(2048)));
        assert_eq!(parse_bool_or_int(Some("yes")), Ok(BoolOrInt::Bool(true)));
        assert_eq!(parse_bool_or_int(None), Ok(BoolOrInt::Bool(true)));
    }

    #[test]
    fn test_bool_or_int_surfaces_int_error() {
        assert_eq!(
            parse_bool_or_int(Some("sometimes")),
            Err(ValueError::InvalidInt("sometimes".to_string()))
        );
    }

    #[test]
    fn test_path_expansion() {
        let home = Path::new("/home/ada");
        assert_eq!(
            parse_path("~/notes.txt", Some(home)).unwrap(),
            PathBuf::from("/home/ada/notes.txt")
        );
        assert_eq!(parse_path("~", Some(home)).unwrap(), PathBuf::from("/home/ada"));
        assert_eq!(parse_path("/etc/x", None).unwrap(), PathBuf::from("/etc/x"));
        assert_eq!(parse_path("rel/~/x", None).unwrap(), PathBuf::from("rel/~/x"));
    }

    #[test]
    fn test_path_without_home() {
        assert!(matches!(
            parse_path("~/x", None),
            Err(ValueError::InvalidPath { .. })
        ));
        assert!(matches!(
            parse_path("~ada/x", Some(Path::new("/home/ada"))),
            Err(ValueError::InvalidPath { .. })
        ));
    }
}
