//! Value filters for multivar selection.

use regex_lite::Regex;

use crate::error::ConfigError;

/// Selects which existing values of a key an operation applies to.
#[derive(Debug, Clone)]
pub enum ValueFilter {
    /// Every value. The default of a bare `--replace-all`.
    MatchAll,
    /// No value at all. `--add` uses it so the new value is always appended.
    MatchNothing,
    Pattern(Regex),
    /// Values the pattern does NOT match, written `!pattern`.
    Negated(Regex),
}

impl ValueFilter {
    /// Parse a user-supplied value pattern. A leading `!` negates it.
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        let compile = |p: &str| {
            Regex::new(p).map_err(|source| ConfigError::InvalidRegex {
                pattern: pattern.to_string(),
                source,
            })
        };

        match pattern.strip_prefix('!') {
            Some(rest) => Ok(Self::Negated(compile(rest)?)),
            None => Ok(Self::Pattern(compile(pattern)?)),
        }
    }

    /// A value-less key is matched as the empty string.
    pub fn matches(&self, value: Option<&str>) -> bool {
        let value = value.unwrap_or_default();
        match self {
            Self::MatchAll => true,
            Self::MatchNothing => false,
            Self::Pattern(re) => re.is_match(value),
            Self::Negated(re) => !re.is_match(value),
        }
    }
}

/// Apply an optional filter; no filter selects everything.
pub(crate) fn selects(filter: Option<&ValueFilter>, value: Option<&str>) -> bool {
    filter.map_or(true, |f| f.matches(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern() {
        let filter = ValueFilter::parse("^a$").unwrap();
        assert!(filter.matches(Some("a")));
        assert!(!filter.matches(Some("ab")));
        assert!(!filter.matches(None));
    }

    #[test]
    fn test_negated_pattern() {
        let filter = ValueFilter::parse("!^a").unwrap();
        assert!(!filter.matches(Some("abc")));
        assert!(filter.matches(Some("b")));
    }

    #[test]
    fn test_fixed_filters() {
        assert!(ValueFilter::MatchAll.matches(Some("anything")));
        assert!(ValueFilter::MatchAll.matches(None));
        assert!(!ValueFilter::MatchNothing.matches(Some("")));
        assert!(!ValueFilter::MatchNothing.matches(None));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            ValueFilter::parse("("),
            Err(ConfigError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn test_no_filter_selects_everything() {
        assert!(selects(None, Some("x")));
        assert!(!selects(Some(&ValueFilter::MatchNothing), Some("x")));
    }
}
