//! Configuration keys and section names.

use std::fmt;

use crate::error::ConfigError;

/// A validated `section.name` or `section.subsection.name` key.
///
/// Section and name are stored lowercased so that equality is the
/// case-insensitive comparison keys need; the subsection keeps its case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigKey {
    section: String,
    subsection: Option<String>,
    name: String,
}

impl ConfigKey {
    /// Parse a dotted key. The subsection is everything between the first
    /// and the last dot, so it may itself contain dots.
    pub fn parse(key: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidKey(key.to_string());

        let (section, rest) = key.split_once('.').ok_or_else(invalid)?;
        let (subsection, name) = match rest.rsplit_once('.') {
            Some((sub, name)) => (Some(sub), name),
            None => (None, rest),
        };

        if !valid_section(section)
            || !valid_name(name)
            || subsection.is_some_and(|s| s.contains('\n'))
        {
            return Err(invalid());
        }

        Ok(Self::from_parts(section, subsection, name))
    }

    /// Build a key from parts already known to be well formed, such as the
    /// parts of a record read from a file.
    pub fn from_parts(section: &str, subsection: Option<&str>, name: &str) -> Self {
        Self {
            section: section.to_ascii_lowercase(),
            subsection: subsection.map(str::to_string),
            name: name.to_ascii_lowercase(),
        }
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn subsection(&self) -> Option<&str> {
        self.subsection.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subsection {
            Some(sub) => write!(f, "{}.{}.{}", self.section, sub, self.name),
            None => write!(f, "{}.{}", self.section, self.name),
        }
    }
}

/// A `section` or `section.subsection` name, as taken by
/// `--rename-section` and `--remove-section`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionName {
    section: String,
    subsection: Option<String>,
}

impl SectionName {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        let (section, subsection) = match name.split_once('.') {
            Some((section, sub)) => (section, Some(sub)),
            None => (name, None),
        };

        if !valid_section(section) || subsection.is_some_and(|s| s.contains('\n')) {
            return Err(ConfigError::InvalidSection(name.to_string()));
        }

        Ok(Self {
            section: section.to_ascii_lowercase(),
            subsection: subsection.map(str::to_string),
        })
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn subsection(&self) -> Option<&str> {
        self.subsection.as_deref()
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subsection {
            Some(sub) => write!(f, "{}.{}", self.section, sub),
            None => f.write_str(&self.section),
        }
    }
}

pub(crate) fn valid_section(section: &str) -> bool {
    !section.is_empty() && section.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

pub(crate) fn valid_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
