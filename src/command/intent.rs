//! What a command line asks for.
//!
//! The action flag picks an [`Action`]; the positional arguments are then
//! checked against its arity and parsed once into an [`Intent`].

use std::fmt;
use std::ops::RangeInclusive;

use regex_lite::Regex;

use crate::config::{ConfigKey, SectionName, UrlKey, ValueFilter};
use crate::error::ConfigError;

/// An action flag, or `Set` for the bare `<key> <value>` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Get,
    GetAll,
    GetRegexp,
    GetUrlmatch,
    Set,
    Add,
    ReplaceAll,
    Unset,
    UnsetAll,
    RenameSection,
    RemoveSection,
    List,
}

impl Action {
    /// Accepted number of positional arguments.
    pub fn arity(self) -> RangeInclusive<usize> {
        match self {
            Self::Get | Self::GetAll | Self::GetRegexp | Self::Unset | Self::UnsetAll => 1..=2,
            Self::GetUrlmatch | Self::Add | Self::RenameSection => 2..=2,
            Self::Set | Self::ReplaceAll => 2..=3,
            Self::RemoveSection => 1..=1,
            Self::List => 0..=0,
        }
    }

    fn check_arity(self, count: usize) -> Result<(), ConfigError> {
        let arity = self.arity();
        if arity.contains(&count) {
            return Ok(());
        }
        let expected = if arity.start() == arity.end() {
            format!("should be {}", arity.start())
        } else {
            format!("should be from {} to {}", arity.start(), arity.end())
        };
        Err(ConfigError::Usage(format!(
            "wrong number of arguments for {}, {}",
            self, expected
        )))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "--get",
            Self::GetAll => "--get-all",
            Self::GetRegexp => "--get-regexp",
            Self::GetUrlmatch => "--get-urlmatch",
            Self::Set => "set",
            Self::Add => "--add",
            Self::ReplaceAll => "--replace-all",
            Self::Unset => "--unset",
            Self::UnsetAll => "--unset-all",
            Self::RenameSection => "--rename-section",
            Self::RemoveSection => "--remove-section",
            Self::List => "--list",
        };
        f.write_str(name)
    }
}

/// A fully parsed request.
#[derive(Debug, Clone)]
pub enum Intent {
    Get {
        key: ConfigKey,
        filter: Option<ValueFilter>,
    },
    GetAll {
        key: ConfigKey,
        filter: Option<ValueFilter>,
    },
    GetRegexp {
        name: Regex,
        filter: Option<ValueFilter>,
    },
    GetUrlmatch {
        key: UrlKey,
        url: String,
    },
    /// Set the single value, or with a filter the values it selects.
    Set {
        key: ConfigKey,
        value: String,
        filter: Option<ValueFilter>,
    },
    Add {
        key: ConfigKey,
        value: String,
    },
    ReplaceAll {
        key: ConfigKey,
        value: String,
        filter: ValueFilter,
    },
    Unset {
        key: ConfigKey,
        filter: Option<ValueFilter>,
    },
    UnsetAll {
        key: ConfigKey,
        filter: Option<ValueFilter>,
    },
    RenameSection {
        from: SectionName,
        to: SectionName,
    },
    RemoveSection {
        name: SectionName,
    },
    List,
}

impl Intent {
    /// Build an intent from an action flag and the positional arguments.
    ///
    /// Without a flag, one argument reads the key and two or three set it.
    pub fn from_args(action: Option<Action>, args: &[String]) -> Result<Self, ConfigError> {
        let action = match action {
            Some(action) => action,
            None if args.len() == 1 => Action::Get,
            None if args.is_empty() => {
                return Err(ConfigError::Usage("no action specified".to_string()));
            }
            None => Action::Set,
        };
        action.check_arity(args.len())?;

        let arg = |i: usize| args.get(i).map(String::as_str);
        let key = || ConfigKey::parse(&args[0]);
        let filter = |i: usize| arg(i).map(ValueFilter::parse).transpose();

        let intent = match action {
            Action::Get => Self::Get {
                key: key()?,
                filter: filter(1)?,
            },
            Action::GetAll => Self::GetAll {
                key: key()?,
                filter: filter(1)?,
            },
            Action::GetRegexp => Self::GetRegexp {
                name: Regex::new(&args[0]).map_err(|source| ConfigError::InvalidRegex {
                    pattern: args[0].clone(),
                    source,
                })?,
                filter: filter(1)?,
            },
            Action::GetUrlmatch => Self::GetUrlmatch {
                key: UrlKey::parse(&args[0])?,
                url: args[1].clone(),
            },
            Action::Set => Self::Set {
                key: key()?,
                value: args[1].clone(),
                filter: filter(2)?,
            },
            Action::Add => Self::Add {
                key: key()?,
                value: args[1].clone(),
            },
            Action::ReplaceAll => Self::ReplaceAll {
                key: key()?,
                value: args[1].clone(),
                filter: filter(2)?.unwrap_or(ValueFilter::MatchAll),
            },
            Action::Unset => Self::Unset {
                key: key()?,
                filter: filter(1)?,
            },
            Action::UnsetAll => Self::UnsetAll {
                key: key()?,
                filter: filter(1)?,
            },
            Action::RenameSection => Self::RenameSection {
                from: SectionName::parse(&args[0])?,
                to: SectionName::parse(&args[1])?,
            },
            Action::RemoveSection => Self::RemoveSection {
                name: SectionName::parse(&args[0])?,
            },
            Action::List => Self::List,
        };
        Ok(intent)
    }

    /// Whether the intent only reads, and so runs on a snapshot.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Self::Get { .. } | Self::GetAll { .. } | Self::GetRegexp { .. } | Self::GetUrlmatch { .. } | Self::List
        )
    }

    /// Whether a missing key is reported by exit status alone.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            Self::Get { .. } | Self::GetAll { .. } | Self::GetRegexp { .. } | Self::GetUrlmatch { .. }
        )
    }
}
