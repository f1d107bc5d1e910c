//! Precedence levels.

use std::fmt;

/// A configuration level, ordered from lowest to highest precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Machine-wide file (`/etc/gitconfig`).
    System,
    /// `$XDG_CONFIG_HOME/git/config`, optional.
    Xdg,
    /// Per-user file (`~/.gitconfig`).
    Global,
    /// The repository's own `config` file.
    Local,
    /// A file named explicitly with `--file`.
    App,
}

impl Level {
    pub fn name(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Xdg => "xdg",
            Self::Global => "global",
            Self::Local => "local",
            Self::App => "file",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
