//! URL-scoped settings (`section.<url>.name`) for `--get-urlmatch`.
//!
//! A configured URL matches a requested URL when scheme, host and port agree,
//! the configured user (if any) equals the requested user, and the configured
//! path is a prefix of the requested path ending on a `/` boundary. Host
//! labels in the configured URL may be `*`, matching exactly one label.
//!
//! Among several matches the longest configured path wins, then a match that
//! names a user, then the later entry (higher precedence). Entries without a
//! subsection apply to every URL and lose to any URL match.

use std::cmp::Ordering;

use super::entry::Entry;
use super::key::{valid_name, valid_section};
use crate::error::ConfigError;

/// The key argument of `--get-urlmatch`: `section.name` or just `section`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlKey {
    section: String,
    name: Option<String>,
}

impl UrlKey {
    pub fn parse(key: &str) -> Result<Self, ConfigError> {
        let (section, name) = match key.split_once('.') {
            Some((section, name)) => (section, Some(name)),
            None => (key, None),
        };
        if !valid_section(section) || name.is_some_and(|n| !valid_name(n)) {
            return Err(ConfigError::InvalidKey(key.to_string()));
        }
        Ok(Self {
            section: section.to_ascii_lowercase(),
            name: name.map(str::to_ascii_lowercase),
        })
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedUrl {
    scheme: String,
    user: Option<String>,
    host: String,
    port: Option<u16>,
    path: String,
}

impl ParsedUrl {
    fn parse(url: &str) -> Option<Self> {
        let (scheme, rest) = url.split_once("://")?;
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)) {
            return None;
        }

        let (authority, path) = match rest.find('/') {
            Some(at) => (&rest[..at], &rest[at..]),
            None => (rest, "/"),
        };
        let (user, host_port) = match authority.rsplit_once('@') {
            Some((user, host)) => (Some(user.split(':').next().unwrap_or(user)), host),
            None => (None, authority),
        };
        let (host, port) = match host_port.rsplit_once(':') {
            Some((host, port)) if !port.is_empty() => (host, Some(port.parse().ok()?)),
            Some((host, _)) => (host, None),
            None => (host_port, None),
        };
        if host.is_empty() {
            return None;
        }

        let scheme = scheme.to_ascii_lowercase();
        let port = port.or_else(|| default_port(&scheme));
        Some(Self {
            scheme,
            user: user.map(str::to_string),
            host: host.to_ascii_lowercase(),
            port,
            path: path.to_string(),
        })
    }

    /// Match quality of this configured URL against `target`, if it matches.
    fn score(&self, target: &ParsedUrl) -> Option<Score> {
        if self.scheme != target.scheme || self.port != target.port || !host_matches(&self.host, &target.host) {
            return None;
        }
        if let Some(user) = &self.user {
            if target.user.as_deref() != Some(user.as_str()) {
                return None;
            }
        }

        let prefix = self.path.trim_end_matches('/');
        let path_len = if prefix.is_empty() {
            0
        } else {
            let rest = target.path.strip_prefix(prefix)?;
            if !(rest.is_empty() || rest.starts_with('/')) {
                return None;
            }
            prefix.len()
        };

        Some(Score {
            url: true,
            path_len,
            user: self.user.is_some(),
        })
    }
}

fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" => Some(80),
        "https" => Some(443),
        "ssh" => Some(22),
        "git" => Some(9418),
        _ => None,
    }
}

fn host_matches(pattern: &str, host: &str) -> bool {
    let pattern_labels: Vec<&str> = pattern.split('.').collect();
    let host_labels: Vec<&str> = host.split('.').collect();
    pattern_labels.len() == host_labels.len()
        && pattern_labels
            .iter()
            .zip(&host_labels)
            .all(|(p, h)| *p == "*" || p == h)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Score {
    url: bool,
    path_len: usize,
    user: bool,
}

const UNSCOPED: Score = Score {
    url: false,
    path_len: 0,
    user: false,
};

/// Best entry per variable name for `url`, names in order of first
/// appearance. With a named key the result has at most one entry.
pub(crate) fn select<'a>(
    entries: &'a [Entry],
    key: &UrlKey,
    url: &str,
) -> Result<Vec<&'a Entry>, ConfigError> {
    let target = ParsedUrl::parse(url).ok_or_else(|| ConfigError::InvalidUrl(url.to_string()))?;
    let mut best: Vec<(&'a Entry, Score)> = Vec::new();

    for entry in entries {
        if entry.key.section() != key.section() {
            continue;
        }
        if key.name().is_some_and(|n| n != entry.key.name()) {
            continue;
        }

        let score = match entry.key.subsection() {
            None => UNSCOPED,
            Some(sub) => match ParsedUrl::parse(sub).and_then(|p| p.score(&target)) {
                Some(score) => score,
                None => continue,
            },
        };

        match best.iter_mut().find(|(e, _)| e.key.name() == entry.key.name()) {
            Some(slot) => {
                // Later entries win ties.
                if score.cmp(&slot.1) != Ordering::Less {
                    *slot = (entry, score);
                }
            }
            None => best.push((entry, score)),
        }
    }

    Ok(best.into_iter().map(|(entry, _)| entry).collect())
}
