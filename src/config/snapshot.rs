//! Immutable point-in-time view for read-only commands.
//!
//! A snapshot copies every entry of a layered config once. Later reads
//! never touch the filesystem, so a file rewritten by another process in
//! the middle of a command cannot produce a mixed result.

use std::path::PathBuf;

use regex_lite::Regex;

use super::entry::Entry;
use super::filter::ValueFilter;
use super::key::ConfigKey;
use super::layered::LayeredConfig;
use super::level::Level;
use super::lookup::{self, Multivar};
use super::urlmatch::{self, UrlKey};
use crate::error::ConfigError;

/// A layer that contributed to a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSource {
    pub level: Level,
    pub path: PathBuf,
    /// SHA-256 digest of the file bytes; `None` when the file did not exist.
    pub digest: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    entries: Vec<Entry>,
    sources: Vec<SnapshotSource>,
}

impl Snapshot {
    /// Copy every entry of `config`, lowest precedence first.
    pub fn capture(config: &LayeredConfig) -> Self {
        let sources = config
            .layers()
            .iter()
            .map(|store| SnapshotSource {
                level: store.level(),
                path: store.path().to_path_buf(),
                digest: store.digest().map(str::to_string),
            })
            .collect();

        Self {
            entries: config.entries(),
            sources,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Sources in precedence order.
    pub fn sources(&self) -> &[SnapshotSource] {
        &self.sources
    }

    pub fn get_single(&self, key: &ConfigKey, filter: Option<&ValueFilter>) -> Result<&Entry, ConfigError> {
        lookup::single(&self.entries, key, filter)
    }

    pub fn get_all<'a>(&'a self, key: &'a ConfigKey, filter: Option<&'a ValueFilter>) -> Multivar<'a> {
        Multivar::new(&self.entries, key, filter)
    }

    /// Entries whose `section[.subsection].name` matches `name`.
    pub fn get_regexp<'a>(
        &'a self,
        name: &'a Regex,
        filter: Option<&'a ValueFilter>,
    ) -> impl Iterator<Item = &'a Entry> + 'a {
        lookup::by_name_pattern(&self.entries, name, filter)
    }

    /// Best-matching entries for `url`, one per variable name.
    pub fn get_urlmatch(&self, key: &UrlKey, url: &str) -> Result<Vec<&Entry>, ConfigError> {
        urlmatch::select(&self.entries, key, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LevelStore;
    use std::fs;
    use tempfile::TempDir;

    fn key(k: &str) -> ConfigKey {
        ConfigKey::parse(k).unwrap()
    }

    fn layered(dir: &TempDir) -> LayeredConfig {
        let global = dir.path().join("global");
        let local = dir.path().join("local");
        fs::write(&global, "[user]\n\tname = Global\n[server]\n\thost = a\n").unwrap();
        fs::write(&local, "[server]\n\thost = b\n[http \"https://example.com\"]\n\tproxy = p\n").unwrap();
        LayeredConfig::new(
            vec![
                LevelStore::open(Level::Local, local).unwrap(),
                LevelStore::open(Level::Global, global).unwrap(),
            ],
            Level::Local,
        )
        .unwrap()
    }

    #[test]
    fn test_capture_preserves_precedence_order() {
        let dir = TempDir::new().unwrap();
        let snapshot = Snapshot::capture(&layered(&dir));

        let levels: Vec<Level> = snapshot.sources().iter().map(|s| s.level).collect();
        assert_eq!(levels, vec![Level::Global, Level::Local]);
        assert!(snapshot.sources().iter().all(|s| s.digest.as_ref().is_some_and(|d| d.len() == 64)));
        assert_eq!(snapshot.sources()[0].path, dir.path().join("global"));

        let host = key("server.host");
        let hosts: Vec<&str> = snapshot.get_all(&host, None).map(Entry::raw).collect();
        assert_eq!(hosts, vec!["a", "b"]);
        assert_eq!(snapshot.get_single(&key("server.host"), None).unwrap().raw(), "b");
    }

    #[test]
    fn test_isolated_from_later_writes() {
        let dir = TempDir::new().unwrap();
        let mut config = layered(&dir);
        let snapshot = Snapshot::capture(&config);

        config.set_single(&key("user.name"), "Local").unwrap();
        config.unset_all(&key("server.host"), None).unwrap();
        fs::write(dir.path().join("global"), "[user]\n\tname = Rewritten\n").unwrap();

        assert_eq!(snapshot.get_single(&key("user.name"), None).unwrap().raw(), "Global");
        let host = key("server.host");
        assert_eq!(snapshot.get_all(&host, None).count(), 2);
    }

    #[test]
    fn test_source_digest_tracks_file_contents() {
        let dir = TempDir::new().unwrap();
        let mut config = layered(&dir);
        let before = Snapshot::capture(&config);

        config.set_single(&key("user.email"), "ada@example.com").unwrap();
        let after = Snapshot::capture(&config);

        let digest = |snapshot: &Snapshot, level| {
            snapshot
                .sources()
                .iter()
                .find(|s| s.level == level)
                .and_then(|s| s.digest.clone())
        };
        assert_ne!(digest(&before, Level::Local), digest(&after, Level::Local));
        assert_eq!(digest(&before, Level::Global), digest(&after, Level::Global));

        let missing = LayeredConfig::new(
            vec![LevelStore::empty(Level::App, dir.path().join("absent"))],
            Level::App,
        )
        .unwrap();
        assert_eq!(Snapshot::capture(&missing).sources()[0].digest, None);
    }

    #[test]
    fn test_get_all_is_restartable() {
        let dir = TempDir::new().unwrap();
        let snapshot = Snapshot::capture(&layered(&dir));
        let k = key("server.host");
        let values = snapshot.get_all(&k, None);
        assert_eq!(values.clone().count(), 2);
        assert_eq!(values.count(), 2);
    }

    #[test]
    fn test_get_regexp_and_urlmatch() {
        let dir = TempDir::new().unwrap();
        let snapshot = Snapshot::capture(&layered(&dir));

        let pattern = Regex::new("^(user|server)\\.").unwrap();
        let keys: Vec<String> = snapshot
            .get_regexp(&pattern, None)
            .map(|e| e.key.to_string())
            .collect();
        assert_eq!(keys, vec!["user.name", "server.host", "server.host"]);

        let url_key = UrlKey::parse("http.proxy").unwrap();
        let found = snapshot.get_urlmatch(&url_key, "https://example.com/repo.git").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].raw(), "p");
        assert!(snapshot
            .get_urlmatch(&url_key, "https://other.org/")
            .unwrap()
            .is_empty());
    }
}
