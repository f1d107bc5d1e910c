//! One configuration level backed by one file.
//!
//! Every mutation is applied to a copy of the parsed document and written
//! to a uniquely named temporary file in the same directory, which is then
//! renamed over the target. The in-memory document only changes once the
//! rename succeeded, so a failed write leaves both the file and the store as
//! they were.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use gitconf_file::ConfigDocument;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::debug;

use super::entry::Entry;
use super::filter::{selects, ValueFilter};
use super::key::{ConfigKey, SectionName};
use super::level::Level;
use crate::error::ConfigError;

/// A level and the file behind it.
#[derive(Debug, Clone)]
pub struct LevelStore {
    level: Level,
    path: PathBuf,
    doc: ConfigDocument,
    /// SHA-256 of the file bytes last read or written; `None` while the
    /// file does not exist.
    digest: Option<String>,
}

impl LevelStore {
    /// Open an existing file. A missing file is `NotFound`.
    pub fn open(level: Level, path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(ConfigError::io(path, e)),
        };

        let doc = ConfigDocument::from_bytes(&bytes).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        debug!(level = %level, path = %path.display(), "opened configuration file");

        Ok(Self {
            level,
            path,
            doc,
            digest: Some(digest(&bytes)),
        })
    }

    /// Open a file, treating a missing file as empty. Nothing is created
    /// until a mutation persists.
    pub fn open_or_empty(level: Level, path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        match Self::open(level, path.clone()) {
            Err(ConfigError::NotFound(_)) => Ok(Self::empty(level, path)),
            other => other,
        }
    }

    /// An empty store whose file does not exist yet.
    pub fn empty(level: Level, path: impl Into<PathBuf>) -> Self {
        Self {
            level,
            path: path.into(),
            doc: ConfigDocument::new(),
            digest: None,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// Whether the backing file exists.
    pub fn exists(&self) -> bool {
        self.digest.is_some()
    }

    /// Every entry in file order.
    pub fn entries(&self) -> Vec<Entry> {
        self.doc
            .records()
            .map(|r| Entry {
                key: ConfigKey::from_parts(&r.section, r.subsection.as_deref(), &r.name),
                value: r.value.clone(),
                level: self.level,
            })
            .collect()
    }

    /// Every value of `key` in file order.
    pub fn entries_for(&self, key: &ConfigKey) -> Vec<Entry> {
        self.entries().into_iter().filter(|e| e.key == *key).collect()
    }

    /// Record indices of the values of `key` selected by `filter`.
    fn matching(&self, key: &ConfigKey, filter: Option<&ValueFilter>) -> Vec<usize> {
        self.doc
            .records()
            .enumerate()
            .filter(|(_, r)| {
                ConfigKey::from_parts(&r.section, r.subsection.as_deref(), &r.name) == *key
                    && selects(filter, r.value.as_deref())
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of values of `key` selected by `filter`.
    pub fn count_matching(&self, key: &ConfigKey, filter: Option<&ValueFilter>) -> usize {
        self.matching(key, filter).len()
    }

    /// Add a value after the existing ones.
    pub fn append(&mut self, key: &ConfigKey, value: &str) -> Result<(), ConfigError> {
        let mut doc = self.doc.clone();
        append_to(&mut doc, key, value);
        self.commit(doc)
    }

    /// Replace existing values of `key`.
    ///
    /// Without a filter exactly one value may exist and it is replaced; no
    /// value means the new one is appended, several are `AmbiguousKey`.
    /// With a filter the first selected value is replaced in place and the
    /// other selected values are removed; when nothing is selected the
    /// value is appended. Returns the number of values selected.
    pub fn replace_matching(
        &mut self,
        key: &ConfigKey,
        value: &str,
        filter: Option<&ValueFilter>,
    ) -> Result<usize, ConfigError> {
        let selected = self.matching(key, filter);
        let mut doc = self.doc.clone();

        match (filter, selected.as_slice()) {
            (_, []) => append_to(&mut doc, key, value),
            (None, [only]) => {
                doc.set_value(*only, Some(value));
            }
            (None, _) => return Err(ConfigError::AmbiguousKey(key.to_string())),
            (Some(_), [first, rest @ ..]) => {
                doc.set_value(*first, Some(value));
                for index in rest.iter().rev() {
                    doc.remove(*index);
                }
            }
        }

        self.commit(doc)?;
        Ok(selected.len())
    }

    /// Remove every value of `key` selected by `filter`. Returns the number
    /// removed; the file is not rewritten when that is zero.
    pub fn delete_matching(
        &mut self,
        key: &ConfigKey,
        filter: Option<&ValueFilter>,
    ) -> Result<usize, ConfigError> {
        let selected = self.matching(key, filter);
        if selected.is_empty() {
            return Ok(0);
        }

        let mut doc = self.doc.clone();
        for index in selected.iter().rev() {
            doc.remove(*index);
        }
        self.commit(doc)?;
        Ok(selected.len())
    }

    pub fn delete_all(&mut self, key: &ConfigKey) -> Result<usize, ConfigError> {
        self.delete_matching(key, None)
    }

    /// Rename every `from` section header to `to`. Returns the number of
    /// headers renamed.
    pub fn rename_section(&mut self, from: &SectionName, to: &SectionName) -> Result<usize, ConfigError> {
        let mut doc = self.doc.clone();
        let renamed = doc.rename_section(
            (from.section(), from.subsection()),
            (to.section(), to.subsection()),
        );
        if renamed > 0 {
            self.commit(doc)?;
        }
        Ok(renamed)
    }

    /// Remove every `name` section with its entries. Returns the number of
    /// sections removed.
    pub fn remove_section(&mut self, name: &SectionName) -> Result<usize, ConfigError> {
        let mut doc = self.doc.clone();
        let removed = doc.remove_section(name.section(), name.subsection());
        if removed > 0 {
            self.commit(doc)?;
        }
        Ok(removed)
    }

    fn commit(&mut self, doc: ConfigDocument) -> Result<(), ConfigError> {
        let contents = doc.render();
        self.write_atomically(contents.as_bytes())
            .map_err(|e| ConfigError::io(self.path.clone(), e))?;

        debug!(level = %self.level, path = %self.path.display(), "persisted configuration file");
        self.digest = Some(digest(contents.as_bytes()));
        self.doc = doc;
        Ok(())
    }

    /// Write to a fresh temporary file beside the target, then rename it
    /// over the target. An existing target's permissions carry over.
    fn write_atomically(&self, contents: &[u8]) -> io::Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(contents)?;
        let permissions = match fs::metadata(&self.path) {
            Ok(meta) => meta.permissions(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => new_file_permissions(temp.as_file())?,
            Err(e) => return Err(e),
        };
        temp.as_file().set_permissions(permissions)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Mode for a file created by the first write.
#[cfg(unix)]
fn new_file_permissions(_file: &File) -> io::Result<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions(file: &File) -> io::Result<fs::Permissions> {
    Ok(file.metadata()?.permissions())
}

fn append_to(doc: &mut ConfigDocument, key: &ConfigKey, value: &str) {
    doc.append(key.section(), key.subsection(), key.name(), Some(value));
}

fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
