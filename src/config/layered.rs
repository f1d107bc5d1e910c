//! Several levels composed into one view.
//!
//! Layers are kept in ascending precedence. Reads see every layer; writes
//! go to the one writable layer chosen when the config was opened.

use std::path::PathBuf;

use tracing::{debug, warn};

use super::entry::Entry;
use super::filter::ValueFilter;
use super::key::{ConfigKey, SectionName};
use super::level::Level;
use super::lookup;
use super::store::LevelStore;
use crate::discovery::Context;
use crate::error::ConfigError;

/// Which levels to open, from the `--local/--global/--system/--file` flags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    /// No flag: every level, writing to the repository (or, outside a
    /// repository, to the global file).
    #[default]
    Default,
    System,
    /// The global file, plus the XDG file when it exists.
    Global,
    Local,
    File(PathBuf),
}

/// An ordered stack of level stores with exactly one writable layer.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    layers: Vec<LevelStore>,
    writable: usize,
}

impl LayeredConfig {
    /// Open the levels selected by `scope`.
    pub fn open(scope: &Scope, ctx: &Context) -> Result<Self, ConfigError> {
        let config = match scope {
            Scope::System => Self::single(LevelStore::open_or_empty(Level::System, ctx.system_path())?),
            Scope::Global => Self::open_global(ctx)?,
            Scope::Local => Self::single(LevelStore::open_or_empty(Level::Local, ctx.local_path()?)?),
            Scope::File(path) => Self::single(LevelStore::open_or_empty(Level::App, path.clone())?),
            Scope::Default => Self::open_default(ctx)?,
        };

        debug!(
            scope = ?scope,
            layers = config.layers.len(),
            writable = %config.writable().level(),
            "assembled layered configuration"
        );
        Ok(config)
    }

    /// A config made of one store, which is also the writable one.
    pub fn single(store: LevelStore) -> Self {
        Self {
            layers: vec![store],
            writable: 0,
        }
    }

    /// A config from several stores, writing to the store at `writable`.
    /// Stores are sorted by level.
    pub fn new(mut layers: Vec<LevelStore>, writable: Level) -> Result<Self, ConfigError> {
        layers.sort_by_key(LevelStore::level);
        let writable = layers
            .iter()
            .position(|s| s.level() == writable)
            .ok_or_else(|| ConfigError::NotFound(format!("{} configuration", writable)))?;
        Ok(Self { layers, writable })
    }

    fn open_global(ctx: &Context) -> Result<Self, ConfigError> {
        let global = LevelStore::open_or_empty(Level::Global, ctx.global_path()?)?;
        let xdg = match ctx.xdg_path() {
            Some(path) => optional(Level::Xdg, path)?,
            None => None,
        };

        // An existing XDG file takes writes while the global file is absent.
        let writable = match &xdg {
            Some(_) if !global.exists() => Level::Xdg,
            _ => Level::Global,
        };

        let mut layers = vec![global];
        layers.extend(xdg);
        Self::new(layers, writable)
    }

    fn open_default(ctx: &Context) -> Result<Self, ConfigError> {
        let repository = match ctx.discover_repository() {
            Ok(dir) => Some(dir),
            Err(ConfigError::NoRepository) => None,
            Err(e) => return Err(e),
        };

        let mut layers = Vec::new();
        if ctx.uses_system() {
            layers.extend(optional(Level::System, ctx.system_path())?);
        }
        if let Some(path) = ctx.xdg_path() {
            layers.extend(optional(Level::Xdg, path)?);
        }

        let writable = match repository {
            Some(dir) => {
                match ctx.global_path() {
                    Ok(path) => layers.extend(optional(Level::Global, path)?),
                    Err(ConfigError::NoHome) => warn!("no home directory, skipping global configuration"),
                    Err(e) => return Err(e),
                }
                layers.push(LevelStore::open_or_empty(Level::Local, dir.join("config"))?);
                Level::Local
            }
            None => {
                layers.push(LevelStore::open_or_empty(Level::Global, ctx.global_path()?)?);
                Level::Global
            }
        };

        Self::new(layers, writable)
    }

    /// Layers in ascending precedence.
    pub fn layers(&self) -> &[LevelStore] {
        &self.layers
    }

    pub fn writable(&self) -> &LevelStore {
        &self.layers[self.writable]
    }

    fn writable_mut(&mut self) -> &mut LevelStore {
        &mut self.layers[self.writable]
    }

    /// Every entry of every layer, lowest precedence first.
    pub fn entries(&self) -> Vec<Entry> {
        self.layers.iter().flat_map(LevelStore::entries).collect()
    }

    /// The value of `key` from the highest layer defining it.
    pub fn get_single(&self, key: &ConfigKey, filter: Option<&ValueFilter>) -> Result<Entry, ConfigError> {
        let entries = self.entries();
        lookup::single(&entries, key, filter).cloned()
    }

    /// Every value of `key`, lowest layer first.
    pub fn get_all(&self, key: &ConfigKey, filter: Option<&ValueFilter>) -> Vec<Entry> {
        let entries = self.entries();
        lookup::Multivar::new(&entries, key, filter).cloned().collect()
    }

    /// Set the single value of `key` in the writable layer.
    pub fn set_single(&mut self, key: &ConfigKey, value: &str) -> Result<(), ConfigError> {
        self.writable_mut().replace_matching(key, value, None).map(|_| ())
    }

    /// Replace the values of `key` selected by `filter` in the writable
    /// layer, or append when none is selected.
    pub fn set_multivar(&mut self, key: &ConfigKey, value: &str, filter: &ValueFilter) -> Result<usize, ConfigError> {
        self.writable_mut().replace_matching(key, value, Some(filter))
    }

    /// Remove the one value of `key` selected by `filter`.
    pub fn unset(&mut self, key: &ConfigKey, filter: Option<&ValueFilter>) -> Result<(), ConfigError> {
        match self.writable().count_matching(key, filter) {
            0 => Err(ConfigError::NotFound(key.to_string())),
            1 => self.writable_mut().delete_matching(key, filter).map(|_| ()),
            _ => Err(ConfigError::AmbiguousKey(key.to_string())),
        }
    }

    /// Remove every value of `key` selected by `filter`.
    pub fn unset_all(&mut self, key: &ConfigKey, filter: Option<&ValueFilter>) -> Result<usize, ConfigError> {
        let store = self.writable_mut();
        let removed = match filter {
            Some(_) => store.delete_matching(key, filter)?,
            None => store.delete_all(key)?,
        };
        match removed {
            0 => Err(ConfigError::NotFound(key.to_string())),
            removed => Ok(removed),
        }
    }

    pub fn rename_section(&mut self, from: &SectionName, to: &SectionName) -> Result<(), ConfigError> {
        match self.writable_mut().rename_section(from, to)? {
            0 => Err(ConfigError::NotFound(format!("section {}", from))),
            _ => Ok(()),
        }
    }

    pub fn remove_section(&mut self, name: &SectionName) -> Result<(), ConfigError> {
        match self.writable_mut().remove_section(name)? {
            0 => Err(ConfigError::NotFound(format!("section {}", name))),
            _ => Ok(()),
        }
    }
}

/// Open a level whose file may legitimately be absent. An unreadable file
/// is skipped with a warning; a malformed one is still an error.
fn optional(level: Level, path: PathBuf) -> Result<Option<LevelStore>, ConfigError> {
    match LevelStore::open(level, path) {
        Ok(store) => Ok(Some(store)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(ConfigError::Io { path, source }) => {
            warn!(level = %level, path = %path.display(), error = %source, "skipping unreadable configuration file");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
