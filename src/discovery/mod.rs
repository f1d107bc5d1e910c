//! Locating configuration files and the enclosing repository.
//!
//! All environment lookups happen once, in [`Context::from_env`]. The
//! resulting context is handed to everything that needs to find a file, so
//! tests can point every level at a scratch directory.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Level;
use crate::error::ConfigError;

/// Default machine-wide configuration file.
const DEFAULT_SYSTEM_CONFIG: &str = "/etc/gitconfig";

/// Where configuration files live for one invocation.
#[derive(Debug, Clone)]
pub struct Context {
    cwd: PathBuf,
    home: Option<PathBuf>,
    xdg_config_home: Option<PathBuf>,
    system_config: PathBuf,
    global_config: Option<PathBuf>,
    git_dir: Option<PathBuf>,
    no_system: bool,
}

impl Context {
    /// A context rooted at `cwd` with no home directory and the default
    /// system file.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            home: None,
            xdg_config_home: None,
            system_config: PathBuf::from(DEFAULT_SYSTEM_CONFIG),
            global_config: None,
            git_dir: None,
            no_system: false,
        }
    }

    /// Build the context from the process environment.
    ///
    /// - `GIT_CONFIG_SYSTEM`: system file
    /// - `GIT_CONFIG_NOSYSTEM`: skip the system file in the default view
    /// - `GIT_CONFIG_GLOBAL`: global file
    /// - `XDG_CONFIG_HOME`: base of the XDG file
    /// - `GIT_DIR`: repository directory, bypassing discovery
    pub fn from_env() -> Result<Self, ConfigError> {
        let cwd = env::current_dir().map_err(|e| ConfigError::io(".", e))?;
        let var = |name: &str| env::var_os(name).filter(|v| !v.is_empty()).map(PathBuf::from);

        let mut ctx = Self::new(cwd);
        ctx.home = dirs::home_dir();
        ctx.xdg_config_home = var("XDG_CONFIG_HOME");
        if let Some(system) = var("GIT_CONFIG_SYSTEM") {
            ctx.system_config = system;
        }
        ctx.global_config = var("GIT_CONFIG_GLOBAL");
        ctx.git_dir = var("GIT_DIR");
        ctx.no_system = env::var("GIT_CONFIG_NOSYSTEM")
            .ok()
            .is_some_and(|v| gitconf_value::parse_bool(Some(&v)).unwrap_or(false));

        debug!(cwd = %ctx.cwd.display(), home = ?ctx.home, "built discovery context");
        Ok(ctx)
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn with_xdg_config_home(mut self, dir: impl Into<PathBuf>) -> Self {
        self.xdg_config_home = Some(dir.into());
        self
    }

    pub fn with_system_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.system_config = path.into();
        self
    }

    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config = Some(path.into());
        self
    }

    pub fn with_git_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.git_dir = Some(path.into());
        self
    }

    pub fn without_system(mut self) -> Self {
        self.no_system = true;
        self
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Whether the default view includes the system level.
    pub fn uses_system(&self) -> bool {
        !self.no_system
    }

    /// Path backing a level. `App` has no discoverable path.
    pub fn level_path(&self, level: Level) -> Result<Option<PathBuf>, ConfigError> {
        match level {
            Level::System => Ok(Some(self.system_path())),
            Level::Xdg => Ok(self.xdg_path()),
            Level::Global => self.global_path().map(Some),
            Level::Local => self.local_path().map(Some),
            Level::App => Ok(None),
        }
    }

    /// `$GIT_CONFIG_SYSTEM`, else `/etc/gitconfig`.
    pub fn system_path(&self) -> PathBuf {
        self.absolute(&self.system_config)
    }

    /// `$GIT_CONFIG_GLOBAL`, else `~/.gitconfig`.
    pub fn global_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.global_config {
            return Ok(self.absolute(path));
        }
        self.home
            .as_ref()
            .map(|home| home.join(".gitconfig"))
            .ok_or(ConfigError::NoHome)
    }

    /// `$XDG_CONFIG_HOME/git/config`, else `~/.config/git/config`.
    pub fn xdg_path(&self) -> Option<PathBuf> {
        let base = match &self.xdg_config_home {
            Some(dir) => self.absolute(dir),
            None => self.home.as_ref()?.join(".config"),
        };
        Some(base.join("git").join("config"))
    }

    /// The `config` file of the enclosing repository.
    pub fn local_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.discover_repository()?.join("config"))
    }

    /// Find the repository directory enclosing the working directory.
    ///
    /// Each ancestor is checked for a `.git` directory, a `.git` file holding
    /// `gitdir: <path>`, or itself being a bare repository.
    pub fn discover_repository(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.git_dir {
            return Ok(self.absolute(dir));
        }

        for dir in self.cwd.ancestors() {
            let dot_git = dir.join(".git");
            if dot_git.is_dir() {
                return Ok(dot_git);
            }
            if dot_git.is_file() {
                if let Some(target) = read_gitfile(&dot_git) {
                    return Ok(dir.join(target));
                }
            }
            if is_bare_repository(dir) {
                return Ok(dir.to_path_buf());
            }
        }

        Err(ConfigError::NoRepository)
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

fn read_gitfile(path: &Path) -> Option<PathBuf> {
    let contents = fs::read_to_string(path).ok()?;
    let target = contents.lines().next()?.strip_prefix("gitdir:")?.trim();
    (!target.is_empty()).then(|| PathBuf::from(target))
}

fn is_bare_repository(dir: &Path) -> bool {
    dir.join("HEAD").is_file() && dir.join("objects").is_dir() && dir.join("refs").is_dir()
}
