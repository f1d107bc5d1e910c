//! gitconf - layered git-style configuration
//!
//! Reads and edits configuration files in the git format across the
//! system, XDG, global, repository and explicit-file levels, with typed
//! coercion, multi-valued keys and regex value filters.

pub mod command;
pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;

pub use command::{run, Action, Intent, Invocation, Outcome};
pub use config::{ConfigKey, Entry, LayeredConfig, Level, LevelStore, Scope, Snapshot, ValueFilter};
pub use discovery::Context;
pub use error::{ConfigError, Result};
pub use gitconf_value::ValueType;
