//! Layered configuration model
//!
//! Settings live in several files, one per level:
//! 1. System (`/etc/gitconfig`)
//! 2. XDG (`~/.config/git/config`)
//! 3. Global (`~/.gitconfig`)
//! 4. Local (`.git/config` of the enclosing repository)
//! 5. App (an explicit `--file`)
//!
//! Later levels take precedence. Each file is a [`LevelStore`]; a
//! [`LayeredConfig`] stacks them and routes writes to one of them; a
//! [`Snapshot`] freezes the stack for read-only commands.

mod entry;
mod filter;
mod key;
mod layered;
mod level;
mod lookup;
mod snapshot;
mod store;
mod urlmatch;

pub use entry::Entry;
pub use filter::ValueFilter;
pub use key::{ConfigKey, SectionName};
pub use layered::{LayeredConfig, Scope};
pub use level::Level;
pub use lookup::Multivar;
pub use snapshot::{Snapshot, SnapshotSource};
pub use store::LevelStore;
pub use urlmatch::UrlKey;
