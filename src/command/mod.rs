//! Command dispatcher
//!
//! Turns parsed command-line flags into an [`Intent`], runs it against the
//! selected levels and prints the result.

mod dispatch;
mod intent;
mod output;

pub use dispatch::{run, Invocation, Outcome};
pub use intent::{Action, Intent};
