//! Reader and writer for git-style configuration files.
//!
//! A file is parsed into a [`ConfigDocument`]: an ordered list of section
//! headers, entries and verbatim lines (blank lines and comments). Edits
//! touch only the lines they concern, so rendering a document after an edit
//! keeps the rest of the file byte-for-byte.

mod document;
mod error;
mod parser;
mod render;

pub use document::{ConfigDocument, Record};
pub use error::FileError;
