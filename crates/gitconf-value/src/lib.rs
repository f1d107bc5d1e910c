//! Typed coercion rules for configuration values.
//!
//! Values are always stored as raw text. These functions interpret that text
//! as a boolean, a 64-bit integer, a boolean-or-integer, or a filesystem
//! path, and produce the canonical text written back when a typed value is
//! set.

mod error;
mod parse;
mod value_type;

pub use error::ValueError;
pub use parse::{canonical_bool, parse_bool, parse_bool_or_int, parse_int64, parse_path, BoolOrInt};
pub use value_type::ValueType;
