//! Read queries shared by the live layered view and snapshots.
//!
//! Entries are expected in precedence order: lowest level first, file order
//! within a level.

use std::slice;

use regex_lite::Regex;

use super::entry::Entry;
use super::filter::{selects, ValueFilter};
use super::key::ConfigKey;
use crate::error::ConfigError;

/// Lazy sequence of the values of one key.
///
/// Restartable: every call to `get_all` builds a fresh iterator over the
/// same entries.
#[derive(Debug, Clone)]
pub struct Multivar<'a> {
    entries: slice::Iter<'a, Entry>,
    key: &'a ConfigKey,
    filter: Option<&'a ValueFilter>,
}

impl<'a> Multivar<'a> {
    pub(crate) fn new(
        entries: &'a [Entry],
        key: &'a ConfigKey,
        filter: Option<&'a ValueFilter>,
    ) -> Self {
        Self {
            entries: entries.iter(),
            key,
            filter,
        }
    }
}

impl<'a> Iterator for Multivar<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.key;
        let filter = self.filter;
        self.entries
            .find(|e| e.key == *key && selects(filter, e.value.as_deref()))
    }
}

/// The single value of `key` from the highest level that defines it.
///
/// Several matching values within that level are ambiguous.
pub(crate) fn single<'a>(
    entries: &'a [Entry],
    key: &ConfigKey,
    filter: Option<&ValueFilter>,
) -> Result<&'a Entry, ConfigError> {
    let mut top: Option<&Entry> = None;
    let mut count = 0;

    let matching = entries
        .iter()
        .filter(|e| e.key == *key && selects(filter, e.value.as_deref()));
    for entry in matching {
        match top {
            Some(current) if current.level == entry.level => count += 1,
            Some(current) if current.level > entry.level => continue,
            _ => count = 1,
        }
        top = Some(entry);
    }

    match top {
        None => Err(ConfigError::NotFound(key.to_string())),
        Some(_) if count > 1 => Err(ConfigError::AmbiguousKey(key.to_string())),
        Some(entry) => Ok(entry),
    }
}

/// Entries whose canonical key matches `name` and whose value passes `filter`.
pub(crate) fn by_name_pattern<'a>(
    entries: &'a [Entry],
    name: &'a Regex,
    filter: Option<&'a ValueFilter>,
) -> impl Iterator<Item = &'a Entry> + 'a {
    entries.iter().filter(move |e| {
        name.is_match(&e.key.to_string()) && selects(filter, e.value.as_deref())
    })
}
