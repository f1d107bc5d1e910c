//! Executing an intent against the configuration levels.

use std::io::Write;

use gitconf_value::ValueType;
use tracing::debug;

use super::intent::Intent;
use super::output::Output;
use crate::config::{ConfigKey, Entry, LayeredConfig, Scope, Snapshot, ValueFilter};
use crate::discovery::Context;
use crate::error::ConfigError;

/// One parsed command line.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub scope: Scope,
    pub value_type: ValueType,
    /// NUL-terminate output records.
    pub null: bool,
    pub intent: Intent,
}

/// How a successful command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// A lookup found nothing; reported by exit status only.
    Missing,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Done => 0,
            Self::Missing => 1,
        }
    }
}

/// Run `invocation`, writing any output to `out`.
///
/// Read-only intents run on a snapshot; write intents change the writable
/// level only.
pub fn run(invocation: &Invocation, ctx: &Context, out: &mut dyn Write) -> Result<Outcome, ConfigError> {
    let mut config = LayeredConfig::open(&invocation.scope, ctx)?;
    debug!(intent = ?invocation.intent, "dispatching");

    if invocation.intent.is_read_only() {
        let snapshot = Snapshot::capture(&config);
        for source in snapshot.sources() {
            debug!(
                level = %source.level,
                path = %source.path.display(),
                digest = source.digest.as_deref().unwrap_or("-"),
                "snapshot source"
            );
        }
        let outcome = match read(invocation, ctx, &snapshot) {
            Ok(Some(records)) => {
                let mut output = Output::new(out, invocation.null);
                for record in &records {
                    record.write(&mut output)?;
                }
                output.flush()?;
                Outcome::Done
            }
            Ok(None) => Outcome::Missing,
            Err(ConfigError::NotFound(_)) if invocation.intent.is_lookup() => Outcome::Missing,
            Err(e) => return Err(e),
        };
        return Ok(outcome);
    }

    write(invocation, &mut config)?;
    Ok(Outcome::Done)
}

/// A line of output.
enum Record {
    Value(String),
    KeyValue {
        key: String,
        value: Option<String>,
        separator: char,
    },
}

impl Record {
    fn write(&self, output: &mut Output<'_>) -> Result<(), ConfigError> {
        match self {
            Self::Value(value) => output.value(value)?,
            Self::KeyValue { key, value, separator } => output.key_value(key, value.as_deref(), *separator)?,
        }
        Ok(())
    }
}

/// Every record to print, formatted up front so a coercion failure prints
/// nothing. `None` when a lookup matched nothing.
fn read(invocation: &Invocation, ctx: &Context, snapshot: &Snapshot) -> Result<Option<Vec<Record>>, ConfigError> {
    let value_type = invocation.value_type;
    let home = ctx.home();

    let value_of = |entry: &Entry| -> Result<String, ConfigError> {
        value_type
            .format(entry.value.as_deref(), home)
            .map_err(|e| ConfigError::value(&entry.key, e))
    };
    // Value-less keys print the key alone unless a type gives them a value.
    let optional_value_of = |entry: &Entry| -> Result<Option<String>, ConfigError> {
        match (value_type, &entry.value) {
            (ValueType::Raw, None) => Ok(None),
            _ => value_of(entry).map(Some),
        }
    };
    let key_value = |entry: &Entry, separator: char| -> Result<Record, ConfigError> {
        Ok(Record::KeyValue {
            key: entry.key.to_string(),
            value: optional_value_of(entry)?,
            separator,
        })
    };

    let records = match &invocation.intent {
        Intent::Get { key, filter } => {
            let entry = snapshot.get_single(key, filter.as_ref())?;
            vec![Record::Value(value_of(entry)?)]
        }
        Intent::GetAll { key, filter } => snapshot
            .get_all(key, filter.as_ref())
            .map(|e| value_of(e).map(Record::Value))
            .collect::<Result<_, _>>()?,
        Intent::GetRegexp { name, filter } => snapshot
            .get_regexp(name, filter.as_ref())
            .map(|e| key_value(e, ' '))
            .collect::<Result<_, _>>()?,
        Intent::GetUrlmatch { key, url } => {
            let entries = snapshot.get_urlmatch(key, url)?;
            match key.name() {
                Some(_) => entries
                    .into_iter()
                    .map(|e| value_of(e).map(Record::Value))
                    .collect::<Result<_, _>>()?,
                None => entries
                    .into_iter()
                    .map(|e| -> Result<Record, ConfigError> {
                        Ok(Record::KeyValue {
                            key: format!("{}.{}", e.key.section(), e.key.name()),
                            value: optional_value_of(e)?,
                            separator: ' ',
                        })
                    })
                    .collect::<Result<_, _>>()?,
            }
        }
        Intent::List => {
            let records = snapshot
                .entries()
                .iter()
                .map(|e| key_value(e, '='))
                .collect::<Result<_, _>>()?;
            return Ok(Some(records));
        }
        _ => return Err(ConfigError::Usage("not a read-only action".to_string())),
    };

    Ok((!records.is_empty()).then_some(records))
}

fn write(invocation: &Invocation, config: &mut LayeredConfig) -> Result<(), ConfigError> {
    let normalize = |key: &ConfigKey, value: &str| -> Result<String, ConfigError> {
        invocation
            .value_type
            .normalize(value)
            .map_err(|e| ConfigError::value(key, e))
    };

    match &invocation.intent {
        Intent::Set { key, value, filter } => {
            let value = normalize(key, value)?;
            match filter {
                Some(filter) => config.set_multivar(key, &value, filter).map(|_| ()),
                None => config.set_single(key, &value),
            }
        }
        Intent::Add { key, value } => {
            let value = normalize(key, value)?;
            config
                .set_multivar(key, &value, &ValueFilter::MatchNothing)
                .map(|_| ())
        }
        Intent::ReplaceAll { key, value, filter } => {
            let value = normalize(key, value)?;
            config.set_multivar(key, &value, filter).map(|_| ())
        }
        Intent::Unset { key, filter } => config.unset(key, filter.as_ref()),
        Intent::UnsetAll { key, filter } => config.unset_all(key, filter.as_ref()).map(|_| ()),
        Intent::RenameSection { from, to } => config.rename_section(from, to),
        Intent::RemoveSection { name } => config.remove_section(name),
        _ => Err(ConfigError::Usage("not a write action".to_string())),
    }
}
