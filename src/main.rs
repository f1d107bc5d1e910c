//! gitconf CLI
//!
//! Entry point for the `config` command-line tool.

use clap::error::ErrorKind;
use clap::{ArgGroup, Parser};
use gitconf::command::{run, Action, Intent, Invocation};
use gitconf::config::Scope;
use gitconf::{logging, ConfigError, Context, ValueType};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

const USAGE_HINT: &str = "usage: config [<options>] <key> [<value> [<value-regex>]]";

#[derive(Parser, Debug)]
#[command(name = "config")]
#[command(about = "Get and set layered git-style configuration", version)]
#[command(group(ArgGroup::new("location").args(["local", "global", "system", "file"])))]
#[command(group(ArgGroup::new("type").args(["type_bool", "type_int", "type_bool_or_int", "type_path"])))]
#[command(group(ArgGroup::new("action").args([
    "add", "replace_all", "get", "get_all", "get_regexp", "get_urlmatch",
    "unset", "unset_all", "rename_section", "remove_section", "list",
])))]
struct Cli {
    /// Use the repository config file
    #[arg(long)]
    local: bool,

    /// Use the per-user config file
    #[arg(long)]
    global: bool,

    /// Use the system-wide config file
    #[arg(long)]
    system: bool,

    /// Use the given config file
    #[arg(long, short = 'f', value_name = "FILE")]
    file: Option<PathBuf>,

    /// Value is "true" or "false"
    #[arg(long = "bool")]
    type_bool: bool,

    /// Value is a decimal number, with optional k/m/g suffix
    #[arg(long = "int")]
    type_int: bool,

    /// Value is --bool or --int
    #[arg(long = "bool-or-int")]
    type_bool_or_int: bool,

    /// Value is a path; `~` is expanded on output
    #[arg(long = "path")]
    type_path: bool,

    /// Terminate values with NUL instead of newline
    #[arg(long, short = 'z')]
    null: bool,

    /// Add a new value without altering existing ones: key value
    #[arg(long)]
    add: bool,

    /// Replace all matching values: key value [value-regex]
    #[arg(long)]
    replace_all: bool,

    /// Get the value: key [value-regex]
    #[arg(long)]
    get: bool,

    /// Get all values: key [value-regex]
    #[arg(long)]
    get_all: bool,

    /// Get values for keys matching a regex: name-regex [value-regex]
    #[arg(long)]
    get_regexp: bool,

    /// Get the value best matching a URL: section[.var] URL
    #[arg(long)]
    get_urlmatch: bool,

    /// Remove a variable: key [value-regex]
    #[arg(long)]
    unset: bool,

    /// Remove all matching values: key [value-regex]
    #[arg(long)]
    unset_all: bool,

    /// Rename a section: old-name new-name
    #[arg(long)]
    rename_section: bool,

    /// Remove a section: name
    #[arg(long)]
    remove_section: bool,

    /// List all entries
    #[arg(long, short = 'l')]
    list: bool,

    /// Key, value and value regex, depending on the action
    #[arg(value_name = "ARGS", allow_negative_numbers = true)]
    args: Vec<String>,
}

impl Cli {
    fn scope(&self) -> Scope {
        if self.local {
            Scope::Local
        } else if self.global {
            Scope::Global
        } else if self.system {
            Scope::System
        } else if let Some(path) = &self.file {
            Scope::File(path.clone())
        } else {
            Scope::Default
        }
    }

    fn value_type(&self) -> ValueType {
        if self.type_bool {
            ValueType::Bool
        } else if self.type_int {
            ValueType::Int
        } else if self.type_bool_or_int {
            ValueType::BoolOrInt
        } else if self.type_path {
            ValueType::Path
        } else {
            ValueType::Raw
        }
    }

    fn action(&self) -> Option<Action> {
        [
            (self.add, Action::Add),
            (self.replace_all, Action::ReplaceAll),
            (self.get, Action::Get),
            (self.get_all, Action::GetAll),
            (self.get_regexp, Action::GetRegexp),
            (self.get_urlmatch, Action::GetUrlmatch),
            (self.unset, Action::Unset),
            (self.unset_all, Action::UnsetAll),
            (self.rename_section, Action::RenameSection),
            (self.remove_section, Action::RemoveSection),
            (self.list, Action::List),
        ]
        .into_iter()
        .find_map(|(set, action)| set.then_some(action))
    }

    fn invocation(&self) -> Result<Invocation, ConfigError> {
        Ok(Invocation {
            scope: self.scope(),
            value_type: self.value_type(),
            null: self.null,
            intent: Intent::from_args(self.action(), &self.args)?,
        })
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => process::exit(0),
                _ => process::exit(129),
            }
        }
    };

    logging::init();

    let result = cli
        .invocation()
        .and_then(|invocation| {
            let ctx = Context::from_env()?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let outcome = run(&invocation, &ctx, &mut out)?;
            out.flush()?;
            Ok(outcome)
        });

    match result {
        Ok(outcome) => process::exit(i32::from(outcome.exit_code())),
        Err(e) => {
            eprintln!("error: {}", e);
            if matches!(e, ConfigError::Usage(_)) {
                eprintln!("{}", USAGE_HINT);
            }
            process::exit(i32::from(e.exit_code()));
        }
    }
}
