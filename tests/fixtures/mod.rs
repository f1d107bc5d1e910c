//! Scratch environment shared by the integration tests.
//!
//! Every level lives inside one temporary directory: a home directory, a
//! working tree with a `.git` directory, and a system file beside them.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use gitconf::command::{run, Action, Intent, Invocation, Outcome};
use gitconf::config::Scope;
use gitconf::{ConfigError, Context, ValueType};
use tempfile::TempDir;

pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        fs::create_dir_all(dir.path().join("home")).expect("create home");
        fs::create_dir_all(dir.path().join("work/.git")).expect("create repository");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn home(&self) -> PathBuf {
        self.root().join("home")
    }

    pub fn work(&self) -> PathBuf {
        self.root().join("work")
    }

    pub fn system_file(&self) -> PathBuf {
        self.root().join("etc/gitconfig")
    }

    pub fn global_file(&self) -> PathBuf {
        self.home().join(".gitconfig")
    }

    pub fn xdg_file(&self) -> PathBuf {
        self.home().join(".config/git/config")
    }

    pub fn local_file(&self) -> PathBuf {
        self.work().join(".git/config")
    }

    pub fn context(&self) -> Context {
        Context::new(self.work())
            .with_home(self.home())
            .with_system_config(self.system_file())
    }

    pub fn write(&self, path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().expect("parent dir")).expect("create parent");
        fs::write(path, contents).expect("write fixture");
    }

    pub fn read(&self, path: &Path) -> String {
        fs::read_to_string(path).expect("read file")
    }

    /// Run one command as the CLI would, returning the outcome and stdout.
    pub fn config(&self, cmd: Cmd<'_>) -> (Result<Outcome, ConfigError>, String) {
        let mut out = Vec::new();
        let result = Intent::from_args(cmd.action, &cmd.args()).and_then(|intent| {
            let invocation = Invocation {
                scope: cmd.scope.clone(),
                value_type: cmd.value_type,
                null: cmd.null,
                intent,
            };
            run(&invocation, &self.context(), &mut out)
        });
        (result, String::from_utf8(out).expect("utf-8 output"))
    }

    /// Run a command that must succeed; returns stdout.
    pub fn ok(&self, cmd: Cmd<'_>) -> String {
        match self.config(cmd) {
            (Ok(Outcome::Done), out) => out,
            (other, out) => panic!("command failed: {:?} (stdout {:?})", other, out),
        }
    }
}

/// A command line in structured form.
#[derive(Clone)]
pub struct Cmd<'a> {
    pub scope: Scope,
    pub value_type: ValueType,
    pub null: bool,
    pub action: Option<Action>,
    pub args: &'a [&'a str],
}

impl<'a> Cmd<'a> {
    pub fn new(action: Option<Action>, args: &'a [&'a str]) -> Self {
        Self {
            scope: Scope::Default,
            value_type: ValueType::Raw,
            null: false,
            action,
            args,
        }
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn typed(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn null(mut self) -> Self {
        self.null = true;
        self
    }

    fn args(&self) -> Vec<String> {
        self.args.iter().map(|s| s.to_string()).collect()
    }
}

/// The bare `config <args>` form.
pub fn bare<'a>(args: &'a [&'a str]) -> Cmd<'a> {
    Cmd::new(None, args)
}

pub fn with<'a>(action: Action, args: &'a [&'a str]) -> Cmd<'a> {
    Cmd::new(Some(action), args)
}
