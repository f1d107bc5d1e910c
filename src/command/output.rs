//! Record formatting for command output.

use std::io::{self, Write};

/// Writes records newline- or NUL-terminated.
pub(crate) struct Output<'a> {
    out: &'a mut dyn Write,
    null: bool,
}

impl<'a> Output<'a> {
    pub(crate) fn new(out: &'a mut dyn Write, null: bool) -> Self {
        Self { out, null }
    }

    fn terminator(&self) -> u8 {
        if self.null {
            b'\0'
        } else {
            b'\n'
        }
    }

    /// A bare value, as printed by `--get`.
    pub(crate) fn value(&mut self, value: &str) -> io::Result<()> {
        self.out.write_all(value.as_bytes())?;
        self.out.write_all(&[self.terminator()])
    }

    /// A key with its value. `separator` sits between them unless output is
    /// NUL-terminated, where a newline does. A key without value prints alone.
    pub(crate) fn key_value(&mut self, key: &str, value: Option<&str>, separator: char) -> io::Result<()> {
        self.out.write_all(key.as_bytes())?;
        if let Some(value) = value {
            let separator = if self.null { '\n' } else { separator };
            write!(self.out, "{}{}", separator, value)?;
        }
        self.out.write_all(&[self.terminator()])
    }

    pub(crate) fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(null: bool, f: impl FnOnce(&mut Output<'_>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut Output::new(&mut buf, null)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_lines() {
        assert_eq!(render(false, |o| o.value("Ada")), "Ada\n");
        assert_eq!(render(false, |o| o.key_value("user.name", Some("Ada"), '=')), "user.name=Ada\n");
        assert_eq!(render(false, |o| o.key_value("core.bare", None, ' ')), "core.bare\n");
    }

    #[test]
    fn test_null_terminated() {
        assert_eq!(render(true, |o| o.value("Ada")), "Ada\0");
        assert_eq!(render(true, |o| o.key_value("user.name", Some("Ada"), '=')), "user.name\nAda\0");
        assert_eq!(render(true, |o| o.key_value("core.bare", None, '=')), "core.bare\0");
    }
}
