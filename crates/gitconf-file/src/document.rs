//! In-memory form of one configuration file.

use crate::error::FileError;
use crate::parser;
use crate::render;

/// One `name = value` entry together with the section it sits in.
///
/// `value` is `None` for a bare `name` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub section: String,
    pub subsection: Option<String>,
    pub name: String,
    pub value: Option<String>,
}

impl Record {
    /// Whether this record belongs to the given section.
    ///
    /// Section names compare case-insensitively, subsections exactly.
    pub fn in_section(&self, section: &str, subsection: Option<&str>) -> bool {
        self.section.eq_ignore_ascii_case(section) && self.subsection.as_deref() == subsection
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Header {
    pub section: String,
    pub subsection: Option<String>,
    pub raw: String,
}

impl Header {
    fn matches(&self, section: &str, subsection: Option<&str>) -> bool {
        self.section.eq_ignore_ascii_case(section) && self.subsection.as_deref() == subsection
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EntryLine {
    pub record: Record,
    pub indent: String,
    /// Source text, possibly several physical lines joined by `\n`.
    pub raw: String,
    /// Written on the same line as the header before it, as in
    /// `[core] bare = true`.
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Line {
    Header(Header),
    Entry(EntryLine),
    Verbatim(String),
}

impl Line {
    fn raw(&self) -> &str {
        match self {
            Line::Header(h) => &h.raw,
            Line::Entry(e) => &e.raw,
            Line::Verbatim(s) => s,
        }
    }
}

/// A parsed configuration file.
///
/// Records are addressed by their position among all records in file order,
/// the same order [`ConfigDocument::records`] yields them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    lines: Vec<Line>,
}

impl ConfigDocument {
    /// An empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse file contents.
    pub fn parse(text: &str) -> Result<Self, FileError> {
        Ok(Self {
            lines: parser::parse_lines(text)?,
        })
    }

    /// Parse raw file bytes, which must be UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FileError> {
        let text = std::str::from_utf8(bytes).map_err(|_| FileError::Encoding)?;
        Self::parse(text)
    }

    /// Render back to file contents. Every line ends with `\n`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            out.push_str(line.raw());
            let next_inline = matches!(self.lines.get(i + 1), Some(Line::Entry(e)) if e.inline);
            if !next_inline {
                out.push('\n');
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All records in file order.
    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.lines.iter().filter_map(|line| match line {
            Line::Entry(e) => Some(&e.record),
            _ => None,
        })
    }

    fn line_of_record(&self, index: usize) -> Option<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| matches!(line, Line::Entry(_)))
            .nth(index)
            .map(|(i, _)| i)
    }

    /// Replace the value of the record at `index`, keeping its position,
    /// indentation and name spelling. Returns false if there is no such record.
    pub fn set_value(&mut self, index: usize, value: Option<&str>) -> bool {
        let Some(at) = self.line_of_record(index) else {
            return false;
        };
        if let Line::Entry(entry) = &mut self.lines[at] {
            entry.record.value = value.map(str::to_string);
            entry.raw = render::entry_line(&entry.indent, &entry.record.name, value);
        }
        true
    }

    /// Remove the record at `index`. Returns false if there is no such record.
    pub fn remove(&mut self, index: usize) -> bool {
        match self.line_of_record(index) {
            Some(at) => {
                self.lines.remove(at);
                true
            }
            None => false,
        }
    }

    /// Add a record after the last line of the last matching section, or in
    /// a new section at the end of the file.
    pub fn append(&mut self, section: &str, subsection: Option<&str>, name: &str, value: Option<&str>) {
        let entry = Line::Entry(EntryLine {
            record: Record {
                section: section.to_string(),
                subsection: subsection.map(str::to_string),
                name: name.to_string(),
                value: value.map(str::to_string),
            },
            indent: "\t".to_string(),
            raw: render::entry_line("\t", name, value),
            inline: false,
        });

        let mut insert_at = None;
        let mut in_section = false;
        for (i, line) in self.lines.iter().enumerate() {
            match line {
                Line::Header(h) => {
                    in_section = h.matches(section, subsection);
                    if in_section {
                        insert_at = Some(i + 1);
                    }
                }
                Line::Entry(_) if in_section => insert_at = Some(i + 1),
                _ => {}
            }
        }

        match insert_at {
            Some(at) => self.lines.insert(at, entry),
            None => {
                self.lines.push(Line::Header(Header {
                    section: section.to_string(),
                    subsection: subsection.map(str::to_string),
                    raw: render::header_line(section, subsection),
                }));
                self.lines.push(entry);
            }
        }
    }

    /// Rename every matching section header. Returns the number of headers
    /// renamed.
    pub fn rename_section(
        &mut self,
        from: (&str, Option<&str>),
        to: (&str, Option<&str>),
    ) -> usize {
        let mut renamed = 0;
        let mut in_section = false;
        for line in &mut self.lines {
            match line {
                Line::Header(h) => {
                    in_section = h.matches(from.0, from.1);
                    if in_section {
                        h.section = to.0.to_string();
                        h.subsection = to.1.map(str::to_string);
                        h.raw = render::header_line(to.0, to.1);
                        renamed += 1;
                    }
                }
                Line::Entry(e) if in_section => {
                    e.record.section = to.0.to_string();
                    e.record.subsection = to.1.map(str::to_string);
                }
                _ => {}
            }
        }
        renamed
    }

    /// Remove every matching section header along with everything up to the
    /// next header. Returns the number of headers removed.
    pub fn remove_section(&mut self, section: &str, subsection: Option<&str>) -> usize {
        let mut removed = 0;
        let mut in_section = false;
        self.lines.retain(|line| {
            if let Line::Header(h) = line {
                in_section = h.matches(section, subsection);
                if in_section {
                    removed += 1;
                }
            }
            !in_section
        });
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# global settings
[user]
\tname = Ada
\temail = ada@example.com

[remote \"origin\"]
\turl = git@example.com:repo.git
\tfetch = +refs/heads/*:refs/remotes/origin/*
";

    fn values(doc: &ConfigDocument) -> Vec<(String, Option<String>)> {
        doc.records()
            .map(|r| (r.name.clone(), r.value.clone()))
            .collect()
    }

    #[test]
    fn test_render_is_identity() {
        let doc = ConfigDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.render(), SAMPLE);
    }

    #[test]
    fn test_from_bytes_rejects_invalid_utf8() {
        assert_eq!(
            ConfigDocument::from_bytes(b"[a]\nb = \xff\n"),
            Err(FileError::Encoding)
        );
    }

    #[test]
    fn test_set_value_keeps_position() {
        let mut doc = ConfigDocument::parse(SAMPLE).unwrap();
        assert!(doc.set_value(0, Some("Grace")));
        let rendered = doc.render();
        assert!(rendered.starts_with("# global settings\n[user]\n\tname = Grace\n"));
        assert_eq!(values(&doc)[0], ("name".to_string(), Some("Grace".to_string())));
    }

    #[test]
    fn test_set_value_out_of_range() {
        let mut doc = ConfigDocument::parse(SAMPLE).unwrap();
        assert!(!doc.set_value(9, Some("x")));
        assert!(!doc.remove(9));
    }

    #[test]
    fn test_append_into_existing_section() {
        let mut doc = ConfigDocument::parse(SAMPLE).unwrap();
        doc.append("user", None, "signingkey", Some("ABC"));
        let rendered = doc.render();
        assert!(rendered.contains("\temail = ada@example.com\n\tsigningkey = ABC\n\n[remote"));
    }

    #[test]
    fn test_append_creates_section() {
        let mut doc = ConfigDocument::new();
        doc.append("branch", Some("main"), "remote", Some("origin"));
        assert_eq!(doc.render(), "[branch \"main\"]\n\tremote = origin\n");
    }

    #[test]
    fn test_append_matches_section_case_insensitively() {
        let mut doc = ConfigDocument::parse("[User]\n\tname = Ada\n").unwrap();
        doc.append("user", None, "email", Some("a@b"));
        assert_eq!(doc.render(), "[User]\n\tname = Ada\n\temail = a@b\n");
    }

    #[test]
    fn test_remove_record() {
        let mut doc = ConfigDocument::parse(SAMPLE).unwrap();
        assert!(doc.remove(1));
        assert!(!doc.render().contains("email"));
        assert_eq!(doc.records().count(), 3);
    }

    #[test]
    fn test_rename_section() {
        let mut doc = ConfigDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.rename_section(("remote", Some("origin")), ("remote", Some("upstream"))), 1);
        assert!(doc.render().contains("[remote \"upstream\"]\n"));
        let rec = doc.records().nth(2).unwrap();
        assert_eq!(rec.subsection.as_deref(), Some("upstream"));
    }

    #[test]
    fn test_remove_section() {
        let mut doc = ConfigDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.remove_section("user", None), 1);
        assert_eq!(doc.records().count(), 2);
        assert!(doc.render().starts_with("# global settings\n[remote"));
        assert_eq!(doc.remove_section("user", None), 0);
    }

    #[test]
    fn test_entry_on_header_line() {
        let text = "[core] bare = true\n\tfilemode = false\n[user]name=Ada ; inline\n";
        let mut doc = ConfigDocument::parse(text).unwrap();
        assert_eq!(doc.render(), text);
        assert_eq!(
            values(&doc),
            vec![
                ("bare".to_string(), Some("true".to_string())),
                ("filemode".to_string(), Some("false".to_string())),
                ("name".to_string(), Some("Ada".to_string())),
            ]
        );
        assert_eq!(doc.records().next().unwrap().section, "core");

        doc.set_value(0, Some("false"));
        assert_eq!(doc.render(), "[core] bare = false\n\tfilemode = false\n[user]name=Ada ; inline\n");

        doc.remove(0);
        doc.rename_section(("user", None), ("author", None));
        assert_eq!(doc.render(), "[core]\n\tfilemode = false\n[author]name=Ada ; inline\n");
    }

    #[test]
    fn test_subsection_is_case_sensitive() {
        let mut doc = ConfigDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.remove_section("remote", Some("Origin")), 0);
        assert_eq!(doc.remove_section("REMOTE", Some("origin")), 1);
    }
}
