//! Line parser.
//!
//! Recognized syntax:
//! - `[section]`, `[section "subsection"]` and the legacy `[section.subsection]`
//! - `name = value` and bare `name` (a value-less entry)
//! - `#` and `;` comments, whole-line or trailing
//! - double-quoted value segments, `\n \t \b \" \\` escapes
//! - a trailing `\` continues the value on the next line

use crate::document::{EntryLine, Header, Line, Record};
use crate::error::FileError;

pub(crate) fn parse_lines(text: &str) -> Result<Vec<Line>, FileError> {
    let physical: Vec<&str> = text.lines().collect();
    let mut lines = Vec::new();
    let mut current: Option<(String, Option<String>)> = None;
    let mut i = 0;

    while i < physical.len() {
        let line_no = i + 1;
        let line = physical[i];
        let trimmed = line.trim_start();

        if trimmed.is_empty() || is_comment(trimmed) {
            lines.push(Line::Verbatim(line.to_string()));
            i += 1;
            continue;
        }

        if trimmed.starts_with('[') {
            let (section, subsection, end) = parse_header(trimmed, line_no)?;
            current = Some((section.clone(), subsection.clone()));
            let after = &trimmed[end..];
            let inline = !after.trim_start().is_empty() && !is_comment(after.trim_start());
            let header_len = if inline { line.len() - after.len() } else { line.len() };
            lines.push(Line::Header(Header {
                section: section.clone(),
                subsection: subsection.clone(),
                raw: line[..header_len].to_string(),
            }));
            if inline {
                lines.push(entry_line(after, &physical, &mut i, (section, subsection), true)?);
            } else {
                i += 1;
            }
            continue;
        }

        let Some(section) = &current else {
            return Err(FileError::parse(line_no, "variable outside of any section"));
        };
        lines.push(entry_line(line, &physical, &mut i, section.clone(), false)?);
    }

    Ok(lines)
}

fn is_comment(text: &str) -> bool {
    text.starts_with('#') || text.starts_with(';')
}

/// Parse a `[...]` header. Returns the section, the subsection and the
/// byte offset just past the closing `]`.
fn parse_header(text: &str, line_no: usize) -> Result<(String, Option<String>, usize), FileError> {
    let body = &text[1..];
    let name_len = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '.'))
        .unwrap_or(body.len());
    let name = &body[..name_len];
    if name.is_empty() {
        return Err(FileError::parse(line_no, "empty section name"));
    }

    let mut rest = body[name_len..].trim_start_matches([' ', '\t']);
    let mut subsection = None;

    if let Some(quoted) = rest.strip_prefix('"') {
        if name.contains('.') {
            return Err(FileError::parse(line_no, "dotted section name cannot have a subsection"));
        }
        let mut sub = String::new();
        let mut end = None;
        let mut chars = quoted.char_indices();
        while let Some((idx, c)) = chars.next() {
            match c {
                '"' => {
                    end = Some(idx + 1);
                    break;
                }
                '\\' => match chars.next() {
                    Some((_, escaped)) => sub.push(escaped),
                    None => break,
                },
                _ => sub.push(c),
            }
        }
        let Some(end) = end else {
            return Err(FileError::parse(line_no, "unterminated subsection name"));
        };
        rest = &quoted[end..];
        subsection = Some(sub);
    }

    let Some(after) = rest.strip_prefix(']') else {
        return Err(FileError::parse(line_no, "expected ']' to close section header"));
    };
    let end = text.len() - after.len();

    if subsection.is_none() {
        if let Some((section, sub)) = name.split_once('.') {
            return Ok((section.to_string(), Some(sub.to_ascii_lowercase()), end));
        }
    }
    Ok((name.to_string(), subsection, end))
}

/// Build the entry whose first physical line is `physical[*i]`, starting at
/// `first`, which is that whole line or the text after a header on it.
fn entry_line(
    first: &str,
    physical: &[&str],
    i: &mut usize,
    (section, subsection): (String, Option<String>),
    inline: bool,
) -> Result<Line, FileError> {
    let start = *i;
    let (name, value) = parse_entry(first, physical, i)?;

    let mut raw = first.to_string();
    for continued in &physical[start + 1..*i] {
        raw.push('\n');
        raw.push_str(continued);
    }

    Ok(Line::Entry(EntryLine {
        record: Record {
            section,
            subsection,
            name,
            value,
        },
        indent: first[..first.len() - first.trim_start().len()].to_string(),
        raw,
        inline,
    }))
}

/// Parse the entry whose first line reads `first`, advancing `i` past every
/// physical line it consumed.
fn parse_entry(first: &str, physical: &[&str], i: &mut usize) -> Result<(String, Option<String>), FileError> {
    let line_no = *i + 1;
    let text = first.trim_start();
    *i += 1;

    let name_len = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .unwrap_or(text.len());
    let name = &text[..name_len];
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(FileError::parse(line_no, "invalid variable name"));
    }

    let rest = text[name_len..].trim_start_matches([' ', '\t']);
    if rest.is_empty() || is_comment(rest) {
        return Ok((name.to_string(), None));
    }
    let Some(value_text) = rest.strip_prefix('=') else {
        return Err(FileError::parse(line_no, "expected '=' after variable name"));
    };

    let value = parse_value(value_text, physical, i, line_no)?;
    Ok((name.to_string(), Some(value)))
}

fn parse_value(
    first: &str,
    physical: &[&str],
    i: &mut usize,
    line_no: usize,
) -> Result<String, FileError> {
    let mut out = String::new();
    let mut quoted = false;
    let mut pending_spaces = 0usize;
    let mut current = first;
    let mut current_no = line_no;

    loop {
        let mut chars = current.chars();
        let mut continued = false;

        while let Some(c) = chars.next() {
            match c {
                ' ' | '\t' if !quoted => {
                    if !out.is_empty() {
                        pending_spaces += 1;
                    }
                }
                '#' | ';' if !quoted => break,
                '"' => {
                    flush_spaces(&mut out, &mut pending_spaces);
                    quoted = !quoted;
                }
                '\\' => {
                    let escaped = match chars.next() {
                        None => {
                            continued = true;
                            break;
                        }
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('b') => '\u{8}',
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some(other) => {
                            return Err(FileError::parse(
                                current_no,
                                format!("invalid escape sequence '\\{}'", other),
                            ));
                        }
                    };
                    flush_spaces(&mut out, &mut pending_spaces);
                    out.push(escaped);
                }
                _ => {
                    flush_spaces(&mut out, &mut pending_spaces);
                    out.push(c);
                }
            }
        }

        if !continued {
            break;
        }
        let Some(next) = physical.get(*i) else {
            return Err(FileError::parse(current_no, "line continuation at end of file"));
        };
        current = next;
        *i += 1;
        current_no += 1;
    }

    if quoted {
        return Err(FileError::parse(current_no, "unterminated quoted value"));
    }
    Ok(out)
}

fn flush_spaces(out: &mut String, pending: &mut usize) {
    out.extend(std::iter::repeat(' ').take(*pending));
    *pending = 0;
}
