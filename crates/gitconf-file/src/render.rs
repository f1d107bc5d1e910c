//! Text for lines created or rewritten by edits.

pub(crate) fn header_line(section: &str, subsection: Option<&str>) -> String {
    match subsection {
        None => format!("[{}]", section),
        Some(sub) => {
            let mut out = format!("[{} \"", section);
            for c in sub.chars() {
                if c == '"' || c == '\\' {
                    out.push('\\');
                }
                out.push(c);
            }
            out.push_str("\"]");
            out
        }
    }
}

pub(crate) fn entry_line(indent: &str, name: &str, value: Option<&str>) -> String {
    match value {
        None => format!("{}{}", indent, name),
        Some(value) => format!("{}{} = {}", indent, name, quote_value(value)),
    }
}

fn quote_value(value: &str) -> String {
    let needs_quotes = value.starts_with([' ', '\t'])
        || value.ends_with([' ', '\t'])
        || value.contains(['#', ';']);

    let mut out = String::with_capacity(value.len() + 2);
    if needs_quotes {
        out.push('"');
    }
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            _ => out.push(c),
        }
    }
    if needs_quotes {
        out.push('"');
    }
    out
}
