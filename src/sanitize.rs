//! Text sanitizing and escaping helpers.
//!
//! Everything produced by the field mappers passes through here before it
//! is considered safe to embed in a note:
//!
//! - file names are stripped of characters that break filesystems or
//!   wiki links
//! - list values are encoded as JSON array literals
//! - free text is flattened for single-line front-matter values
//!
//! All functions are pure and total: they never fail and never touch I/O.

/// Characters stripped from file names. Covers filesystem-reserved
/// characters plus the set that breaks Obsidian-style wiki links and
/// templating (`#`, `%`, `&`, braces, brackets).
const FORBIDDEN_IN_FILE_NAMES: &[char] = &[
    '\\', '/', ':', '"', '*', '?', '<', '>', '|', '#', '%', '&', '{', '}', '[', ']',
];

/// Returned by [`sanitize_file_name`] when nothing printable survives.
const FILE_NAME_FALLBACK: &str = "Untitled";

/// Make a string safe to use as a note file name.
///
/// Strips forbidden characters, then collapses whitespace runs to a
/// single space and trims the ends. Never returns an empty string: if the
/// input is empty or consists entirely of forbidden characters, the
/// fallback `"Untitled"` is returned instead.
pub fn sanitize_file_name(name: &str) -> String {
    let stripped: String = name
        .chars()
        .filter(|c| !FORBIDDEN_IN_FILE_NAMES.contains(c))
        .collect();

    let collapsed = collapse_whitespace(&stripped);
    if collapsed.is_empty() {
        FILE_NAME_FALLBACK.to_string()
    } else {
        collapsed
    }
}

/// Encode a list of values as a JSON array literal, e.g. `["a","b"]`.
///
/// The result is a plain string ready to drop into a front-matter line
/// unquoted. Element quoting and escaping follow JSON rules, so the literal
/// parses back to the original elements. An empty slice encodes as `[]`.
pub fn encode_list_literal<S: AsRef<str>>(items: &[S]) -> String {
    let items: Vec<&str> = items.iter().map(|s| s.as_ref()).collect();
    // Serializing a Vec<&str> cannot fail; fall back to the empty literal
    // anyway so the signature stays total.
    serde_json::to_string(&items).unwrap_or_else(|_| "[]".to_string())
}

/// Flatten free text for a single-quoted-style front-matter value.
///
/// Newline runs become a single space and every double quote is doubled
/// into `''`, so the result can sit inside a quoted scalar without
/// terminating it.
pub fn flatten_single_quoted(text: &str) -> String {
    collapse_newlines(text).replace('"', "''").trim().to_string()
}

/// Flatten free text for a double-quoted front-matter value.
///
/// Newline runs become a single space and every double quote gains a
/// backslash, the escaping convention for `"..."` scalars.
pub fn flatten_double_quoted(text: &str) -> String {
    collapse_newlines(text)
        .replace('"', "\\\"")
        .trim()
        .to_string()
}

/// Extract the first run of four ASCII digits from a date-ish string.
///
/// Handles ISO dates (`2005-07-16` → `2005`), bare years (`2005`), and the
/// free-text ranges OMDb sends for series (`2008–2013` → `2008`). Returns
/// `None` when no four consecutive digits exist.
pub fn first_year(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut run_start = None;
    for (i, b) in bytes.iter().enumerate() {
        if b.is_ascii_digit() {
            let start = *run_start.get_or_insert(i);
            if i - start == 3 {
                return Some(&text[start..=i]);
            }
        } else {
            run_start = None;
        }
    }
    None
}

/// Replace every run of `\r`/`\n` characters with a single space.
fn collapse_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_break = false;
    for c in text.chars() {
        if c == '\r' || c == '\n' {
            if !in_break {
                out.push(' ');
                in_break = true;
            }
        } else {
            out.push(c);
            in_break = false;
        }
    }
    out
}

/// Collapse all whitespace runs to a single space and trim the ends.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
