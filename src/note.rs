//! Markdown note rendering and writing.
//!
//! A note is a YAML front-matter block followed by an optional body.
//! Fields render in insertion order. `Text` values are double-quoted
//! (mappers have already escaped them for that position); every other
//! variant is emitted verbatim, so JSON array literals become YAML flow
//! sequences unchanged.
//!
//! Two well-known fields are body content rather than front matter:
//! `plot_body` (the full, unflattened plot) and `seasons_section` (the
//! season checklist, skipped when it is the `"N/A"` placeholder).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::models::{FieldValue, NoteFields};

/// Fields rendered into the note body instead of the front matter.
const BODY_FIELDS: &[&str] = &["plot_body", "seasons_section"];

/// Render the complete markdown note.
pub fn render_note(fields: &NoteFields) -> String {
    let mut note = String::from("---\n");
    for (name, value) in fields.iter() {
        if BODY_FIELDS.contains(&name) {
            continue;
        }
        note.push_str(&front_matter_line(name, value));
    }
    note.push_str("---\n");

    if let Some(plot) = fields.get("plot_body").and_then(FieldValue::as_text) {
        note.push('\n');
        note.push_str(plot);
        note.push('\n');
    }
    if let Some(section) = fields.get("seasons_section").and_then(FieldValue::as_text) {
        if section != "N/A" {
            note.push_str(section);
        }
    }
    note
}

fn front_matter_line(name: &str, value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) => format!("{name}: \"{s}\"\n"),
        FieldValue::Literal(s) => format!("{name}: {s}\n"),
        FieldValue::Number(n) => format!("{name}: {n}\n"),
        FieldValue::Bool(b) => format!("{name}: {b}\n"),
    }
}

/// Write the note under `dir`, named after the `file_name` field.
///
/// Creates the directory when needed and fails rather than overwrite an
/// existing note.
pub fn write_note(dir: &Path, fields: &NoteFields) -> Result<PathBuf> {
    let name = fields
        .get("file_name")
        .and_then(FieldValue::as_text)
        .context("note fields carry no file_name")?;
    let path = dir.join(format!("{name}.md"));

    fs::create_dir_all(dir)
        .with_context(|| format!("could not create notes directory {}", dir.display()))?;
    if path.exists() {
        bail!("note already exists: {}", path.display());
    }
    fs::write(&path, render_note(fields))
        .with_context(|| format!("could not write note {}", path.display()))?;
    Ok(path)
}
