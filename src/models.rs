//! Core data types shared across the lookup pipeline.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One search hit presented to the user for disambiguation.
///
/// `detail` is filled by providers whose search response already carries
/// the full record (Google Books does this); the resolver then skips the
/// second fetch. Providers that only return summaries leave it `None`.
#[derive(Debug, Clone)]
pub struct Candidate<D> {
    /// Provider-native identifier, usable with `fetch_detail`.
    pub id: String,
    /// Human-readable line shown in the picker, e.g. `"Dune (2021) - MOVIE"`.
    pub label: String,
    /// Full detail record, when the search response already contained it.
    pub detail: Option<D>,
}

impl<D> Candidate<D> {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            detail: None,
        }
    }

    pub fn with_detail(id: impl Into<String>, label: impl Into<String>, detail: D) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            detail: Some(detail),
        }
    }
}

/// A single note field value.
///
/// By the time a value lands here it is already escaped for its embedding
/// position (see [`crate::sanitize`]); the note renderer quotes `Text` and
/// emits every other variant verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Scalar text destined for a quoted front-matter value.
    Text(String),
    /// Pre-encoded content emitted as-is: JSON array literals and
    /// multi-line markdown blocks.
    Literal(String),
    /// Numeric value (ratings, counts, years).
    Number(i64),
    /// Boolean flag (e.g. reading/watching status).
    Bool(bool),
}

impl FieldValue {
    /// The value as text, when it is one of the string variants.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::Literal(s) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) | FieldValue::Literal(s) => serializer.serialize_str(s),
            FieldValue::Number(n) => serializer.serialize_i64(*n),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

/// The canonical fields produced for one note.
///
/// A flat, insertion-ordered name → value map. Insertion order becomes
/// front-matter order in the rendered note, so mappers add fields in the
/// order they want them to appear. Setting an existing name replaces its
/// value without moving it.
#[derive(Debug, Clone, Default)]
pub struct NoteFields {
    fields: Vec<(String, FieldValue)>,
}

impl NoteFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field.
    pub fn set(&mut self, name: &str, value: FieldValue) {
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            self.fields.push((name.to_string(), value));
        }
    }

    pub fn text(&mut self, name: &str, value: impl Into<String>) {
        self.set(name, FieldValue::Text(value.into()));
    }

    pub fn literal(&mut self, name: &str, value: impl Into<String>) {
        self.set(name, FieldValue::Literal(value.into()));
    }

    pub fn number(&mut self, name: &str, value: i64) {
        self.set(name, FieldValue::Number(value));
    }

    pub fn flag(&mut self, name: &str, value: bool) {
        self.set(name, FieldValue::Bool(value));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// Serialized as a JSON object; serializing straight to text keeps the
// field order, which `shelf --json` consumers rely on.
impl Serialize for NoteFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
