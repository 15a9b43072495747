//! End-to-end lookup: obtain a query, resolve it to one record, map the
//! record to note fields.
//!
//! The outcome is a plain enum. Backing out and coming up empty are
//! ordinary results the caller reports neutrally; only setup problems
//! (handled before a source reaches this point) are errors.

use tracing::debug;

use crate::models::NoteFields;
use crate::prompt::Prompter;
use crate::resolve::{resolve_query, Resolution};
use crate::source::MetadataSource;

/// Terminal state of one lookup.
#[derive(Debug)]
pub enum LookupOutcome {
    /// The user backed out: blank query, or ESC at any prompt.
    Cancelled,
    /// The provider had nothing for the query.
    NotFound { query: String },
    /// Mapped fields, ready to render or serialize.
    Done(NoteFields),
}

/// Run one lookup against `source`.
///
/// The query comes from `initial_query` when given (CLI argument),
/// otherwise from the prompter. It is trimmed before use; a blank query
/// cancels without touching the network.
pub async fn run_lookup<S, P>(
    source: &S,
    prompter: &P,
    initial_query: Option<String>,
) -> LookupOutcome
where
    S: MetadataSource,
    P: Prompter,
{
    let query = match initial_query {
        Some(q) => q,
        None => match prompter.input(source.query_label()) {
            Some(q) => q,
            None => return LookupOutcome::Cancelled,
        },
    };
    let query = query.trim().to_string();
    if query.is_empty() {
        debug!(provider = source.name(), "blank query, cancelling");
        return LookupOutcome::Cancelled;
    }

    match resolve_query(source, prompter, &query).await {
        Resolution::Cancelled => LookupOutcome::Cancelled,
        Resolution::NotFound => LookupOutcome::NotFound { query },
        Resolution::Resolved(detail) => {
            LookupOutcome::Done(source.build_fields(detail).await)
        }
    }
}
