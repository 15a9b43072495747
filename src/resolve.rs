//! Query resolution.
//!
//! Takes a raw query and narrows it to at most one detail record:
//!
//! ```text
//! query ──direct id?──▶ fetch_detail ──▶ Resolved / NotFound
//!   │
//!   └──▶ search ──0──▶ NotFound
//!           │
//!           ├──1──▶ (embedded detail | fetch_detail)
//!           │
//!           └──N──▶ picker ──ESC──▶ Cancelled
//!                     │
//!                     └──▶ (embedded detail | fetch_detail)
//! ```
//!
//! Cancellation and "nothing matched" are ordinary outcomes here, not
//! errors; callers match on [`Resolution`].

use tracing::debug;

use crate::prompt::Prompter;
use crate::source::MetadataSource;

/// Outcome of resolving one query.
#[derive(Debug)]
pub enum Resolution<D> {
    /// The user backed out of the candidate picker.
    Cancelled,
    /// Nothing matched, or the chosen candidate's record disappeared
    /// between search and fetch.
    NotFound,
    /// Exactly one record, ready for field mapping.
    Resolved(D),
}

/// Resolve `query` against `source`, asking `prompter` to disambiguate
/// when the search returns more than one candidate.
///
/// Direct ids skip the search. A single-candidate search skips the
/// picker. Candidates that already embed their detail record skip the
/// second fetch.
pub async fn resolve_query<S, P>(source: &S, prompter: &P, query: &str) -> Resolution<S::Detail>
where
    S: MetadataSource,
    P: Prompter,
{
    if let Some(id) = source.direct_id(query) {
        debug!(provider = source.name(), id = %id, "direct id lookup, skipping search");
        return match source.fetch_detail(&id).await {
            Some(detail) => Resolution::Resolved(detail),
            None => Resolution::NotFound,
        };
    }

    let mut candidates = source.search(query).await;
    debug!(
        provider = source.name(),
        count = candidates.len(),
        "search finished"
    );
    if candidates.is_empty() {
        return Resolution::NotFound;
    }

    let chosen = if candidates.len() == 1 {
        candidates.remove(0)
    } else {
        let labels: Vec<String> = candidates.iter().map(|c| c.label.clone()).collect();
        match prompter.choose(source.choice_label(), &labels) {
            Some(index) if index < candidates.len() => candidates.remove(index),
            // An out-of-range index can only come from a broken prompter
            // implementation; treat it like backing out.
            _ => return Resolution::Cancelled,
        }
    };

    if let Some(detail) = chosen.detail {
        return Resolution::Resolved(detail);
    }

    match source.fetch_detail(&chosen.id).await {
        Some(detail) => Resolution::Resolved(detail),
        None => Resolution::NotFound,
    }
}
