//! Provider abstraction.
//!
//! Every metadata provider implements [`MetadataSource`]: recognize a
//! direct id in the query, search for candidates, fetch a full record,
//! and flatten that record into note fields. The resolver and the
//! orchestrator are written against this trait only, so a scripted stub
//! can drive them in tests.
//!
//! The associated `Detail` type is the provider's own deserialized record
//! (a Google Books volume, an IGDB game, an OMDb title). Nothing outside
//! the provider inspects it; it only travels from `search`/`fetch_detail`
//! into `build_fields`.

use async_trait::async_trait;

use crate::models::{Candidate, NoteFields};

#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// The provider's full record for one item.
    type Detail: Send + 'static;

    /// Provider name used in logs and messages (e.g. `"books"`).
    fn name(&self) -> &str;

    /// Label shown when prompting for a query, e.g. `"Book title or keywords:"`.
    fn query_label(&self) -> &str;

    /// Title of the disambiguation picker, e.g. `"Select a book:"`.
    fn choice_label(&self) -> &str {
        "Select a result:"
    }

    /// Recognize a provider-native identifier in the raw query.
    ///
    /// When this returns `Some`, the resolver skips the search and fetches
    /// the record directly. Providers without a direct-id syntax keep the
    /// default.
    fn direct_id(&self, query: &str) -> Option<String> {
        let _ = query;
        None
    }

    /// Search for candidates matching `query`, in provider ranking order.
    ///
    /// Transport and decoding failures are absorbed: the result is empty
    /// and a warning is logged.
    async fn search(&self, query: &str) -> Vec<Candidate<Self::Detail>>;

    /// Fetch the full record behind a candidate id.
    ///
    /// `None` covers both "no such record" and an absorbed transport
    /// failure.
    async fn fetch_detail(&self, id: &str) -> Option<Self::Detail>;

    /// Flatten a detail record into canonical note fields.
    ///
    /// Async because some providers fetch more data while mapping (season
    /// lists for series).
    async fn build_fields(&self, detail: Self::Detail) -> NoteFields;
}
