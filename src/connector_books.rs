//! Google Books provider.
//!
//! Searches the public volumes API and maps a volume into note fields.
//! The search response already contains the full record for every hit, so
//! candidates embed their detail and the resolver never needs a second
//! request.
//!
//! # Configuration
//!
//! ```toml
//! [providers.books]
//! api_key = ""   # optional; anonymous requests work with tighter limits
//! ```
//!
//! # Failure behavior
//!
//! Transport failures, non-success statuses, and undecodable bodies are
//! absorbed: `search` returns no candidates and logs a warning. Nothing in
//! this module aborts an invocation.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::BooksProviderConfig;
use crate::models::{Candidate, NoteFields};
use crate::sanitize::{
    encode_list_literal, first_year, flatten_single_quoted, sanitize_file_name,
};
use crate::source::MetadataSource;

const VOLUMES_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Shown when a volume arrives without a title.
const UNTITLED: &str = "Untitled";

// ============ API response types ============

/// One volume, as returned both by search and by the by-id endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Volume {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "volumeInfo")]
    pub info: VolumeInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub page_count: Option<i64>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_links: Option<ImageLinks>,
    #[serde(default)]
    pub info_link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub small_thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

// ============ Provider ============

pub struct BooksSource {
    client: reqwest::Client,
    api_key: String,
}

impl BooksSource {
    pub fn new(config: &BooksProviderConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            api_key: config.api_key.trim().to_string(),
        }
    }

    /// Send a GET request and decode the JSON body, absorbing failures.
    async fn fetch_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Option<T> {
        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("books: request failed: {e}");
                return None;
            }
        };
        if !response.status().is_success() {
            warn!("books: request returned HTTP {}", response.status());
            return None;
        }
        match response.json::<T>().await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("books: response could not be decoded: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl MetadataSource for BooksSource {
    type Detail = Volume;

    fn name(&self) -> &str {
        "books"
    }

    fn query_label(&self) -> &str {
        "Book title or keywords:"
    }

    fn choice_label(&self) -> &str {
        "Select a book:"
    }

    async fn search(&self, query: &str) -> Vec<Candidate<Volume>> {
        debug!(provider = "books", query, "searching volumes");

        let mut request = self.client.get(VOLUMES_URL).query(&[
            ("q", query),
            ("maxResults", "20"),
            ("printType", "books"),
        ]);
        if !self.api_key.is_empty() {
            request = request.query(&[("key", self.api_key.as_str())]);
        }

        let response: VolumesResponse = match self.fetch_json(request).await {
            Some(r) => r,
            None => return Vec::new(),
        };

        response
            .items
            .into_iter()
            .map(|volume| {
                let label = volume_label(&volume.info);
                Candidate::with_detail(volume.id.clone(), label, volume)
            })
            .collect()
    }

    // The resolver never needs this for books (search hits embed their
    // detail), but a stored volume id still resolves through it.
    async fn fetch_detail(&self, id: &str) -> Option<Volume> {
        debug!(provider = "books", id, "fetching volume");

        let mut request = self.client.get(format!("{VOLUMES_URL}/{id}"));
        if !self.api_key.is_empty() {
            request = request.query(&[("key", self.api_key.as_str())]);
        }
        self.fetch_json(request).await
    }

    async fn build_fields(&self, volume: Volume) -> NoteFields {
        let info = volume.info;
        let title = info.title.as_deref().unwrap_or(UNTITLED);

        let mut fields = NoteFields::new();
        fields.text("title", flatten_single_quoted(title));
        fields.text("file_name", sanitize_file_name(title));
        fields.literal("authors", encode_list_literal(&info.authors));
        fields.text(
            "authors_display",
            if info.authors.is_empty() {
                "N/A".to_string()
            } else {
                info.authors.join(", ")
            },
        );
        fields.text(
            "publisher",
            flatten_single_quoted(info.publisher.as_deref().unwrap_or("")),
        );
        fields.text(
            "published_date",
            info.published_date.clone().unwrap_or_default(),
        );
        fields.text(
            "published_year",
            info.published_date
                .as_deref()
                .and_then(first_year)
                .unwrap_or(""),
        );
        match info.page_count {
            Some(pages) => fields.number("page_count", pages),
            None => fields.text("page_count", ""),
        }
        fields.literal("categories", encode_list_literal(&info.categories));
        fields.text(
            "description",
            flatten_single_quoted(info.description.as_deref().unwrap_or("")),
        );
        fields.text("cover_url", cover_url(info.image_links.as_ref()));
        fields.text("info_link", info.info_link.unwrap_or_default());
        fields
    }
}

/// Picker line: `Title - Author, Author (Year)`.
fn volume_label(info: &VolumeInfo) -> String {
    let title = info.title.as_deref().unwrap_or(UNTITLED);
    let authors = if info.authors.is_empty() {
        "Unknown author".to_string()
    } else {
        info.authors.join(", ")
    };
    let year = info
        .published_date
        .as_deref()
        .and_then(first_year)
        .unwrap_or("N/A");
    format!("{title} - {authors} ({year})")
}

/// Pick the best cover image URL and strip the page-curl effect parameter.
fn cover_url(links: Option<&ImageLinks>) -> String {
    links
        .and_then(|l| {
            l.thumbnail
                .as_deref()
                .filter(|u| !u.is_empty())
                .or(l.small_thumbnail.as_deref())
        })
        .unwrap_or("")
        .replace("&edge=curl", "")
}
