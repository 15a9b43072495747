//! OMDb (movies and series) provider.
//!
//! One GET per step: search (`?s=`), detail (`?i=&plot=full`), and, for
//! series, one request per season (`?i=&season=N`). OMDb signals "nothing
//! there" in-band with `"Response": "False"` and uses the literal string
//! `"N/A"` for missing values; both are normalized away here.
//!
//! For a series the mapper fans out over all seasons and assembles a
//! markdown checklist:
//!
//! ```text
//! ## Seasons (2)
//! ### Season 1 (7 episodes)
//! - [ ] Episode 1 - Pilot
//! - [ ] Episode 2 - Cat's in the Bag...
//! ---
//! ### Season 2 (episode data unavailable)
//! - [ ] Episode 1
//! ---
//! ```
//!
//! A season that cannot be fetched, or that answers without an episode
//! list, degrades to the placeholder block shown above; it never aborts
//! the lookup or stops later seasons.
//!
//! # Configuration
//!
//! ```toml
//! [providers.screen]
//! api_key = "your-omdb-api-key"   # required
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ScreenProviderConfig;
use crate::error::SetupError;
use crate::models::{Candidate, NoteFields};
use crate::sanitize::{
    encode_list_literal, first_year, flatten_double_quoted, sanitize_file_name,
};
use crate::source::MetadataSource;

const OMDB_URL: &str = "https://www.omdbapi.com/";

/// Shown when OMDb has no usable title.
const UNKNOWN_TITLE: &str = "Unknown Title";

// ============ API response types ============

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default, rename = "Search")]
    search: Vec<SearchHit>,
    #[serde(default, rename = "Response")]
    response: String,
    #[serde(default, rename = "Error")]
    error: String,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default, rename = "Title")]
    title: String,
    #[serde(default, rename = "Year")]
    year: String,
    #[serde(default, rename = "imdbID")]
    imdb_id: String,
    #[serde(default, rename = "Type")]
    kind: String,
}

/// Full OMDb record for one title. Values use OMDb's conventions: plain
/// strings everywhere, `"N/A"` standing in for missing data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleDetail {
    #[serde(default, rename = "Title")]
    pub title: String,
    #[serde(default, rename = "Year")]
    pub year: String,
    #[serde(default, rename = "Released")]
    pub released: String,
    #[serde(default, rename = "Runtime")]
    pub runtime: String,
    #[serde(default, rename = "Genre")]
    pub genre: String,
    #[serde(default, rename = "Director")]
    pub director: String,
    #[serde(default, rename = "Writer")]
    pub writer: String,
    #[serde(default, rename = "Actors")]
    pub actors: String,
    #[serde(default, rename = "Plot")]
    pub plot: String,
    #[serde(default, rename = "Language")]
    pub language: String,
    #[serde(default, rename = "Country")]
    pub country: String,
    #[serde(default, rename = "Awards")]
    pub awards: String,
    #[serde(default, rename = "Poster")]
    pub poster: String,
    #[serde(default, rename = "imdbRating")]
    pub imdb_rating: String,
    #[serde(default, rename = "imdbID")]
    pub imdb_id: String,
    #[serde(default, rename = "Type")]
    pub kind: String,
    #[serde(default, rename = "totalSeasons")]
    pub total_seasons: String,
    /// OMDb envelope status: `"True"` or `"False"`.
    #[serde(default, rename = "Response")]
    pub response: String,
}

/// One season's episode list, as answered by `?i=<id>&season=<n>`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Season {
    /// Season number as reported by OMDb (a string, occasionally absent).
    #[serde(default, rename = "Season")]
    pub number: String,
    /// `None` when the answer carries no `Episodes` key at all; such a
    /// season degrades like a failed fetch. An empty list is a real
    /// zero-episode season.
    #[serde(default, rename = "Episodes")]
    pub episodes: Option<Vec<Episode>>,
    #[serde(default, rename = "Response")]
    pub response: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Episode {
    #[serde(default, rename = "Episode")]
    pub number: String,
    #[serde(default, rename = "Title")]
    pub title: String,
}

// ============ Season capability ============

/// Providers that can enumerate the seasons of a series.
///
/// Split from [`MetadataSource`] so the section assembly can be driven by
/// a scripted stub in tests.
#[async_trait]
pub trait SeasonSource: Send + Sync {
    /// Fetch one season's episode list. `None` covers both an absorbed
    /// transport failure and a season the provider cannot produce.
    async fn fetch_season(&self, series_id: &str, season: i64) -> Option<Season>;
}

// ============ Provider ============

pub struct ScreenSource {
    client: reqwest::Client,
    api_key: String,
}

impl ScreenSource {
    /// Build the source. OMDb refuses unauthenticated requests, so a blank
    /// key aborts here, before any prompt is shown.
    pub fn new(
        config: &ScreenProviderConfig,
        client: reqwest::Client,
    ) -> Result<Self, SetupError> {
        let api_key = config.api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(SetupError::MissingCredential {
                provider: "screen",
                key: "api_key",
            });
        }
        Ok(Self { client, api_key })
    }

    /// GET with the API key plus `params`, decoding the JSON body and
    /// absorbing failures.
    async fn fetch_json<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Option<T> {
        let request = self
            .client
            .get(OMDB_URL)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params);

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("screen: request failed: {e}");
                return None;
            }
        };
        if !response.status().is_success() {
            warn!("screen: request returned HTTP {}", response.status());
            return None;
        }
        match response.json::<T>().await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("screen: response could not be decoded: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl MetadataSource for ScreenSource {
    type Detail = TitleDetail;

    fn name(&self) -> &str {
        "screen"
    }

    fn query_label(&self) -> &str {
        "Movie/series title or IMDb id (e.g. tt0120338):"
    }

    fn choice_label(&self) -> &str {
        "Select a title:"
    }

    // `tt` plus at least seven digits, nothing else. Matched byte-wise so
    // a multi-byte query falls through to search. Passed through as
    // typed; OMDb accepts the id in any case.
    fn direct_id(&self, query: &str) -> Option<String> {
        let bytes = query.as_bytes();
        if bytes.len() >= 9
            && bytes[..2].eq_ignore_ascii_case(b"tt")
            && bytes[2..].iter().all(|b| b.is_ascii_digit())
        {
            Some(query.to_string())
        } else {
            None
        }
    }

    async fn search(&self, query: &str) -> Vec<Candidate<TitleDetail>> {
        debug!(provider = "screen", query, "searching titles");

        let envelope: SearchEnvelope = match self.fetch_json(&[("s", query)]).await {
            Some(e) => e,
            None => return Vec::new(),
        };
        if envelope.response != "True" {
            debug!(provider = "screen", error = %envelope.error, "no search results");
            return Vec::new();
        }

        envelope
            .search
            .into_iter()
            .map(|hit| {
                let label = format!(
                    "{} ({}) - {}",
                    hit.title,
                    hit.year,
                    hit.kind.to_uppercase()
                );
                Candidate::new(hit.imdb_id, label)
            })
            .collect()
    }

    async fn fetch_detail(&self, id: &str) -> Option<TitleDetail> {
        debug!(provider = "screen", id, "fetching title");

        let detail: TitleDetail = self
            .fetch_json(&[("i", id.trim()), ("plot", "full")])
            .await?;
        if detail.response != "True" {
            debug!(provider = "screen", id, "title not found");
            return None;
        }
        Some(detail)
    }

    async fn build_fields(&self, detail: TitleDetail) -> NoteFields {
        map_title_fields(detail, self).await
    }
}

#[async_trait]
impl SeasonSource for ScreenSource {
    async fn fetch_season(&self, series_id: &str, season: i64) -> Option<Season> {
        debug!(provider = "screen", series_id, season, "fetching season");

        let number = season.to_string();
        let record: Season = self
            .fetch_json(&[("i", series_id.trim()), ("season", number.as_str())])
            .await?;
        if record.response != "True" {
            return None;
        }
        Some(record)
    }
}

// ============ Field mapping ============

/// Flatten an OMDb record into note fields, fanning out over seasons for
/// series. Generic over the season capability so tests can script it.
async fn map_title_fields<S: SeasonSource + ?Sized>(
    detail: TitleDetail,
    seasons: &S,
) -> NoteFields {
    let kind = match detail.kind.as_str() {
        "series" => "series",
        "movie" => "movie",
        _ => "other",
    };
    let title = present(&detail.title).unwrap_or(UNKNOWN_TITLE);

    let total_seasons = if kind == "series" {
        present(&detail.total_seasons)
            .and_then(|t| t.parse::<i64>().ok())
            .filter(|n| *n > 0)
    } else {
        None
    };
    let seasons_section = match total_seasons {
        Some(total) => assemble_season_section(seasons, &detail.imdb_id, total).await,
        None => "N/A".to_string(),
    };

    let plot = present(&detail.plot).unwrap_or("No plot available.");

    let mut fields = NoteFields::new();
    fields.text("title", flatten_double_quoted(title));
    fields.text("year", first_year(&detail.year).unwrap_or(""));
    fields.text("released", cleared(&detail.released));
    fields.text("runtime", cleared(&detail.runtime));
    fields.literal("genres", encode_list_literal(&split_list(&detail.genre)));
    fields.literal("director", encode_list_literal(&split_list(&detail.director)));
    fields.literal("writer", encode_list_literal(&split_list(&detail.writer)));
    fields.literal("actors", encode_list_literal(&split_list(&detail.actors)));
    fields.text("genres_display", display_list(&detail.genre));
    fields.text("director_display", display_list(&detail.director));
    fields.text("writer_display", display_list(&detail.writer));
    fields.text("actors_display", display_list(&detail.actors));
    fields.text("plot", flatten_double_quoted(plot));
    fields.literal("plot_body", plot);
    fields.text("language", cleared(&detail.language));
    fields.text("country", cleared(&detail.country));
    fields.text("awards", cleared(&detail.awards));
    fields.text("poster_url", cleared(&detail.poster));
    fields.text("imdb_rating", cleared(&detail.imdb_rating));
    fields.text("imdb_id", detail.imdb_id.clone());
    fields.text("type_tag", kind);
    match total_seasons {
        Some(total) => fields.number("total_seasons", total),
        None => fields.text("total_seasons", ""),
    }
    fields.literal("seasons_section", seasons_section);
    fields.text("file_name", sanitize_file_name(title));
    fields.flag("watching", false);
    fields.flag("dropped", false);
    fields.flag("watchlist", false);
    fields
}

/// Build the season/episode markdown for a series with `total` seasons.
///
/// Seasons are fetched strictly in ascending order, one at a time. A
/// season that cannot be fetched, or that arrives without an episode
/// list, degrades to a placeholder block and later seasons are still
/// fetched.
async fn assemble_season_section<S: SeasonSource + ?Sized>(
    source: &S,
    series_id: &str,
    total: i64,
) -> String {
    let mut section = format!("\n## Seasons ({total})\n");
    for number in 1..=total {
        match source.fetch_season(series_id, number).await {
            Some(Season {
                number: reported,
                episodes: Some(mut episodes),
                ..
            }) => {
                let heading_number = if reported.is_empty() {
                    number.to_string()
                } else {
                    reported
                };
                section.push_str(&format!(
                    "### Season {} ({} episodes)\n",
                    heading_number,
                    episodes.len()
                ));
                episodes.sort_by_key(|e| e.number.trim().parse::<i64>().unwrap_or(0));
                for episode in &episodes {
                    section.push_str(&episode_line(episode));
                }
            }
            _ => {
                warn!(
                    provider = "screen",
                    season = number,
                    "season data unavailable, writing placeholder"
                );
                section.push_str(&format!("### Season {number} (episode data unavailable)\n"));
                section.push_str("- [ ] Episode 1\n");
            }
        }
        section.push_str("---\n");
    }
    section
}

fn episode_line(episode: &Episode) -> String {
    match present(&episode.title) {
        Some(title) => format!("- [ ] Episode {} - {}\n", episode.number, title),
        None => format!("- [ ] Episode {}\n", episode.number),
    }
}

/// `Some` when OMDb actually sent a value; its `"N/A"` placeholder and
/// blank strings count as absent.
fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "N/A" {
        None
    } else {
        Some(trimmed)
    }
}

/// The value with OMDb's `"N/A"` placeholder cleared to empty.
fn cleared(value: &str) -> String {
    present(value).unwrap_or("").to_string()
}

/// Split an OMDb comma-joined credit list into trimmed parts.
fn split_list(value: &str) -> Vec<String> {
    match present(value) {
        Some(v) => v
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        None => Vec::new(),
    }
}

/// Comma-joined display form of a credit list; `"N/A"` when absent.
fn display_list(value: &str) -> String {
    let parts = split_list(value);
    if parts.is_empty() {
        "N/A".to_string()
    } else {
        parts.join(", ")
    }
}
