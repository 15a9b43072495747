//! IGDB (video games) provider.
//!
//! IGDB authenticates through Twitch: app credentials are exchanged for a
//! bearer token once, at connect time, and the token lives only as long as
//! this source instance. Queries use IGDB's APIcalypse syntax, POSTed as
//! the request body.
//!
//! # Configuration
//!
//! ```toml
//! [providers.games]
//! client_id = "your-twitch-app-client-id"
//! client_secret = "your-twitch-app-client-secret"
//! ```
//!
//! # Failure behavior
//!
//! The token exchange is the one step that escalates: without a token no
//! lookup can work, so a failure there aborts the invocation. Everything
//! after it is absorbed. A failed search yields no candidates, a failed
//! detail fetch yields "not found".

use async_trait::async_trait;
use chrono::{Datelike, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::GamesProviderConfig;
use crate::error::SetupError;
use crate::models::{Candidate, NoteFields};
use crate::sanitize::{encode_list_literal, flatten_single_quoted, sanitize_file_name};
use crate::source::MetadataSource;

const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
const GAMES_URL: &str = "https://api.igdb.com/v4/games";
const COVER_URL_PREFIX: &str = "https://images.igdb.com/igdb/image/upload/t_cover_big";

const SEARCH_FIELDS: &str = "id,name,first_release_date";
const DETAIL_FIELDS: &str = "name,summary,storyline,cover.image_id,first_release_date,\
                             genres.name,platforms.name,involved_companies.company.name,\
                             involved_companies.developer,involved_companies.publisher,\
                             rating,aggregated_rating,url";

// ============ API response types ============

#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// Search hit: just enough for the picker line.
#[derive(Debug, Clone, Deserialize)]
struct GameSummary {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    first_release_date: Option<i64>,
}

/// Full game record requested by `fetch_detail`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameDetail {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub storyline: Option<String>,
    #[serde(default)]
    pub cover: Option<Cover>,
    /// Release date as Unix epoch seconds.
    #[serde(default)]
    pub first_release_date: Option<i64>,
    #[serde(default)]
    pub genres: Vec<Named>,
    #[serde(default)]
    pub platforms: Vec<Named>,
    #[serde(default)]
    pub involved_companies: Vec<InvolvedCompany>,
    /// User rating, 0–100.
    #[serde(default)]
    pub rating: Option<f64>,
    /// Aggregated critic rating, 0–100.
    #[serde(default)]
    pub aggregated_rating: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Cover {
    #[serde(default)]
    pub image_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Named {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvolvedCompany {
    #[serde(default)]
    pub company: Option<Company>,
    #[serde(default)]
    pub developer: bool,
    #[serde(default)]
    pub publisher: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub name: Option<String>,
}

// ============ Provider ============

pub struct GamesSource {
    client: reqwest::Client,
    client_id: String,
    token: String,
}

impl GamesSource {
    /// Exchange app credentials for a bearer token and build the source.
    ///
    /// Blank credentials and a failed exchange both abort: there is no
    /// degraded mode without a token.
    pub async fn connect(
        config: &GamesProviderConfig,
        client: reqwest::Client,
    ) -> Result<Self, SetupError> {
        let client_id = config.client_id.trim();
        let client_secret = config.client_secret.trim();
        if client_id.is_empty() {
            return Err(SetupError::MissingCredential {
                provider: "games",
                key: "client_id",
            });
        }
        if client_secret.is_empty() {
            return Err(SetupError::MissingCredential {
                provider: "games",
                key: "client_secret",
            });
        }

        debug!("games: exchanging credentials for an IGDB token");
        let response = client
            .post(TOKEN_URL)
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: TokenResponse = response.json().await?;
        let token = body
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(SetupError::TokenMissing)?;

        Ok(Self {
            client,
            client_id: client_id.to_string(),
            token,
        })
    }

    /// POST an APIcalypse query and decode the JSON answer, absorbing
    /// failures.
    async fn post_query<T: DeserializeOwned>(&self, body: String) -> Option<T> {
        let response = match self
            .client
            .post(GAMES_URL)
            .header("Client-ID", &self.client_id)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
            .body(body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("games: request failed: {e}");
                return None;
            }
        };
        if !response.status().is_success() {
            warn!("games: request returned HTTP {}", response.status());
            return None;
        }
        match response.json::<T>().await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("games: response could not be decoded: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl MetadataSource for GamesSource {
    type Detail = GameDetail;

    fn name(&self) -> &str {
        "games"
    }

    fn query_label(&self) -> &str {
        "Game title or IGDB id:"
    }

    fn choice_label(&self) -> &str {
        "Select a game:"
    }

    // A purely numeric query is an IGDB game id.
    fn direct_id(&self, query: &str) -> Option<String> {
        if !query.is_empty() && query.bytes().all(|b| b.is_ascii_digit()) {
            Some(query.to_string())
        } else {
            None
        }
    }

    async fn search(&self, query: &str) -> Vec<Candidate<GameDetail>> {
        debug!(provider = "games", query, "searching games");

        let summaries: Vec<GameSummary> = self
            .post_query(search_body(query))
            .await
            .unwrap_or_default();

        summaries
            .into_iter()
            .map(|game| Candidate::new(game.id.to_string(), game_label(&game)))
            .collect()
    }

    async fn fetch_detail(&self, id: &str) -> Option<GameDetail> {
        debug!(provider = "games", id, "fetching game");

        let body = format!("fields {DETAIL_FIELDS}; where id = {id};");
        let mut games: Vec<GameDetail> = self.post_query(body).await?;
        if games.is_empty() {
            return None;
        }
        Some(games.remove(0))
    }

    async fn build_fields(&self, game: GameDetail) -> NoteFields {
        let title = if game.name.is_empty() {
            "Untitled"
        } else {
            game.name.as_str()
        };
        let release = game
            .first_release_date
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single());

        let mut fields = NoteFields::new();
        fields.text("title", flatten_single_quoted(title));
        fields.literal("genres", encode_list_literal(&names(&game.genres)));
        fields.literal("platforms", encode_list_literal(&names(&game.platforms)));
        match release {
            Some(date) => {
                fields.number("year", i64::from(date.year()));
                fields.text("released", date.format("%Y-%m-%d").to_string());
            }
            None => {
                fields.text("year", "");
                fields.text("released", "");
            }
        }
        fields.literal(
            "developers",
            encode_list_literal(&company_names(&game.involved_companies, |c| c.developer)),
        );
        fields.literal(
            "publishers",
            encode_list_literal(&company_names(&game.involved_companies, |c| c.publisher)),
        );
        fields.number("rating", rounded(game.rating));
        fields.number("metacritic", rounded(game.aggregated_rating));
        fields.text("url", game.url.clone().unwrap_or_default());
        fields.text(
            "cover_url",
            game.cover
                .as_ref()
                .and_then(|c| c.image_id.as_deref())
                .map(|image_id| format!("{COVER_URL_PREFIX}/{image_id}.jpg"))
                .unwrap_or_default(),
        );
        let plot = game
            .storyline
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(game.summary.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("No description available.");
        fields.text("plot", flatten_single_quoted(plot));
        fields.text("file_name", sanitize_file_name(title));
        fields
    }
}

/// APIcalypse search query. The user's text is embedded in a quoted
/// string, so quotes and backslashes in it are escaped.
fn search_body(query: &str) -> String {
    let escaped = query.replace('\\', "\\\\").replace('"', "\\\"");
    format!("search \"{escaped}\"; fields {SEARCH_FIELDS}; limit 20;")
}

/// Picker line: `Name (Year)`.
fn game_label(game: &GameSummary) -> String {
    let year = game
        .first_release_date
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
        .map(|date| date.year().to_string())
        .unwrap_or_else(|| "N/A".to_string());
    format!("{} ({year})", game.name)
}

fn names(entries: &[Named]) -> Vec<String> {
    entries
        .iter()
        .map(|e| e.name.clone())
        .filter(|n| !n.is_empty())
        .collect()
}

/// Companies holding the given role, projected onto their names. Entries
/// without a company name are dropped.
fn company_names(
    companies: &[InvolvedCompany],
    role: impl Fn(&InvolvedCompany) -> bool,
) -> Vec<String> {
    companies
        .iter()
        .filter(|c| role(c))
        .filter_map(|c| c.company.as_ref().and_then(|company| company.name.clone()))
        .filter(|name| !name.is_empty())
        .collect()
}

/// IGDB ratings are 0–100 floats; notes want whole numbers, 0 when unrated.
fn rounded(rating: Option<f64>) -> i64 {
    rating.map(|r| r.round() as i64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldValue;

    const DETAIL_FIXTURE: &str = r#"[
        {
            "id": 1942,
            "name": "The Witcher 3: Wild Hunt",
            "summary": "A story-driven open world RPG.",
            "storyline": "Geralt of Rivia hunts \"the Wild Hunt\".",
            "cover": { "id": 89386, "image_id": "co1wyy" },
            "first_release_date": 1431993600,
            "genres": [{ "id": 12, "name": "Role-playing (RPG)" }, { "id": 31, "name": "Adventure" }],
            "platforms": [{ "id": 6, "name": "PC (Microsoft Windows)" }],
            "involved_companies": [
                { "company": { "id": 908, "name": "CD Projekt RED" }, "developer": true, "publisher": false },
                { "company": { "id": 909, "name": "CD Projekt" }, "developer": false, "publisher": true },
                { "company": { "id": 910 }, "developer": true, "publisher": true }
            ],
            "rating": 94.47,
            "aggregated_rating": 91.5,
            "url": "https://www.igdb.com/games/the-witcher-3-wild-hunt"
        }
    ]"#;

    fn fixture_detail() -> GameDetail {
        serde_json::from_str::<Vec<GameDetail>>(DETAIL_FIXTURE)
            .unwrap()
            .remove(0)
    }

    fn offline_source() -> GamesSource {
        GamesSource {
            client: reqwest::Client::new(),
            client_id: "test".to_string(),
            token: "test".to_string(),
        }
    }

    #[test]
    fn test_search_body_escapes_quotes() {
        let body = search_body(r#"the "Wild" hunt"#);
        assert_eq!(
            body,
            r#"search "the \"Wild\" hunt"; fields id,name,first_release_date; limit 20;"#
        );
    }

    #[test]
    fn test_search_body_escapes_backslashes() {
        let body = search_body(r"a\b");
        assert!(body.starts_with(r#"search "a\\b";"#));
    }

    #[test]
    fn test_direct_id_accepts_only_digits() {
        let source = offline_source();
        assert_eq!(source.direct_id("1942"), Some("1942".to_string()));
        assert_eq!(source.direct_id("the witcher"), None);
        assert_eq!(source.direct_id("1942x"), None);
        assert_eq!(source.direct_id(""), None);
    }

    #[test]
    fn test_label_uses_release_year() {
        let summary = GameSummary {
            id: 1942,
            name: "The Witcher 3: Wild Hunt".to_string(),
            first_release_date: Some(1431993600),
        };
        assert_eq!(game_label(&summary), "The Witcher 3: Wild Hunt (2015)");

        let undated = GameSummary {
            id: 7,
            name: "Vaporware".to_string(),
            first_release_date: None,
        };
        assert_eq!(game_label(&undated), "Vaporware (N/A)");
    }

    #[test]
    fn test_company_roles_filtered_and_nameless_dropped() {
        let game = fixture_detail();
        assert_eq!(
            company_names(&game.involved_companies, |c| c.developer),
            vec!["CD Projekt RED"]
        );
        assert_eq!(
            company_names(&game.involved_companies, |c| c.publisher),
            vec!["CD Projekt"]
        );
    }

    #[test]
    fn test_rating_rounds_and_defaults_to_zero() {
        assert_eq!(rounded(Some(94.47)), 94);
        assert_eq!(rounded(Some(91.5)), 92);
        assert_eq!(rounded(None), 0);
    }

    #[tokio::test]
    async fn test_build_fields_full_game() {
        let source = offline_source();
        let fields = source.build_fields(fixture_detail()).await;

        assert_eq!(
            fields.get("title"),
            Some(&FieldValue::Text("The Witcher 3: Wild Hunt".to_string()))
        );
        assert_eq!(
            fields.get("genres"),
            Some(&FieldValue::Literal(
                r#"["Role-playing (RPG)","Adventure"]"#.to_string()
            ))
        );
        assert_eq!(fields.get("year"), Some(&FieldValue::Number(2015)));
        assert_eq!(
            fields.get("released"),
            Some(&FieldValue::Text("2015-05-19".to_string()))
        );
        assert_eq!(fields.get("rating"), Some(&FieldValue::Number(94)));
        assert_eq!(fields.get("metacritic"), Some(&FieldValue::Number(92)));
        assert_eq!(
            fields.get("cover_url"),
            Some(&FieldValue::Text(
                "https://images.igdb.com/igdb/image/upload/t_cover_big/co1wyy.jpg".to_string()
            ))
        );
        // Storyline preferred over summary, quotes doubled
        assert_eq!(
            fields.get("plot"),
            Some(&FieldValue::Text(
                "Geralt of Rivia hunts ''the Wild Hunt''.".to_string()
            ))
        );
        assert_eq!(
            fields.get("file_name"),
            Some(&FieldValue::Text("The Witcher 3 Wild Hunt".to_string()))
        );
    }

    #[tokio::test]
    async fn test_build_fields_sparse_game() {
        let source = offline_source();
        let fields = source.build_fields(GameDetail::default()).await;

        assert_eq!(
            fields.get("title"),
            Some(&FieldValue::Text("Untitled".to_string()))
        );
        assert_eq!(
            fields.get("genres"),
            Some(&FieldValue::Literal("[]".to_string()))
        );
        assert_eq!(fields.get("year"), Some(&FieldValue::Text(String::new())));
        assert_eq!(fields.get("rating"), Some(&FieldValue::Number(0)));
        assert_eq!(
            fields.get("plot"),
            Some(&FieldValue::Text("No description available.".to_string()))
        );
    }

    #[tokio::test]
    async fn test_summary_used_when_storyline_missing() {
        let source = offline_source();
        let game = GameDetail {
            summary: Some("Only a summary.".to_string()),
            storyline: Some(String::new()),
            ..Default::default()
        };

        let fields = source.build_fields(game).await;

        assert_eq!(
            fields.get("plot"),
            Some(&FieldValue::Text("Only a summary.".to_string()))
        );
    }
}
