//! Pipeline tests: a scripted provider driven through lookup and note
//! writing, plus the real mappers exercised offline.

use std::fs;
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;

use shelfmark::config::{load_config, BooksProviderConfig, ScreenProviderConfig};
use shelfmark::connector_books::{BooksSource, ImageLinks, Volume, VolumeInfo};
use shelfmark::connector_screen::{ScreenSource, TitleDetail};
use shelfmark::lookup::{run_lookup, LookupOutcome};
use shelfmark::models::{Candidate, NoteFields};
use shelfmark::note::{render_note, write_note};
use shelfmark::prompt::Prompter;
use shelfmark::source::MetadataSource;

// ============ Scripted pipeline pieces ============

struct ScriptedPrompter {
    input: Option<String>,
    pick: Option<usize>,
    seen_options: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    fn new(input: Option<&str>, pick: Option<usize>) -> Self {
        Self {
            input: input.map(str::to_string),
            pick,
            seen_options: Mutex::new(Vec::new()),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&self, _label: &str) -> Option<String> {
        self.input.clone()
    }

    fn choose(&self, _label: &str, options: &[String]) -> Option<usize> {
        self.seen_options.lock().unwrap().extend_from_slice(options);
        self.pick
    }
}

/// A provider backed by a fixed candidate list.
struct CatalogSource {
    hits: Vec<Candidate<String>>,
}

#[async_trait]
impl MetadataSource for CatalogSource {
    type Detail = String;

    fn name(&self) -> &str {
        "catalog"
    }

    fn query_label(&self) -> &str {
        "Title:"
    }

    async fn search(&self, _query: &str) -> Vec<Candidate<String>> {
        self.hits.clone()
    }

    async fn fetch_detail(&self, id: &str) -> Option<String> {
        self.hits
            .iter()
            .find(|hit| hit.id == id)
            .and_then(|hit| hit.detail.clone())
    }

    async fn build_fields(&self, detail: String) -> NoteFields {
        let mut fields = NoteFields::new();
        fields.text("title", detail.clone());
        fields.text("file_name", detail);
        fields
    }
}

// ============ Lookup to note ============

#[tokio::test]
async fn test_lookup_disambiguates_and_writes_note() {
    let source = CatalogSource {
        hits: vec![
            Candidate::with_detail("1", "Dune (1965)", "Dune".to_string()),
            Candidate::with_detail("2", "Dune Messiah (1969)", "Dune Messiah".to_string()),
        ],
    };
    let prompter = ScriptedPrompter::new(Some("dune"), Some(1));

    let outcome = run_lookup(&source, &prompter, None).await;
    let fields = match outcome {
        LookupOutcome::Done(fields) => fields,
        other => panic!("expected Done, got {other:?}"),
    };

    assert_eq!(
        *prompter.seen_options.lock().unwrap(),
        vec!["Dune (1965)".to_string(), "Dune Messiah (1969)".to_string()]
    );

    let tmp = TempDir::new().unwrap();
    let path = write_note(tmp.path(), &fields).unwrap();

    assert_eq!(path, tmp.path().join("Dune Messiah.md"));
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("title: \"Dune Messiah\""));
}

#[tokio::test]
async fn test_lookup_cancelled_when_picker_dismissed() {
    let source = CatalogSource {
        hits: vec![
            Candidate::with_detail("1", "A", "A".to_string()),
            Candidate::with_detail("2", "B", "B".to_string()),
        ],
    };
    let prompter = ScriptedPrompter::new(Some("query"), None);

    let outcome = run_lookup(&source, &prompter, None).await;

    assert!(matches!(outcome, LookupOutcome::Cancelled));
}

// ============ Real mappers, offline ============

#[tokio::test]
async fn test_books_mapper_renders_complete_note() {
    let config = BooksProviderConfig::default();
    let source = BooksSource::new(&config, reqwest::Client::new());

    let volume = Volume {
        id: "abc123".to_string(),
        info: VolumeInfo {
            title: Some("Dune".to_string()),
            authors: vec!["Frank Herbert".to_string()],
            publisher: Some("Chilton Books".to_string()),
            published_date: Some("1965-08-01".to_string()),
            page_count: Some(412),
            categories: vec!["Fiction".to_string()],
            description: Some("Spice, sand, and prophecy.".to_string()),
            image_links: Some(ImageLinks {
                thumbnail: Some("https://example.com/dune.jpg?zoom=1&edge=curl".to_string()),
                small_thumbnail: None,
            }),
            info_link: Some("https://example.com/dune".to_string()),
        },
    };

    let fields = source.build_fields(volume).await;
    let note = render_note(&fields);

    assert_eq!(
        note,
        "---\n\
         title: \"Dune\"\n\
         file_name: \"Dune\"\n\
         authors: [\"Frank Herbert\"]\n\
         authors_display: \"Frank Herbert\"\n\
         publisher: \"Chilton Books\"\n\
         published_date: \"1965-08-01\"\n\
         published_year: \"1965\"\n\
         page_count: 412\n\
         categories: [\"Fiction\"]\n\
         description: \"Spice, sand, and prophecy.\"\n\
         cover_url: \"https://example.com/dune.jpg?zoom=1\"\n\
         info_link: \"https://example.com/dune\"\n\
         ---\n"
    );
}

#[tokio::test]
async fn test_screen_movie_note_keeps_plot_in_body() {
    let config = ScreenProviderConfig {
        api_key: "test-key".to_string(),
    };
    let source = ScreenSource::new(&config, reqwest::Client::new()).unwrap();

    let detail = TitleDetail {
        title: "Arrival".to_string(),
        year: "2016".to_string(),
        released: "11 Nov 2016".to_string(),
        runtime: "116 min".to_string(),
        genre: "Drama, Sci-Fi".to_string(),
        director: "Denis Villeneuve".to_string(),
        writer: "Eric Heisserer, Ted Chiang".to_string(),
        actors: "Amy Adams, Jeremy Renner".to_string(),
        plot: "A linguist works with the military to communicate with alien visitors."
            .to_string(),
        language: "English".to_string(),
        country: "United States".to_string(),
        awards: "Won 1 Oscar.".to_string(),
        poster: "https://example.com/arrival.jpg".to_string(),
        imdb_rating: "7.9".to_string(),
        imdb_id: "tt2543164".to_string(),
        kind: "movie".to_string(),
        total_seasons: "N/A".to_string(),
        response: "True".to_string(),
    };

    let fields = source.build_fields(detail).await;
    let note = render_note(&fields);

    assert!(note.contains("title: \"Arrival\"\n"));
    assert!(note.contains("type_tag: \"movie\"\n"));
    assert!(note.contains("total_seasons: \"\"\n"));
    assert!(note.contains("director: [\"Denis Villeneuve\"]\n"));
    assert!(note.contains("writer_display: \"Eric Heisserer, Ted Chiang\"\n"));
    assert!(note.contains("watchlist: false\n"));
    assert!(!note.contains("## Seasons"));
    assert!(note.ends_with(
        "---\n\nA linguist works with the military to communicate with alien visitors.\n"
    ));
}

// ============ Configuration ============

#[test]
fn test_missing_config_file_uses_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = load_config(&tmp.path().join("nope.toml")).unwrap();

    assert_eq!(config.notes.dir, std::path::PathBuf::from("notes"));
    assert_eq!(config.http.timeout_secs, 30);
    assert!(config.providers.screen.api_key.is_empty());
}

#[test]
fn test_config_file_overrides_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("shelfmark.toml");
    fs::write(
        &path,
        r#"[notes]
dir = "/tmp/vault"

[http]
timeout_secs = 5

[providers.screen]
api_key = "omdb-key"

[providers.games]
client_id = "twitch-id"
client_secret = "twitch-secret"
"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();

    assert_eq!(config.notes.dir, std::path::PathBuf::from("/tmp/vault"));
    assert_eq!(config.http.timeout_secs, 5);
    assert_eq!(config.providers.screen.api_key, "omdb-key");
    assert_eq!(config.providers.games.client_id, "twitch-id");
    assert!(config.providers.books.api_key.is_empty());
}

#[test]
fn test_zero_timeout_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("shelfmark.toml");
    fs::write(&path, "[http]\ntimeout_secs = 0\n").unwrap();

    let error = load_config(&path).unwrap_err().to_string();
    assert!(error.contains("timeout_secs"), "got: {error}");
}

// ============ JSON output ============

#[tokio::test]
async fn test_json_serialization_keeps_mapper_field_order() {
    let config = BooksProviderConfig::default();
    let source = BooksSource::new(&config, reqwest::Client::new());

    let volume = Volume {
        id: "x".to_string(),
        info: VolumeInfo {
            title: Some("Dune".to_string()),
            ..Default::default()
        },
    };

    let fields = source.build_fields(volume).await;
    let json = serde_json::to_string(&fields).unwrap();

    let title = json.find("\"title\"").unwrap();
    let authors = json.find("\"authors\"").unwrap();
    let info_link = json.find("\"info_link\"").unwrap();
    assert!(title < authors && authors < info_link);
}
