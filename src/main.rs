//! # Shelfmark CLI (`shelf`)
//!
//! The `shelf` binary looks up a book, video game, or movie/series in its
//! public catalog and writes the result as a markdown note with YAML
//! front matter. When a query is ambiguous the user picks from a
//! candidate list.
//!
//! ## Usage
//!
//! ```bash
//! shelf --config ./config/shelfmark.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `shelf book [QUERY]` | Look up a book on Google Books |
//! | `shelf game [QUERY]` | Look up a video game on IGDB |
//! | `shelf screen [QUERY]` | Look up a movie or series on OMDb |
//! | `shelf providers` | List providers and their credential status |
//!
//! When `QUERY` is omitted the command prompts for it. A provider-native
//! id (an IGDB numeric id, an IMDb `tt` id) skips search and disambiguation
//! entirely.
//!
//! ## Examples
//!
//! ```bash
//! # Interactive book lookup, note written under [notes].dir
//! shelf book
//!
//! # Non-interactive: direct id, fields printed as JSON on stdout
//! shelf screen tt0903747 --json
//!
//! # Write the note somewhere else
//! shelf game "outer wilds" --out ~/vault/games
//!
//! # Check which providers have credentials configured
//! shelf providers --config ./config/shelfmark.toml
//! ```
//!
//! Exit status is `0` for a written note, a cancelled lookup, and a query
//! with no matches; only setup problems (bad config, missing credentials,
//! failed token exchange) and write failures exit non-zero.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use shelfmark::config::{self, Config};
use shelfmark::connector_books::BooksSource;
use shelfmark::connector_games::GamesSource;
use shelfmark::connector_screen::ScreenSource;
use shelfmark::lookup::{run_lookup, LookupOutcome};
use shelfmark::note;
use shelfmark::prompt::TerminalPrompter;
use shelfmark::providers;

/// Shelfmark — capture book, game, and movie/series metadata as markdown
/// notes.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/shelfmark.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "shelf",
    about = "Shelfmark — capture book, game, and movie/series metadata as markdown notes",
    version,
    long_about = "Shelfmark looks up books (Google Books), video games (IGDB), and movies or \
    series (OMDb) and writes the result as a markdown note with YAML front matter. When a \
    query is ambiguous the user is walked through a picker."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/shelfmark.toml`. Provider credentials, the
    /// notes directory, and HTTP settings are read from this file. A
    /// missing file falls back to defaults.
    #[arg(long, global = true, default_value = "./config/shelfmark.toml")]
    config: PathBuf,

    /// Print the resolved fields as JSON on stdout instead of writing a
    /// note.
    #[arg(long, global = true)]
    json: bool,

    /// Write the note under this directory instead of `[notes].dir`.
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Look up a book on Google Books.
    ///
    /// Works without credentials; an API key in `[providers.books]`
    /// raises the request quota.
    Book {
        /// Title or free-text query. Prompted for when omitted.
        query: Option<String>,
    },

    /// Look up a video game on IGDB.
    ///
    /// Requires `[providers.games]` Twitch credentials; the command
    /// exchanges them for an access token before the first request.
    /// A purely numeric query is treated as an IGDB id.
    Game {
        /// Title, or a numeric IGDB id. Prompted for when omitted.
        query: Option<String>,
    },

    /// Look up a movie or series on OMDb.
    ///
    /// Requires `[providers.screen].api_key`. For a series, the note
    /// gains a per-season episode checklist. A `tt`-prefixed query is
    /// treated as an IMDb id.
    Screen {
        /// Title, or an IMDb id like `tt0120338`. Prompted for when
        /// omitted.
        query: Option<String>,
    },

    /// List providers and their credential status.
    Providers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match &cli.command {
        Commands::Book { query } => {
            let source = BooksSource::new(&cfg.providers.books, cfg.http.client()?);
            let outcome = run_lookup(&source, &TerminalPrompter, query.clone()).await;
            finish(outcome, &cli, &cfg)?;
        }
        Commands::Game { query } => {
            let source = GamesSource::connect(&cfg.providers.games, cfg.http.client()?).await?;
            let outcome = run_lookup(&source, &TerminalPrompter, query.clone()).await;
            finish(outcome, &cli, &cfg)?;
        }
        Commands::Screen { query } => {
            let source = ScreenSource::new(&cfg.providers.screen, cfg.http.client()?)?;
            let outcome = run_lookup(&source, &TerminalPrompter, query.clone()).await;
            finish(outcome, &cli, &cfg)?;
        }
        Commands::Providers => {
            providers::list_providers(&cfg);
        }
    }

    Ok(())
}

/// Report the lookup outcome: write the note (or print JSON), or tell the
/// user why there is nothing to write.
fn finish(outcome: LookupOutcome, cli: &Cli, cfg: &Config) -> anyhow::Result<()> {
    match outcome {
        LookupOutcome::Cancelled => {
            println!("Cancelled.");
        }
        LookupOutcome::NotFound { query } => {
            println!("No results for \"{query}\".");
        }
        LookupOutcome::Done(fields) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&fields)?);
            } else {
                let dir = cli.out.as_ref().unwrap_or(&cfg.notes.dir);
                let path = note::write_note(dir, &fields)?;
                println!("Note written to {}", path.display());
            }
        }
    }
    Ok(())
}
