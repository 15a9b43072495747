//! # Shelfmark
//!
//! Interactive metadata capture for personal media notes.
//!
//! Shelfmark looks up books, video games, and movies/series against their
//! public catalogs (Google Books, IGDB, OMDb) and captures the result as
//! a markdown note with YAML front matter, ready for a personal knowledge
//! base. When a query is ambiguous the user picks from a candidate list.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌─────────────┐
//! │  Prompter  │──▶│   Resolver   │──▶│   Mapper    │
//! │ query/pick │   │ id or search │   │ NoteFields  │
//! └────────────┘   └──────┬───────┘   └──────┬──────┘
//!                         │                  │
//!                  ┌──────┴──────┐    ┌──────┴──────┐
//!                  │  Providers  │    │    Note     │
//!                  │ books/games │    │ markdown or │
//!                  │   /screen   │    │    JSON     │
//!                  └─────────────┘    └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! shelf book "dune"             # look up a book, write notes/Dune.md
//! shelf game 1942               # direct IGDB id, no picker
//! shelf screen tt0903747        # direct IMDb id
//! shelf screen --json "dune"    # print the fields as JSON instead
//! shelf providers               # check configured credentials
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`sanitize`] | Text normalization and escaping |
//! | [`source`] | Provider abstraction |
//! | [`connector_books`] | Google Books provider |
//! | [`connector_games`] | IGDB provider |
//! | [`connector_screen`] | OMDb provider |
//! | [`prompt`] | Interactive terminal prompts |
//! | [`resolve`] | Query resolution and disambiguation |
//! | [`lookup`] | End-to-end lookup pipeline |
//! | [`note`] | Note rendering and writing |
//! | [`providers`] | Provider credential listing |
//! | [`error`] | Setup error taxonomy |

pub mod config;
pub mod connector_books;
pub mod connector_games;
pub mod connector_screen;
pub mod error;
pub mod lookup;
pub mod models;
pub mod note;
pub mod prompt;
pub mod providers;
pub mod resolve;
pub mod sanitize;
pub mod source;
