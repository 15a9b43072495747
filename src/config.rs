use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub notes: NotesConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotesConfig {
    /// Directory new notes are written into.
    #[serde(default = "default_notes_dir")]
    pub dir: PathBuf,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            dir: default_notes_dir(),
        }
    }
}

fn default_notes_dir() -> PathBuf {
    PathBuf::from("notes")
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Per-request timeout applied to every provider call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

impl HttpConfig {
    /// Build the HTTP client shared by a provider for one invocation.
    pub fn client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub books: BooksProviderConfig,
    #[serde(default)]
    pub games: GamesProviderConfig,
    #[serde(default)]
    pub screen: ScreenProviderConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BooksProviderConfig {
    /// Google Books API key. Optional: anonymous requests work, with
    /// tighter rate limits.
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GamesProviderConfig {
    /// Twitch application client id (IGDB authenticates through Twitch).
    #[serde(default)]
    pub client_id: String,
    /// Twitch application client secret.
    #[serde(default)]
    pub client_secret: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ScreenProviderConfig {
    /// OMDb API key. Required for the `screen` command.
    #[serde(default)]
    pub api_key: String,
}

/// Load configuration from `path`.
///
/// A missing file is not an error: every setting has a default and the
/// books provider works without credentials. A file that exists but fails
/// to parse or validate is reported.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.http.timeout_secs == 0 {
        anyhow::bail!("http.timeout_secs must be > 0");
    }

    Ok(config)
}
