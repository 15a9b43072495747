use crate::config::Config;

/// Print each provider with its credential status.
///
/// Useful for verifying configuration before running a lookup. No network
/// calls are made; this only inspects the loaded config.
pub fn list_providers(config: &Config) {
    println!("{:<10} {:<10} NOTES", "PROVIDER", "KEYS");

    let books = if config.providers.books.api_key.trim().is_empty() {
        ("NOT SET", "optional; anonymous requests have tighter quotas")
    } else {
        ("SET", "")
    };
    println!("{:<10} {:<10} {}", "books", books.0, books.1);

    let games_configured = !config.providers.games.client_id.trim().is_empty()
        && !config.providers.games.client_secret.trim().is_empty();
    let games = if games_configured {
        ("SET", "")
    } else {
        ("NOT SET", "client_id and client_secret are required")
    };
    println!("{:<10} {:<10} {}", "games", games.0, games.1);

    let screen = if config.providers.screen.api_key.trim().is_empty() {
        ("NOT SET", "api_key is required")
    } else {
        ("SET", "")
    };
    println!("{:<10} {:<10} {}", "screen", screen.0, screen.1);
}
