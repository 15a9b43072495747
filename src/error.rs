//! Errors that abort an invocation.
//!
//! Only setup problems escalate: credentials missing from the config file,
//! or a failed token exchange (the one network step with no degraded
//! fallback). Per-request transport failures never become errors; the
//! connectors absorb them and return empty results, so a flaky API turns
//! into "no results found" rather than an abort.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    /// A credential the selected provider requires is blank or absent.
    #[error("{provider}: `{key}` is not set in the config file")]
    MissingCredential {
        provider: &'static str,
        key: &'static str,
    },

    /// The Twitch token exchange failed (transport error, non-success
    /// status, or unparseable response body).
    #[error("games: token exchange with id.twitch.tv failed")]
    TokenExchange(#[from] reqwest::Error),

    /// The token exchange answered but without an `access_token` field.
    #[error("games: token response did not contain an access token")]
    TokenMissing,
}
