use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for a leaderboard request. Each variant maps to one
/// collaborator; nothing here is retried internally. The request handler
/// decides what the caller sees.
#[derive(Debug, Error)]
pub enum Error {
    /// The snapshot store could not be reached or rejected a statement.
    #[error("snapshot store unavailable: {0}")]
    StoreUnavailable(String),

    /// The store holds no snapshot yet.
    #[error("no leaderboard snapshot recorded yet")]
    NotFound,

    /// Network, timeout, or non-2xx response from the upstream provider.
    #[error("upstream leaderboard unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The upstream response could not be interpreted as a members map.
    #[error("malformed upstream response: {0}")]
    UpstreamMalformed(String),

    /// The session cookie could not be retrieved.
    #[error("session cookie unavailable: {0}")]
    SecretUnavailable(String),
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        // QueryReturnedNoRows is handled at the call sites that expect an
        // empty store; anything that falls through here is a real failure.
        Error::StoreUnavailable(error.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Error::UpstreamUnavailable("request timed out".to_string())
        } else {
            Error::UpstreamUnavailable(error.to_string())
        }
    }
}
