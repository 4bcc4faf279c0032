use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Source of the upstream session cookie, consulted once per fetch.
#[async_trait]
pub trait SessionSource: Send + Sync {
    async fn session_cookie(&self) -> Result<String>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Cookie value handed over at startup (flag or environment variable).
pub struct StaticSession {
    cookie: String,
}

impl StaticSession {
    pub fn new(cookie: impl Into<String>) -> Self {
        StaticSession {
            cookie: cookie.into(),
        }
    }
}

#[async_trait]
impl SessionSource for StaticSession {
    fn name(&self) -> &str {
        "static"
    }

    async fn session_cookie(&self) -> Result<String> {
        Ok(self.cookie.clone())
    }
}

/// Cookie read from a file on every fetch (e.g. a mounted secret volume);
/// a rotated secret takes effect without a restart.
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSession { path: path.into() }
    }
}

#[async_trait]
impl SessionSource for FileSession {
    fn name(&self) -> &str {
        "file"
    }

    async fn session_cookie(&self) -> Result<String> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::SecretUnavailable(format!("{}: {}", self.path.display(), e)))?;
        let cookie = raw.trim();
        if cookie.is_empty() {
            return Err(Error::SecretUnavailable(format!(
                "{} is empty",
                self.path.display()
            )));
        }
        Ok(cookie.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_session_returns_configured_value() {
        let source = StaticSession::new("53616c7465645f5f");
        assert_eq!(source.session_cookie().await.unwrap(), "53616c7465645f5f");
    }

    #[tokio::test]
    async fn test_file_session_trims_trailing_newline() {
        let path = std::env::temp_dir().join(format!("starboard-cookie-{}", std::process::id()));
        std::fs::write(&path, "53616c7465645f5f\n").unwrap();

        let source = FileSession::new(&path);
        assert_eq!(source.session_cookie().await.unwrap(), "53616c7465645f5f");

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_secret_unavailable() {
        let source = FileSession::new("/nonexistent/starboard-cookie");
        let err = source.session_cookie().await.unwrap_err();
        assert!(matches!(err, Error::SecretUnavailable(_)));
    }
}
