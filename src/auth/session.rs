use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::TokenSource;

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub username: String,
    /// Token lifetime in seconds, as reported by the login endpoint
    pub expires_in: i64,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    /// Expiry instant, or None when a malformed `expires_in` overflows
    /// the date math.
    fn expiry(&self) -> Option<DateTime<Utc>> {
        Duration::try_seconds(self.expires_in)
            .and_then(|lifetime| self.created_at.checked_add_signed(lifetime))
    }

    pub fn is_expired(&self) -> bool {
        match self.expiry() {
            Some(expiry) => Utc::now() > expiry,
            // Overflowing positive lifetimes mean "far future"; anything
            // negative enough to overflow is long expired
            None => self.expires_in < 0,
        }
    }

    /// Seconds remaining until expiry (for display)
    pub fn seconds_until_expiry(&self) -> i64 {
        match self.expiry() {
            Some(expiry) => (expiry - Utc::now()).num_seconds().max(0),
            None if self.expires_in >= 0 => i64::MAX,
            None => 0,
        }
    }
}

pub struct Session {
    cache_dir: PathBuf,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            data: None,
        }
    }

    /// Load session from disk. Returns true if a non-expired session
    /// was found.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if path.exists() {
            let contents =
                std::fs::read_to_string(&path).context("Failed to read session file")?;
            let data: SessionData =
                serde_json::from_str(&contents).context("Failed to parse session file")?;

            if !data.is_expired() {
                self.data = Some(data);
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Save session to disk
    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    /// Clear session data, removing the on-disk copy
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Update session with new data
    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    /// Check if session is valid (exists and not expired)
    pub fn is_valid(&self) -> bool {
        self.data.as_ref().map(|d| !d.is_expired()).unwrap_or(false)
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}

/// Shared handle over the session, cloneable across the app boundary and
/// the API client. The client only ever reads through `TokenSource`.
#[derive(Clone)]
pub struct SharedSession(Arc<RwLock<Session>>);

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self(Arc::new(RwLock::new(session)))
    }

    pub fn update(&self, data: SessionData) {
        self.write().update(data);
    }

    pub fn save(&self) -> Result<()> {
        self.read().save()
    }

    pub fn clear(&self) -> Result<()> {
        self.write().clear()
    }

    pub fn is_valid(&self) -> bool {
        self.read().is_valid()
    }

    pub fn username(&self) -> Option<String> {
        self.read().data.as_ref().map(|d| d.username.clone())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.0.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Session> {
        self.0.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl TokenSource for SharedSession {
    /// The stored token is returned verbatim; expiry is the boundary's
    /// concern, the server is the authority on token validity.
    fn token(&self) -> Option<String> {
        self.read().data.as_ref().map(|d| d.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_data(expires_in: i64) -> SessionData {
        SessionData {
            token: "tok-123".to_string(),
            username: "maria".to_string(),
            expires_in,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_session_expiry() {
        assert!(!session_data(3600).is_expired());
        assert!(session_data(-1).is_expired());
        assert_eq!(session_data(-1).seconds_until_expiry(), 0);
    }

    #[test]
    fn test_absurd_lifetimes_do_not_panic() {
        // A malformed login response cannot crash expiry math
        assert!(!session_data(i64::MAX).is_expired());
        assert_eq!(session_data(i64::MAX).seconds_until_expiry(), i64::MAX);
        assert!(session_data(i64::MIN).is_expired());
        assert_eq!(session_data(i64::MIN).seconds_until_expiry(), 0);
    }

    #[test]
    fn test_shared_session_token_read() {
        let shared = SharedSession::new(Session::new(PathBuf::from("/nonexistent")));
        assert_eq!(shared.token(), None);

        shared.update(session_data(3600));
        assert_eq!(shared.token().as_deref(), Some("tok-123"));
        assert!(shared.is_valid());
        assert_eq!(shared.username().as_deref(), Some("maria"));
    }
}
