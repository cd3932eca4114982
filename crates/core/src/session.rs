//! Persisted session record

use crate::Result;
use crate::store::{SessionStore, StorageKey};
use serde::{Deserialize, Serialize};

/// Snapshot of the session fields held in durable storage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub bearer_token: Option<String>,
    pub refresh_token: Option<String>,
    /// Raw stored value; epoch milliseconds as a decimal string
    pub token_expiry: Option<String>,
    pub user_email: Option<String>,
}

impl Session {
    /// Read all session fields from the store
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn load(store: &dyn SessionStore) -> Result<Self> {
        Ok(Self {
            bearer_token: store.get(StorageKey::BearerToken).await?,
            refresh_token: store.get(StorageKey::RefreshToken).await?,
            token_expiry: store.get(StorageKey::TokenExpiry).await?,
            user_email: store.get(StorageKey::UserEmail).await?,
        })
    }

    /// Parsed expiry, `None` when absent or unparsable
    #[must_use]
    pub fn expiry_millis(&self) -> Option<i64> {
        self.token_expiry
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
    }

    /// A bearer token is stored and its expiry is strictly after `now_millis`
    #[must_use]
    pub fn has_live_token(&self, now_millis: i64) -> bool {
        self.bearer_token.is_some() && self.expiry_millis().is_some_and(|exp| exp > now_millis)
    }

    /// The stored expiry falls within `window_millis` of `now_millis`
    ///
    /// Already-expired tokens count as expiring. A missing or unparsable
    /// expiry never does.
    #[must_use]
    pub fn expires_within(&self, now_millis: i64, window_millis: i64) -> bool {
        self.expiry_millis()
            .is_some_and(|exp| exp.saturating_sub(now_millis) <= window_millis)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bearer_token.is_none()
            && self.refresh_token.is_none()
            && self.token_expiry.is_none()
            && self.user_email.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn with_expiry(expiry: &str) -> Session {
        Session {
            bearer_token: Some("T1".into()),
            token_expiry: Some(expiry.into()),
            ..Session::default()
        }
    }

    #[tokio::test]
    async fn load_reads_every_key() {
        let store = MemoryStore::new();
        store.set(StorageKey::BearerToken, "T1").await.unwrap();
        store.set(StorageKey::RefreshToken, "R1").await.unwrap();
        store.set(StorageKey::TokenExpiry, "42").await.unwrap();
        store.set(StorageKey::UserEmail, "a@b.com").await.unwrap();

        let session = Session::load(&store).await.unwrap();
        assert_eq!(session.bearer_token.as_deref(), Some("T1"));
        assert_eq!(session.refresh_token.as_deref(), Some("R1"));
        assert_eq!(session.expiry_millis(), Some(42));
        assert_eq!(session.user_email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn live_token_requires_strictly_future_expiry() {
        assert!(with_expiry("1001").has_live_token(1000));
        assert!(!with_expiry("1000").has_live_token(1000));
        assert!(!with_expiry("garbage").has_live_token(1000));
        assert!(!Session::default().has_live_token(0));
    }

    #[test]
    fn expiry_window_is_inclusive() {
        let session = with_expiry("61000");
        assert!(session.expires_within(1000, 60_000));
        assert!(!session.expires_within(999, 60_000));
        assert!(with_expiry("0").expires_within(1000, 60_000));
        assert!(!with_expiry("soon").expires_within(1000, 60_000));
    }

    #[test]
    fn empty_session() {
        assert!(Session::default().is_empty());
        assert!(!with_expiry("1").is_empty());
    }
}
