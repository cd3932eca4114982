//! Remote token endpoints the session manager depends on

use async_trait::async_trait;
use reel_http::types::RefreshResponse;
use reel_http::{ClientError, PublicClient};

/// Token endpoints of the catalog API
///
/// Kept as a trait so the session lifecycle can be driven without a server.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionApi: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, ClientError>;
    async fn logout(&self, refresh_token: &str) -> Result<(), ClientError>;
}

#[async_trait]
impl SessionApi for PublicClient {
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, ClientError> {
        Self::refresh(self, refresh_token).await
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), ClientError> {
        Self::logout(self, refresh_token).await
    }
}
