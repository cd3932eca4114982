//! Pre-request hook for authenticated requests

use async_trait::async_trait;

/// Supplies the bearer token for each authenticated request
///
/// The authenticated client awaits [`BearerSource::bearer_token`] right
/// before attaching the `Authorization` header, so implementations can
/// refresh an expiring token first. Returning `None` sends the request
/// without credentials and lets the server answer with 401.
#[async_trait]
pub trait BearerSource: Send + Sync {
    async fn bearer_token(&self) -> Option<String>;
}

/// Fixed token, for callers that manage credentials themselves
#[derive(Clone)]
pub struct StaticBearer(String);

impl StaticBearer {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticBearer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticBearer(..)")
    }
}

#[async_trait]
impl BearerSource for StaticBearer {
    async fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}
