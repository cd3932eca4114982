//! Account and token endpoints

use super::{ClientError, PublicClient};
use crate::types::{
    Credentials, RefreshResponse, RefreshTokenRequest, RegisterResponse, TokenPair,
};
use reqwest::Method;

impl PublicClient {
    /// Create an account
    pub async fn register(&self, credentials: &Credentials) -> Result<RegisterResponse, ClientError> {
        let request = self.request(Method::POST, "/user/register").json(credentials);
        self.execute(request).await
    }

    /// Exchange an email and password for a token pair
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenPair, ClientError> {
        let request = self.request(Method::POST, "/user/login").json(credentials);
        self.execute(request).await
    }

    /// Exchange a refresh token for a new bearer token
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, ClientError> {
        let request = self
            .request(Method::POST, "/user/refresh")
            .json(&RefreshTokenRequest {
                refresh_token: refresh_token.to_string(),
            });
        self.execute(request).await
    }

    /// Invalidate a refresh token on the server
    pub async fn logout(&self, refresh_token: &str) -> Result<(), ClientError> {
        let request = self
            .request(Method::POST, "/user/logout")
            .json(&RefreshTokenRequest {
                refresh_token: refresh_token.to_string(),
            });
        self.execute_ack(request).await
    }
}
