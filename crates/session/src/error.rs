use reel_core::ValidationError;
use reel_http::ClientError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No refresh token available")]
    NoRefreshToken,

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Storage(#[from] reel_core::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl SessionError {
    /// The server answered 401
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Client(ClientError::AuthenticationFailed(_)))
    }

    /// Transport-level failure, no response was received
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Client(e) if e.is_network())
    }
}
