//! Client error types

use crate::types::ApiErrorBody;
use std::fmt;
use thiserror::Error;

/// Text describing a rejected request
///
/// Remembers whether the text came from the `message` field of the API's
/// JSON error payload or was filled in from the raw body or status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerMessage {
    text: String,
    from_payload: bool,
}

impl ServerMessage {
    /// Message taken from the API's error payload
    pub fn payload(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            from_payload: true,
        }
    }

    /// Message derived from the response body or status line
    pub fn derived(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            from_payload: false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The payload message, if the server sent a non-blank one
    pub fn payload_text(&self) -> Option<&str> {
        (self.from_payload && !self.text.trim().is_empty()).then_some(self.text.as_str())
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for ServerMessage {
    fn from(text: &str) -> Self {
        Self::payload(text)
    }
}

impl From<String> for ServerMessage {
    fn from(text: String) -> Self {
        Self::payload(text)
    }
}

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: ServerMessage },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(ServerMessage),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(ServerMessage),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(ServerMessage),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(ServerMessage),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from HTTP status code
    pub fn from_status(status: reqwest::StatusCode, message: impl Into<ServerMessage>) -> Self {
        let message = message.into();
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Create error from a status and the raw response body
    ///
    /// Prefers a non-blank `message` field of a JSON error payload, then a
    /// non-JSON body text, then the canonical reason phrase.
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let reason = || {
            ServerMessage::derived(
                status
                    .canonical_reason()
                    .map_or_else(|| status.to_string(), str::to_string),
            )
        };
        let message = match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(payload) if !payload.message.trim().is_empty() => {
                ServerMessage::payload(payload.message)
            }
            Ok(_) => reason(),
            Err(_) if body.trim().is_empty() => reason(),
            Err(_) => ServerMessage::derived(body.trim()),
        };
        Self::from_status(status, message)
    }

    /// The request never produced a response
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Request(e) if e.status().is_none() && !e.is_decode())
    }

    /// The server rejected the bearer token (or none was sent)
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_))
    }

    fn rejection(&self) -> Option<&ServerMessage> {
        match self {
            Self::AuthenticationFailed(message)
            | Self::NotFound(message)
            | Self::BadRequest(message)
            | Self::Forbidden(message)
            | Self::ServerError { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Text of a non-2xx response, however it was obtained
    pub fn server_message(&self) -> Option<&str> {
        self.rejection().map(ServerMessage::as_str)
    }

    /// The `message` the API itself put in its error payload
    pub fn payload_message(&self) -> Option<&str> {
        self.rejection().and_then(ServerMessage::payload_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn json_payload_message_is_used() {
        let err = ClientError::from_response(
            StatusCode::UNAUTHORIZED,
            r#"{"error":true,"message":"Incorrect email or password"}"#,
        );
        assert!(err.is_auth_expired());
        assert_eq!(err.server_message(), Some("Incorrect email or password"));
        assert_eq!(err.payload_message(), Some("Incorrect email or password"));
    }

    #[test]
    fn plain_body_and_empty_body() {
        let err = ClientError::from_response(StatusCode::CONFLICT, "User already exists\n");
        assert!(matches!(
            &err,
            ClientError::ServerError { status: 409, message } if message.as_str() == "User already exists"
        ));
        assert_eq!(err.payload_message(), None);

        let err = ClientError::from_response(StatusCode::NOT_FOUND, "");
        assert_eq!(err.server_message(), Some("Not Found"));
        assert_eq!(err.payload_message(), None);
        assert_eq!(err.to_string(), "Resource not found: Not Found");
    }

    #[test]
    fn blank_payload_message_falls_back_to_reason() {
        let err = ClientError::from_response(
            StatusCode::UNAUTHORIZED,
            r#"{"error":true,"message":""}"#,
        );
        assert!(err.is_auth_expired());
        assert_eq!(err.payload_message(), None);
        assert_eq!(err.to_string(), "Authentication failed: Unauthorized");
    }

    #[test]
    fn configuration_errors_carry_no_server_message() {
        let err = ClientError::Configuration("base_url is required".into());
        assert!(err.server_message().is_none());
        assert!(!err.is_network());
    }
}
