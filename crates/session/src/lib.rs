//! Reel session management
//!
//! Owns the authentication lifecycle of the catalog client: storing token
//! pairs after login, restoring them at start-up, refreshing bearer tokens
//! before they expire and clearing everything on logout.

pub mod api;
pub mod client;
pub mod error;
pub mod error_messages;
pub mod manager;
pub mod state;

pub use api::SessionApi;
pub use client::CatalogClient;
pub use error::{Result, SessionError};
pub use error_messages::{Operation, user_message};
pub use manager::{DEFAULT_REFRESH_WINDOW, SessionManager};
pub use state::{AuthStatus, SessionState};
