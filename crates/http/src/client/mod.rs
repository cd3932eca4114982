//! Reel catalog API client

pub mod catalog;
pub mod error;
pub mod hook;
pub mod typed;
pub mod user;

pub use error::{ClientError, ServerMessage};
pub use hook::{BearerSource, StaticBearer};
pub use typed::{AuthenticatedClient, PublicClient, TypedClientBuilder};
