//! Reel HTTP client
//!
//! Typed clients for the movie catalog REST API. Public endpoints live on
//! [`PublicClient`]; endpoints that need a bearer token live on
//! [`AuthenticatedClient`], which asks a [`BearerSource`] for the token right
//! before each request.

pub mod client;
pub mod types;

pub use client::{
    AuthenticatedClient, BearerSource, ClientError, PublicClient, ServerMessage, StaticBearer,
    TypedClientBuilder,
};
