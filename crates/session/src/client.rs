//! Catalog client bound to a session
//!
//! Public endpoints go through a [`PublicClient`]; the person endpoint goes
//! through an [`AuthenticatedClient`] whose pre-request hook is the session
//! manager.

use crate::error::Result;
use crate::manager::SessionManager;
use reel_core::{SessionStore, validate_credentials, validate_registration};
use reel_http::types::{
    Credentials, MovieDetails, MovieSearchResponse, Person, RegisterResponse, SearchQuery,
};
use reel_http::{AuthenticatedClient, PublicClient};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct CatalogClient {
    public: PublicClient,
    authenticated: AuthenticatedClient,
    session: Arc<SessionManager>,
}

impl CatalogClient {
    /// Bind a client to an existing session manager
    pub fn new(public: PublicClient, session: Arc<SessionManager>) -> Self {
        let authenticated = public.clone().authenticate(session.clone());
        Self {
            public,
            authenticated,
            session,
        }
    }

    /// Create a session manager over `store` that talks to the same API
    pub fn with_store(public: PublicClient, store: Arc<dyn SessionStore>) -> Self {
        let session = Arc::new(SessionManager::new(store, Arc::new(public.clone())));
        Self::new(public, session)
    }

    pub const fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Validate the form locally, then create the account
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request is sent, or the
    /// server's rejection.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<RegisterResponse> {
        validate_registration(email, password, confirmation)?;
        let response = self
            .public
            .register(&Credentials::new(email.trim(), password))
            .await?;
        info!(email = email.trim(), "Account registered");
        Ok(response)
    }

    /// Log in with email and password and record the returned tokens
    ///
    /// # Errors
    ///
    /// Returns a validation error, the server's rejection, or a storage
    /// failure.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<()> {
        validate_credentials(email, password)?;
        let email = email.trim();
        let tokens = self
            .public
            .login(&Credentials::new(email, password))
            .await?;
        self.session.login(email, &tokens).await
    }

    /// Log out (best effort remotely, always locally)
    ///
    /// # Errors
    ///
    /// Returns an error only if the local session could not be cleared.
    pub async fn sign_out(&self) -> Result<()> {
        self.session.logout().await
    }

    /// # Errors
    ///
    /// Returns the transport or server error.
    pub async fn search_movies(&self, query: &SearchQuery) -> Result<MovieSearchResponse> {
        Ok(self.public.search_movies(query).await?)
    }

    /// # Errors
    ///
    /// Returns the transport or server error.
    pub async fn movie_details(&self, imdb_id: &str) -> Result<MovieDetails> {
        Ok(self.public.movie_details(imdb_id).await?)
    }

    /// Fetch a person, refreshing the bearer token first if it is about to expire
    ///
    /// # Errors
    ///
    /// Returns an authorization error if the server rejects the token.
    pub async fn person_details(&self, id: &str) -> Result<Person> {
        Ok(self.authenticated.person(id).await?)
    }
}
