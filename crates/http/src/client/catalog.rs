//! Movie and people endpoints

use super::{AuthenticatedClient, ClientError, PublicClient};
use crate::types::{MovieDetails, MovieSearchResponse, Person, SearchQuery};
use reqwest::Method;

impl PublicClient {
    /// Search the catalog, one page at a time
    pub async fn search_movies(
        &self,
        query: &SearchQuery,
    ) -> Result<MovieSearchResponse, ClientError> {
        let request = self.request(Method::GET, "/movies/search").query(query);
        self.execute(request).await
    }

    /// Full record for one movie
    pub async fn movie_details(&self, imdb_id: &str) -> Result<MovieDetails, ClientError> {
        let request = self.request(Method::GET, &format!("/movies/data/{imdb_id}"));
        self.execute(request).await
    }
}

impl AuthenticatedClient {
    /// Person record with their roles (requires authentication)
    pub async fn person(&self, id: &str) -> Result<Person, ClientError> {
        let request = self.request(Method::GET, &format!("/people/{id}")).await;
        self.execute(request).await
    }
}
