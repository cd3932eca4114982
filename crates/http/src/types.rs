//! Request and response bodies exchanged with the catalog API

use serde::{Deserialize, Serialize};

/// Email/password pair sent to `/user/login` and `/user/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Short-lived credential attached to authenticated requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerToken {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    pub expires_in: i64,
}

/// Longer-lived credential exchanged for new bearer tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
}

/// Returned by `/user/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub bearer_token: BearerToken,
    pub refresh_token: RefreshToken,
}

/// Returned by `/user/refresh`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub bearer_token: BearerToken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<RefreshToken>,
}

/// Body of `/user/refresh` and `/user/logout`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Error payload the API returns alongside non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: bool,
    pub message: String,
}

/// Query string of `/movies/search`; empty filters are left out
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub page: u32,
}

impl SearchQuery {
    /// Build a query, dropping blank titles and clamping the page to 1
    pub fn new(title: Option<impl Into<String>>, year: Option<i32>, page: u32) -> Self {
        let title = title
            .map(Into::into)
            .map(|t: String| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Self {
            title,
            year,
            page: page.max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummary {
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(default)]
    pub imdb_rating: Option<f64>,
    #[serde(default)]
    pub rotten_tomatoes_rating: Option<f64>,
    #[serde(default)]
    pub metacritic_rating: Option<f64>,
    #[serde(default)]
    pub classification: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub total: u64,
    pub last_page: u32,
    pub per_page: u32,
    pub current_page: u32,
    pub from: u64,
    pub to: u64,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSearchResponse {
    pub data: Vec<MovieSummary>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub source: String,
    #[serde(default)]
    pub value: Option<f64>,
}

/// Cast or crew member credited on a movie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub category: String,
    pub name: String,
    #[serde(default)]
    pub characters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub principals: Vec<Principal>,
    #[serde(default)]
    pub ratings: Vec<Rating>,
    #[serde(default)]
    pub boxoffice: Option<u64>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub movie_name: String,
    pub movie_id: String,
    pub category: String,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub imdb_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub name: String,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub death_year: Option<i32>,
    #[serde(default)]
    pub roles: Vec<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_pair_uses_wire_names() {
        let pair: TokenPair = serde_json::from_value(json!({
            "bearerToken": { "token": "T1", "token_type": "Bearer", "expires_in": 600 },
            "refreshToken": { "token": "R1", "token_type": "Refresh", "expires_in": 86400 }
        }))
        .unwrap();

        assert_eq!(pair.bearer_token.token, "T1");
        assert_eq!(pair.bearer_token.expires_in, 600);
        assert_eq!(pair.refresh_token.token, "R1");
    }

    #[test]
    fn search_query_omits_blank_filters() {
        let query = SearchQuery::new(Some("  "), None, 0);
        assert_eq!(query.title, None);
        assert_eq!(query.page, 1);
        assert_eq!(serde_json::to_value(&query).unwrap(), json!({ "page": 1 }));
    }

    #[test]
    fn movie_summary_reads_imdb_id() {
        let movie: MovieSummary = serde_json::from_value(json!({
            "title": "Kate & Leopold",
            "year": 2001,
            "imdbID": "tt0035423",
            "imdbRating": 6.4,
            "rottenTomatoesRating": 52,
            "metacriticRating": null,
            "classification": "PG-13"
        }))
        .unwrap();

        assert_eq!(movie.imdb_id, "tt0035423");
        assert_eq!(movie.rotten_tomatoes_rating, Some(52.0));
        assert_eq!(movie.metacritic_rating, None);
    }

    #[test]
    fn pagination_tolerates_null_neighbours() {
        let pagination: Pagination = serde_json::from_value(json!({
            "total": 12184,
            "lastPage": 1219,
            "perPage": 10,
            "currentPage": 1,
            "from": 0,
            "to": 10,
            "prevPage": null,
            "nextPage": 2
        }))
        .unwrap();

        assert_eq!(pagination.prev_page, None);
        assert_eq!(pagination.next_page, Some(2));
    }
}
