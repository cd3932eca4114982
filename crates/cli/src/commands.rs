//! CLI commands

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use reel_core::FileStore;
use reel_http::TypedClientBuilder;
use reel_http::types::{MovieDetails, MovieSearchResponse, Person, SearchQuery};
use reel_session::{CatalogClient, Operation, SessionError, SessionManager, user_message};
use std::fmt::{Display, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{self, ReelConfig};

const SESSION_FILE: &str = "session.json";

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account
    Register {
        email: String,

        #[arg(long, env = "REEL_PASSWORD", hide_env_values = true)]
        password: String,

        /// Repeat the password
        #[arg(long)]
        confirm: String,
    },

    /// Log in and store the session
    Login {
        email: String,

        #[arg(long, env = "REEL_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log out and clear the stored session
    Logout,

    /// Exchange the stored refresh token for a new bearer token
    Refresh,

    /// Show the current session
    Status,

    /// Search the movie catalog
    Search {
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        year: Option<i32>,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Show one movie by IMDB id
    Movie { imdb_id: String },

    /// Show one person (requires login)
    Person { id: String },

    /// Configuration file operations
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write the default configuration file
    Init {
        /// Output file path (defaults to REEL_STATE_DIR/config.toml)
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

impl Commands {
    pub async fn execute(self, data_dir: PathBuf, base_url: Option<String>) -> Result<()> {
        match self {
            Self::Register {
                email,
                password,
                confirm,
            } => {
                let client = connect(&data_dir, base_url).await?;
                let response = client
                    .register(&email, &password, &confirm)
                    .await
                    .map_err(|e| report(Operation::Register, &e))?;
                println!(
                    "{}",
                    response
                        .message
                        .unwrap_or_else(|| "Registration successful!".to_string())
                );
                println!("Log in with: reel login {}", email.trim());
                Ok(())
            }
            Self::Login { email, password } => {
                let client = connect(&data_dir, base_url).await?;
                client
                    .sign_in(&email, &password)
                    .await
                    .map_err(|e| report(Operation::SignIn, &e))?;
                println!("Logged in as {}", email.trim());
                Ok(())
            }
            Self::Logout => {
                let client = connect(&data_dir, base_url).await?;
                client.sign_out().await?;
                println!("Logged out");
                Ok(())
            }
            Self::Refresh => {
                let client = connect(&data_dir, base_url).await?;
                refresh(client.session()).await
            }
            Self::Status => {
                let client = connect(&data_dir, base_url).await?;
                print_status(client.session()).await
            }
            Self::Search { title, year, page } => {
                let client = connect(&data_dir, base_url).await?;
                let query = SearchQuery::new(title, year, page);
                let response = client
                    .search_movies(&query)
                    .await
                    .map_err(|e| report(Operation::SearchMovies, &e))?;
                print_search(&query, &response);
                Ok(())
            }
            Self::Movie { imdb_id } => {
                let client = connect(&data_dir, base_url).await?;
                let movie = client
                    .movie_details(&imdb_id)
                    .await
                    .map_err(|e| report(Operation::MovieDetails, &e))?;
                print_movie(&movie, client.session().is_authenticated());
                Ok(())
            }
            Self::Person { id } => {
                let client = connect(&data_dir, base_url).await?;
                let person = client
                    .person_details(&id)
                    .await
                    .map_err(|e| report(Operation::PersonDetails, &e))?;
                print_person(&person);
                Ok(())
            }
            Self::Config { command } => command.execute(&data_dir),
        }
    }
}

impl ConfigCommands {
    pub fn execute(self, data_dir: &Path) -> Result<()> {
        match self {
            Self::Init { output, force } => {
                let path = output.unwrap_or_else(|| data_dir.join(config::CONFIG_FILE));
                config::generate_default_config(&path, force)?;
                println!("Generated configuration at: {}", path.display());
                Ok(())
            }
            Self::Show => {
                let config = ReelConfig::load(data_dir)?;
                print!("{}", toml::to_string_pretty(&config)?);
                Ok(())
            }
        }
    }
}

/// Build the catalog client and resolve the stored session
async fn connect(data_dir: &Path, base_url: Option<String>) -> Result<CatalogClient> {
    let mut config = ReelConfig::load(data_dir)?;
    if let Some(base_url) = base_url {
        config.api.base_url = base_url;
        config.validate()?;
    }

    let mut builder = TypedClientBuilder::new().base_url(&config.api.base_url);
    if let Some(timeout) = config.request_timeout() {
        builder = builder.timeout(timeout);
    }
    if let Some(user_agent) = &config.api.user_agent {
        builder = builder.user_agent(user_agent);
    }
    let public = builder.build_public()?;

    let store = Arc::new(FileStore::new(data_dir.join(SESSION_FILE)));
    let session = SessionManager::new(store, Arc::new(public.clone()))
        .with_refresh_window(config.refresh_window());

    let status = session.check_auth_on_load().await;
    info!(base_url = %config.api.base_url, ?status, "Catalog client ready");
    Ok(CatalogClient::new(public, Arc::new(session)))
}

/// Log the underlying error and turn it into the message shown to the user
fn report(operation: Operation, error: &SessionError) -> anyhow::Error {
    debug!(?operation, error = %error, "Operation failed");
    anyhow!(user_message(operation, error))
}

async fn refresh(session: &SessionManager) -> Result<()> {
    match session.refresh().await {
        Ok(()) => {
            println!("Token refreshed");
            print_status(session).await
        }
        Err(SessionError::NoRefreshToken) => Err(anyhow!("Not logged in")),
        Err(e) => Err(anyhow!("Token refresh failed: {e}")),
    }
}

async fn print_status(session: &SessionManager) -> Result<()> {
    let state = session.state();
    if !state.is_authenticated() {
        println!("Not logged in");
        return Ok(());
    }

    println!(
        "Logged in as {}",
        state.user_email.as_deref().unwrap_or("(unknown)")
    );
    let stored = session.stored_session().await?;
    if let Some(expiry) = stored
        .expiry_millis()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
    {
        println!("Bearer token expires {}", expiry.to_rfc3339());
    }
    Ok(())
}

fn print_search(query: &SearchQuery, response: &MovieSearchResponse) {
    if response.data.is_empty() {
        println!("No movies found");
        return;
    }

    println!(
        "{:<11} {:<40} {:>4} {:>5} {:>4} {:>4}  {}",
        "IMDB ID", "Title", "Year", "IMDB", "RT", "MC", "Class"
    );
    for movie in &response.data {
        println!(
            "{:<11} {:<40} {:>4} {:>5} {:>4} {:>4}  {}",
            movie.imdb_id,
            truncate(&movie.title, 40),
            or_dash(movie.year),
            or_dash(movie.imdb_rating),
            or_dash(movie.rotten_tomatoes_rating),
            or_dash(movie.metacritic_rating),
            or_dash(movie.classification.as_deref()),
        );
    }

    let pagination = &response.pagination;
    println!(
        "\nShowing {} to {} of {} movies",
        pagination.from + 1,
        pagination.to,
        pagination.total
    );
    for (label, page) in [("Previous", pagination.prev_page), ("Next", pagination.next_page)] {
        if let Some(page) = page {
            println!("{label} page: {}", page_command(query, page));
        }
    }
}

fn page_command(query: &SearchQuery, page: u32) -> String {
    let mut command = String::from("reel search");
    // Writing to a String cannot fail
    if let Some(title) = &query.title {
        let _ = write!(command, " --title {title:?}");
    }
    if let Some(year) = query.year {
        let _ = write!(command, " --year {year}");
    }
    let _ = write!(command, " --page {page}");
    command
}

fn print_movie(movie: &MovieDetails, authenticated: bool) {
    println!("{} ({})", movie.title, or_dash(movie.year));

    let mut facts = Vec::new();
    if !movie.genres.is_empty() {
        facts.push(movie.genres.join(", "));
    }
    if let Some(runtime) = movie.runtime {
        facts.push(format!("{runtime} min"));
    }
    if let Some(country) = &movie.country {
        facts.push(country.clone());
    }
    if !facts.is_empty() {
        println!("{}", facts.join(" | "));
    }
    if let Some(boxoffice) = movie.boxoffice {
        println!("Box Office: ${}", group_thousands(boxoffice));
    }
    if let Some(plot) = &movie.plot {
        println!("\n{plot}");
    }

    if !movie.ratings.is_empty() {
        println!("\nRatings");
        for rating in &movie.ratings {
            println!("  {:<24} {}", rating.source, or_dash(rating.value));
        }
    }

    if !movie.principals.is_empty() {
        println!("\nCast & Crew");
        for person in &movie.principals {
            let name = if authenticated {
                format!("{} [{}]", person.name, person.id)
            } else {
                format!("{} (Login to view details)", person.name)
            };
            let characters = if person.characters.is_empty() {
                "-".to_string()
            } else {
                person.characters.join(", ")
            };
            println!("  {:<40} {:<12} {}", name, person.category, characters);
        }
    }
}

fn print_person(person: &Person) {
    println!("{}", person.name);
    match (person.birth_year, person.death_year) {
        (Some(born), Some(died)) => println!("Born: {born}  Died: {died}"),
        (Some(born), None) => println!("Born: {born}"),
        (None, Some(died)) => println!("Died: {died}"),
        (None, None) => {}
    }

    if person.roles.is_empty() {
        return;
    }
    println!("\nRoles");
    for role in &person.roles {
        let characters = if role.characters.is_empty() {
            String::new()
        } else {
            format!(" as {}", role.characters.join(", "))
        };
        println!(
            "  {:<40} [{}] {}{}  {}",
            truncate(&role.movie_name, 40),
            role.movie_id,
            role.category,
            characters,
            or_dash(role.imdb_rating),
        );
    }
}

fn or_dash<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(47_095_453), "47,095,453");
    }

    #[test]
    fn long_titles_are_truncated() {
        assert_eq!(truncate("Heat", 10), "Heat");
        assert_eq!(truncate("abcdefghijk", 5), "abcd…");
    }

    #[test]
    fn page_command_keeps_filters() {
        let query = SearchQuery::new(Some("kate"), Some(2001), 1);
        assert_eq!(
            page_command(&query, 2),
            "reel search --title \"kate\" --year 2001 --page 2"
        );

        let query = SearchQuery::new(None::<String>, None, 3);
        assert_eq!(page_command(&query, 4), "reel search --page 4");
    }
}
