use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::{Character, Film},
    error::{FailedStage, FetchFailure},
    protocol::FilmListResponse,
};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

pub mod config;
pub mod orchestrator;
pub mod session;
pub mod table;

pub use orchestrator::{CharactersRequest, FetchOrchestrator, FetchStage, FilmRequest, Generation};
pub use session::{ChainOutcome, FilmSession};

const FILMS_PATH: &str = "films/";
/// Upper bound on `next` links followed while listing films.
const MAX_FILM_PAGES: usize = 32;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unsupported url scheme '{0}', expected http or https")]
    UnsupportedScheme(String),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("unexpected response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Collapses any fetch error into the single failure kind the UI stores.
    pub fn into_failure(self, stage: FailedStage) -> FetchFailure {
        FetchFailure::new(stage, self.to_string())
    }
}

/// Read side of the film API. The orchestration chain only talks to this.
#[async_trait]
pub trait FilmSource: Send + Sync {
    async fn list_films(&self) -> Result<Vec<Film>, FetchError>;
    async fn fetch_film(&self, url: &str) -> Result<Film, FetchError>;
    async fn fetch_character(&self, url: &str) -> Result<Character, FetchError>;

    /// Fetches every character concurrently. One failure fails the whole
    /// join; on success the order matches `urls`.
    async fn fetch_characters(&self, urls: &[String]) -> Result<Vec<Character>, FetchError> {
        try_join_all(urls.iter().map(|url| self.fetch_character(url))).await
    }
}

/// Normalizes an API base so relative paths join under it rather than
/// replacing its last segment.
pub fn parse_base_url(raw: &str) -> Result<Url, FetchError> {
    let trimmed = raw.trim();
    let mut url = Url::parse(trimmed)?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(FetchError::UnsupportedScheme(url.scheme().to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[derive(Debug, Clone)]
pub struct SwapiClient {
    http: Client,
    base_url: Url,
}

impl SwapiClient {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Self::with_http(Client::new(), base_url)
    }

    pub fn with_http(http: Client, base_url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            http,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn films_url(&self) -> Result<Url, FetchError> {
        Ok(self.base_url.join(FILMS_PATH)?)
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(res)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!(url, "GET");
        let body = self
            .send(url)
            .await?
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Raw body download, used for media such as the theme audio.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let body = self
            .send(url)
            .await?
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl FilmSource for SwapiClient {
    async fn list_films(&self) -> Result<Vec<Film>, FetchError> {
        let mut films = Vec::new();
        let mut next = Some(self.films_url()?.to_string());
        let mut pages = 0usize;
        while let Some(url) = next.take() {
            let page: FilmListResponse = self.get_json(&url).await?;
            films.extend(page.results);
            pages += 1;
            next = page.next;
            if next.is_some() && pages >= MAX_FILM_PAGES {
                warn!(pages, "film listing did not terminate; keeping what was fetched");
                break;
            }
        }
        info!(count = films.len(), pages, "fetched film list");
        Ok(films)
    }

    async fn fetch_film(&self, url: &str) -> Result<Film, FetchError> {
        let film: Film = self.get_json(url).await?;
        info!(
            episode = film.episode_id.0,
            characters = film.characters.len(),
            "fetched film detail"
        );
        Ok(film)
    }

    async fn fetch_character(&self, url: &str) -> Result<Character, FetchError> {
        self.get_json(url).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
