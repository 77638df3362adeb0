use serde::{Deserialize, Serialize};

use crate::domain::Film;

/// Paged envelope SWAPI wraps list responses in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilmListResponse {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<Film>,
}
