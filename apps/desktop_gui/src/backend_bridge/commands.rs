//! Backend commands queued from UI to backend worker.

use client_core::Generation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    LoadFilms,
    LoadFilmDetail {
        generation: Generation,
        url: String,
    },
    LoadCharacters {
        generation: Generation,
        urls: Vec<String>,
    },
    LoadThemeAudio {
        url: String,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadFilms => "load_films",
            BackendCommand::LoadFilmDetail { .. } => "load_film_detail",
            BackendCommand::LoadCharacters { .. } => "load_characters",
            BackendCommand::LoadThemeAudio { .. } => "load_theme_audio",
        }
    }
}
