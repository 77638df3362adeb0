//! Applies backend events and user actions to the browser state and returns
//! the side effects the UI shell should run.

use client_core::FetchOrchestrator;
use shared::domain::EpisodeId;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{classify_fetch_failure, UiError, UiEvent};

#[derive(Debug, PartialEq, Eq)]
pub enum Effect {
    Dispatch(BackendCommand),
    PlayThemeAudio(Vec<u8>),
    ResetTable,
    ScrollToSelection,
}

pub struct BrowserState {
    pub orchestrator: FetchOrchestrator,
    pub status: String,
    pub banner: Option<UiError>,
    theme_audio_url: Option<String>,
    audio_requested: bool,
}

impl BrowserState {
    pub fn new(theme_audio_url: Option<String>) -> Self {
        Self {
            orchestrator: FetchOrchestrator::new(),
            status: "Starting".to_string(),
            banner: None,
            theme_audio_url,
            audio_requested: false,
        }
    }

    /// Kicks off the one-time film list load.
    pub fn start(&mut self) -> Vec<Effect> {
        if !self.orchestrator.begin_films_load() {
            return Vec::new();
        }
        self.status = "Loading films...".to_string();
        vec![Effect::Dispatch(BackendCommand::LoadFilms)]
    }

    pub fn select_film(&mut self, episode: EpisodeId) -> Vec<Effect> {
        let Some(request) = self.orchestrator.select_film(episode) else {
            tracing::warn!(episode = episode.0, "ignoring selection of unknown film");
            return Vec::new();
        };
        if self.banner.as_ref().is_some_and(UiError::blocks_chain) {
            self.banner = None;
        }
        self.status = match self.orchestrator.selected_film() {
            Some(film) => format!("Loading {}...", film.title),
            None => "Loading film...".to_string(),
        };

        let mut effects = vec![
            Effect::Dispatch(BackendCommand::LoadFilmDetail {
                generation: request.generation,
                url: request.url,
            }),
            Effect::ResetTable,
            Effect::ScrollToSelection,
        ];
        if !self.audio_requested {
            if let Some(url) = self.theme_audio_url.clone() {
                self.audio_requested = true;
                effects.push(Effect::Dispatch(BackendCommand::LoadThemeAudio { url }));
            }
        }
        effects
    }

    pub fn apply(&mut self, event: UiEvent) -> Vec<Effect> {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
                Vec::new()
            }
            UiEvent::Error(err) => {
                self.show_error(err);
                Vec::new()
            }
            UiEvent::FilmsLoaded(result) => {
                let failure = result.as_ref().err().cloned();
                self.orchestrator.films_loaded(result);
                match failure {
                    Some(failure) => self.show_error(UiError::from_failure(&failure)),
                    None => {
                        self.status = format!("{} films available", self.orchestrator.films().len());
                    }
                }
                Vec::new()
            }
            UiEvent::FilmDetailLoaded { generation, result } => {
                if !self.orchestrator.is_current(generation) {
                    tracing::debug!(generation = generation.0, "ignoring stale film detail");
                    return Vec::new();
                }
                let failure = result.as_ref().err().cloned();
                match self.orchestrator.detail_loaded(generation, result) {
                    Some(request) => {
                        self.orchestrator.characters_requested(generation);
                        self.status = format!("Loading {} characters...", request.urls.len());
                        vec![Effect::Dispatch(BackendCommand::LoadCharacters {
                            generation,
                            urls: request.urls,
                        })]
                    }
                    None => {
                        if let Some(failure) = failure {
                            self.show_error(UiError::from_failure(&failure));
                        }
                        Vec::new()
                    }
                }
            }
            UiEvent::CharactersLoaded { generation, result } => {
                let failure = result.as_ref().err().cloned();
                let count = result.as_ref().map(Vec::len).unwrap_or_default();
                if !self.orchestrator.characters_loaded(generation, result) {
                    tracing::debug!(generation = generation.0, "ignoring stale character list");
                    return Vec::new();
                }
                match failure {
                    Some(failure) => {
                        self.show_error(UiError::from_failure(&failure));
                        Vec::new()
                    }
                    None => {
                        self.status = format!("Loaded {count} characters");
                        vec![Effect::ResetTable]
                    }
                }
            }
            UiEvent::ThemeAudioLoaded(bytes) => vec![Effect::PlayThemeAudio(bytes)],
        }
    }

    fn show_error(&mut self, err: UiError) {
        self.status = classify_fetch_failure(err.message());
        self.banner = Some(err);
    }
}
