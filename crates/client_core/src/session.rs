//! Async driver that runs the fetch chain against a [`FilmSource`] and feeds
//! results through a shared [`FetchOrchestrator`].

use shared::{
    domain::EpisodeId,
    error::{FailedStage, FetchFailure},
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
    orchestrator::{FetchOrchestrator, Generation},
    FilmSource,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    Loaded {
        generation: Generation,
        characters: usize,
    },
    /// A newer selection took over while this chain was in flight.
    Superseded { generation: Generation },
    Failed(FetchFailure),
    UnknownFilm(EpisodeId),
}

pub struct FilmSession<S> {
    source: S,
    state: Mutex<FetchOrchestrator>,
}

impl<S: FilmSource> FilmSession<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(FetchOrchestrator::new()),
        }
    }

    pub async fn snapshot(&self) -> FetchOrchestrator {
        self.state.lock().await.clone()
    }

    /// Loads the film list. Only the first call fetches; later calls report
    /// what the first one left behind.
    pub async fn load_films(&self) -> Result<usize, FetchFailure> {
        {
            let mut state = self.state.lock().await;
            if !state.begin_films_load() {
                return match state.error() {
                    Some(failure) if state.films_failed() => Err(failure.clone()),
                    _ => Ok(state.films().len()),
                };
            }
        }

        let result = self
            .source
            .list_films()
            .await
            .map_err(|err| err.into_failure(FailedStage::Films));
        let outcome = match &result {
            Ok(films) => Ok(films.len()),
            Err(failure) => Err(failure.clone()),
        };
        self.state.lock().await.films_loaded(result);
        outcome
    }

    /// Runs detail then characters for `episode`. The lock is released
    /// while requests are in flight so a newer selection can take over.
    pub async fn select_film(&self, episode: EpisodeId) -> ChainOutcome {
        let request = match self.state.lock().await.select_film(episode) {
            Some(request) => request,
            None => return ChainOutcome::UnknownFilm(episode),
        };
        let generation = request.generation;

        let detail = self
            .source
            .fetch_film(&request.url)
            .await
            .map_err(|err| err.into_failure(FailedStage::Detail));

        let characters_request = {
            let mut state = self.state.lock().await;
            if !state.is_current(generation) {
                debug!(generation = generation.0, "detail arrived for superseded selection");
                return ChainOutcome::Superseded { generation };
            }
            let failure = detail.as_ref().err().cloned();
            match state.detail_loaded(generation, detail) {
                Some(next) => {
                    state.characters_requested(generation);
                    next
                }
                None => {
                    return failure
                        .map(ChainOutcome::Failed)
                        .unwrap_or(ChainOutcome::Superseded { generation })
                }
            }
        };

        let characters = self
            .source
            .fetch_characters(&characters_request.urls)
            .await
            .map_err(|err| err.into_failure(FailedStage::Characters));
        let failure = characters.as_ref().err().cloned();
        let count = characters.as_ref().map(Vec::len).unwrap_or_default();

        let mut state = self.state.lock().await;
        if !state.characters_loaded(generation, characters) {
            debug!(generation = generation.0, "characters arrived for superseded selection");
            return ChainOutcome::Superseded { generation };
        }
        match failure {
            Some(failure) => ChainOutcome::Failed(failure),
            None => {
                info!(episode = episode.0, generation = generation.0, count, "selection loaded");
                ChainOutcome::Loaded {
                    generation,
                    characters: count,
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
