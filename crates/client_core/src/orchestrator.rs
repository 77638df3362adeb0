//! Fetch state machine for the film list -> film detail -> characters chain.
//!
//! The orchestrator does no I/O. Callers dispatch the requests it hands out
//! and feed results back tagged with the generation they were issued for;
//! results from a superseded selection are dropped.

use shared::{
    domain::{Character, EpisodeId, Film},
    error::{FailedStage, FetchFailure},
};
use tracing::{debug, info, warn};

/// Selection token. Bumped on every film selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchStage {
    #[default]
    Idle,
    FilmsLoading,
    FilmsLoaded,
    DetailLoading {
        generation: Generation,
    },
    DetailLoaded {
        generation: Generation,
    },
    CharactersLoading {
        generation: Generation,
    },
    CharactersLoaded {
        generation: Generation,
    },
    Failed(FailedStage),
}

impl FetchStage {
    pub fn generation(&self) -> Option<Generation> {
        match *self {
            FetchStage::DetailLoading { generation }
            | FetchStage::DetailLoaded { generation }
            | FetchStage::CharactersLoading { generation }
            | FetchStage::CharactersLoaded { generation } => Some(generation),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            FetchStage::FilmsLoading
                | FetchStage::DetailLoading { .. }
                | FetchStage::DetailLoaded { .. }
                | FetchStage::CharactersLoading { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmRequest {
    pub generation: Generation,
    pub episode: EpisodeId,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharactersRequest {
    pub generation: Generation,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FetchOrchestrator {
    stage: FetchStage,
    generation: Generation,
    films: Vec<Film>,
    selected: Option<EpisodeId>,
    detail: Option<Film>,
    characters: Vec<Character>,
    error: Option<FetchFailure>,
}

impl FetchOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> FetchStage {
        self.stage
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn films(&self) -> &[Film] {
        &self.films
    }

    pub fn selected(&self) -> Option<EpisodeId> {
        self.selected
    }

    pub fn selected_film(&self) -> Option<&Film> {
        let episode = self.selected?;
        self.films.iter().find(|film| film.episode_id == episode)
    }

    pub fn detail(&self) -> Option<&Film> {
        self.detail.as_ref()
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn error(&self) -> Option<&FetchFailure> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.stage.is_loading()
    }

    pub fn films_failed(&self) -> bool {
        self.stage == FetchStage::Failed(FailedStage::Films)
    }

    pub fn characters_ready(&self) -> bool {
        matches!(self.stage, FetchStage::CharactersLoaded { .. })
    }

    /// True when `generation` still belongs to the current selection.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.selected.is_some() && generation == self.generation
    }

    /// Starts the one-time film list load. Returns `false` if it already ran.
    pub fn begin_films_load(&mut self) -> bool {
        if self.stage != FetchStage::Idle {
            debug!(stage = ?self.stage, "film list load already started");
            return false;
        }
        self.stage = FetchStage::FilmsLoading;
        true
    }

    pub fn films_loaded(&mut self, result: Result<Vec<Film>, FetchFailure>) {
        if self.stage != FetchStage::FilmsLoading {
            warn!(stage = ?self.stage, "ignoring film list result outside of FilmsLoading");
            return;
        }
        match result {
            Ok(mut films) => {
                Film::sort_by_release(&mut films);
                info!(count = films.len(), "film list ready");
                self.films = films;
                self.stage = FetchStage::FilmsLoaded;
            }
            Err(failure) => {
                warn!(%failure, "film list failed");
                self.error = Some(failure);
                self.stage = FetchStage::Failed(FailedStage::Films);
            }
        }
    }

    /// Selects a film and restarts the chain from its detail fetch. Previous
    /// detail and characters are discarded. Returns `None` when the episode is
    /// not in the film list.
    pub fn select_film(&mut self, episode: EpisodeId) -> Option<FilmRequest> {
        let url = self
            .films
            .iter()
            .find(|film| film.episode_id == episode)?
            .url
            .clone();

        self.generation = self.generation.next();
        self.selected = Some(episode);
        self.detail = None;
        self.characters.clear();
        self.error = None;
        self.stage = FetchStage::DetailLoading {
            generation: self.generation,
        };
        info!(episode = episode.0, generation = self.generation.0, "film selected");

        Some(FilmRequest {
            generation: self.generation,
            episode,
            url,
        })
    }

    /// Applies a film detail result. On success returns the character URLs to
    /// fetch next.
    pub fn detail_loaded(
        &mut self,
        generation: Generation,
        result: Result<Film, FetchFailure>,
    ) -> Option<CharactersRequest> {
        if self.stage != (FetchStage::DetailLoading { generation }) {
            debug!(
                generation = generation.0,
                current = self.generation.0,
                "dropping stale film detail"
            );
            return None;
        }
        match result {
            Ok(film) => {
                let urls = film.characters.clone();
                self.detail = Some(film);
                self.stage = FetchStage::DetailLoaded { generation };
                Some(CharactersRequest { generation, urls })
            }
            Err(failure) => {
                warn!(generation = generation.0, %failure, "film detail failed");
                self.error = Some(failure);
                self.stage = FetchStage::Failed(FailedStage::Detail);
                None
            }
        }
    }

    pub fn characters_requested(&mut self, generation: Generation) -> bool {
        if self.stage != (FetchStage::DetailLoaded { generation }) {
            return false;
        }
        self.stage = FetchStage::CharactersLoading { generation };
        true
    }

    /// Applies the joined character result. Returns `false` when the result
    /// was stale and dropped.
    pub fn characters_loaded(
        &mut self,
        generation: Generation,
        result: Result<Vec<Character>, FetchFailure>,
    ) -> bool {
        if self.stage != (FetchStage::CharactersLoading { generation }) {
            debug!(
                generation = generation.0,
                current = self.generation.0,
                "dropping stale character list"
            );
            return false;
        }
        match result {
            Ok(characters) => {
                info!(generation = generation.0, count = characters.len(), "characters ready");
                self.characters = characters;
                self.stage = FetchStage::CharactersLoaded { generation };
            }
            Err(failure) => {
                warn!(generation = generation.0, %failure, "character list failed");
                self.error = Some(failure);
                self.stage = FetchStage::Failed(FailedStage::Characters);
            }
        }
        true
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
