//! Character modal visibility. Closing is logically immediate; the window
//! keeps fading for [`CLOSE_DELAY`] before it is hidden.

use std::time::{Duration, Instant};

use crate::ui::intro::{FADE_IN, FADE_OUT};

pub const CLOSE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalPhase {
    #[default]
    Closed,
    Open { since: Instant },
    Closing { since: Instant },
}

#[derive(Debug, Default)]
pub struct CharacterModal {
    phase: ModalPhase,
}

impl CharacterModal {
    #[cfg(test)]
    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    pub fn open(&mut self, now: Instant) {
        self.phase = ModalPhase::Open { since: now };
    }

    pub fn close(&mut self, now: Instant) {
        if let ModalPhase::Open { .. } = self.phase {
            self.phase = ModalPhase::Closing { since: now };
        }
    }

    /// Advances `Closing` to `Closed` once the delay has passed.
    pub fn tick(&mut self, now: Instant) {
        if let ModalPhase::Closing { since } = self.phase {
            if now.saturating_duration_since(since) >= CLOSE_DELAY {
                self.phase = ModalPhase::Closed;
            }
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.phase, ModalPhase::Open { .. })
    }

    /// Whether anything should be drawn this frame.
    pub fn is_visible(&self) -> bool {
        !matches!(self.phase, ModalPhase::Closed)
    }

    pub fn opacity(&self, now: Instant) -> f32 {
        match self.phase {
            ModalPhase::Closed => 0.0,
            ModalPhase::Open { since } => FADE_IN.sample(now.saturating_duration_since(since)),
            ModalPhase::Closing { since } => FADE_OUT.sample(now.saturating_duration_since(since)),
        }
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        match self.phase {
            ModalPhase::Closed => false,
            ModalPhase::Open { since } => !FADE_IN.is_finished(now.saturating_duration_since(since)),
            ModalPhase::Closing { .. } => true,
        }
    }
}
