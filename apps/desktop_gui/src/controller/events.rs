//! UI/backend events and error modeling for desktop GUI controller.

use client_core::Generation;
use shared::{
    domain::{Character, Film},
    error::{FailedStage, FetchFailure},
};

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    Error(UiError),
    FilmsLoaded(Result<Vec<Film>, FetchFailure>),
    FilmDetailLoaded {
        generation: Generation,
        result: Result<Film, FetchFailure>,
    },
    CharactersLoaded {
        generation: Generation,
        result: Result<Vec<Character>, FetchFailure>,
    },
    ThemeAudioLoaded(Vec<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    NotFound,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    FilmList,
    FilmDetail,
    Characters,
    ThemeAudio,
}

impl From<FailedStage> for UiErrorContext {
    fn from(stage: FailedStage) -> Self {
        match stage {
            FailedStage::Films => UiErrorContext::FilmList,
            FailedStage::Detail => UiErrorContext::FilmDetail,
            FailedStage::Characters => UiErrorContext::Characters,
        }
    }
}

pub fn classify_fetch_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("backend worker startup failure") {
        "Backend worker startup failure; restart the app.".to_string()
    } else if lower.contains("failed to connect")
        || lower.contains("connection refused")
        || lower.contains("dns")
        || lower.contains("timed out")
        || lower.contains("error sending request")
    {
        "Film archive unreachable; check the API URL and network.".to_string()
    } else {
        format!("API error: {message}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("status 404") {
            UiErrorCategory::NotFound
        } else if message_lower.contains("unexpected response body")
            || message_lower.contains("invalid")
            || message_lower.contains("missing field")
            || message_lower.contains("decode")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connect")
            || message_lower.contains("request to")
            || message_lower.contains("network")
            || message_lower.contains("dns")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_failure(failure: &FetchFailure) -> Self {
        Self::from_message(failure.stage.into(), failure.message.clone())
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn headline(&self) -> &'static str {
        match self.context {
            UiErrorContext::BackendStartup => "Backend unavailable",
            UiErrorContext::FilmList => "Could not load the film list",
            UiErrorContext::FilmDetail => "Could not load this film",
            UiErrorContext::Characters => "Could not load the characters",
            UiErrorContext::ThemeAudio => "Theme music unavailable",
        }
    }

    /// Whether the fetch chain is blocked. Audio problems are cosmetic.
    pub fn blocks_chain(&self) -> bool {
        !matches!(self.context, UiErrorContext::ThemeAudio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_stage_to_context() {
        let err = UiError::from_failure(&FetchFailure::new(
            FailedStage::Characters,
            "request to http://x/people/1/ returned status 404",
        ));
        assert_eq!(err.context(), UiErrorContext::Characters);
        assert_eq!(err.category(), UiErrorCategory::NotFound);
        assert_eq!(err.headline(), "Could not load the characters");
    }

    #[test]
    fn classifies_transport_and_decode_failures() {
        let transport = UiError::from_message(
            UiErrorContext::FilmList,
            "request to http://127.0.0.1:1/api/films/ failed: error sending request",
        );
        assert_eq!(transport.category(), UiErrorCategory::Transport);

        let decode = UiError::from_message(
            UiErrorContext::FilmDetail,
            "unexpected response body from http://x/films/1/: missing field `url`",
        );
        assert_eq!(decode.category(), UiErrorCategory::Validation);
    }

    #[test]
    fn audio_errors_do_not_block_the_chain() {
        let err = UiError::from_message(UiErrorContext::ThemeAudio, "status 403");
        assert!(!err.blocks_chain());
    }

    #[test]
    fn friendly_message_for_unreachable_api() {
        assert_eq!(
            classify_fetch_failure("request failed: connection refused"),
            "Film archive unreachable; check the API URL and network."
        );
        assert!(classify_fetch_failure("status 500").starts_with("API error"));
    }
}
