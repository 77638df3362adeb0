use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fetch stage a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailedStage {
    Films,
    Detail,
    Characters,
}

impl FailedStage {
    pub fn label(self) -> &'static str {
        match self {
            FailedStage::Films => "film list",
            FailedStage::Detail => "film detail",
            FailedStage::Characters => "character list",
        }
    }
}

/// The single error kind surfaced to the UI: any network or parse failure at
/// any stage collapses into this.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("failed to load {}: {message}", stage.label())]
pub struct FetchFailure {
    pub stage: FailedStage,
    pub message: String,
}

impl FetchFailure {
    pub fn new(stage: FailedStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum UnitError {
    #[error("length must be a finite number, got {0}")]
    NotFinite(f64),
    #[error("length must not be negative, got {0}")]
    Negative(f64),
}
