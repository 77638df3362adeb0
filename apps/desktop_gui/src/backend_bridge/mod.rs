//! Backend bridge: commands queued from the UI and the worker that runs them.

pub mod commands;
pub mod runtime;
