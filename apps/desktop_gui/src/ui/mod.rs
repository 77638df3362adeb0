//! UI layer for the film browser: app shell, intro sequence, character modal and table.

pub mod app;
pub mod intro;
pub mod modal;
pub mod starfield;
pub mod table_view;
pub mod theme;

pub use app::{FilmBrowserApp, StartupConfig};
