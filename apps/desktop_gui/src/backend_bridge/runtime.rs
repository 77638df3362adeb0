//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{FilmSource, SwapiClient};
use crossbeam_channel::{Receiver, Sender};
use shared::error::FailedStage;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Starts the backend worker thread. Each command runs as its own task so a
/// new selection is never queued behind a superseded one.
pub fn launch(client: SwapiClient, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let client = Arc::new(client);
        runtime.block_on(async move {
            tracing::info!(api = %client.base_url(), "backend worker ready");
            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend: received command");
                tokio::spawn(run_command(Arc::clone(&client), cmd, ui_tx.clone()));
            }
            tracing::info!("ui command channel closed; backend worker exiting");
        });
    });
}

async fn run_command(client: Arc<SwapiClient>, cmd: BackendCommand, ui_tx: Sender<UiEvent>) {
    let event = match cmd {
        BackendCommand::LoadFilms => {
            tracing::info!("backend: load_films");
            let result = client.list_films().await.map_err(|err| {
                tracing::error!("backend: load_films failed: {err}");
                err.into_failure(FailedStage::Films)
            });
            UiEvent::FilmsLoaded(result)
        }
        BackendCommand::LoadFilmDetail { generation, url } => {
            tracing::info!(generation = generation.0, %url, "backend: load_film_detail");
            let result = client.fetch_film(&url).await.map_err(|err| {
                tracing::error!(generation = generation.0, "backend: load_film_detail failed: {err}");
                err.into_failure(FailedStage::Detail)
            });
            UiEvent::FilmDetailLoaded { generation, result }
        }
        BackendCommand::LoadCharacters { generation, urls } => {
            tracing::info!(generation = generation.0, count = urls.len(), "backend: load_characters");
            let result = client.fetch_characters(&urls).await.map_err(|err| {
                tracing::error!(generation = generation.0, "backend: load_characters failed: {err}");
                err.into_failure(FailedStage::Characters)
            });
            UiEvent::CharactersLoaded { generation, result }
        }
        BackendCommand::LoadThemeAudio { url } => {
            tracing::info!(%url, "backend: load_theme_audio");
            match client.fetch_bytes(&url).await {
                Ok(bytes) => UiEvent::ThemeAudioLoaded(bytes),
                Err(err) => {
                    tracing::warn!("backend: load_theme_audio failed: {err}");
                    UiEvent::Error(UiError::from_message(
                        UiErrorContext::ThemeAudio,
                        err.to_string(),
                    ))
                }
            }
        }
    };

    if ui_tx.try_send(event).is_err() {
        tracing::warn!("ui event queue unavailable; dropping backend result");
    }
}
