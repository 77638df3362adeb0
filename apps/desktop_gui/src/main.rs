mod backend_bridge;
mod controller;
mod media;
mod ui;

use anyhow::Context;
use clap::Parser;
use client_core::{config::load_settings, SwapiClient};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::{commands::BackendCommand, runtime};
use crate::controller::events::UiEvent;
use crate::ui::{FilmBrowserApp, StartupConfig};

#[derive(Parser, Debug)]
#[command(name = "holonet", about = "Browse Star Wars films and their characters")]
struct Args {
    /// Base URL of the film API, e.g. https://swapi.dev/api/
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    page_size: Option<usize>,
    /// Skip downloading and playing the opening theme.
    #[arg(long)]
    no_audio: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size;
    }
    if args.no_audio {
        settings.theme_audio_url = None;
    }
    settings.validate().context("invalid settings")?;
    tracing::info!(api = %settings.api_url, page_size = settings.page_size, "starting holonet");

    let client = SwapiClient::new(&settings.api_url).context("failed to build api client")?;

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    runtime::launch(client, cmd_rx, ui_tx);

    let startup = StartupConfig {
        page_size: settings.page_size,
        audio_enabled: settings.theme_audio_url.is_some(),
        theme_audio_url: settings.theme_audio_url,
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Holonet")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Holonet",
        options,
        Box::new(|_cc| Ok(Box::new(FilmBrowserApp::bootstrap(cmd_tx, ui_rx, startup)))),
    )
    .map_err(|err| anyhow::anyhow!("failed to run the desktop window: {err}"))
}
