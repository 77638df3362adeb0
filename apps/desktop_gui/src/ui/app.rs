use std::time::{Duration, Instant};

use client_core::{table::TableState, FetchOrchestrator};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui::{self, Align, Align2, FontId, RichText};
use shared::domain::{EpisodeId, Film};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{BrowserState, Effect};
use crate::media::ThemeAudio;
use crate::ui::{
    intro::{self, IntroFrame},
    modal::CharacterModal,
    starfield::{Starfield, STAR_COUNT},
    table_view, theme,
};

const SELECT_PLACEHOLDER: &str = "Choose a Star Wars movie";
const FAILED_PLACEHOLDER: &str = "...failed to load movies";
const INTRO_LINE: &str = "A long time ago, in a galaxy far,\nfar away....";
const SELECTOR_WIDTH: f32 = 288.0;

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::NotFound => "Not found",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

/// Whether the film selector accepts input, and the text it shows while closed.
fn selector_label(orchestrator: &FetchOrchestrator) -> (bool, String) {
    if orchestrator.films_failed() {
        return (false, FAILED_PLACEHOLDER.to_string());
    }
    let label = orchestrator
        .selected_film()
        .map(|film| film.title.clone())
        .unwrap_or_else(|| SELECT_PLACEHOLDER.to_string());
    (true, label)
}

fn ui_in_rect(ui: &mut egui::Ui, rect: egui::Rect, add: impl FnOnce(&mut egui::Ui)) {
    let mut child = ui.new_child(
        egui::UiBuilder::new()
            .max_rect(rect)
            .layout(egui::Layout::top_down(egui::Align::Center)),
    );
    child.set_clip_rect(rect);
    add(&mut child);
}

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub page_size: usize,
    pub theme_audio_url: Option<String>,
    pub audio_enabled: bool,
}

pub struct FilmBrowserApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    browser: BrowserState,
    table: TableState,
    modal: CharacterModal,
    audio: ThemeAudio,
    starfield: Starfield,
    started_at: Instant,
    scroll_to_selection: bool,
    theme_applied: bool,
}

impl FilmBrowserApp {
    pub fn bootstrap(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        let theme_audio_url = startup.theme_audio_url.filter(|_| startup.audio_enabled);
        let mut app = Self {
            cmd_tx,
            ui_rx,
            browser: BrowserState::new(theme_audio_url),
            table: TableState::new(startup.page_size),
            modal: CharacterModal::default(),
            audio: ThemeAudio::new(startup.audio_enabled),
            starfield: Starfield::generate(&mut rand::rng(), STAR_COUNT),
            started_at: Instant::now(),
            scroll_to_selection: false,
            theme_applied: false,
        };
        let effects = app.browser.start();
        app.run_effects(effects);
        app
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            let effects = self.browser.apply(event);
            self.run_effects(effects);
        }
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Dispatch(cmd) => {
                    dispatch_backend_command(&self.cmd_tx, cmd, &mut self.browser.status)
                }
                Effect::PlayThemeAudio(bytes) => {
                    if let Err(err) = self.audio.play(bytes) {
                        tracing::warn!("theme audio unavailable: {err:#}");
                        self.browser.banner = Some(UiError::from_message(
                            UiErrorContext::ThemeAudio,
                            format!("{err:#}"),
                        ));
                    }
                }
                Effect::ResetTable => self.table.reset(),
                Effect::ScrollToSelection => self.scroll_to_selection = true,
            }
        }
    }

    fn select_film(&mut self, episode: EpisodeId) {
        self.modal.close(Instant::now());
        let effects = self.browser.select_film(episode);
        self.run_effects(effects);
    }

    fn show_title_page(&mut self, ui: &mut egui::Ui, frame: IntroFrame, page_height: f32) {
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), page_height),
            egui::Sense::hover(),
        );
        let painter = ui.painter_at(rect);

        if frame.text_opacity > 0.0 {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                INTRO_LINE,
                FontId::proportional(44.0),
                theme::faded(theme::INTRO_BLUE, frame.text_opacity),
            );
        }
        if frame.logo > 0.0 {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "STAR\nWARS",
                FontId::proportional(120.0 * frame.logo),
                theme::faded(theme::CRAWL_YELLOW, frame.logo),
            );
        }

        let selector_rect = egui::Rect::from_center_size(
            egui::pos2(rect.center().x, rect.bottom() - 48.0),
            egui::vec2(SELECTOR_WIDTH, 40.0),
        );
        ui_in_rect(ui, selector_rect, |ui| {
            self.show_film_selector(ui, frame.selector_opacity)
        });
    }

    fn show_film_selector(&mut self, ui: &mut egui::Ui, opacity: f32) {
        ui.set_opacity(opacity);
        ui.visuals_mut().widgets.inactive.weak_bg_fill = theme::AMBER_LIGHT;
        ui.visuals_mut().override_text_color = Some(egui::Color32::BLACK);

        let (enabled, selected_text) = selector_label(&self.browser.orchestrator);
        if !enabled {
            ui.add_enabled_ui(false, |ui| {
                egui::ComboBox::from_id_salt("film_select")
                    .width(SELECTOR_WIDTH)
                    .selected_text(RichText::new(selected_text).italics())
                    .show_ui(ui, |_| {});
            });
            return;
        }

        let selected = self.browser.orchestrator.selected();
        let mut choice = None;
        egui::ComboBox::from_id_salt("film_select")
            .width(SELECTOR_WIDTH)
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for film in self.browser.orchestrator.films() {
                    if ui
                        .selectable_label(selected == Some(film.episode_id), &film.title)
                        .clicked()
                    {
                        choice = Some(film.episode_id);
                    }
                }
            });
        if let Some(episode) = choice {
            self.select_film(episode);
        }
    }

    fn show_selection_page(&mut self, ui: &mut egui::Ui, page_height: f32, now: Instant) {
        if self.browser.orchestrator.selected().is_none() {
            return;
        }
        if std::mem::take(&mut self.scroll_to_selection) {
            ui.scroll_to_cursor(Some(Align::TOP));
        }

        let mut open_modal = false;
        let mut toggle_mute = false;
        let muted = self.audio.is_muted();
        let playing = self.audio.is_playing();
        let orchestrator = &self.browser.orchestrator;
        ui.allocate_ui_with_layout(
            egui::vec2(ui.available_width(), page_height),
            egui::Layout::top_down(Align::Center),
            |ui| {
                ui.set_min_height(page_height);

                if orchestrator.is_loading() {
                    ui.add_space((page_height / 2.0 - 24.0).max(0.0));
                    ui.add(egui::Spinner::new().size(48.0).color(theme::CRAWL_YELLOW));
                    return;
                }

                if let Some(failure) = orchestrator.error() {
                    let err = UiError::from_failure(failure);
                    ui.add_space((page_height / 2.0 - 40.0).max(0.0));
                    ui.label(
                        RichText::new(err.headline())
                            .size(24.0)
                            .strong()
                            .color(theme::ERROR_RED),
                    );
                    ui.label(RichText::new(err.message()).color(theme::AMBER_LIGHT));
                    return;
                }

                let Some(film) = orchestrator.detail().filter(|_| orchestrator.characters_ready())
                else {
                    return;
                };
                show_crawl(ui, film);

                ui.add_space(24.0);
                ui.horizontal(|ui| {
                    let show = egui::Button::new(
                        RichText::new("Show Movie Characters")
                            .size(20.0)
                            .strong()
                            .color(egui::Color32::WHITE),
                    )
                    .fill(theme::AMBER);
                    if ui.add(show).clicked() {
                        open_modal = true;
                    }
                    let mute_label = if muted { "Unmute" } else { "Mute" };
                    if ui.button(mute_label).clicked() {
                        toggle_mute = true;
                    }
                    if playing {
                        ui.weak(if muted { "Theme playing (muted)" } else { "Theme playing" });
                    }
                });
            },
        );

        if open_modal {
            self.modal.open(now);
        }
        if toggle_mute {
            self.audio.toggle_mute();
        }
    }

    fn show_character_modal(&mut self, ctx: &egui::Context, now: Instant) {
        self.modal.tick(now);
        if !self.modal.is_visible() {
            return;
        }
        let opacity = self.modal.opacity(now);
        let title = match self.browser.orchestrator.detail() {
            Some(film) => format!("Star Wars - {}: Characters", film.title),
            None => "Characters".to_string(),
        };

        let mut open = true;
        egui::Window::new(title)
            .id(egui::Id::new("character_modal"))
            .collapsible(false)
            .resizable(true)
            .default_width(720.0)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(egui::Frame::window(&ctx.style()).multiply_with_opacity(opacity))
            .open(&mut open)
            .show(ctx, |ui| {
                ui.multiply_opacity(opacity);
                table_view::show(ui, &mut self.table, self.browser.orchestrator.characters());
            });
        if !open {
            self.modal.close(now);
        }
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .frame(egui::Frame::NONE.fill(theme::SPACE).inner_margin(6.0))
            .show(ctx, |ui| {
                let mut dismiss = false;
                if let Some(banner) = &self.browser.banner {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(banner.headline())
                                .strong()
                                .color(theme::ERROR_RED),
                        );
                        ui.weak(format!("[{}]", err_label(banner.category())));
                        ui.label(banner.message());
                        if ui.small_button("Dismiss").clicked() {
                            dismiss = true;
                        }
                    });
                }
                ui.weak(&self.browser.status);
                if dismiss {
                    self.browser.banner = None;
                }
            });
    }
}

fn show_crawl(ui: &mut egui::Ui, film: &Film) {
    ui.add_space(48.0);
    ui.label(
        RichText::new(format!("Episode {}", film.episode_id))
            .size(36.0)
            .strong()
            .color(theme::CRAWL_YELLOW),
    );
    ui.label(
        RichText::new(film.title.to_uppercase())
            .size(30.0)
            .strong()
            .color(theme::CRAWL_YELLOW),
    );
    ui.add_space(16.0);
    ui.scope(|ui| {
        ui.set_max_width(640.0);
        ui.add(
            egui::Label::new(
                RichText::new(film.opening_crawl.replace("\r\n", "\n"))
                    .size(20.0)
                    .color(theme::CRAWL_YELLOW),
            )
            .wrap(),
        );
    });
}

impl eframe::App for FilmBrowserApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.process_ui_events();
        if !self.theme_applied {
            theme::apply(ctx);
            self.theme_applied = true;
        }

        let elapsed = now.saturating_duration_since(self.started_at);
        let frame = intro::frame_at(elapsed);

        self.show_status_bar(ctx);
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(theme::SPACE))
            .show(ctx, |ui| {
                let viewport = ui.max_rect();
                self.starfield.paint(ui.painter(), viewport);
                let page_height = viewport.height();
                egui::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        self.show_title_page(ui, frame, page_height);
                        self.show_selection_page(ui, page_height, now);
                    });
            });
        self.show_character_modal(ctx, now);

        let animating = !intro::is_settled(elapsed)
            || self.modal.is_animating(now)
            || self.browser.orchestrator.is_loading();
        if animating {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
