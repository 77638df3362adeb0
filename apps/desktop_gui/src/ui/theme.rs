use eframe::egui::{self, Color32};

pub const SPACE: Color32 = Color32::BLACK;
pub const CRAWL_YELLOW: Color32 = Color32::from_rgb(255, 232, 31);
pub const INTRO_BLUE: Color32 = Color32::from_rgb(96, 165, 250);
pub const AMBER_LIGHT: Color32 = Color32::from_rgb(253, 230, 138);
pub const AMBER: Color32 = Color32::from_rgb(245, 158, 11);
pub const ERROR_RED: Color32 = Color32::from_rgb(239, 68, 68);
pub const STAR: Color32 = Color32::from_rgb(235, 235, 245);

/// Scales a color's alpha by `opacity` in `[0, 1]`.
pub fn faded(color: Color32, opacity: f32) -> Color32 {
    color.gamma_multiply(opacity.clamp(0.0, 1.0))
}

pub fn apply(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = SPACE;
    visuals.window_fill = Color32::from_rgb(12, 12, 16);
    visuals.extreme_bg_color = Color32::from_rgb(18, 18, 24);
    visuals.override_text_color = Some(AMBER_LIGHT);
    visuals.selection.bg_fill = AMBER.gamma_multiply(0.6);
    visuals.hyperlink_color = CRAWL_YELLOW;
    visuals.widgets.hovered.weak_bg_fill = Color32::from_rgb(40, 34, 20);
    visuals.widgets.active.weak_bg_fill = Color32::from_rgb(60, 48, 20);
    ctx.set_visuals(visuals);
}
