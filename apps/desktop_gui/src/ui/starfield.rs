use eframe::egui::{self, Pos2, Rect};
use rand::Rng;

use crate::ui::theme;

pub const STAR_COUNT: usize = 100;

/// Position in unit coordinates so the field stretches with the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Starfield {
    stars: Vec<Star>,
}

impl Starfield {
    pub fn generate(rng: &mut impl Rng, count: usize) -> Self {
        let stars = (0..count)
            .map(|_| Star {
                x: rng.random_range(0.0..1.0),
                y: rng.random_range(0.0..1.0),
                radius: rng.random_range(0.6..1.4),
            })
            .collect();
        Self { stars }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn position(star: &Star, rect: Rect) -> Pos2 {
        Pos2::new(
            rect.left() + star.x * rect.width(),
            rect.top() + star.y * rect.height(),
        )
    }

    pub fn paint(&self, painter: &egui::Painter, rect: Rect) {
        painter.rect_filled(rect, 0.0, theme::SPACE);
        for star in &self.stars {
            painter.circle_filled(Self::position(star, rect), star.radius, theme::STAR);
        }
    }
}
