use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};

use crate::graph::NODE_MAX;

use super::Theme;
use super::highlight::Highlight;
use super::viewport::Camera;

const LABEL_MAX_FONT: f32 = 15.0;
const LABEL_OFFSET: f32 = 2.0;

pub(super) struct LinkStyle {
    pub(super) color: Color32,
    pub(super) width: f32,
    pub(super) particle_width: f32,
}

pub(super) fn link_style(theme: Theme, highlighted: bool) -> LinkStyle {
    let color = match (theme, highlighted) {
        (Theme::Dark, true) => Color32::from_rgb(0xEE, 0xEE, 0xEE),
        (Theme::Dark, false) => Color32::from_rgb(0x55, 0x59, 0x5F),
        (Theme::Light, true) => Color32::from_rgb(0x99, 0x99, 0x99),
        (Theme::Light, false) => Color32::from_rgb(0xDD, 0xDD, 0xDD),
    };

    LinkStyle {
        color,
        width: if highlighted { 2.0 } else { 1.0 },
        particle_width: if highlighted { 3.0 } else { 0.0 },
    }
}

pub(super) fn node_radius(value: u32, hovered: bool) -> f32 {
    value.min(NODE_MAX) as f32 + if hovered { 1.0 } else { 0.0 }
}

fn grayscale(color: Color32) -> u8 {
    let luma =
        color.r() as f32 * 0.3 + color.g() as f32 * 0.59 + color.b() as f32 * 0.11;
    luma.round().clamp(0.0, 255.0) as u8
}

/// Grey variant used for nodes outside the highlight set: darkened on a dark
/// background, lightened on a light one.
pub(super) fn desaturate(color: Color32, theme: Theme) -> Color32 {
    let gray = grayscale(color) as f32;
    let level = match theme {
        Theme::Dark => gray * (1.0 - 0.3),
        Theme::Light => gray * (1.0 + 0.6),
    };
    let level = level.round().clamp(0.0, 255.0) as u8;
    Color32::from_rgba_unmultiplied(level, level, level, color.a())
}

/// Category color, greyed out when some other nodes are highlighted and this
/// one is not. Hover never fills the node set, so hovering never dims.
pub(super) fn node_fill(color: Color32, highlight: &Highlight, id: &str, theme: Theme) -> Color32 {
    if highlight.nodes.is_empty() || highlight.nodes.contains(id) {
        color
    } else {
        desaturate(color, theme)
    }
}

/// Largest font size, stepping down from 15, whose label width minus a small
/// offset fits inside `radius`. Returns 0 when nothing fits.
pub(super) fn fit_label_font_size(radius: f32, mut measure: impl FnMut(f32) -> f32) -> f32 {
    let mut size = LABEL_MAX_FONT;
    while size > 0.0 && measure(size) - LABEL_OFFSET > radius {
        size -= 1.0;
    }
    size.max(0.0)
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, camera: Camera, theme: Theme) {
    let (fill, grid) = match theme {
        Theme::Dark => (
            Color32::from_rgb(19, 23, 29),
            Color32::from_rgba_unmultiplied(60, 70, 80, 70),
        ),
        Theme::Light => (
            Color32::from_rgb(250, 250, 250),
            Color32::from_rgba_unmultiplied(200, 205, 210, 90),
        ),
    };
    painter.rect_filled(rect, 0.0, fill);

    let step = (56.0 * camera.zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() - camera.center * camera.zoom;
    let stroke = Stroke::new(1.0, grid);

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn segment_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let bounds = Rect::from_two_pos(start, end).expand(padding);
    bounds.intersects(rect)
}
