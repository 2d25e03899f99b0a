use eframe::egui::{self, Align2, Color32, FontId, Painter, Rect, Sense, Stroke, Ui};

use super::super::render_utils::{
    circle_visible, draw_background, fit_label_font_size, link_style, node_fill, node_radius,
    segment_visible,
};
use super::super::{Theme, ViewModel};

const PARTICLES_PER_LINK: usize = 2;
const PARTICLE_SPEED: f32 = 0.6;
const LABEL_MEASURE_SIZE: f32 = 15.0;

fn label_color(theme: Theme) -> Color32 {
    match theme {
        Theme::Dark => Color32::from_gray(240),
        Theme::Light => Color32::from_gray(24),
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui, empty_text: &str, overlay: bool) {
        let window = ui.ctx().input(|input| input.screen_rect().size());
        self.viewport.observe(window, ui.available_size(), overlay);

        let (rect, response) =
            ui.allocate_exact_size(self.viewport.size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        let delta_seconds = ui.input(|input| input.stable_dt).clamp(0.0, 0.1);
        self.layout.tick();
        self.viewport.advance(delta_seconds * 1000.0);
        self.particle_clock = (self.particle_clock + delta_seconds * PARTICLE_SPEED).fract();

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        draw_background(&painter, rect, self.viewport.camera(), self.theme);
        ui.ctx().request_repaint();

        if self.model.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                empty_text,
                FontId::proportional(16.0),
                label_color(self.theme),
            );
            self.pick.clear();
            return;
        }

        self.draw_links(&painter, rect);
        self.draw_nodes(&painter, rect);

        let picked = response
            .hover_pos()
            .and_then(|pointer| self.pick.pick(pointer))
            .and_then(|index| self.model.nodes().get(index))
            .map(|node| node.id.clone());

        if picked.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        self.hover_node(picked.as_deref());
        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(id) = picked
        {
            self.click_node(&id);
        }
    }

    fn draw_links(&self, painter: &Painter, rect: Rect) {
        let zoom = self.viewport.camera().zoom;
        let highlight = self.highlight.highlight();

        for edge in self.model.edges() {
            if !self.filter.edge_visible(&self.model, edge) {
                continue;
            }
            let Some((source, target)) = self.model.resolve(edge) else {
                continue;
            };
            if source == target {
                continue;
            }
            let (Some(start), Some(end)) =
                (self.layout.position_at(source), self.layout.position_at(target))
            else {
                continue;
            };

            let start = self.viewport.world_to_screen(rect, start);
            let end = self.viewport.world_to_screen(rect, end);
            if !segment_visible(rect, start, end, 4.0 * zoom) {
                continue;
            }

            let style = link_style(self.theme, highlight.links.contains(&edge.id));
            painter.line_segment([start, end], Stroke::new(style.width * zoom, style.color));

            if style.particle_width <= 0.0 {
                continue;
            }
            for particle in 0..PARTICLES_PER_LINK {
                let phase =
                    (self.particle_clock + particle as f32 / PARTICLES_PER_LINK as f32).fract();
                painter.circle_filled(
                    start + (end - start) * phase,
                    style.particle_width * zoom / 2.0,
                    style.color,
                );
            }
        }
    }

    fn draw_nodes(&mut self, painter: &Painter, rect: Rect) {
        let zoom = self.viewport.camera().zoom;
        let highlight = self.highlight.highlight();
        let hovered = self.highlight.hovered();
        let text_color = label_color(self.theme);

        self.pick.clear();
        for (index, node) in self.model.nodes().iter().enumerate() {
            if !self.filter.node_visible(node) {
                continue;
            }
            let Some(world) = self.layout.position_at(index) else {
                continue;
            };

            let radius = node_radius(node.value, hovered == Some(node.id.as_str()));
            let center = self.viewport.world_to_screen(rect, world);
            let screen_radius = radius * zoom;
            if !circle_visible(rect, center, screen_radius) {
                continue;
            }

            let category = self
                .model
                .category_label(index)
                .unwrap_or(self.unknown_label.as_str());
            let fill = node_fill(self.colors.color(category), highlight, &node.id, self.theme);

            painter.circle_filled(center, screen_radius, fill);
            painter.circle_stroke(center, screen_radius, Stroke::new(zoom, Color32::WHITE));

            let reference_width = painter
                .layout_no_wrap(
                    node.id.clone(),
                    FontId::proportional(LABEL_MEASURE_SIZE),
                    text_color,
                )
                .size()
                .x;
            let font_size = fit_label_font_size(radius, |size| {
                reference_width * size / LABEL_MEASURE_SIZE
            });
            if font_size > 0.0 {
                painter.text(
                    center,
                    Align2::CENTER_CENTER,
                    &node.id,
                    FontId::proportional(font_size * zoom),
                    text_color,
                );
            }

            self.pick.push_disk(index, center, screen_radius);
        }
    }
}
