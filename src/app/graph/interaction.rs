use eframe::egui::{self, Rect, Ui};

use super::super::ViewModel;
use super::super::highlight::Transition;
use super::super::viewport::CameraCommand;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.viewport.zoom_around(rect, pointer, zoom_factor);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.viewport.pan_by(response.drag_delta());
        }
    }

    pub(in crate::app) fn hover_node(&mut self, id: Option<&str>) {
        self.highlight.hover(&self.model, id);
    }

    pub(in crate::app) fn click_node(&mut self, id: &str) {
        let transition = self.highlight.click(&self.model, id);
        self.frame_camera(transition);
    }

    pub(in crate::app) fn select_node(&mut self, id: &str) {
        let transition = self.highlight.select(&self.model, id);
        self.frame_camera(transition);
    }

    pub(in crate::app) fn close_detail(&mut self) {
        let transition = self.highlight.close(&self.model);
        self.frame_camera(transition);
    }

    pub(in crate::app) fn toggle_category(&mut self, label: &str) {
        self.filter.toggle(label);
    }

    fn frame_camera(&mut self, transition: Transition) {
        match transition {
            Transition::Activated(id) => {
                if let Some(position) = self.layout.position(&id) {
                    self.viewport.command(CameraCommand::focus(position));
                }
            }
            Transition::Deactivated => self.viewport.command(CameraCommand::overview()),
            Transition::Unchanged | Transition::HoverChanged => {}
        }
    }
}
