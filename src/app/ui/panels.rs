use eframe::egui::{self, Align, Context, Layout, Ui};

use super::super::{Captions, ViewModel};

/// The fullscreen canvas sits below windows so the detail panel stays on top.
pub(super) const FULLSCREEN_ORDER: egui::Order = egui::Order::Background;

impl ViewModel {
    /// Lays out one frame. Returns true when the refresh action was used.
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        captions: &Captions,
        collection: Option<&str>,
        is_loading: bool,
    ) -> bool {
        if self.viewport.is_fullscreen() {
            self.show_fullscreen(ctx, captions);
            return false;
        }

        let mut refresh_requested = false;
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("entity-graph");
                    ui.separator();
                    if let Some(collection) = collection {
                        ui.label(format!("collection: {collection}"));
                    }
                    ui.label(format!("nodes: {}", self.model.nodes().len()));
                    ui.label(format!("edges: {}", self.model.edges().len()));

                    let refresh_button = ui.add_enabled(
                        !is_loading,
                        egui::Button::new(captions.refresh.as_str()),
                    );
                    if refresh_button.clicked() {
                        refresh_requested = true;
                    }
                    if is_loading {
                        ui.spinner();
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button(captions.fullscreen_enter.as_str()).clicked() {
                            self.viewport.toggle_fullscreen();
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui, captions));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui, &captions.empty, false));

        refresh_requested
    }

    fn show_fullscreen(&mut self, ctx: &Context, captions: &Captions) {
        let screen = ctx.screen_rect();
        egui::Area::new(egui::Id::new("graph_fullscreen"))
            .fixed_pos(screen.min)
            .order(FULLSCREEN_ORDER)
            .show(ctx, |ui| {
                ui.set_min_size(screen.size());
                ui.set_max_size(screen.size());

                let exit = ui.button(captions.fullscreen_exit.as_str()).clicked()
                    || ui.input(|input| input.key_pressed(egui::Key::Escape));
                self.draw_graph(ui, &captions.empty, true);
                if exit {
                    self.viewport.toggle_fullscreen();
                }
            });
    }

    fn draw_controls(&mut self, ui: &mut Ui, captions: &Captions) {
        self.draw_search(ui, &captions.search_placeholder);
        ui.separator();
        self.draw_category_tags(ui);
    }
}
