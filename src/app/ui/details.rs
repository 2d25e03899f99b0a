use eframe::egui::{self, Context, RichText};
use serde_json::Value;

use crate::graph::GraphNode;

pub(super) const DETAIL_ORDER: egui::Order = egui::Order::Middle;

/// Host-provided view of the active entity. The graph only tells it whether it
/// should be open and which node is active; closing goes back through
/// `on_close`.
pub trait NodeDetailPanel {
    fn show(
        &mut self,
        ctx: &Context,
        open: bool,
        node: Option<&GraphNode>,
        on_close: &mut dyn FnMut(),
    );
}

/// Closable window listing the node's derived numbers and raw properties.
pub struct PropertiesPanel {
    title: String,
}

impl PropertiesPanel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

fn property_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl NodeDetailPanel for PropertiesPanel {
    fn show(
        &mut self,
        ctx: &Context,
        open: bool,
        node: Option<&GraphNode>,
        on_close: &mut dyn FnMut(),
    ) {
        let (true, Some(node)) = (open, node) else {
            return;
        };

        let mut window_open = true;
        egui::Window::new(self.title.as_str())
            .id(egui::Id::new("entity_detail_panel"))
            .order(DETAIL_ORDER)
            .open(&mut window_open)
            .collapsible(false)
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.label(RichText::new(node.id.as_str()).strong());
                if let Some(entity_type) = &node.entity_type {
                    ui.small(entity_type.as_str());
                }
                ui.add_space(6.0);

                ui.label(format!("Size: {}", node.value));
                ui.label(format!("Incoming: {}", node.in_degree));
                ui.label(format!("Outgoing: {}", node.out_degree));

                if node.properties.is_empty() {
                    return;
                }
                ui.separator();
                egui::ScrollArea::vertical()
                    .id_salt("entity_detail_properties")
                    .max_height(360.0)
                    .show(ui, |ui| {
                        egui::Grid::new("entity_detail_grid")
                            .num_columns(2)
                            .striped(true)
                            .show(ui, |ui| {
                                for (key, value) in &node.properties {
                                    ui.label(RichText::new(key.as_str()).strong());
                                    ui.label(property_text(value));
                                    ui.end_row();
                                }
                            });
                    });
            });

        if !window_open {
            on_close();
        }
    }
}
