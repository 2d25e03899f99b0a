use crate::graph::GraphDataModel;

use super::{Highlight, HighlightMode};

/// Recomputes the highlighted node and link sets from scratch for `mode`.
pub(in crate::app) fn derive_highlight(mode: &HighlightMode, model: &GraphDataModel) -> Highlight {
    let mut highlight = Highlight::default();

    match mode {
        HighlightMode::Idle => {}
        HighlightMode::Hovered(id) => {
            for edge in model.incident_edges(id) {
                highlight.links.insert(edge.id.clone());
            }
        }
        HighlightMode::Active(id) => {
            if model.node(id).is_some() {
                highlight.nodes.insert(id.clone());
            }
            for edge in model.incident_edges(id) {
                highlight.links.insert(edge.id.clone());
                highlight.nodes.insert(edge.source.clone());
                highlight.nodes.insert(edge.target.clone());
            }
        }
    }

    highlight
}
