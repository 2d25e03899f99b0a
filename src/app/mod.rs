use std::sync::Arc;

use eframe::egui::{self, Context};

use crate::graph::{GraphDataModel, GraphNode, GraphSource, RawGraph};
use crate::messages::MessageFormatter;

mod colors;
mod filter;
mod graph;
mod highlight;
mod loader;
mod physics;
mod render_utils;
mod ui;
mod viewport;

use colors::CategoryColorAssigner;
use filter::EntityFilterIndex;
use graph::PickBuffer;
use highlight::HighlightStateMachine;
use loader::GraphLoader;
use physics::ForceLayoutEngine;
use viewport::ViewportController;

pub use ui::{NodeDetailPanel, PropertiesPanel};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    fn visuals(self) -> egui::Visuals {
        match self {
            Theme::Dark => egui::Visuals::dark(),
            Theme::Light => egui::Visuals::light(),
        }
    }
}

/// Localized control captions, resolved once at startup.
struct Captions {
    search_placeholder: String,
    empty: String,
    refresh: String,
    fullscreen_enter: String,
    fullscreen_exit: String,
}

impl Captions {
    fn resolve(messages: &dyn MessageFormatter, collection: Option<&str>) -> Self {
        Self {
            search_placeholder: messages.text("graph.search.placeholder"),
            empty: messages.format("graph.empty", &[("collection", collection.unwrap_or(""))]),
            refresh: messages.text("graph.refresh"),
            fullscreen_enter: messages.text("graph.fullscreen.enter"),
            fullscreen_exit: messages.text("graph.fullscreen.exit"),
        }
    }
}

pub struct AppConfig {
    pub source: Arc<dyn GraphSource>,
    pub collection: Option<String>,
    pub theme: Theme,
}

pub struct EntityGraphApp {
    loader: GraphLoader,
    collection: Option<String>,
    captions: Captions,
    view: ViewModel,
    detail: Box<dyn NodeDetailPanel>,
}

struct ViewModel {
    model: GraphDataModel,
    colors: CategoryColorAssigner,
    filter: EntityFilterIndex,
    highlight: HighlightStateMachine,
    layout: ForceLayoutEngine,
    viewport: ViewportController,
    theme: Theme,
    unknown_label: String,
    search: String,
    particle_clock: f32,
    pick: PickBuffer,
}

impl ViewModel {
    fn new(theme: Theme, unknown_label: String) -> Self {
        Self {
            model: GraphDataModel::default(),
            colors: CategoryColorAssigner::new(),
            filter: EntityFilterIndex::default(),
            highlight: HighlightStateMachine::default(),
            layout: ForceLayoutEngine::default(),
            viewport: ViewportController::default(),
            theme,
            unknown_label,
            search: String::new(),
            particle_clock: 0.0,
            pick: PickBuffer::default(),
        }
    }

    /// Swaps in a freshly fetched graph. Camera, fullscreen state and the
    /// category filter survive the reload.
    fn apply_graph(&mut self, raw: RawGraph) {
        self.model = GraphDataModel::ingest(raw, &self.unknown_label);
        self.colors.observe(self.model.category_labels());
        self.filter.seed(self.model.category_labels());
        self.layout.set_data(&self.model);
        self.highlight.refresh(&self.model);
        self.pick.clear();
    }

    fn active_node(&self) -> Option<&GraphNode> {
        self.highlight.active().and_then(|id| self.model.node(id))
    }
}

impl EntityGraphApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        messages: &dyn MessageFormatter,
    ) -> Self {
        cc.egui_ctx.set_visuals(config.theme.visuals());

        let mut loader = GraphLoader::new(config.source);
        loader.request(config.collection.as_deref());

        Self {
            loader,
            captions: Captions::resolve(messages, config.collection.as_deref()),
            collection: config.collection,
            view: ViewModel::new(config.theme, messages.text("graph.entity.unknown")),
            detail: Box::new(PropertiesPanel::new(messages.text("graph.detail.title"))),
        }
    }
}

impl eframe::App for EntityGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if let Some(Ok(raw)) = self.loader.poll() {
            self.view.apply_graph(raw);
        }

        let refresh_requested = self.view.show(
            ctx,
            &self.captions,
            self.collection.as_deref(),
            self.loader.is_loading(),
        );
        if refresh_requested {
            self.loader.request(self.collection.as_deref());
        }

        let mut closed = false;
        let node = self.view.active_node();
        self.detail
            .show(ctx, node.is_some(), node, &mut || closed = true);
        if closed {
            self.view.close_detail();
        }
    }
}
