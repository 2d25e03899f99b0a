mod app;
mod graph;
mod messages;
mod util;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::app::{AppConfig, EntityGraphApp, Theme};
use crate::graph::{FileGraphSource, GraphQuery, GraphSource, HttpGraphSource};
use crate::messages::EnglishMessages;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the graph API.
    #[arg(long, default_value = "http://127.0.0.1:8000/api/v1")]
    server: String,

    /// Collection whose graph is shown.
    #[arg(long)]
    collection: Option<String>,

    #[arg(long, default_value = "*")]
    label: String,

    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u32).range(1..=10_000))]
    max_nodes: u32,

    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=10))]
    max_depth: u32,

    #[arg(long, env = "ENTITY_GRAPH_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Read the graph payload from a JSON file instead of the API.
    #[arg(long)]
    graph_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Theme::Dark)]
    theme: Theme,
}

impl Args {
    fn collection(&self) -> Option<String> {
        self.collection.clone().or_else(|| {
            self.graph_file
                .as_ref()
                .and_then(|path| path.file_stem())
                .map(|stem| stem.to_string_lossy().into_owned())
        })
    }

    fn source(&self) -> anyhow::Result<Arc<dyn GraphSource>> {
        if let Some(path) = &self.graph_file {
            return Ok(Arc::new(FileGraphSource::new(path.clone())));
        }

        let query = GraphQuery {
            label: self.label.clone(),
            max_nodes: self.max_nodes,
            max_depth: self.max_depth,
        };
        Ok(Arc::new(HttpGraphSource::new(
            &self.server,
            query,
            self.api_key.clone(),
        )?))
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> eframe::Result<()> {
    init_tracing();
    let args = Args::parse();

    let source = match args.source() {
        Ok(source) => source,
        Err(err) => {
            error!("{err:#}");
            return Err(eframe::Error::AppCreation(err.into()));
        }
    };
    let config = AppConfig {
        source,
        collection: args.collection(),
        theme: args.theme,
    };
    info!(
        collection = config.collection.as_deref().unwrap_or("<none>"),
        "starting entity graph"
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "entity-graph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(EntityGraphApp::new(
                cc,
                config,
                &EnglishMessages,
            )))
        }),
    )
}
