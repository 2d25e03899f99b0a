mod model;
mod payload;
mod source;

pub use model::{CategoryGroup, GraphDataModel, GraphEdge, GraphNode, LINK_MAX, LINK_MIN, NODE_MAX, NODE_MIN};
pub use payload::{RawEdge, RawGraph, RawNode, RawProperties, parse_graph_payload};
pub use source::{FetchFailure, FileGraphSource, GraphQuery, GraphSource, HttpGraphSource};
