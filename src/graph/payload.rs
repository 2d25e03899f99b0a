use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawProperties {
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawNode {
    pub id: String,
    #[serde(default)]
    pub properties: Option<RawProperties>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawGraph {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}

pub fn parse_graph_payload(raw: &str) -> Result<RawGraph> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in graph payload")?;
    if parsed.is_null() {
        return Ok(RawGraph::default());
    }

    RawGraph::deserialize(parsed).context("graph payload does not match the nodes/edges shape")
}
