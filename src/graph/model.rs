use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use super::payload::RawGraph;

/// Smallest derived node value; also the collision radius of every node.
pub const NODE_MIN: u32 = 6;
/// Largest radius a node is drawn with.
pub const NODE_MAX: u32 = 18;
pub const LINK_MIN: u32 = 18;
pub const LINK_MAX: u32 = 36;

#[derive(Clone, Debug)]
pub struct GraphNode {
    pub id: String,
    pub entity_type: Option<String>,
    pub value: u32,
    pub in_degree: u32,
    pub out_degree: u32,
    pub properties: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

#[derive(Clone, Debug)]
pub struct CategoryGroup {
    pub label: String,
    pub members: Vec<usize>,
}

/// Ingested graph with per-node derived size and category groupings.
///
/// Replaced wholesale on every successful fetch; layout state lives elsewhere.
#[derive(Clone, Debug, Default)]
pub struct GraphDataModel {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    index_by_id: HashMap<String, usize>,
    groups: Vec<CategoryGroup>,
    group_by_label: HashMap<String, usize>,
    node_groups: Vec<usize>,
}

fn derived_value(in_degree: u32, out_degree: u32) -> u32 {
    in_degree.max(out_degree).max(NODE_MIN)
}

impl GraphDataModel {
    pub fn ingest(raw: RawGraph, unknown_label: &str) -> Self {
        let mut in_degree: HashMap<&str, u32> = HashMap::new();
        let mut out_degree: HashMap<&str, u32> = HashMap::new();
        for edge in &raw.edges {
            *in_degree.entry(edge.target.as_str()).or_default() += 1;
            *out_degree.entry(edge.source.as_str()).or_default() += 1;
        }

        let mut nodes = Vec::with_capacity(raw.nodes.len());
        let mut index_by_id = HashMap::with_capacity(raw.nodes.len());
        let mut groups: Vec<CategoryGroup> = Vec::new();
        let mut group_by_label: HashMap<String, usize> = HashMap::new();
        let mut node_groups = Vec::with_capacity(raw.nodes.len());

        for raw_node in &raw.nodes {
            if index_by_id.contains_key(&raw_node.id) {
                debug!(node = %raw_node.id, "skipping duplicate node id");
                continue;
            }

            let (entity_type, properties) = match &raw_node.properties {
                Some(properties) => (
                    properties
                        .entity_type
                        .clone()
                        .filter(|entity_type| !entity_type.is_empty()),
                    properties.extra.clone(),
                ),
                None => (None, Map::new()),
            };

            let node_in = in_degree.get(raw_node.id.as_str()).copied().unwrap_or(0);
            let node_out = out_degree.get(raw_node.id.as_str()).copied().unwrap_or(0);
            let index = nodes.len();

            let label = entity_type.as_deref().unwrap_or(unknown_label);
            let group_index = match group_by_label.get(label) {
                Some(&group_index) => group_index,
                None => {
                    groups.push(CategoryGroup {
                        label: label.to_owned(),
                        members: Vec::new(),
                    });
                    group_by_label.insert(label.to_owned(), groups.len() - 1);
                    groups.len() - 1
                }
            };
            groups[group_index].members.push(index);
            node_groups.push(group_index);

            index_by_id.insert(raw_node.id.clone(), index);
            nodes.push(GraphNode {
                id: raw_node.id.clone(),
                entity_type,
                value: derived_value(node_in, node_out),
                in_degree: node_in,
                out_degree: node_out,
                properties,
            });
        }

        let edges = raw
            .edges
            .into_iter()
            .map(|edge| GraphEdge {
                id: edge.id,
                source: edge.source,
                target: edge.target,
            })
            .collect::<Vec<_>>();

        Self {
            nodes,
            edges,
            index_by_id,
            groups,
            group_by_label,
            node_groups,
        }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn groups(&self) -> &[CategoryGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_index(id).map(|index| &self.nodes[index])
    }

    #[cfg(test)]
    pub fn group(&self, label: &str) -> Option<&CategoryGroup> {
        self.group_by_label.get(label).map(|&index| &self.groups[index])
    }

    pub fn category_labels(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.label.as_str())
    }

    /// Label of the group a node was filed under; the fallback label when the
    /// node declares no category.
    pub fn category_label(&self, index: usize) -> Option<&str> {
        let &group_index = self.node_groups.get(index)?;
        Some(self.groups[group_index].label.as_str())
    }

    /// Indices of both endpoints, or `None` when either id names no node.
    pub fn resolve(&self, edge: &GraphEdge) -> Option<(usize, usize)> {
        Some((self.node_index(&edge.source)?, self.node_index(&edge.target)?))
    }

    pub fn incident_edges<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |edge| {
            (edge.source == id || edge.target == id) && self.resolve(edge).is_some()
        })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::graph::parse_graph_payload;

    fn model(json: &str) -> GraphDataModel {
        GraphDataModel::ingest(parse_graph_payload(json).expect("payload"), "Unknown")
    }

    #[test]
    fn uncategorized_nodes_clamp_to_minimum_and_share_fallback_group() {
        let model = model(
            r#"{"nodes": [{"id": "A"}, {"id": "B"}, {"id": "C"}],
                "edges": [{"id": "e1", "source": "A", "target": "B"}]}"#,
        );

        for id in ["A", "B", "C"] {
            assert_eq!(model.node(id).map(|node| node.value), Some(NODE_MIN));
        }
        assert_eq!(model.groups().len(), 1);
        assert_eq!(model.groups()[0].label, "Unknown");
        assert_eq!(model.groups()[0].members, vec![0, 1, 2]);
        assert_eq!(model.node("A").map(|node| node.out_degree), Some(1));
        assert_eq!(model.node("B").map(|node| node.in_degree), Some(1));
    }

    #[test]
    fn value_is_larger_of_in_and_out_degree() {
        let mut edges = Vec::new();
        for index in 0..9 {
            edges.push(format!(
                r#"{{"id": "in{index}", "source": "leaf{index}", "target": "hub"}}"#
            ));
        }
        for index in 0..7 {
            edges.push(format!(
                r#"{{"id": "out{index}", "source": "hub", "target": "leaf{index}"}}"#
            ));
        }
        let json = format!(
            r#"{{"nodes": [{{"id": "hub"}}, {{"id": "leaf0"}}], "edges": [{}]}}"#,
            edges.join(",")
        );
        let model = model(&json);

        assert_eq!(model.node("hub").map(|node| node.value), Some(9));
        assert_eq!(model.node("leaf0").map(|node| node.value), Some(NODE_MIN));
    }

    #[test]
    fn groups_follow_arrival_order() {
        let model = model(
            r#"{"nodes": [
                {"id": "alice", "properties": {"entity_type": "person"}},
                {"id": "acme", "properties": {"entity_type": "organization"}},
                {"id": "bob", "properties": {"entity_type": "person"}},
                {"id": "misc", "properties": {"entity_type": ""}}
            ]}"#,
        );

        let labels = model.category_labels().collect::<Vec<_>>();
        assert_eq!(labels, vec!["person", "organization", "Unknown"]);
        assert_eq!(model.group("person").map(|group| group.members.clone()), Some(vec![0, 2]));
        assert_eq!(model.category_label(3), Some("Unknown"));
        assert_eq!(model.node("misc").and_then(|node| node.entity_type.clone()), None);
    }

    #[test]
    fn dangling_edges_count_toward_degree_but_do_not_resolve() {
        let model = model(
            r#"{"nodes": [{"id": "A"}],
                "edges": [{"id": "e1", "source": "A", "target": "ghost"}]}"#,
        );

        assert!(model.resolve(&model.edges()[0]).is_none());
        assert_eq!(model.incident_edges("A").count(), 0);
        assert_eq!(model.node("A").map(|node| node.out_degree), Some(1));
    }

    #[test]
    fn duplicate_ids_keep_first_record() {
        let model = model(
            r#"{"nodes": [
                {"id": "A", "properties": {"entity_type": "person"}},
                {"id": "A", "properties": {"entity_type": "place"}}
            ]}"#,
        );

        assert_eq!(model.nodes().len(), 1);
        assert_eq!(model.category_labels().collect::<Vec<_>>(), vec!["person"]);
    }

    proptest! {
        #[test]
        fn value_matches_degree_formula(
            pairs in proptest::collection::vec((0usize..8, 0usize..8), 0..60)
        ) {
            let nodes = (0..8)
                .map(|index| format!(r#"{{"id": "n{index}"}}"#))
                .collect::<Vec<_>>()
                .join(",");
            let edges = pairs
                .iter()
                .enumerate()
                .map(|(index, (source, target))| {
                    format!(r#"{{"id": "e{index}", "source": "n{source}", "target": "n{target}"}}"#)
                })
                .collect::<Vec<_>>()
                .join(",");
            let model = model(&format!(r#"{{"nodes": [{nodes}], "edges": [{edges}]}}"#));

            for index in 0..8 {
                let indegree = pairs.iter().filter(|(_, target)| *target == index).count() as u32;
                let outdegree = pairs.iter().filter(|(source, _)| *source == index).count() as u32;
                let node = model.node(&format!("n{index}")).expect("node exists");
                prop_assert_eq!(node.value, indegree.max(outdegree).max(NODE_MIN));
            }
        }
    }
}
