use std::collections::HashSet;

use tracing::debug;

use crate::graph::{GraphDataModel, GraphEdge, GraphNode};

/// Tracks which category labels are currently shown.
#[derive(Clone, Debug, Default)]
pub struct EntityFilterIndex {
    active: HashSet<String>,
    seeded: bool,
}

impl EntityFilterIndex {
    /// Activates every known category the first time the category set is
    /// non-empty. Later calls leave the active set alone, so categories that
    /// appear on a reload start out hidden.
    pub fn seed<'a>(&mut self, categories: impl IntoIterator<Item = &'a str>) {
        if self.seeded {
            return;
        }

        let categories = categories
            .into_iter()
            .map(str::to_owned)
            .collect::<HashSet<_>>();
        if categories.is_empty() {
            return;
        }

        self.active = categories;
        self.seeded = true;
    }

    pub fn toggle(&mut self, label: &str) -> bool {
        let now_active = if self.active.remove(label) {
            false
        } else {
            self.active.insert(label.to_owned());
            true
        };
        debug!(category = label, active = now_active, "toggled category");
        now_active
    }

    pub fn is_active(&self, label: &str) -> bool {
        self.active.contains(label)
    }

    #[cfg(test)]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Nodes without a declared category are always shown.
    pub fn node_visible(&self, node: &GraphNode) -> bool {
        match node.entity_type.as_deref() {
            None => true,
            Some(entity_type) => self.is_active(entity_type),
        }
    }

    /// Both endpoints must resolve and both of their group labels must be
    /// active. Uncategorized endpoints are checked under the fallback label.
    pub fn edge_visible(&self, model: &GraphDataModel, edge: &GraphEdge) -> bool {
        let Some((source, target)) = model.resolve(edge) else {
            return false;
        };

        [source, target].into_iter().all(|index| {
            model
                .category_label(index)
                .is_some_and(|label| self.is_active(label))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::parse_graph_payload;

    fn model(json: &str) -> GraphDataModel {
        GraphDataModel::ingest(parse_graph_payload(json).expect("payload"), "Unknown")
    }

    fn people_and_places() -> GraphDataModel {
        model(
            r#"{"nodes": [
                {"id": "alice", "properties": {"entity_type": "person"}},
                {"id": "bob", "properties": {"entity_type": "person"}},
                {"id": "paris", "properties": {"entity_type": "geo"}},
                {"id": "lyon", "properties": {"entity_type": "geo"}}
            ], "edges": [
                {"id": "e1", "source": "alice", "target": "paris"},
                {"id": "e2", "source": "paris", "target": "lyon"},
                {"id": "e3", "source": "alice", "target": "bob"}
            ]}"#,
        )
    }

    #[test]
    fn everything_visible_after_seeding() {
        let model = people_and_places();
        let mut filter = EntityFilterIndex::default();
        filter.seed(model.category_labels());

        assert!(model.nodes().iter().all(|node| filter.node_visible(node)));
        assert!(model.edges().iter().all(|edge| filter.edge_visible(&model, edge)));
    }

    #[test]
    fn deactivating_a_category_hides_its_nodes_and_touching_edges() {
        let model = people_and_places();
        let mut filter = EntityFilterIndex::default();
        filter.seed(model.category_labels());

        assert!(!filter.toggle("person"));

        let visible_nodes = model
            .nodes()
            .iter()
            .filter(|node| filter.node_visible(node))
            .map(|node| node.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(visible_nodes, vec!["paris", "lyon"]);

        let visible_edges = model
            .edges()
            .iter()
            .filter(|edge| filter.edge_visible(&model, edge))
            .map(|edge| edge.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(visible_edges, vec!["e2"]);

        assert!(filter.toggle("person"));
        assert!(model.edges().iter().all(|edge| filter.edge_visible(&model, edge)));
    }

    #[test]
    fn toggles_are_independent() {
        let mut filter = EntityFilterIndex::default();
        filter.seed(["person", "geo", "event"]);
        filter.toggle("person");
        filter.toggle("geo");

        assert!(!filter.is_active("person"));
        assert!(!filter.is_active("geo"));
        assert!(filter.is_active("event"));
    }

    #[test]
    fn seeds_only_once_and_waits_for_categories() {
        let mut filter = EntityFilterIndex::default();
        filter.seed(std::iter::empty());
        assert_eq!(filter.active_count(), 0);

        filter.seed(["person"]);
        assert!(filter.is_active("person"));

        filter.seed(["person", "organization"]);
        assert!(!filter.is_active("organization"));
        assert_eq!(filter.active_count(), 1);
    }

    #[test]
    fn uncategorized_nodes_stay_visible_but_their_edges_follow_the_fallback_label() {
        let model = model(
            r#"{"nodes": [{"id": "A"}, {"id": "B"}],
                "edges": [{"id": "e1", "source": "A", "target": "B"}]}"#,
        );
        let mut filter = EntityFilterIndex::default();
        filter.seed(model.category_labels());
        filter.toggle("Unknown");

        assert!(model.nodes().iter().all(|node| filter.node_visible(node)));
        assert!(!filter.edge_visible(&model, &model.edges()[0]));
    }

    #[test]
    fn unresolved_edges_are_never_visible() {
        let model = model(
            r#"{"nodes": [{"id": "A"}],
                "edges": [{"id": "e1", "source": "A", "target": "ghost"}]}"#,
        );
        let mut filter = EntityFilterIndex::default();
        filter.seed(model.category_labels());

        assert!(!filter.edge_visible(&model, &model.edges()[0]));
    }
}
