mod forces;
mod quadtree;

use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};
use tracing::debug;

use crate::graph::{GraphDataModel, LINK_MAX, LINK_MIN, NODE_MIN};
use forces::{
    CollisionParams, LinkSpring, accumulate_charge_for_node, accumulate_collision_pairs,
    apply_centering, apply_links,
};
use quadtree::QuadNode;

const CHARGE_STRENGTH: f32 = -40.0;
const CENTER_STRENGTH: f32 = 0.1;
const COLLISION_STRENGTH: f32 = 1.0;
const BARNES_HUT_THETA: f32 = 0.9;
const VELOCITY_DECAY: f32 = 0.4;
const ALPHA_FLOOR: f32 = 0.002;
const INITIAL_RADIUS: f32 = 10.0;

fn alpha_decay() -> f32 {
    1.0 - 0.001_f32.powf(1.0 / 300.0)
}

/// Target length of a link between nodes of the given derived values.
pub fn link_distance(source_value: u32, target_value: u32) -> f32 {
    source_value
        .max(target_value)
        .max(LINK_MIN)
        .clamp(LINK_MIN, LINK_MAX) as f32
}

fn phyllotaxis(index: usize) -> Vec2 {
    let angle = index as f32 * std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
    vec2(radius * angle.cos(), radius * angle.sin())
}

/// Simulation state kept beside the data model: one body per node, stored in
/// the model's node order and addressable by id.
#[derive(Default)]
pub struct ForceLayoutEngine {
    ids: Vec<String>,
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    index_by_id: HashMap<String, usize>,
    links: Vec<LinkSpring>,
    alpha: f32,
    predicted: Vec<Vec2>,
    collision_deltas: Vec<Vec2>,
}

impl ForceLayoutEngine {
    /// Replaces every body and link and reheats the simulation.
    pub fn set_data(&mut self, model: &GraphDataModel) {
        let nodes = model.nodes();
        self.ids = nodes.iter().map(|node| node.id.clone()).collect();
        self.positions = (0..nodes.len()).map(phyllotaxis).collect();
        self.velocities = vec![Vec2::ZERO; nodes.len()];
        self.index_by_id = self
            .ids
            .iter()
            .enumerate()
            .map(|(index, id)| (id.clone(), index))
            .collect();

        let mut resolved = Vec::with_capacity(model.edges().len());
        for edge in model.edges() {
            match model.resolve(edge) {
                Some((source, target)) if source != target => resolved.push((source, target)),
                Some(_) => debug!(edge = %edge.id, "self-loop excluded from layout"),
                None => debug!(
                    edge = %edge.id,
                    source = %edge.source,
                    target = %edge.target,
                    "edge endpoint does not resolve; dropping"
                ),
            }
        }

        let mut degree = vec![0u32; nodes.len()];
        for &(source, target) in &resolved {
            degree[source] += 1;
            degree[target] += 1;
        }

        self.links = resolved
            .into_iter()
            .map(|(source, target)| {
                let source_degree = degree[source] as f32;
                let target_degree = degree[target] as f32;
                LinkSpring {
                    source,
                    target,
                    distance: link_distance(nodes[source].value, nodes[target].value),
                    strength: 1.0 / source_degree.min(target_degree),
                    bias: source_degree / (source_degree + target_degree),
                }
            })
            .collect();

        self.alpha = 1.0;
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[cfg(test)]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn position(&self, id: &str) -> Option<Vec2> {
        self.index_by_id.get(id).map(|&index| self.positions[index])
    }

    pub fn position_at(&self, index: usize) -> Option<Vec2> {
        self.positions.get(index).copied()
    }

    pub fn link_lengths(&self) -> impl Iterator<Item = (&str, &str, f32)> {
        self.links.iter().map(|link| {
            (
                self.ids[link.source].as_str(),
                self.ids[link.target].as_str(),
                link.distance,
            )
        })
    }

    /// Advances one animation frame. Alpha cools towards a floor but never
    /// reaches zero, so the layout keeps settling for as long as it is ticked.
    pub fn tick(&mut self) {
        let node_count = self.positions.len();
        if node_count == 0 {
            return;
        }

        self.alpha = (self.alpha - self.alpha * alpha_decay()).max(ALPHA_FLOOR);
        let alpha = self.alpha;

        apply_links(&self.links, &self.positions, &mut self.velocities, alpha);

        if let Some(quadtree) = QuadNode::build(&self.positions) {
            for (index, velocity) in self.velocities.iter_mut().enumerate() {
                accumulate_charge_for_node(
                    &quadtree,
                    index,
                    &self.positions,
                    CHARGE_STRENGTH,
                    alpha,
                    BARNES_HUT_THETA,
                    velocity,
                );
            }
        }

        self.predicted.clear();
        self.predicted.extend(
            self.positions
                .iter()
                .zip(&self.velocities)
                .map(|(position, velocity)| *position + *velocity),
        );
        self.collision_deltas.clear();
        self.collision_deltas.resize(node_count, Vec2::ZERO);
        if let Some(quadtree) = QuadNode::build(&self.predicted) {
            accumulate_collision_pairs(
                &quadtree,
                &quadtree,
                true,
                &self.predicted,
                CollisionParams {
                    radius: NODE_MIN as f32,
                    strength: COLLISION_STRENGTH,
                },
                &mut self.collision_deltas,
            );
        }
        for (velocity, delta) in self.velocities.iter_mut().zip(&self.collision_deltas) {
            *velocity += *delta;
        }

        apply_centering(&self.positions, &mut self.velocities, CENTER_STRENGTH, alpha);

        for (position, velocity) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            *velocity *= 1.0 - VELOCITY_DECAY;
            *position += *velocity;
        }
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

    fn star(leaves: usize) -> GraphDataModel {
        let nodes = std::iter::once(r#"{"id": "hub"}"#.to_owned())
            .chain((0..leaves).map(|index| format!(r#"{{"id": "leaf{index}"}}"#)))
            .collect::<Vec<_>>()
            .join(",");
        let edges = (0..leaves)
            .map(|index| format!(r#"{{"id": "e{index}", "source": "hub", "target": "leaf{index}"}}"#))
            .collect::<Vec<_>>()
            .join(",");
        model(&format!(r#"{{"nodes": [{nodes}], "edges": [{edges}]}}"#))
    }

    #[test]
    fn link_distance_clamps_between_bounds() {
        assert_eq!(link_distance(6, 6), 18.0);
        assert_eq!(link_distance(6, 25), 25.0);
        assert_eq!(link_distance(80, 6), 36.0);
    }

    #[test]
    fn layout_links_use_endpoint_values() {
        let layout_model = star(24);
        let mut engine = ForceLayoutEngine::default();
        engine.set_data(&layout_model);

        for (source, target, distance) in engine.link_lengths() {
            assert_eq!(source, "hub");
            assert!(target.starts_with("leaf"));
            assert_eq!(distance, 24.0);
        }
        assert_eq!(engine.link_lengths().count(), 24);
    }

    #[test]
    fn unresolved_edges_are_left_out() {
        let layout_model = model(
            r#"{"nodes": [{"id": "A"}, {"id": "B"}],
                "edges": [
                    {"id": "e1", "source": "A", "target": "B"},
                    {"id": "e2", "source": "A", "target": "ghost"},
                    {"id": "e3", "source": "B", "target": "B"}
                ]}"#,
        );
        let mut engine = ForceLayoutEngine::default();
        engine.set_data(&layout_model);

        assert_eq!(engine.link_lengths().count(), 1);
    }

    #[test]
    fn ticking_keeps_running_and_stays_near_origin() {
        let layout_model = star(30);
        let mut engine = ForceLayoutEngine::default();
        engine.set_data(&layout_model);

        for _ in 0..600 {
            engine.tick();
        }

        assert!(engine.alpha() > 0.0);
        let positions = (0..engine.len())
            .filter_map(|index| engine.position_at(index))
            .collect::<Vec<_>>();
        assert!(positions.iter().all(|position| position.x.is_finite() && position.y.is_finite()));

        let centroid = positions.iter().fold(Vec2::ZERO, |sum, p| sum + *p) / positions.len() as f32;
        assert!(centroid.length() < 10.0, "centroid drifted to {centroid:?}");
    }

    #[test]
    fn settled_nodes_do_not_overlap() {
        let layout_model = model(
            r#"{"nodes": [{"id": "A"}, {"id": "B"}, {"id": "C"}, {"id": "D"}, {"id": "E"}]}"#,
        );
        let mut engine = ForceLayoutEngine::default();
        engine.set_data(&layout_model);
        for _ in 0..400 {
            engine.tick();
        }

        for first in 0..engine.len() {
            for second in (first + 1)..engine.len() {
                let gap = engine.position_at(first).unwrap_or_default()
                    - engine.position_at(second).unwrap_or_default();
                assert!(gap.length() > NODE_MIN as f32, "bodies {first} and {second} overlap");
            }
        }
    }

    #[test]
    fn linked_pair_relaxes_towards_target_distance() {
        let layout_model = model(
            r#"{"nodes": [{"id": "A"}, {"id": "B"}],
                "edges": [{"id": "e1", "source": "A", "target": "B"}]}"#,
        );
        let mut engine = ForceLayoutEngine::default();
        engine.set_data(&layout_model);
        for _ in 0..500 {
            engine.tick();
        }

        let a = engine.position("A").expect("A placed");
        let b = engine.position("B").expect("B placed");
        let distance = (a - b).length();
        assert!((12.0..40.0).contains(&distance), "distance {distance}");
    }

    #[test]
    fn reload_resets_positions_and_alpha() {
        let mut engine = ForceLayoutEngine::default();
        engine.set_data(&star(3));
        for _ in 0..50 {
            engine.tick();
        }
        assert!(engine.alpha() < 1.0);

        engine.set_data(&model(r#"{"nodes": [{"id": "solo"}]}"#));
        assert_eq!(engine.alpha(), 1.0);
        assert_eq!(engine.len(), 1);
        assert_eq!(engine.position("solo"), Some(phyllotaxis(0)));
        assert_eq!(engine.position("hub"), None);
    }

    proptest! {
        #[test]
        fn link_distance_always_within_bounds(source in 0u32..200, target in 0u32..200) {
            let distance = link_distance(source, target);
            prop_assert!((LINK_MIN as f32..=LINK_MAX as f32).contains(&distance));
            prop_assert_eq!(
                distance,
                source.max(target).max(LINK_MIN).clamp(LINK_MIN, LINK_MAX) as f32
            );
        }
    }
}
