use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;

const DISTANCE_MIN_SQ: f32 = 1.0;

/// Deterministic nudge for coincident points.
fn jiggle(a: usize, b: usize) -> Vec2 {
    let angle = ((a as f32) * 0.618_034 + (b as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin()) * 1e-3
}

#[derive(Clone, Copy)]
pub(super) struct LinkSpring {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) distance: f32,
    pub(super) strength: f32,
    pub(super) bias: f32,
}

pub(super) fn apply_links(
    links: &[LinkSpring],
    positions: &[Vec2],
    velocities: &mut [Vec2],
    alpha: f32,
) {
    for link in links {
        let (source, target) = (link.source, link.target);
        let mut delta =
            (positions[target] + velocities[target]) - (positions[source] + velocities[source]);
        if delta.length_sq() == 0.0 {
            delta = jiggle(source, target);
        }

        let length = delta.length();
        let stretch = (length - link.distance) / length * alpha * link.strength;
        let correction = delta * stretch;

        velocities[target] -= correction * link.bias;
        velocities[source] += correction * (1.0 - link.bias);
    }
}

/// Many-body charge for one body; negative strength repels.
pub(super) fn accumulate_charge_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    strength: f32,
    alpha: f32,
    theta: f32,
    velocity: &mut Vec2,
) {
    if node.count <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other in &node.indices {
            if other == index {
                continue;
            }
            let mut delta = positions[other] - point;
            if delta.length_sq() == 0.0 {
                delta = jiggle(index, other);
            }
            let mut distance_sq = delta.length_sq();
            if distance_sq < DISTANCE_MIN_SQ {
                distance_sq = (DISTANCE_MIN_SQ * distance_sq).sqrt();
            }
            *velocity += delta * (strength * alpha / distance_sq);
        }
        return;
    }

    let delta = node.centroid - point;
    let distance_sq = delta.length_sq().max(DISTANCE_MIN_SQ);
    let far_enough = !node.bounds.contains(point)
        && node.bounds.width() * node.bounds.width() / (theta * theta) < distance_sq;

    if far_enough {
        *velocity += delta * (strength * node.count * alpha / distance_sq);
        return;
    }

    for child in node.children() {
        accumulate_charge_for_node(child, index, positions, strength, alpha, theta, velocity);
    }
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) radius: f32,
    pub(super) strength: f32,
}

fn separate(
    from: usize,
    to: usize,
    predicted: &[Vec2],
    params: CollisionParams,
    deltas: &mut [Vec2],
) {
    let mut delta = predicted[from] - predicted[to];
    if delta.length_sq() == 0.0 {
        delta = jiggle(from, to);
    }

    let reach = params.radius * 2.0;
    let distance_sq = delta.length_sq();
    if distance_sq >= reach * reach {
        return;
    }

    let distance = distance_sq.sqrt();
    let push = delta * ((reach - distance) / distance * params.strength * 0.5);
    deltas[from] += push;
    deltas[to] -= push;
}

/// Walks pairs of cells, skipping any two cells farther apart than two radii.
pub(super) fn accumulate_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    predicted: &[Vec2],
    params: CollisionParams,
    deltas: &mut [Vec2],
) {
    let reach = params.radius * 2.0;
    if node_a.bounds.gap_sq(node_b.bounds) > reach * reach {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for (offset, &from) in node_a.indices.iter().enumerate() {
                for &to in &node_a.indices[offset + 1..] {
                    separate(from, to, predicted, params, deltas);
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    separate(from, to, predicted, params, deltas);
                }
            }
        }
        return;
    }

    if same_node {
        let children = node_a.children().collect::<Vec<_>>();
        for (offset, child_a) in children.iter().enumerate() {
            accumulate_collision_pairs(child_a, child_a, true, predicted, params, deltas);
            for child_b in &children[offset + 1..] {
                accumulate_collision_pairs(child_a, child_b, false, predicted, params, deltas);
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in node_a.children() {
            accumulate_collision_pairs(child, node_b, false, predicted, params, deltas);
        }
    } else {
        for child in node_b.children() {
            accumulate_collision_pairs(node_a, child, false, predicted, params, deltas);
        }
    }
}

pub(super) fn apply_centering(positions: &[Vec2], velocities: &mut [Vec2], strength: f32, alpha: f32) {
    for (position, velocity) in positions.iter().zip(velocities.iter_mut()) {
        velocity.x += (0.0 - position.x) * strength * alpha;
        velocity.y += (0.0 - position.y) * strength * alpha;
    }
}
