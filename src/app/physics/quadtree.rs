use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;

#[derive(Clone, Copy)]
pub(super) struct QuadBounds {
    pub(super) center: Vec2,
    pub(super) half_extent: f32,
}

impl QuadBounds {
    fn enclosing(points: &[Vec2]) -> Option<Self> {
        let (min, max) = points.iter().fold(
            (
                vec2(f32::INFINITY, f32::INFINITY),
                vec2(f32::NEG_INFINITY, f32::NEG_INFINITY),
            ),
            |(min, max), point| (min.min(*point), max.max(*point)),
        );

        if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()) {
            return None;
        }

        let span = (max - min).max_elem().max(1.0);
        Some(Self {
            center: (min + max) * 0.5,
            half_extent: span * 0.5 + 1.0,
        })
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        let offset = (point - self.center).abs();
        offset.x <= self.half_extent && offset.y <= self.half_extent
    }

    fn quadrant(self, quadrant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let x = if quadrant & 1 == 0 { -quarter } else { quarter };
        let y = if quadrant & 2 == 0 { -quarter } else { quarter };
        Self {
            center: self.center + vec2(x, y),
            half_extent: quarter,
        }
    }

    fn quadrant_of(self, point: Vec2) -> usize {
        usize::from(point.x >= self.center.x) | (usize::from(point.y >= self.center.y) << 1)
    }

    pub(super) fn width(self) -> f32 {
        self.half_extent * 2.0
    }

    pub(super) fn gap_sq(self, other: Self) -> f32 {
        let reach = self.half_extent + other.half_extent;
        let gap = ((self.center - other.center).abs() - vec2(reach, reach)).max(Vec2::ZERO);
        gap.length_sq()
    }
}

/// Barnes–Hut cell: `count` bodies with their centroid, split into up to four
/// children once a cell holds more than a leaf's worth of bodies.
pub(super) struct QuadNode {
    pub(super) bounds: QuadBounds,
    pub(super) centroid: Vec2,
    pub(super) count: f32,
    pub(super) indices: Vec<usize>,
    pub(super) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    pub(super) fn build(positions: &[Vec2]) -> Option<Self> {
        let bounds = QuadBounds::enclosing(positions)?;
        Some(Self::subdivide(bounds, (0..positions.len()).collect(), positions, 0))
    }

    fn subdivide(bounds: QuadBounds, indices: Vec<usize>, positions: &[Vec2], depth: usize) -> Self {
        let count = indices.len() as f32;
        let centroid = if indices.is_empty() {
            bounds.center
        } else {
            indices
                .iter()
                .fold(Vec2::ZERO, |sum, &index| sum + positions[index])
                / count
        };

        let mut node = Self {
            bounds,
            centroid,
            count,
            indices,
            children: std::array::from_fn(|_| None),
        };

        if depth >= MAX_DEPTH || node.indices.len() <= LEAF_CAPACITY {
            return node;
        }

        let mut buckets: [Vec<usize>; 4] = std::array::from_fn(|_| Vec::new());
        for &index in &node.indices {
            buckets[bounds.quadrant_of(positions[index])].push(index);
        }

        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return node;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if !bucket.is_empty() {
                node.children[quadrant] = Some(Box::new(Self::subdivide(
                    bounds.quadrant(quadrant),
                    bucket,
                    positions,
                    depth + 1,
                )));
            }
        }
        node.indices.clear();
        node
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    pub(super) fn children(&self) -> impl Iterator<Item = &QuadNode> {
        self.children.iter().filter_map(|child| child.as_deref())
    }
}
