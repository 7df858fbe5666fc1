//! One-shot layout generation: node placement and connectivity.
//!
//! The generator runs once per session:
//! 1. [`place_nodes`]: rejection sampling under spacing constraints, with a
//!    deterministic grid fallback and isolation correction.
//! 2. [`connect_nodes`]: each node links to its nearest neighbors, with
//!    mutual picks collapsed into a single connection.
//! 3. [`assign_velocities`]: small random drift for the motion simulator.
//!
//! All randomness comes from the caller-supplied generator, so a seeded
//! generator reproduces the same layout.

use std::collections::HashSet;

use glam::Vec2;
use rand::Rng;
use tracing::debug;

use crate::{
    config::LayoutConfig,
    palette::{self, Rgb},
    types::{Connection, Node, NodeId, canonical_pair},
};

/// Output of [`generate`].
#[derive(Clone, Debug, Default)]
pub struct Layout {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

/// Axis-aligned region a node may be placed in.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Region {
    min: Vec2,
    max: Vec2,
}

impl Region {
    /// The full canvas, or the top section for pinned nodes, inset by the margin.
    fn for_node(cfg: &LayoutConfig, in_top_section: bool) -> Self {
        let max_y = if in_top_section {
            (cfg.top_section_height - cfg.margin).min(cfg.height - cfg.margin)
        } else {
            cfg.height - cfg.margin
        };
        Self {
            min: Vec2::splat(cfg.margin),
            max: Vec2::new(cfg.width - cfg.margin, max_y),
        }
    }

    fn sample(&self, rng: &mut impl Rng) -> Vec2 {
        Vec2::new(
            uniform(rng, self.min.x, self.max.x),
            uniform(rng, self.min.y, self.max.y),
        )
    }

    fn clamp(&self, p: Vec2) -> Vec2 {
        // `max` then `min` so an inverted region never panics.
        p.max(self.min).min(self.max)
    }
}

/// Deterministic grid used when rejection sampling gives up.
#[derive(Clone, Copy, Debug)]
struct FallbackGrid {
    cols: u32,
    cell_width: f32,
    cell_height: f32,
    top_cell_height: f32,
    top_offset: f32,
    jitter: f32,
}

impl FallbackGrid {
    /// Derives grid dimensions from the node count and the canvas aspect ratio.
    fn new(cfg: &LayoutConfig) -> Self {
        let count = cfg.node_count.max(1);
        let cols = ((count as f32 * (cfg.width / cfg.height)).sqrt().ceil() as u32).max(1);
        let rows = count.div_ceil(cols).max(1);
        let top_rows = cfg.min_nodes_in_top_section.div_ceil(cols).max(1);

        Self {
            cols,
            cell_width: cfg.width / cols as f32,
            cell_height: cfg.height / rows as f32,
            top_cell_height: cfg.top_section_height / top_rows as f32,
            top_offset: cfg.margin,
            jitter: cfg.fallback_jitter,
        }
    }

    /// Jittered center of the cell for `id`, clamped into `region`.
    ///
    /// Top-section nodes use a grid squeezed into the top section so they
    /// stay visible without scrolling.
    fn position(
        &self,
        id: NodeId,
        in_top_section: bool,
        region: Region,
        rng: &mut impl Rng,
    ) -> Vec2 {
        let index = id.saturating_sub(1);
        let col = (index % self.cols) as f32;
        let row = (index / self.cols) as f32;

        let x = col * self.cell_width + self.cell_width / 2.0;
        let (y, cell_height) = if in_top_section {
            let h = self.top_cell_height;
            (self.top_offset + row * h + h / 2.0, h)
        } else {
            let h = self.cell_height;
            (row * h + h / 2.0, h)
        };

        let dx = self.cell_width * self.jitter;
        let dy = cell_height * self.jitter;
        region.clamp(Vec2::new(
            x + uniform(rng, -dx, dx),
            y + uniform(rng, -dy, dy),
        ))
    }
}

/// Generates a full layout: placed nodes with initial velocities plus connections.
///
/// ### Parameters
/// - `cfg` - Canvas size, spacing thresholds, fallback and neighbor settings.
/// - `rng` - Random source for placement, connection colors and velocities.
///
/// ### Returns
/// A [`Layout`] with exactly `cfg.node_count` nodes, ids `1..=node_count`.
pub fn generate(cfg: &LayoutConfig, rng: &mut impl Rng) -> Layout {
    let mut nodes = place_nodes(cfg, rng);
    let connections = connect_nodes(&nodes, cfg.neighbors_per_node, &cfg.palette, rng);
    assign_velocities(&mut nodes, cfg.initial_speed, rng);

    debug!(
        nodes = nodes.len(),
        connections = connections.len(),
        "layout generated"
    );
    Layout { nodes, connections }
}

/// Places `cfg.node_count` nodes in id order.
///
/// For each node:
///
/// 1. Draw up to `cfg.max_attempts` uniform positions in the node's
///    region and keep the first one that is at least `min_distance` away
///    from, and at least `min_vertical_distance` above or below, every
///    node placed so far.
/// 2. If none qualifies, take the node's cell in a [`FallbackGrid`].
/// 3. Whichever path produced the position, pull the node to exactly
///    `max_distance` from its nearest placed neighbor if it is farther.
///
/// Nodes `1..=min_nodes_in_top_section` are restricted to the top section.
/// Spacing is a target, not a guarantee: the fallback and the isolation
/// pull may both produce positions that violate it.
///
/// Returned nodes have zero velocity.
pub fn place_nodes(cfg: &LayoutConfig, rng: &mut impl Rng) -> Vec<Node> {
    let grid = FallbackGrid::new(cfg);
    let mut nodes: Vec<Node> = Vec::with_capacity(cfg.node_count as usize);

    for id in 1..=cfg.node_count {
        let in_top_section = id <= cfg.min_nodes_in_top_section;
        let region = Region::for_node(cfg, in_top_section);

        let sampled = (0..cfg.max_attempts)
            .map(|_| region.sample(rng))
            .find(|&p| is_spaced(p, &nodes, cfg.min_distance, cfg.min_vertical_distance));

        let pos = match sampled {
            Some(p) => p,
            None => {
                debug!(
                    id,
                    attempts = cfg.max_attempts,
                    "no spaced position found, using grid cell"
                );
                grid.position(id, in_top_section, region, rng)
            }
        };

        let pos = correct_isolation(id, pos, &nodes, cfg.max_distance, region);
        nodes.push(Node::at_rest(id, pos));
    }

    nodes
}

fn is_spaced(p: Vec2, placed: &[Node], min_distance: f32, min_vertical_distance: f32) -> bool {
    placed.iter().all(|n| {
        p.distance(n.pos) >= min_distance && (p.y - n.pos.y).abs() >= min_vertical_distance
    })
}

/// Nearest node to `p` and its distance; the first one wins on ties.
fn nearest(p: Vec2, nodes: &[Node]) -> Option<(&Node, f32)> {
    nodes
        .iter()
        .map(|n| (n, p.distance(n.pos)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Moves `pos` toward its nearest placed neighbor when it is farther than
/// `max_distance`, landing exactly `max_distance` away on the same bearing
/// before clamping into `region`.
fn correct_isolation(
    id: NodeId,
    pos: Vec2,
    placed: &[Node],
    max_distance: f32,
    region: Region,
) -> Vec2 {
    let Some((anchor, distance)) = nearest(pos, placed) else {
        return pos;
    };
    if distance <= max_distance {
        return pos;
    }

    debug!(
        id,
        anchor = anchor.id,
        distance,
        "isolated node pulled toward nearest neighbor"
    );
    // `distance > max_distance >= 0`, so the bearing is well defined.
    let bearing = (pos - anchor.pos) / distance;
    region.clamp(anchor.pos + bearing * max_distance)
}

/// Connects every node to up to `neighbors_per_node` of its nearest neighbors.
///
/// Candidates are ranked by distance (stable on ties, so earlier ids win).
/// A pair picked by both endpoints yields one connection, oriented from the
/// node that picked it first. Each new connection gets a color drawn
/// uniformly from `palette`.
///
/// ### Parameters
/// - `nodes` - Placed nodes; ids must be unique.
/// - `neighbors_per_node` - Candidate count per node, capped at `nodes.len() - 1`.
/// - `palette` - Colors to sample from.
/// - `rng` - Random source for colors.
///
/// ### Returns
/// Connections without self-loops or duplicate unordered pairs.
pub fn connect_nodes(
    nodes: &[Node],
    neighbors_per_node: usize,
    palette: &[Rgb],
    rng: &mut impl Rng,
) -> Vec<Connection> {
    let mut seen = HashSet::new();
    let mut connections = Vec::new();
    let mut ranked: Vec<(f32, NodeId)> = Vec::with_capacity(nodes.len());

    for node in nodes {
        ranked.clear();
        ranked.extend(
            nodes
                .iter()
                .filter(|other| other.id != node.id)
                .map(|other| (node.pos.distance(other.pos), other.id)),
        );
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        for &(_, other) in ranked.iter().take(neighbors_per_node) {
            if seen.insert(canonical_pair(node.id, other)) {
                connections.push(Connection {
                    from: node.id,
                    to: other,
                    color: palette::pick(palette, rng),
                });
            }
        }
    }

    connections
}

/// Gives every node a random drift velocity, each axis uniform in
/// `(-speed / 2, speed / 2)`.
pub fn assign_velocities(nodes: &mut [Node], speed: f32, rng: &mut impl Rng) {
    for node in nodes {
        node.vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * speed,
            (rng.random::<f32>() - 0.5) * speed,
        );
    }
}

/// Uniform value between `min` and `max`; returns `min` when they are equal.
fn uniform(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    rng.random::<f32>() * (max - min) + min
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashMap;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn generate_returns_requested_ids_in_order() {
        let cfg = LayoutConfig::default();
        let layout = generate(&cfg, &mut rng());

        let ids: Vec<NodeId> = layout.nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, (1..=cfg.node_count).collect::<Vec<_>>());
    }

    #[test]
    fn nodes_stay_inside_their_regions() {
        let cfg = LayoutConfig::default();
        let nodes = place_nodes(&cfg, &mut rng());

        for n in &nodes {
            let region = Region::for_node(&cfg, n.id <= cfg.min_nodes_in_top_section);
            assert_eq!(region.clamp(n.pos), n.pos, "node {} out of region", n.id);
        }
    }

    #[test]
    fn pinned_nodes_land_in_top_section() {
        let cfg = LayoutConfig::default();
        for seed in 0..20 {
            let nodes = place_nodes(&cfg, &mut StdRng::seed_from_u64(seed));
            let in_top = nodes
                .iter()
                .filter(|n| n.pos.y <= cfg.top_section_height)
                .count();
            assert!(in_top >= cfg.min_nodes_in_top_section as usize);
        }
    }

    #[test]
    fn first_node_has_no_constraints() {
        let mut cfg = LayoutConfig::default();
        cfg.node_count = 1;
        cfg.min_distance = 10_000.0;
        let nodes = place_nodes(&cfg, &mut rng());
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].vel, Vec2::ZERO);
    }

    #[test]
    fn grid_fallback_uses_cell_centers_without_jitter() {
        let cfg = LayoutConfig {
            node_count: 4,
            min_nodes_in_top_section: 0,
            min_distance: 10_000.0,
            max_distance: 10_000.0,
            fallback_jitter: 0.0,
            ..LayoutConfig::default()
        };
        let nodes = place_nodes(&cfg, &mut rng());

        // 4 nodes on 100 x 600: one column, four rows of height 150.
        assert_eq!(nodes[1].pos, Vec2::new(50.0, 225.0));
        assert_eq!(nodes[2].pos, Vec2::new(50.0, 375.0));
        assert_eq!(nodes[3].pos, Vec2::new(50.0, 525.0));
    }

    #[test]
    fn grid_fallback_squeezes_pinned_nodes_into_top_section() {
        let cfg = LayoutConfig {
            min_distance: 10_000.0,
            max_distance: 10_000.0,
            fallback_jitter: 0.0,
            ..LayoutConfig::default()
        };
        let nodes = place_nodes(&cfg, &mut rng());

        // 15 nodes on 100 x 600: two columns; the top section holds 4 rows of 75.
        assert_eq!(nodes[1].pos, Vec2::new(75.0, 8.0 + 37.5));
        assert_eq!(nodes[7].pos, Vec2::new(75.0, 8.0 + 3.0 * 75.0 + 37.5));
        // Unpinned nodes use the full-height grid: 8 rows of 75.
        assert_eq!(nodes[8].pos, Vec2::new(25.0, 4.0 * 75.0 + 37.5));
    }

    #[test]
    fn grid_fallback_is_followed_by_isolation_correction() {
        let cfg = LayoutConfig {
            node_count: 4,
            min_nodes_in_top_section: 0,
            min_distance: 10_000.0,
            max_distance: 10.0,
            fallback_jitter: 0.0,
            ..LayoutConfig::default()
        };
        // Node 2's grid cell center on a 100 x 600 canvas with one column.
        let cell = Vec2::new(50.0, 225.0);
        let mut pulled = 0;

        for seed in 0..10 {
            let nodes = place_nodes(&cfg, &mut StdRng::seed_from_u64(seed));
            let anchor = nodes[0].pos;
            let distance = anchor.distance(cell);
            if distance <= cfg.max_distance {
                assert_eq!(nodes[1].pos, cell);
                continue;
            }

            let expected = anchor + (cell - anchor) / distance * cfg.max_distance;
            assert!(
                (nodes[1].pos - expected).length() < 1e-3,
                "seed {seed}: expected {expected:?}, got {:?}",
                nodes[1].pos
            );
            assert!((nodes[1].pos.distance(anchor) - cfg.max_distance).abs() < 1e-3);
            pulled += 1;
        }
        assert!(pulled > 0);
    }

    #[test]
    fn isolation_correction_lands_exactly_at_max_distance() {
        let cfg = LayoutConfig::default();
        let region = Region::for_node(&cfg, false);
        let placed = [Node::at_rest(1, Vec2::new(50.0, 100.0))];

        let moved = correct_isolation(2, Vec2::new(50.0, 300.0), &placed, 55.0, region);
        assert_eq!(moved, Vec2::new(50.0, 155.0));

        let near = Vec2::new(60.0, 140.0);
        assert_eq!(correct_isolation(2, near, &placed, 55.0, region), near);
    }

    #[test]
    fn isolation_correction_is_clamped() {
        let cfg = LayoutConfig::default();
        let region = Region::for_node(&cfg, true);
        let placed = [Node::at_rest(1, Vec2::new(90.0, 290.0))];

        let moved = correct_isolation(2, Vec2::new(-500.0, 290.0), &placed, 55.0, region);
        assert_eq!(moved, Vec2::new(35.0, 290.0));

        let moved = correct_isolation(2, Vec2::new(90.0, 1000.0), &placed, 55.0, region);
        assert_eq!(moved.y, 292.0);
    }

    #[test]
    fn connections_have_no_self_loops_or_duplicates() {
        let layout = generate(&LayoutConfig::default(), &mut rng());

        let mut keys = HashSet::new();
        for c in &layout.connections {
            assert_ne!(c.from, c.to);
            assert!(keys.insert(c.key()), "duplicate edge {:?}", c.key());
            assert!(palette::DEFAULT.contains(&c.color));
        }
    }

    #[test]
    fn every_node_has_an_edge() {
        let mut cfg = LayoutConfig::default();
        cfg.neighbors_per_node = 1;
        let layout = generate(&cfg, &mut rng());

        let mut degree: HashMap<NodeId, usize> = HashMap::new();
        for c in &layout.connections {
            *degree.entry(c.from).or_default() += 1;
            *degree.entry(c.to).or_default() += 1;
        }
        for n in &layout.nodes {
            assert!(degree.get(&n.id).copied().unwrap_or(0) >= 1, "node {} isolated", n.id);
        }
    }

    #[test]
    fn mutual_nearest_neighbors_share_one_connection() {
        let nodes = [
            Node::at_rest(1, Vec2::new(0.0, 0.0)),
            Node::at_rest(2, Vec2::new(1.0, 0.0)),
        ];
        let connections = connect_nodes(&nodes, 10, &palette::DEFAULT, &mut rng());
        assert_eq!(connections.len(), 1);
        assert_eq!((connections[0].from, connections[0].to), (1, 2));
    }

    #[test]
    fn neighbor_count_is_capped() {
        let nodes: Vec<Node> = (1..=6)
            .map(|id| Node::at_rest(id, Vec2::new(id as f32 * 10.0, 0.0)))
            .collect();

        // Each node picks its single nearest neighbor: 1-2, 2-1 (dup), 3-2, 4-3, 5-4, 6-5.
        let connections = connect_nodes(&nodes, 1, &palette::DEFAULT, &mut rng());
        let keys: Vec<_> = connections.iter().map(Connection::key).collect();
        assert_eq!(keys, vec![(1, 2), (2, 3), (3, 4), (4, 5), (5, 6)]);

        // Full fan-out on a small set yields the complete graph.
        let connections = connect_nodes(&nodes, 100, &palette::DEFAULT, &mut rng());
        assert_eq!(connections.len(), 6 * 5 / 2);
    }

    #[test]
    fn velocities_stay_within_half_speed() {
        let mut nodes: Vec<Node> = (1..=50).map(|id| Node::at_rest(id, Vec2::ZERO)).collect();
        assign_velocities(&mut nodes, 0.15, &mut rng());
        for n in &nodes {
            assert!(n.vel.x.abs() <= 0.075 && n.vel.y.abs() <= 0.075);
        }
    }

    #[test]
    fn empty_and_single_node_layouts() {
        let mut cfg = LayoutConfig::default();
        cfg.node_count = 0;
        let layout = generate(&cfg, &mut rng());
        assert!(layout.nodes.is_empty() && layout.connections.is_empty());

        cfg.node_count = 1;
        let layout = generate(&cfg, &mut rng());
        assert_eq!(layout.nodes.len(), 1);
        assert!(layout.connections.is_empty());
    }

    #[test]
    fn same_seed_same_layout() {
        let cfg = LayoutConfig::default();
        let a = generate(&cfg, &mut StdRng::seed_from_u64(9));
        let b = generate(&cfg, &mut StdRng::seed_from_u64(9));
        assert_eq!(a.nodes, b.nodes);
        assert_eq!(a.connections, b.connections);
    }
}
