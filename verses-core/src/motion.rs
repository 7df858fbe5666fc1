//! Per-tick motion of the placed nodes.
//!
//! Every tick runs two passes over the node list:
//! 1. [`reflect_pass`]: each node moves by its velocity unless that would
//!    leave the bounds, in which case it stays put and the offending
//!    velocity component flips sign.
//! 2. [`separation_pass`]: each node that ended up too close to another
//!    one is pushed back to the spacing threshold.
//!
//! Separation is corrective, not preventive: a violation is only seen after
//! the move that caused it, and each node handles at most one offending
//! neighbor per tick, so tight clusters of three or more can take several
//! ticks to spread out (or keep a residual violation).

use glam::Vec2;
use serde::Serialize;
use tracing::trace;

use crate::{
    config::MotionConfig,
    layout::Layout,
    types::{Connection, Node, NodeId},
};

/// Owns the evolving node list.
///
/// The caller drives the cadence: call [`Simulation::tick`] once per
/// `cfg.tick_period()` (see [`crate::schedule::Ticker`]) and read
/// [`Simulation::current_state`] in between to render.
#[derive(Clone, Debug)]
pub struct Simulation {
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    cfg: MotionConfig,
    ticks: u64,
}

/// Borrowed view of the simulation between ticks.
#[derive(Clone, Copy, Debug)]
pub struct State<'a> {
    pub tick: u64,
    pub nodes: &'a [Node],
    pub connections: &'a [Connection],
}

/// Owned, serializable render snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub nodes: Vec<NodePosition>,
    pub connections: Vec<Connection>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NodePosition {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
}

impl State<'_> {
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            nodes: self
                .nodes
                .iter()
                .map(|n| NodePosition {
                    id: n.id,
                    x: n.pos.x,
                    y: n.pos.y,
                })
                .collect(),
            connections: self.connections.to_vec(),
        }
    }
}

impl Simulation {
    pub fn new(layout: Layout, cfg: MotionConfig) -> Self {
        Self {
            nodes: layout.nodes,
            connections: layout.connections,
            cfg,
            ticks: 0,
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.cfg
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn current_state(&self) -> State<'_> {
        State {
            tick: self.ticks,
            nodes: &self.nodes,
            connections: &self.connections,
        }
    }

    /// Advances the simulation by one tick and returns the new state.
    ///
    /// With no nodes this only bumps the tick counter.
    pub fn tick(&mut self) -> State<'_> {
        self.ticks += 1;
        if !self.nodes.is_empty() {
            reflect_pass(&mut self.nodes, &self.cfg);
            let corrected = separation_pass(&mut self.nodes, &self.cfg);
            trace!(tick = self.ticks, corrected, "tick");
        }
        self.current_state()
    }
}

/// Lower and upper corners of the area nodes may move in.
fn bounds(cfg: &MotionConfig) -> (Vec2, Vec2) {
    (
        Vec2::splat(cfg.margin),
        Vec2::new(cfg.width - cfg.margin, cfg.height - cfg.margin),
    )
}

/// Moves every node by its velocity, bouncing off the bounds.
///
/// Each axis is handled on its own: if the tentative coordinate falls
/// outside `[margin, extent - margin]`, the node keeps its old coordinate
/// on that axis and the velocity component is negated. A corner hit flips
/// both components in the same tick.
pub fn reflect_pass(nodes: &mut [Node], cfg: &MotionConfig) {
    let (lo, hi) = bounds(cfg);

    for node in nodes {
        let next = node.pos + node.vel;

        if next.x < lo.x || next.x > hi.x {
            node.vel.x = -node.vel.x;
        } else {
            node.pos.x = next.x;
        }

        if next.y < lo.y || next.y > hi.y {
            node.vel.y = -node.vel.y;
        } else {
            node.pos.y = next.y;
        }
    }
}

/// Pushes apart nodes that violate the spacing thresholds.
///
/// Every node scans the others in list order, all at their positions from
/// before this pass, and reacts to the first neighbor that is closer than
/// `min_distance` or within `min_vertical_distance` vertically:
///
/// - Vertical violation: the node is set exactly `min_vertical_distance`
///   above or below the neighbor (whichever side it is on) and its
///   vertical velocity becomes the correction scaled by
///   `velocity_damping`.
/// - Otherwise: the node is set exactly `min_distance` from the neighbor
///   along the neighbor-to-node bearing and its velocity becomes
///   `separation_speed` along that bearing.
///
/// Coincident nodes are skipped since they have no bearing. Results are
/// clamped into the bounds.
///
/// ### Returns
/// The number of nodes that were corrected.
pub fn separation_pass(nodes: &mut [Node], cfg: &MotionConfig) -> usize {
    let (lo, hi) = bounds(cfg);
    let before: Vec<Node> = nodes.to_vec();
    let mut corrected = 0;

    for (i, node) in nodes.iter_mut().enumerate() {
        let pos = before[i].pos;

        let violation = before.iter().enumerate().find_map(|(j, other)| {
            if i == j {
                return None;
            }
            let distance = pos.distance(other.pos);
            let vertical = (pos.y - other.pos.y).abs();
            let too_close = distance < cfg.min_distance || vertical < cfg.min_vertical_distance;
            (too_close && distance > 0.0).then_some((other.pos, distance, vertical))
        });

        let Some((other, distance, vertical)) = violation else {
            continue;
        };

        if vertical < cfg.min_vertical_distance {
            let y = if pos.y < other.y {
                other.y - cfg.min_vertical_distance
            } else {
                other.y + cfg.min_vertical_distance
            };
            node.vel.y = (y - pos.y) * cfg.velocity_damping;
            node.pos.y = y;
        } else {
            let bearing = (pos - other) / distance;
            node.pos = other + bearing * cfg.min_distance;
            node.vel = bearing * cfg.separation_speed;
        }

        node.pos = node.pos.max(lo).min(hi);
        corrected += 1;
    }

    corrected
}
