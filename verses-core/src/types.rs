//! Shared node and connection types.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::palette::Rgb;

/// Identifier of a [`Node`].
///
/// Ids are assigned `1..=N` by the layout generator in placement order and
/// stay stable for the lifetime of a session. The content catalog is keyed
/// by the same value.
pub type NodeId = u32;

/// A positioned, moving node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub pos: Vec2,
    /// Per-tick displacement.
    pub vel: Vec2,
}

impl Node {
    pub fn at_rest(id: NodeId, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
        }
    }
}

/// An undirected, colored edge between two nodes.
///
/// `from` is the node whose neighbor scan produced the edge. Equality of
/// the unordered pair is what matters for deduplication, see
/// [`Connection::key`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: NodeId,
    pub to: NodeId,
    pub color: Rgb,
}

impl Connection {
    /// Canonical unordered key, smaller id first.
    pub fn key(&self) -> (NodeId, NodeId) {
        canonical_pair(self.from, self.to)
    }
}

pub fn canonical_pair(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a < b { (a, b) } else { (b, a) }
}
