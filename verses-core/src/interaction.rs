//! Node geometry, hit testing and modal selection state.
//!
//! All geometry is in world units (the same space as node positions); the
//! viewer maps it to the screen.

use glam::Vec2;

use crate::{
    jitter,
    types::{Node, NodeId},
};

/// Axis-aligned rectangle in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size / 2.0,
            size,
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.x <= max.x && p.y >= self.min.y && p.y <= max.y
    }
}

/// Glyph and hitbox sizes, picked from the viewport width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeScale {
    pub node_radius: f32,
    pub hitbox_radius: f32,
}

impl Default for NodeScale {
    fn default() -> Self {
        Self {
            node_radius: 6.0,
            hitbox_radius: 8.0,
        }
    }
}

impl NodeScale {
    pub fn for_viewport_width(width: f32) -> Self {
        let (node_radius, hitbox_radius) = if width <= 480.0 {
            (4.5, 6.5)
        } else if width <= 768.0 {
            (5.0, 7.0)
        } else {
            (6.0, 8.0)
        };
        Self {
            node_radius,
            hitbox_radius,
        }
    }

    /// Node glyphs are wide rectangles: three radii across, 1.2 radii tall.
    fn rect_size(radius: f32) -> Vec2 {
        Vec2::new(radius * 3.0, radius * 1.2)
    }

    pub fn glyph(&self, center: Vec2) -> Rect {
        Rect::from_center_size(center, Self::rect_size(self.node_radius))
    }

    pub fn hitbox(&self, center: Vec2) -> Rect {
        Rect::from_center_size(center, Self::rect_size(self.hitbox_radius))
    }
}

/// The two decorative borders drawn around a node glyph.
///
/// Paddings are per node and per side, stable across frames thanks to
/// [`jitter`]. Borders never extend above `y = 0`; a node close to the top
/// gets its inner border stretched up to exactly `y = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeFrame {
    pub inner: Rect,
    pub outer: Rect,
}

impl NodeFrame {
    const INNER_PADDING: (f32, f32) = (3.0, 5.0);
    const OUTER_PADDING: (f32, f32) = (3.0, 9.0);

    pub fn for_node(node: &Node, scale: NodeScale) -> Self {
        let glyph = scale.glyph(node.pos);
        let pad = |salt, (min, max)| jitter::range(node.id, salt, min, max);

        let mut top = pad(1, Self::INNER_PADDING);
        let right = pad(2, Self::INNER_PADDING);
        let bottom = pad(3, Self::INNER_PADDING);
        let left = pad(4, Self::INNER_PADDING);

        let glyph_top = glyph.min.y;
        if glyph_top - top <= 0.0 {
            top = glyph_top;
        }

        let inner = Rect {
            min: Vec2::new(glyph.min.x - left, (glyph_top - top).max(0.0)),
            size: glyph.size + Vec2::new(left + right, top + bottom),
        };

        let top2 = pad(5, Self::OUTER_PADDING);
        let right2 = pad(6, Self::OUTER_PADDING);
        let bottom2 = pad(7, Self::OUTER_PADDING);
        let left2 = pad(8, Self::OUTER_PADDING);

        let outer = Rect {
            min: Vec2::new(inner.min.x - left2, (inner.min.y - top2).max(0.0)),
            size: inner.size + Vec2::new(left2 + right2, top2 + bottom2),
        };

        Self { inner, outer }
    }
}

/// Finds the node whose hitbox contains `point`.
///
/// Nodes are drawn in list order, so on overlap the later node is on top
/// and wins.
pub fn hit_test(nodes: &[Node], point: Vec2, scale: NodeScale) -> Option<NodeId> {
    nodes
        .iter()
        .rev()
        .find(|n| scale.hitbox(n.pos).contains(point))
        .map(|n| n.id)
}

/// Open/closed state of the node detail modal.
///
/// The modal keeps the node as it was when clicked, so the position shown
/// in a fallback description does not drift while the modal is open.
#[derive(Clone, Debug, Default)]
pub struct Modal {
    selected: Option<Node>,
}

impl Modal {
    pub fn open(&mut self, node: Node) {
        self.selected = Some(node);
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    pub fn selected(&self) -> Option<&Node> {
        self.selected.as_ref()
    }
}
