//! Deterministic per-node jitter.
//!
//! Decorations such as border paddings must look random but stay fixed for
//! a given node across frames. Each use site picks its own `salt` so that
//! different decorations of the same node are uncorrelated.

use crate::types::NodeId;

/// Pseudo-random value in `[0, 1)` derived from `(id, salt)`.
pub fn unit(id: NodeId, salt: u32) -> f32 {
    let seed = f64::from(id) * f64::from(salt);
    let x = seed.sin() * 10_000.0;
    // Narrowing can round 0.99999999 up to 1.0.
    ((x - x.floor()) as f32).min(1.0 - f32::EPSILON)
}

/// [`unit`] mapped linearly onto `[min, max)`.
pub fn range(id: NodeId, salt: u32, min: f32, max: f32) -> f32 {
    unit(id, salt) * (max - min) + min
}
