//! Core layout and motion library for the drifting node network.
//!
//! Main components:
//! - [`layout`]: one-shot node placement and nearest-neighbor connections.
//! - [`motion`]: the per-tick simulation (bounce + separation).
//! - [`schedule`]: fixed-period tick timer owned by the caller.
//! - [`interaction`]: node geometry, hit testing and modal state.
//! - [`content`]: node id → editorial text lookup.
//! - [`config`]: layout and motion parameters.
//! - [`palette`]: connection colors.
//! - [`jitter`]: deterministic per-node decoration noise.
//! - [`types`]: shared node and connection types.

pub mod config;
pub mod content;
pub mod error;
pub mod interaction;
pub mod jitter;
pub mod layout;
pub mod motion;
pub mod palette;
pub mod schedule;
pub mod types;

pub use error::{Error, Result};
