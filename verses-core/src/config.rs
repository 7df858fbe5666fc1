//! Layout and motion parameters.
//!
//! Every field has a default matching the stock visualization, and
//! [`Config::from_json`] accepts partial files: missing fields keep their
//! defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::palette::{self, Rgb};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub motion: MotionConfig,
}

/// Parameters of the one-shot layout generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_count: u32,
    pub width: f32,
    pub height: f32,
    /// Inset from every edge of the placement region.
    pub margin: f32,
    pub min_distance: f32,
    pub min_vertical_distance: f32,
    /// Nearest placed neighbor farther than this triggers isolation correction.
    pub max_distance: f32,
    pub top_section_height: f32,
    /// Nodes `1..=min_nodes_in_top_section` are placed inside the top section.
    pub min_nodes_in_top_section: u32,
    /// Rejection-sampling budget per node before the grid fallback kicks in.
    pub max_attempts: u32,
    /// Grid fallback jitter, as a fraction of the cell size on each side.
    pub fallback_jitter: f32,
    pub neighbors_per_node: usize,
    /// Full width of the initial velocity interval on each axis.
    pub initial_speed: f32,
    pub palette: Vec<Rgb>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_count: 15,
            width: 100.0,
            height: 600.0,
            margin: 8.0,
            min_distance: 50.0,
            min_vertical_distance: 20.0,
            max_distance: 55.0,
            top_section_height: 300.0,
            min_nodes_in_top_section: 8,
            max_attempts: 1000,
            fallback_jitter: 0.3,
            neighbors_per_node: 10,
            initial_speed: 0.15,
            palette: palette::DEFAULT.to_vec(),
        }
    }
}

/// Parameters of the per-tick motion simulator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub width: f32,
    pub height: f32,
    /// Nodes bounce off `[margin, width - margin] x [margin, height - margin]`.
    pub margin: f32,
    pub min_distance: f32,
    pub min_vertical_distance: f32,
    /// Scale from a vertical correction to the resulting vertical velocity.
    pub velocity_damping: f32,
    /// Speed given to a node pushed away from a too-close neighbor.
    pub separation_speed: f32,
    pub tick_period_ms: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 650.0,
            margin: 5.0,
            min_distance: 15.0,
            min_vertical_distance: 20.0,
            velocity_damping: 0.1,
            separation_speed: 0.15,
            tick_period_ms: 50,
        }
    }
}

impl MotionConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}

impl Config {
    /// Parses and validates a JSON config.
    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: Config = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks each section, then that every placement region lies inside
    /// the motion bounds. A node placed outside them could never move back in.
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.motion.validate()?;

        let (layout, motion) = (&self.layout, &self.motion);
        if layout.margin < motion.margin {
            return Err(Error::invalid("layout.margin", "must not be below motion.margin"));
        }
        if layout.width - layout.margin > motion.width - motion.margin {
            return Err(Error::invalid(
                "layout.width",
                "placement area exceeds the motion bounds horizontally",
            ));
        }
        if layout.height - layout.margin > motion.height - motion.margin {
            return Err(Error::invalid(
                "layout.height",
                "placement area exceeds the motion bounds vertically",
            ));
        }
        Ok(())
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        finite("layout.width", self.width)?;
        finite("layout.height", self.height)?;
        non_negative("layout.margin", self.margin)?;
        non_negative("layout.min_distance", self.min_distance)?;
        non_negative("layout.min_vertical_distance", self.min_vertical_distance)?;
        non_negative("layout.max_distance", self.max_distance)?;
        non_negative("layout.initial_speed", self.initial_speed)?;

        if self.width <= 2.0 * self.margin {
            return Err(Error::invalid("layout.width", "must exceed twice the margin"));
        }
        if self.height <= 2.0 * self.margin {
            return Err(Error::invalid("layout.height", "must exceed twice the margin"));
        }
        if self.min_nodes_in_top_section > 0 && self.top_section_height <= 2.0 * self.margin {
            return Err(Error::invalid(
                "layout.top_section_height",
                "must exceed twice the margin when nodes are pinned to the top section",
            ));
        }
        if !(0.0..=0.5).contains(&self.fallback_jitter) {
            return Err(Error::invalid("layout.fallback_jitter", "must be within [0, 0.5]"));
        }
        Ok(())
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<()> {
        finite("motion.width", self.width)?;
        finite("motion.height", self.height)?;
        non_negative("motion.margin", self.margin)?;
        non_negative("motion.min_distance", self.min_distance)?;
        non_negative("motion.min_vertical_distance", self.min_vertical_distance)?;
        finite("motion.velocity_damping", self.velocity_damping)?;
        non_negative("motion.separation_speed", self.separation_speed)?;

        if self.width <= 2.0 * self.margin {
            return Err(Error::invalid("motion.width", "must exceed twice the margin"));
        }
        if self.height <= 2.0 * self.margin {
            return Err(Error::invalid("motion.height", "must exceed twice the margin"));
        }
        if self.tick_period_ms == 0 {
            return Err(Error::invalid("motion.tick_period_ms", "must be positive"));
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid(field, format!("must be finite, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<()> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(Error::invalid(field, format!("must not be negative, got {value}")));
    }
    Ok(())
}
