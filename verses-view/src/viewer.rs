//! Interactive node network viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the simulation state
//! (nodes, connections, tick timer, modal) and implements [`eframe::App`]
//! to render it and react to clicks.

use std::time::Duration;

use eframe::App;
use glam::Vec2;
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info};
use verses_core::{
    config::Config,
    content::{Catalog, Description},
    interaction::{self, Modal, NodeFrame, NodeScale, Rect},
    layout,
    motion::Simulation,
    palette::Rgb,
    schedule::Ticker,
};

pub const TITLE: &str = "verses on verses";

/// Built-in editorial entries, keyed by node id.
pub const ENTRIES: &str = include_str!("../assets/entries.json");

/// Stroke width of the decorative borders, in world units.
const BORDER_WIDTH: f32 = 0.3;

/// Main application state for the viewer.
///
/// ### Fields
/// - `cfg` - Layout and motion parameters the simulation was built from.
/// - `catalog` - Editorial text per node id.
/// - `sim` - The running simulation; the only writer of node positions.
/// - `ticker` - Fixed-period timer deciding when `sim` advances.
/// - `modal` - The node whose details are open, if any.
/// - `scale` - Node glyph/hitbox sizes for the current panel width.
pub struct Viewer {
    cfg: Config,
    catalog: Catalog,
    sim: Simulation,
    ticker: Ticker,
    modal: Modal,
    scale: NodeScale,
}

impl Viewer {
    /// Generates the layout and wraps it in a fresh simulation.
    ///
    /// ### Parameters
    /// - `cfg` - Validated configuration.
    /// - `catalog` - Content shown in the modal.
    /// - `seed` - Fixed seed for a reproducible layout; `None` seeds from the OS.
    pub fn new(cfg: Config, catalog: Catalog, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let layout = layout::generate(&cfg.layout, &mut rng);
        info!(
            nodes = layout.nodes.len(),
            connections = layout.connections.len(),
            "network generated"
        );

        let sim = Simulation::new(layout, cfg.motion);
        let ticker = Ticker::new(cfg.motion.tick_period());

        Self {
            cfg,
            catalog,
            sim,
            ticker,
            modal: Modal::default(),
            scale: NodeScale::default(),
        }
    }

    /// Runs at most one simulation tick if one is due at `now`.
    ///
    /// The ticker is started on the first call.
    ///
    /// ### Returns
    /// The delay until the next tick is due, for scheduling a repaint.
    fn advance(&mut self, now: f64) -> Option<Duration> {
        if !self.ticker.is_running() {
            self.ticker.start(now);
        }
        if self.ticker.poll(now) {
            self.sim.tick();
        }
        self.ticker.remaining(now)
    }

    /// Opens the modal for the node under `world`, if any.
    ///
    /// ### Returns
    /// `true` if a node was hit.
    fn click_at(&mut self, world: Vec2) -> bool {
        let state = self.sim.current_state();
        let Some(id) = interaction::hit_test(state.nodes, world, self.scale) else {
            return false;
        };
        if let Some(node) = state.node(id).copied() {
            debug!(id, "node selected");
            self.modal.open(node);
        }
        true
    }

    /// Converts a world-space position to screen-space.
    ///
    /// The world's origin sits at `origin` (top-left of the canvas) and y
    /// grows downward, as in the layout.
    fn world_to_screen(p: Vec2, origin: egui::Pos2, zoom: f32) -> egui::Pos2 {
        egui::pos2(origin.x + p.x * zoom, origin.y + p.y * zoom)
    }

    /// Inverse of [`Viewer::world_to_screen`].
    fn screen_to_world(p: egui::Pos2, origin: egui::Pos2, zoom: f32) -> Vec2 {
        Vec2::new((p.x - origin.x) / zoom, (p.y - origin.y) / zoom)
    }

    fn rect_to_screen(r: Rect, origin: egui::Pos2, zoom: f32) -> egui::Rect {
        egui::Rect::from_min_size(
            Self::world_to_screen(r.min, origin, zoom),
            egui::vec2(r.size.x * zoom, r.size.y * zoom),
        )
    }

    fn color(c: Rgb) -> egui::Color32 {
        egui::Color32::from_rgb(c.r, c.g, c.b)
    }

    /// Draws connections, then node glyphs with their two borders.
    fn paint_network(&self, painter: &egui::Painter, origin: egui::Pos2, zoom: f32) {
        let state = self.sim.current_state();

        for c in state.connections {
            let (Some(from), Some(to)) = (state.node(c.from), state.node(c.to)) else {
                continue;
            };
            painter.line_segment(
                [
                    Self::world_to_screen(from.pos, origin, zoom),
                    Self::world_to_screen(to.pos, origin, zoom),
                ],
                egui::Stroke::new(1.0, Self::color(c.color)),
            );
        }

        let border = egui::Stroke::new((BORDER_WIDTH * zoom).max(1.0), egui::Color32::WHITE);
        for node in state.nodes {
            let glyph = Self::rect_to_screen(self.scale.glyph(node.pos), origin, zoom);
            painter.rect_filled(glyph, 0.0, egui::Color32::WHITE);

            let frame = NodeFrame::for_node(node, self.scale);
            for r in [frame.outer, frame.inner] {
                painter.rect_stroke(
                    Self::rect_to_screen(r, origin, zoom),
                    0.0,
                    border,
                    egui::StrokeKind::Middle,
                );
            }
        }
    }

    /// Builds the central panel: title, scrollable canvas and click handling.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading(egui::RichText::new(TITLE).color(egui::Color32::WHITE));
                });

                egui::ScrollArea::vertical().show(ui, |ui| {
                    let width = ui.available_width();
                    self.scale = NodeScale::for_viewport_width(width);

                    let zoom = width / self.cfg.motion.width;
                    let size = egui::vec2(width, self.cfg.motion.height * zoom);
                    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
                    let origin = rect.min;

                    self.paint_network(&ui.painter_at(rect), origin, zoom);

                    if response.clicked()
                        && let Some(pointer) = response.interact_pointer_pos()
                    {
                        self.click_at(Self::screen_to_world(pointer, origin, zoom));
                    }
                });
            });
    }

    /// Shows the node modal; the × button, Escape or a backdrop click closes it.
    fn ui_modal(&mut self, ctx: &egui::Context) {
        let Some(node) = self.modal.selected().copied() else {
            return;
        };

        let mut close = false;
        let response = egui::Modal::new(egui::Id::new("node_modal")).show(ctx, |ui| {
            ui.set_max_width(360.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                if ui.button("×").on_hover_text("Close").clicked() {
                    close = true;
                }
            });

            egui::ScrollArea::vertical().max_height(480.0).show(ui, |ui| {
                match self.catalog.describe(node.id, node.pos) {
                    Description::Curated(entry) => {
                        ui.heading(&entry.title);
                        ui.horizontal_wrapped(|ui| {
                            if let Some(pos) = &entry.part_of_speech {
                                ui.label(egui::RichText::new(pos).strong());
                            }
                            ui.label(&entry.definition);
                        });
                        for note in &entry.notes {
                            ui.add_space(6.0);
                            ui.label(note);
                        }
                    }
                    Description::Fallback { heading, detail } => {
                        ui.heading(heading);
                        ui.label(detail);
                    }
                }
            });
        });

        if close || response.should_close() {
            self.modal.close();
        }
    }
}

impl App for Viewer {
    /// eframe callback: advances the simulation when due, then draws the
    /// canvas and the modal.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);
        if let Some(wait) = self.advance(now) {
            ctx.request_repaint_after(wait);
        }

        self.ui_central_panel(ctx);
        self.ui_modal(ctx);
    }

    /// Stops the tick timer once the window closes.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.ticker.stop();
        info!(ticks = self.sim.tick_count(), "viewer closed");
    }
}
