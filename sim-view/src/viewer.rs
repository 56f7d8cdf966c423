//! Interactive 3D space-colonization tree viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a [`GrowthController`] plus
//! camera state, and implements [`eframe::App`] to draw the envelope, the
//! attraction points and the tree through an orbiting orthographic camera.

use eframe::App;
use glam::{Quat, Vec3};
use rand::{SeedableRng, rngs::StdRng};
use sca3d_core::{BodySegment, GrowthConfig, GrowthController, GrowthError, GrowthPhase, Tropism};
use tracing::{info, warn};

/// Main application state for the interactive viewer.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If `running` is `true` and enough time has passed, call [`Viewer::step_once`].
/// 3. Render the envelope, attractors and tree.
///
/// ### Fields
/// - `controller` - The growth run being displayed.
/// - `cfg` - Editable config; applied on the next reset.
/// - `rng` / `seed` - Sampling randomness; every reset draws a new seed.
/// - `body` - Cached cylinder descriptors, rebuilt whenever the tree changes.
/// - `yaw`, `pitch`, `zoom`, `pan` - Orbit camera.
/// - `last_error` - Message from the last failed reset, shown in the status bar.
pub struct Viewer {
    controller: GrowthController,
    cfg: GrowthConfig,

    rng: StdRng,
    seed: u64,

    body: Vec<BodySegment>,

    running: bool,
    show_envelope: bool,
    show_points: bool,
    show_body: bool,

    yaw: f32,
    pitch: f32,
    zoom: f32,
    pan: egui::Vec2,

    last_error: Option<String>,

    step_interval: f64,
    last_step_time: f64,
}

impl Viewer {
    /// Creates a viewer growing a fresh tree from `cfg` with the given seed.
    pub fn new(cfg: GrowthConfig, seed: u64) -> Result<Self, GrowthError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let controller = GrowthController::new(cfg.clone(), &mut rng)?;

        Ok(Self {
            controller,
            cfg,
            rng,
            seed,
            body: Vec::new(),
            running: false,
            show_envelope: true,
            show_points: true,
            show_body: true,
            yaw: 0.4,
            pitch: 0.2,
            zoom: 40.0,
            pan: egui::vec2(0.0, 150.0),
            last_error: None,
            step_interval: 0.05,
            last_step_time: 0.0,
        })
    }

    /// Rebuilds the run from the edited config with a new seed.
    ///
    /// An invalid config leaves the current run untouched and records the
    /// error for display.
    fn reset(&mut self) {
        let seed = rand::Rng::random(&mut self.rng);
        let mut rng = StdRng::seed_from_u64(seed);

        match GrowthController::new(self.cfg.clone(), &mut rng) {
            Ok(controller) => {
                info!(seed, "reset growth run");
                self.controller = controller;
                self.rng = rng;
                self.seed = seed;
                self.body.clear();
                self.last_error = None;
                self.running = false;
            }
            Err(err) => {
                warn!(%err, "reset rejected");
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Advances the simulation by a single tick.
    fn step_once(&mut self) {
        if self.controller.step() {
            self.refresh_body();
        }
        if self.controller.state() == GrowthPhase::Finished {
            self.running = false;
        }
    }

    fn reduce(&mut self) {
        if self.controller.reduce() > 0 {
            self.refresh_body();
        }
    }

    fn refresh_body(&mut self) {
        self.body = self.controller.body();
    }

    /// Rotation applied to world positions before projection.
    fn view_rotation(&self) -> Quat {
        Quat::from_rotation_x(self.pitch) * Quat::from_rotation_y(self.yaw)
    }

    /// Orthographic projection of a world position into `rect`.
    ///
    /// The world is rotated by yaw around y, then pitch around x, scaled by
    /// `zoom` and offset by `pan` from the center of `rect`. Screen y grows
    /// downward, so world y is flipped.
    fn world_to_screen(&self, p: Vec3, rect: egui::Rect) -> egui::Pos2 {
        let v = self.view_rotation() * p;
        let center = rect.center();
        egui::pos2(
            center.x + v.x * self.zoom + self.pan.x,
            center.y - v.y * self.zoom + self.pan.y,
        )
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.0..=1.0)
                        .speed(0.01),
                );

                if ui.button("Step").clicked() {
                    self.step_once();
                }

                if ui.button("Grow all").clicked() {
                    self.controller.run_to_completion();
                    self.refresh_body();
                    self.running = false;
                }

                if ui.button("Reduce").clicked() {
                    self.reduce();
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.separator();
                ui.checkbox(&mut self.show_envelope, "Envelope");
                ui.checkbox(&mut self.show_points, "Points");
                ui.checkbox(&mut self.show_body, "Body");

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 5.0..=200.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (state, node count, live attractors).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("seed = {}", self.seed));
                ui.separator();
                let state = match self.controller.state() {
                    GrowthPhase::Growing => "growing",
                    GrowthPhase::Finished => "finished",
                };
                ui.label(format!("state = {state}"));
                ui.label(format!("ticks = {}", self.controller.ticks()));
                ui.label(format!("nodes = {}", self.controller.tree().len()));
                ui.label(format!("points = {}", self.controller.field().len()));
                if let Some(err) = &self.last_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::LIGHT_RED, err.as_str());
                }
            });
        });
    }

    /// Builds the right-hand configuration panel; edits apply on reset.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");
                ui.label("Applied on Reset");

                ui.separator();
                ui.label("Growth");
                Self::labeled_drag_f32(
                    ui,
                    "internode_length:",
                    &mut self.cfg.internode_length,
                    0.01..=2.0,
                    0.01,
                );
                Self::labeled_drag_f32(
                    ui,
                    "influence_radius:",
                    &mut self.cfg.influence_radius,
                    0.01..=20.0,
                    0.05,
                );
                Self::labeled_drag_f32(
                    ui,
                    "kill_distance:",
                    &mut self.cfg.kill_distance,
                    0.01..=20.0,
                    0.01,
                );
                Self::labeled_drag_usize(
                    ui,
                    "attraction_points:",
                    &mut self.cfg.attraction_points,
                    1..=10_000,
                    5.0,
                );

                ui.separator();
                ui.label("Tropism");
                egui::ComboBox::from_id_salt("tropism")
                    .selected_text(self.cfg.tropism.label())
                    .show_ui(ui, |ui| {
                        for t in Tropism::ALL {
                            ui.selectable_value(&mut self.cfg.tropism, t, t.label());
                        }
                    });
                Self::labeled_drag_f32(
                    ui,
                    "strength:",
                    &mut self.cfg.tropism_strength,
                    0.0..=1.0,
                    0.01,
                );

                ui.separator();
                ui.label("Body");
                Self::labeled_drag_f32(
                    ui,
                    "leaf_radius:",
                    &mut self.cfg.leaf_radius,
                    0.001..=1.0,
                    0.001,
                );
                Self::labeled_drag_f32(
                    ui,
                    "exponent:",
                    &mut self.cfg.allometric_exponent,
                    1.01..=4.0,
                    0.01,
                );

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = GrowthConfig::default();
                }
            });
    }

    /// Builds the central panel where the scene is drawn and orbited.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Orbit with primary drag, pan with secondary drag.
            if response.dragged_by(egui::PointerButton::Primary) {
                let delta = response.drag_delta();
                self.yaw += delta.x * 0.01;
                self.pitch = (self.pitch + delta.y * 0.01).clamp(-1.5, 1.5);
            } else if response.dragged_by(egui::PointerButton::Secondary) {
                self.pan += response.drag_delta();
            }

            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(5.0, 200.0);
            }

            if self.show_envelope {
                let stroke = egui::Stroke::new(0.5, egui::Color32::from_gray(90));
                for (a, b) in self.controller.envelope().to_segments() {
                    painter.line_segment(
                        [self.world_to_screen(a, rect), self.world_to_screen(b, rect)],
                        stroke,
                    );
                }
            }

            if self.show_points {
                for p in self.controller.field().points() {
                    painter.circle_filled(
                        self.world_to_screen(p, rect),
                        1.5,
                        egui::Color32::LIGHT_RED,
                    );
                }
            }

            if self.show_body && !self.body.is_empty() {
                // Cylinders drawn as lines as wide as their projected diameter.
                for seg in &self.body {
                    let axis = seg.orientation * Vec3::Y * (seg.length * 0.5);
                    let a = self.world_to_screen(seg.position - axis, rect);
                    let b = self.world_to_screen(seg.position + axis, rect);
                    let width = (2.0 * seg.radius * self.zoom).max(1.0);
                    let color = if seg.marker {
                        egui::Color32::YELLOW
                    } else {
                        egui::Color32::from_rgb(150, 110, 70)
                    };
                    painter.line_segment([a, b], egui::Stroke::new(width, color));
                }
            } else {
                for (a, b) in self.controller.segments() {
                    painter.line_segment(
                        [self.world_to_screen(a, rect), self.world_to_screen(b, rect)],
                        egui::Stroke::new(1.0, egui::Color32::LIGHT_GREEN),
                    );
                }
            }

            // Auto-run simulation if requested.
            if self.running {
                let now = ctx.input(|i| i.time);
                if now - self.last_step_time >= self.step_interval {
                    self.step_once();
                    self.last_step_time = now;
                }
                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
