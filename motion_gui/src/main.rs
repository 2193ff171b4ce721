//! Plot a Bresenham acceleration trace and a planned waypoint path
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use egui::DragValue;
use egui_plot::{Legend, Line, LineStyle, PlotPoints, Points};
use log::warn;
use path_planner::f64::{ExponentialPlanner, MotionLimits, PathPlan, Waypoints};
use path_planner::Preset;
use stepper_math::{AccelerationTrace, StepOrder};
use uom::si::time::second;

fn main() -> Result<(), eframe::Error> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "MotionPlot",
        options,
        Box::new(|_cc| Box::<MotionPlot>::default()),
    )
}

#[derive(Clone, Copy, PartialEq)]
enum View {
    Trace,
    Path,
}

#[derive(Clone, Copy, PartialEq)]
struct TraceParams {
    ticks: u32,
    acceleration: i32,
    initial_velocity: u32,
    interleaved: bool,
}

#[derive(Default)]
struct TraceCurves {
    velocity: Vec<[f64; 2]>,
    position: Vec<[f64; 2]>,
}

impl TraceCurves {
    fn compute(params: TraceParams) -> Self {
        let order = if params.interleaved {
            StepOrder::Interleaved
        } else {
            StepOrder::StepBothThenAccelerate
        };
        let trace = match AccelerationTrace::new(params.ticks, params.acceleration) {
            Ok(trace) => trace.starting_at(params.initial_velocity).with_order(order),
            Err(err) => {
                warn!(
                    "can't trace {} ticks at {}: {err}",
                    params.ticks, params.acceleration
                );
                return Self::default();
            }
        };

        let mut curves = Self {
            velocity: vec![[0.0, params.initial_velocity as f64]],
            position: vec![[0.0, 0.0]],
        };
        for record in trace {
            let tick = record.tick as f64;
            curves.velocity.push([tick, record.velocity as f64]);
            curves.position.push([tick, record.position as f64]);
        }
        curves
    }
}

struct MotionPlot {
    view: View,
    params: TraceParams,
    cached_params: Option<TraceParams>,
    curves: TraceCurves,
    preset: Preset,
    overlap: f64,
    plan: Option<PathPlan>,
    plan_key: Option<(Preset, u64)>,
}

impl Default for MotionPlot {
    fn default() -> Self {
        Self {
            view: View::Trace,
            params: TraceParams {
                ticks: 30000,
                acceleration: 500,
                initial_velocity: 0,
                interleaved: false,
            },
            cached_params: None,
            curves: TraceCurves::default(),
            preset: Preset::Square,
            overlap: 0.8,
            plan: None,
            plan_key: None,
        }
    }
}

impl MotionPlot {
    fn update_trace(&mut self) {
        if self.cached_params != Some(self.params) {
            self.curves = TraceCurves::compute(self.params);
            self.cached_params = Some(self.params);
        }
    }

    fn update_plan(&mut self) {
        let key = (self.preset, self.overlap.to_bits());
        if self.plan_key == Some(key) {
            return;
        }
        self.plan_key = Some(key);
        self.plan = ExponentialPlanner::new(MotionLimits::default(), self.overlap)
            .and_then(|planner| planner.plan(&Waypoints::preset(self.preset)))
            .map_err(|err| warn!("can't plan {}: {err}", self.preset.name()))
            .ok();
    }

    fn trace_options(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add(
                DragValue::new(&mut self.params.ticks)
                    .clamp_range(1..=200_000)
                    .speed(100.0),
            );
            ui.label("ticks").on_hover_text("fast axis length of both slopes");
        });
        ui.horizontal(|ui| {
            ui.add(
                DragValue::new(&mut self.params.acceleration)
                    .clamp_range(-5000..=5000)
                    .speed(5.0),
            );
            ui.label("acceleration").on_hover_text("velocity gained over the trace");
        });
        ui.horizontal(|ui| {
            ui.add(
                DragValue::new(&mut self.params.initial_velocity)
                    .clamp_range(0..=5000)
                    .speed(5.0),
            );
            ui.label("initial velocity");
        });
        ui.checkbox(&mut self.params.interleaved, "Interleaved")
            .on_hover_text("apply velocity changes before stepping position");
    }

    fn path_options(&mut self, ui: &mut egui::Ui) {
        egui::ComboBox::from_label("path")
            .selected_text(self.preset.name())
            .show_ui(ui, |ui| {
                for preset in Preset::ALL {
                    ui.selectable_value(&mut self.preset, preset, preset.name());
                }
            });
        ui.horizontal(|ui| {
            ui.add(
                DragValue::new(&mut self.overlap)
                    .clamp_range(0.0..=1.0)
                    .speed(0.01),
            );
            ui.label("overlap");
        });
        if let Some(plan) = &self.plan {
            ui.label(format!(
                "total motion time {:.4} s",
                plan.total_motion_time.get::<second>()
            ));
            ui.label(format!(
                "settling time {:.4} s",
                plan.settling_time.get::<second>()
            ));
        }
    }
}

impl eframe::App for MotionPlot {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        egui::SidePanel::left("options").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.radio_value(&mut self.view, View::Trace, "Trace");
                ui.radio_value(&mut self.view, View::Path, "Path");
            });
            ui.separator();
            match self.view {
                View::Trace => self.trace_options(ui),
                View::Path => self.path_options(ui),
            }
        });

        match self.view {
            View::Trace => self.update_trace(),
            View::Path => self.update_plan(),
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.view {
            View::Trace => {
                egui_plot::Plot::new("trace")
                    .legend(Legend::default())
                    .show(ui, |plot_ui| {
                        plot_ui.line(
                            Line::new(PlotPoints::new(self.curves.velocity.clone()))
                                .name("velocity"),
                        );
                        plot_ui.line(
                            Line::new(PlotPoints::new(self.curves.position.clone()))
                                .name("position"),
                        );
                    });
            }
            View::Path => {
                let waypoints = Waypoints::preset(self.preset);
                let xy: Vec<[f64; 2]> = waypoints
                    .as_array_meter()
                    .iter()
                    .map(|p| [p[0], p[1]])
                    .collect();
                egui_plot::Plot::new("path")
                    .data_aspect(1.0)
                    .legend(Legend::default())
                    .show(ui, |plot_ui| {
                        plot_ui.line(
                            Line::new(PlotPoints::new(xy.clone()))
                                .name("path")
                                .style(LineStyle::dashed_dense()),
                        );
                        plot_ui.points(
                            Points::new(PlotPoints::new(xy))
                                .radius(3.0)
                                .name("waypoints"),
                        );
                    });
            }
        });
    }
}
