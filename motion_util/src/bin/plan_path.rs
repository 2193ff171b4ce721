//! Time a waypoint path with the exponential velocity planner

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use motion_util::config::Config;
use motion_util::report::write_plan;
use path_planner::Preset;

#[derive(Parser)]
#[command(about = "Plan per-segment timing and direction for a waypoint path")]
struct Args {
    /// JSON config file, the `planner` section is used
    #[arg(long)]
    config: Option<PathBuf>,

    /// square, hexagon, figure-eight or ten-squares
    #[arg(long)]
    preset: Option<Preset>,

    /// m/s
    #[arg(long)]
    max_velocity: Option<f64>,

    /// m/s^2
    #[arg(long)]
    max_acceleration: Option<f64>,

    /// m/s^3
    #[arg(long)]
    max_jerk: Option<f64>,

    /// Blending of consecutive settling windows, 0 to 1
    #[arg(long)]
    overlap: Option<f64>,

    /// Print the plan as JSON
    #[arg(long)]
    json: bool,
}

fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::load_or_default(args.config.as_deref())?.planner;
    if let Some(preset) = args.preset {
        config.preset = preset;
        config.waypoints = None;
    }
    if let Some(max_velocity) = args.max_velocity {
        config.max_velocity = max_velocity;
    }
    if let Some(max_acceleration) = args.max_acceleration {
        config.max_acceleration = max_acceleration;
    }
    if let Some(max_jerk) = args.max_jerk {
        config.max_jerk = max_jerk;
    }
    if let Some(overlap) = args.overlap {
        config.overlap = overlap;
    }

    let planner = config.planner().context("invalid planner limits")?;
    let plan = planner
        .plan(&config.waypoints())
        .context("could not plan path")?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if args.json {
        serde_json::to_writer_pretty(&mut out, &plan)?;
        writeln!(out)?;
    } else {
        write_plan(&mut out, &plan)?;
    }
    out.flush()?;
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(ref e) = run() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
