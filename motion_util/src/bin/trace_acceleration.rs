//! Trace constant acceleration with two chained Bresenham slopes, printing
//! `tick velocity position` whenever a counter changes

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use motion_util::config::Config;
use motion_util::report::format_record;
use stepper_math::StepOrder;

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    StepBothThenAccelerate,
    Interleaved,
}

impl From<Order> for StepOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::StepBothThenAccelerate => StepOrder::StepBothThenAccelerate,
            Order::Interleaved => StepOrder::Interleaved,
        }
    }
}

#[derive(Parser)]
#[command(about = "Integrate constant acceleration into velocity and position")]
struct Args {
    /// JSON config file, the `trace` section is used
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to trace
    #[arg(long)]
    ticks: Option<u32>,

    /// Velocity gained over the whole trace, negative slows down
    #[arg(long, allow_negative_numbers = true)]
    acceleration: Option<i32>,

    /// Velocity at tick 0
    #[arg(long)]
    initial_velocity: Option<u32>,

    /// When the position slope picks up a velocity change
    #[arg(long, value_enum)]
    order: Option<Order>,

    /// Print records as JSON lines
    #[arg(long)]
    json: bool,
}

fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::load_or_default(args.config.as_deref())?.trace;
    if let Some(ticks) = args.ticks {
        config.ticks = ticks;
    }
    if let Some(acceleration) = args.acceleration {
        config.acceleration = acceleration;
    }
    if let Some(velocity) = args.initial_velocity {
        config.initial_velocity = velocity;
    }
    if let Some(order) = args.order {
        config.order = order.into();
    }

    let trace = config.trace().context("invalid trace parameters")?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut count = 0;
    for record in trace {
        if args.json {
            writeln!(out, "{}", serde_json::to_string(&record)?)?;
        } else {
            writeln!(out, "{}", format_record(&record))?;
        }
        count += 1;
    }
    out.flush()?;
    info!("{count} records over {} ticks", config.ticks);
    Ok(())
}

fn main() {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).
    if let Err(ref e) = run() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_names_match_config_names() {
        for order in Order::value_variants() {
            let flag = order.to_possible_value().unwrap();
            let config = serde_json::to_string(&StepOrder::from(*order)).unwrap();
            assert_eq!(config, format!("\"{}\"", flag.get_name()));
        }
    }
}
