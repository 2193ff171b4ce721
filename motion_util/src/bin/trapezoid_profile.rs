//! Sample a trapezoidal velocity move on an integer clock

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use motion_util::config::Config;
use motion_util::report::{format_sample, write_trapezoid_header};

#[derive(Parser)]
#[command(about = "Velocity and position of a trapezoidal move, tick by tick")]
struct Args {
    /// JSON config file, the `trapezoid` section is used
    #[arg(long)]
    config: Option<PathBuf>,

    /// Requested cruise velocity, steps/s
    #[arg(long)]
    vmax: Option<u64>,

    /// Acceleration, steps/s^2
    #[arg(long)]
    acc: Option<u64>,

    /// Move length, steps
    #[arg(long)]
    dx: Option<u64>,

    /// Clock frequency, ticks/s
    #[arg(long)]
    clock: Option<u64>,

    /// Ticks between samples
    #[arg(long)]
    stride: Option<u64>,
}

fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::load_or_default(args.config.as_deref())?.trapezoid;
    if let Some(vmax) = args.vmax {
        config.vmax = vmax;
    }
    if let Some(acc) = args.acc {
        config.acc = acc;
    }
    if let Some(dx) = args.dx {
        config.dx = dx;
    }
    if let Some(clock) = args.clock {
        config.clock = clock;
    }
    if let Some(stride) = args.stride {
        config.stride = stride;
    }

    let profile = config.profile().context("could not plan trapezoid")?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_trapezoid_header(&mut out, &profile)?;
    for sample in profile.samples(config.stride) {
        writeln!(out, "{}", format_sample(&sample))?;
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
