// The headless runner.
// It loads a config, runs the simulation for a while, logs a report every now and then
// and can dump the final state as json for something else to look at.
//
// The interesting bits are Simulation::tick() in the sim module and Animal::update()
// in the animal module, this is just plumbing.

use clap::Parser;
use pasture::{Config, Report, Simulation};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Runs a grazer/predator pasture without a window
#[derive(Parser, Debug)]
#[command(name = "pasture")]
struct Args {
    /// toml file with the tunables, anything missing is the default
    #[arg(long)]
    config: Option<PathBuf>,

    /// overrides the seed of the config
    #[arg(long)]
    seed: Option<u64>,

    /// number of ticks to run, 0 runs until everybody is gone
    #[arg(long, default_value_t = 9_000)]
    ticks: u64,

    /// pace the ticks to the tick rate of the config instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// csv file to append a report line to every `report_every` ticks
    #[arg(long)]
    report: Option<PathBuf>,

    /// ticks between reports, 0 disables them
    #[arg(long, default_value_t = 300)]
    report_every: u64,

    /// json file for the final snapshot
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let frame = Duration::from_secs_f64(1. / config.world.tick_rate as f64);

    let mut report_file = match &args.report {
        Some(path) => {
            let mut f = BufWriter::new(File::create(path)?);
            writeln!(f, "{}", Report::CSV_HEADER)?;
            Some(f)
        }
        None => None,
    };

    let mut sim = Simulation::new(config)?;
    let started = Instant::now();
    let mut next_frame = started;

    while args.ticks == 0 || sim.time() < args.ticks {
        sim.tick();

        if args.report_every != 0 && sim.time() % args.report_every == 0 {
            let r = sim.report();
            r.log();
            if let Some(f) = report_file.as_mut() {
                r.write_csv(f)?;
            }
        }

        if sim.is_extinct() {
            info!(time = sim.time(), "the pasture is empty");
            break;
        }

        if args.realtime {
            next_frame += frame;
            let now = Instant::now();
            if next_frame > now {
                std::thread::sleep(next_frame - now);
            } else {
                // running behind, don't try to catch up
                next_frame = now;
            }
        }
    }

    if let Some(f) = report_file.as_mut() {
        f.flush()?;
    }
    info!(
        ticks = sim.time(),
        seconds = started.elapsed().as_secs_f64(),
        "done"
    );

    if let Some(path) = &args.snapshot {
        let out = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(out, &sim.snapshot())?;
        info!(path = %path.display(), "wrote snapshot");
    }
    Ok(())
}
