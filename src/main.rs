use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use argh::FromArgs;
use indicatif::{ProgressBar, ProgressStyle};
use swarm::{Flock, NeighborSearch, Parameters, UpdateMode, render};
use tracing::info;

/// Run a flocking simulation and write every frame as a PNG.
#[derive(FromArgs)]
struct Args {
    /// path to a JSON file with simulation parameters
    #[argh(option)]
    config: Option<PathBuf>,

    /// number of boids
    #[argh(option)]
    boids: Option<usize>,

    /// number of frames to simulate
    #[argh(option, default = "1000")]
    frames: u64,

    /// seed for the initial population
    #[argh(option)]
    seed: Option<u64>,

    /// update mode: sequential or simultaneous
    #[argh(option)]
    mode: Option<UpdateMode>,

    /// neighbour search: brute_force or grid
    #[argh(option)]
    neighbors: Option<NeighborSearch>,

    /// overall strength of the steering rules
    #[argh(option)]
    strength: Option<f64>,

    /// directory for rendered frames
    #[argh(option, default = "PathBuf::from(\"./frames\")")]
    output: PathBuf,

    /// simulate without writing frames
    #[argh(switch)]
    headless: bool,

    /// log flock statistics every N frames (0 disables)
    #[argh(option, default = "100")]
    stats_every: u64,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn parameters(args: &Args) -> Result<Parameters> {
    let mut params = match &args.config {
        Some(path) => Parameters::load(path)?,
        None => Parameters::default(),
    };
    if let Some(boids) = args.boids {
        params.population = boids;
    }
    if let Some(seed) = args.seed {
        params.rng_seed = Some(seed);
    }
    if let Some(mode) = args.mode {
        params.update_mode = mode;
    }
    if let Some(search) = args.neighbors {
        params.neighbor_search = search;
    }
    if let Some(strength) = args.strength {
        params = params.with_strength(strength);
    }
    Ok(params)
}

fn main() -> Result<()> {
    init_tracing();
    let args: Args = argh::from_env();
    let params = parameters(&args)?;
    let mut flock = Flock::new(params).context("invalid simulation parameters")?;
    info!(
        boids = params.population,
        frames = args.frames,
        mode = %params.update_mode,
        search = %params.neighbor_search,
        "starting simulation"
    );

    if !args.headless {
        fs::create_dir_all(&args.output)
            .with_context(|| format!("creating {}", args.output.display()))?;
    }

    let pbar = ProgressBar::new(args.frames);
    pbar.set_style(ProgressStyle::with_template(
        "[{elapsed_precise}/{eta_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {per_sec} {msg}",
    )?);

    for _ in 0..args.frames {
        flock.step();
        if !args.headless {
            let views: Vec<_> = flock.views().collect();
            let img = render::render_frame(&views, params.bound_max);
            render::save_frame(&img, &args.output, flock.frame())
                .with_context(|| format!("writing frame {}", flock.frame()))?;
        }
        if args.stats_every > 0 && flock.frame() % args.stats_every == 0 {
            let stats = flock.stats();
            info!(
                frame = stats.frame,
                mean_speed = stats.mean_speed,
                polarisation = stats.polarisation,
                mean_neighbors = stats.mean_neighbors,
                "flock stats"
            );
        }
        pbar.inc(1);
    }
    pbar.finish_with_message("done");

    let stats = flock.stats();
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
