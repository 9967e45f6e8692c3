//! Write a mock star to data/troup-allVisit.npz so that make-experiment3 can
//! run without the survey data.

use anyhow::Context;
use clap::Parser;
use rv_thinning::archive::save_star;
use rv_thinning::{seeded_rng, ExperimentParams, MockStarParams, Paths};
use std::num::NonZeroUsize;

/// Generate synthetic radial-velocity visits for the experiment's star.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Random number seed.
    #[arg(short, long, default_value_t = ExperimentParams::DEFAULT_SEED)]
    seed: u64,

    /// Number of visits to simulate.
    #[arg(short, long, default_value_t = 30)]
    n_obs: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let paths = Paths::from_current_dir()?;
    paths.create_dirs().context("creating project directories")?;

    // Mock star parameters.
    let params = MockStarParams {
        n_obs: NonZeroUsize::new(args.n_obs).context("--n-obs must be at least 1")?,
        ..Default::default()
    };
    print!("{}", params);

    // Generate mock data.
    let record = params.generate(&mut seeded_rng(args.seed))?;
    println!("Generated {}.", record);

    // Write data to npz file.
    let star_id = ExperimentParams::DEFAULT_STAR_ID;
    save_star(&paths.troup_all_visit, star_id, &record)
        .with_context(|| format!("writing {}", paths.troup_all_visit.display()))?;
    println!("Wrote {} to {}", star_id, paths.troup_all_visit.display());

    Ok(())
}
