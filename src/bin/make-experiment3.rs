//! Create an npz file containing the same RV data with random points deleted
//! in succession.
//!
//! Run from inside the project's `scripts` directory. Reads
//! `data/troup-allVisit.npz` and writes `data/experiment3.npz` (plus the
//! `.attrs.json` sidecars holding units and time scales).

use anyhow::Context;
use clap::Parser;
use rv_thinning::{run_experiment, ExperimentParams, NpzArchive, NpzStageSink, Paths};

/// Write successively thinned copies of one star's RV data.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Random number seed.
    #[arg(short, long, default_value_t = ExperimentParams::DEFAULT_SEED)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let paths = Paths::from_current_dir()?;
    paths.create_dirs().context("creating project directories")?;

    let params = ExperimentParams {
        seed: args.seed,
        ..Default::default()
    };
    print!("{}", params);

    let mut source = NpzArchive::open(&paths.troup_all_visit)
        .with_context(|| format!("opening {}", paths.troup_all_visit.display()))?;
    let mut sink = NpzStageSink::create(&paths.experiment3, &params.star_id)
        .with_context(|| format!("creating {}", paths.experiment3.display()))?;

    let summary = run_experiment(&mut source, &mut sink, &params)?;
    sink.finish()
        .with_context(|| format!("finishing {}", paths.experiment3.display()))?;

    println!(
        "Wrote {} stages ({} down to {} of {} observations) to {}",
        summary.stages.len(),
        summary.stages.first().map_or(0, |&(_, len)| len),
        summary.stages.last().map_or(0, |&(_, len)| len),
        summary.n_original,
        paths.experiment3.display()
    );

    Ok(())
}
