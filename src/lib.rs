//! Build nested, successively thinned copies of one star's radial-velocity
//! data for testing orbit fits on sparse sampling.
//!
//! The pipeline is [`seeded_rng()`] → [`downsample()`] →
//! [`SuccessiveDeletion`], with each [`Stage`] handed to a [`StageSink`] as
//! soon as it exists. [`run_experiment()`] strings these together.

pub mod archive;
pub mod error;
pub mod mock;
pub mod paths;
pub mod record;
pub mod sampling;
pub mod stages;

pub use archive::{Attributes, NpzArchive, NpzStageSink, ObservationSource, StageSink};
pub use error::{Error, Result};
pub use mock::MockStarParams;
pub use paths::Paths;
pub use record::ObservationRecord;
pub use sampling::{downsample, downsample_with_deletions, draw_deletions, seeded_rng};
pub use stages::{Stage, SuccessiveDeletion};

use log::info;
use std::iter::StepBy;
use std::num::NonZeroUsize;
use std::ops::RangeInclusive;

/// Cumulative deletion counts at which a stage is emitted.
///
/// Counts run from zero in steps of `step` up to and including
/// `max_deleted_inclusive` (or the largest multiple of `step` below it).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeletionSchedule {
    // Points deleted between consecutive stages
    step: NonZeroUsize,
    // Upper bound on the cumulative deletion count
    max_deleted_inclusive: usize,
}
impl DeletionSchedule {
    /// Make a new schedule deleting `step` points per stage, up to and
    /// including `max_deleted_inclusive` points in total.
    pub fn new(step: NonZeroUsize, max_deleted_inclusive: usize) -> Self {
        Self {
            step,
            max_deleted_inclusive,
        }
    }

    /// Delegates to [`DeletionSchedule::new()`]. Returns None if the step is
    /// zero.
    pub fn new_from_usize(step: usize, max_deleted_inclusive: usize) -> Option<Self> {
        NonZeroUsize::new(step).map(|step| Self::new(step, max_deleted_inclusive))
    }

    /// Points deleted between consecutive stages.
    pub fn step(&self) -> NonZeroUsize {
        self.step
    }

    /// Upper bound on the cumulative deletion count.
    pub fn max_deleted_inclusive(&self) -> usize {
        self.max_deleted_inclusive
    }

    /// The last checkpoint actually reached.
    pub fn last(&self) -> usize {
        self.max_deleted_inclusive - self.max_deleted_inclusive % self.step.get()
    }

    /// Number of stages the schedule produces.
    pub fn len(&self) -> usize {
        self.max_deleted_inclusive / self.step.get() + 1
    }

    /// A schedule always has at least the zero checkpoint.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over the checkpoints `0, step, 2 * step, ...`.
    pub fn iter(&self) -> StepBy<RangeInclusive<usize>> {
        (0..=self.max_deleted_inclusive).step_by(self.step.get())
    }

    /// Check that a record of `len` observations keeps at least one through
    /// the whole schedule.
    pub fn check_fits(&self, len: usize) -> Result<()> {
        if self.last() >= len {
            return Err(Error::ScheduleTooLong {
                max_deleted: self.last(),
                target: len,
            });
        }
        Ok(())
    }
}
impl Default for DeletionSchedule {
    fn default() -> Self {
        Self::new_from_usize(2, 14).unwrap()
    }
}
impl std::fmt::Display for DeletionSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Delete {} points per stage, up to and including {}",
            self.step, self.max_deleted_inclusive
        )
    }
}

/// Parameters of the thinning experiment.
#[derive(Clone, Debug)]
pub struct ExperimentParams {
    /// APOGEE identifier of the star to read
    pub star_id: String,
    /// Number of observations kept by the initial downsample
    pub target_len: NonZeroUsize,
    /// Checkpoints for successive deletion
    pub schedule: DeletionSchedule,
    /// Random number seed
    pub seed: u64,
}
impl ExperimentParams {
    /// Star used by the experiment.
    pub const DEFAULT_STAR_ID: &'static str = "2M03080601+7950502";
    /// Seed used when none is given.
    pub const DEFAULT_SEED: u64 = 42;
}
impl Default for ExperimentParams {
    fn default() -> Self {
        Self {
            star_id: Self::DEFAULT_STAR_ID.to_owned(),
            target_len: NonZeroUsize::new(17).unwrap(),
            schedule: DeletionSchedule::default(),
            seed: Self::DEFAULT_SEED,
        }
    }
}
impl std::fmt::Display for ExperimentParams {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Experiment parameters:")?;
        writeln!(f, "Star: {}", self.star_id)?;
        writeln!(f, "Observations after downsampling: {}", self.target_len)?;
        writeln!(f, "{}", self.schedule)?;
        writeln!(f, "Random seed: {}", self.seed)?;
        Ok(())
    }
}

/// What a run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of observations in the input before downsampling
    pub n_original: usize,
    /// `(schedule index, observations left)` for every stage written
    pub stages: Vec<(usize, usize)>,
}

/// Read the star from `source`, downsample it, and write every stage of the
/// schedule to `sink` as it is produced.
///
/// The sink is not finished here; callers that own a file-backed sink should
/// finish it once this returns.
pub fn run_experiment<Src, Snk>(source: &mut Src, sink: &mut Snk, params: &ExperimentParams) -> Result<RunSummary>
where
    Src: ObservationSource + ?Sized,
    Snk: StageSink + ?Sized,
{
    // Refuse a schedule that would empty the record before drawing anything.
    params.schedule.check_fits(params.target_len.get())?;

    let mut rng = seeded_rng(params.seed);
    let original = source.observations(&params.star_id)?;
    let initial = downsample(&original, params.target_len.get(), &mut rng)?;

    let mut stages = Vec::with_capacity(params.schedule.len());
    for stage in SuccessiveDeletion::new(initial, params.schedule, &mut rng)? {
        let stage = stage?;
        sink.write_stage(&stage)?;
        stages.push((stage.index(), stage.len()));
    }
    info!("Wrote {} stages for {}", stages.len(), params.star_id);

    Ok(RunSummary {
        n_original: original.len(),
        stages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_checkpoints() {
        let schedule = DeletionSchedule::default();
        assert_eq!(schedule.iter().collect::<Vec<_>>(), vec![0, 2, 4, 6, 8, 10, 12, 14]);
        assert_eq!(schedule.len(), 8);
        assert_eq!(schedule.last(), 14);
    }

    #[test]
    fn schedule_stops_below_uneven_max() {
        let schedule = DeletionSchedule::new_from_usize(3, 10).unwrap();
        assert_eq!(schedule.iter().collect::<Vec<_>>(), vec![0, 3, 6, 9]);
        assert_eq!(schedule.len(), 4);
        assert_eq!(schedule.last(), 9);
    }

    #[test]
    fn zero_step_is_rejected() {
        assert!(DeletionSchedule::new_from_usize(0, 14).is_none());
    }

    #[test]
    fn default_schedule_fits_default_target() {
        let params = ExperimentParams::default();
        assert!(params.schedule.check_fits(params.target_len.get()).is_ok());
        assert!(params.schedule.check_fits(14).is_err());
        assert!(params.schedule.check_fits(15).is_ok());
    }

    #[test]
    fn params_display_names_star_and_seed() {
        let text = ExperimentParams::default().to_string();
        assert!(text.contains("2M03080601+7950502"));
        assert!(text.contains("Random seed: 42"));
    }
}
