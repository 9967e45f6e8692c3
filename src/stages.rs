//! Successive deletion: a shrinking record threaded through the schedule.

use crate::error::{Error, Result};
use crate::record::ObservationRecord;
use crate::sampling::delete_random;
use crate::DeletionSchedule;
use log::info;
use rand::Rng;
use std::iter::StepBy;
use std::ops::RangeInclusive;

/// One immutable snapshot of the shrinking dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct Stage {
    index: usize,
    record: ObservationRecord,
}
impl Stage {
    /// The zeroth stage: `record` before any successive deletion.
    pub fn initial(record: ObservationRecord) -> Stage {
        Stage { index: 0, record }
    }

    /// Schedule index of this stage, i.e. how many points have been deleted
    /// since the initial downsample.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn record(&self) -> &ObservationRecord {
        &self.record
    }

    /// Number of observations left at this stage.
    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    /// Name of the output group holding this stage.
    pub fn group_name(&self) -> String {
        self.index.to_string()
    }

    /// The stage at schedule index `index`, made by deleting
    /// `index - self.index()` more random points from this one.
    pub fn successor<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> Result<Stage> {
        let amount = index.checked_sub(self.index).ok_or(Error::InvariantViolation {
            expected: self.index,
            actual: index,
        })?;
        let (record, _) = delete_random(&self.record, amount, rng)?;
        Ok(Stage { index, record })
    }
}

/// Iterator over the stages of a deletion schedule.
///
/// The first stage is the initial record itself. Each later stage is derived
/// from the one before it, drawing from the same generator, so the draws
/// accumulate and are never reset. After an error the iterator is exhausted.
pub struct SuccessiveDeletion<R> {
    checkpoints: StepBy<RangeInclusive<usize>>,
    initial: Option<ObservationRecord>,
    previous: Option<Stage>,
    rng: R,
}
impl<R: Rng> SuccessiveDeletion<R> {
    /// Start a run over `schedule` from `initial`. Returns
    /// [`Error::ScheduleTooLong`] if the schedule would leave no observations.
    pub fn new(initial: ObservationRecord, schedule: DeletionSchedule, rng: R) -> Result<Self> {
        schedule.check_fits(initial.len())?;
        Ok(Self {
            checkpoints: schedule.iter(),
            initial: Some(initial),
            previous: None,
            rng,
        })
    }
}
impl<R: Rng> Iterator for SuccessiveDeletion<R> {
    type Item = Result<Stage>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.checkpoints.next()?;
        let stage = match (self.previous.as_ref(), self.initial.take()) {
            (None, Some(record)) => Ok(Stage::initial(record)),
            (Some(previous), _) => previous.successor(index, &mut self.rng),
            (None, None) => return None,
        };

        match stage {
            Ok(stage) => {
                info!("{} {}", stage.index(), stage.len());
                self.previous = Some(stage.clone());
                Some(Ok(stage))
            }
            Err(err) => {
                self.previous = None;
                Some(Err(err))
            }
        }
    }
}
