//! Seeded random selection of observations to delete.

use crate::error::{Error, Result};
use crate::record::ObservationRecord;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Initialize the random number generator for a run. Every random draw in
/// the pipeline comes from the returned generator, so the seed alone
/// determines which observations survive.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Draw `amount` distinct indices uniformly from `0..len`, without
/// replacement. The indices are returned in ascending order.
pub fn draw_deletions<R: Rng + ?Sized>(len: usize, amount: usize, rng: &mut R) -> Result<Vec<usize>> {
    if amount > len {
        return Err(Error::TooManyDeletions {
            requested: amount,
            len,
        });
    }
    let mut indices = rand::seq::index::sample(rng, len, amount).into_vec();
    indices.sort_unstable();
    Ok(indices)
}

/// Delete `amount` random observations from `record`, checking that exactly
/// that many were removed.
pub(crate) fn delete_random<R: Rng + ?Sized>(
    record: &ObservationRecord,
    amount: usize,
    rng: &mut R,
) -> Result<(ObservationRecord, Vec<usize>)> {
    let indices = draw_deletions(record.len(), amount, rng)?;
    debug!("Deleting indices {:?} of {}", indices, record.len());
    let thinned = record.without(&indices)?;

    let expected = record.len() - amount;
    if thinned.len() != expected {
        return Err(Error::InvariantViolation {
            expected,
            actual: thinned.len(),
        });
    }
    Ok((thinned, indices))
}

/// Reduce `record` to exactly `target_len` observations by deleting a random
/// subset. Also returns the deleted indices, ascending, relative to `record`.
pub fn downsample_with_deletions<R: Rng + ?Sized>(
    record: &ObservationRecord,
    target_len: usize,
    rng: &mut R,
) -> Result<(ObservationRecord, Vec<usize>)> {
    info!("Target has {} observations", record.len());
    if record.len() < target_len {
        return Err(Error::RecordTooShort {
            len: record.len(),
            target: target_len,
        });
    }

    let (downsampled, deleted) = delete_random(record, record.len() - target_len, rng)?;
    if downsampled.len() != target_len {
        return Err(Error::InvariantViolation {
            expected: target_len,
            actual: downsampled.len(),
        });
    }
    Ok((downsampled, deleted))
}

/// Reduce `record` to exactly `target_len` observations by deleting a random
/// subset. See [`downsample_with_deletions()`].
pub fn downsample<R: Rng + ?Sized>(
    record: &ObservationRecord,
    target_len: usize,
    rng: &mut R,
) -> Result<ObservationRecord> {
    downsample_with_deletions(record, target_len, rng).map(|(downsampled, _)| downsampled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;
    use std::collections::BTreeSet;

    fn ramp(n: usize) -> ObservationRecord {
        let mjd = Array1::from_iter((0..n).map(|i| 56000.0 + i as f64));
        let rv = Array1::from_iter((0..n).map(|i| i as f64 * 0.5));
        let rv_err = Array1::from_iter((0..n).map(|i| 0.1 + i as f64 * 0.01));
        ObservationRecord::new(mjd, rv, rv_err, "km / s").unwrap()
    }

    #[test]
    fn draws_are_distinct_sorted_and_in_range() {
        let mut rng = seeded_rng(7);
        let indices = draw_deletions(30, 13, &mut rng).unwrap();
        assert_eq!(indices.len(), 13);
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
        assert!(indices.iter().all(|&i| i < 30));
    }

    #[test]
    fn same_seed_same_draw() {
        let a = draw_deletions(30, 13, &mut seeded_rng(42)).unwrap();
        let b = draw_deletions(30, 13, &mut seeded_rng(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn cannot_draw_more_than_len() {
        let err = draw_deletions(3, 4, &mut seeded_rng(0)).unwrap_err();
        assert!(matches!(err, Error::TooManyDeletions { requested: 4, len: 3 }));
    }

    #[test]
    fn downsample_thirty_to_seventeen() {
        let original = ramp(30);
        let (downsampled, deleted) =
            downsample_with_deletions(&original, 17, &mut seeded_rng(42)).unwrap();

        assert_eq!(downsampled.len(), 17);
        assert_eq!(deleted.len(), 13);
        assert_eq!(deleted.iter().collect::<BTreeSet<_>>().len(), 13);
        assert!(deleted.iter().all(|&i| i <= 29));

        // Survivors are exactly the positions that were not deleted.
        let survivors: Vec<f64> = (0..30)
            .filter(|i| !deleted.contains(i))
            .map(|i| original.mjd()[i])
            .collect();
        assert_eq!(downsampled.mjd().to_vec(), survivors);

        let (_, again) = downsample_with_deletions(&original, 17, &mut seeded_rng(42)).unwrap();
        assert_eq!(deleted, again);
    }

    #[test]
    fn downsample_to_own_length_deletes_nothing() {
        let original = ramp(17);
        let (downsampled, deleted) =
            downsample_with_deletions(&original, 17, &mut seeded_rng(1)).unwrap();
        assert!(deleted.is_empty());
        assert_eq!(downsampled, original);
    }

    #[test]
    fn downsample_rejects_short_record() {
        let err = downsample(&ramp(10), 17, &mut seeded_rng(1)).unwrap_err();
        assert!(matches!(err, Error::RecordTooShort { len: 10, target: 17 }));
    }
}
