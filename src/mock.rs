//! Synthetic radial-velocity data standing in for the survey file.

use crate::error::Result;
use crate::record::ObservationRecord;
use ndarray::{Array, Array1};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal, Uniform};
use std::f64::consts::TAU;
use std::num::NonZeroUsize;

/// Parameters for generating a mock star.
#[derive(Clone, Debug)]
pub struct MockStarParams {
    /// Number of observations
    pub n_obs: NonZeroUsize,
    /// First possible observation time, MJD
    pub start_mjd: f64,
    /// Length of the observing campaign in days
    pub baseline_days: f64,
    /// Orbital period in days
    pub period_days: f64,
    /// Velocity semi-amplitude
    pub amplitude: f64,
    /// Systemic velocity
    pub systemic_rv: f64,
    /// Range of per-visit uncertainties, lower bound inclusive
    pub rv_err_range: (f64, f64),
    /// Unit of velocities and uncertainties
    pub rv_unit: String,
}
impl Default for MockStarParams {
    fn default() -> Self {
        Self {
            n_obs: NonZeroUsize::new(30).unwrap(),
            start_mjd: 55800.0,
            baseline_days: 1200.0,
            period_days: 71.3,
            amplitude: 8.5,
            systemic_rv: -21.0,
            rv_err_range: (0.05, 0.4),
            rv_unit: "km / s".to_owned(),
        }
    }
}
impl std::fmt::Display for MockStarParams {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Mock star parameters:")?;
        writeln!(f, "Number of observations: {}", self.n_obs)?;
        writeln!(f, "Baseline: {} days from MJD {}", self.baseline_days, self.start_mjd)?;
        writeln!(f, "Period: {} days", self.period_days)?;
        writeln!(f, "Semi-amplitude: {} {}", self.amplitude, self.rv_unit)?;
        writeln!(f, "Systemic velocity: {} {}", self.systemic_rv, self.rv_unit)?;
        writeln!(
            f,
            "Uncertainties from {} to {} {}",
            self.rv_err_range.0, self.rv_err_range.1, self.rv_unit
        )?;
        Ok(())
    }
}
impl MockStarParams {
    /// Randomly generate an observation record of a star on a circular orbit,
    /// observed at random times with Gaussian measurement noise.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<ObservationRecord> {
        let n_obs = self.n_obs.get();

        // Random visit times across the baseline, in chronological order.
        let mut mjd = Array::random_using(
            n_obs,
            Uniform::new(self.start_mjd, self.start_mjd + self.baseline_days),
            rng,
        )
        .to_vec();
        mjd.sort_by(|a, b| a.total_cmp(b));
        let mjd = Array1::from_vec(mjd);

        // Per-visit uncertainties.
        let (err_lo, err_hi) = self.rv_err_range;
        let rv_err = Array::random_using(n_obs, Uniform::new(err_lo, err_hi), rng);

        // Sinusoidal velocity curve with a random phase, plus noise scaled by
        // each visit's uncertainty.
        let phase = Uniform::new(0.0, TAU).sample(rng);
        let rv = mjd
            .iter()
            .zip(rv_err.iter())
            .map(|(&t, &err)| {
                let noise: f64 = StandardNormal.sample(rng);
                self.systemic_rv
                    + self.amplitude * (TAU * (t - self.start_mjd) / self.period_days + phase).sin()
                    + err * noise
            })
            .collect::<Array1<f64>>();

        ObservationRecord::new(mjd, rv, rv_err, self.rv_unit.clone())
    }
}
