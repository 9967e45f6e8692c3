//! Parallel arrays of radial-velocity observations for one star.

use crate::error::{Error, Result};
use ndarray::{Array1, Axis};

/// Format tag written on every time dataset.
pub const TIME_FORMAT: &str = "mjd";

/// Time scale assumed when the input does not name one.
pub const DEFAULT_TIME_SCALE: &str = "tcb";

/// Time scale every output stage is tagged with.
pub const OUTPUT_TIME_SCALE: &str = "tcb";

/// Times, radial velocities and their uncertainties for one star.
///
/// The three arrays always have the same length and are matched by position.
/// `rv` and `rv_err` share the physical unit `rv_unit`.
#[derive(Clone, Debug, PartialEq)]
pub struct ObservationRecord {
    mjd: Array1<f64>,
    rv: Array1<f64>,
    rv_err: Array1<f64>,
    rv_unit: String,
    time_scale: String,
}
impl ObservationRecord {
    /// Make a new record. Returns [`Error::LengthMismatch`] unless all three
    /// arrays have the same length.
    pub fn new(
        mjd: Array1<f64>,
        rv: Array1<f64>,
        rv_err: Array1<f64>,
        rv_unit: impl Into<String>,
    ) -> Result<Self> {
        if mjd.len() != rv.len() || rv.len() != rv_err.len() {
            return Err(Error::LengthMismatch {
                mjd: mjd.len(),
                rv: rv.len(),
                rv_err: rv_err.len(),
            });
        }
        Ok(Self {
            mjd,
            rv,
            rv_err,
            rv_unit: rv_unit.into(),
            time_scale: DEFAULT_TIME_SCALE.to_owned(),
        })
    }

    /// Replace the time scale tag (e.g. `"utc"`).
    pub fn with_time_scale(mut self, time_scale: impl Into<String>) -> Self {
        self.time_scale = time_scale.into();
        self
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.mjd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mjd.is_empty()
    }

    /// Observation times as Modified Julian Dates.
    pub fn mjd(&self) -> &Array1<f64> {
        &self.mjd
    }

    pub fn rv(&self) -> &Array1<f64> {
        &self.rv
    }

    pub fn rv_err(&self) -> &Array1<f64> {
        &self.rv_err
    }

    pub fn rv_unit(&self) -> &str {
        &self.rv_unit
    }

    pub fn time_scale(&self) -> &str {
        &self.time_scale
    }

    /// Iterate over `(mjd, rv, rv_err)` triples in order.
    pub fn triples(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.mjd
            .iter()
            .zip(self.rv.iter())
            .zip(self.rv_err.iter())
            .map(|((&t, &v), &e)| (t, v, e))
    }

    /// Copy of this record with the observations at `indices` removed from
    /// all three arrays. The remaining observations keep their relative
    /// order. Repeated indices are removed once.
    pub fn without(&self, indices: &[usize]) -> Result<Self> {
        let len = self.len();
        let mut keep = vec![true; len];
        for &index in indices {
            if index >= len {
                return Err(Error::IndexOutOfRange { index, len });
            }
            keep[index] = false;
        }
        let kept: Vec<usize> = keep
            .iter()
            .enumerate()
            .filter_map(|(index, &k)| if k { Some(index) } else { None })
            .collect();

        Ok(Self {
            mjd: self.mjd.select(Axis(0), &kept),
            rv: self.rv.select(Axis(0), &kept),
            rv_err: self.rv_err.select(Axis(0), &kept),
            rv_unit: self.rv_unit.clone(),
            time_scale: self.time_scale.clone(),
        })
    }
}
impl std::fmt::Display for ObservationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} observations (time scale {}, rv in {})",
            self.len(),
            self.time_scale,
            self.rv_unit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn record() -> ObservationRecord {
        ObservationRecord::new(
            array![1.0, 2.0, 3.0, 4.0, 5.0],
            array![10.0, 20.0, 30.0, 40.0, 50.0],
            array![0.1, 0.2, 0.3, 0.4, 0.5],
            "km / s",
        )
        .unwrap()
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let err = ObservationRecord::new(array![1.0, 2.0], array![1.0], array![1.0, 2.0], "km / s")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch { mjd: 2, rv: 1, rv_err: 2 }
        ));
    }

    #[test]
    fn without_removes_positions_from_every_array() {
        let thinned = record().without(&[3, 0]).unwrap();
        assert_eq!(thinned.mjd(), &array![2.0, 3.0, 5.0]);
        assert_eq!(thinned.rv(), &array![20.0, 30.0, 50.0]);
        assert_eq!(thinned.rv_err(), &array![0.2, 0.3, 0.5]);
        assert_eq!(thinned.rv_unit(), "km / s");
        assert_eq!(thinned.time_scale(), DEFAULT_TIME_SCALE);
    }

    #[test]
    fn without_leaves_source_untouched() {
        let original = record();
        let _ = original.without(&[1, 2]).unwrap();
        assert_eq!(original.len(), 5);
    }

    #[test]
    fn without_nothing_is_a_copy() {
        let original = record();
        assert_eq!(original.without(&[]).unwrap(), original);
    }

    #[test]
    fn without_rejects_out_of_range_index() {
        let err = record().without(&[5]).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 5, len: 5 }));
    }
}
