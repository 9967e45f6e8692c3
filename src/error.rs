//! Error type shared by the whole crate.
//!
//! Every failure in the pipeline is fatal. The variants exist so that callers
//! (and tests) can tell a bad working directory from a broken invariant or a
//! missing star, not so that anything can be retried.

use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The process was not started from inside the `scripts` directory.
    #[error("you must run this program from inside the scripts directory: {}", .0.display())]
    NotInScriptsDir(PathBuf),

    /// The schedule would delete every remaining observation (or more).
    #[error("schedule deletes up to {max_deleted} points but only {target} remain after downsampling")]
    ScheduleTooLong { max_deleted: usize, target: usize },

    /// Asked to downsample to more points than the record holds.
    #[error("record has {len} observations, cannot downsample to {target}")]
    RecordTooShort { len: usize, target: usize },

    /// Asked to delete more points than the record holds.
    #[error("cannot delete {requested} of {len} observations")]
    TooManyDeletions { requested: usize, len: usize },

    /// A deletion index points past the end of the record.
    #[error("index {index} out of range for {len} observations")]
    IndexOutOfRange { index: usize, len: usize },

    /// An internal length check failed after deleting points.
    #[error("invariant violated: expected {expected} observations, found {actual}")]
    InvariantViolation { expected: usize, actual: usize },

    /// The three parallel arrays of a record disagree in length.
    #[error("mismatched array lengths: mjd={mjd}, rv={rv}, rv_err={rv_err}")]
    LengthMismatch { mjd: usize, rv: usize, rv_err: usize },

    /// The input container has no group for this star.
    #[error("star {0} not found in input")]
    StarNotFound(String),

    /// The star's group exists but one of its datasets does not.
    #[error("dataset {0} not found in input")]
    MissingDataset(String),

    /// A dataset lacks a required attribute.
    #[error("dataset {path} has no attribute {key:?}")]
    MissingAttribute { path: String, key: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    ReadNpz(#[from] ndarray_npy::ReadNpzError),

    #[error(transparent)]
    WriteNpz(#[from] ndarray_npy::WriteNpzError),

    /// The attribute sidecar could not be (de)serialized.
    #[error("attribute sidecar: {0}")]
    Attributes(#[from] serde_json::Error),
}
