//! Project directory layout.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Locations of the project's data, cache and plot directories.
///
/// The project root is the parent of the `scripts` directory the programs
/// are run from. Resolving paths touches nothing on disk except to check
/// that `scripts` exists; call [`Paths::create_dirs()`] to make the output
/// directories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paths {
    /// Project root
    pub root: PathBuf,
    /// Intermediate data products
    pub cache: PathBuf,
    /// Diagnostic plots
    pub plots: PathBuf,
    /// Figures for the paper
    pub figures: PathBuf,
    /// Survey visit data, one group per star
    pub troup_all_visit: PathBuf,
    /// Cached samples from the prior
    pub prior_samples: PathBuf,
    /// Output of the thinning experiment
    pub experiment3: PathBuf,
}
impl Paths {
    /// Resolve paths for a process whose working directory is `cwd`.
    pub fn from_scripts_dir(cwd: &Path) -> Result<Self> {
        let root = cwd.join("..").canonicalize()?;

        let scripts = root.join("scripts");
        if !scripts.is_dir() {
            return Err(Error::NotInScriptsDir(scripts));
        }

        Ok(Self::from_root(root))
    }

    /// Resolve paths relative to the current working directory.
    pub fn from_current_dir() -> Result<Self> {
        Self::from_scripts_dir(&std::env::current_dir()?)
    }

    fn from_root(root: PathBuf) -> Self {
        let data = root.join("data");
        let cache = root.join("cache");
        Self {
            plots: root.join("plots"),
            figures: root.join("paper").join("figures"),
            troup_all_visit: data.join("troup-allVisit.npz"),
            prior_samples: cache.join("prior-samples.npz"),
            experiment3: data.join("experiment3.npz"),
            cache,
            root,
        }
    }

    /// Directory holding the input and output containers.
    pub fn data(&self) -> PathBuf {
        self.root.join("data")
    }

    /// Create the cache, plot, figure and data directories if missing.
    pub fn create_dirs(&self) -> Result<()> {
        for dir in [&self.cache, &self.plots, &self.figures, &self.data()] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}
