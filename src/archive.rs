//! Reading observations from, and writing stages to, npz containers.
//!
//! An npz file holds flat named arrays, so groups are expressed as path-like
//! names: the star `2M...` keeps its times in `2M.../mjd`, and stage 4 of the
//! output lives under `4/mjd`, `4/rv` and `4/rv_err`. Metadata that HDF5
//! would keep as attributes goes into a JSON sidecar next to the npz (see
//! [`Attributes`]).

use crate::error::{Error, Result};
use crate::record::{ObservationRecord, DEFAULT_TIME_SCALE, OUTPUT_TIME_SCALE, TIME_FORMAT};
use crate::stages::Stage;
use ndarray::Array1;
use ndarray_npy::{NpzReader, NpzWriter};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};

/// Path under which attributes of the container itself are stored.
pub const ROOT: &str = "/";

/// String attributes keyed by dataset path, then attribute name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, BTreeMap<String, String>>);
impl Attributes {
    /// Location of the sidecar belonging to the container at `npz_path`,
    /// e.g. `data/experiment3.attrs.json` for `data/experiment3.npz`.
    pub fn sidecar_path(npz_path: &Path) -> PathBuf {
        npz_path.with_extension("attrs.json")
    }

    /// Set attribute `key` of the dataset at `path`.
    pub fn set(&mut self, path: &str, key: &str, value: impl Into<String>) {
        self.0
            .entry(path.to_owned())
            .or_default()
            .insert(key.to_owned(), value.into());
    }

    /// Get attribute `key` of the dataset at `path`.
    pub fn get(&self, path: &str, key: &str) -> Option<&str> {
        self.0.get(path)?.get(key).map(String::as_str)
    }

    /// Get attribute `key` of the dataset at `path`, failing with
    /// [`Error::MissingAttribute`] if it is not set.
    pub fn require(&self, path: &str, key: &str) -> Result<&str> {
        self.get(path, key).ok_or_else(|| Error::MissingAttribute {
            path: path.to_owned(),
            key: key.to_owned(),
        })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Read a sidecar file. A missing file means no attributes.
    pub fn read_file(path: &Path) -> Result<Self> {
        match File::open(path) {
            Ok(file) => Self::from_reader(BufReader::new(file)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Write `record` as the group `group`: arrays `<group>/mjd`, `<group>/rv`
/// and `<group>/rv_err`, with the time format and `time_scale` on `mjd` and
/// the unit on both velocity arrays.
fn write_group<W: Write + Seek>(
    npz: &mut NpzWriter<W>,
    attrs: &mut Attributes,
    group: &str,
    record: &ObservationRecord,
    time_scale: &str,
) -> Result<()> {
    let mjd = format!("{}/mjd", group);
    npz.add_array(mjd.as_str(), record.mjd())?;
    attrs.set(&mjd, "format", TIME_FORMAT);
    attrs.set(&mjd, "scale", time_scale);

    for (name, array) in [("rv", record.rv()), ("rv_err", record.rv_err())] {
        let path = format!("{}/{}", group, name);
        npz.add_array(path.as_str(), array)?;
        attrs.set(&path, "unit", record.rv_unit());
    }
    Ok(())
}

/// Save one star's observations as an input container at `path` (plus its
/// attribute sidecar), in the layout [`NpzArchive`] reads.
pub fn save_star(path: &Path, star_id: &str, record: &ObservationRecord) -> Result<()> {
    let mut npz = NpzWriter::new(BufWriter::new(File::create(path)?));
    let mut attrs = Attributes::default();
    write_group(&mut npz, &mut attrs, star_id, record, record.time_scale())?;
    npz.finish()?.flush()?;
    attrs.write_file(&Attributes::sidecar_path(path))
}

/// Anything that can look up a star's observations.
pub trait ObservationSource {
    /// Fetch the full observation record of `star_id`. Fails with
    /// [`Error::StarNotFound`] if the source does not know the star.
    fn observations(&mut self, star_id: &str) -> Result<ObservationRecord>;
}
/// In-memory source, keyed by star id.
impl ObservationSource for HashMap<String, ObservationRecord> {
    fn observations(&mut self, star_id: &str) -> Result<ObservationRecord> {
        self.get(star_id)
            .cloned()
            .ok_or_else(|| Error::StarNotFound(star_id.to_owned()))
    }
}

/// Input container with one group per star.
pub struct NpzArchive<R: Read + Seek> {
    npz: NpzReader<R>,
    attrs: Attributes,
}
impl NpzArchive<BufReader<File>> {
    /// Open the container at `path` along with its attribute sidecar.
    pub fn open(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let attrs = Attributes::read_file(&Attributes::sidecar_path(path))?;
        Self::new(reader, attrs)
    }
}
impl<R: Read + Seek> NpzArchive<R> {
    pub fn new(reader: R, attrs: Attributes) -> Result<Self> {
        Ok(Self {
            npz: NpzReader::new(reader)?,
            attrs,
        })
    }

    // The stored name of an array, which may or may not carry `.npy`.
    fn entry_name(names: &[String], path: &str) -> Option<String> {
        names
            .iter()
            .find(|name| name.as_str() == path || name.strip_suffix(".npy") == Some(path))
            .cloned()
    }

    fn read_array(&mut self, names: &[String], path: &str) -> Result<Array1<f64>> {
        let name = Self::entry_name(names, path).ok_or_else(|| Error::MissingDataset(path.to_owned()))?;
        Ok(self.npz.by_name(&name)?)
    }
}
impl<R: Read + Seek> ObservationSource for NpzArchive<R> {
    fn observations(&mut self, star_id: &str) -> Result<ObservationRecord> {
        let names = self.npz.names()?;
        let group = format!("{}/", star_id);
        if !names.iter().any(|name| name.starts_with(&group)) {
            return Err(Error::StarNotFound(star_id.to_owned()));
        }

        let mjd_path = format!("{}/mjd", star_id);
        let rv_path = format!("{}/rv", star_id);

        let mjd = self.read_array(&names, &mjd_path)?;
        let rv = self.read_array(&names, &rv_path)?;
        let rv_err = self.read_array(&names, &format!("{}/rv_err", star_id))?;
        let rv_unit = self.attrs.require(&rv_path, "unit")?.to_owned();
        let time_scale = self
            .attrs
            .get(&mjd_path, "scale")
            .unwrap_or(DEFAULT_TIME_SCALE)
            .to_owned();

        Ok(ObservationRecord::new(mjd, rv, rv_err, rv_unit)?.with_time_scale(time_scale))
    }
}

/// Anything that can persist stages as they are produced.
pub trait StageSink {
    fn write_stage(&mut self, stage: &Stage) -> Result<()>;
}
/// In-memory sink collecting every stage.
impl StageSink for Vec<Stage> {
    fn write_stage(&mut self, stage: &Stage) -> Result<()> {
        self.push(stage.clone());
        Ok(())
    }
}

/// Output container with one group per stage, named by its schedule index.
///
/// Stage times are always tagged with [`OUTPUT_TIME_SCALE`], whatever scale
/// the input carried.
pub struct NpzStageSink<W: Write + Seek> {
    npz: NpzWriter<W>,
    attrs: Attributes,
    sidecar: Option<PathBuf>,
}
impl NpzStageSink<BufWriter<File>> {
    /// Create (or truncate) the container at `path`. The attribute sidecar
    /// is written next to it by [`NpzStageSink::finish()`].
    pub fn create(path: &Path, star_id: &str) -> Result<Self> {
        let writer = BufWriter::new(File::create(path)?);
        let mut sink = Self::new(writer, star_id);
        sink.sidecar = Some(Attributes::sidecar_path(path));
        Ok(sink)
    }
}
impl<W: Write + Seek> NpzStageSink<W> {
    /// Sink writing to `writer`, recording `star_id` as the source star.
    /// Attributes are only returned from [`NpzStageSink::finish()`].
    pub fn new(writer: W, star_id: &str) -> Self {
        let mut attrs = Attributes::default();
        attrs.set(ROOT, "APOGEE_ID", star_id);
        Self {
            npz: NpzWriter::new(writer),
            attrs,
            sidecar: None,
        }
    }

    /// Close the container, write the sidecar if the sink was created from a
    /// path, and hand back the writer and the attributes.
    pub fn finish(self) -> Result<(W, Attributes)> {
        let mut writer = self.npz.finish()?;
        writer.flush()?;
        if let Some(sidecar) = &self.sidecar {
            self.attrs.write_file(sidecar)?;
        }
        Ok((writer, self.attrs))
    }
}
impl<W: Write + Seek> StageSink for NpzStageSink<W> {
    fn write_stage(&mut self, stage: &Stage) -> Result<()> {
        write_group(
            &mut self.npz,
            &mut self.attrs,
            &stage.group_name(),
            stage.record(),
            OUTPUT_TIME_SCALE,
        )
    }
}
