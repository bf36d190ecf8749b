//! Tabulated comoving distances.
//!
//! A table is a two-column, whitespace-separated text file of
//! `(redshift, comoving distance)` samples with increasing redshift. Tables
//! shipped for the named coupled-dark-energy models store the distance in
//! units of the Hubble distance; tables generated by
//! [`CosmologicalModel::comoving_distance_table`] store it in the model's
//! own units. Lookups take the scale factor explicitly.
//!
//! [`CosmologicalModel::comoving_distance_table`]:
//!     crate::CosmologicalModel::comoving_distance_table

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use cosmo_core::{ensure, Distance, Error, Real, Redshift, Result};
use cosmo_math::{interpolate, InterpolationKind};
use tracing::debug;

/// Nodes used by the rational interpolation of a table.
const INTERPOLATION_ORDER: usize = 4;

/// Largest accepted ratio of the interpolation error estimate to the value.
const MAX_RELATIVE_ERROR: Real = 0.1;

/// Ordered `(redshift, comoving distance)` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct TabulatedDistanceTable {
    redshifts: Vec<Redshift>,
    distances: Vec<Distance>,
}

impl TabulatedDistanceTable {
    /// Build a table from samples.
    ///
    /// # Errors
    /// `InvalidArgument` if the columns differ in length, hold fewer than two
    /// samples, or the redshifts are not strictly increasing.
    pub fn new(redshifts: Vec<Redshift>, distances: Vec<Distance>) -> Result<Self> {
        ensure!(
            redshifts.len() == distances.len(),
            InvalidArgument,
            "table columns differ in length ({} vs {})",
            redshifts.len(),
            distances.len()
        );
        ensure!(redshifts.len() >= 2, InvalidArgument, "a distance table needs at least 2 samples");
        ensure!(
            redshifts.windows(2).all(|w| w[0] < w[1]),
            InvalidArgument,
            "table redshifts must be strictly increasing"
        );
        Ok(Self { redshifts, distances })
    }

    /// Read a table file.
    ///
    /// # Errors
    /// `IoFailure` if the file cannot be opened or a line does not hold two
    /// numbers; `InvalidArgument` if the samples do not form a valid table.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let mut redshifts = Vec::new();
        let mut distances = Vec::new();

        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| Error::io(path, e))?;
            let mut fields = line.split_whitespace();
            let Some(first) = fields.next() else {
                continue;
            };
            let parsed = fields.next().and_then(|second| {
                Some((first.parse::<Real>().ok()?, second.parse::<Real>().ok()?))
            });
            let Some((z, d)) = parsed else {
                return Err(Error::IoFailure {
                    path: path.to_path_buf(),
                    message: format!(
                        "line {}: expected `redshift distance`, got `{line}`",
                        index + 1
                    ),
                });
            };
            redshifts.push(z);
            distances.push(d);
        }
        debug!(path = %path.display(), samples = redshifts.len(), "read distance table");
        Self::new(redshifts, distances)
    }

    /// Write the table to `path`.
    ///
    /// The samples go to a sibling temporary file which is then renamed over
    /// `path`, so readers never see a half-written table.
    ///
    /// # Errors
    /// `IoFailure` if the directory cannot be created or the file written.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }
        let tmp = temporary_sibling(path);
        let file = File::create(&tmp).map_err(|e| Error::io(&tmp, e))?;
        let mut out = BufWriter::new(file);
        for (z, d) in self.redshifts.iter().zip(&self.distances) {
            writeln!(out, "{z:e}   {d:e}").map_err(|e| Error::io(&tmp, e))?;
        }
        out.flush().map_err(|e| Error::io(&tmp, e))?;
        drop(out);
        fs::rename(&tmp, path).map_err(|e| Error::io(path, e))
    }

    /// Sample redshifts.
    pub fn redshifts(&self) -> &[Redshift] {
        &self.redshifts
    }

    /// Sample distances, in the table's own units.
    pub fn distances(&self) -> &[Distance] {
        &self.distances
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.redshifts.len()
    }

    /// `true` if the table holds no samples (never the case for a table
    /// built through [`new`](Self::new) or [`read`](Self::read)).
    pub fn is_empty(&self) -> bool {
        self.redshifts.is_empty()
    }

    /// Comoving distance at `z`, the stored distances multiplied by `scale`.
    ///
    /// # Errors
    /// `NumericalFailure` if the interpolation error exceeds 10% of the
    /// value.
    pub fn comoving_distance_at(&self, z: Redshift, scale: Real) -> Result<Distance> {
        Ok(checked_rational(z, &self.redshifts, &self.distances, "comoving distance")? * scale)
    }

    /// Redshift at which the (scaled) comoving distance equals `d_c`.
    ///
    /// # Errors
    /// `InvalidArgument` if the distances are not strictly increasing;
    /// `NumericalFailure` if the interpolation error exceeds 10% of the
    /// value.
    pub fn redshift_at(&self, d_c: Distance, scale: Real) -> Result<Redshift> {
        checked_rational(d_c / scale, &self.distances, &self.redshifts, "redshift")
    }
}

fn checked_rational(x: Real, xs: &[Real], ys: &[Real], what: &str) -> Result<Real> {
    let r = interpolate(x, xs, ys, InterpolationKind::Rational, INTERPOLATION_ORDER)?;
    ensure!(
        r.value.is_finite() && r.error.abs() <= MAX_RELATIVE_ERROR * r.value.abs(),
        NumericalFailure,
        "tabulated {what} at {x} is unreliable (value {}, error estimate {})",
        r.value,
        r.error
    );
    Ok(r.value)
}

fn temporary_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
