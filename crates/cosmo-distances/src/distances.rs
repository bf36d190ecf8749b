//! Distance façade: dispatch of the comoving distance by model tag, and
//! the distances derived from it.

use std::fmt;
use std::str::FromStr;

use cosmo_core::{constants::SPEED_OF_LIGHT, ensure, Distance, Error, Real, Redshift, Result};
use tracing::info;

use crate::model::{CosmologicalModel, DistanceUnits, ModelKind};
use crate::table::TabulatedDistanceTable;

/// Curvature below which a model is treated as flat.
pub(crate) const FLAT_TOLERANCE: Real = 1e-10;

/// Distance measures selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceKind {
    /// Line-of-sight comoving distance, `"DC"`.
    Comoving,
    /// Luminosity distance, `"DL"`.
    Luminosity,
    /// Angular-diameter distance, `"DA"`.
    AngularDiameter,
    /// Volume-averaged distance, `"Dv"`.
    Volume,
    /// `D_V / r_s`, `"Dvrs"`.
    VolumeOverSoundHorizon,
    /// `r_s / D_V`, `"rsDv"`.
    SoundHorizonOverVolume,
}

impl DistanceKind {
    /// Every kind, in declaration order.
    pub const ALL: [DistanceKind; 6] = [
        DistanceKind::Comoving,
        DistanceKind::Luminosity,
        DistanceKind::AngularDiameter,
        DistanceKind::Volume,
        DistanceKind::VolumeOverSoundHorizon,
        DistanceKind::SoundHorizonOverVolume,
    ];

    /// Short name, e.g. `"DL"`.
    pub fn name(self) -> &'static str {
        match self {
            DistanceKind::Comoving => "DC",
            DistanceKind::Luminosity => "DL",
            DistanceKind::AngularDiameter => "DA",
            DistanceKind::Volume => "Dv",
            DistanceKind::VolumeOverSoundHorizon => "Dvrs",
            DistanceKind::SoundHorizonOverVolume => "rsDv",
        }
    }
}

impl fmt::Display for DistanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistanceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DistanceKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| Error::UnsupportedModel(format!("no such distance type `{s}`")))
    }
}

impl CosmologicalModel {
    /// Line-of-sight comoving distance `D_C(z)`.
    ///
    /// Friedmann models integrate `1/E(z)`; tabulated models interpolate
    /// their table (4-point rational interpolation, scaled by `D_H`).
    ///
    /// # Errors
    /// `InvalidArgument` if `z < 0`; `IoFailure` if the table of a
    /// tabulated model cannot be read; `NumericalFailure` if the integral
    /// does not converge or the table lookup is unreliable.
    pub fn comoving_distance(&self, z: Redshift) -> Result<Distance> {
        ensure!(z >= 0.0, InvalidArgument, "redshift must be >= 0, got {z}");
        match self.model() {
            ModelKind::Lcdm => self.comoving_distance_quadrature(z),
            ModelKind::Tabulated(t) => self
                .tabulated_table(t)?
                .comoving_distance_at(z, self.hubble_distance()),
        }
    }

    /// Transverse comoving distance `D_M(z)`.
    pub fn transverse_comoving_distance(&self, z: Redshift) -> Result<Distance> {
        let d_c = self.comoving_distance(z)?;
        let d_h = self.hubble_distance();
        let ok = self.omega_k();
        Ok(if ok > FLAT_TOLERANCE {
            d_h / ok.sqrt() * (ok.sqrt() * d_c / d_h).sinh()
        } else if ok.abs() < FLAT_TOLERANCE {
            d_c
        } else {
            d_h / (-ok).sqrt() * ((-ok).sqrt() * d_c / d_h).sin()
        })
    }

    /// Angular-diameter distance `D_A = D_M/(1+z)`.
    pub fn angular_diameter_distance(&self, z: Redshift) -> Result<Distance> {
        Ok(self.transverse_comoving_distance(z)? / (1.0 + z))
    }

    /// Luminosity distance `D_L = (1+z)·D_M`.
    pub fn luminosity_distance(&self, z: Redshift) -> Result<Distance> {
        Ok((1.0 + z) * self.transverse_comoving_distance(z)?)
    }

    /// Volume-averaged distance `D_V = (D_M²·c·z/H(z))^(1/3)`.
    pub fn volume_averaged_distance(&self, z: Redshift) -> Result<Distance> {
        let d_m = self.transverse_comoving_distance(z)?;
        Ok((d_m * d_m * SPEED_OF_LIGHT * z / self.hubble(z)).cbrt())
    }

    /// Distance of the given kind at `z`.
    pub fn distance(&self, z: Redshift, kind: DistanceKind) -> Result<Real> {
        match kind {
            DistanceKind::Comoving => self.comoving_distance(z),
            DistanceKind::Luminosity => self.luminosity_distance(z),
            DistanceKind::AngularDiameter => self.angular_diameter_distance(z),
            DistanceKind::Volume => self.volume_averaged_distance(z),
            DistanceKind::VolumeOverSoundHorizon => {
                Ok(self.volume_averaged_distance(z)? / self.sound_horizon())
            }
            DistanceKind::SoundHorizonOverVolume => {
                Ok(self.sound_horizon() / self.volume_averaged_distance(z)?)
            }
        }
    }

    /// Sound horizon at the drag epoch, from the fit of Anderson et al.
    /// (2014): `55.154·exp(−72.3(ω_ν+0.0006)²) / (ω_cb^0.25351·ω_b^0.12807)`
    /// Mpc, in Mpc/h for native units.
    pub fn sound_horizon(&self) -> Distance {
        let h2 = self.hh() * self.hh();
        let omega_b = self.omega_baryon() * h2;
        let omega_nu = self.omega_neutrinos() * h2;
        let omega_cb = (self.omega_matter() - self.omega_neutrinos()) * h2;
        let r_s = 55.154 * (-72.3 * (omega_nu + 0.0006).powi(2)).exp()
            / (omega_cb.powf(0.25351) * omega_b.powf(0.12807));
        match self.units() {
            DistanceUnits::MpcOverH => r_s * self.hh(),
            DistanceUnits::Mpc => r_s,
        }
    }

    /// Comoving distances of this model on `steps` redshift bins spanning
    /// `[z_min, z_max]`, sampled at the bin centres.
    ///
    /// The table lives in the table store under `file_name`. It is computed
    /// and written on the first call, and read back on later ones, so a
    /// stale file is returned as is.
    ///
    /// # Errors
    /// `InvalidArgument` for an empty range or fewer than 2 bins;
    /// `IoFailure` if the file cannot be read or written.
    pub fn comoving_distance_table(
        &self,
        file_name: &str,
        z_min: Redshift,
        z_max: Redshift,
        steps: usize,
    ) -> Result<TabulatedDistanceTable> {
        ensure!(
            z_min >= 0.0 && z_max > z_min,
            InvalidArgument,
            "invalid redshift range [{z_min}, {z_max}]"
        );
        ensure!(steps >= 2, InvalidArgument, "need at least 2 redshift bins, got {steps}");

        let path = self.config().comoving_table_path(file_name);
        if path.exists() {
            return TabulatedDistanceTable::read(&path);
        }

        let width = (z_max - z_min) / steps as Real;
        let redshifts: Vec<Redshift> =
            (0..steps).map(|i| z_min + (i as Real + 0.5) * width).collect();
        let distances = redshifts
            .iter()
            .map(|&z| self.comoving_distance(z))
            .collect::<Result<Vec<Distance>>>()?;
        let table = TabulatedDistanceTable::new(redshifts, distances)?;
        table.write(&path)?;
        info!(path = %path.display(), bins = steps, "wrote comoving distance table");
        Ok(table)
    }
}
