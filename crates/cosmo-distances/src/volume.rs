//! Comoving volumes and quantities derived from distances: volume-limited
//! magnitude limits, bolometric luminosities, densities and collapse
//! thresholds.

use std::f64::consts::PI;

use cosmo_core::{
    constants::{CRITICAL_DENSITY_H1, DELTA_C_EDS, SQ_DEG_PER_STERADIAN},
    ensure, Real, Redshift, Result,
};

use crate::distances::FLAT_TOLERANCE;
use crate::inverter::fallible_brent;
use crate::model::{CosmologicalModel, DistanceUnits};

/// Upper end of the redshift search in [`CosmologicalModel::max_redshift`].
const MAX_REDSHIFT_SEARCH: Redshift = 10.0;

/// Unit of solid angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolidAngle {
    /// Steradians.
    #[default]
    Steradian,
    /// Square degrees.
    SquareDegree,
}

impl CosmologicalModel {
    /// Comoving volume between `z1` and `z2` over a survey of `area` square
    /// degrees.
    pub fn comoving_volume_shell(&self, z1: Redshift, z2: Redshift, area: Real) -> Result<Real> {
        let d1 = self.comoving_distance(z1)?;
        let d2 = self.comoving_distance(z2)?;
        let steradians = area / SQ_DEG_PER_STERADIAN;
        Ok(4.0 / 3.0 * PI * (d1.powi(3) - d2.powi(3)).abs() * steradians / (4.0 * PI))
    }

    /// Full-sky comoving volume out to `z` (Hogg 2000, eq. 29).
    pub fn comoving_volume(&self, z: Redshift) -> Result<Real> {
        let d_m = self.transverse_comoving_distance(z)?;
        let d_h = self.hubble_distance();
        let ok = self.omega_k();
        if ok.abs() < FLAT_TOLERANCE {
            return Ok(4.0 * PI * d_m.powi(3) / 3.0);
        }
        let x = d_m / d_h;
        let root = ok.abs().sqrt();
        let angle = if ok > 0.0 { (root * x).asinh() } else { (root * x).asin() };
        Ok(4.0 * PI * d_h.powi(3) / (2.0 * ok) * (x * (1.0 + ok * x * x).sqrt() - angle / root))
    }

    /// Redshift `z > z_min` such that the shell `[z_min, z]` over `area`
    /// square degrees has comoving volume `volume`. The search is limited
    /// to `z ≤ 10`.
    ///
    /// # Errors
    /// `InvalidArgument` if the volume is not reached before `z = 10`.
    pub fn max_redshift(&self, volume: Real, area: Real, z_min: Redshift) -> Result<Redshift> {
        fallible_brent(
            |z| Ok(self.comoving_volume_shell(z_min, z, area)? - volume),
            z_min,
            MAX_REDSHIFT_SEARCH,
            1e-9,
        )
    }

    /// Comoving volume element `dV/dz/dΩ = D_H (1+z)² D_A² / E(z)`.
    pub fn dv_dz_domega(&self, z: Redshift, unit: SolidAngle) -> Result<Real> {
        let d_a = self.angular_diameter_distance(z)?;
        let per_steradian = self.hubble_distance() * ((1.0 + z) * d_a).powi(2) / self.e_z(z);
        Ok(match unit {
            SolidAngle::Steradian => per_steradian,
            SolidAngle::SquareDegree => per_steradian / SQ_DEG_PER_STERADIAN,
        })
    }

    /// Mean density of `omega_matter − omega_neutrinos`, in `M_sun/Mpc³`.
    ///
    /// With `h_units` set and native model units the factor `h²` is
    /// dropped, giving `M_sun h²/Mpc³`.
    pub fn critical_density(
        &self,
        omega_matter: Real,
        omega_neutrinos: Real,
        h_units: bool,
    ) -> Real {
        let factor = if h_units && self.units() == DistanceUnits::MpcOverH {
            1.0
        } else {
            self.hh() * self.hh()
        };
        CRITICAL_DENSITY_H1 * (omega_matter - omega_neutrinos) * factor
    }

    /// Mean density of cold matter today, in `M_sun/Mpc³`.
    pub fn matter_density(&self) -> Real {
        self.critical_density(self.omega_matter(), self.omega_neutrinos(), false)
    }

    /// An overdensity relative to the critical density expressed relative
    /// to the mean matter density at `z`.
    pub fn delta_virial(&self, delta_crit: Real, z: Redshift) -> Real {
        delta_crit / self.omega_matter_z(z)
    }

    /// Linear collapse threshold `δ_c(z)` (Kitayama & Suto 1996).
    pub fn delta_c(&self, z: Redshift) -> Real {
        DELTA_C_EDS * (1.0 + 0.012299 * self.omega_matter_z(z).log10())
    }

    /// Absolute magnitude limit of a volume-limited sample cut at `z_max`
    /// from a survey with apparent magnitude limit `mag_lim`.
    ///
    /// # Errors
    /// `InvalidArgument` unless `z_max > 0`.
    pub fn magnitude_volume_limited(&self, z_max: Redshift, mag_lim: Real) -> Result<Real> {
        ensure!(z_max > 0.0, InvalidArgument, "volume limit needs z_max > 0, got {z_max}");
        Ok(mag_lim - 5.0 * self.luminosity_distance(z_max)?.log10() - 25.0)
    }

    /// Bolometric luminosity `4π·flux·D_L²` of a source at `z`.
    pub fn bolometric_luminosity(&self, z: Redshift, flux: Real) -> Result<Real> {
        let d_l = self.luminosity_distance(z)?;
        Ok(4.0 * PI * flux * d_l * d_l)
    }
}
