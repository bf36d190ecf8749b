//! Comoving distance, lookback time and cosmic time by numerical
//! quadrature of the Friedmann equation.
//!
//! These work for every Friedmann model (curved, CPL dark energy,
//! radiation); the elliptic fast path in [`crate::elliptic`] only covers flat
//! ΛCDM.

use cosmo_core::{
    constants::{GYR_IN_S, MPC_IN_KM},
    ensure, Distance, Real, Redshift, Result, Time,
};
use cosmo_math::{Integrator, MidpointRombergIntegral, RombergIntegral};

use crate::model::CosmologicalModel;

impl CosmologicalModel {
    /// Comoving distance `D_H · ∫₀^z dz'/E(z')`.
    ///
    /// # Errors
    /// `InvalidArgument` if `z < 0`; `NumericalFailure` if the integral
    /// does not converge.
    pub fn comoving_distance_quadrature(&self, z: Redshift) -> Result<Distance> {
        ensure!(z >= 0.0, InvalidArgument, "redshift must be >= 0, got {z}");
        let integral = RombergIntegral::default().integrate(|x| 1.0 / self.e_z(x), 0.0, z)?;
        Ok(self.hubble_distance() * integral)
    }

    /// Lookback time to redshift `z` in Gyr.
    ///
    /// Always expressed in physical time: the Hubble constant used is
    /// `100·h` whatever the unit convention.
    pub fn lookback_time(&self, z: Redshift) -> Result<Time> {
        ensure!(z >= 0.0, InvalidArgument, "redshift must be >= 0, got {z}");
        let integral =
            RombergIntegral::default().integrate(|x| 1.0 / ((1.0 + x) * self.e_z(x)), 0.0, z)?;
        Ok(self.physical_hubble_time_gyr() * integral)
    }

    /// Age of the universe at redshift `z` in Gyr.
    ///
    /// Integrates `da/(a·E(a))` over the scale factor on the open interval
    /// `(0, 1/(1+z))`, so the Big-Bang singularity is never evaluated. The
    /// integrand behaves like `√a` near the origin; substituting `a = u²`
    /// makes it polynomial there, which Romberg extrapolation needs.
    pub fn cosmic_time(&self, z: Redshift) -> Result<Time> {
        ensure!(z >= 0.0, InvalidArgument, "redshift must be >= 0, got {z}");
        let u_max = (1.0 / (1.0 + z)).sqrt();
        let integral = MidpointRombergIntegral::default()
            .integrate(|u| 2.0 / (u * self.e_z(1.0 / (u * u) - 1.0)), 0.0, u_max)?;
        Ok(self.physical_hubble_time_gyr() * integral)
    }

    /// `1/(100·h km/s/Mpc)` in Gyr.
    fn physical_hubble_time_gyr(&self) -> Real {
        MPC_IN_KM / (100.0 * self.hh()) / GYR_IN_S
    }
}
