//! Friedmann-equation evaluator: expansion rate, density fractions,
//! deceleration and characteristic redshifts.
//!
//! Two normalisations of the expansion rate coexist:
//!
//! * [`e_z`](CosmologicalModel::e_z) is `H(z)/H0`, with the full CPL
//!   dark-energy density;
//! * [`e2`](CosmologicalModel::e2) is `a⁴·E²(z)` for a constant `w = w0`
//!   (de Araujo 2005). It is the denominator of the density fractions and of
//!   the deceleration parameter, and must not be mixed with `e_z`.

use cosmo_core::{ensure, fail, Real, Redshift, Result};

use crate::model::CosmologicalModel;

impl CosmologicalModel {
    /// Dark-energy equation of state in the CPL parameterisation,
    /// `w(z) = w0 + wa·z/(1+z)`.
    pub fn w_cpl(&self, z: Redshift) -> Real {
        self.w0() + self.wa() * z / (1.0 + z)
    }

    /// Dark-energy density relative to today,
    /// `(1+z)^(3(1+w0+wa)) · exp(−3·wa·z/(1+z))`.
    pub fn f_de(&self, z: Redshift) -> Real {
        let (w0, wa) = (self.w0(), self.wa());
        (1.0 + z).powf(3.0 * (1.0 + w0 + wa)) * (-3.0 * wa * z / (1.0 + z)).exp()
    }

    /// Normalised expansion rate `E(z) = H(z)/H0`.
    pub fn e_z(&self, z: Redshift) -> Real {
        let zp1 = 1.0 + z;
        (self.omega_matter() * zp1.powi(3)
            + self.omega_de() * self.f_de(z)
            + self.omega_k() * zp1.powi(2)
            + self.omega_radiation() * zp1.powi(4))
        .sqrt()
    }

    /// Hubble parameter `H(z) = H0·E(z)` in km/s/Mpc (km/s/(Mpc/h) in
    /// native units).
    pub fn hubble(&self, z: Redshift) -> Real {
        self.h0() * self.e_z(z)
    }

    /// `a⁴·E²(z)` for constant `w = w0`, with `a = 1/(1+z)`.
    pub fn e2(&self, z: Redshift) -> Real {
        let a = 1.0 / (1.0 + z);
        self.omega_radiation()
            + self.omega_matter() * a
            + self.omega_k() * a * a
            + self.omega_de() * a.powf(1.0 - 3.0 * self.w0())
    }

    /// Matter density fraction Ω_m(z).
    pub fn omega_matter_z(&self, z: Redshift) -> Real {
        self.omega_matter() / self.e2(z) / (1.0 + z)
    }

    /// Dark-energy density fraction Ω_DE(z).
    ///
    /// # Errors
    /// `UnsupportedModel` if `wa ≠ 0`.
    pub fn omega_de_z(&self, z: Redshift) -> Result<Real> {
        self.require_constant_w("Omega_DE(z)")?;
        let a = 1.0 / (1.0 + z);
        Ok(self.omega_de() / self.e2(z) * a.powf(1.0 - 3.0 * self.w0()))
    }

    /// Radiation density fraction Ω_r(z).
    pub fn omega_radiation_z(&self, z: Redshift) -> Real {
        self.omega_radiation() / self.e2(z)
    }

    /// Curvature density fraction Ω_k(z).
    pub fn omega_k_z(&self, z: Redshift) -> Real {
        let a = 1.0 / (1.0 + z);
        self.omega_k() / self.e2(z) * a * a
    }

    /// Total density fraction (matter + radiation + dark energy).
    ///
    /// # Errors
    /// `UnsupportedModel` if `wa ≠ 0`.
    pub fn omega_total_z(&self, z: Redshift) -> Result<Real> {
        self.require_constant_w("Omega(z)")?;
        let a = 1.0 / (1.0 + z);
        Ok((self.omega_radiation()
            + self.omega_matter() * a
            + self.omega_de() * a.powf(1.0 - 3.0 * self.w0()))
            / self.e2(z))
    }

    /// Deceleration parameter q(z).
    ///
    /// # Errors
    /// `UnsupportedModel` if `wa ≠ 0`.
    pub fn deceleration(&self, z: Redshift) -> Result<Real> {
        self.require_constant_w("q(z)")?;
        let a = 1.0 / (1.0 + z);
        let w0 = self.w0();
        Ok((self.omega_matter() * a
            + 2.0 * self.omega_radiation()
            + (1.0 + 3.0 * w0) * self.omega_de() * a.powf(1.0 - 3.0 * w0))
            / (2.0 * self.e2(z)))
    }

    /// Time derivative of the Hubble parameter, `Ḣ = −H²(1+q)`.
    ///
    /// # Errors
    /// `UnsupportedModel` if `wa ≠ 0`, as for [`deceleration`](Self::deceleration).
    pub fn hubble_dot(&self, z: Redshift) -> Result<Real> {
        let q = self.deceleration(z)?;
        Ok(-self.hubble(z).powi(2) * (1.0 + q))
    }

    /// Redshift at which the expansion starts accelerating.
    ///
    /// # Errors
    /// `UnsupportedModel` if `wa ≠ 0`; `NumericalFailure` if the model never
    /// accelerates (the closed form is not a finite number).
    pub fn z_acceleration(&self) -> Result<Redshift> {
        self.require_constant_w("z_acc")?;
        let w0 = self.w0();
        let base = -(1.0 + 3.0 * w0) * self.omega_de() / self.omega_matter();
        let z_acc = base.powf(-1.0 / (3.0 * w0)) - 1.0;
        ensure!(
            z_acc.is_finite(),
            NumericalFailure,
            "acceleration redshift is not finite (w0 = {w0}, Omega_DE = {})",
            self.omega_de()
        );
        Ok(z_acc)
    }

    /// Redshift of matter–dark-energy equality.
    ///
    /// # Errors
    /// `UnsupportedModel` if `wa ≠ 0`.
    pub fn z_equality(&self) -> Result<Redshift> {
        self.require_constant_w("z_eq")?;
        Ok((self.omega_de() / self.omega_matter()).powf(-1.0 / (3.0 * self.w0())) - 1.0)
    }

    /// Growth suppression factor g(z) (Carroll, Press & Turner 1992).
    pub fn growth_suppression(&self, z: Redshift) -> Real {
        let om = self.omega_matter_z(z);
        2.5 * om / (om.powf(4.0 / 7.0) - (1.0 - om) + (1.0 + 0.5 * om) * (1.0 + (1.0 - om) / 70.0))
    }

    /// Linear growth factor normalised to 1 at z = 0.
    pub fn growth_factor(&self, z: Redshift) -> Real {
        self.growth_suppression(z) / self.growth_suppression(0.0) / (1.0 + z)
    }

    fn require_constant_w(&self, what: &str) -> Result<()> {
        if self.wa() != 0.0 {
            fail!(
                UnsupportedModel,
                "{what} is only available for a constant equation of state (wa = {})",
                self.wa()
            );
        }
        Ok(())
    }
}
