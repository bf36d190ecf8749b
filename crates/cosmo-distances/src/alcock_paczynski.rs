//! Alcock-Paczynski conversions between two cosmologies.
//!
//! Separations measured assuming one cosmology map onto another through the
//! ratios of their distances (transverse direction) and expansion rates
//! (line of sight) at the redshift of the sample.

use cosmo_core::{ensure, Real, Redshift, Result};
use cosmo_math::{interpolate, interpolate_2d, InterpolationKind};

use crate::model::CosmologicalModel;

/// Nodes used by the correlation-function interpolations.
const XI_INTERPOLATION_ORDER: usize = 4;

/// Which way a correlation function is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionDirection {
    /// From the second cosmology's separations to the first's.
    SecondToFirst,
    /// From the first cosmology's separations to the second's.
    FirstToSecond,
}

/// Isotropic shift `D_V,2(z) / D_V,1(z)`.
pub fn ap_shift_r(
    z: Redshift,
    first: &CosmologicalModel,
    second: &CosmologicalModel,
) -> Result<Real> {
    Ok(second.volume_averaged_distance(z)? / first.volume_averaged_distance(z)?)
}

/// Transverse shift `D_A,1(z) / D_A,2(z)`.
pub fn ap_shift_rp(
    z: Redshift,
    first: &CosmologicalModel,
    second: &CosmologicalModel,
) -> Result<Real> {
    Ok(first.angular_diameter_distance(z)? / second.angular_diameter_distance(z)?)
}

/// Line-of-sight shift `H_2(z) / H_1(z)`.
pub fn ap_shift_pi(z: Redshift, first: &CosmologicalModel, second: &CosmologicalModel) -> Real {
    second.hubble(z) / first.hubble(z)
}

/// Largest separations reached when a box of size `(rp_max, pi_max)` is
/// mapped into each of several test cosmologies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxSeparations {
    /// Largest transverse separation.
    pub rp: Real,
    /// Largest line-of-sight separation.
    pub pi: Real,
    /// `√(rp² + pi²)`.
    pub r: Real,
}

/// Largest transverse, line-of-sight and total separations over the test
/// cosmologies `others`, starting from `(rp_max, pi_max)` in `reference`.
///
/// # Errors
/// `InvalidArgument` if `others` is empty.
pub fn max_separations_ap(
    rp_max: Real,
    pi_max: Real,
    z: Redshift,
    reference: &CosmologicalModel,
    others: &[CosmologicalModel],
) -> Result<MaxSeparations> {
    ensure!(!others.is_empty(), InvalidArgument, "need at least one test cosmology");
    let mut rp = Real::NEG_INFINITY;
    let mut pi = Real::NEG_INFINITY;
    for other in others {
        rp = rp.max(rp_max * ap_shift_rp(z, reference, other)?);
        pi = pi.max(pi_max * ap_shift_pi(z, reference, other));
    }
    Ok(MaxSeparations { rp, pi, r: rp.hypot(pi) })
}

/// Isotropic correlation function `ξ(r)`, tabulated at `rr` in one
/// cosmology, evaluated at separation `r` in the other.
///
/// The table is interpolated in `log ξ` against `log r` (4-point
/// polynomial); non-positive samples are skipped.
///
/// # Errors
/// `InvalidArgument` if `r <= 0` or fewer than two positive samples remain.
pub fn converted_xi(
    r: Real,
    z: Redshift,
    rr: &[Real],
    xi: &[Real],
    first: &CosmologicalModel,
    second: &CosmologicalModel,
    direction: ConversionDirection,
) -> Result<Real> {
    ensure!(r > 0.0, InvalidArgument, "separation must be > 0, got {r}");
    ensure!(
        rr.len() == xi.len(),
        InvalidArgument,
        "separations and correlation values differ in length ({} vs {})",
        rr.len(),
        xi.len()
    );
    let gamma = ap_shift_r(z, first, second)?;
    let lg_r = match direction {
        ConversionDirection::FirstToSecond => (r / gamma).log10(),
        ConversionDirection::SecondToFirst => (r * gamma).log10(),
    };
    let (lg_rr, lg_xi): (Vec<Real>, Vec<Real>) = rr
        .iter()
        .zip(xi)
        .filter(|&(&s, &x)| s > 0.0 && x > 0.0)
        .map(|(s, x)| (s.log10(), x.log10()))
        .unzip();
    let lg = interpolate(
        lg_r,
        &lg_rr,
        &lg_xi,
        InterpolationKind::Polynomial,
        XI_INTERPOLATION_ORDER,
    )?;
    Ok(10.0_f64.powf(lg.value))
}

/// Anisotropic correlation function `ξ(r_p, π)`, tabulated on the grid
/// `rps × pis` in one cosmology, evaluated at `(rp, pi)` in the other.
///
/// `xi[i][j]` is the value at `(rps[i], pis[j])`.
#[allow(clippy::too_many_arguments)]
pub fn converted_xi_2d(
    rp: Real,
    pi: Real,
    z: Redshift,
    rps: &[Real],
    pis: &[Real],
    xi: &[Vec<Real>],
    first: &CosmologicalModel,
    second: &CosmologicalModel,
    direction: ConversionDirection,
) -> Result<Real> {
    let f_da = ap_shift_rp(z, first, second)?;
    let f_h = ap_shift_pi(z, first, second);
    let (rp, pi) = match direction {
        ConversionDirection::FirstToSecond => (rp * f_da, pi * f_h),
        ConversionDirection::SecondToFirst => (rp / f_da, pi / f_h),
    };
    Ok(interpolate_2d(rp, pi, rps, pis, xi, XI_INTERPOLATION_ORDER)?.value)
}
