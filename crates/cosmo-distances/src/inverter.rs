//! Inverse relations: comoving distance → redshift and cosmic time →
//! redshift.

use std::cell::RefCell;

use cosmo_core::{ensure, fail, Distance, Error, Real, Redshift, Result, Time};
use cosmo_math::brent;
use tracing::{debug, warn};

use crate::model::{CosmologicalModel, ModelKind};

/// Tolerances below this are raised to it.
pub const MIN_PRECISION: Real = 1e-5;

/// Iteration budget of the bracket-narrowing inversion.
const MAX_ITERATIONS: usize = 100;

/// Absolute tolerance on the redshift returned by
/// [`CosmologicalModel::redshift_from_time`].
const TIME_INVERSION_ACCURACY: Real = 1e-4;

/// Strategy computing the comoving distance of a ΛCDM model, as used
/// by [`CosmologicalModel::redshift_lcdm`].
pub trait ComovingDistanceEvaluator {
    /// Comoving distance of `model` at `z`.
    fn comoving_distance(&self, model: &CosmologicalModel, z: Redshift) -> Result<Distance>;
}

/// Romberg quadrature of `1/E(z)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuadratureEvaluator;

impl ComovingDistanceEvaluator for QuadratureEvaluator {
    fn comoving_distance(&self, model: &CosmologicalModel, z: Redshift) -> Result<Distance> {
        model.comoving_distance_quadrature(z)
    }
}

/// Closed-form elliptic-integral evaluation (flat ΛCDM only).
#[derive(Debug, Clone, Copy, Default)]
pub struct EllipticEvaluator;

impl ComovingDistanceEvaluator for EllipticEvaluator {
    fn comoving_distance(&self, model: &CosmologicalModel, z: Redshift) -> Result<Distance> {
        model.comoving_distance_elliptic(z)
    }
}

fn clamp_precision(prec: Real) -> Real {
    if prec < MIN_PRECISION {
        warn!(requested = prec, used = MIN_PRECISION, "redshift precision raised to the floor");
        MIN_PRECISION
    } else {
        prec
    }
}

/// Brent's method on a fallible function; the first error raised by `g`
/// aborts the search and is returned as is.
pub(crate) fn fallible_brent<G>(g: G, lo: Real, hi: Real, accuracy: Real) -> Result<Real>
where
    G: Fn(Real) -> Result<Real>,
{
    let failure: RefCell<Option<Error>> = RefCell::new(None);
    let root = brent(
        |x| match g(x) {
            Ok(v) => v,
            Err(e) => {
                failure.borrow_mut().get_or_insert(e);
                Real::NAN
            }
        },
        lo,
        hi,
        accuracy,
    );
    match failure.into_inner() {
        Some(e) => Err(e),
        None => root,
    }
}

impl CosmologicalModel {
    /// Redshift at which the comoving distance equals `d_c`, for ΛCDM.
    ///
    /// The bracket `[z_lo, z_hi]` is first tightened with bounds that hold
    /// for any ΛCDM model, then both ends are moved towards the root: the
    /// upper one by secant steps, the lower one by `dz = E(z)·dd` steps.
    /// Since `D_C` is increasing and concave both steps keep the root
    /// bracketed, and the loop stops when the bracket is narrower than
    /// `2·prec`. The distance is computed by `evaluator`.
    ///
    /// # Errors
    /// `UnsupportedModel` for tabulated models (and, with
    /// [`EllipticEvaluator`], for non-flat ones); `InvalidArgument` for a
    /// negative distance; `NumericalFailure` if the bracket does not
    /// shrink within 100 iterations or `d_c` lies beyond the distance to
    /// infinite redshift.
    pub fn redshift_lcdm(
        &self,
        d_c: Distance,
        z_lo: Redshift,
        z_hi: Redshift,
        evaluator: &dyn ComovingDistanceEvaluator,
        prec: Real,
    ) -> Result<Redshift> {
        if self.model() != ModelKind::Lcdm {
            fail!(
                UnsupportedModel,
                "bracket-narrowing inversion needs an LCDM model, got {}",
                self.model()
            );
        }
        ensure!(d_c >= 0.0, InvalidArgument, "comoving distance must be >= 0, got {d_c}");
        let prec = clamp_precision(prec);

        // Work in units of the Hubble distance.
        let d_h = self.hubble_distance();
        let d = d_c / d_h;
        let dist =
            |z: Redshift| -> Result<Real> { Ok(evaluator.comoving_distance(self, z)? / d_h) };

        let mut z0 = z_lo.max(d).max(4.0 / (self.omega_matter().sqrt() * d - 2.0).powi(2) - 1.0);
        let mut z1 = if d < 2.0 { z_hi.min(4.0 / (d - 2.0).powi(2) - 1.0) } else { z_hi };
        z1 = z1.max(z0);

        let mut d0 = dist(z0)?;
        if d0 > d {
            z0 = d / d0 * z0 / self.e_z(z0);
            d0 = dist(z0)?;
        }
        let mut d1 = dist(z1)?;
        if d1 < d {
            z1 = self.e_z(z1) * d / d1 * z1;
            d1 = dist(z1)?;
        }

        let mut iterations = 0;
        while z1 - z0 > 2.0 * prec && d1 - d0 > 0.0 {
            if iterations == MAX_ITERATIONS {
                fail!(
                    NumericalFailure,
                    "redshift of D_C = {d_c} not bracketed to {prec} \
                     after {MAX_ITERATIONS} iterations ([{z0}, {z1}])"
                );
            }
            let secant = z0 + (d - d0) * (z1 - z0) / (d1 - d0);
            z0 += self.e_z(z0) * (d - d0);
            z1 = secant;
            d0 = dist(z0)?;
            d1 = dist(z1)?;
            iterations += 1;
        }
        // A distance beyond D_C(z → ∞) stalls both ends on the asymptote.
        ensure!(
            d0 <= d + prec && d <= d1 + prec && z0.is_finite() && z1.is_finite(),
            NumericalFailure,
            "D_C = {d_c} is not reached: search stalled at [{z0}, {z1}] \
             with D_C / D_H in [{d0}, {d1}]"
        );
        debug!(distance = d_c, iterations, "inverted comoving distance");
        Ok(0.5 * (z0 + z1))
    }

    /// Redshift at which the comoving distance equals `d_c`.
    ///
    /// ΛCDM models search `[z_lo, z_hi]` with Brent's method to `prec`.
    /// Tabulated models interpolate their table inversely; `prec` is then
    /// unused and a warning says so.
    ///
    /// # Errors
    /// `InvalidArgument` if `[z_lo, z_hi]` does not bracket the root;
    /// `IoFailure` if a table cannot be read; `NumericalFailure` if the
    /// search fails or the table lookup is unreliable.
    pub fn redshift(
        &self,
        d_c: Distance,
        z_lo: Redshift,
        z_hi: Redshift,
        prec: Real,
    ) -> Result<Redshift> {
        let prec = clamp_precision(prec);
        match self.model() {
            ModelKind::Lcdm => {
                ensure!(
                    z_lo >= 0.0,
                    InvalidArgument,
                    "redshift bracket must start at >= 0, got {z_lo}"
                );
                fallible_brent(|z| Ok(self.comoving_distance(z)? - d_c), z_lo, z_hi, prec)
            }
            ModelKind::Tabulated(t) => {
                warn!(model = %self.model(), "tabulated inversion ignores the requested precision");
                self.tabulated_table(t)?.redshift_at(d_c, self.hubble_distance())
            }
        }
    }

    /// Redshift at which the age of the universe equals `t` (Gyr), searched
    /// in `[z_lo, z_hi]` to an absolute tolerance of 1e-4.
    ///
    /// # Errors
    /// `UnsupportedModel` for tabulated models; `InvalidArgument` if the
    /// bracket does not contain the root.
    pub fn redshift_from_time(&self, t: Time, z_lo: Redshift, z_hi: Redshift) -> Result<Redshift> {
        if self.model() != ModelKind::Lcdm {
            fail!(
                UnsupportedModel,
                "redshift from cosmic time needs an LCDM model, got {}",
                self.model()
            );
        }
        ensure!(z_lo >= 0.0, InvalidArgument, "redshift bracket must start at >= 0, got {z_lo}");
        fallible_brent(|z| Ok(self.cosmic_time(z)? - t), z_lo, z_hi, TIME_INVERSION_ACCURACY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CosmologyParameters, TabulatedModel};
    use approx::assert_abs_diff_eq;

    #[test]
    fn fast_inversion_round_trip() {
        let m = CosmologicalModel::default();
        let evaluators: [&dyn ComovingDistanceEvaluator; 2] =
            [&QuadratureEvaluator, &EllipticEvaluator];
        for evaluator in evaluators {
            for z in [0.1, 0.5, 1.0, 2.0] {
                let d_c = evaluator.comoving_distance(&m, z).unwrap();
                let back = m.redshift_lcdm(d_c, 0.0, 10.0, evaluator, 1e-5).unwrap();
                assert_abs_diff_eq!(back, z, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn precision_is_clamped() {
        let m = CosmologicalModel::default();
        let d_c = m.comoving_distance(1.0).unwrap();
        let fine = m.redshift_lcdm(d_c, 0.0, 10.0, &EllipticEvaluator, 1e-9).unwrap();
        let floor = m.redshift_lcdm(d_c, 0.0, 10.0, &EllipticEvaluator, 1e-5).unwrap();
        assert_eq!(fine, floor);
    }

    #[test]
    fn zero_distance_is_zero_redshift() {
        let m = CosmologicalModel::default();
        assert_eq!(m.redshift_lcdm(0.0, 0.0, 5.0, &QuadratureEvaluator, 1e-5).unwrap(), 0.0);
    }

    #[test]
    fn elliptic_evaluator_needs_flat_model() {
        let m = CosmologicalModel::new(CosmologyParameters::default().with_densities(0.3, 0.6, 0.0))
            .unwrap();
        let err = m.redshift_lcdm(1000.0, 0.0, 5.0, &EllipticEvaluator, 1e-5);
        assert!(matches!(err, Err(Error::UnsupportedModel(_))));
        // The quadrature evaluator handles curvature.
        let d_c = m.comoving_distance(0.8).unwrap();
        let z = m.redshift_lcdm(d_c, 0.0, 5.0, &QuadratureEvaluator, 1e-5).unwrap();
        assert_abs_diff_eq!(z, 0.8, epsilon = 1e-5);
    }

    #[test]
    fn tabulated_model_rejected_by_fast_inversion() {
        let m = CosmologicalModel::new(
            CosmologyParameters::default()
                .with_model(ModelKind::Tabulated(TabulatedModel::LcdmBaldiCodecs)),
        )
        .unwrap();
        let err = m.redshift_lcdm(1000.0, 0.0, 5.0, &QuadratureEvaluator, 1e-5);
        assert!(matches!(err, Err(Error::UnsupportedModel(_))));
        assert!(matches!(m.redshift_from_time(5.0, 0.0, 5.0), Err(Error::UnsupportedModel(_))));
    }

    #[test]
    fn brent_inversion() {
        let m = CosmologicalModel::default();
        let d_c = m.comoving_distance(1.5).unwrap();
        assert_abs_diff_eq!(m.redshift(d_c, 0.0, 5.0, 1e-8).unwrap(), 1.5, epsilon = 1e-5);
        assert!(matches!(
            m.redshift(d_c, 2.0, 5.0, 1e-5),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn time_inversion() {
        let m = CosmologicalModel::default();
        let t = m.cosmic_time(1.2).unwrap();
        assert_abs_diff_eq!(m.redshift_from_time(t, 0.0, 10.0).unwrap(), 1.2, epsilon = 1e-4);
    }

    /// A distance growing so slowly that the `E(z)` steps of the lower end
    /// crawl towards the root.
    struct SlowlyRising;

    impl ComovingDistanceEvaluator for SlowlyRising {
        fn comoving_distance(&self, model: &CosmologicalModel, z: Redshift) -> Result<Distance> {
            Ok(0.01 * z * model.hubble_distance())
        }
    }

    #[test]
    fn iteration_budget_is_enforced() {
        let m = CosmologicalModel::new(CosmologyParameters::flat_lcdm(0.3)).unwrap();
        let err = m.redshift_lcdm(0.02 * m.hubble_distance(), 0.0, 10.0, &SlowlyRising, 1e-5);
        match err {
            Err(Error::NumericalFailure(message)) => assert!(message.contains("100 iterations")),
            other => panic!("expected NumericalFailure, got {other:?}"),
        }
    }

    #[test]
    fn unreachable_distance_fails() {
        // D_C(z → ∞) ≈ 3.305 D_H for Ω_m = 0.3.
        let m = CosmologicalModel::new(CosmologyParameters::flat_lcdm(0.3)).unwrap();
        let d_c = 5.0 * m.hubble_distance();
        let evaluators: [&dyn ComovingDistanceEvaluator; 2] =
            [&QuadratureEvaluator, &EllipticEvaluator];
        for evaluator in evaluators {
            let err = m.redshift_lcdm(d_c, 0.0, 10.0, evaluator, 1e-5);
            assert!(matches!(err, Err(Error::NumericalFailure(_))), "got {err:?}");
        }
    }

    #[test]
    fn errors_inside_the_search_surface() {
        let err = fallible_brent(
            |z| if z > 1.0 { Err(Error::NumericalFailure("boom".into())) } else { Ok(z - 0.5) },
            0.0,
            2.0,
            1e-6,
        );
        assert!(matches!(err, Err(Error::NumericalFailure(_))));
    }
}
