//! Numerical integration.
//!
//! Two Romberg-type integrators share the [`Integrator`] trait:
//!
//! * [`RombergIntegral`] refines the trapezoid rule on a closed interval and
//!   extrapolates the sequence of estimates to zero step size;
//! * [`MidpointRombergIntegral`] does the same with the (open) midpoint
//!   rule, so the integrand is never evaluated at the end points. Use it when
//!   the integrand cannot be evaluated at one of the limits.

use cosmo_core::{errors::Error, Real, Result};

use crate::interpolations::{interpolate, InterpolationKind};

/// Number of points used in the extrapolation to zero step size.
const EXTRAPOLATION_POINTS: usize = 5;

/// A numerical integrator.
pub trait Integrator {
    /// Integrate `f` on `[a, b]`.
    fn integrate<F: Fn(Real) -> Real>(&self, f: F, a: Real, b: Real) -> Result<Real>;
}

// ── Refinement stages ────────────────────────────────────────────────────────

/// Successive trapezoid estimates, doubling the number of points each stage.
struct TrapezoidStages<'a, F> {
    f: &'a F,
    a: Real,
    b: Real,
    stage: u32,
    estimate: Real,
}

impl<'a, F: Fn(Real) -> Real> TrapezoidStages<'a, F> {
    fn new(f: &'a F, a: Real, b: Real) -> Self {
        Self { f, a, b, stage: 0, estimate: 0.0 }
    }

    fn next_estimate(&mut self) -> Real {
        self.stage += 1;
        let width = self.b - self.a;
        if self.stage == 1 {
            self.estimate = 0.5 * width * ((self.f)(self.a) + (self.f)(self.b));
        } else {
            let new_points = 1usize << (self.stage - 2);
            let del = width / new_points as Real;
            let sum: Real = (0..new_points)
                .map(|j| (self.f)(self.a + (j as Real + 0.5) * del))
                .sum();
            self.estimate = 0.5 * (self.estimate + width * sum / new_points as Real);
        }
        self.estimate
    }
}

/// Successive midpoint estimates, tripling the number of points each stage
/// so that previous evaluations are reused.
struct MidpointStages<'a, F> {
    f: &'a F,
    a: Real,
    b: Real,
    stage: u32,
    estimate: Real,
}

impl<'a, F: Fn(Real) -> Real> MidpointStages<'a, F> {
    fn new(f: &'a F, a: Real, b: Real) -> Self {
        Self { f, a, b, stage: 0, estimate: 0.0 }
    }

    fn next_estimate(&mut self) -> Real {
        self.stage += 1;
        let width = self.b - self.a;
        if self.stage == 1 {
            self.estimate = width * (self.f)(0.5 * (self.a + self.b));
        } else {
            let it = 3usize.pow(self.stage - 2);
            let tnm = it as Real;
            let del = width / (3.0 * tnm);
            let ddel = del + del;
            let mut x = self.a + 0.5 * del;
            let mut sum = 0.0;
            for _ in 0..it {
                sum += (self.f)(x);
                x += ddel;
                sum += (self.f)(x);
                x += del;
            }
            self.estimate = (self.estimate + width * sum / tnm) / 3.0;
        }
        self.estimate
    }
}

/// Extrapolate `(steps, estimates)` to zero step and report convergence.
fn extrapolate(steps: &[Real], estimates: &[Real]) -> Result<(Real, Real)> {
    let n = steps.len();
    let lo = n - EXTRAPOLATION_POINTS;
    // Step sizes shrink, so reverse to get increasing abscissae.
    let xs: Vec<Real> = steps[lo..].iter().rev().copied().collect();
    let ys: Vec<Real> = estimates[lo..].iter().rev().copied().collect();
    let r = interpolate(0.0, &xs, &ys, InterpolationKind::Polynomial, EXTRAPOLATION_POINTS)?;
    Ok((r.value, r.error))
}

// ── Romberg (closed) ─────────────────────────────────────────────────────────

/// Romberg integration on a closed interval.
#[derive(Debug, Clone)]
pub struct RombergIntegral {
    relative_accuracy: Real,
    max_refinements: u32,
}

impl RombergIntegral {
    /// Create a new Romberg integrator.
    pub fn new(relative_accuracy: Real, max_refinements: u32) -> Self {
        Self {
            relative_accuracy,
            max_refinements: max_refinements.max(EXTRAPOLATION_POINTS as u32),
        }
    }
}

impl Default for RombergIntegral {
    fn default() -> Self {
        Self::new(1.0e-10, 20)
    }
}

impl Integrator for RombergIntegral {
    fn integrate<F: Fn(Real) -> Real>(&self, f: F, a: Real, b: Real) -> Result<Real> {
        if a == b {
            return Ok(0.0);
        }
        let mut stages = TrapezoidStages::new(&f, a, b);
        let mut steps = vec![1.0];
        let mut estimates = Vec::with_capacity(self.max_refinements as usize);

        for j in 1..=self.max_refinements as usize {
            estimates.push(stages.next_estimate());
            if j >= EXTRAPOLATION_POINTS {
                let (value, error) = extrapolate(&steps[..j], &estimates)?;
                if !value.is_finite() {
                    break;
                }
                if error <= self.relative_accuracy * value.abs() {
                    return Ok(value);
                }
            }
            steps.push(0.25 * steps[j - 1]);
        }
        Err(Error::NumericalFailure(format!(
            "RombergIntegral: no convergence on [{a}, {b}] after {} refinements",
            self.max_refinements
        )))
    }
}

// ── Romberg on the midpoint rule (open) ───────────────────────────────────────

/// Romberg integration on an open interval, built on the midpoint rule.
#[derive(Debug, Clone)]
pub struct MidpointRombergIntegral {
    relative_accuracy: Real,
    max_refinements: u32,
}

impl MidpointRombergIntegral {
    /// Create a new open-interval Romberg integrator.
    pub fn new(relative_accuracy: Real, max_refinements: u32) -> Self {
        Self {
            relative_accuracy,
            max_refinements: max_refinements.max(EXTRAPOLATION_POINTS as u32),
        }
    }
}

impl Default for MidpointRombergIntegral {
    fn default() -> Self {
        Self::new(3.0e-9, 14)
    }
}

impl Integrator for MidpointRombergIntegral {
    fn integrate<F: Fn(Real) -> Real>(&self, f: F, a: Real, b: Real) -> Result<Real> {
        if a == b {
            return Ok(0.0);
        }
        let mut stages = MidpointStages::new(&f, a, b);
        let mut steps = vec![1.0];
        let mut estimates = Vec::with_capacity(self.max_refinements as usize);

        for j in 1..=self.max_refinements as usize {
            estimates.push(stages.next_estimate());
            if j >= EXTRAPOLATION_POINTS {
                let (value, error) = extrapolate(&steps[..j], &estimates)?;
                if !value.is_finite() {
                    break;
                }
                if error <= self.relative_accuracy * value.abs() {
                    return Ok(value);
                }
            }
            // The error series is even in the step, which shrinks by 3.
            steps.push(steps[j - 1] / 9.0);
        }
        Err(Error::NumericalFailure(format!(
            "MidpointRombergIntegral: no convergence on ({a}, {b}) after {} refinements",
            self.max_refinements
        )))
    }
}
