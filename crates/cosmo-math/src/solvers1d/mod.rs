//! Bracketed 1D root finding.

use cosmo_core::{
    errors::{Error, Result},
    Real,
};

const MAX_ITERATIONS: u32 = 100;

/// Brent's method for a root of `f` inside `[x_min, x_max]`.
///
/// Combines bisection, secant, and inverse quadratic interpolation; the
/// returned abscissa is within `accuracy` of the root.
///
/// # Errors
/// `InvalidArgument` if `f(x_min)` and `f(x_max)` do not bracket a root (or
/// `accuracy` is not positive); `NumericalFailure` if the iteration budget
/// runs out.
pub fn brent<F>(f: F, x_min: Real, x_max: Real, accuracy: Real) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    if !(accuracy > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "Brent: accuracy must be positive, got {accuracy}"
        )));
    }
    let mut a = x_min;
    let mut b = x_max;
    let mut fa = f(a);
    let mut fb = f(b);

    if (fa > 0.0 && fb > 0.0) || (fa < 0.0 && fb < 0.0) {
        return Err(Error::InvalidArgument(format!(
            "Brent: root is not bracketed by [{a}, {b}] (f = {fa}, {fb})"
        )));
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = 0.0;
    let mut e = 0.0;

    for _ in 0..MAX_ITERATIONS {
        if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
            // Rename so that c is on the other side of the root from b.
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }
        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * accuracy;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol || fb == 0.0 {
            return Ok(b);
        }
        if e.abs() >= tol && fa.abs() > fb.abs() {
            // Attempt inverse quadratic interpolation.
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }
        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(xm) };
        fb = f(b);
    }
    Err(Error::NumericalFailure(format!(
        "Brent: no convergence within {MAX_ITERATIONS} iterations"
    )))
}
