//! Table interpolation with error estimates.
//!
//! Every scheme returns an [`Interpolated`] carrying both the interpolated
//! value and an estimate of its error, so that callers can reject a lookup
//! whose error is too large relative to the value.

use cosmo_core::{ensure, fail, Real, Result};

/// Interpolation scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationKind {
    /// Piecewise linear between the two bracketing nodes.
    Linear,
    /// Neville polynomial through `order` neighbouring nodes.
    Polynomial,
    /// Bulirsch-Stoer diagonal rational function through `order`
    /// neighbouring nodes.
    Rational,
}

/// Result of an interpolation: the value and an error estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolated {
    /// Interpolated value.
    pub value: Real,
    /// Estimated absolute error of `value` (the last correction applied by
    /// the tableau; zero for linear interpolation).
    pub error: Real,
}

/// Interpolate the table `(xs, ys)` at `x`.
///
/// `xs` must be strictly increasing. For the polynomial and rational kinds
/// `order` neighbouring nodes centred on `x` are used (clamped to the table
/// size); `order` is ignored for [`InterpolationKind::Linear`]. Points
/// outside the table are extrapolated.
///
/// # Errors
/// `InvalidArgument` for mismatched or too short tables, unsorted abscissae
/// or `order < 2`; `NumericalFailure` if the rational tableau hits a pole.
pub fn interpolate(
    x: Real,
    xs: &[Real],
    ys: &[Real],
    kind: InterpolationKind,
    order: usize,
) -> Result<Interpolated> {
    check_table(xs, ys)?;
    ensure!(order >= 2, InvalidArgument, "interpolation order must be >= 2, got {order}");

    match kind {
        InterpolationKind::Linear => Ok(linear(x, xs, ys)),
        InterpolationKind::Polynomial => {
            let (lo, hi) = window(x, xs, order);
            neville(x, &xs[lo..hi], &ys[lo..hi])
        }
        InterpolationKind::Rational => {
            let (lo, hi) = window(x, xs, order);
            bulirsch_stoer(x, &xs[lo..hi], &ys[lo..hi])
        }
    }
}

/// Polynomial interpolation of a 2D table `ys[i][j] = y(x1s[i], x2s[j])`.
///
/// Interpolates along `x2` on each of the `order` rows nearest to `x1`, then
/// along `x1` through the row results (the classic "polin2" scheme).
pub fn interpolate_2d(
    x1: Real,
    x2: Real,
    x1s: &[Real],
    x2s: &[Real],
    ys: &[Vec<Real>],
    order: usize,
) -> Result<Interpolated> {
    ensure!(order >= 2, InvalidArgument, "interpolation order must be >= 2, got {order}");
    ensure!(x1s.len() >= 2, InvalidArgument, "need at least 2 rows for 2D interpolation");
    ensure!(
        ys.len() == x1s.len(),
        InvalidArgument,
        "2D table has {} rows but {} x1 nodes",
        ys.len(),
        x1s.len()
    );
    let (lo, hi) = window(x1, x1s, order);
    let row_values = ys[lo..hi]
        .iter()
        .map(|row| interpolate(x2, x2s, row, InterpolationKind::Polynomial, order).map(|r| r.value))
        .collect::<Result<Vec<Real>>>()?;
    interpolate(x1, &x1s[lo..hi], &row_values, InterpolationKind::Polynomial, order)
}

fn check_table(xs: &[Real], ys: &[Real]) -> Result<()> {
    ensure!(xs.len() >= 2, InvalidArgument, "need at least 2 points for interpolation");
    ensure!(
        xs.len() == ys.len(),
        InvalidArgument,
        "xs and ys must have the same length ({} vs {})",
        xs.len(),
        ys.len()
    );
    ensure!(
        xs.windows(2).all(|w| w[0] < w[1]),
        InvalidArgument,
        "abscissae must be strictly increasing"
    );
    Ok(())
}

/// Index `j` such that `xs[j] <= x < xs[j + 1]`, clamped to `[0, n - 2]`.
fn locate(x: Real, xs: &[Real]) -> usize {
    let n = xs.len();
    if x <= xs[0] {
        return 0;
    }
    if x >= xs[n - 1] {
        return n - 2;
    }
    let mut lo = 0;
    let mut hi = n - 1;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if xs[mid] <= x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Half-open range of `order` nodes centred on `x`.
fn window(x: Real, xs: &[Real], order: usize) -> (usize, usize) {
    let n = xs.len();
    let m = order.min(n);
    let j = locate(x, xs);
    let lo = j.saturating_sub((m - 2) / 2).min(n - m);
    (lo, lo + m)
}

fn linear(x: Real, xs: &[Real], ys: &[Real]) -> Interpolated {
    let i = locate(x, xs);
    let slope = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i]);
    Interpolated {
        value: ys[i] + (x - xs[i]) * slope,
        error: 0.0,
    }
}

/// Index of the node closest to `x`.
fn nearest(x: Real, xs: &[Real]) -> usize {
    xs.iter()
        .enumerate()
        .fold((0, Real::INFINITY), |(best, dist), (i, &xi)| {
            let d = (x - xi).abs();
            if d < dist {
                (i, d)
            } else {
                (best, dist)
            }
        })
        .0
}

/// Walk the tableau towards the final estimate, starting from the node
/// nearest to `x`. `ns` is the current tableau position (may become -1).
fn next_correction(c: &[Real], d: &[Real], ns: &mut isize, remaining: usize) -> Real {
    if 2 * (*ns + 1) < remaining as isize {
        c[(*ns + 1) as usize]
    } else {
        let dy = d[*ns as usize];
        *ns -= 1;
        dy
    }
}

fn neville(x: Real, xs: &[Real], ys: &[Real]) -> Result<Interpolated> {
    let n = xs.len();
    let mut c = ys.to_vec();
    let mut d = ys.to_vec();
    let start = nearest(x, xs);
    let mut y = ys[start];
    let mut ns = start as isize - 1;
    let mut dy = 0.0;

    for m in 1..n {
        for i in 0..n - m {
            let ho = xs[i] - x;
            let hp = xs[i + m] - x;
            let w = c[i + 1] - d[i];
            let den = ho - hp;
            if den == 0.0 {
                fail!(NumericalFailure, "polynomial interpolation: coincident abscissae");
            }
            let den = w / den;
            d[i] = hp * den;
            c[i] = ho * den;
        }
        dy = next_correction(&c, &d, &mut ns, n - m);
        y += dy;
    }
    Ok(Interpolated { value: y, error: dy.abs() })
}

fn bulirsch_stoer(x: Real, xs: &[Real], ys: &[Real]) -> Result<Interpolated> {
    const TINY: Real = 1.0e-99;
    let n = xs.len();
    if let Some(i) = xs.iter().position(|&xi| xi == x) {
        return Ok(Interpolated { value: ys[i], error: 0.0 });
    }
    let mut c = ys.to_vec();
    let mut d: Vec<Real> = ys.iter().map(|&y| y + TINY).collect();
    let start = nearest(x, xs);
    let mut y = ys[start];
    let mut ns = start as isize - 1;
    let mut dy = 0.0;

    for m in 1..n {
        for i in 0..n - m {
            let w = c[i + 1] - d[i];
            let h = xs[i + m] - x;
            let t = (xs[i] - x) * d[i] / h;
            let dd = t - c[i + 1];
            if dd == 0.0 {
                fail!(NumericalFailure, "rational interpolation: pole at x = {x}");
            }
            let dd = w / dd;
            d[i] = c[i + 1] * dd;
            c[i] = t * dd;
        }
        dy = next_correction(&c, &d, &mut ns, n - m);
        y += dy;
    }
    Ok(Interpolated { value: y, error: dy.abs() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linear_interpolation() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, 1.0, 4.0];
        let r = interpolate(1.5, &xs, &ys, InterpolationKind::Linear, 2).unwrap();
        assert_abs_diff_eq!(r.value, 2.5, epsilon = 1e-12);
        assert_eq!(r.error, 0.0);
    }

    #[test]
    fn polynomial_reproduces_cubic() {
        let xs: Vec<Real> = (0..10).map(|i| i as Real * 0.5).collect();
        let ys: Vec<Real> = xs.iter().map(|x| x * x * x - 2.0 * x + 1.0).collect();
        let x = 2.3;
        let r = interpolate(x, &xs, &ys, InterpolationKind::Polynomial, 4).unwrap();
        assert_abs_diff_eq!(r.value, x * x * x - 2.0 * x + 1.0, epsilon = 1e-10);
    }

    #[test]
    fn rational_tracks_smooth_function() {
        let xs: Vec<Real> = (1..40).map(|i| i as Real * 0.1).collect();
        let ys: Vec<Real> = xs.iter().map(|x| x / (1.0 + x)).collect();
        let x = 1.234;
        let r = interpolate(x, &xs, &ys, InterpolationKind::Rational, 4).unwrap();
        assert_abs_diff_eq!(r.value, x / (1.0 + x), epsilon = 1e-8);
        assert!(r.error < 1e-4, "error estimate {}", r.error);
    }

    #[test]
    fn rational_hits_node_exactly() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 2.0, 5.0, 10.0];
        let r = interpolate(2.0, &xs, &ys, InterpolationKind::Rational, 4).unwrap();
        assert_eq!(r.value, 5.0);
        assert_eq!(r.error, 0.0);
    }

    #[test]
    fn window_stays_inside_table() {
        let xs: Vec<Real> = (0..6).map(|i| i as Real).collect();
        assert_eq!(window(-1.0, &xs, 4), (0, 4));
        assert_eq!(window(2.5, &xs, 4), (1, 5));
        assert_eq!(window(9.0, &xs, 4), (2, 6));
        assert_eq!(window(2.5, &xs, 10), (0, 6));
    }

    #[test]
    fn unsorted_table_is_rejected() {
        let err = interpolate(0.5, &[1.0, 0.0], &[0.0, 1.0], InterpolationKind::Linear, 2);
        assert!(matches!(err, Err(cosmo_core::Error::InvalidArgument(_))));
    }

    #[test]
    fn bilinear_surface_is_exact_in_2d() {
        let x1s = [0.0, 1.0, 2.0, 3.0];
        let x2s = [0.0, 1.0, 2.0, 3.0];
        let ys: Vec<Vec<Real>> = x1s
            .iter()
            .map(|a| x2s.iter().map(|b| 2.0 * a + 3.0 * b + a * b).collect())
            .collect();
        let r = interpolate_2d(1.5, 2.25, &x1s, &x2s, &ys, 4).unwrap();
        assert_abs_diff_eq!(r.value, 2.0 * 1.5 + 3.0 * 2.25 + 1.5 * 2.25, epsilon = 1e-10);
    }
}
