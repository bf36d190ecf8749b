//! # cosmo-math
//!
//! Numerical primitives consumed by the distance engine: Romberg-type
//! quadrature on closed and open intervals, bracketed 1D root finding, and
//! table interpolation that reports an error estimate alongside the value.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Numerical integration.
pub mod integrals;

/// 1D and 2D table interpolation.
pub mod interpolations;

/// 1D root-finding solvers.
pub mod solvers1d;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use integrals::{Integrator, MidpointRombergIntegral, RombergIntegral};
pub use interpolations::{interpolate, interpolate_2d, Interpolated, InterpolationKind};
pub use solvers1d::brent;
