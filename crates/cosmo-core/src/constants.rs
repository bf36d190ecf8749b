//! Physical and numerical constants.
//!
//! These are compile-time values; nothing in the workspace mutates them.

use crate::Real;

/// Speed of light in vacuum \[km/s\].
pub const SPEED_OF_LIGHT: Real = 299_792.458;

/// Hubble distance for `H0 = 100 km/s/Mpc`, i.e. `c/100` \[Mpc/h\].
pub const HUBBLE_DISTANCE_100: Real = SPEED_OF_LIGHT / 100.0;

/// One parsec \[m\].
pub const PARSEC: Real = 3.085_677_581_491_367e16;

/// One megaparsec \[km\].
pub const MPC_IN_KM: Real = 1.0e6 * PARSEC * 1.0e-3;

/// One Julian year \[s\].
pub const YEAR: Real = 3.155_76e7;

/// One gigayear \[s\].
pub const GYR_IN_S: Real = 1.0e9 * YEAR;

/// Square degrees per steradian, `(180/π)²`.
pub const SQ_DEG_PER_STERADIAN: Real = 3_282.806_35;

/// Critical density for `h = 1` expressed in `M_sun / Mpc³`.
pub const CRITICAL_DENSITY_H1: Real = 2.778e11;

/// Linear collapse threshold in an Einstein-de Sitter universe.
pub const DELTA_C_EDS: Real = 1.686;
