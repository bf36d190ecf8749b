//! # cosmo-distances
//!
//! Distance–redshift and volume–redshift relations for parametric
//! cosmological models.
//!
//! Everything hangs off [`CosmologicalModel`], an immutable parameter set
//! whose methods evaluate the Friedmann equation, comoving distances (by
//! quadrature, in closed form for flat ΛCDM, or from a table for the named
//! coupled-dark-energy models), their inverses, and survey volumes.
//!
//! ```
//! use cosmo_distances::{CosmologicalModel, EllipticEvaluator};
//!
//! let model = CosmologicalModel::default();
//! let d_c = model.comoving_distance(1.0)?;
//! let z = model.redshift_lcdm(d_c, 0.0, 10.0, &EllipticEvaluator, 1e-5)?;
//! assert!((z - 1.0).abs() < 1e-5);
//! # Ok::<(), cosmo_core::Error>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `CosmologicalModel`, its parameters and model tags.
pub mod model;

/// Expansion rate, density fractions and characteristic redshifts.
pub mod friedmann;

/// Comoving distance and cosmic times by numerical quadrature.
pub mod quadrature;

/// Closed-form comoving distance for flat ΛCDM.
pub mod elliptic;

/// Comoving-distance tables and the table store.
pub mod table;

/// Comoving distance dispatch and derived distances.
pub mod distances;

/// Distance and time to redshift.
pub mod inverter;

/// Survey volumes and derived quantities.
pub mod volume;

/// V_max resampling of comoving distances.
pub mod vmax;

/// Alcock-Paczynski conversions between cosmologies.
pub mod alcock_paczynski;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use alcock_paczynski::{
    ap_shift_pi, ap_shift_r, ap_shift_rp, converted_xi, converted_xi_2d, max_separations_ap,
    ConversionDirection, MaxSeparations,
};
pub use distances::DistanceKind;
pub use inverter::{
    ComovingDistanceEvaluator, EllipticEvaluator, QuadratureEvaluator, MIN_PRECISION,
};
pub use model::{CosmologicalModel, CosmologyParameters, DistanceUnits, ModelKind, TabulatedModel};
pub use table::TabulatedDistanceTable;
pub use volume::SolidAngle;
pub use vmax::{DistanceHistogram, VmaxSampling};
