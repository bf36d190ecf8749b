//! # cosmodist
//!
//! Distance–redshift and volume–redshift relations for flat and curved
//! ΛCDM, CPL dark-energy and tabulated coupled-dark-energy cosmologies.
//!
//! This crate is a **façade** that re-exports the workspace crates.
//! Application code should depend on this crate rather than the individual
//! `cosmo-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! cosmodist = "0.1"
//! ```
//!
//! ```rust
//! use cosmodist::distances::{CosmologicalModel, CosmologyParameters, DistanceUnits};
//!
//! let planck_like = CosmologicalModel::new(
//!     CosmologyParameters::flat_lcdm(0.3)
//!         .with_hubble(0.7)
//!         .with_units(DistanceUnits::Mpc),
//! )?;
//! let d_l = planck_like.luminosity_distance(1.0)?;
//! assert!((d_l / 6607.66 - 1.0).abs() < 1e-4);
//! # Ok::<(), cosmodist::core::Error>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Error taxonomy, type aliases, physical constants and configuration.
pub use cosmo_core as core;

/// Quadrature, root finding and interpolation.
pub use cosmo_math as math;

/// Cosmological models, distances, inversions and volumes.
pub use cosmo_distances as distances;
