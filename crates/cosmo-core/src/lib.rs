//! # cosmo-core
//!
//! Core types, physical constants, configuration, and error definitions
//! for cosmodist.
//!
//! Every other crate in the workspace depends on this one for the
//! [`Error`] taxonomy, the [`Real`] alias and the compile-time physical
//! constants.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Engine configuration (table directories).
pub mod config;

/// Physical constants.
pub mod constants;

/// Error types and the `ensure!` / `fail!` macros.
pub mod errors;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Alias used for array sizes / indices.
pub type Size = usize;

/// A cosmological redshift (dimensionless, `z ≥ 0`).
pub type Redshift = Real;

/// A distance, in Mpc/h or Mpc depending on the model's unit convention.
pub type Distance = Real;

/// A cosmic time interval in Gyr.
pub type Time = Real;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use config::EngineConfig;
pub use errors::{Error, Result};
