//! Core types for the rsmars aerosol equilibrium workspace
//!
//! This crate holds the pieces shared by every other crate in the workspace:
//!
//! - `errors`: the [`AerosolError`](errors::AerosolError) type and result alias
//! - `utils`: small numerical kernels (polynomials, quadratic and cubic roots)
//! - `units`: conversions between transported tracer mass and the
//!   concentration units used by the equilibrium solver

pub mod errors;
pub mod units;
pub mod utils;

/// Floating point type used throughout the workspace.
///
/// Everything is computed in double precision.
pub type FloatValue = f64;
