//! Sulfate/nitrate/ammonium/water aerosol equilibrium for gridded models
//!
//! The per-parcel solver lives in [`rsmars_equilibrium`]; this crate adds the
//! pieces a host model needs around it:
//!
//! - [`grid`]: solve every cell of a 3D field in parallel
//! - [`nitric_acid`]: persisted gas-phase nitric acid with periodic
//!   relaxation to a monthly mean, for models that do not transport HNO3

pub mod grid;
pub mod nitric_acid;

pub use rsmars_core::errors::{AerosolError, AerosolResult};
pub use rsmars_core::units;
pub use rsmars_equilibrium::{
    Degeneracy, EquilibriumInput, EquilibriumOutput, EquilibriumParameters, EquilibriumSolver,
    ExitReason, Outcome, Regime,
};
