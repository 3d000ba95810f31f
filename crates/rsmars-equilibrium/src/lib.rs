//! Thermodynamic equilibrium of inorganic atmospheric aerosol
//!
//! Partitions nitrate and ammonia between gas and aerosol phases in the
//! presence of sulfate, and computes the associated aerosol liquid water.
//!
//! - [`water`]: aerosol water content from relative humidity and composition
//! - [`activity`]: ionic activity coefficients of the aqueous solution
//! - [`equilibrium`]: the per-parcel solver
//! - [`parameters`]: solver configuration

pub mod activity;
pub mod constants;
pub mod equilibrium;
pub mod parameters;
pub mod water;

pub use equilibrium::{
    Degeneracy, EquilibriumInput, EquilibriumOutput, EquilibriumSolver, ExitReason, Outcome,
    Regime,
};
pub use parameters::EquilibriumParameters;
