//! Equilibrium solver parameters
//!
//! Parameter structures for the equilibrium solver. Defaults reproduce the
//! standard configuration of the thermodynamic scheme.

mod equilibrium;

pub use equilibrium::EquilibriumParameters;
