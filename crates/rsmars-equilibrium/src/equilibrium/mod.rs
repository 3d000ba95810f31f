//! Gas/aerosol equilibrium partitioning of the sulfate/nitrate/ammonium/water
//! system.

mod ammonia_poor;
mod ammonia_rich;
mod concentrations;
mod outcome;
mod solver;
mod state;
mod thermodynamics;

pub use concentrations::{EquilibriumInput, EquilibriumOutput};
pub use outcome::{Degeneracy, ExitReason, Outcome, Regime};
pub use solver::EquilibriumSolver;
pub use thermodynamics::EquilibriumConstants;
