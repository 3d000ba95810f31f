//! Regime selection and the public solve entry point

use super::concentrations::{EquilibriumInput, EquilibriumOutput};
use super::outcome::{ExitReason, Outcome, Regime};
use super::state::{Conditions, Partition, Totals};
use super::thermodynamics::EquilibriumConstants;
use super::{ammonia_poor, ammonia_rich};
use crate::constants::{MIN_NITRATE, MIN_SULFATE, NEUTRAL_AMMONIUM_SULFATE_RATIO};
use crate::parameters::EquilibriumParameters;
use crate::water::HumidityIndex;
use rsmars_core::errors::AerosolResult;
use tracing::debug;

/// Gas/aerosol equilibrium solver for one air parcel at a time
///
/// Partitions total nitrate between HNO3 gas and aerosol NO3-, total ammonia
/// between NH3 gas and aerosol NH4+, and sulfate between SO4-- and HSO4-, and
/// reports the aerosol liquid water.
///
/// # Algorithm
///
/// 1. Air below the minimum relative humidity is returned unchanged.
/// 2. Parcels with trace sulfate and nitrate put all ammonia and nitrate in
///    the gas phase.
/// 3. The molar NH4/SO4 ratio selects the ammonia-rich (ratio > 2) or
///    ammonia-poor regime, each of which iterates water content and activity
///    coefficients to a fixed point.
///
/// Every output concentration is floored at
/// [`EquilibriumParameters::concentration_floor`] except in step 1.
///
/// # Example
///
/// ```
/// use rsmars_equilibrium::equilibrium::{EquilibriumInput, EquilibriumSolver, Regime};
///
/// let solver = EquilibriumSolver::default();
/// // 10 ug/m3 sulfate with plenty of ammonia at 70 % RH
/// let input = EquilibriumInput::new(10.0, 2.0, 0.0, 5.0, 0.0, 0.7, 290.0);
/// let output = solver.solve(&input).unwrap();
///
/// assert_eq!(output.regime, Regime::AmmoniaRich);
/// assert!(output.water > 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EquilibriumSolver {
    parameters: EquilibriumParameters,
}

impl EquilibriumSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a solver after validating `parameters`
    pub fn from_parameters(parameters: EquilibriumParameters) -> AerosolResult<Self> {
        parameters.validate()?;
        Ok(Self { parameters })
    }

    pub fn parameters(&self) -> &EquilibriumParameters {
        &self.parameters
    }

    /// Partition one parcel.
    ///
    /// # Errors
    ///
    /// Returns an error for negative or non-finite concentrations, negative
    /// humidity, or non-positive temperature. Numerical trouble inside the
    /// iteration is not an error: it is reported through
    /// [`EquilibriumOutput::outcome`].
    pub fn solve(&self, input: &EquilibriumInput) -> AerosolResult<EquilibriumOutput> {
        input.validate()?;
        let params = &self.parameters;
        let floor = params.concentration_floor;

        if input.relative_humidity < params.minimum_relative_humidity {
            return Ok(EquilibriumOutput::pass_through(input, floor));
        }

        let totals = Totals::from_input(input, floor)?;

        if totals.sulfate < MIN_SULFATE && totals.nitrate < MIN_NITRATE {
            return Ok(Partition::all_gas(&totals).into_output(
                Outcome::EarlyExit(ExitReason::TraceLoading),
                Regime::Unpartitioned,
                floor,
            ));
        }

        let conditions = Conditions {
            parameters: params,
            constants: EquilibriumConstants::at_temperature(input.temperature),
            humidity: HumidityIndex::from_fraction(input.relative_humidity),
            totals,
        };

        let ratio = totals.ammonium_ratio();
        let (regime, result) = if ratio > NEUTRAL_AMMONIUM_SULFATE_RATIO {
            (Regime::AmmoniaRich, ammonia_rich::solve(&conditions)?)
        } else {
            (Regime::AmmoniaPoor, ammonia_poor::solve(&conditions)?)
        };

        debug!(
            ?regime,
            ratio,
            humidity = conditions.humidity.percent(),
            outcome = ?result.outcome,
            "Equilibrium solved"
        );

        Ok(result.partition.into_output(result.outcome, regime, floor))
    }
}
