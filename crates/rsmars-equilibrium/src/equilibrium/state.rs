//! Working state shared by the regime solvers
//!
//! Amounts here are molar (umol/m3) apart from water, which stays in ug/m3.

use super::concentrations::{EquilibriumInput, EquilibriumOutput};
use super::outcome::{Outcome, Regime};
use super::thermodynamics::EquilibriumConstants;
use crate::constants::{MW_HNO3, MW_NH3, MW_NH4, MW_NO3, MW_SO4};
use crate::parameters::EquilibriumParameters;
use crate::water::HumidityIndex;
use rsmars_core::errors::{AerosolError, AerosolResult};
use rsmars_core::units::{ug_to_umol, umol_to_ug};
use rsmars_core::FloatValue;

/// Conserved totals of one parcel (umol/m3)
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Totals {
    pub sulfate: FloatValue,
    pub nitrate: FloatValue,
    pub ammonia: FloatValue,
    /// Aerosol nitrate before partitioning
    pub initial_nitrate: FloatValue,
    /// Gas-phase nitric acid before partitioning
    pub initial_nitric_acid: FloatValue,
}

impl Totals {
    pub fn from_input(input: &EquilibriumInput, floor: FloatValue) -> AerosolResult<Self> {
        let totals = Self {
            sulfate: input.total_sulfate_umol().max(floor),
            nitrate: input.total_nitrate_umol(),
            ammonia: input.total_ammonia_umol(),
            initial_nitrate: ug_to_umol(input.nitrate, MW_NO3),
            initial_nitric_acid: ug_to_umol(input.nitric_acid, MW_HNO3),
        };

        for (species, value) in [
            ("total sulfate", totals.sulfate),
            ("total nitrate", totals.nitrate),
            ("total ammonia", totals.ammonia),
        ] {
            if value < 0.0 {
                return Err(AerosolError::NegativeConcentration {
                    species: species.to_string(),
                    value,
                });
            }
        }
        Ok(totals)
    }

    /// Molar NH4/SO4 ratio
    pub fn ammonium_ratio(&self) -> FloatValue {
        self.ammonia / self.sulfate
    }
}

/// Partition of one parcel between phases
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct Partition {
    pub sulfate: FloatValue,
    pub bisulfate: FloatValue,
    pub nitrate: FloatValue,
    pub ammonium: FloatValue,
    pub ammonia: FloatValue,
    pub nitric_acid: FloatValue,
    /// ug/m3
    pub water: FloatValue,
}

impl Partition {
    /// All ammonia and nitrate in the gas phase, no aerosol
    pub fn all_gas(totals: &Totals) -> Self {
        Self {
            ammonia: totals.ammonia,
            nitric_acid: totals.nitrate,
            ..Self::default()
        }
    }

    /// Convert to mass concentrations, flooring every species
    pub fn into_output(
        self,
        outcome: Outcome,
        regime: Regime,
        floor: FloatValue,
    ) -> EquilibriumOutput {
        EquilibriumOutput {
            sulfate: umol_to_ug(self.sulfate, MW_SO4).max(floor),
            bisulfate: umol_to_ug(self.bisulfate, MW_SO4).max(floor),
            nitrate: umol_to_ug(self.nitrate, MW_NO3).max(floor),
            ammonium: umol_to_ug(self.ammonium, MW_NH4).max(floor),
            water: self.water.max(floor),
            ammonia: umol_to_ug(self.ammonia, MW_NH3).max(floor),
            nitric_acid: umol_to_ug(self.nitric_acid, MW_HNO3).max(floor),
            outcome,
            regime,
        }
    }
}

/// Everything a regime solver needs about one parcel
#[derive(Debug, Clone)]
pub(crate) struct Conditions<'a> {
    pub parameters: &'a EquilibriumParameters,
    pub constants: EquilibriumConstants,
    pub humidity: HumidityIndex,
    pub totals: Totals,
}

/// Partition produced by a regime solver and how it was reached
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BranchResult {
    pub outcome: Outcome,
    pub partition: Partition,
}

impl BranchResult {
    pub fn new(outcome: Outcome, partition: Partition) -> Self {
        Self { outcome, partition }
    }
}
