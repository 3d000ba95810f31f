//! Solver inputs and outputs
//!
//! All concentrations are mass concentrations in ug/m3 of the named species.
//! Aerosol sulfate and bisulfate are both reported as mass of the SO4 group.

use super::outcome::{ExitReason, Outcome, Regime};
use crate::constants::{MW_HNO3, MW_NH3, MW_NH4, MW_NO3, MW_SO4};
use rsmars_core::errors::{AerosolError, AerosolResult};
use rsmars_core::units::ug_to_umol;
use rsmars_core::FloatValue;
use serde::{Deserialize, Serialize};

/// State of one air parcel before partitioning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumInput {
    /// Total sulfate (ug/m3)
    pub sulfate: FloatValue,
    /// Gas-phase nitric acid, HNO3 (ug/m3)
    pub nitric_acid: FloatValue,
    /// Aerosol nitrate, NO3- (ug/m3)
    pub nitrate: FloatValue,
    /// Gas-phase ammonia, NH3 (ug/m3)
    pub ammonia: FloatValue,
    /// Aerosol ammonium, NH4+ (ug/m3)
    pub ammonium: FloatValue,
    /// Relative humidity (fraction, 0-1)
    pub relative_humidity: FloatValue,
    /// Temperature (K)
    pub temperature: FloatValue,
}

impl EquilibriumInput {
    pub fn new(
        sulfate: FloatValue,
        nitric_acid: FloatValue,
        nitrate: FloatValue,
        ammonia: FloatValue,
        ammonium: FloatValue,
        relative_humidity: FloatValue,
        temperature: FloatValue,
    ) -> Self {
        Self {
            sulfate,
            nitric_acid,
            nitrate,
            ammonia,
            ammonium,
            relative_humidity,
            temperature,
        }
    }

    /// Reject negative or non-finite concentrations and non-physical
    /// humidity or temperature.
    pub fn validate(&self) -> AerosolResult<()> {
        let species = [
            ("sulfate", self.sulfate),
            ("nitric_acid", self.nitric_acid),
            ("nitrate", self.nitrate),
            ("ammonia", self.ammonia),
            ("ammonium", self.ammonium),
        ];
        for (name, value) in species {
            if !value.is_finite() {
                return Err(AerosolError::InvalidInput(format!(
                    "{} concentration is not finite: {}",
                    name, value
                )));
            }
            if value < 0.0 {
                return Err(AerosolError::NegativeConcentration {
                    species: name.to_string(),
                    value,
                });
            }
        }
        if !(self.relative_humidity.is_finite() && self.relative_humidity >= 0.0) {
            return Err(AerosolError::InvalidInput(format!(
                "relative humidity must be finite and non-negative, got {}",
                self.relative_humidity
            )));
        }
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(AerosolError::InvalidInput(format!(
                "temperature must be positive, got {} K",
                self.temperature
            )));
        }
        Ok(())
    }

    /// NH3 + NH4 in umol/m3
    pub fn total_ammonia_umol(&self) -> FloatValue {
        ug_to_umol(self.ammonia, MW_NH3) + ug_to_umol(self.ammonium, MW_NH4)
    }

    /// HNO3 + NO3 in umol/m3
    pub fn total_nitrate_umol(&self) -> FloatValue {
        ug_to_umol(self.nitric_acid, MW_HNO3) + ug_to_umol(self.nitrate, MW_NO3)
    }

    pub fn total_sulfate_umol(&self) -> FloatValue {
        ug_to_umol(self.sulfate, MW_SO4)
    }
}

/// Partitioned state of one air parcel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumOutput {
    /// Aerosol sulfate, SO4-- (ug/m3)
    pub sulfate: FloatValue,
    /// Aerosol bisulfate as SO4-equivalent mass (ug/m3)
    pub bisulfate: FloatValue,
    /// Aerosol nitrate (ug/m3)
    pub nitrate: FloatValue,
    /// Aerosol ammonium (ug/m3)
    pub ammonium: FloatValue,
    /// Aerosol liquid water (ug/m3)
    pub water: FloatValue,
    /// Gas-phase ammonia (ug/m3)
    pub ammonia: FloatValue,
    /// Gas-phase nitric acid (ug/m3)
    pub nitric_acid: FloatValue,
    pub outcome: Outcome,
    pub regime: Regime,
}

impl EquilibriumOutput {
    /// Output for air too dry to partition: species pass through unchanged.
    pub(crate) fn pass_through(input: &EquilibriumInput, floor: FloatValue) -> Self {
        Self {
            sulfate: input.sulfate,
            bisulfate: floor,
            nitrate: input.nitrate,
            ammonium: input.ammonium,
            water: floor,
            ammonia: input.ammonia,
            nitric_acid: input.nitric_acid,
            outcome: Outcome::EarlyExit(ExitReason::LowHumidity),
            regime: Regime::Unpartitioned,
        }
    }

    /// NH3 + NH4 in umol/m3
    pub fn total_ammonia_umol(&self) -> FloatValue {
        ug_to_umol(self.ammonia, MW_NH3) + ug_to_umol(self.ammonium, MW_NH4)
    }

    /// HNO3 + NO3 in umol/m3
    pub fn total_nitrate_umol(&self) -> FloatValue {
        ug_to_umol(self.nitric_acid, MW_HNO3) + ug_to_umol(self.nitrate, MW_NO3)
    }

    /// SO4 + HSO4 in umol/m3
    pub fn total_sulfate_umol(&self) -> FloatValue {
        ug_to_umol(self.sulfate + self.bisulfate, MW_SO4)
    }

    /// Convert to the input of a following solve at new conditions
    pub fn to_input(
        &self,
        relative_humidity: FloatValue,
        temperature: FloatValue,
    ) -> EquilibriumInput {
        EquilibriumInput {
            sulfate: self.sulfate + self.bisulfate,
            nitric_acid: self.nitric_acid,
            nitrate: self.nitrate,
            ammonia: self.ammonia,
            ammonium: self.ammonium,
            relative_humidity,
            temperature,
        }
    }
}
