//! Temperature-dependent equilibrium constants
//!
//! Aqueous constants follow the van't Hoff form integrated with a constant
//! heat capacity:
//!
//! $$K(T) = K_{298} \exp\left[a\left(\frac{298}{T} - 1\right) + b\left(1 + \ln\frac{298}{T} - \frac{298}{T}\right)\right]$$
//!
//! Gas-liquid constants are converted from atm to umol/m3 at the parcel
//! temperature so that they combine directly with the solver's amounts.

use crate::constants::GAS_CONSTANT_ATM;
use rsmars_core::FloatValue;

const REFERENCE_TEMPERATURE: FloatValue = 298.0;

/// Coefficients of one van't Hoff temperature dependence
#[derive(Debug, Clone, Copy)]
struct VantHoff {
    /// Value at 298 K
    k298: FloatValue,
    /// Enthalpy term, dH / (R T0)
    a: FloatValue,
    /// Heat capacity term, dCp / R
    b: FloatValue,
}

impl VantHoff {
    fn at(&self, t1: FloatValue) -> FloatValue {
        let t3 = t1 - 1.0;
        let t4 = 1.0 + t1.ln() - t1;
        self.k298 * (self.a * t3 + self.b * t4).exp()
    }
}

/// HNO3(g) <-> H+ + NO3-  (mol^2 kg^-2 atm^-1)
const NITRIC_ACID_DISSOLUTION: VantHoff = VantHoff {
    k298: 2.511e6,
    a: 29.17,
    b: 16.83,
};
/// NH3(aq) + H2O <-> NH4+ + OH-  (mol/kg)
const AMMONIA_DISSOCIATION: VantHoff = VantHoff {
    k298: 1.805e-5,
    a: -1.50,
    b: 26.92,
};
/// HSO4- <-> H+ + SO4--  (mol/kg)
const BISULFATE_DISSOCIATION: VantHoff = VantHoff {
    k298: 1.015e-2,
    a: 8.85,
    b: 25.14,
};
/// H2O <-> H+ + OH-  (mol^2 kg^-2)
const WATER_DISSOCIATION: VantHoff = VantHoff {
    k298: 1.010e-14,
    a: -22.52,
    b: 26.92,
};
/// NH3(g) <-> NH3(aq)  (mol kg^-1 atm^-1)
const AMMONIA_SOLUBILITY: VantHoff = VantHoff {
    k298: 57.639,
    a: 13.79,
    b: -5.39,
};

/// Mozurkewich (1993) fit for solid NH4NO3 <-> NH3(g) + HNO3(g)
const AMMONIUM_NITRATE_SOLID_A: FloatValue = 118.87;
const AMMONIUM_NITRATE_SOLID_B: FloatValue = 24084.0;
const AMMONIUM_NITRATE_SOLID_C: FloatValue = 6.025;

/// Equilibrium constants evaluated at one temperature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquilibriumConstants {
    /// HNO3(g) <-> H+ + NO3- (mol^2 kg^-2 per umol/m3)
    pub nitric_acid: FloatValue,
    /// HSO4- <-> H+ + SO4-- (mol/kg)
    pub bisulfate: FloatValue,
    /// NH3(g) + H+ <-> NH4+ (per umol/m3)
    pub ammonia: FloatValue,
    /// NH3(g) + HNO3(g) <-> NH4+ + NO3- in solution (mol^2 kg^-2 per (umol/m3)^2)
    pub ammonium_nitrate_aqueous: FloatValue,
    /// NH4NO3(s) <-> NH3(g) + HNO3(g) ((umol/m3)^2)
    pub ammonium_nitrate_solid: FloatValue,
}

impl EquilibriumConstants {
    /// Evaluate every constant at `temperature` (K).
    ///
    /// The caller is responsible for `temperature > 0`.
    pub fn at_temperature(temperature: FloatValue) -> Self {
        let t1 = REFERENCE_TEMPERATURE / temperature;
        // atm per umol/m3
        let atm_per_umol = GAS_CONSTANT_ATM * 1.0e-9 * temperature;

        let nitric_acid = NITRIC_ACID_DISSOLUTION.at(t1) * atm_per_umol;
        let bisulfate = BISULFATE_DISSOCIATION.at(t1);
        let ammonia = AMMONIA_SOLUBILITY.at(t1) * atm_per_umol * AMMONIA_DISSOCIATION.at(t1)
            / WATER_DISSOCIATION.at(t1);

        // Fit is in ppb^2, and 1 ppb is 1 / (R T) umol/m3
        let umol_per_ppb = 1.0 / (GAS_CONSTANT_ATM * temperature);
        let ammonium_nitrate_solid = (AMMONIUM_NITRATE_SOLID_A
            - AMMONIUM_NITRATE_SOLID_B / temperature
            - AMMONIUM_NITRATE_SOLID_C * temperature.ln())
        .exp()
            * umol_per_ppb
            * umol_per_ppb;

        Self {
            nitric_acid,
            bisulfate,
            ammonia,
            ammonium_nitrate_aqueous: nitric_acid * ammonia,
            ammonium_nitrate_solid,
        }
    }
}
