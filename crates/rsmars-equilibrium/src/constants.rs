//! Physical constants shared by the equilibrium modules
//!
//! Molecular weights are in g/mol. Amounts inside the solver are umol/m3,
//! so multiplying by a molecular weight gives ug/m3.

use rsmars_core::FloatValue;

// === Molecular weights (g/mol) ===

/// Sulfate ion, SO4--
pub const MW_SO4: FloatValue = 96.0576;
/// Nitrate ion, NO3-
pub const MW_NO3: FloatValue = 62.0049;
/// Nitric acid, HNO3
pub const MW_HNO3: FloatValue = 63.01287;
/// Ammonia, NH3
pub const MW_NH3: FloatValue = 17.03061;
/// Ammonium ion, NH4+
pub const MW_NH4: FloatValue = 18.03858;
/// Ammonium sulfate, (NH4)2SO4
pub const MW_AMMONIUM_SULFATE: FloatValue = MW_SO4 + 2.0 * MW_NH4;
/// Ammonium nitrate, NH4NO3
pub const MW_AMMONIUM_NITRATE: FloatValue = MW_NO3 + MW_NH4;

// === Thresholds ===

/// Total sulfate below which a parcel counts as sulfate-free (umol/m3)
pub const MIN_SULFATE: FloatValue = 1.0e-6 / MW_SO4;
/// Total nitrate below which a parcel counts as nitrate-free (umol/m3)
pub const MIN_NITRATE: FloatValue = 1.0e-6 / MW_NO3;

/// Molar NH4/SO4 ratio at which sulfate is fully neutralised
pub const NEUTRAL_AMMONIUM_SULFATE_RATIO: FloatValue = 2.0;

// === Unit scales ===

/// Scale from water in ug/m3 to the basis where (umol/m3) / water is mol/kg
pub const WATER_MOLALITY_SCALE: FloatValue = 1.0e-3;

/// Gas constant in L atm / (mol K), as used for the atmosphere conversions
pub const GAS_CONSTANT_ATM: FloatValue = 0.082;
