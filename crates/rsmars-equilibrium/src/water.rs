//! Aerosol liquid water content
//!
//! Water associated with a sulfate/nitrate/ammonium aerosol at a given
//! relative humidity, from the Zdanovskii-Stokes-Robinson (ZSR) mixing rule
//! over binary solution data.
//!
//! The molar NH4/SO4 ratio `X` selects the reference solutions:
//!
//! | X           | Reference solutions                          |
//! |-------------|----------------------------------------------|
//! | < 1         | H2SO4 and NH4HSO4                            |
//! | 1 to 1.5    | NH4HSO4 and letovicite, (NH4)3H(SO4)2        |
//! | 1.5 to 2    | letovicite and (NH4)2SO4                     |
//! | >= 2        | (NH4)2SO4 and NH4NO3, summed independently   |
//!
//! Each reference solution is described by its mass fraction of solute as a
//! polynomial in water activity, which is taken to equal RH.
//!
//! # References
//!
//! - Tang, I.N. & Munkelwitz, H.R. (1994) J. Geophys. Res. 99, 18801-18808.
//! - Nair, P.V.N. & Vohra, K.G. (1975) J. Aerosol Sci. 6, 265-271.
//! - Spann, J.F. & Richardson, C. (1985) Atmos. Environ. 19, 819-825.

use crate::constants::{MW_AMMONIUM_NITRATE, MW_AMMONIUM_SULFATE, MW_NH4, MW_SO4};
use rsmars_core::utils::polynomial::horner;
use rsmars_core::FloatValue;

/// Mass fraction of solute in H2SO4 solutions
const SULFURIC_ACID: [FloatValue; 4] = [0.798079, -1.574367, 2.536686, -1.735297];
/// Mass fraction of solute in NH4HSO4 solutions
const AMMONIUM_BISULFATE: [FloatValue; 4] = [0.9995178, -0.7952896, 0.99683673, -1.143874];
/// Mass fraction of solute in (NH4)3H(SO4)2 solutions
const LETOVICITE: [FloatValue; 4] = [1.697092, -4.045936, 5.833688, -3.463783];
/// Mass fraction of solute in (NH4)2SO4 solutions, used below full neutralisation
const AMMONIUM_SULFATE: [FloatValue; 4] = [2.085067, -6.024139, 8.967967, -5.002934];

/// Mass fraction of solute in NH4NO3 solutions (Tang & Munkelwitz, 1994)
const AMMONIUM_NITRATE_TANG: [FloatValue; 6] =
    [0.2906, 6.83665, -26.9093, 46.6983, -38.803, 11.8837];
/// Mass fraction of solute in (NH4)2SO4 solutions (Tang & Munkelwitz, 1994)
const AMMONIUM_SULFATE_TANG: [FloatValue; 6] =
    [2.27515, -11.147, 36.3369, -64.2134, 56.8341, -20.0953];

/// Humidity below which partially neutralised solutions are treated as dry (%)
const DELIQUESCENCE_PERCENT: u8 = 40;
const DELIQUESCENCE_ACTIVITY: FloatValue = 0.4;

/// Slope of the crystallisation activity with ammonium ratio above 1
const CRYSTALLISATION_SLOPE: FloatValue = 0.8;

/// Ammonium ratio used when there is no sulfate but nitrate and ammonium exist
const SULFATE_FREE_RATIO: FloatValue = 10.0;

/// Integer relative humidity in percent.
///
/// The water model is tabulated on integer humidity, so the solver rounds
/// RH once and carries this value through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HumidityIndex(u8);

impl HumidityIndex {
    /// Clamp an integer percentage to `[1, 100]`
    pub fn new(percent: i64) -> Self {
        Self(percent.clamp(1, 100) as u8)
    }

    /// Round a humidity fraction (0-1) to the nearest percent in `[1, 99]`
    pub fn from_fraction(relative_humidity: FloatValue) -> Self {
        let percent = (100.0 * relative_humidity).round();
        Self(percent.clamp(1.0, 99.0) as u8)
    }

    pub fn percent(&self) -> u8 {
        self.0
    }

    /// Water activity, assumed equal to RH
    pub fn water_activity(&self) -> FloatValue {
        FloatValue::from(self.0) / 100.0
    }

    fn is_deliquescent(&self) -> bool {
        self.0 >= DELIQUESCENCE_PERCENT
    }
}

/// Mass of water per mass of solute for a reference solution at `activity`
fn water_per_solute(coefficients: &[FloatValue], activity: FloatValue) -> FloatValue {
    let solute_fraction = horner(coefficients, activity);
    (1.0 - solute_fraction) / solute_fraction
}

/// Aerosol water content (ug/m3).
///
/// # Arguments
/// * `humidity` - Relative humidity
/// * `sulfate` - Total sulfate (umol/m3)
/// * `ammonium` - Aerosol ammonium (umol/m3)
/// * `nitrate` - Aerosol nitrate (umol/m3)
///
/// Negative amounts are treated as zero. The result is non-negative and is
/// zero when the aerosol is below its deliquescence or crystallisation point.
pub fn water_content(
    humidity: HumidityIndex,
    sulfate: FloatValue,
    ammonium: FloatValue,
    nitrate: FloatValue,
) -> FloatValue {
    let sulfate = sulfate.max(0.0);
    let ammonium = ammonium.max(0.0);
    let nitrate = nitrate.max(0.0);
    let aw = humidity.water_activity();

    let ratio = if sulfate > 0.0 {
        ammonium / sulfate
    } else if nitrate > 0.0 && ammonium > 0.0 {
        SULFATE_FREE_RATIO
    } else {
        0.0
    };

    if ratio >= 2.0 {
        if !humidity.is_deliquescent() {
            return 0.0;
        }
        let sulfate_water = water_per_solute(&AMMONIUM_SULFATE_TANG, aw);
        let nitrate_water = water_per_solute(&AMMONIUM_NITRATE_TANG, aw);
        return sulfate_water * sulfate * MW_AMMONIUM_SULFATE
            + nitrate_water * nitrate * MW_AMMONIUM_NITRATE;
    }

    let water_per_mass = if ratio < 1.0 {
        (1.0 - ratio) * water_per_solute(&SULFURIC_ACID, aw)
            + ratio * water_per_solute(&AMMONIUM_BISULFATE, aw)
    } else if ratio < 1.5 {
        bisulfate_letovicite_water(humidity, ratio)
    } else if humidity.is_deliquescent() {
        2.0 * (water_per_solute(&LETOVICITE, aw) * (2.0 - ratio)
            + water_per_solute(&AMMONIUM_SULFATE, aw) * (ratio - 1.5))
    } else {
        0.0
    };

    water_per_mass * (sulfate * MW_SO4 + ammonium * MW_NH4)
}

/// Water per solute mass for 1 <= ratio < 1.5.
///
/// Below deliquescence the solution holds water down to a crystallisation
/// activity of `0.8 (ratio - 1)`, interpolating linearly from the value at
/// 40 % RH.
fn bisulfate_letovicite_water(humidity: HumidityIndex, ratio: FloatValue) -> FloatValue {
    let mix = |aw: FloatValue| {
        2.0 * (water_per_solute(&AMMONIUM_BISULFATE, aw) * (1.5 - ratio)
            + water_per_solute(&LETOVICITE, aw) * (ratio - 1.0))
    };

    let aw = humidity.water_activity();
    if humidity.is_deliquescent() {
        return mix(aw);
    }

    let crystallisation = CRYSTALLISATION_SLOPE * (ratio - 1.0);
    if aw < crystallisation {
        return 0.0;
    }

    let at_deliquescence = mix(DELIQUESCENCE_ACTIVITY);
    let at_crystallisation =
        2.0 * water_per_solute(&LETOVICITE, DELIQUESCENCE_ACTIVITY) * (ratio - 1.0);
    at_deliquescence
        - (at_deliquescence - at_crystallisation) * (DELIQUESCENCE_ACTIVITY - aw)
            / (DELIQUESCENCE_ACTIVITY - crystallisation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rh(percent: i64) -> HumidityIndex {
        HumidityIndex::new(percent)
    }

    // ===== Humidity index =====

    #[test]
    fn test_humidity_rounding_and_clamping() {
        assert_eq!(HumidityIndex::from_fraction(0.456).percent(), 46);
        assert_eq!(HumidityIndex::from_fraction(0.454).percent(), 45);
        assert_eq!(HumidityIndex::from_fraction(0.001).percent(), 1);
        assert_eq!(HumidityIndex::from_fraction(1.0).percent(), 99);
        assert_eq!(HumidityIndex::new(150).percent(), 100);
        assert_eq!(HumidityIndex::new(-3).percent(), 1);
    }

    // ===== Basic behaviour =====

    #[test]
    fn test_no_solute_gives_no_water() {
        assert_eq!(water_content(rh(80), 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_negative_inputs_treated_as_zero() {
        assert_eq!(
            water_content(rh(80), 1.0, -2.0, -0.5),
            water_content(rh(80), 1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_known_values() {
        assert_relative_eq!(
            water_content(rh(60), 1.0, 2.5, 0.5),
            105.85,
            max_relative = 1e-3
        );
        assert_relative_eq!(
            water_content(rh(60), 0.0, 1.0, 1.0),
            36.42,
            max_relative = 1e-3
        );
    }

    #[test]
    fn test_neutralised_aerosol_dry_below_deliquescence() {
        assert_eq!(water_content(rh(30), 1.0, 2.5, 0.5), 0.0);
        assert_eq!(water_content(rh(39), 1.0, 1.7, 0.0), 0.0);
    }

    #[test]
    fn test_acidic_aerosol_holds_water_at_low_humidity() {
        assert!(water_content(rh(10), 1.0, 0.0, 0.0) > 0.0);
        assert!(water_content(rh(10), 1.0, 0.5, 0.0) > 0.0);
    }

    #[test]
    fn test_water_non_negative_across_grid() {
        for percent in 1..=99 {
            for ratio in [0.0, 0.3, 0.9, 1.0, 1.2, 1.49, 1.5, 1.8, 1.99, 2.0, 3.0] {
                let water = water_content(rh(percent), 1.0, ratio, 0.2);
                assert!(
                    water >= 0.0 && water.is_finite(),
                    "rh {} ratio {} water {}",
                    percent,
                    ratio,
                    water
                );
            }
        }
    }

    #[test]
    fn test_water_increases_with_humidity() {
        let mut previous = 0.0;
        for percent in 40..=99 {
            let water = water_content(rh(percent), 1.0, 2.0, 0.5);
            assert!(water > previous, "not increasing at {}%", percent);
            previous = water;
        }
    }

    #[test]
    fn test_water_scales_with_loading() {
        let single = water_content(rh(70), 1.0, 1.2, 0.0);
        let double = water_content(rh(70), 2.0, 2.4, 0.0);
        assert_relative_eq!(double, 2.0 * single, max_relative = 1e-12);
    }

    // ===== Continuity across regime boundaries =====

    #[test]
    fn test_continuous_at_ratio_one() {
        for percent in [40, 60, 80, 95] {
            let below = water_content(rh(percent), 1.0, 1.0 - 1e-9, 0.0);
            let at = water_content(rh(percent), 1.0, 1.0, 0.0);
            assert_relative_eq!(below, at, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_continuous_at_ratio_one_and_a_half() {
        for percent in [40, 60, 80, 95] {
            let below = water_content(rh(percent), 1.0, 1.5 - 1e-9, 0.0);
            let at = water_content(rh(percent), 1.0, 1.5, 0.0);
            assert_relative_eq!(below, at, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_approximately_continuous_at_full_neutralisation() {
        // Different reference data are used either side of X = 2
        for percent in [40, 50, 60, 70, 80, 90] {
            let below = water_content(rh(percent), 1.0, 2.0 - 1e-9, 0.0);
            let at = water_content(rh(percent), 1.0, 2.0, 0.0);
            assert_relative_eq!(below, at, max_relative = 0.15);
        }
    }

    #[test]
    fn test_low_humidity_interpolation_meets_deliquescence_value() {
        let ratio = 1.25;
        let below = water_content(rh(39), 1.0, ratio, 0.0);
        let at = water_content(rh(40), 1.0, ratio, 0.0);
        assert_relative_eq!(below, at, max_relative = 0.05);
    }

    #[test]
    fn test_low_humidity_continuous_at_ratio_one() {
        let below = water_content(rh(20), 1.0, 1.0 - 1e-9, 0.0);
        let at = water_content(rh(20), 1.0, 1.0, 0.0);
        assert_relative_eq!(below, at, max_relative = 0.05);
    }

    #[test]
    fn test_crystallised_below_critical_activity() {
        // Crystallisation activity is 0.8 * (1.4 - 1) = 0.32
        assert_eq!(water_content(rh(31), 1.0, 1.4, 0.0), 0.0);
        assert!(water_content(rh(33), 1.0, 1.4, 0.0) > 0.0);
    }
}
