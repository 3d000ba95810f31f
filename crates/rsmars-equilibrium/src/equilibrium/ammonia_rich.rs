//! Ammonia-rich regime (NH4/SO4 > 2)
//!
//! Sulfate is fully neutralised as (NH4)2SO4 and the remaining "free"
//! ammonia competes with nitric acid for ammonium nitrate.
//!
//! # Dry aerosol
//!
//! When the water mass fraction of the neutralised aerosol is small, nitrate
//! follows the solid NH4NO3 dissociation constant $K_p$:
//!
//! $$(T_{NO3} - x)(F_{NH3} - x) = K_p$$
//!
//! # Aqueous aerosol
//!
//! Otherwise dissolved NH4NO3 ($x$) satisfies
//!
//! $$\frac{(2T_{SO4} + x)\,x}{(T_{NO3} - x)(F_{NH3} - x)} = K_{AN}\frac{W^2}{\gamma^2_{NH4NO3}}$$
//!
//! which is solved as a quadratic in $x$ and iterated with the water content
//! $W$ and activity coefficient $\gamma_{NH4NO3}$ until $\gamma$ settles.

use super::outcome::{Degeneracy, ExitReason, Outcome};
use super::state::{BranchResult, Conditions, Partition, Totals};
use crate::activity::{activity_coefficients, Anion, Cation, IonicComposition};
use crate::constants::{MW_NH4, MW_SO4, WATER_MOLALITY_SCALE};
use crate::water::water_content;
use rsmars_core::errors::AerosolResult;
use rsmars_core::utils::roots::solve_quadratic;
use rsmars_core::FloatValue;
use tracing::{trace, warn};

pub(crate) fn solve(conditions: &Conditions) -> AerosolResult<BranchResult> {
    let totals = &conditions.totals;
    let neutralised = 2.0 * totals.sulfate;

    let water = water_content(
        conditions.humidity,
        totals.sulfate,
        neutralised,
        totals.nitrate,
    );
    let dry_mass = totals.sulfate * MW_SO4 + neutralised * MW_NH4;
    let water_fraction = if dry_mass + water > 0.0 {
        water / (dry_mass + water)
    } else {
        0.0
    };

    if water_fraction < conditions.parameters.dry_water_fraction {
        Ok(solve_dry(conditions, water))
    } else {
        solve_aqueous(conditions, water)
    }
}

/// Fully neutralised sulfate with nitrate left at its input partition
fn neutralised_partition(totals: &Totals, water: FloatValue) -> Partition {
    Partition {
        sulfate: totals.sulfate,
        bisulfate: 0.0,
        nitrate: totals.initial_nitrate,
        ammonium: 2.0 * totals.sulfate,
        ammonia: totals.ammonia - 2.0 * totals.sulfate,
        nitric_acid: totals.initial_nitric_acid,
        water,
    }
}

/// Partition with `dissolved` umol/m3 of NH4NO3 in the aerosol
fn nitrate_partition(totals: &Totals, dissolved: FloatValue, water: FloatValue) -> Partition {
    let neutralised = 2.0 * totals.sulfate;
    Partition {
        sulfate: totals.sulfate,
        bisulfate: 0.0,
        nitrate: dissolved,
        ammonium: neutralised + dissolved,
        ammonia: totals.ammonia - neutralised - dissolved,
        nitric_acid: totals.nitrate - dissolved,
        water,
    }
}

fn fallback(totals: &Totals, water: FloatValue, reason: Degeneracy) -> BranchResult {
    warn!(?reason, "Ammonia-rich solve degenerate; keeping input nitrate partition");
    BranchResult::new(
        Outcome::DegenerateFallback(reason),
        neutralised_partition(totals, water),
    )
}

fn solve_dry(conditions: &Conditions, water: FloatValue) -> BranchResult {
    let totals = &conditions.totals;
    let free_ammonia = totals.ammonia - 2.0 * totals.sulfate;
    let excess = totals.nitrate * free_ammonia - conditions.constants.ammonium_nitrate_solid;

    let dissolved = if excess <= 0.0 {
        0.0
    } else {
        match solve_quadratic(1.0, -(totals.nitrate + free_ammonia), excess) {
            Some(roots) => roots.smallest_non_negative().unwrap_or(0.0),
            None => return fallback(totals, water, Degeneracy::NegativeDiscriminant),
        }
    };

    BranchResult::new(
        Outcome::EarlyExit(ExitReason::LowWaterFraction),
        nitrate_partition(totals, dissolved, water),
    )
}

fn solve_aqueous(
    conditions: &Conditions,
    initial_water: FloatValue,
) -> AerosolResult<BranchResult> {
    let totals = &conditions.totals;
    let params = conditions.parameters;
    let neutralised = 2.0 * totals.sulfate;
    let free_ammonia = totals.ammonia - neutralised;
    let max_dissolved = totals.nitrate.min(free_ammonia);

    let mut gamma = params.initial_activity_coefficient;
    let mut previous_gamma = gamma;
    let mut water = initial_water;
    let mut kg_water = WATER_MOLALITY_SCALE * water;

    for iteration in 1..=params.max_iterations {
        let k3 = conditions.constants.ammonium_nitrate_aqueous * kg_water * kg_water
            / (gamma * gamma);

        let roots = match solve_quadratic(
            1.0 - k3,
            neutralised + k3 * (totals.nitrate + free_ammonia),
            -k3 * totals.nitrate * free_ammonia,
        ) {
            Some(roots) => roots,
            None => return Ok(fallback(totals, water, Degeneracy::NegativeDiscriminant)),
        };
        let dissolved = roots
            .smallest_non_negative()
            .unwrap_or(0.0)
            .min(max_dissolved);

        let ammonium = neutralised + dissolved;
        water = water_content(conditions.humidity, totals.sulfate, ammonium, dissolved);
        kg_water = WATER_MOLALITY_SCALE * water;
        if kg_water <= 0.0 {
            return Ok(fallback(totals, water, Degeneracy::NoLiquidWater));
        }

        let ions = IonicComposition::new(
            0.0,
            ammonium / kg_water,
            totals.sulfate / kg_water,
            dissolved / kg_water,
            0.0,
        );
        let activity = activity_coefficients(&ions)?;
        if activity.ionic_strength == 0.0 {
            return Ok(fallback(totals, water, Degeneracy::ZeroIonicStrength));
        }

        gamma = activity.get(Cation::Ammonium, Anion::Nitrate);
        let change = ((previous_gamma - gamma) / previous_gamma).abs();
        previous_gamma = gamma;

        trace!(
            iteration,
            dissolved,
            gamma,
            change,
            ionic_strength = activity.ionic_strength,
            "Ammonia-rich iteration"
        );

        if change <= params.ammonia_rich_tolerance {
            return Ok(BranchResult::new(
                Outcome::Converged {
                    iterations: iteration,
                },
                nitrate_partition(totals, dissolved, water),
            ));
        }
    }

    warn!(
        max_iterations = params.max_iterations,
        gamma, "Ammonia-rich iteration did not converge; keeping input nitrate partition"
    );
    Ok(BranchResult::new(
        Outcome::IterationLimitFallback,
        neutralised_partition(totals, water),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fallback_conserves_totals() {
        let totals = Totals {
            sulfate: 1.0,
            nitrate: 0.9,
            ammonia: 4.5,
            initial_nitrate: 0.4,
            initial_nitric_acid: 0.5,
        };
        let result = fallback(&totals, 3.0, Degeneracy::NegativeDiscriminant);
        let partition = result.partition;

        assert_eq!(
            result.outcome,
            Outcome::DegenerateFallback(Degeneracy::NegativeDiscriminant)
        );
        assert_eq!(partition.sulfate, totals.sulfate);
        assert_eq!(partition.bisulfate, 0.0);
        assert_eq!(partition.ammonium, 2.0);
        assert_relative_eq!(
            partition.ammonium + partition.ammonia,
            totals.ammonia,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            partition.nitrate + partition.nitric_acid,
            totals.nitrate,
            max_relative = 1e-12
        );
    }
}
