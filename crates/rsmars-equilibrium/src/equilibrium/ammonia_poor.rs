//! Ammonia-poor regime (NH4/SO4 <= 2)
//!
//! Sulfate is only partly neutralised, so the solution is acidic and
//! bisulfate dissociation controls H+. All ammonia is taken into the
//! aerosol; nitrate dissolves as HNO3 in proportion to the available water.
//!
//! # Method
//!
//! With molalities $m_N$ (ammonium), $m_S$ (total sulfate) and $m_{NO3}$
//! (total nitrate), the bisulfate constant $R_1 = K_{HSO4}\gamma^2_{HHSO4}/\gamma^3_{H2SO4}$
//! and the nitric-acid constant $C_2 = K_{HNO3} W / \gamma^2_{HNO3}$, charge
//! balance gives a cubic in H+:
//!
//! $$H^3 + a_2H^2 + a_1H + a_0 = 0$$
//!
//! with
//!
//! - $a_2 = R_1 + C_2 + m_N - m_S$
//! - $a_1 = R_1C_2 + m_N(R_1 + C_2) - m_S(C_2 + 2R_1) - m_{NO3}C_2$
//! - $a_0 = R_1C_2(m_N - 2m_S - m_{NO3})$
//!
//! The smallest positive root fixes sulfate, bisulfate and dissolved nitrate.
//! Water and activity coefficients are then refreshed and the cycle repeats
//! until $(\gamma_{HHSO4}/\gamma_{NH4HSO4})^2$ settles.
//!
//! # Gas-phase ammonia
//!
//! On convergence a small amount of NH3 is returned to the gas phase from
//! $NH_3 = NH_4^+ / (H^+ K_{NH3} \hat\gamma)$, capped at the total ammonia.

use super::outcome::{Degeneracy, ExitReason, Outcome};
use super::state::{BranchResult, Conditions, Partition, Totals};
use crate::activity::{activity_coefficients, Anion, Cation, IonicComposition};
use crate::constants::WATER_MOLALITY_SCALE;
use crate::water::water_content;
use rsmars_core::errors::AerosolResult;
use rsmars_core::utils::roots::{solve_cubic, NEGATIVE_ROOT_SENTINEL};
use rsmars_core::FloatValue;
use tracing::{debug, trace, warn};

/// All sulfate as bisulfate, all ammonia in the aerosol, nitrate unchanged
fn acidic_partition(totals: &Totals, water: FloatValue) -> Partition {
    Partition {
        sulfate: 0.0,
        bisulfate: totals.sulfate,
        nitrate: totals.initial_nitrate,
        ammonium: totals.ammonia,
        ammonia: 0.0,
        nitric_acid: totals.initial_nitric_acid,
        water,
    }
}

fn fallback(totals: &Totals, water: FloatValue, reason: Degeneracy) -> BranchResult {
    warn!(?reason, "Ammonia-poor solve degenerate; returning acidic partition");
    BranchResult::new(
        Outcome::DegenerateFallback(reason),
        acidic_partition(totals, water),
    )
}

/// Smallest positive root of the H+ cubic
fn hydrogen_ion(a2: FloatValue, a1: FloatValue, a0: FloatValue) -> Result<FloatValue, Degeneracy> {
    let hydrogen = solve_cubic(a2, a1, a0)
        .map_err(|_| Degeneracy::DegenerateCubic)?
        .smallest();
    if hydrogen.is_finite() && hydrogen > 0.0 && hydrogen < NEGATIVE_ROOT_SENTINEL {
        Ok(hydrogen)
    } else {
        Err(Degeneracy::NoPhysicalRoot)
    }
}

fn early_exit(totals: &Totals, water: FloatValue, reason: ExitReason) -> BranchResult {
    debug!(?reason, "Ammonia-poor solve skipped");
    BranchResult::new(Outcome::EarlyExit(reason), acidic_partition(totals, water))
}

/// Activity coefficients carried between iterations
#[derive(Debug, Clone, Copy)]
struct Coefficients {
    /// H-NO3
    nitric_acid: FloatValue,
    /// H-SO4
    sulfuric_acid: FloatValue,
    /// H-HSO4
    hydrogen_bisulfate: FloatValue,
    /// NH4-HSO4
    ammonium_bisulfate: FloatValue,
}

pub(crate) fn solve(conditions: &Conditions) -> AerosolResult<BranchResult> {
    let totals = &conditions.totals;
    let params = conditions.parameters;
    let constants = &conditions.constants;

    let mut water = water_content(
        conditions.humidity,
        totals.sulfate,
        totals.ammonia,
        totals.initial_nitrate,
    );

    if totals.ammonium_ratio() < params.strongly_acidic_ratio {
        return Ok(early_exit(totals, water, ExitReason::StronglyAcidic));
    }
    let mut kg_water = WATER_MOLALITY_SCALE * water;
    if kg_water <= 0.0 {
        return Ok(early_exit(totals, water, ExitReason::NoLiquidWater));
    }
    if totals.sulfate / kg_water > params.max_sulfate_molality {
        return Ok(early_exit(totals, water, ExitReason::ConcentratedSulfate));
    }

    let initial = params.initial_activity_coefficient;
    let mut gamma = Coefficients {
        nitric_acid: initial,
        sulfuric_acid: initial,
        hydrogen_bisulfate: initial,
        ammonium_bisulfate: initial,
    };
    let mut previous_ratio = 1.0;

    for iteration in 1..=params.max_iterations {
        let rr1 = constants.bisulfate * gamma.hydrogen_bisulfate.powi(2)
            / gamma.sulfuric_acid.powi(3);
        let c2 = constants.nitric_acid / gamma.nitric_acid.powi(2) * kg_water;

        let ammonium = totals.ammonia / kg_water;
        let sulfate = totals.sulfate / kg_water;
        let nitrate = totals.nitrate / kg_water;

        let a2 = rr1 + c2 + ammonium - sulfate;
        let a1 = rr1 * c2 + ammonium * (rr1 + c2) - sulfate * (c2 + 2.0 * rr1) - nitrate * c2;
        let a0 = rr1 * c2 * (ammonium - 2.0 * sulfate - nitrate);

        let hydrogen = match hydrogen_ion(a2, a1, a0) {
            Ok(hydrogen) => hydrogen,
            Err(reason) => return Ok(fallback(totals, water, reason)),
        };

        let bisulfate = sulfate * hydrogen / (hydrogen + rr1);
        let sulfate_ion = sulfate * rr1 / (hydrogen + rr1);
        let nitrate_ion = nitrate * c2 / (hydrogen + c2);
        let dissolved_nitrate = nitrate_ion * kg_water;

        // Refresh water with the new nitrate and rescale the molalities
        water = water_content(
            conditions.humidity,
            totals.sulfate,
            totals.ammonia,
            dissolved_nitrate,
        );
        let new_kg_water = WATER_MOLALITY_SCALE * water;
        if new_kg_water <= 0.0 {
            return Ok(fallback(totals, water, Degeneracy::NoLiquidWater));
        }
        let scale = kg_water / new_kg_water;
        kg_water = new_kg_water;

        let ions = IonicComposition::new(
            hydrogen * scale,
            totals.ammonia / kg_water,
            sulfate_ion * scale,
            nitrate_ion * scale,
            bisulfate * scale,
        );
        let activity = activity_coefficients(&ions)?;
        if activity.ionic_strength == 0.0 {
            return Ok(fallback(totals, water, Degeneracy::ZeroIonicStrength));
        }

        gamma = Coefficients {
            nitric_acid: activity.get(Cation::Hydrogen, Anion::Nitrate),
            sulfuric_acid: activity.get(Cation::Hydrogen, Anion::Sulfate),
            hydrogen_bisulfate: activity.get(Cation::Hydrogen, Anion::Bisulfate),
            ammonium_bisulfate: activity.get(Cation::Ammonium, Anion::Bisulfate),
        };
        let ratio = (gamma.hydrogen_bisulfate / gamma.ammonium_bisulfate).powi(2);
        let change = ((previous_ratio - ratio) / previous_ratio).abs();
        previous_ratio = ratio;

        trace!(
            iteration,
            hydrogen,
            ratio,
            change,
            ionic_strength = activity.ionic_strength,
            "Ammonia-poor iteration"
        );

        if change <= params.ammonia_poor_tolerance {
            let h = ions.cations[Cation::Hydrogen as usize];
            let nh4 = ions.cations[Cation::Ammonium as usize];
            let gas_ammonia = (nh4 / (h * constants.ammonia * ratio)).min(totals.ammonia);

            let partition = Partition {
                sulfate: ions.anions[Anion::Sulfate as usize] * kg_water,
                bisulfate: ions.anions[Anion::Bisulfate as usize] * kg_water,
                nitrate: dissolved_nitrate,
                ammonium: totals.ammonia - gas_ammonia,
                ammonia: gas_ammonia,
                nitric_acid: totals.nitrate - dissolved_nitrate,
                water,
            };
            return Ok(BranchResult::new(
                Outcome::Converged {
                    iterations: iteration,
                },
                partition,
            ));
        }
    }

    warn!(
        max_iterations = params.max_iterations,
        ratio = previous_ratio,
        "Ammonia-poor iteration did not converge; returning acidic partition"
    );
    Ok(BranchResult::new(
        Outcome::IterationLimitFallback,
        acidic_partition(totals, water),
    ))
}
