//! Multicomponent ionic activity coefficients
//!
//! Mean molal activity coefficients for the six cation/anion pairs of the
//! H+ / NH4+ / SO4-- / NO3- / HSO4- system, and the solution's osmotic
//! coefficient.
//!
//! # Method
//!
//! 1. Binary (single electrolyte) activity coefficients are evaluated at the
//!    ionic strength of the mixture with Pitzer's equations:
//!
//!    $$\ln\gamma^0_\pm = |z_+z_-| f^\gamma + m\frac{2\nu_+\nu_-}{\nu}B^\gamma + m^2\frac{2(\nu_+\nu_-)^{3/2}}{\nu}C^\gamma$$
//!
//! 2. The binary values are combined with Bromley's mixing rule, which weights
//!    each pair by the charge fraction of its counter-ions:
//!
//!    $$\ln\gamma_{ij} = z_iz_j f^\gamma + \frac{z_iz_j}{z_i+z_j}\left(\frac{F_i}{z_i} + \frac{F_j}{z_j}\right)$$
//!
//!    with $F_i = \sum_j Y_{ji}(\ln\gamma^0_{ij} - z_iz_jf^\gamma)$ and
//!    $Y_{ji} = \left(\frac{z_i+z_j}{2}\right)^2 m_j / I$.
//!
//! # References
//!
//! - Bromley, L.A. (1973) AIChE J. 19, 313-320.
//! - Pitzer, K.S. & Mayorga, G. (1973) J. Phys. Chem. 77, 2300-2308.
//! - Clegg, S.L. & Brimblecombe, P. (1990) J. Phys. Chem. 94, 5369-5380.
//! - Chan, C.K., Flagan, R.C. & Seinfeld, J.H. (1992) Atmos. Environ. 26A, 1661-1673.
//! - Pilinis, C. & Seinfeld, J.H. (1987) Atmos. Environ. 21, 2453-2466.
//! - Binkowski, F.S. & Shankar, U. (1995) J. Geophys. Res. 100, 26191-26209.

use rsmars_core::errors::{AerosolError, AerosolResult};
use rsmars_core::FloatValue;
use std::f64::consts::LN_10;
use tracing::warn;

/// Debye-Huckel slope for the osmotic coefficient at 298 K (kg^1/2 mol^-1/2)
const A_PHI: FloatValue = 0.392;
/// Pitzer's universal ion-size parameter b (kg^1/2 mol^-1/2)
const PITZER_B: FloatValue = 1.2;
/// Pitzer's alpha for 1-1 and 1-2 electrolytes
const PITZER_ALPHA: FloatValue = 2.0;

/// Largest log10(gamma) evaluated before clamping
const MAX_LOG10_GAMMA: FloatValue = 30.0;
/// Activity coefficient returned when log10(gamma) exceeds [`MAX_LOG10_GAMMA`]
const OVERFLOW_GAMMA: FloatValue = 1.0e30;

const CATION_CHARGES: [FloatValue; 2] = [1.0, 1.0];
const ANION_CHARGES: [FloatValue; 3] = [2.0, 1.0, 1.0];

/// Cations indexed in [`IonicComposition`] and [`ActivityCoefficients`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cation {
    Hydrogen = 0,
    Ammonium = 1,
}

/// Anions indexed in [`IonicComposition`] and [`ActivityCoefficients`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anion {
    Sulfate = 0,
    Nitrate = 1,
    Bisulfate = 2,
}

/// Pitzer parameters of a single electrolyte
#[derive(Debug, Clone, Copy)]
struct PitzerBinary {
    beta0: FloatValue,
    beta1: FloatValue,
    c_phi: FloatValue,
}

/// Binary parameters indexed `[cation][anion]`.
///
/// Rows: H+, NH4+. Columns: SO4--, NO3-, HSO4-.
static BINARY_PARAMETERS: [[PitzerBinary; 3]; 2] = [
    [
        // H2SO4 treated as a fully dissociated 1-2 electrolyte
        PitzerBinary {
            beta0: 0.0298,
            beta1: 0.0,
            c_phi: 0.0438,
        },
        // HNO3
        PitzerBinary {
            beta0: 0.1119,
            beta1: 0.3206,
            c_phi: 0.0010,
        },
        // H-HSO4
        PitzerBinary {
            beta0: 0.2065,
            beta1: 0.5556,
            c_phi: 0.0,
        },
    ],
    [
        // (NH4)2SO4
        PitzerBinary {
            beta0: 0.0409,
            beta1: 0.6585,
            c_phi: -0.00116,
        },
        // NH4NO3
        PitzerBinary {
            beta0: -0.0154,
            beta1: 0.1120,
            c_phi: -0.00003,
        },
        // NH4HSO4, as tabulated for the MARS-A activity routine
        // (Binkowski & Shankar, 1995)
        PitzerBinary {
            beta0: 0.004495,
            beta1: 0.23594,
            c_phi: -0.002962,
        },
    ],
];

/// Ion molalities (mol/kg water) of one aqueous solution
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IonicComposition {
    /// H+, NH4+
    pub cations: [FloatValue; 2],
    /// SO4--, NO3-, HSO4-
    pub anions: [FloatValue; 3],
}

impl IonicComposition {
    pub fn new(
        hydrogen: FloatValue,
        ammonium: FloatValue,
        sulfate: FloatValue,
        nitrate: FloatValue,
        bisulfate: FloatValue,
    ) -> Self {
        Self {
            cations: [hydrogen, ammonium],
            anions: [sulfate, nitrate, bisulfate],
        }
    }

    /// Ionic strength, $I = \frac{1}{2}\sum_i m_i z_i^2$
    pub fn ionic_strength(&self) -> FloatValue {
        let cations: FloatValue = self
            .cations
            .iter()
            .zip(CATION_CHARGES)
            .map(|(m, z)| m * z * z)
            .sum();
        let anions: FloatValue = self
            .anions
            .iter()
            .zip(ANION_CHARGES)
            .map(|(m, z)| m * z * z)
            .sum();
        0.5 * (cations + anions)
    }

    /// Sum of all ion molalities
    pub fn total_molality(&self) -> FloatValue {
        self.cations.iter().sum::<FloatValue>() + self.anions.iter().sum::<FloatValue>()
    }
}

/// Result of [`activity_coefficients`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityCoefficients {
    /// Mean molal activity coefficients indexed `[cation][anion]`
    pub gamma: [[FloatValue; 3]; 2],
    /// Ionic strength of the solution (mol/kg)
    pub ionic_strength: FloatValue,
    /// Total moles of ions per kg water
    pub total_ion_molality: FloatValue,
    /// Multicomponent practical osmotic coefficient
    pub osmotic_coefficient: FloatValue,
}

impl ActivityCoefficients {
    fn zero() -> Self {
        Self {
            gamma: [[0.0; 3]; 2],
            ionic_strength: 0.0,
            total_ion_molality: 0.0,
            osmotic_coefficient: 0.0,
        }
    }

    /// Mean activity coefficient of one cation/anion pair
    pub fn get(&self, cation: Cation, anion: Anion) -> FloatValue {
        self.gamma[cation as usize][anion as usize]
    }
}

/// Compute mean molal activity coefficients for every cation/anion pair.
///
/// A solution with zero ionic strength has no meaningful activity
/// coefficients; all-zero values are returned in that case.
///
/// # Errors
///
/// Returns [`AerosolError::NegativeIonicStrength`] if the molalities give a
/// negative ionic strength.
pub fn activity_coefficients(ions: &IonicComposition) -> AerosolResult<ActivityCoefficients> {
    let ionic_strength = ions.ionic_strength();

    if ionic_strength < 0.0 {
        return Err(AerosolError::NegativeIonicStrength(ionic_strength));
    }
    if ionic_strength == 0.0 {
        warn!("Ionic strength is zero, returning zero activity coefficients");
        return Ok(ActivityCoefficients::zero());
    }

    let sqrt_i = ionic_strength.sqrt();
    let f_gamma = -A_PHI
        * (sqrt_i / (1.0 + PITZER_B * sqrt_i)
            + (2.0 / PITZER_B) * (1.0 + PITZER_B * sqrt_i).ln());
    let f_phi = -A_PHI * sqrt_i / (1.0 + PITZER_B * sqrt_i);

    // Binary ln(gamma) and osmotic coefficients at the mixture ionic strength
    let mut ln_gamma0 = [[0.0; 3]; 2];
    let mut phi0 = [[0.0; 3]; 2];
    for (i, z_plus) in CATION_CHARGES.iter().enumerate() {
        for (j, z_minus) in ANION_CHARGES.iter().enumerate() {
            let (ln_g, phi) = binary_terms(
                &BINARY_PARAMETERS[i][j],
                *z_plus,
                *z_minus,
                ionic_strength,
                f_gamma,
                f_phi,
            );
            ln_gamma0[i][j] = ln_g;
            phi0[i][j] = phi;
        }
    }

    // Bromley mixing functions for each ion
    let mut f_cation = [0.0; 2];
    let mut f_anion = [0.0; 3];
    for (i, z_plus) in CATION_CHARGES.iter().enumerate() {
        for (j, z_minus) in ANION_CHARGES.iter().enumerate() {
            let weight = 0.25 * (z_plus + z_minus).powi(2) / ionic_strength;
            let excess = ln_gamma0[i][j] - z_plus * z_minus * f_gamma;
            f_cation[i] += weight * ions.anions[j] * excess;
            f_anion[j] += weight * ions.cations[i] * excess;
        }
    }

    let mut gamma = [[0.0; 3]; 2];
    for (i, z_plus) in CATION_CHARGES.iter().enumerate() {
        for (j, z_minus) in ANION_CHARGES.iter().enumerate() {
            let zz = z_plus * z_minus;
            let ln_gamma = zz * f_gamma
                + zz / (z_plus + z_minus) * (f_cation[i] / z_plus + f_anion[j] / z_minus);
            let log10_gamma = ln_gamma / LN_10;
            gamma[i][j] = if log10_gamma > MAX_LOG10_GAMMA {
                OVERFLOW_GAMMA
            } else {
                10.0_f64.powf(log10_gamma)
            };
        }
    }

    Ok(ActivityCoefficients {
        gamma,
        ionic_strength,
        total_ion_molality: ions.total_molality(),
        osmotic_coefficient: mixed_osmotic_coefficient(ions, &phi0),
    })
}

/// Pitzer ln(gamma) and osmotic coefficient of a single electrolyte whose
/// solution has ionic strength `ionic_strength`.
fn binary_terms(
    parameters: &PitzerBinary,
    z_plus: FloatValue,
    z_minus: FloatValue,
    ionic_strength: FloatValue,
    f_gamma: FloatValue,
    f_phi: FloatValue,
) -> (FloatValue, FloatValue) {
    // Stoichiometry of the neutral formula unit
    let nu_plus = z_minus;
    let nu_minus = z_plus;
    let nu = nu_plus + nu_minus;
    let zz = z_plus * z_minus;

    // Molality of the pure electrolyte with the same ionic strength
    let molality = 2.0 * ionic_strength / (zz * (z_plus + z_minus));

    let x = PITZER_ALPHA * ionic_strength.sqrt();
    let exp_x = (-x).exp();
    let b_gamma = 2.0 * parameters.beta0
        + 2.0 * parameters.beta1 / (x * x) * (1.0 - (1.0 + x - 0.5 * x * x) * exp_x);
    let b_phi = parameters.beta0 + parameters.beta1 * exp_x;

    let m_factor = 2.0 * nu_plus * nu_minus / nu;
    let m2_factor = 2.0 * (nu_plus * nu_minus).powf(1.5) / nu;

    let ln_gamma = zz * f_gamma
        + molality * m_factor * b_gamma
        + molality * molality * m2_factor * 1.5 * parameters.c_phi;
    let phi = 1.0
        + zz * f_phi
        + molality * m_factor * b_phi
        + molality * molality * m2_factor * parameters.c_phi;

    (ln_gamma, phi)
}

/// Binary osmotic coefficients weighted by the charge fractions of each pair.
fn mixed_osmotic_coefficient(ions: &IonicComposition, phi0: &[[FloatValue; 3]; 2]) -> FloatValue {
    let cation_charge: FloatValue = ions
        .cations
        .iter()
        .zip(CATION_CHARGES)
        .map(|(m, z)| m * z)
        .sum();
    let anion_charge: FloatValue = ions
        .anions
        .iter()
        .zip(ANION_CHARGES)
        .map(|(m, z)| m * z)
        .sum();

    if cation_charge <= 0.0 || anion_charge <= 0.0 {
        return 1.0;
    }

    let mut phi = 0.0;
    for i in 0..CATION_CHARGES.len() {
        for j in 0..ANION_CHARGES.len() {
            let weight = ions.cations[i] * CATION_CHARGES[i] * ions.anions[j] * ANION_CHARGES[j];
            phi += weight * phi0[i][j];
        }
    }
    phi / (cation_charge * anion_charge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_molalities_give_zero_coefficients() {
        let result = activity_coefficients(&IonicComposition::default()).unwrap();

        assert_eq!(result.ionic_strength, 0.0);
        assert_eq!(result.total_ion_molality, 0.0);
        for row in result.gamma {
            for g in row {
                assert_eq!(g, 0.0);
            }
        }
    }

    #[test]
    fn test_negative_ionic_strength_is_an_error() {
        let ions = IonicComposition::new(0.0, -2.0, 0.0, 0.0, 0.0);
        let result = activity_coefficients(&ions);
        assert!(matches!(result, Err(AerosolError::NegativeIonicStrength(_))));
    }

    #[test]
    fn test_ionic_strength_is_charge_weighted() {
        // (NH4)2SO4 at 1 mol/kg: I = 0.5 (2 * 1 + 1 * 4) = 3
        let ions = IonicComposition::new(0.0, 2.0, 1.0, 0.0, 0.0);
        assert_relative_eq!(ions.ionic_strength(), 3.0);
        assert_relative_eq!(ions.total_molality(), 3.0);
    }

    #[test]
    fn test_single_salt_recovers_binary_value() {
        // Pure NH4NO3: the mixing rule must reduce to the binary coefficient
        let m: FloatValue = 2.0;
        let ions = IonicComposition::new(0.0, m, 0.0, m, 0.0);
        let result = activity_coefficients(&ions).unwrap();

        let sqrt_i = m.sqrt();
        let f_gamma = -A_PHI
            * (sqrt_i / (1.0 + PITZER_B * sqrt_i)
                + (2.0 / PITZER_B) * (1.0 + PITZER_B * sqrt_i).ln());
        let f_phi = -A_PHI * sqrt_i / (1.0 + PITZER_B * sqrt_i);
        let (ln_g, phi) = binary_terms(&BINARY_PARAMETERS[1][1], 1.0, 1.0, m, f_gamma, f_phi);

        assert_relative_eq!(
            result.get(Cation::Ammonium, Anion::Nitrate),
            ln_g.exp(),
            max_relative = 1e-10
        );
        assert_relative_eq!(result.osmotic_coefficient, phi, max_relative = 1e-10);
    }

    #[test]
    fn test_single_two_one_salt_recovers_binary_value() {
        // Pure (NH4)2SO4 exercises the unequal-charge weights
        let ions = IonicComposition::new(0.0, 2.0, 1.0, 0.0, 0.0);
        let result = activity_coefficients(&ions).unwrap();

        let i = ions.ionic_strength();
        let sqrt_i = i.sqrt();
        let f_gamma = -A_PHI
            * (sqrt_i / (1.0 + PITZER_B * sqrt_i)
                + (2.0 / PITZER_B) * (1.0 + PITZER_B * sqrt_i).ln());
        let f_phi = -A_PHI * sqrt_i / (1.0 + PITZER_B * sqrt_i);
        let (ln_g, _) = binary_terms(&BINARY_PARAMETERS[1][0], 1.0, 2.0, i, f_gamma, f_phi);

        assert_relative_eq!(
            result.get(Cation::Ammonium, Anion::Sulfate),
            ln_g.exp(),
            max_relative = 1e-10
        );
    }

    #[test]
    fn test_ammonium_bisulfate_binary_value() {
        let ions = IonicComposition::new(0.0, 1.0, 0.0, 0.0, 1.0);
        let result = activity_coefficients(&ions).unwrap();

        assert_relative_eq!(
            result.get(Cation::Ammonium, Anion::Bisulfate),
            0.55613,
            max_relative = 1e-4
        );
        assert_relative_eq!(result.osmotic_coefficient, 0.85528, max_relative = 1e-4);
    }

    #[test]
    fn test_coefficients_physically_reasonable() {
        let ions = IonicComposition::new(0.5, 4.0, 1.5, 1.0, 0.5);
        let result = activity_coefficients(&ions).unwrap();

        for row in result.gamma {
            for g in row {
                assert!(g > 0.0 && g < 10.0, "gamma out of range: {}", g);
            }
        }
        assert!(result.osmotic_coefficient > 0.0);
        assert_relative_eq!(result.total_ion_molality, 7.5);
    }

    #[test]
    fn test_dilute_limit_approaches_unity() {
        let ions = IonicComposition::new(0.0, 1.0e-8, 0.0, 1.0e-8, 0.0);
        let result = activity_coefficients(&ions).unwrap();

        assert_relative_eq!(
            result.get(Cation::Ammonium, Anion::Nitrate),
            1.0,
            max_relative = 1e-3
        );
        assert_relative_eq!(result.osmotic_coefficient, 1.0, max_relative = 1e-3);
    }

    #[test]
    fn test_sulfate_gamma_decreases_with_concentration() {
        let dilute =
            activity_coefficients(&IonicComposition::new(0.0, 0.2, 0.1, 0.0, 0.0)).unwrap();
        let concentrated =
            activity_coefficients(&IonicComposition::new(0.0, 4.0, 2.0, 0.0, 0.0)).unwrap();

        assert!(
            concentrated.get(Cation::Ammonium, Anion::Sulfate)
                < dilute.get(Cation::Ammonium, Anion::Sulfate)
        );
    }
}
