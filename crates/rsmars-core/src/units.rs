//! Unit conversions between transported tracer amounts and solver units
//!
//! Transport models carry tracer mass per grid box (kg). The equilibrium
//! solver works in mass concentration (ug/m3) at its interface and in molar
//! concentration (umol/m3) internally.

use crate::errors::{AerosolError, AerosolResult};
use crate::FloatValue;

/// Micrograms per kilogram
const UG_PER_KG: FloatValue = 1.0e9;

/// Convert a tracer mass in a grid box to a mass concentration
///
/// # Arguments
/// * `mass_kg` - Tracer mass in the box (kg)
/// * `air_volume_m3` - Volume of air in the box (m3)
///
/// # Errors
/// Returns [`AerosolError::InvalidInput`] if the volume is not strictly positive.
pub fn kg_to_ug_per_m3(
    mass_kg: FloatValue,
    air_volume_m3: FloatValue,
) -> AerosolResult<FloatValue> {
    check_volume(air_volume_m3)?;
    Ok(mass_kg * UG_PER_KG / air_volume_m3)
}

/// Convert a mass concentration back to tracer mass in a grid box
///
/// Inverse of [`kg_to_ug_per_m3`].
pub fn ug_per_m3_to_kg(
    concentration: FloatValue,
    air_volume_m3: FloatValue,
) -> AerosolResult<FloatValue> {
    check_volume(air_volume_m3)?;
    Ok(concentration * air_volume_m3 / UG_PER_KG)
}

/// ug/m3 to umol/m3 for a species of molecular weight `molecular_weight` (g/mol)
pub fn ug_to_umol(concentration: FloatValue, molecular_weight: FloatValue) -> FloatValue {
    concentration / molecular_weight
}

/// umol/m3 to ug/m3 for a species of molecular weight `molecular_weight` (g/mol)
pub fn umol_to_ug(concentration: FloatValue, molecular_weight: FloatValue) -> FloatValue {
    concentration * molecular_weight
}

fn check_volume(air_volume_m3: FloatValue) -> AerosolResult<()> {
    if air_volume_m3 > 0.0 && air_volume_m3.is_finite() {
        Ok(())
    } else {
        Err(AerosolError::InvalidInput(format!(
            "air volume must be positive, got {air_volume_m3}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn test_kg_to_concentration() {
        // 1 ug in 1 m3
        let c = kg_to_ug_per_m3(1.0e-9, 1.0).unwrap();
        assert!(is_close!(c, 1.0));
    }

    #[test]
    fn test_box_mass_roundtrip() {
        let volume = 2.5e9;
        let mass = 3.2e-2;
        let c = kg_to_ug_per_m3(mass, volume).unwrap();
        let back = ug_per_m3_to_kg(c, volume).unwrap();
        assert!(is_close!(back, mass));
    }

    #[test]
    fn test_zero_volume_rejected() {
        assert!(matches!(
            kg_to_ug_per_m3(1.0, 0.0),
            Err(AerosolError::InvalidInput(_))
        ));
        assert!(ug_per_m3_to_kg(1.0, -4.0).is_err());
    }

    #[test]
    fn test_molar_conversion() {
        // 96.0576 ug/m3 of sulfate is one umol/m3
        assert!(is_close!(ug_to_umol(96.0576, 96.0576), 1.0));
        assert!(is_close!(umol_to_ug(2.0, 18.03858), 36.07716));
    }
}
