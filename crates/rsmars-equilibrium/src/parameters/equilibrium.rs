//! Equilibrium solver parameters
//!
//! Iteration controls and regime thresholds for the gas/aerosol partitioning
//! solver.

use rsmars_core::errors::{AerosolError, AerosolResult};
use rsmars_core::FloatValue;
use serde::{Deserialize, Serialize};

/// Parameters controlling the equilibrium solver
///
/// The thermodynamic constants themselves are fixed; these values control
/// how hard the solver iterates and where it switches between regimes.
///
/// # Loading
///
/// Every field has a default, so a configuration file only needs to name the
/// values it changes:
///
/// ```
/// use rsmars_equilibrium::parameters::EquilibriumParameters;
///
/// let params = EquilibriumParameters::from_toml_str("max_iterations = 100").unwrap();
/// assert_eq!(params.max_iterations, 100);
/// assert_eq!(params.dry_water_fraction, 0.2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquilibriumParameters {
    // === Iteration ===
    /// Maximum activity-coefficient iterations in either regime
    /// unit: dimensionless
    /// default: 50
    pub max_iterations: usize,

    /// Relative change in the NH4NO3 activity coefficient that ends the
    /// ammonia-rich iteration
    /// unit: dimensionless
    /// default: 1e-5
    pub ammonia_rich_tolerance: FloatValue,

    /// Relative change in the (gamma_HHSO4 / gamma_NH4HSO4)^2 ratio that ends
    /// the ammonia-poor iteration
    /// unit: dimensionless
    /// default: 1e-3
    pub ammonia_poor_tolerance: FloatValue,

    /// Starting value for every activity coefficient
    /// unit: dimensionless
    /// default: 0.1
    pub initial_activity_coefficient: FloatValue,

    // === Regime thresholds ===
    /// Water mass fraction below which an ammonia-rich aerosol is treated as
    /// solid and nitrate follows the NH4NO3 dissociation constant
    /// unit: dimensionless
    /// default: 0.2
    pub dry_water_fraction: FloatValue,

    /// NH4/SO4 molar ratio below which no partitioning is attempted
    /// unit: dimensionless
    /// default: 0.5
    pub strongly_acidic_ratio: FloatValue,

    /// Sulfate molality above which no partitioning is attempted
    /// unit: mol/kg
    /// default: 9.0
    pub max_sulfate_molality: FloatValue,

    /// Relative humidity below which inputs pass through unchanged
    /// unit: fraction
    /// default: 0.01
    pub minimum_relative_humidity: FloatValue,

    /// Lower bound applied to every output concentration
    /// unit: ug/m3
    /// default: 1e-30
    pub concentration_floor: FloatValue,
}

impl Default for EquilibriumParameters {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            ammonia_rich_tolerance: 1.0e-5,
            ammonia_poor_tolerance: 1.0e-3,
            initial_activity_coefficient: 0.1,
            dry_water_fraction: 0.2,
            strongly_acidic_ratio: 0.5,
            max_sulfate_molality: 9.0,
            minimum_relative_humidity: 0.01,
            concentration_floor: 1.0e-30,
        }
    }
}

impl EquilibriumParameters {
    /// Parse parameters from a TOML document and validate them.
    pub fn from_toml_str(source: &str) -> AerosolResult<Self> {
        let params: Self =
            toml::from_str(source).map_err(|e| AerosolError::Config(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Check that every parameter is in its usable range.
    pub fn validate(&self) -> AerosolResult<()> {
        if self.max_iterations == 0 {
            return Err(AerosolError::Config(
                "max_iterations must be at least 1".to_string(),
            ));
        }

        let positive = [
            ("ammonia_rich_tolerance", self.ammonia_rich_tolerance),
            ("ammonia_poor_tolerance", self.ammonia_poor_tolerance),
            (
                "initial_activity_coefficient",
                self.initial_activity_coefficient,
            ),
            ("max_sulfate_molality", self.max_sulfate_molality),
            ("concentration_floor", self.concentration_floor),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(AerosolError::Config(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }

        let fractions = [
            ("dry_water_fraction", self.dry_water_fraction),
            ("minimum_relative_humidity", self.minimum_relative_humidity),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(AerosolError::Config(format!(
                    "{} must lie in [0, 1], got {}",
                    name, value
                )));
            }
        }

        if !(self.strongly_acidic_ratio >= 0.0 && self.strongly_acidic_ratio <= 2.0) {
            return Err(AerosolError::Config(format!(
                "strongly_acidic_ratio must lie in [0, 2], got {}",
                self.strongly_acidic_ratio
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let params = EquilibriumParameters::default();
        assert_eq!(params.max_iterations, 50);
        assert!((params.ammonia_rich_tolerance - 1e-5).abs() < 1e-15);
        assert!((params.ammonia_poor_tolerance - 1e-3).abs() < 1e-15);
        assert!((params.dry_water_fraction - 0.2).abs() < 1e-10);
        assert!((params.max_sulfate_molality - 9.0).abs() < 1e-10);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let params = EquilibriumParameters::default();
        let json = serde_json::to_string(&params).unwrap();
        let restored: EquilibriumParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(params, restored);
    }

    #[test]
    fn test_partial_deserialization() {
        let json = r#"{"max_iterations": 20, "ammonia_poor_tolerance": 1e-4}"#;
        let params: EquilibriumParameters =
            serde_json::from_str(json).expect("Partial deserialization failed");

        assert_eq!(params.max_iterations, 20);
        assert!((params.ammonia_poor_tolerance - 1e-4).abs() < 1e-15);
        // Unspecified fields keep their defaults
        assert!((params.strongly_acidic_ratio - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_from_toml() {
        let source = r#"
            max_iterations = 80
            dry_water_fraction = 0.25
        "#;
        let params = EquilibriumParameters::from_toml_str(source).unwrap();
        assert_eq!(params.max_iterations, 80);
        assert!((params.dry_water_fraction - 0.25).abs() < 1e-10);
        assert!((params.concentration_floor - 1e-30).abs() < 1e-40);
    }

    #[test]
    fn test_from_toml_rejects_bad_syntax() {
        let result = EquilibriumParameters::from_toml_str("max_iterations = ");
        assert!(matches!(result, Err(AerosolError::Config(_))));
    }

    #[test]
    fn test_from_toml_rejects_invalid_values() {
        let result = EquilibriumParameters::from_toml_str("max_iterations = 0");
        assert!(matches!(result, Err(AerosolError::Config(_))));

        let result = EquilibriumParameters::from_toml_str("ammonia_rich_tolerance = -1.0");
        assert!(matches!(result, Err(AerosolError::Config(_))));

        let result = EquilibriumParameters::from_toml_str("dry_water_fraction = 1.5");
        assert!(matches!(result, Err(AerosolError::Config(_))));
    }
}
