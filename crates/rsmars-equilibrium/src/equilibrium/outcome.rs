//! How a single equilibrium solve ended

use serde::{Deserialize, Serialize};

/// Chemical regime selected from the molar NH4/SO4 ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    /// More than enough ammonia to neutralise sulfate (ratio > 2)
    AmmoniaRich,
    /// Sulfate not fully neutralised (ratio <= 2)
    AmmoniaPoor,
    /// No partitioning was attempted (dry air or trace loading)
    Unpartitioned,
}

/// Reason a solve returned before or instead of iterating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitReason {
    /// RH below the solver's minimum; inputs are returned unchanged
    LowHumidity,
    /// Both sulfate and nitrate below their trace thresholds
    TraceLoading,
    /// Ammonia-rich aerosol too dry for aqueous chemistry; solid NH4NO3 used
    LowWaterFraction,
    /// NH4/SO4 ratio too low for partitioning
    StronglyAcidic,
    /// No liquid water at this humidity and composition
    NoLiquidWater,
    /// Sulfate molality above the solver's limit
    ConcentratedSulfate,
}

/// Numerical condition that forced a fallback partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Degeneracy {
    /// Quadratic for dissolved nitrate had no real roots
    NegativeDiscriminant,
    /// Cubic for H+ had a vanishing divisor
    DegenerateCubic,
    /// Cubic for H+ had no positive root
    NoPhysicalRoot,
    /// Water content fell to zero during iteration
    NoLiquidWater,
    /// Solution had zero ionic strength during iteration
    ZeroIonicStrength,
}

/// Result status of a solve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Activity coefficients converged
    Converged { iterations: usize },
    /// A regime short-circuit applied; the partition is the regime's result
    EarlyExit(ExitReason),
    /// Iteration stopped on a numerical degeneracy; a conservative partition
    /// was returned
    DegenerateFallback(Degeneracy),
    /// Iteration limit reached; a conservative partition was returned
    IterationLimitFallback,
}

impl Outcome {
    /// True when the partition is a fallback rather than a solution
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            Outcome::DegenerateFallback(_) | Outcome::IterationLimitFallback
        )
    }
}
