//! Gas-phase nitric acid between chemistry steps
//!
//! Models that do not transport HNO3 keep a per-cell estimate instead. The
//! estimate starts from a monthly-mean field, is overwritten by the solver's
//! gas-phase result after every step, and is reset to the monthly mean at a
//! fixed interval so it cannot drift far from climatology.

use ndarray::Array3;
use rsmars_core::errors::{AerosolError, AerosolResult};
use rsmars_core::FloatValue;
use tracing::debug;

/// Grid cell index `(i, j, k)`
pub type Cell = (usize, usize, usize);

/// Default interval between relaxations to the monthly mean (s)
pub const DEFAULT_RELAXATION_INTERVAL: FloatValue = 3.0 * 3600.0;

/// Per-cell source and sink of gas-phase nitric acid (ug/m3)
pub trait NitricAcidStore {
    /// Extent of the field
    fn shape(&self) -> [usize; 3];
    /// Current estimate for `cell`
    fn get(&self, cell: Cell) -> FloatValue;
    /// Record the solver's gas-phase value for `cell`
    fn set(&mut self, cell: Cell, value: FloatValue);
}

/// Nitric acid estimate relaxed to a monthly mean every `relaxation_interval`
#[derive(Debug, Clone)]
pub struct RelaxedNitricAcid {
    estimate: Array3<FloatValue>,
    monthly_mean: Array3<FloatValue>,
    relaxation_interval: FloatValue,
    since_relaxation: FloatValue,
}

impl RelaxedNitricAcid {
    /// Start from `monthly_mean` with the default three-hour interval
    pub fn new(monthly_mean: Array3<FloatValue>) -> Self {
        Self {
            estimate: monthly_mean.clone(),
            monthly_mean,
            relaxation_interval: DEFAULT_RELAXATION_INTERVAL,
            since_relaxation: 0.0,
        }
    }

    pub fn with_relaxation_interval(mut self, seconds: FloatValue) -> AerosolResult<Self> {
        if !(seconds.is_finite() && seconds > 0.0) {
            return Err(AerosolError::InvalidInput(format!(
                "relaxation interval must be positive, got {} s",
                seconds
            )));
        }
        self.relaxation_interval = seconds;
        Ok(self)
    }

    pub fn relaxation_interval(&self) -> FloatValue {
        self.relaxation_interval
    }

    pub fn estimate(&self) -> &Array3<FloatValue> {
        &self.estimate
    }

    /// Advance the clock by `dt` seconds.
    ///
    /// Once a full relaxation interval has elapsed the estimate is replaced
    /// by the monthly mean. Returns whether that happened.
    pub fn advance(&mut self, dt: FloatValue) -> bool {
        self.since_relaxation += dt;
        if self.since_relaxation < self.relaxation_interval {
            return false;
        }
        self.estimate.assign(&self.monthly_mean);
        self.since_relaxation = 0.0;
        debug!(
            interval = self.relaxation_interval,
            "Relaxed nitric acid to monthly mean"
        );
        true
    }

    /// Replace the monthly-mean field, e.g. at a month boundary.
    ///
    /// The current estimate is kept until the next relaxation.
    pub fn set_monthly_mean(&mut self, monthly_mean: Array3<FloatValue>) -> AerosolResult<()> {
        if monthly_mean.shape() != self.monthly_mean.shape() {
            return Err(AerosolError::ShapeMismatch {
                expected: self.monthly_mean.shape().to_vec(),
                found: monthly_mean.shape().to_vec(),
            });
        }
        self.monthly_mean = monthly_mean;
        Ok(())
    }
}

impl NitricAcidStore for RelaxedNitricAcid {
    fn shape(&self) -> [usize; 3] {
        let dim = self.estimate.dim();
        [dim.0, dim.1, dim.2]
    }

    fn get(&self, cell: Cell) -> FloatValue {
        self.estimate[[cell.0, cell.1, cell.2]]
    }

    fn set(&mut self, cell: Cell, value: FloatValue) {
        self.estimate[[cell.0, cell.1, cell.2]] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn store() -> RelaxedNitricAcid {
        RelaxedNitricAcid::new(Array3::from_elem((2, 3, 4), 1.5))
    }

    #[test]
    fn test_starts_from_monthly_mean() {
        let store = store();
        assert_eq!(store.shape(), [2, 3, 4]);
        assert_relative_eq!(store.get((1, 2, 3)), 1.5);
        assert_relative_eq!(store.relaxation_interval(), 10800.0);
    }

    #[test]
    fn test_carries_forward_solver_value() {
        let mut store = store();
        store.set((0, 1, 2), 0.25);

        assert!(!store.advance(3600.0));
        assert_relative_eq!(store.get((0, 1, 2)), 0.25);
        assert_relative_eq!(store.get((0, 0, 0)), 1.5);
    }

    #[test]
    fn test_relaxes_after_interval() {
        let mut store = store();
        store.set((0, 1, 2), 0.25);

        assert!(!store.advance(3600.0));
        assert!(!store.advance(3600.0));
        assert!(store.advance(3600.0));
        assert_relative_eq!(store.get((0, 1, 2)), 1.5);

        // Clock restarts after relaxing
        store.set((0, 1, 2), 0.5);
        assert!(!store.advance(3600.0));
        assert_relative_eq!(store.get((0, 1, 2)), 0.5);
    }

    #[test]
    fn test_custom_interval() {
        let mut store = store().with_relaxation_interval(600.0).unwrap();
        store.set((1, 1, 1), 9.0);
        assert!(store.advance(600.0));
        assert_relative_eq!(store.get((1, 1, 1)), 1.5);
    }

    #[test]
    fn test_invalid_interval_rejected() {
        assert!(store().with_relaxation_interval(0.0).is_err());
        assert!(store().with_relaxation_interval(f64::NAN).is_err());
    }

    #[test]
    fn test_new_monthly_mean_used_at_next_relaxation() {
        let mut store = store();
        store.set_monthly_mean(Array3::from_elem((2, 3, 4), 4.0)).unwrap();
        assert_relative_eq!(store.get((0, 0, 0)), 1.5);

        store.advance(DEFAULT_RELAXATION_INTERVAL);
        assert_relative_eq!(store.get((0, 0, 0)), 4.0);
    }

    #[test]
    fn test_monthly_mean_shape_checked() {
        let mut store = store();
        let result = store.set_monthly_mean(Array3::zeros((2, 3, 5)));
        match result {
            Err(AerosolError::ShapeMismatch { expected, found }) => {
                assert_eq!(expected, vec![2, 3, 4]);
                assert_eq!(found, vec![2, 3, 5]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
