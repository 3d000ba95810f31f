use thiserror::Error;

/// Error type for invalid inputs and unrecoverable numerical states.
///
/// Recoverable numerical trouble (non-convergence, negative discriminants) is
/// not an error: the equilibrium driver maps it onto a fallback outcome.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AerosolError {
    #[error("Negative concentration for {species}: {value}")]
    NegativeConcentration { species: String, value: f64 },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Ionic strength below zero ({0}). Negative concentrations were supplied to the activity model")]
    NegativeIonicStrength(f64),
    #[error("Cubic solver divisor underflow (Q={q}, R={r}). Coefficients are outside the valid range")]
    DegenerateCubic { q: f64, r: f64 },
    #[error("Field shape mismatch. Expected {expected:?}, got {found:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenience type for `Result<T, AerosolError>`.
pub type AerosolResult<T> = Result<T, AerosolError>;
