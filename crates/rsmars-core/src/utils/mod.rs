//! Numerical utilities.

pub mod polynomial;
pub mod roots;
