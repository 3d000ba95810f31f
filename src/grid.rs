//! Gridded equilibrium solves
//!
//! Cells are independent, so a grid is solved with a parallel map over the
//! flattened field. Each cell owns all of its scratch state.

use crate::nitric_acid::{Cell, NitricAcidStore};
use ndarray::Array3;
use rayon::prelude::*;
use rsmars_core::errors::{AerosolError, AerosolResult};
use rsmars_equilibrium::{EquilibriumInput, EquilibriumOutput, EquilibriumSolver, Outcome, Regime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Solve every cell of `inputs`.
///
/// Returns the partitioned field in the same shape, or an input error from
/// any cell.
pub fn solve_grid(
    solver: &EquilibriumSolver,
    inputs: &Array3<EquilibriumInput>,
) -> AerosolResult<Array3<EquilibriumOutput>> {
    let cells: Vec<&EquilibriumInput> = inputs.iter().collect();

    let outputs = cells
        .par_iter()
        .map(|input| solver.solve(input))
        .collect::<AerosolResult<Vec<_>>>()?;

    let field = Array3::from_shape_vec(inputs.raw_dim(), outputs).map_err(|_| {
        AerosolError::ShapeMismatch {
            expected: inputs.shape().to_vec(),
            found: vec![cells.len()],
        }
    })?;

    let summary = GridSummary::from_outputs(&field);
    debug!(
        cells = summary.cells,
        converged = summary.converged,
        early_exits = summary.early_exits,
        "Solved equilibrium grid"
    );
    if summary.fallbacks() > 0 {
        warn!(
            degenerate = summary.degenerate_fallbacks,
            iteration_limit = summary.iteration_limit_fallbacks,
            "Some cells returned fallback partitions"
        );
    }

    Ok(field)
}

/// Solve every cell with gas-phase nitric acid taken from `store`.
///
/// The input field's nitric acid is ignored. After the solve each cell's
/// gas-phase result is written back so the next step starts from it.
pub fn solve_grid_with_store<S: NitricAcidStore>(
    solver: &EquilibriumSolver,
    inputs: &Array3<EquilibriumInput>,
    store: &mut S,
) -> AerosolResult<Array3<EquilibriumOutput>> {
    if inputs.shape() != store.shape().as_slice() {
        return Err(AerosolError::ShapeMismatch {
            expected: inputs.shape().to_vec(),
            found: store.shape().to_vec(),
        });
    }

    let mut inputs = inputs.clone();
    for ((i, j, k), input) in inputs.indexed_iter_mut() {
        input.nitric_acid = store.get((i, j, k));
    }

    let outputs = solve_grid(solver, &inputs)?;

    for ((i, j, k), output) in outputs.indexed_iter() {
        let cell: Cell = (i, j, k);
        store.set(cell, output.nitric_acid);
    }

    Ok(outputs)
}

/// Counts of how each cell of a grid was solved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSummary {
    pub cells: usize,
    pub converged: usize,
    pub early_exits: usize,
    pub degenerate_fallbacks: usize,
    pub iteration_limit_fallbacks: usize,
    pub ammonia_rich: usize,
    pub ammonia_poor: usize,
    /// Largest iteration count among converged cells
    pub max_iterations: usize,
}

impl GridSummary {
    pub fn from_outputs(outputs: &Array3<EquilibriumOutput>) -> Self {
        let mut summary = Self::default();
        for output in outputs.iter() {
            summary.cells += 1;
            match output.outcome {
                Outcome::Converged { iterations } => {
                    summary.converged += 1;
                    summary.max_iterations = summary.max_iterations.max(iterations);
                }
                Outcome::EarlyExit(_) => summary.early_exits += 1,
                Outcome::DegenerateFallback(_) => summary.degenerate_fallbacks += 1,
                Outcome::IterationLimitFallback => summary.iteration_limit_fallbacks += 1,
            }
            match output.regime {
                Regime::AmmoniaRich => summary.ammonia_rich += 1,
                Regime::AmmoniaPoor => summary.ammonia_poor += 1,
                Regime::Unpartitioned => {}
            }
        }
        summary
    }

    pub fn fallbacks(&self) -> usize {
        self.degenerate_fallbacks + self.iteration_limit_fallbacks
    }
}
