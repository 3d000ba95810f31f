//! Tests for gridded solves and the nitric acid store.

use approx::assert_relative_eq;
use ndarray::Array3;
use rsmars::grid::{solve_grid, solve_grid_with_store, GridSummary};
use rsmars::nitric_acid::{NitricAcidStore, RelaxedNitricAcid};
use rsmars::{AerosolError, EquilibriumInput, EquilibriumSolver, Outcome};
use rsmars_equilibrium::constants::{MW_NH3, MW_SO4};

/// A field whose NH4/SO4 ratio and humidity vary across the grid
fn input_field(shape: (usize, usize, usize)) -> Array3<EquilibriumInput> {
    Array3::from_shape_fn(shape, |(i, j, k)| {
        let sulfate = 5.0 + i as f64;
        let ratio = 0.4 + 0.6 * j as f64;
        let rh = 0.3 + 0.15 * k as f64;
        EquilibriumInput::new(
            sulfate,
            2.0,
            0.5,
            ratio * sulfate / MW_SO4 * MW_NH3,
            0.0,
            rh,
            285.0,
        )
    })
}

mod grid_solve {
    use super::*;

    #[test]
    fn test_matches_serial_solve() {
        let solver = EquilibriumSolver::default();
        let inputs = input_field((3, 6, 5));
        let outputs = solve_grid(&solver, &inputs).unwrap();

        assert_eq!(outputs.shape(), inputs.shape());
        for (input, output) in inputs.iter().zip(outputs.iter()) {
            let expected = solver.solve(input).unwrap();
            assert_eq!(*output, expected);
        }
    }

    #[test]
    fn test_input_error_propagates() {
        let solver = EquilibriumSolver::default();
        let mut inputs = input_field((2, 2, 2));
        inputs[[1, 0, 1]].ammonia = -1.0;

        let result = solve_grid(&solver, &inputs);
        assert!(matches!(
            result,
            Err(AerosolError::NegativeConcentration { .. })
        ));
    }

    #[test]
    fn test_summary_counts_every_cell() {
        let solver = EquilibriumSolver::default();
        let outputs = solve_grid(&solver, &input_field((3, 6, 5))).unwrap();
        let summary = GridSummary::from_outputs(&outputs);

        assert_eq!(summary.cells, 90);
        assert_eq!(
            summary.converged + summary.early_exits + summary.fallbacks(),
            summary.cells
        );
        assert_eq!(summary.ammonia_rich + summary.ammonia_poor, summary.cells);
        assert!(summary.ammonia_rich > 0);
        assert!(summary.ammonia_poor > 0);
        assert!(summary.converged > 0);
        assert!(summary.max_iterations <= solver.parameters().max_iterations);

        let converged = outputs
            .iter()
            .filter(|o| matches!(o.outcome, Outcome::Converged { .. }))
            .count();
        assert_eq!(converged, summary.converged);
    }

    #[test]
    fn test_summary_serializes() {
        let summary = GridSummary {
            cells: 4,
            converged: 3,
            early_exits: 1,
            ..Default::default()
        };
        let json = serde_json::to_string(&summary).unwrap();
        let restored: GridSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(summary, restored);
    }
}

mod nitric_acid_store {
    use super::*;

    #[test]
    fn test_store_supplies_and_receives_nitric_acid() {
        let solver = EquilibriumSolver::default();
        let inputs = input_field((2, 4, 3));
        let mut store = RelaxedNitricAcid::new(Array3::from_elem((2, 4, 3), 3.0));

        let outputs = solve_grid_with_store(&solver, &inputs, &mut store).unwrap();

        for ((i, j, k), output) in outputs.indexed_iter() {
            // Store now holds the solver's gas-phase result
            assert_eq!(store.get((i, j, k)), output.nitric_acid);

            // Input nitric acid was replaced by the store's value
            let mut input = inputs[[i, j, k]];
            input.nitric_acid = 3.0;
            assert_relative_eq!(
                output.total_nitrate_umol(),
                input.total_nitrate_umol(),
                epsilon = 1e-20,
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn test_relaxation_restores_monthly_mean() {
        let solver = EquilibriumSolver::default();
        let inputs = input_field((1, 4, 4));
        let mut store = RelaxedNitricAcid::new(Array3::from_elem((1, 4, 4), 3.0));

        solve_grid_with_store(&solver, &inputs, &mut store).unwrap();
        assert!(store.estimate().iter().any(|v| (*v - 3.0).abs() > 1e-6));

        assert!(store.advance(3.0 * 3600.0));
        assert!(store.estimate().iter().all(|v| *v == 3.0));
    }

    #[test]
    fn test_store_shape_checked() {
        let solver = EquilibriumSolver::default();
        let inputs = input_field((2, 2, 2));
        let mut store = RelaxedNitricAcid::new(Array3::from_elem((2, 2, 3), 1.0));

        let result = solve_grid_with_store(&solver, &inputs, &mut store);
        assert!(matches!(result, Err(AerosolError::ShapeMismatch { .. })));
    }
}
