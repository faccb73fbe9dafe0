// src/validation/mod.rs

//! Numeric checks on states and gate matrices.

use num_complex::Complex64;
use num_traits::{One, Zero};

use crate::core::{CirquantError, Result, StateVector};
use crate::gates::GateMatrix;

// Default tolerance values (can be overridden by caller)
const DEFAULT_NORM_TOLERANCE: f64 = 1e-9;

/// Absolute deviation of ‖ψ‖² from 1.
pub fn norm_drift(state: &StateVector) -> f64 {
    (state.norm_sqr() - 1.0).abs()
}

/// Checks if the state vector is normalized (sum of squared amplitudes ≈ 1.0).
///
/// # Arguments
/// * `state` - The `StateVector` to check.
/// * `tolerance` - Allowed deviation from 1.0. Defaults to 1e-9.
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(CirquantError::SimulationError)` otherwise.
pub fn check_normalization(state: &StateVector, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_NORM_TOLERANCE);
    let norm_sq = state.norm_sqr();
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(CirquantError::simulation(format!(
            "State vector normalization failed. Sum(|c_i|^2) = {} (Deviation > {})",
            norm_sq, effective_tolerance
        )))
    } else {
        Ok(())
    }
}

/// Checks that `U†U = I` entry by entry within `tolerance`.
///
/// # Returns
/// * `Err(CirquantError::InvalidOperation)` naming the first offending entry.
pub fn check_unitary(matrix: &GateMatrix, tolerance: f64) -> Result<()> {
    let dim = matrix.dim();
    for row in 0..dim {
        for col in 0..dim {
            // (U†U)[row][col] = sum_k conj(U[k][row]) * U[k][col]
            let product: Complex64 = (0..dim)
                .map(|k| matrix.entry(k, row).conj() * matrix.entry(k, col))
                .sum();
            let expected = if row == col { Complex64::one() } else { Complex64::zero() };
            let deviation = (product - expected).norm();
            if deviation > tolerance || !deviation.is_finite() {
                return Err(CirquantError::invalid_operation(format!(
                    "matrix is not unitary: (U†U)[{}][{}] = {:.6} (deviation {:.3e} > {:.1e})",
                    row, col, product, deviation, tolerance
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::{CNOT_MATRIX, HADAMARD_MATRIX};

    #[test]
    fn zero_state_is_normalized() {
        let s = StateVector::zero(2).unwrap();
        assert!(check_normalization(&s, None).is_ok());
        assert_eq!(norm_drift(&s), 0.0);
    }

    #[test]
    fn scaled_state_fails_normalization() {
        let amps = vec![Complex64::new(0.9, 0.0), Complex64::zero()];
        let s = StateVector::from_amplitudes(amps).unwrap();
        let err = check_normalization(&s, Some(1e-6)).unwrap_err();
        assert!(matches!(err, CirquantError::SimulationError { .. }));
        assert!(check_normalization(&s, Some(0.5)).is_ok());
    }

    #[test]
    fn known_gates_are_unitary() {
        assert!(check_unitary(&GateMatrix::Single(HADAMARD_MATRIX), 1e-12).is_ok());
        assert!(check_unitary(&GateMatrix::Two(CNOT_MATRIX), 1e-12).is_ok());
    }

    #[test]
    fn non_unitary_matrix_is_rejected() {
        let m = [
            [Complex64::new(2.0, 0.0), Complex64::zero()],
            [Complex64::zero(), Complex64::one()],
        ];
        assert!(check_unitary(&GateMatrix::Single(m), 1e-9).is_err());
    }

    #[test]
    fn nan_matrix_is_rejected() {
        let m = [
            [Complex64::new(f64::NAN, 0.0), Complex64::zero()],
            [Complex64::zero(), Complex64::one()],
        ];
        assert!(check_unitary(&GateMatrix::Single(m), 1e-9).is_err());
    }
}
