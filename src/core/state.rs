// src/core/state.rs

use num_complex::Complex64;
use num_traits::{One, Zero};
use std::fmt;

use super::constants::sim_constants::HARD_MAX_QUBITS;
use super::error::{CirquantError, QubitIndex, Result};

/// The complex amplitudes of an n-qubit register.
///
/// Holds `2^n` amplitudes indexed big-endian: qubit 0 is the most
/// significant bit of the index, so for two qubits index 2 is |q0 q1⟩ = |10⟩.
/// A freshly created vector is |0...0⟩ and has unit norm. The simulation
/// engine is the only code that mutates amplitudes after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl StateVector {
    /// Creates the all-zero basis state |0...0⟩ over `num_qubits` qubits.
    pub fn zero(num_qubits: usize) -> Result<Self> {
        let dim = dimension_for(num_qubits)?;
        let mut amplitudes = vec![Complex64::zero(); dim];
        amplitudes[0] = Complex64::one();
        Ok(Self { amplitudes, num_qubits })
    }

    /// Wraps an existing amplitude vector. The length must be a power of two.
    ///
    /// The amplitudes are taken as given; see
    /// [`check_normalization`](crate::validation::check_normalization) to
    /// verify them.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> Result<Self> {
        let dim = amplitudes.len();
        if !dim.is_power_of_two() {
            return Err(CirquantError::simulation(format!(
                "state vector length {} is not a power of two",
                dim
            )));
        }
        let num_qubits = dim.trailing_zeros() as usize;
        if num_qubits > HARD_MAX_QUBITS {
            return Err(CirquantError::simulation(format!(
                "state vector of {} qubits exceeds the supported maximum of {}",
                num_qubits, HARD_MAX_QUBITS
            )));
        }
        Ok(Self { amplitudes, num_qubits })
    }

    /// Read-only access to the amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    /// Amplitude of a single basis state, if the index is in range.
    pub fn amplitude(&self, index: usize) -> Option<Complex64> {
        self.amplitudes.get(index).copied()
    }

    /// Number of qubits represented.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of amplitudes (`2^n`).
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Sum of squared magnitudes. Equals 1 for a valid state.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|c| c.norm_sqr()).sum()
    }

    /// Born-rule probability of each basis state, in index order.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|c| c.norm_sqr()).collect()
    }

    /// Probability of the basis state named by `bitstring` (qubit 0 first).
    ///
    /// Returns `None` if the string has the wrong length or contains
    /// characters other than `0` and `1`.
    pub fn probability_of(&self, bitstring: &str) -> Option<f64> {
        if bitstring.len() != self.num_qubits {
            return None;
        }
        let index = bitstring.chars().try_fold(0usize, |acc, ch| match ch {
            '0' => Some(acc << 1),
            '1' => Some((acc << 1) | 1),
            _ => None,
        })?;
        self.amplitudes.get(index).map(|c| c.norm_sqr())
    }

    /// Bitstring label of basis index `index`, qubit 0 first.
    pub fn basis_label(&self, index: usize) -> String {
        format_bits(index, self.num_qubits)
    }

    /// Bit value of `qubit` in basis index `index`, or `None` if `qubit` is
    /// not part of this register.
    pub fn bit_of(&self, index: usize, qubit: QubitIndex) -> Option<usize> {
        if qubit >= self.num_qubits {
            return None;
        }
        Some((index >> bit_position(qubit, self.num_qubits)) & 1)
    }

    /// Compares two states amplitude by amplitude.
    pub fn approx_eq(&self, other: &StateVector, tolerance: f64) -> bool {
        self.dim() == other.dim()
            && self
                .amplitudes
                .iter()
                .zip(other.amplitudes.iter())
                .all(|(a, b)| (a - b).norm() <= tolerance)
    }
}

/// Bit position (from the least significant end) of `qubit` in a basis index.
pub(crate) fn bit_position(qubit: QubitIndex, num_qubits: usize) -> usize {
    num_qubits - 1 - qubit
}

/// Formats the low `width` bits of `value` most significant first.
pub(crate) fn format_bits(value: usize, width: usize) -> String {
    (0..width)
        .rev()
        .map(|pos| if (value >> pos) & 1 == 1 { '1' } else { '0' })
        .collect()
}

fn dimension_for(num_qubits: usize) -> Result<usize> {
    if num_qubits > HARD_MAX_QUBITS {
        return Err(CirquantError::simulation(format!(
            "{} qubits exceeds the supported maximum of {}",
            num_qubits, HARD_MAX_QUBITS
        )));
    }
    1usize.checked_shl(num_qubits as u32).ok_or_else(|| {
        CirquantError::simulation(
            "number of qubits too large, state vector dimension overflows usize",
        )
    })
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateVector[")?;
        for (i, c) in self.amplitudes.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_state_has_unit_amplitude_at_index_zero() {
        let s = StateVector::zero(3).unwrap();
        assert_eq!(s.dim(), 8);
        assert_eq!(s.num_qubits(), 3);
        assert_eq!(s.amplitude(0), Some(Complex64::one()));
        assert!(s.amplitudes()[1..].iter().all(|c| c.is_zero()));
        assert_relative_eq!(s.norm_sqr(), 1.0);
    }

    #[test]
    fn zero_qubits_is_a_scalar_state() {
        let s = StateVector::zero(0).unwrap();
        assert_eq!(s.dim(), 1);
        assert_eq!(s.basis_label(0), "");
    }

    #[test]
    fn rejects_oversized_register() {
        assert!(matches!(
            StateVector::zero(HARD_MAX_QUBITS + 1),
            Err(CirquantError::SimulationError { .. })
        ));
    }

    #[test]
    fn from_amplitudes_requires_power_of_two() {
        let amps = vec![Complex64::one(); 3];
        assert!(StateVector::from_amplitudes(amps).is_err());
        let amps = vec![Complex64::zero(), Complex64::one(), Complex64::zero(), Complex64::zero()];
        let s = StateVector::from_amplitudes(amps).unwrap();
        assert_eq!(s.num_qubits(), 2);
    }

    #[test]
    fn labels_are_big_endian() {
        let s = StateVector::zero(2).unwrap();
        assert_eq!(s.basis_label(1), "01");
        assert_eq!(s.basis_label(2), "10");
        assert_eq!(s.bit_of(2, 0), Some(1));
        assert_eq!(s.bit_of(2, 1), Some(0));
    }

    #[test]
    fn bit_of_unknown_qubit_is_none() {
        let s = StateVector::zero(2).unwrap();
        assert_eq!(s.bit_of(0, 2), None);
        assert_eq!(s.bit_of(0, 3), None);
    }

    #[test]
    fn probability_of_bitstring() {
        let amps = vec![Complex64::zero(), Complex64::zero(), Complex64::one(), Complex64::zero()];
        let s = StateVector::from_amplitudes(amps).unwrap();
        assert_eq!(s.probability_of("10"), Some(1.0));
        assert_eq!(s.probability_of("01"), Some(0.0));
        assert_eq!(s.probability_of("1"), None);
        assert_eq!(s.probability_of("1x"), None);
    }
}
