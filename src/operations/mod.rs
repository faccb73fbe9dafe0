// src/operations/mod.rs

//! A gate tagged with the qubits it acts on.

use std::fmt;

use crate::core::error::check_qubits;
use crate::core::{CirquantError, QubitIndex, Result};
use crate::gates::Gate;

/// One step of a circuit: a library gate applied to specific qubits.
///
/// For two-qubit gates the order of `qubits` matters: the gate matrix is
/// written in the |a b⟩ basis of `[a, b]`, so `CNOT` on `[0, 1]` uses qubit 0
/// as control.
#[derive(Debug, Clone, PartialEq)]
pub struct GateOp {
    gate: Gate,
    qubits: Vec<QubitIndex>,
}

impl GateOp {
    /// Pairs `gate` with `qubits`, checking the gate itself, arity, range
    /// and repeats against a register of `num_qubits` qubits.
    pub fn new(gate: Gate, qubits: &[QubitIndex], num_qubits: usize) -> Result<Self> {
        gate.validate()?;
        if qubits.len() != gate.arity() {
            return Err(CirquantError::invalid_operation(format!(
                "gate {} acts on {} qubit(s), got {:?}",
                gate,
                gate.arity(),
                qubits
            )));
        }
        check_qubits(qubits, num_qubits)?;
        Ok(Self { gate, qubits: qubits.to_vec() })
    }

    /// The gate applied.
    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    /// The qubits acted on, in matrix order.
    pub fn qubits(&self) -> &[QubitIndex] {
        &self.qubits
    }

    /// Re-checks the gate and the qubit indices against a register width.
    pub(crate) fn validate(&self, num_qubits: usize) -> Result<()> {
        self.gate.validate()?;
        check_qubits(&self.qubits, num_qubits)
    }
}

impl fmt::Display for GateOp {
    /// Formats as `H(0)` or `CNOT(0,1)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qubits: Vec<String> = self.qubits.iter().map(|q| q.to_string()).collect();
        match self.gate.angle() {
            Some(theta) => write!(f, "{}({:.3}, {})", self.gate.symbol(), theta, qubits.join(",")),
            None => write!(f, "{}({})", self.gate.symbol(), qubits.join(",")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_mismatch_is_rejected() {
        let err = GateOp::new(Gate::Cnot, &[0], 2).unwrap_err();
        assert!(matches!(err, CirquantError::InvalidOperation { .. }));
        let err = GateOp::new(Gate::H, &[0, 1], 2).unwrap_err();
        assert!(matches!(err, CirquantError::InvalidOperation { .. }));
    }

    #[test]
    fn control_equal_to_target_is_rejected() {
        assert!(GateOp::new(Gate::Cnot, &[1, 1], 2).is_err());
    }

    #[test]
    fn malformed_gate_variants_are_rejected() {
        let err = GateOp::new(Gate::Rx(f64::NAN), &[0], 1).unwrap_err();
        assert!(matches!(err, CirquantError::InvalidOperation { .. }));
        let scaled = [
            [num_complex::Complex64::new(2.0, 0.0), num_complex::Complex64::new(0.0, 0.0)],
            [num_complex::Complex64::new(0.0, 0.0), num_complex::Complex64::new(1.0, 0.0)],
        ];
        assert!(GateOp::new(Gate::Unitary1(scaled), &[0], 1).is_err());
    }

    #[test]
    fn display_matches_history_format() {
        assert_eq!(GateOp::new(Gate::H, &[0], 1).unwrap().to_string(), "H(0)");
        assert_eq!(GateOp::new(Gate::Cnot, &[0, 1], 2).unwrap().to_string(), "CNOT(0,1)");
        assert_eq!(GateOp::new(Gate::Rz(0.5), &[1], 2).unwrap().to_string(), "Rz(0.500, 1)");
    }
}
