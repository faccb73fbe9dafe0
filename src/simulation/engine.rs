// src/simulation/engine.rs
use num_complex::Complex64;
use num_traits::Zero;
use tracing::{trace, warn};

use crate::circuits::Circuit;
use crate::core::state::bit_position;
use crate::core::{CirquantError, QubitIndex, Result, StateVector};
use crate::gates::GateMatrix;
use crate::operations::GateOp;
use crate::simulation::results::{Evolution, UnnormalizedStateWarning};
use crate::validation::norm_drift;

/// Evolves one state vector through a circuit's gates.
///
/// One engine exists per run and owns its state exclusively. Gates are
/// applied in place without materializing the `2^n x 2^n` operator: for a
/// k-qubit gate the small matrix is applied to each of the `2^(n-k)`
/// amplitude groups that share the same values on the untouched qubits.
pub(crate) struct SimulationEngine {
    state: StateVector,
    /// Drift of ‖ψ‖² from 1 above which a warning is recorded.
    norm_tolerance: f64,
    warnings: Vec<UnnormalizedStateWarning>,
}

impl SimulationEngine {
    /// Starts from an existing state (normally |0...0⟩).
    pub(crate) fn init(state: StateVector, norm_tolerance: f64) -> Self {
        Self {
            state,
            norm_tolerance,
            warnings: Vec::new(),
        }
    }

    /// Applies every gate of `circuit` in order.
    ///
    /// All operations are re-validated against the state width before the
    /// first amplitude changes, so an invalid circuit leaves the state as it
    /// was. Measurement declarations are not evolution and are ignored here.
    pub(crate) fn run(&mut self, circuit: &Circuit) -> Result<()> {
        let num_qubits = self.state.num_qubits();
        if circuit.num_qubits() != num_qubits {
            return Err(CirquantError::simulation(format!(
                "circuit width {} does not match state width {}",
                circuit.num_qubits(),
                num_qubits
            )));
        }
        for op in circuit.operations() {
            self.check_operation(op)?;
        }
        for (step, op) in circuit.operations().iter().enumerate() {
            self.apply_checked(op);
            trace!(step, op = %op, "applied gate");
            self.check_norm(step, op);
        }
        Ok(())
    }

    /// Applies a single operation after validating it.
    pub(crate) fn apply_operation(&mut self, op: &GateOp) -> Result<()> {
        self.check_operation(op)?;
        self.apply_checked(op);
        Ok(())
    }

    pub(crate) fn into_evolution(self) -> Evolution {
        Evolution::new(self.state, self.warnings)
    }

    fn check_operation(&self, op: &GateOp) -> Result<()> {
        op.validate(self.state.num_qubits())?;
        let arity = op.gate().matrix().arity();
        if arity != op.qubits().len() {
            return Err(CirquantError::invalid_operation(format!(
                "{} has a {}-qubit matrix but targets {} qubit(s)",
                op,
                arity,
                op.qubits().len()
            )));
        }
        Ok(())
    }

    fn apply_checked(&mut self, op: &GateOp) {
        let matrix = op.gate().matrix();
        apply_matrix(&mut self.state, op.qubits(), &matrix);
    }

    fn check_norm(&mut self, step: usize, op: &GateOp) {
        let drift = norm_drift(&self.state);
        if drift > self.norm_tolerance {
            let warning = UnnormalizedStateWarning {
                step,
                operation: op.to_string(),
                norm_sqr: self.state.norm_sqr(),
            };
            warn!(
                step,
                op = %op,
                norm_sqr = warning.norm_sqr,
                "state norm drifted beyond tolerance"
            );
            self.warnings.push(warning);
        }
    }
}

/// Applies a `2^k x 2^k` matrix to `targets` in place.
///
/// `targets[0]` is the most significant bit of the matrix's local index.
/// Callers guarantee that the targets are distinct, in range, and match the
/// matrix arity.
pub(crate) fn apply_matrix(state: &mut StateVector, targets: &[QubitIndex], matrix: &GateMatrix) {
    let n = state.num_qubits();
    let k = targets.len();
    let sub_dim = 1usize << k;

    let positions: Vec<usize> = targets.iter().map(|&q| bit_position(q, n)).collect();
    let mut ascending = positions.clone();
    ascending.sort_unstable();

    // offsets[local] sets the target bits spelled out by `local`
    let offsets: Vec<usize> = (0..sub_dim)
        .map(|local| {
            positions
                .iter()
                .enumerate()
                .filter(|(j, _)| (local >> (k - 1 - j)) & 1 == 1)
                .fold(0usize, |acc, (_, &pos)| acc | (1 << pos))
        })
        .collect();

    let amplitudes = state.amplitudes_mut();
    let mut gathered = vec![Complex64::zero(); sub_dim];
    for rest in 0..(1usize << (n - k)) {
        // Spread `rest` over the non-target bits, leaving zeros at the targets.
        let base = ascending.iter().fold(rest, |idx, &pos| {
            let low = idx & ((1 << pos) - 1);
            ((idx >> pos) << (pos + 1)) | low
        });

        for (slot, offset) in gathered.iter_mut().zip(offsets.iter()) {
            *slot = amplitudes[base | offset];
        }
        for (row, offset) in offsets.iter().enumerate() {
            amplitudes[base | offset] = gathered
                .iter()
                .enumerate()
                .map(|(col, amp)| matrix.entry(row, col) * amp)
                .sum();
        }
    }
}
