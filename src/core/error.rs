//! Error handling logic

use thiserror::Error;

/// Index of a qubit within a circuit, in `[0, n)`.
///
/// Qubit 0 is the most significant bit of a basis-state index.
pub type QubitIndex = usize;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CirquantError>;

/// Failures reported by circuit construction, evolution and sampling.
///
/// Every variant is returned synchronously to the caller. Nothing in the
/// crate corrects a malformed request on its own (an out-of-range qubit is
/// never clamped, an unknown gate is never skipped).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CirquantError {
    /// The requested gate name is not part of the gate library.
    #[error("Invalid Gate: '{name}' is not a supported gate")]
    InvalidGate {
        /// The name as supplied by the caller
        name: String,
    },

    /// A qubit index lies outside `[0, num_qubits)`.
    #[error("Out Of Range: qubit {qubit} is not in [0, {num_qubits})")]
    OutOfRange {
        /// Offending index
        qubit: QubitIndex,
        /// Width of the circuit or state
        num_qubits: usize,
    },

    /// A negative number of shots was requested.
    #[error("Invalid Shot Count: {shots} (must be >= 0)")]
    InvalidShotCount {
        /// The rejected shot count
        shots: i64,
    },

    /// The request is structurally malformed (arity, parameters, ordering).
    #[error("Invalid Operation: {message}")]
    InvalidOperation {
        /// InvalidOperation failure message
        message: String,
    },

    /// Failure inside the simulation process itself.
    #[error("Simulation Process Error: {message}")]
    SimulationError {
        /// SimulationError failure message
        message: String,
    },
}

impl CirquantError {
    pub(crate) fn invalid_operation(message: impl Into<String>) -> Self {
        CirquantError::InvalidOperation { message: message.into() }
    }

    pub(crate) fn simulation(message: impl Into<String>) -> Self {
        CirquantError::SimulationError { message: message.into() }
    }
}

/// Checks that every index in `qubits` is below `num_qubits` and that no
/// index repeats.
pub(crate) fn check_qubits(qubits: &[QubitIndex], num_qubits: usize) -> Result<()> {
    for (pos, &qubit) in qubits.iter().enumerate() {
        if qubit >= num_qubits {
            return Err(CirquantError::OutOfRange { qubit, num_qubits });
        }
        if qubits[..pos].contains(&qubit) {
            return Err(CirquantError::invalid_operation(format!(
                "qubit {} appears more than once in {:?}",
                qubit, qubits
            )));
        }
    }
    Ok(())
}
