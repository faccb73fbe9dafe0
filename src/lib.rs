// src/lib.rs

//! `cirquant` - a small state-vector quantum circuit simulator
//!
//! Builds circuits from named gates, evolves |0...0⟩ through them, and
//! samples measurement outcomes with a caller-seeded random source. It is the
//! computational core behind interactive demos of superposition,
//! entanglement and interference; rendering is left to the caller.
//!
//! Conventions: qubit 0 is the most significant bit of a basis index and the
//! leftmost character of a bitstring.

pub mod core;
pub mod gates;
pub mod operations;
pub mod circuits;
pub mod simulation;
pub mod validation;

// Re-export the most common types for easier top-level use
pub use crate::core::{CirquantError, QubitIndex, Result, StateVector};
pub use gates::{Gate, GateMatrix};
pub use operations::GateOp;
pub use circuits::{Circuit, CircuitBuilder};
pub use simulation::{
    Evolution, OutcomeRecord, RunPhase, SimConfig, Simulator, UnnormalizedStateWarning,
    run_measurement, run_statevector,
};
pub use validation::{check_normalization, check_unitary};

/// Creates an empty circuit over `num_qubits` qubits.
pub fn build_circuit(num_qubits: usize) -> Circuit {
    Circuit::new(num_qubits)
}

// Example 1: Superposition
// A Hadamard on |0> gives equal amplitudes; sampling splits roughly evenly.
/// ```
/// use cirquant::{build_circuit, run_measurement, run_statevector, CirquantError};
///
/// # fn main() -> Result<(), CirquantError> {
/// let mut circuit = build_circuit(1);
/// circuit.add_gate("h", &[0], &[])?;
///
/// let state = run_statevector(&circuit)?;
/// let half = std::f64::consts::FRAC_1_SQRT_2;
/// assert!((state.amplitudes()[0].re - half).abs() < 1e-12);
/// assert!((state.amplitudes()[1].re - half).abs() < 1e-12);
///
/// circuit.add_measurement(&[0])?;
/// let counts = run_measurement(&circuit, 1000, Some(7))?;
/// assert_eq!(counts.get("0") + counts.get("1"), 1000);
/// println!("{}", counts);
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = ();

// Example 2: Entanglement
// H then CNOT prepares a Bell state whose outcomes are perfectly correlated.
/// ```
/// use cirquant::{CircuitBuilder, Simulator, CirquantError};
///
/// # fn main() -> Result<(), CirquantError> {
/// let circuit = CircuitBuilder::new(2)
///     .gate("h", &[0], &[])
///     .gate("cnot", &[0, 1], &[])
///     .measure_all()
///     .build()?;
/// println!("{}", circuit);
///
/// let counts = Simulator::new().run_measurement(&circuit, 500, Some(1))?;
/// assert_eq!(counts.get("01"), 0);
/// assert_eq!(counts.get("10"), 0);
/// assert_eq!(counts.get("00") + counts.get("11"), 500);
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = ();

// Example 3: Interference
// A second Hadamard cancels the |1> amplitude, so every shot reads 0.
/// ```
/// use cirquant::{CircuitBuilder, run_measurement, CirquantError};
///
/// # fn main() -> Result<(), CirquantError> {
/// let circuit = CircuitBuilder::new(1)
///     .gate("h", &[0], &[])
///     .gate("h", &[0], &[])
///     .measure(&[0])
///     .build()?;
/// let counts = run_measurement(&circuit, 256, None)?;
/// assert_eq!(counts.get("0"), 256);
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = ();
