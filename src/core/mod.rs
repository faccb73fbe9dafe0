// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod state;

// Re-export public types for convenient access via `cirquant::core::TypeName`
pub use error::{CirquantError, QubitIndex, Result};
pub use state::StateVector;

pub mod constants;
pub use constants::sim_constants::{
    DEFAULT_MAX_QUBITS, DEFAULT_NORM_TOLERANCE, DEFAULT_SEED, DEFAULT_SHOTS, HARD_MAX_QUBITS,
    MAX_HISTOGRAM_QUBITS, UNITARY_TOLERANCE,
};
