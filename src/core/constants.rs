//! Numeric defaults shared by the simulator.

/// Defaults used when a caller does not configure a value explicitly.
pub mod sim_constants {
    /// Norm drift tolerated after a gate before a warning is raised.
    pub const DEFAULT_NORM_TOLERANCE: f64 = 1e-6;
    /// Allowed deviation of `U†U` from the identity for a matrix to count as unitary.
    pub const UNITARY_TOLERANCE: f64 = 1e-9;
    /// Shot count used by the interactive demos.
    pub const DEFAULT_SHOTS: usize = 1024;
    /// Seed used when no seed is supplied, so unseeded runs stay reproducible.
    pub const DEFAULT_SEED: u64 = 42;
    /// Default cap on circuit width. A 24-qubit state vector is 256 MiB.
    pub const DEFAULT_MAX_QUBITS: usize = 24;
    /// Widest measured subset a zero-filled histogram is built for.
    pub const MAX_HISTOGRAM_QUBITS: usize = 16;
    /// Hard cap on circuit width; `2^n` must fit comfortably in `usize`.
    pub const HARD_MAX_QUBITS: usize = 32;
}
