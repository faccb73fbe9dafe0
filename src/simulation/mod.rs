// src/simulation/mod.rs

//! Running circuits: state evolution and measurement sampling.
//!
//! A run moves through [`RunPhase`]s: `Built → Evolving → Measured | StateOnly
//! → Done`. Every run allocates its own [`StateVector`] and, when sampling,
//! its own seeded random source, so runs never share mutable state and the
//! same [`Circuit`] may be run repeatedly or from several threads at once.
//!
//! Memory and time grow as `2^n` in the number of qubits. Widths above
//! [`SimConfig::max_qubits`] are refused up front.

pub(crate) mod engine;
pub mod results;
pub mod sampler;

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use tracing::{debug, instrument};

use crate::circuits::Circuit;
use crate::core::{
    CirquantError, Result, StateVector, DEFAULT_MAX_QUBITS, DEFAULT_NORM_TOLERANCE, DEFAULT_SEED,
    DEFAULT_SHOTS, HARD_MAX_QUBITS,
};
use crate::operations::GateOp;
use engine::SimulationEngine;

pub use results::{Evolution, OutcomeRecord, UnnormalizedStateWarning};
pub use sampler::{marginal_distribution, sample};

/// Configuration for a [`Simulator`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Seed for measurement sampling. `None` falls back to [`DEFAULT_SEED`].
    pub seed: Option<u64>,
    /// Norm drift after a gate that triggers an [`UnnormalizedStateWarning`].
    pub norm_tolerance: f64,
    /// Widest circuit the simulator will allocate a state for.
    pub max_qubits: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            norm_tolerance: DEFAULT_NORM_TOLERANCE,
            max_qubits: DEFAULT_MAX_QUBITS,
        }
    }
}

impl SimConfig {
    /// Sets the sampling seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the norm drift tolerance.
    pub fn with_norm_tolerance(mut self, tolerance: f64) -> Self {
        self.norm_tolerance = tolerance;
        self
    }

    /// Sets the qubit cap, clamped to [`HARD_MAX_QUBITS`].
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits.min(HARD_MAX_QUBITS);
        self
    }
}

/// Lifecycle of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPhase {
    /// Circuit accepted, no state allocated yet.
    Built,
    /// Gates are being applied.
    Evolving,
    /// Evolution finished and outcomes were sampled.
    Measured,
    /// Evolution finished and the raw state is returned.
    StateOnly,
    /// Terminal.
    Done,
}

impl RunPhase {
    /// Whether `self → next` is a legal step.
    pub fn can_transition_to(self, next: RunPhase) -> bool {
        matches!(
            (self, next),
            (RunPhase::Built, RunPhase::Evolving)
                | (RunPhase::Evolving, RunPhase::Measured)
                | (RunPhase::Evolving, RunPhase::StateOnly)
                | (RunPhase::Measured, RunPhase::Done)
                | (RunPhase::StateOnly, RunPhase::Done)
        )
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Built => "Built",
            RunPhase::Evolving => "Evolving",
            RunPhase::Measured => "Measured",
            RunPhase::StateOnly => "StateOnly",
            RunPhase::Done => "Done",
        };
        write!(f, "{}", name)
    }
}

/// Runs circuits. Holds configuration only, so it can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimConfig,
}

impl Simulator {
    /// Creates a simulator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a simulator with `config`.
    pub fn with_config(config: SimConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Evolves |0...0⟩ through the circuit's gates and reports the final
    /// state together with any norm warnings.
    #[instrument(skip_all, fields(num_qubits = circuit.num_qubits(), gates = circuit.len()))]
    pub fn evolve(&self, circuit: &Circuit) -> Result<Evolution> {
        self.check_width(circuit.num_qubits())?;
        let initial = StateVector::zero(circuit.num_qubits())?;
        self.evolve_from(circuit, initial)
    }

    /// Evolves a caller-supplied initial state through the circuit's gates.
    pub fn evolve_from(&self, circuit: &Circuit, initial: StateVector) -> Result<Evolution> {
        self.check_width(circuit.num_qubits())?;
        let mut engine = SimulationEngine::init(initial, self.config.norm_tolerance);
        engine.run(circuit)?;
        let evolution = engine.into_evolution();
        debug!(warnings = evolution.warnings().len(), "evolution finished");
        Ok(evolution)
    }

    /// Applies a single gate operation to `state` in place.
    ///
    /// On error `state` is unchanged.
    pub fn apply(&self, state: &mut StateVector, op: &GateOp) -> Result<()> {
        let owned = std::mem::replace(state, StateVector::zero(0)?);
        let mut engine = SimulationEngine::init(owned, self.config.norm_tolerance);
        let outcome = engine.apply_operation(op);
        *state = engine.into_evolution().into_state();
        outcome
    }

    /// Final state vector of the circuit. Measurement declarations are
    /// ignored, so this shows the state just before any collapse.
    pub fn run_statevector(&self, circuit: &Circuit) -> Result<StateVector> {
        debug!(phase = %RunPhase::Evolving, "run phase");
        let evolution = self.evolve(circuit)?;
        debug!(phase = %RunPhase::StateOnly, "run phase");
        Ok(evolution.into_state())
    }

    /// Samples the circuit's measured qubits `shots` times.
    ///
    /// The seed is taken from `seed`, then from the configuration, then
    /// [`DEFAULT_SEED`]. A circuit without a measurement declaration samples
    /// the empty subset and yields `{"": shots}`.
    ///
    /// # Errors
    /// `InvalidShotCount` for negative `shots`, plus any evolution error.
    #[instrument(skip_all, fields(num_qubits = circuit.num_qubits(), shots = shots))]
    pub fn run_measurement(
        &self,
        circuit: &Circuit,
        shots: i64,
        seed: Option<u64>,
    ) -> Result<OutcomeRecord> {
        let shot_count =
            usize::try_from(shots).map_err(|_| CirquantError::InvalidShotCount { shots })?;
        debug!(phase = %RunPhase::Evolving, "run phase");
        let evolution = self.evolve(circuit)?;

        let seed = seed.or(self.config.seed).unwrap_or(DEFAULT_SEED);
        let mut rng = StdRng::seed_from_u64(seed);
        let qubits = circuit.measured_qubits();
        let record = sample(evolution.state(), &qubits, shot_count, &mut rng)?;
        debug!(phase = %RunPhase::Measured, seed, distinct = record.len(), "run phase");
        Ok(record)
    }

    /// [`run_measurement`](Self::run_measurement) with [`DEFAULT_SHOTS`].
    pub fn run_default_shots(&self, circuit: &Circuit) -> Result<OutcomeRecord> {
        self.run_measurement(circuit, DEFAULT_SHOTS as i64, None)
    }

    fn check_width(&self, num_qubits: usize) -> Result<()> {
        if num_qubits > self.config.max_qubits {
            return Err(CirquantError::simulation(format!(
                "{} qubits exceeds the configured maximum of {}",
                num_qubits, self.config.max_qubits
            )));
        }
        Ok(())
    }
}

/// Final state vector of `circuit` using the default configuration.
pub fn run_statevector(circuit: &Circuit) -> Result<StateVector> {
    Simulator::new().run_statevector(circuit)
}

/// Measurement counts of `circuit` using the default configuration.
pub fn run_measurement(circuit: &Circuit, shots: i64, seed: Option<u64>) -> Result<OutcomeRecord> {
    Simulator::new().run_measurement(circuit, shots, seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_phase_paths() {
        assert!(RunPhase::Built.can_transition_to(RunPhase::Evolving));
        assert!(RunPhase::Evolving.can_transition_to(RunPhase::Measured));
        assert!(RunPhase::Evolving.can_transition_to(RunPhase::StateOnly));
        assert!(RunPhase::Measured.can_transition_to(RunPhase::Done));
        assert!(RunPhase::StateOnly.can_transition_to(RunPhase::Done));
    }

    #[test]
    fn done_is_terminal() {
        let all = [
            RunPhase::Built,
            RunPhase::Evolving,
            RunPhase::Measured,
            RunPhase::StateOnly,
            RunPhase::Done,
        ];
        for next in all {
            assert!(!RunPhase::Done.can_transition_to(next));
        }
        assert!(!RunPhase::Built.can_transition_to(RunPhase::Measured));
    }

    #[test]
    fn config_builders() {
        let c = SimConfig::default().with_seed(7).with_norm_tolerance(1e-3).with_max_qubits(100);
        assert_eq!(c.seed, Some(7));
        assert_eq!(c.norm_tolerance, 1e-3);
        assert_eq!(c.max_qubits, HARD_MAX_QUBITS);
    }

    #[test]
    fn width_cap_is_enforced() {
        let sim = Simulator::with_config(SimConfig::default().with_max_qubits(2));
        let c = Circuit::new(3);
        assert!(matches!(sim.evolve(&c), Err(CirquantError::SimulationError { .. })));
    }

    #[test]
    fn apply_failure_keeps_state() {
        let sim = Simulator::new();
        let mut state = StateVector::zero(1).unwrap();
        let op = GateOp::new(crate::gates::Gate::H, &[0], 1).unwrap();
        sim.apply(&mut state, &op).unwrap();
        let before = state.clone();
        let wide = GateOp::new(crate::gates::Gate::X, &[2], 3).unwrap();
        assert!(sim.apply(&mut state, &wide).is_err());
        assert_eq!(state, before);
    }
}
