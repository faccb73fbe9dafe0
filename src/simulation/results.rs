// src/simulation/results.rs
use std::collections::BTreeMap;
use std::fmt;

use crate::core::state::format_bits;
use crate::core::{CirquantError, Result, StateVector, MAX_HISTOGRAM_QUBITS};

/// Non-fatal report that the state norm drifted beyond the configured
/// tolerance after a gate. The state is left as computed.
#[derive(Debug, Clone, PartialEq)]
pub struct UnnormalizedStateWarning {
    /// Zero-based index of the gate after which the drift was seen.
    pub step: usize,
    /// The gate, formatted like `H(0)`.
    pub operation: String,
    /// Observed ‖ψ‖².
    pub norm_sqr: f64,
}

impl fmt::Display for UnnormalizedStateWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unnormalized state after step {} ({}): |psi|^2 = {:.12}",
            self.step, self.operation, self.norm_sqr
        )
    }
}

/// Final state of an evolution run plus any norm warnings raised on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Evolution {
    state: StateVector,
    warnings: Vec<UnnormalizedStateWarning>,
}

impl Evolution {
    pub(crate) fn new(state: StateVector, warnings: Vec<UnnormalizedStateWarning>) -> Self {
        Self { state, warnings }
    }

    /// The evolved state.
    pub fn state(&self) -> &StateVector {
        &self.state
    }

    /// Norm warnings in the order they occurred.
    pub fn warnings(&self) -> &[UnnormalizedStateWarning] {
        &self.warnings
    }

    /// Consumes the report, keeping only the state.
    pub fn into_state(self) -> StateVector {
        self.state
    }
}

/// Histogram of measured bitstrings.
///
/// Keys list the measured qubits in ascending index order. Only outcomes
/// that occurred are stored; the counts always add up to [`shots`](Self::shots).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeRecord {
    counts: BTreeMap<String, usize>,
    shots: usize,
    /// Number of measured qubits (length of every key).
    width: usize,
}

impl OutcomeRecord {
    pub(crate) fn new(width: usize) -> Self {
        Self {
            counts: BTreeMap::new(),
            shots: 0,
            width,
        }
    }

    pub(crate) fn record(&mut self, bitstring: String, count: usize) {
        if count == 0 {
            return;
        }
        *self.counts.entry(bitstring).or_insert(0) += count;
        self.shots += count;
    }

    /// Occurrences of `bitstring`, zero if it never occurred.
    pub fn get(&self, bitstring: &str) -> usize {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// All observed outcomes and their counts.
    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    /// Total number of shots recorded.
    pub fn shots(&self) -> usize {
        self.shots
    }

    /// Number of measured qubits.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of distinct outcomes observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates over `(bitstring, count)` in bitstring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Relative frequency of each observed outcome.
    pub fn probabilities(&self) -> BTreeMap<String, f64> {
        if self.shots == 0 {
            return BTreeMap::new();
        }
        let total = self.shots as f64;
        self.counts
            .iter()
            .map(|(k, v)| (k.clone(), *v as f64 / total))
            .collect()
    }

    /// Counts for every possible bitstring of the measured width, with zero
    /// for outcomes that never occurred. Suited to plotting a full histogram.
    ///
    /// # Errors
    /// `SimulationError` if the width exceeds [`MAX_HISTOGRAM_QUBITS`], since
    /// the result holds `2^width` entries.
    pub fn with_all_outcomes(&self) -> Result<BTreeMap<String, usize>> {
        if self.width > MAX_HISTOGRAM_QUBITS {
            return Err(CirquantError::simulation(format!(
                "a full histogram over {} qubits exceeds the limit of {}",
                self.width, MAX_HISTOGRAM_QUBITS
            )));
        }
        Ok((0..1usize << self.width)
            .map(|i| {
                let key = format_bits(i, self.width);
                let count = self.get(&key);
                (key, count)
            })
            .collect())
    }

    /// The most frequent outcome; ties go to the smallest bitstring.
    pub fn most_frequent(&self) -> Option<(&str, usize)> {
        let mut best: Option<(&str, usize)> = None;
        for (k, v) in self.iter() {
            if best.is_none_or(|(_, best_v)| v > best_v) {
                best = Some((k, v));
            }
        }
        best
    }
}

impl fmt::Display for OutcomeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Measurement Results ({} shots):", self.shots)?;
        if self.counts.is_empty() {
            writeln!(f, "  No outcomes recorded.")?;
        } else {
            for (bits, count) in &self.counts {
                let label = if bits.is_empty() { "-" } else { bits.as_str() };
                writeln!(f, "  |{}>: {}", label, count)?;
            }
        }
        Ok(())
    }
}
