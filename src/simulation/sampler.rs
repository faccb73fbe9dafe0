// src/simulation/sampler.rs

//! Repeated measurement of a state vector in the computational basis.

use rand::Rng;
use rand::distr::{Distribution, StandardUniform};
use tracing::debug;

use crate::core::error::check_qubits;
use crate::core::state::{bit_position, format_bits};
use crate::core::{QubitIndex, Result, StateVector};
use crate::simulation::results::OutcomeRecord;

/// Draws `shots` independent outcomes for `qubits` from `state`.
///
/// Each basis state contributes `|amplitude|²`; probabilities are summed over
/// the qubits not in `qubits` to give the marginal distribution of the
/// measured subset, which is then sampled categorically. Outcome bitstrings
/// list `qubits` in the order given (callers pass them ascending).
///
/// The state is only read. The one side effect is consuming `rng`, so a
/// generator must not be shared between concurrent runs.
///
/// * `shots == 0` yields an empty record.
/// * An empty `qubits` yields the single outcome `""` with count `shots`.
///
/// # Errors
/// `OutOfRange` or `InvalidOperation` if `qubits` is out of range or repeats.
pub fn sample<R: Rng + ?Sized>(
    state: &StateVector,
    qubits: &[QubitIndex],
    shots: usize,
    rng: &mut R,
) -> Result<OutcomeRecord> {
    check_qubits(qubits, state.num_qubits())?;
    let width = qubits.len();
    let mut record = OutcomeRecord::new(width);
    if shots == 0 {
        return Ok(record);
    }
    if width == 0 {
        record.record(String::new(), shots);
        return Ok(record);
    }

    let marginal = marginal_distribution(state, qubits)?;

    // cumulative[i] = P(outcome <= i)
    let cumulative: Vec<f64> = marginal
        .iter()
        .scan(0.0, |acc, p| {
            *acc += p;
            Some(*acc)
        })
        .collect();
    let total = cumulative.last().copied().unwrap_or(0.0);
    // Landing exactly on `total` through rounding must still pick a possible outcome.
    let fallback = marginal.iter().rposition(|p| *p > 0.0).unwrap_or(0);

    let mut tallies = vec![0usize; marginal.len()];
    for _ in 0..shots {
        let u: f64 = StandardUniform.sample(rng);
        let target = u * total;
        let idx = cumulative.partition_point(|c| *c <= target);
        let chosen = if idx < tallies.len() { idx } else { fallback };
        tallies[chosen] += 1;
    }

    for (outcome, count) in tallies.into_iter().enumerate() {
        record.record(format_bits(outcome, width), count);
    }
    debug!(shots, distinct = record.len(), "sampled outcomes");
    Ok(record)
}

/// Probability of each outcome of `qubits`, indexed with `qubits[0]` as the
/// most significant bit.
///
/// # Errors
/// `OutOfRange` or `InvalidOperation` if `qubits` is out of range or repeats.
pub fn marginal_distribution(state: &StateVector, qubits: &[QubitIndex]) -> Result<Vec<f64>> {
    check_qubits(qubits, state.num_qubits())?;
    let positions: Vec<usize> = qubits
        .iter()
        .map(|&q| bit_position(q, state.num_qubits()))
        .collect();
    let mut marginal = vec![0.0; 1usize << qubits.len()];
    for (index, amp) in state.amplitudes().iter().enumerate() {
        let p = amp.norm_sqr();
        if p == 0.0 {
            continue;
        }
        let outcome = positions
            .iter()
            .fold(0usize, |acc, &pos| (acc << 1) | ((index >> pos) & 1));
        marginal[outcome] += p;
    }
    Ok(marginal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CirquantError;
    use approx::assert_relative_eq;
    use num_complex::Complex64;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn state(amps: &[(f64, f64)]) -> StateVector {
        let amps = amps.iter().map(|&(re, im)| Complex64::new(re, im)).collect();
        StateVector::from_amplitudes(amps).unwrap()
    }

    #[test]
    fn zero_shots_is_empty() {
        let s = StateVector::zero(2).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let r = sample(&s, &[0, 1], 0, &mut rng).unwrap();
        assert!(r.is_empty());
        assert_eq!(r.shots(), 0);
    }

    #[test]
    fn empty_subset_is_single_outcome() {
        let s = StateVector::zero(2).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let r = sample(&s, &[], 17, &mut rng).unwrap();
        assert_eq!(r.len(), 1);
        assert_eq!(r.get(""), 17);
    }

    #[test]
    fn basis_state_is_deterministic() {
        // |10>
        let s = state(&[(0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]);
        let mut rng = StdRng::seed_from_u64(9);
        let r = sample(&s, &[0, 1], 50, &mut rng).unwrap();
        assert_eq!(r.get("10"), 50);
        let r = sample(&s, &[1], 50, &mut rng).unwrap();
        assert_eq!(r.get("0"), 50);
    }

    #[test]
    fn marginal_sums_over_unmeasured_qubits() {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        // (|00> + |11>)/sqrt(2)
        let s = state(&[(h, 0.0), (0.0, 0.0), (0.0, 0.0), (h, 0.0)]);
        let m = marginal_distribution(&s, &[1]).unwrap();
        assert_relative_eq!(m[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(m[1], 0.5, epsilon = 1e-12);
        // Reversed order swaps bit significance
        let s = state(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0), (0.0, 0.0)]);
        assert_eq!(marginal_distribution(&s, &[1, 0]).unwrap(), vec![0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn marginal_of_out_of_range_qubit_is_an_error() {
        let s = StateVector::zero(2).unwrap();
        assert_eq!(
            marginal_distribution(&s, &[5]).unwrap_err(),
            CirquantError::OutOfRange { qubit: 5, num_qubits: 2 }
        );
        assert!(marginal_distribution(&s, &[1, 1]).is_err());
    }

    #[test]
    fn zero_probability_outcomes_never_appear() {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let s = state(&[(h, 0.0), (0.0, 0.0), (0.0, 0.0), (0.0, -h)]);
        let mut rng = StdRng::seed_from_u64(3);
        let r = sample(&s, &[0, 1], 2000, &mut rng).unwrap();
        assert_eq!(r.get("01") + r.get("10"), 0);
        assert_eq!(r.get("00") + r.get("11"), 2000);
    }

    #[test]
    fn invalid_subset_is_rejected() {
        let s = StateVector::zero(1).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(sample(&s, &[1], 10, &mut rng).is_err());
        assert!(sample(&s, &[0, 0], 10, &mut rng).is_err());
    }
}
