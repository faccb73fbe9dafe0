//! Entanglement: H then CNOT prepares (|00> + |11>)/sqrt(2).
//! Outcomes are perfectly correlated, so 01 and 10 never appear.

use cirquant::{CircuitBuilder, CirquantError, Simulator};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), CirquantError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    println!("--- cirquant Example: Bell State ---");

    let circuit = CircuitBuilder::new(2)
        .gate("h", &[0], &[])
        .gate("cx", &[0, 1], &[])
        .measure_all()
        .build()?;
    println!("\nCircuit Definition:\n{}", circuit);
    println!("Operation history: {}", circuit.history().join(" -> "));

    let simulator = Simulator::new();
    let state = simulator.run_statevector(&circuit)?;
    println!("\nFinal state vector:");
    for (i, amp) in state.amplitudes().iter().enumerate() {
        println!("  |{}>: {:.4}", state.basis_label(i), amp);
    }

    let counts = simulator.run_measurement(&circuit, 1024, Some(7))?;
    println!("\nHistogram (all outcomes):");
    for (bits, n) in counts.with_all_outcomes()? {
        println!("  {}: {:>5} {}", bits, n, "#".repeat(n / 16));
    }
    Ok(())
}
