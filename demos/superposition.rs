//! Superposition: a Hadamard on |0> followed by repeated measurement.
//! Comparable to the "random bit generator" preset of the interactive demo.

use cirquant::{CircuitBuilder, CirquantError, Simulator};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), CirquantError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    println!("--- cirquant Example: Superposition ---");

    let circuit = CircuitBuilder::new(1)
        .gate("h", &[0], &[])
        .measure(&[0])
        .build()?;
    println!("\nCircuit Definition:\n{}", circuit);

    let simulator = Simulator::new();
    let state = simulator.run_statevector(&circuit)?;
    println!("State before measurement: {}", state);
    println!("  P(0) = {:.4}, P(1) = {:.4}", state.probabilities()[0], state.probabilities()[1]);

    match simulator.run_default_shots(&circuit) {
        Ok(counts) => {
            println!("\n{}", counts);
            println!("Each shot is an independent fair coin: roughly half 0 and half 1.");
        }
        Err(e) => {
            eprintln!("\n--- Simulation Failed ---");
            eprintln!("Error: {}", e);
            return Err(e);
        }
    }

    Ok(())
}
