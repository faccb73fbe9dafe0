//! Interference: a second Hadamard undoes the first, so the |1> amplitude
//! cancels and every shot reads 0. Rotations in degrees show the same effect
//! partially.

use cirquant::{build_circuit, CirquantError, Gate, Simulator};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), CirquantError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    println!("--- cirquant Example: Interference ---");
    let simulator = Simulator::new();

    let mut hh = build_circuit(1);
    hh.add_gate("h", &[0], &[])?.add_gate("h", &[0], &[])?.add_measurement(&[0])?;
    println!("\nCircuit Definition:\n{}", hh);
    println!("{}", simulator.run_default_shots(&hh)?);

    // H, Rz(phi), H: the phase between the two paths sets P(1) = sin^2(phi/2)
    for degrees in [0.0, 45.0, 90.0, 135.0, 180.0] {
        let mut circuit = build_circuit(1);
        circuit
            .add_gate("h", &[0], &[])?
            .add_op(Gate::rz_degrees(degrees), &[0])?
            .add_gate("h", &[0], &[])?
            .add_measurement(&[0])?;
        let counts = simulator.run_measurement(&circuit, 1000, Some(3))?;
        println!("Rz({:>5.1} deg): P(1) ~ {:.3}", degrees, counts.get("1") as f64 / 1000.0);
    }
    Ok(())
}
