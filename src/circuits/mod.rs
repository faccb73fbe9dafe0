// src/circuits/mod.rs

//! Defines structures for representing and building ordered sequences of
//! gate applications followed by an optional measurement declaration.
//!
//! Every insertion is validated against the circuit width before anything is
//! stored, so a failed `add_*` call leaves the circuit exactly as it was.

use std::collections::BTreeSet;
use std::fmt;

use crate::core::error::check_qubits;
use crate::core::{CirquantError, QubitIndex, Result};
use crate::gates::{Gate, GateMatrix};
use crate::operations::GateOp;

/// An ordered list of gate applications over `num_qubits` qubits plus the
/// set of qubits to measure once evolution is complete.
///
/// Measurement is terminal: once any qubit is marked for measurement no
/// further gates may be added. Running a circuit never mutates it, so the
/// same circuit can be run any number of times.
#[derive(Clone, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    /// The order is significant and is the order of evolution.
    operations: Vec<GateOp>,
    measured: BTreeSet<QubitIndex>,
}

impl Circuit {
    /// Creates an empty circuit on `num_qubits` qubits, all starting in |0⟩.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            operations: Vec::new(),
            measured: BTreeSet::new(),
        }
    }

    /// Appends a gate looked up by name, e.g. `add_gate("cx", &[0, 1], &[])`.
    ///
    /// # Errors
    /// * `InvalidGate` if the name is unknown.
    /// * `OutOfRange` if any qubit is `>= num_qubits`.
    /// * `InvalidOperation` for wrong arity or parameters, repeated qubits,
    ///   or a gate added after a measurement.
    pub fn add_gate(
        &mut self,
        name: &str,
        qubits: &[QubitIndex],
        params: &[f64],
    ) -> Result<&mut Self> {
        let gate = Gate::from_name(name, params)?;
        self.add_op(gate, qubits)
    }

    /// Appends an already resolved gate.
    pub fn add_op(&mut self, gate: Gate, qubits: &[QubitIndex]) -> Result<&mut Self> {
        if !self.measured.is_empty() {
            return Err(CirquantError::invalid_operation(format!(
                "cannot apply {} after measurement; measurement must be the final step",
                gate
            )));
        }
        let op = GateOp::new(gate, qubits, self.num_qubits)?;
        self.operations.push(op);
        Ok(self)
    }

    /// Appends an arbitrary unitary; its size picks the single- or two-qubit form.
    pub fn add_unitary(&mut self, matrix: GateMatrix, qubits: &[QubitIndex]) -> Result<&mut Self> {
        let gate = match matrix {
            GateMatrix::Single(m) => Gate::unitary1(m)?,
            GateMatrix::Two(m) => Gate::unitary2(m)?,
        };
        self.add_op(gate, qubits)
    }

    /// Marks `qubits` for measurement. Repeated calls accumulate.
    pub fn add_measurement(&mut self, qubits: &[QubitIndex]) -> Result<&mut Self> {
        check_qubits(qubits, self.num_qubits)?;
        self.measured.extend(qubits.iter().copied());
        Ok(self)
    }

    /// Marks every qubit for measurement.
    ///
    /// Linear in the circuit width. Widths above
    /// [`SimConfig::max_qubits`](crate::SimConfig::max_qubits) are still
    /// refused when the circuit is run.
    pub fn measure_all(&mut self) -> &mut Self {
        self.measured.extend(0..self.num_qubits);
        self
    }

    /// Width of the circuit.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The gate applications in order.
    pub fn operations(&self) -> &[GateOp] {
        &self.operations
    }

    /// Qubits marked for measurement, ascending.
    pub fn measured_qubits(&self) -> Vec<QubitIndex> {
        self.measured.iter().copied().collect()
    }

    /// Returns `true` if any qubit is marked for measurement.
    pub fn has_measurement(&self) -> bool {
        !self.measured.is_empty()
    }

    /// Number of gate applications.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the circuit contains no gates.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Operation history as short labels, e.g. `["H(0)", "CNOT(0,1)"]`.
    pub fn history(&self) -> Vec<String> {
        self.operations.iter().map(|op| op.to_string()).collect()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// Chained construction of a [`Circuit`]. The first failing step is kept
/// and reported by [`build`](CircuitBuilder::build); later steps are skipped.
pub struct CircuitBuilder {
    circuit: Circuit,
    error: Option<CirquantError>,
}

impl CircuitBuilder {
    /// Starts a builder for a circuit of `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            circuit: Circuit::new(num_qubits),
            error: None,
        }
    }

    fn step<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut Circuit) -> Result<()>,
    {
        if self.error.is_none() {
            if let Err(e) = f(&mut self.circuit) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Adds a gate by name.
    pub fn gate(self, name: &str, qubits: &[QubitIndex], params: &[f64]) -> Self {
        self.step(|c| c.add_gate(name, qubits, params).map(|_| ()))
    }

    /// Adds a resolved gate.
    pub fn op(self, gate: Gate, qubits: &[QubitIndex]) -> Self {
        self.step(|c| c.add_op(gate, qubits).map(|_| ()))
    }

    /// Marks qubits for measurement.
    pub fn measure(self, qubits: &[QubitIndex]) -> Self {
        self.step(|c| c.add_measurement(qubits).map(|_| ()))
    }

    /// Marks every qubit for measurement.
    pub fn measure_all(self) -> Self {
        self.step(|c| {
            c.measure_all();
            Ok(())
        })
    }

    /// Finalizes the construction process and returns the built `Circuit`.
    pub fn build(self) -> Result<Circuit> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.circuit),
        }
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num_qubits = self.num_qubits;
        let num_cols = self.operations.len() + usize::from(self.has_measurement());
        writeln!(
            f,
            "cirquant::Circuit[{} operations on {} qubits]",
            self.operations.len(),
            num_qubits
        )?;
        if num_qubits == 0 || num_cols == 0 {
            return Ok(());
        }

        let labels: Vec<String> = (0..num_qubits).map(|q| format!("q{}: ", q)).collect();
        let label_width = labels.iter().map(|l| l.len()).max().unwrap_or(0);

        const GATE_WIDTH: usize = 7; // e.g., "───H───"
        const WIRE: &str = "───────";
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        // op_grid[row][time] holds the gate or wire segment for that cell;
        // v_connect[row][time] the connector drawn below that row.
        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_cols]; num_qubits];
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_cols]; num_qubits];

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre_dashes = total_dashes / 2;
                let post_dashes = total_dashes - pre_dashes;
                format!(
                    "{}{}{}",
                    H_WIRE.to_string().repeat(pre_dashes),
                    symbol,
                    H_WIRE.to_string().repeat(post_dashes)
                )
            }
        }

        for (t, op) in self.operations.iter().enumerate() {
            let gate = op.gate();
            match op.qubits() {
                [q] => {
                    if *gate != Gate::I {
                        op_grid[*q][t] = format_gate(gate.symbol());
                    }
                }
                [a, b] => {
                    let (sym_a, sym_b) = match gate {
                        Gate::Cnot => ("@", "X"),
                        Gate::Cz => ("@", "Z"),
                        Gate::Swap => ("x", "x"),
                        _ => ("U", "U"),
                    };
                    op_grid[*a][t] = format_gate(sym_a);
                    op_grid[*b][t] = format_gate(sym_b);
                    let (r_min, r_max) = ((*a).min(*b), (*a).max(*b));
                    for row_vec in v_connect.iter_mut().take(r_max).skip(r_min) {
                        row_vec[t] = V_WIRE;
                    }
                }
                _ => {}
            }
        }
        if self.has_measurement() {
            let t = num_cols - 1;
            for q in &self.measured {
                op_grid[*q][t] = format_gate("M");
            }
        }

        let label_padding = " ".repeat(label_width);
        for r in 0..num_qubits {
            write!(f, "{:<width$}", labels[r], width = label_width)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            if r < num_qubits - 1 {
                write!(f, "{}", label_padding)?;
                for t in 0..num_cols {
                    let padding_needed = GATE_WIDTH - 1;
                    let pre_pad = padding_needed / 2;
                    let post_pad = padding_needed - pre_pad;
                    write!(
                        f,
                        "{}{}{}",
                        " ".repeat(pre_pad),
                        v_connect[r][t],
                        " ".repeat(post_pad)
                    )?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// Keep the Debug impl delegating to Display
impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gates_are_recorded_in_order() -> Result<()> {
        let mut c = Circuit::new(2);
        c.add_gate("h", &[0], &[])?.add_gate("cx", &[0, 1], &[])?;
        assert_eq!(c.len(), 2);
        assert_eq!(c.history(), vec!["H(0)", "CNOT(0,1)"]);
        Ok(())
    }

    #[test]
    fn out_of_range_leaves_circuit_untouched() {
        let mut c = Circuit::new(2);
        c.add_gate("h", &[0], &[]).unwrap();
        let before = c.clone();
        let err = c.add_gate("cx", &[0, 2], &[]).unwrap_err();
        assert_eq!(err, CirquantError::OutOfRange { qubit: 2, num_qubits: 2 });
        assert_eq!(c, before);
    }

    #[test]
    fn unknown_gate_is_reported() {
        let mut c = Circuit::new(1);
        assert!(matches!(c.add_gate("fredkin", &[0], &[]), Err(CirquantError::InvalidGate { .. })));
        assert!(c.is_empty());
    }

    #[test]
    fn gate_after_measurement_is_rejected() {
        let mut c = Circuit::new(1);
        c.add_measurement(&[0]).unwrap();
        assert!(matches!(c.add_gate("x", &[0], &[]), Err(CirquantError::InvalidOperation { .. })));
        assert!(c.is_empty());
    }

    #[test]
    fn measurements_accumulate_sorted() -> Result<()> {
        let mut c = Circuit::new(3);
        c.add_measurement(&[2])?.add_measurement(&[0, 2])?;
        assert_eq!(c.measured_qubits(), vec![0, 2]);
        assert!(c.add_measurement(&[3]).is_err());
        assert_eq!(c.measured_qubits(), vec![0, 2]);
        Ok(())
    }

    #[test]
    fn builder_reports_first_error() {
        let result = CircuitBuilder::new(1)
            .gate("h", &[0], &[])
            .gate("h", &[4], &[])
            .gate("nope", &[0], &[])
            .build();
        assert_eq!(result.unwrap_err(), CirquantError::OutOfRange { qubit: 4, num_qubits: 1 });
    }

    #[test]
    fn builder_measure_all() -> Result<()> {
        let c = CircuitBuilder::new(2).gate("h", &[0], &[]).measure_all().build()?;
        assert_eq!(c.measured_qubits(), vec![0, 1]);
        Ok(())
    }

    #[test]
    fn add_unitary_checks_matrix() {
        let mut c = Circuit::new(1);
        let bad = GateMatrix::Single([[num_complex::Complex64::new(3.0, 0.0); 2]; 2]);
        assert!(c.add_unitary(bad, &[0]).is_err());
        assert!(c.add_unitary(Gate::H.matrix(), &[0]).is_ok());
    }

    #[test]
    fn diagram_shows_gates_and_measurement() -> Result<()> {
        let c = CircuitBuilder::new(2)
            .gate("h", &[0], &[])
            .gate("cnot", &[0, 1], &[])
            .measure_all()
            .build()?;
        let text = c.to_string();
        assert!(text.starts_with("cirquant::Circuit[2 operations on 2 qubits]"));
        assert!(text.contains("q0: ───H──────@──────M───"));
        assert!(text.contains("q1: ──────────X──────M───"));
        assert!(text.contains('│'));
        Ok(())
    }
}
