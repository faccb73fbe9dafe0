// src/gates/mod.rs

//! The gate library.
//!
//! Every supported gate is a variant of the closed [`Gate`] enum. Names coming
//! from a UI are resolved once, at circuit-build time, through
//! [`Gate::from_name`]; after that the engine only ever sees typed gates.
//! Fixed gates map to `const` matrices. Rotations are pure functions of their
//! angle. Arbitrary user matrices enter through [`Gate::unitary1`] and
//! [`Gate::unitary2`], which refuse anything that is not unitary.

use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;
use std::str::FromStr;

use crate::core::{CirquantError, Result, UNITARY_TOLERANCE};
use crate::validation::check_unitary;

/// A 2x2 single-qubit matrix, row-major.
pub type Matrix2 = [[Complex64; 2]; 2];
/// A 4x4 two-qubit matrix, row-major, in the |a b⟩ basis of the gate's qubit list `[a, b]`.
pub type Matrix4 = [[Complex64; 4]; 4];

const O: Complex64 = Complex64::new(0.0, 0.0);
const L: Complex64 = Complex64::new(1.0, 0.0);
const NEG: Complex64 = Complex64::new(-1.0, 0.0);
const IM: Complex64 = Complex64::new(0.0, 1.0);
const NEG_IM: Complex64 = Complex64::new(0.0, -1.0);
const R: Complex64 = Complex64::new(FRAC_1_SQRT_2, 0.0);
const NEG_R: Complex64 = Complex64::new(-FRAC_1_SQRT_2, 0.0);

pub const IDENTITY_MATRIX: Matrix2 = [[L, O], [O, L]];
pub const HADAMARD_MATRIX: Matrix2 = [[R, R], [R, NEG_R]];
pub const PAULI_X_MATRIX: Matrix2 = [[O, L], [L, O]];
pub const PAULI_Y_MATRIX: Matrix2 = [[O, NEG_IM], [IM, O]];
pub const PAULI_Z_MATRIX: Matrix2 = [[L, O], [O, NEG]];
pub const S_MATRIX: Matrix2 = [[L, O], [O, IM]];
pub const SDG_MATRIX: Matrix2 = [[L, O], [O, NEG_IM]];
/// diag(1, e^(iπ/4))
pub const T_MATRIX: Matrix2 = [[L, O], [O, Complex64::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2)]];
pub const TDG_MATRIX: Matrix2 = [[L, O], [O, Complex64::new(FRAC_1_SQRT_2, -FRAC_1_SQRT_2)]];
/// √X = ½ [[1+i, 1-i], [1-i, 1+i]]
pub const SX_MATRIX: Matrix2 = [
    [Complex64::new(0.5, 0.5), Complex64::new(0.5, -0.5)],
    [Complex64::new(0.5, -0.5), Complex64::new(0.5, 0.5)],
];
pub const SXDG_MATRIX: Matrix2 = [
    [Complex64::new(0.5, -0.5), Complex64::new(0.5, 0.5)],
    [Complex64::new(0.5, 0.5), Complex64::new(0.5, -0.5)],
];

/// Flips the second qubit when the first is |1⟩.
pub const CNOT_MATRIX: Matrix4 = [
    [L, O, O, O],
    [O, L, O, O],
    [O, O, O, L],
    [O, O, L, O],
];
pub const CZ_MATRIX: Matrix4 = [
    [L, O, O, O],
    [O, L, O, O],
    [O, O, L, O],
    [O, O, O, NEG],
];
pub const SWAP_MATRIX: Matrix4 = [
    [L, O, O, O],
    [O, O, L, O],
    [O, L, O, O],
    [O, O, O, L],
];

/// Rotation about the X axis of the Bloch sphere.
pub fn rx_matrix(theta: f64) -> Matrix2 {
    let (sin, cos) = (theta / 2.0).sin_cos();
    [
        [Complex64::new(cos, 0.0), Complex64::new(0.0, -sin)],
        [Complex64::new(0.0, -sin), Complex64::new(cos, 0.0)],
    ]
}

/// Rotation about the Y axis of the Bloch sphere.
pub fn ry_matrix(theta: f64) -> Matrix2 {
    let (sin, cos) = (theta / 2.0).sin_cos();
    [
        [Complex64::new(cos, 0.0), Complex64::new(-sin, 0.0)],
        [Complex64::new(sin, 0.0), Complex64::new(cos, 0.0)],
    ]
}

/// Rotation about the Z axis: diag(e^(-iθ/2), e^(iθ/2)).
pub fn rz_matrix(theta: f64) -> Matrix2 {
    [
        [Complex64::from_polar(1.0, -theta / 2.0), O],
        [O, Complex64::from_polar(1.0, theta / 2.0)],
    ]
}

/// Phase gate diag(1, e^(iθ)).
pub fn phase_matrix(theta: f64) -> Matrix2 {
    [[L, O], [O, Complex64::from_polar(1.0, theta)]]
}

/// The matrix of a gate, sized by its arity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateMatrix {
    /// Acts on one qubit
    Single(Matrix2),
    /// Acts on two qubits
    Two(Matrix4),
}

impl GateMatrix {
    /// Side length of the matrix (2 or 4).
    pub fn dim(&self) -> usize {
        match self {
            GateMatrix::Single(_) => 2,
            GateMatrix::Two(_) => 4,
        }
    }

    /// Entry at `(row, col)`.
    pub fn entry(&self, row: usize, col: usize) -> Complex64 {
        match self {
            GateMatrix::Single(m) => m[row][col],
            GateMatrix::Two(m) => m[row][col],
        }
    }

    /// Number of qubits the matrix acts on.
    pub fn arity(&self) -> usize {
        match self {
            GateMatrix::Single(_) => 1,
            GateMatrix::Two(_) => 2,
        }
    }
}

/// A gate from the library, fully resolved (parameters included).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    /// Identity
    I,
    /// Hadamard, creates equal superposition from a basis state
    H,
    /// Pauli-X (NOT)
    X,
    /// Pauli-Y
    Y,
    /// Pauli-Z, flips the phase of |1⟩
    Z,
    /// Quarter turn about Z, diag(1, i)
    S,
    /// Inverse of `S`
    Sdg,
    /// Eighth turn about Z, diag(1, e^(iπ/4))
    T,
    /// Inverse of `T`
    Tdg,
    /// Square root of X
    Sx,
    /// Inverse of `Sx`
    Sxdg,
    /// Rotation about X by an angle in radians
    Rx(f64),
    /// Rotation about Y by an angle in radians
    Ry(f64),
    /// Rotation about Z by an angle in radians
    Rz(f64),
    /// Phase shift diag(1, e^(iθ))
    Phase(f64),
    /// Controlled-NOT over `[control, target]`
    Cnot,
    /// Controlled-Z
    Cz,
    /// Exchanges two qubits
    Swap,
    /// Caller-supplied single-qubit unitary
    Unitary1(Matrix2),
    /// Caller-supplied two-qubit unitary
    Unitary2(Matrix4),
}

impl Gate {
    /// Resolves a gate by name (case-insensitive) with its parameters.
    ///
    /// Parametrized gates (`rx`, `ry`, `rz`, `p`/`phase`) take exactly one
    /// finite angle in radians; all other gates take none.
    ///
    /// # Errors
    /// * [`CirquantError::InvalidGate`] for an unknown name.
    /// * [`CirquantError::InvalidOperation`] for a wrong number of parameters
    ///   or a non-finite angle.
    pub fn from_name(name: &str, params: &[f64]) -> Result<Gate> {
        let key = name.trim().to_ascii_lowercase();
        let fixed = match key.as_str() {
            "i" | "id" | "identity" => Some(Gate::I),
            "h" | "hadamard" => Some(Gate::H),
            "x" | "not" => Some(Gate::X),
            "y" => Some(Gate::Y),
            "z" => Some(Gate::Z),
            "s" => Some(Gate::S),
            "sdg" => Some(Gate::Sdg),
            "t" => Some(Gate::T),
            "tdg" => Some(Gate::Tdg),
            "sx" => Some(Gate::Sx),
            "sxdg" => Some(Gate::Sxdg),
            "cnot" | "cx" => Some(Gate::Cnot),
            "cz" => Some(Gate::Cz),
            "swap" => Some(Gate::Swap),
            _ => None,
        };
        if let Some(gate) = fixed {
            if !params.is_empty() {
                return Err(CirquantError::invalid_operation(format!(
                    "gate '{}' takes no parameters, got {}",
                    name,
                    params.len()
                )));
            }
            return Ok(gate);
        }

        let rotation: fn(f64) -> Gate = match key.as_str() {
            "rx" => Gate::Rx,
            "ry" => Gate::Ry,
            "rz" => Gate::Rz,
            "p" | "phase" => Gate::Phase,
            _ => return Err(CirquantError::InvalidGate { name: name.to_string() }),
        };
        match params {
            [theta] if theta.is_finite() => Ok(rotation(*theta)),
            [theta] => Err(CirquantError::invalid_operation(format!(
                "gate '{}' needs a finite angle, got {}",
                name, theta
            ))),
            _ => Err(CirquantError::invalid_operation(format!(
                "gate '{}' takes exactly one angle, got {} parameters",
                name,
                params.len()
            ))),
        }
    }

    /// Rx with the angle given in degrees, as the demo sliders provide it.
    pub fn rx_degrees(degrees: f64) -> Gate {
        Gate::Rx(degrees.to_radians())
    }

    /// Ry with the angle given in degrees.
    pub fn ry_degrees(degrees: f64) -> Gate {
        Gate::Ry(degrees.to_radians())
    }

    /// Rz with the angle given in degrees.
    pub fn rz_degrees(degrees: f64) -> Gate {
        Gate::Rz(degrees.to_radians())
    }

    /// Wraps a caller matrix after checking that it is unitary.
    pub fn unitary1(matrix: Matrix2) -> Result<Gate> {
        check_unitary(&GateMatrix::Single(matrix), UNITARY_TOLERANCE)?;
        Ok(Gate::Unitary1(matrix))
    }

    /// Wraps a caller two-qubit matrix after checking that it is unitary.
    pub fn unitary2(matrix: Matrix4) -> Result<Gate> {
        check_unitary(&GateMatrix::Two(matrix), UNITARY_TOLERANCE)?;
        Ok(Gate::Unitary2(matrix))
    }

    /// Checks a gate built directly from its variant: angles must be finite
    /// and custom matrices unitary.
    ///
    /// # Errors
    /// `InvalidOperation` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Gate::Rx(theta) | Gate::Ry(theta) | Gate::Rz(theta) | Gate::Phase(theta)
                if !theta.is_finite() =>
            {
                Err(CirquantError::invalid_operation(format!(
                    "gate {} needs a finite angle, got {}",
                    self.symbol(),
                    theta
                )))
            }
            Gate::Unitary1(m) => check_unitary(&GateMatrix::Single(m), UNITARY_TOLERANCE),
            Gate::Unitary2(m) => check_unitary(&GateMatrix::Two(m), UNITARY_TOLERANCE),
            _ => Ok(()),
        }
    }

    /// Number of qubits the gate acts on.
    pub fn arity(&self) -> usize {
        match self {
            Gate::Cnot | Gate::Cz | Gate::Swap | Gate::Unitary2(_) => 2,
            _ => 1,
        }
    }

    /// Returns `true` for gates that carry an angle.
    pub fn is_parametrized(&self) -> bool {
        matches!(self, Gate::Rx(_) | Gate::Ry(_) | Gate::Rz(_) | Gate::Phase(_))
    }

    /// The gate's unitary matrix.
    pub fn matrix(&self) -> GateMatrix {
        match *self {
            Gate::I => GateMatrix::Single(IDENTITY_MATRIX),
            Gate::H => GateMatrix::Single(HADAMARD_MATRIX),
            Gate::X => GateMatrix::Single(PAULI_X_MATRIX),
            Gate::Y => GateMatrix::Single(PAULI_Y_MATRIX),
            Gate::Z => GateMatrix::Single(PAULI_Z_MATRIX),
            Gate::S => GateMatrix::Single(S_MATRIX),
            Gate::Sdg => GateMatrix::Single(SDG_MATRIX),
            Gate::T => GateMatrix::Single(T_MATRIX),
            Gate::Tdg => GateMatrix::Single(TDG_MATRIX),
            Gate::Sx => GateMatrix::Single(SX_MATRIX),
            Gate::Sxdg => GateMatrix::Single(SXDG_MATRIX),
            Gate::Rx(theta) => GateMatrix::Single(rx_matrix(theta)),
            Gate::Ry(theta) => GateMatrix::Single(ry_matrix(theta)),
            Gate::Rz(theta) => GateMatrix::Single(rz_matrix(theta)),
            Gate::Phase(theta) => GateMatrix::Single(phase_matrix(theta)),
            Gate::Cnot => GateMatrix::Two(CNOT_MATRIX),
            Gate::Cz => GateMatrix::Two(CZ_MATRIX),
            Gate::Swap => GateMatrix::Two(SWAP_MATRIX),
            Gate::Unitary1(m) => GateMatrix::Single(m),
            Gate::Unitary2(m) => GateMatrix::Two(m),
        }
    }

    /// The gate that undoes this one.
    pub fn inverse(&self) -> Gate {
        match *self {
            Gate::S => Gate::Sdg,
            Gate::Sdg => Gate::S,
            Gate::T => Gate::Tdg,
            Gate::Tdg => Gate::T,
            Gate::Sx => Gate::Sxdg,
            Gate::Sxdg => Gate::Sx,
            Gate::Rx(theta) => Gate::Rx(-theta),
            Gate::Ry(theta) => Gate::Ry(-theta),
            Gate::Rz(theta) => Gate::Rz(-theta),
            Gate::Phase(theta) => Gate::Phase(-theta),
            Gate::Unitary1(m) => Gate::Unitary1(dagger2(&m)),
            Gate::Unitary2(m) => Gate::Unitary2(dagger4(&m)),
            // Remaining gates are self-inverse
            other => other,
        }
    }

    /// Short symbol used in diagrams and operation histories.
    pub fn symbol(&self) -> &'static str {
        match self {
            Gate::I => "I",
            Gate::H => "H",
            Gate::X => "X",
            Gate::Y => "Y",
            Gate::Z => "Z",
            Gate::S => "S",
            Gate::Sdg => "S†",
            Gate::T => "T",
            Gate::Tdg => "T†",
            Gate::Sx => "√X",
            Gate::Sxdg => "√X†",
            Gate::Rx(_) => "Rx",
            Gate::Ry(_) => "Ry",
            Gate::Rz(_) => "Rz",
            Gate::Phase(_) => "P",
            Gate::Cnot => "CNOT",
            Gate::Cz => "CZ",
            Gate::Swap => "SWAP",
            Gate::Unitary1(_) | Gate::Unitary2(_) => "U",
        }
    }

    /// The rotation angle in radians, if the gate has one.
    pub fn angle(&self) -> Option<f64> {
        match *self {
            Gate::Rx(theta) | Gate::Ry(theta) | Gate::Rz(theta) | Gate::Phase(theta) => Some(theta),
            _ => None,
        }
    }
}

impl FromStr for Gate {
    type Err = CirquantError;

    /// Parses a parameterless gate name, e.g. `"h"` or `"cx"`.
    fn from_str(s: &str) -> Result<Gate> {
        Gate::from_name(s, &[])
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.angle() {
            Some(theta) => write!(f, "{}({:.3})", self.symbol(), theta),
            None => write!(f, "{}", self.symbol()),
        }
    }
}

fn dagger2(m: &Matrix2) -> Matrix2 {
    let mut out = [[O; 2]; 2];
    for (r, row) in out.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = m[c][r].conj();
        }
    }
    out
}

fn dagger4(m: &Matrix4) -> Matrix4 {
    let mut out = [[O; 4]; 4];
    for (r, row) in out.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = m[c][r].conj();
        }
    }
    out
}
