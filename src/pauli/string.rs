use crate::error::{MapperError, MfResult};
use crate::tableau::BitRow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An n-qubit Pauli string `i^phase * P`, stored as symplectic bits.
///
/// The label is written qubit 0 first, so `"XZI"` is `X0 Z1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PauliString {
    x: BitRow,
    z: BitRow,
    phase: u8,
}

impl PauliString {
    pub fn identity(num_qubits: usize) -> Self {
        Self {
            x: BitRow::zeros(num_qubits),
            z: BitRow::zeros(num_qubits),
            phase: 0,
        }
    }

    /// Phase-free string from symplectic bits; `(1, 1)` reads as `Y`.
    pub fn from_symplectic(x: BitRow, z: BitRow) -> Self {
        debug_assert_eq!(x.len(), z.len());
        Self { x, z, phase: 0 }
    }

    #[inline(always)]
    pub fn num_qubits(&self) -> usize {
        self.x.len()
    }

    pub fn x(&self) -> &BitRow {
        &self.x
    }

    pub fn z(&self) -> &BitRow {
        &self.z
    }

    /// Exponent `k` of the global factor `i^k`.
    pub fn phase(&self) -> u8 {
        self.phase
    }

    pub fn zero_phase(&mut self) {
        self.phase = 0;
    }

    pub fn weight(&self) -> usize {
        self.x
            .words()
            .iter()
            .zip(self.z.words())
            .map(|(x, z)| (x | z).count_ones() as usize)
            .sum()
    }

    pub fn is_identity(&self) -> bool {
        self.x.is_zero() && self.z.is_zero()
    }

    pub fn commutes_with(&self, other: &PauliString) -> bool {
        !(self.x.dot(&other.z) ^ self.z.dot(&other.x))
    }

    /// Operator product `self · other`, with the phase tracked exactly.
    pub fn compose(&self, other: &PauliString) -> PauliString {
        debug_assert_eq!(self.num_qubits(), other.num_qubits());
        let mut plus = 0u32;
        let mut minus = 0u32;

        let words = self
            .x
            .words()
            .iter()
            .zip(self.z.words())
            .zip(other.x.words().iter().zip(other.z.words()));

        for ((&x1, &z1), (&x2, &z2)) in words {
            let (ax, ay, az) = (x1 & !z1, x1 & z1, !x1 & z1);
            let (bx, by, bz) = (x2 & !z2, x2 & z2, !x2 & z2);
            // XY = iZ, YZ = iX, ZX = iY and the reverse orders give -i
            plus += ((ax & by) | (ay & bz) | (az & bx)).count_ones();
            minus += ((ax & bz) | (ay & bx) | (az & by)).count_ones();
        }

        let phase = (self.phase as u32 + other.phase as u32 + plus + 3 * minus) % 4;
        PauliString {
            x: self.x.xor(&other.x),
            z: self.z.xor(&other.z),
            phase: phase as u8,
        }
    }

    /// Label without the phase prefix.
    pub fn label(&self) -> String {
        (0..self.num_qubits())
            .map(|q| match (self.x.get(q), self.z.get(q)) {
                (false, false) => 'I',
                (true, false) => 'X',
                (true, true) => 'Y',
                (false, true) => 'Z',
            })
            .collect()
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.phase {
            0 => "",
            1 => "i",
            2 => "-",
            _ => "-i",
        };
        write!(f, "{}{}", prefix, self.label())
    }
}

impl FromStr for PauliString {
    type Err = MapperError;

    fn from_str(s: &str) -> MfResult<Self> {
        let s = s.trim();
        let (phase, body) = if let Some(rest) = s.strip_prefix("-i") {
            (3, rest)
        } else if let Some(rest) = s.strip_prefix("+i") {
            (1, rest)
        } else if let Some(rest) = s.strip_prefix('i') {
            (1, rest)
        } else if let Some(rest) = s.strip_prefix('-') {
            (2, rest)
        } else if let Some(rest) = s.strip_prefix('+') {
            (0, rest)
        } else {
            (0, s)
        };

        let n = body.chars().count();
        let mut x = BitRow::zeros(n);
        let mut z = BitRow::zeros(n);
        for (q, c) in body.chars().enumerate() {
            match c {
                'I' => {}
                'X' => x.set(q, true),
                'Y' => {
                    x.set(q, true);
                    z.set(q, true);
                }
                'Z' => z.set(q, true),
                other => {
                    return Err(MapperError::Parse(format!(
                        "'{}' is not a Pauli symbol in '{}'",
                        other, s
                    )))
                }
            }
        }
        Ok(Self { x, z, phase })
    }
}
