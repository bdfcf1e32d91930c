use super::PauliString;
use crate::error::{MapperError, MfResult};
use fnv::FnvHashMap;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Largest register `to_dense_matrix` will expand.
pub const MAX_DENSE_QUBITS: usize = 12;

#[inline(always)]
pub fn i_pow(k: u8) -> Complex64 {
    match k % 4 {
        0 => Complex64::new(1.0, 0.0),
        1 => Complex64::new(0.0, 1.0),
        2 => Complex64::new(-1.0, 0.0),
        _ => Complex64::new(0.0, -1.0),
    }
}

/// Sparse sum of Pauli strings with complex coefficients.
///
/// Every stored string has phase zero; phases are folded into the
/// coefficient on insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QubitOperator {
    num_qubits: usize,
    terms: Vec<(PauliString, Complex64)>,
}

impl QubitOperator {
    pub fn zero(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            terms: Vec::new(),
        }
    }

    pub fn identity(num_qubits: usize) -> Self {
        Self::from_pauli(PauliString::identity(num_qubits), Complex64::new(1.0, 0.0))
    }

    pub fn from_pauli(pauli: PauliString, coeff: Complex64) -> Self {
        let mut op = Self::zero(pauli.num_qubits());
        op.push(pauli, coeff);
        op
    }

    /// Builds `sum c_k P_k` from labels such as `"XZI"` or `"-iY"`.
    pub fn from_labels<'a, I>(terms: I) -> MfResult<Self>
    where
        I: IntoIterator<Item = (&'a str, Complex64)>,
    {
        let mut out: Option<QubitOperator> = None;
        for (label, coeff) in terms {
            let pauli: PauliString = label.parse()?;
            let op = out.get_or_insert_with(|| QubitOperator::zero(pauli.num_qubits()));
            if pauli.num_qubits() != op.num_qubits {
                return Err(MapperError::Shape(format!(
                    "label '{}' has {} qubits, expected {}",
                    label,
                    pauli.num_qubits(),
                    op.num_qubits
                )));
            }
            op.push(pauli, coeff);
        }
        out.ok_or_else(|| MapperError::Shape("no terms given".to_string()))
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn terms(&self) -> &[(PauliString, Complex64)] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    fn push(&mut self, mut pauli: PauliString, coeff: Complex64) {
        debug_assert_eq!(pauli.num_qubits(), self.num_qubits);
        let folded = coeff * i_pow(pauli.phase());
        pauli.zero_phase();
        self.terms.push((pauli, folded));
    }

    pub fn add_assign(&mut self, other: &QubitOperator) {
        debug_assert_eq!(self.num_qubits, other.num_qubits);
        self.terms.extend(other.terms.iter().cloned());
    }

    pub fn add(&self, other: &QubitOperator) -> QubitOperator {
        let mut out = self.clone();
        out.add_assign(other);
        out
    }

    pub fn scale(&self, factor: Complex64) -> QubitOperator {
        QubitOperator {
            num_qubits: self.num_qubits,
            terms: self
                .terms
                .iter()
                .map(|(p, c)| (p.clone(), c * factor))
                .collect(),
        }
    }

    /// Operator product `self · other` (apply `other` first).
    pub fn compose(&self, other: &QubitOperator) -> QubitOperator {
        debug_assert_eq!(self.num_qubits, other.num_qubits);
        let mut out = QubitOperator::zero(self.num_qubits);
        out.terms.reserve(self.terms.len() * other.terms.len());
        for (pa, ca) in &self.terms {
            for (pb, cb) in &other.terms {
                out.push(pa.compose(pb), ca * cb);
            }
        }
        out
    }

    /// Merges equal strings and drops coefficients with modulus `<= atol`.
    /// First-seen order of the surviving strings is kept.
    pub fn simplify(&self, atol: f64) -> QubitOperator {
        let mut index: FnvHashMap<&PauliString, usize> = FnvHashMap::default();
        let mut merged: Vec<(PauliString, Complex64)> = Vec::new();

        for (p, c) in &self.terms {
            match index.get(p) {
                Some(&i) => merged[i].1 += c,
                None => {
                    index.insert(p, merged.len());
                    merged.push((p.clone(), *c));
                }
            }
        }
        merged.retain(|(_, c)| c.norm() > atol);

        QubitOperator {
            num_qubits: self.num_qubits,
            terms: merged,
        }
    }

    /// `{self, other} = self·other + other·self`, simplified.
    pub fn anticommutator(&self, other: &QubitOperator, atol: f64) -> QubitOperator {
        self.compose(other).add(&other.compose(self)).simplify(atol)
    }

    /// `Some(c)` when the operator equals `c · I` within `atol`.
    pub fn is_identity_multiple(&self, atol: f64) -> Option<Complex64> {
        let simplified = self.simplify(atol);
        match simplified.terms.as_slice() {
            [] => Some(Complex64::new(0.0, 0.0)),
            [(p, c)] if p.is_identity() => Some(*c),
            _ => None,
        }
    }

    /// Label → coefficient view of the simplified operator.
    pub fn to_label_map(&self) -> BTreeMap<String, Complex64> {
        let mut map = BTreeMap::new();
        for (p, c) in &self.terms {
            *map.entry(p.label()).or_insert(Complex64::new(0.0, 0.0)) += c;
        }
        map
    }

    pub fn approx_eq(&self, other: &QubitOperator, tol: f64) -> bool {
        if self.num_qubits != other.num_qubits {
            return false;
        }
        let a = self.to_label_map();
        let b = other.to_label_map();
        let zero = Complex64::new(0.0, 0.0);
        a.keys()
            .chain(b.keys())
            .all(|k| (a.get(k).unwrap_or(&zero) - b.get(k).unwrap_or(&zero)).norm() <= tol)
    }

    /// Dense `2^n x 2^n` matrix, row-major. Qubit `q` is bit `q` of the
    /// basis index.
    pub fn to_dense_matrix(&self) -> MfResult<Vec<Vec<Complex64>>> {
        if self.num_qubits > MAX_DENSE_QUBITS {
            return Err(MapperError::Shape(format!(
                "{} qubits is too large for a dense matrix (max {})",
                self.num_qubits, MAX_DENSE_QUBITS
            )));
        }
        let dim = 1usize << self.num_qubits;
        let mut m = vec![vec![Complex64::new(0.0, 0.0); dim]; dim];

        for (p, c) in &self.terms {
            let x_mask = mask_of(p.x());
            let z_mask = mask_of(p.z());
            // Y = i X Z on each qubit carrying both bits
            let y_phase = i_pow(((x_mask & z_mask).count_ones() % 4) as u8);
            for col in 0..dim {
                let sign = if (z_mask & col).count_ones() % 2 == 1 {
                    -1.0
                } else {
                    1.0
                };
                m[col ^ x_mask][col] += c * y_phase * sign;
            }
        }
        Ok(m)
    }
}

fn mask_of(row: &crate::tableau::BitRow) -> usize {
    row.ones().fold(0usize, |acc, q| acc | (1 << q))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_simplify_merges_and_drops() {
        let op = QubitOperator::from_labels([
            ("XZ", c(1.0, 0.0)),
            ("XZ", c(-1.0, 0.0)),
            ("YY", c(0.5, 0.0)),
            ("YY", c(0.25, 0.0)),
        ])
        .unwrap()
        .simplify(1e-12);
        assert_eq!(op.len(), 1);
        assert_eq!(op.to_label_map()["YY"], c(0.75, 0.0));
    }

    #[test]
    fn test_phase_folded_into_coefficient() {
        let op = QubitOperator::from_labels([("-iZ", c(2.0, 0.0))]).unwrap();
        assert_eq!(op.to_label_map()["Z"], c(0.0, -2.0));
    }

    #[test]
    fn test_compose_pauli_algebra() {
        let x = QubitOperator::from_labels([("X", c(1.0, 0.0))]).unwrap();
        let y = QubitOperator::from_labels([("Y", c(1.0, 0.0))]).unwrap();
        let xy = x.compose(&y).simplify(1e-12);
        assert_eq!(xy.to_label_map()["Z"], c(0.0, 1.0));
        // {X, Y} = 0
        assert!(x.anticommutator(&y, 1e-12).is_empty());
        // {X, X} = 2I
        let xx = x.anticommutator(&x, 1e-12);
        assert!(xx.approx_eq(&QubitOperator::identity(1).scale(c(2.0, 0.0)), 1e-12));
    }

    #[test]
    fn test_dense_matrix_of_y() {
        let y = QubitOperator::from_labels([("Y", c(1.0, 0.0))]).unwrap();
        let m = y.to_dense_matrix().unwrap();
        // Y = [[0, -i], [i, 0]]
        assert_eq!(m[0][1], c(0.0, -1.0));
        assert_eq!(m[1][0], c(0.0, 1.0));
        assert_eq!(m[0][0], c(0.0, 0.0));
    }

    #[test]
    fn test_dense_matrix_qubit_order() {
        // Z on qubit 0 flips the sign of odd basis indices
        let z0 = QubitOperator::from_labels([("ZI", c(1.0, 0.0))]).unwrap();
        let m = z0.to_dense_matrix().unwrap();
        assert_eq!(m[1][1], c(-1.0, 0.0));
        assert_eq!(m[2][2], c(1.0, 0.0));
    }
}
