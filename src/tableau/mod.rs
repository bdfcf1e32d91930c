pub mod bits;
pub mod generator;

pub use self::bits::BitRow;
pub use self::generator::TableauSeed;

use self::bits::gf2_rank;
use crate::error::{MapperError, MfResult};
use crate::pauli::PauliString;

/// Symplectic tableau of 2N Majorana generators over N qubits.
///
/// Rows `k` and `N + k` are the two Majoranas of mode `k`. Each row is a
/// Pauli string given by its `x` and `z` bits; `(1, 1)` on a column is `Y`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tableau {
    modes: usize,
    x: Vec<BitRow>,
    z: Vec<BitRow>,
}

impl Tableau {
    /// Wraps raw rows after a shape check. Use [`Tableau::validate`] for the
    /// algebraic invariants.
    pub fn new(x: Vec<BitRow>, z: Vec<BitRow>) -> MfResult<Self> {
        let rows = x.len();
        if rows == 0 || rows % 2 != 0 {
            return Err(MapperError::Shape(format!(
                "tableau needs an even, non-zero row count, got {}",
                rows
            )));
        }
        let modes = rows / 2;
        if z.len() != rows {
            return Err(MapperError::Shape(format!(
                "x has {} rows but z has {}",
                rows,
                z.len()
            )));
        }
        if let Some(bad) = x.iter().chain(&z).find(|r| r.len() != modes) {
            return Err(MapperError::Shape(format!(
                "row of width {} in a tableau over {} qubits",
                bad.len(),
                modes
            )));
        }
        Ok(Self { modes, x, z })
    }

    #[inline(always)]
    pub fn modes(&self) -> usize {
        self.modes
    }

    #[inline(always)]
    pub fn row_count(&self) -> usize {
        2 * self.modes
    }

    pub fn x(&self) -> &[BitRow] {
        &self.x
    }

    pub fn z(&self) -> &[BitRow] {
        &self.z
    }

    /// `true` when rows `a` and `b` anticommute.
    #[inline(always)]
    pub fn symplectic_product(&self, a: usize, b: usize) -> bool {
        self.x[a].dot(&self.z[b]) ^ self.z[a].dot(&self.x[b])
    }

    /// Pauli weight of the product of rows `a` and `b`.
    #[inline(always)]
    pub fn pair_weight(&self, a: usize, b: usize) -> usize {
        let (xa, xb) = (self.x[a].words(), self.x[b].words());
        let (za, zb) = (self.z[a].words(), self.z[b].words());
        let mut weight = 0;
        for w in 0..xa.len() {
            weight += ((xa[w] ^ xb[w]) | (za[w] ^ zb[w])).count_ones() as usize;
        }
        weight
    }

    /// Qubits on which the product of rows `a` and `b` acts non-trivially.
    pub fn pair_support(&self, a: usize, b: usize) -> Vec<usize> {
        let mut support = self.x[a].xor(&self.x[b]);
        let zs = self.z[a].xor(&self.z[b]);
        for q in zs.ones() {
            support.set(q, true);
        }
        support.ones().collect()
    }

    /// Returns a shape error unless this tableau encodes exactly `modes` modes.
    pub fn expect_modes(&self, modes: usize) -> MfResult<()> {
        if self.modes != modes {
            return Err(MapperError::Shape(format!(
                "tableau encodes {} modes, expected {}",
                self.modes, modes
            )));
        }
        Ok(())
    }

    /// Checks the Majorana invariants: no identity row, pairwise
    /// anticommutation, and full rank of the `(x|z)` rows.
    pub fn validate(&self) -> MfResult<()> {
        let rows = self.row_count();

        if let Some(r) = (0..rows).find(|&r| self.x[r].is_zero() && self.z[r].is_zero()) {
            return Err(MapperError::InvalidTableau(format!(
                "row {} is the identity",
                r
            )));
        }

        for a in 0..rows {
            for b in (a + 1)..rows {
                if !self.symplectic_product(a, b) {
                    return Err(MapperError::InvalidTableau(format!(
                        "rows {} and {} commute",
                        a, b
                    )));
                }
            }
        }

        let stacked: Vec<BitRow> = (0..rows).map(|r| self.x[r].concat(&self.z[r])).collect();
        let rank = gf2_rank(&stacked);
        if rank != rows {
            return Err(MapperError::InvalidTableau(format!(
                "rank {} over GF(2), expected {}",
                rank, rows
            )));
        }
        Ok(())
    }

    // --- Clifford conjugations (column operations on every row) ---

    pub fn apply_cnot(&mut self, control: usize, target: usize) {
        for r in 0..self.row_count() {
            if self.x[r].get(control) {
                self.x[r].flip(target);
            }
            if self.z[r].get(target) {
                self.z[r].flip(control);
            }
        }
    }

    pub fn apply_swap(&mut self, a: usize, b: usize) {
        for r in 0..self.row_count() {
            self.x[r].swap_bits(a, b);
            self.z[r].swap_bits(a, b);
        }
    }

    pub fn apply_hadamard(&mut self, q: usize) {
        for r in 0..self.row_count() {
            let (xq, zq) = (self.x[r].get(q), self.z[r].get(q));
            self.x[r].set(q, zq);
            self.z[r].set(q, xq);
        }
    }

    pub fn apply_phase(&mut self, q: usize) {
        for r in 0..self.row_count() {
            if self.x[r].get(q) {
                self.z[r].flip(q);
            }
        }
    }

    /// Symplectic transvection `r ↦ r + <r, h> h` applied to every row.
    pub fn apply_transvection(&mut self, h_x: &BitRow, h_z: &BitRow) {
        for r in 0..self.row_count() {
            let product = self.x[r].dot(h_z) ^ self.z[r].dot(h_x);
            if product {
                self.x[r].xor_assign(h_x);
                self.z[r].xor_assign(h_z);
            }
        }
    }

    /// Row `r` as a phase-free Pauli string.
    pub fn majorana(&self, r: usize) -> PauliString {
        PauliString::from_symplectic(self.x[r].clone(), self.z[r].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::generator::{bravyi_kitaev, jordan_wigner};
    use super::*;

    #[test]
    fn test_new_rejects_odd_rows() {
        let rows = vec![BitRow::zeros(1); 3];
        assert!(matches!(
            Tableau::new(rows.clone(), rows),
            Err(MapperError::Shape(_))
        ));
    }

    #[test]
    fn test_validate_rejects_identity_row() {
        let mut t = jordan_wigner(2).unwrap();
        t.x[1] = BitRow::zeros(2);
        t.z[1] = BitRow::zeros(2);
        assert!(matches!(t.validate(), Err(MapperError::InvalidTableau(_))));
    }

    #[test]
    fn test_validate_rejects_commuting_rows() {
        let mut t = jordan_wigner(2).unwrap();
        t.x[0] = t.x[1].clone();
        t.z[0] = t.z[1].clone();
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_clifford_ops_preserve_validity() {
        let mut t = bravyi_kitaev(5).unwrap();
        t.apply_cnot(0, 3);
        t.apply_swap(1, 4);
        t.apply_hadamard(2);
        t.apply_phase(4);
        t.apply_cnot(4, 1);
        t.validate().expect("clifford conjugation keeps the invariants");
    }

    #[test]
    fn test_hadamard_is_involution() {
        let t0 = bravyi_kitaev(4).unwrap();
        let mut t = t0.clone();
        t.apply_hadamard(2);
        t.apply_hadamard(2);
        assert_eq!(t, t0);
    }

    #[test]
    fn test_pair_weight_matches_support() {
        let t = jordan_wigner(4).unwrap();
        for a in 0..8 {
            for b in (a + 1)..8 {
                assert_eq!(t.pair_weight(a, b), t.pair_support(a, b).len());
            }
        }
        // c_0 c_3 under JW: X0 * Z0 Z1 Z2 X3 -> weight 4
        assert_eq!(t.pair_weight(0, 3), 4);
    }
}
