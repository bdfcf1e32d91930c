use crate::error::{MapperError, MfResult};
use serde::{Deserialize, Serialize};

const WORD_BITS: usize = 64;

/// Fixed-length row of bits over GF(2), packed into u64 words.
///
/// Bits past `len` in the last word are always zero, so word-wise
/// popcounts and equality never see stale padding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBitRow")]
pub struct BitRow {
    len: usize,
    words: Vec<u64>,
}

#[derive(Deserialize)]
struct RawBitRow {
    len: usize,
    words: Vec<u64>,
}

impl TryFrom<RawBitRow> for BitRow {
    type Error = MapperError;

    fn try_from(raw: RawBitRow) -> MfResult<Self> {
        let expected = raw.len.div_ceil(WORD_BITS);
        if raw.words.len() != expected {
            return Err(MapperError::Shape(format!(
                "{} bits need {} words, got {}",
                raw.len,
                expected,
                raw.words.len()
            )));
        }
        let tail = raw.len % WORD_BITS;
        if tail != 0 && raw.words[expected - 1] >> tail != 0 {
            return Err(MapperError::Shape(format!(
                "bits set past length {}",
                raw.len
            )));
        }
        Ok(Self {
            len: raw.len,
            words: raw.words,
        })
    }
}

impl BitRow {
    pub fn zeros(len: usize) -> Self {
        Self {
            len,
            words: vec![0; len.div_ceil(WORD_BITS)],
        }
    }

    pub fn unit(len: usize, idx: usize) -> Self {
        let mut row = Self::zeros(len);
        row.set(idx, true);
        row
    }

    pub fn from_bools(bits: &[bool]) -> Self {
        let mut row = Self::zeros(bits.len());
        for (i, &b) in bits.iter().enumerate() {
            if b {
                row.set(i, true);
            }
        }
        row
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    #[inline(always)]
    pub fn get(&self, idx: usize) -> bool {
        debug_assert!(idx < self.len);
        (self.words[idx / WORD_BITS] >> (idx % WORD_BITS)) & 1 == 1
    }

    #[inline(always)]
    pub fn set(&mut self, idx: usize, value: bool) {
        debug_assert!(idx < self.len);
        let mask = 1u64 << (idx % WORD_BITS);
        if value {
            self.words[idx / WORD_BITS] |= mask;
        } else {
            self.words[idx / WORD_BITS] &= !mask;
        }
    }

    #[inline(always)]
    pub fn flip(&mut self, idx: usize) {
        debug_assert!(idx < self.len);
        self.words[idx / WORD_BITS] ^= 1u64 << (idx % WORD_BITS);
    }

    pub fn swap_bits(&mut self, a: usize, b: usize) {
        let (va, vb) = (self.get(a), self.get(b));
        if va != vb {
            self.flip(a);
            self.flip(b);
        }
    }

    #[inline(always)]
    pub fn xor_assign(&mut self, other: &BitRow) {
        debug_assert_eq!(self.len, other.len);
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w ^= o;
        }
    }

    pub fn xor(&self, other: &BitRow) -> BitRow {
        let mut out = self.clone();
        out.xor_assign(other);
        out
    }

    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Parity of the inner product over GF(2).
    #[inline(always)]
    pub fn dot(&self, other: &BitRow) -> bool {
        debug_assert_eq!(self.len, other.len);
        let mut acc = 0u32;
        for (a, b) in self.words.iter().zip(&other.words) {
            acc ^= (a & b).count_ones();
        }
        acc & 1 == 1
    }

    /// Indices of set bits, ascending.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(wi, &word)| {
            let mut w = word;
            std::iter::from_fn(move || {
                if w == 0 {
                    return None;
                }
                let tz = w.trailing_zeros() as usize;
                w &= w - 1;
                Some(wi * WORD_BITS + tz)
            })
        })
    }

    /// Concatenation `self | other` as one row of `len_a + len_b` bits.
    pub fn concat(&self, other: &BitRow) -> BitRow {
        let mut out = BitRow::zeros(self.len + other.len);
        for i in self.ones() {
            out.set(i, true);
        }
        for i in other.ones() {
            out.set(self.len + i, true);
        }
        out
    }
}

/// Rank over GF(2) by Gaussian elimination.
pub fn gf2_rank(rows: &[BitRow]) -> usize {
    let mut work: Vec<BitRow> = rows.to_vec();
    let width = work.first().map_or(0, BitRow::len);
    let mut rank = 0;

    for col in 0..width {
        let Some(pivot) = (rank..work.len()).find(|&r| work[r].get(col)) else {
            continue;
        };
        work.swap(rank, pivot);
        let pivot_row = work[rank].clone();
        for (r, row) in work.iter_mut().enumerate() {
            if r != rank && row.get(col) {
                row.xor_assign(&pivot_row);
            }
        }
        rank += 1;
        if rank == work.len() {
            break;
        }
    }
    rank
}

/// Inverse of a square GF(2) matrix given as rows. `None` if singular.
pub fn gf2_inverse(matrix: &[BitRow]) -> Option<Vec<BitRow>> {
    let n = matrix.len();
    if matrix.iter().any(|r| r.len() != n) {
        return None;
    }

    let mut work: Vec<BitRow> = matrix.to_vec();
    let mut inv: Vec<BitRow> = (0..n).map(|i| BitRow::unit(n, i)).collect();

    for col in 0..n {
        let pivot = (col..n).find(|&r| work[r].get(col))?;
        work.swap(col, pivot);
        inv.swap(col, pivot);

        let (pw, pi) = (work[col].clone(), inv[col].clone());
        for r in 0..n {
            if r != col && work[r].get(col) {
                work[r].xor_assign(&pw);
                inv[r].xor_assign(&pi);
            }
        }
    }
    Some(inv)
}

pub fn transpose(matrix: &[BitRow]) -> Vec<BitRow> {
    let rows = matrix.len();
    let cols = matrix.first().map_or(0, BitRow::len);
    let mut out: Vec<BitRow> = (0..cols).map(|_| BitRow::zeros(rows)).collect();
    for (r, row) in matrix.iter().enumerate() {
        for c in row.ones() {
            out[c].set(r, true);
        }
    }
    out
}

/// `matrix · v` over GF(2).
pub fn mat_vec(matrix: &[BitRow], v: &BitRow) -> BitRow {
    let mut out = BitRow::zeros(matrix.len());
    for (i, row) in matrix.iter().enumerate() {
        if row.dot(v) {
            out.set(i, true);
        }
    }
    out
}
