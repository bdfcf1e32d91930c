use super::bits::{gf2_inverse, mat_vec, transpose, BitRow};
use super::Tableau;
use crate::error::{MapperError, MfResult};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Canonical encoding the search starts from.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TableauSeed {
    #[default]
    BravyiKitaev,
    JordanWigner,
}

impl TableauSeed {
    pub fn generate(&self, modes: usize) -> MfResult<Tableau> {
        match self {
            Self::BravyiKitaev => bravyi_kitaev(modes),
            Self::JordanWigner => jordan_wigner(modes),
        }
    }
}

pub fn jordan_wigner(modes: usize) -> MfResult<Tableau> {
    let beta: Vec<BitRow> = (0..modes).map(|i| BitRow::unit(modes, i)).collect();
    linear_encoding(&beta)
}

pub fn bravyi_kitaev(modes: usize) -> MfResult<Tableau> {
    linear_encoding(&bravyi_kitaev_matrix(modes))
}

/// Fenwick-tree Bravyi-Kitaev matrix: qubit `j` stores the parity of modes
/// `(j + 1 - lowbit(j + 1), j]`.
pub fn bravyi_kitaev_matrix(modes: usize) -> Vec<BitRow> {
    (0..modes)
        .map(|j| {
            let one_based = j + 1;
            let lowbit = one_based & one_based.wrapping_neg();
            let mut row = BitRow::zeros(modes);
            for k in (one_based - lowbit)..one_based {
                row.set(k, true);
            }
            row
        })
        .collect()
}

/// Majorana tableau of the linear encoding `b = beta · f` over GF(2).
///
/// Row `k` is `c_k = X^{beta e_k} Z^{beta^-T pi_k}` and row `N + k` is
/// `d_k = X^{beta e_k} Z^{beta^-T (pi_k + e_k)}`, where `pi_k` marks the
/// modes below `k`.
pub fn linear_encoding(beta: &[BitRow]) -> MfResult<Tableau> {
    let n = beta.len();
    if n == 0 {
        return Err(MapperError::Shape(
            "cannot encode zero fermionic modes".to_string(),
        ));
    }
    let inverse = gf2_inverse(beta).ok_or_else(|| {
        MapperError::Shape("encoding matrix is singular over GF(2)".to_string())
    })?;
    let inverse_t = transpose(&inverse);
    let columns = transpose(beta);

    let mut x = vec![BitRow::zeros(n); 2 * n];
    let mut z = vec![BitRow::zeros(n); 2 * n];

    let mut parity = BitRow::zeros(n);
    for k in 0..n {
        x[k] = columns[k].clone();
        x[n + k] = columns[k].clone();
        z[k] = mat_vec(&inverse_t, &parity);

        parity.set(k, true);
        z[n + k] = mat_vec(&inverse_t, &parity);
    }

    Tableau::new(x, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_bk_matrix_four_modes() {
        let m = bravyi_kitaev_matrix(4);
        let as_str: Vec<String> = m
            .iter()
            .map(|r| (0..4).map(|i| if r.get(i) { '1' } else { '0' }).collect())
            .collect();
        assert_eq!(as_str, vec!["1000", "1100", "0010", "1111"]);
    }

    #[test]
    fn test_jordan_wigner_labels() {
        let t = jordan_wigner(3).unwrap();
        let labels: Vec<String> = (0..6).map(|r| t.majorana(r).label()).collect();
        assert_eq!(labels, vec!["XII", "ZXI", "ZZX", "YII", "ZYI", "ZZY"]);
    }

    #[test]
    fn test_every_seed_is_valid() {
        for seed in TableauSeed::iter() {
            for n in 1..=9 {
                let t = seed.generate(n).unwrap();
                assert_eq!(t.row_count(), 2 * n);
                t.validate()
                    .unwrap_or_else(|e| panic!("{} n={} invalid: {}", seed, n, e));
            }
        }
    }

    #[test]
    fn test_zero_modes_rejected() {
        assert!(matches!(jordan_wigner(0), Err(MapperError::Shape(_))));
    }

    #[test]
    fn test_singular_beta_rejected() {
        let beta = vec![BitRow::from_bools(&[true, true]); 2];
        assert!(linear_encoding(&beta).is_err());
    }
}
