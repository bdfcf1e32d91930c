use super::topology::DistanceMatrix;
use super::CostFunction;
use crate::error::{MapperError, MfResult};
use crate::tableau::Tableau;
use itertools::Itertools;

/// Mean Pauli weight of `γ_a γ_b` over every pair of distinct Majorana rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanWeightCost;

impl CostFunction for MeanWeightCost {
    fn cost(&self, tableau: &Tableau) -> f64 {
        let rows = tableau.row_count();
        if rows < 2 {
            return 0.0;
        }
        let total: usize = (0..rows)
            .tuple_combinations()
            .map(|(a, b)| tableau.pair_weight(a, b))
            .sum();
        total as f64 / (rows * (rows - 1) / 2) as f64
    }

    fn name(&self) -> &'static str {
        "mean_weight"
    }
}

/// Pair weight scaled by how spread out the pair's support is on hardware.
///
/// Each pair contributes `weight * (1 + mean distance between its support
/// qubits)`. Supports smaller than two qubits contribute the bare weight.
#[derive(Debug, Clone)]
pub struct ConnectivityCost {
    distances: DistanceMatrix,
}

impl ConnectivityCost {
    pub fn new(distances: DistanceMatrix) -> Self {
        Self { distances }
    }

    fn spread(&self, support: &[usize]) -> f64 {
        if support.len() < 2 {
            return 0.0;
        }
        let mut sum = 0.0;
        let mut count = 0usize;
        for (&p, &q) in support.iter().tuple_combinations() {
            sum += self.distances.get(p, q);
            count += 1;
        }
        sum / count as f64
    }
}

/// The distance matrix must cover every qubit of the tableau; see
/// [`DistanceMatrix::check_size`].
impl CostFunction for ConnectivityCost {
    fn cost(&self, tableau: &Tableau) -> f64 {
        debug_assert!(
            self.distances.check_size(tableau.modes()).is_ok(),
            "distance matrix does not match the tableau width"
        );
        let rows = tableau.row_count();
        if rows < 2 {
            return 0.0;
        }
        let mut total = 0.0;
        for (a, b) in (0..rows).tuple_combinations() {
            let support = tableau.pair_support(a, b);
            total += support.len() as f64 * (1.0 + self.spread(&support));
        }
        total / (rows * (rows - 1) / 2) as f64
    }

    fn name(&self) -> &'static str {
        "connectivity"
    }
}

/// Mean pair weight restricted to the Majorana pairs behind a Hamiltonian's
/// two-operator terms.
#[derive(Debug, Clone)]
pub struct SubspaceCost {
    active: Vec<(usize, usize)>,
}

impl SubspaceCost {
    pub fn new(active: Vec<(usize, usize)>) -> MfResult<Self> {
        if active.is_empty() {
            return Err(MapperError::Configuration(
                "subspace cost needs at least one active index pair".to_string(),
            ));
        }
        Ok(Self { active })
    }

    /// Fails if any active index is not a mode of a `modes`-mode encoding.
    pub fn check_bounds(&self, modes: usize) -> MfResult<()> {
        if let Some(&(i, j)) = self.active.iter().find(|&&(i, j)| i >= modes || j >= modes) {
            return Err(MapperError::Shape(format!(
                "active pair ({}, {}) outside {} modes",
                i, j, modes
            )));
        }
        Ok(())
    }

    /// Majorana row pairs touched by mode pair `(i, j)`.
    fn row_pairs(i: usize, j: usize, modes: usize) -> Vec<(usize, usize)> {
        if i == j {
            vec![(i, modes + i)]
        } else {
            vec![
                (i, j),
                (i, modes + j),
                (modes + i, j),
                (modes + i, modes + j),
            ]
        }
    }
}

/// Every active index must be a mode of the tableau; see
/// [`SubspaceCost::check_bounds`].
impl CostFunction for SubspaceCost {
    fn cost(&self, tableau: &Tableau) -> f64 {
        let modes = tableau.modes();
        debug_assert!(
            self.check_bounds(modes).is_ok(),
            "active pair outside the tableau modes"
        );
        let mut total = 0usize;
        let mut count = 0usize;
        for &(i, j) in &self.active {
            for (a, b) in Self::row_pairs(i, j, modes) {
                total += tableau.pair_weight(a, b);
                count += 1;
            }
        }
        total as f64 / count as f64
    }

    fn name(&self) -> &'static str {
        "subspace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tableau::generator::{bravyi_kitaev, jordan_wigner};

    #[test]
    fn test_mean_weight_jw_two_modes() {
        // JW(2) rows XI, ZX, YI, ZY; pair weights 2,1,2,2,1,2
        let t = jordan_wigner(2).unwrap();
        let c = MeanWeightCost.cost(&t);
        assert!((c - 10.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_distances_match_baseline() {
        let t = bravyi_kitaev(5).unwrap();
        let conn = ConnectivityCost::new(DistanceMatrix::zeros(5));
        assert!((conn.cost(&t) - MeanWeightCost.cost(&t)).abs() < 1e-12);
    }

    #[test]
    fn test_connectivity_penalises_spread() {
        let t = jordan_wigner(4).unwrap();
        let d = crate::scorer::CouplingGraph::linear(4)
            .distance_matrix()
            .unwrap();
        let conn = ConnectivityCost::new(d);
        assert!(conn.cost(&t) > MeanWeightCost.cost(&t));
    }

    #[test]
    fn test_subspace_diagonal_pair() {
        // c_k d_k = Z_k under JW: weight 1
        let t = jordan_wigner(3).unwrap();
        let cost = SubspaceCost::new(vec![(1, 1)]).unwrap();
        assert_eq!(cost.cost(&t), 1.0);
    }

    #[test]
    fn test_subspace_hopping_pair() {
        // modes 0 and 2 under JW: every cross product spans qubits 0..=2
        let t = jordan_wigner(3).unwrap();
        let cost = SubspaceCost::new(vec![(0, 2)]).unwrap();
        assert_eq!(cost.cost(&t), 3.0);
    }

    #[test]
    fn test_subspace_rejects_empty_and_out_of_range() {
        assert!(matches!(
            SubspaceCost::new(vec![]),
            Err(MapperError::Configuration(_))
        ));
        let cost = SubspaceCost::new(vec![(0, 3)]).unwrap();
        assert!(matches!(cost.check_bounds(3), Err(MapperError::Shape(_))));
        assert!(cost.check_bounds(4).is_ok());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "distance matrix does not match the tableau width")]
    fn test_connectivity_on_wider_tableau_panics() {
        let conn = ConnectivityCost::new(DistanceMatrix::zeros(2));
        conn.cost(&jordan_wigner(3).unwrap());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "active pair outside the tableau modes")]
    fn test_subspace_on_narrower_tableau_panics() {
        let cost = SubspaceCost::new(vec![(0, 4)]).unwrap();
        cost.cost(&jordan_wigner(3).unwrap());
    }
}
