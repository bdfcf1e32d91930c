use crate::config::StrategyKind;
use crate::error::{MapperError, MfResult};
use crate::fermion::FermionicOp;
use crate::optimizer::{AssistedMove, LocalMove, MoveGenerator};
use crate::scorer::{
    ConnectivityCost, CostFunction, DistanceMatrix, MeanWeightCost, SubspaceCost,
};
use sha2::{Digest, Sha256};
use std::str::FromStr;

/// Search strategy together with the side data it needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Strategy {
    #[default]
    Baseline,
    ConnectivityAware(DistanceMatrix),
    SubspaceOptimized(Vec<(usize, usize)>),
    CliffordAssisted,
}

impl Strategy {
    /// Builds a strategy from its name and whatever side data the caller has.
    ///
    /// Missing side data is an error, never a silent fallback to baseline.
    pub fn from_parts(
        name: &str,
        distances: Option<DistanceMatrix>,
        hamiltonian: Option<&FermionicOp>,
    ) -> MfResult<Self> {
        let kind = StrategyKind::from_str(name.trim()).map_err(|_| {
            MapperError::Configuration(format!("unknown strategy '{}'", name))
        })?;

        match kind {
            StrategyKind::Baseline => Ok(Strategy::Baseline),
            StrategyKind::CliffordAssisted => Ok(Strategy::CliffordAssisted),
            StrategyKind::ConnectivityAware => distances
                .map(Strategy::ConnectivityAware)
                .ok_or_else(|| {
                    MapperError::Configuration(
                        "connectivity strategy needs a distance matrix".to_string(),
                    )
                }),
            StrategyKind::SubspaceOptimized => {
                let op = hamiltonian.ok_or_else(|| {
                    MapperError::Configuration(
                        "subspace strategy needs a Hamiltonian".to_string(),
                    )
                })?;
                let active = op.active_indices();
                if active.is_empty() {
                    return Err(MapperError::Configuration(
                        "subspace strategy found no two-operator terms in the Hamiltonian"
                            .to_string(),
                    ));
                }
                Ok(Strategy::SubspaceOptimized(active))
            }
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Baseline => StrategyKind::Baseline,
            Strategy::ConnectivityAware(_) => StrategyKind::ConnectivityAware,
            Strategy::SubspaceOptimized(_) => StrategyKind::SubspaceOptimized,
            Strategy::CliffordAssisted => StrategyKind::CliffordAssisted,
        }
    }

    /// Structural checks that do not depend on the mode count.
    pub(crate) fn validate(&self) -> MfResult<()> {
        if let Strategy::SubspaceOptimized(active) = self {
            SubspaceCost::new(active.clone())?;
        }
        Ok(())
    }

    /// Side data must fit an encoding of `modes` modes.
    pub(crate) fn check_modes(&self, modes: usize) -> MfResult<()> {
        match self {
            Strategy::ConnectivityAware(d) => d.check_size(modes),
            Strategy::SubspaceOptimized(active) => {
                SubspaceCost::new(active.clone())?.check_bounds(modes)
            }
            Strategy::Baseline | Strategy::CliffordAssisted => Ok(()),
        }
    }

    pub(crate) fn cost_function(&self) -> MfResult<Box<dyn CostFunction>> {
        Ok(match self {
            Strategy::Baseline | Strategy::CliffordAssisted => Box::new(MeanWeightCost),
            Strategy::ConnectivityAware(d) => Box::new(ConnectivityCost::new(d.clone())),
            Strategy::SubspaceOptimized(active) => Box::new(SubspaceCost::new(active.clone())?),
        })
    }

    pub(crate) fn move_generator(
        &self,
        jump_interval: usize,
        jump_strength: usize,
    ) -> Box<dyn MoveGenerator> {
        match self {
            Strategy::CliffordAssisted => Box::new(AssistedMove::new(jump_interval, jump_strength)),
            _ => Box::new(LocalMove),
        }
    }

    /// Feeds the strategy name and its side data into a fingerprint.
    pub(crate) fn hash_into(&self, hasher: &mut Sha256) {
        let name: &'static str = self.kind().into();
        hasher.update(name.as_bytes());
        match self {
            Strategy::ConnectivityAware(d) => {
                hasher.update((d.size() as u64).to_le_bytes());
                for row in d.rows() {
                    for v in row {
                        hasher.update(v.to_bits().to_le_bytes());
                    }
                }
            }
            Strategy::SubspaceOptimized(active) => {
                hasher.update((active.len() as u64).to_le_bytes());
                for &(i, j) in active {
                    hasher.update((i as u64).to_le_bytes());
                    hasher.update((j as u64).to_le_bytes());
                }
            }
            Strategy::Baseline | Strategy::CliffordAssisted => {}
        }
    }
}
