pub mod costs;
pub mod topology;

pub use self::costs::{ConnectivityCost, MeanWeightCost, SubspaceCost};
pub use self::topology::{CouplingGraph, DistanceMatrix};

use crate::tableau::Tableau;
use std::sync::atomic::{AtomicU64, Ordering};

/// Scores a tableau. Lower is better; all implementations return the mean of
/// per-pair contributions so values are comparable across strategies.
pub trait CostFunction: Send + Sync {
    fn cost(&self, tableau: &Tableau) -> f64;

    fn name(&self) -> &'static str;
}

impl<C: CostFunction + ?Sized> CostFunction for Box<C> {
    fn cost(&self, tableau: &Tableau) -> f64 {
        (**self).cost(tableau)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Counts how many tableaus the inner cost has scored.
pub struct CountingCost<C> {
    inner: C,
    calls: AtomicU64,
}

impl<C: CostFunction> CountingCost<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            calls: AtomicU64::new(0),
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

impl<C: CostFunction> CostFunction for CountingCost<C> {
    fn cost(&self, tableau: &Tableau) -> f64 {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.cost(tableau)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
