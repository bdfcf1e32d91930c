use super::anneal::{AnnealOutcome, Annealer};
use super::mutation::MoveGenerator;
use crate::config::AnnealSchedule;
use crate::error::{MapperError, MfResult};
use crate::scorer::CostFunction;
use crate::tableau::Tableau;
use rayon::prelude::*;
use std::time::Instant;
use tracing::info;

pub struct RestartOutcome {
    pub best: AnnealOutcome,
    /// Index of the winning chain.
    pub chain: usize,
    /// Best cost reached by each chain, in chain order.
    pub chain_costs: Vec<f64>,
}

/// Runs `restarts` independent chains from the same start and keeps the best.
///
/// Chain `i` is seeded with `seed + i`. Equal costs go to the lowest chain
/// index, so the result does not depend on thread scheduling.
pub fn run_restarts(
    initial: &Tableau,
    schedule: &AnnealSchedule,
    moves: &dyn MoveGenerator,
    cost: &dyn CostFunction,
    seed: u64,
    restarts: usize,
) -> MfResult<RestartOutcome> {
    if restarts == 0 {
        return Err(MapperError::Configuration(
            "restarts must be at least 1".to_string(),
        ));
    }
    let annealer = Annealer::new(schedule.clone(), moves, cost)?;
    let start = Instant::now();

    let outcomes: Vec<AnnealOutcome> = (0..restarts)
        .into_par_iter()
        .map(|i| {
            let mut rng = fastrand::Rng::with_seed(seed.wrapping_add(i as u64));
            annealer.run(initial.clone(), &mut rng)
        })
        .collect();

    let chain_costs: Vec<f64> = outcomes.iter().map(|o| o.best_cost).collect();
    let mut winner = 0;
    for (i, &c) in chain_costs.iter().enumerate().skip(1) {
        if c < chain_costs[winner] {
            winner = i;
        }
    }

    info!(
        "Annealed {} chain(s) in {:.2}s | initial {:.4} -> best {:.4} (chain {}, {:.1}% accepted)",
        restarts,
        start.elapsed().as_secs_f64(),
        outcomes[winner].trace.initial_cost,
        chain_costs[winner],
        winner,
        100.0 * outcomes[winner].trace.acceptance_rate()
    );

    let best = outcomes
        .into_iter()
        .nth(winner)
        .ok_or_else(|| MapperError::Configuration("no annealing chain finished".to_string()))?;

    Ok(RestartOutcome {
        best,
        chain: winner,
        chain_costs,
    })
}
