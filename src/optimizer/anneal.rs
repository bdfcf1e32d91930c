use super::mutation::MoveGenerator;
use crate::config::AnnealSchedule;
use crate::error::MfResult;
use crate::scorer::CostFunction;
use crate::tableau::Tableau;
use fastrand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cost trajectory of one chain: `(iteration, cost after the accept step)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnealTrace {
    pub initial_cost: f64,
    pub best_cost: f64,
    pub points: Vec<(usize, f64)>,
    pub accepted: usize,
}

impl AnnealTrace {
    pub fn iterations(&self) -> usize {
        self.points.len()
    }

    pub fn acceptance_rate(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.accepted as f64 / self.points.len() as f64
    }
}

#[derive(Debug, Clone)]
pub struct AnnealOutcome {
    pub best: Tableau,
    pub best_cost: f64,
    pub last: Tableau,
    pub last_cost: f64,
    pub trace: AnnealTrace,
}

/// A single Metropolis chain over tableaus.
pub struct Annealer<'a> {
    schedule: AnnealSchedule,
    moves: &'a dyn MoveGenerator,
    cost: &'a dyn CostFunction,
}

impl<'a> Annealer<'a> {
    /// Rejects an invalid schedule before any work is done.
    pub fn new(
        schedule: AnnealSchedule,
        moves: &'a dyn MoveGenerator,
        cost: &'a dyn CostFunction,
    ) -> MfResult<Self> {
        schedule.validate()?;
        Ok(Self {
            schedule,
            moves,
            cost,
        })
    }

    pub fn schedule(&self) -> &AnnealSchedule {
        &self.schedule
    }

    pub fn run(&self, initial: Tableau, rng: &mut Rng) -> AnnealOutcome {
        let s = &self.schedule;

        let mut current = initial;
        let mut current_cost = self.cost.cost(&current);
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut trace = AnnealTrace {
            initial_cost: current_cost,
            best_cost,
            points: Vec::with_capacity(s.planned_iterations()),
            accepted: 0,
        };

        let mut temperature = s.initial_temperature;
        let mut iteration = 0;

        while iteration < s.max_iterations && temperature >= s.min_temperature {
            let mut candidate = current.clone();
            self.moves.apply(&mut candidate, rng, iteration);
            let candidate_cost = self.cost.cost(&candidate);

            let delta = candidate_cost - current_cost;
            if delta <= 0.0 || rng.f64() < (-delta / temperature).exp() {
                current = candidate;
                current_cost = candidate_cost;
                trace.accepted += 1;

                if current_cost < best_cost {
                    best_cost = current_cost;
                    best = current.clone();
                }
            }
            trace.points.push((iteration, current_cost));

            temperature *= s.cooling_rate;
            iteration += 1;

            if s.log_interval > 0 && iteration % s.log_interval == 0 {
                debug!(
                    "Iter {:>7} | T {:.3e} | Current {:.4} | Best {:.4} | Move {} | Cost {}",
                    iteration,
                    temperature,
                    current_cost,
                    best_cost,
                    self.moves.name(),
                    self.cost.name()
                );
            }
        }

        trace.best_cost = best_cost;
        AnnealOutcome {
            best,
            best_cost,
            last: current,
            last_cost: current_cost,
            trace,
        }
    }
}
