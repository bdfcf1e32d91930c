pub mod pair_table;
pub mod strategy;
pub mod translate;

pub use self::pair_table::PairTable;
pub use self::strategy::Strategy;
pub use self::translate::translate_terms;

use crate::config::AnnealSchedule;
use crate::consts::{DEFAULT_JUMP_INTERVAL, DEFAULT_JUMP_STRENGTH};
use crate::error::{MapperError, MfResult};
use crate::fermion::FermionicOp;
use crate::optimizer::{run_restarts, AnnealTrace};
use crate::pauli::QubitOperator;
use crate::scorer::CountingCost;
use crate::tableau::generator::jordan_wigner;
use crate::tableau::TableauSeed;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

/// Anything that can turn fermionic operators into qubit operators.
pub trait FermionQubitMapper: Send + Sync {
    fn pauli_pair_table(&self, register_length: usize) -> MfResult<Arc<PairTable>>;

    fn map(&self, op: &FermionicOp) -> MfResult<QubitOperator> {
        let table = self.pauli_pair_table(op.register_length())?;
        translate_terms(op, &table)
    }
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct MapperOptions {
    #[builder(default)]
    pub strategy: Strategy,
    /// Overrides the register length callers ask for.
    #[builder(default, setter(strip_option))]
    pub mode_count: Option<usize>,
    #[builder(default)]
    pub schedule: AnnealSchedule,
    #[builder(default = 0)]
    pub seed: u64,
    #[builder(default = 1)]
    pub restarts: usize,
    #[builder(default)]
    pub tableau_seed: TableauSeed,
    #[builder(default = DEFAULT_JUMP_INTERVAL)]
    pub jump_interval: usize,
    #[builder(default = DEFAULT_JUMP_STRENGTH)]
    pub jump_strength: usize,
}

impl Default for MapperOptions {
    fn default() -> Self {
        MapperOptions::builder().build()
    }
}

/// A finished search, keyed by the fingerprint of everything that shaped it.
#[derive(Debug)]
pub struct CachedEncoding {
    pub fingerprint: String,
    pub modes: usize,
    pub table: Arc<PairTable>,
    pub initial_cost: f64,
    pub best_cost: f64,
    pub trace: AnnealTrace,
}

/// Annealing-optimised Majorana encoding with a single-entry result cache.
pub struct MajoranaMapper {
    options: MapperOptions,
    cache: RwLock<Option<Arc<CachedEncoding>>>,
    cost_evaluations: AtomicU64,
    searches: AtomicU64,
}

impl MajoranaMapper {
    pub fn new(options: MapperOptions) -> MfResult<Self> {
        options.schedule.validate()?;
        options.strategy.validate()?;
        if options.mode_count == Some(0) {
            return Err(MapperError::Shape(
                "mode_count override must be at least 1".to_string(),
            ));
        }
        if options.restarts == 0 {
            return Err(MapperError::Configuration(
                "restarts must be at least 1".to_string(),
            ));
        }
        if options.jump_interval == 0 || options.jump_strength == 0 {
            return Err(MapperError::Configuration(
                "jump_interval and jump_strength must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            options,
            cache: RwLock::new(None),
            cost_evaluations: AtomicU64::new(0),
            searches: AtomicU64::new(0),
        })
    }

    pub fn options(&self) -> &MapperOptions {
        &self.options
    }

    /// Swaps the strategy. The cached encoding stays, but its fingerprint no
    /// longer matches, so the next table request searches again.
    pub fn set_strategy(&mut self, strategy: Strategy) -> MfResult<()> {
        strategy.validate()?;
        self.options.strategy = strategy;
        Ok(())
    }

    /// Cost function calls made by every search so far.
    pub fn cost_evaluations(&self) -> u64 {
        self.cost_evaluations.load(Ordering::Relaxed)
    }

    pub fn searches_run(&self) -> u64 {
        self.searches.load(Ordering::Relaxed)
    }

    pub fn cached_encoding(&self) -> Option<Arc<CachedEncoding>> {
        self.cache.read().ok().and_then(|guard| guard.clone())
    }

    /// Mode count the search will actually use for a requested register length.
    pub fn effective_modes(&self, requested: usize) -> MfResult<usize> {
        let modes = self.options.mode_count.unwrap_or(requested);
        if modes == 0 {
            return Err(MapperError::Shape(
                "cannot encode zero fermionic modes".to_string(),
            ));
        }
        if modes != requested {
            debug!(
                "Mode count override {} replaces requested register length {}",
                modes, requested
            );
        }
        Ok(modes)
    }

    /// SHA-256 over every input that changes the search result.
    pub fn fingerprint(&self, modes: usize) -> String {
        let o = &self.options;
        let s = &o.schedule;
        let mut hasher = Sha256::new();

        hasher.update((modes as u64).to_le_bytes());
        o.strategy.hash_into(&mut hasher);
        hasher.update(o.tableau_seed.to_string().as_bytes());
        for v in [
            s.initial_temperature,
            s.cooling_rate,
            s.min_temperature,
        ] {
            hasher.update(v.to_bits().to_le_bytes());
        }
        for v in [
            s.max_iterations as u64,
            o.seed,
            o.restarts as u64,
            o.jump_interval as u64,
            o.jump_strength as u64,
        ] {
            hasher.update(v.to_le_bytes());
        }

        hex::encode(hasher.finalize())
    }

    fn lookup(&self, fingerprint: &str) -> Option<Arc<CachedEncoding>> {
        let guard = self.cache.read().ok()?;
        guard
            .as_ref()
            .filter(|entry| entry.fingerprint == fingerprint)
            .cloned()
    }

    fn search(&self, modes: usize, fingerprint: String) -> MfResult<CachedEncoding> {
        let o = &self.options;
        let initial = o.tableau_seed.generate(modes)?;
        initial.expect_modes(modes)?;

        let moves = o.strategy.move_generator(o.jump_interval, o.jump_strength);
        let cost = CountingCost::new(o.strategy.cost_function()?);

        info!(
            "Searching encoding | modes {} | strategy {} | start {} | restarts {} | ~{} iters/chain",
            modes,
            o.strategy.kind(),
            o.tableau_seed,
            o.restarts,
            o.schedule.planned_iterations()
        );

        let outcome = run_restarts(
            &initial,
            &o.schedule,
            moves.as_ref(),
            &cost,
            o.seed,
            o.restarts,
        );
        self.cost_evaluations.fetch_add(cost.calls(), Ordering::Relaxed);
        self.searches.fetch_add(1, Ordering::Relaxed);
        let outcome = outcome?;

        let best = outcome.best;
        best.best.validate()?;

        Ok(CachedEncoding {
            fingerprint,
            modes,
            table: Arc::new(PairTable::from_tableau(&best.best)),
            initial_cost: best.trace.initial_cost,
            best_cost: best.best_cost,
            trace: best.trace,
        })
    }
}

impl FermionQubitMapper for MajoranaMapper {
    fn pauli_pair_table(&self, register_length: usize) -> MfResult<Arc<PairTable>> {
        let modes = self.effective_modes(register_length)?;
        self.options.strategy.check_modes(modes)?;

        let fingerprint = self.fingerprint(modes);
        if let Some(hit) = self.lookup(&fingerprint) {
            debug!("Encoding cache hit for {} modes ({})", modes, &fingerprint[..12]);
            return Ok(hit.table.clone());
        }
        info!("Encoding cache miss for {} modes ({})", modes, &fingerprint[..12]);

        let entry = Arc::new(self.search(modes, fingerprint)?);
        info!(
            "Encoding ready | cost {:.4} -> {:.4} | pair weight {}",
            entry.initial_cost,
            entry.best_cost,
            entry.table.total_weight()
        );

        let table = entry.table.clone();
        match self.cache.write() {
            Ok(mut guard) => *guard = Some(entry),
            Err(poisoned) => {
                warn!("Encoding cache lock was poisoned, overwriting entry");
                *poisoned.into_inner() = Some(entry);
            }
        }
        Ok(table)
    }
}

/// Plain Jordan-Wigner encoding with no search, for comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct JordanWignerMapper;

impl FermionQubitMapper for JordanWignerMapper {
    fn pauli_pair_table(&self, register_length: usize) -> MfResult<Arc<PairTable>> {
        let tableau = jordan_wigner(register_length)?;
        Ok(Arc::new(PairTable::from_tableau(&tableau)))
    }
}
