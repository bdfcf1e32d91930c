/// Starting temperature of every annealing chain.
pub const DEFAULT_INITIAL_TEMPERATURE: f64 = 1.0;

/// Geometric cooling factor applied after each proposal.
pub const DEFAULT_COOLING_RATE: f64 = 0.99995;

/// Chains stop once the temperature drops below this floor.
pub const DEFAULT_MIN_TEMPERATURE: f64 = 1e-4;

/// Hard cap on proposals per chain.
pub const DEFAULT_MAX_ITERATIONS: usize = 200_000;

/// Iterations between `debug!` progress lines.
pub const DEFAULT_LOG_INTERVAL: usize = 20_000;

/// A global Clifford jump replaces every n-th local move.
pub const DEFAULT_JUMP_INTERVAL: usize = 50;

/// Random transvections per Clifford jump.
pub const DEFAULT_JUMP_STRENGTH: usize = 2;

/// Coefficients at or below this modulus are dropped after translation.
pub const SIMPLIFY_ATOL: f64 = 1e-12;
