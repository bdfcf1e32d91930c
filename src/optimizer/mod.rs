pub mod anneal;
pub mod mutation;
pub mod runner;

pub use self::anneal::{AnnealOutcome, AnnealTrace, Annealer};
pub use self::mutation::{AssistedMove, CliffordJump, LocalMove, MoveGenerator};
pub use self::runner::{run_restarts, RestartOutcome};
