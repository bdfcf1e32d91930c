use crate::tableau::{BitRow, Tableau};
use fastrand::Rng;

/// Proposes a neighbouring encoding by mutating the tableau in place.
///
/// Every implementation must map valid tableaus to valid tableaus.
pub trait MoveGenerator: Send + Sync {
    fn apply(&self, tableau: &mut Tableau, rng: &mut Rng, iteration: usize);

    fn name(&self) -> &'static str;
}

/// One random elementary Clifford (CNOT, SWAP, H or S) conjugating all rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalMove;

impl LocalMove {
    fn distinct_pair(rng: &mut Rng, n: usize) -> (usize, usize) {
        let a = rng.usize(0..n);
        let mut b = rng.usize(0..n - 1);
        if b >= a {
            b += 1;
        }
        (a, b)
    }
}

impl MoveGenerator for LocalMove {
    fn apply(&self, tableau: &mut Tableau, rng: &mut Rng, _iteration: usize) {
        let n = tableau.modes();
        if n == 1 {
            if rng.bool() {
                tableau.apply_hadamard(0);
            } else {
                tableau.apply_phase(0);
            }
            return;
        }

        // 50% CNOT, 20% SWAP, 15% H, 15% S
        match rng.u8(0..20) {
            0..=9 => {
                let (control, target) = Self::distinct_pair(rng, n);
                tableau.apply_cnot(control, target);
            }
            10..=13 => {
                let (a, b) = Self::distinct_pair(rng, n);
                tableau.apply_swap(a, b);
            }
            14..=16 => tableau.apply_hadamard(rng.usize(0..n)),
            _ => tableau.apply_phase(rng.usize(0..n)),
        }
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

/// `strength` random symplectic transvections applied back to back.
#[derive(Debug, Clone, Copy)]
pub struct CliffordJump {
    pub strength: usize,
}

impl CliffordJump {
    pub fn new(strength: usize) -> Self {
        Self {
            strength: strength.max(1),
        }
    }

    /// Uniform non-zero vector of GF(2)^{2n}, split into its x and z halves.
    fn random_direction(rng: &mut Rng, n: usize) -> (BitRow, BitRow) {
        loop {
            let mut hx = BitRow::zeros(n);
            let mut hz = BitRow::zeros(n);
            for q in 0..n {
                hx.set(q, rng.bool());
                hz.set(q, rng.bool());
            }
            if !(hx.is_zero() && hz.is_zero()) {
                return (hx, hz);
            }
        }
    }
}

impl MoveGenerator for CliffordJump {
    fn apply(&self, tableau: &mut Tableau, rng: &mut Rng, _iteration: usize) {
        let n = tableau.modes();
        for _ in 0..self.strength {
            let (hx, hz) = Self::random_direction(rng, n);
            tableau.apply_transvection(&hx, &hz);
        }
    }

    fn name(&self) -> &'static str {
        "clifford_jump"
    }
}

/// Local moves, with a Clifford jump on every `interval`-th proposal.
#[derive(Debug, Clone, Copy)]
pub struct AssistedMove {
    local: LocalMove,
    jump: CliffordJump,
    interval: usize,
}

impl AssistedMove {
    pub fn new(interval: usize, strength: usize) -> Self {
        Self {
            local: LocalMove,
            jump: CliffordJump::new(strength),
            interval: interval.max(1),
        }
    }

    pub fn interval(&self) -> usize {
        self.interval
    }
}

impl MoveGenerator for AssistedMove {
    fn apply(&self, tableau: &mut Tableau, rng: &mut Rng, iteration: usize) {
        if (iteration + 1) % self.interval == 0 {
            self.jump.apply(tableau, rng, iteration);
        } else {
            self.local.apply(tableau, rng, iteration);
        }
    }

    fn name(&self) -> &'static str {
        "clifford_assisted"
    }
}
