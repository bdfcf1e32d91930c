#![allow(dead_code)]

use majorana_forge::config::AnnealSchedule;
use majorana_forge::{FermionicOp, QubitOperator};
use num_complex::Complex64;

/// Routes library `tracing` output through the test harness. Safe to call
/// from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Short schedule so searches finish in milliseconds.
pub fn fast_schedule() -> AnnealSchedule {
    AnnealSchedule {
        initial_temperature: 1.0,
        cooling_rate: 0.99,
        min_temperature: 1e-3,
        max_iterations: 1_500,
        log_interval: 500,
    }
}

pub fn c(re: f64) -> Complex64 {
    Complex64::new(re, 0.0)
}

/// Two spatial orbitals, two spins: number terms, Coulomb terms and the
/// exchange pair.
pub fn h2_hamiltonian() -> FermionicOp {
    FermionicOp::from_labels(
        [
            ("+_0 -_0", c(-1.252)),
            ("+_2 -_2", c(-1.252)),
            ("+_1 -_1", c(-0.475)),
            ("+_3 -_3", c(-0.475)),
            ("+_0 +_2 -_2 -_0", c(0.674)),
            ("+_1 +_3 -_3 -_1", c(0.674)),
            ("+_0 +_3 -_3 -_0", c(0.663)),
            ("+_1 +_2 -_2 -_1", c(0.663)),
            ("+_0 +_3 -_1 -_2", c(0.663)),
            ("+_2 +_1 -_3 -_0", c(0.663)),
        ],
        4,
    )
    .expect("H2 model parses")
}

/// Eigenvalues of a real symmetric matrix by cyclic Jacobi rotations.
pub fn symmetric_eigenvalues(mut a: Vec<Vec<f64>>) -> Vec<f64> {
    let n = a.len();
    for _sweep in 0..100 {
        let off: f64 = (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .filter(|(i, j)| i != j)
            .map(|(i, j)| a[i][j] * a[i][j])
            .sum();
        if off < 1e-24 {
            break;
        }
        for p in 0..n {
            for q in (p + 1)..n {
                if a[p][q].abs() < 1e-300 {
                    continue;
                }
                let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let cos = 1.0 / (t * t + 1.0).sqrt();
                let sin = t * cos;
                for row in a.iter_mut() {
                    let (kp, kq) = (row[p], row[q]);
                    row[p] = cos * kp - sin * kq;
                    row[q] = sin * kp + cos * kq;
                }
                for k in 0..n {
                    let (pk, qk) = (a[p][k], a[q][k]);
                    a[p][k] = cos * pk - sin * qk;
                    a[q][k] = sin * pk + cos * qk;
                }
            }
        }
    }
    let mut eig: Vec<f64> = (0..n).map(|i| a[i][i]).collect();
    eig.sort_by(|x, y| x.total_cmp(y));
    eig
}

/// Lowest eigenvalue of a Hermitian qubit operator. `H = A + iB` is embedded
/// as the real symmetric `[[A, -B], [B, A]]`, which doubles each eigenvalue.
pub fn min_eigenvalue(op: &QubitOperator) -> f64 {
    let h = op.to_dense_matrix().expect("small enough for a dense matrix");
    let d = h.len();
    let mut m = vec![vec![0.0; 2 * d]; 2 * d];
    for i in 0..d {
        for j in 0..d {
            let (re, im) = (h[i][j].re, h[i][j].im);
            m[i][j] = re;
            m[i + d][j + d] = re;
            m[i][j + d] = -im;
            m[i + d][j] = im;
        }
    }
    symmetric_eigenvalues(m)[0]
}

pub fn assert_hermitian(op: &QubitOperator, tol: f64) {
    for (label, coeff) in op.to_label_map() {
        assert!(
            coeff.im.abs() <= tol,
            "term {} has non-real coefficient {}",
            label,
            coeff
        );
    }
}
