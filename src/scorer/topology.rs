use crate::error::{MapperError, MfResult};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Tolerance for the symmetry check on user-supplied matrices.
const SYMMETRY_TOL: f64 = 1e-12;

/// Undirected qubit coupling graph.
///
/// Deserializing replays every edge through [`CouplingGraph::add_edge`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawCouplingGraph")]
pub struct CouplingGraph {
    num_qubits: usize,
    edges: Vec<(usize, usize)>,
    #[serde(skip)]
    adjacency: Vec<Vec<usize>>,
}

#[derive(Deserialize)]
struct RawCouplingGraph {
    num_qubits: usize,
    edges: Vec<(usize, usize)>,
}

impl TryFrom<RawCouplingGraph> for CouplingGraph {
    type Error = MapperError;

    fn try_from(raw: RawCouplingGraph) -> MfResult<Self> {
        let mut graph = Self::new(raw.num_qubits);
        for (a, b) in raw.edges {
            graph.add_edge(a, b)?;
        }
        Ok(graph)
    }
}

impl CouplingGraph {
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            edges: Vec::new(),
            adjacency: vec![Vec::new(); num_qubits],
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Adds an undirected edge. Duplicates in either direction and self-loops
    /// are ignored.
    pub fn add_edge(&mut self, a: usize, b: usize) -> MfResult<()> {
        if a >= self.num_qubits || b >= self.num_qubits {
            return Err(MapperError::Shape(format!(
                "edge ({}, {}) outside a {}-qubit graph",
                a, b, self.num_qubits
            )));
        }
        if a == b
            || self
                .edges
                .iter()
                .any(|&(p, q)| (p == a && q == b) || (p == b && q == a))
        {
            return Ok(());
        }
        self.push_unchecked(a, b);
        Ok(())
    }

    /// `0 - 1 - 2 - ... - (n-1)`
    pub fn linear(n: usize) -> Self {
        let mut g = Self::new(n);
        for i in 1..n {
            g.push_unchecked(i - 1, i);
        }
        g
    }

    pub fn ring(n: usize) -> Self {
        let mut g = Self::linear(n);
        if n > 2 {
            g.push_unchecked(n - 1, 0);
        }
        g
    }

    /// Row-major `rows x cols` lattice with nearest-neighbour edges.
    pub fn grid(rows: usize, cols: usize) -> Self {
        let mut g = Self::new(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                let q = r * cols + c;
                if c + 1 < cols {
                    g.push_unchecked(q, q + 1);
                }
                if r + 1 < rows {
                    g.push_unchecked(q, q + cols);
                }
            }
        }
        g
    }

    pub fn full(n: usize) -> Self {
        let mut g = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                g.push_unchecked(i, j);
            }
        }
        g
    }

    fn push_unchecked(&mut self, a: usize, b: usize) {
        self.edges.push((a, b));
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
    }

    /// All-pairs hop distances by BFS from every node.
    ///
    /// A disconnected graph is rejected: an unreachable pair has no finite
    /// distance to weight a cost with.
    pub fn distance_matrix(&self) -> MfResult<DistanceMatrix> {
        let n = self.num_qubits;
        let mut dist = vec![vec![f64::INFINITY; n]; n];

        for (src, row) in dist.iter_mut().enumerate() {
            row[src] = 0.0;
            let mut queue = VecDeque::from([src]);
            while let Some(cur) = queue.pop_front() {
                for &nb in &self.adjacency[cur] {
                    if row[nb].is_infinite() {
                        row[nb] = row[cur] + 1.0;
                        queue.push_back(nb);
                    }
                }
            }
            if let Some(unreached) = row.iter().position(|d| d.is_infinite()) {
                return Err(MapperError::Shape(format!(
                    "coupling graph is disconnected: no path from {} to {}",
                    src, unreached
                )));
            }
        }
        DistanceMatrix::new(dist)
    }
}

/// Validated square matrix of pairwise qubit distances.
///
/// Deserializing goes through [`DistanceMatrix::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDistanceMatrix")]
pub struct DistanceMatrix {
    values: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct RawDistanceMatrix {
    values: Vec<Vec<f64>>,
}

impl TryFrom<RawDistanceMatrix> for DistanceMatrix {
    type Error = MapperError;

    fn try_from(raw: RawDistanceMatrix) -> MfResult<Self> {
        Self::new(raw.values)
    }
}

impl DistanceMatrix {
    /// Accepts a square matrix of finite, non-negative, symmetric entries with
    /// a zero diagonal.
    pub fn new(values: Vec<Vec<f64>>) -> MfResult<Self> {
        let n = values.len();
        for (i, row) in values.iter().enumerate() {
            if row.len() != n {
                return Err(MapperError::Shape(format!(
                    "distance matrix row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            for (j, &d) in row.iter().enumerate() {
                if !d.is_finite() || d < 0.0 {
                    return Err(MapperError::Shape(format!(
                        "distance ({}, {}) = {} is not finite and non-negative",
                        i, j, d
                    )));
                }
            }
            if row[i] != 0.0 {
                return Err(MapperError::Shape(format!(
                    "distance ({}, {}) on the diagonal must be 0, got {}",
                    i, i, row[i]
                )));
            }
        }
        for i in 0..n {
            for j in (i + 1)..n {
                if (values[i][j] - values[j][i]).abs() > SYMMETRY_TOL {
                    return Err(MapperError::Shape(format!(
                        "distance matrix is not symmetric at ({}, {})",
                        i, j
                    )));
                }
            }
        }
        Ok(Self { values })
    }

    pub fn zeros(n: usize) -> Self {
        Self {
            values: vec![vec![0.0; n]; n],
        }
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    #[inline(always)]
    pub fn get(&self, a: usize, b: usize) -> f64 {
        self.values[a][b]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn check_size(&self, modes: usize) -> MfResult<()> {
        if self.size() != modes {
            return Err(MapperError::Shape(format!(
                "distance matrix is {}x{} but the encoding has {} qubits",
                self.size(),
                self.size(),
                modes
            )));
        }
        Ok(())
    }
}
