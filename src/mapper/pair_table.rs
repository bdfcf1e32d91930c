use crate::error::{MapperError, MfResult};
use crate::pauli::{PauliString, QubitOperator};
use crate::tableau::Tableau;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-mode Majorana pair `(c_k, d_k)` of a finished encoding.
///
/// `a†_k = (c_k - i d_k) / 2` and `a_k = (c_k + i d_k) / 2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPairTable")]
pub struct PairTable {
    pairs: Vec<(PauliString, PauliString)>,
}

#[derive(Deserialize)]
struct RawPairTable {
    pairs: Vec<(PauliString, PauliString)>,
}

impl TryFrom<RawPairTable> for PairTable {
    type Error = MapperError;

    fn try_from(raw: RawPairTable) -> MfResult<Self> {
        Self::from_pairs(raw.pairs)
    }
}

impl PairTable {
    /// Pairs row `k` with row `N + k`, with every phase dropped.
    pub fn from_tableau(tableau: &Tableau) -> Self {
        let n = tableau.modes();
        let pairs = (0..n)
            .map(|k| (tableau.majorana(k), tableau.majorana(n + k)))
            .collect();
        Self { pairs }
    }

    /// Accepts externally supplied pairs only if they form a valid Majorana
    /// set: phase-free, one width, pairwise anticommuting, independent and
    /// never the identity.
    pub fn from_pairs(pairs: Vec<(PauliString, PauliString)>) -> MfResult<Self> {
        if let Some(k) = pairs
            .iter()
            .position(|(c, d)| c.phase() != 0 || d.phase() != 0)
        {
            return Err(MapperError::InvalidTableau(format!(
                "pair {} carries a non-zero phase",
                k
            )));
        }
        let rows: Vec<&PauliString> = pairs
            .iter()
            .map(|(c, _)| c)
            .chain(pairs.iter().map(|(_, d)| d))
            .collect();
        let x = rows.iter().map(|p| p.x().clone()).collect();
        let z = rows.iter().map(|p| p.z().clone()).collect();
        Tableau::new(x, z)?.validate()?;
        Ok(Self { pairs })
    }

    pub fn pairs(&self) -> &[(PauliString, PauliString)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn num_qubits(&self) -> usize {
        self.pairs.first().map_or(0, |(p, _)| p.num_qubits())
    }

    fn ladder(&self, mode: usize, sign: f64) -> QubitOperator {
        let (c, d) = &self.pairs[mode];
        let mut op = QubitOperator::from_pauli(c.clone(), Complex64::new(0.5, 0.0));
        op.add_assign(&QubitOperator::from_pauli(
            d.clone(),
            Complex64::new(0.0, 0.5 * sign),
        ));
        op
    }

    /// `a†_mode` as a qubit operator.
    pub fn creation(&self, mode: usize) -> QubitOperator {
        self.ladder(mode, -1.0)
    }

    /// `a_mode` as a qubit operator.
    pub fn annihilation(&self, mode: usize) -> QubitOperator {
        self.ladder(mode, 1.0)
    }

    pub fn total_weight(&self) -> usize {
        self.pairs.iter().map(|(c, d)| c.weight() + d.weight()).sum()
    }

    pub fn to_json(&self) -> MfResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and validates a table written by [`PairTable::to_json`].
    pub fn from_json(json: &str) -> MfResult<Self> {
        let raw: RawPairTable = serde_json::from_str(json)?;
        Self::from_pairs(raw.pairs)
    }

    /// ASCII table of the pairs, one row per mode.
    pub fn render(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(ASCII_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("Mode").add_attribute(Attribute::Bold),
            Cell::new("c_k"),
            Cell::new("d_k"),
            Cell::new("Weight"),
        ]);

        for (k, (c, d)) in self.pairs.iter().enumerate() {
            table.add_row(vec![
                Cell::new(k),
                Cell::new(c.label()),
                Cell::new(d.label()),
                Cell::new(c.weight() + d.weight()),
            ]);
        }

        for i in [0, 3] {
            if let Some(col) = table.column_mut(i) {
                col.set_cell_alignment(CellAlignment::Right);
            }
        }
        table.to_string()
    }
}

impl fmt::Display for PairTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
