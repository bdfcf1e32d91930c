use crate::error::{MapperError, MfResult};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LadderOp {
    Creation,
    Annihilation,
}

impl LadderOp {
    fn symbol(&self) -> char {
        match self {
            LadderOp::Creation => '+',
            LadderOp::Annihilation => '-',
        }
    }
}

/// Ordered product of ladder operators, leftmost factor first.
///
/// Written as whitespace-separated tokens, e.g. `"+_0 -_1"` for `a†_0 a_1`.
/// The empty label is the identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FermionTerm(pub Vec<(LadderOp, usize)>);

impl FermionTerm {
    pub fn ops(&self) -> &[(LadderOp, usize)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn max_index(&self) -> Option<usize> {
        self.0.iter().map(|&(_, idx)| idx).max()
    }
}

impl FromStr for FermionTerm {
    type Err = MapperError;

    fn from_str(s: &str) -> MfResult<Self> {
        let mut ops = Vec::new();
        for token in s.split_whitespace() {
            let (kind, index) = token
                .split_once('_')
                .ok_or_else(|| MapperError::Parse(format!("token '{}' has no '_'", token)))?;
            let op = match kind {
                "+" => LadderOp::Creation,
                "-" => LadderOp::Annihilation,
                other => {
                    return Err(MapperError::Parse(format!(
                        "unknown ladder symbol '{}' in '{}'",
                        other, token
                    )))
                }
            };
            let idx = index.parse::<usize>().map_err(|e| {
                MapperError::Parse(format!("bad mode index in '{}': {}", token, e))
            })?;
            ops.push((op, idx));
        }
        Ok(FermionTerm(ops))
    }
}

impl fmt::Display for FermionTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (op, idx)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}_{}", op.symbol(), idx)?;
        }
        Ok(())
    }
}

/// Sum of fermionic terms over `register_length` modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FermionicOp {
    terms: Vec<(FermionTerm, Complex64)>,
    register_length: usize,
}

impl FermionicOp {
    pub fn new(terms: Vec<(FermionTerm, Complex64)>, register_length: usize) -> MfResult<Self> {
        for (term, _) in &terms {
            if let Some(idx) = term.max_index() {
                if idx >= register_length {
                    return Err(MapperError::Shape(format!(
                        "term '{}' uses mode {} but the register has {} modes",
                        term, idx, register_length
                    )));
                }
            }
        }
        Ok(Self {
            terms,
            register_length,
        })
    }

    /// Parses `(label, coefficient)` pairs such as `("+_0 -_1", c)`.
    pub fn from_labels<'a, I>(terms: I, register_length: usize) -> MfResult<Self>
    where
        I: IntoIterator<Item = (&'a str, Complex64)>,
    {
        let parsed = terms
            .into_iter()
            .map(|(label, coeff)| Ok((label.parse::<FermionTerm>()?, coeff)))
            .collect::<MfResult<Vec<_>>>()?;
        Self::new(parsed, register_length)
    }

    pub fn terms(&self) -> &[(FermionTerm, Complex64)] {
        &self.terms
    }

    pub fn register_length(&self) -> usize {
        self.register_length
    }

    /// Mode-index pairs `(i, j)` of every two-operator term, in term order.
    pub fn active_indices(&self) -> Vec<(usize, usize)> {
        self.terms
            .iter()
            .filter_map(|(term, _)| match term.ops() {
                [(_, i), (_, j)] => Some((*i, *j)),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("+_0 -_1", vec![(LadderOp::Creation, 0), (LadderOp::Annihilation, 1)])]
    #[case("  -_12   +_3 ", vec![(LadderOp::Annihilation, 12), (LadderOp::Creation, 3)])]
    #[case("", vec![])]
    fn test_parse_term(#[case] label: &str, #[case] expected: Vec<(LadderOp, usize)>) {
        let term: FermionTerm = label.parse().unwrap();
        assert_eq!(term.0, expected);
    }

    #[rstest]
    #[case("+0")]
    #[case("*_0")]
    #[case("+_x")]
    #[case("+_-1")]
    fn test_parse_rejects(#[case] label: &str) {
        assert!(matches!(
            label.parse::<FermionTerm>(),
            Err(MapperError::Parse(_))
        ));
    }

    #[test]
    fn test_display_roundtrip() {
        let term: FermionTerm = "+_0 +_3 -_1 -_2".parse().unwrap();
        assert_eq!(term.to_string(), "+_0 +_3 -_1 -_2");
    }

    #[test]
    fn test_index_bound_checked() {
        let err = FermionicOp::from_labels([("+_4 -_0", Complex64::new(1.0, 0.0))], 4);
        assert!(matches!(err, Err(MapperError::Shape(_))));
    }

    #[test]
    fn test_active_indices_from_two_token_terms() {
        let one = Complex64::new(1.0, 0.0);
        let op = FermionicOp::from_labels(
            [
                ("+_0 -_1", one),
                ("+_0 +_1 -_1 -_0", one),
                ("+_2 -_2", one),
                ("", one),
            ],
            3,
        )
        .unwrap();
        assert_eq!(op.active_indices(), vec![(0, 1), (2, 2)]);
    }
}
