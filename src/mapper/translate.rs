use super::pair_table::PairTable;
use crate::consts::SIMPLIFY_ATOL;
use crate::error::{MapperError, MfResult};
use crate::fermion::{FermionicOp, LadderOp};
use crate::pauli::QubitOperator;

/// Translates every term of `op` through the pair table and simplifies.
///
/// Each term `c · o_1 o_2 ... o_k` becomes `c` times the product of the
/// ladder images in token order, `o_1` leftmost.
pub fn translate_terms(op: &FermionicOp, table: &PairTable) -> MfResult<QubitOperator> {
    let modes = table.len();
    if modes == 0 {
        return Err(MapperError::Shape("empty pair table".to_string()));
    }
    if let Some((term, _)) = op
        .terms()
        .iter()
        .find(|(t, _)| t.max_index().is_some_and(|i| i >= modes))
    {
        return Err(MapperError::Shape(format!(
            "term '{}' addresses a mode outside the {}-mode table",
            term, modes
        )));
    }

    let n_qubits = table.num_qubits();
    let creation: Vec<QubitOperator> = (0..modes).map(|k| table.creation(k)).collect();
    let annihilation: Vec<QubitOperator> = (0..modes).map(|k| table.annihilation(k)).collect();

    let mut result = QubitOperator::zero(n_qubits);
    for (term, coeff) in op.terms() {
        let mut chain = QubitOperator::identity(n_qubits);
        for &(ladder, idx) in term.ops() {
            let factor = match ladder {
                LadderOp::Creation => &creation[idx],
                LadderOp::Annihilation => &annihilation[idx],
            };
            chain = chain.compose(factor).simplify(SIMPLIFY_ATOL);
        }
        result.add_assign(&chain.scale(*coeff));
    }
    Ok(result.simplify(SIMPLIFY_ATOL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tableau::generator::jordan_wigner;
    use num_complex::Complex64;

    #[test]
    fn test_hopping_term_under_jw() {
        // a†_0 a_1 + a†_1 a_0 = (XX + YY) / 2
        let table = PairTable::from_tableau(&jordan_wigner(2).unwrap());
        let one = Complex64::new(1.0, 0.0);
        let op = FermionicOp::from_labels([("+_0 -_1", one), ("+_1 -_0", one)], 2).unwrap();
        let q = translate_terms(&op, &table).unwrap();
        let expected = QubitOperator::from_labels([
            ("XX", Complex64::new(0.5, 0.0)),
            ("YY", Complex64::new(0.5, 0.0)),
        ])
        .unwrap();
        assert!(q.approx_eq(&expected, 1e-12), "{:?}", q.to_label_map());
    }

    #[test]
    fn test_pauli_exclusion() {
        let table = PairTable::from_tableau(&jordan_wigner(2).unwrap());
        let op = FermionicOp::from_labels([("+_1 +_1", Complex64::new(1.0, 0.0))], 2).unwrap();
        assert!(translate_terms(&op, &table).unwrap().is_empty());
    }

    #[test]
    fn test_identity_term() {
        let table = PairTable::from_tableau(&jordan_wigner(2).unwrap());
        let op = FermionicOp::from_labels([("", Complex64::new(0.7, 0.0))], 2).unwrap();
        let q = translate_terms(&op, &table).unwrap();
        assert_eq!(q.to_label_map()["II"], Complex64::new(0.7, 0.0));
    }

    #[test]
    fn test_mode_outside_table() {
        let table = PairTable::from_tableau(&jordan_wigner(2).unwrap());
        let op = FermionicOp::from_labels([("+_2 -_0", Complex64::new(1.0, 0.0))], 3).unwrap();
        assert!(matches!(
            translate_terms(&op, &table),
            Err(MapperError::Shape(_))
        ));
    }
}
