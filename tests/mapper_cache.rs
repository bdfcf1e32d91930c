mod common;

use common::{fast_schedule, init_tracing};
use majorana_forge::scorer::{CouplingGraph, DistanceMatrix};
use majorana_forge::{
    FermionQubitMapper, MajoranaMapper, MapperError, MapperOptions, PairTable, Strategy,
};
use regex::Regex;
use std::sync::Arc;
use std::thread;

fn mapper(strategy: Strategy) -> MajoranaMapper {
    MajoranaMapper::new(
        MapperOptions::builder()
            .strategy(strategy)
            .schedule(fast_schedule())
            .seed(17)
            .build(),
    )
    .unwrap()
}

#[test]
fn test_table_has_one_phase_free_pair_per_mode() {
    init_tracing();
    let m = mapper(Strategy::Baseline);
    let table = m.pauli_pair_table(5).unwrap();
    assert_eq!(table.len(), 5);
    assert_eq!(table.num_qubits(), 5);
    for (c, d) in table.pairs() {
        assert_eq!(c.phase(), 0);
        assert_eq!(d.phase(), 0);
        assert!(!c.commutes_with(d));
    }
}

#[test]
fn test_second_request_hits_cache() {
    let m = mapper(Strategy::Baseline);
    let first = m.pauli_pair_table(4).unwrap();
    let evaluations = m.cost_evaluations();
    assert!(evaluations > 0);
    assert_eq!(m.searches_run(), 1);

    let second = m.pauli_pair_table(4).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(m.cost_evaluations(), evaluations);
    assert_eq!(m.searches_run(), 1);

    let cached = m.cached_encoding().unwrap();
    assert_eq!(cached.modes, 4);
    assert!(cached.best_cost <= cached.initial_cost);
}

#[test]
fn test_other_register_length_replaces_entry() {
    let m = mapper(Strategy::Baseline);
    m.pauli_pair_table(3).unwrap();
    m.pauli_pair_table(4).unwrap();
    assert_eq!(m.searches_run(), 2);
    assert_eq!(m.cached_encoding().unwrap().modes, 4);
    m.pauli_pair_table(3).unwrap();
    assert_eq!(m.searches_run(), 3);
}

#[test]
fn test_strategy_change_invalidates_cache() {
    let mut m = mapper(Strategy::Baseline);
    m.pauli_pair_table(4).unwrap();
    m.set_strategy(Strategy::CliffordAssisted).unwrap();
    m.pauli_pair_table(4).unwrap();
    assert_eq!(m.searches_run(), 2);
    m.pauli_pair_table(4).unwrap();
    assert_eq!(m.searches_run(), 2);
}

#[test]
fn test_same_options_same_table() {
    let a = mapper(Strategy::CliffordAssisted).pauli_pair_table(5).unwrap();
    let b = mapper(Strategy::CliffordAssisted).pauli_pair_table(5).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_concurrent_requests_agree() {
    let m = Arc::new(mapper(Strategy::Baseline));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let m = Arc::clone(&m);
            thread::spawn(move || m.pauli_pair_table(4).unwrap())
        })
        .collect();
    let tables: Vec<Arc<PairTable>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for t in &tables[1..] {
        assert_eq!(**t, *tables[0]);
    }
    let before = m.searches_run();
    assert!(before >= 1);
    m.pauli_pair_table(4).unwrap();
    assert_eq!(m.searches_run(), before);
}

#[test]
fn test_connectivity_matrix_size_mismatch() {
    let d = CouplingGraph::linear(3).distance_matrix().unwrap();
    let m = mapper(Strategy::ConnectivityAware(d));
    assert!(matches!(m.pauli_pair_table(4), Err(MapperError::Shape(_))));
    assert_eq!(m.searches_run(), 0);
    assert_eq!(m.pauli_pair_table(3).unwrap().len(), 3);
}

#[test]
fn test_connectivity_on_grid() {
    let d = CouplingGraph::grid(2, 2).distance_matrix().unwrap();
    let m = mapper(Strategy::ConnectivityAware(d));
    let table = m.pauli_pair_table(4).unwrap();
    assert_eq!(table.len(), 4);
}

#[test]
fn test_subspace_index_out_of_range() {
    let m = mapper(Strategy::SubspaceOptimized(vec![(0, 6)]));
    assert!(matches!(m.pauli_pair_table(4), Err(MapperError::Shape(_))));
}

#[test]
fn test_zero_modes_rejected() {
    let m = mapper(Strategy::Baseline);
    assert!(matches!(m.pauli_pair_table(0), Err(MapperError::Shape(_))));
    assert!(DistanceMatrix::new(vec![vec![0.0, 1.0], vec![2.0, 0.0]]).is_err());
}

#[test]
fn test_rendered_table_rows() {
    let m = mapper(Strategy::Baseline);
    let table = m.pauli_pair_table(3).unwrap();
    let rendered = table.to_string();
    let row = Regex::new(r"\|\s*(\d+)\s*\|\s*([IXYZ]{3})\s*\|\s*([IXYZ]{3})\s*\|\s*(\d+)\s*\|").unwrap();

    let rows: Vec<_> = row.captures_iter(&rendered).collect();
    assert_eq!(rows.len(), 3);
    for (k, caps) in rows.iter().enumerate() {
        assert_eq!(caps[1].parse::<usize>().unwrap(), k);
        assert_eq!(&caps[2], table.pairs()[k].0.label());
        let weight = table.pairs()[k].0.weight() + table.pairs()[k].1.weight();
        assert_eq!(caps[4].parse::<usize>().unwrap(), weight);
    }
}
