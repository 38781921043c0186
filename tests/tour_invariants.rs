use held_karp::tour::is_permutation;
use held_karp::{Backend, DistanceGraph, HeldKarpSolver, SolverConfig};
use proptest::prelude::*;

/// Exhaustive search over every cycle starting at city 0.
fn brute_force_cycle(graph: &DistanceGraph) -> f64 {
    let n = graph.dimension();
    if n == 1 {
        return 0.0;
    }
    let mut rest: Vec<usize> = (1..n).collect();
    let mut best = f64::INFINITY;
    permute(&mut rest, 0, &mut |order: &[usize]| {
        let mut tour = vec![0];
        tour.extend_from_slice(order);
        best = best.min(graph.cycle_length(&tour));
    });
    best
}

/// Exhaustive search over every open path.
fn brute_force_path(graph: &DistanceGraph) -> f64 {
    let mut cities: Vec<usize> = (0..graph.dimension()).collect();
    let mut best = f64::INFINITY;
    permute(&mut cities, 0, &mut |order: &[usize]| {
        best = best.min(graph.path_length(order));
    });
    best
}

fn permute(items: &mut Vec<usize>, k: usize, visit: &mut dyn FnMut(&[usize])) {
    if k == items.len() {
        visit(items);
        return;
    }
    for i in k..items.len() {
        items.swap(k, i);
        permute(items, k + 1, visit);
        items.swap(k, i);
    }
}

/// Square matrices of small integer weights, some pairs unreachable.
fn matrix_strategy(max_n: usize) -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..=max_n).prop_flat_map(|n| {
        let weight = prop_oneof![9 => 0u32..50, 1 => Just(u32::MAX)];
        prop::collection::vec(prop::collection::vec(weight, n), n)
            .prop_map(|rows| {
                rows.into_iter()
                    .map(|row| {
                        row.into_iter()
                            .map(|d| if d == u32::MAX { f64::INFINITY } else { d as f64 })
                            .collect()
                    })
                    .collect()
            })
    })
}

proptest! {
    #[test]
    fn cycle_is_a_rotated_permutation(rows in matrix_strategy(7)) {
        let graph = DistanceGraph::from_rows(rows).unwrap();
        let n = graph.dimension();
        for backend in Backend::ALL {
            let solver = HeldKarpSolver::new(SolverConfig::with_backend(backend));
            let solution = solver.solve_cycle(&graph).unwrap();
            prop_assert_eq!(solution.cycle.len(), n + 1);
            prop_assert_eq!(solution.cycle[0], 0);
            prop_assert_eq!(solution.cycle[n], 0);
            prop_assert!(is_permutation(&solution.cycle[..n], n));
        }
    }

    #[test]
    fn path_is_a_permutation_with_matching_length(rows in matrix_strategy(7)) {
        let graph = DistanceGraph::from_rows(rows).unwrap();
        let n = graph.dimension();
        for backend in Backend::ALL {
            let solver = HeldKarpSolver::new(SolverConfig::with_backend(backend));
            let solution = solver.solve_path(&graph).unwrap();
            prop_assert!(is_permutation(&solution.path, n));
            prop_assert_eq!(solution.length, graph.path_length(&solution.path));
        }
    }

    #[test]
    fn cycle_length_matches_its_edges(rows in matrix_strategy(7)) {
        let graph = DistanceGraph::from_rows(rows).unwrap();
        let n = graph.dimension();
        let solution = HeldKarpSolver::default().solve_cycle(&graph).unwrap();
        if n > 1 {
            prop_assert_eq!(solution.length, graph.cycle_length(&solution.cycle[..n]));
        }
    }

    #[test]
    fn solutions_are_optimal(rows in matrix_strategy(6)) {
        let graph = DistanceGraph::from_rows(rows).unwrap();
        let solver = HeldKarpSolver::default();
        prop_assert_eq!(solver.solve_cycle(&graph).unwrap().length, brute_force_cycle(&graph));
        prop_assert_eq!(solver.solve_path(&graph).unwrap().length, brute_force_path(&graph));
    }
}

#[test]
fn disconnected_graph_still_returns_full_tour() {
    let inf = f64::INFINITY;
    let graph = DistanceGraph::from_rows(vec![
        vec![0.0, 1.0, inf, inf],
        vec![1.0, 0.0, inf, inf],
        vec![inf, inf, 0.0, 1.0],
        vec![inf, inf, 1.0, 0.0],
    ])
    .unwrap();

    let cycle = HeldKarpSolver::default().solve_cycle(&graph).unwrap();
    assert!(cycle.length.is_infinite());
    assert!(is_permutation(&cycle.cycle[..4], 4));

    let path = HeldKarpSolver::default().solve_path(&graph).unwrap();
    assert!(path.length.is_infinite());
    assert!(is_permutation(&path.path, 4));
}

#[test]
fn euclidean_path_length_equals_edge_sum() {
    for seed in [6u64, 11, 23] {
        for n in [4usize, 9] {
            let graph = DistanceGraph::random_euclidean(n, seed).unwrap();
            for backend in Backend::ALL {
                let solver = HeldKarpSolver::new(SolverConfig::with_backend(backend));
                let solution = solver.solve_path(&graph).unwrap();
                assert_eq!(solution.length, graph.path_length(&solution.path));
            }
        }
    }
}
