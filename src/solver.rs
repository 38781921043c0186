//! Cycle and path solvers.
//!
//! [`HeldKarpSolver::solve_cycle`] runs the configured engine, recomputes the
//! length from the traced edges and rotates the tour to start at city 0.
//! [`HeldKarpSolver::solve_path`] reduces the path problem to the cycle
//! problem with a universal vertex.

use crate::config::SolverConfig;
use crate::error::{Error, Result};
use crate::graph::DistanceGraph;
use crate::tour::{rotate_to_origin, CycleSolution, PathSolution};

/// Exact TSP solver
#[derive(Debug, Clone, Default)]
pub struct HeldKarpSolver {
    pub config: SolverConfig,
}

impl HeldKarpSolver {
    pub fn new(config: SolverConfig) -> Self {
        HeldKarpSolver { config }
    }

    /// Minimum-length Hamiltonian cycle, reported from city 0 back to city 0
    pub fn solve_cycle(&self, graph: &DistanceGraph) -> Result<CycleSolution> {
        let n = graph.dimension();
        let limit = self.config.city_limit();
        if n > limit {
            return Err(Error::TooManyCities { cities: n, limit });
        }

        if n == 1 {
            return Ok(CycleSolution { length: 0.0, cycle: vec![0, 0] });
        }

        let raw = self.config.backend.raw_cycle(graph)?;

        // Length comes from the traced edges, not from the table.
        let length = graph.cycle_length(&raw);
        if !length.is_finite() {
            log::warn!("No finite cycle exists through all {} cities", n);
        }

        Ok(CycleSolution { length, cycle: rotate_to_origin(&raw) })
    }

    /// Minimum-length Hamiltonian path (no return to the start)
    pub fn solve_path(&self, graph: &DistanceGraph) -> Result<PathSolution> {
        let augmented = graph.with_universal_vertex();
        let CycleSolution { cycle, .. } = self.solve_cycle(&augmented)?;

        // Summed from the synthetic city onwards: its zero edges add exactly,
        // so this equals the edge sum along the returned path.
        let length = augmented.path_length(&cycle);

        Ok(PathSolution { length, path: strip_universal_vertex(&cycle) })
    }
}

/// Drop the synthetic city 0 from both ends of a normalized cycle and shift
/// the remaining cities back to their original indices.
fn strip_universal_vertex(cycle: &[usize]) -> Vec<usize> {
    cycle[1..cycle.len() - 1].iter().map(|&city| city - 1).collect()
}

/// Solve the cycle problem for a raw matrix with the default configuration
pub fn solve_cycle(matrix: Vec<Vec<f64>>) -> Result<CycleSolution> {
    HeldKarpSolver::default().solve_cycle(&DistanceGraph::from_rows(matrix)?)
}

/// Solve the path problem for a raw matrix with the default configuration
pub fn solve_path(matrix: Vec<Vec<f64>>) -> Result<PathSolution> {
    HeldKarpSolver::default().solve_path(&DistanceGraph::from_rows(matrix)?)
}
