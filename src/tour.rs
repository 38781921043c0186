//! Tour representation and normalization.
//!
//! Engines return cycles in trace order, ending at their internal depot.
//! Everything handed back to callers is rotated to start and end at city 0.

use serde::{Deserialize, Serialize};

/// Optimal Hamiltonian cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleSolution {
    /// Total length, `+inf` when no finite cycle exists
    pub length: f64,
    /// `n + 1` cities, first and last are both city 0
    pub cycle: Vec<usize>,
}

/// Optimal Hamiltonian path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSolution {
    /// Total length, `+inf` when no finite path exists
    pub length: f64,
    /// Every city exactly once, in visiting order
    pub path: Vec<usize>,
}

/// Rotate a closed tour so it starts at city 0, and repeat city 0 at the end.
///
/// `raw` lists each city once; the return edge is implicit.
pub fn rotate_to_origin(raw: &[usize]) -> Vec<usize> {
    let i = raw.iter().position(|&city| city == 0).unwrap_or(0);

    let mut cycle = Vec::with_capacity(raw.len() + 1);
    cycle.extend_from_slice(&raw[i..]);
    cycle.extend_from_slice(&raw[..i]);
    cycle.push(0);
    cycle
}

/// Whether `tour` visits each of the cities `0..n` exactly once
pub fn is_permutation(tour: &[usize], n: usize) -> bool {
    if tour.len() != n {
        return false;
    }

    let mut seen = vec![false; n];
    for &city in tour {
        if city >= n || seen[city] {
            return false;
        }
        seen[city] = true;
    }
    true
}

impl std::fmt::Display for CycleSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Cycle")?;
        writeln!(f, "  Length: {:.2}", self.length)?;
        writeln!(f, "  Tour: {:?}", self.cycle)
    }
}

impl std::fmt::Display for PathSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Path")?;
        writeln!(f, "  Length: {:.2}", self.length)?;
        writeln!(f, "  Tour: {:?}", self.path)
    }
}
