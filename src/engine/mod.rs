//! Execution backends for the Held-Karp dynamic program.
//!
//! Both backends fill the same subset table with the same recurrence and
//! hand back the optimal cycle in trace order (`n` cities, ending at the
//! depot `n - 1`). They differ only in where the table lives:
//!
//! - [`ReferenceEngine`]: typed in-process buffers ([`SubsetCostTable`]);
//! - [`FlatMemoryEngine`]: one paged byte region split into distance, cost
//!   and predecessor zones, read back through raw offsets.
//!
//! Given the same graph they return bit-identical cycles.
//!
//! [`SubsetCostTable`]: crate::table::SubsetCostTable

pub mod flat;
pub mod reference;

pub use flat::{FlatMemoryEngine, MemoryLayout, SharedMemory, PAGE_SIZE};
pub use reference::ReferenceEngine;

use crate::error::Result;
use crate::graph::DistanceGraph;
use serde::{Deserialize, Serialize};

/// Read access to the predecessor half of a filled subset table
pub trait PredecessorTable {
    /// City visited just before `city` on the best walk over `subset`,
    /// `None` if that walk came straight from the depot.
    fn predecessor(&self, subset: usize, city: usize) -> Option<usize>;
}

/// A strategy that solves the cycle problem for one graph
pub trait CycleEngine {
    /// Optimal cycle in trace order: every city once, ending at the depot.
    fn raw_cycle(&self, graph: &DistanceGraph) -> Result<Vec<usize>>;
}

/// Walk predecessors back from `terminal` over the full subset.
///
/// Returns the cycle in visiting order, ending at the depot `n - 1`. With no
/// terminal (a single city) the cycle is just the depot.
pub fn trace_cycle<T: PredecessorTable + ?Sized>(
    table: &T,
    n: usize,
    terminal: Option<usize>,
) -> Vec<usize> {
    let depot = n - 1;
    let mut reversed = Vec::with_capacity(n);
    reversed.push(depot);

    let mut subset = (1usize << depot) - 1;
    let mut current = terminal;
    while let Some(city) = current {
        reversed.push(city);
        let previous_subset = subset ^ (1 << city);
        current = table.predecessor(subset, city);
        subset = previous_subset;
    }

    reversed.reverse();
    reversed
}

/// Which engine runs the dynamic program
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// In-process typed table
    #[default]
    Reference,
    /// Shared paged memory region
    FlatMemory,
}

impl Backend {
    /// Every available backend
    pub const ALL: [Backend; 2] = [Backend::Reference, Backend::FlatMemory];

    pub fn raw_cycle(self, graph: &DistanceGraph) -> Result<Vec<usize>> {
        match self {
            Backend::Reference => ReferenceEngine::new().raw_cycle(graph),
            Backend::FlatMemory => FlatMemoryEngine::new().raw_cycle(graph),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Backend::Reference => "reference",
            Backend::FlatMemory => "flat-memory",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapTable(HashMap<(usize, usize), usize>);

    impl PredecessorTable for MapTable {
        fn predecessor(&self, subset: usize, city: usize) -> Option<usize> {
            self.0.get(&(subset, city)).copied()
        }
    }

    #[test]
    fn test_trace_single_city() {
        let table = MapTable(HashMap::new());
        assert_eq!(trace_cycle(&table, 1, None), vec![0]);
    }

    #[test]
    fn test_trace_follows_predecessors() {
        // depot 3 -> 2 -> 0 -> 1 -> depot
        let mut links = HashMap::new();
        links.insert((0b111, 1), 0);
        links.insert((0b101, 0), 2);
        let table = MapTable(links);
        assert_eq!(trace_cycle(&table, 4, Some(1)), vec![2, 0, 1, 3]);
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(Backend::default(), Backend::Reference);
        assert_eq!(Backend::FlatMemory.to_string(), "flat-memory");
        let json = serde_json::to_string(&Backend::FlatMemory).unwrap();
        assert_eq!(json, "\"flat-memory\"");
    }
}
