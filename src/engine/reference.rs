//! In-process engine over [`SubsetCostTable`].

use super::{trace_cycle, CycleEngine};
use crate::error::Result;
use crate::graph::DistanceGraph;
use crate::table::SubsetCostTable;

/// Straightforward engine: build the typed table, close the loop, trace back
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceEngine;

impl ReferenceEngine {
    pub fn new() -> Self {
        ReferenceEngine
    }
}

impl CycleEngine for ReferenceEngine {
    fn raw_cycle(&self, graph: &DistanceGraph) -> Result<Vec<usize>> {
        let table = SubsetCostTable::build(graph)?;
        let terminal = table.best_terminal(graph);
        if let Some((city, cost)) = terminal {
            log::debug!("Reference engine: closing through city {} (cost {})", city, cost);
        }

        Ok(trace_cycle(&table, graph.dimension(), terminal.map(|(city, _)| city)))
    }
}
