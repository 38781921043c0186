//! Held-Karp subset cost table.
//!
//! City `n - 1` is the depot. For every non-empty set `S` of the other cities,
//! given as a bitmask, and every city `v` in `S`, the table holds:
//!
//! - `cost(S, v)`: length of the shortest walk that starts at the depot,
//!   visits exactly the cities of `S` and finishes at `v`;
//! - `predecessor(S, v)`: the city visited just before `v` on that walk, or
//!   `None` when `S = {v}` and the walk came straight from the depot.
//!
//! Both are stored in flat buffers of `(n - 1) * 2^(n - 1)` slots indexed by
//! `(n - 1) * S + v`, sized once before the fill starts.

use crate::engine::PredecessorTable;
use crate::error::{Error, Result};
use crate::graph::DistanceGraph;

/// Marks a slot whose predecessor is the depot
pub const NO_PREDECESSOR: u8 = u8::MAX;

/// Number of slots for `n` cities, or `None` on overflow
pub fn slot_count(n: usize) -> Option<usize> {
    let width = n.saturating_sub(1);
    1usize.checked_shl(width as u32)?.checked_mul(width)
}

/// Reserve exactly `slots` entries up front so an oversized request fails
/// cleanly instead of aborting.
fn allocate<T: Copy>(slots: usize, fill: T) -> Result<Vec<T>> {
    let bytes = slots.saturating_mul(std::mem::size_of::<T>());
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(slots)
        .map_err(|_| Error::Allocation { bytes })?;
    buffer.resize(slots, fill);
    Ok(buffer)
}

/// Fully populated DP table for one distance graph
#[derive(Debug, Clone)]
pub struct SubsetCostTable {
    /// Number of non-depot cities, `n - 1`
    width: usize,
    cost: Vec<f64>,
    predecessor: Vec<u8>,
}

impl SubsetCostTable {
    /// Fill the table for `graph`.
    ///
    /// Subsets are visited in increasing numeric order. Clearing a bit always
    /// gives a smaller integer, so every `cost(S \ {v}, u)` needed by
    /// `cost(S, v)` is already known when `(S, v)` is reached.
    pub fn build(graph: &DistanceGraph) -> Result<Self> {
        let n = graph.dimension();
        let width = n.saturating_sub(1);
        let depot = width;
        let slots = slot_count(n).ok_or(Error::Allocation { bytes: usize::MAX })?;

        log::debug!("Building subset table for {} cities ({} slots)", n, slots);

        let mut cost = allocate(slots, f64::INFINITY)?;
        let mut predecessor = allocate(slots, NO_PREDECESSOR)?;

        let all = (1usize << width) - 1;
        for s in 1..=all {
            for v in 0..width {
                let bit = 1usize << v;
                if s & bit == 0 {
                    continue;
                }

                let s2 = s ^ bit;
                let slot = width * s + v;
                if s2 == 0 {
                    cost[slot] = graph.distance(depot, v);
                    predecessor[slot] = NO_PREDECESSOR;
                    continue;
                }

                // First candidate is always taken; later ones only on strict
                // improvement, so the lowest city index wins ties.
                let mut best_cost = f64::INFINITY;
                let mut best_u: Option<usize> = None;
                for u in 0..width {
                    if s2 & (1 << u) == 0 {
                        continue;
                    }
                    let l = cost[width * s2 + u] + graph.distance(u, v);
                    if best_u.is_none() || l < best_cost {
                        best_cost = l;
                        best_u = Some(u);
                    }
                }

                cost[slot] = best_cost;
                predecessor[slot] = best_u.map(|u| u as u8).unwrap_or(NO_PREDECESSOR);
            }
        }

        Ok(SubsetCostTable { width, cost, predecessor })
    }

    /// Number of cities the table was built for
    pub fn cities(&self) -> usize {
        self.width + 1
    }

    /// Mask containing every non-depot city
    pub fn all(&self) -> usize {
        (1usize << self.width) - 1
    }

    /// `cost(S, v)`; only meaningful when bit `v` is set in `subset`
    #[inline]
    pub fn cost(&self, subset: usize, city: usize) -> f64 {
        self.cost[self.width * subset + city]
    }

    /// Close the loop back to the depot.
    ///
    /// Returns the last city before the depot on an optimal cycle together
    /// with the accumulated cycle cost, or `None` when there is no city
    /// besides the depot.
    pub fn best_terminal(&self, graph: &DistanceGraph) -> Option<(usize, f64)> {
        let depot = self.width;
        let all = self.all();
        let mut best: Option<(usize, f64)> = None;
        for u in 0..self.width {
            let l = self.cost(all, u) + graph.distance(u, depot);
            if best.map_or(true, |(_, best_cost)| l < best_cost) {
                best = Some((u, l));
            }
        }
        best
    }
}

impl PredecessorTable for SubsetCostTable {
    fn predecessor(&self, subset: usize, city: usize) -> Option<usize> {
        match self.predecessor[self.width * subset + city] {
            NO_PREDECESSOR => None,
            u => Some(u as usize),
        }
    }
}
