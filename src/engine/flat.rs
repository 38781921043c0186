//! Flat-memory engine.
//!
//! The whole computation runs over one contiguous byte region, rounded up to
//! whole pages and split into three consecutive zones:
//!
//! 1. distances: `n * n` little-endian `f64`, `d[u][v]` at `(u * n + v) * 8`;
//! 2. costs: `2^(n-1) * (n-1)` `f64`, `cost[S][v]` at `((n - 1) * S + v) * 8`;
//! 3. predecessors: `2^(n-1) * (n-1)` `i32`, at `((n - 1) * S + v) * 4`,
//!    `-1` meaning "came from the depot".
//!
//! [`SharedMemory::compute_cycle`] fills zones 2 and 3 in place and returns
//! the best terminal city, or `-1` when there is only one city. The caller
//! then traces the cycle by reading zone 3 straight out of the region.

use super::{trace_cycle, CycleEngine, PredecessorTable};
use crate::error::{Error, Result};
use crate::graph::DistanceGraph;

/// Allocation granularity of the region
pub const PAGE_SIZE: usize = 65_536;

const F64_BYTES: usize = 8;
const I32_BYTES: usize = 4;

/// Predecessor value for "came from the depot" / "no terminal city"
pub const SENTINEL: i32 = -1;

/// Byte offsets of the three zones for a fixed number of cities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryLayout {
    pub cities: usize,
    pub distance_offset: usize,
    pub cost_offset: usize,
    pub predecessor_offset: usize,
    /// Bytes actually used by the three zones
    pub used_bytes: usize,
    /// Number of pages backing the region
    pub pages: usize,
}

impl MemoryLayout {
    pub fn new(cities: usize) -> Result<Self> {
        let overflow = || Error::Allocation { bytes: usize::MAX };
        let slots = crate::table::slot_count(cities).ok_or_else(overflow)?;

        let distance_bytes = cities
            .checked_mul(cities)
            .and_then(|c| c.checked_mul(F64_BYTES))
            .ok_or_else(overflow)?;
        let cost_bytes = slots.checked_mul(F64_BYTES).ok_or_else(overflow)?;
        let predecessor_bytes = slots.checked_mul(I32_BYTES).ok_or_else(overflow)?;

        let distance_offset = 0;
        let cost_offset = distance_offset + distance_bytes;
        let predecessor_offset = cost_offset.checked_add(cost_bytes).ok_or_else(overflow)?;
        let used_bytes = predecessor_offset
            .checked_add(predecessor_bytes)
            .ok_or_else(overflow)?;
        let pages = used_bytes.div_ceil(PAGE_SIZE);

        Ok(MemoryLayout {
            cities,
            distance_offset,
            cost_offset,
            predecessor_offset,
            used_bytes,
            pages,
        })
    }

    /// Size of the page-rounded region
    pub fn region_bytes(&self) -> usize {
        self.pages * PAGE_SIZE
    }

    #[inline]
    fn distance_at(&self, u: usize, v: usize) -> usize {
        self.distance_offset + (u * self.cities + v) * F64_BYTES
    }

    #[inline]
    fn cost_at(&self, subset: usize, city: usize) -> usize {
        self.cost_offset + ((self.cities - 1) * subset + city) * F64_BYTES
    }

    #[inline]
    fn predecessor_at(&self, subset: usize, city: usize) -> usize {
        self.predecessor_offset + ((self.cities - 1) * subset + city) * I32_BYTES
    }
}

/// The paged region shared between the caller and the engine
pub struct SharedMemory {
    layout: MemoryLayout,
    bytes: Vec<u8>,
}

impl SharedMemory {
    /// Reserve a zeroed region sized for `cities`
    pub fn allocate(cities: usize) -> Result<Self> {
        let layout = MemoryLayout::new(cities)?;
        let size = layout.region_bytes();

        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(size)
            .map_err(|_| Error::Allocation { bytes: size })?;
        bytes.resize(size, 0);

        log::debug!(
            "Allocated shared memory for {} cities: {} pages ({} bytes used)",
            cities,
            layout.pages,
            layout.used_bytes
        );

        Ok(SharedMemory { layout, bytes })
    }

    pub fn layout(&self) -> &MemoryLayout {
        &self.layout
    }

    /// Copy the distance matrix into zone 1
    pub fn write_distances(&mut self, graph: &DistanceGraph) -> Result<()> {
        let n = graph.dimension();
        if n != self.layout.cities {
            return Err(Error::NotSquare { row: 0, len: n, expected: self.layout.cities });
        }

        for (i, &d) in graph.as_slice().iter().enumerate() {
            let offset = self.layout.distance_at(i / n, i % n);
            self.write_f64(offset, d);
        }
        Ok(())
    }

    /// Fill the cost and predecessor zones and close the loop.
    ///
    /// Returns the city visited last before the depot, or [`SENTINEL`] when
    /// there is only one city.
    pub fn compute_cycle(&mut self) -> i32 {
        let layout = self.layout;
        let n = layout.cities;
        if n < 2 {
            return SENTINEL;
        }

        let width = n - 1;
        let depot = width;
        let all = (1usize << width) - 1;

        for s in 1..=all {
            for v in 0..width {
                let bit = 1usize << v;
                if s & bit == 0 {
                    continue;
                }

                let s2 = s ^ bit;
                let mut best_len = 0.0;
                let mut best_m = SENTINEL;
                if s2 != 0 {
                    for m in 0..width {
                        if s2 & (1 << m) == 0 {
                            continue;
                        }
                        let l = self.read_f64(layout.cost_at(s2, m))
                            + self.read_f64(layout.distance_at(m, v));
                        if best_m == SENTINEL || l < best_len {
                            best_len = l;
                            best_m = m as i32;
                        }
                    }
                } else {
                    best_len = self.read_f64(layout.distance_at(depot, v));
                }

                self.write_f64(layout.cost_at(s, v), best_len);
                self.write_i32(layout.predecessor_at(s, v), best_m);
            }
        }

        let mut best_len = 0.0;
        let mut best_k = SENTINEL;
        for k in 0..width {
            let l = self.read_f64(layout.cost_at(all, k))
                + self.read_f64(layout.distance_at(k, depot));
            if k == 0 || l < best_len {
                best_len = l;
                best_k = k as i32;
            }
        }

        best_k
    }

    #[inline]
    fn read_f64(&self, offset: usize) -> f64 {
        let mut buf = [0u8; F64_BYTES];
        buf.copy_from_slice(&self.bytes[offset..offset + F64_BYTES]);
        f64::from_le_bytes(buf)
    }

    #[inline]
    fn write_f64(&mut self, offset: usize, value: f64) {
        self.bytes[offset..offset + F64_BYTES].copy_from_slice(&value.to_le_bytes());
    }

    #[inline]
    fn read_i32(&self, offset: usize) -> i32 {
        let mut buf = [0u8; I32_BYTES];
        buf.copy_from_slice(&self.bytes[offset..offset + I32_BYTES]);
        i32::from_le_bytes(buf)
    }

    #[inline]
    fn write_i32(&mut self, offset: usize, value: i32) {
        self.bytes[offset..offset + I32_BYTES].copy_from_slice(&value.to_le_bytes());
    }
}

impl PredecessorTable for SharedMemory {
    fn predecessor(&self, subset: usize, city: usize) -> Option<usize> {
        match self.read_i32(self.layout.predecessor_at(subset, city)) {
            SENTINEL => None,
            u => Some(u as usize),
        }
    }
}

/// Engine running the dynamic program inside a [`SharedMemory`] region
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatMemoryEngine;

impl FlatMemoryEngine {
    pub fn new() -> Self {
        FlatMemoryEngine
    }
}

impl CycleEngine for FlatMemoryEngine {
    fn raw_cycle(&self, graph: &DistanceGraph) -> Result<Vec<usize>> {
        let n = graph.dimension();
        let mut memory = SharedMemory::allocate(n)?;
        memory.write_distances(graph)?;

        let terminal = match memory.compute_cycle() {
            SENTINEL => None,
            k => Some(k as usize),
        };
        log::debug!("Flat-memory engine: closing through city {:?}", terminal);

        Ok(trace_cycle(&memory, n, terminal))
    }
}
