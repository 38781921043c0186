//! Held-Karp TSP Solver Library
//!
//! Exact solutions to the Traveling Salesman Problem over a complete,
//! possibly asymmetric, distance graph using the Held-Karp dynamic program
//! (`O(n^2 * 2^n)` time, `O(n * 2^n)` memory).
//!
//! # Features
//!
//! - Minimum-cost Hamiltonian cycle, reported from city 0 back to city 0
//! - Minimum-cost Hamiltonian path, via a zero-cost universal vertex
//! - Two interchangeable backends (typed table, flat paged memory) that
//!   return bit-identical results
//! - Unreachable pairs as `+inf` distances
//! - Benchmarking and cross-checking tools
//!
//! # Example
//!
//! ```
//! use held_karp::solver::solve_cycle;
//!
//! let solution = solve_cycle(vec![
//!     vec![0.0, 1.0, 65.0],
//!     vec![1.0, 0.0, 2.0],
//!     vec![65.0, 2.0, 0.0],
//! ])
//! .unwrap();
//!
//! assert_eq!(solution.length, 68.0);
//! assert_eq!(solution.cycle, vec![0, 2, 1, 0]);
//! ```

pub mod benchmark;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod solver;
pub mod table;
pub mod tour;

pub use config::SolverConfig;
pub use engine::Backend;
pub use error::{Error, Result};
pub use graph::DistanceGraph;
pub use solver::{solve_cycle, solve_path, HeldKarpSolver};
pub use tour::{CycleSolution, PathSolution};
