//! Benchmarking and cross-checking of the backends.
//!
//! Times every backend on seeded random Euclidean instances, verifies that
//! the backends agree bit for bit, and exports the measurements.

use crate::config::SolverConfig;
use crate::engine::Backend;
use crate::error::Result;
use crate::graph::DistanceGraph;
use crate::solver::HeldKarpSolver;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::time::Instant;

/// Result of one backend solving one instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Backend name
    pub backend: String,
    /// Number of cities
    pub cities: usize,
    /// Run index for this size
    pub run: usize,
    /// Seed used to generate the instance
    pub seed: u64,
    /// Optimal cycle length
    pub length: f64,
    /// Solve time in seconds
    pub time: f64,
    /// Whether every backend returned the same cycle for this instance
    pub agreed: bool,
}

/// Aggregated timings for one backend at one size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkStatistics {
    pub backend: String,
    pub cities: usize,
    pub runs: usize,
    pub disagreements: usize,
    pub mean_time: f64,
    pub std_time: f64,
    pub min_time: f64,
    pub max_time: f64,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Smallest instance size
    pub min_cities: usize,
    /// Largest instance size
    pub max_cities: usize,
    /// Number of random instances per size
    pub num_runs: usize,
    /// Base seed; run `r` of size `n` uses `seed + n * num_runs + r`
    pub seed: u64,
    /// Backends to time
    pub backends: Vec<Backend>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            min_cities: 4,
            max_cities: 16,
            num_runs: 5,
            seed: 42,
            backends: Backend::ALL.to_vec(),
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<BenchmarkResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    /// Seed of run `run` at size `cities`
    pub fn instance_seed(&self, cities: usize, run: usize) -> u64 {
        self.config.seed + (cities * self.config.num_runs + run) as u64
    }

    /// Time every backend on `num_runs` instances of `cities` cities
    pub fn run_size(&mut self, cities: usize) -> Result<()> {
        log::info!("Benchmarking {} cities ({} runs)", cities, self.config.num_runs);

        for run in 0..self.config.num_runs {
            let seed = self.instance_seed(cities, run);
            let graph = DistanceGraph::random_euclidean(cities, seed)?;

            let mut timed = Vec::with_capacity(self.config.backends.len());
            for &backend in &self.config.backends {
                let solver = HeldKarpSolver::new(SolverConfig {
                    backend,
                    max_cities: cities,
                });
                let start = Instant::now();
                let solution = solver.solve_cycle(&graph)?;
                timed.push((backend, solution, start.elapsed().as_secs_f64()));
            }

            let agreed = timed.windows(2).all(|w| w[0].1 == w[1].1);
            if !agreed {
                log::warn!("Backends disagree on {} cities (seed {})", cities, seed);
            }

            for (backend, solution, time) in timed {
                self.results.push(BenchmarkResult {
                    backend: backend.name().to_string(),
                    cities,
                    run,
                    seed,
                    length: solution.length,
                    time,
                    agreed,
                });
            }
        }

        Ok(())
    }

    /// Compute statistics for each backend and size
    pub fn compute_statistics(&self) -> Vec<BenchmarkStatistics> {
        let mut groups: BTreeMap<(usize, String), Vec<&BenchmarkResult>> = BTreeMap::new();
        for result in &self.results {
            groups
                .entry((result.cities, result.backend.clone()))
                .or_default()
                .push(result);
        }

        groups
            .into_iter()
            .map(|((cities, backend), results)| {
                let times: Vec<f64> = results.iter().map(|r| r.time).collect();
                let std_time = if times.len() > 1 { times.iter().std_dev() } else { 0.0 };

                BenchmarkStatistics {
                    backend,
                    cities,
                    runs: results.len(),
                    disagreements: results.iter().filter(|r| !r.agreed).count(),
                    mean_time: times.iter().mean(),
                    std_time,
                    min_time: times.iter().cloned().fold(f64::INFINITY, f64::min),
                    max_time: times.iter().cloned().fold(0.0, f64::max),
                }
            })
            .collect()
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Export statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for stat in self.compute_statistics() {
            writer.serialize(stat)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("       Held-Karp Benchmark Report\n");
        report.push_str("========================================\n");
        report.push_str(&format!("Generated: {}\n\n", chrono::Utc::now().to_rfc3339()));

        report.push_str("-".repeat(72).as_str());
        report.push('\n');
        report.push_str(&format!(
            "{:<8} {:<14} {:>6} {:>12} {:>12} {:>12}\n",
            "Cities", "Backend", "Runs", "Mean (s)", "Std (s)", "Max (s)"
        ));
        report.push_str("-".repeat(72).as_str());
        report.push('\n');

        let stats = self.compute_statistics();
        for stat in &stats {
            report.push_str(&format!(
                "{:<8} {:<14} {:>6} {:>12.6} {:>12.6} {:>12.6}\n",
                stat.cities, stat.backend, stat.runs, stat.mean_time, stat.std_time, stat.max_time
            ));
        }

        report.push_str("-".repeat(72).as_str());
        report.push('\n');

        let disagreements: usize = stats.iter().map(|s| s.disagreements).sum();
        if disagreements == 0 {
            report.push_str("\nAll backends agreed on every instance.\n");
        } else {
            report.push_str(&format!("\n{} results where backends disagreed.\n", disagreements));
        }

        report
    }

    /// Get all results
    pub fn results(&self) -> &[BenchmarkResult] {
        &self.results
    }
}

/// Solve `instances` random graphs of `cities` cities with every backend,
/// both as cycle and as path, and return the seeds where any backend's
/// result differs from the reference backend's.
pub fn cross_check(cities: usize, instances: usize, seed: u64) -> Result<Vec<u64>> {
    let reference = HeldKarpSolver::new(SolverConfig::with_backend(Backend::Reference));
    let others: Vec<HeldKarpSolver> = Backend::ALL
        .iter()
        .filter(|&&b| b != Backend::Reference)
        .map(|&b| HeldKarpSolver::new(SolverConfig::with_backend(b)))
        .collect();

    let outcomes: Vec<Result<Option<u64>>> = (0..instances as u64)
        .into_par_iter()
        .map(|i| {
            let instance_seed = seed + i;
            let graph = DistanceGraph::random_euclidean(cities, instance_seed)?;
            let cycle = reference.solve_cycle(&graph)?;
            let path = reference.solve_path(&graph)?;

            for solver in &others {
                if solver.solve_cycle(&graph)? != cycle || solver.solve_path(&graph)? != path {
                    return Ok(Some(instance_seed));
                }
            }
            Ok(None)
        })
        .collect();

    let mut mismatches = Vec::new();
    for outcome in outcomes {
        if let Some(seed) = outcome? {
            mismatches.push(seed);
        }
    }
    mismatches.sort_unstable();
    Ok(mismatches)
}
