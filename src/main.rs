//! Held-Karp TSP Solver - Command Line Interface
//!
//! Exact Traveling Salesman cycles and paths for small distance graphs.

use clap::{Parser, Subcommand, ValueEnum};
use held_karp::benchmark::{Benchmark, BenchmarkConfig};
use held_karp::config::SolverConfig;
use held_karp::graph::DistanceGraph;
use held_karp::solver::HeldKarpSolver;
use indicatif::{ProgressBar, ProgressStyle};

use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "held-karp")]
#[command(version = "1.0")]
#[command(about = "Exact TSP solver using the Held-Karp dynamic program")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a distance matrix (JSON or CSV)
    Solve {
        #[arg(short, long)]
        input: PathBuf,

        /// Find a Hamiltonian path instead of a cycle
        #[arg(long)]
        path: bool,

        /// Backend running the dynamic program
        #[arg(short, long, value_enum)]
        backend: Option<Backend>,

        /// Refuse graphs larger than this
        #[arg(long)]
        max_cities: Option<usize>,

        /// JSON solver configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output solution to file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write a random Euclidean distance matrix as JSON
    Generate {
        #[arg(short = 'n', long)]
        cities: usize,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Time both backends on one random instance
    Perf {
        #[arg(short = 'n', long, default_value = "16")]
        cities: usize,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },

    /// Run benchmarks over a range of sizes
    Benchmark {
        #[arg(long, default_value = "4")]
        min_cities: usize,

        #[arg(long, default_value = "14")]
        max_cities: usize,

        /// Number of random instances per size
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Backend {
    /// In-process typed subset table
    Reference,
    /// Shared paged memory region
    FlatMemory,
}

impl From<Backend> for held_karp::Backend {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Reference => held_karp::Backend::Reference,
            Backend::FlatMemory => held_karp::Backend::FlatMemory,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Solve { input, path, backend, max_cities, config, output, verbose } => {
            solve(&input, path, backend, max_cities, config, output, verbose)
        }
        Commands::Generate { cities, seed, output } => generate(cities, seed, &output),
        Commands::Perf { cities, seed } => perf(cities, seed),
        Commands::Benchmark { min_cities, max_cities, runs, seed, output } => {
            run_benchmark(min_cities, max_cities, runs, seed, &output)
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn solve(
    input: &Path,
    path: bool,
    backend: Option<Backend>,
    max_cities: Option<usize>,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    verbose: bool,
) -> held_karp::Result<()> {
    let mut config = match config {
        Some(file) => SolverConfig::from_file(file)?,
        None => SolverConfig::default(),
    };
    if let Some(backend) = backend {
        config.backend = backend.into();
    }
    if let Some(max) = max_cities {
        config.max_cities = max;
    }

    println!("Loading distance matrix from {:?}...", input);
    let graph = DistanceGraph::from_file(input)?;

    if verbose {
        println!("{}", graph.statistics());
        println!("Backend: {}", config.backend);
    }

    let solver = HeldKarpSolver::new(config);
    let start = Instant::now();

    let json = if path {
        let solution = solver.solve_path(&graph)?;
        println!("\n{}", solution);
        serde_json::to_string_pretty(&solution)?
    } else {
        let solution = solver.solve_cycle(&graph)?;
        println!("\n{}", solution);
        serde_json::to_string_pretty(&solution)?
    };

    println!("Time: {:.4}s", start.elapsed().as_secs_f64());

    if let Some(out_path) = output {
        std::fs::write(&out_path, json)?;
        println!("\nSolution saved to {:?}", out_path);
    }

    Ok(())
}

fn generate(cities: usize, seed: u64, output: &Path) -> held_karp::Result<()> {
    let graph = DistanceGraph::random_euclidean(cities, seed)?;
    graph.save_json(output)?;
    println!("Wrote {} cities (seed {}) to {:?}", cities, seed, output);
    Ok(())
}

fn perf(cities: usize, seed: u64) -> held_karp::Result<()> {
    let graph = DistanceGraph::random_euclidean(cities, seed)?;
    println!("n = {}", cities);

    let mut solutions = Vec::new();
    for backend in held_karp::Backend::ALL {
        let solver = HeldKarpSolver::new(SolverConfig { backend, max_cities: cities });
        let start = Instant::now();
        let solution = solver.solve_cycle(&graph)?;
        println!("\nHK/{}: {:.4}s", backend, start.elapsed().as_secs_f64());
        print!("{}", solution);
        solutions.push(solution);
    }

    let agreed = solutions.windows(2).all(|w| w[0] == w[1]);
    println!("\nBackends agree: {}", agreed);
    Ok(())
}

fn run_benchmark(
    min_cities: usize,
    max_cities: usize,
    runs: usize,
    seed: u64,
    output: &Path,
) -> held_karp::Result<()> {
    std::fs::create_dir_all(output)?;

    let config = BenchmarkConfig {
        min_cities,
        max_cities,
        num_runs: runs,
        seed,
        ..Default::default()
    };
    let mut benchmark = Benchmark::new(config);

    let sizes = max_cities.saturating_sub(min_cities) + 1;
    let pb = ProgressBar::new(sizes as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    for cities in min_cities..=max_cities {
        pb.set_message(format!("n={}", cities));
        benchmark.run_size(cities)?;
        pb.inc(1);
    }
    pb.finish_with_message("done");

    let results_path = output.join("results.csv");
    benchmark.export_to_csv(&results_path)?;
    println!("\nResults exported to {:?}", results_path);

    let stats_path = output.join("statistics.csv");
    benchmark.export_statistics_csv(&stats_path)?;
    println!("Statistics exported to {:?}", stats_path);

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    std::fs::write(&report_path, &report)?;
    println!("Report saved to {:?}", report_path);

    Ok(())
}
