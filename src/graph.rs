//! Module for parsing and representing distance graphs.
//!
//! A distance graph is a complete directed graph on `n` cities given as an
//! `n x n` matrix. It does not need to be symmetric and unreachable pairs are
//! encoded as `+inf`. The diagonal is never read by the solver.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Validated `n x n` matrix of directed travel costs, stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceGraph {
    /// Number of cities
    dimension: usize,
    /// `d[u][v]` lives at `u * dimension + v`
    distances: Vec<f64>,
}

impl DistanceGraph {
    /// Build a graph from matrix rows, rejecting ragged rows and invalid entries
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(Error::EmptyGraph);
        }

        let mut distances = Vec::with_capacity(n * n);
        for (u, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(Error::NotSquare { row: u, len: row.len(), expected: n });
            }
            for (v, value) in row.into_iter().enumerate() {
                if u != v && (value.is_nan() || value < 0.0) {
                    return Err(Error::InvalidDistance { from: u, to: v, value });
                }
                distances.push(value);
            }
        }

        Ok(DistanceGraph { dimension: n, distances })
    }

    /// Build a Euclidean graph from points in the plane
    pub fn from_points(points: &[(f64, f64)]) -> Result<Self> {
        let n = points.len();
        if n == 0 {
            return Err(Error::EmptyGraph);
        }

        let mut distances = vec![0.0; n * n];
        for (u, &(xu, yu)) in points.iter().enumerate() {
            for (v, &(xv, yv)) in points.iter().enumerate() {
                if u != v {
                    let dx = xv - xu;
                    let dy = yv - yu;
                    distances[u * n + v] = (dx * dx + dy * dy).sqrt();
                }
            }
        }

        Ok(DistanceGraph { dimension: n, distances })
    }

    /// Place `n` cities uniformly in the unit square and use the Euclidean metric.
    /// Deterministic for a given seed.
    pub fn random_euclidean(n: usize, seed: u64) -> Result<Self> {
        use rand::prelude::*;
        use rand_chacha::ChaCha8Rng;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let points: Vec<(f64, f64)> = (0..n)
            .map(|_| (rng.gen::<f64>(), rng.gen::<f64>()))
            .collect();

        Self::from_points(&points)
    }

    /// Load a matrix from a file.
    ///
    /// `.json` files hold an array of rows where `null` marks an unreachable
    /// pair. Any other extension is read as comma-separated rows, where
    /// `inf` marks an unreachable pair.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let rows = if is_json {
            let text = std::fs::read_to_string(path)?;
            Self::parse_json_rows(&text)?
        } else {
            let file = std::fs::File::open(path)?;
            Self::parse_csv_rows(file)?
        };

        Self::from_rows(rows)
    }

    fn parse_json_rows(text: &str) -> Result<Vec<Vec<f64>>> {
        let raw: Vec<Vec<Option<f64>>> = serde_json::from_str(text)?;
        Ok(raw
            .into_iter()
            .map(|row| row.into_iter().map(|d| d.unwrap_or(f64::INFINITY)).collect())
            .collect())
    }

    fn parse_csv_rows<R: std::io::Read>(reader: R) -> Result<Vec<Vec<f64>>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (line, record) in csv_reader.records().enumerate() {
            let record = record?;
            let row = record
                .iter()
                .map(|field| {
                    field.parse::<f64>().map_err(|_| {
                        Error::Parse(format!("Invalid distance '{}' on line {}", field, line + 1))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            rows.push(row);
        }

        Ok(rows)
    }

    /// Write the matrix as JSON rows, `null` for unreachable pairs
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.to_json_rows())?;
        std::fs::write(path, json)?;
        Ok(())
    }

    fn to_json_rows(&self) -> Vec<Vec<Option<f64>>> {
        self.distances
            .chunks(self.dimension)
            .map(|row| row.iter().map(|&d| if d.is_infinite() { None } else { Some(d) }).collect())
            .collect()
    }

    /// Number of cities
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Directed cost from `u` to `v`
    #[inline]
    pub fn distance(&self, u: usize, v: usize) -> f64 {
        self.distances[u * self.dimension + v]
    }

    /// Row-major view of the whole matrix
    pub fn as_slice(&self) -> &[f64] {
        &self.distances
    }

    /// Add a "universal vertex" at index 0, at distance 0 to and from every
    /// other city. City `i` of `self` becomes city `i + 1`.
    pub fn with_universal_vertex(&self) -> DistanceGraph {
        let n = self.dimension + 1;
        let mut distances = vec![0.0; n * n];
        for u in 0..self.dimension {
            for v in 0..self.dimension {
                distances[(u + 1) * n + (v + 1)] = self.distance(u, v);
            }
        }

        DistanceGraph { dimension: n, distances }
    }

    /// Length of a closed tour, including the edge from the last city back
    /// to the first. Edges are summed in the order they appear.
    pub fn cycle_length(&self, tour: &[usize]) -> f64 {
        if tour.is_empty() {
            return 0.0;
        }

        tour.iter()
            .enumerate()
            .fold(0.0, |acc, (i, &u)| acc + self.distance(u, tour[(i + 1) % tour.len()]))
    }

    /// Length of an open tour (no return edge)
    pub fn path_length(&self, tour: &[usize]) -> f64 {
        tour.windows(2).fold(0.0, |acc, w| acc + self.distance(w[0], w[1]))
    }

    /// Whether `d[u][v] == d[v][u]` for every pair
    pub fn is_symmetric(&self) -> bool {
        (0..self.dimension)
            .all(|u| (u + 1..self.dimension).all(|v| self.distance(u, v) == self.distance(v, u)))
    }

    /// Get statistics about the graph
    pub fn statistics(&self) -> GraphStatistics {
        let n = self.dimension;
        let mut finite: Vec<f64> = Vec::new();
        let mut unreachable_pairs = 0;
        for u in 0..n {
            for v in 0..n {
                if u == v {
                    continue;
                }
                let d = self.distance(u, v);
                if d.is_finite() {
                    finite.push(d);
                } else {
                    unreachable_pairs += 1;
                }
            }
        }

        let (min_distance, avg_distance, max_distance) = if finite.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            (
                finite.iter().cloned().fold(f64::INFINITY, f64::min),
                finite.iter().sum::<f64>() / finite.len() as f64,
                finite.iter().cloned().fold(0.0, f64::max),
            )
        };

        GraphStatistics {
            dimension: n,
            symmetric: self.is_symmetric(),
            unreachable_pairs,
            min_distance,
            avg_distance,
            max_distance,
        }
    }
}

/// Statistics about a distance graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub dimension: usize,
    pub symmetric: bool,
    pub unreachable_pairs: usize,
    pub min_distance: f64,
    pub avg_distance: f64,
    pub max_distance: f64,
}

impl std::fmt::Display for GraphStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Graph:")?;
        writeln!(f, "  Cities: {}", self.dimension)?;
        writeln!(f, "  Symmetric: {}", self.symmetric)?;
        writeln!(f, "  Unreachable pairs: {}", self.unreachable_pairs)?;
        writeln!(f, "  Min distance: {:.2}", self.min_distance)?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(matches!(DistanceGraph::from_rows(vec![]), Err(Error::EmptyGraph)));
        assert!(matches!(
            DistanceGraph::from_rows(vec![vec![0.0, 1.0], vec![1.0]]),
            Err(Error::NotSquare { row: 1, len: 1, expected: 2 })
        ));
        assert!(matches!(
            DistanceGraph::from_rows(vec![vec![0.0, 1.0, 2.0], vec![1.0, 0.0, 2.0]]),
            Err(Error::NotSquare { row: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_bad_entries() {
        assert!(matches!(
            DistanceGraph::from_rows(vec![vec![0.0, -1.0], vec![1.0, 0.0]]),
            Err(Error::InvalidDistance { from: 0, to: 1, .. })
        ));
        assert!(matches!(
            DistanceGraph::from_rows(vec![vec![0.0, 1.0], vec![f64::NAN, 0.0]]),
            Err(Error::InvalidDistance { from: 1, to: 0, .. })
        ));
        let rows = vec![vec![0.0, f64::NEG_INFINITY], vec![1.0, 0.0]];
        assert!(DistanceGraph::from_rows(rows).is_err());
    }

    #[test]
    fn test_accepts_infinity_and_ignores_diagonal() {
        let rows = vec![vec![f64::NAN, f64::INFINITY], vec![3.0, -1.0]];
        let graph = DistanceGraph::from_rows(rows).unwrap();
        assert_eq!(graph.dimension(), 2);
        assert!(graph.distance(0, 1).is_infinite());
    }

    #[test]
    fn test_distance_calculation() {
        let graph = DistanceGraph::from_points(&[(0.0, 0.0), (3.0, 4.0)]).unwrap();
        assert!((graph.distance(0, 1) - 5.0).abs() < 1e-10);
        assert!((graph.distance(1, 0) - 5.0).abs() < 1e-10);
        assert_eq!(graph.distance(0, 0), 0.0);
    }

    #[test]
    fn test_random_euclidean_is_seeded() {
        let a = DistanceGraph::random_euclidean(6, 7).unwrap();
        let b = DistanceGraph::random_euclidean(6, 7).unwrap();
        let c = DistanceGraph::random_euclidean(6, 8).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.is_symmetric());
    }

    #[test]
    fn test_universal_vertex() {
        let graph = DistanceGraph::from_rows(vec![vec![0.0, 7.0], vec![6.0, 0.0]]).unwrap();
        let augmented = graph.with_universal_vertex();
        assert_eq!(augmented.dimension(), 3);
        for v in 0..3 {
            assert_eq!(augmented.distance(0, v), 0.0);
            assert_eq!(augmented.distance(v, 0), 0.0);
        }
        assert_eq!(augmented.distance(1, 2), 7.0);
        assert_eq!(augmented.distance(2, 1), 6.0);
    }

    #[test]
    fn test_tour_lengths() {
        let graph = DistanceGraph::from_rows(vec![
            vec![0.0, 1.0, 60.0],
            vec![60.0, 0.0, 1.0],
            vec![1.0, 60.0, 0.0],
        ])
        .unwrap();
        assert_eq!(graph.cycle_length(&[0, 1, 2]), 3.0);
        assert_eq!(graph.cycle_length(&[0, 2, 1]), 180.0);
        assert_eq!(graph.path_length(&[0, 1, 2]), 2.0);
        assert_eq!(graph.path_length(&[1]), 0.0);
    }

    #[test]
    fn test_load_json_with_null() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "[[0, null], [4.5, 0]]").unwrap();

        let graph = DistanceGraph::from_file(file.path()).unwrap();
        assert!(graph.distance(0, 1).is_infinite());
        assert_eq!(graph.distance(1, 0), 4.5);
    }

    #[test]
    fn test_load_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "0, 2, inf").unwrap();
        writeln!(file, "2, 0, 3").unwrap();
        writeln!(file, "1, 3, 0").unwrap();

        let graph = DistanceGraph::from_file(file.path()).unwrap();
        assert_eq!(graph.dimension(), 3);
        assert!(graph.distance(0, 2).is_infinite());
        assert_eq!(graph.distance(2, 1), 3.0);
    }

    #[test]
    fn test_load_csv_rejects_garbage() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "0, abc").unwrap();
        writeln!(file, "1, 0").unwrap();

        assert!(matches!(DistanceGraph::from_file(file.path()), Err(Error::Parse(_))));
    }

    #[test]
    fn test_json_round_trip_keeps_infinity() {
        let rows = vec![vec![0.0, f64::INFINITY], vec![2.0, 0.0]];
        let graph = DistanceGraph::from_rows(rows).unwrap();
        let file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        graph.save_json(file.path()).unwrap();

        let loaded = DistanceGraph::from_file(file.path()).unwrap();
        assert_eq!(loaded, graph);
    }

    #[test]
    fn test_statistics() {
        let rows = vec![vec![0.0, f64::INFINITY], vec![2.0, 0.0]];
        let graph = DistanceGraph::from_rows(rows).unwrap();
        let stats = graph.statistics();
        assert_eq!(stats.unreachable_pairs, 1);
        assert!(!stats.symmetric);
        assert_eq!(stats.max_distance, 2.0);
    }
}
