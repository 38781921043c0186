//! Solver configuration.

use crate::engine::Backend;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest graph any backend can index: subset masks and 4-byte
/// predecessor slots must stay in range.
pub const MAX_SUPPORTED_CITIES: usize = 31;

/// Solver configuration parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Engine used to fill the subset table
    pub backend: Backend,
    /// Largest graph handed to the engine, synthetic path vertex included.
    /// Memory grows as `n * 2^n`, so this guards against runaway allocations.
    pub max_cities: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            backend: Backend::Reference,
            max_cities: 24,
        }
    }
}

impl SolverConfig {
    pub fn with_backend(backend: Backend) -> Self {
        SolverConfig {
            backend,
            ..Default::default()
        }
    }

    /// Read a JSON configuration; missing fields keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Configured limit, clamped to what the engines can index
    pub fn city_limit(&self) -> usize {
        self.max_cities.min(MAX_SUPPORTED_CITIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_solver_config() {
        let config = SolverConfig::default();
        assert_eq!(config.backend, Backend::Reference);
        assert_eq!(config.max_cities, 24);
    }

    #[test]
    fn test_city_limit_is_clamped() {
        let config = SolverConfig { max_cities: 100, ..Default::default() };
        assert_eq!(config.city_limit(), MAX_SUPPORTED_CITIES);
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"backend": "flat-memory"}}"#).unwrap();

        let config = SolverConfig::from_file(file.path()).unwrap();
        assert_eq!(config.backend, Backend::FlatMemory);
        assert_eq!(config.max_cities, 24);
    }
}
