//! Configuration options for the CFR solvers.
//!
//! Both the recursive solver and the FSICFR sweep solver read the same
//! [`SolverConfig`]: the seed of their single random source, how often the
//! diagnostic recursion trace is emitted, and how reports are formatted.

use serde::{Deserialize, Serialize};

/// Configuration for the CFR solvers.
///
/// # Example
/// ```
/// use cfr_practice::cfr::SolverConfig;
///
/// let config = SolverConfig::default().with_seed(1);
/// assert_eq!(config.seed, Some(1));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Random seed for reproducibility.
    ///
    /// Every deal and roll is drawn from one generator seeded with this
    /// value, so two solvers with the same seed and iteration count end up
    /// with identical node statistics. If `None`, the generator is seeded
    /// from system entropy.
    pub seed: Option<u64>,

    /// Emit the recursion trace on the first iteration and then every
    /// `trace_interval` iterations (at `trace` log level).
    ///
    /// Set to `None` to disable the trace entirely.
    pub trace_interval: Option<u64>,

    /// Decimal places used when a report is rendered as text.
    pub report_precision: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            seed: None,
            trace_interval: Some(10_000),
            report_precision: 3,
        }
    }
}

impl SolverConfig {
    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method: set the trace interval (`None` disables tracing).
    pub fn with_trace_interval(mut self, interval: Option<u64>) -> Self {
        self.trace_interval = interval;
        self
    }

    /// Builder method: set report precision.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.report_precision = precision;
        self
    }

    /// Parse and validate a configuration from a JSON string.
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trace_interval == Some(0) {
            return Err(ConfigError::InvalidTraceInterval);
        }
        Ok(())
    }

    /// Whether the recursion trace should be emitted on a 0-based iteration.
    pub(crate) fn traces(&self, iteration: u64) -> bool {
        match self.trace_interval {
            Some(interval) => iteration == 0 || (iteration + 1) % interval == 0,
            None => false,
        }
    }
}

/// Errors that can occur when validating solver or game configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Training was requested with zero iterations.
    InvalidIterations,
    /// The trace interval must be positive.
    InvalidTraceInterval,
    /// A die-based game needs at least two sides.
    InvalidSides(usize),
    /// The configuration could not be parsed.
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidIterations => write!(f, "iteration count must be positive"),
            ConfigError::InvalidTraceInterval => write!(f, "trace interval must be positive"),
            ConfigError::InvalidSides(val) => {
                write!(f, "die must have at least 2 sides, got {}", val)
            }
            ConfigError::Parse(msg) => write!(f, "failed to parse config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Statistics tracked during CFR training.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CFRStats {
    /// Total number of iterations completed.
    pub iterations: u64,

    /// Number of information sets held by the solver.
    pub info_sets: usize,

    /// Total time spent training (in seconds).
    pub elapsed_seconds: f64,

    /// Iterations per second.
    pub iterations_per_second: f64,

    /// Sum of the per-iteration root utilities for the first player.
    pub total_utility: f64,
}

impl CFRStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update iterations per second based on elapsed time.
    pub fn update_rate(&mut self) {
        if self.elapsed_seconds > 0.0 {
            self.iterations_per_second = self.iterations as f64 / self.elapsed_seconds;
        }
    }

    /// Average game value: total root utility divided by iterations.
    pub fn average_game_value(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.total_utility / self.iterations as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_json() {
        let config = SolverConfig::from_json_str(r#"{ "seed": 7, "report_precision": 2 }"#)
            .expect("valid config");
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.report_precision, 2);
        assert_eq!(config.trace_interval, Some(10_000));
    }

    #[test]
    fn test_config_rejects_zero_trace_interval() {
        let err = SolverConfig::from_json_str(r#"{ "trace_interval": 0 }"#).unwrap_err();
        assert_eq!(err, ConfigError::InvalidTraceInterval);

        let err = SolverConfig::from_json_str("{ seed: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_trace_schedule() {
        let config = SolverConfig::default().with_trace_interval(Some(100));
        assert!(config.traces(0));
        assert!(!config.traces(1));
        assert!(config.traces(99));
        assert!(config.traces(199));

        let silent = config.with_trace_interval(None);
        assert!(!silent.traces(0));
    }

    #[test]
    fn test_average_game_value() {
        let mut stats = CFRStats::new();
        assert_eq!(stats.average_game_value(), 0.0);
        stats.iterations = 4;
        stats.total_utility = -1.0;
        assert_eq!(stats.average_game_value(), -0.25);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConfigError::InvalidIterations.to_string(),
            "iteration count must be positive"
        );
        assert_eq!(
            ConfigError::InvalidSides(1).to_string(),
            "die must have at least 2 sides, got 1"
        );
    }
}
