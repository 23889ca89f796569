//! Strategy reports produced after training.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Average strategy of one information set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyLine {
    /// Information set key (or grid coordinates for the sweep tables).
    pub key: String,
    /// Average probability of each action.
    pub strategy: Vec<f64>,
}

/// A table of average strategies, optionally with the average game value.
///
/// The text form has one `<key>: [<p0>, <p1>, ...]` line per entry, followed
/// by `Average game value: <v>` when a value is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyReport {
    /// Report lines in display order.
    pub lines: Vec<StrategyLine>,
    /// Average game value for the first player, if known.
    pub game_value: Option<f64>,
    /// Decimal places used by the text form.
    #[serde(skip, default = "default_precision")]
    pub precision: usize,
}

fn default_precision() -> usize {
    3
}

impl StrategyReport {
    /// Create a report keeping the lines in the given order.
    pub fn new(lines: Vec<StrategyLine>, precision: usize) -> Self {
        Self {
            lines,
            game_value: None,
            precision,
        }
    }

    /// Create a report with lines sorted by key.
    pub fn sorted(mut lines: Vec<StrategyLine>, precision: usize) -> Self {
        lines.sort_by(|a, b| a.key.cmp(&b.key));
        Self::new(lines, precision)
    }

    /// Attach the average game value.
    pub fn with_game_value(mut self, value: f64) -> Self {
        self.game_value = Some(value);
        self
    }

    /// Look up a line by key.
    pub fn get(&self, key: &str) -> Option<&StrategyLine> {
        self.lines.iter().find(|line| line.key == key)
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for StrategyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = self.precision;
        for line in &self.lines {
            let probs: Vec<String> = line
                .strategy
                .iter()
                .map(|p| format!("{:.*}", precision, p))
                .collect();
            writeln!(f, "{}: [{}]", line.key, probs.join(", "))?;
        }
        if let Some(value) = self.game_value {
            write!(f, "Average game value: {:.*}", precision.max(4), value)?;
        }
        Ok(())
    }
}
