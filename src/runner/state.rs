use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Log entry category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Pass,
    Fail,
    Info,
    Warn,
}

impl Category {
    /// Order in which groups appear in the report
    pub const REPORT_ORDER: [Category; 4] =
        [Category::Fail, Category::Pass, Category::Warn, Category::Info];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pass => "PASS",
            Category::Fail => "FAIL",
            Category::Info => "INFO",
            Category::Warn => "WARN",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable line of the test narrative
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub category: Category,
}

impl LogEntry {
    pub fn new(message: impl Into<String>, category: Category) -> Self {
        Self {
            timestamp: Local::now(),
            message: message.into(),
            category,
        }
    }

    /// `YYYY-MM-DD HH:MM:SS`
    pub fn formatted_time(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Aggregate counts for a logging session
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// PASS + FAIL entries
    pub total_tests: usize,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
    pub info: usize,
    /// Percentage of PASS among PASS + FAIL, 0 when there are none
    pub pass_rate: f64,
    #[serde(with = "duration_secs")]
    pub duration: Option<Duration>,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&d.as_secs_f64()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.map(Duration::from_secs_f64))
    }
}

/// Ordered scenario name → outcome map for one suite run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioResults {
    entries: Vec<(String, bool)>,
}

impl ScenarioResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome; a repeated name replaces the earlier one in place
    pub fn record(&mut self, name: impl Into<String>, passed: bool) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = passed,
            None => self.entries.push((name, passed)),
        }
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, passed)| *passed)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), *p))
    }

    pub fn passed(&self) -> usize {
        self.entries.iter().filter(|(_, p)| *p).count()
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn any_passed(&self) -> bool {
        self.entries.iter().any(|(_, p)| *p)
    }
}

/// Narrative grade of an overall pass rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassTier {
    Excellent,
    Good,
    Warning,
    Critical,
}

impl PassTier {
    pub fn from_rate(rate: f64) -> Self {
        if rate >= 90.0 {
            PassTier::Excellent
        } else if rate >= 75.0 {
            PassTier::Good
        } else if rate >= 50.0 {
            PassTier::Warning
        } else {
            PassTier::Critical
        }
    }

    /// A run with nothing recorded is critical
    pub fn from_counts(passed: usize, total: usize) -> Self {
        if total == 0 {
            return PassTier::Critical;
        }
        Self::from_rate(passed as f64 / total as f64 * 100.0)
    }

    pub fn category(&self) -> Category {
        match self {
            PassTier::Excellent | PassTier::Good => Category::Pass,
            PassTier::Warning => Category::Warn,
            PassTier::Critical => Category::Fail,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PassTier::Excellent => "🎉 EXCELLENT! Test suite passed with high success rate",
            PassTier::Good => "✅ GOOD! Test suite passed with acceptable success rate",
            PassTier::Warning => "⚠️  WARNING! Test suite has moderate success rate",
            PassTier::Critical => "❌ CRITICAL! Test suite has low success rate",
        }
    }
}

pub fn pass_rate(passed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64 * 100.0
    }
}
