//! Test narrative logger
//!
//! Collects categorized entries for the whole run, echoes each one to the
//! console as it arrives, and renders the final report.

use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::error::ReportError;
use crate::report::{self, html::format_duration, ReportData};
use crate::runner::state::{pass_rate, Category, LogEntry, Summary};

/// Identifier of a generated report (unix seconds at generation time)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportId(pub u64);

impl ReportId {
    pub fn file_name(&self) -> String {
        report::report_file_name(self.0)
    }
}

pub struct TestLogger {
    suite_name: String,
    reports_dir: PathBuf,
    entries: Vec<LogEntry>,
    started_at: Option<(DateTime<Local>, Instant)>,
    ended_at: Option<(DateTime<Local>, Instant)>,
    echo: bool,
}

impl TestLogger {
    pub fn new(suite_name: impl Into<String>, reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            suite_name: suite_name.into(),
            reports_dir: reports_dir.into(),
            entries: Vec::new(),
            started_at: None,
            ended_at: None,
            echo: true,
        }
    }

    /// Keep entries in memory only
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    pub fn start(&mut self) {
        self.started_at = Some((Local::now(), Instant::now()));
        let message = format!("Starting {}", self.suite_name);
        self.info(message);
    }

    pub fn end(&mut self) {
        let now = (Local::now(), Instant::now());
        self.ended_at = Some(now);
        match self.started_at {
            Some((_, started)) => {
                let elapsed = now.1.duration_since(started);
                self.info(format!(
                    "Test session completed in {}",
                    format_duration(elapsed)
                ));
            }
            None => self.info("Test session completed"),
        }
    }

    pub fn add(&mut self, message: impl Into<String>, category: Category) {
        let entry = LogEntry::new(message, category);
        if self.echo {
            echo(&entry);
        }
        self.entries.push(entry);
    }

    pub fn pass(&mut self, message: impl Into<String>) {
        self.add(message, Category::Pass);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.add(message, Category::Fail);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.add(message, Category::Warn);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.add(message, Category::Info);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn count(&self, category: Category) -> usize {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .count()
    }

    pub fn summary(&self) -> Summary {
        let passed = self.count(Category::Pass);
        let failed = self.count(Category::Fail);
        let total_tests = passed + failed;

        Summary {
            total_tests,
            passed,
            failed,
            warnings: self.count(Category::Warn),
            info: self.count(Category::Info),
            pass_rate: pass_rate(passed, total_tests),
            duration: self.duration(),
        }
    }

    fn duration(&self) -> Option<Duration> {
        let (_, started) = self.started_at?;
        let (_, ended) = self.ended_at?;
        Some(ended.duration_since(started))
    }

    /// Render the HTML report into the reports directory
    pub fn generate_report(&mut self) -> Result<ReportId, ReportError> {
        let Some((started_at, _)) = self.started_at else {
            self.fail("Cannot generate report: Test session not started");
            return Err(ReportError::NotStarted);
        };

        let id = ReportId(Utc::now().timestamp().max(0) as u64);
        let data = ReportData {
            suite_name: &self.suite_name,
            started_at,
            ended_at: self.ended_at.map(|(t, _)| t),
            summary: self.summary(),
            entries: &self.entries,
        };

        match report::write_report(&self.reports_dir, id.0, &data) {
            Ok(path) => {
                log::debug!("report written to {}", path.display());
                self.info(format!("HTML report generated: {}", id.file_name()));
                Ok(id)
            }
            Err(e) => {
                self.fail(format!("Failed to generate HTML report: {}", e));
                Err(ReportError::Io(e))
            }
        }
    }
}

fn echo(entry: &LogEntry) {
    let line = format!(
        "[{}] {}: {}",
        entry.formatted_time(),
        entry.category,
        entry.message
    );
    let colored = match entry.category {
        Category::Pass => line.green(),
        Category::Fail => line.red(),
        Category::Warn => line.yellow(),
        Category::Info => line.blue(),
    };
    println!("{}", colored);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_requires_start() {
        let dir = tempfile::tempdir().unwrap();
        let mut logger = TestLogger::new("Suite", dir.path()).quiet();

        let err = logger.generate_report().unwrap_err();
        assert!(matches!(err, ReportError::NotStarted));
        assert_eq!(logger.count(Category::Fail), 1);
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_summary_counts() {
        let mut logger = TestLogger::new("Suite", "unused").quiet();
        logger.start();
        logger.pass("a");
        logger.pass("b");
        logger.pass("c");
        logger.fail("d");
        logger.warn("e");
        logger.end();

        let summary = logger.summary();
        assert_eq!(summary.total_tests, 4);
        assert_eq!(summary.passed, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.info, 2);
        assert!((summary.pass_rate - 75.0).abs() < f64::EPSILON);
        assert!(summary.duration.is_some());
    }

    #[test]
    fn test_generate_report_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let reports = dir.path().join("reports");
        let mut logger = TestLogger::new("RavenCode Frontend Test Suite", &reports).quiet();
        logger.start();
        logger.pass("Admin login successful");
        logger.end();

        let id = logger.generate_report().unwrap();
        let path = reports.join(id.file_name());
        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.contains("Admin login successful"));
        assert!(html.contains("Pass Rate: 100.0%"));

        let last = logger.entries().last().unwrap();
        assert_eq!(last.category, Category::Info);
        assert_eq!(
            last.message,
            format!("HTML report generated: {}", id.file_name())
        );
    }

    #[test]
    fn test_start_and_end_messages() {
        let mut logger = TestLogger::new("Auth", "unused").quiet();
        logger.end();
        logger.start();
        let messages: Vec<_> = logger.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["Test session completed", "Starting Auth"]);
    }
}
