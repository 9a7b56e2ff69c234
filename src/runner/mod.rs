pub mod interrupt;
pub mod logger;
pub mod state;

use std::time::{Duration, Instant};

use crate::driver::BrowserLauncher;
use crate::error::ReportError;
use crate::suites::{self, SuiteKind};
use crate::utils::config::Config;
use crate::utils::preflight;

pub use interrupt::Interrupt;
pub use logger::{ReportId, TestLogger};
pub use state::*;

pub const SUITE_NAME: &str = "RavenCode Frontend Test Suite";

/// What the command line asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// `authentication`, `modules`, `legacy` or `all`
    Suite(String),
    /// One entry of [`NAMED_TESTS`]
    Test(String),
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Scenario(SuiteKind, &'static str),
    WholeSuite(SuiteKind),
}

/// Individually runnable tests, in listing order
const NAMED_TESTS: &[(&str, Target)] = &[
    ("test_login_valid_admin", Target::Scenario(SuiteKind::Authentication, "admin_login")),
    ("test_login_valid_student", Target::Scenario(SuiteKind::Authentication, "student_login")),
    ("test_login_invalid", Target::Scenario(SuiteKind::Authentication, "invalid_password")),
    ("test_login_nonexistent", Target::Scenario(SuiteKind::Authentication, "nonexistent_user")),
    ("test_registration_new", Target::Scenario(SuiteKind::Authentication, "new_user_registration")),
    (
        "test_registration_duplicate",
        Target::Scenario(SuiteKind::Authentication, "duplicate_email_registration"),
    ),
    ("test_forgot_password", Target::Scenario(SuiteKind::Authentication, "forgot_password")),
    ("test_logout", Target::Scenario(SuiteKind::Authentication, "logout")),
    ("test_session_persistence", Target::Scenario(SuiteKind::Authentication, "session_persistence")),
    ("test_module1_workflow", Target::Scenario(SuiteKind::Modules, "module1_workflow")),
    ("test_module2_workflow", Target::Scenario(SuiteKind::Modules, "module2_workflow")),
    ("test_lesson_navigation", Target::Scenario(SuiteKind::Modules, "lesson_navigation")),
    ("test_assessment_load", Target::Scenario(SuiteKind::Modules, "assessment_load")),
    ("test_progress_tracking", Target::Scenario(SuiteKind::Modules, "progress_tracking")),
    ("test_module_accessibility", Target::Scenario(SuiteKind::Modules, "module_accessibility")),
    ("test_legacy_full", Target::WholeSuite(SuiteKind::Legacy)),
];

pub fn named_tests() -> impl Iterator<Item = &'static str> {
    NAMED_TESTS.iter().map(|(name, _)| *name)
}

/// Dispatches suites and named tests and keeps every result for the summary
pub struct TestRunner {
    launcher: Box<dyn BrowserLauncher>,
    config: Config,
    logger: TestLogger,
    results: Vec<(String, ScenarioResults)>,
    interrupt: Interrupt,
    started: Instant,
}

impl TestRunner {
    pub fn new(launcher: Box<dyn BrowserLauncher>, config: Config) -> Self {
        let logger = TestLogger::new(SUITE_NAME, config.reports_dir.clone());
        Self::with_logger(launcher, config, logger)
    }

    pub fn with_logger(launcher: Box<dyn BrowserLauncher>, config: Config, mut logger: TestLogger) -> Self {
        logger.start();
        Self {
            launcher,
            config,
            logger,
            results: Vec::new(),
            interrupt: Interrupt::new(),
            started: Instant::now(),
        }
    }

    pub fn logger(&self) -> &TestLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut TestLogger {
        &mut self.logger
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn results(&self) -> &[(String, ScenarioResults)] {
        &self.results
    }

    /// Handle for stopping the run from outside, e.g. a Ctrl-C handler
    pub fn interrupt(&self) -> Interrupt {
        self.interrupt.clone()
    }

    /// Reachability check, then the selection. False when interrupted.
    pub async fn run(&mut self, selection: &Selection) -> bool {
        let base_url = self.config.base_url.clone();
        let probe_timeout = self.config.implicit_wait;
        let interrupt = self.interrupt.clone();
        tokio::select! {
            biased;
            _ = interrupt.triggered() => {}
            _ = preflight::check_reachable(&base_url, probe_timeout, &mut self.logger) => {}
        }

        if !interrupt.is_triggered() {
            self.execute(selection).await;
        }
        if interrupt.is_triggered() {
            self.logger.warn("Test execution interrupted by user");
            return false;
        }
        true
    }

    /// Run the selection and print the final summary
    pub async fn execute(&mut self, selection: &Selection) {
        match selection {
            Selection::Suite(name) if name == "all" => self.run_all().await,
            Selection::Suite(name) => {
                self.run_suite(name).await;
                self.final_summary();
            }
            Selection::Test(name) => {
                self.run_test(name).await;
                self.final_summary();
            }
        }
    }

    /// Run all suites in order, then the final summary
    pub async fn run_all(&mut self) {
        self.logger
            .info("🚀 STARTING COMPREHENSIVE RAVENCODE FRONTEND TEST SUITE");
        for kind in SuiteKind::ALL {
            if self.interrupt.is_triggered() {
                break;
            }
            self.run_kind(kind).await;
        }
        self.final_summary();
    }

    /// Run one suite by CLI name; `None` for an unknown name
    pub async fn run_suite(&mut self, name: &str) -> Option<&ScenarioResults> {
        let Some(kind) = SuiteKind::from_name(name) else {
            self.logger.fail(format!("Unknown test suite: {}", name));
            let mut available: Vec<&str> = SuiteKind::ALL.iter().map(|k| k.suite().key()).collect();
            available.push("all");
            self.logger
                .info(format!("Available suites: {}", available.join(", ")));
            return None;
        };
        Some(self.run_kind(kind).await)
    }

    async fn run_kind(&mut self, kind: SuiteKind) -> &ScenarioResults {
        let rule = "=".repeat(60);
        self.logger.info(rule.as_str());
        self.logger.info(kind.banner());
        self.logger.info(rule);

        let results = suites::run_suite(
            kind.suite(),
            self.launcher.as_ref(),
            &mut self.logger,
            &self.config,
            &self.interrupt,
        )
        .await;
        self.store(kind.results_key(), results)
    }

    /// Run one named test on its own browser session; `None` if unknown
    pub async fn run_test(&mut self, name: &str) -> Option<bool> {
        self.logger.info(format!("Running specific test: {}", name));

        let Some((_, target)) = NAMED_TESTS.iter().find(|(n, _)| *n == name) else {
            self.logger.fail(format!("Unknown test: {}", name));
            let available: Vec<&str> = named_tests().collect();
            self.logger
                .info(format!("Available tests: {}", available.join(", ")));
            return None;
        };

        match *target {
            Target::WholeSuite(kind) => Some(self.run_kind(kind).await.any_passed()),
            Target::Scenario(kind, scenario) => {
                let passed = suites::run_single(
                    kind.suite(),
                    scenario,
                    self.launcher.as_ref(),
                    &mut self.logger,
                    &self.config,
                    &self.interrupt,
                )
                .await
                .unwrap_or(false);
                let mut results = ScenarioResults::new();
                results.record(scenario, passed);
                self.store(name, results);
                Some(passed)
            }
        }
    }

    fn store(&mut self, key: &str, results: ScenarioResults) -> &ScenarioResults {
        let index = match self.results.iter().position(|(k, _)| k == key) {
            Some(i) => {
                self.results[i].1 = results;
                i
            }
            None => {
                self.results.push((key.to_string(), results));
                self.results.len() - 1
            }
        };
        &self.results[index].1
    }

    /// Per-suite counts, overall pass rate, elapsed time and the tier line
    pub fn final_summary(&mut self) {
        self.log_summary(self.started.elapsed());
    }

    fn log_summary(&mut self, elapsed: Duration) {
        let heavy = "=".repeat(80);
        self.logger.info(heavy.as_str());
        self.logger.info("FINAL TEST SUMMARY");
        self.logger.info(heavy.as_str());

        let mut passed = 0;
        let mut total = 0;
        for (key, results) in &self.results {
            self.logger.info(format!(
                "{}: {}/{} passed",
                key.to_uppercase(),
                results.passed(),
                results.total()
            ));
            passed += results.passed();
            total += results.total();
        }

        self.logger.info("-".repeat(80));
        self.logger.info(format!(
            "OVERALL RESULTS: {}/{} tests passed ({:.1}%)",
            passed,
            total,
            pass_rate(passed, total)
        ));
        self.logger.info(format!(
            "TOTAL EXECUTION TIME: {:.2} seconds",
            elapsed.as_secs_f64()
        ));

        let tier = PassTier::from_counts(passed, total);
        self.logger.add(tier.message(), tier.category());
        self.logger.info(heavy);
    }

    /// True when at least one recorded scenario succeeded
    pub fn any_passed(&self) -> bool {
        self.results.iter().any(|(_, r)| r.any_passed())
    }

    /// End the session and write the report
    pub fn finish(&mut self) -> Result<ReportId, ReportError> {
        self.logger.end();
        self.logger.generate_report()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::fake::{FakeLauncher, FakeScript};
    use crate::session::testing::fast_config;

    fn runner(dir: &std::path::Path, launcher: FakeLauncher) -> TestRunner {
        let config = fast_config(dir);
        let logger = TestLogger::new(SUITE_NAME, config.reports_dir.clone()).quiet();
        TestRunner::with_logger(Box::new(launcher), config, logger)
    }

    fn messages(runner: &TestRunner) -> Vec<String> {
        runner
            .logger()
            .entries()
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_unknown_suite_lists_available() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = FakeLauncher::new(FakeScript::new().build());
        let mut runner = runner(dir.path(), launcher.clone());

        assert!(runner.run_suite("smoke").await.is_none());
        let log = messages(&runner);
        assert!(log.contains(&"Unknown test suite: smoke".to_string()));
        assert!(log.contains(&"Available suites: authentication, modules, legacy, all".to_string()));
        assert_eq!(launcher.launches(), 0);
        assert!(!runner.any_passed());
    }

    #[tokio::test]
    async fn test_unknown_test_lists_available() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = runner(dir.path(), FakeLauncher::new(FakeScript::new().build()));

        assert_eq!(runner.run_test("test_everything").await, None);
        let last = runner.logger().entries().last().unwrap().message.clone();
        assert!(last.starts_with("Available tests: test_login_valid_admin, "));
        assert!(last.ends_with("test_legacy_full"));
    }

    #[tokio::test]
    async fn test_named_test_uses_own_session() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = FakeLauncher::new(FakeScript::new().build());
        let mut runner = runner(dir.path(), launcher.clone());

        // nothing scripted: the login form is missing and the test fails
        assert_eq!(runner.run_test("test_login_valid_admin").await, Some(false));
        assert_eq!(launcher.launches(), 1);
        assert_eq!(launcher.closes(), 1);
        assert_eq!(runner.results()[0].0, "test_login_valid_admin");
        assert_eq!(runner.results()[0].1.get("admin_login"), Some(false));
    }

    #[tokio::test]
    async fn test_launch_failure_still_summarized() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = runner(dir.path(), FakeLauncher::failing());

        runner
            .execute(&Selection::Suite("authentication".to_string()))
            .await;
        let log = messages(&runner);
        assert!(log.iter().any(|m| m.starts_with("Authentication test suite failed:")));
        assert!(log.contains(&"AUTHENTICATION: 0/0 passed".to_string()));
        assert!(log.contains(&"OVERALL RESULTS: 0/0 tests passed (0.0%)".to_string()));
        assert!(log.contains(&"❌ CRITICAL! Test suite has low success rate".to_string()));
        assert!(!runner.any_passed());
    }

    #[tokio::test]
    async fn test_summary_aggregates_suites() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = runner(dir.path(), FakeLauncher::new(FakeScript::new().build()));

        let mut auth = ScenarioResults::new();
        auth.record("admin_login", true);
        auth.record("logout", true);
        let mut modules = ScenarioResults::new();
        modules.record("module1_workflow", false);
        runner.store("authentication", auth);
        runner.store("modules", modules);

        runner.log_summary(Duration::from_millis(1500));
        let log = messages(&runner);
        assert!(log.contains(&"MODULES: 0/1 passed".to_string()));
        assert!(log.contains(&"OVERALL RESULTS: 2/3 tests passed (66.7%)".to_string()));
        assert!(log.contains(&"TOTAL EXECUTION TIME: 1.50 seconds".to_string()));
        assert!(runner.any_passed());
        assert_eq!(
            runner.logger().count(Category::Warn),
            1,
            "66.7% falls in the warning tier"
        );
    }

    #[tokio::test]
    async fn test_interrupt_stops_run_and_releases_session() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            default_timeout: Duration::from_secs(30),
            implicit_wait: Duration::from_secs(30),
            page_load_timeout: Duration::from_secs(30),
            ..fast_config(dir.path())
        };
        let launcher = FakeLauncher::new(FakeScript::new().build());
        let logger = TestLogger::new(SUITE_NAME, config.reports_dir.clone()).quiet();
        let mut runner = TestRunner::with_logger(Box::new(launcher.clone()), config, logger);

        let interrupt = runner.interrupt();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            interrupt.trigger();
        });
        tokio::time::timeout(
            Duration::from_secs(10),
            runner.execute(&Selection::Suite("all".to_string())),
        )
        .await
        .unwrap();

        assert_eq!(launcher.launches(), 1);
        assert_eq!(launcher.closes(), 1);
        let keys: Vec<&str> = runner.results().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["authentication"]);
        let log = messages(&runner);
        assert!(log.contains(&"Authentication test suite interrupted".to_string()));
        assert!(log.contains(&"FINAL TEST SUMMARY".to_string()));
    }

    #[tokio::test]
    async fn test_interrupt_before_start_skips_everything() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = FakeLauncher::new(FakeScript::new().build());
        let mut runner = runner(dir.path(), launcher.clone());

        runner.interrupt().trigger();
        assert!(!runner.run(&Selection::Suite("all".to_string())).await);
        assert_eq!(launcher.launches(), 0);
        let last = runner.logger().entries().last().unwrap();
        assert_eq!(last.category, Category::Warn);
        assert_eq!(last.message, "Test execution interrupted by user");
        assert!(runner.finish().is_ok());
    }

    #[tokio::test]
    async fn test_finish_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = runner(dir.path(), FakeLauncher::new(FakeScript::new().build()));

        let id = runner.finish().unwrap();
        assert!(dir.path().join("reports").join(id.file_name()).exists());
    }
}
