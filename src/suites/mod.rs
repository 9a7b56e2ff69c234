//! Scenario suites
//!
//! A suite is a fixed, ordered list of scenarios that share one browser
//! session. `run_suite` owns that session and always releases it.

pub mod authentication;
pub mod legacy;
pub mod modules;

use async_trait::async_trait;

use crate::driver::{BrowserDriver, BrowserLauncher};
use crate::error::InteractionError;
use crate::runner::interrupt::Interrupt;
use crate::runner::logger::TestLogger;
use crate::runner::state::ScenarioResults;
use crate::session::Session;
use crate::utils::config::Config;

pub use authentication::AuthenticationSuite;
pub use legacy::LegacySuite;
pub use modules::ModuleSuite;

#[async_trait]
pub trait Suite: Send + Sync {
    /// CLI name, e.g. `authentication`
    fn key(&self) -> &'static str;

    /// Human name used in log lines
    fn title(&self) -> &'static str;

    /// Scenario names in execution order
    fn scenarios(&self) -> &'static [&'static str];

    /// Run every scenario in order, recording each outcome
    async fn run_scenarios(
        &self,
        session: &mut Session<'_>,
        results: &mut ScenarioResults,
    ) -> Result<(), InteractionError>;

    /// Run one scenario by name; `None` when the suite has no such scenario
    async fn run_scenario(&self, name: &str, session: &mut Session<'_>) -> Option<bool>;
}

/// Which suite to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteKind {
    Authentication,
    Modules,
    Legacy,
}

impl SuiteKind {
    pub const ALL: [SuiteKind; 3] = [SuiteKind::Authentication, SuiteKind::Modules, SuiteKind::Legacy];

    /// Look a suite up by its CLI key
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.suite().key() == name)
    }

    pub fn suite(&self) -> &'static dyn Suite {
        match self {
            SuiteKind::Authentication => &AuthenticationSuite,
            SuiteKind::Modules => &ModuleSuite,
            SuiteKind::Legacy => &LegacySuite,
        }
    }

    /// Banner line logged before the suite starts
    pub fn banner(&self) -> &'static str {
        match self {
            SuiteKind::Authentication => "STARTING AUTHENTICATION TESTS",
            SuiteKind::Modules => "STARTING MODULE WORKFLOW TESTS",
            SuiteKind::Legacy => "STARTING LEGACY INTEGRATION TEST",
        }
    }

    /// Key under which results are aggregated in the final summary
    pub fn results_key(&self) -> &'static str {
        match self {
            SuiteKind::Authentication => "authentication",
            SuiteKind::Modules => "modules",
            SuiteKind::Legacy => "legacy_integration",
        }
    }
}

/// Run a whole suite on a fresh browser session.
///
/// An interrupt abandons the remaining scenarios but the session is still
/// closed and the scenarios already recorded are kept.
pub async fn run_suite(
    suite: &dyn Suite,
    launcher: &dyn BrowserLauncher,
    log: &mut TestLogger,
    config: &Config,
    interrupt: &Interrupt,
) -> ScenarioResults {
    log.info(format!("Starting {} Test Suite", suite.title()));
    let mut results = ScenarioResults::new();

    if let Some(driver) = open_session(suite.title(), launcher, log, config).await {
        let outcome = {
            let mut session = Session::new(driver.as_ref(), log, config);
            tokio::select! {
                biased;
                _ = interrupt.triggered() => None,
                outcome = suite.run_scenarios(&mut session, &mut results) => Some(outcome),
            }
        };
        match outcome {
            Some(Ok(())) => {}
            Some(Err(e)) => log.fail(format!("{} test suite failed: {}", suite.title(), e)),
            None => log.warn(format!("{} test suite interrupted", suite.title())),
        }
        close_session(driver, log).await;
    }

    log.info(format!(
        "{} tests completed: {}/{} passed",
        suite.title(),
        results.passed(),
        results.total()
    ));
    results
}

/// Run a single scenario on a fresh browser session
pub async fn run_single(
    suite: &dyn Suite,
    scenario: &str,
    launcher: &dyn BrowserLauncher,
    log: &mut TestLogger,
    config: &Config,
    interrupt: &Interrupt,
) -> Option<bool> {
    let driver = open_session(suite.title(), launcher, log, config).await?;
    let outcome = {
        let mut session = Session::new(driver.as_ref(), log, config);
        tokio::select! {
            biased;
            _ = interrupt.triggered() => None,
            passed = suite.run_scenario(scenario, &mut session) => Some(passed),
        }
    };
    let outcome = outcome.unwrap_or_else(|| {
        log.warn(format!("{} interrupted", scenario));
        Some(false)
    });
    close_session(driver, log).await;
    outcome
}

async fn open_session(
    title: &str,
    launcher: &dyn BrowserLauncher,
    log: &mut TestLogger,
    config: &Config,
) -> Option<Box<dyn BrowserDriver>> {
    match launcher.launch(config).await {
        Ok(driver) => {
            log.info("Browser session started");
            Some(driver)
        }
        Err(e) => {
            log.fail(format!("{} test suite failed: {:#}", title, e));
            None
        }
    }
}

async fn close_session(driver: Box<dyn BrowserDriver>, log: &mut TestLogger) {
    match driver.close().await {
        Ok(()) => log.info("Browser session closed"),
        Err(e) => log.warn(format!("Failed to close browser session: {:#}", e)),
    }
}

/// Turn a scenario body's result into its boolean outcome.
///
/// Timeouts were already logged by the wait that gave up; other faults are
/// logged here as `<what> failed: <error>`, optionally with a screenshot.
pub(crate) async fn conclude<T>(
    session: &mut Session<'_>,
    outcome: Result<T, InteractionError>,
    what: &str,
    screenshot: Option<&str>,
) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(InteractionError::Timeout { .. }) => None,
        Err(e) => {
            session.log.fail(format!("{} failed: {}", what, e));
            if let Some(name) = screenshot {
                session.screenshot(name).await;
            }
            None
        }
    }
}

/// Fill form fields by element id; returns the first id that was missing
pub(crate) async fn fill_by_id(
    session: &mut Session<'_>,
    fields: &[(&'static str, String)],
    stop_on_missing: bool,
) -> Result<Option<&'static str>, InteractionError> {
    for (id, value) in fields {
        match session.find_immediate(&crate::driver::Locator::id(*id)).await {
            Some(field) => session.fill(&field, value).await?,
            None if stop_on_missing => return Ok(Some(*id)),
            None => {}
        }
    }
    Ok(None)
}
