//! A logged browser session
//!
//! `Session` pairs one live page with the run's logger and configuration.
//! Scenario code only talks to the page through it.

pub mod helpers;
pub mod interactions;

use std::time::Duration;

use crate::driver::{BrowserDriver, Locator};
use crate::runner::logger::TestLogger;
use crate::utils::config::Config;

/// Handle to an element that was present when it was looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    locator: Locator,
}

impl Element {
    pub(crate) fn new(locator: Locator) -> Self {
        Self { locator }
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }
}

pub struct Session<'a> {
    driver: &'a dyn BrowserDriver,
    pub log: &'a mut TestLogger,
    config: &'a Config,
}

impl<'a> Session<'a> {
    pub fn new(driver: &'a dyn BrowserDriver, log: &'a mut TestLogger, config: &'a Config) -> Self {
        Self {
            driver,
            log,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    /// Standard element wait
    pub fn timeout(&self) -> Duration {
        self.config.default_timeout
    }

    /// Wait used for optional markers and toasts
    pub fn short_timeout(&self) -> Duration {
        self.config.implicit_wait
    }

    /// Wait used for content that loads slowly (course catalog)
    pub fn long_timeout(&self) -> Duration {
        self.config.page_load_timeout
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::path::Path;

    /// Configuration with millisecond waits for scripted pages
    pub fn fast_config(dir: &Path) -> Config {
        Config {
            base_url: "http://app.test".to_string(),
            default_timeout: Duration::from_millis(60),
            implicit_wait: Duration::from_millis(30),
            page_load_timeout: Duration::from_millis(60),
            settle_delay: Duration::ZERO,
            transition_delay: Duration::from_millis(30),
            screenshots_dir: dir.join("screenshots"),
            reports_dir: dir.join("reports"),
            ..Config::default()
        }
    }

    pub fn url(path: &str) -> String {
        format!("http://app.test{}", path)
    }
}
