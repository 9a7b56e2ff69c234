//! Bounded element waits and page actions
//!
//! Waits log a FAIL entry when they give up and hand the caller an
//! `InteractionError`; they never let a driver fault escape as a panic.

use chrono::Local;
use std::path::PathBuf;
use std::time::Duration;

use super::{Element, Session};
use crate::app;
use crate::driver::common::{poll_for, wait_until, PollConfig};
use crate::driver::Locator;
use crate::error::InteractionError;

impl<'a> Session<'a> {
    /// Wait until at least one element matches
    pub async fn wait_for_presence(
        &mut self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> Result<Element, InteractionError> {
        let timeout = timeout.unwrap_or_else(|| self.timeout());
        let driver = self.driver;

        let found = wait_until(
            || async move {
                driver.exists(locator).await.unwrap_or_else(|e| {
                    log::debug!("presence check for {} failed: {:#}", locator, e);
                    false
                })
            },
            PollConfig::with_timeout(timeout),
        )
        .await;

        if found {
            Ok(Element::new(locator.clone()))
        } else {
            let err = InteractionError::Timeout {
                locator: locator.to_string(),
                timeout,
            };
            self.log
                .fail(format!("Element not found: {} - {}", locator, err));
            Err(err)
        }
    }

    /// Wait until the first match is visible and enabled
    pub async fn wait_for_clickable(
        &mut self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> Result<Element, InteractionError> {
        let timeout = timeout.unwrap_or_else(|| self.timeout());
        let driver = self.driver;

        let ready = wait_until(
            || async move {
                driver.is_clickable(locator).await.unwrap_or_else(|e| {
                    log::debug!("clickable check for {} failed: {:#}", locator, e);
                    false
                })
            },
            PollConfig::with_timeout(timeout),
        )
        .await;

        if ready {
            Ok(Element::new(locator.clone()))
        } else {
            let err = InteractionError::Timeout {
                locator: locator.to_string(),
                timeout,
            };
            self.log
                .fail(format!("Element not clickable: {} - {}", locator, err));
            Err(err)
        }
    }

    /// Silent variant of [`Self::wait_for_presence`] for optional markers
    pub async fn appears(&self, locator: &Locator, timeout: Duration) -> bool {
        let driver = self.driver;
        wait_until(
            || async move { driver.exists(locator).await.unwrap_or(false) },
            PollConfig::with_timeout(timeout),
        )
        .await
    }

    /// Single lookup, no waiting and no logging
    pub async fn find_immediate(&self, locator: &Locator) -> Option<Element> {
        match self.driver.exists(locator).await {
            Ok(true) => Some(Element::new(locator.clone())),
            Ok(false) => None,
            Err(e) => {
                log::debug!("lookup of {} failed: {:#}", locator, e);
                None
            }
        }
    }

    /// Best effort; a failure is only a warning
    pub async fn scroll_into_view(&mut self, element: &Element) {
        if let Err(e) = self.driver.scroll_into_view(element.locator()).await {
            self.log
                .warn(format!("Failed to scroll to element: {:#}", e));
        }
    }

    /// Wait for a toast notification, optionally one containing `expected`
    pub async fn wait_for_toast(
        &mut self,
        expected: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<String, InteractionError> {
        let timeout = timeout.unwrap_or_else(|| self.timeout());
        let driver = self.driver;
        let container = app::toast_container();
        let target = match expected {
            Some(message) => app::text(message),
            None => container.clone(),
        };

        let text = poll_for(
            || {
                let container = &container;
                let target = &target;
                async move {
                    if !driver.exists(container).await.unwrap_or(false) {
                        return None;
                    }
                    match driver.text(target).await {
                        Ok(text) => Some(text),
                        Err(e) => {
                            log::trace!("toast text not readable yet: {:#}", e);
                            None
                        }
                    }
                }
            },
            PollConfig::with_timeout(timeout),
        )
        .await;

        text.ok_or_else(|| {
            let err = InteractionError::Timeout {
                locator: target.to_string(),
                timeout,
            };
            self.log
                .fail(format!("Toast message not found: {}", err));
            err
        })
    }

    /// Save `screenshots/{name}_{YYYYMMDD_HHMMSS}.png`
    pub async fn screenshot(&mut self, name: &str) -> Option<PathBuf> {
        let filename = format!("{}_{}.png", name, Local::now().format("%Y%m%d_%H%M%S"));
        let path = self.config.screenshots_dir.join(&filename);

        let result = match std::fs::create_dir_all(&self.config.screenshots_dir) {
            Ok(()) => self.driver.screenshot(&path).await,
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(()) => {
                self.log.info(format!("Screenshot saved: {}", filename));
                Some(path)
            }
            Err(e) => {
                self.log
                    .fail(format!("Failed to take screenshot: {:#}", e));
                None
            }
        }
    }

    pub async fn click(&self, element: &Element) -> Result<(), InteractionError> {
        Ok(self.driver.click(element.locator()).await?)
    }

    /// Clear the field and type `value`
    pub async fn fill(&self, element: &Element, value: &str) -> Result<(), InteractionError> {
        Ok(self.driver.fill(element.locator(), value).await?)
    }

    pub async fn text(&self, element: &Element) -> Result<String, InteractionError> {
        Ok(self.driver.text(element.locator()).await?)
    }

    pub async fn is_checked(&self, element: &Element) -> Result<bool, InteractionError> {
        Ok(self.driver.is_checked(element.locator()).await?)
    }

    pub async fn count(&self, locator: &Locator) -> Result<usize, InteractionError> {
        Ok(self.driver.count(locator).await?)
    }

    pub async fn current_url(&self) -> Result<String, InteractionError> {
        Ok(self.driver.current_url().await?)
    }

    pub async fn reload(&self) -> Result<(), InteractionError> {
        Ok(self.driver.reload().await?)
    }

    pub async fn page_source(&self) -> Result<String, InteractionError> {
        Ok(self.driver.page_source().await?)
    }

    pub async fn title(&self) -> Result<String, InteractionError> {
        Ok(self.driver.title().await?)
    }

    /// Poll the URL until `predicate` holds or `timeout` passes
    pub async fn wait_for_url<P>(&self, predicate: P, timeout: Duration) -> bool
    where
        P: Fn(&str) -> bool,
    {
        let driver = self.driver;
        let predicate = &predicate;
        wait_until(
            || async move {
                match driver.current_url().await {
                    Ok(url) => predicate(&url.to_lowercase()),
                    Err(_) => false,
                }
            },
            PollConfig::with_timeout(timeout),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::fake::{Effect, FakeElement, FakeScript};
    use crate::driver::BrowserDriver;
    use crate::runner::logger::TestLogger;
    use crate::runner::state::Category;
    use crate::session::testing::{fast_config, url};

    #[tokio::test]
    async fn test_presence_timeout_logs_fail() {
        let dir = tempfile::tempdir().unwrap();
        let config = fast_config(dir.path());
        let browser = FakeScript::new().page(&url("/login"), &[]).build();
        browser.goto(&url("/login")).await.unwrap();
        let mut log = TestLogger::new("t", dir.path()).quiet();
        let mut s = Session::new(&browser, &mut log, &config);

        let err = s
            .wait_for_presence(&Locator::id("email"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, InteractionError::Timeout { .. }));
        assert_eq!(log.count(Category::Fail), 1);
        assert!(log.entries()[0].message.starts_with("Element not found: id=email"));
    }

    #[tokio::test]
    async fn test_clickable_waits_for_revealed_element() {
        let dir = tempfile::tempdir().unwrap();
        let config = fast_config(dir.path());
        let hidden = FakeElement {
            clickable: false,
            ..FakeElement::default()
        };
        let browser = FakeScript::new()
            .element(&url("/"), Locator::id("go"), hidden)
            .build();
        browser.goto(&url("/")).await.unwrap();
        let mut log = TestLogger::new("t", dir.path()).quiet();
        let mut s = Session::new(&browser, &mut log, &config);

        assert!(s.find_immediate(&Locator::id("go")).await.is_some());
        assert!(s.wait_for_clickable(&Locator::id("go"), None).await.is_err());
        assert!(log.entries()[0].message.starts_with("Element not clickable"));
    }

    #[tokio::test]
    async fn test_toast_with_expected_text() {
        let dir = tempfile::tempdir().unwrap();
        let config = fast_config(dir.path());
        let browser = FakeScript::new()
            .page(&url("/forgot"), &[app::toast_container()])
            .text(
                &url("/forgot"),
                app::text("Código de recuperación enviado"),
                "Código de recuperación enviado a tu correo",
            )
            .build();
        browser.goto(&url("/forgot")).await.unwrap();
        let mut log = TestLogger::new("t", dir.path()).quiet();
        let mut s = Session::new(&browser, &mut log, &config);

        let text = s
            .wait_for_toast(Some("Código de recuperación enviado"), None)
            .await
            .unwrap();
        assert!(text.contains("a tu correo"));

        let missing = s.wait_for_toast(Some("Perfil actualizado"), None).await;
        assert!(missing.is_err());
        assert_eq!(log.count(Category::Fail), 1);
    }

    #[tokio::test]
    async fn test_scroll_failure_is_warning() {
        let dir = tempfile::tempdir().unwrap();
        let config = fast_config(dir.path());
        let target = Locator::id("card");
        let browser = FakeScript::new()
            .page(&url("/"), &[target.clone()])
            .broken(target.clone())
            .build();
        browser.goto(&url("/")).await.unwrap();
        let mut log = TestLogger::new("t", dir.path()).quiet();
        let mut s = Session::new(&browser, &mut log, &config);

        s.scroll_into_view(&Element::new(target)).await;
        assert_eq!(log.count(Category::Warn), 1);
        assert_eq!(log.count(Category::Fail), 0);
    }

    #[tokio::test]
    async fn test_screenshot_naming_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = fast_config(dir.path());
        let browser = FakeScript::new().build();
        let mut log = TestLogger::new("t", dir.path()).quiet();
        let mut s = Session::new(&browser, &mut log, &config);

        let path = s.screenshot("login_error").await.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("login_error_") && name.ends_with(".png"));
        assert_eq!(name.len(), "login_error_".len() + 15 + 4);
        assert!(path.exists());

        let broken = FakeScript::new().failing_screenshots().build();
        let mut s = Session::new(&broken, &mut log, &config);
        assert!(s.screenshot("x").await.is_none());
        assert_eq!(log.count(Category::Fail), 1);
    }

    #[tokio::test]
    async fn test_wait_for_url_after_click() {
        let dir = tempfile::tempdir().unwrap();
        let config = fast_config(dir.path());
        let submit = Locator::id("submit");
        let browser = FakeScript::new()
            .page(&url("/register"), &[submit.clone()])
            .on_click(submit.clone(), Effect::Navigate(url("/login")))
            .build();
        browser.goto(&url("/register")).await.unwrap();
        let mut log = TestLogger::new("t", dir.path()).quiet();
        let s = Session::new(&browser, &mut log, &config);

        s.click(&Element::new(submit)).await.unwrap();
        assert!(
            s.wait_for_url(|u| u.contains("login"), Duration::from_millis(30))
                .await
        );
    }
}
