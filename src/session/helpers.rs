//! Composite steps shared by the suites: navigation, login, logout.

use super::{Element, Session};
use crate::app::{self, messages, paths};
use crate::driver::Locator;
use crate::error::InteractionError;

impl<'a> Session<'a> {
    /// Open `base_url + path` and let the page settle
    pub async fn navigate(&mut self, path: &str) -> Result<(), InteractionError> {
        let url = self.config.url_for(path);
        self.driver.goto(&url).await?;
        tokio::time::sleep(self.config.settle_delay).await;
        self.log.info(format!("Navigated to {}", url));
        Ok(())
    }

    /// Log in through the form.
    ///
    /// With `expect_success` the result is whether the dashboard welcome
    /// heading appeared. Without it, the result is whether the browser is
    /// still on the login page once the transition delay has passed.
    pub async fn login(&mut self, email: &str, password: &str, expect_success: bool) -> bool {
        match self.try_login(email, password, expect_success).await {
            Ok(outcome) => outcome,
            Err(InteractionError::Timeout { .. }) => false,
            Err(e) => {
                self.log.fail(format!("Login process failed: {}", e));
                self.screenshot("login_error").await;
                false
            }
        }
    }

    async fn try_login(
        &mut self,
        email: &str,
        password: &str,
        expect_success: bool,
    ) -> Result<bool, InteractionError> {
        self.navigate(paths::LOGIN).await?;

        let email_input = self.wait_for_presence(&app::login::email(), None).await?;
        self.fill(&email_input, email).await?;

        let Some(password_input) = self.find_immediate(&app::login::password()).await else {
            self.log.fail("Password input not found");
            return Ok(false);
        };
        self.fill(&password_input, password).await?;

        let submit = self.wait_for_clickable(&app::login::submit(), None).await?;
        self.click(&submit).await?;

        if expect_success {
            let timeout = self.timeout();
            let reached = self
                .wait_for_presence(&app::dashboard::welcome(), Some(timeout))
                .await
                .is_ok();
            if reached {
                self.log.pass(format!("Login successful for {}", email));
            } else {
                self.log
                    .fail(format!("Login failed for {} - Dashboard not reached", email));
            }
            return Ok(reached);
        }

        tokio::time::sleep(self.config.transition_delay).await;
        let url = self.current_url().await?.to_lowercase();
        if !url.contains("login") {
            self.log
                .fail(format!("Invalid login incorrectly accepted for {}", email));
            return Ok(false);
        }

        self.log
            .pass(format!("Invalid login correctly rejected for {}", email));
        if self
            .find_immediate(&app::text(messages::INVALID_LOGIN))
            .await
            .is_some()
        {
            self.log
                .info(format!("Rejection message shown: {}", messages::INVALID_LOGIN));
        } else {
            self.log
                .warn(format!("No rejection message shown for {}", email));
        }
        Ok(true)
    }

    /// Log out via the profile menu; true once the login page is back
    pub async fn logout(&mut self) -> bool {
        match self.try_logout().await {
            Ok(true) => {
                self.log.pass("Logout successful");
                true
            }
            Ok(false) | Err(InteractionError::Timeout { .. }) => {
                self.log.fail("Logout failed");
                false
            }
            Err(e) => {
                self.log.fail(format!("Logout process failed: {}", e));
                false
            }
        }
    }

    async fn try_logout(&mut self) -> Result<bool, InteractionError> {
        if let Some(menu) = self.find_immediate(&app::session::profile_menu()).await {
            self.click(&menu).await?;
        }

        let logout = self.wait_for_clickable(&app::session::logout(), None).await?;
        self.click(&logout).await?;

        let delay = self.config.transition_delay;
        Ok(self.wait_for_url(|url| url.contains("login"), delay).await)
    }

    /// PASS when `marker` shows up, otherwise FAIL with a screenshot
    pub async fn check_page_load(&mut self, marker: &Locator, page_name: &str) -> bool {
        match self.wait_for_presence(marker, None).await {
            Ok(_) => {
                self.log
                    .pass(format!("{} page loaded successfully", page_name));
                true
            }
            Err(e) => {
                self.log
                    .fail(format!("{} page failed to load: {}", page_name, e));
                self.screenshot(&format!("page_load_fail_{}", page_name))
                    .await;
                false
            }
        }
    }

    /// Click, then wait up to the transition delay for the URL to change.
    /// Returns whether it changed; content-only transitions return false.
    pub async fn click_and_settle(&mut self, element: &Element) -> Result<bool, InteractionError> {
        let before = self.current_url().await?.to_lowercase();
        self.click(element).await?;
        let delay = self.config.transition_delay;
        Ok(self.wait_for_url(|url| url != before, delay).await)
    }

    /// Wait for a clickable element, scroll to it, click and settle
    pub async fn press(&mut self, locator: &Locator) -> Result<bool, InteractionError> {
        let element = self.wait_for_clickable(locator, None).await?;
        self.scroll_into_view(&element).await;
        self.click_and_settle(&element).await
    }
}
