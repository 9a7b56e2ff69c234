//! Login, registration, password recovery and session scenarios

use async_trait::async_trait;

use super::{conclude, fill_by_id, Suite};
use crate::app::{self, messages, paths};
use crate::data::{self, InvalidCredentials, Role};
use crate::error::InteractionError;
use crate::runner::state::ScenarioResults;
use crate::session::Session;

pub struct AuthenticationSuite;

const SCENARIOS: &[&str] = &[
    "admin_login",
    "student_login",
    "invalid_password",
    "nonexistent_user",
    "new_user_registration",
    "duplicate_email_registration",
    "forgot_password",
    "logout",
    "session_persistence",
];

#[async_trait]
impl Suite for AuthenticationSuite {
    fn key(&self) -> &'static str {
        "authentication"
    }

    fn title(&self) -> &'static str {
        "Authentication"
    }

    fn scenarios(&self) -> &'static [&'static str] {
        SCENARIOS
    }

    async fn run_scenarios(
        &self,
        s: &mut Session<'_>,
        results: &mut ScenarioResults,
    ) -> Result<(), InteractionError> {
        results.record("admin_login", admin_login(s).await);
        s.logout().await;

        results.record("student_login", student_login(s).await);
        s.logout().await;

        results.record("invalid_password", invalid_login(s, data::WRONG_PASSWORD).await);
        results.record("nonexistent_user", invalid_login(s, data::NONEXISTENT_USER).await);

        let registered = new_user_registration(s).await;
        results.record("new_user_registration", registered.is_some());

        let duplicate = duplicate_email_registration(s, registered.as_deref()).await;
        results.record("duplicate_email_registration", duplicate);

        results.record("forgot_password", forgot_password(s).await);
        results.record("logout", logout(s).await);
        results.record("session_persistence", session_persistence(s).await);
        Ok(())
    }

    async fn run_scenario(&self, name: &str, s: &mut Session<'_>) -> Option<bool> {
        let passed = match name {
            "admin_login" => admin_login(s).await,
            "student_login" => student_login(s).await,
            "invalid_password" => invalid_login(s, data::WRONG_PASSWORD).await,
            "nonexistent_user" => invalid_login(s, data::NONEXISTENT_USER).await,
            "new_user_registration" => new_user_registration(s).await.is_some(),
            "duplicate_email_registration" => duplicate_email_registration(s, None).await,
            "forgot_password" => forgot_password(s).await,
            "logout" => logout(s).await,
            "session_persistence" => session_persistence(s).await,
            _ => return None,
        };
        Some(passed)
    }
}

async fn admin_login(s: &mut Session<'_>) -> bool {
    s.log.info("Testing valid admin login");
    let admin = data::admin();
    if !s.login(&admin.email, &admin.password, true).await {
        return false;
    }

    let short = s.short_timeout();
    if s.appears(&app::session::admin_role(), short).await {
        s.log.pass("Admin role correctly displayed");
    } else {
        s.log.warn("Admin role not displayed");
    }

    if s.find_immediate(&app::session::admin_link()).await.is_some() {
        s.log.pass("Admin menu access available");
    } else {
        s.log.warn("Admin menu access not found");
    }
    true
}

async fn student_login(s: &mut Session<'_>) -> bool {
    s.log.info("Testing valid student login");
    let student = data::student();
    if !s.login(&student.email, &student.password, true).await {
        return false;
    }

    let short = s.short_timeout();
    if s.appears(&app::session::student_role(), short).await {
        s.log.pass("Student role correctly displayed");
    } else {
        s.log.warn("Student role not displayed");
    }

    if s.find_immediate(&app::session::admin_link()).await.is_none() {
        s.log.pass("Admin access correctly restricted for student");
    } else {
        s.log.fail("Admin access incorrectly available to student");
    }
    true
}

async fn invalid_login(s: &mut Session<'_>, creds: InvalidCredentials) -> bool {
    s.log
        .info(format!("Testing invalid login for {}", creds.email));
    s.login(creds.email, creds.password, false).await
}

/// Registers a fresh student; returns the email on success
async fn new_user_registration(s: &mut Session<'_>) -> Option<String> {
    s.log.info("Testing new user registration");
    let outcome = try_register_new(s).await;
    conclude(s, outcome, "Registration test", Some("registration_error"))
        .await
        .flatten()
}

async fn try_register_new(s: &mut Session<'_>) -> Result<Option<String>, InteractionError> {
    s.navigate(paths::REGISTER).await?;
    if !s.check_page_load(&app::register::heading(), "Registration").await {
        return Ok(None);
    }

    let user = data::generate_user(Role::Student);
    if let Some(missing) = fill_by_id(s, &user.registration_fields(), true).await? {
        s.log
            .fail(format!("Registration field not found: {}", missing));
        return Ok(None);
    }
    accept_terms(s).await?;

    let Ok(submit) = s.wait_for_clickable(&app::register::submit(), None).await else {
        s.log.fail("Register button not found");
        return Ok(None);
    };
    s.scroll_into_view(&submit).await;
    s.click_and_settle(&submit).await?;

    if s.current_url().await?.to_lowercase().contains("login") {
        s.log
            .pass("User registration successful - redirected to login");
        return Ok(Some(user.email));
    }

    let short = s.short_timeout();
    if s.wait_for_toast(Some(messages::REGISTERED), Some(short)).await.is_ok() {
        s.log
            .pass("User registration successful - success message shown");
        return Ok(Some(user.email));
    }

    s.log
        .fail("Registration may have failed - no success indication");
    s.screenshot("registration_fail").await;
    Ok(None)
}

/// Re-registers `existing` (or a known static account) and expects rejection
async fn duplicate_email_registration(s: &mut Session<'_>, existing: Option<&str>) -> bool {
    s.log.info("Testing duplicate email registration");
    let email = existing
        .map(str::to_string)
        .unwrap_or_else(|| data::student().email);
    let outcome = try_register_duplicate(s, &email).await;
    conclude(s, outcome, "Duplicate email test", None)
        .await
        .unwrap_or(false)
}

async fn try_register_duplicate(s: &mut Session<'_>, email: &str) -> Result<bool, InteractionError> {
    s.navigate(paths::REGISTER).await?;
    if !s.check_page_load(&app::register::heading(), "Registration").await {
        return Ok(false);
    }

    let mut user = data::generate_user(Role::Student);
    user.email = email.to_string();
    fill_by_id(s, &user.registration_fields(), false).await?;
    accept_terms(s).await?;

    let Ok(submit) = s.wait_for_clickable(&app::register::submit(), None).await else {
        s.log.fail("Register button not found");
        return Ok(false);
    };
    s.scroll_into_view(&submit).await;
    s.click_and_settle(&submit).await?;

    let short = s.short_timeout();
    if s.wait_for_toast(Some(messages::EMAIL_TAKEN), Some(short)).await.is_ok() {
        s.log.pass("Duplicate email correctly rejected");
        return Ok(true);
    }
    if s.current_url().await?.to_lowercase().contains("register") {
        s.log
            .pass("Duplicate email correctly rejected (stayed on registration page)");
        return Ok(true);
    }

    s.log.fail("Duplicate email incorrectly accepted");
    Ok(false)
}

async fn accept_terms(s: &mut Session<'_>) -> Result<(), InteractionError> {
    if let Some(terms) = s.find_immediate(&app::register::terms()).await {
        if !s.is_checked(&terms).await? {
            s.click(&terms).await?;
        }
    }
    Ok(())
}

async fn forgot_password(s: &mut Session<'_>) -> bool {
    s.log.info("Testing forgot password functionality");
    let outcome = try_forgot_password(s).await;
    conclude(s, outcome, "Forgot password test", None)
        .await
        .unwrap_or(false)
}

async fn try_forgot_password(s: &mut Session<'_>) -> Result<bool, InteractionError> {
    s.navigate(paths::FORGOT_PASSWORD).await?;
    if !s
        .check_page_load(&app::forgot_password::heading(), "Forgot Password")
        .await
    {
        return Ok(false);
    }

    let Ok(email) = s.wait_for_presence(&app::login::email(), None).await else {
        s.log.fail("Email input not found");
        return Ok(false);
    };
    s.fill(&email, &data::student().email).await?;

    let Ok(send) = s.wait_for_clickable(&app::forgot_password::send(), None).await else {
        s.log.fail("Send button not found");
        return Ok(false);
    };
    s.click(&send).await?;

    if s.wait_for_toast(Some(messages::RECOVERY_SENT), None).await.is_ok() {
        s.log.pass("Password recovery request successful");
        Ok(true)
    } else {
        s.log.warn("Password recovery request may have failed");
        Ok(false)
    }
}

async fn logout(s: &mut Session<'_>) -> bool {
    s.log.info("Testing logout functionality");
    let admin = data::admin();
    if !s.login(&admin.email, &admin.password, true).await {
        s.log.fail("Could not login for logout test");
        return false;
    }
    s.logout().await
}

async fn session_persistence(s: &mut Session<'_>) -> bool {
    s.log.info("Testing session persistence");
    let outcome = try_session_persistence(s).await;
    conclude(s, outcome, "Session persistence test", None)
        .await
        .unwrap_or(false)
}

async fn try_session_persistence(s: &mut Session<'_>) -> Result<bool, InteractionError> {
    let admin = data::admin();
    if !s.login(&admin.email, &admin.password, true).await {
        return Ok(false);
    }

    s.reload().await?;
    let timeout = s.timeout();
    if s.appears(&app::dashboard::welcome(), timeout).await {
        s.log.pass("Session correctly persisted after refresh");
        Ok(true)
    } else {
        s.log.fail("Session not persisted after refresh");
        Ok(false)
    }
}
