//! Web Driver implementation using Playwright
//!
//! Drives a single Chromium page for the scenario suites.

use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::Colorize;
use playwright::api::{Browser, BrowserContext, ElementHandle, Page, Viewport};
use playwright::Playwright;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::driver::traits::{BrowserDriver, BrowserLauncher, Locator};
use crate::utils::config::Config;

/// Web Driver configuration
#[derive(Debug, Clone)]
pub struct WebDriverConfig {
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Default timeout for element actions
    pub action_timeout: Duration,
    pub navigation_timeout: Duration,
    /// Explicit browser binary, overrides discovery
    pub executable: Option<PathBuf>,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl WebDriverConfig {
    pub fn from_config(config: &Config) -> Self {
        let executable = std::env::var("PLAYWRIGHT_CHROMIUM_EXECUTABLE_PATH")
            .ok()
            .map(PathBuf::from);

        Self {
            headless: config.headless,
            viewport_width: config.window_width,
            viewport_height: config.window_height,
            action_timeout: config.implicit_wait,
            navigation_timeout: config.page_load_timeout,
            executable,
        }
    }

    fn launch_args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "--no-sandbox",
            "--disable-setuid-sandbox",
            "--disable-dev-shm-usage",
            "--disable-gpu",
            "--ignore-certificate-errors",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        args.push(format!(
            "--window-size={},{}",
            self.viewport_width, self.viewport_height
        ));
        args
    }
}

/// Element target handed to in-page scripts
#[derive(Debug, Serialize)]
struct ScriptTarget {
    kind: &'static str,
    query: String,
    index: usize,
}

/// Resolves a `ScriptTarget` to `el` (or `null`) inside the page
const RESOLVE_TARGET: &str = r#"
    const nodes = [];
    if (target.kind === 'xpath') {
        const snap = document.evaluate(target.query, document, null,
            XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);
        for (let i = 0; i < snap.snapshotLength; i++) nodes.push(snap.snapshotItem(i));
    } else {
        nodes.push(...document.querySelectorAll(target.query));
    }
    const el = nodes[target.index] || null;
"#;

fn target_script(body: &str) -> String {
    format!("target => {{ {} {} }}", RESOLVE_TARGET, body)
}

/// Playwright selector plus match index for a locator
fn resolve_locator(locator: &Locator) -> (String, usize) {
    match locator {
        Locator::Id(id) => (format!("[id=\"{}\"]", id), 0),
        Locator::XPath(xpath) => (format!("xpath={}", xpath), 0),
        Locator::Class(class) => (format!(".{}", class), 0),
        Locator::Css(css) => (css.clone(), 0),
        Locator::Nth(inner, index) => {
            let (selector, base) = resolve_locator(inner);
            (selector, base + index)
        }
    }
}

fn script_target(locator: &Locator) -> ScriptTarget {
    let (selector, index) = resolve_locator(locator);
    match selector.strip_prefix("xpath=") {
        Some(xpath) => ScriptTarget {
            kind: "xpath",
            query: xpath.to_string(),
            index,
        },
        None => ScriptTarget {
            kind: "css",
            query: selector,
            index,
        },
    }
}

/// Web Driver using Playwright
pub struct WebDriver {
    #[allow(dead_code)]
    playwright: Arc<Playwright>,
    browser: Arc<Browser>,
    #[allow(dead_code)]
    context: Arc<BrowserContext>,
    page: Arc<Mutex<Page>>,
}

impl WebDriver {
    /// Launch Chromium and open one page
    pub async fn new(config: WebDriverConfig) -> Result<Self> {
        let playwright = Playwright::initialize()
            .await
            .context("Failed to initialize Playwright")?;

        let chromium = playwright.chromium();
        let browser = launch_chromium_browser(&chromium, &config)
            .await
            .context("Failed to launch Chromium")?;

        let context = browser
            .context_builder()
            .build()
            .await
            .context("Failed to create browser context")?;
        let page = context.new_page().await.context("Failed to open page")?;

        page.set_viewport_size(Viewport {
            width: config.viewport_width as i32,
            height: config.viewport_height as i32,
        })
        .await?;
        page.set_default_timeout(config.action_timeout.as_millis() as u32)
            .await?;
        page.set_default_navigation_timeout(config.navigation_timeout.as_millis() as u32)
            .await?;

        log::debug!(
            "browser ready (headless={}, viewport={}x{})",
            config.headless,
            config.viewport_width,
            config.viewport_height
        );

        Ok(Self {
            playwright: Arc::new(playwright),
            browser: Arc::new(browser),
            context: Arc::new(context),
            page: Arc::new(Mutex::new(page)),
        })
    }

    /// Element handle for the locator, if it matches anything
    async fn element(&self, locator: &Locator) -> Result<Option<ElementHandle>> {
        let page = self.page.lock().await;
        let (selector, index) = resolve_locator(locator);
        if index == 0 {
            return Ok(page.query_selector(&selector).await?);
        }
        let mut elements = page.query_selector_all(&selector).await?;
        if index < elements.len() {
            Ok(Some(elements.swap_remove(index)))
        } else {
            Ok(None)
        }
    }

    async fn require(&self, locator: &Locator) -> Result<ElementHandle> {
        self.element(locator)
            .await?
            .with_context(|| format!("Element not found: {}", locator))
    }

    async fn eval_on_target<T>(&self, locator: &Locator, body: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let page = self.page.lock().await;
        let js = target_script(body);
        let value = page.evaluate::<_, T>(&js, script_target(locator)).await?;
        Ok(value)
    }
}

#[async_trait]
impl BrowserDriver for WebDriver {
    async fn goto(&self, url: &str) -> Result<()> {
        let page = self.page.lock().await;
        page.goto_builder(url)
            .goto()
            .await
            .with_context(|| format!("Failed to navigate to {}", url))?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        // tracked from navigation events, so it is readable mid-navigation
        let page = self.page.lock().await;
        Ok(page.url()?)
    }

    async fn reload(&self) -> Result<()> {
        let url = self.current_url().await?;
        self.goto(&url).await
    }

    async fn page_source(&self) -> Result<String> {
        let page = self.page.lock().await;
        Ok(page.content().await?)
    }

    async fn title(&self) -> Result<String> {
        let page = self.page.lock().await;
        let title: String = page.evaluate("() => document.title", ()).await?;
        Ok(title)
    }

    async fn exists(&self, locator: &Locator) -> Result<bool> {
        Ok(self.element(locator).await?.is_some())
    }

    async fn is_clickable(&self, locator: &Locator) -> Result<bool> {
        self.eval_on_target(
            locator,
            "if (!el || !el.isConnected) return false;
             const style = window.getComputedStyle(el);
             if (style.display === 'none' || style.visibility === 'hidden') return false;
             if (el.disabled || el.getAttribute('aria-disabled') === 'true') return false;
             const rect = el.getBoundingClientRect();
             return rect.width > 0 && rect.height > 0;",
        )
        .await
    }

    async fn count(&self, locator: &Locator) -> Result<usize> {
        let page = self.page.lock().await;
        let (selector, index) = resolve_locator(locator);
        let total = page.query_selector_all(&selector).await?.len();
        Ok(match index {
            0 => total,
            i if i < total => 1,
            _ => 0,
        })
    }

    async fn text(&self, locator: &Locator) -> Result<String> {
        let text: Option<String> = self
            .eval_on_target(
                locator,
                "if (!el) return null; return el.value || el.innerText || el.textContent || '';",
            )
            .await?;
        text.with_context(|| format!("Element not found: {}", locator))
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        let element = self.require(locator).await?;
        element.click_builder().click().await?;
        Ok(())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> Result<()> {
        let element = self.require(locator).await?;
        element.fill_builder(value).fill().await?;
        Ok(())
    }

    async fn is_checked(&self, locator: &Locator) -> Result<bool> {
        let checked: Option<bool> = self
            .eval_on_target(locator, "if (!el) return null; return !!el.checked;")
            .await?;
        checked.with_context(|| format!("Element not found: {}", locator))
    }

    async fn scroll_into_view(&self, locator: &Locator) -> Result<()> {
        let element = self.require(locator).await?;
        element.scroll_into_view_if_needed(None).await?;
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let page = self.page.lock().await;
        page.screenshot_builder()
            .path(path.to_path_buf())
            .screenshot()
            .await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.browser.close().await?;
        log::debug!("browser closed");
        Ok(())
    }
}

/// Launches Playwright-driven Chromium sessions
#[derive(Debug, Default, Clone, Copy)]
pub struct WebLauncher;

#[async_trait]
impl BrowserLauncher for WebLauncher {
    async fn launch(&self, config: &Config) -> Result<Box<dyn BrowserDriver>> {
        let driver = WebDriver::new(WebDriverConfig::from_config(config)).await?;
        Ok(Box::new(driver))
    }
}

/// Launch a new Chromium browser, preferring an installed Chrome
async fn launch_chromium_browser(
    chromium: &playwright::api::BrowserType,
    config: &WebDriverConfig,
) -> Result<playwright::api::Browser> {
    let mut launcher = chromium.launcher();
    launcher = launcher.headless(config.headless);

    let system_path = find_system_browser();

    if let Some(ref path) = config.executable {
        println!("{} Using browser from env: {}", "🌐".blue(), path.display());
        launcher = launcher.executable(path);
    } else if let Some(ref path) = system_path {
        println!(
            "{} Using discovered browser: {}",
            "🌐".blue(),
            path.display()
        );
        launcher = launcher.executable(path);
    } else {
        log::debug!("no system browser found, using Playwright's bundled Chromium");
    }

    let args = config.launch_args();
    launcher = launcher.args(&args);

    Ok(launcher.launch().await?)
}

fn find_system_browser() -> Option<PathBuf> {
    let common_paths = [
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
    ];

    common_paths
        .iter()
        .map(Path::new)
        .find(|p| p.exists())
        .map(Path::to_path_buf)
}
