//! Scripted in-memory browser for unit tests
//!
//! Pages are keyed by URL. Each page holds the elements that exist on it;
//! clicking an element can navigate elsewhere or reveal more elements.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::driver::traits::{BrowserDriver, BrowserLauncher, Locator};
use crate::utils::config::Config;

#[derive(Debug, Clone)]
pub struct FakeElement {
    pub clickable: bool,
    pub text: String,
    pub checked: bool,
    pub count: usize,
}

impl Default for FakeElement {
    fn default() -> Self {
        Self {
            clickable: true,
            text: String::new(),
            checked: false,
            count: 1,
        }
    }
}

/// What happens when an element is clicked
#[derive(Debug, Clone)]
pub enum Effect {
    Navigate(String),
    Reveal(Locator, FakeElement),
}

#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub elements: HashMap<Locator, FakeElement>,
    pub source: String,
    pub title: String,
}

#[derive(Debug, Clone, Default)]
struct Script {
    pages: HashMap<String, FakePage>,
    effects: HashMap<Locator, Vec<Effect>>,
    broken: Vec<Locator>,
    fail_screenshots: bool,
}

#[derive(Debug, Default)]
struct State {
    url: String,
    page: FakePage,
    visited: Vec<String>,
    clicks: Vec<Locator>,
    fills: Vec<(Locator, String)>,
    screenshots: Vec<PathBuf>,
}

/// In-memory `BrowserDriver`
#[derive(Clone, Default)]
pub struct FakeBrowser {
    script: Arc<Script>,
    state: Arc<Mutex<State>>,
    closes: Arc<AtomicUsize>,
}

/// Builder for [`FakeBrowser`] scripts
#[derive(Default)]
pub struct FakeScript {
    script: Script,
}

impl FakeScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a page with clickable elements
    pub fn page(mut self, url: &str, elements: &[Locator]) -> Self {
        let page = self.script.pages.entry(url.to_string()).or_default();
        for locator in elements {
            page.elements.insert(locator.clone(), FakeElement::default());
        }
        self
    }

    /// Add or replace one element on a page
    pub fn element(mut self, url: &str, locator: Locator, element: FakeElement) -> Self {
        self.script
            .pages
            .entry(url.to_string())
            .or_default()
            .elements
            .insert(locator, element);
        self
    }

    pub fn text(self, url: &str, locator: Locator, text: &str) -> Self {
        self.element(
            url,
            locator,
            FakeElement {
                text: text.to_string(),
                ..FakeElement::default()
            },
        )
    }

    pub fn source(mut self, url: &str, source: &str) -> Self {
        self.script.pages.entry(url.to_string()).or_default().source = source.to_string();
        self
    }

    pub fn on_click(mut self, locator: Locator, effect: Effect) -> Self {
        self.script.effects.entry(locator).or_default().push(effect);
        self
    }

    /// Every driver call touching `locator` fails
    pub fn broken(mut self, locator: Locator) -> Self {
        self.script.broken.push(locator);
        self
    }

    pub fn failing_screenshots(mut self) -> Self {
        self.script.fail_screenshots = true;
        self
    }

    pub fn build(self) -> FakeBrowser {
        FakeBrowser {
            script: Arc::new(self.script),
            ..FakeBrowser::default()
        }
    }
}

impl FakeBrowser {
    fn fresh_session(&self) -> FakeBrowser {
        FakeBrowser {
            script: self.script.clone(),
            state: Arc::new(Mutex::new(State::default())),
            closes: self.closes.clone(),
        }
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn visited(&self) -> Vec<String> {
        self.lock().visited.clone()
    }

    pub fn clicks(&self) -> Vec<Locator> {
        self.lock().clicks.clone()
    }

    pub fn fills(&self) -> Vec<(Locator, String)> {
        self.lock().fills.clone()
    }

    pub fn screenshots(&self) -> Vec<PathBuf> {
        self.lock().screenshots.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_broken(&self, locator: &Locator) -> Result<()> {
        if self.script.broken.contains(locator) {
            bail!("scripted failure for {}", locator);
        }
        Ok(())
    }

    fn load(&self, state: &mut State, url: &str) {
        state.url = url.to_string();
        state.page = self.script.pages.get(url).cloned().unwrap_or_default();
        state.visited.push(url.to_string());
    }

    fn with_element<T>(&self, locator: &Locator, f: impl FnOnce(&FakeElement) -> T) -> Result<T> {
        self.check_broken(locator)?;
        let state = self.lock();
        match state.page.elements.get(locator) {
            Some(el) => Ok(f(el)),
            None => bail!("Element not found: {}", locator),
        }
    }
}

#[async_trait]
impl BrowserDriver for FakeBrowser {
    async fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.lock();
        self.load(&mut state, url);
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.lock().url.clone())
    }

    async fn reload(&self) -> Result<()> {
        let mut state = self.lock();
        let url = state.url.clone();
        self.load(&mut state, &url);
        Ok(())
    }

    async fn page_source(&self) -> Result<String> {
        Ok(self.lock().page.source.clone())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.lock().page.title.clone())
    }

    async fn exists(&self, locator: &Locator) -> Result<bool> {
        self.check_broken(locator)?;
        Ok(self.lock().page.elements.contains_key(locator))
    }

    async fn is_clickable(&self, locator: &Locator) -> Result<bool> {
        self.check_broken(locator)?;
        Ok(self
            .lock()
            .page
            .elements
            .get(locator)
            .map(|el| el.clickable)
            .unwrap_or(false))
    }

    async fn count(&self, locator: &Locator) -> Result<usize> {
        self.check_broken(locator)?;
        Ok(self
            .lock()
            .page
            .elements
            .get(locator)
            .map(|el| el.count)
            .unwrap_or(0))
    }

    async fn text(&self, locator: &Locator) -> Result<String> {
        self.with_element(locator, |el| el.text.clone())
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        self.with_element(locator, |_| ())?;
        let mut state = self.lock();
        state.clicks.push(locator.clone());
        for effect in self.script.effects.get(locator).into_iter().flatten() {
            match effect {
                Effect::Navigate(url) => self.load(&mut state, url),
                Effect::Reveal(target, element) => {
                    state.page.elements.insert(target.clone(), element.clone());
                }
            }
        }
        Ok(())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> Result<()> {
        self.with_element(locator, |_| ())?;
        let mut state = self.lock();
        if let Some(el) = state.page.elements.get_mut(locator) {
            el.text = value.to_string();
        }
        state.fills.push((locator.clone(), value.to_string()));
        Ok(())
    }

    async fn is_checked(&self, locator: &Locator) -> Result<bool> {
        self.with_element(locator, |el| el.checked)
    }

    async fn scroll_into_view(&self, locator: &Locator) -> Result<()> {
        self.with_element(locator, |_| ())
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        if self.script.fail_screenshots {
            bail!("screenshot unavailable");
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, b"\x89PNG")?;
        self.lock().screenshots.push(path.to_path_buf());
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out fresh sessions of one scripted browser
#[derive(Clone)]
pub struct FakeLauncher {
    template: FakeBrowser,
    launches: Arc<AtomicUsize>,
    fail: bool,
}

impl FakeLauncher {
    pub fn new(template: FakeBrowser) -> Self {
        Self {
            template,
            launches: Arc::new(AtomicUsize::new(0)),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(FakeBrowser::default())
        }
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.template.close_count()
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self, _config: &Config) -> Result<Box<dyn BrowserDriver>> {
        if self.fail {
            bail!("browser binary not found");
        }
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.template.fresh_session()))
    }
}
