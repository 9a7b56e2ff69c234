use crate::utils::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::path::Path;

/// Element locator for page elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// Select by `id` attribute
    Id(String),
    /// Select by XPath expression
    XPath(String),
    /// Select by a single CSS class name
    Class(String),
    /// Select by raw CSS selector
    Css(String),
    /// Select the n-th (0-based) match of another locator
    Nth(Box<Locator>, usize),
}

impl Locator {
    pub fn id(id: impl Into<String>) -> Self {
        Locator::Id(id.into())
    }

    pub fn xpath(xpath: impl Into<String>) -> Self {
        Locator::XPath(xpath.into())
    }

    pub fn class(class: impl Into<String>) -> Self {
        Locator::Class(class.into())
    }

    pub fn css(css: impl Into<String>) -> Self {
        Locator::Css(css.into())
    }

    /// The `index`-th match of this locator
    pub fn nth(self, index: usize) -> Self {
        Locator::Nth(Box::new(self), index)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(f, "id={}", id),
            Locator::XPath(xpath) => write!(f, "xpath={}", xpath),
            Locator::Class(class) => write!(f, "class={}", class),
            Locator::Css(css) => write!(f, "css={}", css),
            Locator::Nth(inner, index) => write!(f, "{} [{}]", inner, index),
        }
    }
}

/// One live browser page
///
/// Every call operates on the page as it is at that moment; waiting is the
/// caller's job (see `session::interactions`). Lookups for missing elements
/// return `Ok(false)` / `Ok(0)`; `Err` is reserved for driver faults.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigate to an absolute URL
    async fn goto(&self, url: &str) -> Result<()>;

    /// URL currently shown by the page
    async fn current_url(&self) -> Result<String>;

    /// Reload the current page
    async fn reload(&self) -> Result<()>;

    /// Full HTML of the current document
    async fn page_source(&self) -> Result<String>;

    /// Document title
    async fn title(&self) -> Result<String>;

    /// Whether at least one element matches
    async fn exists(&self, locator: &Locator) -> Result<bool>;

    /// Whether the first match is visible and enabled
    async fn is_clickable(&self, locator: &Locator) -> Result<bool>;

    /// Number of matching elements
    async fn count(&self, locator: &Locator) -> Result<usize>;

    /// Visible text (or input value) of the first match
    async fn text(&self, locator: &Locator) -> Result<String>;

    /// Click the first match
    async fn click(&self, locator: &Locator) -> Result<()>;

    /// Replace the value of the first matching input
    async fn fill(&self, locator: &Locator, value: &str) -> Result<()>;

    /// Checked state of the first matching checkbox
    async fn is_checked(&self, locator: &Locator) -> Result<bool>;

    /// Scroll the first match into the viewport
    async fn scroll_into_view(&self, locator: &Locator) -> Result<()>;

    /// Write a PNG of the viewport to `path`
    async fn screenshot(&self, path: &Path) -> Result<()>;

    /// Release the browser session
    async fn close(&self) -> Result<()>;
}

/// Acquires browser sessions
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self, config: &Config) -> Result<Box<dyn BrowserDriver>>;
}
