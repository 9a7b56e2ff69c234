use crate::error::ConfigError;
use regex::Regex;
use std::path::PathBuf;
use std::time::Duration;

/// Harness configuration
///
/// Resolved once per run from the environment, then adjusted by CLI flags.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root URL of the application under test (no trailing slash)
    pub base_url: String,

    /// Default bound for element waits
    pub default_timeout: Duration,

    /// Default timeout for driver actions (click, fill)
    pub implicit_wait: Duration,

    /// Navigation timeout
    pub page_load_timeout: Duration,

    /// Run the browser without a window
    pub headless: bool,

    pub window_width: u32,
    pub window_height: u32,

    /// Pause after every navigation
    pub settle_delay: Duration,

    /// Upper bound for a submit or logout to move the page elsewhere
    pub transition_delay: Duration,

    pub screenshots_dir: PathBuf,
    pub reports_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            default_timeout: Duration::from_secs(10),
            implicit_wait: Duration::from_secs(5),
            page_load_timeout: Duration::from_secs(30),
            headless: false,
            window_width: 1920,
            window_height: 1080,
            settle_delay: Duration::from_secs(1),
            transition_delay: Duration::from_secs(2),
            screenshots_dir: PathBuf::from("screenshots"),
            reports_dir: PathBuf::from("reports"),
        }
    }
}

impl Config {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("RAVENCODE_BASE_URL") {
            let url = url.trim().trim_end_matches('/');
            if !url.is_empty() {
                config.base_url = url.to_string();
            }
        }
        if let Some(v) = lookup("TEST_TIMEOUT") {
            config.default_timeout = parse_seconds("TEST_TIMEOUT", &v)?;
        }
        if let Some(v) = lookup("IMPLICIT_WAIT") {
            config.implicit_wait = parse_seconds("IMPLICIT_WAIT", &v)?;
        }
        if let Some(v) = lookup("PAGE_LOAD_TIMEOUT") {
            config.page_load_timeout = parse_seconds("PAGE_LOAD_TIMEOUT", &v)?;
        }
        if let Some(v) = lookup("HEADLESS") {
            config.headless = matches!(v.trim().to_lowercase().as_str(), "true" | "1");
        }
        if let Some(v) = lookup("WINDOW_SIZE") {
            let (w, h) = parse_window_size(&v)?;
            config.window_width = w;
            config.window_height = h;
        }

        Ok(config)
    }

    /// Apply `--headless` and `--timeout` from the command line
    pub fn with_overrides(mut self, headless: bool, timeout_secs: Option<u64>) -> Self {
        if headless {
            self.headless = true;
        }
        if let Some(secs) = timeout_secs {
            self.default_timeout = Duration::from_secs(secs);
        }
        self
    }

    /// Absolute URL for an application path
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }
}

fn parse_seconds(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::InvalidSeconds {
            name,
            value: value.to_string(),
        })
}

/// Parse `WIDTHxHEIGHT` (or the legacy `WIDTH,HEIGHT`)
pub fn parse_window_size(value: &str) -> Result<(u32, u32), ConfigError> {
    let re = Regex::new(r"^\s*(\d+)\s*[xX,]\s*(\d+)\s*$").expect("static regex");
    let caps = re
        .captures(value)
        .ok_or_else(|| ConfigError::InvalidWindowSize(value.to_string()))?;

    let width = caps[1]
        .parse()
        .map_err(|_| ConfigError::InvalidWindowSize(value.to_string()))?;
    let height = caps[2]
        .parse()
        .map_err(|_| ConfigError::InvalidWindowSize(value.to_string()))?;
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.default_timeout, Duration::from_secs(10));
        assert_eq!(config.implicit_wait, Duration::from_secs(5));
        assert_eq!(config.page_load_timeout, Duration::from_secs(30));
        assert!(!config.headless);
        assert_eq!((config.window_width, config.window_height), (1920, 1080));
    }

    #[test]
    fn test_environment_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("RAVENCODE_BASE_URL", "https://staging.ravencode.dev/"),
            ("TEST_TIMEOUT", "25"),
            ("HEADLESS", "True"),
            ("WINDOW_SIZE", "1280x720"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://staging.ravencode.dev");
        assert_eq!(config.default_timeout, Duration::from_secs(25));
        assert!(config.headless);
        assert_eq!((config.window_width, config.window_height), (1280, 720));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("PAGE_LOAD_TIMEOUT", "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidSeconds {
                name: "PAGE_LOAD_TIMEOUT",
                value: "soon".to_string()
            }
        );
    }

    #[test]
    fn test_window_size_formats() {
        assert_eq!(parse_window_size("1920,1080").unwrap(), (1920, 1080));
        assert_eq!(parse_window_size(" 800 X 600 ").unwrap(), (800, 600));
        assert!(parse_window_size("wide").is_err());
    }

    #[test]
    fn test_cli_overrides_and_urls() {
        let config = Config::default().with_overrides(true, Some(3));
        assert!(config.headless);
        assert_eq!(config.default_timeout, Duration::from_secs(3));
        assert_eq!(config.url_for("/login"), "http://localhost:3000/login");
        assert_eq!(config.url_for("https://x.test/a"), "https://x.test/a");
    }
}
