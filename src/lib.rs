pub mod app;
pub mod data;
pub mod driver;
pub mod error;
pub mod report;
pub mod runner;
pub mod session;
pub mod suites;
pub mod utils;

// Re-export common items
pub use driver::{BrowserDriver, BrowserLauncher, Locator};
pub use error::{ConfigError, InteractionError, ReportError};
pub use runner::{Interrupt, Selection, TestLogger, TestRunner};
pub use utils::config::Config;
