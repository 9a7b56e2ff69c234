pub mod common;
#[cfg(test)]
pub mod fake;
pub mod traits;
pub mod web;

pub use traits::{BrowserDriver, BrowserLauncher, Locator};
