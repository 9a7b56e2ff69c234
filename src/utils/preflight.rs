//! Reachability probe run before the first suite

use std::time::Duration;

use crate::runner::logger::TestLogger;

/// GET `base_url` once and log whether the application answered.
///
/// Never aborts the run: an unreachable application only produces a WARN,
/// and the suites report their own failures.
pub async fn check_reachable(base_url: &str, timeout: Duration, log: &mut TestLogger) -> bool {
    let client = match reqwest::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            log::warn!("could not build HTTP client: {}", e);
            log.warn(format!("Skipping reachability check for {}", base_url));
            return false;
        }
    };

    match client.get(base_url).send().await {
        Ok(resp) => {
            log.info(format!(
                "Application reachable at {} (HTTP {})",
                base_url,
                resp.status().as_u16()
            ));
            true
        }
        Err(e) => {
            log::debug!("preflight request failed: {:?}", e);
            log.warn(format!("Application not reachable at {}: {}", base_url, e));
            false
        }
    }
}
