use dirprobe_engine::config::BrowserKind;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Standard chromedriver port; geckodriver defaults to 4444.
pub const DEFAULT_DRIVER_PORT: u16 = 9515;

const READY_ATTEMPTS: u32 = 30;
const READY_INTERVAL: Duration = Duration::from_millis(200);

const CHROMEDRIVER_PATHS: &[&str] = &[
    "/usr/bin/chromedriver",
    "/usr/local/bin/chromedriver",
    "/usr/lib/chromium/chromedriver",
    "/usr/lib/chromium-browser/chromedriver",
    "/snap/bin/chromium.chromedriver",
    "/opt/homebrew/bin/chromedriver",
];

const GECKODRIVER_PATHS: &[&str] = &[
    "/usr/bin/geckodriver",
    "/usr/local/bin/geckodriver",
    "/snap/bin/geckodriver",
    "/opt/homebrew/bin/geckodriver",
];

pub fn driver_binary_name(browser: BrowserKind) -> &'static str {
    match browser {
        BrowserKind::Chrome => "chromedriver",
        BrowserKind::Firefox => "geckodriver",
    }
}

pub fn driver_url(port: u16) -> String {
    format!("http://localhost:{}", port)
}

/// Find the WebDriver binary for `browser` on PATH or in common locations.
pub fn find_driver_binary(browser: BrowserKind) -> Option<String> {
    let name = driver_binary_name(browser);

    if let Ok(output) = Command::new("which").arg(name).output()
        && output.status.success()
        && let Ok(path) = String::from_utf8(output.stdout)
    {
        let path = path.trim();
        if !path.is_empty() {
            return Some(path.to_string());
        }
    }

    let candidates = match browser {
        BrowserKind::Chrome => CHROMEDRIVER_PATHS,
        BrowserKind::Firefox => GECKODRIVER_PATHS,
    };
    candidates
        .iter()
        .find(|path| Path::new(path).exists())
        .map(|path| path.to_string())
}

fn port_args(browser: BrowserKind, port: u16) -> Vec<String> {
    match browser {
        BrowserKind::Chrome => vec![format!("--port={}", port)],
        BrowserKind::Firefox => vec!["--port".to_string(), port.to_string()],
    }
}

/// Handle to a running driver process; killed on drop.
pub struct DriverProcess {
    child: Child,
    port: u16,
}

impl DriverProcess {
    pub fn webdriver_url(&self) -> String {
        driver_url(self.port)
    }
}

impl Drop for DriverProcess {
    fn drop(&mut self) {
        info!("Shutting down WebDriver process...");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Spawn the driver for `browser` on `port` and wait for its `/status`
/// endpoint to report ready.
pub async fn launch_driver(browser: BrowserKind, port: u16) -> Result<DriverProcess, String> {
    let name = driver_binary_name(browser);
    let binary = find_driver_binary(browser)
        .ok_or_else(|| format!("{} not found. Install it or set webdriver_url.", name))?;

    info!("Launching {} from: {}", name, binary);
    let child = Command::new(&binary)
        .args(port_args(browser, port))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| format!("Failed to launch {}: {}", name, e))?;
    info!("{} launched with PID: {}", name, child.id());

    // Dropping the handle on any early return kills the child.
    let process = DriverProcess { child, port };

    let url = format!("{}/status", process.webdriver_url());
    let client = reqwest::Client::new();

    for attempt in 1..=READY_ATTEMPTS {
        sleep(READY_INTERVAL).await;

        match client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("{} ready after {} attempts", name, attempt);
                return Ok(process);
            }
            Ok(_) => {
                warn!("{} responded but not ready yet (attempt {})", name, attempt);
            }
            Err(_) => {
                if attempt % 5 == 0 {
                    info!("Waiting for {}... (attempt {})", name, attempt);
                }
            }
        }
    }

    Err(format!("{} did not become ready within timeout", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_url() {
        assert_eq!(driver_url(DEFAULT_DRIVER_PORT), "http://localhost:9515");
    }

    #[test]
    fn test_port_args_per_driver() {
        assert_eq!(port_args(BrowserKind::Chrome, 9600), vec!["--port=9600"]);
        assert_eq!(port_args(BrowserKind::Firefox, 4444), vec!["--port", "4444"]);
    }

    #[test]
    fn test_find_binaries() {
        // Availability depends on the host; only checks lookup does not panic.
        let _ = find_driver_binary(BrowserKind::Chrome);
        let _ = find_driver_binary(BrowserKind::Firefox);
    }
}
