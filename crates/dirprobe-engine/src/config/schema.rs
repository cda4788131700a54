use super::loader::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chrome,
    Firefox,
}

impl FromStr for BrowserKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chrome" | "chromium" => Ok(BrowserKind::Chrome),
            "firefox" => Ok(BrowserKind::Firefox),
            other => Err(format!("Unsupported browser: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Budget for element waits.
    pub element_ms: u64,
    /// Budget for URL-change waits after a submit or click.
    pub navigation_ms: u64,
    pub poll_interval_ms: u64,
    /// Fixed delay used where no readiness predicate exists.
    pub settle_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            element_ms: 10_000,
            navigation_ms: 15_000,
            poll_interval_ms: 250,
            settle_ms: 2_000,
        }
    }
}

impl Timeouts {
    pub fn element(&self) -> Duration {
        Duration::from_millis(self.element_ms)
    }

    pub fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root of the site under test, without a trailing slash.
    pub base_url: String,
    /// External WebDriver endpoint; a local driver is launched when unset.
    pub webdriver_url: Option<String>,
    pub browser: BrowserKind,
    pub headless: bool,
    pub driver_port: u16,
    pub screenshot_dir: PathBuf,
    pub fixture_dir: Option<PathBuf>,
    pub timeouts: Timeouts,
    /// Exit nonzero when any FAIL or ERROR was recorded.
    pub exit_on_failure: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            webdriver_url: None,
            browser: BrowserKind::default(),
            headless: false,
            driver_port: 9515,
            screenshot_dir: PathBuf::from("screenshots"),
            fixture_dir: None,
            timeouts: Timeouts::default(),
            exit_on_failure: true,
        }
    }
}

impl Settings {
    /// Absolute URL for a site path such as `/login`.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.is_empty() {
            base.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Reject settings no run could succeed with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let host = self
            .base_url
            .strip_prefix("http://")
            .or_else(|| self.base_url.strip_prefix("https://"));
        match host {
            Some(rest) if !rest.trim_matches('/').is_empty() => {}
            _ => {
                return Err(ConfigError::Invalid {
                    key: "base_url",
                    reason: format!("'{}' is not an http(s) URL", self.base_url),
                });
            }
        }
        if let Some(url) = &self.webdriver_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Invalid {
                    key: "webdriver_url",
                    reason: format!("'{}' is not an http(s) URL", url),
                });
            }
        } else if self.driver_port == 0 {
            return Err(ConfigError::Invalid {
                key: "driver_port",
                reason: "a local driver needs a nonzero port".to_string(),
            });
        }
        if self.timeouts.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "timeouts.poll_interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
