use dirprobe_engine::config::BrowserKind;
use fantoccini::{Client, ClientBuilder};
use serde_json::{Map, Value, json};

pub struct WebDriverClient {
    pub client: Client,
}

impl WebDriverClient {
    pub async fn connect(
        url: &str,
        capabilities: Map<String, Value>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let client = ClientBuilder::native()
            .capabilities(capabilities)
            .connect(url)
            .await
            .map_err(|e| format!("Failed to connect to WebDriver at {}: {}", url, e))?;

        Ok(Self { client })
    }

    pub async fn close(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.client
            .close()
            .await
            .map_err(|e| format!("Failed to close session: {}", e))?;
        Ok(())
    }
}

/// W3C capabilities for a maximized (or fixed-size headless) browser.
pub fn capabilities(browser: BrowserKind, headless: bool) -> Map<String, Value> {
    let mut caps = Map::new();
    match browser {
        BrowserKind::Chrome => {
            let mut args = vec![
                "--no-sandbox".to_string(),
                "--disable-dev-shm-usage".to_string(),
            ];
            if headless {
                // Headless Chrome ignores --start-maximized.
                args.push("--headless=new".to_string());
                args.push("--disable-gpu".to_string());
                args.push("--window-size=1920,1080".to_string());
            } else {
                args.push("--start-maximized".to_string());
            }
            caps.insert("browserName".to_string(), json!("chrome"));
            caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        }
        BrowserKind::Firefox => {
            let mut args = Vec::new();
            if headless {
                args.push("--headless".to_string());
                args.push("--width=1920".to_string());
                args.push("--height=1080".to_string());
            }
            caps.insert("browserName".to_string(), json!("firefox"));
            caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
        }
    }
    caps
}
