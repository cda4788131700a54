use crate::driver_process::{self, DriverProcess};
use crate::registry::HandleRegistry;
use crate::webdriver::{self, WebDriverClient};
use async_trait::async_trait;
use dirprobe_engine::config::{BrowserKind, Settings};
use dirprobe_engine::session::{ElementQuery, Session};
use dirprobe_engine::{DriverError, ElementHandle, Locator, NavigationResult, Strategy};
use fantoccini::Locator as WdLocator;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use tracing::{debug, info, warn};

/// Browser session over the W3C WebDriver protocol.
///
/// Elements found through this session are kept in a [`HandleRegistry`]
/// keyed by [`ElementHandle`]. The registry is dropped on navigation and
/// whenever a lookup sees a new URL, so handles from a previous page report
/// as stale.
pub struct WebDriverSession {
    client: Option<WebDriverClient>,
    webdriver_url: Option<String>,
    driver: Option<DriverProcess>,
    browser: BrowserKind,
    headless: bool,
    port: u16,
    elements: HandleRegistry<Element>,
}

impl WebDriverSession {
    /// Launch a local driver for `browser` on `port` when the session starts.
    pub fn new(browser: BrowserKind, headless: bool, port: u16) -> Self {
        Self {
            client: None,
            webdriver_url: None,
            driver: None,
            browser,
            headless,
            port,
            elements: HandleRegistry::default(),
        }
    }

    /// Connect to an already running WebDriver endpoint.
    pub fn with_url(webdriver_url: String, browser: BrowserKind, headless: bool) -> Self {
        Self {
            webdriver_url: Some(webdriver_url),
            ..Self::new(browser, headless, driver_process::DEFAULT_DRIVER_PORT)
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        match &settings.webdriver_url {
            Some(url) => Self::with_url(url.clone(), settings.browser, settings.headless),
            None => Self::new(settings.browser, settings.headless, settings.driver_port),
        }
    }

    fn client(&self) -> Result<&WebDriverClient, DriverError> {
        self.client.as_ref().ok_or(DriverError::NotReady)
    }

    fn element(&self, handle: ElementHandle) -> Result<&Element, DriverError> {
        self.elements
            .get(handle)
            .ok_or_else(|| DriverError::StaleElement(format!("unknown {}", handle)))
    }

    async fn navigation_result(&self) -> Result<NavigationResult, DriverError> {
        let client = self.client()?;
        let title = client.client.title().await.unwrap_or_default();
        let url = client
            .client
            .current_url()
            .await
            .map(|u| u.to_string())
            .unwrap_or_default();

        Ok(NavigationResult {
            url,
            title,
            status: 200,
        })
    }
}

fn wd_locator(locator: &Locator) -> WdLocator<'_> {
    match locator.strategy() {
        Strategy::Css | Strategy::TagName => WdLocator::Css(locator.pattern()),
        Strategy::XPath => WdLocator::XPath(locator.pattern()),
        Strategy::LinkText => WdLocator::LinkText(locator.pattern()),
    }
}

/// Map a WebDriver command error onto the session error kinds the engine
/// distinguishes. The driver's message is the only portable signal.
fn map_error(context: &str, e: CmdError) -> DriverError {
    let message = e.to_string();
    let lower = message.to_lowercase();
    let detail = format!("{}: {}", context, message);
    if lower.contains("stale element") {
        DriverError::StaleElement(detail)
    } else if lower.contains("invalid selector") {
        DriverError::InvalidSelector(detail)
    } else if lower.contains("not interactable") || lower.contains("click intercepted") {
        DriverError::NotInteractable(detail)
    } else if lower.contains("javascript error") {
        DriverError::Script(detail)
    } else {
        DriverError::Other(detail)
    }
}

#[async_trait]
impl ElementQuery for WebDriverSession {
    async fn find_all(
        &mut self,
        scope: Option<ElementHandle>,
        locator: &Locator,
    ) -> Result<Vec<ElementHandle>, DriverError> {
        let found = match scope {
            Some(handle) => self.element(handle)?.find_all(wd_locator(locator)).await,
            None => {
                let url = self.current_url().await?;
                self.elements.track_page(&url);
                self.client()?.client.find_all(wd_locator(locator)).await
            }
        };

        match found {
            Ok(elements) => Ok(elements.into_iter().map(|el| self.elements.insert(el)).collect()),
            Err(e) => {
                let message = e.to_string().to_lowercase();
                if message.contains("no such element") {
                    Ok(Vec::new())
                } else {
                    Err(map_error(&format!("find {}", locator), e))
                }
            }
        }
    }

    async fn click(&mut self, element: ElementHandle) -> Result<(), DriverError> {
        self.element(element)?
            .click()
            .await
            .map_err(|e| map_error("click", e))
    }

    async fn send_keys(&mut self, element: ElementHandle, text: &str) -> Result<(), DriverError> {
        self.element(element)?
            .send_keys(text)
            .await
            .map_err(|e| map_error("send_keys", e))
    }

    async fn clear(&mut self, element: ElementHandle) -> Result<(), DriverError> {
        self.element(element)?
            .clear()
            .await
            .map_err(|e| map_error("clear", e))
    }

    async fn text(&mut self, element: ElementHandle) -> Result<String, DriverError> {
        self.element(element)?
            .text()
            .await
            .map_err(|e| map_error("text", e))
    }

    async fn attribute(
        &mut self,
        element: ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        self.element(element)?
            .attr(name)
            .await
            .map_err(|e| map_error("attribute", e))
    }

    async fn is_displayed(&mut self, element: ElementHandle) -> Result<bool, DriverError> {
        self.element(element)?
            .is_displayed()
            .await
            .map_err(|e| map_error("is_displayed", e))
    }

    async fn is_enabled(&mut self, element: ElementHandle) -> Result<bool, DriverError> {
        self.element(element)?
            .is_enabled()
            .await
            .map_err(|e| map_error("is_enabled", e))
    }
}

#[async_trait]
impl Session for WebDriverSession {
    async fn launch(&mut self) -> Result<(), DriverError> {
        let webdriver_url = if let Some(url) = &self.webdriver_url {
            info!("Connecting to external WebDriver at {}...", url);
            url.clone()
        } else {
            info!(
                "Launching {} on port {}...",
                driver_process::driver_binary_name(self.browser),
                self.port
            );
            let driver = driver_process::launch_driver(self.browser, self.port)
                .await
                .map_err(DriverError::Other)?;
            let url = driver.webdriver_url();
            self.driver = Some(driver);
            url
        };

        let caps = webdriver::capabilities(self.browser, self.headless);
        let client = WebDriverClient::connect(&webdriver_url, caps)
            .await
            .map_err(|e| DriverError::Other(e.to_string()))?;

        if !self.headless
            && let Err(e) = client.client.maximize_window().await
        {
            warn!("Could not maximize window: {}", e);
        }

        self.client = Some(client);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        self.elements.clear();
        let result = match self.client.take() {
            Some(client) => client
                .close()
                .await
                .map_err(|e| DriverError::Other(e.to_string())),
            None => Ok(()),
        };
        // Dropping the process handle stops a driver we launched.
        self.driver = None;
        result
    }

    async fn is_ready(&self) -> bool {
        self.client.is_some()
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, DriverError> {
        info!("Navigating to: {}", url);
        self.client()?
            .client
            .goto(url)
            .await
            .map_err(|e| DriverError::Navigation(e.to_string()))?;
        debug!("Dropping {} element handle(s)", self.elements.len());
        self.elements.clear();

        self.navigation_result().await
    }

    async fn current_url(&mut self) -> Result<String, DriverError> {
        self.client()?
            .client
            .current_url()
            .await
            .map(|u| u.to_string())
            .map_err(|e| map_error("current_url", e))
    }

    async fn title(&mut self) -> Result<String, DriverError> {
        self.client()?
            .client
            .title()
            .await
            .map_err(|e| map_error("title", e))
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, DriverError> {
        self.client()?
            .client
            .screenshot()
            .await
            .map_err(|e| DriverError::Other(format!("Screenshot failed: {}", e)))
    }

    async fn execute_script(
        &mut self,
        script: &str,
        args: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value, DriverError> {
        self.client()?
            .client
            .execute(script, args)
            .await
            .map_err(|e| map_error("execute", e))
    }
}
