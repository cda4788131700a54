use async_trait::async_trait;
use dirprobe_common::{DriverError, ElementHandle, Locator, NavigationResult, PageState};

/// Element lookups and interactions. The Resolver only needs this half.
#[async_trait]
pub trait ElementQuery: Send + Sync {
    /// Every element matching `locator`, searched within `scope` or the
    /// whole document. An empty vector is a normal "no match".
    async fn find_all(
        &mut self,
        scope: Option<ElementHandle>,
        locator: &Locator,
    ) -> Result<Vec<ElementHandle>, DriverError>;

    async fn click(&mut self, element: ElementHandle) -> Result<(), DriverError>;

    async fn send_keys(&mut self, element: ElementHandle, text: &str) -> Result<(), DriverError>;

    async fn clear(&mut self, element: ElementHandle) -> Result<(), DriverError>;

    async fn text(&mut self, element: ElementHandle) -> Result<String, DriverError>;

    async fn attribute(
        &mut self,
        element: ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError>;

    async fn is_displayed(&mut self, element: ElementHandle) -> Result<bool, DriverError>;

    async fn is_enabled(&mut self, element: ElementHandle) -> Result<bool, DriverError>;
}

/// A single browser session, exclusively owned by one scenario.
#[async_trait]
pub trait Session: ElementQuery {
    /// Open the browser (maximized where the backend supports it).
    async fn launch(&mut self) -> Result<(), DriverError>;

    /// Dispose of the browser. Must be safe to call on a session that
    /// never launched.
    async fn close(&mut self) -> Result<(), DriverError>;

    async fn is_ready(&self) -> bool;

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, DriverError>;

    async fn current_url(&mut self) -> Result<String, DriverError>;

    async fn title(&mut self) -> Result<String, DriverError>;

    /// PNG bytes of the current viewport.
    async fn screenshot(&mut self) -> Result<Vec<u8>, DriverError>;

    async fn execute_script(
        &mut self,
        _script: &str,
        _args: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value, DriverError> {
        Err(DriverError::NotSupported("execute_script".into()))
    }

    /// Visible text of the whole body.
    async fn body_text(&mut self) -> Result<String, DriverError> {
        let body = self.find_all(None, &Locator::tag_name("body")).await?;
        match body.first() {
            Some(el) => self.text(*el).await,
            None => Ok(String::new()),
        }
    }

    /// URL and body text captured together, for the classifier.
    async fn page_state(&mut self) -> Result<PageState, DriverError> {
        let url = self.current_url().await?;
        let body_text = self.body_text().await?;
        Ok(PageState { url, body_text })
    }
}
