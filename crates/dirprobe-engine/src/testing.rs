//! In-memory [`Session`] for exercising scenarios without a browser.
//!
//! Pages are keyed by absolute URL. Elements match a locator only if it is
//! one of the locators registered on them, so tests state exactly which
//! candidate a page "supports". Navigation and body replacement bump a
//! generation counter and invalidate earlier handles, which is how
//! staleness is simulated.

use crate::session::{ElementQuery, Session};
use async_trait::async_trait;
use dirprobe_common::{DriverError, ElementHandle, Locator, NavigationResult};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Minimal PNG signature; enough for artifact tests.
const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

/// What a click does to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickEffect {
    None,
    Navigate(String),
    /// Replace the body text in place (DOM replacement, same URL).
    ShowText(String),
    /// Apply `effect` once the URL has been read `reads` more times, like
    /// a script-driven submit that lands a moment after the click.
    Deferred { reads: usize, effect: Box<ClickEffect> },
}

/// Decides a click's effect from the values typed on the current page,
/// keyed by element name.
pub type ClickHandler = Arc<dyn Fn(&HashMap<String, String>) -> ClickEffect + Send + Sync>;

#[derive(Clone)]
pub struct MemoryElement {
    name: String,
    locators: Vec<Locator>,
    text: String,
    displayed: bool,
    enabled: bool,
    parent: Option<String>,
    attributes: HashMap<String, String>,
    on_click: Option<ClickHandler>,
}

impl MemoryElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locators: Vec::new(),
            text: String::new(),
            displayed: true,
            enabled: true,
            parent: None,
            attributes: HashMap::new(),
            on_click: None,
        }
    }

    pub fn locator(mut self, locator: Locator) -> Self {
        self.locators.push(locator);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Only found when searching within the element named `parent`.
    pub fn inside(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn on_click<F>(mut self, handler: F) -> Self
    where
        F: Fn(&HashMap<String, String>) -> ClickEffect + Send + Sync + 'static,
    {
        self.on_click = Some(Arc::new(handler));
        self
    }

    /// Click always navigates to `url`.
    pub fn links_to(self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.on_click(move |_| ClickEffect::Navigate(url.clone()))
    }
}

#[derive(Clone)]
pub struct MemoryPage {
    url: String,
    title: String,
    body_text: String,
    elements: Vec<MemoryElement>,
}

impl MemoryPage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            body_text: String::new(),
            elements: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn body(mut self, text: impl Into<String>) -> Self {
        self.body_text = text.into();
        self
    }

    pub fn element(mut self, element: MemoryElement) -> Self {
        self.elements.push(element);
        self
    }
}

#[derive(Default)]
pub struct MemorySession {
    pages: HashMap<String, MemoryPage>,
    current: Option<MemoryPage>,
    launched: bool,
    launches: usize,
    closes: usize,
    generation: u64,
    next_id: u64,
    handles: HashMap<u64, (u64, usize)>,
    form: HashMap<String, String>,
    invalid: HashSet<Locator>,
    forced_stale: usize,
    fail_launch: bool,
    fail_screenshots: bool,
    find_log: Vec<Locator>,
    clicks: Vec<String>,
    visited: Vec<String>,
    pending: Option<(usize, ClickEffect)>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: MemoryPage) -> Self {
        self.pages.insert(page.url.clone(), page);
        self
    }

    /// Queries with this locator fail as an invalid selector.
    pub fn invalid_locator(mut self, locator: Locator) -> Self {
        self.invalid.insert(locator);
        self
    }

    pub fn failing_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    pub fn failing_screenshots(mut self) -> Self {
        self.fail_screenshots = true;
        self
    }

    /// The next `count` element interactions report a stale handle.
    pub fn force_stale(&mut self, count: usize) {
        self.forced_stale = count;
    }

    pub fn launch_count(&self) -> usize {
        self.launches
    }

    pub fn close_count(&self) -> usize {
        self.closes
    }

    /// Every locator queried, in order.
    pub fn find_log(&self) -> &[Locator] {
        &self.find_log
    }

    /// Names of clicked elements, in order.
    pub fn clicks(&self) -> &[String] {
        &self.clicks
    }

    pub fn visited(&self) -> &[String] {
        &self.visited
    }

    /// Value typed into the named element on the current page.
    pub fn typed(&self, name: &str) -> Option<&str> {
        self.form.get(name).map(String::as_str)
    }

    fn load(&mut self, url: &str) {
        let page = self.pages.get(url).cloned().unwrap_or_else(|| {
            MemoryPage::new(url)
                .title("Not Found")
                .body("404 Not Found")
        });
        self.current = Some(page);
        self.visited.push(url.to_string());
        self.form.clear();
        self.pending = None;
        self.generation += 1;
    }

    fn apply(&mut self, effect: ClickEffect) {
        match effect {
            ClickEffect::None => {}
            ClickEffect::Navigate(url) => self.load(&url),
            ClickEffect::ShowText(text) => {
                if let Some(page) = self.current.as_mut() {
                    page.body_text = text;
                }
                self.generation += 1;
            }
            ClickEffect::Deferred { reads, effect } => self.pending = Some((reads, *effect)),
        }
    }

    /// Count one URL read against a deferred click effect.
    fn tick(&mut self) {
        match self.pending.take() {
            Some((0, effect)) => self.apply(effect),
            Some((reads, effect)) => self.pending = Some((reads - 1, effect)),
            None => {}
        }
    }

    fn page_ref(&self) -> Result<&MemoryPage, DriverError> {
        if !self.launched {
            return Err(DriverError::NotReady);
        }
        self.current
            .as_ref()
            .ok_or_else(|| DriverError::Navigation("no page loaded".into()))
    }

    fn element(&mut self, handle: ElementHandle) -> Result<&MemoryElement, DriverError> {
        if self.forced_stale > 0 {
            self.forced_stale -= 1;
            return Err(DriverError::StaleElement(handle.to_string()));
        }
        let (generation, index) = *self
            .handles
            .get(&handle.id())
            .ok_or_else(|| DriverError::StaleElement(handle.to_string()))?;
        if generation != self.generation {
            return Err(DriverError::StaleElement(handle.to_string()));
        }
        self.page_ref()?
            .elements
            .get(index)
            .ok_or_else(|| DriverError::StaleElement(handle.to_string()))
    }
}

#[async_trait]
impl ElementQuery for MemorySession {
    async fn find_all(
        &mut self,
        scope: Option<ElementHandle>,
        locator: &Locator,
    ) -> Result<Vec<ElementHandle>, DriverError> {
        self.find_log.push(locator.clone());
        if self.invalid.contains(locator) {
            return Err(DriverError::InvalidSelector(locator.to_string()));
        }

        let parent = match scope {
            Some(handle) => Some(self.element(handle)?.name.clone()),
            None => None,
        };

        let generation = self.generation;
        let matches: Vec<usize> = self
            .page_ref()?
            .elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.locators.contains(locator) && el.parent == parent)
            .map(|(i, _)| i)
            .collect();

        let mut found = Vec::with_capacity(matches.len());
        for index in matches {
            self.next_id += 1;
            self.handles.insert(self.next_id, (generation, index));
            found.push(ElementHandle::new(self.next_id));
        }
        Ok(found)
    }

    async fn click(&mut self, element: ElementHandle) -> Result<(), DriverError> {
        let el = self.element(element)?;
        let name = el.name.clone();
        let handler = el.on_click.clone();
        self.clicks.push(name);

        let effect = match handler {
            Some(handler) => handler(&self.form),
            None => ClickEffect::None,
        };
        self.apply(effect);
        Ok(())
    }

    async fn send_keys(&mut self, element: ElementHandle, text: &str) -> Result<(), DriverError> {
        let name = self.element(element)?.name.clone();
        self.form.entry(name).or_default().push_str(text);
        Ok(())
    }

    async fn clear(&mut self, element: ElementHandle) -> Result<(), DriverError> {
        let name = self.element(element)?.name.clone();
        self.form.insert(name, String::new());
        Ok(())
    }

    async fn text(&mut self, element: ElementHandle) -> Result<String, DriverError> {
        Ok(self.element(element)?.text.clone())
    }

    async fn attribute(
        &mut self,
        element: ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        let el = self.element(element)?;
        if name == "value" {
            let key = el.name.clone();
            return Ok(Some(self.form.get(&key).cloned().unwrap_or_default()));
        }
        Ok(el.attributes.get(name).cloned())
    }

    async fn is_displayed(&mut self, element: ElementHandle) -> Result<bool, DriverError> {
        Ok(self.element(element)?.displayed)
    }

    async fn is_enabled(&mut self, element: ElementHandle) -> Result<bool, DriverError> {
        Ok(self.element(element)?.enabled)
    }
}

#[async_trait]
impl Session for MemorySession {
    async fn launch(&mut self) -> Result<(), DriverError> {
        self.launches += 1;
        if self.fail_launch {
            return Err(DriverError::Other("browser failed to start".into()));
        }
        self.launched = true;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        self.closes += 1;
        self.launched = false;
        self.current = None;
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        self.launched
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, DriverError> {
        if !self.launched {
            return Err(DriverError::NotReady);
        }
        self.load(url);
        let page = self.page_ref()?;
        Ok(NavigationResult {
            url: page.url.clone(),
            title: page.title.clone(),
            status: 200,
        })
    }

    async fn current_url(&mut self) -> Result<String, DriverError> {
        self.tick();
        Ok(self.page_ref()?.url.clone())
    }

    async fn title(&mut self) -> Result<String, DriverError> {
        Ok(self.page_ref()?.title.clone())
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, DriverError> {
        if self.fail_screenshots {
            return Err(DriverError::NotSupported("screenshot".into()));
        }
        self.page_ref()?;
        Ok(FAKE_PNG.to_vec())
    }

    async fn body_text(&mut self) -> Result<String, DriverError> {
        Ok(self.page_ref()?.body_text.clone())
    }
}
