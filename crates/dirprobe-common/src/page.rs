use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque reference to an element found by a session.
///
/// Only valid for the page it was found on; after navigation or DOM
/// replacement the session reports it as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(u64);

impl ElementHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationResult {
    pub url: String,
    pub title: String,
    pub status: u16, // generic status code (e.g. 200)
}

/// Snapshot of what the page shows at one instant: the URL plus all
/// visible body text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub url: String,
    pub body_text: String,
}

impl PageState {
    pub fn new(url: impl Into<String>, body_text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body_text: body_text.into(),
        }
    }

    /// Path component of the URL. Falls back to the raw URL when it does
    /// not parse (relative URLs from test doubles, `about:blank`).
    pub fn path(&self) -> String {
        match url::Url::parse(&self.url) {
            Ok(parsed) => parsed.path().to_string(),
            Err(_) => self.url.clone(),
        }
    }
}
