use thiserror::Error;

/// Failures surfaced by a browser session or one of its element handles.
///
/// Backends map their native errors into these variants so the engine can
/// tell recoverable conditions (stale handles, bad selectors) apart from
/// transport failures.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Session not ready")]
    NotReady,

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Stale element reference: {0}")]
    StaleElement(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Element not interactable: {0}")]
    NotInteractable(String),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Driver error: {0}")]
    Other(String),
}

impl DriverError {
    pub fn is_stale(&self) -> bool {
        matches!(self, DriverError::StaleElement(_))
    }
}
