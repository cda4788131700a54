//! Action execution on resolved elements.
//!
//! Interactions that need a usable element (click, type, clear) first check
//! visibility and enablement; an unusable element yields
//! [`ActionResult::Skipped`] rather than an error so callers can decide
//! whether a disabled control is a failure or the expected state.
//!
//! A stale handle triggers exactly one re-resolution of the same candidate
//! list. A second staleness (or a miss on re-resolution) surfaces as
//! [`ActionError::StaleElement`].
//!
//! Actions are real browser side effects and are not idempotent: after a
//! navigation the caller must re-resolve before acting again.

use crate::resolution::{Resolution, Resolved, Resolver};
use crate::session::ElementQuery;
use dirprobe_common::{CandidateList, DriverError, ElementHandle};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Click,
    Type(String),
    Clear,
    ReadText,
    ReadAttribute(String),
    IsDisplayed,
    IsEnabled,
}

impl Action {
    fn requires_interactable(&self) -> bool {
        matches!(self, Action::Click | Action::Type(_) | Action::Clear)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Click => "click",
            Action::Type(_) => "type",
            Action::Clear => "clear",
            Action::ReadText => "read text",
            Action::ReadAttribute(_) => "read attribute",
            Action::IsDisplayed => "is displayed",
            Action::IsEnabled => "is enabled",
        }
    }
}

/// Which of the resolved matches to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    First,
    Nth(usize),
}

impl Target {
    fn index(&self) -> usize {
        match self {
            Target::First => 0,
            Target::Nth(i) => *i,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Hidden,
    Disabled,
    NotInteractable,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Hidden => f.write_str("element is not displayed"),
            SkipReason::Disabled => f.write_str("element is disabled"),
            SkipReason::NotInteractable => f.write_str("element is not interactable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    Done,
    Text(String),
    Attribute(Option<String>),
    Flag(bool),
    Skipped(SkipReason),
}

impl ActionResult {
    pub fn is_skipped(&self) -> bool {
        matches!(self, ActionResult::Skipped(_))
    }

    pub fn flag(&self) -> Option<bool> {
        match self {
            ActionResult::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            ActionResult::Text(t) => Some(t),
            ActionResult::Attribute(a) => a.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("No element matched '{target}' (tried: {})", attempted.join(", "))]
    NotFound {
        target: String,
        attempted: Vec<String>,
    },

    #[error("Element for '{0}' went stale and could not be recovered")]
    StaleElement(String),

    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),
}

#[derive(Debug, Default)]
pub struct ActionExecutor {
    re_resolutions: usize,
}

impl ActionExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many stale-handle recoveries this executor has attempted.
    pub fn re_resolutions(&self) -> usize {
        self.re_resolutions
    }

    /// Resolve `candidates`, then perform `action` on the targeted match.
    pub async fn perform<Q: ElementQuery + ?Sized>(
        &mut self,
        query: &mut Q,
        candidates: &CandidateList,
        target: Target,
        action: Action,
    ) -> Result<ActionResult, ActionError> {
        let element = Self::locate(query, candidates, target).await?;
        self.perform_with_recovery(query, candidates, target, element, action)
            .await
    }

    /// Perform `action` on an element from an earlier resolution of
    /// `candidates`. The list is still needed to recover from staleness.
    pub async fn perform_resolved<Q: ElementQuery + ?Sized>(
        &mut self,
        query: &mut Q,
        candidates: &CandidateList,
        resolved: &Resolved,
        target: Target,
        action: Action,
    ) -> Result<ActionResult, ActionError> {
        let element = match resolved.nth(target.index()) {
            Some(el) => el,
            None => Self::locate(query, candidates, target).await?,
        };
        self.perform_with_recovery(query, candidates, target, element, action)
            .await
    }

    /// Clear the field, then type into it.
    pub async fn fill<Q: ElementQuery + ?Sized>(
        &mut self,
        query: &mut Q,
        candidates: &CandidateList,
        text: &str,
    ) -> Result<ActionResult, ActionError> {
        let cleared = self
            .perform(query, candidates, Target::First, Action::Clear)
            .await?;
        if cleared.is_skipped() {
            return Ok(cleared);
        }
        self.perform(query, candidates, Target::First, Action::Type(text.to_string()))
            .await
    }

    async fn perform_with_recovery<Q: ElementQuery + ?Sized>(
        &mut self,
        query: &mut Q,
        candidates: &CandidateList,
        target: Target,
        element: ElementHandle,
        action: Action,
    ) -> Result<ActionResult, ActionError> {
        match Self::act(query, element, &action).await {
            Err(e) if e.is_stale() => {
                warn!(
                    "Stale handle for '{}' during {}; re-resolving once",
                    candidates.name(),
                    action.name()
                );
                self.re_resolutions += 1;

                let element = match Self::locate(query, candidates, target).await {
                    Ok(el) => el,
                    Err(ActionError::NotFound { .. }) => {
                        return Err(ActionError::StaleElement(candidates.name().to_string()));
                    }
                    Err(e) => return Err(e),
                };

                match Self::act(query, element, &action).await {
                    Err(e) if e.is_stale() => {
                        Err(ActionError::StaleElement(candidates.name().to_string()))
                    }
                    other => other.map_err(ActionError::from),
                }
            }
            other => other.map_err(ActionError::from),
        }
    }

    async fn locate<Q: ElementQuery + ?Sized>(
        query: &mut Q,
        candidates: &CandidateList,
        target: Target,
    ) -> Result<ElementHandle, ActionError> {
        let index = target.index();
        match Resolver::resolve_all(query, candidates, None, index + 1).await {
            Resolution::Found(resolved) => match resolved.nth(index) {
                Some(el) => Ok(el),
                None => Err(ActionError::NotFound {
                    target: candidates.name().to_string(),
                    attempted: vec![resolved.locator().to_string()],
                }),
            },
            Resolution::NotFound { target, attempted } => {
                Err(ActionError::NotFound { target, attempted })
            }
        }
    }

    async fn act<Q: ElementQuery + ?Sized>(
        query: &mut Q,
        element: ElementHandle,
        action: &Action,
    ) -> Result<ActionResult, DriverError> {
        if action.requires_interactable() {
            if !query.is_displayed(element).await? {
                debug!("Skipping {} on {}: hidden", action.name(), element);
                return Ok(ActionResult::Skipped(SkipReason::Hidden));
            }
            if !query.is_enabled(element).await? {
                debug!("Skipping {} on {}: disabled", action.name(), element);
                return Ok(ActionResult::Skipped(SkipReason::Disabled));
            }
        }

        let result = match action {
            Action::Click => query.click(element).await.map(|_| ActionResult::Done),
            Action::Type(text) => query
                .send_keys(element, text)
                .await
                .map(|_| ActionResult::Done),
            Action::Clear => query.clear(element).await.map(|_| ActionResult::Done),
            Action::ReadText => query.text(element).await.map(ActionResult::Text),
            Action::ReadAttribute(name) => query
                .attribute(element, name)
                .await
                .map(ActionResult::Attribute),
            Action::IsDisplayed => query.is_displayed(element).await.map(ActionResult::Flag),
            Action::IsEnabled => query.is_enabled(element).await.map(ActionResult::Flag),
        };

        match result {
            Err(DriverError::NotInteractable(reason)) => {
                debug!("Skipping {} on {}: {}", action.name(), element, reason);
                Ok(ActionResult::Skipped(SkipReason::NotInteractable))
            }
            other => other,
        }
    }
}
