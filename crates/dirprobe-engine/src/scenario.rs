//! Scenario sequencing: Setup, steps, Teardown.
//!
//! [`run_scenario`] launches the session, runs the scenario body with panics
//! caught, reports anything unexpected as ERROR (with a best-effort
//! screenshot) and always closes the session exactly once.

use crate::classifier::{Classification, OutcomeClassifier};
use crate::config::Settings;
use crate::executor::{Action, ActionError, ActionExecutor, ActionResult, Target};
use crate::fixture::{Fixture, FixtureError};
use crate::reporter::{Reporter, Summary};
use crate::resolution::{Resolution, Resolved, Resolver};
use crate::session::Session;
use crate::wait;
use async_trait::async_trait;
use dirprobe_common::{CandidateList, DriverError, NavigationResult, PageState, Verdict};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use thiserror::Error;
use tokio::time::{Instant, sleep};
use tracing::{info, warn};

/// What to do after a FAIL or ERROR check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    StopOnFailure,
    Continue,
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    /// A fatal verdict was already recorded; remaining steps are skipped.
    #[error("Stopped after {verdict} at '{step}'")]
    ShortCircuit { step: String, verdict: Verdict },

    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    #[error("Fixture error: {0}")]
    Fixture(#[from] FixtureError),

    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait Scenario: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str {
        ""
    }

    fn policy(&self) -> FailurePolicy {
        FailurePolicy::StopOnFailure
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError>;
}

/// Everything a scenario step needs, borrowed for the scenario's lifetime.
pub struct ScenarioContext<'a> {
    pub session: &'a mut dyn Session,
    pub reporter: &'a mut Reporter,
    pub fixture: &'a Fixture,
    pub settings: &'a Settings,
    pub executor: ActionExecutor,
    scenario: &'static str,
    policy: FailurePolicy,
    step: usize,
}

impl<'a> ScenarioContext<'a> {
    pub fn new(
        scenario: &dyn Scenario,
        session: &'a mut dyn Session,
        reporter: &'a mut Reporter,
        fixture: &'a Fixture,
        settings: &'a Settings,
    ) -> Self {
        Self {
            session,
            reporter,
            fixture,
            settings,
            executor: ActionExecutor::new(),
            scenario: scenario.name(),
            policy: scenario.policy(),
            step: 0,
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Record a verdict. FAIL/ERROR captures a screenshot and, under
    /// [`FailurePolicy::StopOnFailure`], ends the scenario.
    pub async fn check(&mut self, verdict: Verdict, message: &str) -> Result<(), ScenarioError> {
        self.step += 1;
        self.reporter.record(verdict, message);

        if !verdict.is_fatal() {
            return Ok(());
        }

        let label = self.step_label();
        self.reporter
            .on_failure(&mut *self.session, verdict, &label)
            .await;

        match self.policy {
            FailurePolicy::StopOnFailure => Err(ScenarioError::ShortCircuit {
                step: label,
                verdict,
            }),
            FailurePolicy::Continue => Ok(()),
        }
    }

    /// Record a fatal verdict and stop regardless of policy. Used when the
    /// flow cannot meaningfully continue (a required control is missing).
    pub async fn abort(&mut self, verdict: Verdict, message: &str) -> ScenarioError {
        let step = self.step_label();
        match self.check(verdict, message).await {
            Err(e) => e,
            Ok(()) => ScenarioError::ShortCircuit { step, verdict },
        }
    }

    pub fn info(&mut self, message: &str) {
        self.reporter.info(message);
    }

    /// Navigate to a site path relative to the configured base URL.
    pub async fn goto(&mut self, path: &str) -> Result<NavigationResult, ScenarioError> {
        let url = self.settings.url(path);
        info!("Navigating to {}", url);
        Ok(self.session.navigate(&url).await?)
    }

    pub async fn current_url(&mut self) -> Result<String, ScenarioError> {
        Ok(self.session.current_url().await?)
    }

    pub async fn page_state(&mut self) -> Result<PageState, ScenarioError> {
        Ok(self.session.page_state().await?)
    }

    pub async fn resolve(&mut self, candidates: &CandidateList) -> Resolution {
        Resolver::resolve(&mut *self.session, candidates, None).await
    }

    pub async fn resolve_at_least(
        &mut self,
        candidates: &CandidateList,
        min_count: usize,
    ) -> Resolution {
        Resolver::resolve_all(&mut *self.session, candidates, None, min_count).await
    }

    pub async fn exists(&mut self, candidates: &CandidateList) -> bool {
        Resolver::exists(&mut *self.session, candidates).await
    }

    /// Poll until `candidates` resolve, within the element timeout.
    pub async fn wait_for(&mut self, candidates: &CandidateList) -> Resolution {
        let timeouts = &self.settings.timeouts;
        wait::for_element(
            &mut *self.session,
            candidates,
            timeouts.element(),
            timeouts.poll_interval(),
        )
        .await
    }

    /// Like [`wait_for`](Self::wait_for), but a miss is a FAIL that stops
    /// the scenario.
    pub async fn require(&mut self, candidates: &CandidateList) -> Result<Resolved, ScenarioError> {
        match self.wait_for(candidates).await {
            Resolution::Found(resolved) => Ok(resolved),
            Resolution::NotFound { target, attempted } => Err(self
                .abort(
                    Verdict::Fail,
                    &format!("{} not found (tried {})", target, attempted.join(", ")),
                )
                .await),
        }
    }

    /// Wait, within the navigation timeout, until the URL or the page
    /// content differs from `before`.
    pub async fn wait_for_change(&mut self, before: &PageState) -> bool {
        let timeouts = &self.settings.timeouts;
        wait::for_page_change(
            &mut *self.session,
            before,
            timeouts.navigation(),
            timeouts.poll_interval(),
        )
        .await
    }

    /// Fixed delay, for pages with no usable readiness signal.
    pub async fn settle(&self) {
        wait::settle(self.settings.timeouts.settle()).await;
    }

    /// Raw executor access: every outcome comes back as data.
    pub async fn perform(
        &mut self,
        candidates: &CandidateList,
        target: Target,
        action: Action,
    ) -> Result<ActionResult, ActionError> {
        self.executor
            .perform(&mut *self.session, candidates, target, action)
            .await
    }

    /// Perform an action a step depends on. A missing target is a FAIL and
    /// an unrecoverable stale handle an ERROR; both stop the scenario.
    pub async fn act(
        &mut self,
        candidates: &CandidateList,
        target: Target,
        action: Action,
    ) -> Result<ActionResult, ScenarioError> {
        match self.perform(candidates, target, action).await {
            Ok(result) => Ok(result),
            Err(ActionError::NotFound { target, attempted }) => Err(self
                .abort(
                    Verdict::Fail,
                    &format!("{} not found (tried {})", target, attempted.join(", ")),
                )
                .await),
            Err(ActionError::StaleElement(target)) => Err(self
                .abort(
                    Verdict::Error,
                    &format!("{} kept going stale after re-resolution", target),
                )
                .await),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn click(&mut self, candidates: &CandidateList) -> Result<ActionResult, ScenarioError> {
        self.act(candidates, Target::First, Action::Click).await
    }

    /// Clear then type; a skipped clear skips the typing too.
    pub async fn fill(
        &mut self,
        candidates: &CandidateList,
        text: &str,
    ) -> Result<ActionResult, ScenarioError> {
        let cleared = self.act(candidates, Target::First, Action::Clear).await?;
        if cleared.is_skipped() {
            return Ok(cleared);
        }
        self.act(candidates, Target::First, Action::Type(text.to_string()))
            .await
    }

    pub async fn read_text(&mut self, candidates: &CandidateList) -> Result<String, ScenarioError> {
        let result = self.act(candidates, Target::First, Action::ReadText).await?;
        Ok(result.text().unwrap_or_default().to_string())
    }

    pub async fn is_enabled(&mut self, candidates: &CandidateList) -> Result<bool, ScenarioError> {
        let result = self.act(candidates, Target::First, Action::IsEnabled).await?;
        Ok(result.flag().unwrap_or(false))
    }

    /// Re-classify until the verdict is conclusive (PASS or FAIL) or the
    /// navigation timeout elapses, then return the last classification.
    pub async fn await_outcome(
        &mut self,
        classifier: &OutcomeClassifier,
    ) -> Result<Classification, ScenarioError> {
        self.poll_outcome(classifier, None).await
    }

    /// Outcome of an action taken on the `before` page. Waits for the page
    /// to change first, then classifies ignoring phrases that were already
    /// shown. `None` means the page never reacted.
    pub async fn await_response(
        &mut self,
        before: &PageState,
        classifier: &OutcomeClassifier,
    ) -> Result<Option<Classification>, ScenarioError> {
        if !self.wait_for_change(before).await {
            return Ok(None);
        }
        self.poll_outcome(classifier, Some(before)).await.map(Some)
    }

    async fn poll_outcome(
        &mut self,
        classifier: &OutcomeClassifier,
        before: Option<&PageState>,
    ) -> Result<Classification, ScenarioError> {
        let timeout = self.settings.timeouts.navigation();
        let interval = self.settings.timeouts.poll_interval();
        let deadline = Instant::now() + timeout;
        loop {
            let state = self.page_state().await?;
            let classification = match before {
                Some(before) => classifier.classify_change(before, &state),
                None => classifier.classify(&state),
            };
            let now = Instant::now();
            if classification.verdict != Verdict::Warn || now >= deadline {
                return Ok(classification);
            }
            sleep(interval.min(deadline - now)).await;
        }
    }

    async fn report_unhandled(&mut self, message: &str) {
        self.step += 1;
        self.reporter
            .record(Verdict::Error, &format!("Unhandled error: {}", message));
        let label = self.step_label();
        self.reporter
            .on_failure(&mut *self.session, Verdict::Error, &label)
            .await;
    }

    fn step_label(&self) -> String {
        format!("{}_step-{}", self.scenario, self.step)
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub scenario: String,
    pub summary: Summary,
    pub short_circuited: bool,
    /// Unexpected error or panic message, if the scenario ended with one.
    pub error: Option<String>,
}

impl ScenarioOutcome {
    /// False if any FAIL or ERROR was recorded.
    pub fn passed(&self) -> bool {
        !self.summary.has_failures()
    }
}

/// Setup, run, and always tear down one scenario on `session`.
pub async fn run_scenario(
    scenario: &dyn Scenario,
    session: &mut dyn Session,
    reporter: &mut Reporter,
    fixture: &Fixture,
    settings: &Settings,
) -> ScenarioOutcome {
    let name = scenario.name();
    reporter.add_secrets(fixture.secrets());
    reporter.banner(name, scenario.description());

    let mut short_circuited = false;
    let mut error = None;

    match session.launch().await {
        Ok(()) => {
            let mut ctx = ScenarioContext::new(scenario, &mut *session, &mut *reporter, fixture, settings);
            let result = AssertUnwindSafe(scenario.run(&mut ctx)).catch_unwind().await;

            match result {
                Ok(Ok(())) => {}
                Ok(Err(ScenarioError::ShortCircuit { step, verdict })) => {
                    short_circuited = true;
                    ctx.info(&format!("Remaining steps skipped after {} at {}", verdict, step));
                }
                Ok(Err(e)) => {
                    let message = e.to_string();
                    ctx.report_unhandled(&message).await;
                    error = Some(message);
                }
                Err(panic) => {
                    let message = format!("panic: {}", panic_message(panic.as_ref()));
                    ctx.report_unhandled(&message).await;
                    error = Some(message);
                }
            }
        }
        Err(e) => {
            let message = format!("Failed to launch browser session: {}", e);
            reporter.record(Verdict::Error, &message);
            error = Some(message);
        }
    }

    // Teardown runs on every path above.
    if let Err(e) = session.close().await {
        warn!("Failed to close session for '{}': {}", name, e);
    }

    reporter.finish(name);
    ScenarioOutcome {
        scenario: name.to_string(),
        summary: reporter.summary(),
        short_circuited,
        error,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
