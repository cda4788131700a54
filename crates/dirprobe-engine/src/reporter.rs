//! Console reporting of verdicts.
//!
//! Lines go to the configured output handlers; records are also kept in
//! memory so the run's summary (and exit status) can be derived from data
//! instead of from scraping the console.

use crate::capture::ScreenshotCapture;
use crate::session::Session;
use dirprobe_common::Verdict;
use dirprobe_common::formatter::{
    format_banner, format_info, format_screenshot, format_verdict, mask_secrets,
};
use std::path::PathBuf;
use tracing::warn;

/// Where report lines go. Every line, FAIL and ERROR included, is written
/// through `out`; stderr belongs to tracing.
#[derive(Clone, Copy)]
pub struct OutputHandlers {
    pub out: fn(&str),
}

impl OutputHandlers {
    pub fn stdio() -> Self {
        Self {
            out: |msg| println!("{}", msg),
        }
    }

    /// Discards everything; records are still kept.
    pub fn silent() -> Self {
        Self { out: |_| {} }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub verdict: Verdict,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub warned: usize,
    pub errored: usize,
}

impl Summary {
    fn add(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Pass => self.passed += 1,
            Verdict::Fail => self.failed += 1,
            Verdict::Warn => self.warned += 1,
            Verdict::Error => self.errored += 1,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.errored > 0
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.warned + self.errored
    }
}

pub struct Reporter {
    output: OutputHandlers,
    capture: Option<ScreenshotCapture>,
    secrets: Vec<String>,
    records: Vec<Record>,
    screenshots: Vec<PathBuf>,
    summary: Summary,
}

impl Reporter {
    pub fn new(output: OutputHandlers) -> Self {
        Self {
            output,
            capture: None,
            secrets: Vec::new(),
            records: Vec::new(),
            screenshots: Vec::new(),
            summary: Summary::default(),
        }
    }

    pub fn with_capture(mut self, capture: ScreenshotCapture) -> Self {
        self.capture = Some(capture);
        self
    }

    /// Values to mask in every line written from now on.
    pub fn add_secrets<I: IntoIterator<Item = String>>(&mut self, secrets: I) {
        self.secrets
            .extend(secrets.into_iter().filter(|s| !s.is_empty()));
    }

    pub fn record(&mut self, verdict: Verdict, message: &str) {
        let message = mask_secrets(message, &self.secrets);
        (self.output.out)(&format_verdict(verdict, &message));
        self.summary.add(verdict);
        self.records.push(Record { verdict, message });
    }

    pub fn info(&mut self, message: &str) {
        let message = mask_secrets(message, &self.secrets);
        (self.output.out)(&format_info(&message));
    }

    pub fn banner(&mut self, scenario: &str, description: &str) {
        (self.output.out)(&format_banner(scenario, description));
    }

    /// Closing line for a scenario.
    pub fn finish(&mut self, scenario: &str) {
        let s = self.summary;
        if s.has_failures() {
            (self.output.out)(&format!(
                "❌ Scenario {} finished with failures: {} passed, {} failed, {} warnings, {} errors",
                scenario, s.passed, s.failed, s.warned, s.errored
            ));
        } else {
            (self.output.out)(&format!(
                "🎉 Scenario {} completed: {} passed, {} warnings",
                scenario, s.passed, s.warned
            ));
        }
    }

    /// Request a screenshot for a FAIL/ERROR verdict. Capture problems are
    /// logged and otherwise ignored.
    pub async fn on_failure<S: Session + ?Sized>(
        &mut self,
        session: &mut S,
        verdict: Verdict,
        label: &str,
    ) -> Option<PathBuf> {
        if !verdict.is_fatal() {
            return None;
        }
        let capture = self.capture.as_ref()?;
        match capture.capture(session, label).await {
            Ok(path) => {
                (self.output.out)(&format_screenshot(&path.display().to_string()));
                self.screenshots.push(path.clone());
                Some(path)
            }
            Err(e) => {
                warn!("Screenshot for '{}' failed: {}", label, e);
                (self.output.out)(&format!("⚠️ Screenshot capture failed: {}", e));
                None
            }
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn screenshots(&self) -> &[PathBuf] {
        &self.screenshots
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }
}
