use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
    /// Indeterminate: neither success nor failure could be confirmed.
    Warn,
    /// The check itself could not run (driver failure, bad fixture, panic).
    Error,
}

impl Verdict {
    /// FAIL and ERROR may short-circuit a scenario and trigger a screenshot.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Verdict::Fail | Verdict::Error)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
            Verdict::Warn => "WARN",
            Verdict::Error => "ERROR",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Verdict::Pass => "✅",
            Verdict::Fail | Verdict::Error => "❌",
            Verdict::Warn => "⚠️",
        }
    }

    /// Reinterprets a classification for checks where a confirmed failure
    /// banner is the desired outcome (bad credentials, injection payloads).
    pub fn expecting_rejection(self) -> Self {
        match self {
            Verdict::Pass => Verdict::Fail,
            Verdict::Fail => Verdict::Pass,
            other => other,
        }
    }

    pub fn from_bool(ok: bool) -> Self {
        if ok { Verdict::Pass } else { Verdict::Fail }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
