//! Three-way outcome classification of page state.
//!
//! Priority: error phrases, then success phrases, then the URL rule. If
//! nothing is conclusive the verdict is WARN, never PASS. Error phrases win
//! over success phrases so a leftover error banner next to a success message
//! counts as a failure.
//!
//! The classifier does not wait. Callers settle or poll first.

use dirprobe_common::{PageState, PhraseSet, Verdict};
use regex::Regex;

/// Secondary URL signal, consulted only when phrases are inconclusive.
#[derive(Debug, Clone)]
pub enum UrlRule {
    /// PASS once the path no longer contains this fragment (e.g. `/login`).
    LeftPath(String),
    /// PASS once the path contains this fragment.
    ReachedPath(String),
    /// PASS if the full URL matches.
    Matches(Regex),
}

impl UrlRule {
    fn evaluate(&self, state: &PageState) -> (bool, String) {
        match self {
            UrlRule::LeftPath(fragment) => {
                let left = !state.path().contains(fragment.as_str());
                (left, format!("URL {} '{}'", if left { "left" } else { "still at" }, fragment))
            }
            UrlRule::ReachedPath(fragment) => {
                let reached = state.path().contains(fragment.as_str());
                (
                    reached,
                    format!(
                        "URL {} '{}'",
                        if reached { "reached" } else { "did not reach" },
                        fragment
                    ),
                )
            }
            UrlRule::Matches(re) => {
                let ok = re.is_match(&state.url);
                (
                    ok,
                    format!(
                        "URL {} /{}/",
                        if ok { "matches" } else { "does not match" },
                        re.as_str()
                    ),
                )
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub verdict: Verdict,
    pub reason: String,
    /// The phrase that decided the verdict, if one did.
    pub matched: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OutcomeClassifier {
    success: PhraseSet,
    error: PhraseSet,
    ambiguous: PhraseSet,
    url_rule: Option<UrlRule>,
}

impl OutcomeClassifier {
    pub fn new(success: PhraseSet, error: PhraseSet) -> Self {
        Self {
            success,
            error,
            ambiguous: PhraseSet::empty(),
            url_rule: None,
        }
    }

    /// Phrases that explain a WARN (e.g. "please wait", "processing").
    pub fn ambiguous(mut self, phrases: PhraseSet) -> Self {
        self.ambiguous = phrases;
        self
    }

    pub fn url_rule(mut self, rule: UrlRule) -> Self {
        self.url_rule = Some(rule);
        self
    }

    pub fn classify(&self, state: &PageState) -> Classification {
        self.classify_with(state, |set| set.first_match(&state.body_text))
    }

    /// Classify `after` as the page's response to an action taken on
    /// `before`. Phrases already on the `before` page do not count.
    pub fn classify_change(&self, before: &PageState, after: &PageState) -> Classification {
        self.classify_with(after, |set| {
            set.first_new_match(&before.body_text, &after.body_text)
        })
    }

    fn classify_with<'s>(
        &'s self,
        state: &PageState,
        find: impl Fn(&'s PhraseSet) -> Option<&'s str>,
    ) -> Classification {
        if let Some(phrase) = find(&self.error) {
            return Classification {
                verdict: Verdict::Fail,
                reason: format!("error phrase '{}' on page", phrase),
                matched: Some(phrase.to_string()),
            };
        }

        if let Some(phrase) = find(&self.success) {
            return Classification {
                verdict: Verdict::Pass,
                reason: format!("success phrase '{}' on page", phrase),
                matched: Some(phrase.to_string()),
            };
        }

        let mut url_note = None;
        if let Some(rule) = &self.url_rule {
            let (ok, note) = rule.evaluate(state);
            if ok {
                return Classification {
                    verdict: Verdict::Pass,
                    reason: note,
                    matched: None,
                };
            }
            url_note = Some(note);
        }

        let mut reason = String::from("indeterminate: no success or error phrase");
        if let Some(note) = url_note {
            reason.push_str(&format!(", {}", note));
        }
        let matched = self.ambiguous.first_match(&state.body_text).map(|phrase| {
            reason.push_str(&format!(", ambiguous phrase '{}'", phrase));
            phrase.to_string()
        });

        Classification {
            verdict: Verdict::Warn,
            reason,
            matched,
        }
    }
}

/// Shorthand for the bare contract: phrases only, no URL rule.
pub fn classify(state: &PageState, success: &PhraseSet, error: &PhraseSet) -> Verdict {
    OutcomeClassifier::new(success.clone(), error.clone())
        .classify(state)
        .verdict
}
