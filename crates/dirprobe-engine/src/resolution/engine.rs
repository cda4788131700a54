//! Candidate-list resolution.
//!
//! Tries each locator of a [`CandidateList`] in order with a find-all query
//! and stops at the first one that yields at least the required number of
//! matches. Query errors (invalid selector, detached frame, transport
//! hiccups) are logged and skipped; only exhausting the list produces
//! [`Resolution::NotFound`]. Retrying with a delay is the caller's job.

use super::result::{Resolution, Resolved};
use crate::session::ElementQuery;
use dirprobe_common::{CandidateList, ElementHandle};
use tracing::debug;

pub struct Resolver;

impl Resolver {
    /// First candidate with at least one match.
    pub async fn resolve<Q: ElementQuery + ?Sized>(
        query: &mut Q,
        candidates: &CandidateList,
        scope: Option<ElementHandle>,
    ) -> Resolution {
        Self::resolve_all(query, candidates, scope, 1).await
    }

    /// First candidate with at least `min_count` matches. Candidates that
    /// match fewer elements are skipped like misses.
    pub async fn resolve_all<Q: ElementQuery + ?Sized>(
        query: &mut Q,
        candidates: &CandidateList,
        scope: Option<ElementHandle>,
        min_count: usize,
    ) -> Resolution {
        let min_count = min_count.max(1);
        let mut attempted = Vec::with_capacity(candidates.len());

        for (index, locator) in candidates.iter().enumerate() {
            attempted.push(locator.to_string());

            match query.find_all(scope, locator).await {
                Ok(elements) if elements.len() >= min_count => {
                    debug!(
                        "Resolved '{}' via {} ({} match(es))",
                        candidates.name(),
                        locator,
                        elements.len()
                    );
                    if let Some(resolved) = Resolved::new(locator.clone(), index, elements) {
                        return Resolution::Found(resolved);
                    }
                }
                Ok(elements) => {
                    debug!(
                        "Candidate {} for '{}' matched {} element(s), need {}",
                        locator,
                        candidates.name(),
                        elements.len(),
                        min_count
                    );
                }
                Err(e) => {
                    debug!(
                        "Candidate {} for '{}' failed: {}",
                        locator,
                        candidates.name(),
                        e
                    );
                }
            }
        }

        Resolution::NotFound {
            target: candidates.name().to_string(),
            attempted,
        }
    }

    /// Whether any candidate matches. "Good, no error banner" checks use
    /// this instead of treating a failed lookup as an exception.
    pub async fn exists<Q: ElementQuery + ?Sized>(
        query: &mut Q,
        candidates: &CandidateList,
    ) -> bool {
        Self::resolve(query, candidates, None).await.is_found()
    }
}
