//! Wait provider.
//!
//! Polling waits resolve to `false` / [`Resolution::NotFound`] on timeout;
//! they never return errors. Prefer them over [`settle`], which is an
//! unconditional fixed delay kept for pages with no reliable readiness
//! signal.

use crate::resolution::{Resolution, Resolver};
use crate::session::Session;
use dirprobe_common::{CandidateList, PageState};
use futures::future::BoxFuture;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// Poll `predicate` every `interval` until it returns true or `timeout`
/// elapses. The predicate is always evaluated at least once.
pub async fn until<S, F>(
    session: &mut S,
    mut predicate: F,
    timeout: Duration,
    interval: Duration,
) -> bool
where
    S: Session + ?Sized,
    F: for<'a> FnMut(&'a mut S) -> BoxFuture<'a, bool>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if predicate(&mut *session).await {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            debug!("Wait timed out after {:?}", timeout);
            return false;
        }
        sleep(interval.min(deadline - now)).await;
    }
}

/// Wait until the current URL differs from `from`.
pub async fn for_url_change<S: Session + ?Sized>(
    session: &mut S,
    from: &str,
    timeout: Duration,
    interval: Duration,
) -> bool {
    let from = from.to_string();
    until(
        session,
        move |s| {
            let from = from.clone();
            Box::pin(async move {
                matches!(s.current_url().await, Ok(url) if url != from)
            })
        },
        timeout,
        interval,
    )
    .await
}

/// Wait until the current URL contains `fragment`.
pub async fn for_url_contains<S: Session + ?Sized>(
    session: &mut S,
    fragment: &str,
    timeout: Duration,
    interval: Duration,
) -> bool {
    let fragment = fragment.to_string();
    until(
        session,
        move |s| {
            let fragment = fragment.clone();
            Box::pin(async move {
                matches!(s.current_url().await, Ok(url) if url.contains(&fragment))
            })
        },
        timeout,
        interval,
    )
    .await
}

/// Wait until the URL or the body text differs from `before`. Pages that
/// submit in place count as changed once their content does.
pub async fn for_page_change<S: Session + ?Sized>(
    session: &mut S,
    before: &PageState,
    timeout: Duration,
    interval: Duration,
) -> bool {
    let before = before.clone();
    until(
        session,
        move |s| {
            let before = before.clone();
            Box::pin(async move {
                matches!(
                    s.page_state().await,
                    Ok(now) if now.url != before.url || now.body_text != before.body_text
                )
            })
        },
        timeout,
        interval,
    )
    .await
}

/// Wait until the body text contains `phrase` (case-insensitive).
pub async fn for_text<S: Session + ?Sized>(
    session: &mut S,
    phrase: &str,
    timeout: Duration,
    interval: Duration,
) -> bool {
    let phrase = phrase.to_lowercase();
    until(
        session,
        move |s| {
            let phrase = phrase.clone();
            Box::pin(async move {
                matches!(s.body_text().await, Ok(text) if text.to_lowercase().contains(&phrase))
            })
        },
        timeout,
        interval,
    )
    .await
}

/// Re-run resolution until some candidate matches or `timeout` elapses.
pub async fn for_element<S: Session + ?Sized>(
    session: &mut S,
    candidates: &CandidateList,
    timeout: Duration,
    interval: Duration,
) -> Resolution {
    let deadline = Instant::now() + timeout;
    loop {
        let resolution = Resolver::resolve(&mut *session, candidates, None).await;
        let now = Instant::now();
        if resolution.is_found() || now >= deadline {
            return resolution;
        }
        sleep(interval.min(deadline - now)).await;
    }
}

/// Fixed, uncancellable delay.
pub async fn settle(duration: Duration) {
    sleep(duration).await;
}
