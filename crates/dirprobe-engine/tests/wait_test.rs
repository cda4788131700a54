use dirprobe_engine::session::{ElementQuery, Session};
use dirprobe_engine::testing::{ClickEffect, MemoryElement, MemoryPage, MemorySession};
use dirprobe_engine::wait;
use dirprobe_engine::{CandidateList, ElementHandle, Locator};
use std::time::Duration;
use tokio::time::Instant;

const HOME: &str = "http://dir.test/";

async fn open() -> MemorySession {
    let mut session = MemorySession::new().page(
        MemoryPage::new(HOME)
            .body("Welcome to the directory")
            .element(MemoryElement::new("search").locator(Locator::css("#q"))),
    );
    session.launch().await.unwrap();
    session.navigate(HOME).await.unwrap();
    session
}

#[tokio::test(start_paused = true)]
async fn test_until_polls_until_predicate_holds() {
    let mut session = open().await;
    let mut calls = 0;

    let ok = wait::until(
        &mut session,
        |_| {
            calls += 1;
            let done = calls >= 3;
            Box::pin(async move { done })
        },
        Duration::from_secs(5),
        Duration::from_millis(100),
    )
    .await;

    assert!(ok);
    assert_eq!(calls, 3);
}

#[tokio::test(start_paused = true)]
async fn test_url_change_times_out_to_false() {
    let mut session = open().await;
    let started = Instant::now();

    let changed = wait::for_url_change(
        &mut session,
        HOME,
        Duration::from_secs(2),
        Duration::from_millis(250),
    )
    .await;

    assert!(!changed);
    assert!(started.elapsed() >= Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_url_and_text_waits_succeed_immediately_when_satisfied() {
    let mut session = open().await;
    let timeout = Duration::from_secs(1);
    let interval = Duration::from_millis(50);

    assert!(wait::for_url_contains(&mut session, "dir.test", timeout, interval).await);
    assert!(wait::for_url_change(&mut session, "http://dir.test/login", timeout, interval).await);
    assert!(wait::for_text(&mut session, "WELCOME", timeout, interval).await);
    assert!(!wait::for_text(&mut session, "no such text", timeout, interval).await);
}

#[tokio::test(start_paused = true)]
async fn test_for_element() {
    let mut session = open().await;
    let timeout = Duration::from_secs(1);
    let interval = Duration::from_millis(100);

    let search = CandidateList::new("search box", Locator::css("input[name='q']"))
        .or(Locator::css("#q"));
    let found = wait::for_element(&mut session, &search, timeout, interval).await;
    assert_eq!(found.found().map(|r| r.candidate_index()), Some(1));

    let missing = CandidateList::new("error banner", Locator::css(".alert"));
    let before = session.find_log().len();
    let result = wait::for_element(&mut session, &missing, timeout, interval).await;
    assert!(!result.is_found());
    // Polled more than once before giving up.
    assert!(session.find_log().len() - before > 1);
}

#[tokio::test(start_paused = true)]
async fn test_page_change_waits_for_deferred_update() {
    let mut session = MemorySession::new().page(
        MemoryPage::new(HOME).body("Name is required").element(
            MemoryElement::new("save")
                .locator(Locator::css("#save"))
                .on_click(|_| ClickEffect::Deferred {
                    reads: 2,
                    effect: Box::new(ClickEffect::ShowText("Saved".into())),
                }),
        ),
    );
    session.launch().await.unwrap();
    session.navigate(HOME).await.unwrap();
    let timeout = Duration::from_secs(2);
    let interval = Duration::from_millis(250);

    let before = session.page_state().await.unwrap();
    assert!(!wait::for_page_change(&mut session, &before, timeout, interval).await);

    let save: Vec<ElementHandle> = session.find_all(None, &Locator::css("#save")).await.unwrap();
    session.click(save[0]).await.unwrap();
    let started = Instant::now();
    assert!(wait::for_page_change(&mut session, &before, timeout, interval).await);
    assert!(started.elapsed() >= interval);
    assert_eq!(session.body_text().await.unwrap(), "Saved");
}
