use dirprobe::{DEFAULT_FIXTURE_DIR, scenarios};
use dirprobe_engine::config::Settings;
use dirprobe_engine::fixture::Fixture;
use dirprobe_engine::reporter::{OutputHandlers, Reporter};
use dirprobe_engine::scenario::{ScenarioOutcome, run_scenario};
use dirprobe_engine::testing::{ClickEffect, MemoryElement, MemoryPage, MemorySession};
use dirprobe_engine::{Locator, Verdict};
use serde_json::json;
use std::path::Path;

const SITE: &str = "http://dir.test";

fn url(path: &str) -> String {
    format!("{}{}", SITE, path)
}

fn settings() -> Settings {
    let mut settings = Settings {
        base_url: SITE.into(),
        ..Settings::default()
    };
    settings.timeouts.element_ms = 0;
    settings.timeouts.navigation_ms = 0;
    settings.timeouts.settle_ms = 0;
    settings
}

async fn shipped_fixture(scenario: &str) -> Fixture {
    Fixture::load_for(Path::new(DEFAULT_FIXTURE_DIR), scenario)
        .await
        .unwrap()
}

async fn run(name: &str, session: &mut MemorySession, fixture: &Fixture) -> (ScenarioOutcome, Reporter) {
    run_with(name, session, fixture, &settings()).await
}

async fn run_with(
    name: &str,
    session: &mut MemorySession,
    fixture: &Fixture,
    settings: &Settings,
) -> (ScenarioOutcome, Reporter) {
    let scenario = scenarios::find(name).unwrap();
    let mut reporter = Reporter::new(OutputHandlers::silent());
    let outcome = run_scenario(scenario.as_ref(), session, &mut reporter, fixture, settings).await;
    (outcome, reporter)
}

fn messages(reporter: &Reporter) -> Vec<String> {
    reporter
        .records()
        .iter()
        .map(|r| format!("{} {}", r.verdict, r.message))
        .collect()
}

fn login_page(submit: MemoryElement) -> MemoryPage {
    MemoryPage::new(url("/login"))
        .title("Sign in")
        .body("Sign in to your account")
        .element(MemoryElement::new("email").locator(Locator::css("input[type='email']")))
        .element(MemoryElement::new("password").locator(Locator::css("input[type='password']")))
        .element(submit)
}

/// Accepts user@x.com / p@ss, rejects everything else with an error banner.
fn checking_submit() -> MemoryElement {
    MemoryElement::new("login-submit")
        .locator(Locator::css("button[type='submit']"))
        .text("Sign in")
        .on_click(|form| {
            let email = form.get("email").map(String::as_str).unwrap_or_default();
            let password = form.get("password").map(String::as_str).unwrap_or_default();
            if email.is_empty() {
                ClickEffect::ShowText("Email is required".into())
            } else if email == "user@x.com" && password == "p@ss" {
                ClickEffect::Navigate(url("/dashboard"))
            } else {
                ClickEffect::ShowText("Invalid credentials".into())
            }
        })
}

fn dashboard() -> MemoryPage {
    MemoryPage::new(url("/dashboard"))
        .title("Dashboard")
        .body("Welcome back! My Businesses")
        .element(
            MemoryElement::new("logout")
                .locator(Locator::link_text("Logout"))
                .links_to(url("/login?logged_out=1")),
        )
        .element(
            MemoryElement::new("add-business")
                .locator(Locator::link_text("Add Business"))
                .links_to(url("/business/new")),
        )
}

fn directory_site() -> MemorySession {
    MemorySession::new()
        .page(login_page(checking_submit()))
        .page(dashboard())
        .page(
            MemoryPage::new(url("/login?logged_out=1"))
                .body("You have been logged out")
                .element(MemoryElement::new("email").locator(Locator::css("input[type='email']"))),
        )
}

fn home(search_results: &'static str) -> MemoryPage {
    MemoryPage::new(url("/"))
        .title("Directory")
        .body("Find local businesses")
        .element(MemoryElement::new("q").locator(Locator::css("input[type='search']")))
        .element(
            MemoryElement::new("search-button")
                .locator(Locator::css("form[role='search'] button"))
                .on_click(move |form| {
                    let query = form.get("q").cloned().unwrap_or_default();
                    if query.contains('\'') {
                        ClickEffect::Navigate(url(search_results))
                    } else if query == "cafe" {
                        ClickEffect::Navigate(url("/search?q=cafe"))
                    } else {
                        ClickEffect::Navigate(url("/search?q=none"))
                    }
                }),
        )
        .element(
            MemoryElement::new("category-restaurants")
                .locator(Locator::css(".category-list a"))
                .text(" Restaurants ")
                .links_to(url("/category/restaurants")),
        )
}

fn card(n: usize) -> MemoryElement {
    MemoryElement::new(format!("card-{}", n)).locator(Locator::css(".business-card"))
}

fn search_site() -> MemorySession {
    MemorySession::new()
        .page(home("/search?q=injected"))
        .page(
            MemoryPage::new(url("/search?q=cafe"))
                .body("3 results for cafe")
                .element(card(1))
                .element(card(2))
                .element(card(3)),
        )
        .page(MemoryPage::new(url("/search?q=none")).body("No results found"))
        .page(MemoryPage::new(url("/search?q=injected")).body("No results found"))
        .page(MemoryPage::new(url("/category/restaurants")).body("Restaurants: 12 businesses"))
}

#[tokio::test]
async fn test_login_success_reaches_dashboard() {
    let mut session = directory_site();
    let fixture = shipped_fixture("login-success").await;
    let (outcome, reporter) = run("login-success", &mut session, &fixture).await;

    assert!(outcome.passed(), "{:?}", messages(&reporter));
    assert_eq!(outcome.summary.passed, 1);
    assert_eq!(session.visited().last().map(String::as_str), Some("http://dir.test/dashboard"));
    assert_eq!(session.close_count(), 1);
}

#[tokio::test]
async fn test_login_invalid_rejection_is_a_pass() {
    let mut session = directory_site();
    let fixture = shipped_fixture("login-invalid").await;
    let (outcome, reporter) = run("login-invalid", &mut session, &fixture).await;

    assert!(outcome.passed(), "{:?}", messages(&reporter));
    assert!(messages(&reporter)[0].contains("Invalid login rejected"));
}

#[tokio::test]
async fn test_login_invalid_fails_when_bad_credentials_work() {
    let accept_all = MemoryElement::new("login-submit")
        .locator(Locator::css("button[type='submit']"))
        .links_to(url("/dashboard"));
    let mut session = MemorySession::new().page(login_page(accept_all)).page(dashboard());
    let fixture = shipped_fixture("login-invalid").await;
    let (outcome, _) = run("login-invalid", &mut session, &fixture).await;

    assert!(!outcome.passed());
    assert_eq!(outcome.summary.failed, 1);
}

#[tokio::test]
async fn test_login_empty_form_shows_validation() {
    let mut session = directory_site();
    let (outcome, reporter) = run("login-empty-form", &mut session, &Fixture::empty()).await;

    assert!(outcome.passed(), "{:?}", messages(&reporter));
    assert!(messages(&reporter)[0].contains("required"));
}

#[tokio::test]
async fn test_login_empty_form_static_hint_is_not_validation() {
    let inert = MemoryElement::new("login-submit").locator(Locator::css("button[type='submit']"));
    let page = login_page(inert).body("Sign in. Email is required");
    let mut session = MemorySession::new().page(page);
    let (outcome, reporter) = run("login-empty-form", &mut session, &Fixture::empty()).await;

    assert_eq!(reporter.records()[0].verdict, Verdict::Warn, "{:?}", messages(&reporter));
    assert!(messages(&reporter)[0].contains("did not change"));
    assert_eq!(outcome.summary.passed, 0);
}

#[tokio::test]
async fn test_login_empty_form_disabled_submit_passes() {
    let disabled = MemoryElement::new("login-submit")
        .locator(Locator::css("button[type='submit']"))
        .disabled();
    let mut session = MemorySession::new().page(login_page(disabled));
    let (outcome, reporter) = run("login-empty-form", &mut session, &Fixture::empty()).await;

    assert!(outcome.passed());
    assert!(messages(&reporter)[0].contains("element is disabled"));
}

#[tokio::test]
async fn test_logout_ends_session() {
    let mut session = directory_site();
    let fixture = shipped_fixture("logout").await;
    let (outcome, reporter) = run("logout", &mut session, &fixture).await;

    assert!(outcome.passed(), "{:?}", messages(&reporter));
    assert_eq!(outcome.summary.passed, 3);
    assert!(session.clicks().contains(&"logout".to_string()));
}

#[tokio::test]
async fn test_failed_login_stops_logout_scenario() {
    let mut session = directory_site();
    let fixture = Fixture::from_value(json!({"email": "user@x.com", "password": "nope"})).unwrap();
    let (outcome, _) = run("logout", &mut session, &fixture).await;

    assert!(outcome.short_circuited);
    assert_eq!(outcome.summary.failed, 1);
    assert!(!session.clicks().contains(&"logout".to_string()));
}

#[tokio::test]
async fn test_password_never_reaches_records() {
    let mut session = directory_site();
    let fixture = Fixture::from_value(json!({"email": "user@x.com", "password": "hunter2-secret"})).unwrap();
    let (_, reporter) = run("login-success", &mut session, &fixture).await;

    assert!(messages(&reporter).iter().all(|m| !m.contains("hunter2-secret")));
}

fn business_form(submit: MemoryElement) -> MemoryPage {
    MemoryPage::new(url("/business/new"))
        .body("List your business")
        .element(MemoryElement::new("name").locator(Locator::css("input[name='name']")))
        .element(MemoryElement::new("description").locator(Locator::css("textarea[name='description']")))
        .element(MemoryElement::new("filter-category").locator(Locator::css("select[name='category']")))
        .element(MemoryElement::new("category").locator(Locator::css("select[name='category']")))
        .element(MemoryElement::new("phone").locator(Locator::css("input[type='tel']")))
        .element(MemoryElement::new("address").locator(Locator::css("input[name='address']")))
        .element(submit)
}

#[tokio::test]
async fn test_business_create_uses_second_category_field() {
    let submit = MemoryElement::new("save")
        .locator(Locator::css("button[type='submit']"))
        .on_click(|form| {
            let filter = form.get("filter-category").cloned().unwrap_or_default();
            let category = form.get("category").cloned().unwrap_or_default();
            if filter.is_empty() && category == "Restaurants" && form.contains_key("phone") {
                ClickEffect::Navigate(url("/business/42"))
            } else {
                ClickEffect::ShowText("Category is invalid".into())
            }
        });
    let mut session = directory_site().page(business_form(submit)).page(
        MemoryPage::new(url("/business/42")).body("Business created: Rusty Spoon Cafe, 12 Harbour Street"),
    );
    let fixture = shipped_fixture("business-create").await;
    let (outcome, reporter) = run("business-create", &mut session, &fixture).await;

    assert!(outcome.passed(), "{:?}", messages(&reporter));
    // login, create, listed
    assert_eq!(outcome.summary.passed, 3);
}

#[tokio::test(start_paused = true)]
async fn test_business_create_waits_past_required_hints() {
    let submit = MemoryElement::new("save")
        .locator(Locator::css("button[type='submit']"))
        .on_click(|_| ClickEffect::Deferred {
            reads: 1,
            effect: Box::new(ClickEffect::Navigate(url("/business/42"))),
        });
    let form = business_form(submit).body("List your business. Name is required. Category is required.");
    let mut session = directory_site()
        .page(form)
        .page(MemoryPage::new(url("/business/42")).body("Business created: Rusty Spoon Cafe"));
    let mut settings = settings();
    settings.timeouts.navigation_ms = 2000;
    let fixture = shipped_fixture("business-create").await;
    let (outcome, reporter) = run_with("business-create", &mut session, &fixture, &settings).await;

    assert!(outcome.passed(), "{:?}", messages(&reporter));
    assert!(messages(&reporter)[1].contains("business created"));
}

#[tokio::test]
async fn test_business_create_in_place_success_keeps_hints() {
    let submit = MemoryElement::new("save")
        .locator(Locator::css("button[type='submit']"))
        .on_click(|_| ClickEffect::ShowText("Name is required. Business created!".into()));
    let form = business_form(submit).body("List your business. Name is required.");
    let mut session = directory_site().page(form);
    let fixture = shipped_fixture("business-create").await;
    let (outcome, reporter) = run("business-create", &mut session, &fixture).await;

    assert!(outcome.passed(), "{:?}", messages(&reporter));
    assert_eq!(outcome.summary.passed, 2);
}

#[tokio::test]
async fn test_business_create_disabled_submit_fails() {
    let submit = MemoryElement::new("save")
        .locator(Locator::css("button[type='submit']"))
        .disabled();
    let mut session = directory_site().page(business_form(submit));
    let fixture = shipped_fixture("business-create").await;
    let (outcome, reporter) = run("business-create", &mut session, &fixture).await;

    assert!(!outcome.passed());
    assert!(messages(&reporter).last().unwrap().contains("could not be submitted"));
}

#[tokio::test]
async fn test_business_edit_renames_listing() {
    let detail = MemoryPage::new(url("/business/1"))
        .body("Rusty Spoon Cafe")
        .element(
            MemoryElement::new("edit")
                .locator(Locator::link_text("Edit"))
                .links_to(url("/business/1/edit")),
        );
    let edit_form = MemoryPage::new(url("/business/1/edit"))
        .element(MemoryElement::new("name").locator(Locator::css("input[name='name']")))
        .element(
            MemoryElement::new("save")
                .locator(Locator::css("button[type='submit']"))
                .on_click(|form| match form.get("name").map(String::as_str) {
                    Some("Rusty Spoon Bistro") => ClickEffect::Navigate(url("/business/1?updated=1")),
                    _ => ClickEffect::ShowText("Name is required".into()),
                }),
        );
    let updated = MemoryPage::new(url("/business/1?updated=1")).body("Business updated. Rusty Spoon Bistro");
    let mut session = directory_site().page(detail).page(edit_form).page(updated);
    let fixture = shipped_fixture("business-edit").await;
    let (outcome, reporter) = run("business-edit", &mut session, &fixture).await;

    assert!(outcome.passed(), "{:?}", messages(&reporter));
    assert_eq!(outcome.summary.passed, 3);
}

#[tokio::test]
async fn test_business_delete_confirms() {
    let detail = MemoryPage::new(url("/business/1"))
        .body("Rusty Spoon Cafe")
        .element(
            MemoryElement::new("delete")
                .locator(Locator::css("button.delete"))
                .links_to(url("/business/1/delete")),
        );
    let confirm = MemoryPage::new(url("/business/1/delete"))
        .body("Really delete Rusty Spoon Cafe?")
        .element(
            MemoryElement::new("confirm")
                .locator(Locator::css("#confirm-delete"))
                .links_to(url("/dashboard?deleted=1")),
        );
    let done = MemoryPage::new(url("/dashboard?deleted=1")).body("Business deleted");
    let mut session = directory_site().page(detail).page(confirm).page(done);
    let fixture = shipped_fixture("business-delete").await;
    let (outcome, reporter) = run("business-delete", &mut session, &fixture).await;

    assert!(outcome.passed(), "{:?}", messages(&reporter));
    assert_eq!(session.clicks().last().map(String::as_str), Some("confirm"));
}

#[tokio::test]
async fn test_search_keyword_lists_results() {
    let mut session = search_site();
    let fixture = shipped_fixture("search-keyword").await;
    let (outcome, reporter) = run("search-keyword", &mut session, &fixture).await;

    assert!(outcome.passed(), "{:?}", messages(&reporter));
    assert_eq!(outcome.summary.passed, 1);
    assert!(session.visited().contains(&url("/search?q=cafe")));
}

fn inert_home() -> MemoryPage {
    MemoryPage::new(url("/"))
        .body("Find local businesses. Browse: Restaurants, Cafes")
        .element(MemoryElement::new("q").locator(Locator::css("input[type='search']")))
        .element(MemoryElement::new("search-button").locator(Locator::css("form[role='search'] button")))
        .element(
            MemoryElement::new("category-restaurants")
                .locator(Locator::css(".category-list a"))
                .text("Restaurants"),
        )
}

#[tokio::test]
async fn test_search_keyword_dead_button_fails() {
    let mut session = MemorySession::new().page(inert_home());
    let fixture = shipped_fixture("search-keyword").await;
    let (outcome, reporter) = run("search-keyword", &mut session, &fixture).await;

    assert!(!outcome.passed(), "{:?}", messages(&reporter));
    assert!(messages(&reporter)[0].contains("did not change the page"));
    assert_eq!(session.visited(), &[url("/")]);
}

#[tokio::test]
async fn test_search_keyword_cards_without_phrase_pass() {
    let mut session = MemorySession::new().page(home("/search?q=injected")).page(
        MemoryPage::new(url("/search?q=cafe"))
            .body("Cafes near you")
            .element(card(1)),
    );
    let fixture = shipped_fixture("search-keyword").await;
    let (outcome, reporter) = run("search-keyword", &mut session, &fixture).await;

    assert!(outcome.passed(), "{:?}", messages(&reporter));
    assert!(messages(&reporter)[0].contains("1 result card(s) shown"));
}

#[tokio::test]
async fn test_search_no_results_is_expected() {
    let mut session = search_site();
    let fixture = shipped_fixture("search-no-results").await;
    let (outcome, reporter) = run("search-no-results", &mut session, &fixture).await;

    assert!(outcome.passed(), "{:?}", messages(&reporter));
    assert!(messages(&reporter)[0].contains("No results reported"));
}

#[tokio::test]
async fn test_category_navigation() {
    let mut session = search_site();
    let fixture = shipped_fixture("category-navigation").await;
    let (outcome, reporter) = run("category-navigation", &mut session, &fixture).await;

    assert!(outcome.passed(), "{:?}", messages(&reporter));
    assert_eq!(outcome.summary.passed, 2);
    assert!(messages(&reporter)[1].contains("'Restaurants'"));
}

#[tokio::test]
async fn test_category_navigation_dead_link_fails() {
    let mut session = MemorySession::new().page(inert_home());
    let (outcome, reporter) = run("category-navigation", &mut session, &Fixture::empty()).await;

    assert!(!outcome.passed(), "{:?}", messages(&reporter));
    assert_eq!(outcome.summary.failed, 1);
    assert!(messages(&reporter)[1].contains("did not change the page"));
}

#[tokio::test]
async fn test_category_navigation_accepts_matching_heading() {
    let home = MemoryPage::new(url("/")).body("Find local businesses").element(
        MemoryElement::new("category-restaurants")
            .locator(Locator::css(".category-list a"))
            .text("Restaurants")
            .links_to(url("/c/7")),
    );
    let listing = MemoryPage::new(url("/c/7"))
        .body("Restaurants\n12 businesses")
        .element(
            MemoryElement::new("heading")
                .locator(Locator::tag_name("h1"))
                .text("Restaurants"),
        );
    let mut session = MemorySession::new().page(home).page(listing);
    let (outcome, reporter) = run("category-navigation", &mut session, &Fixture::empty()).await;

    assert!(outcome.passed(), "{:?}", messages(&reporter));
    assert!(messages(&reporter)[1].contains("heading reads 'Restaurants'"));
}

#[tokio::test]
async fn test_category_navigation_without_links_fails() {
    let mut session = MemorySession::new().page(MemoryPage::new(url("/")).body("Coming soon"));
    let (outcome, _) = run("category-navigation", &mut session, &Fixture::empty()).await;

    assert!(outcome.short_circuited);
    assert_eq!(outcome.summary.failed, 1);
}

#[tokio::test]
async fn test_sql_injection_login_blocked_submit_passes() {
    let disabled = MemoryElement::new("login-submit")
        .locator(Locator::css("button[type='submit']"))
        .disabled();
    let mut session = MemorySession::new().page(login_page(disabled));
    let fixture = shipped_fixture("sql-injection-login").await;
    let (outcome, reporter) = run("sql-injection-login", &mut session, &fixture).await;

    assert!(outcome.passed(), "{:?}", messages(&reporter));
    assert_eq!(session.typed("email"), Some("' OR '1'='1"));
}

#[tokio::test]
async fn test_sql_injection_login_submitted_payload_fails() {
    let mut session = directory_site();
    let fixture = shipped_fixture("sql-injection-login").await;
    let (outcome, reporter) = run("sql-injection-login", &mut session, &fixture).await;

    assert!(!outcome.passed());
    let last = messages(&reporter).pop().unwrap();
    assert!(last.contains("Security vulnerability"), "{}", last);
    assert!(last.contains("was submitted"));
}

#[tokio::test]
async fn test_sql_injection_login_bypass_is_reported() {
    let bypass = MemoryElement::new("login-submit")
        .locator(Locator::css("button[type='submit']"))
        .links_to(url("/dashboard"));
    let mut session = MemorySession::new().page(login_page(bypass)).page(dashboard());
    let fixture = shipped_fixture("sql-injection-login").await;
    let (outcome, reporter) = run("sql-injection-login", &mut session, &fixture).await;

    assert_eq!(outcome.summary.failed, 1);
    assert!(messages(&reporter).pop().unwrap().contains("bypassed login"));
}

#[tokio::test]
async fn test_sql_injection_search_safe_site() {
    let mut session = search_site();
    let fixture = shipped_fixture("sql-injection-search").await;
    let (outcome, reporter) = run("sql-injection-search", &mut session, &fixture).await;

    assert!(outcome.passed(), "{:?}", messages(&reporter));
    assert_eq!(outcome.summary.passed, 2);
}

#[tokio::test]
async fn test_sql_injection_search_reports_every_leak() {
    let mut session = MemorySession::new().page(home("/search?q=leak")).page(
        MemoryPage::new(url("/search?q=leak"))
            .body("You have an error in your SQL syntax near ''1''")
            .element(card(1))
            .element(card(2)),
    );
    let fixture = shipped_fixture("sql-injection-search").await;
    let (outcome, reporter) = run("sql-injection-search", &mut session, &fixture).await;

    // Both checks run even though the first fails.
    assert!(!outcome.short_circuited);
    assert_eq!(outcome.summary.failed, 2, "{:?}", messages(&reporter));
}

fn business_page(contact: Option<MemoryElement>) -> MemorySession {
    let mut page = MemoryPage::new(url("/business/1")).body("Rusty Spoon Cafe");
    if let Some(field) = contact {
        page = page.element(field);
    }
    MemorySession::new().page(page)
}

fn message_field() -> MemoryElement {
    MemoryElement::new("message").locator(Locator::css("textarea[name='message']"))
}

#[tokio::test]
async fn test_unauthenticated_contact_disabled_passes() {
    let mut session = business_page(Some(message_field().disabled()));
    let fixture = shipped_fixture("unauthenticated-contact").await;
    let (outcome, _) = run("unauthenticated-contact", &mut session, &fixture).await;

    assert!(outcome.passed());
    assert_eq!(outcome.summary.passed, 1);
}

#[tokio::test]
async fn test_unauthenticated_contact_enabled_fails() {
    let mut session = business_page(Some(message_field()));
    let fixture = shipped_fixture("unauthenticated-contact").await;
    let (outcome, _) = run("unauthenticated-contact", &mut session, &fixture).await;

    assert_eq!(outcome.summary.failed, 1);
}

#[tokio::test]
async fn test_unauthenticated_contact_missing_form_warns() {
    let mut session = business_page(None);
    let fixture = shipped_fixture("unauthenticated-contact").await;
    let (outcome, reporter) = run("unauthenticated-contact", &mut session, &fixture).await;

    assert!(outcome.passed());
    assert_eq!(reporter.records()[0].verdict, Verdict::Warn);
}

#[tokio::test]
async fn test_unauthenticated_dashboard_asks_for_login() {
    let mut session = MemorySession::new()
        .page(MemoryPage::new(url("/dashboard")).body("Please log in to see your dashboard"));
    let fixture = shipped_fixture("unauthenticated-dashboard").await;
    let (outcome, reporter) = run("unauthenticated-dashboard", &mut session, &fixture).await;

    assert!(outcome.passed(), "{:?}", messages(&reporter));
}

#[tokio::test]
async fn test_unauthenticated_dashboard_shown_fails() {
    let mut session = MemorySession::new().page(dashboard());
    let fixture = shipped_fixture("unauthenticated-dashboard").await;
    let (outcome, reporter) = run("unauthenticated-dashboard", &mut session, &fixture).await;

    assert!(!outcome.passed());
    assert!(messages(&reporter)[0].contains("Dashboard shown without login"));
}

#[tokio::test]
async fn test_every_shipped_fixture_loads() {
    for scenario in scenarios::catalog() {
        let fixture = Fixture::load_for(Path::new(DEFAULT_FIXTURE_DIR), scenario.name()).await;
        assert!(fixture.is_ok(), "{}: {:?}", scenario.name(), fixture.err());
    }
}
