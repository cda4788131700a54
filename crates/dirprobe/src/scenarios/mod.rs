//! The scenario catalog.
//!
//! Each scenario is one end-to-end flow run in its own browser session.
//! Fixture keys ending in `Phrases` (e.g. `successPhrases`) extend the
//! built-in phrase sets for sites with different wording.

mod auth;
mod business;
mod category;
mod search;
mod security;

use dirprobe_engine::classifier::Classification;
use dirprobe_engine::scenario::{Scenario, ScenarioContext};
use dirprobe_engine::{PhraseSet, Verdict};

pub use auth::{
    LoginEmptyForm, LoginInvalid, LoginSuccess, Logout, UnauthenticatedDashboard,
};
pub use business::{BusinessCreate, BusinessDelete, BusinessEdit};
pub use category::CategoryNavigation;
pub use search::{SearchKeyword, SearchNoResults};
pub use security::{SqlInjectionLogin, SqlInjectionSearch, UnauthenticatedContact};

/// Every scenario, in listing order.
pub fn catalog() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(LoginSuccess),
        Box::new(LoginInvalid),
        Box::new(LoginEmptyForm),
        Box::new(Logout),
        Box::new(BusinessCreate),
        Box::new(BusinessEdit),
        Box::new(BusinessDelete),
        Box::new(SearchKeyword),
        Box::new(SearchNoResults),
        Box::new(CategoryNavigation),
        Box::new(SqlInjectionLogin),
        Box::new(SqlInjectionSearch),
        Box::new(UnauthenticatedContact),
        Box::new(UnauthenticatedDashboard),
    ]
}

pub fn find(name: &str) -> Option<Box<dyn Scenario>> {
    catalog().into_iter().find(|s| s.name() == name)
}

/// Built-in phrases plus any the fixture adds under `key`.
fn phrases(ctx: &ScenarioContext<'_>, key: &str, defaults: &[&str]) -> PhraseSet {
    PhraseSet::new(defaults).with(ctx.fixture.strings(key))
}

/// Outcome for an action the page never reacted to.
fn no_response(verdict: Verdict, action: &str) -> Classification {
    Classification {
        verdict,
        reason: format!("page did not change after {}", action),
        matched: None,
    }
}
