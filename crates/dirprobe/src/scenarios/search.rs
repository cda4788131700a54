use super::auth::AMBIGUOUS;
use super::phrases;
use crate::pages::SearchBar;
use async_trait::async_trait;
use dirprobe_engine::classifier::OutcomeClassifier;
use dirprobe_engine::executor::ActionResult;
use dirprobe_engine::scenario::{Scenario, ScenarioContext, ScenarioError};
use dirprobe_engine::{PageState, PhraseSet, Verdict};

const RESULTS: &[&str] = &["results for", "results found", "showing"];

const NO_RESULTS: &[&str] = &[
    "no results",
    "nothing found",
    "found 0 results",
    "no businesses found",
    "no matches",
];

fn search_classifier(ctx: &ScenarioContext<'_>) -> OutcomeClassifier {
    OutcomeClassifier::new(
        phrases(ctx, "successPhrases", RESULTS),
        phrases(ctx, "errorPhrases", NO_RESULTS),
    )
    .ambiguous(PhraseSet::new(AMBIGUOUS))
}

/// Open the start page and submit `keyword`, returning the page as it was
/// before submitting. A skipped search is recorded as a failure and stops
/// the scenario.
async fn submit_search(ctx: &mut ScenarioContext<'_>, keyword: &str) -> Result<PageState, ScenarioError> {
    let start = ctx.fixture.str_or("startPath", "/").to_string();
    ctx.goto(&start).await?;
    ctx.require(&SearchBar::input()).await?;
    let before = ctx.page_state().await?;
    if let ActionResult::Skipped(reason) = SearchBar::search(ctx, keyword).await? {
        return Err(ctx
            .abort(Verdict::Fail, &format!("Search could not be submitted: {}", reason))
            .await);
    }
    Ok(before)
}

pub struct SearchKeyword;

#[async_trait]
impl Scenario for SearchKeyword {
    fn name(&self) -> &'static str {
        "search-keyword"
    }

    fn description(&self) -> &'static str {
        "A keyword search lists matching businesses"
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
        let keyword = ctx.fixture.require_str("keyword")?.to_string();
        let before = submit_search(ctx, &keyword).await?;

        let classifier = search_classifier(ctx);
        let Some(outcome) = ctx.await_response(&before, &classifier).await? else {
            return ctx
                .check(Verdict::Fail, &format!("Search '{}' did not change the page", keyword))
                .await;
        };
        let count = SearchBar::result_count(ctx).await;
        ctx.info(&format!("{} result card(s) for '{}'", count, keyword));
        if outcome.verdict == Verdict::Warn && count > 0 {
            return ctx
                .check(Verdict::Pass, &format!("Search '{}': {} result card(s) shown", keyword, count))
                .await;
        }
        ctx.check(outcome.verdict, &format!("Search '{}': {}", keyword, outcome.reason))
            .await
    }
}

pub struct SearchNoResults;

#[async_trait]
impl Scenario for SearchNoResults {
    fn name(&self) -> &'static str {
        "search-no-results"
    }

    fn description(&self) -> &'static str {
        "A nonsense search says nothing was found"
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
        let keyword = ctx.fixture.require_str("keyword")?.to_string();
        let before = submit_search(ctx, &keyword).await?;

        let classifier = search_classifier(ctx);
        let Some(outcome) = ctx.await_response(&before, &classifier).await? else {
            return ctx
                .check(Verdict::Fail, &format!("Search '{}' did not change the page", keyword))
                .await;
        };
        let verdict = outcome.verdict.expecting_rejection();
        let message = match verdict {
            Verdict::Pass => format!("No results reported for '{}': {}", keyword, outcome.reason),
            Verdict::Fail => format!("Nonsense search '{}' returned results: {}", keyword, outcome.reason),
            _ => format!("Could not confirm empty results for '{}': {}", keyword, outcome.reason),
        };
        ctx.check(verdict, &message).await
    }
}
