use super::auth::AMBIGUOUS;
use super::phrases;
use crate::pages::CategoryList;
use async_trait::async_trait;
use dirprobe_engine::classifier::{OutcomeClassifier, UrlRule};
use dirprobe_engine::scenario::{Scenario, ScenarioContext, ScenarioError};
use dirprobe_engine::{PhraseSet, Verdict};

const NOT_FOUND: &[&str] = &["page not found", "404", "something went wrong"];

pub struct CategoryNavigation;

#[async_trait]
impl Scenario for CategoryNavigation {
    fn name(&self) -> &'static str {
        "category-navigation"
    }

    fn description(&self) -> &'static str {
        "Category links open their category page"
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
        let start = ctx.fixture.str_or("startPath", "/").to_string();
        ctx.goto(&start).await?;

        let count = CategoryList::count(ctx).await;
        if count == 0 {
            return Err(ctx.abort(Verdict::Fail, "No category links listed").await);
        }
        ctx.check(Verdict::Pass, &format!("{} category link(s) listed", count))
            .await?;

        let before = ctx.page_state().await?;
        let name = CategoryList::open_first(ctx).await?;
        let classifier = OutcomeClassifier::new(
            phrases(ctx, "successPhrases", &[]),
            phrases(ctx, "errorPhrases", NOT_FOUND),
        )
        .ambiguous(PhraseSet::new(AMBIGUOUS))
        .url_rule(UrlRule::ReachedPath("/categor".to_string()));
        let Some(outcome) = ctx.await_response(&before, &classifier).await? else {
            return ctx
                .check(
                    Verdict::Fail,
                    &format!("Open category '{}': link did not change the page", name),
                )
                .await;
        };

        // Category pages outside a /categor... path still name the category
        // in their heading.
        if outcome.verdict == Verdict::Warn {
            if let Some(heading) = CategoryList::heading_text(ctx).await? {
                if heading.to_lowercase().contains(&name.to_lowercase()) {
                    return ctx
                        .check(
                            Verdict::Pass,
                            &format!("Open category '{}': heading reads '{}'", name, heading),
                        )
                        .await;
                }
            }
        }
        ctx.check(outcome.verdict, &format!("Open category '{}': {}", name, outcome.reason))
            .await
    }
}
