use super::auth::{AMBIGUOUS, sign_in};
use super::{no_response, phrases};
use crate::pages::{BusinessData, BusinessDetail, BusinessForm, NavBar};
use async_trait::async_trait;
use dirprobe_engine::classifier::{OutcomeClassifier, UrlRule};
use dirprobe_engine::executor::ActionResult;
use dirprobe_engine::scenario::{Scenario, ScenarioContext, ScenarioError};
use dirprobe_engine::{PhraseSet, Verdict};
use serde::Deserialize;

const SAVE_ERROR: &[&str] = &[
    "error",
    "failed",
    "is required",
    "invalid",
    "could not be saved",
];

const CREATED: &[&str] = &[
    "business created",
    "successfully created",
    "added successfully",
    "listing is live",
];

const UPDATED: &[&str] = &["updated successfully", "changes saved", "business updated"];

const DELETED: &[&str] = &["deleted successfully", "business deleted", "has been removed"];

const DELETE_ERROR: &[&str] = &["error", "failed", "could not delete", "not allowed"];

#[derive(Deserialize)]
struct CreateData {
    business: BusinessData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditData {
    business_path: String,
    new_name: String,
}

/// Record whether `text` shows up on the current page. Missing text is only
/// a warning: listings can paginate or truncate.
async fn check_listed(ctx: &mut ScenarioContext<'_>, text: &str) -> Result<(), ScenarioError> {
    let body = ctx.page_state().await?.body_text.to_lowercase();
    if body.contains(&text.to_lowercase()) {
        ctx.check(Verdict::Pass, &format!("'{}' is shown", text)).await
    } else {
        let url = ctx.current_url().await?;
        ctx.check(Verdict::Warn, &format!("'{}' not visible on {}", text, url))
            .await
    }
}

pub struct BusinessCreate;

#[async_trait]
impl Scenario for BusinessCreate {
    fn name(&self) -> &'static str {
        "business-create"
    }

    fn description(&self) -> &'static str {
        "A signed-in owner can add a business"
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
        let data: CreateData = ctx.fixture.typed()?;
        sign_in(ctx).await?;

        NavBar::open_add_business(ctx).await?;
        let before = ctx.page_state().await?;
        BusinessForm::fill(ctx, &data.business).await?;
        if let ActionResult::Skipped(reason) = BusinessForm::submit(ctx).await? {
            return ctx
                .check(Verdict::Fail, &format!("Business form could not be submitted: {}", reason))
                .await;
        }

        let classifier = OutcomeClassifier::new(
            phrases(ctx, "successPhrases", CREATED),
            phrases(ctx, "errorPhrases", SAVE_ERROR),
        )
        .ambiguous(PhraseSet::new(AMBIGUOUS))
        .url_rule(UrlRule::LeftPath(path_of(&before.url)));
        let outcome = ctx
            .await_response(&before, &classifier)
            .await?
            .unwrap_or_else(|| no_response(Verdict::Fail, "submitting the business form"));
        ctx.check(outcome.verdict, &format!("Create '{}': {}", data.business.name, outcome.reason))
            .await?;

        check_listed(ctx, &data.business.name).await
    }
}

pub struct BusinessEdit;

#[async_trait]
impl Scenario for BusinessEdit {
    fn name(&self) -> &'static str {
        "business-edit"
    }

    fn description(&self) -> &'static str {
        "An owner can rename a business"
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
        let data: EditData = ctx.fixture.typed()?;
        sign_in(ctx).await?;

        BusinessDetail::open(ctx, &data.business_path).await?;
        BusinessDetail::edit(ctx).await?;
        let before = ctx.page_state().await?;
        BusinessForm::rename(ctx, &data.new_name).await?;
        BusinessForm::submit(ctx).await?;

        let classifier = OutcomeClassifier::new(
            phrases(ctx, "successPhrases", UPDATED),
            phrases(ctx, "errorPhrases", SAVE_ERROR),
        )
        .ambiguous(PhraseSet::new(AMBIGUOUS));
        let outcome = ctx
            .await_response(&before, &classifier)
            .await?
            .unwrap_or_else(|| no_response(Verdict::Fail, "saving the new name"));
        ctx.check(outcome.verdict, &format!("Rename to '{}': {}", data.new_name, outcome.reason))
            .await?;

        check_listed(ctx, &data.new_name).await
    }
}

pub struct BusinessDelete;

#[async_trait]
impl Scenario for BusinessDelete {
    fn name(&self) -> &'static str {
        "business-delete"
    }

    fn description(&self) -> &'static str {
        "An owner can delete a business after confirming"
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
        let path = ctx
            .fixture
            .str_or("businessPath", BusinessDetail::DEFAULT_PATH)
            .to_string();
        sign_in(ctx).await?;

        BusinessDetail::open(ctx, &path).await?;
        let before = ctx.page_state().await?;
        if !BusinessDetail::delete(ctx).await? {
            ctx.info("No confirmation dialog appeared");
        }

        let classifier = OutcomeClassifier::new(
            phrases(ctx, "successPhrases", DELETED),
            phrases(ctx, "errorPhrases", DELETE_ERROR),
        )
        .ambiguous(PhraseSet::new(AMBIGUOUS))
        .url_rule(UrlRule::LeftPath(path.clone()));
        let outcome = ctx
            .await_response(&before, &classifier)
            .await?
            .unwrap_or_else(|| no_response(Verdict::Fail, "deleting"));
        ctx.check(outcome.verdict, &format!("Delete {}: {}", path, outcome.reason))
            .await
    }
}

/// Path part of an absolute URL; the URL itself if it has none.
fn path_of(url: &str) -> String {
    url.split_once("://")
        .and_then(|(_, rest)| rest.find('/').map(|i| rest[i..].to_string()))
        .map(|path| path.split(['?', '#']).next().unwrap_or_default().to_string())
        .unwrap_or_else(|| url.to_string())
}
