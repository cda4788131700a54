use dirprobe_engine::executor::{Action, ActionResult, Target};
use dirprobe_engine::scenario::{ScenarioContext, ScenarioError};
use dirprobe_engine::{CandidateList, Locator};
use serde::Deserialize;
use tracing::debug;

/// Listing values entered through the business form.
#[derive(Debug, Clone, Deserialize)]
pub struct BusinessData {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub struct BusinessForm;

impl BusinessForm {
    pub const NEW_PATH: &'static str = "/business/new";

    pub fn name_field() -> CandidateList {
        CandidateList::new("business name field", Locator::css("input[name='name']"))
            .or(Locator::css("#business-name"))
            .or(Locator::css("#name"))
            .or(Locator::xpath("//input[contains(@placeholder, 'Name')]"))
    }

    pub fn description_field() -> CandidateList {
        CandidateList::new("business description field", Locator::css("textarea[name='description']"))
            .or(Locator::css("#description"))
            .or(Locator::tag_name("textarea"))
    }

    /// Pages with a category filter render two category fields; the
    /// business category is the second one.
    pub fn category_fields() -> CandidateList {
        CandidateList::new("category fields", Locator::css("select[name='category']"))
            .or(Locator::css("select"))
            .or(Locator::css("input[name='category']"))
    }

    pub fn phone_field() -> CandidateList {
        CandidateList::new("phone field", Locator::css("input[type='tel']"))
            .or(Locator::css("input[name='phone']"))
            .or(Locator::css("#phone"))
    }

    pub fn address_field() -> CandidateList {
        CandidateList::new("address field", Locator::css("input[name='address']"))
            .or(Locator::css("textarea[name='address']"))
            .or(Locator::css("#address"))
    }

    pub fn submit_button() -> CandidateList {
        CandidateList::new("business submit button", Locator::css("button[type='submit']"))
            .or(Locator::css("input[type='submit']"))
            .or(Locator::xpath(
                "//button[contains(., 'Save') or contains(., 'Create') or contains(., 'Submit')]",
            ))
    }

    pub async fn fill(ctx: &mut ScenarioContext<'_>, data: &BusinessData) -> Result<(), ScenarioError> {
        ctx.fill(&Self::name_field(), &data.name).await?;
        if !data.description.is_empty() {
            ctx.fill(&Self::description_field(), &data.description).await?;
        }
        if let Some(category) = &data.category {
            Self::choose_category(ctx, category).await?;
        }
        if let Some(phone) = &data.phone {
            ctx.fill(&Self::phone_field(), phone).await?;
        }
        if let Some(address) = &data.address {
            ctx.fill(&Self::address_field(), address).await?;
        }
        Ok(())
    }

    /// Type into the business category field (the second match when there
    /// are several, otherwise the only one).
    pub async fn choose_category(
        ctx: &mut ScenarioContext<'_>,
        category: &str,
    ) -> Result<ActionResult, ScenarioError> {
        let fields = Self::category_fields();
        let target = match ctx.resolve_at_least(&fields, 2).await.as_found() {
            Some(resolved) => {
                debug!("{} category fields via {}", resolved.count(), resolved.locator());
                Target::Nth(1)
            }
            None => Target::First,
        };
        ctx.act(&fields, target, Action::Type(category.to_string()))
            .await
    }

    pub async fn rename(ctx: &mut ScenarioContext<'_>, name: &str) -> Result<ActionResult, ScenarioError> {
        ctx.fill(&Self::name_field(), name).await
    }

    pub async fn submit(ctx: &mut ScenarioContext<'_>) -> Result<ActionResult, ScenarioError> {
        ctx.click(&Self::submit_button()).await
    }
}

pub struct BusinessDetail;

impl BusinessDetail {
    pub const DEFAULT_PATH: &'static str = "/business/1";

    pub fn edit_button() -> CandidateList {
        CandidateList::new("edit business button", Locator::link_text("Edit"))
            .or(Locator::css("a[href*='/edit']"))
            .or(Locator::xpath("//button[contains(., 'Edit')]"))
    }

    pub fn delete_button() -> CandidateList {
        CandidateList::new("delete business button", Locator::css("button.delete"))
            .or(Locator::css("#delete-business"))
            .or(Locator::xpath("//button[contains(., 'Delete')]"))
    }

    pub fn confirm_button() -> CandidateList {
        CandidateList::new("delete confirmation", Locator::css("#confirm-delete"))
            .or(Locator::css(".modal button.btn-danger"))
            .or(Locator::xpath("//button[contains(., 'Confirm') or contains(., 'Yes')]"))
    }

    pub async fn open(ctx: &mut ScenarioContext<'_>, path: &str) -> Result<(), ScenarioError> {
        ctx.goto(path).await?;
        Ok(())
    }

    pub async fn edit(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
        ctx.click(&Self::edit_button()).await?;
        ctx.require(&BusinessForm::name_field()).await?;
        Ok(())
    }

    /// Press delete and accept the confirmation dialog if one appears.
    /// Returns whether a confirmation was clicked.
    pub async fn delete(ctx: &mut ScenarioContext<'_>) -> Result<bool, ScenarioError> {
        ctx.click(&Self::delete_button()).await?;
        if !ctx.wait_for(&Self::confirm_button()).await.is_found() {
            return Ok(false);
        }
        let confirmed = ctx.click(&Self::confirm_button()).await?;
        Ok(!confirmed.is_skipped())
    }
}
