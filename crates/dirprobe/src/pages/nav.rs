use super::BusinessForm;
use dirprobe_engine::executor::ActionResult;
use dirprobe_engine::scenario::{ScenarioContext, ScenarioError};
use dirprobe_engine::{CandidateList, Locator};

pub struct NavBar;

impl NavBar {
    pub fn logout_link() -> CandidateList {
        CandidateList::new("logout link", Locator::link_text("Logout"))
            .or(Locator::link_text("Log out"))
            .or(Locator::css("a[href*='logout']"))
            .or(Locator::xpath(
                "//button[contains(., 'Log out') or contains(., 'Logout') or contains(., 'Sign out')]",
            ))
    }

    pub fn add_business_link() -> CandidateList {
        CandidateList::new("add business link", Locator::link_text("Add Business"))
            .or(Locator::css("a[href*='business/new']"))
            .or(Locator::css("a[href*='add-business']"))
            .or(Locator::xpath("//a[contains(., 'Add Business') or contains(., 'List your business')]"))
    }

    pub async fn logout(ctx: &mut ScenarioContext<'_>) -> Result<ActionResult, ScenarioError> {
        ctx.click(&Self::logout_link()).await
    }

    /// Follow the add-business link, or go straight to the form when the
    /// navigation bar does not offer one.
    pub async fn open_add_business(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
        if ctx.exists(&Self::add_business_link()).await {
            ctx.click(&Self::add_business_link()).await?;
        } else {
            ctx.info("No add-business link; opening the form directly");
            ctx.goto(BusinessForm::NEW_PATH).await?;
        }
        ctx.require(&BusinessForm::name_field()).await?;
        Ok(())
    }
}
