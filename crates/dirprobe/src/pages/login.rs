use dirprobe_engine::executor::ActionResult;
use dirprobe_engine::scenario::{ScenarioContext, ScenarioError};
use dirprobe_engine::{CandidateList, Locator};

pub struct LoginPage;

impl LoginPage {
    pub const PATH: &'static str = "/login";

    pub fn email_field() -> CandidateList {
        CandidateList::new("login email field", Locator::css("input[type='email']"))
            .or(Locator::css("input[name='email']"))
            .or(Locator::css("#email"))
            .or(Locator::xpath("//input[contains(@placeholder, 'mail')]"))
    }

    pub fn password_field() -> CandidateList {
        CandidateList::new("login password field", Locator::css("input[type='password']"))
            .or(Locator::css("input[name='password']"))
            .or(Locator::css("#password"))
    }

    pub fn submit_button() -> CandidateList {
        CandidateList::new("login submit button", Locator::css("button[type='submit']"))
            .or(Locator::css("input[type='submit']"))
            .or(Locator::xpath(
                "//button[contains(., 'Log in') or contains(., 'Login') or contains(., 'Sign in')]",
            ))
    }

    pub fn error_banner() -> CandidateList {
        CandidateList::new("login error banner", Locator::css(".alert-danger"))
            .or(Locator::css(".error-message"))
            .or(Locator::css("[role='alert']"))
    }

    pub async fn open(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
        ctx.goto(Self::PATH).await?;
        ctx.require(&Self::email_field()).await?;
        Ok(())
    }

    /// Fill both fields and press submit. Returns the submit click's result,
    /// or the first fill that was skipped.
    pub async fn submit_credentials(
        ctx: &mut ScenarioContext<'_>,
        email: &str,
        password: &str,
    ) -> Result<ActionResult, ScenarioError> {
        let filled = ctx.fill(&Self::email_field(), email).await?;
        if filled.is_skipped() {
            return Ok(filled);
        }
        let filled = ctx.fill(&Self::password_field(), password).await?;
        if filled.is_skipped() {
            return Ok(filled);
        }
        ctx.click(&Self::submit_button()).await
    }
}
