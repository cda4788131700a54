use dirprobe_engine::executor::{Action, ActionError, ActionResult, Target};
use dirprobe_engine::scenario::{ScenarioContext, ScenarioError};
use dirprobe_engine::{CandidateList, Locator};

pub struct ContactForm;

impl ContactForm {
    pub fn message_field() -> CandidateList {
        CandidateList::new("contact message field", Locator::css("textarea[name='message']"))
            .or(Locator::css("#contact-message"))
            .or(Locator::css("form.contact-form textarea"))
            .or(Locator::css("form#contact textarea"))
    }

    /// Whether the message field accepts input; `None` when the page has no
    /// contact form at all.
    pub async fn message_enabled(ctx: &mut ScenarioContext<'_>) -> Result<Option<bool>, ScenarioError> {
        match ctx
            .perform(&Self::message_field(), Target::First, Action::IsEnabled)
            .await
        {
            Ok(ActionResult::Flag(enabled)) => Ok(Some(enabled)),
            Ok(_) => Ok(None),
            Err(ActionError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
