use dirprobe_engine::executor::{Action, ActionError, ActionResult, Target};
use dirprobe_engine::scenario::{ScenarioContext, ScenarioError};
use dirprobe_engine::{CandidateList, Locator};

/// WebDriver key code for Enter.
const ENTER: &str = "\u{E007}";

pub struct SearchBar;

impl SearchBar {
    pub fn input() -> CandidateList {
        CandidateList::new("search input", Locator::css("input[type='search']"))
            .or(Locator::css("input[name='q']"))
            .or(Locator::css("input[name='search']"))
            .or(Locator::css("#search"))
    }

    pub fn submit_button() -> CandidateList {
        CandidateList::new("search button", Locator::css("form[role='search'] button"))
            .or(Locator::css("button.search-button"))
            .or(Locator::xpath("//button[contains(., 'Search')]"))
    }

    pub fn result_items() -> CandidateList {
        CandidateList::new("search results", Locator::css(".business-card"))
            .or(Locator::css(".search-result"))
            .or(Locator::css(".result-item"))
            .or(Locator::css("[data-testid='business-card']"))
    }

    /// Enter `keyword` and submit, pressing Enter when there is no button.
    pub async fn search(ctx: &mut ScenarioContext<'_>, keyword: &str) -> Result<ActionResult, ScenarioError> {
        let filled = ctx.fill(&Self::input(), keyword).await?;
        if filled.is_skipped() {
            return Ok(filled);
        }
        match ctx.perform(&Self::submit_button(), Target::First, Action::Click).await {
            Err(ActionError::NotFound { .. }) => {
                ctx.act(&Self::input(), Target::First, Action::Type(ENTER.to_string()))
                    .await
            }
            Err(e) => Err(e.into()),
            Ok(result) => Ok(result),
        }
    }

    /// Number of result cards on the page (zero when none match).
    pub async fn result_count(ctx: &mut ScenarioContext<'_>) -> usize {
        ctx.resolve(&Self::result_items())
            .await
            .as_found()
            .map(|r| r.count())
            .unwrap_or(0)
    }
}
