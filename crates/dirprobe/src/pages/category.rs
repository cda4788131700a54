use dirprobe_engine::executor::{Action, Target};
use dirprobe_engine::scenario::{ScenarioContext, ScenarioError};
use dirprobe_engine::{CandidateList, Locator};

pub struct CategoryList;

impl CategoryList {
    pub fn links() -> CandidateList {
        CandidateList::new("category links", Locator::css(".category-list a"))
            .or(Locator::css("a[href*='/category/']"))
            .or(Locator::css("a[href*='/categories/']"))
            .or(Locator::css(".category a"))
    }

    pub fn heading() -> CandidateList {
        CandidateList::new("category heading", Locator::css("h1.category-title"))
            .or(Locator::tag_name("h1"))
    }

    /// How many category links the page lists; zero if none.
    pub async fn count(ctx: &mut ScenarioContext<'_>) -> usize {
        ctx.wait_for(&Self::links())
            .await
            .as_found()
            .map(|r| r.count())
            .unwrap_or(0)
    }

    /// Trimmed text of the page heading, if one is shown.
    pub async fn heading_text(ctx: &mut ScenarioContext<'_>) -> Result<Option<String>, ScenarioError> {
        if !ctx.exists(&Self::heading()).await {
            return Ok(None);
        }
        let text = ctx.read_text(&Self::heading()).await?;
        Ok(Some(text.trim().to_string()))
    }

    /// Click the first category and return its link text.
    pub async fn open_first(ctx: &mut ScenarioContext<'_>) -> Result<String, ScenarioError> {
        let name = ctx.read_text(&Self::links()).await?;
        ctx.act(&Self::links(), Target::First, Action::Click).await?;
        Ok(name.trim().to_string())
    }
}
