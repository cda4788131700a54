use super::{no_response, phrases};
use crate::pages::{LoginPage, NavBar};
use async_trait::async_trait;
use dirprobe_engine::classifier::{Classification, OutcomeClassifier, UrlRule};
use dirprobe_engine::executor::ActionResult;
use dirprobe_engine::scenario::{FailurePolicy, Scenario, ScenarioContext, ScenarioError};
use dirprobe_engine::{PhraseSet, Verdict};
use regex::Regex;

pub(super) const LOGIN_SUCCESS: &[&str] = &[
    "welcome back",
    "logged in successfully",
    "my businesses",
    "dashboard",
    "log out",
    "logout",
];

const LOGIN_ERROR: &[&str] = &[
    "invalid credentials",
    "invalid email or password",
    "incorrect password",
    "login failed",
    "user not found",
    "authentication failed",
];

pub(super) const AMBIGUOUS: &[&str] = &["loading", "please wait", "processing", "redirecting"];

const VALIDATION: &[&str] = &[
    "required",
    "please fill",
    "please enter",
    "cannot be empty",
    "must not be empty",
];

const LOGGED_OUT: &[&str] = &["logged out", "signed out", "see you soon"];

const LOGIN_REQUIRED: &[&str] = &[
    "please log in",
    "please login",
    "login required",
    "sign in to continue",
    "you must be logged in",
    "unauthorized",
];

const DASHBOARD_CONTENT: &[&str] = &["my businesses", "log out", "logout"];

pub(super) fn login_classifier(ctx: &ScenarioContext<'_>) -> OutcomeClassifier {
    OutcomeClassifier::new(
        phrases(ctx, "loginSuccessPhrases", LOGIN_SUCCESS),
        phrases(ctx, "loginErrorPhrases", LOGIN_ERROR),
    )
    .ambiguous(PhraseSet::new(AMBIGUOUS))
    .url_rule(UrlRule::LeftPath(LoginPage::PATH.to_string()))
}

/// Log in with the fixture's `email` and `password` and return the
/// classified result without recording it.
pub(super) async fn attempt_login(ctx: &mut ScenarioContext<'_>) -> Result<Classification, ScenarioError> {
    let email = ctx.fixture.require_str("email")?.to_string();
    let password = ctx.fixture.require_str("password")?.to_string();

    LoginPage::open(ctx).await?;
    let before = ctx.page_state().await?;
    if let ActionResult::Skipped(reason) = LoginPage::submit_credentials(ctx, &email, &password).await? {
        return Err(ctx
            .abort(Verdict::Fail, &format!("Login form not usable: {}", reason))
            .await);
    }

    let classifier = login_classifier(ctx);
    Ok(ctx
        .await_response(&before, &classifier)
        .await?
        .unwrap_or_else(|| no_response(Verdict::Fail, "submitting the login form")))
}

/// Log in as the fixture user, recording the verdict. A failed login stops
/// the scenario.
pub(super) async fn sign_in(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let outcome = attempt_login(ctx).await?;
    let verdict = outcome.verdict;
    let message = format!("Login: {}", outcome.reason);
    if verdict.is_fatal() {
        return Err(ctx.abort(verdict, &message).await);
    }
    ctx.check(verdict, &message).await
}

fn home_or_login() -> Result<Regex, ScenarioError> {
    Regex::new(r"^https?://[^/]+(/|/login/?)?(\?.*)?$").map_err(|e| ScenarioError::Other(e.to_string()))
}

pub struct LoginSuccess;

#[async_trait]
impl Scenario for LoginSuccess {
    fn name(&self) -> &'static str {
        "login-success"
    }

    fn description(&self) -> &'static str {
        "Valid credentials reach the signed-in area"
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
        let outcome = attempt_login(ctx).await?;
        ctx.check(outcome.verdict, &format!("Login with valid credentials: {}", outcome.reason))
            .await
    }
}

pub struct LoginInvalid;

#[async_trait]
impl Scenario for LoginInvalid {
    fn name(&self) -> &'static str {
        "login-invalid"
    }

    fn description(&self) -> &'static str {
        "Bad credentials are rejected with an error"
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
        let email = ctx.fixture.require_str("email")?.to_string();
        let password = ctx.fixture.require_str("password")?.to_string();

        LoginPage::open(ctx).await?;
        let before = ctx.page_state().await?;
        if let ActionResult::Skipped(reason) = LoginPage::submit_credentials(ctx, &email, &password).await? {
            return ctx
                .check(
                    Verdict::Warn,
                    &format!("Submit not clickable ({}); rejection not confirmed", reason),
                )
                .await;
        }

        let classifier = login_classifier(ctx);
        let outcome = ctx
            .await_response(&before, &classifier)
            .await?
            .unwrap_or_else(|| no_response(Verdict::Warn, "submitting the login form"));
        if ctx.exists(&LoginPage::error_banner()).await {
            ctx.info("Error banner is displayed");
        }

        let verdict = outcome.verdict.expecting_rejection();
        let message = match verdict {
            Verdict::Pass => format!("Invalid login rejected: {}", outcome.reason),
            Verdict::Fail => format!("Invalid credentials were accepted: {}", outcome.reason),
            _ => format!("Could not confirm rejection: {}", outcome.reason),
        };
        ctx.check(verdict, &message).await
    }
}

pub struct LoginEmptyForm;

#[async_trait]
impl Scenario for LoginEmptyForm {
    fn name(&self) -> &'static str {
        "login-empty-form"
    }

    fn description(&self) -> &'static str {
        "An empty login form cannot be submitted"
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
        LoginPage::open(ctx).await?;
        let before = ctx.page_state().await?;
        ctx.fill(&LoginPage::email_field(), "").await?;
        ctx.fill(&LoginPage::password_field(), "").await?;

        let clicked = ctx.click(&LoginPage::submit_button()).await?;
        if let ActionResult::Skipped(reason) = clicked {
            return ctx
                .check(Verdict::Pass, &format!("Submit blocked for empty form ({})", reason))
                .await;
        }

        // New validation text, or a reload that stays on the login page,
        // means the form was not accepted. Signed-in content means it was.
        let classifier = OutcomeClassifier::new(
            phrases(ctx, "successPhrases", VALIDATION),
            PhraseSet::new(LOGIN_SUCCESS),
        )
        .url_rule(UrlRule::ReachedPath(LoginPage::PATH.to_string()));
        let outcome = ctx
            .await_response(&before, &classifier)
            .await?
            .unwrap_or_else(|| no_response(Verdict::Warn, "submitting an empty form"));
        ctx.check(outcome.verdict, &format!("Empty form submission: {}", outcome.reason))
            .await
    }
}

pub struct Logout;

#[async_trait]
impl Scenario for Logout {
    fn name(&self) -> &'static str {
        "logout"
    }

    fn description(&self) -> &'static str {
        "Logging out ends the session"
    }

    fn policy(&self) -> FailurePolicy {
        FailurePolicy::Continue
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
        sign_in(ctx).await?;

        let before = ctx.page_state().await?;
        if let ActionResult::Skipped(reason) = NavBar::logout(ctx).await? {
            return Err(ctx
                .abort(Verdict::Fail, &format!("Logout control not usable: {}", reason))
                .await);
        }

        let classifier = OutcomeClassifier::new(
            phrases(ctx, "successPhrases", LOGGED_OUT),
            PhraseSet::empty(),
        )
        .url_rule(UrlRule::Matches(home_or_login()?));
        let outcome = ctx
            .await_response(&before, &classifier)
            .await?
            .unwrap_or_else(|| no_response(Verdict::Fail, "clicking logout"));
        ctx.check(outcome.verdict, &format!("Logout: {}", outcome.reason))
            .await?;

        let still_there = ctx.exists(&NavBar::logout_link()).await;
        ctx.check(
            Verdict::from_bool(!still_there),
            if still_there {
                "Logout control still shown after logout"
            } else {
                "Logout control gone after logout"
            },
        )
        .await
    }
}

pub struct UnauthenticatedDashboard;

#[async_trait]
impl Scenario for UnauthenticatedDashboard {
    fn name(&self) -> &'static str {
        "unauthenticated-dashboard"
    }

    fn description(&self) -> &'static str {
        "The dashboard requires a login"
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
        let path = ctx.fixture.str_or("dashboardPath", "/dashboard").to_string();
        ctx.goto(&path).await?;

        let classifier = OutcomeClassifier::new(
            phrases(ctx, "successPhrases", LOGIN_REQUIRED),
            phrases(ctx, "errorPhrases", DASHBOARD_CONTENT),
        )
        .url_rule(UrlRule::ReachedPath(LoginPage::PATH.to_string()));
        let outcome = ctx.await_outcome(&classifier).await?;
        let message = match outcome.verdict {
            Verdict::Fail => format!("Dashboard shown without login: {}", outcome.reason),
            _ => format!("Dashboard access without login: {}", outcome.reason),
        };
        ctx.check(outcome.verdict, &message).await
    }
}
