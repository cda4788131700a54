use anyhow::bail;
use clap::Parser;
use dirprobe::cli::{self, Args, Command, RunArgs};
use dirprobe::{DEFAULT_FIXTURE_DIR, scenarios};
use dirprobe_engine::Verdict;
use dirprobe_engine::capture::ScreenshotCapture;
use dirprobe_engine::config::{ConfigLoader, ConfigSource, Settings};
use dirprobe_engine::fixture::Fixture;
use dirprobe_engine::reporter::{OutputHandlers, Reporter};
use dirprobe_engine::scenario::run_scenario;
use dirprobe_wd::WebDriverSession;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the verdict lines.
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let (settings, source) = ConfigLoader::new(args.config.clone()).load().await?;
    match &source {
        ConfigSource::File(path) => info!("Settings from {}", path.display()),
        ConfigSource::Defaults => debug!("No config file found; using defaults"),
    }

    match args.command {
        Command::List => {
            for scenario in scenarios::catalog() {
                println!("{:<28} {}", scenario.name(), scenario.description());
            }
            Ok(())
        }
        Command::Run(run) => {
            let code = run_one(settings, run).await?;
            std::process::exit(code);
        }
    }
}

async fn run_one(settings: Settings, args: RunArgs) -> anyhow::Result<i32> {
    let settings = cli::apply_overrides(settings, &args);
    settings.validate()?;
    let Some(scenario) = scenarios::find(&args.scenario) else {
        bail!(
            "Unknown scenario '{}'. Run `dirprobe list` to see the catalog.",
            args.scenario
        );
    };
    debug!("Settings: {:?}", settings);

    let mut reporter = Reporter::new(OutputHandlers::stdio())
        .with_capture(ScreenshotCapture::new(settings.screenshot_dir.clone()));

    let fixture_dir = settings
        .fixture_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FIXTURE_DIR));
    let fixture = match Fixture::load_for(&fixture_dir, scenario.name()).await {
        Ok(fixture) => fixture,
        Err(e) => {
            reporter.record(Verdict::Error, &e.to_string());
            return Ok(1);
        }
    };

    info!("Target site: {}", settings.base_url);
    let mut session = WebDriverSession::from_settings(&settings);
    let outcome = run_scenario(
        scenario.as_ref(),
        &mut session,
        &mut reporter,
        &fixture,
        &settings,
    )
    .await;

    Ok(cli::exit_code(&outcome, &settings))
}
