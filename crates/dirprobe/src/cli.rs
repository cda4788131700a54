use clap::{Args as ClapArgs, Parser, Subcommand};
use dirprobe_engine::config::{BrowserKind, CONFIG_ENV, Settings};
use dirprobe_engine::scenario::ScenarioOutcome;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dirprobe", version, about = "Business-directory UI test runner")]
pub struct Args {
    /// Config file (defaults to ./dirprobe.yaml, then ~/.dirprobe/config.yaml)
    #[arg(long, global = true, env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List scenarios
    List,
    /// Run one scenario in a fresh browser session
    Run(RunArgs),
}

#[derive(ClapArgs, Debug, Default)]
pub struct RunArgs {
    /// Scenario name, see `dirprobe list`
    pub scenario: String,

    #[arg(long, env = "DIRPROBE_BASE_URL")]
    pub base_url: Option<String>,

    /// External WebDriver endpoint; a local driver is launched when unset
    #[arg(long, env = "DIRPROBE_WEBDRIVER_URL")]
    pub webdriver_url: Option<String>,

    /// chrome or firefox
    #[arg(long)]
    pub browser: Option<BrowserKind>,

    #[arg(long)]
    pub headless: bool,

    /// Screenshot directory
    #[arg(long)]
    pub screenshots: Option<PathBuf>,

    /// Fixture directory holding `<scenario>/testData.json`
    #[arg(long)]
    pub fixtures: Option<PathBuf>,
}

/// Command-line values win over the config file.
pub fn apply_overrides(mut settings: Settings, args: &RunArgs) -> Settings {
    if let Some(url) = &args.base_url {
        settings.base_url = url.clone();
    }
    if let Some(url) = &args.webdriver_url {
        settings.webdriver_url = Some(url.clone());
    }
    if let Some(browser) = args.browser {
        settings.browser = browser;
    }
    if args.headless {
        settings.headless = true;
    }
    if let Some(dir) = &args.screenshots {
        settings.screenshot_dir = dir.clone();
    }
    if let Some(dir) = &args.fixtures {
        settings.fixture_dir = Some(dir.clone());
    }
    settings
}

pub fn exit_code(outcome: &ScenarioOutcome, settings: &Settings) -> i32 {
    if settings.exit_on_failure && !outcome.passed() {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirprobe_engine::reporter::Summary;

    fn outcome(summary: Summary) -> ScenarioOutcome {
        ScenarioOutcome {
            scenario: "login-success".into(),
            summary,
            short_circuited: false,
            error: None,
        }
    }

    #[test]
    fn test_parse_run() {
        let args = Args::parse_from([
            "dirprobe",
            "run",
            "login-success",
            "--base-url",
            "http://dir.test",
            "--browser",
            "firefox",
            "--headless",
            "-v",
        ]);
        assert!(args.verbose);
        match args.command {
            Command::Run(run) => {
                assert_eq!(run.scenario, "login-success");
                assert_eq!(run.base_url.as_deref(), Some("http://dir.test"));
                assert_eq!(run.browser, Some(BrowserKind::Firefox));
                assert!(run.headless);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let file = Settings {
            base_url: "http://from-file".into(),
            ..Settings::default()
        };
        let args = RunArgs {
            scenario: "logout".into(),
            base_url: Some("http://from-cli".into()),
            screenshots: Some(PathBuf::from("/tmp/shots")),
            ..RunArgs::default()
        };
        let settings = apply_overrides(file, &args);
        assert_eq!(settings.base_url, "http://from-cli");
        assert_eq!(settings.screenshot_dir, PathBuf::from("/tmp/shots"));
        assert!(settings.webdriver_url.is_none());
        assert!(!settings.headless);
    }

    #[test]
    fn test_config_flag_is_global() {
        let args = Args::parse_from(["dirprobe", "list", "--config", "ci.yaml"]);
        assert_eq!(args.config, Some(PathBuf::from("ci.yaml")));
        assert!(matches!(args.command, Command::List));
    }

    #[test]
    fn test_overrides_are_validated_after_merge() {
        let args = RunArgs {
            scenario: "logout".into(),
            base_url: Some("dir.test".into()),
            ..RunArgs::default()
        };
        assert!(apply_overrides(Settings::default(), &args).validate().is_err());

        let args = RunArgs {
            base_url: Some("https://dir.test".into()),
            ..args
        };
        assert!(apply_overrides(Settings::default(), &args).validate().is_ok());
    }

    #[test]
    fn test_exit_code() {
        let settings = Settings::default();
        let clean = Summary {
            passed: 2,
            warned: 1,
            ..Summary::default()
        };
        let failed = Summary {
            failed: 1,
            ..Summary::default()
        };
        assert_eq!(exit_code(&outcome(clean), &settings), 0);
        assert_eq!(exit_code(&outcome(failed), &settings), 1);

        let lenient = Settings {
            exit_on_failure: false,
            ..Settings::default()
        };
        assert_eq!(exit_code(&outcome(failed), &lenient), 0);
    }
}
