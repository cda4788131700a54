use dirprobe_engine::config::{BrowserKind, ConfigError, ConfigLoader, ConfigSource, Settings};
use std::fs;
use std::time::Duration;

#[tokio::test]
async fn test_partial_yaml_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dirprobe.yaml");
    fs::write(
        &path,
        "base_url: https://staging.example.com/\nbrowser: firefox\ntimeouts:\n  element_ms: 500\n",
    )
    .unwrap();

    let settings = ConfigLoader::load_from(&path).await.unwrap();

    assert_eq!(settings.browser, BrowserKind::Firefox);
    assert_eq!(settings.timeouts.element(), Duration::from_millis(500));
    assert_eq!(settings.timeouts.navigation(), Duration::from_secs(15));
    assert!(settings.exit_on_failure);
    assert_eq!(settings.url("/login"), "https://staging.example.com/login");
}

#[tokio::test]
async fn test_invalid_yaml_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dirprobe.yaml");
    fs::write(&path, "timeouts: [not, a, map]\n").unwrap();

    assert!(ConfigLoader::load_from(&path).await.is_err());
}

#[test]
fn test_url_joining() {
    let settings = Settings::default();
    assert_eq!(settings.url(""), "http://localhost:3000");
    assert_eq!(settings.url("search?q=pizza"), "http://localhost:3000/search?q=pizza");
    assert_eq!(settings.url("/dashboard"), "http://localhost:3000/dashboard");
}

#[test]
fn test_browser_kind_parsing() {
    assert_eq!("Chrome".parse::<BrowserKind>(), Ok(BrowserKind::Chrome));
    assert_eq!("chromium".parse::<BrowserKind>(), Ok(BrowserKind::Chrome));
    assert_eq!("firefox".parse::<BrowserKind>(), Ok(BrowserKind::Firefox));
    assert!("safari".parse::<BrowserKind>().is_err());
}

#[tokio::test]
async fn test_local_file_beats_home_file() {
    let work = tempfile::tempdir().unwrap();
    let home = tempfile::tempdir().unwrap();
    fs::create_dir(home.path().join(".dirprobe")).unwrap();
    fs::write(home.path().join(".dirprobe/config.yaml"), "browser: firefox\n").unwrap();

    let loader = ConfigLoader::in_dirs(None, work.path(), Some(home.path()));
    let (settings, source) = loader.load().await.unwrap();
    assert_eq!(settings.browser, BrowserKind::Firefox);
    assert_eq!(source, ConfigSource::File(home.path().join(".dirprobe/config.yaml")));

    fs::write(work.path().join("dirprobe.yaml"), "headless: true\n").unwrap();
    let (settings, source) = loader.load().await.unwrap();
    assert_eq!(settings.browser, BrowserKind::Chrome);
    assert!(settings.headless);
    assert_eq!(source, ConfigSource::File(work.path().join("dirprobe.yaml")));
}

#[tokio::test]
async fn test_explicit_path_skips_search() {
    let work = tempfile::tempdir().unwrap();
    fs::write(work.path().join("dirprobe.yaml"), "headless: true\n").unwrap();
    let explicit = work.path().join("ci.yaml");
    fs::write(&explicit, "driver_port: 4444\n").unwrap();

    let loader = ConfigLoader::in_dirs(Some(explicit.clone()), work.path(), None);
    let (settings, source) = loader.load().await.unwrap();

    assert_eq!(settings.driver_port, 4444);
    assert!(!settings.headless);
    assert_eq!(source, ConfigSource::File(explicit));
}

#[tokio::test]
async fn test_missing_explicit_path_is_an_error() {
    let work = tempfile::tempdir().unwrap();
    let loader = ConfigLoader::in_dirs(Some(work.path().join("nope.yaml")), work.path(), None);

    assert!(matches!(loader.load().await, Err(ConfigError::Missing(_))));
}

#[tokio::test]
async fn test_no_file_means_defaults() {
    let work = tempfile::tempdir().unwrap();
    let loader = ConfigLoader::in_dirs(None, work.path(), None);

    assert_eq!(loader.search_paths(), vec![work.path().join("dirprobe.yaml")]);
    let (settings, source) = loader.load().await.unwrap();
    assert_eq!(source, ConfigSource::Defaults);
    assert!(settings.validate().is_ok());
}

#[test]
fn test_validate_rejects_unusable_settings() {
    let no_scheme = Settings {
        base_url: "localhost:3000".into(),
        ..Settings::default()
    };
    assert!(matches!(
        no_scheme.validate(),
        Err(ConfigError::Invalid { key: "base_url", .. })
    ));

    let no_host = Settings {
        base_url: "https://".into(),
        ..Settings::default()
    };
    assert!(no_host.validate().is_err());

    let mut busy_loop = Settings::default();
    busy_loop.timeouts.poll_interval_ms = 0;
    assert!(matches!(
        busy_loop.validate(),
        Err(ConfigError::Invalid { key: "timeouts.poll_interval_ms", .. })
    ));

    let remote = Settings {
        webdriver_url: Some("http://grid:4444".into()),
        driver_port: 0,
        ..Settings::default()
    };
    assert!(remote.validate().is_ok());
}
