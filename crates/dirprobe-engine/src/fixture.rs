//! Scenario fixtures: one `testData.json` object per scenario.

use dirprobe_common::formatter::is_sensitive_key;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const FIXTURE_FILE: &str = "testData.json";

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed fixture {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Fixture {0} is not a JSON object")]
    NotAnObject(PathBuf),
    #[error("Fixture is missing required key '{0}'")]
    MissingKey(String),
    #[error("Fixture does not match the expected shape: {0}")]
    Shape(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fixture {
    values: Map<String, Value>,
}

impl Fixture {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(values) => Some(Self { values }),
            _ => None,
        }
    }

    pub async fn load(path: &Path) -> Result<Self, FixtureError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| FixtureError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let value: Value = serde_json::from_str(&content).map_err(|source| FixtureError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_value(value).ok_or_else(|| FixtureError::NotAnObject(path.to_path_buf()))
    }

    /// Load `<fixture_dir>/<scenario>/testData.json`. A scenario without a
    /// fixture file gets an empty fixture.
    pub async fn load_for(fixture_dir: &Path, scenario: &str) -> Result<Self, FixtureError> {
        let path = fixture_dir.join(scenario).join(FIXTURE_FILE);
        if !path.exists() {
            return Ok(Self::empty());
        }
        Self::load(&path).await
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.str(key).unwrap_or(default)
    }

    pub fn require_str(&self, key: &str) -> Result<&str, FixtureError> {
        self.str(key)
            .ok_or_else(|| FixtureError::MissingKey(key.to_string()))
    }

    /// String array under `key`, or empty.
    pub fn strings(&self, key: &str) -> Vec<String> {
        self.values
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Deserialize the whole fixture into a scenario-specific shape.
    pub fn typed<T: DeserializeOwned>(&self) -> Result<T, FixtureError> {
        Ok(serde_json::from_value(Value::Object(self.values.clone()))?)
    }

    /// String values stored under password-like keys, at any depth.
    pub fn secrets(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_secrets(&self.values, &mut out);
        out
    }
}

fn collect_secrets(map: &Map<String, Value>, out: &mut Vec<String>) {
    for (key, value) in map {
        match value {
            Value::String(s) if is_sensitive_key(key) => out.push(s.clone()),
            Value::Object(inner) => collect_secrets(inner, out),
            _ => {}
        }
    }
}
