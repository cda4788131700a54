//! Screenshot artifacts written on failure.

use crate::session::Session;
use chrono::{DateTime, Utc};
use dirprobe_common::DriverError;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Screenshot failed: {0}")]
    Driver(#[from] DriverError),
    #[error("Failed to write screenshot: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes `<label>_<timestamp>.png` files into one output directory.
#[derive(Debug, Clone)]
pub struct ScreenshotCapture {
    output_dir: PathBuf,
}

impl ScreenshotCapture {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Capture the current viewport, creating the output directory if absent.
    pub async fn capture<S: Session + ?Sized>(
        &self,
        session: &mut S,
        label: &str,
    ) -> Result<PathBuf, CaptureError> {
        let bytes = session.screenshot().await?;
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let path = self
            .output_dir
            .join(artifact_file_name(label, Utc::now()));
        tokio::fs::write(&path, &bytes).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}

/// `login-success_step-2_2026-10-17T09-30-00-123Z.png`
pub fn artifact_file_name(label: &str, at: DateTime<Utc>) -> String {
    let label: String = label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let label = if label.is_empty() { "screenshot".to_string() } else { label };

    let stamp = at
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-");
    format!("{}_{}.png", label, stamp)
}
