//! Application state for the notice API

use anyhow::{bail, Result};
use std::path::PathBuf;

const DEFAULT_TEMPLATE: &str = "templates/3day_notice.pdf";

pub struct AppState {
    /// Path to the fillable notice template, shared read-only across runs.
    pub template: PathBuf,
}

impl AppState {
    pub fn new() -> Result<Self> {
        let template = std::env::var("NOTICE_TEMPLATE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_TEMPLATE));

        // Fail at startup rather than on the first upload.
        if !template.is_file() {
            bail!("notice template not found at {}", template.display());
        }

        tracing::info!("Using notice template: {}", template.display());
        Ok(Self { template })
    }
}
