// Export module - writes the finished report out for whatever draws the charts
// JSON only; the plotting/PDF side reads it from there

use crate::report::Report;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

pub struct ExportManager;

impl ExportManager {
    pub fn new() -> Self {
        Self
    }

    pub fn export_to_json<P: AsRef<Path>>(&self, report: &Report, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(report)?;
        fs::write(path, content)
            .with_context(|| format!("Could not write report to {}", path.display()))?;

        info!("Exported report to {}", path.display());
        Ok(())
    }
}

impl Default for ExportManager {
    fn default() -> Self {
        Self::new()
    }
}
