use crate::error::Result;
use crate::report::CoverageReport;
use std::fs;
use std::path::Path;

/// Write a report as pretty-printed JSON, creating parent directories as needed
pub fn write_report(report: &CoverageReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(report)?)?;
    log::info!(
        "Wrote coverage report ({:.2}% of {} items) to {}",
        report.summary.coverage_percent,
        report.summary.total_items,
        path.display()
    );
    Ok(())
}

/// Load a report written by [`write_report`]
pub fn read_report(path: impl AsRef<Path>) -> Result<CoverageReport> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
