use log::{info, warn};

use crate::error::GartResult;
use crate::types::BulkReport;

/// Log what a bulk run did and turn failures into the aggregate error.
/// With `verbose`, each ignored directory is listed too.
pub fn check_bulk_report(report: &BulkReport, verbose: bool) -> GartResult<()> {
    info!("Copied {} directories", report.copied.len());
    if !report.ignored.is_empty() {
        info!("Ignored {} directories", report.ignored.len());
        if verbose {
            for p in &report.ignored {
                eprintln!("  ignored: {}", p.display());
            }
        }
    }
    for (path, error) in &report.failed {
        warn!("{}: {}", path.display(), error);
    }
    if !report.cancelled.is_empty() {
        warn!(
            "Cancelled before {} directories were copied",
            report.cancelled.len()
        );
    }
    report.ensure_success()
}
