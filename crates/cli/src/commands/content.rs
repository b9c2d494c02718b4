//! Storefront data file commands.

use tracing::{error, info};

use marom_admin::config::AdminConfig;
use marom_admin::content::ContentStore;

/// Strictly parse every data file and log its record count.
///
/// # Errors
///
/// Returns an error naming how many files failed to load.
pub async fn verify(config: &AdminConfig) -> Result<(), Box<dyn std::error::Error>> {
    let content = ContentStore::new(config.data_dir());
    info!(dir = %content.data_dir().display(), "Verifying data files");

    let reports = content.verify().await;
    let mut failed = 0;
    for report in &reports {
        match &report.result {
            Ok(count) => info!(file = %report.path.display(), entries = *count, "{} OK", report.label),
            Err(e) => {
                error!(file = %report.path.display(), "{}: {e}", report.label);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} of {} data files failed to load", reports.len()).into());
    }
    Ok(())
}

/// Create missing data files with empty collections.
///
/// # Errors
///
/// Returns an error if a file cannot be written.
pub async fn init(config: &AdminConfig) -> Result<(), Box<dyn std::error::Error>> {
    let content = ContentStore::new(config.data_dir());
    let created = content.init().await?;

    if created.is_empty() {
        info!("All data files already exist");
    }
    for path in created {
        info!(file = %path.display(), "Created");
    }
    Ok(())
}
