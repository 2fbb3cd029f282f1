// Report writers for a finished crawl. Both formats render the session's
// records in acceptance order.

pub mod csv;
pub mod pdf;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::AppError;
use crate::models::criteria::{Location, SearchCriteria};
use crate::models::job::JobRecord;

/// Output file name for `criteria`, e.g. `naukri_data_scientist_pune_jobs.csv`.
pub fn file_name(criteria: &SearchCriteria, extension: &str) -> String {
    let location = match &criteria.location {
        Location::All => "all_india".to_string(),
        Location::City(city) => slug(city),
    };
    format!(
        "naukri_{}_{}_jobs.{extension}",
        slug(&criteria.job_title),
        location
    )
}

fn slug(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '/' { '_' } else { c })
        .collect()
}

/// Paths of the reports written by [`write_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    pub csv: PathBuf,
    pub pdf: PathBuf,
}

/// Render both reports and write them into `out_dir`, creating it if needed.
pub async fn write_all(
    out_dir: &Path,
    records: &[JobRecord],
    criteria: &SearchCriteria,
    generated_at: DateTime<Local>,
) -> Result<Written, AppError> {
    tokio::fs::create_dir_all(out_dir).await?;

    let csv_path = out_dir.join(file_name(criteria, "csv"));
    tokio::fs::write(&csv_path, csv::to_bytes(records)?).await?;
    tracing::info!("Data saved to {}", csv_path.display());

    let pdf_path = out_dir.join(file_name(criteria, "pdf"));
    tokio::fs::write(&pdf_path, pdf::to_bytes(records, criteria, generated_at)?).await?;
    tracing::info!("PDF saved to {}", pdf_path.display());

    Ok(Written {
        csv: csv_path,
        pdf: pdf_path,
    })
}
