//! Chart pipeline: CSV -> cross-tabulation -> PNG -> static HTML report
//!
//! Everything that can fail without touching the filesystem runs first. If a
//! later step fails, files already written by this run are removed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::chart::{self, ChartError};
use crate::crosstab::{CrossTab, CrossTabError};
use crate::dataset::{Dataset, DatasetError, FieldPair};
use crate::report;

/// Errors that can occur while exporting the chart report
#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    CrossTab(#[from] CrossTabError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ExportError {
    /// Whether the input file could not be found
    pub fn is_input_missing(&self) -> bool {
        match self {
            ExportError::Dataset(e) => e.is_not_found(),
            ExportError::CrossTab(CrossTabError::Dataset(e)) => e.is_not_found(),
            _ => false,
        }
    }
}

/// Where the exported files go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub image: PathBuf,
    pub html: PathBuf,
}

impl Default for ExportPaths {
    fn default() -> Self {
        Self {
            image: PathBuf::from(chart::DEFAULT_IMAGE_FILE),
            html: PathBuf::from(report::DEFAULT_HTML_FILE),
        }
    }
}

/// What an export produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub tiers: Vec<String>,
    pub experience_values: Vec<String>,
    pub records: usize,
}

/// Run the chart pipeline for `input`
pub fn export_chart_report(
    input: &Path,
    fields: &FieldPair,
    paths: &ExportPaths,
) -> Result<ExportSummary, ExportError> {
    let dataset = Dataset::open(input)?;
    let crosstab = CrossTab::from_dataset(&dataset, fields)?;
    let html = report::render_chart_report(&crosstab, &image_src(paths));

    if let Err(e) = chart::render_stacked_bar(&paths.image, &crosstab) {
        remove_partial(&paths.image);
        return Err(e.into());
    }

    if let Err(source) = fs::write(&paths.html, html) {
        remove_partial(&paths.image);
        remove_partial(&paths.html);
        return Err(ExportError::Write {
            path: paths.html.clone(),
            source,
        });
    }

    tracing::info!(
        image = %paths.image.display(),
        html = %paths.html.display(),
        records = crosstab.record_count(),
        "exported chart report"
    );

    Ok(ExportSummary {
        tiers: crosstab.rows().to_vec(),
        experience_values: crosstab.columns().to_vec(),
        records: crosstab.record_count(),
    })
}

/// Image reference relative to the HTML file.
///
/// The bare file name when both files share a directory.
fn image_src(paths: &ExportPaths) -> String {
    let same_dir = paths.image.parent() == paths.html.parent();
    match paths.image.file_name() {
        Some(name) if same_dir => name.to_string_lossy().into_owned(),
        _ => paths.image.display().to_string(),
    }
}

fn remove_partial(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not remove partial output");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths_in(dir: &Path) -> ExportPaths {
        ExportPaths {
            image: dir.join("chart.png"),
            html: dir.join("report.html"),
        }
    }

    #[test]
    fn test_missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());

        let err = export_chart_report(
            &dir.path().join("Employee_cleaned.csv"),
            &FieldPair::default(),
            &paths,
        )
        .unwrap_err();

        assert!(err.is_input_missing());
        assert!(err.to_string().contains("Employee_cleaned.csv"));
        assert!(!paths.image.exists());
        assert!(!paths.html.exists());
    }

    #[test]
    fn test_missing_column_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.csv");
        fs::write(&input, "PaymentTier,Age\n1,30\n").unwrap();
        let paths = paths_in(dir.path());

        let err = export_chart_report(&input, &FieldPair::default(), &paths).unwrap_err();

        assert!(!err.is_input_missing());
        assert!(err.to_string().contains("ExperienceInCurrentDomain"));
        assert!(!paths.image.exists());
        assert!(!paths.html.exists());
    }

    const SAMPLE: &str = "PaymentTier,ExperienceInCurrentDomain\n1,2\n1,2\n1,5\n2,2\n";

    #[test]
    fn test_export_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.csv");
        fs::write(&input, SAMPLE).unwrap();
        let paths = paths_in(dir.path());

        let summary = export_chart_report(&input, &FieldPair::default(), &paths).unwrap();

        assert_eq!(summary.records, 4);
        assert_eq!(summary.tiers, vec!["1", "2"]);
        assert_eq!(summary.experience_values, vec!["2", "5"]);

        let png = fs::read(&paths.image).unwrap();
        assert!(png.starts_with(b"\x89PNG"));

        let html = fs::read_to_string(&paths.html).unwrap();
        assert!(html.contains("src=\"chart.png\""));
    }

    #[test]
    fn test_html_write_failure_removes_image() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.csv");
        fs::write(&input, SAMPLE).unwrap();
        let paths = ExportPaths {
            image: dir.path().join("chart.png"),
            html: dir.path().join("missing-dir").join("report.html"),
        };

        let err = export_chart_report(&input, &FieldPair::default(), &paths).unwrap_err();

        assert!(matches!(err, ExportError::Write { .. }));
        assert!(err.to_string().contains("report.html"));
        assert!(!paths.image.exists());
        assert!(!paths.html.exists());
    }

    #[test]
    fn test_image_src_relative_when_same_dir() {
        assert_eq!(image_src(&ExportPaths::default()), "tier_experience_chart.png");

        let paths = ExportPaths {
            image: PathBuf::from("out/img/chart.png"),
            html: PathBuf::from("out/report.html"),
        };
        assert_eq!(image_src(&paths), "out/img/chart.png");
    }
}
