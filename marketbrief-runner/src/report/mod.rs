//! Report rendering and artifact writing.
//!
//! A brief produces two files under `{output_dir}/{YYYY-MM-DD}/`:
//! - `report.md`: the rendered report
//! - `data_{YYYY-MM-DD}.json`: the brief itself as pretty JSON

pub mod markdown;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::brief::DailyBrief;

pub use markdown::MarkdownRenderer;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to format report: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("failed to serialize brief: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Turns a brief into report text.
///
/// The Markdown template is the local implementation; other renderers (a
/// text-generation service, an HTML template) plug in here.
pub trait ReportRenderer: Send + Sync {
    fn render(&self, brief: &DailyBrief) -> Result<String, ReportError>;
}

/// Paths of the files written for one brief.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub dir: PathBuf,
    pub report: PathBuf,
    pub data: PathBuf,
}

impl ReportPaths {
    pub fn for_date(output_dir: &Path, date: chrono::NaiveDate) -> Self {
        let stamp = date.format("%Y-%m-%d").to_string();
        let dir = output_dir.join(&stamp);
        Self {
            report: dir.join("report.md"),
            data: dir.join(format!("data_{stamp}.json")),
            dir,
        }
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), ReportError> {
    std::fs::write(path, contents).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the rendered report and the JSON sidecar. Existing files for the
/// same date are overwritten.
pub fn write_report(
    output_dir: &Path,
    brief: &DailyBrief,
    markdown: &str,
) -> Result<ReportPaths, ReportError> {
    let paths = ReportPaths::for_date(output_dir, brief.date);
    std::fs::create_dir_all(&paths.dir).map_err(|source| ReportError::Io {
        path: paths.dir.clone(),
        source,
    })?;

    write_file(&paths.report, markdown)?;
    let json = serde_json::to_string_pretty(brief)?;
    write_file(&paths.data, &json)?;

    info!(
        report = %paths.report.display(),
        data = %paths.data.display(),
        "wrote brief"
    );
    Ok(paths)
}

/// Render with `renderer`, then write both files.
pub fn render_and_write(
    renderer: &dyn ReportRenderer,
    output_dir: &Path,
    brief: &DailyBrief,
) -> Result<ReportPaths, ReportError> {
    let text = renderer.render(brief)?;
    write_report(output_dir, brief, &text)
}
