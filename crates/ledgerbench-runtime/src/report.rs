use std::fmt::Write as _;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::BatchResult;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format `{other}` (expected text or json)")),
        }
    }
}

/// Where the end-of-batch summary goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportTarget {
    pub path: PathBuf,
    pub format: ReportFormat,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report to {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode report")]
    Encode(#[from] serde_json::Error),
}

pub fn render(result: &BatchResult, format: ReportFormat) -> Result<String, ReportError> {
    match format {
        ReportFormat::Text => {
            let mut out = String::new();
            // Writing to a String cannot fail.
            let _ = writeln!(out, "Performance Results:");
            let _ = writeln!(
                out,
                "Successes: {}, Failures: {}",
                result.success_count, result.failure_count
            );
            let _ = writeln!(
                out,
                "Total Transactions: {}, Duration: {:.2} seconds, TPS: {:.2}",
                result.total_jobs,
                result.duration.as_secs_f64(),
                result.throughput
            );
            Ok(out)
        }
        ReportFormat::Json => {
            let mut out = serde_json::to_string_pretty(result)?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Writes the report, replacing any previous file at the target path.
pub async fn write_report(target: &ReportTarget, result: &BatchResult) -> Result<(), ReportError> {
    let body = render(result, target.format)?;
    tokio::fs::write(&target.path, body)
        .await
        .map_err(|source| ReportError::Io {
            path: target.path.clone(),
            source,
        })
}
