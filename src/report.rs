use crate::error::FailureKind;
use crate::processing::{ImageOutcome, ImageResult};
use crate::utils::{format_file_size, reduction_ratio, truncate_name};
use std::fmt;
use std::path::PathBuf;

const NAME_WIDTH: usize = 30;
const SIZE_WIDTH: usize = 15;
const TABLE_WIDTH: usize = 80;

#[derive(Debug, Clone, PartialEq)]
pub enum EntryDetail {
    Compressed { compressed_size: u64 },
    Failed { kind: FailureKind, message: String },
}

/// One row of the report, in traversal order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub source_path: PathBuf,
    pub original_size: u64,
    pub detail: EntryDetail,
}

impl ReportEntry {
    /// Percentage removed from this file, `None` for failures.
    pub fn reduction_percent(&self) -> Option<f64> {
        match self.detail {
            EntryDetail::Compressed { compressed_size } => {
                Some(reduction_ratio(self.original_size, compressed_size) * 100.0)
            }
            EntryDetail::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompressionReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Sum over successful files only.
    pub total_original: u64,
    /// Sum over successful files only.
    pub total_compressed: u64,
    pub entries: Vec<ReportEntry>,
}

impl CompressionReport {
    /// `1 - total_compressed / total_original`, or 0 when nothing succeeded.
    pub fn reduction_ratio(&self) -> f64 {
        reduction_ratio(self.total_original, self.total_compressed)
    }

    pub fn is_empty(&self) -> bool {
        self.attempted == 0
    }
}

/// Builds a [`CompressionReport`] as results arrive.
#[derive(Debug, Default)]
pub struct ReportAggregator {
    report: CompressionReport,
}

impl ReportAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &ImageResult) {
        let report = &mut self.report;
        report.attempted += 1;

        let detail = match result.outcome() {
            ImageOutcome::Success { compressed_size } => {
                report.succeeded += 1;
                report.total_original += result.original_size();
                report.total_compressed += *compressed_size;
                EntryDetail::Compressed {
                    compressed_size: *compressed_size,
                }
            }
            ImageOutcome::Failed { kind, message } => {
                report.failed += 1;
                EntryDetail::Failed {
                    kind: *kind,
                    message: message.clone(),
                }
            }
        };

        report.entries.push(ReportEntry {
            source_path: result.source_path().to_path_buf(),
            original_size: result.original_size(),
            detail,
        });
    }

    pub fn finish(self) -> CompressionReport {
        self.report
    }
}

pub fn finalize(results: &[ImageResult]) -> CompressionReport {
    let mut aggregator = ReportAggregator::new();
    for result in results {
        aggregator.record(result);
    }
    aggregator.finish()
}

impl fmt::Display for CompressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(TABLE_WIDTH))?;
        writeln!(
            f,
            "{:<nw$} {:<sw$} {:<sw$} {:<10}",
            "FILE",
            "ORIGINAL",
            "FINAL",
            "REDUCTION",
            nw = NAME_WIDTH,
            sw = SIZE_WIDTH
        )?;
        writeln!(f, "{}", "-".repeat(TABLE_WIDTH))?;

        for entry in &self.entries {
            let name = entry
                .source_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| entry.source_path.to_string_lossy().into_owned());
            let name = truncate_name(&name, NAME_WIDTH);

            match &entry.detail {
                EntryDetail::Compressed { compressed_size } => writeln!(
                    f,
                    "{:<nw$} {:<sw$} {:<sw$} {:.2}%",
                    name,
                    format_file_size(entry.original_size),
                    format_file_size(*compressed_size),
                    entry.reduction_percent().unwrap_or_default(),
                    nw = NAME_WIDTH,
                    sw = SIZE_WIDTH
                )?,
                EntryDetail::Failed { kind, .. } => writeln!(
                    f,
                    "{:<nw$} {:<sw$} {:<sw$} {}",
                    name,
                    format_file_size(entry.original_size),
                    "-",
                    kind,
                    nw = NAME_WIDTH,
                    sw = SIZE_WIDTH
                )?,
            }
        }

        writeln!(f, "{}", "-".repeat(TABLE_WIDTH))?;
        writeln!(
            f,
            "{:<nw$} {:<sw$} {:<sw$} {:.2}%",
            "TOTAL",
            format_file_size(self.total_original),
            format_file_size(self.total_compressed),
            self.reduction_ratio() * 100.0,
            nw = NAME_WIDTH,
            sw = SIZE_WIDTH
        )?;
        writeln!(f, "{}", "=".repeat(TABLE_WIDTH))?;
        write!(
            f,
            "Files: {} attempted, {} succeeded, {} failed",
            self.attempted, self.succeeded, self.failed
        )
    }
}
