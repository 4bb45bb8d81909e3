//! Row-preserving CSV result file
//!
//! Every input row is written back unchanged, followed by the classification
//! columns. The file is UTF-8 with a byte-order mark so spreadsheet tools
//! detect the encoding.

use super::traits::{BatchReport, OutputHandler, OutputResult};
use crate::input::{skip_reason, InputTable};
use crate::model::ScanResult;
use csv::WriterBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Columns appended to the input header
pub const RESULT_COLUMNS: [&str; 6] = [
    "has_equipment",
    "confidence",
    "score",
    "evidence",
    "status",
    "error",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Returns `<dir>/<input stem><suffix>.csv`
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "results".to_string());
    input.with_file_name(format!("{}{}.csv", stem, suffix))
}

/// Writes the result CSV to a file
pub struct CsvOutput {
    path: PathBuf,
}

impl CsvOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputHandler for CsvOutput {
    fn name(&self) -> &str {
        "csv"
    }

    fn write_report(&self, report: &BatchReport<'_>) -> OutputResult<()> {
        let file = File::create(&self.path)?;
        write_results(BufWriter::new(file), report.table, report.results, report.placeholder)
    }
}

/// Writes the header and one record per input row
///
/// Rows are matched to results by row index, so duplicate clinic names
/// cannot steal each other's results.
pub fn write_results<W: Write>(
    mut writer: W,
    table: &InputTable,
    results: &[ScanResult],
    placeholder: &str,
) -> OutputResult<()> {
    writer.write_all(UTF8_BOM)?;

    let by_row: HashMap<usize, &ScanResult> = results.iter().map(|r| (r.target.row, r)).collect();

    let mut csv = WriterBuilder::new().flexible(true).from_writer(writer);

    let mut header = table.header.clone();
    header.extend(RESULT_COLUMNS.iter().map(|c| c.to_string()));
    csv.write_record(&header)?;

    for (index, row) in table.rows.iter().enumerate() {
        let mut record = row.clone();
        match by_row.get(&index) {
            Some(result) => record.extend(result_fields(result)),
            None => {
                let reason = skip_reason(table.field(index, 1), table.field(index, 2), placeholder);
                record.extend(
                    ["skipped", "SKIP", "0", reason.as_str(), "skipped", ""]
                        .iter()
                        .map(|s| s.to_string()),
                );
            }
        }
        csv.write_record(&record)?;
    }

    csv.flush()?;
    Ok(())
}

fn result_fields(result: &ScanResult) -> [String; 6] {
    let evidence = if result.evidence.is_empty() {
        result.reason.clone()
    } else {
        result.evidence.clone()
    };

    [
        if result.has_equipment { "yes" } else { "no" }.to_string(),
        result.band.to_string(),
        result.score.to_string(),
        evidence,
        result.status().to_string(),
        result.error.clone(),
    ]
}
