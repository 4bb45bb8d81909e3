use super::{InputError, InputResult};
use crate::config::InputConfig;
use crate::model::Target;
use csv::{ReaderBuilder, Trim};
use encoding_rs::{Encoding, UTF_8};
use std::path::Path;
use tracing::{debug, info};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// The input file as read: header plus every data row, untouched apart from
/// field trimming
///
/// Rows keep their original width; short rows are allowed and simply never
/// become targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl InputTable {
    /// Returns the field at `column` of `row`, or "" when the row is short
    pub fn field(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Builds the crawl targets, see [`select_targets`](super::select_targets)
    pub fn targets(&self, placeholder: &str) -> Vec<Target> {
        super::select_targets(self, placeholder)
    }
}

/// Reads and parses an input file
///
/// # Arguments
///
/// * `path` - The CSV file to read
/// * `config` - Input settings (text encoding)
///
/// # Returns
///
/// * `Ok(InputTable)` - The parsed table
/// * `Err(InputError)` - The file could not be read, decoded or parsed
pub fn read_input(path: &Path, config: &InputConfig) -> InputResult<InputTable> {
    let bytes = std::fs::read(path)?;
    let text = decode_input(&bytes, &config.encoding)?;
    let table = parse_table(&text)?;

    info!(
        "Loaded {} rows from {} (columns: {})",
        table.rows.len(),
        path.display(),
        table.header.join(", ")
    );

    Ok(table)
}

/// Decodes raw input bytes to text
///
/// A UTF-8 byte-order mark wins over the configured encoding, so files
/// re-saved by spreadsheet tools still load. Malformed sequences are
/// replaced rather than rejected.
pub fn decode_input(bytes: &[u8], encoding_label: &str) -> InputResult<String> {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        debug!("UTF-8 byte-order mark found, ignoring configured encoding");
        return Ok(UTF_8.decode_without_bom_handling(rest).0.into_owned());
    }

    let encoding = Encoding::for_label(encoding_label.trim().as_bytes())
        .ok_or_else(|| InputError::UnknownEncoding(encoding_label.to_string()))?;

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!("Input contained byte sequences invalid in {}", encoding.name());
    }

    Ok(text.trim_start_matches('\u{feff}').to_string())
}

/// Parses decoded CSV text into a header and data rows
///
/// Fields are trimmed. Quoted fields may contain commas, doubled quotes and
/// line breaks.
pub fn parse_table(text: &str) -> InputResult<InputTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record?.iter().map(str::to_string).collect(),
        None => return Err(InputError::MissingHeader),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(InputTable { header, rows })
}
