//! Loaders for the activity classification table.
//!
//! ## CSV export
//!
//! The first row is a header and is not interpreted. Each following row holds
//! the code in the first column and the name in the second; further columns
//! are ignored. The delimiter is `,` or `;`, detected from the header row, and
//! cells may be quoted.
//!
//! ```csv
//! code;name
//! "01.11";"Выращивание зерновых культур"
//! "62.01";"Разработка компьютерного программного обеспечения"
//! ```
//!
//! ## Lookup-service response
//!
//! ```json
//! {"items": [{"code": "62.01", "name": "Разработка ПО"}], "count": 1}
//! ```
//!
//! Rows with a blank code or name, or a code that is not a dot-delimited
//! numeric hierarchy (`01`, `01.1`, `01.11.2`), are skipped and counted.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use vat_core::{ActivityClassificationEntry, ClassificationTable};

static CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}(\.\d+)*$").expect("code pattern is valid"));

/// Errors that can occur when loading the classification table.
#[derive(Debug, Error)]
pub enum ClassificationLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("classification data has no header row")]
    MissingHeader,

    #[error("unsupported classification file '{0}'; expected .csv or .json")]
    UnsupportedFormat(PathBuf),

    #[error("failed to read classification data: {0}")]
    Read(#[from] std::io::Error),
}

impl From<csv::Error> for ClassificationLoaderError {
    fn from(err: csv::Error) -> Self {
        ClassificationLoaderError::CsvParse(err.to_string())
    }
}

impl From<serde_json::Error> for ClassificationLoaderError {
    fn from(err: serde_json::Error) -> Self {
        ClassificationLoaderError::JsonParse(err.to_string())
    }
}

/// A loaded table together with the number of rows that were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationLoad {
    pub table: ClassificationTable,
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct ClassificationResponse {
    items: Vec<RawEntry>,
    #[serde(default)]
    count: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    code: String,
    name: String,
}

pub struct ClassificationLoader;

impl ClassificationLoader {
    /// Parse a classification CSV export.
    ///
    /// Rows are returned in file order.
    pub fn parse_csv<R: Read>(mut reader: R) -> Result<ClassificationLoad, ClassificationLoaderError> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        let input = input.trim_start_matches('\u{feff}');

        let header = input
            .lines()
            .find(|line| !line.trim().is_empty())
            .ok_or(ClassificationLoaderError::MissingHeader)?;
        let delimiter = detect_delimiter(header);

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input.as_bytes());

        let mut builder = TableBuilder::default();
        for (idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            let row_number = idx + 1; // header = row 0
            builder.push(
                record.get(0).unwrap_or_default(),
                record.get(1).unwrap_or_default(),
                row_number,
            );
        }

        Ok(builder.finish())
    }

    /// Parse a lookup-service response body.
    pub fn parse_json<R: Read>(reader: R) -> Result<ClassificationLoad, ClassificationLoaderError> {
        let response: ClassificationResponse = serde_json::from_reader(reader)?;

        if let Some(count) = response.count {
            if count != response.items.len() {
                warn!(
                    count,
                    items = response.items.len(),
                    "classification response count does not match its items"
                );
            }
        }

        let mut builder = TableBuilder::default();
        for (idx, item) in response.items.into_iter().enumerate() {
            builder.push(&item.code, &item.name, idx + 1);
        }

        Ok(builder.finish())
    }

    /// Read a `.csv` or `.json` file from disk.
    pub fn load_file(path: &Path) -> Result<ClassificationLoad, ClassificationLoaderError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Self::parse_csv(fs::File::open(path)?),
            Some("json") => Self::parse_json(fs::File::open(path)?),
            _ => Err(ClassificationLoaderError::UnsupportedFormat(
                path.to_path_buf(),
            )),
        }
    }
}

/// Load the table at `path`, falling back to an empty table on any failure.
///
/// An empty table disables classification search; rates can still be
/// resolved.
pub fn load_or_empty(path: &Path) -> ClassificationTable {
    match ClassificationLoader::load_file(path) {
        Ok(ClassificationLoad { table, skipped }) => {
            if skipped > 0 {
                warn!(path = %path.display(), skipped, "skipped invalid classification rows");
            }
            info!(path = %path.display(), entries = table.len(), "loaded classification table");
            table
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "classification table unavailable; using an empty table");
            ClassificationTable::empty()
        }
    }
}

fn detect_delimiter(header: &str) -> u8 {
    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    if semicolons > commas { b';' } else { b',' }
}

#[derive(Default)]
struct TableBuilder {
    entries: Vec<ActivityClassificationEntry>,
    skipped: usize,
}

impl TableBuilder {
    fn push(
        &mut self,
        code: &str,
        name: &str,
        row_number: usize,
    ) {
        let code = code.trim();
        if !CODE_PATTERN.is_match(code) {
            debug!(row = row_number, code, "skipping row with malformed code");
            self.skipped += 1;
            return;
        }

        match ActivityClassificationEntry::new(code, name) {
            Ok(entry) => self.entries.push(entry),
            Err(error) => {
                debug!(row = row_number, %error, "skipping incomplete row");
                self.skipped += 1;
            }
        }
    }

    fn finish(self) -> ClassificationLoad {
        ClassificationLoad {
            table: ClassificationTable::new(self.entries),
            skipped: self.skipped,
        }
    }
}
