use std::fs::File;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::error::{AnalysisError, Result};

/// Pick a delimiter from the file extension: tab for `.tsv`, `.tab` and
/// `.txt`, comma otherwise.
pub fn infer_delimiter(path: &Path) -> u8 {
    match extension(path).as_deref() {
        Some("tsv") | Some("tab") | Some("txt") => b'\t',
        _ => b',',
    }
}

/// Whether `path` names a workbook read through calamine rather than as text.
pub fn is_spreadsheet(path: &Path) -> bool {
    matches!(
        extension(path).as_deref(),
        Some("xlsx") | Some("xlsm") | Some("xlsb") | Some("xls") | Some("ods")
    )
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// A fully read table with a header row, from delimited text or the first
/// sheet of a workbook.
#[derive(Debug, Clone)]
pub struct Table {
    path: PathBuf,
    headers: Vec<String>,
    records: Vec<StringRecord>,
    lines: Vec<u64>,
}

impl Table {
    /// Read `path`. Workbooks are recognized by extension and read from their
    /// first sheet; anything else is delimited text, with `delimiter`
    /// falling back to [`infer_delimiter`].
    pub fn read(path: &Path, delimiter: Option<u8>) -> Result<Self> {
        if is_spreadsheet(path) {
            return Self::read_first_sheet(path);
        }

        let delimiter = delimiter.unwrap_or_else(|| infer_delimiter(path));
        let file = File::open(path).map_err(|e| AnalysisError::io(path, e))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AnalysisError::csv(path, e))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let records = reader
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AnalysisError::csv(path, e))?;
        let lines = records
            .iter()
            .enumerate()
            .map(|(i, record)| record.position().map(|p| p.line()).unwrap_or(i as u64 + 2))
            .collect();

        debug!(path = %path.display(), columns = headers.len(), rows = records.len(), "Read table");
        Ok(Table {
            path: path.to_path_buf(),
            headers,
            records,
            lines,
        })
    }

    /// First worksheet of a workbook. The first non-empty row is the header;
    /// fully empty rows below it are skipped. Line numbers are sheet rows.
    fn read_first_sheet(path: &Path) -> Result<Self> {
        let spreadsheet_error = |source: calamine::Error| match source {
            calamine::Error::Io(e) => AnalysisError::io(path, e),
            other => AnalysisError::Spreadsheet {
                path: path.to_path_buf(),
                source: other,
            },
        };

        File::open(path).map_err(|e| AnalysisError::io(path, e))?;
        let mut workbook = open_workbook_auto(path).map_err(spreadsheet_error)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(calamine::Error::Msg("workbook has no worksheet"))
            .map_err(spreadsheet_error)?
            .map_err(spreadsheet_error)?;
        let first_row = range.start().map(|(row, _)| u64::from(row) + 1).unwrap_or(1);

        let mut rows = range.rows().enumerate().filter_map(|(i, cells)| {
            let values: Vec<String> = cells.iter().map(cell_text).collect();
            if values.iter().all(|v| v.trim().is_empty()) {
                None
            } else {
                Some((first_row + i as u64, values))
            }
        });

        let headers: Vec<String> = match rows.next() {
            Some((_, values)) => values
                .iter()
                .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
                .collect(),
            None => Vec::new(),
        };
        let (lines, records): (Vec<u64>, Vec<StringRecord>) = rows
            .map(|(line, values)| (line, StringRecord::from(values)))
            .unzip();

        debug!(path = %path.display(), columns = headers.len(), rows = records.len(), "Read first worksheet");
        Ok(Table {
            path: path.to_path_buf(),
            headers,
            records,
            lines,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of `name`: exact match first, then case-insensitive.
    pub fn column(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .or_else(|| {
                self.headers
                    .iter()
                    .position(|h| h.eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| AnalysisError::MissingColumn {
                path: self.path.clone(),
                column: name.to_string(),
                available: self.headers.clone(),
            })
    }

    /// Iterate `(line, record)`; line numbers are 1-based file lines or sheet rows.
    pub fn rows(&self) -> impl Iterator<Item = (u64, &StringRecord)> {
        self.lines.iter().copied().zip(&self.records)
    }

    /// Cell value, empty when a short row lacks the column.
    pub fn cell<'a>(record: &'a StringRecord, column: usize) -> &'a str {
        record.get(column).unwrap_or("")
    }
}

/// Text of one worksheet cell. Whole-number floats drop the fraction so a
/// mode of regulation stored as a number reads as `1` or `-1`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}
