// File I/O for hotel tables: CSV/TSV and Excel/ODS in, CSV and XLSX out

pub mod csv;
pub mod xlsx;

use std::path::{Path, PathBuf};

use hotelgrid_enrich::{EnrichResult, HotelRecord, RecordTable};
use thiserror::Error;

/// Default output file stem.
pub const DEFAULT_BASENAME: &str = "enriched_hotels";

#[derive(Debug, Error)]
pub enum IoError {
    #[error("input file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error(
        "unsupported file type '{extension}' for {} (expected csv, tsv, txt, xlsx, xlsm, xls or ods)",
        path.display()
    )]
    UnsupportedFormat { path: PathBuf, extension: String },
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: ::csv::Error,
    },
    #[error("cannot read workbook {}: {message}", path.display())]
    Workbook { path: PathBuf, message: String },
    #[error("{} has no header row", path.display())]
    NoHeader { path: PathBuf },
    #[error("cannot write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
}

impl IoError {
    pub(crate) fn write(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Workbook,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" | "tsv" | "txt" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(Self::Workbook),
            _ => Err(IoError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: ext,
            }),
        }
    }
}

/// A loaded table plus non-fatal problems met while shaping it.
#[derive(Debug, Clone, Default)]
pub struct Imported {
    pub table: RecordTable,
    pub warnings: Vec<String>,
}

/// Read any supported input into a table of text values.
pub fn import(path: &Path) -> Result<Imported, IoError> {
    if !path.is_file() {
        return Err(IoError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let imported = match InputFormat::from_path(path)? {
        InputFormat::Csv => csv::import(path)?,
        InputFormat::Workbook => xlsx::import(path)?,
    };
    tracing::info!(
        path = %path.display(),
        rows = imported.table.len(),
        columns = imported.table.columns.len(),
        "input loaded"
    );
    Ok(imported)
}

/// Turn raw rows into a table: trimmed headers, every row as wide as the header.
/// Blank rows before the header are skipped; after it every row is a record,
/// even one whose cells are all empty.
pub(crate) fn shape_table<I>(path: &Path, mut raw: I) -> Result<Imported, IoError>
where
    I: Iterator<Item = Vec<String>>,
{
    let header: Vec<String> = raw
        .find(|row| row.iter().any(|v| !v.trim().is_empty()))
        .ok_or_else(|| IoError::NoHeader {
            path: path.to_path_buf(),
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let width = header.len();

    let mut rows = Vec::new();
    let mut ragged = 0usize;
    for mut values in raw {
        if values.len() != width {
            ragged += 1;
            values.resize(width, String::new());
        }
        rows.push(HotelRecord::new(values));
    }

    let mut warnings = Vec::new();
    if ragged > 0 {
        let msg = format!(
            "{ragged} row(s) in {} did not have {width} fields and were padded or truncated",
            path.display()
        );
        tracing::warn!("{msg}");
        warnings.push(msg);
    }

    Ok(Imported {
        table: RecordTable::new(header, rows),
        warnings,
    })
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub csv: PathBuf,
    pub xlsx: Option<PathBuf>,
}

/// Write `<dir>/<basename>.csv` and, unless disabled, `<dir>/<basename>.xlsx`.
pub fn export(
    result: &EnrichResult,
    dir: &Path,
    basename: &str,
    with_xlsx: bool,
) -> Result<OutputPaths, IoError> {
    std::fs::create_dir_all(dir).map_err(|e| IoError::write(dir, e))?;

    let csv_path = dir.join(format!("{basename}.csv"));
    csv::export(&result.columns, &result.records, &csv_path)?;
    tracing::info!(path = %csv_path.display(), rows = result.records.len(), "csv written");

    let xlsx_path = if with_xlsx {
        let path = dir.join(format!("{basename}.xlsx"));
        xlsx::export(&result.columns, &result.records, &path)?;
        tracing::info!(path = %path.display(), "xlsx written");
        Some(path)
    } else {
        None
    };

    Ok(OutputPaths {
        csv: csv_path,
        xlsx: xlsx_path,
    })
}

/// File name used for an N-row sample.
pub fn sample_file_name(rows: usize) -> String {
    format!("test_{rows}_rows.csv")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a.CSV")).unwrap(), InputFormat::Csv);
        assert_eq!(InputFormat::from_path(Path::new("a.tsv")).unwrap(), InputFormat::Csv);
        assert_eq!(InputFormat::from_path(Path::new("a.xlsx")).unwrap(), InputFormat::Workbook);
        assert_eq!(InputFormat::from_path(Path::new("a.ods")).unwrap(), InputFormat::Workbook);
        let err = InputFormat::from_path(Path::new("a.json")).unwrap_err();
        assert!(err.to_string().contains("'json'"));
        assert!(InputFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn import_missing_file() {
        let err = import(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, IoError::NotFound { .. }));
    }

    #[test]
    fn shape_pads_and_truncates() {
        let raw = vec![
            vec![" A ".to_string(), "B".to_string(), "C".to_string()],
            vec!["1".to_string(), "2".to_string(), "3".to_string()],
            vec!["4".to_string()],
            vec!["5".to_string(), "6".to_string(), "7".to_string(), "8".to_string()],
        ];
        let imported = shape_table(Path::new("t.csv"), raw.into_iter()).unwrap();
        assert_eq!(imported.table.columns, vec!["A", "B", "C"]);
        assert_eq!(imported.table.len(), 3);
        assert_eq!(imported.table.rows[1].values(), ["4", "", ""]);
        assert_eq!(imported.table.rows[2].values(), ["5", "6", "7"]);
        assert_eq!(imported.warnings.len(), 1);
        assert!(imported.warnings[0].starts_with("2 row(s)"));
    }

    #[test]
    fn shape_skips_leading_blank_rows_but_keeps_empty_records() {
        let raw = vec![
            vec!["".to_string(), "".to_string()],
            vec!["A".to_string(), "B".to_string()],
            vec!["".to_string(), "".to_string()],
            vec!["x".to_string(), "".to_string()],
        ];
        let imported = shape_table(Path::new("t.xlsx"), raw.into_iter()).unwrap();
        assert_eq!(imported.table.columns, vec!["A", "B"]);
        assert_eq!(imported.table.len(), 2);
        assert_eq!(imported.table.rows[0].values(), ["", ""]);
        assert_eq!(imported.table.rows[1].values(), ["x", ""]);
        assert!(imported.warnings.is_empty());
    }

    #[test]
    fn shape_requires_a_header() {
        let err = shape_table(Path::new("t.csv"), std::iter::empty()).unwrap_err();
        assert!(matches!(err, IoError::NoHeader { .. }));
    }

    #[test]
    fn sample_name() {
        assert_eq!(sample_file_name(100), "test_100_rows.csv");
    }
}
