// Excel/ODS import, XLSX export

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use chrono::Timelike;
use rust_xlsxwriter::{Format, Workbook};

use hotelgrid_enrich::model::{Cell, EnrichedRecord};

use crate::{shape_table, Imported, IoError};

/// Excel sheet limits
const MAX_ROWS: usize = 1_048_576;
const MAX_COLS: usize = 16_384;

const SHEET_NAME: &str = "hotels";

/// Import the first worksheet (xlsx, xlsm, xls, ods). First non-empty row is the header.
pub fn import(path: &Path) -> Result<Imported, IoError> {
    let workbook_err = |message: String| IoError::Workbook {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook: Sheets<_> =
        open_workbook_auto(path).map_err(|e| workbook_err(format!("failed to open: {e}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| workbook_err("workbook contains no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| workbook_err(format!("failed to read sheet '{sheet_name}': {e}")))?;

    tracing::debug!(path = %path.display(), sheet = %sheet_name, "reading worksheet");

    let raw = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());
    shape_table(path, raw)
}

/// Render a workbook cell as the text a spreadsheet user would see.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // Integers without decimals: postal codes, room counts
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{n}")
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(e) => format!("#{e:?}"),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) if value.num_seconds_from_midnight() == 0 => {
                value.format("%Y-%m-%d").to_string()
            }
            Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format!("{}", dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

/// Write the enriched table to a single sheet: bold frozen header, flags as booleans.
pub fn export(columns: &[String], records: &[EnrichedRecord], path: &Path) -> Result<(), IoError> {
    if records.len() + 1 > MAX_ROWS || columns.len() > MAX_COLS {
        return Err(IoError::write(
            path,
            format!(
                "{} rows x {} columns exceeds the XLSX limit of {MAX_ROWS} x {MAX_COLS}",
                records.len() + 1,
                columns.len()
            ),
        ));
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook
        .add_worksheet()
        .set_name(SHEET_NAME)
        .map_err(|e| IoError::write(path, e))?;

    // bounds checked above, so the casts below cannot truncate
    for (col, name) in columns.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, name, &header_format)
            .map_err(|e| IoError::write(path, e))?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = (idx + 1) as u32;
        for (col, cell) in record.cells().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text("") => {}
                Cell::Text(s) => {
                    worksheet
                        .write_string(row, col, s)
                        .map_err(|e| IoError::write(path, e))?;
                }
                Cell::Flag(b) => {
                    worksheet
                        .write_boolean(row, col, b)
                        .map_err(|e| IoError::write(path, e))?;
                }
            }
        }
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| IoError::write(path, e))?;

    workbook.save(path).map_err(|e| IoError::write(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use hotelgrid_enrich::model::{
        output_columns, CapacityRange, ClassificationResult, HotelContext, Ownership, SizeSegment,
    };
    use hotelgrid_enrich::HotelRecord;

    fn record(name: &str, postal: &str) -> EnrichedRecord {
        EnrichedRecord {
            original: HotelRecord::new(vec![name.to_string(), postal.to_string()]),
            derived: ClassificationResult {
                department: "06".into(),
                region: "Provence-Alpes-Côte d'Azur".into(),
                capacity_range: CapacityRange::Unknown,
                size_segment: SizeSegment::Unknown,
                restaurant_flag: true,
                spa_flag: false,
                hotel_domain: "unknown".into(),
                independent_or_group: Ownership::Unknown,
                group_name: "unknown".into(),
                large_property_flag: false,
                boutique_flag: false,
                hotel_context: HotelContext::Loisir,
            },
        }
    }

    #[test]
    fn test_float_cells_render_without_decimal_noise() {
        assert_eq!(cell_to_string(&Data::Float(75001.0)), "75001");
        assert_eq!(cell_to_string(&Data::Float(4.5)), "4.5");
        assert_eq!(cell_to_string(&Data::Int(12)), "12");
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::Bool(true)), "TRUE");
        assert_eq!(cell_to_string(&Data::String("06000".into())), "06000");
    }

    #[test]
    fn test_export_then_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enriched.xlsx");
        let columns = output_columns(&["NOM COMMERCIAL".to_string(), "CODE POSTAL".to_string()]);
        let records = vec![record("Hôtel de la Plage", "06000"), record("", "06400")];

        export(&columns, &records, &path).unwrap();
        assert!(path.exists());

        let imported = import(&path).unwrap();
        assert_eq!(imported.table.columns, columns);
        assert_eq!(imported.table.len(), 2);

        let first = imported.table.rows[0].values();
        assert_eq!(first[0], "Hôtel de la Plage");
        // written as text, so the leading zero survives
        assert_eq!(first[1], "06000");
        // native booleans come back as booleans
        assert_eq!(first[6], "TRUE");
        assert_eq!(first[7], "FALSE");
        assert_eq!(first[13], "loisir");

        // empty originals stay empty
        assert_eq!(imported.table.rows[1].values()[0], "");
    }

    #[test]
    fn test_import_rejects_non_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.xlsx");
        std::fs::write(&path, "not a zip").unwrap();
        let err = import(&path).unwrap_err();
        assert!(matches!(err, IoError::Workbook { .. }));
    }
}
