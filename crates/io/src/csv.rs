// CSV/TSV import/export

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use hotelgrid_enrich::model::EnrichedRecord;
use hotelgrid_enrich::RecordTable;

use crate::{shape_table, Imported, IoError};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn import(path: &Path) -> Result<Imported, IoError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    tracing::debug!(path = %path.display(), delimiter = %char::from(delimiter).escape_default(), "delimiter detected");
    import_from_string(path, &content, delimiter)
}

/// Delimiters tried in order; on equal scores the earlier one wins.
const DELIMITERS: [u8; 4] = [b';', b',', b'\t', b'|'];

/// Lines inspected when guessing the delimiter.
const SNIFF_LINES: usize = 10;

/// Pick the delimiter under which the first lines agree on a field count.
///
/// A candidate scores `agreeing_lines * header_width`; one that leaves the header
/// as a single field scores zero. Falls back to a comma.
fn sniff_delimiter(content: &str) -> u8 {
    let lines: Vec<&str> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();
    let Some((header, _)) = lines.split_first() else {
        return b',';
    };

    let score = |delim: u8| -> usize {
        let width = field_count(header, delim);
        if width < 2 {
            return 0;
        }
        let agreeing = lines.iter().filter(|l| field_count(l, delim) == width).count();
        agreeing * width
    };

    let mut best = (b',', 0);
    for delim in DELIMITERS {
        let s = score(delim);
        if s > best.1 {
            best = (delim, s);
        }
    }
    best.0
}

/// Fields in one line under `delim`, honoring quotes.
fn field_count(line: &str, delim: u8) -> usize {
    ::csv::ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(Result::ok)
        .map_or(1, |r| r.len())
}

/// Read file and convert to UTF-8 if needed (Excel exports are often Windows-1252).
/// A leading byte-order mark is dropped.
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let read_err = |source| IoError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(read_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(read_err)?;

    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            tracing::debug!(path = %path.display(), "not valid UTF-8, decoding as Windows-1252");
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };

    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

fn import_from_string(path: &Path, content: &str, delimiter: u8) -> Result<Imported, IoError> {
    let reader = ::csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut raw = Vec::new();
    for result in reader.into_records() {
        let record = result.map_err(|source| IoError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        raw.push(record.iter().map(String::from).collect::<Vec<_>>());
    }

    shape_table(path, raw.into_iter())
}

/// Write the enriched table: UTF-8 with BOM, comma-separated, header first.
pub fn export(columns: &[String], records: &[EnrichedRecord], path: &Path) -> Result<(), IoError> {
    write_with_bom(
        path,
        columns,
        records.iter().map(|r| r.cells().map(|c| c.render())),
    )
}

/// Copy the header and the first `rows` records of `table` to `path`.
/// Returns the number of records written.
pub fn export_sample(table: &RecordTable, rows: usize, path: &Path) -> Result<usize, IoError> {
    let written = rows.min(table.len());
    write_with_bom(
        path,
        &table.columns,
        table.rows.iter().take(rows).map(|r| r.values().iter()),
    )?;
    Ok(written)
}

fn write_with_bom<R, F>(path: &Path, header: &[String], rows: R) -> Result<(), IoError>
where
    R: IntoIterator,
    R::Item: IntoIterator<Item = F>,
    F: AsRef<[u8]>,
{
    let mut file = File::create(path).map_err(|e| IoError::write(path, e))?;
    file.write_all(UTF8_BOM).map_err(|e| IoError::write(path, e))?;

    let mut writer = ::csv::WriterBuilder::new().from_writer(file);
    writer
        .write_record(header)
        .map_err(|e| IoError::write(path, e))?;
    for row in rows {
        writer.write_record(row).map_err(|e| IoError::write(path, e))?;
    }
    writer.flush().map_err(|e| IoError::write(path, e))?;
    Ok(())
}
