use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;

use crate::classify::{
    classify_amenities, classify_context, classify_size, is_boutique, is_large_property, room_count,
};
use crate::config::EnrichConfig;
use crate::error::EnrichError;
use crate::geo::{self, GeoWarning};
use crate::group::resolve_group;
use crate::model::{
    output_columns, ClassificationResult, ColumnIndex, EnrichedRecord, HotelFields, HotelRecord,
    RecordTable, COL_ACCOMMODATION_TYPE, COL_CAPACITY, COL_COMMUNE, COL_NAME, COL_POSTAL_CODE,
    COL_ROOMS, COL_STARS, COL_WEBSITE, REQUIRED_COLUMNS,
};
use crate::normalize::normalize_text;
use crate::reference::{ReferenceData, ReferencePaths};
use crate::summary::RunSummary;

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub engine_version: String,
    pub run_at: String,
    pub rows: usize,
}

#[derive(Debug)]
pub struct EnrichResult {
    pub meta: RunMeta,
    /// Input columns followed by the derived columns.
    pub columns: Vec<String>,
    pub records: Vec<EnrichedRecord>,
    pub summary: RunSummary,
}

/// Load config (defaults when `config_path` is `None`) and reference tables.
pub fn load_setup(
    paths: &ReferencePaths,
    config_path: Option<&Path>,
) -> Result<(EnrichConfig, ReferenceData), EnrichError> {
    let config = match config_path {
        Some(path) => EnrichConfig::from_path(path)?,
        None => EnrichConfig::default(),
    };
    let reference = ReferenceData::load(paths)?;
    Ok((config, reference))
}

/// Resolve the required columns once, before any row is touched.
pub fn validate_schema(columns: &[String]) -> Result<ColumnIndex, EnrichError> {
    let position = |name: &str| columns.iter().position(|c| c.trim() == name);

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| position(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(EnrichError::MissingColumns {
            missing,
            available: columns.to_vec(),
        });
    }

    let idx = |name: &str| position(name).unwrap_or_default();
    Ok(ColumnIndex {
        accommodation_type: idx(COL_ACCOMMODATION_TYPE),
        stars: idx(COL_STARS),
        name: idx(COL_NAME),
        postal_code: idx(COL_POSTAL_CODE),
        commune: idx(COL_COMMUNE),
        website: idx(COL_WEBSITE),
        capacity: idx(COL_CAPACITY),
        rooms: idx(COL_ROOMS),
    })
}

/// Derive every appended field for one row. Total: never fails.
pub fn classify(
    fields: &HotelFields<'_>,
    config: &EnrichConfig,
    reference: &ReferenceData,
) -> (ClassificationResult, Option<GeoWarning>) {
    let geo = geo::resolve(fields.postal_code, &config.corsica_ranges, reference);

    let rooms = room_count(fields.rooms);
    let (capacity_range, size_segment) = classify_size(rooms, config);

    let name = normalize_text(fields.name);
    let amenities = classify_amenities(&name, config);

    let group = resolve_group(fields.website, reference);

    let large_property_flag = is_large_property(rooms, fields.capacity, config);
    let boutique_flag = is_boutique(group.ownership, rooms, fields.stars, config);

    let hotel_context = classify_context(
        fields.accommodation_type,
        &name,
        fields.commune,
        config,
        reference,
    );

    let result = ClassificationResult {
        department: geo.department,
        region: geo.region,
        capacity_range,
        size_segment,
        restaurant_flag: amenities.restaurant,
        spa_flag: amenities.spa,
        hotel_domain: group.hotel_domain,
        independent_or_group: group.ownership,
        group_name: group.group_name,
        large_property_flag,
        boutique_flag,
        hotel_context,
    };
    (result, geo.warning)
}

/// Enrich one record. The record is moved into the output untouched.
pub fn enrich_record(
    record: HotelRecord,
    columns: &ColumnIndex,
    config: &EnrichConfig,
    reference: &ReferenceData,
) -> (EnrichedRecord, Option<GeoWarning>) {
    let (derived, warning) = classify(&HotelFields::extract(&record, columns), config, reference);
    (
        EnrichedRecord {
            original: record,
            derived,
        },
        warning,
    )
}

/// Rows per partial summary in [`run_parallel`].
const TALLY_CHUNK: usize = 1024;

type Outcome = (EnrichedRecord, Option<GeoWarning>);

/// Enrich every row on the calling thread.
pub fn run(
    config: &EnrichConfig,
    reference: &ReferenceData,
    table: RecordTable,
) -> Result<EnrichResult, EnrichError> {
    let index = validate_schema(&table.columns)?;
    let expected = table.len();
    tracing::info!(rows = expected, "starting enrichment");

    let outcomes: Vec<Outcome> = table
        .rows
        .into_iter()
        .map(|record| enrich_record(record, &index, config, reference))
        .collect();
    let counts = tally(0, &outcomes);

    finish(reference, table.columns, expected, outcomes, counts)
}

/// Enrich rows on a dedicated pool of `jobs` threads. Output order matches input.
///
/// Each worker tallies its own chunk; the partial summaries are merged in row order.
pub fn run_parallel(
    config: &EnrichConfig,
    reference: &ReferenceData,
    table: RecordTable,
    jobs: usize,
) -> Result<EnrichResult, EnrichError> {
    let index = validate_schema(&table.columns)?;
    let expected = table.len();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()?;
    tracing::info!(rows = expected, jobs = pool.current_num_threads(), "starting parallel enrichment");

    let rows = table.rows;
    let (outcomes, counts) = pool.install(|| {
        let outcomes: Vec<Outcome> = rows
            .into_par_iter()
            .map(|record| enrich_record(record, &index, config, reference))
            .collect();
        let counts = outcomes
            .par_chunks(TALLY_CHUNK)
            .enumerate()
            .map(|(i, chunk)| tally(i * TALLY_CHUNK, chunk))
            .reduce(RunSummary::default, |mut left, right| {
                left.merge(right);
                left
            });
        (outcomes, counts)
    });

    finish(reference, table.columns, expected, outcomes, counts)
}

/// Count a contiguous slice of rows starting at zero-based row `offset`.
fn tally(offset: usize, outcomes: &[Outcome]) -> RunSummary {
    let mut summary = RunSummary::default();
    for (i, (record, warning)) in outcomes.iter().enumerate() {
        let row = offset + i + 1;
        if let Some(w) = warning {
            tracing::warn!(row, "{w}");
            summary.warn(format!("row {row}: {w}"));
        }
        summary.record(&record.derived, warning.as_ref());
    }
    summary
}

/// Put setup warnings ahead of the row tally and check the row-count invariant.
fn finish(
    reference: &ReferenceData,
    input_columns: Vec<String>,
    expected: usize,
    outcomes: Vec<Outcome>,
    counts: RunSummary,
) -> Result<EnrichResult, EnrichError> {
    let mut summary = RunSummary::default();
    for w in reference.warnings() {
        summary.warn(w.clone());
    }
    summary.merge(counts);

    let records: Vec<EnrichedRecord> = outcomes.into_iter().map(|(record, _)| record).collect();

    if records.len() != expected || summary.total_rows != expected {
        return Err(EnrichError::RowCountMismatch {
            expected,
            actual: records.len(),
        });
    }

    tracing::info!(
        rows = records.len(),
        valid_postal_codes = summary.valid_postal_codes,
        groups = summary.ownership.group,
        independent = summary.ownership.independent,
        "enrichment complete"
    );

    Ok(EnrichResult {
        meta: RunMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            rows: records.len(),
        },
        columns: output_columns(&input_columns),
        records,
        summary,
    })
}
