//! Run report: console summary and the `--json` document.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use hotelgrid_enrich::{RunMeta, RunSummary};
use hotelgrid_io::OutputPaths;

const RULE_WIDTH: usize = 60;

#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub meta: &'a RunMeta,
    pub input: &'a Path,
    pub outputs: OutputFiles,
    pub summary: &'a RunSummary,
}

#[derive(Debug, Serialize)]
pub struct OutputFiles {
    pub csv: PathBuf,
    pub xlsx: Option<PathBuf>,
    pub log: PathBuf,
}

impl OutputFiles {
    pub fn new(paths: OutputPaths, log: PathBuf) -> Self {
        Self {
            csv: paths.csv,
            xlsx: paths.xlsx,
            log,
        }
    }
}

/// Human summary printed to stdout after a run.
pub fn render_text(summary: &RunSummary, outputs: &OutputFiles) -> String {
    let mut out = String::new();
    // fmt::Write for String never fails
    let _ = write_text(&mut out, summary, outputs);
    out
}

fn write_text(out: &mut impl fmt::Write, summary: &RunSummary, outputs: &OutputFiles) -> fmt::Result {
    let rule = "=".repeat(RULE_WIDTH);

    writeln!(out, "{rule}")?;
    writeln!(out, "ENRICHMENT SUMMARY")?;
    writeln!(out, "{rule}")?;
    writeln!(out, "Total rows: {}", summary.total_rows)?;
    writeln!(out, "Valid postal codes: {}", summary.valid_postal_codes)?;
    if summary.ambiguous_corsica > 0 {
        writeln!(out, "Ambiguous Corsica codes: {}", summary.ambiguous_corsica)?;
    }

    writeln!(out, "\nREGIONS:")?;
    for (region, count) in &summary.regions {
        writeln!(out, "  {region}: {count}")?;
    }

    writeln!(out, "\nSIZE:")?;
    for (range, count) in &summary.capacity_ranges {
        writeln!(out, "  {range}: {count}")?;
    }

    writeln!(out, "\nGROUP CLASSIFICATION:")?;
    writeln!(out, "  Groups: {}", summary.ownership.group)?;
    writeln!(out, "  Independent: {}", summary.ownership.independent)?;
    writeln!(out, "  Unknown: {}", summary.ownership.unknown)?;

    writeln!(out, "\nAMENITIES:")?;
    writeln!(out, "  Restaurant mentions: {}", summary.amenities.restaurant)?;
    writeln!(out, "  Spa mentions: {}", summary.amenities.spa)?;

    writeln!(out, "\nPOSITIONING:")?;
    writeln!(out, "  Boutique hotels: {}", summary.positioning.boutique)?;
    writeln!(out, "  Large properties: {}", summary.positioning.large)?;

    writeln!(out, "\nCONTEXT:")?;
    writeln!(out, "  Urban: {}", summary.context.urbain)?;
    writeln!(out, "  Leisure: {}", summary.context.loisir)?;
    writeln!(out, "  Unknown: {}", summary.context.inconnu)?;

    if !summary.warnings.is_empty() {
        writeln!(out, "\nWARNINGS ({}):", summary.warnings.len())?;
        for w in &summary.warnings {
            writeln!(out, "  - {w}")?;
        }
    }

    writeln!(out, "\nOUTPUT FILES:")?;
    writeln!(out, "  CSV: {}", outputs.csv.display())?;
    if let Some(ref xlsx) = outputs.xlsx {
        writeln!(out, "  XLSX: {}", xlsx.display())?;
    }
    writeln!(out, "  Log: {}", outputs.log.display())?;
    writeln!(out, "{rule}")
}
