//! `hgrid run`, `hgrid validate`, `hgrid sample`.

use std::path::{Path, PathBuf};

use clap::Args;

use hotelgrid_enrich::{load_setup, run, run_parallel, validate_schema, EnrichConfig, ReferenceData, ReferencePaths};
use hotelgrid_io::{sample_file_name, DEFAULT_BASENAME};

use crate::exit_codes::{EXIT_ERROR, EXIT_OUTPUT_WRITE};
use crate::logging::{self, LOG_FILE_NAME};
use crate::report::{self, OutputFiles, RunReport};
use crate::CliError;

/// Options shared by every command that needs thresholds and lookup tables.
#[derive(Args)]
pub struct SetupArgs {
    /// Thresholds and keyword lists (YAML; TOML when the file ends in .toml).
    /// Built-in defaults apply when omitted.
    #[arg(long, env = "HGRID_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding department_to_region_fr.csv, hotel_groups_domains.csv
    /// and major_cities_fr.txt
    #[arg(long, default_value = "data")]
    pub reference_dir: PathBuf,

    /// Fail when a reference file is missing instead of using an empty table
    #[arg(long)]
    pub strict_reference: bool,
}

impl SetupArgs {
    fn load(&self) -> Result<(EnrichConfig, ReferenceData), CliError> {
        let paths = ReferencePaths::in_dir(&self.reference_dir).required(self.strict_reference);
        Ok(load_setup(&paths, self.config.as_deref())?)
    }
}

#[derive(Args)]
pub struct RunArgs {
    /// Input table (.csv, .tsv, .txt, .xlsx, .xlsm, .xls, .ods)
    pub input: PathBuf,

    /// Directory for the enriched files and the run log (created if missing)
    #[arg(long, short = 'o', default_value = ".")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub setup: SetupArgs,

    /// Output file name without extension
    #[arg(long, default_value = DEFAULT_BASENAME)]
    pub basename: String,

    /// Worker threads for row enrichment (1 = sequential)
    #[arg(long, short = 'j', default_value_t = 1)]
    pub jobs: usize,

    /// Skip the XLSX output
    #[arg(long)]
    pub no_xlsx: bool,

    /// Print the run report as JSON on stdout instead of the text summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub setup: SetupArgs,

    /// Input table whose columns should be checked
    pub input: Option<PathBuf>,
}

#[derive(Args)]
pub struct SampleArgs {
    /// Input table (.csv, .tsv, .txt, .xlsx, .xlsm, .xls, .ods)
    pub input: PathBuf,

    /// Number of data rows to keep
    #[arg(long, short = 'n', default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    pub rows: u64,

    /// Output file (default: test_<ROWS>_rows.csv in the current directory)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

// ============================================================================
// run
// ============================================================================

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    std::fs::create_dir_all(&args.output_dir).map_err(|e| {
        CliError::new(
            EXIT_OUTPUT_WRITE,
            format!("cannot create output directory {}: {e}", args.output_dir.display()),
        )
    })?;

    let log_path = args.output_dir.join(LOG_FILE_NAME);
    logging::init(Some(&log_path)).map_err(|msg| CliError::new(EXIT_OUTPUT_WRITE, msg))?;
    tracing::info!(input = %args.input.display(), "hotel enrichment started");

    let (config, reference) = args.setup.load()?;
    let imported = hotelgrid_io::import(&args.input)?;

    let mut result = if args.jobs > 1 {
        run_parallel(&config, &reference, imported.table, args.jobs)?
    } else {
        run(&config, &reference, imported.table)?
    };
    for w in imported.warnings {
        result.summary.warn(w);
    }

    let paths = hotelgrid_io::export(&result, &args.output_dir, &args.basename, !args.no_xlsx)?;
    let outputs = OutputFiles::new(paths, log_path);

    if args.json {
        let doc = RunReport {
            meta: &result.meta,
            input: &args.input,
            outputs,
            summary: &result.summary,
        };
        let json = serde_json::to_string_pretty(&doc)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", report::render_text(&result.summary, &outputs));
    }

    tracing::info!(
        rows = result.meta.rows,
        warnings = result.summary.warnings.len(),
        "hotel enrichment finished"
    );
    Ok(())
}

// ============================================================================
// validate
// ============================================================================

pub fn cmd_validate(args: ValidateArgs) -> Result<(), CliError> {
    init_console_logging()?;

    let (config, reference) = args.setup.load()?;
    match args.setup.config {
        Some(ref path) => println!("config:    {} ok", path.display()),
        None => println!("config:    built-in defaults"),
    }
    println!(
        "           sizes <= {} / <= {} rooms, boutique <= {} rooms and >= {} stars",
        config.threshold_small_max,
        config.threshold_medium_max,
        config.threshold_boutique_max_rooms,
        config.threshold_boutique_min_stars,
    );
    let lists = config.keyword_lists();
    let sizes: Vec<String> = lists
        .iter()
        .map(|(name, set)| format!("{} {}", name.trim_end_matches("_keywords"), set.len()))
        .collect();
    println!("           keywords: {}", sizes.join(", "));
    for (name, _) in lists.iter().filter(|(_, set)| set.is_empty()) {
        println!("warning:   {name} is empty, nothing will match it");
    }
    println!(
        "reference: {} departments, {} group domains, {} major cities",
        reference.department_count(),
        reference.group_count(),
        reference.city_count(),
    );
    for w in reference.warnings() {
        println!("warning:   {w}");
    }

    if let Some(ref input) = args.input {
        let imported = hotelgrid_io::import(input)?;
        validate_schema(&imported.table.columns)?;
        println!(
            "input:     {} ok ({} rows, {} columns)",
            input.display(),
            imported.table.len(),
            imported.table.columns.len(),
        );
        for w in &imported.warnings {
            println!("warning:   {w}");
        }
    }

    Ok(())
}

// ============================================================================
// sample
// ============================================================================

pub fn cmd_sample(args: SampleArgs) -> Result<(), CliError> {
    init_console_logging()?;

    let rows = usize::try_from(args.rows).unwrap_or(usize::MAX);
    let imported = hotelgrid_io::import(&args.input)?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(sample_file_name(rows)));

    let written = hotelgrid_io::csv::export_sample(&imported.table, rows, &output)?;

    println!("Total rows: {}", imported.table.len());
    println!("[OK] Created test file: {}", output.display());
    println!("[OK] Contains {written} rows");
    println!("\nNow run:\n   hgrid run {}", shell_path(&output));
    Ok(())
}

fn init_console_logging() -> Result<(), CliError> {
    logging::init(None).map_err(|msg| CliError::new(EXIT_ERROR, msg))
}

fn shell_path(path: &Path) -> String {
    let s = path.display().to_string();
    if s.contains(' ') {
        format!("\"{s}\"")
    } else {
        s
    }
}
