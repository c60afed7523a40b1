//! CLI Exit Code Registry
//!
//! Every exit code `hgrid` can return is defined here.
//! Batch scripts branch on these values, so never renumber one.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain     | Description                                   |
//! |---------|------------|-----------------------------------------------|
//! | 0       | Universal  | Success                                       |
//! | 1       | Universal  | General error (unspecified)                   |
//! | 2       | Universal  | CLI usage error (bad args, unsupported file)  |
//! | 60-69   | enrich     | Setup, input and output failures of a run     |
//!
//! New codes go in the matching range, get a doc line saying what triggers
//! them, and are mapped in [`enrich_exit_code`] or [`io_exit_code`].

use hotelgrid_enrich::EnrichError;
use hotelgrid_io::IoError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unsupported input extension.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Enrich (60-69)
// =============================================================================

/// Config file unreadable, malformed, or inconsistent.
pub const EXIT_INVALID_CONFIG: u8 = 60;

/// Reference table missing (with --strict-reference) or unparsable.
pub const EXIT_REFERENCE_DATA: u8 = 61;

/// Input lacks one or more required columns. No output is written.
pub const EXIT_MISSING_COLUMNS: u8 = 62;

/// Input file not found or not decodable.
pub const EXIT_INPUT_READ: u8 = 63;

/// Output directory or files could not be written.
pub const EXIT_OUTPUT_WRITE: u8 = 64;

/// Map an engine error to its exit code.
pub fn enrich_exit_code(err: &EnrichError) -> u8 {
    match err {
        EnrichError::Config(_) => EXIT_INVALID_CONFIG,
        EnrichError::Reference(_) => EXIT_REFERENCE_DATA,
        EnrichError::MissingColumns { .. } => EXIT_MISSING_COLUMNS,
        EnrichError::RowCountMismatch { .. } | EnrichError::ThreadPool(_) => EXIT_ERROR,
    }
}

/// Map an I/O error to its exit code.
pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::UnsupportedFormat { .. } => EXIT_USAGE,
        IoError::Write { .. } => EXIT_OUTPUT_WRITE,
        IoError::NotFound { .. }
        | IoError::Read { .. }
        | IoError::Csv { .. }
        | IoError::Workbook { .. }
        | IoError::NoHeader { .. } => EXIT_INPUT_READ,
    }
}
