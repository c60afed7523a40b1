//! `hotelgrid-enrich`: row-level enrichment of French hotel records.
//!
//! Pure engine crate: receives pre-loaded records and reference tables,
//! returns the records with derived columns appended plus a run summary.
//! No CLI or file-format dependencies beyond the small reference tables.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod geo;
pub mod group;
pub mod model;
pub mod normalize;
pub mod reference;
pub mod summary;

pub use config::EnrichConfig;
pub use engine::{enrich_record, load_setup, run, run_parallel, validate_schema, EnrichResult, RunMeta};
pub use error::{ConfigError, EnrichError, ReferenceDataError};
pub use model::{ClassificationResult, EnrichedRecord, HotelRecord, RecordTable};
pub use reference::{ReferenceData, ReferencePaths};
pub use summary::RunSummary;
