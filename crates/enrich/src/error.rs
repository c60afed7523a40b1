use std::path::PathBuf;

use thiserror::Error;

/// Config file could not be read, parsed, or validated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// YAML parse / deserialization error.
    #[error("config parse error (yaml): {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// TOML parse / deserialization error.
    #[error("config parse error (toml): {0}")]
    Toml(#[from] toml::de::Error),
    /// Values parsed but are inconsistent (e.g. small >= medium threshold).
    #[error("config validation error: {0}")]
    Validation(String),
}

/// A lookup table could not be loaded.
#[derive(Debug, Error)]
pub enum ReferenceDataError {
    #[error("required reference file not found: {}", path.display())]
    Missing { path: PathBuf },
    #[error("cannot read reference file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse reference file {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("reference file {}: missing column '{column}'", path.display())]
    MissingHeader { path: PathBuf, column: String },
}

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Reference(#[from] ReferenceDataError),
    /// Input schema lacks required columns. Raised once, before any row.
    #[error("missing required columns: {}", quoted(.missing))]
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },
    #[error("row count mismatch: started with {expected}, ended with {actual}")]
    RowCountMismatch { expected: usize, actual: usize },
    #[error("cannot build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

fn quoted(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{n}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_message_lists_every_column() {
        let err = EnrichError::MissingColumns {
            missing: vec!["STAR".into(), "WEBSITE".into()],
            available: vec!["NOM COMMERCIAL".into()],
        };
        assert_eq!(err.to_string(), "missing required columns: 'STAR', 'WEBSITE'");
    }

    #[test]
    fn reference_missing_names_path() {
        let err = ReferenceDataError::Missing {
            path: PathBuf::from("data/major_cities_fr.txt"),
        };
        assert!(err.to_string().contains("data/major_cities_fr.txt"));
    }
}
